use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 列出目錄下的檔名（不含路徑），依名稱排序。
    fn list_files(&self, dir: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

/// 每支程式都是一條 extract → transform → load 的管道。
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Input: Send;
    type Output: Send;

    async fn extract(&self) -> Result<Self::Input>;
    async fn transform(&self, input: Self::Input) -> Result<Self::Output>;
    /// 回傳輸出位置的描述，供呼叫端顯示。
    async fn load(&self, output: Self::Output) -> Result<String>;
}
