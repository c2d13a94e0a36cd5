use crate::config::toml_config::CipherConfig;
use crate::core::cipher::{self, SAMPLE_TEXT};
use crate::core::{Pipeline, Storage};
use crate::domain::model::{CipherKey, CipherOutcome};
use crate::utils::error::{KitError, Result};
use crate::utils::prompt::Notices;

pub struct CipherPipeline<S: Storage> {
    storage: S,
    config: CipherConfig,
    key: CipherKey,
    notices: Notices,
}

/// 明文與其來源
#[derive(Debug, Clone)]
pub struct PlainText {
    pub text: String,
    pub created_sample: bool,
}

impl<S: Storage> CipherPipeline<S> {
    pub fn new(storage: S, config: CipherConfig, key: CipherKey) -> Self {
        Self {
            storage,
            config,
            key,
            notices: Notices::new(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for CipherPipeline<S> {
    type Input = PlainText;
    type Output = CipherOutcome;

    async fn extract(&self) -> Result<PlainText> {
        let path = &self.config.input_file;

        match self.storage.read_file(path).await {
            Ok(data) => {
                let text = String::from_utf8(data).map_err(|e| KitError::InvalidInputError {
                    message: format!("{} is not valid UTF-8: {}", path, e),
                })?;
                tracing::debug!("Read {} characters from {}", text.chars().count(), path);
                Ok(PlainText {
                    text,
                    created_sample: false,
                })
            }
            // 找不到檔案時建立範例檔
            Err(e) if e.is_not_found() => {
                self.notices
                    .push(format!("{} not found. Creating a sample text file...", path));
                tracing::warn!("{} missing, writing sample text", path);
                self.storage.write_file(path, SAMPLE_TEXT.as_bytes()).await?;
                Ok(PlainText {
                    text: SAMPLE_TEXT.to_string(),
                    created_sample: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn transform(&self, input: PlainText) -> Result<CipherOutcome> {
        let scope = self.config.scope;
        tracing::debug!(
            "Encrypting with n={}, m={}, scope={:?}",
            self.key.n,
            self.key.m,
            scope
        );

        let encrypted = cipher::encrypt(&input.text, self.key, scope);
        let decrypted = cipher::decrypt(&encrypted, self.key, scope);
        let verification = cipher::verify(&input.text, &decrypted);

        Ok(CipherOutcome {
            encrypted,
            decrypted,
            verification,
        })
    }

    async fn load(&self, outcome: CipherOutcome) -> Result<String> {
        let encrypted_path = &self.config.encrypted_file;
        let decrypted_path = &self.config.decrypted_file;

        self.storage
            .write_file(encrypted_path, outcome.encrypted.as_bytes())
            .await?;
        self.notices.push(format!(
            "Encryption successful! Encrypted text written to '{}'.",
            encrypted_path
        ));

        self.storage
            .write_file(decrypted_path, outcome.decrypted.as_bytes())
            .await?;

        self.notices.push(outcome.verification.message());
        tracing::info!("Verification: {:?}", outcome.verification);

        Ok(format!("{}, {}", encrypted_path, decrypted_path))
    }
}
