use crate::core::tree;
use crate::domain::model::ShiftScope;
use crate::utils::error::{KitError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "smallkit.toml";
pub const OUTPUT_FORMATS: [&str; 2] = ["txt", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    pub base_dir: Option<String>,
    pub cipher: CipherConfig,
    pub climate: ClimateConfig,
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub input_file: String,
    pub encrypted_file: String,
    pub decrypted_file: String,
    pub scope: ShiftScope,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            input_file: "raw_text.txt".to_string(),
            encrypted_file: "encrypted_text.txt".to_string(),
            decrypted_file: "decrypted_text.txt".to_string(),
            scope: ShiftScope::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub data_dir: String,
    pub output_dir: String,
    pub output_formats: Vec<String>,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            data_dir: "temperature_data".to_string(),
            output_dir: ".".to_string(),
            output_formats: vec!["txt".to_string()],
        }
    }
}

impl ClimateConfig {
    pub fn wants_format(&self, format: &str) -> bool {
        self.output_formats.iter().any(|f| f == format)
    }
}

/// 樹的參數；未設定者在執行時詢問。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub output_file: String,
    pub angle_left: Option<f64>,
    pub angle_right: Option<f64>,
    pub start_length: Option<f64>,
    pub depth: Option<u32>,
    pub reduction_factor: Option<f64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            output_file: "fractal_tree.svg".to_string(),
            angle_left: None,
            angle_right: None,
            start_length: None,
            depth: None,
            reduction_factor: None,
        }
    }
}

impl KitConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 指定路徑時必須存在；未指定時嘗試預設檔，不存在就用預設值。
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Using {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        let config = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未定義者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| KitError::ProcessingError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_dir(&self) -> &str {
        self.base_dir.as_deref().unwrap_or(".")
    }
}

impl Validate for KitConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("base_dir", self.base_dir())?;

        let names = [
            ("cipher.input_file", &self.cipher.input_file),
            ("cipher.encrypted_file", &self.cipher.encrypted_file),
            ("cipher.decrypted_file", &self.cipher.decrypted_file),
            ("climate.data_dir", &self.climate.data_dir),
            ("climate.output_dir", &self.climate.output_dir),
            ("tree.output_file", &self.tree.output_file),
        ];
        for (field, value) in names {
            validation::validate_non_empty_string(field, value)?;
            validation::validate_path(field, value)?;
        }

        if self.climate.output_formats.is_empty() {
            return Err(KitError::ConfigValidationError {
                field: "climate.output_formats".to_string(),
                message: "at least one output format is required".to_string(),
            });
        }
        validation::validate_choices(
            "climate.output_formats",
            &self.climate.output_formats,
            &OUTPUT_FORMATS,
        )?;

        if let Some(angle) = self.tree.angle_left {
            let (min, max) = tree::ANGLE_RANGE;
            validation::validate_range("tree.angle_left", angle, min, max)?;
        }
        if let Some(angle) = self.tree.angle_right {
            let (min, max) = tree::ANGLE_RANGE;
            validation::validate_range("tree.angle_right", angle, min, max)?;
        }
        if let Some(length) = self.tree.start_length {
            validation::validate_min("tree.start_length", length, tree::MIN_START_LENGTH)?;
        }
        if let Some(depth) = self.tree.depth {
            let (min, max) = tree::DEPTH_RANGE;
            validation::validate_range("tree.depth", depth, min, max)?;
        }
        if let Some(factor) = self.tree.reduction_factor {
            let (min, max) = tree::REDUCTION_RANGE;
            validation::validate_range("tree.reduction_factor", factor, min, max)?;
        }

        Ok(())
    }
}
