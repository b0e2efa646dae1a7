use crate::core::rules::ExtractionRules;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub renderer: RendererConfig,
    pub storage: StorageConfig,
    pub rules: ExtractionRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Http,
    Webdriver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub webdriver_url: String,
    pub headless: bool,
    /// 載入完成後額外等待的毫秒數，讓腳本渲染價格
    pub settle_millis: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Http,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            settle_millis: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "my_app.db".to_string(),
        }
    }
}

impl ScoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 指定檔案存在時載入，否則使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${DB_PATH})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.database_path", &self.storage.database_path)?;
        validation::validate_non_empty_string("renderer.user_agent", &self.renderer.user_agent)?;
        validation::validate_range("renderer.timeout_seconds", self.renderer.timeout_seconds, 1, 600)?;
        validation::validate_range("renderer.settle_millis", self.renderer.settle_millis, 0, 60_000)?;

        if self.renderer.kind == RendererKind::Webdriver {
            validation::validate_url("renderer.webdriver_url", &self.renderer.webdriver_url)?;
            if !cfg!(feature = "webdriver") {
                return Err(ScrapeError::InvalidConfigValue {
                    field: "renderer.kind".to_string(),
                    value: "webdriver".to_string(),
                    reason: "This build was compiled without the `webdriver` feature".to_string(),
                });
            }
        }

        self.rules.validate()
    }
}

impl ConfigProvider for ScoutConfig {
    fn database_path(&self) -> &str {
        &self.storage.database_path
    }

    fn user_agent(&self) -> &str {
        &self.renderer.user_agent
    }

    fn timeout_seconds(&self) -> u64 {
        self.renderer.timeout_seconds
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ScoutConfig::from_toml_str("").unwrap();
        assert_eq!(config.renderer.kind, RendererKind::Http);
        assert_eq!(config.storage.database_path, "my_app.db");
        assert_eq!(config.rules, ExtractionRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_overrides() {
        let toml_content = r##"
[renderer]
timeout_seconds = 10
user_agent = "price-scout/0.1"

[storage]
database_path = "./prices.db"

[rules]
title_selectors = ["#title", "h1"]
stock_max_chars = 40

[[rules.stock_priorities]]
priority = 3
phrases = ["在庫あり"]
"##;

        let config = ScoutConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.renderer.timeout_seconds, 10);
        assert_eq!(config.user_agent(), "price-scout/0.1");
        assert_eq!(config.database_path(), "./prices.db");
        assert_eq!(config.rules.title_selectors, vec!["#title", "h1"]);
        assert_eq!(config.rules.stock_max_chars, 40);
        assert_eq!(config.rules.stock_priorities.len(), 1);
        // 未覆寫的規則保留預設
        assert_eq!(config.rules.price_denylist, ExtractionRules::default().price_denylist);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRICE_SCOUT_TEST_DB", "/tmp/scout-test.db");

        let toml_content = r#"
[storage]
database_path = "${PRICE_SCOUT_TEST_DB}"
"#;

        let config = ScoutConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.database_path, "/tmp/scout-test.db");

        std::env::remove_var("PRICE_SCOUT_TEST_DB");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[renderer]
timeout_seconds = 0
"#;

        let config = ScoutConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = ScoutConfig::from_toml_str("[rules]\ntitle_selectors = []\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ScoutConfig::from_toml_str("[renderer\nkind = 1").unwrap_err();
        assert!(matches!(err, ScrapeError::Config { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndatabase_path = \"file-test.db\"\n")
            .unwrap();

        let config = ScoutConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.database_path, "file-test.db");
    }
}
