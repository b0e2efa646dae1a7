use thiserror::Error;

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Rendering,
    Extraction,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("No element matched query: {query}")]
    ElementNotFound { query: String },

    #[error("Style property '{property}' could not be read")]
    StylePropertyUnreadable { property: String },

    #[error("Rendering failed: {message}")]
    Rendering { message: String },

    #[error("No URL was supplied")]
    EmptyInput,

    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfig { field: String },
}

impl ScrapeError {
    pub fn rendering(message: impl Into<String>) -> Self {
        ScrapeError::Rendering {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::EmptyInput | ScrapeError::InvalidUrl { .. } => ErrorCategory::Input,
            ScrapeError::Rendering { .. } | ScrapeError::Http(_) => ErrorCategory::Rendering,
            ScrapeError::ElementNotFound { .. }
            | ScrapeError::StylePropertyUnreadable { .. }
            | ScrapeError::InvalidSelector { .. } => ErrorCategory::Extraction,
            ScrapeError::Storage(_)
            | ScrapeError::Io(_)
            | ScrapeError::Serialization(_)
            | ScrapeError::Csv(_) => ErrorCategory::Storage,
            ScrapeError::Config { .. }
            | ScrapeError::InvalidConfigValue { .. }
            | ScrapeError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Extraction => ErrorSeverity::Low,
            ErrorCategory::Input | ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ScrapeError::InvalidUrl { value, .. } => format!("'{}' is not a usable product URL", value),
            ScrapeError::EmptyInput | ScrapeError::Rendering { .. } | ScrapeError::Http(_) => {
                RETRY_MESSAGE.to_string()
            }
            ScrapeError::Storage(_) => "Could not access the product database".to_string(),
            ScrapeError::Config { .. }
            | ScrapeError::InvalidConfigValue { .. }
            | ScrapeError::MissingConfig { .. } => format!("Configuration problem: {}", self),
            _ => RETRY_MESSAGE.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Pass a full http(s) product page URL",
            ErrorCategory::Rendering => {
                "Check the network connection or WebDriver endpoint, then try again"
            }
            ErrorCategory::Extraction => "The page layout may have changed; check the [rules] section",
            ErrorCategory::Storage => "Check that the database path is writable",
            ErrorCategory::Configuration => "Fix the configuration file and rerun",
        }
    }
}

/// 渲染或輸入失敗時顯示的通用重試訊息
pub const RETRY_MESSAGE: &str = "Extraction failed: please try again";

impl From<toml::de::Error> for ScrapeError {
    fn from(e: toml::de::Error) -> Self {
        ScrapeError::Config {
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
