use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const TITLE_UNKNOWN: &str = "title-unknown";
pub const PRICE_UNKNOWN: &str = "price-unknown";
pub const STOCK_UNKNOWN: &str = "stock-unknown";

/// 渲染端提供的唯讀元素快照。
///
/// 每個屬性各自可能讀取失敗，`None` 代表該屬性無法讀取，
/// 由各解析器自行決定預設值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomElement {
    pub tag: String,
    pub text: Option<String>,
    pub visible: Option<bool>,
    pub color: Option<String>,
    pub font_size: Option<String>,
    pub class_attribute: Option<String>,
}

impl DomElement {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: Some(text.into().trim().to_string()),
            visible: Some(true),
            color: None,
            font_size: None,
            class_attribute: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_font_size(mut self, font_size: impl Into<String>) -> Self {
        self.font_size = Some(font_size.into());
        self
    }

    pub fn with_class(mut self, class_attribute: impl Into<String>) -> Self {
        self.class_attribute = Some(class_attribute.into());
        self
    }

    pub fn with_visibility(mut self, visible: Option<bool>) -> Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// 單次擷取的結果，建立後不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: String,
    pub stock_text: String,
    pub outcome: Outcome,
}

impl ProductRecord {
    pub fn from_fields(title: Option<String>, price: Option<String>, stock: Option<String>) -> Self {
        let outcome = if title.is_some() {
            Outcome::Success
        } else {
            Outcome::Failure
        };

        Self {
            title: title.unwrap_or_else(|| TITLE_UNKNOWN.to_string()),
            price: price.unwrap_or_else(|| PRICE_UNKNOWN.to_string()),
            stock_text: stock.unwrap_or_else(|| STOCK_UNKNOWN.to_string()),
            outcome,
        }
    }

    /// 渲染失敗等致命錯誤時使用的全預設值紀錄
    pub fn failed() -> Self {
        Self::from_fields(None, None, None)
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn summary(&self) -> String {
        match self.outcome {
            Outcome::Success => {
                let short_title: String = self.title.chars().take(10).collect();
                format!("[OK] {}... | {}円 | {}", short_title, self.price, self.stock_text)
            }
            Outcome::Failure => crate::utils::error::RETRY_MESSAGE.to_string(),
        }
    }
}

/// 已儲存的一筆歷史紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub saved_at: NaiveDateTime,
}
