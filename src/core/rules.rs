use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// 擷取規則。預設值為目前支援零售商的日文關鍵字與選擇器，
/// 換站或換語系時需重新整理這些清單。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    pub title_selectors: Vec<String>,

    pub currency_markers: Vec<String>,
    pub excluded_tags: Vec<String>,
    pub price_denylist: Vec<String>,
    pub salient_color: String,
    pub salient_class_token: String,
    pub salience_bonus: f64,

    pub stock_keywords: Vec<String>,
    pub stock_exclusions: Vec<String>,
    pub stock_max_chars: usize,
    pub stock_priorities: Vec<StockPriority>,
}

/// 在庫文字的優先順序：文字含任一 `phrases` 即得 `priority`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPriority {
    pub priority: u8,
    pub phrases: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            title_selectors: strings(&["h1", ".productName", "#products_maintitle"]),
            currency_markers: strings(&["円", "￥"]),
            excluded_tags: strings(&["script", "style"]),
            price_denylist: strings(&["ポイント", "希望", "還元"]),
            salient_color: "255, 0, 0".to_string(),
            salient_class_token: "red".to_string(),
            salience_bonus: 100.0,
            stock_keywords: strings(&["在庫", "取り寄せ", "入荷", "予定", "残少"]),
            stock_exclusions: strings(&["ポイント"]),
            stock_max_chars: 50,
            stock_priorities: vec![
                StockPriority {
                    priority: 3,
                    phrases: strings(&["在庫あり", "在庫残少"]),
                },
                StockPriority {
                    priority: 2,
                    phrases: strings(&["お取り寄せ"]),
                },
                StockPriority {
                    priority: 1,
                    phrases: strings(&["予定"]),
                },
            ],
        }
    }
}

impl ExtractionRules {
    /// 依表格順序取第一個符合的優先度，沒有符合則為 0
    pub fn stock_priority(&self, text: &str) -> u8 {
        self.stock_priorities
            .iter()
            .find(|entry| entry.phrases.iter().any(|p| text.contains(p.as_str())))
            .map(|entry| entry.priority)
            .unwrap_or(0)
    }
}

impl Validate for ExtractionRules {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_list("rules.title_selectors", &self.title_selectors)?;
        validation::validate_non_empty_list("rules.currency_markers", &self.currency_markers)?;
        validation::validate_non_empty_list("rules.stock_keywords", &self.stock_keywords)?;
        validation::validate_non_empty_string("rules.salient_color", &self.salient_color)?;
        validation::validate_positive_number("rules.stock_max_chars", self.stock_max_chars, 1)?;

        if !self.salience_bonus.is_finite() || self.salience_bonus < 0.0 {
            return Err(ScrapeError::InvalidConfigValue {
                field: "rules.salience_bonus".to_string(),
                value: self.salience_bonus.to_string(),
                reason: "Bonus must be a finite, non-negative number".to_string(),
            });
        }

        for entry in &self.stock_priorities {
            validation::validate_non_empty_list("rules.stock_priorities.phrases", &entry.phrases)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        assert!(ExtractionRules::default().validate().is_ok());
    }

    #[test]
    fn test_stock_priority_table() {
        let rules = ExtractionRules::default();
        assert_eq!(rules.stock_priority("在庫あり"), 3);
        assert_eq!(rules.stock_priority("在庫残少 ご注文はお早めに"), 3);
        assert_eq!(rules.stock_priority("お取り寄せ商品です"), 2);
        assert_eq!(rules.stock_priority("3月下旬入荷予定"), 1);
        assert_eq!(rules.stock_priority("在庫について"), 0);
    }

    #[test]
    fn test_rejects_negative_bonus() {
        let rules = ExtractionRules {
            salience_bonus: -1.0,
            ..ExtractionRules::default()
        };
        assert!(rules.validate().is_err());
    }
}
