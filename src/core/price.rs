use crate::core::rules::ExtractionRules;
use crate::domain::model::DomElement;
use crate::domain::ports::Dom;
use crate::utils::error::{Result, ScrapeError};
use regex::Regex;
use std::sync::LazyLock;

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d.]").unwrap());

/// 通過過濾、已計分的價格候選
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCandidate {
    pub digits: String,
    pub score: f64,
}

/// 掃描所有含貨幣符號的元素，回傳最醒目的價格數字
pub fn resolve_price(dom: &dyn Dom, rules: &ExtractionRules) -> Result<Option<String>> {
    let elements = dom.select_containing(&rules.currency_markers, &rules.excluded_tags)?;
    tracing::debug!(count = elements.len(), "price candidates discovered");
    Ok(select_price(&elements, rules))
}

pub fn select_price(elements: &[DomElement], rules: &ExtractionRules) -> Option<String> {
    let mut candidates: Vec<PriceCandidate> = elements
        .iter()
        .filter_map(|element| score_candidate(element, rules))
        .collect();

    // 穩定排序：同分時保留發現順序
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.into_iter().next().map(|best| {
        tracing::debug!(digits = %best.digits, score = best.score, "price selected");
        best.digits
    })
}

fn score_candidate(element: &DomElement, rules: &ExtractionRules) -> Option<PriceCandidate> {
    let text = element.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(word) = rules.price_denylist.iter().find(|w| text.contains(w.as_str())) {
        tracing::debug!(%text, %word, "price candidate rejected by denylist");
        return None;
    }

    let digits = extract_digits(text)?;
    let bonus = if is_salient(element, rules) {
        rules.salience_bonus
    } else {
        0.0
    };
    let score = bonus + font_size_px(element);

    tracing::debug!(%text, %digits, score, "price candidate scored");
    Some(PriceCandidate { digits, score })
}

/// 只保留十進位數字（全形數字轉為半形），去掉前導零；結果為空或為零時回傳 `None`
pub fn extract_digits(text: &str) -> Option<String> {
    let digits: String = text
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32),
            _ => None,
        })
        .collect();

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        None
    } else {
        Some(significant.to_string())
    }
}

fn is_salient(element: &DomElement, rules: &ExtractionRules) -> bool {
    let red_color = match element.color.as_deref() {
        Some(color) => color.contains(rules.salient_color.as_str()),
        None => {
            log_unreadable("color");
            false
        }
    };
    let red_class = element
        .class_attribute
        .as_deref()
        .is_some_and(|class| class.contains(rules.salient_class_token.as_str()));

    red_color || red_class
}

fn font_size_px(element: &DomElement) -> f64 {
    match element.font_size.as_deref() {
        Some(value) => parse_font_size(value),
        None => {
            log_unreadable("font-size");
            0.0
        }
    }
}

fn log_unreadable(property: &str) {
    let err = ScrapeError::StylePropertyUnreadable {
        property: property.to_string(),
    };
    tracing::debug!(error = %err, "using neutral default for price candidate");
}

/// `"24px"` → 24.0；無法解析時為 0
pub fn parse_font_size(value: &str) -> f64 {
    NON_NUMERIC
        .replace_all(value, "")
        .parse::<f64>()
        .ok()
        .filter(|size| size.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits("￥12,800").as_deref(), Some("12800"));
        assert_eq!(extract_digits("１２，８００円").as_deref(), Some("12800"));
        assert_eq!(extract_digits("007円").as_deref(), Some("7"));
        assert_eq!(extract_digits("0円"), None);
        assert_eq!(extract_digits("円"), None);
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("24px"), 24.0);
        assert_eq!(parse_font_size("13.5px"), 13.5);
        assert_eq!(parse_font_size("medium"), 0.0);
        assert_eq!(parse_font_size("1.2.3px"), 0.0);
    }

    #[test]
    fn test_no_candidates_yields_none() {
        assert_eq!(select_price(&[], &rules()), None);
    }

    #[test]
    fn test_red_large_price_wins() {
        let elements = vec![
            DomElement::new("span", "￥15,800")
                .with_color("rgb(51, 51, 51)")
                .with_font_size("14px"),
            DomElement::new("span", "￥12,800")
                .with_color("rgb(255, 0, 0)")
                .with_font_size("24px"),
        ];
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("12800"));
    }

    #[test]
    fn test_red_class_counts_as_salient() {
        let elements = vec![
            DomElement::new("span", "￥9,980").with_font_size("30px"),
            DomElement::new("span", "￥8,980")
                .with_class("productPrice red")
                .with_font_size("16px"),
        ];
        // 100 + 16 > 30
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("8980"));
    }

    #[test]
    fn test_denylisted_candidate_never_wins() {
        let elements = vec![
            DomElement::new("span", "1,280ポイント還元")
                .with_color("rgb(255, 0, 0)")
                .with_font_size("40px"),
            DomElement::new("span", "メーカー希望小売価格 ￥15,000")
                .with_color("rgb(255, 0, 0)")
                .with_font_size("40px"),
            DomElement::new("span", "￥12,800").with_font_size("12px"),
        ];
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("12800"));
    }

    #[test]
    fn test_equal_scores_keep_discovery_order() {
        let elements = vec![
            DomElement::new("span", "￥1,000").with_font_size("16px"),
            DomElement::new("span", "￥2,000").with_font_size("16px"),
        ];
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("1000"));
    }

    #[test]
    fn test_unreadable_styles_do_not_abort_scan() {
        let mut unreadable = DomElement::new("span", "￥5,000");
        unreadable.color = None;
        unreadable.font_size = None;
        let elements = vec![
            unreadable,
            DomElement::new("span", "￥4,000").with_font_size("1px"),
        ];
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("4000"));
    }

    #[test]
    fn test_unreadable_text_is_skipped() {
        let mut unreadable = DomElement::new("span", "");
        unreadable.text = None;
        let elements = vec![unreadable, DomElement::new("span", "￥300")];
        assert_eq!(select_price(&elements, &rules()).as_deref(), Some("300"));
    }
}
