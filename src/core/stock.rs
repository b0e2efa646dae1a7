use crate::core::rules::ExtractionRules;
use crate::domain::model::DomElement;
use crate::domain::ports::Dom;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCandidate {
    pub text: String,
    pub priority: u8,
}

/// 掃描含在庫關鍵字的可見元素，回傳優先度最高的一行文字
pub fn resolve_stock(dom: &dyn Dom, rules: &ExtractionRules) -> Result<Option<String>> {
    let elements = dom.select_containing(&rules.stock_keywords, &[])?;
    tracing::debug!(count = elements.len(), "stock candidates discovered");
    Ok(select_stock(&elements, rules))
}

pub fn select_stock(elements: &[DomElement], rules: &ExtractionRules) -> Option<String> {
    elements
        .iter()
        .filter_map(|element| stock_candidate(element, rules))
        .fold(None, |best: Option<StockCandidate>, candidate| match best {
            // 只有嚴格較高的優先度才會取代，同分時先出現者勝出
            Some(current) if candidate.priority <= current.priority => Some(current),
            _ => Some(candidate),
        })
        .map(|best| {
            tracing::debug!(text = %best.text, priority = best.priority, "stock selected");
            best.text
        })
}

fn stock_candidate(element: &DomElement, rules: &ExtractionRules) -> Option<StockCandidate> {
    let (Some(visible), Some(text)) = (element.visible, element.text.as_deref()) else {
        tracing::debug!(tag = %element.tag, "stock candidate unreadable, skipped");
        return None;
    };
    if !visible {
        return None;
    }

    let text = normalize_line(text);
    if text.chars().count() > rules.stock_max_chars {
        tracing::debug!(%text, "stock candidate too long");
        return None;
    }
    if rules.stock_exclusions.iter().any(|w| text.contains(w.as_str())) {
        tracing::debug!(%text, "stock candidate rejected by exclusion list");
        return None;
    }

    let priority = rules.stock_priority(&text);
    Some(StockCandidate { text, priority })
}

/// 換行轉空白並去除前後空白
pub fn normalize_line(text: &str) -> String {
    text.trim().replace(['\r', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        ExtractionRules::default()
    }

    #[test]
    fn test_in_stock_beats_special_order() {
        let elements = vec![
            DomElement::new("span", "お取り寄せ商品です"),
            DomElement::new("span", "在庫あり"),
        ];
        assert_eq!(select_stock(&elements, &rules()).as_deref(), Some("在庫あり"));
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let elements = vec![
            DomElement::new("span", "在庫残少"),
            DomElement::new("span", "在庫あり"),
        ];
        assert_eq!(select_stock(&elements, &rules()).as_deref(), Some("在庫残少"));
    }

    #[test]
    fn test_unranked_keyword_match_is_kept_as_fallback() {
        let elements = vec![DomElement::new("span", "店舗在庫を確認する")];
        assert_eq!(
            select_stock(&elements, &rules()).as_deref(),
            Some("店舗在庫を確認する")
        );
    }

    #[test]
    fn test_long_text_is_excluded() {
        let long = "在庫".repeat(30);
        assert_eq!(long.chars().count(), 60);
        let elements = vec![DomElement::new("p", long)];
        assert_eq!(select_stock(&elements, &rules()), None);
    }

    #[test]
    fn test_newlines_are_collapsed_before_length_check() {
        let elements = vec![DomElement::new("div", "在庫あり\n翌日お届け")];
        assert_eq!(
            select_stock(&elements, &rules()).as_deref(),
            Some("在庫あり 翌日お届け")
        );
    }

    #[test]
    fn test_hidden_and_points_are_filtered() {
        let elements = vec![
            DomElement::new("span", "在庫あり").with_visibility(Some(false)),
            DomElement::new("span", "在庫ありでポイント10倍"),
            DomElement::new("span", "4月入荷予定"),
        ];
        assert_eq!(select_stock(&elements, &rules()).as_deref(), Some("4月入荷予定"));
    }

    #[test]
    fn test_unreadable_visibility_is_skipped() {
        let elements = vec![
            DomElement::new("span", "在庫あり").with_visibility(None),
            DomElement::new("span", "お取り寄せ"),
        ];
        assert_eq!(select_stock(&elements, &rules()).as_deref(), Some("お取り寄せ"));
    }
}
