use crate::domain::ports::Dom;
use crate::utils::error::ScrapeError;

/// 依序嘗試選擇器，回傳第一個有內容的標題。
///
/// 每個選擇器只看第一個符合的元素；查無元素或查詢失敗都視為空結果，繼續下一個。
pub fn resolve_title(dom: &dyn Dom, selectors: &[String]) -> Option<String> {
    for selector in selectors {
        match dom.select_first(selector) {
            Ok(Some(element)) => {
                let text = element.text.as_deref().map(str::trim).unwrap_or_default();
                if !text.is_empty() {
                    tracing::debug!(%selector, "title resolved");
                    return Some(text.to_string());
                }
                tracing::debug!(%selector, "title selector matched an empty element");
            }
            Ok(None) => {
                let err = ScrapeError::ElementNotFound {
                    query: selector.clone(),
                };
                tracing::debug!(error = %err, "trying next title selector");
            }
            Err(e) => tracing::warn!(%selector, error = %e, "title selector failed, trying next"),
        }
    }
    None
}
