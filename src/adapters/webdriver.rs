use crate::adapters::html::{HtmlDom, COLOR_ATTR, FONT_SIZE_ATTR, VISIBLE_ATTR};
use crate::domain::ports::{Dom, Renderer};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// 透過 WebDriver（chromedriver 等）渲染頁面。
///
/// 每次 `render` 建立一個新的 session，載入後等待 `settle`，把每個元素的
/// computed color / font-size / 可見性寫入 `data-rendered-*` 屬性，再取回原始碼。
pub struct WebDriverRenderer {
    endpoint: String,
    user_agent: String,
    headless: bool,
    settle: Duration,
}

impl WebDriverRenderer {
    pub fn new(endpoint: impl Into<String>, user_agent: impl Into<String>, headless: bool, settle: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
            headless,
            settle,
        }
    }

    async fn connect(&self) -> Result<Client> {
        let mut args = vec![
            json!("--disable-blink-features=AutomationControlled"),
            json!(format!("--user-agent={}", self.user_agent)),
        ];
        if self.headless {
            args.push(json!("--headless"));
            args.push(json!("--disable-gpu"));
        }

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.endpoint)
            .await
            .map_err(|e| ScrapeError::rendering(format!("WebDriver session failed: {}", e)))
    }

    async fn capture(&self, client: &Client, url: &Url) -> Result<String> {
        client
            .goto(url.as_str())
            .await
            .map_err(|e| ScrapeError::rendering(format!("navigation to {} failed: {}", url, e)))?;
        tokio::time::sleep(self.settle).await;

        client
            .execute(&stamp_script(), vec![])
            .await
            .map_err(|e| ScrapeError::rendering(format!("style capture failed: {}", e)))?;

        client
            .source()
            .await
            .map_err(|e| ScrapeError::rendering(format!("reading page source failed: {}", e)))
    }
}

fn stamp_script() -> String {
    format!(
        r#"
        for (const el of document.querySelectorAll('body, body *')) {{
            const style = window.getComputedStyle(el);
            const shown = el.getClientRects().length > 0 && style.visibility !== 'hidden';
            el.setAttribute('{color}', style.color);
            el.setAttribute('{font_size}', style.fontSize);
            el.setAttribute('{visible}', shown ? 'true' : 'false');
        }}
        "#,
        color = COLOR_ATTR,
        font_size = FONT_SIZE_ATTR,
        visible = VISIBLE_ATTR,
    )
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &Url) -> Result<Box<dyn Dom + Send + Sync>> {
        tracing::debug!(endpoint = %self.endpoint, "Opening WebDriver session for {}", url);
        let client = self.connect().await?;

        let captured = self.capture(&client, url).await;

        // session 一律關閉，即使擷取失敗
        if let Err(e) = client.close().await {
            tracing::warn!(error = %e, "WebDriver session did not close cleanly");
        }

        let source = captured?;
        tracing::debug!(bytes = source.len(), "rendered source captured");
        Ok(Box::new(HtmlDom::new(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_script_uses_dom_attributes() {
        let script = stamp_script();
        assert!(script.contains(COLOR_ATTR));
        assert!(script.contains(FONT_SIZE_ATTR));
        assert!(script.contains(VISIBLE_ATTR));
    }
}
