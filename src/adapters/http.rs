use crate::adapters::html::HtmlDom;
use crate::domain::ports::{ConfigProvider, Dom, Renderer};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 以 HTTP 取得頁面原始碼，不執行 JavaScript
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.user_agent(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<Box<dyn Dom + Send + Sync>> {
        tracing::debug!("Fetching page: {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::rendering(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        tracing::debug!("Page response status: {}", status);
        if !status.is_success() {
            return Err(ScrapeError::rendering(format!(
                "{} answered with HTTP {}",
                url, status
            )));
        }

        let body = response.text().await?;
        tracing::debug!(bytes = body.len(), "page source received");
        Ok(Box::new(HtmlDom::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn renderer() -> HttpRenderer {
        HttpRenderer::new("price-scout-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_render_returns_queryable_dom() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/product/1");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html><body><h1>三脚</h1></body></html>");
        });

        let url = Url::parse(&server.url("/product/1")).unwrap();
        let dom = renderer().render(&url).await.unwrap();

        page_mock.assert();
        let title = dom.select_first("h1").unwrap().unwrap();
        assert_eq!(title.text.as_deref(), Some("三脚"));
    }

    #[tokio::test]
    async fn test_error_status_is_rendering_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone");
            then.status(404);
        });

        let url = Url::parse(&server.url("/gone")).unwrap();
        let err = renderer().render(&url).await.err().unwrap();
        assert!(matches!(err, ScrapeError::Rendering { .. }));
    }
}
