use crate::domain::model::{DomElement, HistoryEntry};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

/// 已渲染頁面的查詢介面。查無元素是正常結果（`Ok(None)` 或空集合），不是錯誤。
pub trait Dom {
    fn select_first(&self, selector: &str) -> Result<Option<DomElement>>;

    /// 自身文字節點含有任一 `needles` 的元素，依文件順序，跳過 `excluded_tags`
    fn select_containing(&self, needles: &[String], excluded_tags: &[String]) -> Result<Vec<DomElement>>;
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// 載入頁面並等待完成，回傳可查詢的 DOM
    async fn render(&self, url: &Url) -> Result<Box<dyn Dom + Send + Sync>>;
}

#[async_trait]
impl<T: Renderer + ?Sized> Renderer for Box<T> {
    async fn render(&self, url: &Url) -> Result<Box<dyn Dom + Send + Sync>> {
        (**self).render(url).await
    }
}

pub trait ProductStore: Send + Sync {
    fn append(
        &self,
        title: &str,
        price: &str,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    /// 依新到舊排序
    fn history(&self) -> impl std::future::Future<Output = Result<Vec<HistoryEntry>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn database_path(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}
