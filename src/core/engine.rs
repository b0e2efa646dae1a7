use crate::core::extractor::Extractor;
use crate::domain::model::ProductRecord;
use crate::domain::ports::{ProductStore, Renderer};
use crate::utils::error::Result;
use crate::utils::validation::parse_product_url;

/// 一次擷取的結果與儲存狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    pub record: ProductRecord,
    /// 只有成功的紀錄會被寫入
    pub stored_id: Option<i64>,
}

/// 驗證輸入 → 渲染 → 擷取 → 儲存
pub struct ScrapeEngine<R: Renderer, S: ProductStore> {
    renderer: R,
    store: S,
    extractor: Extractor,
}

impl<R: Renderer, S: ProductStore> ScrapeEngine<R, S> {
    pub fn new(renderer: R, store: S, extractor: Extractor) -> Self {
        Self {
            renderer,
            store,
            extractor,
        }
    }

    pub async fn run(&self, url: &str) -> Result<ScrapeReport> {
        let url = parse_product_url(url)?;
        tracing::info!("🚀 Scraping {}", url);

        let dom = self.renderer.render(&url).await?;
        tracing::info!("📄 Page rendered, extracting fields");

        let record = self.extractor.extract(&*dom)?;
        drop(dom);

        let stored_id = if record.is_success() {
            let id = self.store.append(&record.title, &record.price).await?;
            tracing::info!("💾 Saved product row {}", id);
            Some(id)
        } else {
            tracing::warn!("Title could not be resolved; nothing saved");
            None
        };

        Ok(ScrapeReport { record, stored_id })
    }

    /// 呼叫端契約：永遠回傳紀錄，失敗時為全預設值的 `Failure` 紀錄
    pub async fn extract(&self, url: &str) -> ProductRecord {
        match self.run(url).await {
            Ok(report) => report.record,
            Err(e) => {
                tracing::error!(
                    "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                ProductRecord::failed()
            }
        }
    }
}
