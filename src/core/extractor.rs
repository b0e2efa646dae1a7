use crate::core::price::resolve_price;
use crate::core::rules::ExtractionRules;
use crate::core::stock::resolve_stock;
use crate::core::title::resolve_title;
use crate::domain::model::ProductRecord;
use crate::domain::ports::Dom;
use crate::utils::error::Result;

/// 對單一 DOM 快照執行三個解析器並組出 `ProductRecord`。
///
/// 不做導覽、等待或重試，也不保留跨呼叫的狀態。
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    rules: ExtractionRules,
}

impl Extractor {
    pub fn new(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    pub fn extract(&self, dom: &dyn Dom) -> Result<ProductRecord> {
        let title = resolve_title(dom, &self.rules.title_selectors);
        let price = resolve_price(dom, &self.rules)?;
        let stock = resolve_stock(dom, &self.rules)?;

        let record = ProductRecord::from_fields(title, price, stock);
        tracing::info!(
            title = %record.title,
            price = %record.price,
            stock = %record.stock_text,
            outcome = ?record.outcome,
            "extraction finished"
        );
        Ok(record)
    }
}
