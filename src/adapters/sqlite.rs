use crate::domain::model::HistoryEntry;
use crate::domain::ports::ProductStore;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;

const CREATE_PRODUCTS_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        price TEXT,
        date TIMESTAMP DEFAULT (DATETIME('now', 'localtime'))
    )
"#;

/// 以 SQLite 保存成功擷取的商品，只新增不修改
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 開啟（必要時建立）資料庫檔案並確保資料表存在
    pub async fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        tracing::debug!(path = %path.as_ref().display(), "product database ready");
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_PRODUCTS_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl ProductStore for SqliteStore {
    async fn append(&self, title: &str, price: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO products (title, price) VALUES (?, ?)")
            .bind(title)
            .bind(price)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, %title, %price, "product row appended");
        Ok(id)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query("SELECT id, title, price, date FROM products ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(HistoryEntry {
                id: row.try_get("id")?,
                title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
                price: row.try_get::<Option<String>, _>("price")?.unwrap_or_default(),
                saved_at: row.try_get::<NaiveDateTime, _>("date")?,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ScrapeError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_and_history_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(dir.path().join("products.db")).await.unwrap();

        let first = store.append("一眼レフ", "128000").await.unwrap();
        let second = store.append("交換レンズ", "price-unknown").await.unwrap();
        assert!(second > first);

        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[0].title, "交換レンズ");
        assert_eq!(history[0].price, "price-unknown");
        assert_eq!(history[1].title, "一眼レフ");
        assert_eq!(history[1].price, "128000");

        store.close().await;
    }

    #[tokio::test]
    async fn test_reopening_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.db");

        let store = SqliteStore::connect(&path).await.unwrap();
        store.append("三脚", "9800").await.unwrap();
        store.close().await;

        let reopened = SqliteStore::connect(&path).await.unwrap();
        let history = reopened.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, "9800");
    }

    #[tokio::test]
    async fn test_close_shuts_down_shared_pool() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(dir.path().join("shared.db")).await.unwrap();
        let engine_handle = store.clone();
        engine_handle.append("ストロボ", "15800").await.unwrap();

        store.close().await;

        let err = engine_handle.history().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Storage(_)));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::connect(dir.path().join("empty.db")).await.unwrap();
        assert!(store.history().await.unwrap().is_empty());
    }
}
