// Adapters layer: concrete implementations of the rendering and persistence ports.

pub mod html;
pub mod http;
pub mod sqlite;
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use html::HtmlDom;
pub use http::HttpRenderer;
pub use sqlite::SqliteStore;
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverRenderer;
