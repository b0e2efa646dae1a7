pub mod engine;
pub mod extractor;
pub mod price;
pub mod rules;
pub mod stock;
pub mod title;

pub use crate::domain::model::{DomElement, ProductRecord};
pub use crate::domain::ports::{Dom, ProductStore, Renderer};
pub use crate::utils::error::Result;
