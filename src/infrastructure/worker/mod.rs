//! Background Workers

mod catalog_refresher;

pub use catalog_refresher::{CatalogRefresher, CatalogRefresherConfig};
