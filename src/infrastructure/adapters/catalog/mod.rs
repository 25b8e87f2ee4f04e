//! Catalog Adapter - 远端音色目录客户端实现

mod rest_catalog_client;

pub use rest_catalog_client::{RestCatalogClient, RestCatalogClientConfig};
