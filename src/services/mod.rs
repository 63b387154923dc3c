pub mod money;
pub mod product_service;

pub use product_service::ProductService;
