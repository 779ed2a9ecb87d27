//! Business logic services

pub mod catalog;
pub mod session;

pub use catalog::CatalogService;
pub use session::CatalogSession;
