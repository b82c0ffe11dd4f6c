pub mod config;
pub mod error;
pub mod pagination;

pub use config::HelpdeskConfig;
pub use error::ConfigError;
pub use pagination::{parse_link_header, Pagination};
