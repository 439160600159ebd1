mod api;
mod config;
mod error;

mod data_objects;
pub mod properties;

pub use api::NotionApi;
pub use config::NotionConfig;
pub use data_objects::{DatabaseQuery, Page, PageList};
pub use error::NotionApiError;
