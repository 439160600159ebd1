use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotionApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. [{code}] {message}")]
    QueryError { status: u16, code: String, message: String },
    #[error("Page property '{0}' is missing or has the wrong type")]
    PropertyError(String),
    #[error("'{0}' is not a page id")]
    InvalidPageId(String),
}

impl NotionApiError {
    /// True if Notion reports that the page or database does not exist (or is not shared with the integration).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::QueryError { status: 404, .. })
    }
}
