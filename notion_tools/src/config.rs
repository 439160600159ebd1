use vp_common::Secret;

pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_API_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone, Default)]
pub struct NotionConfig {
    pub api_key: Secret<String>,
    pub database_id: String,
    pub api_url: String,
    pub api_version: String,
}

impl NotionConfig {
    pub fn new(api_key: &str, database_id: &str) -> Self {
        Self {
            api_key: Secret::new(api_key.to_string()),
            database_id: database_id.to_string(),
            api_url: DEFAULT_NOTION_API_URL.to_string(),
            api_version: DEFAULT_NOTION_API_VERSION.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }
}
