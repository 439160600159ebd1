use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use vp_common::helpers::is_page_id;

use crate::{
    config::NotionConfig,
    data_objects::{DatabaseQuery, Page, PageList},
    properties::Properties,
    NotionApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Notion caps `page_size` at 100.
const QUERY_PAGE_SIZE: u32 = 100;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct NotionApi {
    config: NotionConfig,
    client: Arc<Client>,
}

impl NotionApi {
    pub fn new(config: NotionConfig) -> Result<Self, NotionApiError> {
        if config.api_key.is_blank() {
            return Err(NotionApiError::Initialization("No Notion API key has been configured".to_string()));
        }
        let mut headers = HeaderMap::with_capacity(3);
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.reveal()))
            .map_err(|e| NotionApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        let version = HeaderValue::from_str(&config.api_version)
            .map_err(|e| NotionApiError::Initialization(e.to_string()))?;
        headers.insert("Notion-Version", version);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotionApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, NotionApiError> {
        let url = self.url(path);
        trace!("📒️ Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| NotionApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("📒️ REST query successful. {status}");
            response.json::<T>().await.map_err(|e| NotionApiError::JsonError(e.to_string()))
        } else {
            let text = response.text().await.map_err(|e| NotionApiError::RestResponseError(e.to_string()))?;
            let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => ("unknown".to_string(), text),
            };
            Err(NotionApiError::QueryError { status: status.as_u16(), code, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Adds a row to the configured database.
    pub async fn create_page(&self, properties: Properties) -> Result<Page, NotionApiError> {
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": properties,
        });
        debug!("📒️ Creating page in database {}", self.config.database_id);
        let page = self.rest_query::<Page, _>(Method::POST, "/pages", Some(body)).await?;
        info!("📒️ Created page {}", page.id);
        Ok(page)
    }

    /// Updates only the given properties. Properties that are not named are left untouched.
    pub async fn update_page_properties(&self, page_id: &str, properties: Properties) -> Result<Page, NotionApiError> {
        let path = page_path(page_id)?;
        let body = json!({ "properties": properties });
        debug!("📒️ Updating {} propert(ies) on page {page_id}", properties_len(&body));
        let page = self.rest_query::<Page, _>(Method::PATCH, &path, Some(body)).await?;
        debug!("📒️ Updated page {page_id}");
        Ok(page)
    }

    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionApiError> {
        let path = page_path(page_id)?;
        trace!("📒️ Retrieving page {page_id}");
        self.rest_query::<Page, ()>(Method::GET, &path, None).await
    }

    pub async fn query_database(&self, query: &DatabaseQuery) -> Result<PageList, NotionApiError> {
        let path = format!("/databases/{}/query", self.config.database_id);
        self.rest_query::<PageList, _>(Method::POST, &path, Some(query)).await
    }

    /// Runs `query` and follows `next_cursor` until every matching row has been fetched.
    pub async fn query_all(&self, query: DatabaseQuery) -> Result<Vec<Page>, NotionApiError> {
        let mut query = DatabaseQuery { page_size: Some(QUERY_PAGE_SIZE), ..query };
        let mut pages = vec![];
        loop {
            let result = self.query_database(&query).await?;
            pages.extend(result.results);
            match (result.has_more, result.next_cursor) {
                (true, Some(cursor)) => query.start_cursor = Some(cursor),
                _ => break,
            }
        }
        debug!("📒️ Query returned {} page(s)", pages.len());
        Ok(pages)
    }
}

fn page_path(page_id: &str) -> Result<String, NotionApiError> {
    if is_page_id(page_id) {
        Ok(format!("/pages/{page_id}"))
    } else {
        Err(NotionApiError::InvalidPageId(page_id.to_string()))
    }
}

fn properties_len(body: &serde_json::Value) -> usize {
    body["properties"].as_object().map(|p| p.len()).unwrap_or_default()
}
