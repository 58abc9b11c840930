use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, info, warn};

use crate::notion::model::{DatabaseObject, QueryDatabaseResp, SearchResp};
use crate::schema::PropertySchema;

pub mod model;

const NOTION_API_BASE: &str = "https://api.notion.com/";

#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
    version: String,
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Administrative operations the subcommands need. Kept as a trait so the
/// command layer can be exercised against a recording double.
#[async_trait]
pub trait NotionAdmin: Send + Sync {
    async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        schema: &PropertySchema,
    ) -> Result<DatabaseObject>;

    async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseObject>;

    async fn archive_database(&self, database_id: &str) -> Result<()>;

    async fn clear_database(&self, database_id: &str) -> Result<usize>;

    async fn search_databases(&self) -> Result<Vec<DatabaseObject>>;
}

impl NotionClient {
    pub fn new(token: String, version: String) -> Self {
        let base_url = Url::parse(NOTION_API_BASE).expect("valid default Notion URL");
        Self::with_base_url(token, version, base_url)
    }

    pub fn with_base_url(token: String, version: String, base_url: Url) -> Self {
        let http = Client::builder()
            .user_agent("notion-dbctl/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            token,
            version,
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .context("invalid Notion base URL")?;
        Ok(self
            .http
            .request(method, endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", &self.version)
            .header("Content-Type", "application/json"))
    }

    async fn execute(&self, builder: RequestBuilder, body: &Value) -> Result<String> {
        let request = builder.json(body).build().context("failed to build Notion request")?;
        debug!(method=%request.method(), url=%request.url(), "notion request");
        debug!(
            "request payload: {}",
            serde_json::to_string(body).unwrap_or_else(|_| format!("{:?}", body))
        );

        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach Notion")?;

        let status = res.status();
        debug!(%status, "notion response");
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = res.text().await.unwrap_or_default();
            warn!("rate limited by Notion: {}", body);
            return Err(anyhow!("received 429 from Notion: {}", body));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("Notion API error - status: {}, body: {}", status, body);
            return Err(anyhow!("notion error {}: {}", status, body));
        }

        res.text().await.context("failed to read Notion response")
    }

    async fn post(&self, path: &str, body: &Value) -> Result<String> {
        self.execute(self.request(Method::POST, path)?, body).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<String> {
        self.execute(self.request(Method::PATCH, path)?, body).await
    }

    async fn get(&self, path: &str) -> Result<String> {
        let request = self
            .request(Method::GET, path)?
            .build()
            .context("failed to build Notion request")?;
        debug!(url=%request.url(), "notion request");
        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach Notion")?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("notion error {}: {}", status, body));
        }
        res.text().await.context("failed to read Notion response")
    }

    /// Archive every page in a database, following query pagination.
    /// Returns the number of pages archived.
    async fn clear_database_pages(&self, database_id: &str) -> Result<usize> {
        let mut archived = 0usize;
        let mut cursor: Option<String> = None;
        loop {
            let body = match &cursor {
                Some(c) => json!({ "start_cursor": c }),
                None => json!({}),
            };
            let raw = self
                .post(&format!("v1/databases/{}/query", database_id), &body)
                .await
                .context("failed to query database pages")?;
            let page: QueryDatabaseResp =
                serde_json::from_str(&raw).context("invalid Notion query response JSON")?;
            info!(
                "found {} pages to archive in database {}",
                page.results.len(),
                database_id
            );
            for page_ref in &page.results {
                self.patch(&format!("v1/pages/{}", page_ref.id), &json!({ "archived": true }))
                    .await
                    .with_context(|| format!("failed to archive page {}", page_ref.id))?;
                debug!("archived page {}", page_ref.id);
                archived += 1;
            }
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }
        Ok(archived)
    }
}

#[async_trait]
impl NotionAdmin for NotionClient {
    async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        schema: &PropertySchema,
    ) -> Result<DatabaseObject> {
        let body = build_create_database_request(parent_page_id, title, schema);
        let raw = self.post("v1/databases", &body).await?;
        let db: DatabaseObject =
            serde_json::from_str(&raw).context("invalid Notion response JSON")?;
        info!(
            "database '{}' created under page {} with id {}",
            title, parent_page_id, db.id
        );
        Ok(db)
    }

    async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseObject> {
        let raw = self.get(&format!("v1/databases/{}", database_id)).await?;
        serde_json::from_str(&raw).context("invalid Notion response JSON")
    }

    async fn archive_database(&self, database_id: &str) -> Result<()> {
        // Notion has no hard delete for databases; archiving removes them
        // from view.
        self.patch(&format!("v1/databases/{}", database_id), &json!({ "archived": true }))
            .await?;
        info!("database {} archived", database_id);
        Ok(())
    }

    async fn clear_database(&self, database_id: &str) -> Result<usize> {
        let archived = self.clear_database_pages(database_id).await?;
        info!("archived {} pages in database {}", archived, database_id);
        Ok(archived)
    }

    async fn search_databases(&self) -> Result<Vec<DatabaseObject>> {
        let body = json!({ "filter": { "value": "database", "property": "object" } });
        let raw = self.post("v1/search", &body).await?;
        let resp: SearchResp =
            serde_json::from_str(&raw).context("invalid Notion search response JSON")?;
        Ok(resp.results)
    }
}

/// Body for `POST /v1/databases`.
pub fn build_create_database_request(
    parent_page_id: &str,
    title: &str,
    schema: &PropertySchema,
) -> Value {
    json!({
        "parent": { "type": "page_id", "page_id": parent_page_id },
        "title": [
            {
                "type": "text",
                "text": { "content": title }
            }
        ],
        "properties": Value::Object(schema.to_notion_properties()),
    })
}
