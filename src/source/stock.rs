use crate::config::StockConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Live stock feed
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Raw stock-list document for a size query
    async fn fetch_stock_document(&self, size_query: &str) -> Result<String, SourceError>;
}

/// Supplier portal over HTTP
pub struct HttpStockSource {
    client: Client,
    url: String,
    size_param: String,
}

impl HttpStockSource {
    pub fn new(config: &StockConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            size_param: config.size_param.clone(),
        })
    }
}

#[async_trait]
impl StockSource for HttpStockSource {
    async fn fetch_stock_document(&self, size_query: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[(self.size_param.as_str(), size_query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Saved stock document on disk; the size query is ignored
pub struct FileStockSource {
    path: PathBuf,
}

impl FileStockSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StockSource for FileStockSource {
    async fn fetch_stock_document(&self, _size_query: &str) -> Result<String, SourceError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
