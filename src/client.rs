use reqwest::Method;
use tracing::{debug, instrument, warn};

use crate::api;
use crate::config::GuideConfig;
use crate::error::{GuideError, Result};
use crate::model::*;

/// Typed client for the tournament REST backend.
///
/// `GuideClient` wraps a [`reqwest::Client`] and a base URL. Every record
/// type implementing [`Resource`] can be listed, fetched, created, updated and
/// deleted through the generic methods; the `get_*` helpers cover the lists
/// the public pages need.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> tournament_guide::Result<()> {
/// use tournament_guide::GuideClient;
///
/// let client = GuideClient::new("https://guide.example.org/api");
/// let stadiums = client.get_stadiums().await?;
/// println!("Found {} stadiums", stadiums.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GuideClient {
    http: reqwest::Client,
    base_url: String,
}

impl GuideClient {
    /// Create a client with default HTTP settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            http: client,
            base_url,
        }
    }

    /// Build a client from configuration, applying its timeout.
    pub fn from_config(config: &GuideConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GuideError::ClientBuild)?;
        Ok(Self::with_client(http, config.base_url.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}/{}", self.base_url, R::COLLECTION)
    }

    fn record_url<R: Resource>(&self, id: &RecordId) -> String {
        format!("{}/{}/{}", self.base_url, R::COLLECTION, id)
    }

    /// Fetch a whole collection.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        let records: Vec<R> = api::get_json(&self.http, &self.collection_url::<R>()).await?;
        debug!(count = records.len(), "fetched collection");
        Ok(records)
    }

    /// Fetch one record by id.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn get<R: Resource>(&self, id: &RecordId) -> Result<R> {
        api::get_json(&self.http, &self.record_url::<R>(id)).await
    }

    /// Create a record; returns the record as stored by the backend.
    #[instrument(skip(self, record), fields(collection = R::COLLECTION))]
    pub async fn create<R: Resource>(&self, record: &R) -> Result<R> {
        api::send_json(&self.http, Method::POST, &self.collection_url::<R>(), record).await
    }

    /// Replace a record; returns the record as stored by the backend.
    #[instrument(skip(self, record), fields(collection = R::COLLECTION, id = %record.id()))]
    pub async fn update<R: Resource>(&self, record: &R) -> Result<R> {
        api::send_json(&self.http, Method::PUT, &self.record_url::<R>(record.id()), record).await
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn delete<R: Resource>(&self, id: &RecordId) -> Result<()> {
        api::delete(&self.http, &self.record_url::<R>(id)).await
    }

    pub async fn get_teams(&self) -> Result<Vec<Team>> {
        self.list().await
    }

    pub async fn get_stadiums(&self) -> Result<Vec<Stadium>> {
        self.list().await
    }

    /// Fetch all matches. Group-stage matches missing their group label are
    /// kept but reported.
    pub async fn get_matches(&self) -> Result<Vec<Match>> {
        let matches: Vec<Match> = self.list().await?;
        let inconsistent = matches.iter().filter(|m| !m.is_consistent()).count();
        if inconsistent > 0 {
            warn!(inconsistent, "group-stage matches without a group label");
        }
        Ok(matches)
    }

    pub async fn get_hotels(&self) -> Result<Vec<Hotel>> {
        self.list().await
    }

    pub async fn get_restaurants(&self) -> Result<Vec<Restaurant>> {
        self.list().await
    }
}
