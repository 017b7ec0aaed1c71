//! Directory lookup client, paced by a governor rate limiter.

use super::{ClientError, NameDirectory, check_status, send};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

type Pacer = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(default, alias = "displayName", alias = "display_name")]
    name: Option<String>,
}

/// Looks people up with `GET {base}/people?email=...`.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    pacer: Option<Pacer>,
}

impl DirectoryClient {
    /// `lookup_delay_ms` is the minimum gap between two lookups; 0 disables pacing.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
        lookup_delay_ms: u64,
    ) -> Self {
        let pacer = Quota::with_period(Duration::from_millis(lookup_delay_ms))
            .map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self {
            http,
            base_url: base_url.into(),
            token,
            pacer,
        }
    }
}

#[async_trait]
impl NameDirectory for DirectoryClient {
    async fn lookup_name(&self, email: &str) -> Result<Option<String>, ClientError> {
        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }

        let url = format!("{}/people", self.base_url.trim_end_matches('/'));
        let mut req = self.http.get(&url).query(&[("email", email)]);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = send(req, &self.base_url).await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let person: Person = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        Ok(person
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()))
    }
}
