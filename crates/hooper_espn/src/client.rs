use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    news::News,
    scores::Scoreboard,
};

/// Public NBA site API.
pub const DEFAULT_BASE_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba";

/// Provider calls that outlive this are treated as failures.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only client for the news and scoreboard endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Fetch the latest league news.
    pub async fn news(&self) -> Result<News> {
        self.get::<News>(&format!("{}/news", self.base_url)).await
    }

    /// Fetch the scoreboard for the given calendar date.
    pub async fn scoreboard(&self, date: NaiveDate) -> Result<Scoreboard> {
        let url = format!(
            "{}/scoreboard?dates={}",
            self.base_url,
            scoreboard_date(date)
        );

        self.get::<Scoreboard>(&url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        trace!(%url, "Fetching provider data.");
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body, "Unexpected provider response.");

            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        // Deserialize from the raw body so a shape mismatch surfaces as a
        // schema error rather than a generic request error.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Format a date the way the scoreboard endpoint expects: `YYYYMMDD`,
/// zero-padded, four-digit year.
fn scoreboard_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
