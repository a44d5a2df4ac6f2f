use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use super::{
    models::{MatchResponse, PlayersResponse},
    retry::{inspect_rate_limit, reset_hint, RequestCounter, RetryPolicy},
    ApiError, StatsApi,
};

const JSON_API: &str = "application/vnd.api+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the PUBG stats API
pub struct PubgClient {
    http: Client,
    base_url: String,
    api_key: String,
    policy: RetryPolicy,
    counter: RequestCounter,
}

impl PubgClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        policy: RetryPolicy,
        counter: RequestCounter,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            policy,
            counter,
        })
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// 429 responses wait out the advertised reset and retry without using an
    /// attempt. 404 is returned immediately. Anything else is retried with
    /// linear backoff until the policy's attempts are spent.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, ApiError> {
        let attempts = self.policy.attempts();
        let mut attempt: u32 = 0;

        loop {
            self.counter.increment();

            let last_error = match self
                .http
                .get(url)
                .query(query)
                .bearer_auth(&self.api_key)
                .header(ACCEPT, JSON_API)
                .send()
                .await
            {
                Ok(response) => {
                    inspect_rate_limit(response.headers());
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let wait = self
                            .policy
                            .rate_limit_wait(reset_hint(response.headers()), Utc::now().timestamp());
                        warn!(context, wait_secs = wait.as_secs(), "Rate limited, waiting for reset");
                        sleep(wait).await;
                        continue;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(ApiError::NotFound(context.to_string()));
                    }

                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| ApiError::Decode {
                            context: context.to_string(),
                            reason: e.to_string(),
                        });
                    }

                    format!("HTTP {status}")
                }
                Err(e) => e.to_string(),
            };

            if attempt + 1 >= attempts {
                error!(context, attempts, error = %last_error, "Request failed, giving up");
                return Err(ApiError::RetriesExhausted {
                    context: context.to_string(),
                    attempts,
                    last_error,
                });
            }

            let wait = self.policy.backoff(attempt);
            warn!(
                context,
                attempt = attempt + 1,
                attempts,
                wait_secs = wait.as_secs_f64(),
                error = %last_error,
                "Request failed, retrying"
            );
            sleep(wait).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl StatsApi for PubgClient {
    #[instrument(skip(self))]
    async fn resolve_latest_match_id(
        &self,
        player_name: &str,
        platform: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/{}/players", self.base_url, platform);
        let context = format!("player '{player_name}'");

        let response: PlayersResponse = match self
            .get_json(&url, &[("filter[playerNames]", player_name)], &context)
            .await
        {
            Ok(response) => response,
            Err(ApiError::NotFound(_)) => {
                return Err(ApiError::PlayerNotFound(player_name.to_string()))
            }
            Err(e) => return Err(e),
        };

        let player = response
            .data
            .first()
            .ok_or_else(|| ApiError::PlayerNotFound(player_name.to_string()))?;

        let match_id = player
            .latest_match_id()
            .ok_or_else(|| ApiError::NoMatches(player_name.to_string()))?;

        info!(
            player = %player.attributes.name,
            account_id = %player.id,
            match_id = %match_id,
            "Resolved latest match"
        );
        Ok(match_id.to_string())
    }

    #[instrument(skip(self))]
    async fn fetch_match_detail(
        &self,
        match_id: &str,
        platform: &str,
    ) -> Result<MatchResponse, ApiError> {
        let url = format!("{}/{}/matches/{}", self.base_url, platform, match_id);
        let context = format!("match {}", short_id(match_id));

        let response: MatchResponse = self.get_json(&url, &[], &context).await?;
        debug!(
            match_id = %response.data.id,
            included = response.included.len(),
            "Fetched match detail"
        );
        Ok(response)
    }
}

/// Match ids are long; logs only need a recognisable prefix
pub fn short_id(id: &str) -> &str {
    id.get(..16).unwrap_or(id)
}
