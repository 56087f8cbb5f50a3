//! Async HTTP client for the Hue bridge light API

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client errors
#[derive(Error, Debug)]
pub enum HueError {
    /// Transport-level failure (connect, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bridge answered with a non-success status
    #[error("Bridge returned status {0}")]
    BridgeStatus(u16),
}

/// On/off fragment of the light state resource
#[derive(Debug, Serialize)]
struct LightState {
    on: bool,
}

/// Client for a single Hue bridge
pub struct HueClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
}

impl HueClient {
    /// Create a client for the bridge at `host` (ip or hostname, port 80)
    /// authenticating as `username`
    pub fn new(host: &str, username: &str) -> Result<Self, HueError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("http://{host}"),
            username: username.to_string(),
        })
    }

    /// Turn a single light on or off
    ///
    /// One request per light; the bridge applies these idempotently, so
    /// callers may re-issue a command without checking current state.
    pub async fn set_light_state(&self, light_id: u32, on: bool) -> Result<(), HueError> {
        let url = self.light_state_url(light_id);
        tracing::trace!("PUT {} on={}", url, on);

        let response = self
            .http
            .put(&url)
            .json(&LightState { on })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HueError::BridgeStatus(status.as_u16()));
        }

        tracing::trace!("Bridge acknowledged light {} on={}", light_id, on);
        Ok(())
    }

    /// URL of the state resource for one light
    fn light_state_url(&self, light_id: u32) -> String {
        format!(
            "{}/api/{}/lights/{}/state",
            self.base_url, self.username, light_id
        )
    }
}
