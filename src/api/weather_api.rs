use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;
use crate::error::SkycastError;
use crate::types::weather::{WeatherEndpoint, WeatherQuery};
use crate::types::weatherapi::WaErrorEnvelope;

/// Thin client for the WeatherAPI.com REST endpoints.
///
/// One GET per call; no retries and no caching.
#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl WeatherApiClient {
    /// `base` is treated as a directory: a missing trailing `/` is added so
    /// endpoint files resolve beneath it instead of replacing its last segment.
    pub fn new(
        mut base: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SkycastError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, SkycastError> {
        Self::new(
            cfg.weather_api_base.clone(),
            cfg.weather_api_key.clone(),
            Duration::from_secs(cfg.upstream_timeout_secs),
        )
    }

    fn endpoint_url(&self, endpoint: WeatherEndpoint) -> Result<Url, SkycastError> {
        self.base
            .join(endpoint.file())
            .map_err(|e| SkycastError::Config(format!("invalid weather api base url: {e}")))
    }

    /// Fetch the raw JSON body for `endpoint`. Non-2xx statuses surface as
    /// `Upstream` carrying the provider's own message when it sent one.
    pub async fn fetch(
        &self,
        endpoint: WeatherEndpoint,
        query: &WeatherQuery,
    ) -> Result<Value, SkycastError> {
        let url = self.endpoint_url(endpoint)?;

        let mut params: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("q", query.location.clone()),
        ];
        match endpoint {
            WeatherEndpoint::Forecast => params.push(("days", query.days.to_string())),
            WeatherEndpoint::Astronomy => {
                if let Some(date) = query.date {
                    params.push(("dt", date.format("%Y-%m-%d").to_string()));
                }
            }
            _ => {}
        }

        debug!(%endpoint, location = %query.location, "calling weather provider");
        let resp = self.client.get(url).query(&params).send().await.map_err(|e| {
            error!(%endpoint, error = %e, "weather provider request failed");
            SkycastError::from(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let bytes = resp.bytes().await?;
            let message = serde_json::from_slice::<WaErrorEnvelope>(&bytes)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| format!("Weather provider returned status {status}."));
            warn!(%endpoint, %status, %message, "weather provider error");
            return Err(SkycastError::Upstream(message));
        }

        resp.json::<Value>().await.map_err(|e| {
            warn!(%endpoint, error = %e, "weather provider body is not json");
            SkycastError::upstream(format!(
                "Weather provider returned an unreadable {endpoint} response."
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::weather::TemperatureUnit;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherApiClient {
        let base = Url::parse(&format!("{}/v1/", server.uri())).unwrap();
        WeatherApiClient::new(base, "test-key", Duration::from_secs(2)).unwrap()
    }

    fn query(location: &str) -> WeatherQuery {
        WeatherQuery {
            location: location.into(),
            days: 5,
            date: NaiveDate::from_ymd_opt(2024, 12, 10),
            unit: TemperatureUnit::Celsius,
        }
    }

    #[tokio::test]
    async fn forecast_sends_key_location_and_days() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast.json"))
            .and(query_param("key", "test-key"))
            .and(query_param("q", "Boston"))
            .and(query_param("days", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .fetch(WeatherEndpoint::Forecast, &query("Boston"))
            .await
            .unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn base_without_trailing_slash_keeps_its_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        let client = WeatherApiClient::new(base, "test-key", Duration::from_secs(2)).unwrap();
        assert!(
            client
                .endpoint_url(WeatherEndpoint::Current)
                .unwrap()
                .as_str()
                .ends_with("/v1/current.json")
        );
        let body = client
            .fetch(WeatherEndpoint::Current, &query("Boston"))
            .await
            .unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn astronomy_sends_dt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/astronomy.json"))
            .and(query_param("dt", "2024-12-10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .fetch(WeatherEndpoint::Astronomy, &query("Boston"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn provider_error_message_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 1006, "message": "No matching location found."}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch(WeatherEndpoint::Current, &query("Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(&err, SkycastError::Upstream(m) if m == "No matching location found."));
    }

    #[tokio::test]
    async fn non_json_error_body_still_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch(WeatherEndpoint::Marine, &query("Miami"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkycastError::Upstream(_)));
    }
}
