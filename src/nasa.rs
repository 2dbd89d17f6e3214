//! Client for NASA's NeoWs and APOD endpoints.
//!
//! [`NasaClient`] is explicitly constructed and generic over the transport,
//! so tests can inject a fake [`HttpClient`] instead of hitting the network.
//! The API key is appended to every request by the [`UrlParam`] wrapper;
//! nothing else in the client touches credentials.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::events::{MeteorEvent, to_events};
use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::models::{Apod, NearEarthObject, NeoFeed};

const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";
const DEFAULT_API_KEY: &str = "DEMO_KEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`NasaClient`].
#[derive(Debug, Clone)]
pub struct NasaConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for NasaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl NasaConfig {
    /// Reads `NASA_API_KEY` from the environment, falling back to NASA's
    /// public `DEMO_KEY` (rate-limited but functional).
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("NASA_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            ..Self::default()
        }
    }
}

/// Everything the dashboard needs for one render cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub meteors: Vec<MeteorEvent>,
    /// `None` when the APOD fetch failed; never blocks the meteor list.
    pub picture: Option<Apod>,
}

pub struct NasaClient<C = BasicClient> {
    base_url: String,
    http: UrlParam<C>,
}

impl NasaClient<BasicClient> {
    /// Builds a client over a real HTTP transport with the configured
    /// request timeout.
    pub fn new(config: NasaConfig) -> anyhow::Result<Self> {
        let http = BasicClient::with_timeout(config.timeout)?;
        Ok(Self::with_http(config, http))
    }
}

impl<C: HttpClient> NasaClient<C> {
    /// Builds a client over an injected transport. The timeout in `config`
    /// is ignored here; bounding requests is the transport's job.
    pub fn with_http(config: NasaConfig, http: C) -> Self {
        Self {
            base_url: config.base_url,
            http: UrlParam {
                inner: http,
                param_name: "api_key".to_string(),
                key: config.api_key,
            },
        }
    }

    fn feed_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/neo/rest/v1/feed?start_date={}&end_date={}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        )
    }

    fn apod_url(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(date) => format!("{}/planetary/apod?date={}", self.base_url, date.format("%Y-%m-%d")),
            None => format!("{}/planetary/apod", self.base_url),
        }
    }

    fn object_url(&self, neo_id: &str) -> String {
        format!("{}/neo/rest/v1/neo/{}", self.base_url, neo_id)
    }

    /// Fetches the raw feed for an inclusive date range.
    #[tracing::instrument(skip(self), fields(start = %start, end = %end))]
    pub async fn fetch_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<NeoFeed, FetchError> {
        let feed: NeoFeed = fetch_json(&self.http, &self.feed_url(start, end))
            .await
            .map_err(|e| FetchError::log("failed to fetch meteor data", &e))?;

        debug!(element_count = feed.element_count, "feed fetched");
        Ok(feed)
    }

    /// Fetches the default range: today through today + 7 days.
    pub async fn fetch_feed_default(&self) -> Result<NeoFeed, FetchError> {
        let today = Utc::now().date_naive();
        let week_out = today + Days::new(7);
        self.fetch_feed(today, week_out).await
    }

    /// Fetches the Astronomy Picture of the Day for `date`, or the
    /// service's default ("today") when `date` is `None`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_picture_of_day(&self, date: Option<NaiveDate>) -> Result<Apod, FetchError> {
        fetch_json(&self.http, &self.apod_url(date))
            .await
            .map_err(|e| FetchError::log("failed to fetch astronomy picture", &e))
    }

    /// Fetches full detail for a single object by its NeoWs id.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_object(&self, neo_id: &str) -> Result<NearEarthObject, FetchError> {
        fetch_json(&self.http, &self.object_url(neo_id))
            .await
            .map_err(|e| FetchError::log("failed to fetch meteor details", &e))
    }

    /// Fetches the default-range feed and keeps only the potentially
    /// hazardous objects, flattened across all dates.
    pub async fn fetch_hazardous_objects(&self) -> Result<Vec<NearEarthObject>, FetchError> {
        let feed = self.fetch_feed_default().await?;

        let hazardous: Vec<NearEarthObject> = feed
            .near_earth_objects
            .into_values()
            .flatten()
            .filter(|neo| neo.is_potentially_hazardous_asteroid)
            .collect();

        debug!(count = hazardous.len(), "hazardous objects filtered");
        Ok(hazardous)
    }

    /// Meteor events for the next week, sorted by approach time.
    pub async fn upcoming_meteors(&self) -> Result<Vec<MeteorEvent>, FetchError> {
        let feed = self
            .fetch_feed_default()
            .await
            .map_err(|e| e.relabel("failed to fetch upcoming meteors"))?;
        Ok(to_events(&feed))
    }

    /// Meteor events approaching today.
    pub async fn todays_meteors(&self) -> Result<Vec<MeteorEvent>, FetchError> {
        let today = Utc::now().date_naive();
        let feed = self
            .fetch_feed(today, today)
            .await
            .map_err(|e| e.relabel("failed to fetch today's meteors"))?;
        Ok(to_events(&feed))
    }

    /// Fetches the upcoming meteor list and the picture of the day
    /// concurrently. The picture branch is insulated: its failure resolves
    /// to `None`, while a meteor-feed failure aborts the whole operation.
    pub async fn dashboard(&self) -> Result<Dashboard, FetchError> {
        let (meteors, picture) =
            tokio::join!(self.upcoming_meteors(), self.fetch_picture_of_day(None));

        Ok(Dashboard {
            meteors: meteors?,
            picture: picture.ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Transport fake that matches requests by URL substring and records
    /// every URL it serves.
    struct FakeHttp {
        routes: Vec<(&'static str, u16, &'static str)>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeHttp {
        fn new(routes: Vec<(&'static str, u16, &'static str)>) -> Self {
            Self {
                routes,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttp {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let url = req.url().to_string();
            self.seen.lock().unwrap().push(url.clone());

            let (status, body) = self
                .routes
                .iter()
                .find(|(fragment, _, _)| url.contains(fragment))
                .map(|&(_, status, body)| (status, body))
                .unwrap_or((404, "{}"));

            let resp = http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap();
            Ok(resp.into())
        }
    }

    fn test_config() -> NasaConfig {
        NasaConfig {
            base_url: "https://api.example.test".to_string(),
            api_key: "TEST_KEY".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    const FEED_BODY: &str = r#"{
        "element_count": 1,
        "near_earth_objects": {
            "2024-01-01": [{
                "id": "1",
                "name": "Test",
                "estimated_diameter": {
                    "kilometers": {
                        "estimated_diameter_min": 0.1,
                        "estimated_diameter_max": 0.3
                    }
                },
                "is_potentially_hazardous_asteroid": true,
                "close_approach_data": [{
                    "close_approach_date_full": "2024-Jan-01 12:00",
                    "relative_velocity": { "kilometers_per_hour": "50000" },
                    "miss_distance": { "kilometers": "100000" }
                }]
            }]
        }
    }"#;

    const APOD_BODY: &str = r#"{
        "title": "A Nebula",
        "explanation": "Dust and gas.",
        "media_type": "image",
        "url": "https://apod.nasa.gov/apod/image/nebula.jpg",
        "copyright": "Someone"
    }"#;

    #[test]
    fn test_feed_url_formats_dates() {
        let client = NasaClient::with_http(test_config(), FakeHttp::new(vec![]));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        assert_eq!(
            client.feed_url(start, end),
            "https://api.example.test/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-08"
        );
    }

    #[test]
    fn test_apod_url_with_and_without_date() {
        let client = NasaClient::with_http(test_config(), FakeHttp::new(vec![]));
        assert_eq!(client.apod_url(None), "https://api.example.test/planetary/apod");

        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            client.apod_url(Some(date)),
            "https://api.example.test/planetary/apod?date=2024-06-15"
        );
    }

    #[tokio::test]
    async fn test_api_key_appended_to_requests() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![("/planetary/apod", 200, APOD_BODY)]),
        );

        client.fetch_picture_of_day(None).await.unwrap();

        let seen = client.http.inner.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("api_key=TEST_KEY"));
    }

    #[tokio::test]
    async fn test_fetch_feed_parses_response() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![("/neo/rest/v1/feed", 200, FEED_BODY)]),
        );

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feed = client.fetch_feed(start, start).await.unwrap();
        assert_eq!(feed.element_count, 1);
        assert_eq!(feed.near_earth_objects["2024-01-01"][0].id, "1");
    }

    #[tokio::test]
    async fn test_fetch_feed_error_is_generic() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![("/neo/rest/v1/feed", 500, "upstream exploded")]),
        );

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = client.fetch_feed(start, start).await.unwrap_err();
        assert_eq!(err.message(), "failed to fetch meteor data");
        // transport detail must not leak into the user-facing message
        assert!(!err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_error_detail_omits_api_key() {
        let http = UrlParam {
            inner: FakeHttp::new(vec![("/neo/rest/v1/feed", 500, "boom")]),
            param_name: "api_key".to_string(),
            key: "SUPER_SECRET".to_string(),
        };

        let err = fetch_json::<_, NeoFeed>(
            &http,
            "https://api.example.test/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-08",
        )
        .await
        .unwrap_err();

        // the full chain is what FetchError::log writes to the log
        let detail = format!("{err:?}");
        assert!(detail.contains("500"));
        assert!(!detail.contains("SUPER_SECRET"));
        assert!(!detail.contains("api_key"));
    }

    #[tokio::test]
    async fn test_fetch_hazardous_objects_filters_and_flattens() {
        let body: &'static str = r#"{
            "element_count": 2,
            "near_earth_objects": {
                "2024-01-01": [{
                    "id": "safe",
                    "name": "Safe",
                    "estimated_diameter": {
                        "kilometers": {
                            "estimated_diameter_min": 0.1,
                            "estimated_diameter_max": 0.2
                        }
                    },
                    "is_potentially_hazardous_asteroid": false,
                    "close_approach_data": []
                }],
                "2024-01-02": [{
                    "id": "risky",
                    "name": "Risky",
                    "estimated_diameter": {
                        "kilometers": {
                            "estimated_diameter_min": 0.5,
                            "estimated_diameter_max": 1.1
                        }
                    },
                    "is_potentially_hazardous_asteroid": true,
                    "close_approach_data": []
                }]
            }
        }"#;

        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![("/neo/rest/v1/feed", 200, body)]),
        );

        let hazardous = client.fetch_hazardous_objects().await.unwrap();
        assert_eq!(hazardous.len(), 1);
        assert_eq!(hazardous[0].id, "risky");
    }

    #[tokio::test]
    async fn test_dashboard_survives_apod_failure() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![
                ("/neo/rest/v1/feed", 200, FEED_BODY),
                ("/planetary/apod", 503, "try later"),
            ]),
        );

        let dashboard = client.dashboard().await.unwrap();
        assert_eq!(dashboard.meteors.len(), 1);
        assert!(dashboard.picture.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_propagates_feed_failure() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![
                ("/neo/rest/v1/feed", 500, "down"),
                ("/planetary/apod", 200, APOD_BODY),
            ]),
        );

        let err = client.dashboard().await.unwrap_err();
        assert_eq!(err.message(), "failed to fetch upcoming meteors");
    }

    #[tokio::test]
    async fn test_entry_points_use_their_own_messages() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![("/neo/rest/v1/feed", 500, "down")]),
        );

        let err = client.upcoming_meteors().await.unwrap_err();
        assert_eq!(err.message(), "failed to fetch upcoming meteors");

        let err = client.todays_meteors().await.unwrap_err();
        assert_eq!(err.message(), "failed to fetch today's meteors");
    }

    #[tokio::test]
    async fn test_dashboard_joins_both_fetches() {
        let client = NasaClient::with_http(
            test_config(),
            FakeHttp::new(vec![
                ("/neo/rest/v1/feed", 200, FEED_BODY),
                ("/planetary/apod", 200, APOD_BODY),
            ]),
        );

        let dashboard = client.dashboard().await.unwrap();
        assert_eq!(dashboard.meteors.len(), 1);
        assert_eq!(dashboard.picture.unwrap().title, "A Nebula");
    }

    #[tokio::test]
    #[ignore] // Requires network connection and NASA availability
    async fn test_live_fetch_feed_default() {
        let client = NasaClient::new(NasaConfig::from_env()).unwrap();
        let result = client.fetch_feed_default().await;
        assert!(result.is_ok());
    }
}
