//! Weather and local-time tools backed by the weatherapi.com `current.json` endpoint.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Number, Value};
use std::sync::Arc;
use std::time::Duration;

/// Chinese city names the tools translate before querying the API
pub const CITY_NAME_MAP: &[(&str, &str)] = &[
    ("纽约", "New York"),
    ("伦敦", "London"),
    ("东京", "Tokyo"),
    ("北京", "Beijing"),
    ("上海", "Shanghai"),
    ("巴黎", "Paris"),
    ("柏林", "Berlin"),
    ("悉尼", "Sydney"),
    ("莫斯科", "Moscow"),
    ("迪拜", "Dubai"),
];

/// English query name for `city`, or `city` itself when it is not mapped.
pub fn query_city(city: &str) -> &str {
    CITY_NAME_MAP
        .iter()
        .find(|(zh, _)| *zh == city)
        .map(|(_, en)| *en)
        .unwrap_or(city)
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    country: String,
    tz_id: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: Number,
    temp_f: Number,
    humidity: Number,
    wind_kph: Number,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct TimePayload {
    location: Location,
}

/// Outcome of a `current.json` request that reached the API
#[derive(Debug)]
pub enum Lookup {
    Found(Value),
    /// The API answered with a non-success status code
    Rejected(u16),
}

/// Thin client over `GET {base}/v1/current.json?key=..&q=..`
#[derive(Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn current(&self, city: &str) -> Result<Lookup> {
        let url = format!("{}/v1/current.json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query_city(city))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(city, status = status.as_u16(), "Weather API rejected request");
            return Ok(Lookup::Rejected(status.as_u16()));
        }

        Ok(Lookup::Found(response.json::<Value>().await?))
    }
}

fn city_arg(args: &Value) -> Result<String> {
    args.get("city")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidInput("Missing required argument: city".to_string()))
}

fn city_schema(purpose: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "city": {
                "type": "string",
                "description": format!("City name to get {} for (Chinese or English)", purpose)
            }
        },
        "required": ["city"]
    })
}

fn success(report: String) -> Value {
    json!({ "status": "success", "report": report })
}

fn failure(message: String) -> Value {
    json!({ "status": "error", "error_message": message })
}

pub struct WeatherTool {
    client: Arc<WeatherApiClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<WeatherApiClient>) -> Self {
        Self { client }
    }

    fn report(city: &str, payload: Value) -> Result<String> {
        let data: WeatherPayload = serde_json::from_value(payload)?;
        Ok(format!(
            "Current weather in {} ({}) is {}, temperature {}°C ({}°F), humidity {}%, wind speed {} km/h.",
            city,
            data.location.country,
            data.current.condition.text,
            data.current.temp_c,
            data.current.temp_f,
            data.current.humidity,
            data.current.wind_kph,
        ))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Gets the current weather report for the specified city. Supports Chinese city names."
    }

    fn parameters_schema(&self) -> Value {
        city_schema("weather")
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let city = city_arg(&args)?;

        let outcome = match self.client.current(&city).await {
            Ok(Lookup::Found(payload)) => Self::report(&city, payload),
            Ok(Lookup::Rejected(code)) => {
                return Ok(failure(format!(
                    "Could not get weather for '{}'. API response code: {}, please check if city name is correct.",
                    city, code
                )))
            }
            Err(e) => Err(e),
        };

        Ok(match outcome {
            Ok(report) => success(report),
            Err(e) => failure(format!("Error getting weather for '{}': {}", city, e)),
        })
    }
}

pub struct CurrentTimeTool {
    client: Arc<WeatherApiClient>,
}

impl CurrentTimeTool {
    pub fn new(client: Arc<WeatherApiClient>) -> Self {
        Self { client }
    }

    fn report(city: &str, payload: Value) -> Result<String> {
        let data: TimePayload = serde_json::from_value(payload)?;
        Ok(format!(
            "Current time in {} is {} ({} timezone)",
            city, data.location.localtime, data.location.tz_id
        ))
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Gets the current local time for the specified city. Supports Chinese city names."
    }

    fn parameters_schema(&self) -> Value {
        city_schema("the current time")
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let city = city_arg(&args)?;

        let outcome = match self.client.current(&city).await {
            Ok(Lookup::Found(payload)) => Self::report(&city, payload),
            Ok(Lookup::Rejected(code)) => {
                return Ok(failure(format!(
                    "Could not get timezone for '{}'. API response code: {}, please check if city name is correct.",
                    city, code
                )))
            }
            Err(e) => Err(e),
        };

        Ok(match outcome {
            Ok(report) => success(report),
            Err(e) => failure(format!(
                "Error getting time information for '{}': {}",
                city, e
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_payload() -> Value {
        json!({
            "location": {
                "name": "New York",
                "country": "United States of America",
                "tz_id": "America/New_York",
                "localtime": "2025-05-01 09:30"
            },
            "current": {
                "temp_c": 18.3,
                "temp_f": 64.9,
                "humidity": 52,
                "wind_kph": 11.2,
                "condition": { "text": "Partly cloudy" }
            }
        })
    }

    #[test]
    fn test_query_city_mapping() {
        assert_eq!(query_city("纽约"), "New York");
        assert_eq!(query_city("迪拜"), "Dubai");
        assert_eq!(query_city("Lisbon"), "Lisbon");
    }

    #[tokio::test]
    async fn test_weather_report_uses_original_city_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", "New York"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload()))
            .mount(&server)
            .await;

        let client = Arc::new(WeatherApiClient::new("test-key", server.uri()));
        let tool = WeatherTool::new(client);
        let result = tool.execute(json!({"city": "纽约"})).await.unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(
            result["report"],
            "Current weather in 纽约 (United States of America) is Partly cloudy, temperature 18.3°C (64.9°F), humidity 52%, wind speed 11.2 km/h."
        );
    }

    #[tokio::test]
    async fn test_time_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload()))
            .mount(&server)
            .await;

        let client = Arc::new(WeatherApiClient::new("k", server.uri()));
        let tool = CurrentTimeTool::new(client);
        let result = tool.execute(json!({"city": "New York"})).await.unwrap();

        assert_eq!(
            result["report"],
            "Current time in New York is 2025-05-01 09:30 (America/New_York timezone)"
        );
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let client = Arc::new(WeatherApiClient::new("k", server.uri()));
        let tool = WeatherTool::new(client);
        let result = tool.execute(json!({"city": "Atlantis"})).await.unwrap();

        assert_eq!(result["status"], "error");
        assert_eq!(
            result["error_message"],
            "Could not get weather for 'Atlantis'. API response code: 400, please check if city name is correct."
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let client = Arc::new(WeatherApiClient::new("k", server.uri()));
        let tool = CurrentTimeTool::new(client);
        let result = tool.execute(json!({"city": "Paris"})).await.unwrap();

        assert_eq!(result["status"], "error");
        assert!(result["error_message"]
            .as_str()
            .unwrap()
            .starts_with("Error getting time information for 'Paris':"));
    }

    #[tokio::test]
    async fn test_missing_city_is_invalid_input() {
        let client = Arc::new(WeatherApiClient::new("k", "http://localhost:1"));
        let tool = WeatherTool::new(client);
        let result = tool.execute(json!({})).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
