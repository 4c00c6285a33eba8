use super::WeatherSource;
use crate::config::WeatherConfig;
use crate::error::{Result, SparrowError};
use crate::models::weather::loose_string;
use crate::models::{coerce_int, CurrentConditions, ForecastDay, WeatherReport};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const SUCCESS_CODE: &str = "200";

/// Days kept from the `weather/3d` response
pub const FORECAST_DAYS: usize = 3;

pub struct QWeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

// QWeather v7 API response structures
#[derive(Debug, Deserialize)]
struct NowResponse {
    code: String,
    #[serde(default)]
    now: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    code: String,
    #[serde(default)]
    daily: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct AirResponse {
    code: String,
    #[serde(default)]
    now: Option<AirNow>,
}

#[derive(Debug, Deserialize)]
struct AirNow {
    #[serde(default, deserialize_with = "loose_string")]
    aqi: Option<String>,
}

impl QWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> String {
        let host = self.config.api_host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v7/{}?location={}&key={}",
            self.base_url(),
            path,
            self.config.location,
            self.config.api_key
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| SparrowError::DataSourceUnavailable(format!("QWeather {}: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SparrowError::DataSourceUnavailable(format!(
                "QWeather {} returned {}: {}",
                path, status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            SparrowError::DataSourceUnavailable(format!(
                "Failed to parse QWeather {} response: {}",
                path, e
            ))
        })
    }

    /// Current conditions. Any failure here aborts the cycle.
    pub async fn fetch_now(&self) -> Result<CurrentConditions> {
        let response: NowResponse = self.get_json("weather/now").await?;
        current_from_response(response)
    }

    /// Daily forecast starting today; empty when the endpoint reports an error
    pub async fn fetch_forecast(&self) -> Result<Vec<ForecastDay>> {
        let response: DailyResponse = self.get_json("weather/3d").await?;
        Ok(forecast_from_response(response))
    }

    pub async fn fetch_air_quality(&self) -> Result<Option<u32>> {
        let response: AirResponse = self.get_json("air/now").await?;
        if response.code != SUCCESS_CODE {
            tracing::warn!("QWeather air/now returned code {}", response.code);
        }
        Ok(aqi_from_response(response))
    }

    /// Test connection to the QWeather API
    pub async fn test_connection(&self) -> Result<bool> {
        let response: NowResponse = self.get_json("weather/now").await?;
        Ok(response.code == SUCCESS_CODE)
    }
}

#[async_trait]
impl WeatherSource for QWeatherClient {
    async fn fetch_report(&self) -> Result<WeatherReport> {
        let current = self.fetch_now().await?;

        let forecast = match self.fetch_forecast().await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!("Failed to fetch forecast: {}", e);
                Vec::new()
            }
        };

        let air_quality = match self.fetch_air_quality().await {
            Ok(aqi) => {
                if aqi.is_some() {
                    tracing::info!("Air quality data fetched");
                }
                aqi
            }
            Err(e) => {
                tracing::warn!("Failed to fetch air quality: {}", e);
                None
            }
        };

        let report = WeatherReport::new(current).with_forecast(forecast);
        Ok(match air_quality {
            Some(aqi) => report.with_air_quality(aqi),
            None => report,
        })
    }
}

fn current_from_response(response: NowResponse) -> Result<CurrentConditions> {
    if response.code != SUCCESS_CODE {
        return Err(SparrowError::DataSourceUnavailable(format!(
            "QWeather weather/now returned code {}",
            response.code
        )));
    }

    response
        .now
        .ok_or_else(|| SparrowError::InvalidData("QWeather weather/now has no `now` block".into()))
}

fn forecast_from_response(response: DailyResponse) -> Vec<ForecastDay> {
    if response.code != SUCCESS_CODE {
        tracing::warn!("QWeather weather/3d returned code {}", response.code);
        return Vec::new();
    }

    response.daily.into_iter().take(FORECAST_DAYS).collect()
}

fn aqi_from_response(response: AirResponse) -> Option<u32> {
    if response.code != SUCCESS_CODE {
        return None;
    }

    let raw = response.now?.aqi?;
    u32::try_from(coerce_int(Some(raw.as_str()), -1)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> WeatherConfig {
        WeatherConfig {
            api_key: "test_key".to_string(),
            api_host: "devapi.qweather.com".to_string(),
            location: "101010100".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn endpoint_urls() {
        let client = QWeatherClient::new(sample_config()).unwrap();
        assert_eq!(
            client.endpoint("weather/now"),
            "https://devapi.qweather.com/v7/weather/now?location=101010100&key=test_key"
        );

        let mut config = sample_config();
        config.api_host = "http://127.0.0.1:8080/".into();
        let client = QWeatherClient::new(config).unwrap();
        assert!(client
            .endpoint("air/now")
            .starts_with("http://127.0.0.1:8080/v7/air/now?"));
    }

    #[test]
    fn now_response_ok() {
        let body = r#"{"code":"200","updateTime":"2024-05-14T09:00+08:00","now":{"obsTime":"2024-05-14T08:50+08:00","temp":"24","feelsLike":"25","icon":"100","text":"晴","wind360":"180","windDir":"南风","windScale":"2","windSpeed":"8","humidity":"40","precip":"0.0","pressure":"1003","vis":"25","cloud":"10","dew":"9"}}"#;
        let response: NowResponse = serde_json::from_str(body).unwrap();
        let current = current_from_response(response).unwrap();

        assert_eq!(current.temperature_c(), 24);
        assert_eq!(current.condition_text(), "晴");
        assert_eq!(current.vis_display(), "25");
    }

    #[test]
    fn now_response_error_code() {
        let response: NowResponse = serde_json::from_str(r#"{"code":"401"}"#).unwrap();
        let err = current_from_response(response).unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn daily_response_truncates_and_tolerates_errors() {
        let body = r#"{"code":"200","daily":[
            {"fxDate":"2024-05-14","tempMax":"26","tempMin":"13","textDay":"晴","textNight":"多云","windDirDay":"南风","windScaleDay":"1-3"},
            {"fxDate":"2024-05-15","tempMax":"27","tempMin":"15","textDay":"多云","textNight":"阴","windDirDay":"南风","windScaleDay":"1-3"},
            {"fxDate":"2024-05-16","tempMax":"22","tempMin":"14","textDay":"小雨","textNight":"小雨","windDirDay":"东风","windScaleDay":"3-4"},
            {"fxDate":"2024-05-17","tempMax":"25","tempMin":"12","textDay":"晴","textNight":"晴","windDirDay":"北风","windScaleDay":"1-3"}
        ]}"#;
        let response: DailyResponse = serde_json::from_str(body).unwrap();
        let days = forecast_from_response(response);
        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[0].fx_date, "2024-05-14");
        assert_eq!(days[2].max_c(0), 22);

        let response: DailyResponse = serde_json::from_str(r#"{"code":"402"}"#).unwrap();
        assert!(forecast_from_response(response).is_empty());
    }

    #[test]
    fn air_response_variants() {
        let parse = |body: &str| aqi_from_response(serde_json::from_str(body).unwrap());

        assert_eq!(parse(r#"{"code":"200","now":{"aqi":"46","category":"优"}}"#), Some(46));
        assert_eq!(parse(r#"{"code":"200","now":{"aqi":0}}"#), Some(0));
        assert_eq!(parse(r#"{"code":"200","now":{"aqi":null}}"#), None);
        assert_eq!(parse(r#"{"code":"200","now":{}}"#), None);
        assert_eq!(parse(r#"{"code":"200","now":{"aqi":"-"}}"#), None);
        assert_eq!(parse(r#"{"code":"204"}"#), None);
    }

    mod fetch {
        use super::*;
        use crate::datasources::WeatherSource;
        use crate::error::SparrowError;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const NOW_OK: &str = r#"{"code":"200","now":{"temp":"18","text":"多云","humidity":"55","windDir":"东风","windScale":"3","vis":"12"}}"#;

        fn client_for(server: &MockServer) -> QWeatherClient {
            let mut config = sample_config();
            config.api_host = server.uri();
            config.timeout_secs = 5;
            QWeatherClient::new(config).unwrap()
        }

        async fn mount(server: &MockServer, endpoint: &str, status: u16, body: &str) {
            Mock::given(method("GET"))
                .and(path(format!("/v7/{}", endpoint)))
                .and(query_param("location", "101010100"))
                .and(query_param("key", "test_key"))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn full_report() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 200, NOW_OK).await;
            mount(
                &server,
                "weather/3d",
                200,
                r#"{"code":"200","daily":[{"fxDate":"2024-05-14","tempMax":"24","tempMin":"12","textDay":"晴","textNight":"多云"}]}"#,
            )
            .await;
            mount(&server, "air/now", 200, r#"{"code":"200","now":{"aqi":"45"}}"#).await;

            let report = client_for(&server).fetch_report().await.unwrap();

            assert_eq!(report.current.as_ref().unwrap().temperature_c(), 18);
            assert_eq!(report.forecast.len(), 1);
            assert_eq!(report.forecast[0].fx_date, "2024-05-14");
            assert_eq!(report.air_quality, Some(45));
        }

        #[tokio::test]
        async fn now_error_code_fails_the_fetch() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 200, r#"{"code":"401"}"#).await;

            let err = client_for(&server).fetch_report().await.unwrap_err();
            assert!(err.to_string().contains("401"));
        }

        #[tokio::test]
        async fn now_http_failure_fails_the_fetch() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 500, "boom").await;

            let err = client_for(&server).fetch_report().await.unwrap_err();
            assert!(matches!(err, SparrowError::DataSourceUnavailable(_)));
        }

        #[tokio::test]
        async fn forecast_and_air_failures_degrade() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 200, NOW_OK).await;
            mount(&server, "weather/3d", 500, "unavailable").await;
            mount(&server, "air/now", 200, "not json").await;

            let report = client_for(&server).fetch_report().await.unwrap();

            assert!(report.current.is_some());
            assert!(report.forecast.is_empty());
            assert_eq!(report.air_quality, None);
        }

        #[tokio::test]
        async fn forecast_and_air_error_codes_degrade() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 200, NOW_OK).await;
            mount(&server, "weather/3d", 200, r#"{"code":"402"}"#).await;
            mount(&server, "air/now", 200, r#"{"code":"403"}"#).await;

            let report = client_for(&server).fetch_report().await.unwrap();

            assert!(report.forecast.is_empty());
            assert_eq!(report.air_quality, None);
        }

        #[tokio::test]
        async fn test_connection_reports_api_code() {
            let server = MockServer::start().await;
            mount(&server, "weather/now", 200, r#"{"code":"401"}"#).await;

            assert!(!client_for(&server).test_connection().await.unwrap());
        }
    }
}
