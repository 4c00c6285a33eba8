pub mod qweather;

pub use qweather::QWeatherClient;

use crate::error::Result;
use crate::models::WeatherReport;
use async_trait::async_trait;

/// Provider of one cycle's weather data
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_report(&self) -> Result<WeatherReport>;
}
