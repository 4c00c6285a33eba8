use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback temperature when the upstream value is missing or unparseable
pub const DEFAULT_TEMP_C: i32 = 20;
/// Fallback relative humidity
pub const DEFAULT_HUMIDITY_PERCENT: i32 = 50;
/// Fallback Beaufort wind scale
pub const DEFAULT_WIND_SCALE: i32 = 0;

const NOT_AVAILABLE: &str = "N/A";

/// Accepts a JSON/YAML string, number or bool and keeps it as text.
///
/// QWeather sends every figure as a string, while hand-written fixtures
/// tend to use bare numbers. Both end up as the same raw value.
pub(crate) fn loose_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Coerce a raw upstream figure to an integer.
///
/// Accepts plain integers, decimals (truncated) and ranges such as `"3-4"`
/// (leading integer). Anything else yields `default`.
pub fn coerce_int(raw: Option<&str>, default: i32) -> i32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };

    if let Ok(value) = raw.parse::<i32>() {
        return value;
    }

    let sign_len = usize::from(raw.starts_with('-'));
    let digits = raw[sign_len..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return default;
    }

    raw[..sign_len + digits].parse::<i32>().unwrap_or(default)
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Current conditions as reported by the `weather/now` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "loose_string")]
    pub temp: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub wind_scale: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub wind_dir: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub vis: Option<String>,
}

impl CurrentConditions {
    pub fn temperature_c(&self) -> i32 {
        coerce_int(self.temp.as_deref(), DEFAULT_TEMP_C)
    }

    pub fn humidity_percent(&self) -> i32 {
        coerce_int(self.humidity.as_deref(), DEFAULT_HUMIDITY_PERCENT)
    }

    pub fn wind_scale_level(&self) -> i32 {
        coerce_int(self.wind_scale.as_deref(), DEFAULT_WIND_SCALE)
    }

    /// Condition text, empty when the provider omitted it
    pub fn condition_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn temp_display(&self) -> &str {
        or_na(&self.temp)
    }

    pub fn text_display(&self) -> &str {
        self.text.as_deref().unwrap_or("未知")
    }

    pub fn humidity_display(&self) -> &str {
        or_na(&self.humidity)
    }

    pub fn wind_scale_display(&self) -> &str {
        or_na(&self.wind_scale)
    }

    pub fn wind_dir_display(&self) -> &str {
        or_na(&self.wind_dir)
    }

    pub fn vis_display(&self) -> &str {
        or_na(&self.vis)
    }
}

/// One entry of the `weather/3d` daily forecast
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(default)]
    pub fx_date: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub temp_min: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub temp_max: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub text_day: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub text_night: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub wind_dir_day: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub wind_scale_day: Option<String>,
}

impl ForecastDay {
    /// Minimum temperature, or `fallback` when missing or unparseable
    pub fn min_c(&self, fallback: i32) -> i32 {
        coerce_int(self.temp_min.as_deref(), fallback)
    }

    /// Maximum temperature, or `fallback` when missing or unparseable
    pub fn max_c(&self, fallback: i32) -> i32 {
        coerce_int(self.temp_max.as_deref(), fallback)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.fx_date.trim(), "%Y-%m-%d").ok()
    }

    pub fn day_text(&self) -> &str {
        self.text_day.as_deref().unwrap_or("")
    }

    pub fn night_text(&self) -> &str {
        self.text_night.as_deref().unwrap_or("")
    }

    pub fn text_day_display(&self) -> &str {
        or_na(&self.text_day)
    }

    pub fn text_night_display(&self) -> &str {
        or_na(&self.text_night)
    }

    pub fn temp_min_display(&self) -> &str {
        or_na(&self.temp_min)
    }

    pub fn temp_max_display(&self) -> &str {
        or_na(&self.temp_max)
    }

    pub fn wind_dir_display(&self) -> &str {
        or_na(&self.wind_dir_day)
    }

    pub fn wind_scale_display(&self) -> &str {
        or_na(&self.wind_scale_day)
    }
}

/// Everything fetched for one send cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    #[serde(default)]
    pub air_quality: Option<u32>,
}

impl WeatherReport {
    pub fn new(current: CurrentConditions) -> Self {
        Self {
            current: Some(current),
            forecast: Vec::new(),
            air_quality: None,
        }
    }

    pub fn with_forecast(mut self, forecast: Vec<ForecastDay>) -> Self {
        self.forecast = forecast;
        self
    }

    pub fn with_air_quality(mut self, aqi: u32) -> Self {
        self.air_quality = Some(aqi);
        self
    }

    /// First forecast entry. The provider's list starts with today, which
    /// also serves as the reference day for temperature-swing advice.
    pub fn first_forecast(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }
}
