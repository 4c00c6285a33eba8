pub mod air_quality;
pub mod closing;
pub mod engine;
pub mod humidity;
pub mod temperature;
pub mod temperature_swing;
pub mod weather_condition;

pub use engine::RulesEngine;

use crate::models::{CurrentConditions, ForecastDay, WeatherReport};
use chrono::{DateTime, FixedOffset};
use rand::RngCore;

/// Coerced inputs shared by every rule in one evaluation pass
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub temperature_c: i32,
    pub humidity_percent: i32,
    pub wind_scale: i32,
    pub condition_text: &'a str,
    pub forecast: &'a [ForecastDay],
    pub air_quality: Option<u32>,
    pub local_time: DateTime<FixedOffset>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        current: &'a CurrentConditions,
        report: &'a WeatherReport,
        local_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            temperature_c: current.temperature_c(),
            humidity_percent: current.humidity_percent(),
            wind_scale: current.wind_scale_level(),
            condition_text: current.condition_text(),
            forecast: &report.forecast,
            air_quality: report.air_quality,
            local_time,
        }
    }
}

/// One group of clothing/comfort advice
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Advisory lines contributed by this rule, possibly none
    fn evaluate(&self, ctx: &RuleContext<'_>, rng: &mut dyn RngCore) -> Vec<String>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RuleContext;
    use crate::logic::clock::local_offset;
    use chrono::{DateTime, FixedOffset, TimeZone};

    pub fn local(y: i32, m: u32, d: u32) -> DateTime<FixedOffset> {
        local_offset().with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    pub fn ctx(temperature_c: i32) -> RuleContext<'static> {
        RuleContext {
            temperature_c,
            humidity_percent: 50,
            wind_scale: 0,
            condition_text: "",
            forecast: &[],
            air_quality: None,
            local_time: local(2024, 5, 14),
        }
    }
}
