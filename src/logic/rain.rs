use super::keywords::{contains_any, KeywordTable};
use crate::models::WeatherReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainAlert {
    CurrentlyRaining,
    LikelyToday,
}

impl RainAlert {
    pub fn message(&self) -> &'static str {
        match self {
            RainAlert::CurrentlyRaining => "☔ 当前正在下雨，出门记得带伞！",
            RainAlert::LikelyToday => "🌧️ 今天可能有雨，建议携带雨具",
        }
    }
}

impl std::fmt::Display for RainAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Precipitation alert for the top of the email
///
/// Current conditions win over the forecast: when it is already raining the
/// forecast is never consulted.
#[derive(Debug, Clone)]
pub struct RainDetector {
    keywords: Vec<String>,
}

impl RainDetector {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn from_table(table: &KeywordTable) -> Self {
        Self::new(table.precipitation.clone())
    }

    pub fn detect(&self, report: &WeatherReport) -> Option<RainAlert> {
        let current = report.current.as_ref()?;

        if contains_any(current.condition_text(), &self.keywords) {
            return Some(RainAlert::CurrentlyRaining);
        }

        let today = report.first_forecast()?;
        if contains_any(today.day_text(), &self.keywords)
            || contains_any(today.night_text(), &self.keywords)
        {
            return Some(RainAlert::LikelyToday);
        }

        None
    }
}

impl Default for RainDetector {
    fn default() -> Self {
        Self::from_table(&KeywordTable::default())
    }
}
