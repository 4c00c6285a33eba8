use super::{
    air_quality::AirQualityRule, closing::ClosingLineRule, humidity::HumidityRule,
    temperature::TemperatureBandRule, temperature_swing::TemperatureSwingRule,
    weather_condition::WeatherConditionRule, Rule, RuleContext,
};
use crate::logic::keywords::KeywordTable;
use crate::models::{AdvisoryList, WeatherReport};
use chrono::{DateTime, FixedOffset};
use rand::RngCore;

/// Sole advice line when the provider returned no current conditions
pub const WEATHER_UNAVAILABLE_ADVICE: &str = "⚠️ 天气信息不可用，请根据实际情况穿衣";

pub struct RulesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RulesEngine {
    pub fn new(keywords: KeywordTable, closing: ClosingLineRule) -> Self {
        // Evaluation order is the output order
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(TemperatureBandRule),
            Box::new(WeatherConditionRule::new(keywords)),
            Box::new(HumidityRule),
            Box::new(TemperatureSwingRule),
            Box::new(AirQualityRule),
            Box::new(closing),
        ];

        Self { rules }
    }

    pub fn generate(
        &self,
        report: &WeatherReport,
        local_time: DateTime<FixedOffset>,
        rng: &mut dyn RngCore,
    ) -> AdvisoryList {
        let mut advisories = AdvisoryList::new();

        let Some(current) = report.current.as_ref() else {
            advisories.push(WEATHER_UNAVAILABLE_ADVICE);
            return advisories;
        };

        let ctx = RuleContext::new(current, report, local_time);
        for rule in &self.rules {
            let lines = rule.evaluate(&ctx, &mut *rng);
            tracing::trace!(rule = rule.id(), count = lines.len(), "rule evaluated");
            advisories.extend(lines);
        }

        advisories
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new(KeywordTable::default(), ClosingLineRule::default())
    }
}
