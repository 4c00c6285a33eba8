use super::html::{render, RenderContext, TITLE};
use crate::logic::rain::RainDetector;
use crate::logic::RulesEngine;
use crate::models::{AdvisoryList, WeatherReport};
use chrono::{DateTime, FixedOffset};
use rand::RngCore;

/// A fully composed message, ready for the mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub advisories: AdvisoryList,
}

pub fn subject_line(report: &WeatherReport) -> String {
    match report.current.as_ref() {
        Some(current) => format!(
            "🐦 {}：{} {}°C",
            TITLE,
            current.text_display(),
            current.temp_display()
        ),
        None => format!("🐦 {}：未知 N/A°C", TITLE),
    }
}

pub struct EmailComposer {
    engine: RulesEngine,
    detector: RainDetector,
}

impl EmailComposer {
    pub fn new(engine: RulesEngine, detector: RainDetector) -> Self {
        Self { engine, detector }
    }

    pub fn compose(
        &self,
        report: &WeatherReport,
        local_time: DateTime<FixedOffset>,
        rng: &mut dyn RngCore,
    ) -> EmailContent {
        let advisories = self.engine.generate(report, local_time, rng);
        let rain_alert = self.detector.detect(report);
        let html = render(&RenderContext::new(
            report,
            &advisories,
            rain_alert,
            local_time,
        ));

        EmailContent {
            subject: subject_line(report),
            html,
            advisories,
        }
    }
}

impl Default for EmailComposer {
    fn default() -> Self {
        Self::new(RulesEngine::default(), RainDetector::default())
    }
}
