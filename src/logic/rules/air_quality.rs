use super::{Rule, RuleContext};
use rand::RngCore;

/// AQI-driven advice. The two pollution thresholds stack.
pub struct AirQualityRule;

impl Rule for AirQualityRule {
    fn id(&self) -> &'static str {
        "air_quality"
    }

    fn name(&self) -> &'static str {
        "Air Quality"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _rng: &mut dyn RngCore) -> Vec<String> {
        let Some(aqi) = ctx.air_quality else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        if aqi > 100 {
            lines.push("😷 空气质量较差，建议佩戴口罩".to_string());
        }
        if aqi > 150 {
            lines.push("🏠 空气污染严重，减少户外活动".to_string());
        } else if aqi <= 50 {
            lines.push("🫁 空气质量优良，适合户外活动".to_string());
        }
        lines
    }
}
