use super::{Rule, RuleContext};
use rand::RngCore;

/// Day range, in °C, that calls for layered clothing
pub const WIDE_SPREAD_C: i32 = 15;
/// Gap between now and the forecast extremes that calls for a spare layer
pub const LARGE_SHIFT_C: i32 = 10;

/// Temperature-swing advice from the first forecast day
///
/// Skipped entirely without a forecast. A wide spread takes precedence over
/// a large shift from the current temperature.
pub struct TemperatureSwingRule;

impl Rule for TemperatureSwingRule {
    fn id(&self) -> &'static str {
        "temperature_swing"
    }

    fn name(&self) -> &'static str {
        "Temperature Swing"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _rng: &mut dyn RngCore) -> Vec<String> {
        let Some(day) = ctx.forecast.first() else {
            return Vec::new();
        };

        let temp = ctx.temperature_c;
        let min = day.min_c(temp);
        let max = day.max_c(temp);

        if max - min >= WIDE_SPREAD_C {
            vec!["🌡️ 昼夜温差大，建议洋葱式穿搭，方便增减".to_string()]
        } else if (temp - min).abs() >= LARGE_SHIFT_C || (temp - max).abs() >= LARGE_SHIFT_C {
            vec!["📈 气温变化较大，建议准备备用衣物".to_string()]
        } else {
            Vec::new()
        }
    }
}
