use super::{Rule, RuleContext};
use rand::RngCore;

pub const HUMID_PERCENT: i32 = 80;
pub const DRY_PERCENT: i32 = 30;

pub struct HumidityRule;

impl Rule for HumidityRule {
    fn id(&self) -> &'static str {
        "humidity"
    }

    fn name(&self) -> &'static str {
        "Humidity"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _rng: &mut dyn RngCore) -> Vec<String> {
        if ctx.humidity_percent >= HUMID_PERCENT {
            vec!["💧 湿度较高，选择透气吸汗的材质".to_string()]
        } else if ctx.humidity_percent <= DRY_PERCENT {
            vec!["💧 空气干燥，注意补水和润肤".to_string()]
        } else {
            Vec::new()
        }
    }
}
