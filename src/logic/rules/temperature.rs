use super::{Rule, RuleContext};
use rand::RngCore;

/// Clothing weight by current temperature, one band per reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Freezing,
    Cold,
    Cool,
    Mild,
    Comfortable,
    Warm,
    Hot,
}

impl TemperatureBand {
    pub fn from_celsius(temp_c: i32) -> Self {
        match temp_c {
            i32::MIN..=0 => TemperatureBand::Freezing,
            1..=10 => TemperatureBand::Cold,
            11..=15 => TemperatureBand::Cool,
            16..=20 => TemperatureBand::Mild,
            21..=25 => TemperatureBand::Comfortable,
            26..=30 => TemperatureBand::Warm,
            _ => TemperatureBand::Hot,
        }
    }

    pub fn advice(&self) -> [&'static str; 2] {
        match self {
            TemperatureBand::Freezing => [
                "🧥 建议穿厚羽绒服、棉衣，做好防寒保暖",
                "🧤 记得戴帽子、手套、围巾",
            ],
            TemperatureBand::Cold => [
                "🧥 建议穿厚外套、毛衣或薄羽绒服",
                "👖 可以穿厚裤子或加绒裤",
            ],
            TemperatureBand::Cool => [
                "🧥 建议穿薄外套、卫衣或针织衫",
                "👕 里面可以穿长袖T恤",
            ],
            TemperatureBand::Mild => [
                "👕 建议穿长袖衬衫、薄毛衣或薄外套",
                "👖 可以穿长裤或薄款休闲裤",
            ],
            TemperatureBand::Comfortable => [
                "👕 建议穿长袖T恤、衬衫或薄外套",
                "☀️ 温度适宜，注意适当增减衣物",
            ],
            TemperatureBand::Warm => [
                "👕 建议穿短袖T恤、衬衫或薄款上衣",
                "🩳 可以穿短裤、薄款长裤或裙子",
            ],
            TemperatureBand::Hot => [
                "👕 建议穿清爽的短袖、薄款衣物",
                "🌡️ 天气较热，选择透气性好的衣物",
            ],
        }
    }
}

pub struct TemperatureBandRule;

impl Rule for TemperatureBandRule {
    fn id(&self) -> &'static str {
        "temperature_band"
    }

    fn name(&self) -> &'static str {
        "Temperature Band"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _rng: &mut dyn RngCore) -> Vec<String> {
        TemperatureBand::from_celsius(ctx.temperature_c)
            .advice()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
