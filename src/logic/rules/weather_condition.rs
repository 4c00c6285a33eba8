use super::{Rule, RuleContext};
use crate::logic::keywords::{ConditionTag, KeywordTable};
use rand::RngCore;

/// Beaufort scale at which wind advice applies regardless of condition text
pub const STRONG_WIND_SCALE: i32 = 4;

/// Special-weather advice, one category at most
///
/// Priority: rain/thunder, snow, wind (keyword or scale >= 4), sun, fog/haze.
/// Rain with strong wind therefore only reports rain.
pub struct WeatherConditionRule {
    keywords: KeywordTable,
}

impl WeatherConditionRule {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    /// The single category that drives advice for this reading
    pub fn classify(&self, text: &str, wind_scale: i32) -> Option<ConditionTag> {
        if self.keywords.matches(ConditionTag::Rain, text) {
            Some(ConditionTag::Rain)
        } else if self.keywords.matches(ConditionTag::Snow, text) {
            Some(ConditionTag::Snow)
        } else if self.keywords.matches(ConditionTag::Wind, text) || wind_scale >= STRONG_WIND_SCALE
        {
            Some(ConditionTag::Wind)
        } else if self.keywords.matches(ConditionTag::Sun, text) {
            Some(ConditionTag::Sun)
        } else if self.keywords.matches(ConditionTag::Fog, text) {
            Some(ConditionTag::Fog)
        } else {
            None
        }
    }

    fn advice(tag: ConditionTag) -> [&'static str; 2] {
        match tag {
            ConditionTag::Rain => [
                "☔ 记得带雨伞，选择防水外套",
                "👟 建议穿防滑鞋，避免穿容易湿透的鞋子",
            ],
            ConditionTag::Snow => [
                "❄️ 雪天路滑，穿防滑保暖的鞋子",
                "🧥 选择防风防水的外套",
            ],
            ConditionTag::Wind => [
                "💨 风力较大，选择贴身不易被风吹起的衣物",
                "🧢 户外活动时注意固定帽子等配饰",
            ],
            ConditionTag::Sun => [
                "☀️ 晴天阳光强，建议做好防晒措施",
                "🕶️ 可以准备太阳镜和防晒霜",
            ],
            ConditionTag::Fog => [
                "😷 雾霾天气，建议佩戴口罩",
                "🚗 能见度低，出行注意安全",
            ],
        }
    }
}

impl Default for WeatherConditionRule {
    fn default() -> Self {
        Self::new(KeywordTable::default())
    }
}

impl Rule for WeatherConditionRule {
    fn id(&self) -> &'static str {
        "weather_condition"
    }

    fn name(&self) -> &'static str {
        "Special Weather"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, _rng: &mut dyn RngCore) -> Vec<String> {
        self.classify(ctx.condition_text, ctx.wind_scale)
            .map(|tag| Self::advice(tag).iter().map(|s| s.to_string()).collect())
            .unwrap_or_default()
    }
}
