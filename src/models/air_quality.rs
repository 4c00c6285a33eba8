use serde::{Deserialize, Serialize};

/// China HJ 633 AQI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Unknown,
    Excellent,
    Good,
    LightlyPolluted,
    ModeratelyPolluted,
    HeavilyPolluted,
    SeverelyPolluted,
}

impl AqiLevel {
    pub fn classify(aqi: Option<u32>) -> Self {
        match aqi {
            None => AqiLevel::Unknown,
            Some(0..=50) => AqiLevel::Excellent,
            Some(51..=100) => AqiLevel::Good,
            Some(101..=150) => AqiLevel::LightlyPolluted,
            Some(151..=200) => AqiLevel::ModeratelyPolluted,
            Some(201..=300) => AqiLevel::HeavilyPolluted,
            Some(_) => AqiLevel::SeverelyPolluted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiLevel::Unknown => "未知",
            AqiLevel::Excellent => "优",
            AqiLevel::Good => "良",
            AqiLevel::LightlyPolluted => "轻度污染",
            AqiLevel::ModeratelyPolluted => "中度污染",
            AqiLevel::HeavilyPolluted => "重度污染",
            AqiLevel::SeverelyPolluted => "严重污染",
        }
    }

    /// Display color as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            AqiLevel::Unknown => "#999999",
            AqiLevel::Excellent => "#00e400",
            AqiLevel::Good => "#ffff00",
            AqiLevel::LightlyPolluted => "#ff7e00",
            AqiLevel::ModeratelyPolluted => "#ff0000",
            AqiLevel::HeavilyPolluted => "#8f3f97",
            AqiLevel::SeverelyPolluted => "#7e0023",
        }
    }
}

impl std::fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_band_edges() {
        assert_eq!(AqiLevel::classify(None), AqiLevel::Unknown);
        assert_eq!(AqiLevel::classify(Some(0)), AqiLevel::Excellent);
        assert_eq!(AqiLevel::classify(Some(50)), AqiLevel::Excellent);
        assert_eq!(AqiLevel::classify(Some(51)), AqiLevel::Good);
        assert_eq!(AqiLevel::classify(Some(100)), AqiLevel::Good);
        assert_eq!(AqiLevel::classify(Some(101)), AqiLevel::LightlyPolluted);
        assert_eq!(AqiLevel::classify(Some(150)), AqiLevel::LightlyPolluted);
        assert_eq!(AqiLevel::classify(Some(151)), AqiLevel::ModeratelyPolluted);
        assert_eq!(AqiLevel::classify(Some(200)), AqiLevel::ModeratelyPolluted);
        assert_eq!(AqiLevel::classify(Some(201)), AqiLevel::HeavilyPolluted);
        assert_eq!(AqiLevel::classify(Some(300)), AqiLevel::HeavilyPolluted);
        assert_eq!(AqiLevel::classify(Some(301)), AqiLevel::SeverelyPolluted);
        assert_eq!(AqiLevel::classify(Some(u32::MAX)), AqiLevel::SeverelyPolluted);
    }

    #[test]
    fn level_labels_and_colors() {
        assert_eq!(AqiLevel::Unknown.as_str(), "未知");
        assert_eq!(AqiLevel::Unknown.color(), "#999999");
        assert_eq!(AqiLevel::Excellent.color(), "#00e400");
        assert_eq!(AqiLevel::SeverelyPolluted.to_string(), "严重污染");
        assert_eq!(AqiLevel::SeverelyPolluted.color(), "#7e0023");
    }
}
