use serde::{Deserialize, Serialize};

/// Closed set of condition categories the advisory rules care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionTag {
    Rain,
    Snow,
    Wind,
    Sun,
    Fog,
}

impl ConditionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionTag::Rain => "rain",
            ConditionTag::Snow => "snow",
            ConditionTag::Wind => "wind",
            ConditionTag::Sun => "sun",
            ConditionTag::Fog => "fog",
        }
    }
}

impl std::fmt::Display for ConditionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Translates the provider's free-form condition text into tags.
///
/// Matching is case-insensitive substring containment. Every list can be
/// overridden from the `keywords` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeywordTable {
    pub rain: Vec<String>,
    pub snow: Vec<String>,
    pub wind: Vec<String>,
    pub sun: Vec<String>,
    pub fog: Vec<String>,
    /// Used by the rain alert, separately from the rain tag
    pub precipitation: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            rain: words(&["雨", "雷", "rain", "thunder", "drizzle"]),
            snow: words(&["雪", "snow", "sleet"]),
            wind: words(&["风", "wind", "gale"]),
            sun: words(&["晴", "阳", "sunny", "clear"]),
            fog: words(&["雾", "霾", "fog", "haze", "mist"]),
            precipitation: words(&[
                "雨", "雷", "阵雨", "毛毛雨", "小雨", "中雨", "大雨", "暴雨", "rain", "thunder",
                "drizzle",
            ]),
        }
    }
}

impl KeywordTable {
    pub fn keywords(&self, tag: ConditionTag) -> &[String] {
        match tag {
            ConditionTag::Rain => &self.rain,
            ConditionTag::Snow => &self.snow,
            ConditionTag::Wind => &self.wind,
            ConditionTag::Sun => &self.sun,
            ConditionTag::Fog => &self.fog,
        }
    }

    pub fn matches(&self, tag: ConditionTag, text: &str) -> bool {
        contains_any(text, self.keywords(tag))
    }
}

pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| text.contains(&k.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_condition_text_maps_to_tags() {
        let table = KeywordTable::default();
        assert!(table.matches(ConditionTag::Rain, "雷阵雨"));
        assert!(table.matches(ConditionTag::Snow, "中雪"));
        assert!(table.matches(ConditionTag::Wind, "大风"));
        assert!(table.matches(ConditionTag::Sun, "晴"));
        assert!(table.matches(ConditionTag::Fog, "霾"));
        assert!(!table.matches(ConditionTag::Sun, "阴"));
    }

    #[test]
    fn matching_ignores_case() {
        let table = KeywordTable::default();
        assert!(table.matches(ConditionTag::Sun, "Sunny"));
        assert!(table.matches(ConditionTag::Rain, "LIGHT RAIN"));
        assert!(!table.matches(ConditionTag::Rain, "Overcast"));
    }

    #[test]
    fn snow_showers_are_not_rain() {
        let table = KeywordTable::default();
        assert!(!table.matches(ConditionTag::Rain, "Snow Showers"));
        assert!(!contains_any("Snow Showers", &table.precipitation));
        assert!(table.matches(ConditionTag::Snow, "Snow Showers"));
        assert!(table.matches(ConditionTag::Rain, "Rain Showers"));
    }

    #[test]
    fn empty_keyword_never_matches() {
        assert!(!contains_any("晴", &[String::new()]));
    }

    #[test]
    fn partial_yaml_override_keeps_other_defaults() {
        let table: KeywordTable = serde_yaml::from_str("sun: [\"bright\"]").unwrap();
        assert_eq!(table.sun, vec!["bright".to_string()]);
        assert_eq!(table.rain, KeywordTable::default().rain);
    }
}
