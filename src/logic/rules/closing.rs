use super::{Rule, RuleContext};
use chrono::Datelike;
use rand::{seq::SliceRandom, RngCore};

pub const DEFAULT_GREETING_NAME: &str = "黄雨珏同学";

pub fn default_tips() -> Vec<String> {
    [
        "💝 和huhu一样无忧无虑",
        "🌈 每天都要开开心心哒",
        "💪 今天也要努力！",
        "🎯 愿你每一天都很美好",
        "✨ 小麻雀生活愉快",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Last line of the advice block
///
/// On the first local day of a month this is a greeting naming the month;
/// otherwise one tip drawn from the pool with the supplied RNG.
pub struct ClosingLineRule {
    greeting_name: String,
    tips: Vec<String>,
}

impl ClosingLineRule {
    /// Blank tips are dropped; an empty pool falls back to `default_tips`
    pub fn new(greeting_name: impl Into<String>, tips: Vec<String>) -> Self {
        let mut tips: Vec<String> = tips
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        if tips.is_empty() {
            tips = default_tips();
        }

        Self {
            greeting_name: greeting_name.into(),
            tips,
        }
    }

    pub fn greeting(&self, month: u32) -> String {
        format!("🎉 {}月快乐！{}！", month, self.greeting_name)
    }

    #[cfg(test)]
    pub fn tips(&self) -> &[String] {
        &self.tips
    }
}

impl Default for ClosingLineRule {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING_NAME, default_tips())
    }
}

impl Rule for ClosingLineRule {
    fn id(&self) -> &'static str {
        "closing_line"
    }

    fn name(&self) -> &'static str {
        "Closing Line"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, rng: &mut dyn RngCore) -> Vec<String> {
        if ctx.local_time.day() == 1 {
            return vec![self.greeting(ctx.local_time.month())];
        }

        self.tips.choose(rng).cloned().into_iter().collect()
    }
}
