use serde::{Deserialize, Serialize};

/// Ordered advisory lines, in rule evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryList(Vec<String>);

impl AdvisoryList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, advisory: impl Into<String>) {
        self.0.push(advisory.into());
    }

    pub fn extend<I, S>(&mut self, advisories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(advisories.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn contains(&self, advisory: &str) -> bool {
        self.0.iter().any(|a| a == advisory)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for AdvisoryList {
    fn from(advisories: Vec<String>) -> Self {
        Self(advisories)
    }
}

impl<'a> IntoIterator for &'a AdvisoryList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
