use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::StatusLabel;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub const DEFAULT_NEGATIVE_PHRASES: [&str; 5] = [
    "no appointments are available",
    "no appointment available",
    "there are no appointments available",
    "no appointment times available",
    "currently no appointments available",
];

/// Substring heuristic over page text. Phrases are checked in order; the first hit wins.
#[derive(Debug, Clone)]
pub struct PhraseClassifier {
    negative_phrases: Vec<String>,
}

impl PhraseClassifier {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let negative_phrases = phrases
            .into_iter()
            .map(|phrase| normalize(phrase.as_ref()))
            .filter(|phrase| !phrase.is_empty())
            .collect();
        Self { negative_phrases }
    }

    pub fn phrases(&self) -> &[String] {
        &self.negative_phrases
    }

    pub fn classify(&self, page_text: &str) -> StatusLabel {
        if page_text.is_empty() {
            return StatusLabel::Unknown;
        }
        let text = normalize(page_text);
        match self
            .negative_phrases
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
        {
            Some(phrase) => {
                tracing::debug!(target: "classifier", phrase = %phrase, "negative phrase matched");
                StatusLabel::NoSlots
            }
            None => StatusLabel::PossibleSlots,
        }
    }
}

impl Default for PhraseClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATIVE_PHRASES)
    }
}

fn normalize(text: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(text.trim(), " ")
        .to_lowercase()
}
