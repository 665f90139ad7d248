//! Lexicon-based polarity scoring.
//!
//! Each word with a known polarity contributes one value; intensifiers scale
//! the next polar word and negators flip and dampen it. The score is the mean
//! of all contributions, clamped to `[-1.0, 1.0]`. Text without polar words
//! scores `0.0`.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("affordable", 0.3),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("clean", 0.36),
    ("cool", 0.35),
    ("easy", 0.43),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.6),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("interesting", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("recommend", 0.4),
    ("reliable", 0.5),
    ("simple", 0.2),
    ("success", 0.3),
    ("successful", 0.75),
    ("thanks", 0.2),
    ("useful", 0.3),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("worth", 0.3),
    // negative
    ("angry", -0.5),
    ("annoyed", -0.6),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("buggy", -0.5),
    ("confusing", -0.3),
    ("crap", -0.8),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("expensive", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("frustrated", -0.7),
    ("frustrating", -0.4),
    ("hard", -0.3),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("impossible", -0.67),
    ("nightmare", -0.5),
    ("overpriced", -0.5),
    ("painful", -0.7),
    ("poor", -0.4),
    ("problem", -0.2),
    ("sad", -0.5),
    ("scam", -0.6),
    ("slow", -0.3),
    ("stressful", -0.5),
    ("struggling", -0.4),
    ("stupid", -0.8),
    ("sucks", -0.3),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("ugly", -0.7),
    ("useless", -0.5),
    ("waste", -0.2),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("kinda", 0.7),
    ("quite", 1.1),
    ("really", 1.2),
    ("slightly", 0.5),
    ("so", 1.2),
    ("somewhat", 0.7),
    ("super", 1.3),
    ("too", 1.2),
    ("totally", 1.3),
    ("very", 1.3),
];

const NEGATORS: &[&str] = &[
    "aren't", "cannot", "can't", "cant", "didn't", "didnt", "doesn't", "doesnt", "don't", "dont",
    "isn't", "isnt", "never", "no", "not", "wasn't", "won't", "wont",
];

/// Non-polar words a negator or intensifier stays active across.
const MODIFIER_REACH: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

static DEFAULT_SCORER: Lazy<SentimentScorer> = Lazy::new(SentimentScorer::new);

/// Scores `text` with the built-in lexicon.
pub fn polarity(text: &str) -> f64 {
    DEFAULT_SCORER.score(text)
}

#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: HashSet<String>,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON
                .iter()
                .map(|(word, value)| (word.to_string(), *value))
                .collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(word, factor)| (word.to_string(), *factor))
                .collect(),
            negators: NEGATORS.iter().map(|word| word.to_string()).collect(),
        }
    }

    /// Adds or overrides a word's polarity. Values are clamped to [-1, 1].
    pub fn with_word(mut self, word: &str, polarity: f64) -> Self {
        self.lexicon
            .insert(word.to_lowercase(), polarity.clamp(-1.0, 1.0));
        self
    }

    pub fn score(&self, text: &str) -> f64 {
        let mut contributions = Vec::new();
        let mut factor = 1.0;
        let mut negated = false;
        let mut gap = 0;

        for token in tokenize(text) {
            if self.negators.contains(&token) {
                negated = true;
                gap = 0;
            } else if let Some(scale) = self.intensifiers.get(&token) {
                factor *= scale;
                gap = 0;
            } else if let Some(value) = self.lexicon.get(&token) {
                let mut contribution = value * factor;
                if negated {
                    contribution *= NEGATION_FACTOR;
                }
                contributions.push(contribution.clamp(-1.0, 1.0));
                factor = 1.0;
                negated = false;
                gap = 0;
            } else {
                gap += 1;
                if gap > MODIFIER_REACH {
                    factor = 1.0;
                    negated = false;
                }
            }
        }

        if contributions.is_empty() {
            return 0.0;
        }
        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|raw| raw.replace('\u{2019}', "'").trim_matches('\'').to_lowercase())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_beats_negative() {
        assert!(polarity("I love this") > polarity("I hate this"));
        assert!(polarity("I love this") > 0.0);
        assert!(polarity("I hate this") < 0.0);
    }

    #[test]
    fn test_neutral_and_empty_text() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("The meeting is on Tuesday"), 0.0);
    }

    #[test]
    fn test_intensifier_strengthens() {
        assert!(polarity("this is very good") > polarity("this is good"));
        assert!(polarity("this is extremely bad") < polarity("this is bad"));
    }

    #[test]
    fn test_negation_flips() {
        assert!(polarity("this is not good") < 0.0);
        assert!(polarity("I don't hate it") > 0.0);
        assert!(polarity("I don’t hate it") > 0.0);
    }

    #[test]
    fn test_negation_expires() {
        let far = polarity("not that i would ever say it is good");
        assert!(far > 0.0);
    }

    #[test]
    fn test_range_is_clamped() {
        let score = polarity("absolutely extremely incredibly perfect perfect awesome");
        assert!(score <= 1.0);
        let score = polarity("extremely extremely terrible horrible awful worst");
        assert!(score >= -1.0);
    }

    #[test]
    fn test_mixed_text_averages() {
        let score = polarity("great product but terrible support");
        assert!(score > -1.0 && score < 0.8);
    }

    #[test]
    fn test_custom_words() {
        let scorer = SentimentScorer::new().with_word("Gamechanger", 2.0);
        assert_eq!(scorer.score("a real gamechanger"), 1.0);
    }
}
