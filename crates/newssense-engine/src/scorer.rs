//! Lexicon-based polarity scorer tuned for market news.

use crate::error::EngineError;

/// Produces a polarity score in `[-1.0, 1.0]` for a piece of text.
pub trait SentimentScorer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EngineError::Inference`] if the backing model fails.
    fn score(&self, text: &str) -> Result<f32, EngineError>;
}

/// Market-news word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("beat", 0.4),
    ("beats", 0.4),
    ("boost", 0.3),
    ("boosts", 0.3),
    ("bullish", 0.5),
    ("climb", 0.3),
    ("climbs", 0.3),
    ("gain", 0.3),
    ("gains", 0.3),
    ("good", 0.3),
    ("great", 0.4),
    ("growth", 0.3),
    ("high", 0.2),
    ("jump", 0.4),
    ("jumps", 0.4),
    ("optimism", 0.4),
    ("outperform", 0.4),
    ("positive", 0.4),
    ("profit", 0.3),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("rebound", 0.3),
    ("record", 0.3),
    ("rise", 0.3),
    ("rises", 0.3),
    ("soar", 0.5),
    ("soars", 0.5),
    ("strong", 0.4),
    ("surge", 0.5),
    ("surges", 0.5),
    ("upgrade", 0.4),
    ("upgraded", 0.4),
    ("win", 0.3),
    // Negative signals
    ("bankruptcy", -0.8),
    ("bearish", -0.5),
    ("concern", -0.3),
    ("concerns", -0.3),
    ("crash", -0.7),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("decline", -0.4),
    ("declines", -0.4),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("drop", -0.4),
    ("drops", -0.4),
    ("fall", -0.4),
    ("falls", -0.4),
    ("fear", -0.4),
    ("fears", -0.4),
    ("fell", -0.4),
    ("fraud", -0.7),
    ("lawsuit", -0.5),
    ("layoffs", -0.5),
    ("loss", -0.4),
    ("losses", -0.4),
    ("miss", -0.4),
    ("misses", -0.4),
    ("missed", -0.4),
    ("missing", -0.4),
    ("plunge", -0.6),
    ("plunges", -0.6),
    ("recall", -0.5),
    ("recession", -0.6),
    ("selloff", -0.5),
    ("slide", -0.4),
    ("slides", -0.4),
    ("slump", -0.5),
    ("tumble", -0.5),
    ("tumbles", -0.5),
    ("warning", -0.4),
    ("weak", -0.4),
    ("worst", -0.6),
];

/// Words that flip the polarity of the next two words.
const NEGATORS: &[&str] = &["no", "not", "never", "without", "didn't", "don't", "isn't", "wasn't"];

/// Scale applied to a negated weight.
const NEGATION_SCALE: f32 = -0.75;

/// Score a text string using the market lexicon.
///
/// Splits text into lowercase words, sums matching weights (flipped and damped
/// when one of the two preceding words is a negator), and clamps the result to
/// `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic() && c != '\'')
                .to_lowercase()
        })
        .collect();

    let mut score = 0.0_f32;
    for (i, w) in words.iter().enumerate() {
        let Some(&(_, weight)) = LEXICON.iter().find(|(lex_word, _)| lex_word == w) else {
            continue;
        };
        let negated = words[i.saturating_sub(2)..i]
            .iter()
            .any(|prev| NEGATORS.contains(&prev.as_str()));
        score += if negated {
            weight * NEGATION_SCALE
        } else {
            weight
        };
    }
    score.clamp(-1.0, 1.0)
}

/// Default [`SentimentScorer`] backed by [`lexicon_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl SentimentScorer for LexiconSentiment {
    fn score(&self, text: &str) -> Result<f32, EngineError> {
        Ok(lexicon_score(text))
    }
}
