//! Length-bounded summarizers: a local extractive one and a client for a
//! hosted abstractive model.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::http::{build_client, post_json};
use crate::normalize::tokenize;
use crate::stopwords::is_stop_word;

/// Produces a shorter rendition of a text.
pub trait Summarizer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EngineError::Inference`] if the backing model fails.
    fn summarize(&self, text: &str) -> Result<String, EngineError>;
}

/// Length policy shared by summarizer back-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    /// Texts with fewer whitespace tokens than this are returned unchanged.
    pub short_text_tokens: usize,
    /// Upper cap on summary tokens; the effective cap is `min(max_tokens, tokens / 2)`.
    pub max_tokens: usize,
    /// Floor on summary tokens when the source is long enough to allow it.
    pub min_tokens: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            short_text_tokens: 50,
            max_tokens: 50,
            min_tokens: 10,
        }
    }
}

impl SummaryLimits {
    /// Target `(min, max)` token counts for a text of `tokens` words.
    #[must_use]
    pub fn bounds(&self, tokens: usize) -> (usize, usize) {
        let max = self.max_tokens.min(tokens / 2).max(1);
        let min = self.min_tokens.min(max);
        (min, max)
    }
}

/// Picks the highest-scoring sentences by content-word frequency and emits
/// them in their original order, within [`SummaryLimits::bounds`].
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSummarizer {
    limits: SummaryLimits,
}

impl ExtractiveSummarizer {
    #[must_use]
    pub fn new(limits: SummaryLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> SummaryLimits {
        self.limits
    }

    fn extract(&self, text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < self.limits.short_text_tokens {
            return text.to_string();
        }
        let (min, max) = self.limits.bounds(words.len());

        let sentences = split_sentences(&words);
        let frequencies = content_frequencies(text);

        let mut ranked: Vec<(usize, f32)> = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| (i, sentence_score(s, &frequencies)))
            .collect();
        // Highest score first; earlier sentence wins ties.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut chosen: Vec<usize> = Vec::new();
        let mut used = 0;
        for &(i, _) in &ranked {
            let len = sentences[i].len();
            if used + len <= max {
                chosen.push(i);
                used += len;
            }
            if used >= min {
                break;
            }
        }
        chosen.sort_unstable();

        let mut out: Vec<&str> = chosen
            .iter()
            .flat_map(|&i| sentences[i].iter().copied())
            .collect();

        // No whole sentence fits (or too little was picked): fall back to the
        // leading words of the best sentence, topped up from the text.
        if out.len() < min {
            let best = ranked.first().map_or(0, |&(i, _)| i);
            out = sentences[best..]
                .iter()
                .flat_map(|s| s.iter().copied())
                .chain(sentences[..best].iter().flat_map(|s| s.iter().copied()))
                .take(max)
                .collect();
        }

        out.join(" ")
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, text: &str) -> Result<String, EngineError> {
        Ok(self.extract(text))
    }
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
    parameters: SummarizeParameters,
}

#[derive(Serialize)]
struct SummarizeParameters {
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Abstractive summarizer (e.g. `t5-small`) behind an HTTP endpoint that
/// speaks the Hugging Face inference shape: `{"inputs", "parameters"}` in,
/// `[{"summary_text"}]` out.
///
/// Texts under the short-text threshold are returned without a request.
/// Blocking; build and call it off the async runtime threads.
#[derive(Debug, Clone)]
pub struct RemoteSummarizer {
    client: Client,
    url: String,
    limits: SummaryLimits,
}

impl RemoteSummarizer {
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] if the HTTP client cannot be built.
    pub fn new(url: &str, limits: SummaryLimits, timeout: Duration) -> Result<Self, EngineError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.trim_end_matches('/').to_string(),
            limits,
        })
    }
}

impl Summarizer for RemoteSummarizer {
    fn summarize(&self, text: &str) -> Result<String, EngineError> {
        let tokens = text.split_whitespace().count();
        if tokens < self.limits.short_text_tokens {
            return Ok(text.to_string());
        }
        let (min_length, max_length) = self.limits.bounds(tokens);
        let request = SummarizeRequest {
            inputs: text,
            parameters: SummarizeParameters {
                min_length,
                max_length,
                do_sample: false,
            },
        };

        let outputs: Vec<SummaryOutput> = post_json(&self.client, &self.url, &request, "summary")?;
        outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EngineError::Inference {
                stage: "summary",
                reason: "service returned no summary".to_string(),
            })
    }
}

/// Group whitespace tokens into sentences ending at `.`, `!` or `?`.
fn split_sentences<'a>(words: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for &word in words {
        current.push(word);
        let ends = word
            .trim_end_matches(['"', '\'', ')', '’', '”'])
            .ends_with(['.', '!', '?']);
        if ends {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

fn content_frequencies(text: &str) -> HashMap<String, f32> {
    let mut counts: HashMap<String, f32> = HashMap::new();
    for token in tokenize(text) {
        let lower = token.to_lowercase();
        if lower.chars().any(char::is_alphanumeric) && !is_stop_word(&lower) {
            *counts.entry(lower).or_insert(0.0) += 1.0;
        }
    }
    let peak = counts.values().copied().fold(0.0_f32, f32::max);
    if peak > 0.0 {
        for v in counts.values_mut() {
            *v /= peak;
        }
    }
    counts
}

/// Mean normalized frequency of the sentence's content words.
fn sentence_score(sentence: &[&str], frequencies: &HashMap<String, f32>) -> f32 {
    let mut total = 0.0_f32;
    let mut n = 0_u16;
    for word in sentence {
        for token in tokenize(word) {
            if let Some(f) = frequencies.get(&token.to_lowercase()) {
                total += f;
                n = n.saturating_add(1);
            }
        }
    }
    if n == 0 {
        0.0
    } else {
        total / f32::from(n)
    }
}
