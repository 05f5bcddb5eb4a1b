//! Text embedding back-ends.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::EngineError;
use crate::http::{build_client, post_json};

/// Fixed-length vector for one document or query.
pub type Embedding = Vec<f32>;

/// Turns text into fixed-dimension vectors.
///
/// Implementations are loaded once per process and shared read-only across
/// analysis calls, so they must be `Send + Sync`.
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder returns.
    fn dim(&self) -> usize;

    /// Embed a batch of texts, one vector per input in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Inference`] if the model cannot embed the batch.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EngineError>;

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Same as [`Embedder::embed_batch`].
    fn embed(&self, text: &str) -> Result<Embedding, EngineError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::Inference {
                stage: "embedding",
                reason: "embedder returned no vector".to_string(),
            })
    }
}

/// Maximum number of texts per `/embed` call.
const TEI_BATCH_SIZE: usize = 64;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
    truncate: bool,
}

/// Sentence encoder served by a Text Embeddings Inference (TEI) server,
/// e.g. `all-MiniLM-L6-v2` at 384 dimensions.
///
/// Blocking; build and call it off the async runtime threads.
#[derive(Debug, Clone)]
pub struct TeiEmbedder {
    client: Client,
    url: String,
    dim: usize,
}

impl TeiEmbedder {
    /// `dim` must match the served model; vectors of another length are
    /// rejected when the index is built.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, dim: usize, timeout: Duration) -> Result<Self, EngineError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: format!("{}/embed", base_url.trim_end_matches('/')),
            dim,
        })
    }
}

impl Embedder for TeiEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    /// Texts are sent in groups of 64 per request.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EngineError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(TEI_BATCH_SIZE) {
            let request = EmbedRequest {
                inputs: chunk,
                truncate: true,
            };
            let embeddings: Vec<Embedding> =
                post_json(&self.client, &self.url, &request, "embedding")?;

            if embeddings.len() != chunk.len() {
                return Err(EngineError::Inference {
                    stage: "embedding",
                    reason: format!(
                        "TEI returned {} embeddings for {} inputs",
                        embeddings.len(),
                        chunk.len()
                    ),
                });
            }
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}

/// Weight of an adjacent-token bigram relative to a unigram.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Signed feature hashing over whitespace tokens and adjacent bigrams.
///
/// Lexical only: texts that share no words land near each other only by
/// bucket collision. Used when no embedding service is configured.
///
/// Each feature is hashed with SHA-256; the first eight bytes pick the bucket
/// and the top bit picks the sign. Vectors are L2-normalized, and text with no
/// tokens embeds to the zero vector. Output is identical across platforms and
/// runs.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// A `dim` of zero is raised to one.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut v = vec![0.0_f32; self.dim];
        let tokens: Vec<&str> = text.split_whitespace().collect();

        for token in &tokens {
            self.add_feature(&mut v, token.as_bytes(), 1.0);
        }
        for pair in tokens.windows(2) {
            let feature = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut v, feature.as_bytes(), BIGRAM_WEIGHT);
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }

    fn add_feature(&self, v: &mut [f32], feature: &[u8], weight: f32) {
        let hash = Sha256::digest(feature);
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(&hash[..8]);
        let h = u64::from_be_bytes(bytes);
        // Remainder is < dim, which is a usize.
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (h % self.dim as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        v[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EngineError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
