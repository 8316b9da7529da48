//! Model-specific tokenizers.
//!
//! Decoding is byte-lossy at window edges: a window boundary may fall inside
//! a multi-byte character, in which case the partial bytes decode to U+FFFD.
//! ASCII text always round-trips exactly.

use tiktoken_rs::CoreBPE;

use crate::chunking::error::{ChunkError, ChunkResult};

/// Encodes text into token ids and back.
///
/// Implementations must be deterministic and safe to share across threads.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>>;

    fn decode(&self, tokens: &[u32]) -> ChunkResult<String>;
}

/// Byte-pair-encoding tokenizer matching an OpenAI model's vocabulary.
pub struct BpeTokenizer {
    model: String,
    bpe: CoreBPE,
}

impl BpeTokenizer {
    /// Load the BPE ranks for `model` (e.g. `gpt-4o-mini` selects `o200k_base`).
    pub fn for_model(model: &str) -> ChunkResult<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| ChunkError::TokenizerLoad {
            model: model.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> ChunkResult<Vec<u32>> {
        // Special-token markup in book text is treated as plain text.
        Ok(self.bpe.encode_ordinary(text))
    }

    fn decode(&self, tokens: &[u32]) -> ChunkResult<String> {
        // Raw token bytes; the strict `CoreBPE::decode` rejects split characters.
        let bytes: Vec<u8> = self
            .bpe
            ._decode_native_and_split(tokens.to_vec())
            .flatten()
            .collect();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer")
            .field("model", &self.model)
            .finish()
    }
}

/// Math letters, emoji and hieroglyphs: o200k_base encodes these to
/// byte-level tokens that split code points.
#[cfg(test)]
pub(crate) const SPLIT_PRONE: &str = "𝔘𝔫𝔦𝔠𝔬𝔡𝔢 🧑\u{200d}🚀🦩🪼 鱲鱳鱴 ꙮ 𓀀𓀁 Ǆ";
