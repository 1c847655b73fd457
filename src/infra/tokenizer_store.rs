// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the tokenizer that was saved next to the checkpoint.
// Inference must use the exact vocabulary the weights were
// trained with, so there is no fallback to a default one.
//
// Special token ids follow the BERT convention the encoder
// was trained with.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load `tokenizer.json` and check it knows the special tokens.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Cannot load tokenizer from '{}'", path.display()))?;

        for (token, id) in [("[CLS]", CLS_ID), ("[SEP]", SEP_ID)] {
            if tokenizer.token_to_id(token) != Some(id) {
                anyhow::bail!(
                    "Tokenizer '{}' maps {} to {:?}, expected {}",
                    path.display(),
                    token,
                    tokenizer.token_to_id(token),
                    id
                );
            }
        }

        tracing::info!(
            "Tokenizer loaded ({} tokens)",
            tokenizer.get_vocab_size(true)
        );
        Ok(tokenizer)
    }
}
