// ============================================================
// Layer 6 — Checkpoint Store
// ============================================================
// Loads the Q&A model's weights and architecture from disk.
//
// Checkpoint directory layout:
//   checkpoints/
//     train_config.json    ← architecture (d_model, num_layers, ...)
//     latest_epoch.json    ← number of the newest weights file
//     model_epoch_N.mpk.gz ← burn CompactRecorder record
//     tokenizer.json       ← see tokenizer_store.rs
//
// train_config.json may hold more than the architecture
// (training hyper-parameters, data paths); only the fields of
// EncoderShape are read, the rest is ignored.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::ml::model::{SpanEncoder, SpanEncoderConfig};

/// The architecture fields of train_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderShape {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
}

impl From<EncoderShape> for SpanEncoderConfig {
    fn from(s: EncoderShape) -> Self {
        SpanEncoderConfig::new(
            s.vocab_size, s.max_seq_len, s.d_model,
            s.num_heads, s.num_layers, s.d_ff,
        )
    }
}

pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the architecture from train_config.json.
    pub fn load_shape(&self) -> Result<EncoderShape> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read model config '{}'", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid model config '{}'", path.display()))
    }

    /// Build the encoder described by the checkpoint and load
    /// the newest weights into it.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<(SpanEncoder<B>, EncoderShape)> {
        let shape = self.load_shape()?;
        let model = SpanEncoderConfig::from(shape.clone()).init::<B>(device);

        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));
        tracing::info!("Loading model weights from '{}'", path.display());

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load weights '{}'", path.display()))?;

        Ok((model.load_record(record), shape))
    }

    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str::<usize>(s.trim())
            .with_context(|| format!("Invalid epoch number in '{}'", path.display()))
    }
}
