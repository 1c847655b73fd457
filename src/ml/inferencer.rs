// ============================================================
// Layer 5 — Inferencer (the Q&A model collaborator)
// ============================================================
// Implements QaModel on top of the burn SpanEncoder.
//
// For one (question, context):
//   1. Tokenise both; the context is cut into overlapping
//      windows that fit  [CLS] q [SEP] window [SEP]
//   2. Per window: forward pass, softmax over start and end
//      logits, best span = argmax p_start[s] * p_end[e]
//      with s <= e < s + MAX_ANSWER_LEN, inside the window
//   3. The null answer scores p_start[0] * p_end[0] (the
//      [CLS] position)
//   4. Best span over all windows wins. The null score is the
//      lowest over windows: a window without the answer always
//      votes for null. If the null score beats the best span,
//      the answer is the "[CLS]" marker
//
// Confidence is the winning span's probability, in [0, 1].
//
// Reference: Devlin et al. (2019) BERT — SQuAD 2.0 null answer
//            Burn Book §3 (Tensors)

use anyhow::{Context, Result};
use burn::prelude::*;
use std::ops::Range;
use tokenizers::Tokenizer;

use crate::data::chunker::Chunker;
use crate::domain::answer::ModelAnswer;
use crate::domain::traits::QaModel;
use crate::error::ModelError;
use crate::infra::checkpoint::CheckpointStore;
use crate::infra::tokenizer_store::{TokenizerStore, CLS_ID, SEP_ID};
use crate::ml::model::SpanEncoder;

type InferBackend = burn::backend::Wgpu;

/// Longest answer span considered, in tokens
const MAX_ANSWER_LEN: usize = 30;

/// Text returned when the null answer wins
pub const NULL_SPAN: &str = "[CLS]";

pub struct Inferencer {
    model:       SpanEncoder<InferBackend>,
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    device:      burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Load weights and tokenizer from a checkpoint directory.
    /// Called once per process; the model is then lent to the resolver.
    pub fn load(checkpoint_dir: &str) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();

        let store          = CheckpointStore::new(checkpoint_dir);
        let (model, shape) = store.load_model::<InferBackend>(&device)?;
        let tokenizer      = TokenizerStore::new(checkpoint_dir)
            .load()
            .context("Q&A model needs the tokenizer saved with its checkpoint")?;

        tracing::info!(
            "Q&A model ready: {} layers, d_model={}, max_seq_len={}",
            shape.num_layers,
            shape.d_model,
            shape.max_seq_len
        );
        Ok(Self { model, tokenizer, max_seq_len: shape.max_seq_len, device })
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, ModelError> {
        self.tokenizer
            .encode(text, false)
            .map(|enc| enc.get_ids().to_vec())
            .map_err(|e| ModelError::Tokenization(e.to_string()))
    }

    /// Run one window and return its best span and null score.
    fn score_window(&self, question: &[u32], window: &[u32]) -> Result<WindowScore, ModelError> {
        // [CLS] question [SEP] window [SEP]
        let mut ids = Vec::with_capacity(question.len() + window.len() + 3);
        ids.push(CLS_ID);
        ids.extend_from_slice(question);
        ids.push(SEP_ID);
        let ctx_start = ids.len();
        ids.extend_from_slice(window);
        let ctx_end = ids.len();
        ids.push(SEP_ID);

        let flat: Vec<i32> = ids.iter().map(|&id| id as i32).collect();
        let input = Tensor::<InferBackend, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .unsqueeze::<2>();

        let logits = self.model.forward(input);
        let start  = probabilities(logits.start)?;
        let end    = probabilities(logits.end)?;

        let null = start[0] * end[0];
        let best = best_span(&start, &end, ctx_start..ctx_end)
            // Shift back to positions inside `window`
            .map(|s| SpanScore { start: s.start - ctx_start, end: s.end - ctx_start, score: s.score });

        Ok(WindowScore { best, null })
    }
}

impl QaModel for Inferencer {
    fn answer(&self, question: &str, context: &str) -> Result<ModelAnswer, ModelError> {
        if question.trim().is_empty() || context.trim().is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let q_ids   = self.encode(question)?;
        let ctx_ids = self.encode(context)?;

        // Room left for context after [CLS] q [SEP] ... [SEP]
        let budget = self.max_seq_len.saturating_sub(q_ids.len() + 3);
        if budget < 2 || ctx_ids.is_empty() {
            return Err(ModelError::Inference(format!(
                "question of {} tokens leaves no room for context (max_seq_len={})",
                q_ids.len(),
                self.max_seq_len
            )));
        }

        let chunker = Chunker::new(budget, (budget / 4).min(128));

        let mut scores = Vec::new();
        for window in chunker.windows(ctx_ids.len()) {
            let scored = self.score_window(&q_ids, &ctx_ids[window.clone()])?;
            scores.push((window.start, scored));
        }

        let (span, score) = match pick_answer(&scores) {
            Pick::Span(span, score) => (span, score),
            Pick::Null(null) => {
                tracing::debug!(null_score = null, "null span wins");
                return Ok(ModelAnswer::new(NULL_SPAN, null));
            }
        };

        let text = self
            .tokenizer
            .decode(&ctx_ids[span.clone()], true)
            .map_err(|e| ModelError::Tokenization(e.to_string()))?;

        tracing::debug!("Span {:?} conf={:.4} answer='{}'", span, score, text);
        Ok(ModelAnswer::new(text.trim(), score))
    }

    fn empty_span_marker(&self) -> Option<&str> {
        Some(NULL_SPAN)
    }
}

fn probabilities(logits: Tensor<InferBackend, 2>) -> Result<Vec<f32>, ModelError> {
    burn::tensor::activation::softmax(logits, 1)
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| ModelError::Inference(format!("{e:?}")))
}

// ─── Span selection ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq)]
struct SpanScore {
    /// Inclusive token positions
    start: usize,
    end:   usize,
    score: f32,
}

struct WindowScore {
    best: Option<SpanScore>,
    null: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Pick {
    /// Token range into the whole context, and its probability
    Span(Range<usize>, f32),
    Null(f32),
}

/// Combine per-window scores; each entry is (window offset, score).
/// The best span over all windows is compared with the lowest null
/// score over all windows.
fn pick_answer(windows: &[(usize, WindowScore)]) -> Pick {
    let mut best: Option<(Range<usize>, f32)> = None;
    let mut null = f32::INFINITY;

    for (offset, scored) in windows {
        null = null.min(scored.null);

        if let Some(span) = scored.best {
            if best.as_ref().map_or(true, |(_, s)| span.score > *s) {
                best = Some((offset + span.start..offset + span.end + 1, span.score));
            }
        }
    }

    match best {
        Some((span, score)) if score >= null => Pick::Span(span, score),
        _ if null.is_finite() => Pick::Null(null),
        _ => Pick::Null(0.0),
    }
}

/// Highest p_start[s] * p_end[e] with s <= e < s + MAX_ANSWER_LEN,
/// both inside `range`. `None` for an empty range.
fn best_span(start: &[f32], end: &[f32], range: Range<usize>) -> Option<SpanScore> {
    let limit = range.end.min(start.len()).min(end.len());
    let mut best: Option<SpanScore> = None;

    for s in range.start..limit {
        for e in s..(s + MAX_ANSWER_LEN).min(limit) {
            let score = start[s] * end[e];
            if best.map_or(true, |b| score > b.score) {
                best = Some(SpanScore { start: s, end: e, score });
            }
        }
    }
    best
}
