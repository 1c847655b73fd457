// ============================================================
// Layer 5 — Span Encoder (burn)
// ============================================================
// A transformer encoder with a span head: for every input
// token it predicts how likely that token is to START the
// answer and how likely it is to END it.
//
//   ids [1, seq] → token + position embedding
//                → N × (self-attention → add&norm → GELU FFN → add&norm)
//                → final norm
//                → Linear(d_model, 2) → start / end logits [1, seq]
//
// Inference only: weights come from a checkpoint. Field
// names below are the checkpoint record keys, so they must
// stay as they are for existing checkpoints to load.
//
// Reference: Vaswani et al. (2017), Devlin et al. (2019)
//            Burn Book §3 (Building Blocks)

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

/// Architecture hyper-parameters, read from the checkpoint.
// #[derive(Config)] already provides Clone + serde impls.
#[derive(Config, Debug)]
pub struct SpanEncoderConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
}

impl SpanEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpanEncoder<B> {
        // Dropout is inert at inference; 0.0 keeps the module shape
        let dropout = DropoutConfig::new(0.0).init();

        SpanEncoder {
            token_embedding:    EmbeddingConfig::new(self.vocab_size, self.d_model).init(device),
            position_embedding: EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device),
            layers:             (0..self.num_layers).map(|_| self.layer(device)).collect(),
            final_norm:         LayerNormConfig::new(self.d_model).init(device),
            qa_head:            LinearConfig::new(self.d_model, 2).init(device),
            dropout,
            max_seq_len:        self.max_seq_len,
        }
    }

    fn layer<B: Backend>(&self, device: &B::Device) -> EncoderLayer<B> {
        EncoderLayer {
            self_attn:   MultiHeadAttentionConfig::new(self.d_model, self.num_heads).init(device),
            ffn_linear1: LinearConfig::new(self.d_model, self.d_ff).init(device),
            ffn_linear2: LinearConfig::new(self.d_ff, self.d_model).init(device),
            norm1:       LayerNormConfig::new(self.d_model).init(device),
            norm2:       LayerNormConfig::new(self.d_model).init(device),
            dropout:     DropoutConfig::new(0.0).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderLayer<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn = self.self_attn.forward(MhaInput::self_attn(x.clone())).context;
        let x    = self.norm1.forward(x + self.dropout.forward(attn));

        let hidden = burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()));
        let ffn    = self.ffn_linear2.forward(hidden);
        self.norm2.forward(x + self.dropout.forward(ffn))
    }
}

#[derive(Module, Debug)]
pub struct SpanEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderLayer<B>>,
    pub final_norm:         LayerNorm<B>,
    pub qa_head:            Linear<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
}

/// Start / end logits, both [batch, seq_len].
pub struct SpanLogits<B: Backend> {
    pub start: Tensor<B, 2>,
    pub end:   Tensor<B, 2>,
}

impl<B: Backend> SpanEncoder<B> {
    /// input_ids: [batch, seq_len] with seq_len <= max_seq_len
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> SpanLogits<B> {
        let [batch, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch, seq_len]);

        let tokens = self.token_embedding.forward(input_ids);
        let mut x  = tokens + self.position_embedding.forward(positions);
        for layer in &self.layers {
            x = layer.forward(x);
        }

        // [batch, seq, 2] → two [batch, seq] slices
        let logits = self.qa_head.forward(self.final_norm.forward(x));
        let start  = logits.clone()
            .slice([0..batch, 0..seq_len, 0..1])
            .reshape([batch, seq_len]);
        let end    = logits
            .slice([0..batch, 0..seq_len, 1..2])
            .reshape([batch, seq_len]);

        SpanLogits { start, end }
    }
}
