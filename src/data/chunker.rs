// ============================================================
// Layer 4 — Context Window Chunker
// ============================================================
// The Q&A model reads at most max_seq_len tokens:
//   [CLS] question [SEP] context-window [SEP]
// A whole project brief is usually longer than that. Instead
// of truncating (and losing an answer near the end), the
// context token ids are cut into overlapping windows and the
// model scores each one.
//
// Example with window=5, overlap=2 over 10 tokens:
//   0..5, 3..8, 6..10
//
// An answer shorter than `overlap` tokens always lies fully
// inside at least one window.
//
// Reference: Devlin et al. (2019) BERT — document stride

use std::ops::Range;

pub struct Chunker {
    window:  usize,
    overlap: usize,
}

impl Chunker {
    /// # Panics
    /// Panics if overlap >= window (the stride would be zero).
    pub fn new(window: usize, overlap: usize) -> Self {
        assert!(
            overlap < window,
            "overlap ({}) must be less than window ({})",
            overlap,
            window
        );
        Self { window, overlap }
    }

    pub fn stride(&self) -> usize {
        self.window - self.overlap
    }

    /// Index ranges covering `0..len`. Empty input gives no windows.
    pub fn windows(&self, len: usize) -> Vec<Range<usize>> {
        let mut out   = Vec::new();
        let mut start = 0usize;

        while start < len {
            let end = (start + self.window).min(len);
            out.push(start..end);
            if end == len {
                break;
            }
            start += self.stride();
        }
        out
    }
}
