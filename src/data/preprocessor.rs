// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises text extracted from PDF / DOCX / pasted input
// into the context string the resolver works on.
//
// Extracted text is noisy:
//   - PDF pages bring form feeds and "\r\n" line endings
//   - Word brings non-breaking and zero-width spaces, tabs
//   - Pasted text brings trailing spaces and runs of blank lines
//
// Rule patterns are line-anchored ("Production Capacity: ...\n"),
// so the output keeps one paragraph per line and EVERY line —
// including the last — ends with '\n'.
//
// Steps:
//   1. Map unicode spaces / tabs / control chars to ' ', lone '\r' to '\n'
//   2. Collapse space runs and trim each line
//   3. Keep at most one blank line between paragraphs
//   4. Terminate every kept line with '\n'
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Normalise raw extracted text. Returns "" for blank input.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: character-level normalisation ─────────────────────────────
        // "\r\n" first, so Windows endings don't read as a blank line
        let normalised: String = text
            .replace("\r\n", "\n")
            .chars()
            .map(normalise_char)
            .collect();

        // ── Steps 2–4: line-level cleanup ─────────────────────────────────────
        let mut out         = String::with_capacity(normalised.len() + 1);
        let mut blank_run   = 0usize;
        let mut seen_text   = false;

        for line in normalised.split('\n').map(collapse_spaces) {
            if line.is_empty() {
                blank_run += 1;
                continue;
            }
            // One blank line survives between paragraphs, none at the top
            if seen_text && blank_run > 0 {
                out.push('\n');
            }
            out.push_str(&line);
            out.push('\n');
            blank_run = 0;
            seen_text = true;
        }

        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn normalise_char(c: char) -> char {
    match c {
        '\r'                              => '\n',
        '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
        // Form feeds between PDF pages, stray control bytes
        c if c.is_control() && c != '\n'  => ' ',
        c                                 => c,
    }
}

/// Collapse runs of spaces to one and trim the line.
fn collapse_spaces(line: &str) -> String {
    line.split(' ')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world\n");
    }

    #[test]
    fn test_every_line_is_terminated() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("Production Capacity: 75 T/D"),
            "Production Capacity: 75 T/D\n"
        );
        assert_eq!(p.clean("a\r\nb"), "a\nb\n");
    }

    #[test]
    fn test_removes_control_and_unicode_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world\n");
        assert_eq!(p.clean("page one\x0cpage\u{00A0}two"), "page one page two\n");
    }

    #[test]
    fn test_collapses_blank_lines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("\n\nline1\n\n\n\n\nline2\n\n"), "line1\n\nline2\n");
    }

    #[test]
    fn test_blank_input() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean(" \t\n \r\n"), "");
    }
}
