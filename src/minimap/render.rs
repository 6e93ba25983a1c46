//! Text buffer to minimap rendering
//!
//! Every change to the document rebuilds the whole [`MinimapState`]; there is
//! no diffing against the previous state.

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Lines
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the minimap, mirroring a single line of the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MinimapLine {
    /// Text displayed for this row, identical to the source line
    pub text: String,
}

impl MinimapLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the source line was blank.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// The rendered minimap: one [`MinimapLine`] per document line, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MinimapState {
    lines: Vec<MinimapLine>,
}

impl MinimapState {
    pub fn lines(&self) -> &[MinimapLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Displayed text of every row, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render a text buffer into a fresh minimap state.
///
/// The result has exactly one entry per input line and keeps their order.
/// Empty buffers and blank lines are valid input.
pub fn render<S: AsRef<str>>(buffer: &[S]) -> MinimapState {
    MinimapState {
        lines: buffer
            .iter()
            .map(|line| MinimapLine::new(line.as_ref()))
            .collect(),
    }
}

/// Owns the current minimap state and replaces it on every render.
#[derive(Debug, Default)]
pub struct MinimapRenderer {
    state: MinimapState,
    renders: u64,
}

impl MinimapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the state from `buffer`, discarding whatever was there before.
    pub fn render<S: AsRef<str>>(&mut self, buffer: &[S]) -> &MinimapState {
        self.state = render(buffer);
        self.renders += 1;
        &self.state
    }

    pub fn state(&self) -> &MinimapState {
        &self.state
    }

    /// Number of full rebuilds performed so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Split document text into lines on `'\n'`.
///
/// Matches [`count_lines`]: empty text is a single empty line and a trailing
/// newline starts one more (empty) line. A `'\r'` before the newline is kept
/// as part of the line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_owned).collect()
}

/// Count the number of lines in the given text.
///
/// Returns at least 1 for empty text (representing a single empty line).
pub fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_lines_in_order() {
        let state = render(&["a", "b", "c"]);
        assert_eq!(state.len(), 3);
        assert_eq!(state.texts().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_render_empty_buffer() {
        let empty: [&str; 0] = [];
        let state = render(&empty);
        assert!(state.is_empty());
    }

    #[test]
    fn test_render_blank_and_unusual_lines() {
        let long = "x".repeat(10_000);
        let buffer = vec![
            String::new(),
            "  indented\t".to_string(),
            "ünïcødé → 日本語 🎉".to_string(),
            long.clone(),
        ];
        let state = render(&buffer);

        assert_eq!(state.len(), buffer.len());
        assert!(state.lines()[0].is_blank());
        for (rendered, source) in state.lines().iter().zip(&buffer) {
            assert_eq!(&rendered.text, source);
        }
        assert_eq!(state.lines()[3].text.len(), long.len());
    }

    #[test]
    fn test_renderer_replaces_previous_state() {
        let mut renderer = MinimapRenderer::new();
        assert_eq!(renderer.render(&["a"]).len(), 1);

        let state = renderer.render(&["a", "b"]);
        assert_eq!(state.texts().collect::<Vec<_>>(), vec!["a", "b"]);

        let shorter = renderer.render(&["z"]);
        assert_eq!(shorter.texts().collect::<Vec<_>>(), vec!["z"]);
        assert_eq!(renderer.render_count(), 3);
    }

    #[test]
    fn test_renderer_rebuilds_even_when_unchanged() {
        let mut renderer = MinimapRenderer::new();
        renderer.render(&["same"]);
        renderer.render(&["same"]);
        assert_eq!(renderer.render_count(), 2);
        assert_eq!(renderer.state().len(), 1);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("one"), vec!["one"]);
        assert_eq!(split_lines("a\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines("\n\n"), vec!["", "", ""]);
        assert_eq!(split_lines("crlf\r\nnext"), vec!["crlf\r", "next"]);
    }

    #[test]
    fn test_count_lines_matches_split() {
        for text in ["", "x", "a\nb", "a\n", "\n\n\n", "Line 1\nLine 2\nLine 3"] {
            assert_eq!(count_lines(text), split_lines(text).len(), "{:?}", text);
        }
    }
}
