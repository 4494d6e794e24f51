//! Query input controller
//!
//! Holds the raw text the user is editing. The raw text stays in the field
//! after a submit; only the lifecycle sees the trimmed form.

use crate::query::lifecycle::RequestLifecycle;

/// Example questions offered to seed the input
pub const EXAMPLE_QUERIES: [&str; 4] = [
    "Show me the top 10 sales in August sorted by revenue",
    "Which products have the highest margin?",
    "How many customers do we have in Germany?",
    "Compare revenue Q1 vs Q2 2024",
];

/// Editable query text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text exactly as typed
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// Text that would be sent
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Submit is enabled only for non-blank text while nothing is loading
    pub fn can_submit(&self, loading: bool) -> bool {
        !loading && !self.is_blank()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the text with example `index` (0-based)
    ///
    /// Returns false for an unknown index or while loading.
    pub fn use_example(&mut self, index: usize, loading: bool) -> bool {
        if loading {
            return false;
        }
        match EXAMPLE_QUERIES.get(index) {
            Some(example) => {
                self.text = (*example).to_string();
                true
            }
            None => false,
        }
    }

    /// Forward the current text to the lifecycle
    pub fn submit(&self, lifecycle: &mut RequestLifecycle) -> Option<u64> {
        if !self.can_submit(lifecycle.is_loading()) {
            return None;
        }
        lifecycle.submit(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_cannot_submit() {
        let mut input = QueryInput::new();
        assert!(!input.can_submit(false));
        input.set_text(" \t\n ");
        assert!(input.is_blank());
        assert!(!input.can_submit(false));
    }

    #[test]
    fn test_raw_text_preserved() {
        let mut input = QueryInput::new();
        input.set_text("  top sales  ");
        assert_eq!(input.raw(), "  top sales  ");
        assert_eq!(input.trimmed(), "top sales");
    }

    #[test]
    fn test_loading_disables_submit() {
        let mut input = QueryInput::new();
        input.set_text("top sales");
        assert!(input.can_submit(false));
        assert!(!input.can_submit(true));
    }

    #[test]
    fn test_editing() {
        let mut input = QueryInput::new();
        input.push_char('a');
        input.push_char('b');
        input.backspace();
        assert_eq!(input.raw(), "a");
        input.clear();
        assert_eq!(input.raw(), "");
    }

    #[test]
    fn test_use_example() {
        let mut input = QueryInput::new();
        assert!(input.use_example(1, false));
        assert_eq!(input.raw(), EXAMPLE_QUERIES[1]);
        assert!(!input.use_example(EXAMPLE_QUERIES.len(), false));
        assert!(!input.use_example(0, true));
        assert_eq!(input.raw(), EXAMPLE_QUERIES[1]);
    }
}
