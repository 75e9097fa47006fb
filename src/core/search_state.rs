/// Where the search box is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Nothing typed, nothing shown
    #[default]
    Idle,
    /// Query changed, waiting for the debouncer or a response
    Typing,
    /// Suggestions from the latest search are on screen
    Suggesting,
    /// A suggestion was picked and is being resolved
    Selected,
}

impl SearchPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Typing => "typing",
            SearchPhase::Suggesting => "suggesting",
            SearchPhase::Selected => "resolving",
        }
    }
}

/// Query text plus the suggestions derived from it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<String>,
    pub phase: SearchPhase,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the query would not be sent to the geocoder
    pub fn query_is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    pub fn set_query(&mut self, text: &str) {
        self.query.clear();
        self.query.push_str(text);
    }

    /// Show a fresh suggestion list, or fall back to Idle when it is empty
    pub fn show_suggestions(&mut self, suggestions: Vec<String>) {
        if suggestions.is_empty() {
            self.clear_suggestions();
        } else {
            self.suggestions = suggestions;
            self.phase = SearchPhase::Suggesting;
        }
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.phase = SearchPhase::Idle;
    }

    pub fn suggestion(&self, index: usize) -> Option<&str> {
        self.suggestions.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_queries() {
        let mut state = SearchState::new();
        assert!(state.query_is_blank());
        state.set_query("   \t");
        assert!(state.query_is_blank());
        state.set_query(" Par");
        assert!(!state.query_is_blank());
    }

    #[test]
    fn test_empty_suggestions_go_idle() {
        let mut state = SearchState::new();
        state.set_query("Paris");
        state.show_suggestions(vec!["Paris, France".into()]);
        assert_eq!(state.phase, SearchPhase::Suggesting);

        state.show_suggestions(Vec::new());
        assert!(state.suggestions.is_empty());
        assert_eq!(state.phase, SearchPhase::Idle);
        assert_eq!(state.query, "Paris");
    }
}
