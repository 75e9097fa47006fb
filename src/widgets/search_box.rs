//! Search box and suggestion list
//!
//! The text input itself does not debounce; it reports every edit and the
//! orchestrator decides when to hit the network. The box only shows a
//! "(searching...)" hint while something is pending.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key in the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBoxAction {
    /// Key did not change the text
    Continue,
    /// Text changed
    QueryChanged(String),
    /// Enter on the highlighted suggestion
    Select(usize),
    /// Esc: empty the box
    Clear,
    /// Not ours; let the app handle it
    PassThrough,
}

pub struct SearchBox {
    input: Input,
    list_state: ListState,
    placeholder: String,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            list_state: ListState::default(),
            placeholder: "Enter location".to_string(),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Overwrite the text, e.g. after a suggestion was picked
    pub fn set_value(&mut self, value: &str) {
        if self.input.value() != value {
            self.input = Input::default().with_value(value.to_string());
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Keep the highlight inside a list of `len` suggestions
    pub fn sync_suggestions(&mut self, len: usize) {
        match (len, self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (_, None) => self.list_state.select(Some(0)),
            (len, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, suggestion_count: usize) -> SearchBoxAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                SearchBoxAction::PassThrough
            }
            KeyCode::Esc => {
                self.input.reset();
                self.list_state.select(None);
                SearchBoxAction::Clear
            }
            KeyCode::Enter => match self.list_state.selected() {
                Some(i) if i < suggestion_count => SearchBoxAction::Select(i),
                _ => SearchBoxAction::Continue,
            },
            KeyCode::Down if suggestion_count > 0 => {
                let next = self
                    .list_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(suggestion_count - 1));
                self.list_state.select(Some(next));
                SearchBoxAction::Continue
            }
            KeyCode::Up if suggestion_count > 0 => {
                let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.list_state.select(Some(prev));
                SearchBoxAction::Continue
            }
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown | KeyCode::F(_) => {
                SearchBoxAction::PassThrough
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    SearchBoxAction::QueryChanged(self.input.value().to_string())
                } else {
                    SearchBoxAction::Continue
                }
            }
        }
    }

    pub fn render_input(&self, f: &mut Frame, area: Rect, pending: bool) {
        let title = if pending {
            " Search (searching...) "
        } else {
            " Search "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow));

        let widget = if self.input.value().is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.input.value()).style(Style::default().add_modifier(Modifier::BOLD))
        };
        f.render_widget(widget.block(block), area);

        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);
        let cursor = self.input.visual_cursor().saturating_sub(scroll);
        f.set_cursor_position((area.x + 1 + cursor as u16, area.y + 1));
    }

    pub fn render_suggestions(&mut self, f: &mut Frame, area: Rect, suggestions: &[String]) {
        let items: Vec<ListItem> = suggestions
            .iter()
            .map(|s| ListItem::new(s.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Suggestions "))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}
