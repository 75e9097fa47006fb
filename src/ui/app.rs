use crate::config::Config;
use crate::services::SearchOrchestrator;
use crate::ui::map_surface::{MapSurface, MapSurfaceProps, MAX_ZOOM};
use crate::utils::logging::get_log_buffer;
use crate::widgets::search_box::{SearchBox, SearchBoxAction};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const MAX_VISIBLE_SUGGESTIONS: u16 = 8;

/// Terminal shell around the search orchestrator
pub struct MapSearchApp {
    orchestrator: SearchOrchestrator,
    config: Config,
    search_box: SearchBox,
    /// View-only zoom, starts at the configured zoom
    view_zoom: u8,
    show_log_panel: bool,
    should_quit: bool,
}

impl MapSearchApp {
    pub fn new(orchestrator: SearchOrchestrator, config: Config) -> Self {
        let show_log_panel = config.display.show_log_panel;
        let view_zoom = config.map.zoom.min(MAX_ZOOM);
        Self {
            orchestrator,
            config,
            search_box: SearchBox::new(),
            view_zoom,
            show_log_panel,
            should_quit: false,
        }
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()
            .map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}", e))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
            }
        };

        let res = self.run_app(&mut terminal);

        // Always restore terminal, even on error
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        res.map_err(|e| anyhow::anyhow!("TUI error: {}", e))
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(target: "ui", "Map search started");
        terminal.draw(|f| self.ui(f))?;

        while !self.should_quit {
            let mut dirty = false;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    // Windows reports releases too
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                        dirty = true;
                    }
                } else {
                    dirty = true; // resize and friends
                }
            }

            if self.orchestrator.tick(Instant::now()) {
                dirty = true;
            }
            if !self.orchestrator.pump().is_empty() {
                dirty = true;
            }

            if dirty {
                self.sync_search_box();
                terminal.draw(|f| self.ui(f))?;
            }
        }

        info!(target: "ui", "Map search closed");
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let count = self.orchestrator.suggestions().len();
        match self.search_box.handle_key(key, count) {
            SearchBoxAction::QueryChanged(text) => {
                self.orchestrator.on_query_changed(&text, Instant::now());
            }
            SearchBoxAction::Select(index) => {
                self.orchestrator.select_index(index);
            }
            SearchBoxAction::Clear => self.orchestrator.clear_query(),
            SearchBoxAction::Continue => {}
            SearchBoxAction::PassThrough => self.handle_global_key(key),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::PageUp => self.zoom_by(1),
            KeyCode::PageDown => self.zoom_by(-1),
            KeyCode::F(5) => self.show_log_panel = !self.show_log_panel,
            _ => debug!(target: "ui", "Unhandled key {:?}", key),
        }
    }

    fn zoom_by(&mut self, delta: i8) {
        self.view_zoom = self
            .view_zoom
            .saturating_add_signed(delta)
            .min(MAX_ZOOM);
    }

    pub fn view_zoom(&self) -> u8 {
        self.view_zoom
    }

    /// Mirror orchestrator state into the widget after a selection or a
    /// new suggestion list
    fn sync_search_box(&mut self) {
        self.search_box.set_value(self.orchestrator.query());
        self.search_box
            .sync_suggestions(self.orchestrator.suggestions().len());
    }

    fn ui(&mut self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        let props = MapSurfaceProps::for_markers(
            self.orchestrator.markers().current(),
            &self.config.map,
        );

        let body = if self.show_log_panel {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(outer[1]);
            self.render_log_panel(f, split[1]);
            split[0]
        } else {
            outer[1]
        };

        f.render_widget(MapSurface::new(&props).zoom(self.view_zoom()), body);

        self.search_box
            .render_input(f, outer[0], self.orchestrator.is_search_pending());

        let suggestions = self.orchestrator.suggestions();
        if !suggestions.is_empty() {
            let height = (suggestions.len() as u16).min(MAX_VISIBLE_SUGGESTIONS) + 2;
            let overlay = Rect {
                x: body.x + 1,
                y: body.y,
                width: body.width.saturating_sub(2),
                height: height.min(body.height),
            };
            let suggestions = suggestions.to_vec();
            f.render_widget(Clear, overlay);
            self.search_box.render_suggestions(f, overlay, &suggestions);
        }

        self.render_status(f, outer[2]);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let marker = self.orchestrator.markers().primary();
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.orchestrator.phase().label()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(" {} {}", marker.icon, marker.position)),
            Span::styled(
                "  Enter select · Esc clear · PgUp/PgDn zoom · F5 log · Ctrl-C quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_log_panel(&self, f: &mut Frame, area: Rect) {
        let rows = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = get_log_buffer()
            .map(|buffer| buffer.get_recent(rows))
            .unwrap_or_default()
            .into_iter()
            .map(|entry| {
                let color = match entry.level.as_str() {
                    "ERROR" => Color::Red,
                    "WARN" => Color::Yellow,
                    "INFO" => Color::Green,
                    _ => Color::Gray,
                };
                ListItem::new(Line::styled(entry.format_for_display(), Style::default().fg(color)))
            })
            .collect();

        f.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(" Log (F5) ")),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Geocoder;
    use crate::core::{GeoError, GeocodeResult};
    use crate::services::OrchestratorSettings;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoResults;

    #[async_trait]
    impl Geocoder for NoResults {
        async fn search(&self, _query: &str) -> Result<Vec<GeocodeResult>, GeoError> {
            Ok(Vec::new())
        }
    }

    fn app() -> MapSearchApp {
        let orchestrator = SearchOrchestrator::new(
            Arc::new(NoResults),
            OrchestratorSettings::default(),
            tokio::runtime::Handle::current(),
        );
        MapSearchApp::new(orchestrator, Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_keys_feed_the_orchestrator() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('R')));
        app.handle_key(key(KeyCode::Char('o')));
        assert_eq!(app.orchestrator().query(), "Ro");
        assert!(app.orchestrator().is_search_pending());

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.orchestrator().query(), "");
        assert!(!app.orchestrator().is_search_pending());
    }

    #[tokio::test]
    async fn test_view_zoom_is_clamped() {
        let mut app = app();
        assert_eq!(app.view_zoom(), 13);
        for _ in 0..20 {
            app.handle_key(key(KeyCode::PageUp));
        }
        assert_eq!(app.view_zoom(), MAX_ZOOM);
        for _ in 0..40 {
            app.handle_key(key(KeyCode::PageDown));
        }
        assert_eq!(app.view_zoom(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_config_zoom_steps_down_at_once() {
        let orchestrator = SearchOrchestrator::new(
            Arc::new(NoResults),
            OrchestratorSettings::default(),
            tokio::runtime::Handle::current(),
        );
        let mut config = Config::default();
        config.map.zoom = 200;
        let mut app = MapSearchApp::new(orchestrator, config);
        assert_eq!(app.view_zoom(), MAX_ZOOM);

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.view_zoom(), MAX_ZOOM - 1);

        for _ in 0..300 {
            app.handle_key(key(KeyCode::PageDown));
        }
        assert_eq!(app.view_zoom(), 0);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
