//! Main application state and logic for the dashboard.
//!
//! The `App` struct owns everything the screen shows: the chart data, the
//! connection state, and the feed counters. It is the single context object
//! that feed events and key presses are applied to.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use feedchart_config::Config;
use feedchart_feed::{ChartSink, ConnectionState, FeedEvent};
use futures_util::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::event::{AppEvent, InputHandler};
use crate::sink::BarChartSink;
use crate::theme::Theme;

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Title of the chart panel.
pub const CHART_TITLE: &str = "Quantidade";

/// Bar heights are integers relative to the tallest bar, which gets this value.
const BAR_RESOLUTION: u64 = 10_000;

/// Counters shown in the footer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStats {
    /// Frames applied to the chart
    pub records: u64,
    /// Frames skipped because they did not decode
    pub decode_failures: u64,
    /// Connections opened
    pub connects: u64,
    /// Reconnects scheduled after a close or failed attempt
    pub reconnects: u64,
    /// Local time of the last applied record
    pub last_update: Option<DateTime<Local>>,
    /// Most recent decode or connection error
    pub last_error: Option<String>,
}

/// Main application state.
pub struct App {
    /// Endpoint shown in the header
    endpoint: String,
    bar_width: u16,
    bar_gap: u16,
    /// Clock refresh interval
    tick: Duration,
    /// Chart data
    sink: BarChartSink,
    connection: ConnectionState,
    /// Delay of the pending reconnect, if one is scheduled
    pending_reconnect: Option<Duration>,
    /// Whether the listener has stopped for good
    feed_stopped: bool,
    stats: FeedStats,
    input_handler: InputHandler,
    theme: Theme,
    should_quit: bool,
    show_help: bool,
    /// Dirty flag - whether UI needs redraw
    dirty: bool,
    /// Clear the terminal before the next draw
    clear_requested: bool,
}

impl App {
    /// Create an app for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.feed.endpoint.clone(),
            bar_width: config.dashboard.bar_width.max(1),
            bar_gap: config.dashboard.bar_gap,
            tick: config.dashboard.tick(),
            sink: BarChartSink::new(),
            connection: ConnectionState::Disconnected,
            pending_reconnect: None,
            feed_stopped: false,
            stats: FeedStats::default(),
            input_handler: InputHandler::new(),
            theme: Theme::default(),
            should_quit: false,
            show_help: false,
            dirty: true,
            clear_requested: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    pub fn chart(&self) -> &BarChartSink {
        &self.sink
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if either the chart or the chrome changed, clearing both flags.
    fn take_dirty(&mut self) -> bool {
        let chart = self.sink.take_dirty();
        let chrome = std::mem::take(&mut self.dirty);
        chart || chrome
    }

    /// Apply one listener event.
    pub fn handle_feed_event(&mut self, event: FeedEvent) {
        if let Some(state) = event.connection_state() {
            self.connection = state;
        }

        match event {
            FeedEvent::Connected { attempt, .. } => {
                debug!(attempt, "dashboard sees connection");
                self.stats.connects += 1;
                self.pending_reconnect = None;
            }
            FeedEvent::Record(record) => {
                self.sink.upsert_record(&record);
                self.stats.records += 1;
                self.stats.last_update = Some(Local::now());
            }
            FeedEvent::DecodeFailed { error, .. } => {
                self.stats.decode_failures += 1;
                self.stats.last_error = Some(error);
            }
            FeedEvent::Disconnected { reason } => {
                self.stats.last_error = Some(reason);
            }
            FeedEvent::ConnectFailed { error } => {
                self.stats.last_error = Some(error);
            }
            FeedEvent::ReconnectScheduled { delay, .. } => {
                self.stats.reconnects += 1;
                self.pending_reconnect = Some(delay);
            }
            FeedEvent::Stopped => {
                self.pending_reconnect = None;
                self.feed_stopped = true;
            }
        }
        self.mark_dirty();
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let event = self.input_handler.handle_key(key);
        self.handle_app_event(event);
    }

    /// Handle an application event.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ShowHelp => self.set_help(true),
            AppEvent::HideHelp => self.set_help(false),
            AppEvent::Quit | AppEvent::ForceQuit => self.should_quit = true,
            AppEvent::Redraw => {
                self.clear_requested = true;
                self.mark_dirty();
            }
            AppEvent::Cancel => {
                if self.show_help {
                    self.set_help(false);
                } else {
                    self.should_quit = true;
                }
            }
            AppEvent::None => {}
        }
    }

    fn set_help(&mut self, open: bool) {
        self.show_help = open;
        self.input_handler.set_help_open(open);
        self.mark_dirty();
    }

    /// Take over the terminal and run until the user quits.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<FeedEvent>) -> AppResult<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal, events).await;

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Draw, then wait for the next feed event, key press, or clock tick.
    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        events: &mut mpsc::Receiver<FeedEvent>,
    ) -> AppResult<()> {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(self.tick);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut feed_open = true;

        while !self.should_quit {
            if std::mem::take(&mut self.clear_requested) {
                terminal.clear()?;
            }
            if self.take_dirty() {
                terminal.draw(|frame| self.draw(frame))?;
            }

            tokio::select! {
                event = events.recv(), if feed_open => match event {
                    Some(event) => self.handle_feed_event(event),
                    None => {
                        info!("feed channel closed");
                        feed_open = false;
                        self.feed_stopped = true;
                        self.connection = ConnectionState::Disconnected;
                        self.mark_dirty();
                    }
                },
                input_event = input.next() => match input_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key);
                    }
                    Some(Ok(Event::Resize(_, _))) => self.mark_dirty(),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                _ = tick.tick() => self.mark_dirty(),
            }
        }
        Ok(())
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Chart
                Constraint::Length(3), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if self.show_help {
            self.draw_help_overlay(frame, area);
        }
    }

    fn status(&self) -> (String, Color) {
        let colors = &self.theme.colors;
        match self.connection {
            ConnectionState::Connected => ("[connected]".to_string(), colors.status_healthy),
            ConnectionState::Disconnected if self.feed_stopped => {
                ("[stopped]".to_string(), colors.text_dim)
            }
            ConnectionState::Disconnected => match self.pending_reconnect {
                Some(delay) => (
                    format!("[reconnecting in {}ms]", delay.as_millis()),
                    colors.status_warning,
                ),
                None => ("[connecting]".to_string(), colors.status_warning),
            },
        }
    }

    /// Draw the header bar: title, endpoint, clock, connection state.
    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let title = " feedchart ";
        let endpoint = format!(" {} ", self.endpoint);
        let now = Local::now().format("%H:%M:%S").to_string();
        let (status_text, status_color) = self.status();

        let used = title.len() + endpoint.len() + now.len() + 2 + status_text.len() + 2;
        let spacing = (area.width as usize).saturating_sub(used);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                title,
                Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
            ),
            Span::styled(endpoint, Style::default().fg(colors.text)),
            Span::raw(" ".repeat(spacing)),
            Span::styled(now, Style::default().fg(colors.text_dim)),
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border_dim)),
        );

        frame.render_widget(header, area);
    }

    /// Draw the bar chart, one bar per category in arrival order.
    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.axis))
            .title(Span::styled(
                format!(" {CHART_TITLE} "),
                Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
            ));

        let series = self.sink.series();
        if series.is_empty() {
            let waiting = Paragraph::new(format!("Waiting for data from {}", self.endpoint))
                .style(Style::default().fg(colors.axis))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(waiting, area);
            return;
        }

        let max = series.max_value().unwrap_or(0.0);
        let bars: Vec<Bar> = series
            .iter()
            .map(|(label, value, color)| {
                let fill = self.theme.bar_color(color);
                Bar::default()
                    .label(Line::styled(
                        label.as_str().to_string(),
                        Style::default().fg(colors.axis),
                    ))
                    .value(bar_height(value, max))
                    .text_value(format_quantity(value))
                    .style(Style::default().fg(fill))
                    .value_style(Style::default().fg(Color::Black).bg(fill))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(self.bar_width)
            .bar_gap(self.bar_gap)
            .max(BAR_RESOLUTION)
            .label_style(Style::default().fg(colors.axis));

        frame.render_widget(chart, area);
    }

    /// Draw the footer with counters and hotkey hints.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let hotkey_style = Style::default().fg(colors.hotkey);
        let dim = Style::default().fg(colors.text_dim);

        let last_update = self
            .stats
            .last_update
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut counters = vec![
            Span::styled(
                format!(
                    "records {}  decode errors {}  reconnects {}  last update {}",
                    self.stats.records, self.stats.decode_failures, self.stats.reconnects, last_update
                ),
                dim,
            ),
        ];
        if let Some(err) = &self.stats.last_error {
            counters.push(Span::raw("  "));
            counters.push(Span::styled(
                format!("last error: {}", truncate_status_error(err)),
                Style::default().fg(colors.status_error),
            ));
        }

        let hints = vec![
            Span::styled("[?]", hotkey_style),
            Span::raw("Help "),
            Span::styled("[r]", hotkey_style),
            Span::raw("Redraw "),
            Span::styled("[q]", hotkey_style),
            Span::raw("Quit"),
        ];

        let footer = Paragraph::new(vec![Line::from(counters), Line::from(hints)])
            .style(dim)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(colors.border_dim)),
            );

        frame.render_widget(footer, area);
    }

    /// Draw the help overlay.
    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let overlay_width = 50.min(area.width.saturating_sub(4));
        let overlay_height = 14.min(area.height.saturating_sub(4));
        let overlay_x = (area.width - overlay_width) / 2;
        let overlay_y = (area.height - overlay_height) / 2;
        let overlay_area = Rect::new(overlay_x, overlay_y, overlay_width, overlay_height);

        frame.render_widget(Clear, overlay_area);

        let help_text = format!(
            "\
feedchart Hotkey Reference

  ?  h     Show this help
  r        Redraw the screen
  Ctrl+L   Redraw the screen
  q  Esc   Quit
  Ctrl+C   Force quit

Feed: {}
Reconnects automatically after a drop.

Press any key to close this help.",
            self.endpoint
        );

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(colors.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.header))
                    .title(Span::styled(
                        " Help ",
                        Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(Color::Black)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, overlay_area);
    }
}

/// Integer bar height for a quantity, scaled against the largest value into
/// `0..=BAR_RESOLUTION`. Negative quantities draw as empty bars.
fn bar_height(quantity: f64, max: f64) -> u64 {
    if !max.is_finite() || max <= 0.0 {
        return 0;
    }
    let ratio = (quantity / max).clamp(0.0, 1.0);
    if ratio.is_nan() {
        return 0;
    }
    (ratio * BAR_RESOLUTION as f64).round() as u64
}

/// Quantity as shown on the bar: `7`, `2.5`, `1e17`.
fn format_quantity(quantity: f64) -> String {
    if quantity.abs() >= 1e9 {
        format!("{quantity:e}")
    } else {
        format!("{quantity}")
    }
}

/// Truncate an error message for status bar display.
fn truncate_status_error(err: &str) -> String {
    const MAX: usize = 40;
    if err.chars().count() <= MAX {
        err.to_string()
    } else {
        let head: String = err.chars().take(MAX - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use feedchart_core::{Category, Record};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    const ENDPOINT: &str = "ws://127.0.0.1:8080";

    fn test_app() -> App {
        let mut config = Config::default();
        config.feed.endpoint = ENDPOINT.to_string();
        App::new(&config)
    }

    fn record(category: &str, quantity: f64) -> FeedEvent {
        FeedEvent::Record(Record::new(category, quantity))
    }

    /// Helper to render app and get the buffer
    fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Convert buffer to string for searching
    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut result = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                result.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            result.push('\n');
        }
        result
    }

    fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
        buffer_to_string(buffer).contains(text)
    }

    /// Cell position of the first occurrence of `text`
    fn position_of(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
        buffer_to_string(buffer)
            .lines()
            .enumerate()
            .find_map(|(y, line)| {
                let byte = line.find(text)?;
                Some((line[..byte].chars().count() as u16, y as u16))
            })
    }

    fn has_fg(buffer: &Buffer, color: Color) -> bool {
        buffer.content().iter().any(|cell| cell.fg == color)
    }

    // ============================================================
    // Rendering
    // ============================================================

    #[test]
    fn test_empty_chart_shows_waiting_message() {
        let mut app = test_app();
        let buffer = render_app(&mut app, 100, 30);

        assert!(buffer_contains(&buffer, CHART_TITLE));
        assert!(buffer_contains(&buffer, "Waiting for data from ws://127.0.0.1:8080"));
        assert!(buffer_contains(&buffer, "[connecting]"));
    }

    #[test]
    fn test_bars_follow_arrival_order() {
        let mut app = test_app();
        app.handle_feed_event(record("Media", 20.0));
        app.handle_feed_event(record("Grande", 3.0));
        app.handle_feed_event(record("Pequena", 9.0));
        let buffer = render_app(&mut app, 100, 30);

        let (media, _) = position_of(&buffer, "Media").expect("Media label");
        let (grande, _) = position_of(&buffer, "Grande").expect("Grande label");
        let (pequena, _) = position_of(&buffer, "Pequena").expect("Pequena label");
        assert!(media < grande && grande < pequena);
        assert!(!buffer_contains(&buffer, "Waiting for data"));
    }

    #[test]
    fn test_update_keeps_single_bar() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 3.0));
        app.handle_feed_event(record("Media", 20.0));
        app.handle_feed_event(record("Grande", 7.0));
        let buffer = render_app(&mut app, 100, 30);

        let text = buffer_to_string(&buffer);
        assert_eq!(text.matches("Grande").count(), 1);
        assert!(text.contains('7'));
        assert!(text.contains("20"));
        assert_eq!(app.chart().series().values(), &[7.0, 20.0]);
    }

    #[test]
    fn test_bar_colors_from_palette() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 5.0));
        app.handle_feed_event(record("Refugo", 5.0));
        let buffer = render_app(&mut app, 100, 30);

        assert!(has_fg(&buffer, Color::Rgb(0xfc, 0xff, 0x32)));
        assert!(has_fg(&buffer, app.theme.colors.bar_fallback));
        assert_eq!(
            app.chart().series().colors()[1],
            None,
            "unknown category keeps no palette color"
        );
    }

    #[test]
    fn test_huge_quantities_render() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 1e17));
        app.handle_feed_event(record("Media", 3.0));
        app.handle_feed_event(record("Pequena", 1e300));
        let buffer = render_app(&mut app, 100, 30);

        assert!(buffer_contains(&buffer, "Grande"));
        assert!(buffer_contains(&buffer, "Pequena"));
        assert!(buffer_contains(&buffer, "1e300"));
        assert_eq!(app.chart().series().values(), &[1e17, 3.0, 1e300]);
    }

    #[test]
    fn test_only_negative_quantities_render() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", -5.0));
        let buffer = render_app(&mut app, 100, 30);
        assert!(buffer_contains(&buffer, "Grande"));
    }

    #[test]
    fn test_labels_use_axis_color() {
        let mut app = test_app();
        app.handle_feed_event(record("Media", 4.0));
        let buffer = render_app(&mut app, 100, 30);
        let (x, y) = position_of(&buffer, "Media").expect("Media label");
        assert_eq!(buffer[(x, y)].fg, crate::theme::AXIS);
    }

    #[test]
    fn test_header_shows_endpoint_and_state() {
        let mut app = test_app();
        app.handle_feed_event(FeedEvent::Connected {
            endpoint: ENDPOINT.into(),
            attempt: 1,
        });
        let buffer = render_app(&mut app, 100, 30);

        assert!(buffer_contains(&buffer, "feedchart"));
        assert!(buffer_contains(&buffer, ENDPOINT));
        assert!(buffer_contains(&buffer, "[connected]"));
    }

    #[test]
    fn test_header_shows_pending_reconnect() {
        let mut app = test_app();
        app.handle_feed_event(FeedEvent::Disconnected {
            reason: "closed by peer".into(),
        });
        app.handle_feed_event(FeedEvent::ReconnectScheduled {
            delay: Duration::from_millis(2000),
            attempt: 2,
        });
        let buffer = render_app(&mut app, 100, 30);

        assert!(buffer_contains(&buffer, "[reconnecting in 2000ms]"));
        assert!(buffer_contains(&buffer, "last error: closed by peer"));
    }

    #[test]
    fn test_footer_shows_counters_and_hotkeys() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 1.0));
        app.handle_feed_event(FeedEvent::DecodeFailed {
            frame: "oops".into(),
            error: "expected value".into(),
        });
        let buffer = render_app(&mut app, 120, 30);

        assert!(buffer_contains(&buffer, "records 1"));
        assert!(buffer_contains(&buffer, "decode errors 1"));
        assert!(buffer_contains(&buffer, "[?]"));
        assert!(buffer_contains(&buffer, "[q]"));
    }

    #[test]
    fn test_help_overlay_renders() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::ShowHelp);
        let buffer = render_app(&mut app, 100, 30);

        assert!(app.show_help());
        assert!(buffer_contains(&buffer, "Hotkey Reference"));
        assert!(buffer_contains(&buffer, "Ctrl+C"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 1.0));
        app.handle_app_event(AppEvent::ShowHelp);
        render_app(&mut app, 20, 8);
    }

    // ============================================================
    // State
    // ============================================================

    #[test]
    fn test_records_mark_chart_dirty() {
        let mut app = test_app();
        assert!(app.take_dirty());
        assert!(!app.take_dirty());

        app.handle_feed_event(record("Grande", 3.0));
        assert!(app.take_dirty());
        assert_eq!(app.stats().records, 1);
        assert!(app.stats().last_update.is_some());
    }

    #[test]
    fn test_decode_failure_leaves_chart_alone() {
        let mut app = test_app();
        app.handle_feed_event(FeedEvent::DecodeFailed {
            frame: "[1, 2]".into(),
            error: "expected a JSON object, got an array".into(),
        });
        assert!(app.chart().series().is_empty());
        assert_eq!(app.stats().decode_failures, 1);
    }

    #[test]
    fn test_connection_state_tracking() {
        let mut app = test_app();
        assert_eq!(app.connection(), ConnectionState::Disconnected);

        app.handle_feed_event(FeedEvent::Connected {
            endpoint: ENDPOINT.into(),
            attempt: 1,
        });
        assert_eq!(app.connection(), ConnectionState::Connected);
        assert_eq!(app.stats().connects, 1);

        app.handle_feed_event(FeedEvent::Disconnected {
            reason: "stream ended".into(),
        });
        assert_eq!(app.connection(), ConnectionState::Disconnected);

        app.handle_feed_event(FeedEvent::ReconnectScheduled {
            delay: Duration::from_secs(2),
            attempt: 2,
        });
        assert_eq!(app.stats().reconnects, 1);
        assert_eq!(app.pending_reconnect, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_quit_handling() {
        let mut app = test_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_quit());
    }

    #[test]
    fn test_escape_closes_help_before_quitting() {
        let mut app = test_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        assert!(app.show_help());

        app.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_help());
        assert!(!app.should_quit());

        app.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit());
    }

    #[test]
    fn test_q_closes_help_without_quitting() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::ShowHelp);
        app.handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.show_help());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_redraw_requests_clear() {
        let mut app = test_app();
        app.take_dirty();
        app.handle_app_event(AppEvent::Redraw);
        assert!(app.clear_requested);
        assert!(app.take_dirty());
    }

    #[test]
    fn test_value_helpers() {
        assert_eq!(bar_height(7.0, 20.0), 3500);
        assert_eq!(bar_height(20.0, 20.0), BAR_RESOLUTION);
        assert_eq!(bar_height(0.25, 0.5), 5000);
        assert_eq!(bar_height(-3.0, 20.0), 0);
        assert_eq!(bar_height(-3.0, -1.0), 0);
        assert_eq!(bar_height(1e300, 1e300), BAR_RESOLUTION);
        assert_eq!(bar_height(5.0, f64::INFINITY), 0);
        assert_eq!(format_quantity(7.0), "7");
        assert_eq!(format_quantity(2.5), "2.5");
        assert_eq!(format_quantity(1e17), "1e17");
        assert_eq!(truncate_status_error("short"), "short");
        assert_eq!(truncate_status_error(&"x".repeat(60)).chars().count(), 40);
    }

    #[test]
    fn test_category_labels_are_plain_names() {
        let mut app = test_app();
        app.handle_feed_event(record("Grande", 1.0));
        assert_eq!(app.chart().series().labels(), &[Category::from("Grande")]);
    }
}
