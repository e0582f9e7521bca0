// 🖥️ Terminal Map Viewer
//
// Canvas with world coastlines and one glyph per shop, a shop list, and a
// popup panel for the selected shop. The viewer owns its own viewport
// (centre + zoom); the catalog and markers stay read-only.

use crate::marker::{LatLng, Marker};
use crate::view::MapView;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use std::io;

/// Web mercator is undefined at the poles
const MAX_LATITUDE: f64 = 85.0;

/// Roughly four 256px tiles fit across a terminal-sized view
const TILES_ACROSS: f64 = 4.0;

pub struct App {
    view: MapView,
    pub list_state: ListState,
    pub show_popup: bool,
    pub center: LatLng,
    pub zoom: u8,
}

impl App {
    pub fn new(view: MapView) -> Self {
        let mut list_state = ListState::default();
        if !view.markers().is_empty() {
            list_state.select(Some(0));
        }

        let [lat, lng] = view.config().map.center;
        let zoom = view.config().map.zoom;

        Self {
            view,
            list_state,
            show_popup: false,
            center: LatLng::new(lat, lng),
            zoom,
        }
    }

    pub fn markers(&self) -> &[Marker] {
        self.view.markers()
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.list_state.selected().and_then(|i| self.view.marker(i))
    }

    pub fn toggle_popup(&mut self) {
        if self.selected_marker().is_some() {
            self.show_popup = !self.show_popup;
        }
    }

    pub fn next(&mut self) {
        let len = self.markers().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        let len = self.markers().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    /// Select a shop and centre the map on it
    pub fn select(&mut self, index: usize) {
        if let Some(marker) = self.view.marker(index) {
            self.center = marker.position;
            self.list_state.select(Some(index));
        }
    }

    pub fn zoom_in(&mut self) {
        if self.zoom < self.view.config().tiles.max_zoom {
            self.zoom += 1;
        }
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
    }

    /// Visible (lng, lat) extent in degrees
    pub fn span(&self) -> (f64, f64) {
        let lng_span = (360.0 / 2f64.powi(self.zoom as i32) * TILES_ACROSS).min(360.0);
        (lng_span, (lng_span / 2.0).min(2.0 * MAX_LATITUDE))
    }

    /// Move the viewport by a quarter screen per step
    pub fn pan(&mut self, lat_steps: i32, lng_steps: i32) {
        let (lng_span, lat_span) = self.span();
        self.center.lat = (self.center.lat + lat_span / 4.0 * lat_steps as f64)
            .clamp(-MAX_LATITUDE, MAX_LATITUDE);
        self.center.lng = (self.center.lng + lng_span / 4.0 * lng_steps as f64)
            .clamp(-180.0, 180.0);
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let (lng_span, _) = self.span();
        [self.center.lng - lng_span / 2.0, self.center.lng + lng_span / 2.0]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let (_, lat_span) = self.span();
        [self.center.lat - lat_span / 2.0, self.center.lat + lat_span / 2.0]
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        self.markers().iter().filter(move |m| {
            (west..=east).contains(&m.position.lng) && (south..=north).contains(&m.position.lat)
        })
    }

    pub fn title(&self) -> &str {
        &self.view.config().map.title
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_popup(),
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.next(),
                KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.previous(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                KeyCode::Char('-') => app.zoom_out(),
                KeyCode::Left | KeyCode::Char('h') => app.pan(0, -1),
                KeyCode::Right | KeyCode::Char('l') => app.pan(0, 1),
                KeyCode::PageUp => app.pan(1, 0),
                KeyCode::PageDown => app.pan(-1, 0),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Map + side panel
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_map(f, content_chunks[0], app);

    if app.show_popup {
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(content_chunks[1]);
        render_shop_list(f, side[0], app);
        render_popup(f, side[1], app);
    } else {
        render_shop_list(f, content_chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("{} shops", app.markers().len()),
            Style::default().fg(Color::Green),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.list_state.selected();
    let plotted: Vec<(f64, f64, String, bool)> = app
        .visible_markers()
        .map(|m| (m.position.lng, m.position.lat, m.icon.glyph.clone(), Some(m.id) == selected))
        .collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    " {:.4}, {:.4}  z{} ",
                    app.center.lat, app.center.lng, app.zoom
                )),
        )
        .x_bounds(app.x_bounds())
        .y_bounds(app.y_bounds())
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (x, y, glyph, is_selected) in &plotted {
                let style = if *is_selected {
                    Style::default().bg(Color::Yellow)
                } else {
                    Style::default()
                };
                ctx.print(*x, *y, Span::styled(glyph.clone(), style));
            }
        });

    f.render_widget(canvas, area);
}

fn render_shop_list(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .markers()
        .iter()
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", m.icon.glyph)),
                Span::raw(truncate(&m.popup.title, area.width.saturating_sub(8) as usize)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Shops "))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_popup(f: &mut Frame, area: Rect, app: &App) {
    let marker = match app.selected_marker() {
        Some(m) => m,
        None => {
            let no_selection = Paragraph::new("No shop selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Popup "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let popup = &marker.popup;
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", popup.title),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(format!("  {}", popup.address))),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", popup.link.caption),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", popup.link.href),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let panel = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Popup "),
        );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible_markers().count();
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} / {} visible ", visible, app.markers().len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(concat!(
            "│ ↑↓ select │ Enter popup ",
            "│ ←→ PgUp PgDn pan │ +/- zoom │ q quit",
        )),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ShopRecord};
    use crate::config::MapConfig;

    fn app_with(shops: Vec<ShopRecord>) -> App {
        App::new(MapView::build(Catalog::from_records(shops), MapConfig::default()).unwrap())
    }

    fn three_shops() -> App {
        app_with(vec![
            ShopRecord::new("A", "a", 41.02, 28.97, "https://m/a"),
            ShopRecord::new("B", "b", 41.04, 29.00, "https://m/b"),
            ShopRecord::new("C", "c", 40.99, 29.03, "https://m/c"),
        ])
    }

    #[test]
    fn test_starts_at_configured_view() {
        let app = three_shops();
        assert_eq!(app.center, LatLng::new(41.0082, 28.9784));
        assert_eq!(app.zoom, 12);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(!app.show_popup);
    }

    #[test]
    fn test_selection_wraps_and_recenters() {
        let mut app = three_shops();
        app.next();
        assert_eq!(app.selected_marker().unwrap().popup.title, "B");
        assert_eq!(app.center, LatLng::new(41.04, 29.00));

        app.next();
        app.next();
        assert_eq!(app.list_state.selected(), Some(0));

        app.previous();
        assert_eq!(app.selected_marker().unwrap().popup.title, "C");
    }

    #[test]
    fn test_popup_shows_selected_shop() {
        let mut app = three_shops();
        app.toggle_popup();
        assert!(app.show_popup);
        assert_eq!(app.selected_marker().unwrap().popup.link.href, "https://m/a");
        app.toggle_popup();
        assert!(!app.show_popup);
    }

    #[test]
    fn test_empty_catalog_is_inert() {
        let mut app = app_with(vec![]);
        assert_eq!(app.list_state.selected(), None);
        app.next();
        app.previous();
        app.toggle_popup();
        assert!(app.selected_marker().is_none());
        assert!(!app.show_popup);
        assert_eq!(app.visible_markers().count(), 0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut app = three_shops();
        for _ in 0..30 {
            app.zoom_in();
        }
        assert_eq!(app.zoom, 19);
        for _ in 0..30 {
            app.zoom_out();
        }
        assert_eq!(app.zoom, 0);
        assert_eq!(app.span().0, 360.0);
    }

    #[test]
    fn test_visible_markers_follow_viewport() {
        let mut app = three_shops();
        assert_eq!(app.visible_markers().count(), 3);

        app.zoom = 19;
        app.select(1);
        let visible: Vec<&str> = app.visible_markers().map(|m| m.popup.title.as_str()).collect();
        assert_eq!(visible, vec!["B"]);
    }

    #[test]
    fn test_pan_moves_quarter_span_and_clamps() {
        let mut app = three_shops();
        let (lng_span, _) = app.span();
        let start = app.center;

        app.pan(0, 1);
        assert!((app.center.lng - (start.lng + lng_span / 4.0)).abs() < 1e-9);

        app.zoom = 0;
        for _ in 0..10 {
            app.pan(1, 0);
        }
        assert_eq!(app.center.lat, MAX_LATITUDE);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Kadıköy", 10), "Kadıköy");
        assert_eq!(truncate("Chocolate House", 6), "Choco…");
    }
}
