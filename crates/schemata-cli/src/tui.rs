//! Interactive schema list
//!
//! Two sections (Favorites, Results) over the catalog, a filter line, and
//! an optional metadata pane. The catalog loads on a worker thread; the
//! list stays responsive and shows a loading state until it arrives.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::debug;

use schemata::actions::{schema_snippet, SchemaAction};
use schemata::catalog::{fetch_or_empty, CatalogEntry, CatalogSource};
use schemata::data::{FavoritesMap, FavoritesStore, KeyValueStore, Settings};
use schemata::notice::{CollectingNotifier, Notice, NoticeLevel};
use schemata::view::{ListView, SectionKind};

use crate::host::Host;

/// Input poll interval
const TICK_RATE: Duration = Duration::from_millis(100);

/// How long a notice stays in the footer
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Rows skipped by PageUp / PageDown
const PAGE_SIZE: isize = 10;

/// Result of a catalog fetch, tagged with the generation that requested it
pub struct FetchOutcome {
    generation: u64,
    schemas: Vec<CatalogEntry>,
    notices: Vec<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Filter,
    List,
}

pub struct App<H: Host> {
    source: Arc<dyn CatalogSource>,
    favorites_store: FavoritesStore,
    settings_store: KeyValueStore,
    settings: Settings,
    favorites: FavoritesMap,
    results: Vec<CatalogEntry>,
    query: String,
    /// Flat row index into the current `ListView`
    selected: usize,
    /// Index into the selected entry's version labels
    version: Option<usize>,
    focus: Focus,
    loading: bool,
    /// Monotonically increasing counter to discard stale fetch results
    generation: u64,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
    notice: Option<(Notice, Instant)>,
    paste: Option<String>,
    running: bool,
    host: H,
}

impl<H: Host> App<H> {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        store: KeyValueStore,
        settings: Settings,
        host: H,
    ) -> Self {
        let favorites_store = FavoritesStore::new(store.clone());
        let favorites = favorites_store.get();
        let (fetch_tx, fetch_rx) = unbounded();
        Self {
            source,
            favorites_store,
            settings_store: store,
            settings,
            favorites,
            results: Vec::new(),
            query: String::new(),
            selected: 0,
            version: None,
            focus: Focus::Filter,
            loading: false,
            generation: 0,
            fetch_tx,
            fetch_rx,
            notice: None,
            paste: None,
            running: true,
            host,
        }
    }

    fn view(&self) -> ListView<'_> {
        ListView::build(&self.favorites, &self.results, &self.query)
    }

    fn selected_entry(&self) -> Option<CatalogEntry> {
        self.view().row(self.selected).map(|(_, row)| row.entry.clone())
    }

    fn selected_version<'e>(&self, entry: &'e CatalogEntry) -> Option<&'e str> {
        let index = self.version?;
        entry.version_labels().get(index).copied()
    }

    /// URL the row actions act on: the selected version, or the main URL
    fn target_url(&self, entry: &CatalogEntry) -> String {
        entry.url_for(self.selected_version(entry)).to_string()
    }

    /// The snippet chosen with the paste action, if any
    pub fn take_paste(&mut self) -> Option<String> {
        self.paste.take()
    }

    // =========================================================================
    // Catalog loading
    // =========================================================================

    /// Fetch the catalog on a worker thread
    ///
    /// Each call increments `generation`; results from earlier calls are
    /// discarded in `finish_fetch`.
    pub fn start_fetch(&mut self) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();

        let spawned = std::thread::Builder::new()
            .name("catalog-fetch".into())
            .spawn(move || {
                let notifier = CollectingNotifier::new();
                let schemas = fetch_or_empty(source.as_ref(), &notifier);
                let _ = tx.send(FetchOutcome {
                    generation,
                    schemas,
                    notices: notifier.drain(),
                });
            });

        if let Err(e) = spawned {
            self.loading = false;
            self.notify(Notice::failure("Could not load catalog", e.to_string()));
        }
    }

    /// Apply any fetch results that have arrived
    pub fn poll_fetch(&mut self) {
        while let Ok(outcome) = self.fetch_rx.try_recv() {
            self.finish_fetch(outcome);
        }
    }

    fn finish_fetch(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "discarding stale catalog"
            );
            return;
        }
        self.loading = false;
        self.results = outcome.schemas;
        for notice in outcome.notices {
            self.notify(notice);
        }
        self.clamp_selection();
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.running = false,
                KeyCode::Char('r') => self.start_fetch(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_SIZE),
            KeyCode::PageDown => self.move_selection(PAGE_SIZE),
            KeyCode::Enter => self.perform(SchemaAction::PasteSnippet),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Filter => Focus::List,
                    Focus::List => Focus::Filter,
                };
            }
            KeyCode::Esc => {
                if self.focus == Focus::Filter && !self.query.is_empty() {
                    self.set_query(String::new());
                } else {
                    self.running = false;
                }
            }
            code => match self.focus {
                Focus::Filter => self.handle_filter_key(code),
                Focus::List => self.handle_list_key(code),
            },
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                let mut query = std::mem::take(&mut self.query);
                query.push(c);
                self.set_query(query);
            }
            KeyCode::Backspace => {
                let mut query = std::mem::take(&mut self.query);
                query.pop();
                self.set_query(query);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('c') => self.perform(SchemaAction::CopyUrl),
            KeyCode::Char('o') => self.perform(SchemaAction::OpenInBrowser),
            KeyCode::Char('f') => self.perform(SchemaAction::ToggleFavorite),
            KeyCode::Char('v') => self.cycle_version(),
            KeyCode::Char('d') => self.toggle_details(),
            KeyCode::Char('r') => self.start_fetch(),
            KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('/') => self.focus = Focus::Filter,
            KeyCode::Char('q') => self.running = false,
            _ => {}
        }
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.selected = 0;
        self.version = None;
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = (len - 1) as isize;
        let next = (self.selected as isize + delta).clamp(0, max) as usize;
        if next != self.selected {
            self.selected = next;
            self.version = None;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
            self.version = None;
        }
    }

    fn cycle_version(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let count = entry.version_labels().len();
        if count == 0 {
            self.notify(Notice::failure("No versions", format!("{} has one version", entry.name)));
            return;
        }
        self.version = match self.version {
            None => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            Some(_) => None,
        };
    }

    fn toggle_details(&mut self) {
        self.settings.show_details = !self.settings.show_details;
        if let Err(e) = self.settings.save(&self.settings_store) {
            self.notify(Notice::from_error(&e));
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn perform(&mut self, action: SchemaAction) {
        let Some(entry) = self.selected_entry() else {
            self.notify(Notice::failure("Nothing selected", "No schema is selected"));
            return;
        };
        let url = self.target_url(&entry);

        match action {
            SchemaAction::PasteSnippet => {
                let snippet = schema_snippet(&url);
                if let Err(e) = self.host.copy(&snippet) {
                    debug!(error = %e, "snippet not placed on clipboard");
                }
                self.paste = Some(snippet);
                self.running = false;
            }
            SchemaAction::CopyUrl => match self.host.copy(&url) {
                Ok(()) => self.notify(Notice::success("Copied URL to clipboard")),
                Err(e) => self.notify(Notice::from_error(&e)),
            },
            SchemaAction::OpenInBrowser => {
                if let Err(e) = self.host.open(&url) {
                    self.notify(Notice::from_error(&e));
                }
            }
            SchemaAction::ToggleFavorite => match self.favorites_store.toggle(&entry) {
                Ok(added) => {
                    self.favorites = self.favorites_store.get();
                    self.clamp_selection();
                    let title = if added {
                        "Added to Favorites"
                    } else {
                        "Removed from Favorites"
                    };
                    self.notify(Notice::success(title));
                }
                Err(e) => self.notify(Notice::from_error(&e)),
            },
        }
    }

    fn notify(&mut self, notice: Notice) {
        debug!(notice = %notice.line(), "notice");
        self.notice = Some((notice, Instant::now()));
    }

    /// Expire the footer notice
    fn tick(&mut self, now: Instant) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, shown_at)| now.duration_since(*shown_at) >= NOTICE_TTL);
        if expired {
            self.notice = None;
        }
    }
}

// =============================================================================
// Terminal loop
// =============================================================================

/// Run the interactive list until the user quits
///
/// Draws on stderr so stdout carries only the pasted snippet. Returns the
/// snippet when the user chose the paste action.
pub fn run<H: Host>(mut app: App<H>) -> io::Result<Option<String>> {
    app.start_fetch();

    terminal::enable_raw_mode()?;
    io::stderr().execute(EnterAlternateScreen)?;
    let result = Terminal::new(CrosstermBackend::new(io::stderr()))
        .and_then(|mut terminal| event_loop(&mut terminal, &mut app));

    terminal::disable_raw_mode()?;
    io::stderr().execute(LeaveAlternateScreen)?;

    result?;
    Ok(app.take_paste())
}

fn event_loop<B: Backend, H: Host>(terminal: &mut Terminal<B>, app: &mut App<H>) -> io::Result<()> {
    while app.running {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        app.poll_fetch();
        app.tick(Instant::now());
    }
    Ok(())
}

// =============================================================================
// Drawing
// =============================================================================

fn draw_ui<H: Host>(f: &mut Frame, app: &App<H>) {
    let area = f.area();

    let outer = Block::default()
        .title(format!(" Schemata v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // filter
        Constraint::Min(3),    // list + details
        Constraint::Length(1), // footer
    ])
    .split(inner);

    draw_filter(f, app, chunks[0]);

    let view = app.view();
    let selected = view.row(app.selected).map(|(_, row)| row.entry);

    if app.settings.show_details {
        let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        draw_list(f, app, &view, cols[0]);
        draw_details(f, app, selected, cols[1]);
    } else {
        draw_list(f, app, &view, chunks[1]);
    }

    draw_footer(f, app, selected.is_some_and(|e| app.favorites.contains_key(&e.url)), chunks[2]);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_filter<H: Host>(f: &mut Frame, app: &App<H>, area: Rect) {
    let focused = app.focus == Focus::Filter;
    let block = Block::default()
        .title(format!(" Search {} ", app.source.name()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(focus_style(focused));

    let line = if app.query.is_empty() && !focused {
        Line::from(Span::styled(" type / to filter", Style::default().fg(Color::DarkGray)))
    } else {
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(app.query.as_str(), Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ])
    };
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_list<H: Host>(f: &mut Frame, app: &App<H>, view: &ListView<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(focus_style(app.focus == Focus::List));

    if view.is_empty() {
        let message = if app.loading {
            "Loading catalog..."
        } else if app.query.is_empty() {
            "No schemas"
        } else {
            "No schemas match your search"
        };
        let text = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(text, area);
        return;
    }

    let desc_width = (area.width as usize).saturating_sub(4) / 2;
    let mut items = Vec::with_capacity(view.len() + view.sections().len());
    let mut selected_item = None;
    let mut flat = 0;

    for section in view.sections() {
        let mut header = format!(" {} ({})", section.kind.title(), section.rows.len());
        if app.loading && section.kind == SectionKind::Results {
            header.push_str(" refreshing...");
        }
        items.push(ListItem::new(Line::from(Span::styled(
            header,
            Style::default().fg(Color::DarkGray).bold(),
        ))));

        for row in &section.rows {
            if flat == app.selected {
                selected_item = Some(items.len());
            }
            let star = if row.is_favorite { "★ " } else { "  " };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(star, Style::default().fg(Color::Yellow)),
                Span::styled(row.entry.name.as_str(), Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(
                    truncate_str(&row.entry.description, desc_width),
                    Style::default().fg(Color::DarkGray),
                ),
            ])));
            flat += 1;
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).bold());
    let mut state = ListState::default();
    state.select(selected_item);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_details<H: Host>(f: &mut Frame, app: &App<H>, entry: Option<&CatalogEntry>, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(entry) = entry else {
        f.render_widget(block, area);
        return;
    };

    let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
    let version = app.selected_version(entry);
    let mut lines = vec![
        Line::from(Span::styled(entry.name.as_str(), Style::default().fg(Color::White).bold())),
        Line::from(""),
    ];
    if !entry.description.is_empty() {
        lines.push(Line::from(entry.description.as_str()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        label("URL: "),
        Span::styled(entry.url_for(version), Style::default().fg(Color::Cyan)),
    ]));

    if app.favorites.contains_key(&entry.url) {
        lines.push(Line::from(vec![
            label("Favorite: "),
            Span::styled("★", Style::default().fg(Color::Yellow)),
        ]));
    }

    let patterns = entry.file_patterns();
    if !patterns.is_empty() {
        lines.push(Line::from(vec![label("File match: "), Span::raw(patterns.join(", "))]));
    }

    let labels = entry.version_labels();
    if !labels.is_empty() {
        lines.push(Line::from(label("Versions ('v' to select):")));
        let latest = if version.is_none() { "› " } else { "  " };
        lines.push(Line::from(format!("  {latest}latest")));
        for l in labels {
            let marker = if version == Some(l) { "› " } else { "  " };
            lines.push(Line::from(format!("  {marker}{l}")));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_footer<H: Host>(f: &mut Frame, app: &App<H>, is_favorite: bool, area: Rect) {
    if let Some((notice, _)) = &app.notice {
        let color = match notice.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Failure => Color::Red,
        };
        let line = Line::from(Span::styled(
            format!(" {}", notice.line()),
            Style::default().fg(color),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();
    for action in SchemaAction::ALL {
        let key = match (action, app.focus) {
            // Single-letter actions only reach the list
            (SchemaAction::PasteSnippet, _) | (_, Focus::List) => action.key_hint(),
            (_, Focus::Filter) => continue,
        };
        spans.push(Span::styled(format!(" '{key}' "), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!("{} |", action.label(is_favorite))));
    }
    spans.push(Span::styled(" tab ", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw("focus |"));
    spans.push(Span::styled(" esc ", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw("quit"));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Truncate to `max` characters, marking the cut with "..."
fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max).collect()
    }
}
