//! Ratatui reader for the blog, with the search dialog as an overlay.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::backend::TestBackend;
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{ContentSource, PostQuery, WpClient};
use crate::config::AppConfig;
use crate::content::{
    WORDS_PER_MINUTE, category_display_name, collection_label, format_date, meta_description,
    plain_text, reading_time,
};
use crate::model::types::{Category, ContentItem};
use crate::routes::Route;
use crate::search::{SearchController, SearchDialog, SearchStatus};
use crate::ui::components::theme::{ThemeMode, ThemePalette, chip_style};
use crate::ui::components::widgets::{render_results, search_bar};
use crate::ui::document::Document;
use crate::ui::shortcuts;

/// Posts shown on the home page.
pub const HOME_FEATURED: usize = 6;
const EXCERPT_LEN: usize = 160;

#[derive(Serialize, Deserialize, Default)]
struct TuiStatePersisted {
    theme: Option<String>,
}

/// What the body of the current route shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PageView {
    #[default]
    Loading,
    Home {
        posts: Vec<ContentItem>,
    },
    Listing {
        slug: String,
        page: u32,
        total_pages: u32,
        posts: Vec<ContentItem>,
    },
    Collections {
        entries: Vec<Category>,
    },
    Post {
        item: Option<ContentItem>,
    },
    Failed {
        message: String,
    },
}

impl PageView {
    fn selectable_len(&self) -> usize {
        match self {
            PageView::Home { posts } | PageView::Listing { posts, .. } => posts.len(),
            PageView::Collections { entries } => entries.len(),
            _ => 0,
        }
    }
}

/// Categories with at least one post, in API order.
pub fn collections_from(categories: Vec<Category>) -> Vec<Category> {
    categories.into_iter().filter(|c| c.count > 0).collect()
}

/// Fetch whatever `route` needs. Failures become a [`PageView::Failed`].
pub async fn load_page(client: &WpClient, route: &Route) -> PageView {
    let loaded = match route {
        Route::Home => client.get_posts(&PostQuery::default()).await.map(|mut posts| {
            posts.truncate(HOME_FEATURED);
            PageView::Home { posts }
        }),
        Route::Category { slug, page } => {
            client
                .posts_by_category(slug, *page)
                .await
                .map(|listing| PageView::Listing {
                    slug: slug.clone(),
                    page: *page,
                    total_pages: listing.total_pages,
                    posts: listing.posts,
                })
        }
        Route::Collections => client
            .get_categories()
            .await
            .map(|cats| PageView::Collections {
                entries: collections_from(cats),
            }),
        Route::Post { slug } => client
            .get_post_by_slug(slug)
            .await
            .map(|item| PageView::Post { item }),
    };
    loaded.unwrap_or_else(|err| {
        warn!(route = %route, error = %err, "page load failed");
        PageView::Failed {
            message: err.to_string(),
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    Quit,
    /// Load `route`; `push` records the current route for Backspace.
    Navigate { route: Route, push: bool },
}

pub struct App<C: ContentSource> {
    route: Route,
    page: PageView,
    history: Vec<Route>,
    selected: usize,
    scroll: u16,
    theme: ThemeMode,
    viewport: Rect,
    state_path: Option<PathBuf>,
    dialog: SearchDialog<C>,
    document: Arc<Document>,
}

impl<C: ContentSource> App<C> {
    pub fn new(dialog: SearchDialog<C>, document: Arc<Document>, theme: ThemeMode) -> Self {
        Self {
            route: Route::Home,
            page: PageView::Loading,
            history: Vec::new(),
            selected: 0,
            scroll: 0,
            theme,
            viewport: Rect::new(0, 0, 80, 24),
            state_path: None,
            dialog,
            document,
        }
    }

    pub fn with_state_path(mut self, path: PathBuf) -> Self {
        self.state_path = Some(path);
        self
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn page(&self) -> &PageView {
        &self.page
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn dialog(&self) -> &SearchDialog<C> {
        &self.dialog
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Install a loaded page. Every route change passes through here so an
    /// open search dialog sees it.
    pub fn show(&mut self, route: Route, page: PageView, push: bool) {
        if push && route != self.route {
            self.history.push(self.route.clone());
        }
        debug!(route = %route, "show");
        self.route = route;
        self.page = page;
        self.selected = 0;
        self.scroll = 0;
        self.dialog.on_route_change(&self.route);
    }

    /// Apply pending search updates.
    pub fn tick(&mut self) -> bool {
        self.dialog.pump()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.dialog.is_open() {
            return self.handle_dialog_key(key);
        }
        if self.dialog.on_global_key(&key) {
            return Action::Redraw;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(10) => Action::Quit,
            KeyCode::Char('/') => {
                self.dialog.open();
                Action::Redraw
            }
            KeyCode::F(2) => {
                self.theme = self.theme.toggle();
                self.persist();
                Action::Redraw
            }
            KeyCode::Char('h') => self.navigate(Route::Home),
            KeyCode::Char('c') => self.navigate(Route::Collections),
            KeyCode::Char('a') => self.navigate(Route::all_posts()),
            KeyCode::Backspace => match self.history.pop() {
                Some(route) => Action::Navigate { route, push: false },
                None => Action::None,
            },
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-10),
            KeyCode::PageDown => self.scroll_by(10),
            KeyCode::Left => self.turn_page(-1),
            KeyCode::Right => self.turn_page(1),
            KeyCode::Enter => self.open_selected(),
            _ => Action::None,
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Esc => {
                self.dialog.on_escape();
                Action::Redraw
            }
            KeyCode::Char('w') if ctrl => {
                self.dialog.close();
                Action::Redraw
            }
            KeyCode::Up => {
                self.dialog.move_selection(-1);
                Action::Redraw
            }
            KeyCode::Down => {
                self.dialog.move_selection(1);
                Action::Redraw
            }
            KeyCode::Enter => match self.dialog.select_current() {
                Some(route) => Action::Navigate { route, push: true },
                None => Action::None,
            },
            KeyCode::Backspace => {
                self.dialog.pop_char();
                Action::Redraw
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.dialog.push_char(c);
                Action::Redraw
            }
            _ => Action::None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.dialog.is_open() => {
                if !contains(popup_rect(self.viewport), mouse.column, mouse.row) {
                    debug!("overlay click");
                    self.dialog.close();
                    return Action::Redraw;
                }
                Action::None
            }
            MouseEventKind::ScrollUp => self.scroll_by(-3),
            MouseEventKind::ScrollDown => self.scroll_by(3),
            _ => Action::None,
        }
    }

    fn navigate(&self, route: Route) -> Action {
        if route == self.route {
            return Action::None;
        }
        Action::Navigate { route, push: true }
    }

    fn scroll_by(&mut self, delta: i16) -> Action {
        if self.document.is_scroll_locked() {
            return Action::None;
        }
        let len = self.page.selectable_len();
        if len > 0 {
            let next = self
                .selected
                .saturating_add_signed(delta as isize)
                .min(len - 1);
            self.selected = next;
        } else {
            self.scroll = self.scroll.saturating_add_signed(delta);
        }
        Action::Redraw
    }

    fn turn_page(&self, delta: i64) -> Action {
        let PageView::Listing {
            slug,
            page,
            total_pages,
            ..
        } = &self.page
        else {
            return Action::None;
        };
        let last = i64::from((*total_pages).max(1));
        let next = (i64::from(*page) + delta).clamp(1, last) as u32;
        if next == *page {
            return Action::None;
        }
        Action::Navigate {
            route: Route::Category {
                slug: slug.clone(),
                page: next,
            },
            push: true,
        }
    }

    fn open_selected(&self) -> Action {
        let route = match &self.page {
            PageView::Home { posts } | PageView::Listing { posts, .. } => {
                posts.get(self.selected).map(|p| Route::Post {
                    slug: p.slug.clone(),
                })
            }
            PageView::Collections { entries } => {
                entries.get(self.selected).map(|c| Route::Category {
                    slug: c.slug.clone(),
                    page: 1,
                })
            }
            _ => None,
        };
        route.map_or(Action::None, |route| self.navigate(route))
    }

    fn persist(&self) {
        if let Some(path) = &self.state_path {
            save_state(
                path,
                &TuiStatePersisted {
                    theme: Some(self.theme.label().to_string()),
                },
            );
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let palette = self.theme.palette();
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
            area,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let header = Line::from(vec![
            Span::styled("RyzNotes", palette.title()),
            Span::raw("  "),
            Span::styled(self.route.path(), palette.hint_style()),
            Span::raw("  "),
            Span::styled(format!("[{}]", self.theme.label()), palette.hint_style()),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        self.draw_page(frame, chunks[1], palette);

        frame.render_widget(
            Paragraph::new(Span::styled(
                footer_legend(self.dialog.is_open()),
                palette.hint_style(),
            )),
            chunks[2],
        );

        if self.dialog.is_open() {
            self.draw_search(frame, area, palette);
        }
    }

    fn draw_page(&self, frame: &mut Frame, area: Rect, palette: ThemePalette) {
        let block = |title: String| {
            Block::default()
                .title(Span::styled(title, palette.title()))
                .borders(Borders::ALL)
                .border_style(palette.border_style())
        };
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));

        match &self.page {
            PageView::Loading => frame.render_widget(
                Paragraph::new(Span::styled("Loading...", palette.hint_style()))
                    .block(block(String::new())),
                area,
            ),
            PageView::Failed { message } => frame.render_widget(
                Paragraph::new(Span::styled(message.clone(), palette.error_style()))
                    .wrap(Wrap { trim: true })
                    .block(block("Error".into())),
                area,
            ),
            PageView::Home { posts } => {
                let list = post_list(posts, palette).block(block("Featured posts".into()));
                frame.render_stateful_widget(list, area, &mut list_state);
            }
            PageView::Listing {
                slug,
                page,
                total_pages,
                posts,
            } => {
                let heading = if slug == "all" {
                    "All Posts".to_string()
                } else {
                    format!("{} - Blog Posts", category_display_name(slug))
                };
                let title = format!(
                    "{heading}  ·  page {page}/{}  ({} prev/next)",
                    (*total_pages).max(1),
                    shortcuts::PAGE_PREV_NEXT
                );
                if posts.is_empty() {
                    frame.render_widget(
                        Paragraph::new(Span::styled("No posts yet.", palette.hint_style()))
                            .block(block(title)),
                        area,
                    );
                } else {
                    let list = post_list(posts, palette).block(block(title));
                    frame.render_stateful_widget(list, area, &mut list_state);
                }
            }
            PageView::Collections { entries } => {
                let items: Vec<ListItem> = entries
                    .iter()
                    .map(|c| {
                        let plural = if c.count == 1 { "" } else { "s" };
                        ListItem::new(Line::from(vec![
                            Span::styled(collection_label(&c.name), palette.text()),
                            Span::styled(
                                format!("  {} post{plural}", c.count),
                                palette.hint_style(),
                            ),
                        ]))
                    })
                    .collect();
                let list = List::new(items)
                    .highlight_style(palette.selected_style())
                    .block(block("Posts by Collection".into()));
                frame.render_stateful_widget(list, area, &mut list_state);
            }
            PageView::Post { item: None } => frame.render_widget(
                Paragraph::new(Span::styled("Post not found.", palette.hint_style()))
                    .block(block(String::new())),
                area,
            ),
            PageView::Post { item: Some(post) } => {
                frame.render_widget(
                    Paragraph::new(post_lines(post, palette))
                        .wrap(Wrap { trim: false })
                        .scroll((self.scroll, 0))
                        .block(block(plain_text(&post.title))),
                    area,
                );
            }
        }
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, palette: ThemePalette) {
        let popup = popup_rect(area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_focus_style())
            .style(palette.surface_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let state = self.dialog.state();
        let loading = state.status == SearchStatus::Loading;
        frame.render_widget(
            search_bar(&state.query, palette, loading, self.dialog.input_focused()),
            parts[0],
        );
        if let Some(view) = self.dialog.view() {
            render_results(frame, parts[1], &view, self.dialog.selected(), palette);
        }
        let hint = format!(
            "{} select · {} open · {} close",
            shortcuts::RESULT_NAV,
            shortcuts::OPEN,
            shortcuts::CLOSE_SEARCH
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hint, palette.hint_style())).alignment(Alignment::Right),
            parts[2],
        );
    }
}

fn post_list(posts: &[ContentItem], palette: ThemePalette) -> List<'static> {
    let items: Vec<ListItem> = posts.iter().map(|p| post_item(p, palette)).collect();
    List::new(items).highlight_style(palette.selected_style())
}

fn post_item(post: &ContentItem, palette: ThemePalette) -> ListItem<'static> {
    let mut meta = Vec::new();
    if let Some(date) = &post.date {
        meta.push(Span::styled(format_date(date), palette.hint_style()));
        meta.push(Span::raw("  "));
    }
    if let Some(cat) = &post.category {
        meta.push(Span::styled(format!("[{cat}]"), chip_style(palette)));
    }
    ListItem::new(vec![
        Line::from(Span::styled(
            plain_text(&post.title),
            palette.text().add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(
            meta_description(&post.excerpt, EXCERPT_LEN),
            palette.hint_style(),
        )),
        Line::from(""),
    ])
}

fn post_lines(post: &ContentItem, palette: ThemePalette) -> Vec<Line<'static>> {
    let body = post.content.as_deref().unwrap_or_default();
    let mut meta = Vec::new();
    if let Some(date) = &post.date {
        meta.push(format_date(date));
    }
    if let Some(cat) = &post.category {
        meta.push(cat.clone());
    }
    meta.push(reading_time(body, WORDS_PER_MINUTE));

    let mut lines = vec![
        Line::from(Span::styled(meta.join(" · "), palette.hint_style())),
        Line::from(""),
    ];
    let text = plain_text(&body.replace("</p>", "</p>\n"));
    lines.extend(
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .flat_map(|l| [Line::from(Span::styled(l.to_string(), palette.text())), Line::from("")]),
    );
    lines
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
}

/// Search dialog area for a given screen.
pub fn popup_rect(area: Rect) -> Rect {
    centered_rect(70, 70, area)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn state_path_for(data_dir: &Path) -> PathBuf {
    // Lightweight, non-secret UI preferences only.
    data_dir.join("tui_state.json")
}

fn load_state(path: &Path) -> TuiStatePersisted {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_state(path: &Path, state: &TuiStatePersisted) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(body) = serde_json::to_string_pretty(state) {
        let _ = std::fs::write(path, body);
    }
}

pub fn footer_legend(search_open: bool) -> &'static str {
    if search_open {
        "type to search | Up/Down select | Enter open | Esc close (empty query) | Ctrl+W close"
    } else {
        "Ctrl+K or / search | h home | a all posts | c collections | Enter open | Backspace back | Left/Right page | F2 theme | q quit"
    }
}

/// Owns the real terminal; restores it on drop, including on panic unwind.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = teardown_terminal() {
            warn!(error = %err, "terminal teardown failed");
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Run the reader. Must be called from a blocking thread inside a tokio
/// runtime: page loads block on the runtime handle and search requests are
/// spawned onto it.
pub fn run_tui(config: &AppConfig, client: Arc<WpClient>, data_dir: &Path, once: bool) -> Result<()> {
    let handle = tokio::runtime::Handle::current();
    let state_path = state_path_for(data_dir);
    let persisted = load_state(&state_path);
    let theme = persisted
        .theme
        .as_deref()
        .map(ThemeMode::from_label)
        .unwrap_or_default();

    let document = Document::new();
    let controller =
        SearchController::with_settings(Arc::clone(&client), config.debounce(), config.search_limit);
    let dialog = SearchDialog::new(controller, Arc::clone(&document));
    let mut app = App::new(dialog, document, theme).with_state_path(state_path);

    let initial = app.route().clone();
    let page = handle.block_on(load_page(&client, &initial));
    app.show(initial, page, false);

    if once
        && std::env::var("TUI_HEADLESS")
            .map(|v| v == "1")
            .unwrap_or(false)
    {
        return run_tui_headless(&app);
    }

    let mut session = TerminalSession::enter()?;
    let size = session.terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));
    info!(api = client.base_url().unwrap_or("<unset>"), "tui started");

    let tick_rate = Duration::from_millis(30);
    let mut needs_draw = true;
    loop {
        if app.tick() {
            needs_draw = true;
        }
        if needs_draw {
            session.terminal.draw(|f| app.draw(f))?;
            needs_draw = false;
        }
        if once {
            break;
        }
        if !event::poll(tick_rate)? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Resize(w, h) => {
                app.set_viewport(Rect::new(0, 0, w, h));
                Action::Redraw
            }
            _ => Action::None,
        };
        match action {
            Action::None => {}
            Action::Redraw => needs_draw = true,
            Action::Quit => break,
            Action::Navigate { route, push } => {
                let page = handle.block_on(load_page(&client, &route));
                app.show(route, page, push);
                needs_draw = true;
            }
        }
    }
    info!("tui exited");
    Ok(())
}

fn run_tui_headless<C: ContentSource>(app: &App<C>) -> Result<()> {
    let mut terminal = Terminal::new(TestBackend::new(100, 30))?;
    terminal.draw(|f| app.draw(f))?;
    info!(route = %app.route(), "headless frame rendered");
    Ok(())
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}
