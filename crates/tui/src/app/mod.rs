use std::sync::Arc;
use std::time::{Duration, Instant};

use api_types::CollectionKind;
use api_types::entry::{Entry, EntryPatch};
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use storage::{FallbackStore, JsonStore, MemoryStore, RestStore, Storage, StorageError};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dispatch::{Dispatcher, EXIT_ANIM},
    error::{AppError, Result},
    quick_add,
    swipe::{PointerKind, SwipeConfig, SwipeOutcome, SwipeTracker},
    ui::{self, keymap::AppAction},
};

const TICK_RATE: Duration = Duration::from_millis(200);
// Faster polling while a row is animating out.
const ANIM_TICK_RATE: Duration = Duration::from_millis(40);
const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Finance,
    Media,
}

impl Section {
    pub fn label(self) -> &'static str {
        self.kind().label()
    }

    pub fn kind(self) -> CollectionKind {
        match self {
            Self::Finance => CollectionKind::Finance,
            Self::Media => CollectionKind::Media,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

/// Row confirmed for deletion, sliding off-screen until the animation
/// deadline passes and the storage delete is issued.
#[derive(Debug, Clone, Copy)]
pub struct ExitingRow {
    pub id: Uuid,
    pub kind: CollectionKind,
    pub started_at: Instant,
}

#[derive(Debug, Default)]
pub struct EntriesState {
    pub items: Vec<Entry>,
    pub selected: usize,
    pub scroll: usize,
    pub error: Option<String>,
}

impl EntriesState {
    /// Replaces the items with a fresh authoritative listing.
    fn replace(&mut self, items: Vec<Entry>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll > self.selected {
            self.scroll = self.selected;
        }
    }

    fn select_next(&mut self, viewport_rows: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
        self.keep_selected_visible(viewport_rows);
    }

    fn select_prev(&mut self, viewport_rows: usize) {
        self.selected = self.selected.saturating_sub(1);
        self.keep_selected_visible(viewport_rows);
    }

    fn keep_selected_visible(&mut self, viewport_rows: usize) {
        if viewport_rows == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + viewport_rows {
            self.scroll = self.selected + 1 - viewport_rows;
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub finance: EntriesState,
    pub media: EntriesState,
    pub mode: Mode,
    pub add_input: String,
    pub add_error: Option<String>,
    pub toast: Option<ToastState>,
    pub exiting: Option<ExitingRow>,
    pub last_refresh: Option<DateTime<Local>>,
    pub backend_label: String,
}

impl AppState {
    pub fn entries(&self) -> &EntriesState {
        self.entries_for(self.section.kind())
    }

    pub fn entries_for(&self, kind: CollectionKind) -> &EntriesState {
        match kind {
            CollectionKind::Finance => &self.finance,
            CollectionKind::Media => &self.media,
        }
    }

    fn entries_mut(&mut self) -> &mut EntriesState {
        self.entries_for_mut(self.section.kind())
    }

    fn entries_for_mut(&mut self, kind: CollectionKind) -> &mut EntriesState {
        match kind {
            CollectionKind::Finance => &mut self.finance,
            CollectionKind::Media => &mut self.media,
        }
    }
}

pub struct App {
    store: Arc<dyn Storage>,
    dispatcher: Dispatcher,
    pub state: AppState,
    pub swipe: SwipeTracker,
    /// Row the primary button went down on; drags and the release are
    /// routed to it, matching how pointer events stick to their element.
    pressed_row: Option<Uuid>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = build_store(config)?;
        let dispatcher = Dispatcher::new(Arc::clone(&store));
        let swipe = SwipeTracker::new(SwipeConfig {
            threshold: f32::from(config.swipe_threshold),
            time_limit: Duration::from_millis(config.swipe_time_limit_ms),
        });
        let state = AppState {
            section: Section::Finance,
            finance: EntriesState::default(),
            media: EntriesState::default(),
            mode: Mode::List,
            add_input: String::new(),
            add_error: None,
            toast: None,
            exiting: None,
            last_refresh: None,
            backend_label: backend_label(config),
        };

        Ok(Self {
            store,
            dispatcher,
            state,
            swipe,
            pressed_row: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.reload(CollectionKind::Finance).await;
        self.reload(CollectionKind::Media).await;

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state, &self.swipe))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            self.expire_toast();
            self.tick_exit_animation().await;

            let timeout = if self.state.exiting.is_some() {
                ANIM_TICK_RATE
            } else {
                TICK_RATE
            };
            if event::poll(timeout)? {
                let size = terminal.size()?;
                let viewport = Rect::new(0, 0, size.width, size.height);
                match event::read()? {
                    Event::Key(key) => self.handle_key(key, viewport).await?,
                    Event::Mouse(mouse) => self.handle_mouse(mouse, viewport).await,
                    Event::Resize(_, _) => {
                        // Layout changed under any in-flight gesture.
                        self.swipe.cancel_all();
                        self.pressed_row = None;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent, viewport: Rect) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        let editing = self.state.mode == Mode::Add;
        match ui::keymap::map_key(key, editing) {
            AppAction::Quit => {
                self.should_quit = true;
            }
            AppAction::Cancel => {
                if editing {
                    self.state.mode = Mode::List;
                    self.state.add_input.clear();
                    self.state.add_error = None;
                }
            }
            AppAction::Submit => {
                if editing {
                    self.submit_add().await;
                }
            }
            AppAction::Backspace => {
                if editing {
                    self.state.add_input.pop();
                }
            }
            AppAction::Up => {
                let rows = self.visible_rows(viewport);
                self.state.entries_mut().select_prev(rows);
            }
            AppAction::Down => {
                let rows = self.visible_rows(viewport);
                self.state.entries_mut().select_next(rows);
            }
            AppAction::Input(ch) => {
                if editing {
                    self.state.add_input.push(ch);
                } else {
                    self.command_key(ch, viewport).await;
                }
            }
            AppAction::None => {}
        }

        Ok(())
    }

    async fn command_key(&mut self, ch: char, viewport: Rect) {
        match ch {
            'f' | 'F' => self.switch_section(Section::Finance),
            'm' | 'M' => self.switch_section(Section::Media),
            'a' | 'A' => {
                self.swipe.cancel_all();
                self.pressed_row = None;
                self.state.mode = Mode::Add;
                self.state.add_input.clear();
                self.state.add_error = None;
            }
            'r' | 'R' => self.reload(self.state.section.kind()).await,
            'w' | 'W' => self.toggle_worth_it().await,
            'd' | 'D' => {
                if let Some(id) = self.selected_id() {
                    self.confirm_delete(id);
                }
            }
            'j' | 'J' => {
                let rows = self.visible_rows(viewport);
                self.state.entries_mut().select_next(rows);
            }
            'k' | 'K' => {
                let rows = self.visible_rows(viewport);
                self.state.entries_mut().select_prev(rows);
            }
            _ => {}
        }
    }

    fn switch_section(&mut self, section: Section) {
        if self.state.section != section {
            self.state.section = section;
            self.swipe.cancel_all();
            self.pressed_row = None;
        }
    }

    fn selected_id(&self) -> Option<Uuid> {
        let entries = self.state.entries();
        entries.items.get(entries.selected).map(|entry| entry.id)
    }

    fn visible_rows(&self, viewport: Rect) -> usize {
        let shell = ui::layout::shell(viewport);
        let (_, list) = ui::layout::entries_panes(shell.content);
        ui::layout::list_inner(list).height as usize
    }

    async fn handle_mouse(&mut self, mouse: MouseEvent, viewport: Rect) {
        let now = Instant::now();

        // Releases resolve in every mode: gesture state never survives a
        // pointer-up, even one delivered while the add overlay is open.
        if mouse.kind == MouseEventKind::Up(MouseButton::Left) {
            if let Some(id) = self.pressed_row.take() {
                if self.state.mode == Mode::List {
                    if self.swipe.pointer_up(id, now) == Some(SwipeOutcome::Delete) {
                        self.confirm_delete(id);
                    }
                } else {
                    self.swipe.cancel(id);
                }
            }
            return;
        }

        if self.state.mode != Mode::List {
            return;
        }
        let shell = ui::layout::shell(viewport);
        let (_, list) = ui::layout::entries_panes(shell.content);
        let inner = ui::layout::list_inner(list);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let entries = self.state.entries();
                match ui::layout::row_at(inner, mouse.column, mouse.row, entries.scroll) {
                    Some(index) if index < entries.items.len() => {
                        let id = entries.items[index].id;
                        if self.is_exiting(id) {
                            return;
                        }
                        self.state.entries_mut().selected = index;
                        self.pressed_row = Some(id);
                        self.swipe.pointer_down(
                            id,
                            i32::from(mouse.column),
                            i32::from(mouse.row),
                            PointerKind::Mouse,
                            now,
                        );
                    }
                    _ => {
                        tracing::debug!(
                            column = mouse.column,
                            row = mouse.row,
                            "pointer down outside entry rows"
                        );
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = self.pressed_row {
                    self.swipe
                        .pointer_move(id, i32::from(mouse.column), i32::from(mouse.row));
                }
            }
            _ => {}
        }
    }

    fn is_exiting(&self, id: Uuid) -> bool {
        self.state.exiting.is_some_and(|exiting| exiting.id == id)
    }

    /// Starts the exit animation for a row. The storage delete fires when
    /// the animation deadline passes in [`Self::tick_exit_animation`].
    fn confirm_delete(&mut self, id: Uuid) {
        if self.state.exiting.is_some() {
            return;
        }
        let kind = self.state.section.kind();
        if !self.state.entries().items.iter().any(|entry| entry.id == id) {
            tracing::warn!(%id, "delete confirmed for a row that is no longer displayed");
            return;
        }
        self.swipe.cancel(id);
        self.state.exiting = Some(ExitingRow {
            id,
            kind,
            started_at: Instant::now(),
        });
    }

    async fn tick_exit_animation(&mut self) {
        let due = self
            .state
            .exiting
            .is_some_and(|exiting| exiting.started_at.elapsed() >= EXIT_ANIM);
        if !due {
            return;
        }
        let Some(exiting) = self.state.exiting.take() else {
            return;
        };

        let report = self
            .dispatcher
            .delete_and_reload(exiting.kind, exiting.id)
            .await;
        // The row set is about to change; no gesture survives the re-render.
        self.swipe.cancel_all();
        self.pressed_row = None;

        match report.reload {
            Ok(items) => {
                let entries = self.state.entries_for_mut(exiting.kind);
                entries.replace(items);
                entries.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => {
                let message = storage_message(&err);
                self.state.entries_for_mut(exiting.kind).error = Some(message);
            }
        }
        match report.delete_error {
            None => self.toast(ToastLevel::Success, "Entry deleted.".to_string()),
            Some(err) => self.toast(
                ToastLevel::Error,
                format!("Delete failed: {}", storage_message(&err)),
            ),
        }
    }

    async fn reload(&mut self, kind: CollectionKind) {
        match self.store.list_entries(kind).await {
            Ok(items) => {
                let entries = self.state.entries_for_mut(kind);
                entries.replace(items);
                entries.error = None;
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => {
                self.state.entries_for_mut(kind).error = Some(storage_message(&err));
            }
        }
        self.swipe.cancel_all();
        self.pressed_row = None;
    }

    async fn toggle_worth_it(&mut self) {
        let kind = self.state.section.kind();
        let entries = self.state.entries();
        let Some(entry) = entries.items.get(entries.selected) else {
            return;
        };
        let patch = EntryPatch {
            worth_it: Some(!entry.worth_it),
        };
        match self.store.update_entry(kind, entry.id, patch).await {
            Ok(_) => self.reload(kind).await,
            Err(err) => self.toast(
                ToastLevel::Error,
                format!("Update failed: {}", storage_message(&err)),
            ),
        }
    }

    async fn submit_add(&mut self) {
        let kind = self.state.section.kind();
        let data = match quick_add::parse(&self.state.add_input, kind) {
            Ok(data) => data,
            Err(message) => {
                self.state.add_error = Some(message);
                return;
            }
        };
        match self.store.add_entry(kind, data).await {
            Ok(_) => {
                self.state.mode = Mode::List;
                self.state.add_input.clear();
                self.state.add_error = None;
                self.reload(kind).await;
                self.toast(ToastLevel::Success, "Entry logged.".to_string());
            }
            Err(err) => {
                self.state.add_error = Some(storage_message(&err));
            }
        }
    }

    fn toast(&mut self, level: ToastLevel, message: String) {
        self.state.toast = Some(ToastState {
            message,
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|toast| Instant::now() >= toast.expires_at)
        {
            self.state.toast = None;
        }
    }
}

fn build_store(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    let store: Arc<dyn Storage> = match config.backend.as_str() {
        "local" => Arc::new(JsonStore::new(&config.data_path)),
        "memory" => Arc::new(MemoryStore::new()),
        "rest" => {
            let rest = RestStore::new(&config.base_url)?;
            if config.fallback_to_local {
                Arc::new(FallbackStore::new(vec![
                    Box::new(rest),
                    Box::new(JsonStore::new(&config.data_path)),
                ]))
            } else {
                Arc::new(rest)
            }
        }
        other => {
            return Err(AppError::InvalidConfig(format!(
                "unknown backend {other:?} (expected local, rest, or memory)"
            )));
        }
    };
    Ok(store)
}

fn backend_label(config: &AppConfig) -> String {
    match config.backend.as_str() {
        "rest" if config.fallback_to_local => "rest+local".to_string(),
        other => other.to_string(),
    }
}

fn storage_message(err: &StorageError) -> String {
    match err {
        StorageError::Unavailable(_) => "Storage unreachable.".to_string(),
        StorageError::NotFound => "Entry not found.".to_string(),
        StorageError::Validation(message) => format!("Invalid entry: {message}"),
        StorageError::Backend(message) => format!("Storage error: {message}"),
        StorageError::Serde(err) => format!("Bad data from storage: {err}"),
        StorageError::Io(err) => format!("Storage io error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(description: &str) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            description: description.to_string(),
            worth_it: true,
            cost_minor: None,
        }
    }

    #[test]
    fn replace_clamps_selection_and_scroll() {
        let mut state = EntriesState {
            items: vec![entry("a"), entry("b"), entry("c")],
            selected: 2,
            scroll: 2,
            error: None,
        };
        state.replace(vec![entry("only")]);
        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn selection_scrolls_the_window() {
        let mut state = EntriesState::default();
        state.replace((0..10).map(|i| entry(&i.to_string())).collect());

        for _ in 0..6 {
            state.select_next(4);
        }
        assert_eq!(state.selected, 6);
        assert_eq!(state.scroll, 3);

        for _ in 0..6 {
            state.select_prev(4);
        }
        assert_eq!(state.selected, 0);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn select_next_on_empty_list_is_a_no_op() {
        let mut state = EntriesState::default();
        state.select_next(10);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = AppConfig {
            backend: "gitfile".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            build_store(&config),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn backend_label_reflects_fallback_chain() {
        let mut config = AppConfig {
            backend: "rest".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(backend_label(&config), "rest+local");
        config.fallback_to_local = false;
        assert_eq!(backend_label(&config), "rest");
    }

    fn memory_app() -> App {
        let config = AppConfig {
            backend: "memory".to_string(),
            ..AppConfig::default()
        };
        match App::new(&config) {
            Ok(app) => app,
            Err(err) => panic!("memory backend should build: {err}"),
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn release_while_add_overlay_open_drops_the_gesture() {
        let mut app = memory_app();
        let row = entry("impulse buy");
        let id = row.id;
        app.state.finance.replace(vec![row]);

        let viewport = Rect::new(0, 0, 80, 24);
        let shell = ui::layout::shell(viewport);
        let (_, list) = ui::layout::entries_panes(shell.content);
        let inner = ui::layout::list_inner(list);
        let (x, y) = (inner.x + 40, inner.y);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y), viewport)
            .await;
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x - 20, y), viewport)
            .await;
        assert!(app.swipe.is_tracking(id));

        app.state.mode = Mode::Add;
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x - 20, y), viewport)
            .await;

        assert!(!app.swipe.is_tracking(id));
        assert!(app.pressed_row.is_none());
        assert!(app.state.exiting.is_none());
    }

    #[tokio::test]
    async fn opening_add_overlay_cancels_a_dragging_row() {
        let mut app = memory_app();
        let row = entry("half swiped");
        let id = row.id;
        app.state.finance.replace(vec![row]);

        let viewport = Rect::new(0, 0, 80, 24);
        let shell = ui::layout::shell(viewport);
        let (_, list) = ui::layout::entries_panes(shell.content);
        let inner = ui::layout::list_inner(list);
        let (x, y) = (inner.x + 40, inner.y);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y), viewport)
            .await;
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x - 20, y), viewport)
            .await;

        app.command_key('a', viewport).await;

        assert_eq!(app.state.mode, Mode::Add);
        assert!(!app.swipe.is_tracking(id));
        assert!(app.pressed_row.is_none());
    }
}
