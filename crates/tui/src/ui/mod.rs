pub mod components;
pub mod keymap;
pub mod layout;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, Mode},
    swipe::SwipeTracker,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState, swipe: &SwipeTracker) {
    let theme = Theme::default();
    let area = frame.area();
    let shell = layout::shell(area);

    render_info_bar(frame, shell.info, state, &theme);
    components::tabs::render_tabs(frame, shell.tabs, state.section, &theme);
    screens::entries::render(frame, shell.content, state, swipe);
    render_bottom_bar(frame, shell.bottom, state, &theme);

    if state.mode == Mode::Add {
        screens::add::render(frame, shell.content, state);
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("Backend", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.backend_label)),
        Span::styled("Finance", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.finance.items.len())),
        Span::styled("Media", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.media.items.len())),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let accent = Style::default().fg(theme.accent);
    let parts = match state.mode {
        Mode::List => vec![
            Span::styled("f", accent),
            Span::raw("/"),
            Span::styled("m", accent),
            Span::raw(" tabs  "),
            Span::styled("a", accent),
            Span::raw(" add  "),
            Span::styled("w", accent),
            Span::raw(" worth it  "),
            Span::styled("d", accent),
            Span::raw("/drag left delete  "),
            Span::styled("r", accent),
            Span::raw(" refresh  "),
            Span::styled("j", accent),
            Span::raw("/"),
            Span::styled("k", accent),
            Span::raw(" move  "),
            Span::styled("q", accent),
            Span::raw(" quit"),
        ],
        Mode::Add => vec![
            Span::styled("Enter", accent),
            Span::raw(" save  "),
            Span::styled("Esc", accent),
            Span::raw(" cancel"),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
