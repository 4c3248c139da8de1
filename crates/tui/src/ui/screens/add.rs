use api_types::CollectionKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

/// Quick-add input, overlaid at the bottom of the content area.
pub fn render(frame: &mut Frame<'_>, content: Rect, state: &AppState) {
    let theme = Theme::default();
    let height = 4u16.min(content.height);
    let rect = Rect {
        x: content.x,
        y: content.y + content.height.saturating_sub(height),
        width: content.width,
        height,
    };

    let format_hint = match state.section.kind() {
        CollectionKind::Finance => "[!] COST DESCRIPTION  (! = not worth it)",
        CollectionKind::Media => "[!] DESCRIPTION  (! = not worth it)",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.accent)),
        Span::raw(state.add_input.clone()),
        Span::styled("_", Style::default().fg(theme.accent)),
    ])];
    match &state.add_error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.error),
        ))),
        None => lines.push(Line::from(Span::styled(
            format_hint,
            Style::default().fg(theme.dim),
        ))),
    }

    let title = format!("Add {} entry", state.section.label());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
