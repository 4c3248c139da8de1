use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use api_types::entry::Entry;

use crate::{
    app::AppState,
    dispatch::EXIT_ANIM,
    quick_add,
    swipe::SwipeTracker,
    ui::{layout, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, swipe: &SwipeTracker) {
    let theme = Theme::default();
    let (header, list) = layout::entries_panes(area);
    render_header(frame, header, state, &theme);
    render_list(frame, list, state, swipe, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let entries = state.entries();
    let worth_count = entries.items.iter().filter(|entry| entry.worth_it).count();

    let mut line = vec![
        Span::styled("Entries", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", entries.items.len())),
        Span::styled("Worth it", Style::default().fg(theme.dim)),
        Span::raw(format!(": {worth_count}")),
    ];
    if let Some(err) = &entries.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(Line::from(line)).block(block), area);
}

fn render_list(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    swipe: &SwipeTracker,
    theme: &Theme,
) {
    let inner = layout::list_inner(area);
    let entries = state.entries();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(block, area);

    if entries.items.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Nothing logged yet. Press a to add an entry.",
            Style::default().fg(theme.dim),
        )));
        frame.render_widget(hint, inner);
        return;
    }

    let visible = entries
        .items
        .iter()
        .enumerate()
        .skip(entries.scroll)
        .take(inner.height as usize);

    let mut lines = Vec::with_capacity(inner.height as usize);
    for (index, entry) in visible {
        lines.push(row_line(index, entry, state, swipe, inner.width, theme));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(
    index: usize,
    entry: &Entry,
    state: &AppState,
    swipe: &SwipeTracker,
    width: u16,
    theme: &Theme,
) -> Line<'static> {
    let entries = state.entries();
    let selected = index == entries.selected;

    // Exit animation: the row slides off the left edge and dims.
    if let Some(exiting) = &state.exiting {
        if exiting.id == entry.id {
            let progress = exiting.started_at.elapsed().as_secs_f32() / EXIT_ANIM.as_secs_f32();
            let offset = (f32::from(width) * progress.min(1.0)) as usize;
            return Line::from(Span::styled(
                shift_left(row_text(entry), offset),
                Style::default().fg(theme.dim),
            ));
        }
    }

    let (offset, armed) = swipe.offset(entry.id).unwrap_or((0, false));
    let style = if armed {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else if offset > 0 {
        Style::default().fg(theme.accent)
    } else if selected {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };

    let marker = if selected { "» " } else { "  " };
    Line::from(Span::styled(
        shift_left(format!("{marker}{}", row_text(entry)), offset as usize),
        style,
    ))
}

/// Translates a row `offset` cells to the left by clipping its leading
/// cells, so a swiped row slides toward the left border.
fn shift_left(text: String, offset: usize) -> String {
    if offset == 0 {
        return text;
    }
    text.chars().skip(offset).collect()
}

fn row_text(entry: &Entry) -> String {
    let date = entry.created_at.format("%d %b %H:%M").to_string();
    let worth = if entry.worth_it { "worth" } else { "meh  " };
    let cost = entry
        .cost_minor
        .map(quick_add::format_cost)
        .unwrap_or_else(|| "-".to_string());
    format!("{date}  {worth}  {cost:>9}  {}", entry.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_leaves_the_row_in_place() {
        assert_eq!(shift_left("01 Jan  worth".to_string(), 0), "01 Jan  worth");
    }

    #[test]
    fn offset_clips_leading_cells() {
        assert_eq!(shift_left("01 Jan  worth".to_string(), 8), "worth");
    }

    #[test]
    fn offset_past_the_row_width_empties_it() {
        assert_eq!(shift_left("short".to_string(), 40), "");
    }
}
