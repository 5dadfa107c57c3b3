//! Reusable widgets for the search dialog.

use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::theme::ThemePalette;
use crate::search::render::{
    ERROR_TEXT, ResultRow, ResultsView, SEARCHING_TEXT, SegmentView, nothing_found_text,
};

pub const PLACEHOLDER: &str = "Search blog posts...";

/// The query input. Shows a placeholder when empty and a spinner glyph while
/// a request is in flight.
pub fn search_bar(query: &str, palette: ThemePalette, loading: bool, focused: bool) -> Paragraph<'static> {
    let mut spans = vec![Span::styled("⌕ ", palette.hint_style())];
    if query.is_empty() {
        spans.push(Span::styled(PLACEHOLDER, palette.hint_style()));
    } else {
        spans.push(Span::styled(query.to_string(), palette.text()));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(palette.accent)));
    }
    if loading {
        spans.push(Span::styled("  ⟳", palette.hint_style()));
    }
    let border = if focused {
        palette.border_focus_style()
    } else {
        palette.border_style()
    };
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled("Search blog", palette.title()))
            .borders(Borders::ALL)
            .border_style(border),
    )
}

pub fn segments_line(segments: &[SegmentView], base: Style, palette: ThemePalette) -> Line<'static> {
    let spans: Vec<Span<'static>> = segments
        .iter()
        .map(|seg| {
            let style = if seg.highlighted {
                base.patch(palette.highlight_style())
            } else {
                base
            };
            Span::styled(seg.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

fn row_item(row: &ResultRow, palette: ThemePalette) -> ListItem<'static> {
    let mut lines = vec![segments_line(
        &row.title,
        palette.text().add_modifier(Modifier::BOLD),
        palette,
    )];
    if let Some(date) = &row.date {
        lines.push(Line::from(Span::styled(date.clone(), palette.hint_style())));
    }
    lines.push(segments_line(&row.excerpt, palette.hint_style(), palette));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// Render the results panel for `view` into `area`.
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    view: &ResultsView,
    selected: usize,
    palette: ThemePalette,
) {
    let centered = |text: String, style: Style| {
        Paragraph::new(Line::from(Span::styled(text, style)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    };
    match view {
        ResultsView::Loading => frame.render_widget(
            centered(format!("⟳ {SEARCHING_TEXT}"), palette.hint_style()),
            area,
        ),
        ResultsView::Error => {
            frame.render_widget(centered(ERROR_TEXT.to_string(), palette.error_style()), area)
        }
        ResultsView::NothingFound { query } => frame.render_widget(
            centered(nothing_found_text(query), palette.hint_style()),
            area,
        ),
        ResultsView::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(|r| row_item(r, palette)).collect();
            let list = List::new(items).highlight_style(palette.selected_style());
            let mut state = ListState::default();
            state.select(Some(selected.min(rows.len().saturating_sub(1))));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_segments_get_highlight_style() {
        let palette = ThemePalette::dark();
        let segs = vec![
            SegmentView {
                text: "Hello ".into(),
                highlighted: false,
            },
            SegmentView {
                text: "Wor".into(),
                highlighted: true,
            },
        ];
        let line = segments_line(&segs, Style::default(), palette);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, "Wor");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
    }
}
