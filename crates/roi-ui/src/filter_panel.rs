//! Side panel with one checkbox list per filter field.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use roi_data::filter::{FilterField, FilterOptions, FilterSelection};

use crate::themes::Theme;

pub const TITLE: &str = "🎛 Filter Options";

/// Position of the highlight inside the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCursor {
    pub field: FilterField,
    pub index: usize,
}

impl Default for FilterCursor {
    fn default() -> Self {
        Self {
            field: FilterField::Platform,
            index: 0,
        }
    }
}

impl FilterCursor {
    /// Move to the next field, resetting the row.
    pub fn next_field(&mut self) {
        self.field = self.field.next();
        self.index = 0;
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
        self.index = 0;
    }

    pub fn move_down(&mut self, options: &FilterOptions) {
        let len = options.values(self.field).len();
        if len > 0 && self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// The value under the cursor, if the field has any.
    pub fn current<'a>(&self, options: &'a FilterOptions) -> Option<&'a str> {
        options
            .values(self.field)
            .get(self.index)
            .map(String::as_str)
    }

    /// Pull the row back inside the field after the options changed.
    pub fn clamp(&mut self, options: &FilterOptions) {
        let len = options.values(self.field).len();
        self.index = self.index.min(len.saturating_sub(1));
    }
}

/// One `"[x] value"` line per observed value.
pub fn build_field_items<'a>(
    field: FilterField,
    options: &FilterOptions,
    selection: &FilterSelection,
    cursor: Option<&FilterCursor>,
    theme: &Theme,
) -> Vec<ListItem<'a>> {
    options
        .values(field)
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let checked = selection.is_selected(field, value);
            let mark = if checked { "[x] " } else { "[ ] " };
            let mut style = if checked { theme.text } else { theme.dim };
            if cursor.is_some_and(|c| c.field == field && c.index == i) {
                style = style.patch(theme.cursor);
            }
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(value.clone(), style),
            ]))
        })
        .collect()
}

/// Render the three field lists stacked vertically. `cursor` is `Some` while
/// the panel has keyboard focus.
pub fn render_filter_panel(
    frame: &mut Frame,
    area: Rect,
    options: &FilterOptions,
    selection: &FilterSelection,
    cursor: Option<&FilterCursor>,
    theme: &Theme,
) {
    let focused = cursor.is_some();
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.border_focused
        } else {
            theme.border
        })
        .title(format!(" {TITLE} "));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

    for (field, chunk) in FilterField::ALL.iter().zip(chunks.iter()) {
        let selected = selection.values(*field).len();
        let total = options.values(*field).len();
        let active = cursor.is_some_and(|c| c.field == *field);
        let title_style = if active { theme.header } else { theme.label };

        let list = List::new(build_field_items(*field, options, selection, cursor, theme)).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.separator)
                .title(Span::styled(
                    format!(" {field} ({selected}/{total}) "),
                    title_style,
                )),
        );
        frame.render_widget(list, *chunk);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
