use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::proxy::{FilterSortProxy, SortKey};

/// Width of the fixed cursor marker column.
pub(crate) const MARKER_W: u16 = 2;
pub(crate) const PADDING: u16 = 1;

/// Result of a key press routed to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKeyResult {
    /// Cursor moved or key ignored.
    None,
    /// Open the row under the cursor for editing.
    OpenRow(usize),
}

#[derive(Debug, Default, Clone)]
pub struct GridState {
    pub row_offset: usize,
    pub col_offset: usize,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl GridState {
    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize, col_count: usize) -> GridKeyResult {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if row_count > 0 {
                    self.cursor_row = (self.cursor_row + 1).min(row_count - 1);
                }
            }
            KeyCode::PageUp => {
                self.cursor_row = self.cursor_row.saturating_sub(10);
            }
            KeyCode::PageDown => {
                if row_count > 0 {
                    self.cursor_row = (self.cursor_row + 10).min(row_count - 1);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor_row = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                if row_count > 0 {
                    self.cursor_row = row_count - 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor_col = self.cursor_col.saturating_sub(1);
                self.col_offset = self.col_offset.min(self.cursor_col);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if col_count > 0 {
                    self.cursor_col = (self.cursor_col + 1).min(col_count - 1);
                }
            }
            KeyCode::Enter => {
                if self.cursor_row < row_count {
                    return GridKeyResult::OpenRow(self.cursor_row);
                }
            }
            _ => {}
        }
        GridKeyResult::None
    }

    /// Clamp the cursor after the visible row set or column set changed.
    pub fn clamp(&mut self, row_count: usize, col_count: usize) {
        self.cursor_row = self.cursor_row.min(row_count.saturating_sub(1));
        self.cursor_col = self.cursor_col.min(col_count.saturating_sub(1));
        self.col_offset = self.col_offset.min(self.cursor_col);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn ensure_cursor_visible(&mut self, viewport_rows: usize, row_count: usize) {
        if viewport_rows == 0 || row_count == 0 {
            self.row_offset = 0;
            self.cursor_row = 0;
            return;
        }

        self.cursor_row = self.cursor_row.min(row_count - 1);

        if self.cursor_row < self.row_offset {
            self.row_offset = self.cursor_row;
        }

        let last_visible = self.row_offset + viewport_rows - 1;
        if self.cursor_row > last_visible {
            self.row_offset = self.cursor_row.saturating_sub(viewport_rows - 1);
        }

        self.row_offset = self.row_offset.min(row_count.saturating_sub(1));
    }

    /// Scroll columns so the cursor column fits in `available_w` cells.
    pub fn ensure_column_visible(&mut self, col_widths: &[u16], available_w: u16) {
        if col_widths.is_empty() {
            self.col_offset = 0;
            return;
        }
        self.cursor_col = self.cursor_col.min(col_widths.len() - 1);
        if self.cursor_col < self.col_offset {
            self.col_offset = self.cursor_col;
        }
        while self.col_offset < self.cursor_col {
            let used: u32 = col_widths[self.col_offset..=self.cursor_col]
                .iter()
                .map(|w| *w as u32 + PADDING as u32)
                .sum();
            if used <= available_w as u32 {
                break;
            }
            self.col_offset += 1;
        }
    }
}

/// Column widths fitted to headers and cell contents, clamped to `[min_w, max_w]`.
pub fn compute_column_widths<'a>(
    headers: &[String],
    rows: impl IntoIterator<Item = &'a Vec<String>>,
    min_w: u16,
    max_w: u16,
) -> Vec<u16> {
    // Leave room for the sort arrow.
    let mut widths: Vec<u16> = headers
        .iter()
        .map(|h| clamp_u16(display_width(h).saturating_add(2) as u16, min_w, max_w))
        .collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i >= widths.len() {
                break;
            }
            let w = clamp_u16(display_width(cell).min(u16::MAX as usize) as u16, min_w, max_w);
            widths[i] = widths[i].max(w);
        }
    }

    widths
}

/// Data column at screen `x`, given the grid's inner area and scroll offset.
pub fn column_at(inner: Rect, col_widths: &[u16], col_offset: usize, x: u16) -> Option<usize> {
    let mut left = inner.x.saturating_add(MARKER_W);
    let max_x = inner.x.saturating_add(inner.width);
    if x < left {
        return None;
    }
    for (col, w) in col_widths.iter().enumerate().skip(col_offset) {
        if left >= max_x {
            break;
        }
        let right = left.saturating_add(*w).min(max_x);
        if x >= left && x < right {
            return Some(col);
        }
        left = right.saturating_add(PADDING);
    }
    None
}

pub struct DataGrid<'a> {
    pub headers: &'a [String],
    pub proxy: &'a FilterSortProxy,
    pub col_widths: &'a [u16],
    pub state: &'a GridState,
    pub focused: bool,
    pub title: String,
}

impl<'a> DataGrid<'a> {
    fn header_labels(&self) -> Vec<String> {
        let keys = self.proxy.sort_keys();
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| match sort_marker(keys, i) {
                Some(marker) => format!("{h} {marker}"),
                None => h.clone(),
            })
            .collect()
    }
}

/// Arrow for the primary key; arrow plus rank for tie-breakers.
fn sort_marker(keys: &[SortKey], column: usize) -> Option<String> {
    let rank = keys.iter().position(|k| k.column == column)?;
    let arrow = keys[rank].order.arrow();
    if rank == 0 {
        Some(arrow.to_string())
    } else {
        Some(format!("{arrow}{}", rank + 1))
    }
}

impl<'a> Widget for DataGrid<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.headers.is_empty() {
            Paragraph::new("No table selected")
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
            return;
        }

        // Reserve one line for header.
        if inner.height < 2 {
            Paragraph::new("Window too small")
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
            return;
        }

        let header_area = Rect {
            height: 1,
            ..inner
        };
        let body_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };

        let data_x = header_area.x.saturating_add(MARKER_W);
        let data_w = header_area.width.saturating_sub(MARKER_W);

        let mut state = self.state.clone();
        state.ensure_column_visible(self.col_widths, data_w);

        buf.set_string(header_area.x, header_area.y, "  ", Style::default());
        render_row_cells(
            data_x,
            header_area.y,
            data_w,
            &self.header_labels(),
            self.col_widths,
            state.col_offset,
            None,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            buf,
        );

        let visible = self.proxy.visible_len();
        if visible == 0 {
            let msg = if self.proxy.source_len() == 0 {
                "(no rows)"
            } else {
                "(no rows match the filters)"
            };
            Paragraph::new(msg)
                .style(Style::default().fg(Color::Gray))
                .render(body_area, buf);
            return;
        }

        state.ensure_cursor_visible(body_area.height as usize, visible);

        for i in 0..(body_area.height as usize) {
            let row_idx = state.row_offset + i;
            let Some(row) = self.proxy.row(row_idx) else {
                break;
            };
            let y = body_area.y + i as u16;

            let is_cursor = row_idx == state.cursor_row;
            let row_style = if is_cursor {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let marker = if is_cursor { "> " } else { "  " };
            buf.set_string(body_area.x, y, fit_to_width(marker, MARKER_W), row_style);

            let cursor_col = (is_cursor && self.focused).then_some(state.cursor_col);
            render_row_cells(
                data_x,
                y,
                data_w,
                row,
                self.col_widths,
                state.col_offset,
                cursor_col,
                row_style,
                buf,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_row_cells(
    mut x: u16,
    y: u16,
    available_w: u16,
    cells: &[String],
    col_widths: &[u16],
    col_offset: usize,
    highlight_col: Option<usize>,
    style: Style,
    buf: &mut Buffer,
) {
    if available_w == 0 {
        return;
    }

    let max_x = x.saturating_add(available_w);

    let mut col = col_offset;
    while col < cells.len() && col < col_widths.len() && x < max_x {
        let w = col_widths[col];
        if w == 0 {
            col += 1;
            continue;
        }

        let remaining = max_x - x;

        // Allow a partially visible last column.
        let draw_w = w.min(remaining);
        let content = fit_to_width(&cells[col], draw_w);
        let cell_style = if highlight_col == Some(col) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };
        buf.set_string(x, y, content, cell_style);
        x += draw_w;

        if x < max_x {
            buf.set_string(x, y, " ", style);
            x = x.saturating_add(PADDING).min(max_x);
        }

        col += 1;
    }

    while x < max_x {
        buf.set_string(x, y, " ", style);
        x += 1;
    }
}

fn clamp_u16(v: u16, min_v: u16, max_v: u16) -> u16 {
    v.max(min_v).min(max_v)
}

fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

pub(crate) fn fit_to_width(s: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }

    let current = display_width(s);
    if current == width {
        return s.to_string();
    }

    if current < width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - current));
        return out;
    }

    // Truncate, keeping ASCII-only ellipsis.
    if width <= 3 {
        return truncate_by_display_width(s, width);
    }

    let prefix_w = width.saturating_sub(3);
    let mut out = truncate_by_display_width(s, prefix_w);
    out.push_str("...");

    truncate_by_display_width(&out, width)
}

fn truncate_by_display_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
        if used == width {
            break;
        }
    }

    let out_w = display_width(&out);
    if out_w < width {
        out.push_str(&" ".repeat(width - out_w));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::SortOrder;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_fit_to_width_pads_and_truncates() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdefgh", 6), "abc...");
        assert_eq!(fit_to_width("abcdef", 2), "ab");
    }

    #[test]
    fn test_column_widths_clamped() {
        let headers = vec!["id".to_string(), "description".to_string()];
        let data = rows(&[&["1", &"x".repeat(100)]]);
        let widths = compute_column_widths(&headers, &data, 3, 40);
        assert_eq!(widths, vec![4, 40]);
    }

    #[test]
    fn test_cursor_movement_bounds() {
        let mut state = GridState::default();
        state.handle_key(key(KeyCode::Up), 3, 2);
        assert_eq!(state.cursor_row, 0);
        state.handle_key(key(KeyCode::End), 3, 2);
        assert_eq!(state.cursor_row, 2);
        state.handle_key(key(KeyCode::Down), 3, 2);
        assert_eq!(state.cursor_row, 2);
        state.handle_key(key(KeyCode::Right), 3, 2);
        state.handle_key(key(KeyCode::Right), 3, 2);
        assert_eq!(state.cursor_col, 1);
    }

    #[test]
    fn test_enter_opens_cursor_row() {
        let mut state = GridState {
            cursor_row: 1,
            ..Default::default()
        };
        assert_eq!(
            state.handle_key(key(KeyCode::Enter), 3, 1),
            GridKeyResult::OpenRow(1)
        );
        assert_eq!(
            state.handle_key(key(KeyCode::Enter), 0, 1),
            GridKeyResult::None
        );
    }

    #[test]
    fn test_clamp_after_filter_shrinks_rows() {
        let mut state = GridState {
            cursor_row: 9,
            cursor_col: 4,
            ..Default::default()
        };
        state.clamp(3, 2);
        assert_eq!(state.cursor_row, 2);
        assert_eq!(state.cursor_col, 1);
    }

    #[test]
    fn test_ensure_column_visible_scrolls_right() {
        let mut state = GridState {
            cursor_col: 2,
            ..Default::default()
        };
        state.ensure_column_visible(&[10, 10, 10], 15);
        assert_eq!(state.col_offset, 2);
    }

    #[test]
    fn test_column_at() {
        let inner = Rect::new(1, 1, 40, 10);
        // Data starts at x = 3; widths 4 and 5 separated by one space.
        assert_eq!(column_at(inner, &[4, 5], 0, 2), None);
        assert_eq!(column_at(inner, &[4, 5], 0, 3), Some(0));
        assert_eq!(column_at(inner, &[4, 5], 0, 8), Some(1));
        assert_eq!(column_at(inner, &[4, 5], 1, 3), Some(1));
    }

    #[test]
    fn test_sort_marker_ranks() {
        let keys = vec![
            SortKey {
                column: 1,
                order: SortOrder::Descending,
            },
            SortKey {
                column: 0,
                order: SortOrder::Ascending,
            },
        ];
        assert_eq!(sort_marker(&keys, 1).as_deref(), Some("▼"));
        assert_eq!(sort_marker(&keys, 0).as_deref(), Some("▲2"));
        assert_eq!(sort_marker(&keys, 2), None);
    }

    #[test]
    fn test_render_shows_sorted_rows() {
        let headers = vec!["name".to_string()];
        let mut proxy = FilterSortProxy::new();
        proxy.set_rows(rows(&[&["bob"], &["alice"]]));
        proxy.sort_by(0, SortOrder::Ascending);
        let widths = compute_column_widths(&headers, proxy.source_rows(), 3, 40);
        let state = GridState::default();

        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        DataGrid {
            headers: &headers,
            proxy: &proxy,
            col_widths: &widths,
            state: &state,
            focused: false,
            title: "users".into(),
        }
        .render(area, &mut buf);

        let line = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(line(1).contains("name ▲"));
        assert!(line(2).contains("> alice"));
        assert!(line(3).contains("bob"));
    }
}
