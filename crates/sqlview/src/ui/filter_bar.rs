//! Per-column filter inputs, drawn above the grid and aligned with its columns.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use super::grid::{fit_to_width, MARKER_W, PADDING};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBarAction {
    None,
    /// The pattern for `column` changed.
    Edit { column: usize, pattern: String },
    /// Hand focus back to the grid.
    Leave,
}

/// Focus state of the filter row. The pattern text lives with the controller.
#[derive(Debug, Default, Clone)]
pub struct FilterBar {
    pub focused_column: usize,
}

impl FilterBar {
    pub fn handle_key(&mut self, key: KeyEvent, inputs: &[String]) -> FilterBarAction {
        let column = self.focused_column;
        let Some(current) = inputs.get(column) else {
            return FilterBarAction::Leave;
        };

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Enter, _) | (KeyCode::Down, _) => FilterBarAction::Leave,
            (KeyCode::Tab, _) | (KeyCode::Right, _) => {
                self.focused_column = (column + 1) % inputs.len();
                FilterBarAction::None
            }
            (KeyCode::BackTab, _) | (KeyCode::Left, _) => {
                self.focused_column = (column + inputs.len() - 1) % inputs.len();
                FilterBarAction::None
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => FilterBarAction::Edit {
                column,
                pattern: String::new(),
            },
            (KeyCode::Backspace, _) => {
                let mut pattern = current.clone();
                if pattern.pop().is_none() {
                    return FilterBarAction::None;
                }
                FilterBarAction::Edit { column, pattern }
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let mut pattern = current.clone();
                pattern.push(c);
                FilterBarAction::Edit { column, pattern }
            }
            _ => FilterBarAction::None,
        }
    }

    pub fn clamp(&mut self, column_count: usize) {
        self.focused_column = self.focused_column.min(column_count.saturating_sub(1));
    }
}

/// Renders one input cell per column, scrolled in step with the grid.
pub struct FilterRow<'a> {
    pub inputs: &'a [String],
    pub col_widths: &'a [u16],
    pub col_offset: usize,
    pub focused_column: Option<usize>,
}

impl<'a> Widget for FilterRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused_column.is_some() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(" Filters (regex, / to edit) ")
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width <= MARKER_W || inner.height == 0 {
            return;
        }

        buf.set_string(inner.x, inner.y, "/ ", Style::default().fg(Color::DarkGray));

        let max_x = inner.x + inner.width;
        let mut x = inner.x + MARKER_W;
        for (col, w) in self.col_widths.iter().enumerate().skip(self.col_offset) {
            if x >= max_x {
                break;
            }
            let draw_w = (*w).min(max_x - x);
            let text = self.inputs.get(col).map(String::as_str).unwrap_or("");
            let style = if self.focused_column == Some(col) {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::UNDERLINED)
            } else if text.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let shown = if text.is_empty() && self.focused_column != Some(col) {
                "·"
            } else {
                text
            };
            buf.set_string(x, inner.y, fit_to_width(shown, draw_w), style);
            x = x.saturating_add(draw_w).saturating_add(PADDING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn inputs() -> Vec<String> {
        vec!["al".to_string(), String::new()]
    }

    #[test]
    fn test_typing_extends_pattern() {
        let mut bar = FilterBar::default();
        assert_eq!(
            bar.handle_key(key(KeyCode::Char('i')), &inputs()),
            FilterBarAction::Edit {
                column: 0,
                pattern: "ali".into()
            }
        );
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut bar = FilterBar { focused_column: 1 };
        assert_eq!(
            bar.handle_key(key(KeyCode::Backspace), &inputs()),
            FilterBarAction::None
        );
    }

    #[test]
    fn test_clear_pattern() {
        let mut bar = FilterBar::default();
        assert_eq!(
            bar.handle_key(
                KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
                &inputs()
            ),
            FilterBarAction::Edit {
                column: 0,
                pattern: String::new()
            }
        );
    }

    #[test]
    fn test_column_focus_wraps() {
        let mut bar = FilterBar::default();
        bar.handle_key(key(KeyCode::Tab), &inputs());
        assert_eq!(bar.focused_column, 1);
        bar.handle_key(key(KeyCode::Tab), &inputs());
        assert_eq!(bar.focused_column, 0);
        bar.handle_key(key(KeyCode::Left), &inputs());
        assert_eq!(bar.focused_column, 1);
    }

    #[test]
    fn test_esc_leaves() {
        let mut bar = FilterBar::default();
        assert_eq!(bar.handle_key(key(KeyCode::Esc), &inputs()), FilterBarAction::Leave);
        assert_eq!(bar.handle_key(key(KeyCode::Char('x')), &[]), FilterBarAction::Leave);
    }
}
