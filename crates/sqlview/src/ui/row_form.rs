//! Row form modal for inserting, editing and deleting a single row.
//!
//! The form is generated from the active table's columns:
//! - One labelled text field per column, laid out in two columns
//! - Pre-populated from the selected row when editing
//! - Insert mode offers Insert; Edit mode offers Edit and Delete
//! - Close is always available and discards the pending edit

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::mouse_util::is_inside;
use crate::db::RowRecord;
use crate::schema::TableSchema;

/// Widest label column, in cells.
const MAX_LABEL_WIDTH: usize = 16;
const BUTTON_GAP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Insert,
    Edit,
}

/// Where a field sits in the two-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPlacement {
    /// 0 for the left field column, 1 for the right.
    pub column: usize,
    pub row: usize,
}

/// Compute the grid rows and per-field placement for `field_count` fields.
///
/// Fields `0..rows` fill the left column top to bottom, the rest fill the
/// right column, with `rows = ceil(field_count / 2)`.
pub fn form_layout(field_count: usize) -> (usize, Vec<FieldPlacement>) {
    let rows = field_count.div_ceil(2);
    let placements = (0..field_count)
        .map(|i| {
            if i < rows {
                FieldPlacement { column: 0, row: i }
            } else {
                FieldPlacement {
                    column: 1,
                    row: i - rows,
                }
            }
        })
        .collect();
    (rows, placements)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormButton {
    Insert,
    Edit,
    Delete,
    Close,
}

impl FormButton {
    fn label(self) -> &'static str {
        match self {
            FormButton::Insert => "Insert",
            FormButton::Edit => "Edit",
            FormButton::Delete => "Delete",
            FormButton::Close => "Close",
        }
    }

    fn width(self) -> u16 {
        self.label().len() as u16 + 4
    }
}

/// Result of handling input in the row form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFormAction {
    /// Keep editing
    Continue,
    /// Discard the pending edit
    Close,
    /// Insert a new row with these values (column order)
    Insert { values: RowRecord },
    /// Overwrite the row addressed by `identity`
    Update { values: RowRecord, identity: String },
    /// Delete the row addressed by `identity` (still needs confirmation)
    Delete { identity: String },
}

/// Pending edit of one row.
#[derive(Debug, Clone)]
pub struct RowForm {
    mode: FormMode,
    table: String,
    labels: Vec<String>,
    values: Vec<String>,
    /// Cursor per field, counted in chars.
    cursors: Vec<usize>,
    focused: usize,
    /// The row as it was when the form opened (Edit mode only).
    original: Option<RowRecord>,
    identity: Option<String>,
    key_index: usize,
    message: Option<String>,
}

impl RowForm {
    /// Build a form for `schema`, pre-populated from `existing` when editing.
    pub fn build(schema: &TableSchema, existing: Option<&[String]>) -> Self {
        let labels = schema.column_names();
        let values: Vec<String> = match existing {
            Some(row) => (0..labels.len())
                .map(|i| row.get(i).cloned().unwrap_or_default())
                .collect(),
            None => vec![String::new(); labels.len()],
        };
        let cursors = values.iter().map(|v| v.chars().count()).collect();
        let mode = if existing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Insert
        };

        Self {
            mode,
            table: schema.name.clone(),
            labels,
            values,
            cursors,
            focused: 0,
            original: existing.map(|row| row.to_vec()),
            identity: existing
                .and_then(|row| schema.identity_value(row))
                .map(str::to_string),
            key_index: schema.primary_key_index,
            message: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn original(&self) -> Option<&[String]> {
        self.original.as_deref()
    }

    /// Key value captured when the form was opened.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Show a validation failure and move focus to the key field.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        if self.key_index < self.values.len() {
            self.focused = self.key_index;
        }
    }

    pub fn buttons(&self) -> &'static [FormButton] {
        match self.mode {
            FormMode::Insert => &[FormButton::Insert, FormButton::Close],
            FormMode::Edit => &[FormButton::Edit, FormButton::Delete, FormButton::Close],
        }
    }

    pub fn layout(&self) -> (usize, Vec<FieldPlacement>) {
        form_layout(self.labels.len())
    }

    /// Handle a key event and return the resulting action.
    pub fn handle_key(&mut self, key: KeyEvent) -> RowFormAction {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => RowFormAction::Close,

            // Submit (Ctrl+S)
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.submit(),

            // Delete (Ctrl+D), edit mode only
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => self.press(FormButton::Delete),

            (KeyCode::Tab, KeyModifiers::NONE)
            | (KeyCode::Down, KeyModifiers::NONE)
            | (KeyCode::Enter, KeyModifiers::NONE) => {
                self.focus_next();
                RowFormAction::Continue
            }

            (KeyCode::BackTab, _) | (KeyCode::Up, KeyModifiers::NONE) => {
                self.focus_prev();
                RowFormAction::Continue
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear_field();
                RowFormAction::Continue
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                RowFormAction::Continue
            }

            (KeyCode::Backspace, _) => {
                self.delete_char_before();
                RowFormAction::Continue
            }
            (KeyCode::Delete, _) => {
                self.delete_char_at();
                RowFormAction::Continue
            }

            (KeyCode::Left, KeyModifiers::NONE) => {
                if let Some(cursor) = self.cursors.get_mut(self.focused) {
                    *cursor = cursor.saturating_sub(1);
                }
                RowFormAction::Continue
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                let len = self.focused_len();
                if let Some(cursor) = self.cursors.get_mut(self.focused) {
                    *cursor = (*cursor + 1).min(len);
                }
                RowFormAction::Continue
            }
            (KeyCode::Home, _) => {
                if let Some(cursor) = self.cursors.get_mut(self.focused) {
                    *cursor = 0;
                }
                RowFormAction::Continue
            }
            (KeyCode::End, _) => {
                let len = self.focused_len();
                if let Some(cursor) = self.cursors.get_mut(self.focused) {
                    *cursor = len;
                }
                RowFormAction::Continue
            }

            _ => RowFormAction::Continue,
        }
    }

    /// Activate one of the form's buttons.
    pub fn press(&mut self, button: FormButton) -> RowFormAction {
        match (button, self.mode) {
            (FormButton::Close, _) => RowFormAction::Close,
            (FormButton::Insert, FormMode::Insert) | (FormButton::Edit, FormMode::Edit) => {
                self.submit()
            }
            (FormButton::Delete, FormMode::Edit) => match self.identity.clone() {
                Some(identity) => RowFormAction::Delete { identity },
                None => RowFormAction::Continue,
            },
            _ => RowFormAction::Continue,
        }
    }

    fn submit(&mut self) -> RowFormAction {
        self.message = None;
        match self.mode {
            FormMode::Insert => RowFormAction::Insert {
                values: self.values.clone(),
            },
            FormMode::Edit => match self.identity.clone() {
                Some(identity) => RowFormAction::Update {
                    values: self.values.clone(),
                    identity,
                },
                None => RowFormAction::Continue,
            },
        }
    }

    fn focus_next(&mut self) {
        if !self.values.is_empty() {
            self.focused = (self.focused + 1) % self.values.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.values.is_empty() {
            self.focused = (self.focused + self.values.len() - 1) % self.values.len();
        }
    }

    pub fn focus(&mut self, field: usize) {
        if field < self.values.len() {
            self.focused = field;
        }
    }

    fn focused_len(&self) -> usize {
        self.values
            .get(self.focused)
            .map(|v| v.chars().count())
            .unwrap_or(0)
    }

    fn current_field_and_cursor(&mut self) -> Option<(&mut String, &mut usize)> {
        let field = self.values.get_mut(self.focused)?;
        let cursor = self.cursors.get_mut(self.focused)?;
        Some((field, cursor))
    }

    fn insert_char(&mut self, c: char) {
        if let Some((field, cursor)) = self.current_field_and_cursor() {
            let at = byte_offset(field, *cursor);
            field.insert(at, c);
            *cursor += 1;
        }
    }

    fn delete_char_before(&mut self) {
        if let Some((field, cursor)) = self.current_field_and_cursor() {
            if *cursor > 0 {
                *cursor -= 1;
                let at = byte_offset(field, *cursor);
                field.remove(at);
            }
        }
    }

    fn delete_char_at(&mut self) {
        if let Some((field, cursor)) = self.current_field_and_cursor() {
            if *cursor < field.chars().count() {
                let at = byte_offset(field, *cursor);
                field.remove(at);
            }
        }
    }

    fn clear_field(&mut self) {
        if let Some((field, cursor)) = self.current_field_and_cursor() {
            field.clear();
            *cursor = 0;
        }
    }

    /// Modal rectangle inside the terminal `area`.
    pub fn modal_area(&self, area: Rect) -> Rect {
        let (rows, _) = self.layout();
        let width = 100u16.min(area.width.saturating_sub(4));
        let height = (rows as u16 + 6).min(area.height.saturating_sub(2));
        Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        }
    }

    fn sections(&self, area: Rect) -> [Rect; 5] {
        let inner = Block::default()
            .borders(Borders::ALL)
            .inner(self.modal_area(area));
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Message
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Help line
        ])
        .split(inner);
        [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
    }

    /// Screen rectangle of each field line, in column order.
    pub fn field_rects(&self, area: Rect) -> Vec<Rect> {
        let [fields, ..] = self.sections(area);
        let halves = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(fields);
        let (_, placements) = self.layout();
        placements
            .iter()
            .map(|p| {
                let half = halves[p.column];
                let y = half.y + p.row as u16;
                if y >= half.y + half.height {
                    Rect::new(half.x, half.y, 0, 0)
                } else {
                    Rect::new(half.x, y, half.width.saturating_sub(1), 1)
                }
            })
            .collect()
    }

    /// Screen rectangle of each button, left to right.
    pub fn button_rects(&self, area: Rect) -> Vec<(FormButton, Rect)> {
        let [_, _, _, line, _] = self.sections(area);
        let buttons = self.buttons();
        let total: u16 = buttons.iter().map(|b| b.width()).sum::<u16>()
            + BUTTON_GAP * (buttons.len() as u16).saturating_sub(1);
        let mut x = line.x + line.width.saturating_sub(total) / 2;
        buttons
            .iter()
            .map(|&b| {
                let rect = Rect::new(x, line.y, b.width(), 1);
                x += b.width() + BUTTON_GAP;
                (b, rect)
            })
            .collect()
    }

    pub fn button_at(&self, area: Rect, x: u16, y: u16) -> Option<FormButton> {
        self.button_rects(area)
            .into_iter()
            .find(|(_, rect)| is_inside(x, y, *rect))
            .map(|(b, _)| b)
    }

    pub fn field_at(&self, area: Rect, x: u16, y: u16) -> Option<usize> {
        self.field_rects(area)
            .iter()
            .position(|rect| is_inside(x, y, *rect))
    }

    /// Render the row form modal.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal_area = self.modal_area(area);
        frame.render_widget(Clear, modal_area);

        let title = match self.mode {
            FormMode::Insert => format!(" Insert into {} ", self.table),
            FormMode::Edit => format!(" Edit {} ", self.table),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block, modal_area);

        let label_width = self
            .labels
            .iter()
            .map(|l| l.chars().count() + 2)
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH) as u16;

        for (i, rect) in self.field_rects(area).into_iter().enumerate() {
            if rect.height == 0 {
                continue;
            }
            self.render_text_field(frame, rect, i, label_width);
        }

        let [_, separator, message, _, help] = self.sections(area);
        frame.render_widget(
            Paragraph::new("─".repeat(separator.width as usize))
                .style(Style::default().fg(Color::DarkGray)),
            separator,
        );

        if let Some(msg) = &self.message {
            frame.render_widget(
                Paragraph::new(msg.as_str()).style(Style::default().fg(Color::Red)),
                message,
            );
        }

        for (button, rect) in self.button_rects(area) {
            let style = match button {
                FormButton::Delete => Style::default().fg(Color::Red),
                FormButton::Close => Style::default().fg(Color::Gray),
                _ => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            };
            frame.render_widget(
                Paragraph::new(format!("[ {} ]", button.label())).style(style),
                rect,
            );
        }

        self.render_help(frame, help);
    }

    fn render_text_field(&self, frame: &mut Frame, area: Rect, field: usize, label_width: u16) {
        let is_focused = self.focused == field;
        let chunks =
            Layout::horizontal([Constraint::Length(label_width), Constraint::Min(1)]).split(area);

        let label_style = if is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label = format!("{}:", self.labels[field]);
        frame.render_widget(Paragraph::new(label).style(label_style), chunks[0]);

        let value = &self.values[field];
        let value_spans = if is_focused {
            render_text_with_cursor(value, self.cursors[field])
        } else {
            vec![Span::raw(value.clone())]
        };
        let value_style = if is_focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(value_spans)).style(value_style),
            chunks[1],
        );
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Yellow);
        let mut spans = vec![
            Span::styled("Tab", key),
            Span::raw(" next  "),
            Span::styled("Ctrl+S", key),
            Span::raw(match self.mode {
                FormMode::Insert => " insert  ",
                FormMode::Edit => " save  ",
            }),
        ];
        if self.mode == FormMode::Edit {
            spans.push(Span::styled("Ctrl+D", key));
            spans.push(Span::raw(" delete  "));
        }
        spans.push(Span::styled("Esc", key));
        spans.push(Span::raw(" close"));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn render_text_with_cursor(text: &str, cursor: usize) -> Vec<Span<'static>> {
    let before: String = text.chars().take(cursor).collect();
    let cursor_char = text.chars().nth(cursor).unwrap_or(' ');
    let after: String = text.chars().skip(cursor + 1).collect();

    vec![
        Span::raw(before),
        Span::styled(
            cursor_char.to_string(),
            Style::default().bg(Color::White).fg(Color::Black),
        ),
        Span::raw(after),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnInfo;

    fn schema(names: &[&str]) -> TableSchema {
        TableSchema::new(
            "users",
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ColumnInfo {
                    name: n.to_string(),
                    decl_type: "TEXT".into(),
                    is_primary_key: i == 0,
                })
                .collect(),
        )
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_layout_five_columns() {
        let (rows, placements) = form_layout(5);
        assert_eq!(rows, 3);
        assert_eq!(
            placements,
            vec![
                FieldPlacement { column: 0, row: 0 },
                FieldPlacement { column: 0, row: 1 },
                FieldPlacement { column: 0, row: 2 },
                FieldPlacement { column: 1, row: 0 },
                FieldPlacement { column: 1, row: 1 },
            ]
        );
    }

    #[test]
    fn test_layout_small_counts() {
        assert_eq!(form_layout(0).0, 0);
        let (rows, placements) = form_layout(1);
        assert_eq!(rows, 1);
        assert_eq!(placements, vec![FieldPlacement { column: 0, row: 0 }]);
        let (rows, placements) = form_layout(4);
        assert_eq!(rows, 2);
        assert_eq!(placements[2], FieldPlacement { column: 1, row: 0 });
    }

    #[test]
    fn test_insert_form_starts_empty() {
        let form = RowForm::build(&schema(&["id", "name"]), None);
        assert_eq!(form.mode(), FormMode::Insert);
        assert_eq!(form.values(), &["".to_string(), "".to_string()]);
        assert_eq!(form.buttons(), &[FormButton::Insert, FormButton::Close]);
        assert!(form.identity().is_none());
    }

    #[test]
    fn test_edit_form_prepopulated() {
        let existing = row(&["3", "Carol"]);
        let form = RowForm::build(&schema(&["id", "name"]), Some(&existing));
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.values(), existing.as_slice());
        assert_eq!(form.identity(), Some("3"));
        assert_eq!(
            form.buttons(),
            &[FormButton::Edit, FormButton::Delete, FormButton::Close]
        );
    }

    #[test]
    fn test_typing_and_cursor_movement() {
        let mut form = RowForm::build(&schema(&["id", "name"]), None);
        for c in "42".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(form.values()[0], "42");

        form.handle_key(key(KeyCode::Home));
        form.handle_key(key(KeyCode::Char('1')));
        assert_eq!(form.values()[0], "142");

        form.handle_key(key(KeyCode::End));
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.values()[0], "14");

        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Delete));
        assert_eq!(form.values()[0], "1");
    }

    #[test]
    fn test_multibyte_editing() {
        let existing = row(&["1", "héllo"]);
        let mut form = RowForm::build(&schema(&["id", "name"]), Some(&existing));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.values()[1], "hllo");
    }

    #[test]
    fn test_focus_wraps_in_layout_order() {
        let mut form = RowForm::build(&schema(&["a", "b", "c"]), None);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), 1);
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), 0);
        form.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(form.focused(), 2);
    }

    #[test]
    fn test_clear_field() {
        let existing = row(&["1", "Alice"]);
        let mut form = RowForm::build(&schema(&["id", "name"]), Some(&existing));
        form.handle_key(ctrl('u'));
        assert_eq!(form.values()[0], "");
    }

    #[test]
    fn test_submit_insert() {
        let mut form = RowForm::build(&schema(&["id", "name"]), None);
        form.handle_key(key(KeyCode::Char('7')));
        assert_eq!(
            form.handle_key(ctrl('s')),
            RowFormAction::Insert {
                values: row(&["7", ""])
            }
        );
    }

    #[test]
    fn test_submit_edit_carries_original_identity() {
        let existing = row(&["3", "Carol"]);
        let mut form = RowForm::build(&schema(&["id", "name"]), Some(&existing));
        form.handle_key(key(KeyCode::End));
        form.handle_key(key(KeyCode::Char('0')));
        assert_eq!(
            form.handle_key(ctrl('s')),
            RowFormAction::Update {
                values: row(&["30", "Carol"]),
                identity: "3".into(),
            }
        );
    }

    #[test]
    fn test_delete_only_in_edit_mode() {
        let mut insert = RowForm::build(&schema(&["id"]), None);
        assert_eq!(insert.handle_key(ctrl('d')), RowFormAction::Continue);

        let existing = row(&["5"]);
        let mut edit = RowForm::build(&schema(&["id"]), Some(&existing));
        assert_eq!(
            edit.handle_key(ctrl('d')),
            RowFormAction::Delete {
                identity: "5".into()
            }
        );
    }

    #[test]
    fn test_close_discards() {
        let mut form = RowForm::build(&schema(&["id"]), None);
        form.handle_key(key(KeyCode::Char('x')));
        assert_eq!(form.handle_key(key(KeyCode::Esc)), RowFormAction::Close);
        assert_eq!(form.press(FormButton::Close), RowFormAction::Close);
    }

    #[test]
    fn test_reject_focuses_key_field() {
        let mut form = RowForm::build(&schema(&["id", "name"]), None);
        form.handle_key(key(KeyCode::Tab));
        form.reject("id has no data");
        assert_eq!(form.focused(), 0);
        assert_eq!(form.message(), Some("id has no data"));
    }

    #[test]
    fn test_button_hit_testing() {
        let existing = row(&["1", "a"]);
        let form = RowForm::build(&schema(&["id", "name"]), Some(&existing));
        let area = Rect::new(0, 0, 80, 24);
        let rects = form.button_rects(area);
        assert_eq!(rects.len(), 3);
        let (button, rect) = rects[1];
        assert_eq!(button, FormButton::Delete);
        assert_eq!(form.button_at(area, rect.x, rect.y), Some(FormButton::Delete));
        assert_eq!(form.button_at(area, 0, 0), None);
    }

    #[test]
    fn test_field_rects_follow_layout() {
        let form = RowForm::build(&schema(&["a", "b", "c", "d", "e"]), None);
        let area = Rect::new(0, 0, 80, 24);
        let rects = form.field_rects(area);
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0].x, rects[2].x);
        assert_eq!(rects[3].y, rects[0].y);
        assert!(rects[3].x > rects[0].x);
        assert_eq!(form.field_at(area, rects[4].x, rects[4].y), Some(4));
    }
}
