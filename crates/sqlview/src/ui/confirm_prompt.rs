//! Yes/No confirmation dialog.
//!
//! Keys: y/n, Left/Right/Tab to move between buttons, Enter to choose the
//! highlighted one, Esc to cancel. Clicking a button chooses it; clicking
//! outside the dialog cancels.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::mouse_util::is_inside;

const YES_LABEL: &str = "[ Yes ]";
const NO_LABEL: &str = "[ No ]";
const BUTTON_GAP: u16 = 4;

/// Result of handling input in the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Still waiting for user input.
    Pending,
    Confirmed,
    Cancelled,
}

/// What triggered the confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmContext {
    DeleteRow { table: String, identity: String },
}

pub struct ConfirmPrompt {
    message: String,
    context: ConfirmContext,
    yes_selected: bool,
}

impl ConfirmPrompt {
    pub fn new(message: impl Into<String>, context: ConfirmContext) -> Self {
        Self {
            message: message.into(),
            context,
            yes_selected: false,
        }
    }

    pub fn context(&self) -> &ConfirmContext {
        &self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn title(&self) -> &'static str {
        match self.context {
            ConfirmContext::DeleteRow { .. } => " Delete Row ",
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ConfirmResult {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => ConfirmResult::Confirmed,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ConfirmResult::Cancelled,
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.yes_selected = !self.yes_selected;
                ConfirmResult::Pending
            }
            KeyCode::Enter => {
                if self.yes_selected {
                    ConfirmResult::Confirmed
                } else {
                    ConfirmResult::Cancelled
                }
            }
            _ => ConfirmResult::Pending,
        }
    }

    /// `area` is the full frame area the dialog is centered in.
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> ConfirmResult {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return ConfirmResult::Pending;
        }
        let (x, y) = (event.column, event.row);
        let (yes, no) = self.button_rects(area);
        if is_inside(x, y, yes) {
            ConfirmResult::Confirmed
        } else if is_inside(x, y, no) {
            ConfirmResult::Cancelled
        } else if is_inside(x, y, self.dialog_area(area)) {
            ConfirmResult::Pending
        } else {
            ConfirmResult::Cancelled
        }
    }

    fn dialog_area(&self, area: Rect) -> Rect {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 7u16.min(area.height);
        Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    fn button_rects(&self, area: Rect) -> (Rect, Rect) {
        let dialog = self.dialog_area(area);
        let y = dialog.y + dialog.height.saturating_sub(2);
        let yes_w = YES_LABEL.len() as u16;
        let no_w = NO_LABEL.len() as u16;
        let total = yes_w + BUTTON_GAP + no_w;
        let x = dialog.x + dialog.width.saturating_sub(total) / 2;
        (
            Rect::new(x, y, yes_w, 1),
            Rect::new(x + yes_w + BUTTON_GAP, y, no_w, 1),
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog = self.dialog_area(area);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(self.title());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let text_area = Rect {
            height: inner.height.saturating_sub(2),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            text_area,
        );

        let selected = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let normal = Style::default().fg(Color::White);
        let (yes, no) = self.button_rects(area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                YES_LABEL,
                if self.yes_selected { selected } else { normal },
            ))),
            yes,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                NO_LABEL,
                if self.yes_selected { normal } else { selected },
            ))),
            no,
        );
    }
}
