//! Sidebar listing the tables of the open database.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::mouse_util::is_inside;

/// Actions that can result from sidebar interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    /// Switch the view to this table
    SelectTable(String),
}

#[derive(Default)]
pub struct Sidebar {
    /// List state for tables (selection, scroll)
    pub tables_state: ListState,
    /// Area of the list (for mouse hit testing)
    area: Option<Rect>,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        tables: &[String],
        current_table: Option<&str>,
        has_focus: bool,
    ) {
        self.area = Some(area);

        let border_style = if has_focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Tables ")
            .border_style(border_style);

        if tables.is_empty() {
            let empty = Paragraph::new("No tables")
                .block(block)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = tables
            .iter()
            .map(|name| {
                let is_current = Some(name.as_str()) == current_table;
                let marker = if is_current { "● " } else { "  " };
                let style = if is_current {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{marker}{name}")).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray));

        frame.render_stateful_widget(list, area, &mut self.tables_state);
    }

    pub fn up(&mut self, count: usize) {
        if let Some(selected) = self.tables_state.selected() {
            self.tables_state.select(Some(selected.saturating_sub(1)));
        } else if count > 0 {
            self.tables_state.select(Some(0));
        }
    }

    pub fn down(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        match self.tables_state.selected() {
            Some(selected) => self.tables_state.select(Some((selected + 1).min(count - 1))),
            None => self.tables_state.select(Some(0)),
        }
    }

    pub fn selected_table<'a>(&self, tables: &'a [String]) -> Option<&'a str> {
        self.tables_state
            .selected()
            .and_then(|idx| tables.get(idx))
            .map(String::as_str)
    }

    /// Keep the highlight on `name` (e.g. after auto-selecting the first table).
    pub fn select_table_by_name(&mut self, tables: &[String], name: &str) {
        if let Some(idx) = tables.iter().position(|t| t == name) {
            self.tables_state.select(Some(idx));
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.area.is_some_and(|area| is_inside(x, y, area))
    }

    /// Handle mouse events over the table list.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, tables: &[String]) -> Option<SidebarAction> {
        let area = self.area?;
        let (x, y) = (mouse.column, mouse.row);
        if !is_inside(x, y, area) {
            return None;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Subtract 1 for the border.
                let row = y.saturating_sub(area.y + 1) as usize + self.tables_state.offset();
                if row < tables.len() {
                    self.tables_state.select(Some(row));
                    return Some(SidebarAction::SelectTable(tables[row].clone()));
                }
            }
            MouseEventKind::ScrollUp => self.up(tables.len()),
            MouseEventKind::ScrollDown => self.down(tables.len()),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn tables() -> Vec<String> {
        vec!["orders".into(), "products".into(), "users".into()]
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_navigation_clamps() {
        let mut sidebar = Sidebar::new();
        sidebar.down(3);
        assert_eq!(sidebar.selected_table(&tables()), Some("orders"));
        sidebar.down(3);
        sidebar.down(3);
        sidebar.down(3);
        assert_eq!(sidebar.selected_table(&tables()), Some("users"));
        sidebar.up(3);
        assert_eq!(sidebar.selected_table(&tables()), Some("products"));
    }

    #[test]
    fn test_select_by_name() {
        let mut sidebar = Sidebar::new();
        sidebar.select_table_by_name(&tables(), "users");
        assert_eq!(sidebar.tables_state.selected(), Some(2));
    }

    #[test]
    fn test_click_selects_table() {
        let mut sidebar = Sidebar::new();
        sidebar.area = Some(Rect::new(0, 0, 20, 10));
        assert_eq!(
            sidebar.handle_mouse(click(3, 2), &tables()),
            Some(SidebarAction::SelectTable("products".into()))
        );
        assert_eq!(sidebar.handle_mouse(click(3, 8), &tables()), None);
        assert_eq!(sidebar.handle_mouse(click(30, 2), &tables()), None);
    }
}
