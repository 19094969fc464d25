use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use throbber_widgets_tui::symbols::throbber::BRAILLE_ONE;
use throbber_widgets_tui::{Throbber, ThrobberState};

use super::controller::{FormResponse, ViewController};
use super::state::{Focus, ViewState};
use crate::config::Config;
use crate::crud::Confirmation;
use crate::db::Database;
use crate::ui::{
    build_status_line, column_at, compute_column_widths, is_inside, ConfirmContext, ConfirmPrompt,
    ConfirmResult, DataGrid, FilterBar, FilterBarAction, FilterRow, GridKeyResult, GridState,
    RowFormAction, Sidebar, SidebarAction, StatusInfo, MARKER_W,
};

const DOUBLE_CLICK: Duration = Duration::from_millis(400);

pub struct App {
    pub focus: Focus,
    pub controller: ViewController,
    config: Config,

    sidebar: Sidebar,
    filter_bar: FilterBar,
    grid_state: GridState,
    col_widths: Vec<u16>,
    widths_version: Option<u64>,
    confirm: Option<ConfirmPrompt>,
    throbber: ThrobberState,
    show_help: bool,

    // Areas from the last frame, for mouse hit testing.
    frame_area: Rect,
    filter_area: Rect,
    grid_area: Rect,
    last_click: Option<(Instant, usize)>,
}

impl App {
    pub fn new(rt: tokio::runtime::Handle, db: Database, config: Config) -> Self {
        let mut controller = ViewController::new(rt, db);
        controller.load_tables();

        Self {
            focus: Focus::Grid,
            controller,
            config,
            sidebar: Sidebar::new(),
            filter_bar: FilterBar::default(),
            grid_state: GridState::default(),
            col_widths: Vec::new(),
            widths_version: None,
            confirm: None,
            throbber: ThrobberState::default(),
            show_help: false,
            frame_area: Rect::default(),
            filter_area: Rect::default(),
            grid_area: Rect::default(),
            last_click: None,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.controller.drain_db_events();
            self.sync_view();

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.on_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Bring cached widths, cursor and selection in line with the controller.
    fn sync_view(&mut self) {
        let version = self.controller.rows_version();
        if self.widths_version != Some(version) {
            let headers = self.headers();
            self.col_widths = compute_column_widths(
                &headers,
                self.controller.proxy().source_rows(),
                self.config.display.min_column_width,
                self.config.display.max_column_width,
            );
            self.widths_version = Some(version);
        }

        let cols = self.col_widths.len();
        self.grid_state.clamp(self.controller.proxy().visible_len(), cols);
        self.filter_bar.clamp(cols);

        if let Some(table) = self.controller.current_table() {
            if self.sidebar.tables_state.selected().is_none() {
                self.sidebar.select_table_by_name(self.controller.tables(), table);
            }
        }
    }

    fn headers(&self) -> Vec<String> {
        self.controller
            .schema()
            .map(|s| s.column_names())
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        self.frame_area = size;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);
        let main_area = chunks[0];
        let status_area = chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(self.config.display.sidebar_width),
                Constraint::Min(10),
            ])
            .split(main_area);
        let sidebar_area = columns[0];

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(columns[1]);
        self.filter_area = right[0];
        self.grid_area = right[1];

        self.sidebar.render(
            frame,
            sidebar_area,
            self.controller.tables(),
            self.controller.requested_table(),
            self.focus == Focus::Tables,
        );

        // Keep filter cells and grid columns scrolled together.
        let data_w = self.grid_area.width.saturating_sub(2 + MARKER_W);
        self.grid_state.ensure_column_visible(&self.col_widths, data_w);
        let body_rows = self.grid_area.height.saturating_sub(3) as usize;
        self.grid_state
            .ensure_cursor_visible(body_rows, self.controller.proxy().visible_len());

        frame.render_widget(
            FilterRow {
                inputs: self.controller.filter_inputs(),
                col_widths: &self.col_widths,
                col_offset: self.grid_state.col_offset,
                focused_column: (self.focus == Focus::Filters)
                    .then_some(self.filter_bar.focused_column),
            },
            self.filter_area,
        );

        let headers = self.headers();
        let title = match self.controller.current_table() {
            Some(table) => format!(" {table} (i insert, Enter edit, d delete, s sort, / filter) "),
            None => " No table ".to_string(),
        };
        frame.render_widget(
            DataGrid {
                headers: &headers,
                proxy: self.controller.proxy(),
                col_widths: &self.col_widths,
                state: &self.grid_state,
                focused: self.focus == Focus::Grid,
                title,
            },
            self.grid_area,
        );

        if self.controller.view_state() == ViewState::Loading || self.controller.mutation_in_flight()
        {
            self.throbber.calc_next();
            if self.grid_area.width > 4 {
                let rect = Rect::new(
                    self.grid_area.x + self.grid_area.width - 4,
                    self.grid_area.y,
                    3,
                    1,
                );
                let throbber = Throbber::default()
                    .throbber_set(BRAILLE_ONE)
                    .throbber_style(Style::default().fg(Color::Yellow));
                frame.render_stateful_widget(throbber, rect, &mut self.throbber);
            }
        }

        let sort = self.controller.proxy().primary_sort().and_then(|key| {
            headers
                .get(key.column)
                .map(|name| format!("{name} {}", key.order.arrow()))
        });
        let info = StatusInfo {
            db_status: Some(self.controller.db_status()),
            database: self.controller.database().location(),
            table: self.controller.current_table(),
            visible_rows: self.controller.proxy().visible_len(),
            total_rows: self.controller.row_count(),
            active_filters: self.controller.proxy().filters().len(),
            sort,
            message: self.controller.last_status.as_deref(),
            error: self.controller.last_error.as_deref(),
        };
        frame.render_widget(
            Paragraph::new(build_status_line(&info, status_area.width)),
            status_area,
        );

        if let Some(form) = self.controller.form() {
            form.render(frame, size);
        }

        if let Some(confirm) = &self.confirm {
            confirm.render(frame, size);
        }

        if self.show_help {
            let popup = centered_rect(60, 70, size);
            frame.render_widget(Clear, popup);
            frame.render_widget(help_popup(), popup);
        }
    }

    /// Returns true when the app should quit.
    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return true;
        }

        if let Some(confirm) = self.confirm.as_mut() {
            let result = confirm.handle_key(key);
            self.finish_confirm(result);
            return false;
        }

        if let Some(form) = self.controller.form_mut() {
            let action = form.handle_key(key);
            self.apply_form_action(action);
            return false;
        }

        if self.show_help {
            self.show_help = false;
            return false;
        }

        if self.focus == Focus::Filters {
            self.handle_filter_key(key);
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
            (KeyCode::Char('?'), _) => self.show_help = true,
            (KeyCode::Tab, KeyModifiers::NONE) => self.focus = self.focus.next(),
            (KeyCode::Char('r'), KeyModifiers::NONE) => self.controller.refresh(),
            (KeyCode::Esc, _) => {
                self.controller.last_error = None;
            }
            _ => match self.focus {
                Focus::Tables => self.handle_tables_key(key),
                Focus::Grid => self.handle_grid_key(key),
                Focus::Filters => {}
            },
        }
        false
    }

    fn handle_tables_key(&mut self, key: KeyEvent) {
        let count = self.controller.tables().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.sidebar.up(count),
            KeyCode::Down | KeyCode::Char('j') => self.sidebar.down(count),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                if let Some(table) = self
                    .sidebar
                    .selected_table(self.controller.tables())
                    .map(str::to_string)
                {
                    self.switch_table(&table);
                    self.focus = Focus::Grid;
                }
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        let cursor_col = self.grid_state.cursor_col;
        match (key.code, key.modifiers) {
            (KeyCode::Char('/'), _) => {
                if !self.col_widths.is_empty() {
                    self.filter_bar.focused_column = cursor_col;
                    self.focus = Focus::Filters;
                }
            }
            (KeyCode::Char('s'), KeyModifiers::NONE) => {
                self.controller.toggle_sort(cursor_col);
            }
            (KeyCode::Char('S'), _) => self.controller.clear_sort(),
            (KeyCode::Char('x'), KeyModifiers::NONE) => self.controller.clear_filters(),
            (KeyCode::Char('i'), KeyModifiers::NONE) => {
                self.controller.open_insert_form();
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                self.controller.open_edit_form(self.grid_state.cursor_row);
            }
            (KeyCode::Char('d'), KeyModifiers::NONE) => {
                if self.controller.open_edit_form(self.grid_state.cursor_row) {
                    if let Some(identity) = self
                        .controller
                        .form()
                        .and_then(|f| f.identity())
                        .map(str::to_string)
                    {
                        self.apply_form_action(RowFormAction::Delete { identity });
                    }
                }
            }
            _ => {
                let rows = self.controller.proxy().visible_len();
                let cols = self.col_widths.len();
                if let GridKeyResult::OpenRow(row) = self.grid_state.handle_key(key, rows, cols) {
                    self.controller.open_edit_form(row);
                }
            }
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match self.filter_bar.handle_key(key, self.controller.filter_inputs()) {
            FilterBarAction::None => {}
            FilterBarAction::Edit { column, pattern } => {
                self.controller.set_filter_text(column, pattern);
                self.grid_state.cursor_col = column;
            }
            FilterBarAction::Leave => self.focus = Focus::Grid,
        }
    }

    fn switch_table(&mut self, table: &str) {
        self.grid_state.reset();
        self.filter_bar = FilterBar::default();
        self.confirm = None;
        self.controller.select_table(table);
    }

    fn apply_form_action(&mut self, action: RowFormAction) {
        if let FormResponse::ConfirmDelete { identity } = self.controller.handle_form_action(action)
        {
            let table = self.controller.current_table().unwrap_or_default().to_string();
            let column = self
                .controller
                .schema()
                .map(|s| s.identity_column().to_string())
                .unwrap_or_default();
            self.confirm = Some(ConfirmPrompt::new(
                format!("Delete the row where {column} = {identity} from {table}?"),
                ConfirmContext::DeleteRow { table, identity },
            ));
        }
    }

    fn finish_confirm(&mut self, result: ConfirmResult) {
        let confirmation = match result {
            ConfirmResult::Pending => return,
            ConfirmResult::Confirmed => Confirmation::Yes,
            ConfirmResult::Cancelled => Confirmation::Cancel,
        };
        self.confirm = None;
        self.controller.resolve_delete(confirmation);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);

        if let Some(confirm) = self.confirm.as_mut() {
            let result = confirm.handle_mouse(mouse, self.frame_area);
            self.finish_confirm(result);
            return;
        }

        if self.controller.form().is_some() {
            if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                return;
            }
            let area = self.frame_area;
            let Some(form) = self.controller.form_mut() else {
                return;
            };
            if let Some(button) = form.button_at(area, x, y) {
                let action = form.press(button);
                self.apply_form_action(action);
            } else if let Some(field) = form.field_at(area, x, y) {
                form.focus(field);
            }
            return;
        }

        if self.sidebar.contains(x, y) {
            self.focus = Focus::Tables;
            if let Some(SidebarAction::SelectTable(table)) =
                self.sidebar.handle_mouse(mouse, self.controller.tables())
            {
                self.switch_table(&table);
            }
            return;
        }

        let grid_inner = Block::default().borders(Borders::ALL).inner(self.grid_area);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if is_inside(x, y, self.filter_area) => {
                let inner = Block::default().borders(Borders::ALL).inner(self.filter_area);
                if let Some(col) = column_at(inner, &self.col_widths, self.grid_state.col_offset, x)
                {
                    self.filter_bar.focused_column = col;
                    self.focus = Focus::Filters;
                }
            }
            MouseEventKind::Down(MouseButton::Left) if is_inside(x, y, grid_inner) => {
                self.focus = Focus::Grid;
                let col = column_at(grid_inner, &self.col_widths, self.grid_state.col_offset, x);
                if y == grid_inner.y {
                    // Header click sorts.
                    if let Some(col) = col {
                        self.grid_state.cursor_col = col;
                        self.controller.toggle_sort(col);
                    }
                    return;
                }
                let row = self.grid_state.row_offset + (y - grid_inner.y - 1) as usize;
                if row >= self.controller.proxy().visible_len() {
                    return;
                }
                self.grid_state.cursor_row = row;
                if let Some(col) = col {
                    self.grid_state.cursor_col = col;
                }
                let now = Instant::now();
                let double = self
                    .last_click
                    .is_some_and(|(at, r)| r == row && now.duration_since(at) <= DOUBLE_CLICK);
                if double {
                    self.last_click = None;
                    self.controller.open_edit_form(row);
                } else {
                    self.last_click = Some((now, row));
                }
            }
            MouseEventKind::ScrollUp if is_inside(x, y, self.grid_area) => {
                self.grid_state.cursor_row = self.grid_state.cursor_row.saturating_sub(3);
            }
            MouseEventKind::ScrollDown if is_inside(x, y, self.grid_area) => {
                let rows = self.controller.proxy().visible_len();
                if rows > 0 {
                    self.grid_state.cursor_row = (self.grid_state.cursor_row + 3).min(rows - 1);
                }
            }
            _ => {}
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn help_popup() -> Paragraph<'static> {
    let key = Style::default().fg(Color::Yellow);
    let entry = |k: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("  {k:<12}"), key), Span::raw(desc)])
    };
    let lines = vec![
        Line::from(Span::styled(
            "sqlview - SQLite table viewer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("Tab", "cycle focus: tables, filters, grid"),
        entry("j/k, arrows", "move"),
        entry("Enter", "open table / edit row"),
        entry("i", "insert a row"),
        entry("e", "edit the row under the cursor"),
        entry("d", "delete the row under the cursor"),
        entry("s / S", "sort by column (toggle) / clear sort"),
        entry("/", "edit the filter of the current column"),
        entry("x", "clear all filters"),
        entry("r", "re-fetch rows"),
        entry("Esc", "dismiss error"),
        entry("q, Ctrl+C", "quit"),
        Line::from(""),
        Line::from(Span::styled("Row form", Style::default().add_modifier(Modifier::BOLD))),
        entry("Tab/Shift+Tab", "next / previous field"),
        entry("Ctrl+S", "insert or save"),
        entry("Ctrl+D", "delete (edit mode)"),
        entry("Ctrl+U", "clear field"),
        entry("Esc", "close without changes"),
    ];

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (any key to close) ")
            .border_style(Style::default().fg(Color::Cyan)),
    )
}
