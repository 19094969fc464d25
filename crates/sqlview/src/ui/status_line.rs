//! Status line with width-aware segments.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::app::DbStatus;

/// Lower values survive narrower terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

#[derive(Debug, Clone)]
pub struct StatusSegment {
    pub content: String,
    pub priority: Priority,
    pub style: Style,
}

impl StatusSegment {
    pub fn new(content: impl Into<String>, priority: Priority) -> Self {
        Self {
            content: content.into(),
            priority,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn width(&self) -> usize {
        self.content.chars().count()
    }
}

/// Everything the status line reports about the current view.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo<'a> {
    pub db_status: Option<DbStatus>,
    pub database: &'a str,
    pub table: Option<&'a str>,
    pub visible_rows: usize,
    pub total_rows: usize,
    pub active_filters: usize,
    pub sort: Option<String>,
    pub message: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// Left segments are kept in priority order while they fit; the message (or
/// error) is right-aligned and always kept, truncated if needed.
pub fn build_status_line(info: &StatusInfo<'_>, available_width: u16) -> Line<'static> {
    let width = available_width as usize;
    if width == 0 {
        return Line::from("");
    }

    let mut segments = Vec::new();
    if let Some(status) = info.db_status {
        let color = match status {
            DbStatus::Connected => Color::Green,
            DbStatus::Loading => Color::Yellow,
            DbStatus::Error => Color::Red,
            DbStatus::Disconnected => Color::DarkGray,
        };
        segments.push(
            StatusSegment::new(format!(" {} ", status.label()), Priority::Critical)
                .style(Style::default().fg(Color::Black).bg(color)),
        );
    }
    if let Some(table) = info.table {
        segments.push(
            StatusSegment::new(table, Priority::Critical)
                .style(Style::default().add_modifier(Modifier::BOLD)),
        );
        let rows = if info.visible_rows == info.total_rows {
            format!("{} rows", info.total_rows)
        } else {
            format!("{}/{} rows", info.visible_rows, info.total_rows)
        };
        segments.push(StatusSegment::new(rows, Priority::High));
    }
    if info.active_filters > 0 {
        segments.push(
            StatusSegment::new(format!("{} filters", info.active_filters), Priority::Medium)
                .style(Style::default().fg(Color::Yellow)),
        );
    }
    if let Some(sort) = &info.sort {
        segments.push(StatusSegment::new(format!("sort {sort}"), Priority::Medium));
    }
    segments.push(
        StatusSegment::new(info.database, Priority::Low).style(Style::default().fg(Color::DarkGray)),
    );

    let right = match (info.error, info.message) {
        (Some(err), _) => Some(StatusSegment::new(err, Priority::Critical).style(Style::default().fg(Color::Red))),
        (None, Some(msg)) => Some(StatusSegment::new(msg, Priority::Critical).style(Style::default().fg(Color::Cyan))),
        (None, None) => None,
    };

    const SEP: &str = " │ ";
    let sep_w = SEP.chars().count();

    // Reserve at most half the line for the right-hand message.
    let right_w = right.as_ref().map(|r| r.width().min(width / 2)).unwrap_or(0);
    let left_budget = width.saturating_sub(right_w + if right_w > 0 { 1 } else { 0 });

    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by_key(|&i| segments[i].priority);
    let mut keep = vec![false; segments.len()];
    let mut used = 0usize;
    for i in order {
        let needed = segments[i].width() + if used == 0 { 0 } else { sep_w };
        if used + needed <= left_budget {
            used += needed;
            keep[i] = true;
        }
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    for (segment, _) in segments.into_iter().zip(keep).filter(|(_, k)| *k) {
        if !spans.is_empty() {
            spans.push(Span::styled(SEP, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(segment.content, segment.style));
    }

    if let Some(right) = right {
        let content: String = right.content.chars().take(right_w).collect();
        let padding = width.saturating_sub(used + content.chars().count());
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(content, right.style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_status_line_shows_filtered_counts() {
        let info = StatusInfo {
            db_status: Some(DbStatus::Connected),
            database: "test.db",
            table: Some("users"),
            visible_rows: 2,
            total_rows: 5,
            active_filters: 1,
            ..Default::default()
        };
        let line = text(&build_status_line(&info, 120));
        assert!(line.contains("users"));
        assert!(line.contains("2/5 rows"));
        assert!(line.contains("1 filters"));
        assert!(line.contains("test.db"));
    }

    #[test]
    fn test_narrow_line_drops_low_priority() {
        let info = StatusInfo {
            db_status: Some(DbStatus::Connected),
            database: "/a/very/long/path/to/a/database.db",
            table: Some("users"),
            visible_rows: 5,
            total_rows: 5,
            ..Default::default()
        };
        let line = text(&build_status_line(&info, 30));
        assert!(line.contains("users"));
        assert!(!line.contains("database.db"));
    }

    #[test]
    fn test_error_is_right_aligned() {
        let info = StatusInfo {
            database: "x.db",
            error: Some("boom"),
            ..Default::default()
        };
        let line = text(&build_status_line(&info, 40));
        assert_eq!(line.chars().count(), 40);
        assert!(line.ends_with("boom"));
    }
}
