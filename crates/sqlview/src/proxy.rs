//! Filter/sort proxy between fetched rows and the grid.
//!
//! The proxy never mutates its source rows. What the grid shows is
//! `filter(sort(source))`, expressed as a list of source indices that is
//! computed on first access and cached until a filter, sort key or the source
//! itself changes.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use crate::db::RowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub order: SortOrder,
}

/// A compiled, case-insensitive column filter.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    pattern: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    /// Lowercased text, used when the pattern is not a valid regex.
    Literal(String),
}

impl ColumnFilter {
    pub fn new(pattern: &str) -> Self {
        let matcher = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Matcher::Regex(regex),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "filter is not a valid regex, matching literally");
                Matcher::Literal(pattern.to_lowercase())
            }
        };
        Self {
            pattern: pattern.to_string(),
            matcher,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(text),
            Matcher::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Column index -> active filter. Columns not present are unconstrained.
pub type FilterSet = BTreeMap<usize, ColumnFilter>;

#[derive(Debug, Default)]
pub struct FilterSortProxy {
    source: Vec<RowRecord>,
    filters: FilterSet,
    /// Primary key first.
    sort_keys: Vec<SortKey>,
    visible: OnceCell<Vec<usize>>,
}

impl FilterSortProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source rows, keeping filters and sort keys.
    pub fn set_rows(&mut self, rows: Vec<RowRecord>) {
        self.source = rows;
        self.invalidate();
    }

    /// Drop rows, filters and sort keys (used when switching tables).
    pub fn reset(&mut self) {
        self.source.clear();
        self.filters.clear();
        self.sort_keys.clear();
        self.invalidate();
    }

    pub fn source_rows(&self) -> &[RowRecord] {
        &self.source
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Set the filter for `column`. An empty pattern removes it.
    pub fn set_filter(&mut self, column: usize, pattern: &str) {
        if pattern.is_empty() {
            self.filters.remove(&column);
        } else {
            self.filters.insert(column, ColumnFilter::new(pattern));
        }
        self.invalidate();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.invalidate();
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// True if every active filter matches its cell. Filters on columns the
    /// row does not have are ignored.
    pub fn accepts_row(&self, row: &[String]) -> bool {
        self.filters.iter().all(|(&column, filter)| match row.get(column) {
            Some(text) => filter.matches(text),
            None => true,
        })
    }

    /// Make `column` the primary sort key. Earlier keys stay as tie-breakers.
    pub fn sort_by(&mut self, column: usize, order: SortOrder) {
        self.sort_keys.retain(|k| k.column != column);
        self.sort_keys.insert(0, SortKey { column, order });
        self.invalidate();
    }

    /// Header click: flip the order if `column` is already primary, else sort ascending.
    pub fn toggle_sort(&mut self, column: usize) -> SortOrder {
        let order = match self.primary_sort() {
            Some(key) if key.column == column => key.order.reversed(),
            _ => SortOrder::Ascending,
        };
        self.sort_by(column, order);
        order
    }

    pub fn clear_sort(&mut self) {
        self.sort_keys.clear();
        self.invalidate();
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn primary_sort(&self) -> Option<SortKey> {
        self.sort_keys.first().copied()
    }

    /// Source indices of the visible rows, in display order.
    pub fn visible_rows(&self) -> &[usize] {
        self.visible.get_or_init(|| self.compute_visible())
    }

    pub fn visible_len(&self) -> usize {
        self.visible_rows().len()
    }

    pub fn source_index(&self, visible_index: usize) -> Option<usize> {
        self.visible_rows().get(visible_index).copied()
    }

    pub fn row(&self, visible_index: usize) -> Option<&RowRecord> {
        self.source_index(visible_index)
            .and_then(|i| self.source.get(i))
    }

    fn invalidate(&mut self) {
        self.visible.take();
    }

    fn compute_visible(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.source.len()).collect();

        if !self.sort_keys.is_empty() {
            // sort_by is stable: equal keys keep source order.
            indices.sort_by(|&a, &b| self.compare_rows(&self.source[a], &self.source[b]));
        }

        indices.retain(|&i| self.accepts_row(&self.source[i]));
        tracing::trace!(
            visible = indices.len(),
            total = self.source.len(),
            "proxy recomputed"
        );
        indices
    }

    fn compare_rows(&self, a: &[String], b: &[String]) -> Ordering {
        for key in &self.sort_keys {
            let left = a.get(key.column).map(String::as_str).unwrap_or_default();
            let right = b.get(key.column).map(String::as_str).unwrap_or_default();
            let ord = match key.order {
                SortOrder::Ascending => left.cmp(right),
                SortOrder::Descending => right.cmp(left),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
