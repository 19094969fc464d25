#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Tables,
    Filters,
    Grid,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Tables => Focus::Filters,
            Focus::Filters => Focus::Grid,
            Focus::Grid => Focus::Tables,
        }
    }
}

/// Lifecycle of the table view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// No table has been chosen yet.
    Unselected,
    /// A table switch or refresh is in flight.
    Loading,
    TableLoaded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbStatus {
    Disconnected,
    Loading,
    Connected,
    Error,
}

impl DbStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DbStatus::Disconnected => "DISCONNECTED",
            DbStatus::Loading => "LOADING",
            DbStatus::Connected => "CONNECTED",
            DbStatus::Error => "ERROR",
        }
    }
}
