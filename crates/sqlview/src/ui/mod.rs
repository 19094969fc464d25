mod confirm_prompt;
mod filter_bar;
mod grid;
mod mouse_util;
mod row_form;
mod sidebar;
mod status_line;

pub use confirm_prompt::{ConfirmContext, ConfirmPrompt, ConfirmResult};
pub use filter_bar::{FilterBar, FilterBarAction, FilterRow};
pub use grid::{
    column_at, compute_column_widths, DataGrid, GridKeyResult, GridState,
};
pub(crate) use grid::MARKER_W;
pub use mouse_util::is_inside;
pub use row_form::{form_layout, FieldPlacement, FormButton, FormMode, RowForm, RowFormAction};
pub use sidebar::{Sidebar, SidebarAction};
pub use status_line::{build_status_line, Priority, StatusInfo, StatusSegment};
