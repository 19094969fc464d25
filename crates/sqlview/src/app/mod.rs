#[allow(clippy::module_inception)]
mod app;
mod controller;
mod state;

pub use app::App;
pub use controller::{DbEvent, FormResponse, ViewController};
pub use state::{DbStatus, Focus, ViewState};
