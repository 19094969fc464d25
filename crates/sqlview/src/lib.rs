pub mod app;
pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod schema;
pub mod ui;
