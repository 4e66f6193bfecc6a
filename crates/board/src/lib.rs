//! Terminal kanban board over the task API.

pub mod app;
pub mod card;
pub mod menu;
pub mod modal;
pub mod ui;
pub mod view;

pub use app::App;
