//! DLP assistant client.
//!
//! The headless core (`conversation`, `messaging`, `forms`, `speech`, `view`)
//! carries all behaviour; `ui` and `views` bind it to Dioxus.

pub mod api;
pub mod config;
pub mod conversation;
pub mod forms;
pub mod messaging;
pub mod notice;
pub mod speech;
pub mod store;
pub mod theme;
pub mod types;
pub mod view;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
