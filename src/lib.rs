pub mod action;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub(crate) mod event;
pub mod gallery;
pub mod input;
pub mod logging;
pub mod notify;
pub(crate) mod runtime;
pub mod ui;
pub mod viewer;
