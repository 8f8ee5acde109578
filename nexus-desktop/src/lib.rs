//! Nexus desktop shell: composition root, commands and the terminal front end.

pub mod app;
pub mod commands;
pub mod logging;
pub mod terminal;
pub mod view;
