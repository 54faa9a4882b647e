//! `letterdesk`: a terminal desk of letters opened one at a time.
//!
//! This crate provides the letter loader, the action ledger that remembers
//! what the reader did with each letter, the scratch / hover / click reveal
//! engine, a single-slot audio controller and the view controller that
//! ties them together. The `tui` module renders it all with ratatui.

pub mod audio;
pub mod config;
pub mod desk;
pub mod error;
pub mod i18n;
pub mod ledger;
pub mod model;
pub mod reveal;
pub mod source;
pub mod tui;
