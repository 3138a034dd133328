//! Core building blocks for the **tabula** data-table widgets.
//!
//! `tabula-core` provides the small Elm-style surface every tabula widget is
//! written against: a [`Component`] owns its state, reacts to messages in
//! `update`, and describes follow-up work as a [`Command`] instead of
//! performing it inline.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Component`] | Widget that updates from messages and renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect for the host to run (immediate message, future, batch) |
//! | [`Latency`] | Injectable settle delay between a request and its commit |
//! | [`TestHarness`](testing::TestHarness) | Headless driver for unit-testing a component |

pub mod command;
pub mod component;
pub mod latency;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use latency::Latency;
