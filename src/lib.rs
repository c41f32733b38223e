//! A toppings picker built on a small change-detection engine.
//!
//! [`engine`] decides when a model mutation deserves a redraw, [`render`]
//! carries that decision to the host, and [`toppings`] is the dialog the
//! engine drives. [`ui`] hosts it in a terminal; [`replay`] runs it headless.

pub mod config;
pub mod diff;
pub mod engine;
pub mod logging;
pub mod render;
pub mod replay;
pub mod toppings;
pub mod ui;
