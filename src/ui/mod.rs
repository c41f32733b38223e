//! Terminal host for the toppings dialog.

pub mod dialog;
pub mod events;
pub mod layout;
pub mod mvi;
pub mod render;
pub mod runtime;
pub mod terminal_guard;
pub mod theme;
