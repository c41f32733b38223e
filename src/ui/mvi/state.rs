//! Base trait for UI state in the dialog's MVI loop.

/// Marker trait for view-local state.
///
/// Only presentation state lives here (focus, open/closed). Topping data
/// stays in the controller's model and is read through its selectors.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
