//! Base trait for intents in the dialog's MVI loop.

/// Marker trait for intent objects.
///
/// Intents are key presses mapped to dialog moves, plus the "list changed"
/// notice the runtime sends after every render request.
pub trait Intent: Send + 'static {}
