use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum DialogIntent {
    /// The controller's list changed; carries its new length.
    Loaded { toppings: usize },
    LoadFailed { message: String },
    MoveUp,
    MoveDown,
    Confirm,
    Cancel,
}

impl Intent for DialogIntent {}
