use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    /// Waiting for the first list from the controller.
    #[default]
    Loading,
    Open {
        /// Number of toppings; the Select All row comes on top of these.
        toppings: usize,
        /// 0 is Select All, `n` is the n-th topping.
        focused: usize,
    },
    /// The list could not be loaded; only cancelling is left.
    Failed {
        message: String,
    },
    Closed {
        confirmed: bool,
    },
}

impl UiState for DialogState {}

/// What the focused row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedRow {
    SelectAll,
    Topping(usize),
}

impl DialogState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    pub fn focused_row(&self) -> Option<FocusedRow> {
        match self {
            Self::Open { focused: 0, .. } => Some(FocusedRow::SelectAll),
            Self::Open { focused, .. } => Some(FocusedRow::Topping(focused - 1)),
            _ => None,
        }
    }
}
