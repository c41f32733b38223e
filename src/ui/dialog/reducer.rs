use crate::ui::dialog::intent::DialogIntent;
use crate::ui::dialog::state::DialogState;
use crate::ui::mvi::Reducer;

pub struct DialogReducer;

impl Reducer for DialogReducer {
    type State = DialogState;
    type Intent = DialogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            DialogIntent::Loaded { toppings } => match state {
                DialogState::Loading => DialogState::Open {
                    toppings,
                    focused: 0,
                },
                // Keep focus on a row that still exists.
                DialogState::Open { focused, .. } => DialogState::Open {
                    toppings,
                    focused: focused.min(toppings),
                },
                other => other,
            },
            DialogIntent::LoadFailed { message } => match state {
                DialogState::Loading | DialogState::Open { .. } => DialogState::Failed { message },
                other => other,
            },
            DialogIntent::MoveUp => match state {
                DialogState::Open { toppings, focused } => {
                    let focused = if focused == 0 { toppings } else { focused - 1 };
                    DialogState::Open { toppings, focused }
                }
                other => other,
            },
            DialogIntent::MoveDown => match state {
                DialogState::Open { toppings, focused } => {
                    let focused = if focused >= toppings { 0 } else { focused + 1 };
                    DialogState::Open { toppings, focused }
                }
                other => other,
            },
            DialogIntent::Confirm => match state {
                DialogState::Open { .. } => DialogState::Closed { confirmed: true },
                other => other,
            },
            DialogIntent::Cancel => match state {
                DialogState::Closed { .. } => state,
                _ => DialogState::Closed { confirmed: false },
            },
        }
    }
}
