use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::{ActionError, Lifecycle, MountStatus};
use crate::render::RenderGeneration;
use crate::toppings::ToppingsActions;
use crate::ui::dialog::{DialogIntent, DialogReducer, DialogState, FocusedRow};
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::mvi::Reducer;
use crate::ui::render::{draw, DialogView};
use crate::ui::terminal_guard::setup_terminal;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How the dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Cancelled,
}

/// Run the dialog until it is confirmed or cancelled.
///
/// Redraws whenever `generation` moves. Several requests arriving before the
/// loop gets to run again collapse into one redraw. The dialog opens once the
/// mount hook settles, even when loading changed nothing.
pub async fn run(
    actions: Arc<dyn ToppingsActions>,
    generation: RenderGeneration,
) -> io::Result<DialogOutcome> {
    let (mut terminal, guard) = setup_terminal()?;
    let mut events = EventHandler::new(POLL_INTERVAL);
    let mut renders = generation.subscribe();

    let lifecycle = Lifecycle::mount({
        let actions = Arc::clone(&actions);
        move || actions.on_mount()
    })
    .map_err(to_io)?;

    let mut state = DialogState::default();
    let mut view = DialogView::read(actions.as_ref()).map_err(to_io)?;
    let mut mount_seen = false;

    loop {
        terminal.draw(|frame| draw(frame, &state, &view))?;
        if state.is_closed() {
            break;
        }

        tokio::select! {
            changed = renders.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *renders.borrow_and_update();
                tracing::trace!(generation = current, "redraw");
                view = DialogView::read(actions.as_ref()).map_err(to_io)?;
                // Before the mount settles the list may still be half written.
                if mount_seen {
                    let toppings = view.rows.len();
                    state = DialogReducer::reduce(state, DialogIntent::Loaded { toppings });
                }
            }
            status = lifecycle.mount_settled(), if !mount_seen => {
                mount_seen = true;
                if let MountStatus::Failed(message) = &status {
                    tracing::warn!(error = %message, "toppings failed to load");
                }
                view = DialogView::read(actions.as_ref()).map_err(to_io)?;
                state = DialogReducer::reduce(state, mount_intent(status, &view));
            }
            event = events.next() => match event {
                Some(AppEvent::Key(key)) => {
                    state = handle_key(state, key, actions.as_ref()).map_err(to_io)?;
                }
                Some(AppEvent::Resize(cols, rows)) => {
                    tracing::trace!(cols, rows, "terminal resized");
                }
                None => break,
            },
        }
    }

    let unmounted = lifecycle.unmount({
        let actions = Arc::clone(&actions);
        move || actions.on_unmount()
    });
    drop(events);
    drop(guard);

    match unmounted.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(error = %err, "dialog lifecycle ended with an error"),
        Err(err) => tracing::error!(error = %err, "unmount task failed"),
    }

    Ok(match state {
        DialogState::Closed { confirmed: true } => DialogOutcome::Confirmed,
        _ => DialogOutcome::Cancelled,
    })
}

/// The intent that opens the dialog once the mount hook has settled.
pub fn mount_intent(status: MountStatus, view: &DialogView) -> DialogIntent {
    match status {
        MountStatus::Failed(message) => DialogIntent::LoadFailed { message },
        MountStatus::Mounted | MountStatus::Pending => DialogIntent::Loaded {
            toppings: view.rows.len(),
        },
    }
}

/// Map one key press to controller calls and the next dialog state.
///
/// Toggles read the current selection through the selectors, so presses
/// queued behind a pending redraw still flip the live value.
pub fn handle_key(
    state: DialogState,
    key: KeyEvent,
    actions: &dyn ToppingsActions,
) -> Result<DialogState, ActionError> {
    let intent = match key.code {
        KeyCode::Up => DialogIntent::MoveUp,
        KeyCode::Down | KeyCode::Tab => DialogIntent::MoveDown,
        KeyCode::Esc => DialogIntent::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            DialogIntent::Cancel
        }
        KeyCode::Enter => {
            if !matches!(state, DialogState::Open { .. }) {
                return Ok(state);
            }
            actions.confirm()?;
            DialogIntent::Confirm
        }
        KeyCode::Char(' ') => {
            match state.focused_row() {
                Some(FocusedRow::SelectAll) => actions.toggle_all(!actions.is_all_selected()?)?,
                Some(FocusedRow::Topping(index)) => {
                    if let Some(name) = actions.topping_keys()?.get(index) {
                        actions.toggle_topping(name, !actions.is_topping_selected(name)?)?;
                    }
                }
                None => {}
            }
            return Ok(state);
        }
        _ => return Ok(state),
    };
    Ok(DialogReducer::reduce(state, intent))
}

fn to_io(err: ActionError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}
