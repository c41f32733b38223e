use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::engine::ActionError;
use crate::toppings::{format_price, ToppingsActions};
use crate::ui::dialog::DialogState;
use crate::ui::layout::centered_rect_by_size;
use crate::ui::theme::{ACCENT, ACTIVE_HIGHLIGHT, CHECKED, ERROR, MUTED, POPUP_BORDER, TEXT};

const TITLE: &str = "Pizza Toppings";
const PROMPT: &str = "Please select the toppings you want on your pizza.";
const HINT: &str = "Up/Down: Move  Space: Toggle  Enter: Confirm  Esc: Cancel";
const FAILED_HINT: &str = "Esc: Cancel";

#[derive(Debug, Clone, PartialEq)]
pub struct ToppingRow {
    pub name: String,
    pub cost: Option<f64>,
    pub checked: bool,
}

/// Everything the dialog shows, read through the controller's selectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogView {
    pub rows: Vec<ToppingRow>,
    pub all_selected: bool,
    /// Present only while something is selected.
    pub upcharge: Option<String>,
}

impl DialogView {
    pub fn read(actions: &dyn ToppingsActions) -> Result<Self, ActionError> {
        let rows = actions
            .topping_keys()?
            .into_iter()
            .map(|name| -> Result<ToppingRow, ActionError> {
                Ok(ToppingRow {
                    cost: actions.topping(&name)?.map(|topping| topping.cost),
                    checked: actions.is_topping_selected(&name)?,
                    name,
                })
            })
            .collect::<Result<Vec<_>, ActionError>>()?;

        let upcharge = if actions.is_any_topping_selected()? {
            Some(actions.total_upcharge()?)
        } else {
            None
        };

        Ok(Self {
            rows,
            all_selected: actions.is_all_selected()?,
            upcharge,
        })
    }
}

pub fn draw(frame: &mut Frame<'_>, state: &DialogState, view: &DialogView) {
    let lines = dialog_lines(state, view);
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let area = centered_rect_by_size(
        frame.area(),
        content_width.saturating_add(4),
        (lines.len() as u16).saturating_add(2),
    );
    draw_popup(frame, area, lines);
}

fn draw_popup(frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    frame.render_widget(Clear, area);
    let popup = Block::default()
        .title(Span::styled(TITLE, Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER));
    frame.render_widget(Paragraph::new(lines).block(popup), area);
}

fn dialog_lines(state: &DialogState, view: &DialogView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(PROMPT, Style::default().fg(TEXT)))];

    match &view.upcharge {
        Some(total) => lines.push(Line::from(vec![
            Span::raw("There will be an upcharge of "),
            Span::styled(format!("${total}"), Style::default().add_modifier(Modifier::BOLD)),
        ])),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(""));

    let focused = match state {
        DialogState::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading toppings...",
                Style::default().fg(MUTED),
            )));
            return lines;
        }
        DialogState::Failed { message } => {
            lines.push(Line::from(Span::styled(
                format!("Could not load toppings: {message}"),
                Style::default().fg(ERROR),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(FAILED_HINT, Style::default().fg(MUTED))));
            return lines;
        }
        DialogState::Open { focused, .. } => Some(*focused),
        DialogState::Closed { .. } => None,
    };

    lines.push(checkbox_line(
        "Select All".to_string(),
        view.all_selected,
        focused == Some(0),
    ));
    for (index, row) in view.rows.iter().enumerate() {
        let label = match row.cost {
            Some(cost) => format!("{} ${}", row.name, format_price(cost)),
            None => row.name.clone(),
        };
        lines.push(checkbox_line(label, row.checked, focused == Some(index + 1)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(HINT, Style::default().fg(MUTED))));
    lines
}

fn checkbox_line(label: String, checked: bool, focused: bool) -> Line<'static> {
    let (mark, color) = if checked { ("[x] ", CHECKED) } else { ("[ ] ", TEXT) };
    let line = Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::styled(label, Style::default().fg(TEXT)),
    ]);
    if focused {
        line.style(Style::default().bg(ACTIVE_HIGHLIGHT))
    } else {
        line
    }
}
