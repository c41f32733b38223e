use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diff_record;

/// One priced item offered by the dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topping {
    pub name: String,
    pub cost: f64,
}

impl Topping {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

diff_record!(Topping { name, cost });

/// State owned by one dialog instance.
///
/// `selected` is keyed by topping name. Keys outlive their topping only
/// between a reload starting and `toppings` being replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToppingsModel {
    pub toppings: Vec<Topping>,
    pub selected: BTreeMap<String, bool>,
}

diff_record!(ToppingsModel { toppings, selected });

impl ToppingsModel {
    /// Fresh model for `toppings`, selecting exactly the names in `initial`.
    pub fn loaded(toppings: Vec<Topping>, initial: &[String]) -> Self {
        let selected = toppings
            .iter()
            .map(|topping| (topping.name.clone(), initial.contains(&topping.name)))
            .collect();
        Self { toppings, selected }
    }

    /// Back to the empty shape.
    pub fn clear(&mut self) {
        self.toppings.clear();
        self.selected.clear();
    }

    pub fn topping(&self, name: &str) -> Option<&Topping> {
        self.toppings.iter().find(|topping| topping.name == name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.toppings.iter().map(|topping| topping.name.clone()).collect()
    }

    /// Unknown names read as unselected.
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.get(name).copied().unwrap_or(false)
    }

    /// True for an empty list.
    pub fn is_all_selected(&self) -> bool {
        self.toppings.iter().all(|topping| self.is_selected(&topping.name))
    }

    pub fn is_any_selected(&self) -> bool {
        self.selected.values().any(|checked| *checked)
    }

    /// Selected toppings in list order.
    pub fn selected_toppings(&self) -> Vec<Topping> {
        self.toppings
            .iter()
            .filter(|topping| self.is_selected(&topping.name))
            .cloned()
            .collect()
    }

    pub fn upcharge(&self) -> f64 {
        self.toppings
            .iter()
            .filter(|topping| self.is_selected(&topping.name))
            .fold(0.0, |sum, topping| sum + topping.cost)
    }

    /// Selection map with every listed topping set to `checked`.
    pub fn selection_all(&self, checked: bool) -> BTreeMap<String, bool> {
        self.toppings
            .iter()
            .map(|topping| (topping.name.clone(), checked))
            .collect()
    }
}

/// Two-decimal fixed formatting used for prices.
pub fn format_price(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;

    fn model() -> ToppingsModel {
        ToppingsModel::loaded(
            vec![
                Topping::new("cheese", 1.42),
                Topping::new("olives", 2.32),
                Topping::new("onions", 3.11),
            ],
            &["olives".to_string()],
        )
    }

    #[test]
    fn loaded_marks_initial_selection() {
        let model = model();
        assert!(!model.is_selected("cheese"));
        assert!(model.is_selected("olives"));
        assert_eq!(model.selected.len(), 3);
    }

    #[test]
    fn unknown_name_is_unselected() {
        assert!(!model().is_selected("anchovies"));
        assert!(model().topping("anchovies").is_none());
    }

    #[test]
    fn empty_model_is_vacuously_all_selected() {
        let empty = ToppingsModel::default();
        assert!(empty.is_all_selected());
        assert!(!empty.is_any_selected());
        assert_eq!(format_price(empty.upcharge()), "0.00");
    }

    #[test]
    fn upcharge_sums_selected_in_order() {
        let mut model = model();
        model.selected = model.selection_all(true);
        assert_eq!(format_price(model.upcharge()), "6.85");
    }

    #[test]
    fn selection_diff_paths() {
        let before = model();
        let mut after = model();
        after.selected.insert("cheese".into(), true);
        let diffs = diff(&before, &after);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path.to_string(), "selected.cheese");
    }

    #[test]
    fn clear_restores_empty_shape() {
        let mut model = model();
        model.clear();
        assert_eq!(model, ToppingsModel::default());
    }
}
