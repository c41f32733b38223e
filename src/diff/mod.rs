//! Structural diff and snapshot primitives.
//!
//! A [`Diff`] implementation walks two values of the same type and records
//! every field-level difference in visiting order. An empty result means the
//! two values are observably identical, which is the only thing the
//! instrumentation engine cares about.
//!
//! Records opt in field by field with [`diff_record!`](crate::diff_record),
//! so only declared fields take part in the comparison.

mod impls;
mod path;

pub use path::{FieldPath, PathSegment};

/// What happened at a path between the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The path exists only in the later value.
    Added,
    /// The path exists only in the earlier value.
    Removed,
    /// The path exists in both but holds different leaf values.
    Changed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: ChangeKind,
    pub path: FieldPath,
}

impl Difference {
    pub fn new(kind: ChangeKind, path: &FieldPath) -> Self {
        Self {
            kind,
            path: path.clone(),
        }
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self.kind {
            ChangeKind::Added => "+",
            ChangeKind::Removed => "-",
            ChangeKind::Changed => "~",
        };
        write!(f, "{} {}", op, self.path)
    }
}

/// Field-by-field structural comparison.
pub trait Diff {
    /// Appends the differences between `self` (earlier) and `after` (later)
    /// to `out`, with paths rooted at `path`.
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>);
}

/// Ordered list of differences between two values; empty means no change.
pub fn diff<T: Diff + ?Sized>(before: &T, after: &T) -> Vec<Difference> {
    let mut path = FieldPath::root();
    let mut out = Vec::new();
    before.diff_into(after, &mut path, &mut out);
    out
}

/// Fully independent deep copy of a value.
///
/// Later mutation of the original is never observable through the copy.
pub trait Snapshot: Sized {
    fn snapshot(&self) -> Self;
}

impl<T: Clone> Snapshot for T {
    fn snapshot(&self) -> Self {
        self.clone()
    }
}

/// Implements [`Diff`] for a record by comparing the listed fields in order.
///
/// ```ignore
/// diff_record!(Order { items, notes });
/// ```
#[macro_export]
macro_rules! diff_record {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::diff::Diff for $ty {
            fn diff_into(
                &self,
                after: &Self,
                path: &mut $crate::diff::FieldPath,
                out: &mut Vec<$crate::diff::Difference>,
            ) {
                $(
                    path.push($crate::diff::PathSegment::Field(stringify!($field)));
                    $crate::diff::Diff::diff_into(&self.$field, &after.$field, path, out);
                    path.pop();
                )+
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        label: String,
        qty: u32,
    }

    crate::diff_record!(Line { label, qty });

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        lines: Vec<Line>,
        flags: BTreeMap<String, bool>,
        note: Option<String>,
        total: f64,
    }

    crate::diff_record!(Order {
        lines,
        flags,
        note,
        total,
    });

    fn order() -> Order {
        Order {
            lines: vec![
                Line {
                    label: "a".into(),
                    qty: 1,
                },
                Line {
                    label: "b".into(),
                    qty: 2,
                },
            ],
            flags: BTreeMap::from([("x".to_string(), true)]),
            note: None,
            total: 3.5,
        }
    }

    fn paths(diffs: &[Difference]) -> Vec<String> {
        diffs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn identical_values_have_no_diff() {
        assert!(diff(&order(), &order()).is_empty());
    }

    #[test]
    fn nested_record_field_change() {
        let before = order();
        let mut after = order();
        after.lines[1].qty = 5;
        assert_eq!(paths(&diff(&before, &after)), vec!["~ lines[1].qty"]);
    }

    #[test]
    fn sequence_growth_and_shrink() {
        let before = order();
        let mut grown = order();
        grown.lines.push(Line {
            label: "c".into(),
            qty: 3,
        });
        assert_eq!(paths(&diff(&before, &grown)), vec!["+ lines[2]"]);
        assert_eq!(paths(&diff(&grown, &before)), vec!["- lines[2]"]);
    }

    #[test]
    fn map_key_addition_and_removal() {
        let before = order();
        let mut after = order();
        after.flags.remove("x");
        after.flags.insert("y".into(), false);
        assert_eq!(paths(&diff(&before, &after)), vec!["- flags.x", "+ flags.y"]);
    }

    #[test]
    fn option_transitions() {
        let before = order();
        let mut after = order();
        after.note = Some("hi".into());
        assert_eq!(paths(&diff(&before, &after)), vec!["+ note"]);
        assert_eq!(paths(&diff(&after, &before)), vec!["- note"]);
    }

    #[test]
    fn several_changes_are_ordered_by_declaration() {
        let before = order();
        let mut after = order();
        after.total = 4.0;
        after.lines[0].label = "z".into();
        assert_eq!(
            paths(&diff(&before, &after)),
            vec!["~ lines[0].label", "~ total"]
        );
    }

    #[test]
    fn nan_equals_nan() {
        assert!(diff(&f64::NAN, &f64::NAN).is_empty());
        assert_eq!(diff(&1.0_f64, &f64::NAN).len(), 1);
    }

    #[test]
    fn hash_map_keys_are_visited_sorted() {
        let before: HashMap<String, i32> = HashMap::from([("b".into(), 1), ("a".into(), 1)]);
        let after: HashMap<String, i32> = HashMap::from([("b".into(), 2), ("a".into(), 2)]);
        assert_eq!(paths(&diff(&before, &after)), vec!["~ a", "~ b"]);
    }

    #[test]
    fn json_values_diff_structurally() {
        let before = json!({ "items": [1, 2], "meta": { "open": true } });
        let after = json!({ "items": [1, 3, 4], "meta": {}, "extra": "x" });
        assert_eq!(
            paths(&diff(&before, &after)),
            vec!["~ items[1]", "+ items[2]", "- meta.open", "+ extra"]
        );
    }

    #[test]
    fn json_type_change_is_a_change() {
        let diffs = diff(&json!({ "a": 1 }), &json!({ "a": "1" }));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut original = order();
        let snap = original.snapshot();
        original.lines.clear();
        assert_eq!(snap.lines.len(), 2);
        assert!(!diff(&snap, &original).is_empty());
    }
}
