use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value;

use super::{ChangeKind, Diff, Difference, FieldPath, PathSegment};

macro_rules! diff_leaf {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Diff for $ty {
                fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
                    if self != after {
                        out.push(Difference::new(ChangeKind::Changed, path));
                    }
                }
            }
        )+
    };
}

diff_leaf!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    String,
    &'static str,
);

macro_rules! diff_float {
    ($($ty:ty),+) => {
        $(
            impl Diff for $ty {
                // NaN == NaN here, otherwise a NaN field would signal forever.
                fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
                    let same = self == after || (self.is_nan() && after.is_nan());
                    if !same {
                        out.push(Difference::new(ChangeKind::Changed, path));
                    }
                }
            }
        )+
    };
}

diff_float!(f32, f64);

impl<T: Diff> Diff for Option<T> {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        match (self, after) {
            (None, None) => {}
            (Some(_), None) => out.push(Difference::new(ChangeKind::Removed, path)),
            (None, Some(_)) => out.push(Difference::new(ChangeKind::Added, path)),
            (Some(before), Some(after)) => before.diff_into(after, path, out),
        }
    }
}

impl<T: Diff> Diff for [T] {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        let shared = self.len().min(after.len());
        for index in 0..shared {
            path.scoped(PathSegment::Index(index), |path| {
                self[index].diff_into(&after[index], path, out)
            });
        }
        for index in shared..self.len() {
            path.scoped(PathSegment::Index(index), |path| {
                out.push(Difference::new(ChangeKind::Removed, path))
            });
        }
        for index in shared..after.len() {
            path.scoped(PathSegment::Index(index), |path| {
                out.push(Difference::new(ChangeKind::Added, path))
            });
        }
    }
}

impl<T: Diff> Diff for Vec<T> {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        self.as_slice().diff_into(after.as_slice(), path, out)
    }
}

impl<T: Diff> Diff for Box<T> {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        (**self).diff_into(&**after, path, out)
    }
}

impl<T: Diff> Diff for BTreeMap<String, T> {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        for (key, old) in self {
            path.scoped(PathSegment::Key(key.clone()), |path| match after.get(key) {
                Some(new) => old.diff_into(new, path, out),
                None => out.push(Difference::new(ChangeKind::Removed, path)),
            });
        }
        for key in after.keys() {
            if !self.contains_key(key) {
                path.scoped(PathSegment::Key(key.clone()), |path| {
                    out.push(Difference::new(ChangeKind::Added, path))
                });
            }
        }
    }
}

impl<T: Diff, S: BuildHasher> Diff for HashMap<String, T, S> {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        let mut before_keys: Vec<&String> = self.keys().collect();
        let mut after_keys: Vec<&String> = after.keys().collect();
        before_keys.sort();
        after_keys.sort();

        for key in before_keys {
            path.scoped(PathSegment::Key(key.clone()), |path| match after.get(key) {
                Some(new) => self[key].diff_into(new, path, out),
                None => out.push(Difference::new(ChangeKind::Removed, path)),
            });
        }
        for key in after_keys {
            if !self.contains_key(key) {
                path.scoped(PathSegment::Key(key.clone()), |path| {
                    out.push(Difference::new(ChangeKind::Added, path))
                });
            }
        }
    }
}

impl Diff for Value {
    fn diff_into(&self, after: &Self, path: &mut FieldPath, out: &mut Vec<Difference>) {
        match (self, after) {
            (Value::Object(before), Value::Object(after)) => {
                for (key, old) in before {
                    path.scoped(PathSegment::Key(key.clone()), |path| match after.get(key) {
                        Some(new) => old.diff_into(new, path, out),
                        None => out.push(Difference::new(ChangeKind::Removed, path)),
                    });
                }
                for key in after.keys() {
                    if !before.contains_key(key) {
                        path.scoped(PathSegment::Key(key.clone()), |path| {
                            out.push(Difference::new(ChangeKind::Added, path))
                        });
                    }
                }
            }
            (Value::Array(before), Value::Array(after)) => {
                before.as_slice().diff_into(after.as_slice(), path, out)
            }
            (before, after) => {
                if before != after {
                    out.push(Difference::new(ChangeKind::Changed, path));
                }
            }
        }
    }
}
