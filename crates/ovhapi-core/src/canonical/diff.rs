//! Changed-path report between two canonical snapshots.
//!
//! Used for the `compare` command and for diagnostics; the change decision
//! itself only needs canonical equality.

use crate::canonical::model::Canonical;
use crate::canonical::rule::escape;
use serde::Serialize;
use std::cmp::Ordering;

/// What happened at a pointer between `before` and `after`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One changed location, identified by a JSON pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathChange {
    pub pointer: String,
    pub kind: ChangeKind,
}

/// List every location where `before` and `after` differ
///
/// Output is in document order of the canonical forms. Equal snapshots
/// yield an empty list.
pub fn changed_paths(before: &Canonical, after: &Canonical) -> Vec<PathChange> {
    let mut changes = Vec::new();
    walk(before, after, String::new(), &mut changes);
    changes
}

fn walk(before: &Canonical, after: &Canonical, pointer: String, out: &mut Vec<PathChange>) {
    if before == after {
        return;
    }
    match (before, after) {
        (Canonical::Map(a), Canonical::Map(b)) => {
            let (mut i, mut j) = (0, 0);
            while i < a.len() || j < b.len() {
                let order = match (a.get(i), b.get(j)) {
                    (Some((ka, _)), Some((kb, _))) => ka.cmp(kb),
                    (Some(_), None) => Ordering::Less,
                    _ => Ordering::Greater,
                };
                match order {
                    Ordering::Less => {
                        out.push(change(&pointer, &a[i].0, ChangeKind::Removed));
                        i += 1;
                    }
                    Ordering::Greater => {
                        out.push(change(&pointer, &b[j].0, ChangeKind::Added));
                        j += 1;
                    }
                    Ordering::Equal => {
                        let child = format!("{}/{}", pointer, escape(&a[i].0));
                        walk(&a[i].1, &b[j].1, child, out);
                        i += 1;
                        j += 1;
                    }
                }
            }
        }
        (Canonical::Seq(a), Canonical::Seq(b)) => {
            for index in 0..a.len().max(b.len()) {
                let key = index.to_string();
                match (a.get(index), b.get(index)) {
                    (Some(x), Some(y)) => walk(x, y, format!("{}/{}", pointer, key), out),
                    (Some(_), None) => out.push(change(&pointer, &key, ChangeKind::Removed)),
                    (None, Some(_)) => out.push(change(&pointer, &key, ChangeKind::Added)),
                    (None, None) => {}
                }
            }
        }
        _ => out.push(PathChange {
            pointer,
            kind: ChangeKind::Modified,
        }),
    }
}

fn change(parent: &str, key: &str, kind: ChangeKind) -> PathChange {
    PathChange {
        pointer: format!("{}/{}", parent, escape(key)),
        kind,
    }
}
