//! Canonical value model.
//!
//! A [`Canonical`] is a JSON value with a total order: mappings are stored as
//! key-sorted pairs and sequences are sorted when the rule asks for it, so
//! two snapshots are equivalent exactly when their canonical forms are equal.

use crate::canonical::rule::{CanonicalRule, SequenceOrder};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Order-normalized JSON value
#[derive(Debug, Clone)]
pub enum Canonical {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Canonical>),
    /// Pairs sorted by key, keys unique
    Map(Vec<(String, Canonical)>),
}

/// Canonicalize `value` under `rule`
pub fn canonicalize(value: &Value, rule: &CanonicalRule) -> Canonical {
    let mut path = Vec::new();
    canonicalize_at(value, rule, &mut path)
}

fn canonicalize_at(value: &Value, rule: &CanonicalRule, path: &mut Vec<String>) -> Canonical {
    match value {
        Value::Null => Canonical::Null,
        Value::Bool(b) => Canonical::Bool(*b),
        Value::Number(n) => Canonical::Number(n.clone()),
        Value::String(s) => Canonical::String(s.clone()),
        Value::Array(items) => {
            let mut seq: Vec<Canonical> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    path.push(index.to_string());
                    let canonical = canonicalize_at(item, rule, path);
                    path.pop();
                    canonical
                })
                .collect();
            if rule.order_at(path) == SequenceOrder::Sorted {
                seq.sort();
            }
            Canonical::Seq(seq)
        }
        Value::Object(map) => {
            let mut pairs: Vec<(String, Canonical)> = map
                .iter()
                .map(|(key, item)| {
                    path.push(key.clone());
                    let canonical = canonicalize_at(item, rule, path);
                    path.pop();
                    (key.clone(), canonical)
                })
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Canonical::Map(pairs)
        }
    }
}

impl Canonical {
    /// Convert back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Canonical::Null => Value::Null,
            Canonical::Bool(b) => Value::Bool(*b),
            Canonical::Number(n) => Value::Number(n.clone()),
            Canonical::String(s) => Value::String(s.clone()),
            Canonical::Seq(items) => Value::Array(items.iter().map(Canonical::to_value).collect()),
            Canonical::Map(pairs) => {
                let map: Map<String, Value> = pairs
                    .iter()
                    .map(|(key, item)| (key.clone(), item.to_value()))
                    .collect();
                Value::Object(map)
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Canonical::Null => 0,
            Canonical::Bool(_) => 1,
            Canonical::Number(_) => 2,
            Canonical::String(_) => 3,
            Canonical::Seq(_) => 4,
            Canonical::Map(_) => 5,
        }
    }
}

/// Sort key for numbers: the float value first, then the exact integer
///
/// Integral floats share the integer's key, so `1` and `1.0` are equal.
fn number_key(n: &Number) -> (f64, Option<i128>) {
    let exact = if let Some(i) = n.as_i64() {
        Some(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(i128::from(u))
    } else {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 1e38)
            .map(|f| f as i128)
    };
    let approx = n.as_f64().unwrap_or(0.0);
    // -0.0 and 0.0 are the same JSON number
    let approx = if approx == 0.0 { 0.0 } else { approx };
    (approx, exact)
}

fn cmp_numbers(a: &Number, b: &Number) -> Ordering {
    let (fa, ea) = number_key(a);
    let (fb, eb) = number_key(b);
    fa.total_cmp(&fb).then_with(|| ea.cmp(&eb))
}

impl Ord for Canonical {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Canonical::Null, Canonical::Null) => Ordering::Equal,
            (Canonical::Bool(a), Canonical::Bool(b)) => a.cmp(b),
            (Canonical::Number(a), Canonical::Number(b)) => cmp_numbers(a, b),
            (Canonical::String(a), Canonical::String(b)) => a.cmp(b),
            (Canonical::Seq(a), Canonical::Seq(b)) => a.cmp(b),
            (Canonical::Map(a), Canonical::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Canonical {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Canonical {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Canonical {}
