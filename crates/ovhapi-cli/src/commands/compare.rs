//! Offline snapshot comparison
//!
//! Applies the same canonicalization as the module to two JSON files and
//! lists the pointers that differ.

use clap::Args;
use ovhapi_core::canonical::{canonicalize, changed_paths, CanonicalRule, SequenceOrder};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Snapshot taken before the change
    pub before: PathBuf,

    /// Snapshot taken after the change
    pub after: PathBuf,

    /// Compare every sequence without regard to order
    #[arg(long)]
    pub unordered_lists: bool,

    /// JSON pointer of a sequence to compare without regard to order
    #[arg(long = "unordered-field")]
    pub unordered_fields: Vec<String>,
}

pub fn execute(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let before = read_json(&args.before)?;
    let after = read_json(&args.after)?;

    let order = if args.unordered_lists {
        SequenceOrder::Sorted
    } else {
        SequenceOrder::Preserved
    };
    let rule = args
        .unordered_fields
        .iter()
        .try_fold(CanonicalRule::new().with_sequences(order), |rule, pointer| {
            rule.with_unordered_field(pointer)
        })?;

    let (before, after) = (canonicalize(&before, &rule), canonicalize(&after, &rule));
    let changes = changed_paths(&before, &after);

    let report = json!({
        "changed": before != after,
        "changes": changes,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&raw)
        .map_err(|e| format!("{} is not valid JSON: {}", path.display(), e))?;
    Ok(value)
}
