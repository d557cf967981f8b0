use crate::error::Result;
use anyhow::anyhow;
use serde_yaml::mapping::Entry;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::warn;

/// Load the named compose files relative to `base_dir` and merge them left
/// to right into one mapping.
///
/// A file that cannot be read or parsed is logged and skipped; it
/// contributes nothing to the result. The files are re-read on every call,
/// they are expected to change between requests.
pub fn load_merged(filenames: &[String], base_dir: &Path) -> Mapping {
    let mut res = Mapping::new();
    for name in filenames {
        let path = base_dir.join(name);
        let doc = match read_document(&path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("load file {}: {}", path.display(), e);
                continue;
            }
        };
        for (key, value) in doc {
            merge_key(&mut res, key, value);
        }
    }
    res
}

fn read_document(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(anyhow!("top level is not a mapping").into()),
    }
}

/// Merge one top-level key into the accumulator. Mappings union shallowly
/// (later sub-keys win), sequences concatenate, anything else is replaced
/// by the later value.
fn merge_key(res: &mut Mapping, key: Value, value: Value) {
    match res.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
            (Value::Mapping(base), Value::Mapping(update)) => {
                for (k, v) in update {
                    base.insert(k, v);
                }
            }
            (Value::Sequence(base), Value::Sequence(update)) => {
                base.extend(update);
            }
            (existing, value) => *existing = value,
        },
    }
}
