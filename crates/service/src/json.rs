//! JSON decoding for documents.
//!
//! serde_json's built-in limit stops at 128 levels. Documents may nest
//! deeper, so parsing runs with that limit off, on a growable stack, behind
//! an explicit `max_depth` that keeps serialization and drop bounded too.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 1024;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON nested {depth} levels deep, limit is {max}")]
    TooDeep { depth: usize, max: usize },
    #[error(transparent)]
    Syntax(#[from] serde_json::Error),
}

/// Deepest array/object nesting in `bytes`, ignoring brackets inside strings.
/// Does not validate; malformed input is left for the parser to report.
pub fn nesting_depth(bytes: &[u8]) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &b in bytes {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Parse `bytes` into `T`, accepting any nesting up to `max_depth`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8], max_depth: usize) -> Result<T, JsonError> {
    let depth = nesting_depth(bytes);
    if depth > max_depth {
        return Err(JsonError::TooDeep { depth, max: max_depth });
    }
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
