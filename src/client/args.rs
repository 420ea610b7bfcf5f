//! Untyped argument lists.
//!
//! Dynamic callers (scripts, replayed call logs) hand over a flat list of
//! JSON values where the last entry may be an options bag instead of a
//! parameter. The rule is shape-based and therefore ambiguous: a genuine
//! trailing object parameter that happens to carry a `scope`, `success` or
//! `failure` field is taken as options and dropped from the params. Typed
//! callers pass params and callbacks separately and never go through here.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

// ============================================================================
// Constants
// ============================================================================

/// Keys that mark a trailing object as an options bag.
pub const OPTION_KEYS: &[&str] = &["scope", "success", "failure"];

// ============================================================================
// CallArgs
// ============================================================================

/// Params and options split out of an untyped argument list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    /// Positional parameters sent over the wire.
    pub params: Vec<Value>,
    /// The stripped options bag, empty when none was found.
    pub options: Map<String, Value>,
}

impl CallArgs {
    /// Splits `args` into params and options.
    ///
    /// The last argument is an options bag iff it is a JSON object with at
    /// least one of [`OPTION_KEYS`]. Anything else, including an object
    /// without those keys, stays a literal parameter.
    #[must_use]
    pub fn parse(mut args: Vec<Value>) -> Self {
        let is_options = matches!(
            args.last(),
            Some(Value::Object(map)) if OPTION_KEYS.iter().any(|key| map.contains_key(*key))
        );

        if is_options && let Some(Value::Object(options)) = args.pop() {
            return Self {
                params: args,
                options,
            };
        }

        Self {
            params: args,
            options: Map::new(),
        }
    }

    /// Returns `true` if an options bag was stripped.
    #[inline]
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
