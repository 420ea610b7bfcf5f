//! Dotted method names.
//!
//! Every remote method is addressed as `namespace.method`. The name is
//! split on the first `.` only, so `web.get.thing` lives in namespace
//! `web` under method `get.thing`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};

// ============================================================================
// MethodName
// ============================================================================

/// A validated `namespace.method` name.
///
/// Cheap to clone; the full dotted string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName {
    full: Arc<str>,
    dot: usize,
}

impl MethodName {
    /// Parses a dotted method name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethodName`] if the name has no `.` or an
    /// empty namespace or method part.
    pub fn parse(name: &str) -> Result<Self> {
        match name.find('.') {
            Some(dot) if dot > 0 && dot + 1 < name.len() => Ok(Self {
                full: Arc::from(name),
                dot,
            }),
            _ => Err(Error::invalid_method_name(name)),
        }
    }

    /// Returns the namespace part.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.full[..self.dot]
    }

    /// Returns the method part.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.full[self.dot + 1..]
    }

    /// Returns the full dotted name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for MethodName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
