//! # Error Handling
//!
//! Unified error type for the normalization core. Unlike a general-purpose
//! application error enum, this one stays closed and small: callers match on
//! the two fatal kinds directly rather than string-sniffing a catch-all.

use std::fmt;

/// The normalization core's error type.
///
/// Both variants are fatal per the component design: there is no recoverable
/// path once either is raised, the caller either gets a full `Spec` or one of
/// these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A `$ref` (or a JSON Pointer computed from one) did not resolve against
    /// the document.
    RefNotFound {
        /// The pointer that failed to resolve.
        pointer: String,
        /// The pointer of the schema that contained the dangling `$ref`, if known.
        referrer: Option<String>,
    },

    /// `allOf` contained a member that could not be merged into an object.
    MergeConflict {
        /// Pointer (or synthetic path) of the offending `allOf` node.
        at: String,
        /// Human-readable description of why the member could not merge.
        reason: String,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::RefNotFound { pointer, referrer } => match referrer {
                Some(r) => write!(f, "ref not found: {pointer} (referenced from {r})"),
                None => write!(f, "ref not found: {pointer}"),
            },
            CoreError::MergeConflict { at, reason } => {
                write!(f, "allOf merge conflict at {at}: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl CoreError {
    /// Builds a [`CoreError::RefNotFound`] with no known referrer.
    pub fn ref_not_found(pointer: impl Into<String>) -> Self {
        CoreError::RefNotFound {
            pointer: pointer.into(),
            referrer: None,
        }
    }

    /// Builds a [`CoreError::RefNotFound`] with a referring pointer attached.
    pub fn ref_not_found_from(pointer: impl Into<String>, referrer: impl Into<String>) -> Self {
        CoreError::RefNotFound {
            pointer: pointer.into(),
            referrer: Some(referrer.into()),
        }
    }

    /// Builds a [`CoreError::MergeConflict`].
    pub fn merge_conflict(at: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::MergeConflict {
            at: at.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for the normalization core.
pub type CoreResult<T> = Result<T, CoreError>;
