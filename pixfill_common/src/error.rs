// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The error type shared by every fill entry point.

use thiserror::Error;

/// Errors that can occur while filling a shape.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FillError {
    /// A required argument was malformed.
    ///
    /// This is always reported before anything is scheduled, regardless of how the
    /// fill was invoked.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// The name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Transformed coordinates exceed the representable integer range.
    #[error("transformed coordinates exceed the representable integer range")]
    CoordinateOverflow,
    /// The operation was canceled and the configuration asked for an error on cancel.
    #[error("the operation was canceled")]
    Canceled,
    /// An async handle was finished by an `end` call for a different operation.
    #[error("the handle was created for `{found}` and cannot be finished as `{expected}`")]
    HandleMismatch {
        /// The operation the `end` call belongs to.
        expected: &'static str,
        /// The operation that created the handle.
        found: &'static str,
    },
    /// A scheduled operation went away without delivering a result.
    #[error("the scheduled operation ended without producing a result")]
    WorkerDisconnected,
}

impl FillError {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }
}

/// A [`Result`][core::result::Result] defaulting to [`FillError`].
pub type Result<T, E = FillError> = core::result::Result<T, E>;
