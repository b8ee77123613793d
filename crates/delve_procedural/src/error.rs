//! # Carving Error Types
//!
//! Malformed input fails fast at construction or stamp time. Walk stop
//! conditions are not errors and travel in [`crate::walker::WalkOutcome`].

use thiserror::Error;

use crate::volume::Shape;

/// Errors that can occur while setting up or stamping a walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarveError {
    /// A view or pattern shape has a zero-sized axis.
    #[error("shape must have three positive dimensions, got {depth}x{height}x{width}")]
    InvalidShape {
        /// Size along the direction of travel.
        depth: usize,
        /// Vertical size.
        height: usize,
        /// Lateral size.
        width: usize,
    },

    /// Values handed to a view do not match its shape.
    #[error("shape mismatch: view is {expected}, values are {found}")]
    ShapeMismatch {
        /// The view's shape.
        expected: Shape,
        /// The shape that was supplied.
        found: Shape,
    },

    /// Walk parameters out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pattern would never change the grid.
    #[error("pattern has no cells to write")]
    EmptyPattern,
}

/// Result type for carving operations.
pub type CarveResult<T> = Result<T, CarveError>;
