//! `PointId`: a strong, zero-cost handle for mesh vertices
//!
//! Each corner of a quadrilateral cell refers to a vertex numbered by some
//! surrounding mesh structure. `PointId` wraps a nonzero `u64` to enforce at
//! compile- and runtime that 0 is reserved as an invalid or sentinel value.
//! The cell evaluator never interprets these identifiers; boundary and edge
//! extraction pass them through opaquely.
//!
//! This module provides:
//! - A transparent `PointId` newtype around `NonZeroU64` for zero-cost layout
//!   guarantees.
//! - A fallible constructor and a cheap accessor.
//! - Implementations of common traits (`Debug`, `Display`, ordering, hashing)
//!   so `PointId` can be used in maps, sets, and printed easily.

use crate::quad_error::QuadCellError;
use std::{fmt, num::NonZeroU64};

/// Opaque vertex identifier attached to each cell corner.
///
/// # Memory layout
/// This type is `repr(transparent)`, meaning it has the same ABI and alignment
/// as its single field (`NonZeroU64`) and can be stored or transmitted exactly
/// like a `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct PointId(NonZeroU64);

impl PointId {
    /// Creates a new `PointId` from a raw `u64` value.
    ///
    /// Returns [`QuadCellError::InvalidPointId`] if `raw == 0`; 0 is reserved
    /// as an invalid or sentinel value.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use quad_cell::topology::point::PointId;
    /// let p = PointId::new(1)?;
    /// assert_eq!(p.get(), 1);
    /// # Ok::<(), quad_cell::quad_error::QuadCellError>(())
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, QuadCellError> {
        NonZeroU64::new(raw)
            .map(PointId)
            .ok_or(QuadCellError::InvalidPointId)
    }

    /// Returns the inner `u64` value of this `PointId`.
    ///
    /// This is a cheap, const-time getter. Use it when you need to inspect or
    /// print the raw integer, but prefer to work with `PointId` otherwise for
    /// type safety.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Custom `Debug` implementation to display as `PointId(raw_value)`.
impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointId").field(&self.get()).finish()
    }
}

/// Custom `Display` implementation to print only the raw integer.
impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
