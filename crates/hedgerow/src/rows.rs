#![forbid(unsafe_code)]

//! Row allocation arithmetic.
//!
//! A row pair is the unit of allocation: one item row plus its pop row.
//! The allocator only does the counting; materializing and destroying the
//! containers is the layout builder's job.

use crate::{Result, WidgetError};

/// Number of row pairs required to hold `item_count` items at `columns`
/// items per row.
///
/// A zero column count is a configuration error, never silently treated
/// as one.
pub fn needed_pairs(item_count: usize, columns: u16) -> Result<usize> {
    if columns == 0 {
        return Err(WidgetError::InvalidColumns(0));
    }
    Ok(item_count.div_ceil(columns as usize))
}

/// Signed difference between required and existing row pairs.
///
/// Positive: add that many pairs. Negative: remove that many pairs from
/// the end. Zero: no structural change.
pub fn row_delta(item_count: usize, columns: u16, existing: usize) -> Result<isize> {
    let needed = needed_pairs(item_count, columns)?;
    Ok(needed as isize - existing as isize)
}
