//! Position allocation
//!
//! Cards carry a floating-point ordering key. A dropped card gets a key
//! between its new neighbours so no other card has to be renumbered:
//!
//! - first slot: half of the next card's key, or `EMPTY_LIST_POSITION`
//!   when the list holds nothing else
//! - last slot: previous key (or 0) plus `POSITION_STEP`
//! - anywhere else: midpoint of the two neighbours
//!
//! Repeated subdivision eventually collapses the gap. A non-finite or
//! non-positive result falls back to the current timestamp in milliseconds,
//! and any result that does not land strictly between the neighbours is
//! reported so the caller can renumber the whole list.

use super::model::Card;
use crate::config::{EMPTY_LIST_POSITION, POSITION_STEP};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub position: f64,
    /// The timestamp fallback was used
    pub fallback: bool,
    /// The position sorts strictly between its neighbours
    pub in_order: bool,
}

/// Allocate the position of the card sitting at `target_index` of
/// `cards`, which already shows the dropped card in its new slot.
pub fn allocate_position(cards: &[Card], target_index: usize) -> Allocation {
    let positions: Vec<f64> = cards.iter().map(|card| card.position).collect();
    allocate_with_clock(&positions, target_index, || {
        Utc::now().timestamp_millis() as f64
    })
}

/// Same as [`allocate_position`] over raw keys, with an injectable clock
/// for the degenerate fallback.
pub fn allocate_with_clock(
    positions: &[f64],
    target_index: usize,
    clock: impl FnOnce() -> f64,
) -> Allocation {
    if positions.is_empty() {
        return Allocation {
            position: EMPTY_LIST_POSITION,
            fallback: false,
            in_order: true,
        };
    }

    let index = target_index.min(positions.len() - 1);
    let prev = index.checked_sub(1).map(|i| positions[i]);
    let next = positions.get(index + 1).copied();

    let computed = match (prev, next) {
        (None, Some(next)) => next / 2.0,
        (None, None) => EMPTY_LIST_POSITION,
        (Some(prev), None) => prev + POSITION_STEP,
        (Some(prev), Some(next)) => (prev + next) / 2.0,
    };

    let (position, fallback) = if computed.is_finite() && computed > 0.0 {
        (computed, false)
    } else {
        tracing::warn!(
            "Position collapsed to {} at index {}, falling back to timestamp",
            computed,
            index
        );
        (clock(), true)
    };

    let after_prev = prev.map_or(true, |prev| position > prev);
    let before_next = next.map_or(true, |next| position < next);

    Allocation {
        position,
        fallback,
        in_order: after_prev && before_next,
    }
}

/// Position for a card appended after `last`, the highest key in its list.
pub fn after_last(last: Option<f64>) -> f64 {
    match last {
        Some(last) if last.is_finite() => last + POSITION_STEP,
        _ => EMPTY_LIST_POSITION,
    }
}

/// Evenly spaced keys for `count` cards: `POSITION_STEP, 2 * POSITION_STEP, ...`
pub fn renumbered_positions(count: usize) -> Vec<f64> {
    (1..=count).map(|i| i as f64 * POSITION_STEP).collect()
}
