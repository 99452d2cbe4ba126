//! # Waitlist Sequencing
//!
//! Keeps the active entries of a waitlist numbered `1..N` with no gaps or
//! duplicates. Every function here works on a full snapshot of one lesson's
//! entries and returns a plan for the caller to persist; nothing is mutated
//! in place.
//!
//! Plans are idempotent. If persisting one fails halfway, running
//! [`reorder_positions`] on the next read produces the same numbering and
//! repairs whatever rows were left behind.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::{
    errors::{SwimError, SwimResult},
    models::waitlist::{EntryStatus, PositionAssignment, PromotionPlan, WaitlistEntry},
};

fn queue_order(a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    a.position
        .cmp(&b.position)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn active_in_order(entries: &[WaitlistEntry]) -> Vec<&WaitlistEntry> {
    let mut active: Vec<&WaitlistEntry> = entries.iter().filter(|e| e.is_active()).collect();
    active.sort_by(|a, b| queue_order(a, b));
    active
}

/// Assigns positions `1..N` to the active entries, keeping their relative
/// order. Ties on position fall back to `created_at`, then id. Inactive
/// entries are ignored.
///
/// Positions are stored as `INTEGER`; a waitlist never approaches
/// `i32::MAX` entries, and anything past it is pinned there.
pub fn reorder_positions(entries: &[WaitlistEntry]) -> Vec<PositionAssignment> {
    active_in_order(entries)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| PositionAssignment {
            id: entry.id,
            position: i32::try_from(index + 1).unwrap_or(i32::MAX),
        })
        .collect()
}

/// Narrows a plan to the assignments whose position differs from what the
/// snapshot already holds.
pub fn changed_positions(
    entries: &[WaitlistEntry],
    plan: &[PositionAssignment],
) -> Vec<PositionAssignment> {
    plan.iter()
        .filter(|assignment| {
            entries
                .iter()
                .find(|entry| entry.id == assignment.id)
                .is_none_or(|entry| entry.position != assignment.position)
        })
        .copied()
        .collect()
}

fn withdraw(entries: &[WaitlistEntry], target: Uuid) -> SwimResult<PromotionPlan> {
    let mut entry = entries
        .iter()
        .find(|e| e.id == target && e.is_active())
        .cloned()
        .ok_or_else(|| {
            SwimError::NotFound(format!("Active waitlist entry with ID {} not found", target))
        })?;

    entry.status = EntryStatus::Inactive;

    let remaining: Vec<WaitlistEntry> = entries
        .iter()
        .filter(|e| e.id != target)
        .cloned()
        .collect();

    Ok(PromotionPlan {
        entry,
        positions: reorder_positions(&remaining),
    })
}

/// Takes `target` off the waitlist because it got a spot.
///
/// Fails with `NotFound` unless `target` is among the active entries.
pub fn promote(entries: &[WaitlistEntry], target: Uuid) -> SwimResult<PromotionPlan> {
    withdraw(entries, target)
}

/// Takes `target` off the waitlist because it gave up its place. Positions
/// are handled exactly as for [`promote`]; only the caller's audit record
/// differs.
pub fn cancel(entries: &[WaitlistEntry], target: Uuid) -> SwimResult<PromotionPlan> {
    withdraw(entries, target)
}

/// The first active entry in queue order that `eligible` accepts.
pub fn next_candidate<F>(entries: &[WaitlistEntry], eligible: F) -> Option<&WaitlistEntry>
where
    F: Fn(&WaitlistEntry) -> bool,
{
    active_in_order(entries)
        .into_iter()
        .find(|entry| eligible(entry))
}

/// Position a newly joining entry takes: one past the highest active
/// position, which is `N + 1` whenever the sequence is contiguous.
pub fn next_position(entries: &[WaitlistEntry]) -> i32 {
    entries
        .iter()
        .filter(|e| e.is_active())
        .map(|e| e.position)
        .max()
        .unwrap_or(0)
        + 1
}
