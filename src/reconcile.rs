// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change detection for derived values.
//!
//! Every snapshot produces a fresh [`DeviceBundle`](crate::classify::DeviceBundle)
//! or [`HealthPartitions`](crate::health::HealthPartitions). Consumers hold
//! the published value behind an [`Arc`] and use pointer identity to skip
//! redundant work, so a candidate that is structurally identical to the
//! previous value must not replace it.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use hubcard_lib::reconcile::reconcile;
//! use hubcard_lib::snapshot::Value;
//!
//! let first = reconcile(None, Value::new("sensor.a", "1"));
//!
//! // Same content: the previous allocation is kept
//! let second = reconcile(Some(&first), Value::new("sensor.a", "1"));
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! // Different content: the candidate wins
//! let third = reconcile(Some(&second), Value::new("sensor.a", "2"));
//! assert!(!Arc::ptr_eq(&second, &third));
//! ```

use std::sync::Arc;

use crate::snapshot::Value;

/// Deep structural equality over the derived shapes.
///
/// Implementations compare every field that a consumer can observe. The
/// contract is written out per type instead of relying on a generic
/// comparator so that what counts as "changed" stays auditable.
pub trait StructuralEq {
    /// Returns `true` if `self` and `other` are behaviorally identical.
    fn structurally_eq(&self, other: &Self) -> bool;
}

impl StructuralEq for Value {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.id == other.id && self.state == other.state && self.attributes == other.attributes
    }
}

impl<T: StructuralEq> StructuralEq for Option<T> {
    fn structurally_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.structurally_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: StructuralEq> StructuralEq for Vec<T> {
    fn structurally_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.structurally_eq(b))
    }
}

/// Outcome of reconciling a candidate against the published value.
#[derive(Debug, Clone)]
pub enum Reconciled<T> {
    /// The candidate matched; the previous value is still authoritative.
    Unchanged(Arc<T>),
    /// The candidate differed (or there was no previous value).
    Changed(Arc<T>),
}

impl<T> Reconciled<T> {
    /// Returns `true` if the published value was replaced.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// Returns the authoritative value.
    #[must_use]
    pub fn into_inner(self) -> Arc<T> {
        match self {
            Self::Unchanged(value) | Self::Changed(value) => value,
        }
    }
}

/// Compares `candidate` against `previous` and reports whether it changed.
///
/// An absent `previous` always counts as a change.
#[must_use]
pub fn reconcile_with_outcome<T: StructuralEq>(
    previous: Option<&Arc<T>>,
    candidate: T,
) -> Reconciled<T> {
    match previous {
        Some(previous) if previous.structurally_eq(&candidate) => {
            Reconciled::Unchanged(Arc::clone(previous))
        }
        _ => Reconciled::Changed(Arc::new(candidate)),
    }
}

/// Returns `previous` when `candidate` is structurally equal to it,
/// otherwise the candidate.
///
/// The returned [`Arc`] shares its allocation with `previous` in the first
/// case, so `Arc::ptr_eq` can be used downstream as a cheap "nothing
/// changed" check.
#[must_use]
pub fn reconcile<T: StructuralEq>(previous: Option<&Arc<T>>, candidate: T) -> Arc<T> {
    reconcile_with_outcome(previous, candidate).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_previous_always_changes() {
        let outcome = reconcile_with_outcome(None, Value::new("sensor.a", "1"));
        assert!(outcome.is_changed());
    }

    #[test]
    fn equal_candidate_keeps_previous_reference() {
        let previous = Arc::new(Value::new("sensor.a", "1").with_attribute("unit", "W"));
        let candidate = Value::new("sensor.a", "1").with_attribute("unit", "W");

        let outcome = reconcile_with_outcome(Some(&previous), candidate);
        assert!(!outcome.is_changed());
        assert!(Arc::ptr_eq(&previous, &outcome.into_inner()));
    }

    #[test]
    fn attribute_difference_is_a_change() {
        let previous = Arc::new(Value::new("sensor.a", "1").with_attribute("unit", "W"));
        let candidate = Value::new("sensor.a", "1").with_attribute("unit", "kW");

        let result = reconcile(Some(&previous), candidate);
        assert!(!Arc::ptr_eq(&previous, &result));
        assert_eq!(result.attributes.get_str("unit"), Some("kW"));
    }

    #[test]
    fn option_and_vec_equality() {
        let a = Some(Value::new("x.a", "1"));
        let none: Option<Value> = None;
        assert!(a.structurally_eq(&a.clone()));
        assert!(!a.structurally_eq(&none));
        assert!(none.structurally_eq(&None));

        let list = vec![Value::new("x.a", "1"), Value::new("x.b", "2")];
        let reordered = vec![Value::new("x.b", "2"), Value::new("x.a", "1")];
        assert!(list.structurally_eq(&list.clone()));
        assert!(!list.structurally_eq(&reordered));
        assert!(!list.structurally_eq(&list[..1].to_vec()));
    }
}
