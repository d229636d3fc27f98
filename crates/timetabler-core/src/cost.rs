//! HardSoftCost - two-level cost with hard violations and soft penalty

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A cost with separate hard and soft levels. Lower is better.
///
/// The hard level counts hard-constraint violations (clashes and missing
/// contact hours). The soft level is the weighted soft-constraint penalty.
///
/// When comparing costs:
/// 1. Hard levels are compared first
/// 2. Soft levels are only compared when hard levels are equal
///
/// # Examples
///
/// ```
/// use timetabler_core::HardSoftCost;
///
/// let incomplete = HardSoftCost::of(1, 0.0);  // one contact hour missing
/// let poor = HardSoftCost::of(0, 250.0);      // legal but many preference misses
///
/// // Legal schedules always beat illegal ones
/// assert!(poor < incomplete);
///
/// let better = HardSoftCost::of(0, 40.0);
/// assert!(better < poor);
/// ```
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct HardSoftCost {
    hard: u64,
    soft: f64,
}

impl HardSoftCost {
    /// The zero cost.
    pub const ZERO: HardSoftCost = HardSoftCost { hard: 0, soft: 0.0 };

    /// One hard violation.
    pub const ONE_HARD: HardSoftCost = HardSoftCost { hard: 1, soft: 0.0 };

    /// Creates a new HardSoftCost.
    #[inline]
    pub const fn of(hard: u64, soft: f64) -> Self {
        HardSoftCost { hard, soft }
    }

    /// Creates a cost with only a hard component.
    #[inline]
    pub const fn of_hard(hard: u64) -> Self {
        HardSoftCost { hard, soft: 0.0 }
    }

    /// Creates a cost with only a soft component.
    #[inline]
    pub const fn of_soft(soft: f64) -> Self {
        HardSoftCost { hard: 0, soft }
    }

    /// Returns the number of hard violations.
    #[inline]
    pub const fn hard(&self) -> u64 {
        self.hard
    }

    /// Returns the soft penalty.
    #[inline]
    pub const fn soft(&self) -> f64 {
        self.soft
    }

    /// A cost is feasible when no hard constraint is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard == 0
    }
}

impl PartialEq for HardSoftCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HardSoftCost {}

impl Ord for HardSoftCost {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.total_cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for HardSoftCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for HardSoftCost {
    type Output = HardSoftCost;

    fn add(self, rhs: Self) -> Self::Output {
        HardSoftCost::of(self.hard + rhs.hard, self.soft + rhs.soft)
    }
}

impl AddAssign for HardSoftCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hard += rhs.hard;
        self.soft += rhs.soft;
    }
}

impl fmt::Debug for HardSoftCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftCost({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{:.3}soft", self.hard, self.soft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_dominates_soft() {
        let a = HardSoftCost::of(0, 1_000.0);
        let b = HardSoftCost::of(1, 0.0);
        assert!(a < b);
        assert!(a.is_feasible());
        assert!(!b.is_feasible());
    }

    #[test]
    fn test_soft_breaks_ties() {
        assert!(HardSoftCost::of(2, 3.5) < HardSoftCost::of(2, 4.0));
        assert_eq!(HardSoftCost::of(2, 4.0), HardSoftCost::of(2, 4.0));
    }

    #[test]
    fn test_add() {
        let mut cost = HardSoftCost::of_hard(1) + HardSoftCost::of_soft(2.5);
        cost += HardSoftCost::ONE_HARD;
        assert_eq!(cost.hard(), 2);
        assert!((cost.soft() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        assert_eq!(HardSoftCost::of(1, 2.5).to_string(), "1hard/2.500soft");
        assert_eq!(format!("{:?}", HardSoftCost::ZERO), "HardSoftCost(0, 0)");
    }
}
