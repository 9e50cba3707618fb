//! Client ownership selection.
//!
//! Given the rules loaded for one client, [`select_owner`] picks the owning
//! technician. Precedence, first match wins:
//!
//! 1. Effective direct assignments for the client (earliest `valid_from`).
//! 2. Effective department assignments for the client's department
//!    (earliest `valid_from`).
//! 3. Active coverage rules for the department (lowest `priority`).
//! 4. The configured fallback technician.
//!
//! Every tier is re-sorted here so the outcome never depends on the row
//! order a store happens to return. Ties fall back to the rule id.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Default priority for department assignments and coverage rules.
/// Lower values take precedence.
pub const DEFAULT_COVERAGE_PRIORITY: i32 = 100;

/// How an assignment rule targets clients. Discriminants match the
/// `assignment_kinds` seed data.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Direct = 1,
    ByDepartment = 2,
}

impl AssignmentKind {
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(AssignmentKind::Direct),
            2 => Some(AssignmentKind::ByDepartment),
            _ => None,
        }
    }
}

/// An assignment rule as seen by the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCandidate {
    pub rule_id: DbId,
    pub technician_id: DbId,
    pub valid_from: Timestamp,
    pub active: bool,
    pub valid_until: Option<Timestamp>,
}

impl AssignmentCandidate {
    /// A rule is effective iff it is active and open-ended.
    pub fn is_effective(&self) -> bool {
        self.active && self.valid_until.is_none()
    }
}

/// A coverage rule as seen by the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageCandidate {
    pub rule_id: DbId,
    pub technician_id: DbId,
    pub priority: i32,
    pub active: bool,
}

/// Everything the selector needs to know about one client.
#[derive(Debug, Clone, Default)]
pub struct OwnershipInputs {
    pub direct: Vec<AssignmentCandidate>,
    pub by_department: Vec<AssignmentCandidate>,
    pub coverage: Vec<CoverageCandidate>,
}

/// Which tier produced the owner. Logged by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerSource {
    Direct,
    Department,
    Coverage,
    Fallback,
}

/// Resolver configuration injected at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipConfig {
    /// Technician returned when no rule matches. `None` or `Some(0)` disables
    /// the fallback.
    pub fallback_technician_id: Option<DbId>,
}

impl OwnershipConfig {
    pub fn fallback(&self) -> Option<DbId> {
        self.fallback_technician_id.filter(|id| *id != 0)
    }
}

/// Pick the owning technician from the loaded rules.
///
/// Inactive or expired rules are ignored even if the caller passed them in.
pub fn select_owner(
    inputs: &OwnershipInputs,
    config: &OwnershipConfig,
) -> Option<(DbId, OwnerSource)> {
    if let Some(id) = earliest_effective(&inputs.direct) {
        return Some((id, OwnerSource::Direct));
    }
    if let Some(id) = earliest_effective(&inputs.by_department) {
        return Some((id, OwnerSource::Department));
    }
    if let Some(id) = best_coverage(&inputs.coverage) {
        return Some((id, OwnerSource::Coverage));
    }
    config.fallback().map(|id| (id, OwnerSource::Fallback))
}

fn earliest_effective(rules: &[AssignmentCandidate]) -> Option<DbId> {
    rules
        .iter()
        .filter(|r| r.is_effective())
        .min_by(|a, b| {
            a.valid_from
                .cmp(&b.valid_from)
                .then(a.rule_id.cmp(&b.rule_id))
        })
        .map(|r| r.technician_id)
}

fn best_coverage(rules: &[CoverageCandidate]) -> Option<DbId> {
    rules
        .iter()
        .filter(|r| r.active)
        .min_by(|a, b| a.priority.cmp(&b.priority).then(a.rule_id.cmp(&b.rule_id)))
        .map(|r| r.technician_id)
}

/// Normalise a department name: trimmed, `None` when blank.
pub fn normalize_department(department: Option<&str>) -> Option<String> {
    department
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn assignment(rule_id: DbId, technician_id: DbId, minutes: i64) -> AssignmentCandidate {
        AssignmentCandidate {
            rule_id,
            technician_id,
            valid_from: at(minutes),
            active: true,
            valid_until: None,
        }
    }

    fn coverage(rule_id: DbId, technician_id: DbId, priority: i32) -> CoverageCandidate {
        CoverageCandidate {
            rule_id,
            technician_id,
            priority,
            active: true,
        }
    }

    const NO_FALLBACK: OwnershipConfig = OwnershipConfig {
        fallback_technician_id: None,
    };

    #[test]
    fn direct_rule_beats_department_and_coverage() {
        let inputs = OwnershipInputs {
            direct: vec![assignment(1, 11, 5)],
            by_department: vec![assignment(2, 22, 0)],
            coverage: vec![coverage(3, 33, 1)],
        };
        assert_eq!(
            select_owner(&inputs, &NO_FALLBACK),
            Some((11, OwnerSource::Direct))
        );
    }

    #[test]
    fn earliest_direct_rule_wins() {
        let inputs = OwnershipInputs {
            direct: vec![assignment(1, 11, 30), assignment(2, 12, 10)],
            ..Default::default()
        };
        assert_eq!(select_owner(&inputs, &NO_FALLBACK), Some((12, OwnerSource::Direct)));
    }

    #[test]
    fn same_valid_from_breaks_tie_by_rule_id() {
        let inputs = OwnershipInputs {
            direct: vec![assignment(8, 80, 0), assignment(3, 30, 0)],
            ..Default::default()
        };
        assert_eq!(select_owner(&inputs, &NO_FALLBACK), Some((30, OwnerSource::Direct)));
    }

    #[test]
    fn department_rule_used_without_direct() {
        let inputs = OwnershipInputs {
            by_department: vec![assignment(4, 44, 0)],
            coverage: vec![coverage(5, 55, 1)],
            ..Default::default()
        };
        assert_eq!(
            select_owner(&inputs, &NO_FALLBACK),
            Some((44, OwnerSource::Department))
        );
    }

    #[test]
    fn lowest_coverage_priority_wins() {
        let inputs = OwnershipInputs {
            coverage: vec![coverage(1, 5, 50), coverage(2, 9, 10)],
            ..Default::default()
        };
        assert_eq!(select_owner(&inputs, &NO_FALLBACK), Some((9, OwnerSource::Coverage)));
    }

    #[test]
    fn coverage_tie_broken_by_rule_id() {
        let inputs = OwnershipInputs {
            coverage: vec![coverage(7, 70, 10), coverage(4, 40, 10)],
            ..Default::default()
        };
        assert_eq!(select_owner(&inputs, &NO_FALLBACK), Some((40, OwnerSource::Coverage)));
    }

    #[test]
    fn inactive_and_expired_rules_are_skipped() {
        let mut inactive = assignment(1, 11, 0);
        inactive.active = false;
        let mut expired = assignment(2, 22, 0);
        expired.valid_until = Some(at(60));
        let mut off = coverage(3, 33, 1);
        off.active = false;
        let inputs = OwnershipInputs {
            direct: vec![inactive],
            by_department: vec![expired],
            coverage: vec![off, coverage(4, 44, 200)],
        };
        assert_eq!(select_owner(&inputs, &NO_FALLBACK), Some((44, OwnerSource::Coverage)));
    }

    #[test]
    fn fallback_used_when_nothing_matches() {
        let config = OwnershipConfig {
            fallback_technician_id: Some(99),
        };
        assert_eq!(
            select_owner(&OwnershipInputs::default(), &config),
            Some((99, OwnerSource::Fallback))
        );
    }

    #[test]
    fn zero_fallback_means_unassigned() {
        let config = OwnershipConfig {
            fallback_technician_id: Some(0),
        };
        assert_eq!(select_owner(&OwnershipInputs::default(), &config), None);
        assert_eq!(select_owner(&OwnershipInputs::default(), &NO_FALLBACK), None);
    }

    #[test]
    fn department_names_are_trimmed() {
        assert_eq!(normalize_department(Some("  North ")), Some("North".to_string()));
        assert_eq!(normalize_department(Some("   ")), None);
        assert_eq!(normalize_department(None), None);
    }

    #[test]
    fn assignment_kind_ids() {
        assert_eq!(AssignmentKind::from_id(1), Some(AssignmentKind::Direct));
        assert_eq!(AssignmentKind::from_id(2), Some(AssignmentKind::ByDepartment));
        assert_eq!(AssignmentKind::from_id(3), None);
    }
}
