//! Partition validator.
//!
//! A grouping is valid when all three checks pass:
//! - **Size**: every group holds exactly `roster_size / group_count` members
//! - **Attribute balance**: per the active [`Scheme`], either every group has
//!   at least `position_quota` supportive members (`Position`), or the HIGH
//!   counts across groups differ by at most one (`Intensity`)
//! - **Skill spread**: `max(strength) - min(strength) <= max_spread`
//!
//! Checks run in that order and the first failure rejects the candidate.

use thiserror::Error;

use crate::grouping::Grouping;
use crate::participant::Scheme;

/// Largest allowed difference in per-group HIGH counts under `Intensity`.
pub const MAX_HIGH_COUNT_DIFFERENCE: usize = 1;

/// Constraints a grouping is validated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub scheme: Scheme,
    pub group_size: usize,
    pub position_quota: usize,
    pub max_spread: f64,
}

/// Why a candidate grouping was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("group {group} has {actual} members, expected {expected}")]
    GroupSize {
        group: usize,
        expected: usize,
        actual: usize,
    },

    #[error("group {group} has {actual} supportive members, needs {required}")]
    SupportiveShortfall {
        group: usize,
        required: usize,
        actual: usize,
    },

    #[error("supportive counts range from {min} to {max}")]
    SupportiveImbalance { min: usize, max: usize },

    #[error("skill spread {spread:.2} exceeds {max:.2}")]
    Spread { spread: f64, max: f64 },
}

/// Every group must have exactly `expected` members.
pub fn check_sizes(grouping: &Grouping, expected: usize) -> Result<(), Violation> {
    for (group, g) in grouping.groups().iter().enumerate() {
        if g.len() != expected {
            return Err(Violation::GroupSize {
                group,
                expected,
                actual: g.len(),
            });
        }
    }
    Ok(())
}

/// Scheme-dependent supportive-category check.
pub fn check_attribute_balance(
    grouping: &Grouping,
    scheme: Scheme,
    position_quota: usize,
) -> Result<(), Violation> {
    let counts: Vec<usize> = grouping
        .groups()
        .iter()
        .map(|g| g.supportive_count(scheme))
        .collect();

    match scheme {
        Scheme::Position => {
            if let Some((group, &actual)) =
                counts.iter().enumerate().find(|(_, c)| **c < position_quota)
            {
                return Err(Violation::SupportiveShortfall {
                    group,
                    required: position_quota,
                    actual,
                });
            }
        }
        Scheme::Intensity => {
            let (Some(&min), Some(&max)) = (counts.iter().min(), counts.iter().max()) else {
                return Ok(());
            };
            if max - min > MAX_HIGH_COUNT_DIFFERENCE {
                return Err(Violation::SupportiveImbalance { min, max });
            }
        }
    }
    Ok(())
}

/// Skill-spread bound. Returns the spread on success.
pub fn check_spread(grouping: &Grouping, max_spread: f64) -> Result<f64, Violation> {
    let spread = grouping.spread();
    if spread > max_spread {
        return Err(Violation::Spread {
            spread,
            max: max_spread,
        });
    }
    Ok(spread)
}

/// Run all checks. Returns the grouping's skill-spread when valid.
pub fn validate(grouping: &Grouping, constraints: &Constraints) -> Result<f64, Violation> {
    check_sizes(grouping, constraints.group_size)?;
    check_attribute_balance(grouping, constraints.scheme, constraints.position_quota)?;
    check_spread(grouping, constraints.max_spread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::Group;
    use crate::participant::{Attribute, Participant};

    fn grouping(teams: &[&[(u8, Attribute)]]) -> Grouping {
        let mut n = 0;
        Grouping::new(
            teams
                .iter()
                .map(|t| {
                    Group::from_members(
                        t.iter()
                            .map(|(r, a)| {
                                n += 1;
                                Participant::new(format!("p{n}"), *r, *a)
                            })
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    fn intensity(group_size: usize) -> Constraints {
        Constraints {
            scheme: Scheme::Intensity,
            group_size,
            position_quota: 2,
            max_spread: 1.0,
        }
    }

    use Attribute::{Attack, Defense, High, Low, Versatile};

    #[test]
    fn accepts_balanced_grouping() {
        let g = grouping(&[&[(7, High), (1, Low)], &[(5, High), (4, Low)]]);
        let spread = validate(&g, &intensity(2)).unwrap();
        assert!((spread - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_unequal_sizes() {
        let g = grouping(&[&[(4, High), (4, Low), (4, Low)], &[(4, High)]]);
        assert_eq!(
            check_sizes(&g, 2),
            Err(Violation::GroupSize {
                group: 0,
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_high_count_difference_above_one() {
        let g = grouping(&[&[(4, High), (4, High)], &[(4, Low), (4, Low)]]);
        assert_eq!(
            validate(&g, &intensity(2)),
            Err(Violation::SupportiveImbalance { min: 0, max: 2 })
        );
    }

    #[test]
    fn tolerates_high_count_difference_of_one() {
        let g = grouping(&[&[(4, High), (4, Low)], &[(4, Low), (4, Low)]]);
        assert!(check_attribute_balance(&g, Scheme::Intensity, 2).is_ok());
    }

    #[test]
    fn position_scheme_requires_quota_per_group() {
        let ok = grouping(&[
            &[(4, Defense), (4, Versatile), (4, Attack)],
            &[(4, Defense), (4, Defense), (4, Attack)],
        ]);
        assert!(check_attribute_balance(&ok, Scheme::Position, 2).is_ok());

        let short = grouping(&[
            &[(4, Defense), (4, Attack), (4, Attack)],
            &[(4, Defense), (4, Versatile), (4, Versatile)],
        ]);
        assert_eq!(
            check_attribute_balance(&short, Scheme::Position, 2),
            Err(Violation::SupportiveShortfall {
                group: 0,
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn rejects_spread_above_bound() {
        let g = grouping(&[&[(7, High), (7, Low)], &[(1, High), (4, Low)]]);
        match validate(&g, &intensity(2)) {
            Err(Violation::Spread { spread, max }) => {
                assert!((spread - 4.5).abs() < 1e-9);
                assert_eq!(max, 1.0);
            }
            other => panic!("expected spread violation, got {other:?}"),
        }
    }

    #[test]
    fn spread_exactly_at_bound_is_valid() {
        let g = grouping(&[&[(5, High), (5, Low)], &[(4, High), (4, Low)]]);
        assert_eq!(check_spread(&g, 1.0), Ok(1.0));
    }

    #[test]
    fn size_is_checked_before_balance() {
        let g = grouping(&[&[(4, High), (4, High), (4, High)], &[(4, Low)]]);
        assert!(matches!(
            validate(&g, &intensity(2)),
            Err(Violation::GroupSize { .. })
        ));
    }

    #[test]
    fn violation_messages() {
        let v = Violation::Spread { spread: 1.25, max: 1.0 };
        assert_eq!(v.to_string(), "skill spread 1.25 exceeds 1.00");

        let v = Violation::GroupSize {
            group: 1,
            expected: 4,
            actual: 3,
        };
        assert_eq!(v.to_string(), "group 1 has 3 members, expected 4");

        let v = Violation::SupportiveShortfall {
            group: 0,
            required: 2,
            actual: 1,
        };
        assert_eq!(v.to_string(), "group 0 has 1 supportive members, needs 2");

        let v = Violation::SupportiveImbalance { min: 0, max: 2 };
        assert_eq!(v.to_string(), "supportive counts range from 0 to 2");
    }
}
