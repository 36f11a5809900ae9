//! Submission validation and pool merging.
//!
//! Each participant submits exactly five candidates. A submission is
//! accepted only if none of its entries collide (by identity key) with the
//! other participant's already-stored submission. Once both exist, the two
//! lists merge into one deduplicated pool, first occurrence wins.

use std::collections::BTreeSet;

use getaway_types::{CandidateEntry, CandidateKey, MergedPool, Submission, SUBMISSION_SIZE};

/// Errors rejecting a candidate submission.
///
/// All variants are recoverable: the caller surfaces them for correction
/// and the participant resubmits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The submission does not contain exactly the required number of entries.
    #[error("expected exactly {expected} candidates, got {actual}")]
    WrongCount {
        /// The required entry count.
        expected: usize,
        /// The count actually submitted.
        actual: usize,
    },

    /// An entry has an empty or whitespace-only name.
    #[error("candidate {index} has an empty name")]
    EmptyName {
        /// Zero-based index of the offending entry.
        index: usize,
    },

    /// Two entries within the same submission share an identity key.
    #[error("submission repeats its own candidates: {}", names.join(", "))]
    DuplicateWithinSubmission {
        /// Display names of the repeated candidates.
        names: Vec<String>,
    },

    /// Entries collide with the other participant's stored submission.
    #[error("already taken by the other participant: {}", names.join(", "))]
    DuplicateNames {
        /// Display names of the blocked candidates.
        names: Vec<String>,
    },
}

/// Validate a candidate submission against the currently stored
/// other-participant submission.
///
/// Checks, in order: entry count, non-empty names, internal duplicates,
/// and collisions with `other`. Collisions list every blocked display name
/// so the caller can surface all of them at once.
///
/// # Errors
///
/// Returns the first applicable [`ValidationError`].
pub fn validate_submission(
    entries: &[CandidateEntry],
    other: Option<&Submission>,
) -> Result<(), ValidationError> {
    if entries.len() != SUBMISSION_SIZE {
        return Err(ValidationError::WrongCount {
            expected: SUBMISSION_SIZE,
            actual: entries.len(),
        });
    }

    for (index, entry) in entries.iter().enumerate() {
        if entry.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
    }

    let mut seen: BTreeSet<CandidateKey> = BTreeSet::new();
    let mut repeated = Vec::new();
    for entry in entries {
        if !seen.insert(entry.key()) {
            repeated.push(entry.display_name());
        }
    }
    if !repeated.is_empty() {
        return Err(ValidationError::DuplicateWithinSubmission { names: repeated });
    }

    if let Some(other) = other {
        let taken: BTreeSet<CandidateKey> = other.entries.iter().map(CandidateEntry::key).collect();
        let blocked: Vec<String> = entries
            .iter()
            .filter(|e| taken.contains(&e.key()))
            .map(CandidateEntry::display_name)
            .collect();
        if !blocked.is_empty() {
            return Err(ValidationError::DuplicateNames { names: blocked });
        }
    }

    Ok(())
}

/// Merge two submissions into the deduplicated pool.
///
/// Input order is `a` then `b`, each preserving its internal order; the
/// first occurrence of an identity key wins. The same two submissions
/// always merge to the same pool (same order, same membership).
pub fn merge(a: &Submission, b: &Submission) -> MergedPool {
    let mut seen: BTreeSet<CandidateKey> = BTreeSet::new();
    let mut entries = Vec::with_capacity(a.entries.len().saturating_add(b.entries.len()));
    for entry in a.entries.iter().chain(b.entries.iter()) {
        if seen.insert(entry.key()) {
            entries.push(entry.clone());
        }
    }
    MergedPool { entries }
}

/// Whether both participants have a stored submission.
pub const fn has_both_submitted(a: Option<&Submission>, b: Option<&Submission>) -> bool {
    a.is_some() && b.is_some()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use getaway_types::Participant;

    fn entries(names: &[&str], by: Participant) -> Vec<CandidateEntry> {
        names
            .iter()
            .map(|n| CandidateEntry::new(*n, None, by))
            .collect()
    }

    fn submission(names: &[&str], by: Participant) -> Submission {
        Submission {
            participant: by,
            entries: entries(names, by),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_five_distinct_names() {
        let list = entries(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        assert!(validate_submission(&list, None).is_ok());
    }

    #[test]
    fn rejects_wrong_count() {
        let list = entries(&["Malta", "Istanbul"], Participant::PlayerOne);
        assert_eq!(
            validate_submission(&list, None),
            Err(ValidationError::WrongCount {
                expected: SUBMISSION_SIZE,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_empty_name() {
        let list = entries(
            &["Malta", "  ", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        assert_eq!(
            validate_submission(&list, None),
            Err(ValidationError::EmptyName { index: 1 })
        );
    }

    #[test]
    fn rejects_internal_duplicates_case_insensitively() {
        let list = entries(
            &["Porto", "porto", "Sicily", "Cyprus", "Malta"],
            Participant::PlayerOne,
        );
        let err = validate_submission(&list, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateWithinSubmission {
                names: vec!["porto".to_owned()]
            }
        );
    }

    #[test]
    fn rejects_collisions_with_the_other_submission() {
        // "Porto" collides with the other participant's stored "porto",
        // same (empty) region: same identity key.
        let other = submission(
            &["porto", "Gdansk", "Budapest", "Helsinki", "Ljubljana"],
            Participant::PlayerTwo,
        );
        let list = entries(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        let err = validate_submission(&list, Some(&other)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateNames {
                names: vec!["Porto".to_owned()]
            }
        );
    }

    #[test]
    fn no_collision_check_before_the_other_submits() {
        let list = entries(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        assert!(validate_submission(&list, None).is_ok());
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let a = submission(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        let b = submission(
            &["Gdansk", "Budapest", "Helsinki", "Ljubljana", "Naples"],
            Participant::PlayerTwo,
        );
        let pool = merge(&a, &b);
        let names: Vec<&str> = pool.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Malta",
                "Istanbul",
                "Sicily",
                "Cyprus",
                "Porto",
                "Gdansk",
                "Budapest",
                "Helsinki",
                "Ljubljana",
                "Naples"
            ]
        );
    }

    #[test]
    fn merge_dedupes_with_first_occurrence_winning() {
        let a = submission(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        let b = submission(
            &["malta", "Budapest", "Helsinki", "Ljubljana", "Naples"],
            Participant::PlayerTwo,
        );
        let pool = merge(&a, &b);
        assert_eq!(pool.len(), 9);
        // The surviving "Malta" is player one's spelling.
        let kept = pool.entry(&CandidateKey::new("malta", None)).unwrap();
        assert_eq!(kept.name, "Malta");
        assert_eq!(kept.submitted_by, Participant::PlayerOne);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = submission(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        let b = submission(
            &["Gdansk", "Budapest", "Helsinki", "Ljubljana", "Naples"],
            Participant::PlayerTwo,
        );
        let first = merge(&a, &b);
        let second = merge(&a, &b);
        assert_eq!(first, second);
    }

    #[test]
    fn both_submitted_requires_both() {
        let a = submission(
            &["Malta", "Istanbul", "Sicily", "Cyprus", "Porto"],
            Participant::PlayerOne,
        );
        assert!(!has_both_submitted(Some(&a), None));
        assert!(!has_both_submitted(None, None));
        assert!(has_both_submitted(Some(&a), Some(&a)));
    }
}
