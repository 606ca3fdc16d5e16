//! Status transition table.

use crate::error::{AssignError, AssignResult};
use crate::models::AssignmentStatus;

use AssignmentStatus::*;

/// Permitted `(from, to)` pairs.
const ALLOWED: [(AssignmentStatus, AssignmentStatus); 4] = [
    (Assigned, InProgress),
    (InProgress, Completed),
    (Assigned, Cancelled),
    (InProgress, Cancelled),
];

/// Whether `from → to` is a permitted transition.
pub fn can_transition(from: AssignmentStatus, to: AssignmentStatus) -> bool {
    ALLOWED.contains(&(from, to))
}

/// Checks a transition, failing with [`AssignError::InvalidTransition`].
///
/// Identity transitions are rejected.
pub fn transition(from: AssignmentStatus, to: AssignmentStatus) -> AssignResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AssignError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AssignmentStatus; 4] = [Assigned, InProgress, Completed, Cancelled];

    #[test]
    fn test_forward_path() {
        assert!(transition(Assigned, InProgress).is_ok());
        assert!(transition(InProgress, Completed).is_ok());
    }

    #[test]
    fn test_cancel_from_open_states() {
        assert!(transition(Assigned, Cancelled).is_ok());
        assert!(transition(InProgress, Cancelled).is_ok());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for to in ALL {
            assert!(transition(Completed, to).is_err());
            assert!(transition(Cancelled, to).is_err());
        }
    }

    #[test]
    fn test_identity_and_backward_rejected() {
        for s in ALL {
            assert!(!can_transition(s, s));
        }
        assert!(transition(InProgress, Assigned).is_err());
        assert!(transition(Assigned, Completed).is_err());

        match transition(Completed, Assigned) {
            Err(AssignError::InvalidTransition { from, to }) => {
                assert_eq!(from, Completed);
                assert_eq!(to, Assigned);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_exactly_four_allowed() {
        let count = ALL
            .iter()
            .flat_map(|&f| ALL.iter().map(move |&t| (f, t)))
            .filter(|&(f, t)| can_transition(f, t))
            .count();
        assert_eq!(count, 4);
    }
}
