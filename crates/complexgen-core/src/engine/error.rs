use thiserror::Error;

use super::modification::ModificationKind;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{kind} modification expects {expected} candidate(s), received {found}")]
    ArityMismatch {
        kind: ModificationKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} modification has no well-defined inverse")]
    UnsupportedInversion { kind: ModificationKind },

    #[error("Phase '{phase}' did not converge within {iterations} iterations")]
    NotConverged {
        phase: &'static str,
        iterations: usize,
    },
}
