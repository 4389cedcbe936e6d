//! Result of validating one raw provider response.

use super::artifact::ComponentArtifact;

/// Classification of a single candidate response.
///
/// A candidate is either a complete artifact or a list of errors. The
/// `partial` artifact on the invalid side is best-effort output kept so a
/// run that exhausts its retries can still surface something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Passed every check
    Valid(ComponentArtifact),

    /// Failed at least one check
    Invalid {
        errors: Vec<String>,
        partial: Option<ComponentArtifact>,
    },
}

impl ValidationOutcome {
    /// Whether the candidate passed validation
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Errors found (empty for a valid candidate)
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid { errors, .. } => errors,
        }
    }

    /// The artifact carried by this outcome, valid or partial
    pub fn artifact(&self) -> Option<&ComponentArtifact> {
        match self {
            Self::Valid(artifact) => Some(artifact),
            Self::Invalid { partial, .. } => partial.as_ref(),
        }
    }
}
