// ============================================================================
// domain/error.rs - STRUCTURAL AND EXPRESSION ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Everything here is detected without touching the outside world: while a
/// document is parsed, while a `when` guard is evaluated, or while a job
/// graph is walked. All variants are fatal for the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Structural Errors
    // ========================================================================
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid job{}: {reason}", fmt_job(.job))]
    InvalidJob { job: Option<String>, reason: String },

    #[error("Invalid job type '{kind}'")]
    UnknownJobType { kind: String },

    #[error("Invalid question type '{kind}' for question '{id}'")]
    UnknownQuestionType { id: String, kind: String },

    #[error("Invalid {field} payload: expected a string or an array of strings, found {found}")]
    InvalidDependencies { field: &'static str, found: String },

    #[error("'{kind}' jobs require a `when` guard")]
    MissingGuard { kind: &'static str },

    #[error("Definition '{target}' is not declared in this document")]
    UnknownDefinition { target: String },

    #[error("Definition cycle detected: {}", .chain.join(" -> "))]
    DefinitionCycle { chain: Vec<String> },

    #[error("Invalid replace pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ========================================================================
    // Expression Errors
    // ========================================================================
    #[error("Cannot evaluate `when` expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
}

fn fmt_job(job: &Option<String>) -> String {
    job.as_ref().map(|id| format!(" '{id}'")).unwrap_or_default()
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDocument(msg) => vec![
                "Check that the document is valid JSON".into(),
                format!("Details: {}", msg),
            ],
            Self::UnknownJobType { kind } => vec![
                format!("'{}' is not a job type", kind),
                "Supported types: file, question, group, registryDependencies, dependencies, run, log"
                    .into(),
            ],
            Self::UnknownQuestionType { kind, .. } => vec![
                format!("'{}' is not a question type", kind),
                "Supported question types: ask, confirm, options".into(),
            ],
            Self::MissingGuard { kind } => vec![
                format!("Add a `when` condition to the '{}' job", kind),
                "Example: \"when\": \"#useTypescript\"".into(),
            ],
            Self::UnknownDefinition { target } => vec![
                format!("Declare '{}' under the document's `definitions`", target),
                "Definitions are scoped to the document that declares them".into(),
            ],
            Self::DefinitionCycle { .. } => vec![
                "A definition reaches itself through `run` jobs".into(),
                "Break the chain or guard one of the `run` jobs with `when`".into(),
            ],
            Self::InvalidExpression { .. } => vec![
                "Supported: #id, @id, !, ==, !=, &&, ||, parentheses, 'string' literals".into(),
                "Example: \"#framework == 'react' && !@skipTests\"".into(),
            ],
            _ => vec!["Check the job definition in the document".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidExpression { .. } => ErrorCategory::Expression,
            Self::UnknownDefinition { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Structural,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Expression,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_job_mentions_id_when_present() {
        let err = DomainError::InvalidJob {
            job: Some("#name".into()),
            reason: "missing `question`".into(),
        };
        assert_eq!(err.to_string(), "Invalid job '#name': missing `question`");

        let anonymous = DomainError::InvalidJob {
            job: None,
            reason: "not an object".into(),
        };
        assert_eq!(anonymous.to_string(), "Invalid job: not an object");
    }

    #[test]
    fn cycle_renders_chain() {
        let err = DomainError::DefinitionCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn expression_errors_have_their_own_category() {
        let err = DomainError::InvalidExpression {
            expression: "#a ==".into(),
            reason: "unexpected end".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Expression);
        assert!(!err.suggestions().is_empty());
    }
}
