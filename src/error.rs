//! Rich diagnostic error types for Gideon.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Evaluator and provider errors never reach
//! the chat surface directly: the assistant turns them into fixed sentences.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for Gideon.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum GideonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lock(#[from] crate::lock::LockError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),
}

// ---------------------------------------------------------------------------
// Evaluator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
pub enum EvalError {
    #[error("invalid expression \"{expression}\": {reason}")]
    #[diagnostic(
        code(gideon::eval::invalid),
        help(
            "Only numbers, + - * / ^ and parentheses are accepted. \
             Check for dangling operators or unbalanced parentheses."
        )
    )]
    InvalidExpression { expression: String, reason: String },

    #[error("division by zero in \"{expression}\"")]
    #[diagnostic(
        code(gideon::eval::division_by_zero),
        help("The divisor evaluated to zero. Rewrite the expression with a non-zero divisor.")
    )]
    DivisionByZero { expression: String },
}

impl EvalError {
    pub(crate) fn invalid(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
pub enum RouteError {
    #[error("missing argument for {intent}")]
    #[diagnostic(code(gideon::route::missing_argument), help("Usage: {usage}"))]
    MissingArgument {
        intent: &'static str,
        usage: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ProviderError {
    #[error("{provider} unavailable: {message}")]
    #[diagnostic(
        code(gideon::provider::unavailable),
        help(
            "The remote service could not be reached or returned an unexpected response. \
             Check network access and the base URL / API key in the config file."
        )
    )]
    Unavailable { provider: String, message: String },

    #[error("{provider} found nothing for \"{subject}\"")]
    #[diagnostic(
        code(gideon::provider::not_found),
        help("Try a different spelling or a more specific name.")
    )]
    NotFound { provider: String, subject: String },

    #[error("\"{subject}\" is ambiguous ({} candidates)", .candidates.len())]
    #[diagnostic(
        code(gideon::provider::ambiguous),
        help("Pick one of the candidate titles and ask again.")
    )]
    Ambiguous {
        subject: String,
        candidates: Vec<String>,
    },
}

impl ProviderError {
    pub(crate) fn unavailable(provider: &str, message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SessionError {
    #[error("system is SOS-locked")]
    #[diagnostic(
        code(gideon::session::locked),
        help("Run `gideon unlock` and enter the SOS code to clear the lock.")
    )]
    Locked,

    #[error("session is not authenticated")]
    #[diagnostic(
        code(gideon::session::not_authenticated),
        help("Present a valid keyword before sending messages.")
    )]
    NotAuthenticated,
}

/// Convenience alias for functions returning Gideon results.
pub type GideonResult<T> = std::result::Result<T, GideonError>;
