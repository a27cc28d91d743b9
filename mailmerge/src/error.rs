use mailmerge_engine::ParseError;
use thiserror::Error;

/// Why a render failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template is malformed; `reason` names the offending marker
    #[error("template syntax error at offset {position}: {reason}")]
    Syntax { position: usize, reason: String },
    /// A defect inside the engine. Details are logged, never returned.
    #[error("template rendering failed")]
    Internal,
}

impl From<ParseError> for TemplateError {
    fn from(err: ParseError) -> Self {
        Self::Syntax {
            position: err.position,
            reason: format!("{} near \"{}\"", err.reason, err.near),
        }
    }
}
