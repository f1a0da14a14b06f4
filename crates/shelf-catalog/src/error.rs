use thiserror::Error;

/// Errors from locating or patching a catalog array.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("declaration `const {variable} = [` not found")]
    DeclarationNotFound { variable: String },

    #[error("`{variable}` is declared more than once (again at byte {offset})")]
    DuplicateDeclaration { variable: String, offset: usize },

    #[error("array `{variable}` is never closed")]
    Unterminated { variable: String },

    #[error("array `{variable}` closes at byte {offset} without a trailing `;`")]
    MissingSemicolon { variable: String, offset: usize },

    #[error("invalid array variable name {0:?}")]
    InvalidVariable(String),

    #[error("bytes {start}..{end} are not an array region of this text")]
    InvalidRegion { start: usize, end: usize },

    #[error("failed to render entry: {0}")]
    Render(String),
}

impl CatalogError {
    /// True when the artifact does not carry a usable declaration, as
    /// opposed to a caller passing bad arguments.
    pub fn is_malformed_artifact(&self) -> bool {
        matches!(
            self,
            Self::DeclarationNotFound { .. }
                | Self::DuplicateDeclaration { .. }
                | Self::Unterminated { .. }
                | Self::MissingSemicolon { .. }
        )
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
