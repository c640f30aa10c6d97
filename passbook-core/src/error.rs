use thiserror::Error;

/// Failures of the document unlocking / text rendering collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("invalid document password")]
    BadPassword,
    #[error("failed to extract document text: {0}")]
    Extraction(String),
}

/// Top-level error type for the extraction entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("no parser for institution '{institution}' and document type '{document_type}'")]
    UnsupportedLayout {
        institution: String,
        document_type: String,
    },

    #[error("either 'institution' or 'broker' must be provided")]
    MissingInstitution,

    #[error("failed to parse statement: {0}")]
    Unexpected(String),
}

impl ExtractError {
    pub fn unsupported(institution: impl Into<String>, document_type: impl Into<String>) -> Self {
        ExtractError::UnsupportedLayout {
            institution: institution.into(),
            document_type: document_type.into(),
        }
    }

    /// Stable machine-readable kind, used as the `kind` field of error responses
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Document(DocumentError::BadPassword) => "bad_password",
            ExtractError::Document(DocumentError::Extraction(_)) => "extraction_failed",
            ExtractError::UnsupportedLayout { .. } => "unsupported_layout",
            ExtractError::MissingInstitution => "missing_institution",
            ExtractError::Unexpected(_) => "unexpected",
        }
    }

    /// Errors caused by what the caller sent rather than by the document
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::MissingInstitution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_password_is_distinct() {
        let bad = ExtractError::from(DocumentError::BadPassword);
        let broken = ExtractError::from(DocumentError::Extraction("truncated xref".to_string()));
        assert_eq!(bad.kind(), "bad_password");
        assert_eq!(broken.kind(), "extraction_failed");
        assert_eq!(bad.to_string(), "invalid document password");
    }

    #[test]
    fn test_unsupported_layout_names_the_pair() {
        let err = ExtractError::unsupported("icici", "credit_card");
        assert!(err.to_string().contains("icici"));
        assert!(err.to_string().contains("credit_card"));
        assert!(!err.is_client_error());
        assert!(ExtractError::MissingInstitution.is_client_error());
    }
}
