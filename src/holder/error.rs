use super::session::Phase;

/// Result type of the [VerifierSession](super::session::VerifierSession) operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while driving a presentation exchange.
///
/// Apart from [Error::Initialization], every kind is recoverable: the caller
/// decides whether to retry the phase or to notify the verifier through
/// [send_error_to_verifier](super::session::VerifierSession::send_error_to_verifier).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The protocol engine could not be initialized. No exchange can proceed
    /// for the lifetime of the session.
    #[error("protocol engine initialization failed: {0}")]
    Initialization(String),

    /// The authorization request is malformed, the verifier is not trusted,
    /// or client validation failed.
    #[error("verifier authentication failed: {0:#}")]
    VerifierAuthentication(anyhow::Error),

    #[error(transparent)]
    TokenConstruction(#[from] TokenConstructionError),

    #[error(transparent)]
    PresentationShare(#[from] PresentationShareError),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
}

/// Unsigned VP token construction error.
#[derive(Debug, thiserror::Error)]
pub enum TokenConstructionError {
    /// Tokens can only be constructed for an authenticated request.
    #[error("cannot construct an unsigned VP token while {0}")]
    OutOfOrder(Phase),

    /// A required argument was empty.
    #[error("missing {0}")]
    MissingParameter(&'static str),

    /// The selection has no credential for an input descriptor the request
    /// requires.
    #[error("missing required input `{0}`")]
    MissingRequiredInput(String),

    /// The selection references an input descriptor that the request does
    /// not define.
    #[error("undefined input descriptor: {0}")]
    UndefinedInputDescriptor(String),

    /// The protocol engine refused to construct the token.
    #[error("protocol engine could not construct the token: {0:#}")]
    Engine(anyhow::Error),
}

/// Presentation sharing error.
#[derive(Debug, thiserror::Error)]
pub enum PresentationShareError {
    /// Sharing requires unsigned tokens to have been constructed.
    #[error("cannot share a presentation while {0}")]
    OutOfOrder(Phase),

    /// No signing result was supplied.
    #[error("no VP token signing results")]
    NoSigningResults,

    /// The engine or the transport below it failed.
    #[error("failed to share the presentation: {0:#}")]
    Engine(anyhow::Error),
}

/// Malformed data crossing the boundary with the wallet or the protocol
/// engine. These are contract violations rather than protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum DataIntegrityError {
    /// A selected credential has no format.
    #[error("credential #{index} selected for `{input_descriptor_id}` has no format")]
    MissingFormat {
        input_descriptor_id: String,
        index: usize,
    },

    /// A selected credential has no payload.
    #[error("credential #{index} selected for `{input_descriptor_id}` has no payload")]
    MissingPayload {
        input_descriptor_id: String,
        index: usize,
    },

    /// A document did not match its expected schema.
    #[error("malformed {document} at `{path}`: {message}")]
    Schema {
        document: &'static str,
        path: String,
        message: String,
    },
}

impl DataIntegrityError {
    pub(crate) fn schema(
        document: &'static str,
        error: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        Self::Schema {
            document,
            path: error.path().to_string(),
            message: error.into_inner().to_string(),
        }
    }
}
