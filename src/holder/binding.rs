use std::{fmt, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::core::metadata::WalletMetadata;

use super::{request::TrustedVerifier, selection::GroupedCredentials, token::VpTokenSigningResults};

const ACCESS_DENIED: &str = "access_denied";
const INVALID_REQUEST: &str = "invalid_request";
const INVALID_CLIENT: &str = "invalid_client";
const VP_FORMATS_NOT_SUPPORTED: &str = "vp_formats_not_supported";
const INVALID_PRESENTATION_DEFINITION_URI: &str = "invalid_presentation_definition_uri";
const INVALID_PRESENTATION_DEFINITION_REFERENCE: &str =
    "invalid_presentation_definition_reference";

/// The protocol engine that parses authorization requests, validates
/// verifiers, and encodes and transmits authorization responses.
///
/// A trait is used here so that the native engine of a mobile platform can be
/// plugged in. Documents returned as `String` are JSON and are decoded into
/// typed structures by the [VerifierSession](super::session::VerifierSession).
#[async_trait]
pub trait ProtocolBinding: Send + Sync {
    /// One-time setup, keyed by the application identity.
    async fn init(&self, app_id: &str) -> Result<()>;

    /// Parse and authenticate an authorization request.
    async fn authenticate(
        &self,
        request: &str,
        trusted_verifiers: &[TrustedVerifier],
        wallet_metadata: &WalletMetadata,
        validate_client: bool,
    ) -> Result<String>;

    /// Construct the unsigned VP tokens for the grouped credentials.
    async fn construct_unsigned_token(
        &self,
        credentials: &GroupedCredentials,
        holder_id: &str,
        signature_algorithm: &str,
    ) -> Result<String>;

    /// Send the signed presentation to the verifier. The returned
    /// acknowledgment is passed through to the caller unchanged.
    async fn share_presentation(&self, signing_results: &VpTokenSigningResults) -> Result<String>;

    /// Send an authorization error response to the verifier.
    async fn send_error(&self, message: &str, code: &ErrorCode) -> Result<()>;
}

/// The process's handle to a [ProtocolBinding].
///
/// The binding is initialized on first use, exactly once even when first
/// used from several tasks or sessions at the same time. An initialization
/// failure is permanent. Sessions driving exchanges over the same engine
/// share one handle.
pub struct EngineHandle {
    app_id: String,
    binding: Arc<dyn ProtocolBinding>,
    initialized: OnceCell<Result<(), String>>,
}

impl EngineHandle {
    pub fn new(app_id: impl Into<String>, binding: Arc<dyn ProtocolBinding>) -> Arc<Self> {
        Arc::new(Self {
            app_id: app_id.into(),
            binding,
            initialized: OnceCell::new(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The initialized binding, or the initialization failure.
    pub(crate) async fn binding(&self) -> Result<&dyn ProtocolBinding, String> {
        let outcome = self
            .initialized
            .get_or_init(|| async {
                info!(app_id = %self.app_id, "initializing protocol engine");
                self.binding.init(&self.app_id).await.map_err(|e| {
                    error!("protocol engine initialization failed: {e:#}");
                    format!("{e:#}")
                })
            })
            .await;

        match outcome {
            Ok(()) => Ok(self.binding.as_ref()),
            Err(e) => Err(e.clone()),
        }
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("app_id", &self.app_id)
            .field("initialized", &self.initialized.get())
            .finish_non_exhaustive()
    }
}

/// Authorization error response code sent to the verifier.
///
/// See: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#section-8.5>
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The holder declined, or holds no credential matching the request.
    AccessDenied,
    InvalidRequest,
    InvalidClient,
    VpFormatsNotSupported,
    InvalidPresentationDefinitionUri,
    InvalidPresentationDefinitionReference,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AccessDenied => ACCESS_DENIED,
            Self::InvalidRequest => INVALID_REQUEST,
            Self::InvalidClient => INVALID_CLIENT,
            Self::VpFormatsNotSupported => VP_FORMATS_NOT_SUPPORTED,
            Self::InvalidPresentationDefinitionUri => INVALID_PRESENTATION_DEFINITION_URI,
            Self::InvalidPresentationDefinitionReference => {
                INVALID_PRESENTATION_DEFINITION_REFERENCE
            }
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        match s {
            ACCESS_DENIED => Self::AccessDenied,
            INVALID_REQUEST => Self::InvalidRequest,
            INVALID_CLIENT => Self::InvalidClient,
            VP_FORMATS_NOT_SUPPORTED => Self::VpFormatsNotSupported,
            INVALID_PRESENTATION_DEFINITION_URI => Self::InvalidPresentationDefinitionUri,
            INVALID_PRESENTATION_DEFINITION_REFERENCE => {
                Self::InvalidPresentationDefinitionReference
            }
            _ => Self::Other(s.to_owned()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}
