use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::{
    config::{ConfigProvider, HolderConfig},
    core::presentation_definition::PresentationDefinition,
};

use super::{
    binding::{EngineHandle, ErrorCode, ProtocolBinding},
    error::{Error, PresentationShareError, Result, TokenConstructionError},
    request::{AuthenticatedRequest, TrustedVerifier},
    selection::{group, CredentialSelection},
    token::{UnsignedVpTokens, VpTokenSigningResults},
};

static GLOBAL: OnceLock<Arc<VerifierSession>> = OnceLock::new();

/// Progress of the presentation exchange driven by a [VerifierSession].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No exchange has started.
    Uninitialized,
    Authenticating,
    /// The request is authenticated; the holder is choosing credentials.
    AwaitingSelection,
    ConstructingToken,
    /// Unsigned tokens were handed out; the holder's signer is at work.
    AwaitingSignature,
    Sharing,
    /// The presentation was delivered to the verifier.
    Done,
    /// The verifier was notified that the exchange failed.
    ErrorReported,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uninitialized => "no verifier is authenticated",
            Phase::Authenticating => "authenticating the verifier",
            Phase::AwaitingSelection => "awaiting credential selection",
            Phase::ConstructingToken => "constructing unsigned VP tokens",
            Phase::AwaitingSignature => "awaiting VP token signatures",
            Phase::Sharing => "sharing the presentation",
            Phase::Done => "the presentation is already shared",
            Phase::ErrorReported => "an error was reported to the verifier",
        }
        .fmt(f)
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Authenticate,
    ConstructToken,
    Share,
    ReportError,
}

impl Operation {
    /// Phases from which the operation may start. A failed operation leaves
    /// the session in the phase it entered, so each operation can be retried.
    fn allowed_from(self) -> &'static [Phase] {
        match self {
            Operation::Authenticate => &[
                Phase::Uninitialized,
                Phase::Authenticating,
                Phase::AwaitingSelection,
                Phase::ConstructingToken,
                Phase::AwaitingSignature,
                Phase::Sharing,
                Phase::Done,
                Phase::ErrorReported,
            ],
            Operation::ConstructToken => &[
                Phase::AwaitingSelection,
                Phase::ConstructingToken,
                Phase::AwaitingSignature,
            ],
            Operation::Share => &[Phase::AwaitingSignature, Phase::Sharing],
            Operation::ReportError => &[
                Phase::Authenticating,
                Phase::AwaitingSelection,
                Phase::ConstructingToken,
                Phase::AwaitingSignature,
                Phase::Sharing,
            ],
        }
    }

    fn entered(self) -> Phase {
        match self {
            Operation::Authenticate => Phase::Authenticating,
            Operation::ConstructToken => Phase::ConstructingToken,
            Operation::Share => Phase::Sharing,
            Operation::ReportError => Phase::ErrorReported,
        }
    }
}

#[derive(Debug)]
struct Exchange {
    phase: Phase,
    request: Option<Arc<AuthenticatedRequest>>,
}

impl Exchange {
    /// Enter the phase of `operation`, or return the current phase if the
    /// operation is not allowed from it.
    fn begin(&mut self, operation: Operation) -> Result<(), Phase> {
        if !operation.allowed_from().contains(&self.phase) {
            return Err(self.phase);
        }
        debug!(from = ?self.phase, to = ?operation.entered(), "phase transition");
        self.phase = operation.entered();
        Ok(())
    }
}

/// Holder-side orchestrator of an OpenID4VP presentation exchange.
///
/// A session drives the [ProtocolBinding] through a shared [EngineHandle],
/// which initializes the binding on first use, exactly once across every
/// session holding the handle. An initialization failure is permanent.
///
/// The phases of an exchange must be driven in order:
///
/// 1. [authenticate_verifier](Self::authenticate_verifier),
/// 2. [construct_unsigned_vp_token](Self::construct_unsigned_vp_token),
/// 3. [share_verifiable_presentation](Self::share_verifiable_presentation).
///
/// Calling a phase out of order fails without reaching the binding. A session
/// drives one exchange at a time: starting a new authentication abandons the
/// current exchange. Applications running concurrent exchanges create one
/// session per exchange over the same [EngineHandle] (see [engine](Self::engine)).
pub struct VerifierSession {
    engine: Arc<EngineHandle>,
    config: Arc<dyn ConfigProvider>,
    exchange: Mutex<Exchange>,
}

impl VerifierSession {
    pub fn new(engine: Arc<EngineHandle>, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            engine,
            config,
            exchange: Mutex::new(Exchange {
                phase: Phase::Uninitialized,
                request: None,
            }),
        }
    }

    /// Create a session from static configuration, with a new handle to
    /// `binding`.
    pub fn from_config(config: HolderConfig, binding: Arc<dyn ProtocolBinding>) -> Self {
        let engine = EngineHandle::new(config.app_id.clone(), binding);
        Self::new(engine, Arc::new(config))
    }

    /// The process-wide session, created by `init` on first access.
    ///
    /// Concurrent first accesses run `init` at most once and all observe the
    /// same session.
    pub fn get_or_install(init: impl FnOnce() -> VerifierSession) -> Arc<VerifierSession> {
        GLOBAL.get_or_init(|| Arc::new(init())).clone()
    }

    /// The process-wide session, if one was installed.
    pub fn global() -> Option<Arc<VerifierSession>> {
        GLOBAL.get().cloned()
    }

    pub fn app_id(&self) -> &str {
        self.engine.app_id()
    }

    /// The engine handle, to be shared with sessions for other exchanges.
    pub fn engine(&self) -> &Arc<EngineHandle> {
        &self.engine
    }

    pub fn phase(&self) -> Phase {
        self.exchange().phase
    }

    /// The request of the current exchange, once authenticated.
    pub fn authenticated_request(&self) -> Option<Arc<AuthenticatedRequest>> {
        self.exchange().request.clone()
    }

    /// Initialize the protocol binding now rather than on first use.
    pub async fn initialize(&self) -> Result<()> {
        self.binding().await.map(|_| ())
    }

    /// Authenticate the verifier behind a URL-encoded authorization request.
    ///
    /// `trusted_verifiers` may be empty, meaning there is no pre-trusted set.
    /// On success the decoded request is returned for credential selection.
    pub async fn authenticate_verifier(
        &self,
        request: &str,
        trusted_verifiers: &[TrustedVerifier],
    ) -> Result<Arc<AuthenticatedRequest>> {
        let binding = self.binding().await?;

        if request.trim().is_empty() {
            return Err(Error::VerifierAuthentication(anyhow!(
                "authorization request is empty"
            )));
        }

        {
            let mut exchange = self.exchange();
            if exchange.phase != Phase::Uninitialized && exchange.phase != Phase::Done {
                debug!(phase = ?exchange.phase, "starting a new exchange");
            }
            exchange.request = None;
            exchange.begin(Operation::Authenticate).map_err(|phase| {
                Error::VerifierAuthentication(anyhow!("cannot authenticate while {phase}"))
            })?;
        }

        let validate_client = self
            .config
            .client_validation_required()
            .await
            .map_err(|e| {
                Error::VerifierAuthentication(e.context("unable to resolve client validation"))
            })?;

        let wallet_metadata = match self.config.wallet_metadata().await {
            Ok(Some(metadata)) => {
                debug!("using wallet metadata override");
                metadata
            }
            Ok(None) => Default::default(),
            Err(e) => {
                return Err(Error::VerifierAuthentication(
                    e.context("unable to resolve wallet metadata"),
                ))
            }
        };

        let response = binding
            .authenticate(request, trusted_verifiers, &wallet_metadata, validate_client)
            .await
            .map_err(Error::VerifierAuthentication)?;

        let request = Arc::new(AuthenticatedRequest::from_engine_response(&response)?);

        info!(
            client_id = request.client_id(),
            input_descriptors = request.presentation_definition().input_descriptors().len(),
            validate_client,
            "verifier authenticated"
        );

        let mut exchange = self.exchange();
        exchange.phase = Phase::AwaitingSelection;
        exchange.request = Some(request.clone());

        Ok(request)
    }

    /// Construct the unsigned VP tokens for the holder's selection.
    ///
    /// The selection is checked against the authenticated request before the
    /// binding is called: it may only reference input descriptors of the
    /// request, and, when the request has no submission requirements, must
    /// hold at least one credential for each input descriptor.
    pub async fn construct_unsigned_vp_token(
        &self,
        selection: CredentialSelection,
        holder_id: &str,
        signature_algorithm: &str,
    ) -> Result<UnsignedVpTokens> {
        let binding = self.binding().await?;

        if holder_id.is_empty() {
            return Err(TokenConstructionError::MissingParameter("holder id").into());
        }
        if signature_algorithm.is_empty() {
            return Err(TokenConstructionError::MissingParameter("signature algorithm").into());
        }

        let request = {
            let mut exchange = self.exchange();
            let phase = exchange.phase;
            let Some(request) = exchange.request.clone() else {
                return Err(TokenConstructionError::OutOfOrder(phase).into());
            };
            exchange
                .begin(Operation::ConstructToken)
                .map_err(TokenConstructionError::OutOfOrder)?;
            request
        };

        check_selection(request.presentation_definition(), &selection)?;

        let credentials = group(selection);

        debug!(
            input_descriptors = credentials.input_descriptor_ids().count(),
            credentials = credentials.len(),
            signature_algorithm,
            "constructing unsigned VP tokens"
        );

        let response = binding
            .construct_unsigned_token(&credentials, holder_id, signature_algorithm)
            .await
            .map_err(TokenConstructionError::Engine)?;

        let tokens = UnsignedVpTokens::from_engine_response(&response)?;

        self.exchange().phase = Phase::AwaitingSignature;

        Ok(tokens)
    }

    /// Share the signed presentation with the verifier.
    ///
    /// Returns the binding's acknowledgment unchanged. Failures are not
    /// retried here.
    pub async fn share_verifiable_presentation(
        &self,
        signing_results: VpTokenSigningResults,
    ) -> Result<String> {
        let binding = self.binding().await?;

        if signing_results.is_empty() {
            return Err(PresentationShareError::NoSigningResults.into());
        }

        self.exchange()
            .begin(Operation::Share)
            .map_err(PresentationShareError::OutOfOrder)?;

        let response = binding
            .share_presentation(&signing_results)
            .await
            .map_err(PresentationShareError::Engine)?;

        info!("presentation shared with the verifier");

        self.exchange().phase = Phase::Done;

        Ok(response)
    }

    /// Notify the verifier that the exchange failed.
    ///
    /// Best effort: failures are logged and never returned. Nothing is sent
    /// when no exchange is in progress.
    pub async fn send_error_to_verifier(&self, message: &str, code: ErrorCode) {
        let binding = match self.binding().await {
            Ok(binding) => binding,
            Err(e) => {
                warn!(%code, "unable to notify the verifier: {e}");
                return;
            }
        };

        let began = self.exchange().begin(Operation::ReportError);
        if let Err(phase) = began {
            warn!(%code, %phase, "no exchange in progress, the verifier is not notified");
            return;
        }

        match binding.send_error(message, &code).await {
            Ok(()) => info!(%code, error_message = message, "error sent to the verifier"),
            Err(e) => warn!(%code, "failed to send error to the verifier: {e:#}"),
        }
    }

    async fn binding(&self) -> Result<&dyn ProtocolBinding> {
        self.engine.binding().await.map_err(Error::Initialization)
    }

    fn exchange(&self) -> MutexGuard<'_, Exchange> {
        self.exchange.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for VerifierSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierSession")
            .field("engine", &self.engine)
            .field("exchange", &self.exchange())
            .finish_non_exhaustive()
    }
}

/// Check a selection against the input descriptors of the request.
fn check_selection(
    definition: &PresentationDefinition,
    selection: &CredentialSelection,
) -> Result<(), TokenConstructionError> {
    for (input_descriptor_id, _) in selection.iter() {
        if definition.input_descriptor(input_descriptor_id).is_none() {
            return Err(TokenConstructionError::UndefinedInputDescriptor(
                input_descriptor_id.to_owned(),
            ));
        }
    }

    let Some(mut mandatory) = definition.mandatory_input_descriptors() else {
        debug!("submission requirements present, selection completeness left to the engine");
        return Ok(());
    };

    match mandatory.find(|id| selection.credentials(id).is_empty()) {
        Some(missing) => Err(TokenConstructionError::MissingRequiredInput(
            missing.to_owned(),
        )),
        None => Ok(()),
    }
}
