//! This library provides the holder-side orchestration of an [OID4VP 1.0]
//! presentation exchange.
//!
//! [OID4VP 1.0]: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html>
//!
//! Request parsing, verifier validation, response encoding and transport are
//! performed by a protocol engine plugged in through the [`ProtocolBinding`]
//! trait, typically the native engine of a mobile platform. This crate
//! sequences the calls to that engine, decodes what it returns into typed
//! structures, and reshapes the holder's credential selection into the form
//! the engine expects.
//!
//! [`ProtocolBinding`]: crate::holder::binding::ProtocolBinding
//!
//! # Usage
//!
//! ```ignore
//! use openid4vp_holder::config::HolderConfig;
//! use openid4vp_holder::holder::{
//!     CredentialSelection, ErrorCode, VerifierSession, DEFAULT_PROOF_SIGNING_ALGORITHM,
//! };
//!
//! let session = VerifierSession::get_or_install(|| {
//!     VerifierSession::from_config(HolderConfig::new("io.example.wallet"), engine)
//! });
//!
//! // Authenticate the verifier (e.g. scanned from a QR code).
//! let request = match session.authenticate_verifier(&qr_code, &trusted_verifiers).await {
//!     Ok(request) => request,
//!     Err(e) => {
//!         session
//!             .send_error_to_verifier(&e.to_string(), ErrorCode::InvalidRequest)
//!             .await;
//!         return Err(e.into());
//!     }
//! };
//!
//! // Let the holder pick credentials for each input descriptor.
//! let selection: CredentialSelection = select_credentials(request.presentation_definition())?;
//!
//! // Build the unsigned VP tokens and sign them.
//! let tokens = session
//!     .construct_unsigned_vp_token(selection, &holder_did, DEFAULT_PROOF_SIGNING_ALGORITHM)
//!     .await?;
//! let signing_results = sign(&tokens).await?;
//!
//! // Deliver the presentation.
//! session.share_verifiable_presentation(signing_results).await?;
//! ```
//!
//! # Protocol Overview
//!
//! 1. *Verifier authentication*: [`VerifierSession::authenticate_verifier`]
//!    passes the authorization request, the trusted verifiers, the wallet
//!    metadata ([`WalletMetadata`]) and the client validation policy
//!    ([`ConfigProvider`]) to the engine, and returns the decoded
//!    [`AuthenticatedRequest`].
//! 2. *Credential selection*: performed by the application. The selection
//!    ([`CredentialSelection`]) maps input descriptor ids to credentials.
//! 3. *Unsigned token construction*:
//!    [`VerifierSession::construct_unsigned_vp_token`] groups the selection by
//!    input descriptor and format ([`group`]) and returns one
//!    [`UnsignedVpToken`] per format.
//! 4. *Signing*: performed by the application's signer.
//! 5. *Sharing*: [`VerifierSession::share_verifiable_presentation`].
//!
//! At any point after authentication started,
//! [`VerifierSession::send_error_to_verifier`] notifies the verifier of a
//! failure on a best-effort basis.
//!
//! [`VerifierSession::authenticate_verifier`]: crate::holder::VerifierSession::authenticate_verifier
//! [`VerifierSession::construct_unsigned_vp_token`]: crate::holder::VerifierSession::construct_unsigned_vp_token
//! [`VerifierSession::share_verifiable_presentation`]: crate::holder::VerifierSession::share_verifiable_presentation
//! [`VerifierSession::send_error_to_verifier`]: crate::holder::VerifierSession::send_error_to_verifier
//! [`WalletMetadata`]: crate::core::metadata::WalletMetadata
//! [`ConfigProvider`]: crate::config::ConfigProvider
//! [`AuthenticatedRequest`]: crate::holder::AuthenticatedRequest
//! [`CredentialSelection`]: crate::holder::CredentialSelection
//! [`group`]: crate::holder::group
//! [`UnsignedVpToken`]: crate::holder::UnsignedVpToken

pub mod config;
pub mod core;
pub mod holder;
