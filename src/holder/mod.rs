//! Holder side of an OpenID4VP presentation exchange.
//!
//! [VerifierSession] sequences the protocol phases over a [ProtocolBinding];
//! [group] turns the holder's credential selection into the shape the binding
//! expects.

pub mod binding;
pub mod error;
pub mod request;
pub mod selection;
pub mod session;
pub mod token;

pub use binding::{EngineHandle, ErrorCode, ProtocolBinding};
pub use error::{DataIntegrityError, Error, PresentationShareError, TokenConstructionError};
pub use request::{AuthenticatedRequest, TrustedVerifier};
pub use selection::{group, CredentialSelection, GroupedCredentials, SelectedCredential};
pub use session::{Phase, VerifierSession};
pub use token::{
    UnsignedVpToken, UnsignedVpTokens, VpTokenSigningResults, DEFAULT_PROOF_SIGNING_ALGORITHM,
};
