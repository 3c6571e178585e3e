use core::fmt;
use std::{
    borrow::Cow,
    cmp::Ordering,
    collections::BTreeMap,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

const FORMAT_LDP_VC: &str = "ldp_vc";
const FORMAT_MSO_MDOC: &str = "mso_mdoc";
const FORMAT_JWT_VC_JSON: &str = "jwt_vc_json";
const FORMAT_VC_SD_JWT: &str = "vc+sd-jwt";
const FORMAT_DC_SD_JWT: &str = "dc+sd-jwt";

/// Formats the wallet is able to present, with their format-specific
/// algorithm or proof type lists.
pub type ClaimFormatMap = BTreeMap<ClaimFormatDesignation, ClaimFormatPayload>;

/// Format-specific parameters advertised for a [ClaimFormatDesignation] in
/// `vp_formats_supported`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaimFormatPayload {
    /// Linked-data proof suites, used by `ldp_vc`.
    #[serde(rename = "proof_type_values_supported")]
    ProofTypeValuesSupported(Vec<String>),
    /// JOSE/COSE algorithms, used by `mso_mdoc`, `jwt_vc_json` and SD-JWT formats.
    #[serde(rename = "alg_values_supported")]
    AlgValuesSupported(Vec<String>),
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ClaimFormatPayload {
    /// The proof types or algorithms listed by this payload, if any.
    pub fn values(&self) -> &[String] {
        match self {
            Self::ProofTypeValuesSupported(v) | Self::AlgValuesSupported(v) => v.as_slice(),
            Self::Other(_) => &[],
        }
    }
}

/// Credential format tag, as carried by a wallet credential's metadata and
/// used as a key in grouped credentials and unsigned VP tokens.
///
/// Designations are compared, ordered and hashed by [name](Self::name), so
/// `Other("ldp_vc")` and `LdpVc` are the same key.
///
/// Registry of the formats defined for OID4VP: <https://openid.net/specs/openid-4-verifiable-presentations-1_0.html#appendix-B>
#[derive(Clone, Debug)]
pub enum ClaimFormatDesignation {
    /// W3C Verifiable Credential secured with a Linked Data Proof.
    LdpVc,

    /// ISO/IEC 18013-5 mobile document.
    MsoMDoc,

    /// W3C Verifiable Credential secured as a JWT.
    JwtVcJson,

    /// IETF SD-JWT VC, legacy media type.
    VcSdJwt,

    /// IETF SD-JWT VC.
    DcSdJwt,

    /// Any other format. The value is the format name.
    Other(String),
}

impl ClaimFormatDesignation {
    pub fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            FORMAT_LDP_VC => Self::LdpVc,
            FORMAT_MSO_MDOC => Self::MsoMDoc,
            FORMAT_JWT_VC_JSON => Self::JwtVcJson,
            FORMAT_VC_SD_JWT => Self::VcSdJwt,
            FORMAT_DC_SD_JWT => Self::DcSdJwt,
            _ => Self::Other(name.into_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::LdpVc => FORMAT_LDP_VC,
            Self::MsoMDoc => FORMAT_MSO_MDOC,
            Self::JwtVcJson => FORMAT_JWT_VC_JSON,
            Self::VcSdJwt => FORMAT_VC_SD_JWT,
            Self::DcSdJwt => FORMAT_DC_SD_JWT,
            Self::Other(other) => other,
        }
    }
}

impl PartialEq for ClaimFormatDesignation {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ClaimFormatDesignation {}

impl Hash for ClaimFormatDesignation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state)
    }
}

impl PartialOrd for ClaimFormatDesignation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClaimFormatDesignation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl From<&str> for ClaimFormatDesignation {
    fn from(s: &str) -> Self {
        Self::from_name(Cow::Borrowed(s))
    }
}

impl From<String> for ClaimFormatDesignation {
    fn from(value: String) -> Self {
        Self::from_name(Cow::Owned(value))
    }
}

impl FromStr for ClaimFormatDesignation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl From<ClaimFormatDesignation> for String {
    fn from(format: ClaimFormatDesignation) -> Self {
        match format {
            ClaimFormatDesignation::Other(other) => other,
            known => known.name().to_owned(),
        }
    }
}

impl fmt::Display for ClaimFormatDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl Serialize for ClaimFormatDesignation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.name().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimFormatDesignation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Into::into)
    }
}
