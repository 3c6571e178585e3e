use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// A JSON object from which [TypedParameters](TypedParameter) are read.
///
/// Wallet metadata is carried this way so that entries this crate does not
/// model still reach the protocol engine untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UntypedObject(pub(crate) Map<String, Json>);

/// A strongly typed entry of an [UntypedObject], stored under [Self::KEY].
pub trait TypedParameter:
    TryFrom<Json, Error = anyhow::Error> + Into<Json> + Clone + std::fmt::Debug
{
    const KEY: &'static str;
}

impl UntypedObject {
    /// Read an optional [TypedParameter]. Absence is not an error; a value
    /// that does not parse is.
    pub fn get_optional<T: TypedParameter>(&self) -> Result<Option<T>> {
        self.get()
            .transpose()
            .with_context(|| format!("'{}' could not be parsed", T::KEY))
    }

    /// Read a [TypedParameter].
    ///
    /// Returns `None` when the key is absent. The underlying value is cloned.
    pub fn get<T: TypedParameter>(&self) -> Option<Result<T>> {
        Some(self.0.get(T::KEY)?.clone().try_into())
    }

    /// Write a [TypedParameter], replacing any previous value under its key.
    pub fn insert<T: TypedParameter>(&mut self, t: T) {
        self.0.insert(T::KEY.to_owned(), t.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl From<UntypedObject> for Json {
    fn from(value: UntypedObject) -> Self {
        value.0.into()
    }
}

pub trait ParsingErrorContext {
    type T: TypedParameter;

    fn parsing_error(self) -> Result<Self::T>;
}

impl<T: TypedParameter> ParsingErrorContext for Option<Result<T>> {
    type T = T;

    fn parsing_error(self) -> Result<T> {
        self.context(format!("'{}' is missing", T::KEY))?
            .context(format!("'{}' could not be parsed", T::KEY))
    }
}

impl<T: TypedParameter> ParsingErrorContext for Result<T> {
    type T = T;

    fn parsing_error(self) -> Result<T> {
        self.context(format!("'{}' could not be parsed", T::KEY))
    }
}
