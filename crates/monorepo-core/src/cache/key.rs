//! Canonical cache keys built from call arguments.

use super::finite::find_non_finite;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while building a [`CallKey`].
#[derive(Error, Debug)]
pub enum CacheKeyError {
    /// An argument could not be serialized.
    #[error("cache key argument is not serializable: {0}")]
    Encode(#[from] serde_json::Error),

    /// An argument contains NaN or an infinity, which has no distinct JSON encoding.
    #[error("cache key argument contains a non-finite float: {0}")]
    NonFiniteFloat(f64),
}

fn encode<T>(value: &T) -> Result<Value, CacheKeyError>
where
    T: Serialize + ?Sized,
{
    if let Some(value) = find_non_finite(value) {
        return Err(CacheKeyError::NonFiniteFloat(value));
    }
    Ok(serde_json::to_value(value)?)
}

/// A cache key that identifies one invocation by its arguments.
///
/// Positional arguments keep their order. Named arguments are sorted by name, so the order in
/// which they were supplied does not matter. Two calls share a key exactly when their serialized
/// arguments are equal. Floats must be finite: NaN and the infinities are rejected with
/// [`CacheKeyError::NonFiniteFloat`].
///
/// # Examples
///
/// ```rust
/// use monorepo_core::cache::CallKey;
///
/// # fn main() -> Result<(), monorepo_core::cache::CacheKeyError> {
/// let a = CallKey::builder().arg(&42)?.kwarg("b", &2)?.kwarg("a", &1)?.build();
/// let b = CallKey::builder().arg(&42)?.kwarg("a", &1)?.kwarg("b", &2)?.build();
/// assert_eq!(a, b);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallKey(String);

impl CallKey {
    /// Start a key with no arguments.
    pub fn builder() -> CallKeyBuilder {
        CallKeyBuilder::default()
    }

    /// Build a key from positional arguments only.
    ///
    /// Pass a tuple for several arguments: `CallKey::from_args(&(1, "x"))`. Anything that
    /// serializes to a JSON array is unpacked into its elements, so a `Vec` or slice is taken
    /// as an argument list. Use [`CallKey::from_arg`] to key on a single sequence argument.
    /// A value that does not serialize to a JSON array counts as a single argument.
    pub fn from_args<A>(args: &A) -> Result<Self, CacheKeyError>
    where
        A: Serialize + ?Sized,
    {
        let args = match encode(args)? {
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(CallKeyBuilder {
            args,
            kwargs: BTreeMap::new(),
        }
        .build())
    }

    /// Build a key from exactly one positional argument, never unpacked.
    pub fn from_arg<T>(arg: &T) -> Result<Self, CacheKeyError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self::builder().arg(arg)?.build())
    }

    /// The canonical text form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builder for [`CallKey`].
#[derive(Debug, Clone, Default)]
pub struct CallKeyBuilder {
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl CallKeyBuilder {
    /// Append a positional argument.
    pub fn arg<T>(mut self, value: &T) -> Result<Self, CacheKeyError>
    where
        T: Serialize + ?Sized,
    {
        self.args.push(encode(value)?);
        Ok(self)
    }

    /// Set a named argument. Setting the same name twice keeps the last value.
    pub fn kwarg<T>(mut self, name: impl Into<String>, value: &T) -> Result<Self, CacheKeyError>
    where
        T: Serialize + ?Sized,
    {
        self.kwargs.insert(name.into(), encode(value)?);
        Ok(self)
    }

    /// Finish the key.
    pub fn build(self) -> CallKey {
        let kwargs: serde_json::Map<String, Value> = self.kwargs.into_iter().collect();
        let encoded = Value::Array(vec![Value::Array(self.args), Value::Object(kwargs)]);
        CallKey(encoded.to_string())
    }
}
