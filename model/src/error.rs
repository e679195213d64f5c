use std::fmt::Display;

use strum::IntoEnumIterator;
use thiserror::Error;

/// A string outside one of the closed enumeration sets was encountered.
///
/// `kind` names the enumeration, `value` carries the offending input
/// verbatim so callers can point at the model element at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownValueError {
    pub kind: &'static str,
    pub value: String,
}

pub(crate) fn parse_enum<T>(kind: &'static str, value: &str) -> Result<T, UnknownValueError>
where
    T: IntoEnumIterator + Display,
{
    let trimmed = value.trim();
    T::iter()
        .find(|candidate| candidate.to_string() == trimmed)
        .ok_or_else(|| UnknownValueError {
            kind,
            value: value.to_string(),
        })
}
