//! Serde helpers for exporter JSON, which writes most scalars as strings.

use serde::Deserialize as _;

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
        }
    }
}

/// Optional scalar read as its string form.
pub(crate) fn de_opt_scalar<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(de)?.map(Scalar::into_string))
}

/// Required scalar read as its string form.
pub(crate) fn de_scalar<'de, D>(de: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Scalar::deserialize(de)?.into_string())
}

/// Non-negative integer written either as a number or a decimal string.
pub(crate) fn de_u32<'de, D>(de: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Scalar::deserialize(de)?.into_string();
    s.trim().parse::<u32>().map_err(serde::de::Error::custom)
}

/// Optional value that only counts when it is a JSON string.
///
/// Booleans and numbers read as absent, so `true` and `1` never compare equal
/// to the string `"true"`.
pub(crate) fn de_opt_string_only<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(de)? {
        Some(Scalar::Str(s)) => Some(s),
        _ => None,
    })
}
