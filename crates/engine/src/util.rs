//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! parsing of stored values so every entity maps rows the same way.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::{RngCore, rngs::OsRng};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

/// Random opaque token, `bytes` of entropy, lowercase hex encoded.
pub(crate) fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    buf.iter().fold(String::with_capacity(bytes * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidData(format!("invalid {label} id")))
}

/// Parse a currency code stored in the DB into a strongly typed `Currency`.
pub(crate) fn model_currency(value: &str) -> ResultEngine<Currency> {
    Currency::try_from(value)
        .map_err(|_| EngineError::InvalidData(format!("invalid currency: {value}")))
}

pub(crate) fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    value.and_utc()
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Decode a JSON text column.
pub(crate) fn from_json_column<T: DeserializeOwned>(raw: &str, column: &str) -> ResultEngine<T> {
    serde_json::from_str(raw)
        .map_err(|err| EngineError::InvalidData(format!("invalid {column}: {err}")))
}

pub(crate) fn to_json_column<T: Serialize>(value: &T, column: &str) -> ResultEngine<String> {
    serde_json::to_string(value)
        .map_err(|err| EngineError::InvalidData(format!("invalid {column}: {err}")))
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
