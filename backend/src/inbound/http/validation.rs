//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` carrying
//! `{"field": ..., "code": ...}` details, plus the offending value where one
//! exists.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AssetKind, AssetName, Error, ProfileId, RoundDuration, StartupDraft, StartupFields, StartupId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDuration,
    UnknownAssetKind,
    InvalidAssetName,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDuration => "invalid_duration",
            ErrorCode::UnknownAssetKind => "unknown_asset_kind",
            ErrorCode::InvalidAssetName => "invalid_asset_name",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn rejection(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        rejection(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            Some(value),
        )
    })
}

pub(crate) fn parse_profile_id(value: &str, field: FieldName) -> Result<ProfileId, Error> {
    parse_uuid(value, field).map(ProfileId::from_uuid)
}

pub(crate) fn parse_startup_id(value: &str, field: FieldName) -> Result<StartupId, Error> {
    parse_uuid(value, field).map(StartupId::from_uuid)
}

pub(crate) fn parse_duration(minutes: u32, field: FieldName) -> Result<RoundDuration, Error> {
    RoundDuration::new(minutes).map_err(|err| {
        rejection(
            field,
            err.to_string(),
            ErrorCode::InvalidDuration,
            Some(&minutes.to_string()),
        )
    })
}

pub(crate) fn parse_startup_draft(fields: StartupFields) -> Result<StartupDraft, Error> {
    StartupDraft::new(fields).map_err(|err| {
        rejection(
            FieldName::new(err.field()),
            err.to_string(),
            ErrorCode::MissingField,
            None,
        )
    })
}

pub(crate) fn parse_asset_kind(value: &str) -> Result<AssetKind, Error> {
    value.parse().map_err(|err: crate::domain::UnknownAssetKindError| {
        rejection(
            FieldName::new("kind"),
            err.to_string(),
            ErrorCode::UnknownAssetKind,
            Some(value),
        )
    })
}

pub(crate) fn parse_asset_name(value: &str) -> Result<AssetName, Error> {
    AssetName::parse(value).map_err(|err| {
        rejection(
            FieldName::new("name"),
            err.to_string(),
            ErrorCode::InvalidAssetName,
            Some(value),
        )
    })
}
