//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper turns a raw request value into a domain value or an
//! `invalid_request` error whose `details` name the offending field.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{Error, EventId, EventType, Handle, MetricType, ReactionLabel};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidHandle,
    InvalidValue,
    InvalidTimestamp,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidHandle => "invalid_handle",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDate => "invalid_date",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a positive numeric event id from a path segment.
pub(crate) fn parse_event_id(value: &str, field: FieldName) -> Result<EventId, Error> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|raw| EventId::new(raw).ok())
        .ok_or_else(|| {
            field_error(
                field,
                ErrorCode::InvalidId,
                format!("{} must be a positive integer", field.as_str()),
                value,
            )
        })
}

pub(crate) fn parse_handle(value: String, field: FieldName) -> Result<Handle, Error> {
    Handle::new(value.as_str()).map_err(|err| {
        field_error(field, ErrorCode::InvalidHandle, err.to_string(), &value)
    })
}

pub(crate) fn parse_reaction_label(value: String, field: FieldName) -> Result<ReactionLabel, Error> {
    ReactionLabel::new(value.as_str())
        .map_err(|err| field_error(field, ErrorCode::InvalidValue, err.to_string(), &value))
}

pub(crate) fn parse_event_type(value: String, field: FieldName) -> Result<EventType, Error> {
    EventType::new(value.as_str())
        .map_err(|err| field_error(field, ErrorCode::InvalidValue, err.to_string(), &value))
}

pub(crate) fn parse_metric_type(value: &str, field: FieldName) -> Result<MetricType, Error> {
    value.parse::<MetricType>().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidValue,
            format!("{} must be sleep, fitness or stress", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    field_error(
                        field,
                        ErrorCode::InvalidTimestamp,
                        format!("{} must be an RFC 3339 timestamp", field.as_str()),
                        &raw,
                    )
                })
        })
        .transpose()
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                field_error(
                    field,
                    ErrorCode::InvalidDate,
                    format!("{} must be a YYYY-MM-DD date", field.as_str()),
                    &raw,
                )
            })
        })
        .transpose()
}
