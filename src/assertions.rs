//! HTTP response assertions.
//!
//! Value-level assertion helpers used by the conformance checker. Unlike
//! plain `assert!`, these return [`Assertion`] errors so a failed condition
//! becomes a reportable check result instead of a panic.

use std::collections::BTreeSet;

use http::header::{HeaderMap, CONTENT_TYPE};
use http::StatusCode;
use mime::Mime;
use serde_json::Value;

use crate::error::{json_type_name, Assertion};

/// The exact media type every successful response must carry.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Asserts that the response has the expected status code.
pub fn assert_status(actual: StatusCode, expected: StatusCode) -> Result<(), Assertion> {
    if actual == expected {
        Ok(())
    } else {
        Err(Assertion::Status { expected, actual })
    }
}

/// Returns true when `value` is the JSON media type with UTF-8 charset.
pub fn is_json_utf8(value: &str) -> bool {
    value
        .parse::<Mime>()
        .map(|mime| {
            mime.essence_str() == mime::APPLICATION_JSON.essence_str()
                && mime.get_param(mime::CHARSET) == Some(mime::UTF_8)
        })
        .unwrap_or(false)
}

/// Asserts that the Content-Type header is `application/json; charset=utf-8`.
pub fn assert_json_content_type(headers: &HeaderMap) -> Result<(), Assertion> {
    let actual = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match actual {
        Some(value) if is_json_utf8(value) => Ok(()),
        Some(value) => Err(Assertion::ContentType {
            expected: JSON_UTF8.to_string(),
            actual: value.to_string(),
        }),
        None => Err(Assertion::ContentType {
            expected: JSON_UTF8.to_string(),
            actual: "<missing>".to_string(),
        }),
    }
}

/// Asserts that `body` is a JSON object containing every expected field.
pub fn assert_object_fields(body: &Value, fields: &BTreeSet<String>) -> Result<(), Assertion> {
    let object = body.as_object().ok_or(Assertion::Shape {
        expected: "object",
        actual: json_type_name(body),
    })?;

    for field in fields {
        if !object.contains_key(field) {
            return Err(Assertion::MissingField {
                field: field.clone(),
                context: "response object",
            });
        }
    }

    Ok(())
}

/// Asserts that `body` is a JSON array whose element at `index` is an
/// object containing every expected field.
pub fn assert_array_element_fields(
    body: &Value,
    index: usize,
    fields: &BTreeSet<String>,
) -> Result<(), Assertion> {
    let array = body.as_array().ok_or(Assertion::Shape {
        expected: "array",
        actual: json_type_name(body),
    })?;

    let element = array.get(index).ok_or(Assertion::ArrayTooShort {
        index,
        len: array.len(),
    })?;

    assert_object_fields(element, fields)
}

/// Asserts that `body` is an object whose `field` equals `expected`.
pub fn assert_field_value(body: &Value, field: &str, expected: &Value) -> Result<(), Assertion> {
    let actual = body.get(field).ok_or(Assertion::MissingField {
        field: field.to_string(),
        context: "response object",
    })?;

    if actual == expected {
        Ok(())
    } else {
        Err(Assertion::FieldValue {
            field: field.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}
