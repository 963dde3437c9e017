//! Request extractors and field-error collection.
//!
//! Framework rejections are turned into the API's own error envelope:
//! unreadable bodies become `VALIDATION_ERROR` on field `body`, unparseable
//! query strings become `INVALID_PARAMETER`. Body fields carrying the wrong
//! JSON type are reported per field alongside every other field error.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::{AppError, FieldError};
use std::collections::HashMap;
use validator::ValidationErrors;

/// JSON type a body field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    String,
    Number,
    /// An object whose members are all strings.
    TextObject,
}

impl JsonKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::TextObject => value.as_object().is_some_and(|members| {
                members
                    .values()
                    .all(|member| member.is_string() || member.is_null())
            }),
        }
    }
}

/// A request body read through [`ApiJson`].
pub trait JsonBody: DeserializeOwned {
    /// Body field name, expected JSON kind, and the message for a mismatch.
    const FIELDS: &'static [(&'static str, JsonKind, &'static str)];

    /// Receives the type mismatches found while reading the body. The
    /// offending fields deserialize as absent.
    fn set_type_errors(&mut self, errors: FieldErrors);
}

/// JSON body extractor. An empty body reads as `{}`, so a missing body
/// reports every required field instead of a parse failure.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: JsonBody,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            AppError::validation(vec![FieldError::new("body", rejection.body_text())])
        })?;

        parse_body(&bytes).map(ApiJson)
    }
}

fn body_error(message: impl Into<String>) -> AppError {
    AppError::validation(vec![FieldError::new("body", message)])
}

pub fn parse_body<T: JsonBody>(bytes: &[u8]) -> Result<T, AppError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    let mut value: Value = serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "Rejected request body");
        body_error(format!("Request body is not valid JSON: {err}"))
    })?;
    let Some(members) = value.as_object_mut() else {
        return Err(body_error("Request body must be a JSON object"));
    };

    let mut type_errors = FieldErrors::new();
    for (field, kind, message) in T::FIELDS {
        let mismatched = members
            .get(*field)
            .is_some_and(|member| !member.is_null() && !kind.accepts(member));
        if mismatched {
            members.remove(*field);
            type_errors.push(*field, *message);
        }
    }

    let mut body: T = serde_json::from_value(value).map_err(|err| {
        tracing::debug!(error = %err, "Rejected request body");
        body_error(format!("Request body could not be read: {err}"))
    })?;
    body.set_type_errors(type_errors);
    Ok(body)
}

/// Raw query parameters, validated later by the collection pipeline.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::invalid_parameter(rejection.body_text()))?;
        Ok(QueryParams(params))
    }
}

/// `from_account_id` -> `fromAccountId`.
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Accumulates field errors from derived rules and hand-written checks, then
/// reports them in body field order. Each field keeps only the first error
/// recorded for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the failures of a derived `validate()` call.
    pub fn merge_derived(&mut self, result: Result<(), ValidationErrors>) {
        let Err(errors) = result else {
            return;
        };
        for (field, failures) in errors.field_errors() {
            let field: &str = field.as_ref();
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", camel_case(field)));
                self.push(camel_case(field), message);
            }
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if !self.has(&field) {
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// `Ok` when nothing was collected, otherwise one `VALIDATION_ERROR`
    /// with details sorted by position in `field_order`.
    pub fn finish(mut self, field_order: &[&str]) -> Result<(), AppError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        let position = |field: &str| {
            field_order
                .iter()
                .position(|candidate| *candidate == field)
                .unwrap_or(field_order.len())
        };
        self.errors.sort_by_key(|error| position(&error.field));

        Err(AppError::validation(self.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[validate(required(message = "Name is required"))]
        name: Option<String>,
        #[validate(length(min = 1, max = 5, message = "Bank name is too long"))]
        bank_name: Option<String>,
        amount: Option<f64>,
        #[serde(skip)]
        type_errors: FieldErrors,
    }

    impl JsonBody for Sample {
        const FIELDS: &'static [(&'static str, JsonKind, &'static str)] = &[
            ("name", JsonKind::String, "Name must be a string"),
            ("bankName", JsonKind::String, "Bank name must be a string"),
            ("amount", JsonKind::Number, "Amount must be a number"),
        ];

        fn set_type_errors(&mut self, errors: FieldErrors) {
            self.type_errors = errors;
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::ValidationError { details, .. } => {
                details.into_iter().map(|detail| detail.field).collect()
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case("from_account_id", "fromAccountId")]
    #[case("amount", "amount")]
    #[case("to_beneficiary_id", "toBeneficiaryId")]
    fn converts_to_camel_case(#[case] field: &str, #[case] expected: &str) {
        assert_eq!(camel_case(field), expected);
    }

    #[test]
    fn orders_errors_by_body_field_order() {
        let sample = Sample {
            name: None,
            bank_name: Some("Barclays".to_string()),
            amount: None,
            type_errors: FieldErrors::new(),
        };
        let mut errors = FieldErrors::new();
        errors.merge_derived(sample.validate());
        errors.push("amount", "Amount is required");

        let err = errors.finish(&["amount", "bankName", "name"]).unwrap_err();
        match err {
            AppError::ValidationError { details, .. } => {
                let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, ["amount", "bankName", "name"]);
                assert_eq!(details[2].message, "Name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_collected_is_ok() {
        assert!(FieldErrors::new().finish(&[]).is_ok());
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        let sample: Sample = parse_body(b"").unwrap();
        assert!(sample.name.is_none());
    }

    #[test]
    fn malformed_body_is_a_validation_error_on_body() {
        let err = parse_body::<Sample>(b"{not json").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        match err {
            AppError::ValidationError { details, .. } => assert_eq!(details[0].field, "body"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.push("amount", "Amount must be a number");
        errors.push("amount", "Amount is required");
        assert!(errors.has("amount"));

        match errors.finish(&["amount"]).unwrap_err() {
            AppError::ValidationError { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].message, "Amount must be a number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrongly_typed_fields_are_collected_per_field() {
        let mut sample: Sample =
            parse_body(br#"{"name": 42, "bankName": "Barclays", "amount": "100"}"#).unwrap();
        assert!(sample.name.is_none());
        assert!(sample.amount.is_none());

        let mut errors = std::mem::take(&mut sample.type_errors);
        errors.merge_derived(sample.validate());
        assert_eq!(
            fields(errors.finish(&["name", "bankName", "amount"]).unwrap_err()),
            ["name", "bankName", "amount"]
        );
    }

    #[test]
    fn null_fields_read_as_absent() {
        let sample: Sample = parse_body(br#"{"name": null, "amount": null}"#).unwrap();
        assert!(sample.name.is_none());
        assert_eq!(sample.type_errors, FieldErrors::new());
    }

    #[rstest]
    #[case(&b"[1, 2]"[..])]
    #[case(&b"\"text\""[..])]
    fn non_object_body_is_a_validation_error_on_body(#[case] body: &[u8]) {
        assert_eq!(fields(parse_body::<Sample>(body).unwrap_err()), ["body"]);
    }

    #[rstest]
    #[case(json!({"street": "1 Main St", "city": null}), true)]
    #[case(json!({"city": 5}), false)]
    #[case(json!("London"), false)]
    fn text_object_accepts_only_string_members(#[case] value: Value, #[case] accepted: bool) {
        assert_eq!(JsonKind::TextObject.accepts(&value), accepted);
    }
}
