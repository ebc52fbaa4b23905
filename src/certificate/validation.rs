//! Input validation for certificate requests.
//!
//! Validation works on the raw JSON body so every problem can be reported at
//! once, in field order, instead of failing on the first bad value.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::models::{CertificateRequest, ResendRequest};

pub const REQUIRED_FIELDS: [&str; 5] = ["name", "email", "gstNumber", "businessName", "businessAddress"];
pub const RESEND_REQUIRED_FIELDS: [&str; 3] = ["name", "email", "filename"];

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref GST_REGEX: Regex =
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z{1}[0-9A-Z]{1}$").unwrap();
    static ref FILENAME_REGEX: Regex = Regex::new(r"^certificate_[a-z0-9_]+_[0-9]+$").unwrap();
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(format!("{} is required", field))
    }

    pub fn not_a_string(field: &str) -> Self {
        Self::new(format!("{} must be a string", field))
    }

    pub fn invalid_email() -> Self {
        Self::new("Invalid email format")
    }

    pub fn invalid_gst_number() -> Self {
        Self::new("Invalid GST number format")
    }

    pub fn invalid_filename() -> Self {
        Self::new("Invalid certificate filename")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_outcome(self) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: self.errors.is_empty(),
            errors: self.messages(),
        }
    }
}

/// Result of validating a request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Pattern check only, the trailing checksum character is not verified.
pub fn is_valid_gst_number(gst: &str) -> bool {
    GST_REGEX.is_match(gst)
}

pub fn is_valid_certificate_filename(filename: &str) -> bool {
    FILENAME_REGEX.is_match(filename)
}

/// Check that `field` holds a non-blank string and return it trimmed.
pub fn validate_required<'a>(
    data: &'a Value,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match data.get(field) {
        None | Some(Value::Null) => {
            errors.add(ValidationError::required(field));
            None
        }
        Some(Value::String(value)) if value.trim().is_empty() => {
            errors.add(ValidationError::required(field));
            None
        }
        Some(Value::String(value)) => Some(value.trim()),
        Some(_) => {
            errors.add(ValidationError::not_a_string(field));
            None
        }
    }
}

fn validate_fields<'a>(
    data: &'a Value,
    fields: &[&str],
    errors: &mut ValidationErrors,
) -> Vec<Option<&'a str>> {
    fields
        .iter()
        .map(|field| validate_required(data, field, errors))
        .collect()
}

/// Validate a certificate generation body.
pub fn validate_certificate_data(data: &Value) -> ValidationOutcome {
    check_certificate_data(data).0.into_outcome()
}

/// Validate a resend body.
pub fn validate_resend_data(data: &Value) -> ValidationOutcome {
    check_resend_data(data).0.into_outcome()
}

fn check_certificate_data(data: &Value) -> (ValidationErrors, Option<CertificateRequest>) {
    let mut errors = ValidationErrors::new();
    let values = validate_fields(data, &REQUIRED_FIELDS, &mut errors);

    if let Some(email) = values[1] {
        if !is_valid_email(email) {
            errors.add(ValidationError::invalid_email());
        }
    }
    if let Some(gst) = values[2] {
        if !is_valid_gst_number(gst) {
            errors.add(ValidationError::invalid_gst_number());
        }
    }

    if !errors.is_empty() {
        return (errors, None);
    }

    let owned: Vec<String> = values.into_iter().flatten().map(str::to_string).collect();
    let [name, email, gst_number, business_name, business_address]: [String; 5] =
        match owned.try_into() {
            Ok(fields) => fields,
            Err(_) => return (errors, None),
        };

    let request = CertificateRequest {
        name,
        email,
        gst_number,
        business_name,
        business_address,
    };
    (errors, Some(request))
}

fn check_resend_data(data: &Value) -> (ValidationErrors, Option<ResendRequest>) {
    let mut errors = ValidationErrors::new();
    let values = validate_fields(data, &RESEND_REQUIRED_FIELDS, &mut errors);

    if let Some(email) = values[1] {
        if !is_valid_email(email) {
            errors.add(ValidationError::invalid_email());
        }
    }
    if let Some(filename) = values[2] {
        if !is_valid_certificate_filename(filename) {
            errors.add(ValidationError::invalid_filename());
        }
    }

    match (errors.is_empty(), values[0], values[1], values[2]) {
        (true, Some(name), Some(email), Some(filename)) => {
            let request = ResendRequest {
                name: name.to_string(),
                email: email.to_string(),
                filename: filename.to_string(),
            };
            (errors, Some(request))
        }
        _ => (errors, None),
    }
}

impl CertificateRequest {
    /// Validate a raw body and convert it into a typed request.
    pub fn from_value(data: &Value) -> Result<Self, ValidationOutcome> {
        match check_certificate_data(data) {
            (errors, Some(request)) if errors.is_empty() => Ok(request),
            (errors, _) => Err(errors.into_outcome()),
        }
    }
}

impl ResendRequest {
    pub fn from_value(data: &Value) -> Result<Self, ValidationOutcome> {
        match check_resend_data(data) {
            (errors, Some(request)) if errors.is_empty() => Ok(request),
            (errors, _) => Err(errors.into_outcome()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("jane x@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("jane@@x.com"));
    }

    #[test]
    fn test_gst_shapes() {
        assert!(is_valid_gst_number("27AAAAA0000A1Z5"));
        assert!(is_valid_gst_number("29ABCDE1234F1ZW"));
        // 13th character may not be zero
        assert!(!is_valid_gst_number("27AAAAA0000A0Z5"));
        assert!(!is_valid_gst_number("27aaaaa0000a1z5"));
        assert!(!is_valid_gst_number("27AAAAA0000A1Y5"));
        assert!(!is_valid_gst_number("27AAAAA0000A1Z"));
        assert!(!is_valid_gst_number("27AAAAA0000A1Z55"));
    }

    #[test]
    fn test_filename_shapes() {
        assert!(is_valid_certificate_filename("certificate_jane_doe_1760572800000"));
        assert!(!is_valid_certificate_filename("certificate_jane_doe_"));
        assert!(!is_valid_certificate_filename("../certificate_jane_doe_1"));
        assert!(!is_valid_certificate_filename("certificate_Jane_1"));
    }

    #[test]
    fn test_validate_required_trims() {
        let data = json!({ "name": "  Jane  ", "email": "   ", "gstNumber": 42 });
        let mut errors = ValidationErrors::new();
        assert_eq!(validate_required(&data, "name", &mut errors), Some("Jane"));
        assert_eq!(validate_required(&data, "email", &mut errors), None);
        assert_eq!(validate_required(&data, "gstNumber", &mut errors), None);
        assert_eq!(validate_required(&data, "businessName", &mut errors), None);
        assert_eq!(
            errors.messages(),
            vec![
                "email is required",
                "gstNumber must be a string",
                "businessName is required"
            ]
        );
    }

    #[test]
    fn test_from_value_builds_trimmed_request() {
        let data = json!({
            "name": " Jane Doe ",
            "email": "jane@x.com",
            "gstNumber": "27AAAAA0000A1Z5",
            "businessName": "Acme",
            "businessAddress": "1 Main St"
        });
        let request = CertificateRequest::from_value(&data).unwrap();
        assert_eq!(request.name, "Jane Doe");
        assert_eq!(request.gst_number, "27AAAAA0000A1Z5");
        assert_eq!(request.business_address, "1 Main St");
    }

    #[test]
    fn test_formats_checked_on_trimmed_values() {
        let data = json!({
            "name": "Jane Doe",
            "email": " jane@x.com ",
            "gstNumber": " 27AAAAA0000A1Z5\n",
            "businessName": "Acme",
            "businessAddress": "1 Main St"
        });
        let request = CertificateRequest::from_value(&data).unwrap();
        assert_eq!(request.email, "jane@x.com");
        assert_eq!(request.gst_number, "27AAAAA0000A1Z5");

        let outcome = validate_certificate_data(&json!({ "email": " jane @x.com " }));
        assert!(outcome.errors.contains(&"Invalid email format".to_string()));
    }

    #[test]
    fn test_resend_from_value() {
        let data = json!({
            "name": "Jane Doe",
            "email": "jane@x.com",
            "filename": "certificate_jane_doe_1760572800000"
        });
        let request = ResendRequest::from_value(&data).unwrap();
        assert_eq!(request.filename, "certificate_jane_doe_1760572800000");

        let outcome = ResendRequest::from_value(&json!({ "filename": "../../etc/passwd" })).unwrap_err();
        assert_eq!(
            outcome.errors,
            vec!["name is required", "email is required", "Invalid certificate filename"]
        );
    }
}
