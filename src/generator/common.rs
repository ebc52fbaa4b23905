//! Common utilities for certificate generation.

use chrono::{Local, NaiveDate};

/// Format a date the way it is printed on certificates (e.g., "October 16, 2026").
pub fn format_certificate_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn today() -> String {
    format_certificate_date(Local::now().date_naive())
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Replace every `{{key}}` token with the HTML-escaped value.
pub fn populate_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |html, (key, value)| {
            html.replace(&format!("{{{{{}}}}}", key), &escape_html(value))
        })
}

/// Lower-case a name into a filename slug. Whitespace runs become `_`,
/// anything that is not ASCII alphanumeric is dropped.
pub fn slugify_name(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut pending_separator = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            pending_separator = false;
            result.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '_' {
            pending_separator = true;
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }
    result
}

/// `certificate_<slug>_<timestamp>`
pub fn certificate_filename(name: &str, timestamp_millis: i64) -> String {
    format!("certificate_{}_{}", slugify_name(name, "recipient"), timestamp_millis)
}
