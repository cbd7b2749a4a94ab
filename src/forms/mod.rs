use validator::ValidationErrors;

pub mod auth;
pub mod checkout;
pub mod contact;
pub mod products;

/// Comma-separated, sorted list of the fields that failed validation.
pub(crate) fn invalid_fields(errors: &ValidationErrors) -> String {
    let mut fields: Vec<&str> = errors.errors().keys().map(|field| field.as_ref()).collect();
    fields.sort_unstable();
    fields.join(", ")
}

/// Collapse whitespace runs into single spaces and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize each line, trimming blank lines at both ends and collapsing
/// consecutive blank lines inside the text.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut previous_empty = false;

    for line in input.lines().map(sanitize_inline_text) {
        if line.is_empty() {
            if previous_empty || result.is_empty() {
                continue;
            }
            previous_empty = true;
        } else {
            previous_empty = false;
        }
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
