use crate::error::Error;
use openapiv3::OpenAPI;
use regex::Regex;

/// Properties that must be booleans in `OpenAPI` 3.0 but are sometimes written as 0/1
const BOOLEAN_PROPERTIES: &[&str] = &[
    "deprecated",
    "required",
    "readOnly",
    "writeOnly",
    "nullable",
    "uniqueItems",
    "allowEmptyValue",
    "explode",
    "allowReserved",
];

/// Preprocesses schema content to fix common compatibility issues
///
/// Numeric boolean values (0/1) are rewritten to `false`/`true` in both YAML
/// (`readOnly: 1`) and JSON (`"readOnly": 1`) notation. Multi-digit numbers are
/// left untouched.
fn preprocess_for_compatibility(content: &str) -> String {
    let alternatives = BOOLEAN_PROPERTIES.join("|");
    let Ok(pattern) = Regex::new(&format!(r#"\b({alternatives})("?\s*:\s*)([01])\b"#)) else {
        return content.to_string();
    };

    pattern
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let value = if &caps[3] == "1" { "true" } else { "false" };
            format!("{}{}{value}", &caps[1], &caps[2])
        })
        .into_owned()
}

/// Parses a schema document, detecting JSON or YAML by its first character
///
/// # Errors
/// Returns `SchemaUnavailable` when the content is neither a valid JSON nor a
/// valid YAML `OpenAPI` 3.0 document.
pub fn parse_openapi(content: &str) -> Result<OpenAPI, Error> {
    let preprocessed = preprocess_for_compatibility(content);

    if content.trim_start().starts_with('{') {
        parse_json_with_fallback(&preprocessed)
    } else {
        parse_yaml_with_fallback(&preprocessed)
    }
}

/// Parse JSON content with YAML fallback
fn parse_json_with_fallback(content: &str) -> Result<OpenAPI, Error> {
    match serde_json::from_str::<OpenAPI>(content) {
        Ok(spec) => Ok(spec),
        Err(json_err) => {
            if let Ok(spec) = serde_yaml::from_str::<OpenAPI>(content) {
                return Ok(spec);
            }

            Err(Error::schema_unavailable(format!(
                "failed to parse schema document as JSON: {json_err}"
            )))
        }
    }
}

/// Parse YAML content with JSON fallback
fn parse_yaml_with_fallback(content: &str) -> Result<OpenAPI, Error> {
    match serde_yaml::from_str::<OpenAPI>(content) {
        Ok(spec) => Ok(spec),
        Err(yaml_err) => {
            if let Ok(spec) = serde_json::from_str::<OpenAPI>(content) {
                return Ok(spec);
            }

            Err(Error::schema_unavailable(format!(
                "failed to parse schema document as YAML: {yaml_err}"
            )))
        }
    }
}
