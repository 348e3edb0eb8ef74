use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{parse_numeric_amount, PaymentRequest, MAX_DESCRIPTION_CHARS};

const AMOUNT: &str = "amount";
const DESCRIPTION: &str = "description";

/// Fields that survived the type checks, awaiting bound checks.
///
/// `description` length counts Unicode scalar values, not UTF-16 units.
#[derive(Debug, Default, Validate)]
struct PaymentCandidate {
    #[validate(range(exclusive_min = 0.0))]
    amount: Option<f64>,
    #[validate(length(min = 1, max = 500))]
    description: Option<String>,
}

/// Decodes a raw request body into JSON.
///
/// Bodies that are not declared as JSON, and empty bodies, decode to the
/// empty object so they fail on the missing fields rather than on parsing.
pub fn decode_body(bytes: &[u8], is_json: bool) -> Result<Value, Vec<String>> {
    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|_| vec![format!("{} must be valid JSON", quoted("value"))])
}

/// Checks a decoded body against the payment schema.
///
/// Every violation is reported, ordered `amount`, `description`, then any
/// unknown keys in body order.
pub fn check_payment_schema(body: &Value) -> Result<PaymentRequest, Vec<String>> {
    let Some(object) = body.as_object() else {
        return Err(vec![format!("{} must be of type object", quoted("value"))]);
    };

    let mut amount_errors = Vec::new();
    let mut description_errors = Vec::new();
    let mut candidate = PaymentCandidate::default();

    match object.get(AMOUNT) {
        None => amount_errors.push(format!("{} is required", quoted(AMOUNT))),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(amount) => candidate.amount = Some(amount),
            None => amount_errors.push(format!("{} must be a number", quoted(AMOUNT))),
        },
        Some(Value::String(text)) => match parse_numeric_amount(text) {
            Some(amount) => candidate.amount = Some(amount),
            None => amount_errors.push(format!("{} must be a number", quoted(AMOUNT))),
        },
        Some(_) => amount_errors.push(format!("{} must be a number", quoted(AMOUNT))),
    }

    match object.get(DESCRIPTION) {
        None => description_errors.push(format!("{} is required", quoted(DESCRIPTION))),
        Some(Value::String(s)) => candidate.description = Some(s.clone()),
        Some(_) => description_errors.push(format!("{} must be a string", quoted(DESCRIPTION))),
    }

    if let Err(errors) = candidate.validate() {
        let fields = errors.field_errors();
        if fields.contains_key(AMOUNT) {
            amount_errors.push(format!("{} must be a positive number", quoted(AMOUNT)));
        }
        if fields.contains_key(DESCRIPTION) {
            let message = match candidate.description.as_deref() {
                Some("") => format!("{} is not allowed to be empty", quoted(DESCRIPTION)),
                _ => format!(
                    "{} length must be less than or equal to {} characters long",
                    quoted(DESCRIPTION),
                    MAX_DESCRIPTION_CHARS
                ),
            };
            description_errors.push(message);
        }
    }

    let mut errors = amount_errors;
    errors.append(&mut description_errors);
    errors.extend(
        object
            .keys()
            .filter(|key| key.as_str() != AMOUNT && key.as_str() != DESCRIPTION)
            .map(|key| format!("{} is not allowed", quoted(key))),
    );

    match (candidate.amount, candidate.description) {
        (Some(amount), Some(description)) if errors.is_empty() => Ok(PaymentRequest {
            amount,
            description,
        }),
        _ => Err(errors),
    }
}

fn quoted(label: &str) -> String {
    format!("\"{}\"", label)
}
