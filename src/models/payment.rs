use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Header carrying the client-supplied idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

/// Body field the gate writes the idempotency key into.
pub const IDEMPOTENCY_KEY_FIELD: &str = "idempotencyKey";

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Parses a decimal string as an amount.
///
/// Accepts an optional sign, digits with an optional fraction and an optional
/// exponent, surrounded by whitespace. Infinities and NaN are not numbers.
pub fn parse_numeric_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Reads an amount sent either as a JSON number or as a numeric string.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(amount) => Ok(amount),
        Amount::Text(text) => parse_numeric_amount(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", text))),
    }
}

/// A payment submission that passed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Strictly positive amount.
    pub amount: f64,
    /// Between 1 and 500 characters.
    pub description: String,
}

/// Opaque client token used by downstream handlers for deduplication.
///
/// Only presence is enforced here. The key is never logged verbatim; use
/// [`IdempotencyKey::fingerprint`] instead.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Wraps a header value. Returns `None` for an empty value.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 hex prefix, safe for log output.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdempotencyKey").field(&self.fingerprint()).finish()
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What the gate hands downstream: the typed request plus its key.
///
/// Inserted into the request extensions next to the rewritten JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPayment {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub description: String,
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: IdempotencyKey,
}

impl ValidatedPayment {
    pub fn new(request: PaymentRequest, idempotency_key: IdempotencyKey) -> Self {
        Self {
            amount: request.amount,
            description: request.description,
            idempotency_key,
        }
    }
}
