pub mod payment;

pub use payment::{
    parse_numeric_amount, IdempotencyKey, PaymentRequest, ValidatedPayment, IDEMPOTENCY_KEY_FIELD,
    IDEMPOTENCY_KEY_HEADER, MAX_DESCRIPTION_CHARS,
};
