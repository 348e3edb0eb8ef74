pub mod schema;

pub use schema::{check_payment_schema, decode_body};
