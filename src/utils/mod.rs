pub mod file_magic;
pub mod sql;
pub mod validate;

pub use file_magic::validate_magic_bytes;
pub use sql::{quote_identifier, quote_literal};
pub use validate::{validate_email, validate_session_date};
