pub mod error;
pub mod json;
pub mod record;
pub mod responses;


pub use error::{AreaCheckError, Result};
pub use json::{decode_flat, encode, FlatMap, JsonMap, JsonNumber, JsonValue};
pub use record::EvaluationRecord;
pub use responses::{check_envelope, cleared_envelope, error_envelope, Reply};
