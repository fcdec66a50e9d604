pub mod config;
pub mod defaults;
pub mod error;
pub mod field;
pub mod schema;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use defaults::{create_default, generate_namespace_id};
pub use error::{FieldError, SchemaError};
pub use field::{FieldPath, FieldValue};
pub use types::*;
pub use validation::{validate, ValidationErrors};
