//! # dynform-core
//!
//! Declarative form schemas and server-side submission validation.
//!
//! A form is described as a list of categories, each holding parameters.
//! Every parameter carries a UI input kind, a label, a `required` flag and a
//! typed content block (`enum`, `dependent_enum`, `string`, `number`,
//! `integer`, `date`, `datetime`, `time`, `number_range`, `boolean`).
//!
//! ```
//! use dynform_core::{validate, Schema, Submission};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(json!({
//!     "paramCategories": [{
//!         "name": "account",
//!         "params": [{
//!             "name": "email",
//!             "type": "text_field",
//!             "description": "Email Address",
//!             "required": true,
//!             "content": {"type": "string", "pattern": "^[^@]+@[^@]+\\.[^@]+$"}
//!         }]
//!     }]
//! }))
//! .unwrap();
//!
//! let result = validate(&schema, &Submission::from_data(json!({"email": "nope"})));
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, "Email Address has invalid format");
//! ```

pub mod coerce;
pub mod engine;
pub mod error;
pub mod model;
pub mod submission;

pub use engine::{validate, validate_data, ValidationReport, Validator};
pub use error::{Result, SchemaError};
pub use model::{
    BooleanContent, Category, Content, DateContent, DateKind, DeclaredRule, DependentEnumContent,
    EnumContent, EnumOption, Extensions, InputKind, Layout, NumberContent, NumberKind,
    OptionResolution, Parameter, RangeContent, Schema, StringContent, UiHints,
    VisibilityCondition,
};
pub use submission::{ErrorCode, Submission, ValidationError, ValidationResult};
