//! Composable Value Schemas
//!
//! Declarative, immutable schemas for validating and transforming untyped
//! configuration values (`serde_json::Value`).
//!
//! ## Features
//!
//! - **Leaf Schemas**: strings, numbers, booleans, enumerations and
//!   string-to-boolean coercion with chainable domain rules
//! - **Modifiers**: `optional`, `nullable` and `nullish` wrappers
//! - **Object Engine**: strict / strip / passthrough / catchall policies for
//!   undeclared keys, with per-key failure aggregation
//! - **Schema Algebra**: `extend`, `safe_extend`, `pick`, `omit`, `keyof`
//! - **Structured Failures**: nested [`Issue`] trees rendered to text at the
//!   boundary or flattened into [`Violation`] records
//! - **Typed Output**: `parse_into` deserializes validated output with serde
//!
//! ## Architecture
//!
//! 1. **Check Pipeline** (`check`): ordered, short-circuiting validation steps.
//!
//! 2. **Schema Base** (`base`): type check, base checks, body checks and
//!    transform shared by every schema, plus the object-safe [`Schema`] trait.
//!
//! 3. **Leaves** (`leaf/`): primitive schemas and their builder methods.
//!
//! 4. **Modifiers** (`modifier`): sentinel short-circuits around a schema.
//!
//! 5. **Object Engine** (`object/`): shape resolution and unknown-key policy.
//!
//! ## Example
//!
//! ```rust
//! use llm_config_schema::{number, object, string, stringbool, Schema, SchemaExt, Shape};
//! use serde_json::json;
//!
//! let schema = object(
//!     Shape::new()
//!         .field("host", string().min(1))
//!         .field("port", number().gte(1.0).lte(65535.0))
//!         .field("tls", stringbool().optional()),
//! );
//!
//! let config = schema
//!     .parse(&json!({ "host": "localhost", "port": 8080, "tls": "yes", "extra": 1 }))
//!     .unwrap();
//! assert_eq!(config, json!({ "host": "localhost", "port": 8080, "tls": true }));
//!
//! let err = schema.safe_parse(&json!({ "host": "", "port": 0 })).unwrap_err();
//! assert_eq!(err.violations().len(), 2);
//! ```

pub mod base;
pub mod check;
pub mod error;
pub mod issue;
pub mod leaf;
pub mod modifier;
pub mod object;

pub use base::{Schema, SchemaBase, SchemaExt, SchemaKind};
pub use check::{Check, CheckResult, Pipeline};
pub use error::{ParseError, Result, SchemaError};
pub use issue::{value_kind, Issue, KeyFailure, Violation};
pub use leaf::{
    any, boolean, enumeration, never, number, string, stringbool, stringbool_with, unknown,
    AnySchema, BooleanSchema, CaseSensitivity, EnumSchema, NeverSchema, NumberSchema,
    StringBoolOptions, StringBoolSchema, StringSchema, UnknownSchema,
};
pub use modifier::{nullable, nullish, optional, ModifierSchema, Sentinel};
pub use object::{loose_object, object, strict_object, ObjectSchema, Shape, UnknownKeys};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
