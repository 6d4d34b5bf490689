//! Leaf schemas
//!
//! Leaves narrow a single JSON value to a primitive and attach domain
//! predicates to it through immutable builder methods.

pub mod boolean;
pub mod enumeration;
pub mod number;
pub mod special;
pub mod string;
pub mod stringbool;

pub use boolean::{boolean, BooleanSchema};
pub use enumeration::{enumeration, EnumSchema};
pub use number::{number, NumberSchema};
pub use special::{any, never, unknown, AnySchema, NeverSchema, UnknownSchema};
pub use string::{string, StringSchema};
pub use stringbool::{stringbool, stringbool_with, CaseSensitivity, StringBoolOptions, StringBoolSchema};

