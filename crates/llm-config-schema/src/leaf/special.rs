//! Schemas with no domain rules: any, unknown, never

use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::issue::Issue;

/// Accepts every input, including the missing sentinel
#[derive(Debug, Clone)]
pub struct AnySchema {
    base: SchemaBase<Option<Value>>,
}

/// Accepts every input, including the missing sentinel
///
/// Behaves exactly like [`AnySchema`]; the distinction only documents intent.
#[derive(Debug, Clone)]
pub struct UnknownSchema {
    base: SchemaBase<Option<Value>>,
}

/// Rejects every input
#[derive(Debug, Clone)]
pub struct NeverSchema {
    base: SchemaBase<Option<Value>>,
}

macro_rules! impl_special {
    ($ty:ident, $kind:expr) => {
        impl Schema for $ty {
            fn kind(&self) -> SchemaKind {
                $kind
            }

            fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
                self.base.run(input)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
                other.as_any().downcast_ref::<Self>()?;
                Some(Arc::new(self.clone()))
            }
        }
    };
}

impl_special!(AnySchema, SchemaKind::Any);
impl_special!(UnknownSchema, SchemaKind::Unknown);
impl_special!(NeverSchema, SchemaKind::Never);

/// Create a schema accepting anything
pub fn any() -> AnySchema {
    AnySchema {
        base: SchemaBase::untyped(SchemaKind::Any),
    }
}

/// Create a schema accepting anything
pub fn unknown() -> UnknownSchema {
    UnknownSchema {
        base: SchemaBase::untyped(SchemaKind::Unknown),
    }
}

/// Create a schema rejecting everything
pub fn never() -> NeverSchema {
    NeverSchema {
        base: SchemaBase::untyped(SchemaKind::Never)
            .with_base_check(Check::new(|_: Option<Value>| Err(Issue::rule("input can never pass")))),
    }
}
