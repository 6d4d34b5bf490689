//! String-to-boolean schema
//!
//! Accepts a string drawn from configurable truthy and falsy lists and
//! outputs the matching boolean. Options are plain serde data, so they can
//! be loaded from the same configuration files as everything else.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::leaf::string::expect_string;

fn default_truthy() -> Vec<String> {
    ["true", "1", "yes", "on", "y", "enabled"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_falsy() -> Vec<String> {
    ["false", "0", "no", "off", "n", "disabled"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// How input strings are compared against the option lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

/// Options for [`stringbool_with`]
///
/// [`StringBoolOptions::default`] carries the stock word lists. When options
/// are deserialized, a list left out is empty and `case` is insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringBoolOptions {
    #[serde(default)]
    pub truthy: Vec<String>,
    #[serde(default)]
    pub falsy: Vec<String>,
    #[serde(default)]
    pub case: CaseSensitivity,
}

impl Default for StringBoolOptions {
    fn default() -> Self {
        Self {
            truthy: default_truthy(),
            falsy: default_falsy(),
            case: CaseSensitivity::default(),
        }
    }
}

impl StringBoolOptions {
    /// Replace the truthy list
    pub fn truthy<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.truthy = values.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the falsy list
    pub fn falsy<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.falsy = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set case sensitivity
    pub fn case(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }

    fn normalize(&self, s: &str) -> String {
        match self.case {
            CaseSensitivity::Sensitive => s.to_string(),
            CaseSensitivity::Insensitive => s.to_lowercase(),
        }
    }

    /// Lists as compared at parse time
    fn normalized(&self) -> Self {
        Self {
            truthy: self.truthy.iter().map(|s| self.normalize(s)).collect(),
            falsy: self.falsy.iter().map(|s| self.normalize(s)).collect(),
            case: self.case,
        }
    }
}

/// Schema turning a recognised string into a boolean
#[derive(Debug, Clone)]
pub struct StringBoolSchema {
    options: Arc<StringBoolOptions>,
    base: SchemaBase<String, bool>,
}

impl StringBoolSchema {
    /// Create a schema from options
    pub fn new(options: StringBoolOptions) -> Self {
        let options = Arc::new(options.normalized());

        let accepted: Vec<&String> = options.truthy.iter().chain(options.falsy.iter()).collect();
        let message = format!(
            "input must be one of: {}",
            accepted
                .iter()
                .map(|v| format!("\"{}\"", v))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let gate = Arc::clone(&options);
        let lookup = Arc::clone(&options);
        let base = SchemaBase::with_transform(SchemaKind::StringBool, expect_string, move |s: String| {
            lookup.truthy.contains(&lookup.normalize(&s))
        })
        .with_base_check(Check::predicate(
            move |s: &String| {
                let s = gate.normalize(s);
                gate.truthy.contains(&s) || gate.falsy.contains(&s)
            },
            message,
        ));

        Self { options, base }
    }

    /// Options in effect, with lists already case-normalized
    pub fn options(&self) -> &StringBoolOptions {
        &self.options
    }
}

impl Schema for StringBoolSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::StringBool
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input).map(|b| Some(Value::Bool(b)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Only schemas with identical options combine
    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        let other = other.as_any().downcast_ref::<Self>()?;
        if self.options != other.options {
            return None;
        }
        Some(Arc::new(Self {
            options: Arc::clone(&self.options),
            base: self.base.concat(&other.base),
        }))
    }
}

/// Create a string-to-boolean schema with the default options
pub fn stringbool() -> StringBoolSchema {
    StringBoolSchema::new(StringBoolOptions::default())
}

/// Create a string-to-boolean schema with custom options
pub fn stringbool_with(options: StringBoolOptions) -> StringBoolSchema {
    StringBoolSchema::new(options)
}
