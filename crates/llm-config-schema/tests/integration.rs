//! Integration tests for the schema engine
//!
//! Tests end-to-end behaviour of:
//! - Object unknown-key policies and failure aggregation
//! - Modifiers and the missing sentinel
//! - Schema algebra (extend, safe_extend, pick, omit, keyof)
//! - String-to-boolean options loaded from configuration
//! - Typed output via serde

use llm_config_schema::{
    enumeration, loose_object, nullable, nullish, number, object, optional, strict_object,
    string, stringbool, stringbool_with, Issue, ParseError, Schema, SchemaError, SchemaExt,
    SchemaKind, Shape, StringBoolOptions,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn hello_shape() -> Shape {
    Shape::new().field("hello", string())
}

#[test]
fn test_unknown_key_policies() {
    init_tracing();
    let input = json!({ "hello": "world", "bye": "x" });

    assert_eq!(
        object(hello_shape()).parse(&input).unwrap(),
        json!({ "hello": "world" })
    );

    let err = strict_object(hello_shape()).safe_parse(&input).unwrap_err();
    assert!(err.to_string().contains("\"bye\""));

    assert_eq!(loose_object(hello_shape()).parse(&input).unwrap(), input);
}

#[test]
fn test_catchall_policy() {
    init_tracing();
    let schema = object(hello_shape()).catchall(number());

    assert_eq!(
        schema.parse(&json!({ "hello": "x", "extra": 42 })).unwrap(),
        json!({ "hello": "x", "extra": 42 })
    );

    let err = schema
        .safe_parse(&json!({ "hello": "x", "extra": "notanum" }))
        .unwrap_err();
    assert!(matches!(err, Issue::InvalidCatchall { .. }));
    assert!(err.to_string().contains("\"extra\""));
}

#[test]
fn test_missing_required_key() {
    init_tracing();
    let err = object(hello_shape()).safe_parse(&json!({})).unwrap_err();
    assert_eq!(err.to_string(), r#"object is missing keys: "hello""#);
}

#[test]
fn test_modifier_sentinels() {
    assert_eq!(optional(string()).parse_missing().unwrap(), None);
    assert!(optional(string()).safe_parse(&Value::Null).is_err());
    assert_eq!(nullish(string()).parse(&Value::Null).unwrap(), Value::Null);
    assert_eq!(nullish(string()).parse_missing().unwrap(), None);
    assert_eq!(nullable(string()).parse(&Value::Null).unwrap(), Value::Null);
    assert!(nullable(string()).parse_missing().is_err());
}

#[test]
fn test_enum_exclude_extract() {
    let abc = enumeration(["a", "b", "c"]);

    let excluded = abc.exclude(["a"]);
    assert!(excluded.safe_parse(&json!("a")).is_err());
    assert!(excluded.safe_parse(&json!("b")).is_ok());
    assert!(excluded.safe_parse(&json!("c")).is_ok());

    let extracted = abc.extract(["a", "b"]);
    assert!(extracted.safe_parse(&json!("a")).is_ok());
    assert!(extracted.safe_parse(&json!("b")).is_ok());
    assert!(extracted.safe_parse(&json!("c")).is_err());
}

#[test]
fn test_safe_extend_type_mismatch_is_programmer_error() {
    let base = object(Shape::new().field("foo", number()));
    let extension = Shape::new().field("foo", string());

    let err = base.try_safe_extend(&extension).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::IncompatibleExtension {
            base: SchemaKind::Number,
            extension: SchemaKind::String,
            ..
        }
    ));

    let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        base.safe_extend(&extension)
    }));
    assert!(panicked.is_err());
}

#[test]
fn test_stringbool_defaults() {
    let schema = stringbool();
    for s in ["yes", "true", "1", "on", "y", "enabled", "YES", "True"] {
        assert_eq!(schema.parse(&json!(s)).unwrap(), json!(true), "{}", s);
    }
    for s in ["no", "false", "0", "off", "n", "disabled", "NO"] {
        assert_eq!(schema.parse(&json!(s)).unwrap(), json!(false), "{}", s);
    }
    assert!(schema.safe_parse(&json!("maybe")).is_err());
}

#[test]
fn test_stringbool_options_from_yaml() {
    let yaml = r#"
truthy: ["ja", "JA"]
falsy: ["nein"]
case: sensitive
"#;
    let options: StringBoolOptions = serde_yaml::from_str(yaml).unwrap();
    let schema = stringbool_with(options);

    assert_eq!(schema.parse(&json!("JA")).unwrap(), json!(true));
    assert_eq!(schema.parse(&json!("nein")).unwrap(), json!(false));
    assert!(schema.safe_parse(&json!("Nein")).is_err());

    let partial: StringBoolOptions = serde_yaml::from_str("falsy: [\"never\"]").unwrap();
    let schema = stringbool_with(partial);
    assert_eq!(schema.parse(&json!("Never")).unwrap(), json!(false));
    assert!(schema.safe_parse(&json!("yes")).is_err());
    assert_eq!(
        schema.safe_parse(&json!("no")).unwrap_err().to_string(),
        "input must be one of: \"never\""
    );
}

#[test]
fn test_stringbool_partial_options_do_not_inherit_defaults() {
    let options: StringBoolOptions =
        serde_yaml::from_str("truthy: [\"ja\"]\ncase: sensitive").unwrap();
    let schema = stringbool_with(options);

    assert_eq!(schema.parse(&json!("ja")).unwrap(), json!(true));
    assert_eq!(
        schema.safe_parse(&json!("no")).unwrap_err().to_string(),
        "input must be one of: \"ja\""
    );
    assert!(stringbool().safe_parse(&json!("no")).is_ok());
}

#[derive(Debug, Deserialize, PartialEq)]
struct ServerConfig {
    host: String,
    port: u16,
    #[serde(default)]
    tls: Option<bool>,
}

fn server_schema() -> llm_config_schema::ObjectSchema {
    object(
        Shape::new()
            .field("host", string().min(1))
            .field("port", number().gte(1.0).lte(65535.0).multiple_of(1.0))
            .field("tls", stringbool().optional()),
    )
}

/// Load a typed server config, propagating schema failures
fn load_server(input: &Value) -> llm_config_schema::Result<ServerConfig> {
    let config = server_schema().parse_into(input)?;
    Ok(config)
}

#[test]
fn test_load_server_through_result_alias() {
    init_tracing();
    let config = load_server(&json!({ "host": "db", "port": 80 })).unwrap();
    assert_eq!(config.port, 80);
    assert_eq!(config.tls, None);

    let err = load_server(&json!({ "host": "db", "port": 0 })).unwrap_err();
    assert!(err.issue().unwrap().is_structural());
}

#[test]
fn test_parse_into_typed_output() {
    init_tracing();
    let config: ServerConfig = server_schema()
        .parse_into(&json!({ "host": "db", "port": 5432, "tls": "on" }))
        .unwrap();

    assert_eq!(
        config,
        ServerConfig {
            host: "db".to_string(),
            port: 5432,
            tls: Some(true),
        }
    );
}

#[test]
fn test_parse_error_carries_issue() {
    init_tracing();
    let err = server_schema()
        .parse(&json!({ "host": "", "port": 70000 }))
        .unwrap_err();

    let issue = err.issue().unwrap();
    let paths: Vec<String> = issue.violations().iter().map(|v| v.path_string()).collect();
    assert_eq!(paths, ["host", "port"]);
    assert!(err.to_string().starts_with("following keys failed:"));
}

#[test]
fn test_parse_into_conversion_failure() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Narrow {
        port: u8,
    }

    let schema = object(Shape::new().field("port", number()));
    let err = schema.parse_into::<Narrow>(&json!({ "port": 5432 })).unwrap_err();
    assert!(matches!(err, ParseError::Deserialize(_)));
}

#[test]
fn test_deeply_nested_failure_is_locatable() {
    init_tracing();
    let schema = object(Shape::new().field(
        "database",
        object(Shape::new().field(
            "pool",
            object(Shape::new().field("size", number().positive())),
        )),
    ));

    let err = schema
        .safe_parse(&json!({ "database": { "pool": { "size": 0 } } }))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "following keys failed:\n\
         \t- \"database\": following keys failed:\n\
         \t\t- \"pool\": following keys failed:\n\
         \t\t\t- \"size\": number must be positive"
    );
    assert_eq!(err.violations()[0].path_string(), "database.pool.size");
}

#[test]
fn test_schema_algebra_leaves_source_untouched() {
    let base = object(hello_shape().field("n", number()));

    let picked = base.pick(["hello"]);
    let omitted = base.omit(["hello"]);
    let extended = base.extend(&Shape::new().field("extra", string()));
    let strict = base.strict();

    assert_eq!(base.shape().len(), 2);
    assert_eq!(picked.shape().len(), 1);
    assert_eq!(omitted.shape().len(), 1);
    assert_eq!(extended.shape().len(), 3);
    assert!(strict.safe_parse(&json!({ "hello": "x", "n": 1, "z": 0 })).is_err());
    assert!(base.safe_parse(&json!({ "hello": "x", "n": 1, "z": 0 })).is_ok());

    let keys = extended.keyof();
    assert_eq!(keys.options(), ["hello", "n", "extra"]);
}

#[test]
fn test_schemas_are_shareable_across_threads() {
    let schema = Arc::new(server_schema());
    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                schema
                    .parse(&json!({ "host": "h", "port": i * 1000 }))
                    .is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_issue_serializes_for_reporting() {
    let err = object(hello_shape())
        .safe_parse(&json!({ "hello": 3 }))
        .unwrap_err();
    let report = serde_json::to_value(&err).unwrap();

    assert_eq!(report["kind"], "invalid_keys");
    assert_eq!(report["failures"][0]["key"], "hello");
    assert_eq!(report["failures"][0]["issue"]["kind"], "invalid_type");
    assert_eq!(report["failures"][0]["issue"]["received"], "number");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// `parse` succeeds exactly when `safe_parse` does, with the same output.
        #[test]
        fn parse_agrees_with_safe_parse(value in json_value()) {
            let schema = object(Shape::new()
                .field("name", string().min(1))
                .field("count", number().nonnegative().optional()));

            match (schema.parse(&value), schema.safe_parse(&value)) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(ParseError::Invalid(a)), Err(b)) => prop_assert_eq!(a, b),
                (a, b) => prop_assert!(false, "disagreement: {:?} vs {:?}", a, b),
            }
        }

        /// Builders never change the schema they are called on.
        #[test]
        fn builders_do_not_mutate(s in "[a-z]{0,8}", min in 0usize..6) {
            let input = json!(s);
            let base = string();
            let before = base.safe_parse(&input).is_ok();
            let _stricter = base.min(min).uppercase();
            prop_assert_eq!(base.safe_parse(&input).is_ok(), before);
            prop_assert!(before);
        }

        /// The set of accepted inputs does not depend on check order.
        #[test]
        fn check_order_does_not_change_acceptance(n in -1000i64..1000, lo in -500i64..500, hi in -500i64..500) {
            let a = number().gt(lo as f64).lt(hi as f64);
            let b = number().lt(hi as f64).gt(lo as f64);
            prop_assert_eq!(a.safe_parse(&json!(n)).is_ok(), b.safe_parse(&json!(n)).is_ok());
        }

        /// Strip mode output never carries undeclared keys.
        #[test]
        fn strip_output_has_only_declared_keys(extra in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..5)) {
            let mut input = serde_json::Map::new();
            input.insert("hello".to_string(), json!("world"));
            for (k, v) in extra {
                input.entry(k).or_insert(json!(v));
            }

            let out = object(hello_shape()).parse(&Value::Object(input)).unwrap();
            let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
            prop_assert_eq!(keys, vec!["hello"]);
        }

        /// Passthrough copies input exactly when all declared keys are valid.
        #[test]
        fn passthrough_is_identity_on_valid_input(extra in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..5)) {
            let mut input = serde_json::Map::new();
            for (k, v) in extra {
                input.insert(k, json!(v));
            }
            input.insert("hello".to_string(), json!("world"));
            let input = Value::Object(input);

            prop_assert_eq!(loose_object(hello_shape()).parse(&input).unwrap(), input);
        }
    }
}
