//! Parambind demo - binds a sample invocation and prints the outcome.
//!
//! Usage: `parambind [config.toml]`. Without a file, configuration is read
//! from `PARAMBIND_LOCALE` and `PARAMBIND_FAIL_FAST`; set `RUST_LOG=debug`
//! to watch the handler passes.

use parambind::prelude::*;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ValidationConfig::from_file(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: cannot load {}: {}", path, error);
                std::process::exit(2);
            }
        },
        None => ValidationConfig::from_env(),
    };

    println!("Parambind v{} (locale: {})", parambind::VERSION, config.locale);

    let inputs: Vec<String> = [
        "cyk",
        "18",
        "true",
        "39793666111",
        r#"["贵州","广东"]"#,
        r#"{"key1":"value1","key2":["value2","value3"]}"#,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let output = OutputBuffer::new();
    let metadata = ValidationMetadata::new(Arc::new(demo_operation()), inputs, output.clone())
        .with_config(&config);

    let result = ValidationBuilder::with_builtins(metadata, Arc::new(demo_registry()))
        .build()
        .validate();

    if result.is_success() {
        println!("Validation passed");
        let values: Vec<String> = result.param_values().iter().map(|v| v.to_string()).collect();
        println!("Arguments: {}", values.join(", "));
        run(result.param_values());
        println!("Output: {:?}", output.snapshot());
    } else {
        eprintln!("{}", result.error_message().unwrap_or("validation failed"));
        std::process::exit(1);
    }
}

fn json_object_schema() -> RecordSchema {
    RecordSchema::builder("JsonObject")
        .field(FieldSchema::new("key1", ValueType::String))
        .field(FieldSchema::new("key2", ValueType::string_list()))
        .build()
}

fn bean_schema() -> RecordSchema {
    RecordSchema::builder("BeanParams")
        .field(
            FieldSchema::new("name", ValueType::String)
                .with_constraint(Constraint::NotBlank)
                .with_setter(|record, value| {
                    log::debug!("setting name through its setter");
                    record.set("name", value);
                }),
        )
        .field(
            FieldSchema::new("age", ValueType::Integer)
                .with_constraint(Constraint::MinValue(10.0))
                .with_constraint(Constraint::MaxValue(20.0)),
        )
        .field(FieldSchema::new("married", ValueType::Boolean))
        .field(
            FieldSchema::new("qq", ValueType::String)
                .with_constraint(Constraint::Pattern("[1-9][0-9]{4,10}".to_string())),
        )
        .field(FieldSchema::new("ignore_field", ValueType::String).ignored())
        .field(FieldSchema::new("addresses", ValueType::string_list()).json(4))
        .field(FieldSchema::new("json_obj", ValueType::record(json_object_schema())).json(5))
        .build()
}

fn demo_operation() -> TargetOperation {
    TargetOperation::builder("my_run_method")
        .directive(OperationArity::sized(6).custom_handler("six_inputs"))
        .parameter(
            ParameterSpec::positional("name", ValueType::String, 0)
                .with_constraint(Constraint::NotBlank),
        )
        .parameter(
            ParameterSpec::positional("age", ValueType::Integer, 1)
                .with_constraint(Constraint::MinValue(10.0))
                .with_constraint(Constraint::MaxValue(20.0))
                .with_constraint(Constraint::one_of_integers([11, 12, 13, 18])),
        )
        .parameter(ParameterSpec::positional("married", ValueType::Boolean, 2))
        .parameter(
            ParameterSpec::positional("qq", ValueType::String, 3)
                .with_constraint(Constraint::Pattern("[1-9][0-9]{4,10}".to_string())),
        )
        .parameter(ParameterSpec::json("addresses", ValueType::string_list(), 4))
        .parameter(ParameterSpec::json(
            "json_obj",
            ValueType::record(json_object_schema()),
            5,
        ))
        .parameter(ParameterSpec::record("bean_params", bean_schema()))
        .parameter(ParameterSpec::list("list_params"))
        .parameter(ParameterSpec::output_sink("return_data"))
        .build()
}

struct SixInputs;

impl CustomValidatorHandler for SixInputs {
    fn handle(&self, raw_inputs: &[String], chain: &mut ValidationChain) -> anyhow::Result<()> {
        chain.intercept();
        anyhow::ensure!(raw_inputs.len() == 6, "Invalid params.");
        Ok(())
    }
}

fn demo_registry() -> CustomHandlerRegistry {
    let mut registry = CustomHandlerRegistry::new();
    registry.register_with_description("six_inputs", "requires exactly six inputs", || {
        Box::new(SixInputs)
    });
    registry
}

/// Stand-in for the invoked operation: reports into the output buffer.
fn run(arguments: &[Value]) {
    let Some(output) = arguments.last().and_then(Value::as_output) else {
        return;
    };
    if let Some(name) = arguments.first().and_then(Value::as_str) {
        output.push(format!("hello, {}", name));
    }
    output.push(format!("received {} arguments", arguments.len()));
}
