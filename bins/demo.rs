use std::sync::Arc;

use container::{Container, ContainerExt, Factory, Function, Item};
use dotenvy::dotenv;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

struct Greeter {
    token: String,
    instance: Uuid,
}

fn init_logging(cfg: &configs::LoggingConfig) {
    match cfg.format {
        configs::LogFormat::Compact => common::utils::logging::init_logging_default(cfg.filter.as_deref()),
        configs::LogFormat::Json => common::utils::logging::init_logging_json(cfg.filter.as_deref()),
    }
    info!(service = "container-demo", event = "logger_init", "tracing subscriber initialized");
}

fn register(container: &dyn Container) -> anyhow::Result<()> {
    container.set_value("token", "demo-token")?;
    container.set_function(
        "math.add",
        Function::named("math.add", |args: &[Value]| {
            let a = args.first().and_then(Value::as_f64).unwrap_or_default();
            let b = args.get(1).and_then(Value::as_f64).unwrap_or_default();
            Ok(json!(a + b))
        }),
    )?;
    container.set_factory(
        "greeter",
        Factory::named("demo.greeter", |c: &dyn Container| {
            let token = c.get_as::<String>("token")?;
            Ok(Item::object(Greeter { token, instance: Uuid::new_v4() }))
        }),
    )?;
    Ok(())
}

fn run(container: &dyn Container) -> anyhow::Result<()> {
    register(container)?;

    let sum = container.get_function("math.add")?.call(&[json!(2), json!(40)])?;
    info!(event = "function_call", %sum, "math.add resolved from container");

    let first = container.get_object::<Greeter>("greeter")?;
    let second = container.get_object::<Greeter>("greeter")?;
    info!(
        event = "singleton",
        token = %first.token,
        instance = %first.instance,
        same_instance = Arc::ptr_eq(&first, &second),
        "greeter resolved twice"
    );
    Ok(())
}

fn main() -> std::process::ExitCode {
    // Load .env early so RUST_LOG and CONTAINER_* overrides apply
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default(None);
            error!(service = "container-demo", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    init_logging(&cfg.logging);

    let container = match container::bootstrap(&cfg) {
        Ok(c) => c,
        Err(e) => {
            error!(service = "container-demo", event = "bootstrap_failed", error = %e, "failed to build container");
            return std::process::ExitCode::FAILURE;
        }
    };

    match run(container.as_ref()) {
        Ok(()) => {
            info!(service = "container-demo", event = "stop", backend = ?cfg.storage.backend, "demo finished");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "container-demo", event = "run_failed", error = %e, "demo failed");
            std::process::ExitCode::FAILURE
        }
    }
}
