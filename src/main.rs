use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tui_forms::{CallbackArgs, CallbackRegistry, Form, FormOutcome, FormSpec, SessionConfig};

const DEMO_SPEC: &str = include_str!("../demos/big_test.yaml");

/// Log to the file named by `TUI_FORMS_LOG`; the terminal belongs to the form.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("TUI_FORMS_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot open log file {}", PathBuf::from(&path).display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TUI_FORMS_LOG_LEVEL")
                .unwrap_or_else(|_| EnvFilter::new("tui_forms=debug")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

/// Shows the CMF digits reversed next to the router IP.
fn reverse_cmf(args: &CallbackArgs<'_>) -> Result<String> {
    let cmf = args
        .var("CMF")
        .map(tui_forms::model::scalar_text)
        .unwrap_or_default();
    let ip = args
        .var("thing.test_ip2")
        .map(tui_forms::model::scalar_text)
        .unwrap_or_default();
    let mut digits: Vec<char> = cmf.chars().collect();
    digits.reverse();
    let rotated: String = digits.into_iter().collect();
    Ok(format!("({}) {rotated}: {ip}", args.field_path))
}

fn load_spec(path: Option<&PathBuf>) -> Result<FormSpec> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("cannot read form spec {}", p.display()))?;
            FormSpec::from_yaml_str(&text)
                .with_context(|| format!("cannot parse form spec {}", p.display()))
        }
        None => Ok(FormSpec::from_yaml_str(DEMO_SPEC)?),
    }
}

fn load_config() -> Result<SessionConfig> {
    match std::env::var_os("TUI_FORMS_CONFIG") {
        Some(p) => {
            let path = PathBuf::from(p);
            SessionConfig::load(&path)
                .with_context(|| format!("cannot load session config {}", path.display()))
        }
        None => Ok(SessionConfig::default()),
    }
}

fn main() -> Result<ExitCode> {
    init_logging()?;
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let spec = load_spec(path.as_ref())?;
    let config = load_config()?;

    let mut callbacks = CallbackRegistry::new();
    callbacks.register("reverse_cmf", reverse_cmf);

    let mut form = Form::new(&spec, callbacks, config).context("cannot build form")?;
    match form.run()? {
        FormOutcome::Completed(values) => {
            println!("{}", serde_json::to_string_pretty(&values)?);
            Ok(ExitCode::SUCCESS)
        }
        FormOutcome::Aborted => {
            eprintln!("aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}
