use std::{env, path::PathBuf, process};

use anyhow::{Context, Result};
use benchreport::{convert_file, ReportConfig, ReportError};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn print_usage_and_exit(program: &str) -> ! {
    eprintln!(
        "{}",
        ReportError::Usage {
            program: program.to_string()
        }
    );
    process::exit(2);
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) arguments: exactly <input> <output> ──────────────────────
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "benchreport".into());
    let rest: Vec<String> = args.collect();
    let (input, output) = match rest.as_slice() {
        [i, o] => (PathBuf::from(i), PathBuf::from(o)),
        _ => print_usage_and_exit(&prog),
    };

    // ─── 3) config ───────────────────────────────────────────────────
    let config = ReportConfig::from_env().context("loading configuration")?;
    info!(?config, "startup");

    // ─── 4) convert ──────────────────────────────────────────────────
    convert_file(&input, &output, &config).with_context(|| {
        format!("converting {} → {}", input.display(), output.display())
    })
}
