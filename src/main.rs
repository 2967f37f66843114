//! hjson-panel entry point.
//!
//! Startup: read the config file (strict duplicate detection, formatting
//! preserved), overlay it onto the compiled-in defaults, size the surface
//! from the strict accessors, then hand the document to the event loop.
//! Shutdown: write the current panel size back into the document and encode
//! it to disk with its comments intact.

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::mpsc;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use hjson_panel::cli::Cli;
use hjson_panel::codec::{DecodeOptions, EncodeOptions};
use hjson_panel::config::{self, ConfigDocument, keys};
use hjson_panel::error::ConfigError;
use hjson_panel::ui::{self, Panel};

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// The config file lives next to the binary unless a path was given.
fn config_path(cli: &Cli) -> std::path::PathBuf {
    if let Some(path) = &cli.config {
        return path.clone();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("config.hjson")))
        .unwrap_or_else(|| std::path::PathBuf::from("config.hjson"))
}

fn print_default_config() {
    println!("Default config:");
    println!();
    print!("{}", config::DEFAULT_CONFIG);
}

fn run(cli: &Cli) -> Result<(), ExitCode> {
    let path = config_path(cli);
    let decode_opts = DecodeOptions {
        duplicate_key_strict: true,
        preserve_formatting: true,
    };
    let encode_opts = EncodeOptions {
        omit_root_braces: true,
    };

    let mut doc = match ConfigDocument::load(path, &decode_opts, encode_opts) {
        Ok(doc) => doc,
        Err(err @ (ConfigError::Syntax { .. } | ConfigError::DuplicateKey { .. })) => {
            eprintln!("Error in config file: {err}");
            print_default_config();
            return Err(ExitCode::FAILURE);
        }
        Err(err) => {
            eprintln!("Failed to read config file: {err}");
            return Err(ExitCode::FAILURE);
        }
    };
    doc.overlay_defaults(&config::default_document());

    // The window dimensions must be numbers (integer or double). A
    // hand-edited string here is a config error, not something to coerce
    // around.
    let size = (|| -> Result<(i64, i64), ConfigError> {
        let width = doc.root().get(keys::MAIN_WINDOW_WIDTH)?.try_f64()? as i64;
        let height = doc.root().get(keys::MAIN_WINDOW_HEIGHT)?.try_f64()? as i64;
        Ok((width, height))
    })();
    let (width, height) = match size {
        Ok(dims) => dims,
        Err(err) => {
            eprintln!("Type mismatch in config file: {err}");
            return Err(ExitCode::FAILURE);
        }
    };

    let (mut panel, binder) = Panel::build_demo(doc.root(), width, height);

    let (tx, rx) = mpsc::channel();
    match cli.script_lines() {
        Some(lines) => ui::pump_script(tx.clone(), lines),
        None => ui::pump_stdin(tx.clone()),
    }
    ui::run(doc.root_mut(), &mut panel, &binder, &rx, &tx);

    // Persist the surface geometry alongside the user's edits.
    let (width, height) = panel.size();
    let write_back = doc
        .root_mut()
        .set(keys::MAIN_WINDOW_WIDTH, width)
        .and_then(|_| doc.root_mut().set(keys::MAIN_WINDOW_HEIGHT, height))
        .and_then(|_| doc.save());
    if let Err(err) = write_back {
        eprintln!("Failed to write config file: {err}");
        return Err(ExitCode::FAILURE);
    }
    info!("clean shutdown");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => {
            error!("exiting with failure");
            code
        }
    }
}
