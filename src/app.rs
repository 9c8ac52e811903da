//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - loads environment defaults
//! - runs the requested pipeline
//! - prints reports and writes outputs

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::cli::{Cli, Command, CompatArgs, CompileArgs, SitemapArgs, VerifyArgs, resolve_compat_path};
use crate::compile::{CompileError, compile_native};
use crate::config::Settings;
use crate::domain::TypeVocabulary;
use crate::error::AppError;
use crate::io::ingest::is_native_document;

pub mod pipeline;

/// Entry point for the `natives` binary.
pub fn run() -> Result<(), AppError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(AppError::new(1, err.render().to_string().trim_end())),
    };

    init_logging(cli.verbose, cli.quiet);
    let settings = Settings::from_env();
    let vocab = TypeVocabulary::standard();

    match cli.command {
        Command::Compile(args) => handle_compile(args, &vocab),
        Command::Verify(args) => handle_verify(args, &vocab),
        Command::Compat(args) => handle_compat(args, &vocab, &settings),
        Command::Sitemap(args) => handle_sitemap(args, &vocab, &settings),
        Command::Schema => {
            print!("{}", crate::report::format_schema(&vocab));
            Ok(())
        }
    }
}

/// Log level for `-v` count / `-q`.
pub fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_compile(args: CompileArgs, vocab: &TypeVocabulary) -> Result<(), AppError> {
    let output = pipeline::compile_directory(&args.dir, vocab)?;

    for err in &output.errors {
        tracing::error!(path = %err.path.display(), "{}", err.message);
    }

    let write = output.is_clean() || args.keep_going;
    if write {
        crate::io::export::write_database_json(&args.out, &output.database, args.pretty)?;
    }

    println!(
        "{}",
        crate::report::format_compile_summary(&output, write.then_some(args.out.as_path()))
    );

    if write {
        Ok(())
    } else {
        Err(AppError::new(
            3,
            format!("{} native document(s) failed to compile.", output.errors.len()),
        ))
    }
}

fn handle_verify(args: VerifyArgs, vocab: &TypeVocabulary) -> Result<(), AppError> {
    if !is_native_document(&args.file) {
        println!("{} is not a native definition.", args.file.display());
        return Ok(());
    }

    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", args.file.display())))?;
    let native = compile_native(&text, vocab)?;
    if native.definition.hash == "0x0" {
        return Err(CompileError::NoHash.into());
    }

    println!("{}", crate::io::export::native_to_pretty_json(&native.definition)?);
    Ok(())
}

fn handle_compat(args: CompatArgs, vocab: &TypeVocabulary, settings: &Settings) -> Result<(), AppError> {
    let output = pipeline::compile_directory(&args.dir, vocab)?;
    for err in &output.errors {
        tracing::warn!(path = %err.path.display(), "skipping document: {}", err.message);
    }

    let options = pipeline::CompatOptions {
        input: resolve_compat_path(args.input.as_deref(), &settings.compat_file),
        output: resolve_compat_path(args.output.as_deref(), &settings.compat_file),
        force: args.force,
        ignore_missing_input: args.ignore_missing_in,
        version: args.set_version,
        start_date: args.start_date,
        today: chrono::Utc::now().date_naive(),
    };
    let outcome = pipeline::run_compat(&output.documents, &options)?;

    print!("{}", crate::report::format_compat_summary(&outcome));
    Ok(())
}

fn handle_sitemap(args: SitemapArgs, vocab: &TypeVocabulary, settings: &Settings) -> Result<(), AppError> {
    let output = pipeline::compile_directory(&args.dir, vocab)?;
    for err in &output.errors {
        tracing::warn!(path = %err.path.display(), "skipping document: {}", err.message);
    }

    let base = args.base.as_deref().unwrap_or(&settings.docs_url);
    let entries = pipeline::sitemap_entries(&output.documents, base);
    tracing::info!(urls = entries.len(), base, "rendering sitemap");
    println!("{}", crate::io::sitemap::render_sitemap(&entries));
    Ok(())
}
