//! Command-line parsing for the native documentation toolchain.
//!
//! Parsing only; dispatch lives in `crate::app`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::compat::version::VersionRequest;

/// Value that turns off a `compat` input or output file.
pub const SKIP: &str = "skip";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "natives", version, about = "Compile native documentation into declarations, JSON and compatibility tables")]
pub struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile every native document under a directory into one JSON database.
    Compile(CompileArgs),
    /// Compile a single document and print its JSON.
    Verify(VerifyArgs),
    /// Regenerate the Lua call-compatibility table.
    Compat(CompatArgs),
    /// Print a sitemap of native pages.
    Sitemap(SitemapArgs),
    /// Print the declaration type vocabulary and the Vector3 layout.
    Schema,
}

#[derive(Debug, Args, Clone)]
pub struct CompileArgs {
    /// Docs tree (one directory per namespace).
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Output JSON file.
    #[arg(long, default_value = "natives.json")]
    pub out: PathBuf,

    /// Write the database even if some documents fail.
    #[arg(long)]
    pub keep_going: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args, Clone)]
pub struct VerifyArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct CompatArgs {
    /// Docs tree to collect signatures from.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Previous compatibility file, or `skip`. Defaults to NATIVES_COMPAT_FILE.
    #[arg(long = "in", value_name = "FILE")]
    pub input: Option<String>,

    /// Output compatibility file, or `skip`. Defaults to NATIVES_COMPAT_FILE.
    #[arg(long = "out", value_name = "FILE")]
    pub output: Option<String>,

    /// Write the output even when nothing changed.
    #[arg(short, long)]
    pub force: bool,

    /// `major.minor` (build and revision derived from the date) or a full `a.b.c.d`.
    #[arg(long, value_name = "VERSION", default_value = "2.0")]
    pub set_version: VersionRequest,

    /// Day zero of the build number.
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "2023-01-01")]
    pub start_date: NaiveDate,

    /// Continue when the input file does not exist.
    #[arg(short = 'i', long)]
    pub ignore_missing_in: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SitemapArgs {
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Base URL of native pages. Defaults to NATIVES_DOCS_URL.
    #[arg(long, value_name = "URL")]
    pub base: Option<String>,
}

/// Resolve a `compat` file flag: absent → `default`, `skip` → none.
pub fn resolve_compat_path(flag: Option<&str>, default: &Path) -> Option<PathBuf> {
    match flag {
        None => Some(default.to_path_buf()),
        Some(value) if value.eq_ignore_ascii_case(SKIP) => None,
        Some(value) => Some(PathBuf::from(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::version::CompatVersion;

    #[test]
    fn compile_defaults() {
        let cli = Cli::try_parse_from(["natives", "compile", "docs"]).unwrap();
        let Command::Compile(args) = cli.command else { panic!("expected compile") };
        assert_eq!(args.dir, PathBuf::from("docs"));
        assert_eq!(args.out, PathBuf::from("natives.json"));
        assert!(!args.keep_going);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn compat_flags() {
        let cli = Cli::try_parse_from([
            "natives", "-vv", "compat", "docs", "--in", "skip", "-f", "-i", "--set-version", "2.0.3.4",
            "--start-date", "2024-02-01",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Compat(args) = cli.command else { panic!("expected compat") };
        assert_eq!(args.input.as_deref(), Some("skip"));
        assert!(args.force && args.ignore_missing_in);
        assert_eq!(args.set_version, VersionRequest::Pinned(CompatVersion([2, 0, 3, 4])));
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn bad_version_is_a_usage_error() {
        assert!(Cli::try_parse_from(["natives", "compat", "docs", "--set-version", "1.2.3"]).is_err());
        assert!(Cli::try_parse_from(["natives", "-q", "-v", "schema"]).is_err());
    }

    #[test]
    fn compat_path_resolution() {
        let default = Path::new("compat.lua");
        assert_eq!(resolve_compat_path(None, default), Some(PathBuf::from("compat.lua")));
        assert_eq!(resolve_compat_path(Some("skip"), default), None);
        assert_eq!(resolve_compat_path(Some("other.lua"), default), Some(PathBuf::from("other.lua")));
    }
}
