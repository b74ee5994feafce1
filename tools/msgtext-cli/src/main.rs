extern crate libmsgtext;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use libmsgtext::{Archive, ReadOptions, UnknownCommandPolicy, WriteOptions};
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "Message text CLI")]
#[command(about, author, version, long_about = None)]
struct Cli {
    /// Print debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that text files survive a decode and encode unchanged
    #[command(arg_required_else_help = true)]
    Check {
        /// Text files
        files: Vec<PathBuf>,
        /// Treat layout deviations as errors
        #[arg(long)]
        strict: bool,
    },
    /// Print the header and line table of a text file
    #[command(arg_required_else_help = true)]
    Debug {
        /// Text file
        file: PathBuf,
        /// Treat layout deviations as errors
        #[arg(long)]
        strict: bool,
    },
    /// Export the lines of a text file as JSON
    #[command(arg_required_else_help = true)]
    Export {
        /// Text file
        file: PathBuf,
        /// Outbound JSON file
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
        /// Treat layout deviations as errors
        #[arg(long)]
        strict: bool,
        /// Overwrite files
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Build a text file from exported JSON
    #[command(arg_required_else_help = true)]
    Import {
        /// JSON file
        file: PathBuf,
        /// Outbound text file
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
        /// Fail on commands missing from the command table instead of dropping them
        #[arg(long)]
        reject_unknown: bool,
        /// Overwrite files
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Print the lines of a text file
    #[command(arg_required_else_help = true)]
    Ls {
        /// Text file
        file: PathBuf,
        /// Treat layout deviations as errors
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Serialize, Deserialize, Debug)]
struct TextDocument {
    /// File the lines were exported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    lines: Vec<String>,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let stdout = console::Term::stdout();

    match cli.command {
        Commands::Check { files, strict } => command_check(stdout, files, strict)?,
        Commands::Debug { file, strict } => command_debug(stdout, file, strict)?,
        Commands::Export {
            file,
            out,
            strict,
            force,
        } => command_export(file, out, strict, force)?,
        Commands::Import {
            file,
            out,
            reject_unknown,
            force,
        } => command_import(file, out, reject_unknown, force)?,
        Commands::Ls { file, strict } => command_ls(stdout, file, strict)?,
    }

    Ok(())
}

fn command_check(stdout: console::Term, files: Vec<PathBuf>, strict: bool) -> Result<()> {
    let tmp = tempdir::TempDir::new("msgtext").into_diagnostic()?;
    let bar = indicatif::ProgressBar::new(files.len() as u64);
    let mut mismatches = Vec::new();
    let mut failures = Vec::new();

    bar.set_style(get_bar_style()?);

    for (index, file) in files.iter().enumerate() {
        bar.set_message(file.display().to_string());

        let path = tmp.path().join(format!("{index}.bin"));
        match check_file(file, &path, strict) {
            Ok(true) => {}
            Ok(false) => mismatches.push(file),
            Err(error) => {
                log::warn!("{}: {error}", file.display());
                failures.push((file, error));
            }
        }
        bar.inc(1);
    }

    bar.finish();

    for file in &mismatches {
        let text = format!("Mismatch: {};", file.display());
        stdout.write_line(&text).into_diagnostic()?;
    }
    for (file, error) in &failures {
        let text = format!("Failed: {}: {error};", file.display());
        stdout.write_line(&text).into_diagnostic()?;
    }

    let text = format!(
        "Total files: {};\nIdentical: {};\nMismatched: {};\nFailed: {};",
        files.len(),
        files.len() - mismatches.len() - failures.len(),
        mismatches.len(),
        failures.len()
    );
    stdout.write_line(&text).into_diagnostic()?;

    if !mismatches.is_empty() || !failures.is_empty() {
        miette::bail!(
            "{} file(s) changed after re-encoding, {} file(s) could not be checked",
            mismatches.len(),
            failures.len()
        );
    }

    Ok(())
}

/// Decode `file`, encode it again into `scratch` and compare the bytes
fn check_file(file: &Path, scratch: &Path, strict: bool) -> Result<bool> {
    let original = std::fs::read(file).into_diagnostic()?;
    let lines = libmsgtext::decode(&original, strict)?;

    libmsgtext::save_path(scratch, &lines)?;
    let rebuilt = std::fs::read(scratch).into_diagnostic()?;

    if rebuilt != original {
        log::debug!(
            "{}: {} byte(s) read, {} byte(s) rebuilt",
            file.display(),
            original.len(),
            rebuilt.len()
        );
        return Ok(false);
    }
    Ok(true)
}

fn command_debug(stdout: console::Term, file: PathBuf, strict: bool) -> Result<()> {
    let bytes = std::fs::read(file).into_diagnostic()?;
    let archive = Archive::parse(bytes, &ReadOptions { strict })?;

    let text = format!("Header: {:#?};", archive.header());
    stdout.write_line(&text).into_diagnostic()?;

    let mut total_units: u64 = 0;
    for (index, entry) in archive.entries().iter().enumerate() {
        total_units += u64::from(entry.length);
        let text = format!(
            "Index: {};\nOffset: {};\nLength: {} (units);",
            index, entry.offset, entry.length
        );
        stdout.write_line(&text).into_diagnostic()?;
    }

    let text = format!(
        "Total lines: {};\nTotal length: {} (units);",
        archive.line_count(),
        total_units
    );
    stdout.write_line(&text).into_diagnostic()?;

    Ok(())
}

fn command_export(file: PathBuf, out: PathBuf, strict: bool, force: bool) -> Result<()> {
    let lines = libmsgtext::load_path(&file, strict)?;

    if !confirm_overwrite(&out, force)? {
        return Ok(());
    }

    let document = TextDocument {
        source: Some(file.display().to_string()),
        lines,
    };
    let output = std::fs::File::create(out).into_diagnostic()?;
    let mut writer = std::io::BufWriter::new(output);
    serde_json::to_writer_pretty(&mut writer, &document).into_diagnostic()?;
    std::io::Write::flush(&mut writer).into_diagnostic()?;

    Ok(())
}

fn command_import(file: PathBuf, out: PathBuf, reject_unknown: bool, force: bool) -> Result<()> {
    let input = std::fs::File::open(file).into_diagnostic()?;
    let document: TextDocument =
        serde_json::from_reader(std::io::BufReader::new(input)).into_diagnostic()?;

    if !confirm_overwrite(&out, force)? {
        return Ok(());
    }

    let opts = WriteOptions {
        unknown_commands: if reject_unknown {
            UnknownCommandPolicy::Reject
        } else {
            UnknownCommandPolicy::Drop
        },
    };
    libmsgtext::save_path_with(&out, &document.lines, &opts)?;

    Ok(())
}

fn command_ls(stdout: console::Term, file: PathBuf, strict: bool) -> Result<()> {
    let lines = libmsgtext::load_path(file, strict)?;

    for (index, line) in lines.iter().enumerate() {
        let text = format!("{index}: {line:?}");
        stdout.write_line(&text).into_diagnostic()?;
    }

    Ok(())
}

fn confirm_overwrite(path: &Path, force: bool) -> Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }

    let message = format!("File \"{}\" exists. Overwrite it?", path.display());
    dialoguer::Confirm::new()
        .with_prompt(message)
        .interact()
        .into_diagnostic()
}

fn get_bar_style() -> Result<indicatif::ProgressStyle> {
    Ok(
        indicatif::ProgressStyle::with_template("[{bar:32}] {pos:>7}/{len:7} {msg}")
            .into_diagnostic()?
            .progress_chars("=>-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_import_rebuilds_the_file() {
        let tmp = tempdir::TempDir::new("msgtext-cli").expect("failed to create temp dir");
        let original = tmp.path().join("original.bin");
        let json = tmp.path().join("lines.json");
        let rebuilt = tmp.path().join("rebuilt.bin");

        libmsgtext::save_path(&original, &["[COLOR(2)]Hi ♀", "line\ntwo"]).expect("save failed");
        command_export(original.clone(), json.clone(), true, true).expect("export failed");
        command_import(json, rebuilt.clone(), true, true).expect("import failed");

        let before = std::fs::read(&original).expect("failed to read original");
        let after = std::fs::read(&rebuilt).expect("failed to read rebuilt");
        assert_eq!(before, after);

        command_check(console::Term::stdout(), vec![original, rebuilt], true)
            .expect("check failed");
    }

    #[test]
    fn import_rejects_unknown_commands_on_request() {
        let tmp = tempdir::TempDir::new("msgtext-cli").expect("failed to create temp dir");
        let json = tmp.path().join("lines.json");
        let out = tmp.path().join("out.bin");
        std::fs::write(&json, r#"{"lines":["[NOPE]"]}"#).expect("failed to write json");

        assert!(command_import(json.clone(), out.clone(), true, true).is_err());
        assert!(!out.exists());

        command_import(json, out.clone(), false, true).expect("import failed");
        assert_eq!(
            libmsgtext::load_path(&out, true).expect("load failed"),
            vec![""]
        );
    }

    #[test]
    fn check_continues_past_unreadable_files() {
        let tmp = tempdir::TempDir::new("msgtext-cli").expect("failed to create temp dir");
        let good = tmp.path().join("good.bin");
        let corrupt = tmp.path().join("corrupt.bin");
        let missing = tmp.path().join("missing.bin");
        let scratch = tmp.path().join("scratch.bin");

        libmsgtext::save_path(&good, &["first", "[CLEAR]second"]).expect("save failed");
        std::fs::write(&corrupt, [1, 0, 0, 0]).expect("failed to write corrupt file");

        assert!(check_file(&corrupt, &scratch, false).is_err());
        assert!(check_file(&missing, &scratch, false).is_err());
        assert!(check_file(&good, &scratch, true).expect("check failed"));

        let files = vec![corrupt, missing, good];
        assert!(command_check(console::Term::stdout(), files, true).is_err());
    }

    #[test]
    fn documents_without_source_are_accepted() {
        let document: TextDocument =
            serde_json::from_str(r#"{"lines":["a","[CLEAR]"]}"#).expect("parse failed");
        assert_eq!(document.source, None);
        assert_eq!(document.lines, vec!["a", "[CLEAR]"]);
    }
}
