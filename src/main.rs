//! # cachedisk
//!
//! Command-line front end to the cache disk helpers.
//!
//! ## Usage
//!
//! ```bash
//! # How much space does the cache take?
//! cachedisk du ~/.cache/myapp
//!
//! # Convert a memory limit into bytes
//! cachedisk parse-size 80G 1.4M
//!
//! # Preview, then clear, a cache directory
//! cachedisk clear ~/.cache/myapp --dry-run
//! cachedisk clear ~/.cache/myapp -y
//! ```

mod cli;

use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Result, bail};
use cachedisk::{
    Cleaner, ClearPlan, RemovalStrategy,
    config::{DisplayOptions, FileConfig},
    disk_usage, marker, memstr_to_bytes, mkdirp,
    output::{JsonClear, JsonMark, JsonParsedSize, JsonUsage},
};
use clap::Parser;
use cli::{ClearArgs, Cli, Commands, ConfigCommand, DuArgs, MarkArgs};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Confirm;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "CACHEDISK_LOG";

/// Entry point for the cachedisk application.
///
/// Errors are printed to stderr and turn into a non-zero exit status.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
fn inner_main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose());

    let json_mode = args.json();

    match &args.command {
        Commands::Du(du) => run_du(du, &load_config(json_mode), json_mode),
        Commands::ParseSize { texts } => run_parse_size(texts, json_mode),
        Commands::Mkdir { paths } => run_mkdir(paths, json_mode),
        Commands::Clear(clear) => run_clear(clear, &load_config(json_mode), json_mode),
        Commands::Mark(mark) => run_mark(mark, &load_config(json_mode), json_mode),
        Commands::Config { command } => handle_config_command(command),
    }
}

/// Install the stderr `tracing` subscriber.
///
/// `CACHEDISK_LOG` wins when set; otherwise `--verbose` enables this crate's
/// debug events and the default shows warnings only.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,cachedisk=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ── Subcommands ─────────────────────────────────────────────────────────

/// Measure and print the disk usage of a directory.
fn run_du(args: &DuArgs, config: &FileConfig, json_mode: bool) -> Result<()> {
    let dir = args.directory(config);
    let display = args.display_options(config);
    let usage = disk_usage(&dir)?;

    if json_mode {
        let output = JsonUsage::new(&dir, usage, &display);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if display.raw_bytes {
        println!("{}\t{}", usage.allocated, dir.display());
        return Ok(());
    }

    println!(
        "{}  {}",
        display.render(usage.allocated).bright_green().bold(),
        dir.display()
    );
    println!(
        "  {} files, {} directories, {} apparent size",
        usage.files.to_string().cyan(),
        usage.dirs.to_string().cyan(),
        display.render(usage.apparent)
    );
    Ok(())
}

/// Parse each size literal and print its byte count.
fn run_parse_size(texts: &[String], json_mode: bool) -> Result<()> {
    let results: Vec<_> = texts
        .iter()
        .map(|text| (text, memstr_to_bytes(text)))
        .collect();
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    if json_mode {
        let output: Vec<_> = results
            .iter()
            .map(|(text, result)| JsonParsedSize::from_result(text, result))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (text, result) in &results {
            match result {
                Ok(bytes) => println!("{text}\t{bytes}"),
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
    }

    if failures > 0 {
        bail!("{failures} size literal(s) could not be parsed");
    }
    Ok(())
}

/// Create every requested directory.
fn run_mkdir(paths: &[PathBuf], json_mode: bool) -> Result<()> {
    for path in paths {
        mkdirp(path)?;
    }

    if json_mode {
        let created: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        for path in paths {
            println!("{} {}", "✔".green(), path.display());
        }
    }
    Ok(())
}

/// Clear a cache directory: plan, confirm, remove, report.
fn run_clear(args: &ClearArgs, config: &FileConfig, json_mode: bool) -> Result<()> {
    let Some(dir) = args.directory(config) else {
        bail!("No directory given and no `dir` set in the config file");
    };
    let options = args.clear_options(config);
    let display = args.display_options(config);

    if json_mode && !options.dry_run && !options.yes {
        bail!("--json requires --yes or --dry-run when clearing");
    }

    let cleaner = Cleaner::new(RemovalStrategy::from_use_trash(options.use_trash));
    let plan = cleaner.plan(&dir)?;

    if plan.is_empty() {
        if json_mode {
            println!(
                "{}",
                serde_json::to_string_pretty(&JsonClear::dry_run(plan, &display))?
            );
        } else {
            println!("{}", "✨ Nothing to clear!".green());
        }
        return Ok(());
    }

    if !json_mode {
        print_plan(&plan, &display);
    }

    if options.dry_run {
        if json_mode {
            println!(
                "{}",
                serde_json::to_string_pretty(&JsonClear::dry_run(plan, &display))?
            );
        } else {
            println!(
                "\n{} {}",
                "🧪 Dry run complete!".yellow(),
                format!("Would free up {}", display.render(plan.total_size())).bright_white()
            );
        }
        return Ok(());
    }

    if !options.yes && !confirm_clear(&plan, &display)? {
        println!("{}", "Nothing removed.".yellow());
        return Ok(());
    }

    let progress = if json_mode {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(plan.subdirs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb
    };

    let result = cleaner.execute(&plan, |removal| {
        progress.set_message(file_name(&removal.path));
        progress.inc(1);
    });
    progress.finish_and_clear();
    let result = result?;

    if json_mode {
        let output = JsonClear::cleanup(plan, result, &display);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let verb = match cleaner.strategy() {
        RemovalStrategy::Permanent => "Removed",
        RemovalStrategy::Trash => "Trashed",
    };
    println!("\n{}", "📊 Clear Summary:".bold());
    println!(
        "  ✅ {verb}: {} subdirectories",
        result.removed_count.to_string().green()
    );
    if result.marker_removed {
        println!("  🏷️  Removed {}", marker::MARKER_FILE_NAME);
    }
    println!(
        "  💾 Total space freed: {}",
        display.render(result.total_freed).bright_green().bold()
    );
    Ok(())
}

/// Write the `.gitignore` marker into a cache directory.
fn run_mark(args: &MarkArgs, config: &FileConfig, json_mode: bool) -> Result<()> {
    let dir = args.directory(config);
    let written = marker::write_marker(&dir)?;

    if json_mode {
        let output = JsonMark::new(&dir, written);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if written {
        println!("{} {}", "✔".green(), marker::marker_path(&dir).display());
    } else {
        println!(
            "{} {} already exists, left untouched",
            "•".yellow(),
            marker::marker_path(&dir).display()
        );
    }
    Ok(())
}

// ── Helper functions ────────────────────────────────────────────────────

/// Print the subdirectories a clear would remove.
fn print_plan(plan: &ClearPlan, display: &DisplayOptions) {
    println!("{} {}", "📂 Cache:".bold(), plan.root.display());
    for removal in &plan.subdirs {
        println!(
            "  {:>12}  {}",
            display.render(removal.size).cyan(),
            file_name(&removal.path)
        );
    }
    if let Some(marker) = &plan.marker {
        println!("  {:>12}  {}", "marker".dimmed(), file_name(marker));
    }
}

/// Ask the user to confirm a clear.
fn confirm_clear(plan: &ClearPlan, display: &DisplayOptions) -> Result<bool> {
    let prompt = format!(
        "Remove {} subdirectories ({}) from {}?",
        plan.subdirs.len(),
        display.render(plan.total_size()),
        plan.root.display()
    );

    Ok(Confirm::new(&prompt).with_default(false).prompt()?)
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# cachedisk configuration
# All values shown are their defaults. Uncomment and change as needed.

# Default cache directory for `du`, `clear` and `mark`
# dir = "~/.cache/myapp"

[display]
# Show sizes in binary units (KiB, MiB); false uses decimal units (kB, MB)
# binary = true

[clear]
# Move subdirectories to the system trash instead of deleting them
# use_trash = false

# Skip the confirmation prompt
# yes = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load_from(p)?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let dir_str = config.dir.as_ref().map_or_else(
        || "(none)  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );

    format!(
        "\
dir       = {dir}

[display]
binary    = {binary}

[clear]
use_trash = {use_trash}
yes       = {yes}",
        dir = dir_str,
        binary = show_bool(config.display.binary, true),
        use_trash = show_bool(config.clear.use_trash, false),
        yes = show_bool(config.clear.yes, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        mkdirp(parent)?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}
