//! Command-line interface definition and argument parsing.
//!
//! This module defines all subcommands and their options using the
//! [clap](https://docs.rs/clap/) library. Helper methods accept a
//! [`FileConfig`] reference so that config-file values act as defaults that
//! CLI arguments can override (layered config).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cachedisk::config::{ClearOptions, DisplayOptions, FileConfig};

/// Options controlling how sizes are printed.
#[derive(Args, Debug)]
pub struct SizeFormatArgs {
    /// Print raw byte counts instead of human-readable sizes
    #[arg(short = 'b', long)]
    bytes: bool,

    /// Use decimal units (kB, MB) instead of binary ones (KiB, MiB)
    #[arg(long)]
    decimal: bool,
}

/// Arguments of the `du` subcommand.
#[derive(Args, Debug)]
pub struct DuArgs {
    /// Directory to measure (defaults to the configured `dir`, then `.`)
    dir: Option<PathBuf>,

    /// Size formatting
    #[command(flatten)]
    format: SizeFormatArgs,
}

/// Arguments of the `clear` subcommand.
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Cache directory to clear (defaults to the configured `dir`)
    dir: Option<PathBuf>,

    /// List the subdirectories that would be removed and their size
    ///
    /// Nothing is deleted in this mode.
    #[arg(long)]
    dry_run: bool,

    /// Don't ask for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Move subdirectories to the system trash instead of deleting them
    #[arg(long, conflicts_with = "permanent")]
    trash: bool,

    /// Permanently delete subdirectories, even if the config enables the trash
    #[arg(long)]
    permanent: bool,

    /// Size formatting
    #[command(flatten)]
    format: SizeFormatArgs,
}

/// Arguments of the `mark` subcommand.
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Cache directory to mark (defaults to the configured `dir`)
    dir: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the disk space a directory tree occupies
    Du(DuArgs),

    /// Convert memory sizes such as 80G, 1.4M or 53K into bytes
    ParseSize {
        /// Size literals to convert
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Create directories and their parents; existing ones are left alone
    Mkdir {
        /// Directories to create
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove every subdirectory of a cache directory, and its .gitignore marker
    Clear(ClearArgs),

    /// Write the .gitignore marker into a cache directory
    Mark(MarkArgs),

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
#[derive(Parser, Debug)]
#[command(name = "cachedisk")]
#[command(
    about = "Disk helpers for cache directories: measure usage, parse memory sizes, create and clear caches"
)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Log what is being measured, created and removed
    ///
    /// The `CACHEDISK_LOG` environment variable, when set, takes precedence.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// All human-readable output (colors, progress bars, prompts) is suppressed.
    #[arg(long, global = true)]
    json: bool,
}

impl Cli {
    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Whether `--verbose` logging is enabled.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }
}

impl SizeFormatArgs {
    /// Resolve display options from CLI args and config file.
    ///
    /// `--decimal` overrides the config file's `binary` setting, which
    /// defaults to `true`.
    #[must_use]
    pub fn display_options(&self, config: &FileConfig) -> DisplayOptions {
        DisplayOptions {
            binary: !self.decimal && config.display.binary.unwrap_or(true),
            raw_bytes: self.bytes,
        }
    }
}

impl DuArgs {
    /// Directory to measure: CLI argument > config file `dir` > `.`.
    #[must_use]
    pub fn directory(&self, config: &FileConfig) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| config.directory())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Display options for this run.
    #[must_use]
    pub fn display_options(&self, config: &FileConfig) -> DisplayOptions {
        self.format.display_options(config)
    }
}

impl ClearArgs {
    /// Directory to clear: CLI argument > config file `dir`.
    ///
    /// Never falls back to the current directory.
    #[must_use]
    pub fn directory(&self, config: &FileConfig) -> Option<PathBuf> {
        self.dir.clone().or_else(|| config.directory())
    }

    /// Resolve clear options from CLI args and config file.
    ///
    /// - **`use_trash`**: `--trash` / `--permanent` > config > `false`
    /// - **yes**: CLI flag `||` config value
    #[must_use]
    pub fn clear_options(&self, config: &FileConfig) -> ClearOptions {
        let use_trash = if self.trash {
            true
        } else if self.permanent {
            false
        } else {
            config.clear.use_trash.unwrap_or(false)
        };

        ClearOptions {
            dry_run: self.dry_run,
            yes: self.yes || config.clear.yes.unwrap_or(false),
            use_trash,
        }
    }

    /// Display options for this run.
    #[must_use]
    pub fn display_options(&self, config: &FileConfig) -> DisplayOptions {
        self.format.display_options(config)
    }
}

impl MarkArgs {
    /// Directory to mark: CLI argument > config file `dir` > `.`.
    #[must_use]
    pub fn directory(&self, config: &FileConfig) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| config.directory())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachedisk::config::file::{FileClearConfig, FileDisplayConfig};

    fn clear_args(argv: &[&str]) -> ClearArgs {
        match Cli::parse_from(argv).command {
            Commands::Clear(args) => args,
            other => panic!("expected clear, got {other:?}"),
        }
    }

    fn du_args(argv: &[&str]) -> DuArgs {
        match Cli::parse_from(argv).command {
            Commands::Du(args) => args,
            other => panic!("expected du, got {other:?}"),
        }
    }

    #[test]
    fn test_du_defaults() {
        let config = FileConfig::default();
        let args = du_args(&["cachedisk", "du"]);

        assert_eq!(args.directory(&config), PathBuf::from("."));
        let display = args.display_options(&config);
        assert!(display.binary);
        assert!(!display.raw_bytes);
    }

    #[test]
    fn test_du_directory_precedence() {
        let config = FileConfig {
            dir: Some(PathBuf::from("/from/config")),
            ..FileConfig::default()
        };

        let args = du_args(&["cachedisk", "du"]);
        assert_eq!(args.directory(&config), PathBuf::from("/from/config"));

        let args = du_args(&["cachedisk", "du", "/from/cli"]);
        assert_eq!(args.directory(&config), PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_display_flags() {
        let config = FileConfig::default();
        let args = du_args(&["cachedisk", "du", "--decimal", "-b"]);
        let display = args.display_options(&config);

        assert!(!display.binary);
        assert!(display.raw_bytes);
    }

    #[test]
    fn test_config_binary_false_is_respected() {
        let config = FileConfig {
            display: FileDisplayConfig {
                binary: Some(false),
            },
            ..FileConfig::default()
        };
        let args = du_args(&["cachedisk", "du"]);

        assert!(!args.display_options(&config).binary);
    }

    #[test]
    fn test_clear_defaults() {
        let config = FileConfig::default();
        let args = clear_args(&["cachedisk", "clear"]);

        assert_eq!(args.directory(&config), None);
        let opts = args.clear_options(&config);
        assert!(!opts.dry_run);
        assert!(!opts.yes);
        assert!(!opts.use_trash);
    }

    #[test]
    fn test_clear_flags() {
        let config = FileConfig::default();
        let args = clear_args(&["cachedisk", "clear", "/cache", "--dry-run", "-y", "--trash"]);

        assert_eq!(args.directory(&config), Some(PathBuf::from("/cache")));
        let opts = args.clear_options(&config);
        assert!(opts.dry_run);
        assert!(opts.yes);
        assert!(opts.use_trash);
    }

    #[test]
    fn test_config_trash_and_yes() {
        let config = FileConfig {
            clear: FileClearConfig {
                use_trash: Some(true),
                yes: Some(true),
            },
            ..FileConfig::default()
        };

        let opts = clear_args(&["cachedisk", "clear"]).clear_options(&config);
        assert!(opts.use_trash);
        assert!(opts.yes);

        let opts = clear_args(&["cachedisk", "clear", "--permanent"]).clear_options(&config);
        assert!(!opts.use_trash);
    }

    #[test]
    fn test_trash_conflicts_with_permanent() {
        let result = Cli::try_parse_from(["cachedisk", "clear", "--trash", "--permanent"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_size_requires_text() {
        assert!(Cli::try_parse_from(["cachedisk", "parse-size"]).is_err());

        let cli = Cli::parse_from(["cachedisk", "parse-size", "80G", "1.4M"]);
        match cli.command {
            Commands::ParseSize { texts } => assert_eq!(texts, vec!["80G", "1.4M"]),
            other => panic!("expected parse-size, got {other:?}"),
        }
    }

    #[test]
    fn test_mkdir_paths() {
        let cli = Cli::parse_from(["cachedisk", "mkdir", "a/b", "c"]);
        match cli.command {
            Commands::Mkdir { paths } => {
                assert_eq!(paths, vec![PathBuf::from("a/b"), PathBuf::from("c")]);
            }
            other => panic!("expected mkdir, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cachedisk", "du", "/tmp", "--json", "-v"]);

        assert!(cli.json());
        assert!(cli.verbose());
    }

    #[test]
    fn test_mark_directory_falls_back_to_current() {
        let config = FileConfig::default();
        let cli = Cli::parse_from(["cachedisk", "mark"]);
        match cli.command {
            Commands::Mark(args) => assert_eq!(args.directory(&config), PathBuf::from(".")),
            other => panic!("expected mark, got {other:?}"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["cachedisk", "config", "path"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommand::Path
            }
        ));
    }
}
