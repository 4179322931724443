use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use renamer_cli::config::{MergedConfig, load_config, user_config_path};
use renamer_cli::logging::{init_logger, level_from_occurrences};
use renamer_cli::rename::{ConflictPolicy, RenameOptions, Renamer};

const EXAMPLES: &str = "\
Examples:
  file-renamer -from 'old_*' -to 'new_*'
  file-renamer -from 'this_pattern_*.txt' -to 'new_pattern_*.txt' -folder ./documents
  file-renamer -from 'img_*.jpg' -to 'photo_*.jpg' -dry-run";

#[derive(Parser)]
#[command(name = "file-renamer")]
#[command(
	author,
	version,
	about = "Batch-rename files in a folder using '*' wildcard patterns"
)]
#[command(after_help = EXAMPLES)]
struct Cli {
	/// Target folder path
	#[arg(long, value_name = "PATH", default_value = ".", allow_hyphen_values = true)]
	folder: PathBuf,

	/// Old pattern (e.g., 'this_pattern_*.ext')
	#[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
	from: Option<String>,

	/// New pattern (e.g., 'new_pattern_*.ext')
	#[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
	to: Option<String>,

	/// Show what would be renamed without doing it
	#[arg(
		long,
		action = ArgAction::Set,
		num_args = 0..=1,
		require_equals = true,
		default_value_t = false,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new()
	)]
	dry_run: bool,

	/// What to do when a new name is already taken: skip or overwrite
	#[arg(long, value_name = "POLICY")]
	on_conflict: Option<ConflictPolicy>,

	/// Take the old and new patterns from a named config preset
	#[arg(
		long,
		value_name = "NAME",
		conflicts_with_all = ["from", "to"],
		allow_hyphen_values = true
	)]
	preset: Option<String>,

	/// List presets from the config files and exit
	#[arg(long)]
	list_presets: bool,

	/// Use this config file instead of searching for .renamer.toml
	#[arg(long, value_name = "PATH", allow_hyphen_values = true)]
	config: Option<PathBuf>,

	/// Print diagnostics to stderr (-vv for more)
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

/// Long options that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &[
	"folder",
	"from",
	"to",
	"dry-run",
	"help",
	"version",
	"on-conflict",
	"preset",
	"list-presets",
	"config",
	"verbose",
];

/// Long options that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["folder", "from", "to", "on-conflict", "preset", "config"];

/// Rewrite Go-style single-dash long flags (`-from x`, `-from=x`) to the
/// double-dash form clap expects.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
	I: IntoIterator<Item = OsString>,
{
	let mut normalized = Vec::new();
	let mut expecting_value = false;
	let mut passthrough = false;

	for (i, arg) in args.into_iter().enumerate() {
		if i == 0 || passthrough || expecting_value {
			expecting_value = false;
			normalized.push(arg);
			continue;
		}

		let Some(text) = arg.to_str() else {
			normalized.push(arg);
			continue;
		};

		if text == "--" {
			passthrough = true;
			normalized.push(arg);
			continue;
		}

		let name = text
			.strip_prefix("--")
			.or_else(|| text.strip_prefix('-'))
			.map(|rest| rest.split_once('=').map_or(rest, |(name, _)| name));

		match name {
			Some(name) if LONG_FLAGS.contains(&name) => {
				expecting_value = VALUE_FLAGS.contains(&name) && !text.contains('=');
				if text.starts_with("--") {
					normalized.push(arg);
				} else {
					normalized.push(OsString::from(format!("-{text}")));
				}
			}
			_ => normalized.push(arg),
		}
	}

	normalized
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse_from(normalize_args(std::env::args_os()));

	init_logger(level_from_occurrences(cli.verbose)).context("Failed to initialize logging")?;

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config =
		load_config(cli.config.as_deref(), &cwd).context("Failed to load configuration")?;

	if cli.list_presets {
		return handle_list_presets(&config);
	}

	let (from, to) = match cli.preset {
		Some(ref name) => {
			let found = config
				.find_preset(name)
				.context("Failed to resolve preset")?;
			log::debug!("using preset '{}' from {}", name, found.source.display());
			(found.preset.from.clone(), found.preset.to.clone())
		}
		None => (
			cli.from.clone().unwrap_or_default(),
			cli.to.clone().unwrap_or_default(),
		),
	};

	if from.is_empty() || to.is_empty() {
		return handle_usage();
	}

	let options = RenameOptions {
		folder: cli.folder,
		from,
		to,
		dry_run: cli.dry_run,
		on_conflict: cli.on_conflict.or(config.on_conflict).unwrap_or_default(),
	};
	log::debug!("running with {:?}", options);

	let renamer = Renamer::new(options).context("Failed to compile pattern")?;

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	renamer
		.execute(&mut out)
		.context("Failed to rename files")?;
	out.flush().context("Failed to flush output")?;

	Ok(ExitCode::SUCCESS)
}

fn handle_usage() -> Result<ExitCode> {
	Cli::command()
		.print_help()
		.context("Failed to print usage")?;
	Ok(ExitCode::SUCCESS)
}

fn handle_list_presets(config: &MergedConfig) -> Result<ExitCode> {
	let presets = config.visible_presets();

	if presets.is_empty() {
		println!("No presets found.");
	} else {
		println!("Presets:\n");
		for loaded in presets {
			let preset = &loaded.preset;
			println!("  {}: {} -> {}", preset.name, preset.from, preset.to);
			if let Some(ref description) = preset.description {
				println!("    {}", description);
			}
			println!("    (from {})", loaded.source.display());
		}
	}

	if let Some(policy) = config.on_conflict {
		println!("\non-conflict: {}", policy);
	}

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("\nUser config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn normalize(args: &[&str]) -> Vec<String> {
		normalize_args(args.iter().map(OsString::from))
			.into_iter()
			.map(|a| a.into_string().unwrap())
			.collect()
	}

	#[test]
	fn test_normalize_single_dash_flags() {
		assert_eq!(
			normalize(&["file-renamer", "-from", "a_*", "-to", "b_*", "-dry-run"]),
			vec!["file-renamer", "--from", "a_*", "--to", "b_*", "--dry-run"]
		);
	}

	#[test]
	fn test_normalize_equals_form() {
		assert_eq!(
			normalize(&["file-renamer", "-from=a_*", "-folder=./docs"]),
			vec!["file-renamer", "--from=a_*", "--folder=./docs"]
		);
	}

	#[test]
	fn test_normalize_leaves_values_alone() {
		// A value that happens to look like a flag is still a value.
		assert_eq!(
			normalize(&["file-renamer", "-from", "-to", "-to", "x"]),
			vec!["file-renamer", "--from", "-to", "--to", "x"]
		);

		let cli = Cli::parse_from(normalize_args(
			["file-renamer", "-from", "-to", "-to", "x"]
				.into_iter()
				.map(OsString::from),
		));
		assert_eq!(cli.from.as_deref(), Some("-to"));
		assert_eq!(cli.to.as_deref(), Some("x"));
	}

	#[test]
	fn test_normalize_keeps_short_and_double_dash() {
		assert_eq!(
			normalize(&["file-renamer", "-v", "-h", "--from", "a", "-vv"]),
			vec!["file-renamer", "-v", "-h", "--from", "a", "-vv"]
		);
	}

	#[test]
	fn test_normalize_stops_at_separator() {
		assert_eq!(
			normalize(&["file-renamer", "--", "-from"]),
			vec!["file-renamer", "--", "-from"]
		);
	}

	#[test]
	fn test_cli_parses_normalized_args() {
		let cli = Cli::parse_from(normalize_args(
			["file-renamer", "-from", "a_*", "-to", "b_*", "-on-conflict", "overwrite"]
				.into_iter()
				.map(OsString::from),
		));
		assert_eq!(cli.from.as_deref(), Some("a_*"));
		assert_eq!(cli.to.as_deref(), Some("b_*"));
		assert_eq!(cli.on_conflict, Some(ConflictPolicy::Overwrite));
		assert_eq!(cli.folder, PathBuf::from("."));
		assert!(!cli.dry_run);
	}

	#[test]
	fn test_cli_accepts_values_starting_with_dash() {
		let cli = Cli::parse_from(normalize_args(
			["file-renamer", "-from", "-draft_*.txt", "-to", "-final_*.txt", "-folder", "-dir"]
				.into_iter()
				.map(OsString::from),
		));
		assert_eq!(cli.from.as_deref(), Some("-draft_*.txt"));
		assert_eq!(cli.to.as_deref(), Some("-final_*.txt"));
		assert_eq!(cli.folder, PathBuf::from("-dir"));
	}

	#[test]
	fn test_cli_dry_run_accepts_go_style_bool_values() {
		let parse = |args: &[&str]| {
			let mut argv = vec!["file-renamer", "-from", "a_*", "-to", "b_*"];
			argv.extend_from_slice(args);
			Cli::parse_from(normalize_args(argv.into_iter().map(OsString::from))).dry_run
		};

		assert!(!parse(&[]));
		assert!(parse(&["-dry-run"]));
		assert!(parse(&["-dry-run=true"]));
		assert!(parse(&["--dry-run=1"]));
		assert!(!parse(&["-dry-run=false"]));
		assert!(!parse(&["-dry-run=0"]));
	}

	#[test]
	fn test_cli_definition_is_valid() {
		Cli::command().debug_assert();
	}
}
