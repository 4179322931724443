use std::path::PathBuf;

/// Library-level structured errors for the renamer.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RenamerError {
	#[error("Invalid pattern '{pattern}'")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Cannot read folder '{}'", path.display())]
	DirectoryUnreadable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("pattern mismatch: old pattern has {old} wildcards but new pattern has {new}")]
	WildcardCountMismatch { old: usize, new: usize },

	#[error("{source}")]
	RenameFailed {
		from: PathBuf,
		to: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("target already exists")]
	TargetExists { target: PathBuf },

	#[error("Failed to write output")]
	OutputFailed {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {}", path.display())]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {}", path.display())]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid preset '{name}': {reason}")]
	InvalidPreset { name: String, reason: String },

	#[error("Preset not found: {name}")]
	PresetNotFound { name: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RenamerError.
pub type Result<T> = std::result::Result<T, RenamerError>;
