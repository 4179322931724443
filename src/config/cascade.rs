use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, PresetWithSource};
use crate::error::{RenamerError, Result};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".renamer.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. `.renamer.toml` in `start_dir`
/// 2. `.renamer.toml` in each parent directory, up to the filesystem root
/// 3. `~/.renamer.toml`, unless it was already found on the way up
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if config_path.is_file() {
			log::debug!("found config {}", config_path.display());
			configs.push(LoadedConfig {
				config: parse_config_file(&config_path)?,
				path: config_path,
			});
		}
	}

	if let Some(home_dir) = dirs::home_dir() {
		let user_config = home_dir.join(CONFIG_FILE_NAME);
		let already_loaded = configs
			.iter()
			.any(|loaded| same_path(&loaded.path, &user_config));

		if !already_loaded && user_config.is_file() {
			log::debug!("found user config {}", user_config.display());
			configs.push(LoadedConfig {
				config: parse_config_file(&user_config)?,
				path: user_config,
			});
		}
	}

	Ok(configs)
}

fn same_path(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Presets are collected in cascade order (first match wins).
/// The conflict policy comes from the first config that sets one.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		for preset in &loaded.config.presets {
			merged.presets.push(PresetWithSource {
				preset: preset.clone(),
				source: loaded.path.clone(),
			});
		}

		if merged.on_conflict.is_none() {
			merged.on_conflict = loaded.config.on_conflict;
		}
	}

	merged
}

/// Load the effective config.
///
/// An explicit path bypasses discovery entirely; otherwise the cascade
/// starting at `start_dir` is used.
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<MergedConfig> {
	let configs = match explicit {
		Some(path) => vec![LoadedConfig {
			config: parse_config_file(path)?,
			path: path.to_path_buf(),
		}],
		None => discover_configs(start_dir)?,
	};
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RenamerError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
