use crate::error::{RenamerError, Result};
use crate::pattern::WildcardPattern;
use crate::rename::ConflictPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level configuration from a `.renamer.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// What to do when a generated name is already taken.
	#[serde(default)]
	pub on_conflict: Option<ConflictPolicy>,

	/// Named from/to pattern pairs, selectable with `--preset`.
	#[serde(default)]
	pub presets: Vec<Preset>,
}

/// A named pair of rename patterns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Preset {
	/// Name used to select the preset.
	pub name: String,

	/// Pattern the current filenames must match.
	pub from: String,

	/// Pattern the new filenames are generated from.
	pub to: String,

	/// Free-form text shown by `--list-presets`.
	pub description: Option<String>,
}

/// A loaded configuration with its source path for display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from every config file that was found.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Conflict policy from the most specific config that sets one.
	pub on_conflict: Option<ConflictPolicy>,

	/// Presets in cascade order; earlier entries shadow later ones.
	pub presets: Vec<PresetWithSource>,
}

/// A preset with the config file it came from.
#[derive(Debug, Clone)]
pub struct PresetWithSource {
	/// The preset itself.
	pub preset: Preset,

	/// The config file this preset came from.
	pub source: PathBuf,
}

impl Preset {
	/// Check that the preset can produce names at all.
	pub fn validate(&self) -> Result<()> {
		let invalid = |reason: String| RenamerError::InvalidPreset {
			name: self.name.clone(),
			reason,
		};

		if self.name.trim().is_empty() {
			return Err(invalid("name must not be empty".to_string()));
		}
		if self.from.is_empty() {
			return Err(invalid("'from' must not be empty".to_string()));
		}
		if self.to.is_empty() {
			return Err(invalid("'to' must not be empty".to_string()));
		}

		let old = WildcardPattern::parse(&self.from).wildcard_count();
		let new = WildcardPattern::parse(&self.to).wildcard_count();
		if old != new {
			return Err(invalid(
				RenamerError::WildcardCountMismatch { old, new }.to_string(),
			));
		}

		Ok(())
	}
}

impl Config {
	/// Validate all presets in this config.
	pub fn validate(&self) -> Result<()> {
		let mut seen = HashSet::new();
		for preset in &self.presets {
			preset.validate()?;
			if !seen.insert(preset.name.as_str()) {
				return Err(RenamerError::InvalidPreset {
					name: preset.name.clone(),
					reason: "defined more than once".to_string(),
				});
			}
		}
		Ok(())
	}
}

impl MergedConfig {
	/// Look up a preset by name. The most specific config wins.
	pub fn find_preset(&self, name: &str) -> Result<&PresetWithSource> {
		self.presets
			.iter()
			.find(|p| p.preset.name == name)
			.ok_or_else(|| RenamerError::PresetNotFound {
				name: name.to_string(),
			})
	}

	/// Presets that are not shadowed by a more specific config.
	pub fn visible_presets(&self) -> Vec<&PresetWithSource> {
		let mut seen = HashSet::new();
		self.presets
			.iter()
			.filter(|p| seen.insert(p.preset.name.as_str()))
			.collect()
	}
}
