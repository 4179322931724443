use crate::error::{RenamerError, Result};
use regex::{Regex, RegexBuilder};

/// The only wildcard token recognised in patterns.
pub const WILDCARD: char = '*';

/// Upper bound on the compiled size of a pattern's regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A wildcard pattern split into its literal segments.
///
/// A pattern with `n` wildcards always has `n + 1` segments; segments may
/// be empty (e.g. `*.txt` is `["", ".txt"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
	raw: String,
	segments: Vec<String>,
}

impl WildcardPattern {
	/// Split a pattern string on the wildcard token.
	pub fn parse(pattern: &str) -> Self {
		WildcardPattern {
			raw: pattern.to_string(),
			segments: pattern.split(WILDCARD).map(str::to_string).collect(),
		}
	}

	/// The pattern exactly as given.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Literal text between (and around) the wildcards, in order.
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Number of wildcard tokens in the pattern.
	pub fn wildcard_count(&self) -> usize {
		self.segments.len() - 1
	}

	/// Build the anchored regex source for this pattern.
	///
	/// Literals are escaped; each wildcard becomes a greedy, non-empty
	/// capture group.
	fn to_regex_source(&self) -> String {
		let body = self
			.segments
			.iter()
			.map(|s| regex::escape(s))
			.collect::<Vec<_>>()
			.join("(.+)");
		format!("^{}$", body)
	}
}

/// A wildcard pattern compiled for repeated matching against filenames.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
	pattern: WildcardPattern,
	regex: Regex,
}

impl CompiledMatcher {
	/// Compile a wildcard pattern.
	pub fn compile(pattern: &str) -> Result<Self> {
		compile_with_limit(pattern, REGEX_SIZE_LIMIT)
	}

	/// The source pattern.
	pub fn pattern(&self) -> &WildcardPattern {
		&self.pattern
	}

	/// Check whether the whole filename matches the pattern.
	pub fn is_match(&self, filename: &str) -> bool {
		self.regex.is_match(filename)
	}

	/// Match a filename and return one capture per wildcard, left to right.
	///
	/// Returns `None` if the filename does not match the whole pattern.
	pub fn captures<'h>(&self, filename: &'h str) -> Option<Vec<&'h str>> {
		let caps = self.regex.captures(filename)?;
		// Every group takes part in a match since none are optional.
		caps.iter()
			.skip(1)
			.map(|group| group.map(|m| m.as_str()))
			.collect()
	}
}

fn compile_with_limit(pattern: &str, size_limit: usize) -> Result<CompiledMatcher> {
	let parsed = WildcardPattern::parse(pattern);
	let regex = RegexBuilder::new(&parsed.to_regex_source())
		.dot_matches_new_line(true)
		.size_limit(size_limit)
		.build()
		.map_err(|source| RenamerError::InvalidPattern {
			pattern: pattern.to_string(),
			source,
		})?;

	log::trace!("compiled pattern '{}' to regex '{}'", pattern, regex.as_str());

	Ok(CompiledMatcher {
		pattern: parsed,
		regex,
	})
}
