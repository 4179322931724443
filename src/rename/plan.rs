use crate::error::RenamerError;
use crate::pattern::{CompiledMatcher, WildcardPattern, generate_from};

/// A single source -> target rename within one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameInstruction {
	/// Current filename.
	pub source: String,

	/// Filename after the rename.
	pub target: String,
}

/// What to do with a filename that matched the old pattern.
#[derive(Debug)]
pub enum PlannedRename {
	/// Rename the file.
	Rename(RenameInstruction),

	/// The generated name is identical to the current one.
	Unchanged(String),

	/// No new name could be generated; the file is left alone.
	Skipped { source: String, error: RenamerError },
}

impl PlannedRename {
	/// The filename this plan entry was made for.
	pub fn source(&self) -> &str {
		match self {
			PlannedRename::Rename(instruction) => &instruction.source,
			PlannedRename::Unchanged(source) => source,
			PlannedRename::Skipped { source, .. } => source,
		}
	}
}

/// Plan the rename of a single filename.
///
/// Returns `None` if the filename does not match the old pattern.
pub fn plan_rename(
	filename: &str,
	matcher: &CompiledMatcher,
	new_pattern: &WildcardPattern,
) -> Option<PlannedRename> {
	let captures = matcher.captures(filename)?;

	let planned = match generate_from(new_pattern, &captures) {
		Ok(target) if target == filename => PlannedRename::Unchanged(filename.to_string()),
		Ok(target) => PlannedRename::Rename(RenameInstruction {
			source: filename.to_string(),
			target,
		}),
		Err(error) => PlannedRename::Skipped {
			source: filename.to_string(),
			error,
		},
	};

	Some(planned)
}

/// Plan renames for a list of filenames, dropping those that don't match.
pub fn plan_renames<I, S>(
	filenames: I,
	matcher: &CompiledMatcher,
	new_pattern: &WildcardPattern,
) -> Vec<PlannedRename>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	filenames
		.into_iter()
		.filter_map(|name| plan_rename(name.as_ref(), matcher, new_pattern))
		.collect()
}
