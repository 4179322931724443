use crate::error::{RenamerError, Result};
use crate::pattern::matcher::WildcardPattern;

/// Generate a new filename by substituting captures into a wildcard pattern.
///
/// The first wildcard receives the first capture, the second the second,
/// and so on. The output is never rescanned, so a capture containing `*`
/// is inserted verbatim.
pub fn generate(new_pattern: &str, captures: &[&str]) -> Result<String> {
	generate_from(&WildcardPattern::parse(new_pattern), captures)
}

/// Same as [`generate`], for a pattern that has already been split.
pub fn generate_from(new_pattern: &WildcardPattern, captures: &[&str]) -> Result<String> {
	let wildcards = new_pattern.wildcard_count();
	if wildcards != captures.len() {
		return Err(RenamerError::WildcardCountMismatch {
			old: captures.len(),
			new: wildcards,
		});
	}

	let segments = new_pattern.segments();
	let capacity = segments.iter().map(String::len).sum::<usize>()
		+ captures.iter().map(|c| c.len()).sum::<usize>();
	let mut result = String::with_capacity(capacity);

	result.push_str(&segments[0]);
	for (capture, segment) in captures.iter().zip(&segments[1..]) {
		result.push_str(capture);
		result.push_str(segment);
	}

	Ok(result)
}
