use crate::{Error, Result};
use regex::{Match, Regex};

/// Locates the first match of `search` in `source`.
///
/// Rule authors must anchor `search` tightly enough that the first match is the
/// intended span; this function does not disambiguate multiple matches.
pub fn locate<'t>(source: &'t str, search: &Regex) -> Option<Match<'t>> {
	search.find(source)
}

/// Rewrites the first match of `search` in `source` with `rewrite` (supports
/// `${n}` capture expansion), leaving the rest of the source untouched.
///
/// No match is a configuration error, not a no-op: it means the target file
/// drifted from the build the pattern was written for, so it must surface as
/// `PatternNotFound` naming `subject`.
pub fn rewrite_first(source: &str, search: &Regex, rewrite: &str, subject: &str) -> Result<String> {
	if !search.is_match(source) {
		return Err(Error::PatternNotFound(subject.to_string()));
	}

	Ok(search.replace(source, rewrite).into_owned())
}
