use crate::{Error, Result, matcher};
use regex::Regex;

/// One feature's text-patch rule: where to look, what to write, and the
/// literal that proves a previous run already wrote it.
#[derive(Debug, Clone)]
pub struct PatternRule {
	/// Feature identifier this rule patches (e.g. "serverless").
	pub feature: String,
	/// Search pattern over the bundle text. First match wins.
	pub search: Regex,
	/// Replacement for the matched span, with `${n}` capture expansion.
	pub rewrite: String,
	/// Literal substring whose presence means the patch was already applied.
	pub marker: String,
}

impl PatternRule {
	pub fn new(
		feature: impl Into<String>,
		search: &str,
		rewrite: impl Into<String>,
		marker: impl Into<String>,
	) -> Result<Self> {
		Ok(Self {
			feature: feature.into(),
			search: Regex::new(search)?,
			rewrite: rewrite.into(),
			marker: marker.into(),
		})
	}
}

/// Applies `rule` to `source` and returns the patched text. Pure transform;
/// persisting the result is the caller's responsibility.
///
/// Outcomes:
/// - `Ok(patched)` where `patched != source`.
/// - `AlreadyPatched` when the marker is present, whether the search pattern
///   still matches or not. The marker check takes priority over
///   `PatternNotFound` so that a drifted-looking file that was in fact
///   patched is not misreported as pattern drift.
/// - `PatternNotFound` when nothing matches and no marker is present.
/// - `PatternMatchFailed` when the match succeeded but the rewrite changed
///   nothing and no marker is present. That combination means the rule itself
///   is defective and must never be silently ignored.
pub fn apply_text_patch(source: &str, rule: &PatternRule) -> Result<String> {
	let patched = match matcher::rewrite_first(source, &rule.search, &rule.rewrite, &rule.feature) {
		Ok(patched) => patched,
		Err(Error::PatternNotFound(subject)) => {
			if source.contains(&rule.marker) {
				return Err(Error::AlreadyPatched(subject));
			}
			return Err(Error::PatternNotFound(subject));
		}
		Err(err) => return Err(err),
	};

	// Some patterns still match already-patched text and rewrite it to itself,
	// so the no-op check must run even after a successful match.
	if patched == source {
		if source.contains(&rule.marker) {
			return Err(Error::AlreadyPatched(rule.feature.clone()));
		}
		return Err(Error::PatternMatchFailed(rule.feature.clone()));
	}

	Ok(patched)
}
