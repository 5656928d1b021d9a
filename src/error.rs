use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

/// Crate error. Patch failures are first-class variants so that callers can
/// tell "already patched" from "pattern drifted" from "logic defect"
/// programmatically, not by message text.
#[derive(Debug, Display, From)]
pub enum Error {
	#[from(String, &String, &str)]
	Custom(String),

	// -- Patch engine
	#[display("resource not found: {_0}")]
	ResourceNotFound(String),

	#[display("can't patch '{_0}', pattern match found nothing (target file format may have changed)")]
	PatternNotFound(String),

	#[display("'{_0}' is already patched")]
	AlreadyPatched(String),

	#[display("can't patch '{_0}', pattern matched but produced no change")]
	PatternMatchFailed(String),

	#[display("can't patch '{_0}', hunk context did not apply")]
	HunkApplyFailed(String),

	#[display("features list is empty")]
	NoFeatures,

	// -- Externals
	#[from]
	Io(std::io::Error),

	#[from]
	SimpleFs(simple_fs::Error),

	#[from]
	Regex(regex::Error),

	#[from]
	DiffyParse(diffy::ParsePatchError),
}

// region:    --- Custom

impl Error {
	pub fn custom(val: impl std::fmt::Display) -> Self {
		Self::Custom(val.to_string())
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
