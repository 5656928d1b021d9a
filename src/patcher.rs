use crate::{ArchiveCodec, Error, PatchConfig, PatternRule, Result, apply_text_patch, diff_patch};
use simple_fs::{SPath, read_to_string};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Patcher options. At least one of `archive`/`dir` is required; the missing
/// one is derived from the other.
#[derive(Debug, Default)]
pub struct PatcherOptions {
	/// Packed archive file (e.g. `.../resources/app.asar`).
	pub archive: Option<SPath>,
	/// Unpacked application directory.
	pub dir: Option<SPath>,
	/// Ordered feature identifiers to patch.
	pub features: Vec<String>,
}

/// Orchestrates one patch run over a single application install: backup,
/// unpack, per-feature patching, repack. Single-threaded, whole-file I/O,
/// no shared state across operations.
pub struct Patcher {
	archive: SPath,
	dir: SPath,
	features: Vec<String>,
	config: PatchConfig,
}

impl Patcher {
	pub fn new(options: PatcherOptions) -> Result<Self> {
		Self::with_config(options, PatchConfig::default())
	}

	pub fn with_config(options: PatcherOptions, config: PatchConfig) -> Result<Self> {
		let (archive, dir) = match (options.archive, options.dir) {
			(Some(archive), Some(dir)) => (archive, dir),
			(Some(archive), None) => {
				let dir = dir_for_archive(&archive);
				(archive, dir)
			}
			(None, Some(dir)) => {
				let archive = SPath::new(format!("{dir}.asar"));
				(archive, dir)
			}
			(None, None) => {
				return Err(Error::ResourceNotFound(
					"no archive or app directory given".to_string(),
				));
			}
		};

		if options.features.is_empty() {
			return Err(Error::NoFeatures);
		}

		Ok(Self {
			archive,
			dir,
			features: options.features,
			config,
		})
	}

	pub fn archive(&self) -> &SPath {
		&self.archive
	}

	pub fn dir(&self) -> &SPath {
		&self.dir
	}

	pub fn features(&self) -> &[String] {
		&self.features
	}
}

// region:    --- Archive Lifecycle

impl Patcher {
	/// Copies the archive to a timestamped `<archive>.<millis>.backup` sibling
	/// and returns the backup path. This backup is the only recovery path for
	/// a run that fails midway through a multi-feature patch.
	pub fn backup_archive(&self) -> Result<SPath> {
		let now_ms = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(Error::custom)?
			.as_millis();
		let backup = SPath::new(format!("{}.{now_ms}.backup", self.archive));
		fs::copy(self.archive.std_path(), backup.std_path())?;
		Ok(backup)
	}

	/// Unpacks the archive into the app directory.
	pub fn unpack(&self, codec: &dyn ArchiveCodec) -> Result<()> {
		debug!("unpacking {} into {}", self.archive, self.dir);
		codec.extract_all(&self.archive, &self.dir)
	}

	/// Packs the app directory back into the archive.
	pub fn pack(&self, codec: &dyn ArchiveCodec) -> Result<()> {
		debug!("packing {} into {}", self.dir, self.archive);
		codec.create_package(&self.dir, &self.archive)
	}

	/// Removes the unpacked app directory.
	pub fn remove_dir(&self) -> Result<()> {
		fs::remove_dir_all(self.dir.std_path())?;
		Ok(())
	}
}

// endregion: --- Archive Lifecycle

// region:    --- Patching

impl Patcher {
	/// Patches every requested feature against the app directory, in order.
	///
	/// The first error aborts the run; earlier features' writes stay in place
	/// (non-atomic by design, the archive backup is the recovery path). No
	/// retries, no continue-on-error.
	pub fn patch_dir(&self) -> Result<()> {
		for feature in &self.features {
			info!("patching feature: {feature}");
			self.patch_feature(feature)?;
		}
		Ok(())
	}

	/// First-match-wins dispatch: a registered rule patches the bundle file;
	/// any other identifier is treated as a `<feature>.diff` file on disk.
	fn patch_feature(&self, feature: &str) -> Result<()> {
		if let Some(rule) = self.config.rule_for(feature) {
			self.patch_bundle(rule)
		} else {
			self.patch_from_diff_file(feature)
		}
	}

	fn patch_bundle(&self, rule: &PatternRule) -> Result<()> {
		let bundle_path = self.dir.join(&self.config.bundle_path);
		debug!("applying '{}' rule to {bundle_path}", rule.feature);

		let source = read_to_string(&bundle_path)?;
		let patched = apply_text_patch(&source, rule)?;
		fs::write(bundle_path.std_path(), patched)?;

		Ok(())
	}

	fn patch_from_diff_file(&self, feature: &str) -> Result<()> {
		let patch_path = self.config.patches_dir.join(format!("{feature}.diff"));
		if !patch_path.exists() {
			return Err(Error::ResourceNotFound(patch_path.to_string()));
		}

		let raw = read_to_string(&patch_path)?;
		let patch_set = diff_patch::parse_patch_set(&raw)?;
		debug!("applying {} file patch(es) for '{feature}'", patch_set.len());

		diff_patch::apply_patch_set(&self.dir, &patch_set)
	}
}

// endregion: --- Patching

// region:    --- Support

/// Derives the unpack directory from the archive path: same parent, file stem
/// without the archive extension (`.../app.asar` -> `.../app`).
fn dir_for_archive(archive: &SPath) -> SPath {
	let path = archive.std_path();
	let Some(stem) = path.file_stem() else {
		return archive.clone();
	};
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.join(stem),
		_ => std::path::PathBuf::from(stem),
	};
	SPath::new(dir.to_string_lossy().to_string())
}

// endregion: --- Support
