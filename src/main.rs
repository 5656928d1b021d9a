//! bundlepatch: patch the packed script bundle of an installed desktop application.
//!
//! ```text
//! bundlepatch --dir <app-dir> [--archive <app.asar>] [--patches-dir patches] <feature>...
//! ```
//!
//! Operates on an already-unpacked application directory; archive pack/unpack
//! is a library capability (`ArchiveCodec`) provided by the embedder. When the
//! packed archive is present, a timestamped backup copy is made before any
//! patch is applied. Exits non-zero on the first error, printing its message.

use bundlepatch::{Error, PatchConfig, Patcher, PatcherOptions, Result};
use clap::Parser;
use simple_fs::SPath;

#[derive(Parser, Debug)]
#[command(
	name = "bundlepatch",
	version,
	about = "Patch the packed script bundle of a desktop application"
)]
struct Cli {
	/// Path to the packed app archive (backed up before patching).
	#[arg(long)]
	archive: Option<String>,

	/// Path to the unpacked application directory.
	#[arg(long)]
	dir: Option<String>,

	/// Directory containing `<feature>.diff` patch files.
	#[arg(long, default_value = "patches")]
	patches_dir: String,

	/// Feature names to patch, in order.
	#[arg(required = true)]
	features: Vec<String>,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("Error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();

	let config = PatchConfig {
		patches_dir: SPath::new(cli.patches_dir),
		..Default::default()
	};

	let patcher = Patcher::with_config(
		PatcherOptions {
			archive: cli.archive.map(SPath::new),
			dir: cli.dir.map(SPath::new),
			features: cli.features,
		},
		config,
	)?;

	if patcher.archive().exists() {
		let backup = patcher.backup_archive()?;
		println!("Backup: {backup}");
	}

	if !patcher.dir().exists() {
		return Err(Error::ResourceNotFound(patcher.dir().to_string()));
	}

	println!("Patching features: {}", patcher.features().join(", "));
	patcher.patch_dir()?;
	println!("Done");

	Ok(())
}
