//! Relocation of a single file into a target directory
//!
//! Moves are plain renames. There is no copy fallback, so a move across
//! devices fails with `MoveFailureReason::CrossDevice`.

use crate::config::CollisionPolicy;
use crate::error::{MoveFailureReason, OrganizerError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on `name (N).ext` candidates tried before giving up
const MAX_SUFFIX_ATTEMPTS: u32 = 10_000;

/// Move `source` into `target_dir`, keeping its base name unless the
/// collision policy picks another one. Returns the final destination.
pub async fn relocate(source: &Path, target_dir: &Path, policy: CollisionPolicy) -> Result<PathBuf> {
	let Some(file_name) = source.file_name() else {
		return Err(OrganizerError::move_failed(
			source,
			target_dir,
			MoveFailureReason::Other("path has no file name".to_string()),
		));
	};
	let preferred = target_dir.join(file_name);

	match tokio::fs::metadata(target_dir).await {
		Ok(meta) if meta.is_dir() => {}
		_ => {
			return Err(OrganizerError::move_failed(
				source,
				&preferred,
				MoveFailureReason::DestinationMissing,
			))
		}
	}

	let destination = match policy {
		CollisionPolicy::Fail => {
			if exists(&preferred).await {
				return Err(OrganizerError::move_failed(
					source,
					&preferred,
					MoveFailureReason::NameCollision,
				));
			}
			preferred
		}
		CollisionPolicy::AppendSuffix => free_destination(source, &preferred).await?,
	};

	debug!("Renaming {} -> {}", source.display(), destination.display());
	tokio::fs::rename(source, &destination)
		.await
		.map_err(|e| OrganizerError::move_failed(source, &destination, MoveFailureReason::from_io(&e)))?;

	Ok(destination)
}

async fn exists(path: &Path) -> bool {
	tokio::fs::symlink_metadata(path).await.is_ok()
}

async fn free_destination(source: &Path, preferred: &Path) -> Result<PathBuf> {
	if !exists(preferred).await {
		return Ok(preferred.to_path_buf());
	}

	for n in 1..=MAX_SUFFIX_ATTEMPTS {
		let candidate = suffixed(preferred, n);
		if !exists(&candidate).await {
			return Ok(candidate);
		}
	}

	Err(OrganizerError::move_failed(source, preferred, MoveFailureReason::NameCollision))
}

/// `dir/name.ext` -> `dir/name (n).ext`
fn suffixed(path: &Path, n: u32) -> PathBuf {
	let stem = path.file_stem().unwrap_or_default();
	let mut name = OsString::from(stem);
	name.push(format!(" ({n})"));
	if let Some(ext) = path.extension() {
		name.push(".");
		name.push(ext);
	}
	path.with_file_name(name)
}
