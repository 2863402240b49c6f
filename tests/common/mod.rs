//! Common test utilities for the sort-mover library

#![allow(dead_code)]

use sort_mover::classifier::{DOCUMENTS, MUSIC, OTHER, PICTURES, VIDEO};
use sort_mover::{OrganizerEvent, OrganizerEvents, TargetDirectories, WatchConfiguration};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const CATEGORIES: [&str; 5] = [VIDEO, PICTURES, DOCUMENTS, MUSIC, OTHER];

/// A source folder plus one target folder per default category
pub struct Layout {
	pub temp_dir: TempDir,
	pub source: PathBuf,
}

impl Layout {
	pub fn target(&self, category: &str) -> PathBuf {
		self.temp_dir.path().join("sorted").join(category)
	}

	pub fn config(&self) -> WatchConfiguration {
		let targets: TargetDirectories =
			CATEGORIES.into_iter().map(|c| (c, self.target(c))).collect();
		WatchConfiguration::new(&self.source, targets)
	}
}

/// Create a temporary source folder and all target folders
pub fn setup_layout() -> Layout {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let source = temp_dir.path().join("incoming");
	std::fs::create_dir(&source).expect("Failed to create source directory");

	let layout = Layout { temp_dir, source };
	for category in CATEGORIES {
		std::fs::create_dir_all(layout.target(category)).expect("Failed to create target");
	}
	layout
}

/// Create a test file with content
pub fn create_test_file(path: &Path, content: &str) -> std::io::Result<()> {
	std::fs::write(path, content)
}

/// Wait for a short duration to allow file system events to propagate
pub async fn wait_for_events() {
	tokio::time::sleep(Duration::from_millis(100)).await;
}

/// Next outcome from the organizer, or `None` after five seconds
pub async fn next_event(events: &mut OrganizerEvents) -> Option<OrganizerEvent> {
	tokio::time::timeout(Duration::from_secs(5), events.recv())
		.await
		.ok()
		.flatten()
}

/// Poll until `path` exists, for at most five seconds
pub async fn wait_for_path(path: &Path) -> bool {
	for _ in 0..50 {
		if path.exists() {
			return true;
		}
		wait_for_events().await;
	}
	path.exists()
}
