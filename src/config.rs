use crate::classifier::{CategoryId, CategoryMap};
use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What to do when the destination already holds a file with the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
	/// Leave the file in the source directory and report `NameCollision`
	#[default]
	Fail,
	/// Move as `name (N).ext` with the smallest free N
	AppendSuffix,
}

/// Target directory per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetDirectories(BTreeMap<CategoryId, PathBuf>);

impl TargetDirectories {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, category: impl Into<CategoryId>, dir: impl Into<PathBuf>) {
		self.0.insert(category.into(), dir.into());
	}

	pub fn with(mut self, category: impl Into<CategoryId>, dir: impl Into<PathBuf>) -> Self {
		self.insert(category, dir);
		self
	}

	pub fn get(&self, category: &CategoryId) -> Option<&Path> {
		self.0.get(category).map(PathBuf::as_path)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &Path)> {
		self.0.iter().map(|(id, dir)| (id, dir.as_path()))
	}
}

impl<C: Into<CategoryId>, P: Into<PathBuf>> FromIterator<(C, P)> for TargetDirectories {
	fn from_iter<T: IntoIterator<Item = (C, P)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(c, p)| (c.into(), p.into())).collect())
	}
}

/// Everything a watch session needs. Read-only once the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfiguration {
	pub source_dir: PathBuf,
	pub targets: TargetDirectories,
	pub categories: CategoryMap,
	pub collision_policy: CollisionPolicy,
}

impl WatchConfiguration {
	/// Configuration using the default category table and `CollisionPolicy::Fail`
	pub fn new(source_dir: impl Into<PathBuf>, targets: TargetDirectories) -> Self {
		Self {
			source_dir: source_dir.into(),
			targets,
			categories: CategoryMap::default(),
			collision_policy: CollisionPolicy::default(),
		}
	}

	pub fn with_categories(mut self, categories: CategoryMap) -> Self {
		self.categories = categories;
		self
	}

	pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
		self.collision_policy = policy;
		self
	}

	/// Target directory for a category; present for every mapped category once validated
	pub fn target_for(&self, category: &CategoryId) -> Option<&Path> {
		self.targets.get(category)
	}

	/// Check that the source, every category the map can produce, and every
	/// configured target have a non-empty path
	pub fn validate(&self) -> Result<()> {
		if self.source_dir.as_os_str().is_empty() {
			return Err(OrganizerError::configuration_incomplete("source_dir"));
		}

		for category in self.categories.categories() {
			match self.targets.get(category) {
				Some(dir) if !dir.as_os_str().is_empty() => {}
				_ => {
					return Err(OrganizerError::configuration_incomplete(format!(
						"{category}_dir"
					)))
				}
			}
		}

		// Unmapped entries must still name a directory
		if let Some((category, _)) = self.targets.iter().find(|(_, dir)| dir.as_os_str().is_empty()) {
			return Err(OrganizerError::configuration_incomplete(format!("{category}_dir")));
		}

		Ok(())
	}
}
