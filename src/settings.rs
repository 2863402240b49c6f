//! Persisted settings
//!
//! A flat JSON record with `source_dir` and one `<category>_dir` key per
//! category. Extra `<name>_dir` keys add categories; a `categories` key can
//! replace the default extension table.

use crate::classifier::{CategoryId, CategoryMap, DOCUMENTS, MUSIC, OTHER, PICTURES, VIDEO};
use crate::config::{CollisionPolicy, TargetDirectories, WatchConfiguration};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

const DIR_SUFFIX: &str = "_dir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
	#[serde(default)]
	pub source_dir: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub categories: Option<CategoryMap>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub collision_policy: Option<CollisionPolicy>,

	/// `<category>_dir` keys
	#[serde(flatten)]
	pub target_dirs: BTreeMap<String, String>,
}

impl Default for Settings {
	fn default() -> Self {
		let target_dirs = [VIDEO, PICTURES, DOCUMENTS, MUSIC, OTHER]
			.into_iter()
			.map(|c| (dir_key(c), String::new()))
			.collect();

		Self { source_dir: String::new(), categories: None, collision_policy: None, target_dirs }
	}
}

impl Settings {
	/// Load settings, falling back to empty defaults when the file does not exist
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			info!("No settings at {}, starting from defaults", path.display());
			return Ok(Self::default());
		}

		let contents = std::fs::read_to_string(path)?;
		let settings = serde_json::from_str(&contents)?;
		debug!("Loaded settings from {}", path.display());
		Ok(settings)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self)?;
		std::fs::write(path, json)?;
		debug!("Saved settings to {}", path.display());
		Ok(())
	}

	pub fn target_dir(&self, category: &str) -> Option<&str> {
		self.target_dirs.get(&dir_key(category)).map(String::as_str)
	}

	pub fn set_target_dir(&mut self, category: &str, dir: impl Into<String>) {
		self.target_dirs.insert(dir_key(category), dir.into());
	}

	/// Build the watch configuration. Completeness is checked by `Organizer::start`.
	pub fn to_configuration(&self) -> WatchConfiguration {
		let targets: TargetDirectories = self
			.target_dirs
			.iter()
			.filter_map(|(key, dir)| {
				key.strip_suffix(DIR_SUFFIX)
					.filter(|c| !c.is_empty())
					.map(|c| (CategoryId::new(c), PathBuf::from(dir)))
			})
			.collect();

		let categories = self.categories.clone().map(CategoryMap::normalized).unwrap_or_default();

		WatchConfiguration::new(&self.source_dir, targets)
			.with_categories(categories)
			.with_collision_policy(self.collision_policy.unwrap_or_default())
	}
}

fn dir_key(category: &str) -> String {
	format!("{category}{DIR_SUFFIX}")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::OrganizerError;
	use tempfile::TempDir;

	#[test]
	fn test_missing_file_gives_empty_defaults() {
		let temp_dir = TempDir::new().unwrap();
		let settings = Settings::load(&temp_dir.path().join("settings.json")).unwrap();

		assert_eq!(settings, Settings::default());
		assert_eq!(settings.target_dir(MUSIC), Some(""));

		match settings.to_configuration().validate() {
			Err(OrganizerError::ConfigurationIncomplete { field }) => assert_eq!(field, "source_dir"),
			other => panic!("Expected ConfigurationIncomplete, got {other:?}"),
		}
	}

	#[test]
	fn test_save_then_load() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("settings.json");

		let mut settings = Settings::default();
		settings.source_dir = "/incoming".to_string();
		for category in [VIDEO, PICTURES, DOCUMENTS, MUSIC, OTHER] {
			settings.set_target_dir(category, format!("/sorted/{category}"));
		}
		settings.save(&path).unwrap();

		let raw = std::fs::read_to_string(&path).unwrap();
		assert!(raw.contains("\"pictures_dir\""));
		assert!(!raw.contains("categories"));

		let loaded = Settings::load(&path).unwrap();
		assert_eq!(loaded, settings);

		let config = loaded.to_configuration();
		assert!(config.validate().is_ok());
		assert_eq!(
			config.target_for(&CategoryId::new(VIDEO)),
			Some(Path::new("/sorted/video"))
		);
	}

	#[test]
	fn test_extra_categories_and_rules() {
		let json = r#"{
			"source_dir": "/incoming",
			"ebooks_dir": "/books",
			"misc_dir": "/misc",
			"collision_policy": "append_suffix",
			"categories": {
				"rules": [{ "category": "ebooks", "extensions": ["EPUB", ".mobi"] }],
				"fallback": "misc"
			}
		}"#;
		let settings: Settings = serde_json::from_str(json).unwrap();
		let config = settings.to_configuration();

		assert!(config.validate().is_ok());
		assert_eq!(config.collision_policy, CollisionPolicy::AppendSuffix);
		assert_eq!(config.categories.classify("book.epub").as_str(), "ebooks");
		assert_eq!(config.categories.classify("photo.jpg").as_str(), "misc");
	}

	#[test]
	fn test_malformed_file_is_an_error() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("settings.json");
		std::fs::write(&path, "{ not json").unwrap();

		assert!(matches!(Settings::load(&path), Err(OrganizerError::Json(_))));
	}
}
