//! Extension based file classification
//!
//! Maps a file name to a category id through an ordered list of extension
//! rules. Classification is total: names that match no rule fall back to the
//! map's fallback category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const VIDEO: &str = "video";
pub const PICTURES: &str = "pictures";
pub const DOCUMENTS: &str = "documents";
pub const MUSIC: &str = "music";
pub const OTHER: &str = "other";

/// Identifier of a category (e.g. `video`, `pictures`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CategoryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for CategoryId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// A set of extensions that belong to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
	pub category: CategoryId,
	/// Lower-cased, each with a leading dot
	pub extensions: Vec<String>,
}

impl CategoryRule {
	/// Build a rule, normalizing extensions to lower case with a leading dot
	pub fn new<I, S>(category: impl Into<CategoryId>, extensions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let extensions = extensions
			.into_iter()
			.map(|ext| normalize_extension(ext.as_ref()))
			.filter(|ext| !ext.is_empty())
			.collect();

		Self { category: category.into(), extensions }
	}

	pub fn matches(&self, extension: &str) -> bool {
		self.extensions.iter().any(|ext| ext == extension)
	}
}

/// Ordered extension rules plus the category used when none match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
	pub rules: Vec<CategoryRule>,
	pub fallback: CategoryId,
}

impl Default for CategoryMap {
	fn default() -> Self {
		Self {
			rules: vec![
				CategoryRule::new(VIDEO, [".mp4", ".avi", ".mkv"]),
				CategoryRule::new(PICTURES, [".jpg", ".png", ".gif"]),
				CategoryRule::new(DOCUMENTS, [".docx", ".pdf", ".txt"]),
				CategoryRule::new(MUSIC, [".mp3", ".wav", ".flac"]),
			],
			fallback: CategoryId::new(OTHER),
		}
	}
}

impl CategoryMap {
	pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<CategoryId>) -> Self {
		Self { rules, fallback: fallback.into() }
	}

	/// Every category this map can produce, fallback last, without duplicates
	pub fn categories(&self) -> Vec<&CategoryId> {
		let mut categories: Vec<&CategoryId> = Vec::with_capacity(self.rules.len() + 1);
		for id in self.rules.iter().map(|r| &r.category).chain(std::iter::once(&self.fallback)) {
			if !categories.contains(&id) {
				categories.push(id);
			}
		}
		categories
	}

	/// Re-apply extension normalization, e.g. after deserializing hand-written rules
	pub fn normalized(self) -> Self {
		let rules = self
			.rules
			.into_iter()
			.map(|rule| CategoryRule::new(rule.category, rule.extensions))
			.collect();
		Self { rules, fallback: self.fallback }
	}

	pub fn classify(&self, file_name: impl AsRef<Path>) -> &CategoryId {
		classify(file_name, self)
	}
}

/// Classify a file name into a category. Only the base name's last extension counts.
pub fn classify(file_name: impl AsRef<Path>, map: &CategoryMap) -> &CategoryId {
	let extension = extension_of(file_name.as_ref());
	if extension.is_empty() {
		return &map.fallback;
	}

	map.rules
		.iter()
		.find(|rule| rule.matches(&extension))
		.map(|rule| &rule.category)
		.unwrap_or(&map.fallback)
}

/// Lower-cased extension including the dot, or an empty string.
///
/// A leading dot does not start an extension, so `.bashrc` has none.
pub fn extension_of(path: &Path) -> String {
	let Some(name) = path.file_name() else {
		return String::new();
	};
	let name = name.to_string_lossy();

	match name.rfind('.') {
		Some(idx) if name[..idx].chars().any(|c| c != '.') => name[idx..].to_lowercase(),
		_ => String::new(),
	}
}

fn normalize_extension(ext: &str) -> String {
	let ext = ext.trim().to_lowercase();
	if ext.is_empty() || ext.starts_with('.') {
		ext
	} else {
		format!(".{ext}")
	}
}
