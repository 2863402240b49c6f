use crate::classifier::CategoryId;
use crate::error::OrganizerError;
use chrono::{DateTime, Utc};
use notify::event::CreateKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
	CreateFile,
	CreateFolder,
	Create, // Platform did not say what was created
	Other(String),
}

impl From<notify::EventKind> for EventType {
	fn from(kind: notify::EventKind) -> Self {
		match kind {
			notify::EventKind::Create(CreateKind::File) => EventType::CreateFile,
			notify::EventKind::Create(CreateKind::Folder) => EventType::CreateFolder,
			notify::EventKind::Create(_) => EventType::Create,
			notify::EventKind::Other => EventType::Other("Unknown".to_string()),
			_ => EventType::Other(format!("{kind:?}")),
		}
	}
}

/// One entry reported by the notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSystemEvent {
	pub id: Uuid,
	pub event_type: EventType,
	pub path: PathBuf,
	pub timestamp: DateTime<Utc>,
	pub is_directory: bool,
}

impl FileSystemEvent {
	pub fn new(event_type: EventType, path: PathBuf, is_directory: bool) -> Self {
		Self { id: Uuid::new_v4(), event_type, path, timestamp: Utc::now(), is_directory }
	}

	/// Creation events for each path of a raw notify event; everything else is dropped
	pub async fn created_from(event: &notify::Event) -> Vec<FileSystemEvent> {
		let event_type = EventType::from(event.kind);
		if !event_type.is_create() {
			return Vec::new();
		}

		let mut created = Vec::with_capacity(event.paths.len());
		for path in &event.paths {
			let is_directory = match event_type {
				EventType::CreateFolder => true,
				EventType::CreateFile => false,
				// Ask the filesystem; a vanished entry is treated as a file
				_ => tokio::fs::symlink_metadata(path)
					.await
					.map(|m| m.is_dir())
					.unwrap_or(false),
			};
			created.push(FileSystemEvent::new(event_type.clone(), path.clone(), is_directory));
		}
		created
	}
}

impl EventType {
	pub fn is_create(&self) -> bool {
		matches!(self, EventType::CreateFile | EventType::CreateFolder | EventType::Create)
	}
}

/// A file that was moved into its category's directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveRecord {
	pub event_id: Uuid,
	pub category: CategoryId,
	pub source_path: PathBuf,
	pub destination_path: PathBuf,
	pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

/// Outcome reported to the observer of a watch session
#[derive(Debug)]
pub enum OrganizerEvent {
	Moved(MoveRecord),
	Failed(OrganizerError),
}
