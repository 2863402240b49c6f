use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Organizer error types
///
/// Errors returned by `start` are synchronous and leave the organizer idle.
/// `MoveFailed` and `Notify` are reported per event on the observer channel and
/// never end a watch session.
#[derive(Error, Debug)]
pub enum OrganizerError {
	#[error("Configuration incomplete: {field} is empty")]
	ConfigurationIncomplete { field: String },

	#[error("Subscription failed for {path}: {reason}")]
	SubscriptionFailed { path: String, reason: String },

	#[error("Already watching {path}")]
	AlreadyWatching { path: String },

	#[error("Move failed: {path} -> {destination} ({reason})")]
	MoveFailed {
		path: String,
		destination: String,
		reason: MoveFailureReason,
	},

	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("IO error: {0}")]
	Io(#[from] io::Error),

	#[error("JSON serialization error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Why a single move did not happen
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveFailureReason {
	#[error("destination directory does not exist")]
	DestinationMissing,

	#[error("permission denied")]
	PermissionDenied,

	#[error("a file with the same name already exists at the destination")]
	NameCollision,

	#[error("source and destination are on different devices")]
	CrossDevice,

	#[error("source file no longer exists")]
	SourceVanished,

	#[error("{0}")]
	Other(String),
}

impl MoveFailureReason {
	/// Classify an error returned by a rename call
	pub fn from_io(err: &io::Error) -> Self {
		if is_cross_device(err) {
			return MoveFailureReason::CrossDevice;
		}

		match err.kind() {
			io::ErrorKind::NotFound => MoveFailureReason::SourceVanished,
			io::ErrorKind::PermissionDenied => MoveFailureReason::PermissionDenied,
			io::ErrorKind::AlreadyExists => MoveFailureReason::NameCollision,
			_ => MoveFailureReason::Other(err.to_string()),
		}
	}
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
	err.raw_os_error() == Some(nix::errno::Errno::EXDEV as i32)
}

#[cfg(not(unix))]
fn is_cross_device(err: &io::Error) -> bool {
	// ERROR_NOT_SAME_DEVICE
	cfg!(windows) && err.raw_os_error() == Some(17)
}

impl OrganizerError {
	/// Create a configuration incomplete error for the named field
	pub fn configuration_incomplete(field: impl Into<String>) -> Self {
		OrganizerError::ConfigurationIncomplete { field: field.into() }
	}

	/// Create a subscription failure for a watched path
	pub fn subscription_failed(path: &Path, reason: impl Into<String>) -> Self {
		OrganizerError::SubscriptionFailed {
			path: path.display().to_string(),
			reason: reason.into(),
		}
	}

	/// Create a move failure for a source and destination path
	pub fn move_failed(path: &Path, destination: &Path, reason: MoveFailureReason) -> Self {
		OrganizerError::MoveFailed {
			path: path.display().to_string(),
			destination: destination.display().to_string(),
			reason,
		}
	}

	/// Check if this error is due to configuration issues
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			OrganizerError::ConfigurationIncomplete { .. } | OrganizerError::AlreadyWatching { .. }
		)
	}

	/// The move failure reason, if this is a move failure
	pub fn move_failure_reason(&self) -> Option<&MoveFailureReason> {
		match self {
			OrganizerError::MoveFailed { reason, .. } => Some(reason),
			_ => None,
		}
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			OrganizerError::ConfigurationIncomplete { .. } => "configuration",
			OrganizerError::AlreadyWatching { .. } => "configuration",
			OrganizerError::SubscriptionFailed { .. } => "subscription",
			OrganizerError::MoveFailed { .. } => "move",
			OrganizerError::Notify(_) => "notify",
			OrganizerError::Io(_) => "io",
			OrganizerError::Json(_) => "serialization",
		}
	}
}

pub type Result<T> = std::result::Result<T, OrganizerError>;

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_error_messages() {
		let incomplete = OrganizerError::configuration_incomplete("source_dir");
		assert!(incomplete.to_string().contains("source_dir"));
		assert!(incomplete.is_configuration_error());
		assert_eq!(incomplete.category(), "configuration");

		let failed = OrganizerError::move_failed(
			&PathBuf::from("/in/song.mp3"),
			&PathBuf::from("/music/song.mp3"),
			MoveFailureReason::DestinationMissing,
		);
		let message = failed.to_string();
		assert!(message.contains("/in/song.mp3"));
		assert!(message.contains("destination directory does not exist"));
		assert!(!failed.is_configuration_error());
		assert_eq!(
			failed.move_failure_reason(),
			Some(&MoveFailureReason::DestinationMissing)
		);
	}

	#[test]
	fn test_from_conversions() {
		let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
		let err: OrganizerError = io_err.into();

		match err {
			OrganizerError::Io(_) => (),
			other => panic!("Expected IO error variant, got {other:?}"),
		}
	}

	#[test]
	fn test_reason_from_io_kind() {
		let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
		assert_eq!(
			MoveFailureReason::from_io(&not_found),
			MoveFailureReason::SourceVanished
		);

		let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
		assert_eq!(
			MoveFailureReason::from_io(&denied),
			MoveFailureReason::PermissionDenied
		);

		let other = io::Error::new(io::ErrorKind::Other, "disk on fire");
		assert!(matches!(
			MoveFailureReason::from_io(&other),
			MoveFailureReason::Other(msg) if msg.contains("disk on fire")
		));
	}

	#[cfg(unix)]
	#[test]
	fn test_cross_device_detection() {
		let exdev = io::Error::from_raw_os_error(nix::errno::Errno::EXDEV as i32);
		assert_eq!(
			MoveFailureReason::from_io(&exdev),
			MoveFailureReason::CrossDevice
		);
	}
}
