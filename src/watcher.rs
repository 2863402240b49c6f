use crate::config::WatchConfiguration;
use crate::error::{OrganizerError, Result};
use crate::events::{FileSystemEvent, MoveRecord, OrganizerEvent};
use crate::mover;
use chrono::Utc;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Receiving side of the observer channel returned by [`Organizer::start`]
pub type OrganizerEvents = mpsc::UnboundedReceiver<OrganizerEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
	Idle,
	Watching,
}

struct WatchSession {
	config: Arc<WatchConfiguration>,
	// Dropping the watcher ends the subscription and closes the event channel
	watcher: RecommendedWatcher,
	shutdown_tx: oneshot::Sender<()>,
	task: JoinHandle<()>,
}

/// Watches one directory and sorts newly created files into category directories
#[derive(Default)]
pub struct Organizer {
	session: Option<WatchSession>,
}

impl Organizer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> WatchState {
		if self.session.is_some() {
			WatchState::Watching
		} else {
			WatchState::Idle
		}
	}

	pub fn is_watching(&self) -> bool {
		self.state() == WatchState::Watching
	}

	/// Configuration of the running session, if any
	pub fn configuration(&self) -> Option<&WatchConfiguration> {
		self.session.as_ref().map(|s| s.config.as_ref())
	}

	/// Subscribe to file creations in the configured source directory.
	///
	/// Must be called from within a tokio runtime. Every outcome of the
	/// session is sent to the returned receiver.
	pub fn start(&mut self, config: WatchConfiguration) -> Result<OrganizerEvents> {
		if let Some(session) = &self.session {
			return Err(OrganizerError::AlreadyWatching {
				path: session.config.source_dir.display().to_string(),
			});
		}

		config.validate()?;

		let source_dir = config.source_dir.clone();
		if !source_dir.is_dir() {
			return Err(OrganizerError::subscription_failed(
				&source_dir,
				"not an existing directory",
			));
		}

		let runtime = tokio::runtime::Handle::try_current()
			.map_err(|e| OrganizerError::subscription_failed(&source_dir, e.to_string()))?;

		let (notify_tx, notify_rx) = mpsc::unbounded_channel();
		let mut watcher = RecommendedWatcher::new(
			move |res: notify::Result<Event>| {
				// Receiver is gone once the session stops
				let _ = notify_tx.send(res);
			},
			Config::default(),
		)
		.map_err(|e| OrganizerError::subscription_failed(&source_dir, e.to_string()))?;

		watcher
			.watch(&source_dir, RecursiveMode::NonRecursive)
			.map_err(|e| OrganizerError::subscription_failed(&source_dir, e.to_string()))?;

		info!("Watching {} for new files", source_dir.display());

		let config = Arc::new(config);
		let (report_tx, report_rx) = mpsc::unbounded_channel();
		let (shutdown_tx, shutdown_rx) = oneshot::channel();
		let processor = EventProcessor { config: Arc::clone(&config), reports: report_tx };
		let task = runtime.spawn(processor.run(notify_rx, shutdown_rx));

		self.session = Some(WatchSession { config, watcher, shutdown_tx, task });
		Ok(report_rx)
	}

	/// End the session and wait for the event in flight to finish.
	///
	/// No move is started after this returns. Calling it while idle does nothing.
	pub async fn stop(&mut self) {
		let Some(session) = self.session.take() else {
			debug!("Stop requested while idle");
			return;
		};

		drop(session.watcher);
		let _ = session.shutdown_tx.send(());
		if let Err(e) = session.task.await {
			error!("Event processing task panicked: {}", e);
		}

		info!("Stopped watching {}", session.config.source_dir.display());
	}
}

struct EventProcessor {
	config: Arc<WatchConfiguration>,
	reports: mpsc::UnboundedSender<OrganizerEvent>,
}

impl EventProcessor {
	async fn run(
		self,
		mut notify_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
		mut shutdown_rx: oneshot::Receiver<()>,
	) {
		debug!("Event processing loop started");

		loop {
			tokio::select! {
				biased;
				_ = &mut shutdown_rx => break,
				next = notify_rx.recv() => match next {
					Some(Ok(event)) => self.handle_event(event).await,
					Some(Err(e)) => {
						error!("Notify error: {}", e);
						self.report(OrganizerEvent::Failed(OrganizerError::Notify(e)));
					}
					None => break,
				},
			}
		}

		debug!("Event processing loop ended");
	}

	async fn handle_event(&self, event: Event) {
		for created in FileSystemEvent::created_from(&event).await {
			if created.is_directory {
				debug!("Ignoring new directory {}", created.path.display());
				continue;
			}

			match self.process(created).await {
				Ok(record) => {
					info!(
						"Moved {} -> {} ({})",
						record.source_path.display(),
						record.destination_path.display(),
						record.category
					);
					if let Ok(json) = record.to_json() {
						debug!("Move JSON: {}", json);
					}
					self.report(OrganizerEvent::Moved(record));
				}
				Err(e) => {
					error!("{} error: {}", e.category(), e);
					self.report(OrganizerEvent::Failed(e));
				}
			}
		}
	}

	async fn process(&self, event: FileSystemEvent) -> Result<MoveRecord> {
		let category = self.config.categories.classify(&event.path).clone();
		let target_dir = self
			.config
			.target_for(&category)
			// validate() guarantees an entry for every mapped category
			.ok_or_else(|| OrganizerError::configuration_incomplete(format!("{category}_dir")))?;

		let destination = mover::relocate(&event.path, target_dir, self.config.collision_policy).await?;

		Ok(MoveRecord {
			event_id: event.id,
			category,
			source_path: event.path,
			destination_path: destination,
			timestamp: Utc::now(),
		})
	}

	fn report(&self, event: OrganizerEvent) {
		if self.reports.send(event).is_err() {
			warn!("Observer dropped; outcome only logged");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::classifier::{DOCUMENTS, MUSIC, OTHER, PICTURES, VIDEO};
	use crate::config::TargetDirectories;
	use tempfile::TempDir;

	fn config_for(temp_dir: &TempDir) -> WatchConfiguration {
		let targets: TargetDirectories = [VIDEO, PICTURES, DOCUMENTS, MUSIC, OTHER]
			.into_iter()
			.map(|c| (c, temp_dir.path().join(c)))
			.collect();
		WatchConfiguration::new(temp_dir.path(), targets)
	}

	#[test]
	fn test_new_organizer_is_idle() {
		let organizer = Organizer::new();
		assert_eq!(organizer.state(), WatchState::Idle);
		assert!(organizer.configuration().is_none());
	}

	#[test]
	fn test_start_outside_runtime_fails_to_subscribe() {
		let temp_dir = TempDir::new().unwrap();
		let mut organizer = Organizer::new();

		match organizer.start(config_for(&temp_dir)) {
			Err(OrganizerError::SubscriptionFailed { .. }) => {}
			other => panic!("Expected SubscriptionFailed, got {other:?}"),
		}
		assert!(!organizer.is_watching());
	}

	#[tokio::test]
	async fn test_second_start_is_rejected() {
		let temp_dir = TempDir::new().unwrap();
		let mut organizer = Organizer::new();
		let _events = organizer.start(config_for(&temp_dir)).unwrap();

		match organizer.start(config_for(&temp_dir)) {
			Err(OrganizerError::AlreadyWatching { path }) => {
				assert_eq!(path, temp_dir.path().display().to_string())
			}
			other => panic!("Expected AlreadyWatching, got {other:?}"),
		}
		assert!(organizer.is_watching());

		organizer.stop().await;
		assert_eq!(organizer.state(), WatchState::Idle);
	}
}
