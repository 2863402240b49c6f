pub mod classifier;
mod config;
mod error;
mod events;
pub mod mover;
pub mod settings;
mod watcher;

pub use classifier::{classify, CategoryId, CategoryMap, CategoryRule};
pub use config::{CollisionPolicy, TargetDirectories, WatchConfiguration};
pub use error::{MoveFailureReason, OrganizerError, Result};
pub use events::{EventType, FileSystemEvent, MoveRecord, OrganizerEvent};
pub use settings::Settings;
pub use watcher::{Organizer, OrganizerEvents, WatchState};
