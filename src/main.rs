use clap::{Parser, ValueEnum};
use sort_mover::classifier::{DOCUMENTS, MUSIC, OTHER, PICTURES, VIDEO};
use sort_mover::settings::DEFAULT_SETTINGS_FILE;
use sort_mover::{CollisionPolicy, Organizer, OrganizerEvent, Settings};
use std::path::PathBuf;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "sort-mover")]
#[command(about = "Watches a folder and moves new files into per-category folders by extension")]
struct Cli {
	/// Settings file holding the source and target folders
	#[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
	settings: PathBuf,

	/// Folder to watch
	#[arg(long)]
	source: Option<String>,

	/// Target folder for videos
	#[arg(long)]
	video: Option<String>,

	/// Target folder for pictures
	#[arg(long)]
	pictures: Option<String>,

	/// Target folder for documents
	#[arg(long)]
	documents: Option<String>,

	/// Target folder for music
	#[arg(long)]
	music: Option<String>,

	/// Target folder for everything else
	#[arg(long)]
	other: Option<String>,

	/// What to do when the destination already has a file with the same name
	#[arg(long, value_enum)]
	collision: Option<Collision>,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Collision {
	Fail,
	Suffix,
}

impl From<Collision> for CollisionPolicy {
	fn from(c: Collision) -> Self {
		match c {
			Collision::Fail => CollisionPolicy::Fail,
			Collision::Suffix => CollisionPolicy::AppendSuffix,
		}
	}
}

impl Cli {
	fn apply_to(&self, settings: &mut Settings) {
		if let Some(source) = &self.source {
			settings.source_dir = source.clone();
		}

		let overrides = [
			(VIDEO, &self.video),
			(PICTURES, &self.pictures),
			(DOCUMENTS, &self.documents),
			(MUSIC, &self.music),
			(OTHER, &self.other),
		];
		for (category, dir) in overrides {
			if let Some(dir) = dir {
				settings.set_target_dir(category, dir.clone());
			}
		}

		if let Some(collision) = self.collision {
			settings.collision_policy = Some(collision.into());
		}
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	// Initialize tracing
	let level = if cli.verbose {
		Level::DEBUG
	} else {
		Level::INFO
	};
	tracing_subscriber::fmt().with_max_level(level).init();

	let mut settings = Settings::load(&cli.settings)?;
	cli.apply_to(&mut settings);

	let mut organizer = Organizer::new();
	let mut events = organizer.start(settings.to_configuration())?;

	// Only remember settings that actually started a watch
	settings.save(&cli.settings)?;

	let observer = tokio::spawn(async move {
		let mut moved = 0usize;
		let mut failed = 0usize;
		while let Some(event) = events.recv().await {
			match event {
				OrganizerEvent::Moved(_) => moved += 1,
				OrganizerEvent::Failed(e) => {
					failed += 1;
					debug!("Observed {} failure", e.category());
				}
			}
		}
		(moved, failed)
	});

	tokio::signal::ctrl_c().await?;
	info!("Shutting down watcher...");
	organizer.stop().await;

	let (moved, failed) = observer.await?;
	info!("Session finished: {} moved, {} failed", moved, failed);

	Ok(())
}
