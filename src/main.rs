use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::path::PathBuf;

use selfie_journal::prefs::{notifications_enabled, set_notifications_enabled};
use selfie_journal::{ItemCollection, JournalConfig, JournalError, Result, SqlitePreferences};

/// Keep a journal of photos from the terminal
#[derive(Parser, Debug)]
#[command(name = "selfie-journal", version, about)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Photo positions are 1-based, as shown by `list`
#[derive(Subcommand, Debug)]
enum Command {
    /// List photos in display order
    List,
    /// Add image files to the journal
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete photos
    Remove {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Move a photo to a new position
    Move { from: usize, to: usize },
    /// Set a photo's label
    Rename { position: usize, label: String },
    /// Go back to the date-based label
    ResetLabel { position: usize },
    /// Print photo paths and labels, tab-separated, for mailing
    Attachments {
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Show or change the reminder notification setting
    Notifications {
        #[arg(value_enum)]
        state: Option<Toggle>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

type Journal = ItemCollection<SqlitePreferences>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = JournalConfig::load(cli.config.as_deref())?;
    let storage = config.storage()?;
    let prefs = config.open_preferences()?;

    // Loading decodes every thumbnail, so it runs off the main task
    let mut selfies: Journal = ItemCollection::load_all_async(storage, prefs).await?;
    info!("📁 Photos in {}", selfies.storage().documents_dir().display());

    match cli.command {
        Command::List => list(&selfies)?,
        Command::Add { files } => {
            for file in files {
                let bytes = fs::read(&file)?;
                let index = selfies.append(&bytes)?;
                println!("Added {} as #{}", file.display(), index + 1);
            }
        }
        Command::Remove { positions } => {
            selfies.uncheck_all();
            for position in positions {
                let index = to_index(&selfies, position)?;
                selfies.check_item(index)?;
            }
            let removed = selfies.remove_checked()?;
            println!("Deleted {} photo(s)", removed);
        }
        Command::Move { from, to } => {
            let (from, to) = (to_index(&selfies, from)?, to_index(&selfies, to)?);
            selfies.move_element(from, to)?;
            list(&selfies)?;
        }
        Command::Rename { position, label } => {
            selfies.set_label(to_index(&selfies, position)?, &label)?;
        }
        Command::ResetLabel { position } => {
            let index = to_index(&selfies, position)?;
            selfies.reset_label(index)?;
            println!("#{}: {}", position, selfies.label(index)?);
        }
        Command::Attachments { positions } => {
            selfies.uncheck_all();
            for position in positions {
                let index = to_index(&selfies, position)?;
                selfies.check_item(index)?;
            }
            for attachment in selfies.checked_attachments()? {
                println!("{}\t{}", attachment.photo_path.display(), attachment.label);
            }
            selfies.uncheck_all();
        }
        Command::Notifications { state } => {
            if let Some(state) = state {
                set_notifications_enabled(selfies.prefs(), matches!(state, Toggle::On))?;
            }
            let enabled = notifications_enabled(selfies.prefs())?;
            println!("Notifications: {}", if enabled { "on" } else { "off" });
        }
    }

    Ok(())
}

fn list(selfies: &Journal) -> Result<()> {
    if selfies.is_empty() {
        println!("No photos yet.");
        return Ok(());
    }

    for (index, item) in selfies.iter().enumerate() {
        let thumbnail = if item.thumbnail().is_some() { "" } else { "  (no thumbnail)" };
        println!("{:>3}. {}{}", index + 1, item.label(selfies.prefs())?, thumbnail);
    }
    Ok(())
}

/// 1-based position to index; range checks against the collection happen there
fn to_index(selfies: &Journal, position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or(JournalError::IndexOutOfRange {
            index: position,
            len: selfies.len(),
        })
}
