//! Terminal host for HabitDeck core.
//!
//! # Responsibility
//! - Drive the same store, selector and reminder policy the mobile shell uses.
//! - Resolve configuration from `HABITDECK_*` and flush writes before exit.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use habitdeck_core::{
    filter_library, init_logging, pick_suggestion, CoreConfig, Habit, HabitDraft, HabitStore,
    LibraryQuery, LibrarySection, NotificationError, NotificationRequest, NotificationService,
    PermissionStatus, ReminderRepository, ReminderScheduler, ReminderSettingsPatch, ReminderTime,
    SqliteKeyValueStore, StorageWorker,
};
use log::warn;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "habitdeck")]
#[command(about = "Pick, browse and manage habit suggestions", long_about = None, version)]
struct Cli {
    /// SQLite database path, overrides HABITDECK_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a random active habit
    Suggest {
        /// Id of the habit shown last time; it will not be repeated
        #[arg(long)]
        after: Option<String>,
    },
    /// List the habit library
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long)]
        category: Option<String>,
        /// Show the archived section instead of active habits
        #[arg(long, default_value_t = false)]
        archived: bool,
        #[arg(long, default_value_t = false)]
        favorites: bool,
    },
    /// Add a new habit
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "Personal Growth")]
        category: String,
    },
    /// Edit title, description or category of a habit
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Toggle the favorite flag
    Favorite { id: String },
    /// Toggle archived/active
    Archive { id: String },
    /// Delete a habit
    Delete { id: String },
    /// List known categories
    Categories,
    /// Replace every habit with the built-in defaults
    Reset {
        /// Confirm the destructive reset
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Daily reminder settings
    Reminder {
        #[command(subcommand)]
        action: ReminderCommand,
    },
}

#[derive(Subcommand)]
enum ReminderCommand {
    Show,
    Set {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        /// Time of day as HH:MM
        #[arg(long)]
        time: Option<String>,
    },
    /// Print the notification that would be scheduled now
    Plan,
}

/// Prints notification calls instead of talking to a device.
struct ConsoleNotifications;

impl NotificationService for ConsoleNotifications {
    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError> {
        Ok(PermissionStatus::Granted)
    }

    fn cancel_all_scheduled(&mut self) -> Result<(), NotificationError> {
        println!("cancel all scheduled reminders");
        Ok(())
    }

    fn schedule(&mut self, request: &NotificationRequest) -> Result<String, NotificationError> {
        println!("daily at {}: {}", request.daily_at, request.title);
        println!("  {}", request.body);
        Ok(format!("console-{}", request.habit_id))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let backend = SqliteKeyValueStore::open(&config.db_path)
        .with_context(|| format!("cannot open `{}`", config.db_path.display()))?;
    let worker = StorageWorker::spawn(backend)?;
    let mut store = HabitStore::open(worker.handle());

    let result = run(cli.command, &mut store, &worker);

    let report = worker.shutdown();
    if report.failed > 0 {
        warn!("event=cli_exit module=cli status=error failed_writes={}", report.failed);
        eprintln!("warning: {} write(s) failed", report.failed);
    }
    result
}

fn run(command: Command, store: &mut HabitStore, worker: &StorageWorker) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    match command {
        Command::Suggest { after } => {
            match pick_suggestion(store.habits(), after.as_deref(), &mut rng) {
                Some(habit) => {
                    print_habit(habit);
                    println!("  {}", habit.description);
                }
                None => println!("No active habits. Add one or unarchive a habit."),
            }
        }
        Command::List {
            search,
            category,
            archived,
            favorites,
        } => {
            let query = LibraryQuery {
                text: search,
                category,
                section: if archived {
                    LibrarySection::Archived
                } else {
                    LibrarySection::Active
                },
                favorites_only: favorites,
            };
            let hits = filter_library(store.habits(), &query);
            if hits.is_empty() {
                println!("No habits found.");
            }
            hits.into_iter().for_each(print_habit);
        }
        Command::Add {
            title,
            description,
            category,
        } => {
            let habit = Habit::from_draft(&HabitDraft::new(title, description, category))?;
            let id = habit.id.clone();
            if !store.add(habit) {
                bail!("habit was not added");
            }
            println!("added {id}");
        }
        Command::Edit {
            id,
            title,
            description,
            category,
        } => {
            let Some(existing) = store.get(&id) else {
                bail!("habit not found: {id}");
            };
            let draft = HabitDraft::new(
                title.unwrap_or_else(|| existing.title.clone()),
                description.unwrap_or_else(|| existing.description.clone()),
                category.unwrap_or_else(|| existing.category.clone()),
            );
            let edited = existing.edited(&draft)?;
            store.update(edited);
            println!("updated {id}");
        }
        Command::Favorite { id } => match store.toggle_favorite(&id) {
            Some(value) => println!("{id} favorite={value}"),
            None => println!("no habit {id}"),
        },
        Command::Archive { id } => match store.toggle_archive(&id) {
            Some(value) => println!("{id} archived={value}"),
            None => println!("no habit {id}"),
        },
        Command::Delete { id } => {
            if store.delete(&id) {
                println!("deleted {id}");
            } else {
                println!("no habit {id}");
            }
        }
        Command::Categories => {
            for name in store.categories().as_slice() {
                println!("{name}");
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("reset discards every habit; pass --yes to confirm");
            }
            store.reset_to_defaults();
            println!("restored {} default habits", store.len());
        }
        Command::Reminder { action } => {
            let reminders = ReminderRepository::new(worker.handle());
            let settings = reminders.load_or_default();
            match action {
                ReminderCommand::Show => {
                    let state = if settings.enabled { "on" } else { "off" };
                    println!("reminder {state} at {}", settings.time);
                }
                ReminderCommand::Set {
                    enable,
                    disable,
                    time,
                } => {
                    let time = time
                        .as_deref()
                        .map(str::parse::<ReminderTime>)
                        .transpose()?;
                    let enabled = match (enable, disable) {
                        (true, _) => Some(true),
                        (_, true) => Some(false),
                        _ => None,
                    };
                    let updated = settings.merged(ReminderSettingsPatch { enabled, time });
                    reminders.save(&updated)?;
                    let state = if updated.enabled { "on" } else { "off" };
                    println!("reminder {state} at {}", updated.time);
                }
                ReminderCommand::Plan => {
                    let mut scheduler = ReminderScheduler::new(ConsoleNotifications);
                    let outcome = scheduler.apply(&settings, store.habits(), &mut rng);
                    println!("{outcome:?}");
                }
            }
        }
    }
    Ok(())
}

fn print_habit(habit: &Habit) {
    let star = if habit.is_favorite { "*" } else { " " };
    let archived = if habit.is_archived { " [archived]" } else { "" };
    println!(
        "{star} {:<38} {:<16} {}{archived}",
        habit.title, habit.category, habit.id
    );
}
