mod history;
mod locale;
mod tui;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use pufftrack_core::{
    DailyTally, FileHistoryRepository, FileLimitRepository, FileTallyRepository, LimitService,
    RolloverUseCase, TallyService,
};

use crate::locale::{text, Language};

#[derive(Parser)]
#[command(name = "pufftrack")]
#[command(about = "A daily cigarette tracker with a close-out history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record one cigarette now
    Smoke,
    /// Remove one of today's entries by its key (see `list`)
    Remove { key: String },
    /// Show today's tally, the limit and the time since the last cigarette
    Status,
    /// List today's entries, newest first
    List,
    /// Close out the day into the history and start a fresh tally
    Rollover,
    /// Show the history of closed-out days
    History,
    /// Delete one history entry by its id
    Delete { id: String },
    /// Set the daily limit (a positive number)
    Limit { value: u32 },
    /// Show or set the display language (en or tr)
    Lang { code: Option<String> },
    /// Open the Terminal User Interface
    Tui,
}

pub fn format_elapsed(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn print_counts(lang: Language, tally: &DailyTally, limit: u32) {
    println!("{} {}", text(lang, "home.smokedCount"), tally.smoked_count);
    let over = tally.over_limit(limit);
    if over > 0 {
        println!(
            "{}",
            text(lang, "home.overLimit").replace("{count}", &over.to_string())
        );
    } else {
        println!("{} {}", text(lang, "home.remaining"), tally.remaining(limit));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let lang = locale::load_language(None);

    match cli.command {
        Some(Commands::Smoke) => {
            let mut service = TallyService::load(FileTallyRepository::new(None)?)?;
            let limit = LimitService::load(FileLimitRepository::new(None)?)?.current();

            let event = service
                .add_event(Local::now())
                .context(text(lang, "error.storage"))?;
            println!(
                "{}",
                text(lang, "home.recorded").replace("{time}", &event.time)
            );
            print_counts(lang, service.tally(), limit);
        }
        Some(Commands::Remove { key }) => {
            let mut service = TallyService::load(FileTallyRepository::new(None)?)?;
            let removed = service
                .remove_event(&key)
                .context(text(lang, "error.storage"))?;
            if removed {
                println!("{}", text(lang, "home.removed"));
            } else {
                println!("{}", text(lang, "home.noSuchKey"));
            }
        }
        Some(Commands::Status) => {
            let service = TallyService::load(FileTallyRepository::new(None)?)?;
            let limit = LimitService::load(FileLimitRepository::new(None)?)?.current();
            let tally = service.tally();

            println!("{}", locale::format_date(lang, Local::now().date_naive()));
            if let Some(elapsed) = tally.seconds_since_last(Utc::now()) {
                println!(
                    "{}  ({})",
                    format_elapsed(elapsed),
                    text(lang, "home.timeSinceLast")
                );
            }
            println!("{} {}", text(lang, "home.limit"), limit);
            print_counts(lang, tally, limit);
        }
        Some(Commands::List) => {
            let service = TallyService::load(FileTallyRepository::new(None)?)?;
            let tally = service.tally();
            if tally.is_empty() {
                println!("{}", text(lang, "home.emptyList"));
            } else {
                for event in &tally.smoke_times {
                    println!("{}  {}", event.time, event.key);
                }
            }
        }
        Some(Commands::Rollover) => {
            let tally_repo = FileTallyRepository::new(None)?;
            let history_repo = FileHistoryRepository::new(None)?;
            let mut service = TallyService::load(tally_repo.clone())?;
            let limit = LimitService::load(FileLimitRepository::new(None)?)?.current();

            let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
            let entry = usecase
                .rollover(service.tally(), limit, Local::now())
                .context(text(lang, "error.storage"))?;
            service.reset();

            println!(
                "{}",
                text(lang, "rollover.done")
                    .replace("{count}", &entry.smoked_count.to_string())
                    .replace("{limit}", &entry.limit.to_string())
            );
        }
        Some(Commands::History) => {
            let tally_repo = FileTallyRepository::new(None)?;
            let history_repo = FileHistoryRepository::new(None)?;
            let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
            let entries = usecase.history().context(text(lang, "error.storage"))?;
            history::show_history(&entries, lang);
        }
        Some(Commands::Delete { id }) => {
            let tally_repo = FileTallyRepository::new(None)?;
            let history_repo = FileHistoryRepository::new(None)?;
            let usecase = RolloverUseCase::new(&tally_repo, &history_repo);
            let deleted = usecase
                .delete_entry(&id)
                .context(text(lang, "error.storage"))?;
            if deleted {
                println!("{}", text(lang, "history.deleted"));
            } else {
                println!("{}", text(lang, "history.noSuchId"));
            }
        }
        Some(Commands::Limit { value }) => {
            let mut service = LimitService::load(FileLimitRepository::new(None)?)?;
            service
                .set_limit(value)
                .context(text(lang, "home.invalidLimit"))?;
            println!(
                "{}",
                text(lang, "home.limitSet").replace("{count}", &value.to_string())
            );
        }
        Some(Commands::Lang { code }) => {
            let current = match code {
                Some(code) => match Language::from_code(&code) {
                    Some(new_lang) => {
                        locale::save_language(None, new_lang)?;
                        new_lang
                    }
                    None => {
                        println!("{}", text(lang, "lang.unknown"));
                        lang
                    }
                },
                None => lang,
            };
            println!(
                "{}",
                text(current, "lang.current").replace("{code}", current.code())
            );
        }
        Some(Commands::Tui) | None => {
            tui::run()?;
        }
    }
    Ok(())
}
