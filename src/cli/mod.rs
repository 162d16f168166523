//! `pundi_cli` front end: parses one command, opens a session against the
//! configured backend, runs the action and renders the resulting snapshot.

pub mod output;
pub mod render;

use std::{str::FromStr, time::Duration};

use chrono::NaiveDate;
use pundi_backend_http::HttpBackend;
use pundi_config::{BackendKind, Config, ConfigError, ConfigManager};
use pundi_core::{
    offline_dataset, BackendClient, MemoryBackend, PhotoSettings, ProfileDraft, SessionMode,
    SyncController,
};
use pundi_domain::{DateWindow, EntryKind, NewTransaction};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{errors::CliError, utils::build_info};

pub const USAGE: &str = "Usage: pundi_cli <command>\n\
Commands:\n  \
dashboard [YYYY-MM|YYYY]\n  \
history [keyword]\n  \
categories [expense|income]\n  \
add-category <name> <expense|income>\n  \
delete-category <id>\n  \
add-transaction <YYYY-MM-DD> <expense|income> <category> <amount> [note]\n  \
profile <name> <status>\n  \
version";

const OFFLINE_NOTICE: &str =
    "Backend unreachable; showing the built-in preview data. Changes may not be saved.";

type Session = SyncController<Box<dyn BackendClient>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dashboard { window: Option<DateWindow> },
    History { keyword: Option<String> },
    Categories { kind: Option<EntryKind> },
    AddCategory { name: String, kind: EntryKind },
    DeleteCategory { id: String },
    AddTransaction(NewTransaction),
    Profile { name: String, status: String },
    Version,
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args
            .next()
            .ok_or_else(|| CliError::usage("missing command"))?;
        let rest: Vec<String> = args.collect();
        let arg = |idx: usize, what: &str| {
            rest.get(idx)
                .cloned()
                .ok_or_else(|| CliError::usage(format!("`{name}` needs {what}")))
        };

        let command = match name.as_str() {
            "dashboard" => Command::Dashboard {
                window: rest.first().map(|period| parse_period(period)).transpose()?,
            },
            "history" => Command::History {
                keyword: (!rest.is_empty()).then(|| rest.join(" ")),
            },
            "categories" => Command::Categories {
                kind: rest.first().map(|kind| parse_kind(kind)).transpose()?,
            },
            "add-category" => Command::AddCategory {
                name: arg(0, "a name")?,
                kind: parse_kind(&arg(1, "a kind")?)?,
            },
            "delete-category" => Command::DeleteCategory {
                id: arg(0, "a category id")?,
            },
            "add-transaction" => {
                let date = parse_date(&arg(0, "a date")?)?;
                let kind = parse_kind(&arg(1, "a kind")?)?;
                let category = arg(2, "a category")?;
                let amount = parse_amount(&arg(3, "an amount")?)?;
                let mut transaction = NewTransaction::new(date, kind, category, amount);
                if rest.len() > 4 {
                    transaction = transaction.with_note(rest[4..].join(" "));
                }
                Command::AddTransaction(transaction)
            }
            "profile" => Command::Profile {
                name: arg(0, "a name")?,
                status: arg(1, "a status")?,
            },
            "version" | "--version" => Command::Version,
            other => return Err(CliError::usage(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

/// Entry point used by the binary.
pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let command = Command::parse(args)?;
    if command == Command::Version {
        print_version();
        return Ok(());
    }

    let config = load_config()?;
    crate::init_with_filter(config.log_filter.as_deref());
    debug!(?command, backend = %config.backend, "running command");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(command, &config))
}

fn load_config() -> Result<Config, CliError> {
    let manager = ConfigManager::from_default_location()?;
    Ok(manager.load_effective()?)
}

fn connect(config: &Config) -> Result<Box<dyn BackendClient>, CliError> {
    match config.backend {
        BackendKind::Memory => Ok(Box::new(MemoryBackend::with_records(offline_dataset()))),
        BackendKind::Http => {
            let url = config.api_url.as_deref().ok_or_else(|| {
                ConfigError::Invalid("the http backend needs an api_url".into())
            })?;
            let timeout = Duration::from_secs(config.request_timeout_secs);
            Ok(Box::new(HttpBackend::new(url, timeout)?))
        }
    }
}

async fn open_session(config: &Config) -> Result<Session, CliError> {
    let mut session =
        SyncController::new(connect(config)?).with_photo_settings(PhotoSettings {
            max_dimension: config.photo_max_dimension,
            quality: config.photo_quality,
        });
    if session.load().await == SessionMode::Offline {
        output::warning(OFFLINE_NOTICE);
    }
    Ok(session)
}

async fn execute(command: Command, config: &Config) -> Result<(), CliError> {
    let symbol = config.currency_symbol.as_str();
    match command {
        Command::Version => print_version(),
        Command::Dashboard { window } => {
            let session = open_session(config).await?;
            let totals = match window {
                Some(window) => session.dashboard_snapshot_in(window),
                None => session.dashboard_snapshot(),
            };
            output::section("Dashboard");
            output::block(&render::dashboard(session.profile(), &totals, symbol));
        }
        Command::History { keyword } => {
            let session = open_session(config).await?;
            let transactions = session.history_snapshot(keyword.as_deref());
            output::section("History");
            output::block(&render::history(&transactions, symbol));
        }
        Command::Categories { kind } => {
            let session = open_session(config).await?;
            output::section("Categories");
            output::block(&render::categories(session.store().categories(kind)));
        }
        Command::AddCategory { name, kind } => {
            let mut session = open_session(config).await?;
            session.add_category(&name, kind).await?;
            output::success(format!("Category `{}` saved.", name.trim()));
            output::block(&render::categories(session.store().categories(Some(kind))));
        }
        Command::DeleteCategory { id } => {
            let mut session = open_session(config).await?;
            session.delete_category(&id).await?;
            output::success(format!("Category `{id}` deleted."));
            output::block(&render::categories(session.store().categories(None)));
        }
        Command::AddTransaction(transaction) => {
            let mut session = open_session(config).await?;
            session.add_transaction(transaction).await?;
            output::success("Transaction saved.");
            let totals = session.dashboard_snapshot();
            output::block(&render::dashboard(session.profile(), &totals, symbol));
        }
        Command::Profile { name, status } => {
            let mut session = open_session(config).await?;
            session.update_profile(ProfileDraft::new(name, status)).await?;
            output::success("Profile updated.");
            output::block(&render::profile(session.profile()));
        }
    }
    Ok(())
}

fn print_version() {
    output::block(&format!("{}\n", build_info::current()));
}

fn parse_kind(value: &str) -> Result<EntryKind, CliError> {
    EntryKind::from_str(value).map_err(|err| CliError::usage(err.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CliError::usage(format!("invalid date `{value}` (expected YYYY-MM-DD)")))
}

fn parse_amount(value: &str) -> Result<Decimal, CliError> {
    Decimal::from_str(value.trim())
        .map_err(|_| CliError::usage(format!("invalid amount `{value}`")))
}

/// `YYYY-MM` selects a month, `YYYY` a whole year.
fn parse_period(value: &str) -> Result<DateWindow, CliError> {
    let invalid = || CliError::usage(format!("invalid period `{value}` (expected YYYY-MM or YYYY)"));
    let window = if value.contains('-') {
        let first = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .map_err(|_| invalid())?;
        DateWindow::month_of(first)
    } else {
        let year: i32 = value.parse().map_err(|_| invalid())?;
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        DateWindow::year_of(first)
    };
    window.map_err(|err| CliError::usage(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CliError> {
        Command::parse(line.split_whitespace().map(String::from))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_add_transaction_with_multi_word_note() {
        let command = parse("add-transaction 2024-05-01 expense Makan 3000 nasi goreng").unwrap();
        let expected = NewTransaction::new(
            date(2024, 5, 1),
            EntryKind::Expense,
            "Makan",
            Decimal::from(3000),
        )
        .with_note("nasi goreng");
        assert_eq!(command, Command::AddTransaction(expected));
    }

    #[test]
    fn parses_dashboard_periods() {
        let Command::Dashboard { window: Some(month) } = parse("dashboard 2024-02").unwrap() else {
            panic!("expected a month window");
        };
        assert_eq!((month.start, month.end), (date(2024, 2, 1), date(2024, 3, 1)));

        let Command::Dashboard { window: Some(year) } = parse("dashboard 2024").unwrap() else {
            panic!("expected a year window");
        };
        assert_eq!((year.start, year.end), (date(2024, 1, 1), date(2025, 1, 1)));

        assert_eq!(parse("dashboard").unwrap(), Command::Dashboard { window: None });
        assert!(parse("dashboard 2024-13").is_err());
    }

    #[test]
    fn rejects_bad_arguments_as_usage_errors() {
        for line in [
            "",
            "launch",
            "add-category Makan",
            "add-category Makan snacks",
            "add-transaction 01/05/2024 expense Makan 10",
            "add-transaction 2024-05-01 expense Makan ten",
            "categories savings",
        ] {
            assert!(
                matches!(parse(line), Err(CliError::Usage(_))),
                "`{line}` should be a usage error"
            );
        }
    }

    #[test]
    fn history_keyword_joins_remaining_words() {
        assert_eq!(
            parse("history nasi goreng").unwrap(),
            Command::History {
                keyword: Some("nasi goreng".into())
            }
        );
        assert_eq!(parse("categories income").unwrap(), Command::Categories {
            kind: Some(EntryKind::Income)
        });
    }
}
