//! Command-line front end for EventDesk.
//!
//! # Responsibility
//! - Parse configuration from flags and `EVENTDESK_*` environment variables.
//! - Drive `eventdesk_api` and print results as JSON on stdout.
//! - Print error bodies as JSON on stderr with a status-specific exit code.

use clap::{Parser, Subcommand};
use eventdesk_api::{
    ApiError, ApiStatus, CreateEventRequest, EventsApi, RegisterAttendeeRequest, RequestTime,
};
use eventdesk_core::{default_log_level, init_logging, EventId, DEFAULT_TIME_ZONE};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "eventdesk", version, about = "Manage events and attendee registrations")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "EVENTDESK_DB", default_value = "eventdesk.sqlite3")]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "EVENTDESK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "EVENTDESK_LOG_DIR")]
    log_dir: Option<String>,

    /// Zone used when a command does not name one.
    #[arg(long, env = "EVENTDESK_TIME_ZONE", default_value = DEFAULT_TIME_ZONE)]
    time_zone: String,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an event from local wall-clock times.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        /// Local start, e.g. 2030-07-01T18:00:00, or an instant such as
        /// 2030-07-01T12:30:00Z.
        #[arg(long)]
        start: RequestTime,
        /// Local end, e.g. 2030-07-01T21:00:00, or an instant.
        #[arg(long)]
        end: RequestTime,
        #[arg(long)]
        capacity: i64,
        /// Zone of `start`/`end`; defaults to the global zone.
        #[arg(long = "zone")]
        zone: Option<String>,
    },
    /// List upcoming events.
    List {
        #[arg(long = "zone")]
        zone: Option<String>,
    },
    /// Show one event.
    Show {
        event_id: EventId,
        #[arg(long = "zone")]
        zone: Option<String>,
    },
    /// Register an attendee.
    Register {
        event_id: EventId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List attendees, one page at a time.
    Attendees {
        event_id: EventId,
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,
    },
    /// Delete an event and all of its attendees.
    Delete { event_id: EventId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(cli.log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let api = match EventsApi::open(&cli.db) {
        Ok(api) => api.with_default_time_zone(cli.time_zone.clone()),
        Err(err) => return report(&err),
    };

    let outcome = run(&api, cli.command);
    match outcome {
        Ok(Some(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(api: &EventsApi, command: Command) -> Result<Option<String>, ApiError> {
    match command {
        Command::Create {
            name,
            location,
            start,
            end,
            capacity,
            zone,
        } => {
            let request = CreateEventRequest {
                name,
                location,
                start_time: start,
                end_time: end,
                max_capacity: capacity,
                time_zone: zone,
            };
            to_json(&api.create_event(&request)?)
        }
        Command::List { zone } => to_json(&api.list_events(zone.as_deref())?),
        Command::Show { event_id, zone } => to_json(&api.get_event(event_id, zone.as_deref())?),
        Command::Register {
            event_id,
            name,
            email,
        } => {
            let request = RegisterAttendeeRequest { name, email };
            to_json(&api.register_attendee(event_id, &request)?)
        }
        Command::Attendees {
            event_id,
            page,
            page_size,
        } => to_json(&api.list_attendees(event_id, page, page_size)?),
        Command::Delete { event_id } => {
            api.delete_event(event_id)?;
            Ok(None)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Option<String>, ApiError> {
    serde_json::to_string_pretty(value)
        .map(Some)
        .map_err(|err| ApiError {
            status: ApiStatus::Internal,
            code: "serialization_failed",
            message: err.to_string(),
            fields: Vec::new(),
        })
}

fn report(err: &ApiError) -> ExitCode {
    match serde_json::to_string(&err.body()) {
        Ok(body) => eprintln!("{body}"),
        Err(_) => eprintln!("{err}"),
    }
    exit_code(err.status)
}

fn exit_code(status: ApiStatus) -> ExitCode {
    match status {
        ApiStatus::BadRequest => ExitCode::from(2),
        ApiStatus::NotFound => ExitCode::from(3),
        ApiStatus::Conflict => ExitCode::from(4),
        ApiStatus::Internal => ExitCode::FAILURE,
    }
}
