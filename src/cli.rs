use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use getopts::{Matches, Options};

use crate::bot::Settings;
use crate::cache;
use crate::sheets::SheetsAuth;
use crate::{Error, Result};

const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
const GOOGLE_SHEETS_TOKEN: &str = "GOOGLE_SHEETS_TOKEN";
const GOOGLE_SHEETS_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub database: PathBuf,
    pub birthday_at: NaiveTime,
    pub dedup: cache::Config,
    pub settings: Settings,
    pub slack_token: String,
    pub sheets_auth: SheetsAuth,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "d",
        "database",
        "SQLite file holding the stored links [Default: chapter-bot.sqlite]",
        "PATH",
    );
    opts.optopt(
        "",
        "admin",
        "Name that must appear in a user's real name to update links [Default: Harsha]",
        "NAME",
    );
    opts.optopt(
        "",
        "birthday-at",
        "Local time of the daily birthday messages [Default: 09:00]",
        "HH:MM",
    );
    opts.optopt(
        "",
        "reference-date",
        "Date used as today for event reports [Default: current date]",
        "YYYY-MM-DD",
    );
    opts.optopt(
        "",
        "dedup-ttl",
        "How long handled message ids are remembered [Default: 86400]",
        "SECONDS",
    );
    opts.optopt(
        "",
        "dedup-capacity",
        "How many handled message ids are remembered [Default: 10000]",
        "COUNT",
    );
    opts.optopt(
        "",
        "service-account",
        "Google service account key file used to read the spreadsheets",
        "PATH",
    );
    opts.optopt("", "help-url", "Link posted by the /help command", "URL");
    opts.optopt("", "zoom-link", "Text posted when asked for the chapter Zoom", "TEXT");
    opts.optopt("", "mailtime-url", "Link to the mailtime form", "URL");
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let slack_token = match env::var(SLACK_BOT_TOKEN) {
        Ok(token) => token,
        Err(_) => {
            eprintln!("`{SLACK_BOT_TOKEN}` environment variable is not set");
            process::exit(1);
        }
    };

    let sheets_env = match (env::var(GOOGLE_SHEETS_TOKEN), env::var(GOOGLE_SHEETS_API_KEY)) {
        (Ok(token), _) => Some(SheetsAuth::Bearer(token)),
        (_, Ok(key)) => Some(SheetsAuth::ApiKey(key)),
        _ => None,
    };

    match from_matches(&matches, slack_token, sheets_env) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn invalid(option: &str, err: impl std::fmt::Display) -> Error {
    Error::Config(format!("Provided value for option '{option}' is invalid: {err}"))
}

/// The service account file wins over the static credentials from the environment.
fn from_matches(
    matches: &Matches,
    slack_token: String,
    sheets_env: Option<SheetsAuth>,
) -> Result<Args> {
    let sheets_auth = matches
        .opt_str("service-account")
        .map(|path| SheetsAuth::ServiceAccount(PathBuf::from(path)))
        .or(sheets_env)
        .ok_or_else(|| {
            Error::Config(format!(
                "One of `--service-account`, `{GOOGLE_SHEETS_TOKEN}` or `{GOOGLE_SHEETS_API_KEY}` must be set"
            ))
        })?;

    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(|err| invalid("address", err))?;

    let database = matches
        .opt_str("database")
        .map_or_else(|| PathBuf::from("chapter-bot.sqlite"), PathBuf::from);

    let birthday_at = match matches.opt_str("birthday-at") {
        Some(value) => NaiveTime::parse_from_str(&value, "%H:%M")
            .map_err(|err| invalid("birthday-at", err))?,
        None => NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
    };

    let reference_date = matches
        .opt_str("reference-date")
        .map(|value| NaiveDate::parse_from_str(&value, "%Y-%m-%d"))
        .transpose()
        .map_err(|err| invalid("reference-date", err))?;

    let ttl = matches
        .opt_get_default("dedup-ttl", 86_400)
        .map_err(|err| invalid("dedup-ttl", err))?;

    let capacity = matches
        .opt_get_default("dedup-capacity", 10_000)
        .map_err(|err| invalid("dedup-capacity", err))?;

    let defaults = Settings::default();
    let settings = Settings {
        admin_name: matches.opt_str("admin").unwrap_or(defaults.admin_name),
        reference_date,
        help_url: matches.opt_str("help-url").unwrap_or(defaults.help_url),
        zoom_link: matches.opt_str("zoom-link").or(defaults.zoom_link),
        mailtime_url: matches.opt_str("mailtime-url").unwrap_or(defaults.mailtime_url),
    };

    Ok(Args {
        address,
        database,
        birthday_at,
        dedup: cache::Config {
            capacity,
            ttl: Duration::from_secs(ttl),
        },
        settings,
        slack_token,
        sheets_auth,
    })
}
