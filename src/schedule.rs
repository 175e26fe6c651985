use std::sync::Arc;

use chrono::{Local, NaiveDateTime, NaiveTime};
use log::{error, info};
use tokio::{task::JoinHandle, time};

use crate::bot::Bot;

/// The first `at` strictly after `now`.
#[must_use]
pub fn next_run(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(at);
    if candidate > now {
        return candidate;
    }

    now.date()
        .succ_opt()
        .map_or(candidate, |tomorrow| tomorrow.and_time(at))
}

/// Runs the birthday sweep every day at the local time `at`.
pub fn spawn_birthdays(bot: Arc<Bot>, at: NaiveTime) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Local::now().naive_local();
            let wait = (next_run(now, at) - now).to_std().unwrap_or_default();
            time::sleep(wait).await;

            match bot.birthday_sweep().await {
                Ok(sent) => info!("Birthday sweep sent {sent} message(s)"),
                Err(err) => error!("Birthday sweep failed: {err}"),
            }
        }
    })
}
