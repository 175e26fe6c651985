use std::{env, sync::Arc};

use tokio::sync::mpsc;

use chapter_bot::{
    bot::Bot,
    cache::SeenMessages,
    cli, schedule,
    server::{self, AppState},
    sheets::GoogleSheets,
    slack::SlackClient,
    store::SqliteLinkStore,
};

const QUEUE_SIZE: usize = 64;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "chapter_bot=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    let slack = Arc::new(SlackClient::new(args.slack_token));
    let bot_user = slack.bot_user_id().await?;
    let links = Arc::new(SqliteLinkStore::open(&args.database)?);
    let sheets = Arc::new(GoogleSheets::new(args.sheets_auth)?);

    let bot = Arc::new(
        Bot::new(slack, sheets, links, SeenMessages::new(args.dedup), args.settings)
            .with_bot_user(bot_user),
    );

    let (queue, receiver) = mpsc::channel(QUEUE_SIZE);
    server::spawn_worker(Arc::clone(&bot), receiver);
    schedule::spawn_birthdays(Arc::clone(&bot), args.birthday_at);

    server::serve(args.address, AppState { bot, queue }).await?;
    Ok(())
}
