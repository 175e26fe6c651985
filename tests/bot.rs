mod common;

use std::sync::Arc;

use chapter_bot::{bot::MessageEvent, slack::Member, store::{LinkStore, SqliteLinkStore}};
use chapter_reports::{Intent, LinkKind};
use common::{bot, FakeChat, FakeSheets};

const CALENDAR: &str = "https://docs.google.com/spreadsheets/d/calendar/edit";
const ROSTER: &str = "https://docs.google.com/spreadsheets/d/roster/edit";

fn message(user: &str, text: &str, id: &str) -> MessageEvent {
    MessageEvent {
        channel: "C1".to_string(),
        user: user.to_string(),
        text: text.to_string(),
        id: id.to_string(),
    }
}

fn links() -> Arc<SqliteLinkStore> {
    Arc::new(SqliteLinkStore::in_memory().unwrap())
}

#[tokio::test]
async fn redelivered_message_is_answered_once() {
    let chat = Arc::new(FakeChat::default());
    let bot = bot(&chat, FakeSheets::default(), &links());

    let event = message("U2", "hello", "1700000000.000100");
    bot.handle_message(&event).await.unwrap();
    bot.handle_message(&event).await.unwrap();

    assert_eq!(
        chat.posts(),
        vec![(
            "C1".to_string(),
            "Hello!! <@U2> :wave: How can I help?".to_string()
        )]
    );
}

#[tokio::test]
async fn own_messages_are_ignored() {
    let chat = Arc::new(FakeChat::default());
    let bot = bot(&chat, FakeSheets::default(), &links()).with_bot_user("UBOT");

    bot.handle_message(&message("UBOT", "hello", "1")).await.unwrap();

    assert!(chat.posts().is_empty());
}

#[tokio::test]
async fn upcoming_events_are_read_from_the_calendar() {
    let chat = Arc::new(FakeChat::default());
    let links = links();
    links.set(LinkKind::Events, CALENDAR).unwrap();

    let sheets = FakeSheets::default().with(
        "Semester Calendar",
        &[
            &["Fall Calendar"],
            &[""],
            &["Month", "Date", "Time", "Event", "Location"],
            &["October", "1st", "6pm", "Retreat", "Lodge"],
            &["October", "20th", "7pm", "Mixer", "Zoom"],
            &["November", "2", "", "Formal", "Ballroom"],
        ],
    );
    let bot = bot(&chat, sheets, &links);

    bot.handle_message(&message("U2", "any upcoming events?", "1"))
        .await
        .unwrap();

    let texts: Vec<String> = chat.posts().into_iter().map(|(_, text)| text).collect();
    assert_eq!(
        texts,
        vec![
            "Give me a few seconds to fetch the data...".to_string(),
            "Here are the upcoming events, according to the events calendar:\n\n\
             - Mixer on *10/20/2026* at *7pm* on Zoom\n\
             - Formal on *11/02/2026* at Ballroom\n"
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn missing_calendar_worksheet_is_reported() {
    let chat = Arc::new(FakeChat::default());
    let links = links();
    links.set(LinkKind::Events, CALENDAR).unwrap();

    let sheets = FakeSheets::default().with("Spring Calendar", &[&["Month", "Date"]]);
    let bot = bot(&chat, sheets, &links);

    for intent in [Intent::UpcomingEvents, Intent::TodaysEvents] {
        let reply = bot.reply(intent, "U2", "").await.unwrap();
        assert_eq!(
            reply,
            "Sorry, I couldn't find the Semester Calendar sheet :white_frowning_face:",
            "{intent:?}"
        );
    }

    bot.handle_message(&message("U2", "any upcoming events?", "1"))
        .await
        .unwrap();
    assert_eq!(chat.posts().len(), 2);
}

#[tokio::test]
async fn non_admins_cannot_update_links() {
    let chat = Arc::new(FakeChat::with_names(&[("U2", "Jane Smith")]));
    let links = links();
    let bot = bot(&chat, FakeSheets::default(), &links);

    let reply = bot
        .reply(
            chapter_reports::classify("update roster <https://docs.google.com/x>"),
            "U2",
            "update roster <https://docs.google.com/x>",
        )
        .await
        .unwrap();

    assert_eq!(
        reply,
        "Sorry, you don't have permission to update the roster :white_frowning_face:"
    );
    assert_eq!(links.get(LinkKind::Roster).unwrap(), None);
}

#[tokio::test]
async fn admin_updates_a_link() {
    let chat = Arc::new(FakeChat::with_names(&[("U9", "Harsha Patel")]));
    let links = links();
    let bot = bot(&chat, FakeSheets::default(), &links);

    let text = format!("update roster <{ROSTER}>");
    bot.handle_message(&message("U9", &text, "1")).await.unwrap();

    assert_eq!(links.get(LinkKind::Roster).unwrap().as_deref(), Some(ROSTER));
    assert!(chat.posts()[0].1.starts_with("Updated the roster link for you"));
}

#[tokio::test]
async fn missing_roster_link_is_reported() {
    let chat = Arc::new(FakeChat::with_names(&[("U2", "Jane Smith")]));
    let bot = bot(&chat, FakeSheets::default(), &links());

    let reply = bot
        .reply(Intent::RitualAttendance, "U2", "what rituals have I missed?")
        .await
        .unwrap();

    assert_eq!(
        reply,
        "I don't have the roster link yet. Please ask an admin to update it :white_frowning_face:"
    );
}

#[tokio::test]
async fn ritual_attendance_for_the_asking_member() {
    let chat = Arc::new(FakeChat::with_names(&[("U2", "Jane Smith")]));
    let links = links();
    links.set(LinkKind::Roster, ROSTER).unwrap();

    let sheets = FakeSheets::default()
        .with("Fundraising", &[&["Name", "Count"]])
        .with(
            "Ritual Attendance",
            &[
                &["Name", "Absences", "Initiation", "Founders Day", "Notes"],
                &["Jane Smith", "1", "TRUE", "FALSE", "excused"],
                &["John Doe", "0", "TRUE", "TRUE", ""],
            ],
        );
    let bot = bot(&chat, sheets, &links);

    bot.handle_message(&message("U2", "what rituals have I missed?", "1"))
        .await
        .unwrap();

    let posts = chat.posts();
    assert_eq!(posts.len(), 2);
    let reply = &posts[1].1;
    assert!(reply.starts_with("Here's how many ritual absences you have this semester: *1*"));
    assert!(reply.contains("*attended* the following events:\n- Initiation\n"));
    assert!(reply.contains("*missed* the following events:\n- Founders Day\n"));
}

#[tokio::test]
async fn birthday_sweep_messages_todays_members() {
    let chat = Arc::new(FakeChat {
        members: vec![
            Member {
                id: "U1".to_string(),
                real_name_normalized: "Jane Smith".to_string(),
            },
            Member {
                id: "U3".to_string(),
                real_name_normalized: "John Doe".to_string(),
            },
        ],
        ..FakeChat::default()
    });
    let links = links();
    links.set(LinkKind::Roster, ROSTER).unwrap();

    let sheets = FakeSheets::default().with(
        "Active Brothers",
        &[
            &["First", "Last", "Email", "Phone", "Birthday"],
            &["Jane", "Smith", "", "", "October 14th"],
            &["John", "Doe", "", "", "May 2nd"],
            &["Sam", "Lee", "", "", "October 14th"],
        ],
    );
    let bot = bot(&chat, sheets, &links);

    assert_eq!(bot.birthday_sweep().await.unwrap(), 1);
    assert_eq!(
        chat.posts(),
        vec![(
            "DU1".to_string(),
            "Happy Birthday, <@U1>! :tada: :birthday:".to_string()
        )]
    );
}

#[tokio::test]
async fn birthday_sweep_without_roster_sends_nothing() {
    let chat = Arc::new(FakeChat::default());
    let bot = bot(&chat, FakeSheets::default(), &links());

    assert_eq!(bot.birthday_sweep().await.unwrap(), 0);
    assert!(chat.posts().is_empty());
}

#[tokio::test]
async fn help_posts_the_documentation_link() {
    let chat = Arc::new(FakeChat::default());
    let bot = bot(&chat, FakeSheets::default(), &links());

    bot.help("C7").await.unwrap();

    let posts = chat.posts();
    assert_eq!(posts[0].0, "C7");
    assert!(posts[0].1.starts_with("Here's the link to the user documentation: https://"));
}
