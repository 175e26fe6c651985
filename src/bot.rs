use std::sync::Arc;

use chapter_reports::{
    birthdays_on, budget_link, chapter_attendance, classify, requirements, ritual_attendance,
    todays_events, upcoming_events, Intent, LinkKind, SheetCategory, Table, Worksheet,
    CALENDAR_WORKSHEET,
};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::cache::SeenMessages;
use crate::sheets::SheetSource;
use crate::slack::ChatClient;
use crate::store::LinkStore;
use crate::Result;

const FETCHING: &str = "Give me a few seconds to fetch the data...";

/// A chat message as delivered by the event webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub channel: String,
    pub user: String,
    pub text: String,
    /// Unique per message; used to drop redelivered events.
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Substring of the real name of the user allowed to change links.
    pub admin_name: String,
    /// Overrides the wall-clock date used by event reports.
    pub reference_date: Option<NaiveDate>,
    pub help_url: String,
    pub zoom_link: Option<String>,
    pub mailtime_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_name: "Harsha".to_string(),
            reference_date: None,
            help_url: "https://docs.google.com/document/d/11AJg75hrNBqvMluzdIpBV0ZRmww6LCLqcMITz1c6KFA/edit?usp=sharing".to_string(),
            zoom_link: None,
            mailtime_url: "https://bit.ly/mailtimeforms".to_string(),
        }
    }
}

pub struct Bot {
    chat: Arc<dyn ChatClient>,
    sheets: Arc<dyn SheetSource>,
    links: Arc<dyn LinkStore>,
    seen: SeenMessages,
    settings: Settings,
    bot_user: Option<String>,
}

impl Bot {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        sheets: Arc<dyn SheetSource>,
        links: Arc<dyn LinkStore>,
        seen: SeenMessages,
        settings: Settings,
    ) -> Self {
        Self {
            chat,
            sheets,
            links,
            seen,
            settings,
            bot_user: None,
        }
    }

    /// Messages from this user id are ignored.
    #[must_use]
    pub fn with_bot_user(mut self, user: impl Into<String>) -> Self {
        self.bot_user = Some(user.into());
        self
    }

    fn today(&self) -> NaiveDate {
        self.settings
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Answers one chat message. Redelivered ids and the bot's own messages
    /// are dropped without a reply.
    pub async fn handle_message(&self, event: &MessageEvent) -> Result<()> {
        if self.bot_user.as_deref() == Some(event.user.as_str()) {
            return Ok(());
        }

        if !self.seen.first_delivery(&event.id) {
            debug!("Dropping redelivered message {}", event.id);
            return Ok(());
        }

        let intent = classify(&event.text);
        debug!("Message {} classified as {intent:?}", event.id);

        if intent.fetches_sheets() {
            self.chat.post_message(&event.channel, FETCHING).await?;
        }

        let reply = self.reply(intent, &event.user, &event.text).await?;
        self.chat.post_message(&event.channel, &reply).await
    }

    pub async fn reply(&self, intent: Intent, user: &str, text: &str) -> Result<String> {
        let reply = match intent {
            Intent::UpcomingEvents => self.calendar(upcoming_events).await?,
            Intent::TodaysEvents => self.calendar(todays_events).await?,
            Intent::UpdateLink(kind) => self.update_link(kind, user, text).await?,
            Intent::Requirements => self.requirements(user).await?,
            Intent::RitualAttendance => {
                self.attendance(user, SheetCategory::Ritual, ritual_attendance)
                    .await?
            }
            Intent::ChapterAttendance => {
                self.attendance(user, SheetCategory::ChapterAttendance, chapter_attendance)
                    .await?
            }
            Intent::Budget => budget_link(self.links.get(LinkKind::Budget)?.as_deref()),
            Intent::ChapterZoom => match &self.settings.zoom_link {
                Some(link) => format!("Here's the link to the chapter Zoom:\n\n {link}"),
                None => "I don't have the chapter Zoom link yet. Please check with the VPO."
                    .to_string(),
            },
            Intent::Mailtime => format!(
                "Here's the link to the mailtime form: {}",
                self.settings.mailtime_url
            ),
            Intent::Slay => "AUR NAURRR SLAYYY :fire::fire::fire:".to_string(),
            Intent::Thanks => format!("You're welcome!! <@{user}> :smile:"),
            Intent::Goodbye => format!("Goodbye!! <@{user}> :wave:"),
            Intent::HowAreYou => format!("I'm doing well, thanks for asking!! <@{user}> :smile:"),
            Intent::Greeting => format!("Hello!! <@{user}> :wave: How can I help?"),
            Intent::Unknown => {
                "Sorry, I don't understand that command :white_frowning_face:".to_string()
            }
        };

        Ok(reply)
    }

    /// Posts the documentation link for the `/help` command.
    pub async fn help(&self, channel: &str) -> Result<()> {
        let text = format!(
            "Here's the link to the user documentation: {}",
            self.settings.help_url
        );
        self.chat.post_message(channel, &text).await
    }

    async fn update_link(&self, kind: LinkKind, user: &str, text: &str) -> Result<String> {
        let name = self.chat.real_name(user).await?;

        if !name.contains(&self.settings.admin_name) {
            warn!("{name} ({user}) is not allowed to update the {kind} link");
            return Ok(format!(
                "Sorry, you don't have permission to update the {kind} :white_frowning_face:"
            ));
        }

        Ok(match self.links.set(kind, text)? {
            Some(url) => {
                info!("Updated the {kind} link to {url}");
                format!(
                    "Updated the {kind} link for you :simple_smile:\nAll user queries will now use this updated link!"
                )
            }
            None => format!(
                "I couldn't find a link in your message. Please include the new {kind} link :white_frowning_face:"
            ),
        })
    }

    async fn calendar(&self, build: fn(&[Vec<String>], NaiveDate) -> String) -> Result<String> {
        let Some(url) = self.links.get(LinkKind::Events)? else {
            return Ok(missing_link(LinkKind::Events));
        };

        let titles = self.sheets.worksheet_titles(&url).await?;
        if !titles.iter().any(|title| title == CALENDAR_WORKSHEET) {
            warn!("Events document has no `{CALENDAR_WORKSHEET}` worksheet");
            return Ok(format!(
                "Sorry, I couldn't find the {CALENDAR_WORKSHEET} sheet :white_frowning_face:"
            ));
        }

        let values = self.sheets.worksheet_values(&url, CALENDAR_WORKSHEET).await?;
        Ok(build(&values, self.today()))
    }

    async fn requirements(&self, user: &str) -> Result<String> {
        let Some(url) = self.links.get(LinkKind::Roster)? else {
            return Ok(missing_link(LinkKind::Roster));
        };

        let name = self.chat.real_name(user).await?;
        let mut worksheets = Vec::new();

        for title in self.sheets.worksheet_titles(&url).await? {
            if SheetCategory::of(&title) == SheetCategory::Requirement {
                worksheets.push(self.worksheet(&url, title).await?);
            }
        }

        Ok(requirements(&worksheets, &name))
    }

    async fn attendance(
        &self,
        user: &str,
        category: SheetCategory,
        build: fn(Option<&Worksheet>, &str) -> String,
    ) -> Result<String> {
        let Some(url) = self.links.get(LinkKind::Roster)? else {
            return Ok(missing_link(LinkKind::Roster));
        };

        let name = self.chat.real_name(user).await?;
        let worksheet = match self.find_worksheet(&url, category).await? {
            Some(title) => Some(self.worksheet(&url, title).await?),
            None => None,
        };

        Ok(build(worksheet.as_ref(), &name))
    }

    /// Sends a direct message to every active member whose birthday is today.
    /// Returns how many messages were sent.
    pub async fn birthday_sweep(&self) -> Result<usize> {
        let Some(url) = self.links.get(LinkKind::Roster)? else {
            warn!("Skipping birthday sweep: no roster link stored");
            return Ok(0);
        };

        let Some(title) = self.find_worksheet(&url, SheetCategory::ActiveRoster).await? else {
            warn!("Skipping birthday sweep: roster has no active members sheet");
            return Ok(0);
        };

        let roster = self.worksheet(&url, title).await?;
        let names = birthdays_on(&roster.table, self.today());
        if names.is_empty() {
            return Ok(0);
        }

        let members = self.chat.members().await?;
        let mut sent = 0;

        for name in names {
            let Some(member) = members
                .iter()
                .find(|member| member.real_name_normalized.to_lowercase() == name)
            else {
                warn!("No chat member named {name} for their birthday message");
                continue;
            };

            let channel = self.chat.open_direct(&member.id).await?;
            self.chat
                .post_message(
                    &channel,
                    &format!("Happy Birthday, <@{}>! :tada: :birthday:", member.id),
                )
                .await?;
            sent += 1;
        }

        Ok(sent)
    }

    async fn find_worksheet(&self, url: &str, category: SheetCategory) -> Result<Option<String>> {
        Ok(self
            .sheets
            .worksheet_titles(url)
            .await?
            .into_iter()
            .find(|title| SheetCategory::of(title) == category))
    }

    async fn worksheet(&self, url: &str, title: String) -> Result<Worksheet> {
        let values = self.sheets.worksheet_values(url, &title).await?;
        Ok(Worksheet {
            title,
            table: Table::from_roster_values(values),
        })
    }
}

fn missing_link(kind: LinkKind) -> String {
    format!("I don't have the {kind} link yet. Please ask an admin to update it :white_frowning_face:")
}
