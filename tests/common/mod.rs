#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chapter_bot::{
    bot::{Bot, Settings},
    cache::{self, SeenMessages},
    sheets::SheetSource,
    slack::{ChatClient, Member},
    store::{LinkStore, SqliteLinkStore},
    Error, Result,
};
use chrono::NaiveDate;

#[derive(Default)]
pub struct FakeChat {
    pub posts: Mutex<Vec<(String, String)>>,
    pub names: HashMap<String, String>,
    pub members: Vec<Member>,
}

impl FakeChat {
    pub fn with_names(names: &[(&str, &str)]) -> Self {
        Self {
            names: names
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.posts
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn open_direct(&self, user: &str) -> Result<String> {
        Ok(format!("D{user}"))
    }

    async fn real_name(&self, user: &str) -> Result<String> {
        self.names
            .get(user)
            .cloned()
            .ok_or_else(|| Error::Slack("user_not_found".to_string()))
    }

    async fn members(&self) -> Result<Vec<Member>> {
        Ok(self.members.clone())
    }
}

/// Worksheets of a single document, keyed by title in sheet order.
#[derive(Default)]
pub struct FakeSheets {
    pub worksheets: Vec<(String, Vec<Vec<String>>)>,
}

impl FakeSheets {
    pub fn with(mut self, title: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.worksheets.push((title.to_string(), rows));
        self
    }
}

#[async_trait]
impl SheetSource for FakeSheets {
    async fn worksheet_titles(&self, _document_url: &str) -> Result<Vec<String>> {
        Ok(self.worksheets.iter().map(|(title, _)| title.clone()).collect())
    }

    async fn worksheet_values(&self, _document_url: &str, title: &str) -> Result<Vec<Vec<String>>> {
        self.worksheets
            .iter()
            .find(|(name, _)| name == title)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| Error::Sheets(format!("no worksheet named {title}")))
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

pub fn bot(chat: &Arc<FakeChat>, sheets: FakeSheets, links: &Arc<SqliteLinkStore>) -> Bot {
    let settings = Settings {
        reference_date: Some(today()),
        ..Settings::default()
    };
    let seen = SeenMessages::new(cache::Config {
        capacity: 100,
        ttl: std::time::Duration::from_secs(60),
    });

    Bot::new(
        Arc::clone(chat) as Arc<dyn ChatClient>,
        Arc::new(sheets),
        Arc::clone(links) as Arc<dyn LinkStore>,
        seen,
        settings,
    )
}
