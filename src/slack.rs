use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{Error, Result};

const UPSTREAM: &str = "https://slack.com/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub real_name_normalized: String,
}

/// The chat operations the bot relies on.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Opens (or reuses) the direct conversation with `user`, returning its channel id.
    async fn open_direct(&self, user: &str) -> Result<String>;

    async fn real_name(&self, user: &str) -> Result<String>;

    async fn members(&self) -> Result<Vec<Member>>;
}

pub struct SlackClient {
    http: Client,
    token: String,
    upstream: String,
}

#[derive(Deserialize)]
struct AuthTest {
    user_id: String,
}

#[derive(Deserialize)]
struct Opened {
    channel: Channel,
}

#[derive(Deserialize)]
struct Channel {
    id: String,
}

#[derive(Deserialize)]
struct UserInfo {
    user: User,
}

#[derive(Deserialize)]
struct User {
    profile: Profile,
}

#[derive(Deserialize)]
struct Profile {
    #[serde(default)]
    real_name: String,
}

#[derive(Deserialize)]
struct UserList {
    members: Vec<ListedUser>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ListedUser {
    id: String,
    profile: ListedProfile,
}

#[derive(Deserialize)]
struct ListedProfile {
    #[serde(default)]
    real_name_normalized: String,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_upstream(token, UPSTREAM)
    }

    #[must_use]
    pub fn with_upstream(token: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            upstream: upstream.into(),
        }
    }

    /// User id of the bot itself, used to ignore its own messages.
    pub async fn bot_user_id(&self) -> Result<String> {
        let auth: AuthTest = self.call(self.http.post(self.method("auth.test"))).await?;
        Ok(auth.user_id)
    }

    fn method(&self, name: &str) -> String {
        format!("{}/{name}", self.upstream)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body: Value = request
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        check_ok(body)
    }
}

/// Slack reports failures in the body with `"ok": false` and an `error` code.
fn check_ok<T: DeserializeOwned>(body: Value) -> Result<T> {
    if body.get("ok").and_then(Value::as_bool) != Some(true) {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        return Err(Error::Slack(code.to_string()));
    }

    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl ChatClient for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        debug!("Posting message to {channel}");
        let request = self
            .http
            .post(self.method("chat.postMessage"))
            .json(&json!({ "channel": channel, "text": text }));

        self.call::<Value>(request).await.map(|_| ())
    }

    async fn open_direct(&self, user: &str) -> Result<String> {
        let request = self
            .http
            .post(self.method("conversations.open"))
            .json(&json!({ "users": user }));

        let opened: Opened = self.call(request).await?;
        Ok(opened.channel.id)
    }

    async fn real_name(&self, user: &str) -> Result<String> {
        let request = self
            .http
            .get(self.method("users.info"))
            .query(&[("user", user)]);

        let info: UserInfo = self.call(request).await?;
        Ok(info.user.profile.real_name)
    }

    async fn members(&self) -> Result<Vec<Member>> {
        let mut members = Vec::new();
        let mut cursor = String::new();

        loop {
            let request = self
                .http
                .get(self.method("users.list"))
                .query(&[("limit", "200"), ("cursor", cursor.as_str())]);

            let page: UserList = self.call(request).await?;
            members.extend(page.members.into_iter().map(|user| Member {
                id: user.id,
                real_name_normalized: user.profile.real_name_normalized,
            }));

            cursor = page
                .response_metadata
                .map(|metadata| metadata.next_cursor)
                .unwrap_or_default();

            if cursor.is_empty() {
                return Ok(members);
            }
        }
    }
}
