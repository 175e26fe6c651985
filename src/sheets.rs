use std::path::PathBuf;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use crate::{Error, Result};

const UPSTREAM: &str = "https://sheets.googleapis.com";
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Read-only access to the worksheets of a shared spreadsheet document.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn worksheet_titles(&self, document_url: &str) -> Result<Vec<String>>;

    /// Every cell of the worksheet as display text, row by row.
    async fn worksheet_values(&self, document_url: &str, title: &str) -> Result<Vec<Vec<String>>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// Service account key file; the roster is shared with its email.
    ServiceAccount(PathBuf),
    /// OAuth access token sent as `Authorization: Bearer`.
    Bearer(String),
    /// API key for documents shared as "anyone with the link".
    ApiKey(String),
}

enum Credentials {
    /// Tokens are minted on demand and cached until shortly before expiry.
    ServiceAccount(CustomServiceAccount),
    Bearer(String),
    ApiKey(String),
}

impl Credentials {
    fn load(auth: SheetsAuth) -> Result<Self> {
        Ok(match auth {
            SheetsAuth::ServiceAccount(path) => {
                debug!("Loading service account key from {}", path.display());
                Self::ServiceAccount(CustomServiceAccount::from_file(&path)?)
            }
            SheetsAuth::Bearer(token) => Self::Bearer(token),
            SheetsAuth::ApiKey(key) => Self::ApiKey(key),
        })
    }
}

pub struct GoogleSheets {
    http: Client,
    credentials: Credentials,
    upstream: String,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl GoogleSheets {
    pub fn new(auth: SheetsAuth) -> Result<Self> {
        Self::with_upstream(auth, UPSTREAM)
    }

    pub fn with_upstream(auth: SheetsAuth, upstream: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            credentials: Credentials::load(auth)?,
            upstream: upstream.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.upstream).map_err(|err| Error::Sheets(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| Error::Sheets(format!("invalid upstream `{}`", self.upstream)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match &self.credentials {
            Credentials::ServiceAccount(account) => {
                let token = account.token(&[READONLY_SCOPE]).await?;
                request.bearer_auth(token.as_str())
            }
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::ApiKey(key) => request.query(&[("key", key)]),
        })
    }
}

#[async_trait]
impl SheetSource for GoogleSheets {
    async fn worksheet_titles(&self, document_url: &str) -> Result<Vec<String>> {
        let id = spreadsheet_id(document_url)?;
        let url = self.url(&["v4", "spreadsheets", id])?;
        debug!("Listing worksheets of spreadsheet {id}");

        let spreadsheet: Spreadsheet = self
            .authorize(self.http.get(url))
            .await?
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    async fn worksheet_values(&self, document_url: &str, title: &str) -> Result<Vec<Vec<String>>> {
        let id = spreadsheet_id(document_url)?;
        let range = format!("'{}'", title.replace('\'', "''"));
        let url = self.url(&["v4", "spreadsheets", id, "values", &range])?;
        debug!("Reading worksheet `{title}` of spreadsheet {id}");

        let values: ValueRange = self
            .authorize(self.http.get(url))
            .await?
            .query(&[("majorDimension", "ROWS"), ("valueRenderOption", "FORMATTED_VALUE")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(values.values)
    }
}

/// Document id of a `https://docs.google.com/spreadsheets/d/{id}/edit` link.
pub fn spreadsheet_id(document_url: &str) -> Result<&str> {
    document_url
        .split("/spreadsheets/d/")
        .nth(1)
        .and_then(|rest| rest.split(['/', '#', '?']).next())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Sheets(format!("not a spreadsheet link: {document_url}")))
}
