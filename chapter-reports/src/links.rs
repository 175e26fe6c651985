use std::fmt;

/// The three links admins can point the bot at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Events,
    Roster,
    Budget,
}

impl LinkKind {
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Events => "events_url",
            Self::Roster => "roster_url",
            Self::Budget => "budget_url",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Events => "events calendar",
            Self::Roster => "roster",
            Self::Budget => "budget",
        })
    }
}

/// Pulls the URL out of a chat message such as
/// `update roster <https://docs.google.com/...|docs.google.com/...>`.
///
/// Messages without link markup (`update roster: https://...`) fall back to
/// the first colon whose surrounding segments form an http(s) URL.
#[must_use]
pub fn extract_url(text: &str) -> Option<String> {
    from_markup(text).or_else(|| from_segments(text))
}

fn from_markup(text: &str) -> Option<String> {
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        let inner = &rest[start + 1..];
        let end = inner.find('>')?;
        let target = inner[..end].split('|').next().unwrap_or_default().trim();

        if target.starts_with("http://") || target.starts_with("https://") {
            return Some(target.to_string());
        }

        rest = &inner[end + 1..];
    }

    None
}

fn from_segments(text: &str) -> Option<String> {
    text.match_indices(':').find_map(|(idx, _)| {
        let scheme = text[..idx].split_whitespace().last()?.trim_start_matches('<');
        if scheme != "http" && scheme != "https" {
            return None;
        }

        let rest = text[idx + 1..]
            .split(|c: char| c.is_whitespace() || c == '|' || c == '>')
            .next()?;

        (rest.starts_with("//") && rest.len() > 2).then(|| format!("{scheme}:{rest}"))
    })
}
