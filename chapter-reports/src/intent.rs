//! Keyword rules mapping chat text to the reply the bot should build.
//!
//! Rules are tried in table order and the first one whose keyword groups all
//! match wins. A group matches when any of its keywords occurs in the
//! lowercased text.

use crate::LinkKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    UpcomingEvents,
    UpdateLink(LinkKind),
    Slay,
    Requirements,
    ChapterZoom,
    Mailtime,
    Budget,
    TodaysEvents,
    RitualAttendance,
    ChapterAttendance,
    Thanks,
    Goodbye,
    HowAreYou,
    Greeting,
    Unknown,
}

impl Intent {
    /// Replies that read the roster or the events calendar.
    #[must_use]
    pub fn fetches_sheets(self) -> bool {
        matches!(
            self,
            Self::UpcomingEvents | Self::Requirements | Self::RitualAttendance | Self::ChapterAttendance
        )
    }
}

#[derive(Debug)]
pub struct Rule {
    pub intent: Intent,
    pub groups: &'static [&'static [&'static str]],
}

impl Rule {
    #[must_use]
    pub fn matches(&self, lowercased: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|keyword| lowercased.contains(keyword)))
    }
}

const QUESTION: &[&str] = &["how many", "which", "what"];

pub static RULES: &[Rule] = &[
    Rule {
        intent: Intent::UpcomingEvents,
        groups: &[&[
            "upcoming event",
            "upcoming chapter event",
            "events coming up",
            "future event",
            "future chapter event",
        ]],
    },
    Rule {
        intent: Intent::UpdateLink(LinkKind::Events),
        groups: &[&[
            "update the events calendar",
            "update events calendar",
            "update calendar",
            "update calendar of event",
            "update event",
        ]],
    },
    Rule {
        intent: Intent::Slay,
        groups: &[&["slay"]],
    },
    Rule {
        intent: Intent::Requirements,
        groups: &[
            QUESTION,
            &["requirements", "credits"],
            &["have", "need", "completed", "done"],
        ],
    },
    Rule {
        intent: Intent::UpdateLink(LinkKind::Roster),
        groups: &[&[
            "update the roster",
            "update roster",
            "update brother list",
            "update brother roster",
        ]],
    },
    Rule {
        intent: Intent::ChapterZoom,
        groups: &[&["chapter zoom", "zoom link", "zoom meeting"]],
    },
    Rule {
        intent: Intent::Mailtime,
        groups: &[&["mailtime", "mail time"]],
    },
    Rule {
        intent: Intent::UpdateLink(LinkKind::Budget),
        groups: &[&[
            "update the budget",
            "update budget",
            "update the chapter budget",
            "update chapter budget",
        ]],
    },
    Rule {
        intent: Intent::Budget,
        groups: &[&["budget", "budget spreadsheet", "budget sheet", "budget google sheet"]],
    },
    Rule {
        intent: Intent::TodaysEvents,
        groups: &[
            &["what", "where", "when"],
            &[
                "today's event",
                "todays event",
                "today's events",
                "todays events",
                "today's chapter event",
                "todays chapter event",
                "today",
            ],
        ],
    },
    Rule {
        intent: Intent::RitualAttendance,
        groups: &[QUESTION, &["ritual", "tradition"]],
    },
    Rule {
        intent: Intent::ChapterAttendance,
        groups: &[
            QUESTION,
            &["chapter meeting", "meeting", "chapter event", "event"],
            &["missed", "attended", "gone to", "shown up", "showed up"],
        ],
    },
    Rule {
        intent: Intent::Thanks,
        groups: &[&["thank", "thanks", "thx", "ty"]],
    },
    Rule {
        intent: Intent::Goodbye,
        groups: &[&[
            "bye", "goodbye", "cya", "see ya", "see you", "later", "adios", "farewell",
        ]],
    },
    Rule {
        intent: Intent::HowAreYou,
        groups: &[&["how are you", "how are u", "how r u", "how you doin", "how u doin"]],
    },
    Rule {
        intent: Intent::Greeting,
        groups: &[&["hi", "hello", "howdy", "hola", "hey"]],
    },
];

#[must_use]
pub fn classify(text: &str) -> Intent {
    let lowercased = text.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&lowercased))
        .map_or(Intent::Unknown, |rule| rule.intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcoming_event_variants_in_any_case() {
        for text in [
            "any UPCOMING EVENTS?",
            "What upcoming chapter events are there",
            "which events coming up this week",
            "Future Event list please",
            "tell me about future chapter events",
        ] {
            assert_eq!(classify(text), Intent::UpcomingEvents, "{text}");
        }
    }

    #[test]
    fn upcoming_outranks_later_rules() {
        // also matches the chapter attendance and greeting rules
        assert_eq!(
            classify("hi, what upcoming events have I missed?"),
            Intent::UpcomingEvents
        );
    }

    #[test]
    fn link_updates_by_kind() {
        assert_eq!(
            classify("update calendar: <https://docs.google.com/a>"),
            Intent::UpdateLink(LinkKind::Events)
        );
        assert_eq!(
            classify("Update the roster <https://docs.google.com/b>"),
            Intent::UpdateLink(LinkKind::Roster)
        );
        assert_eq!(
            classify("update chapter budget <https://docs.google.com/c>"),
            Intent::UpdateLink(LinkKind::Budget)
        );
        assert_eq!(classify("where is the budget sheet"), Intent::Budget);
    }

    #[test]
    fn requirements_need_all_three_groups() {
        assert_eq!(
            classify("how many service credits have I completed?"),
            Intent::Requirements
        );
        assert_ne!(classify("what requirements exist"), Intent::Requirements);
    }

    #[test]
    fn attendance_questions() {
        assert_eq!(classify("how many rituals did I miss"), Intent::RitualAttendance);
        assert_eq!(
            classify("which chapter meetings have I missed"),
            Intent::ChapterAttendance
        );
        assert_eq!(classify("what's happening today"), Intent::TodaysEvents);
    }

    #[test]
    fn small_talk_and_fallback() {
        assert_eq!(classify("thanks!"), Intent::Thanks);
        assert_eq!(classify("ok bye"), Intent::Goodbye);
        assert_eq!(classify("how are you doing"), Intent::HowAreYou);
        assert_eq!(classify("Hello"), Intent::Greeting);
        assert_eq!(classify("send zoom link"), Intent::ChapterZoom);
        assert_eq!(classify("mail time form?"), Intent::Mailtime);
        assert_eq!(classify("slay"), Intent::Slay);
        assert_eq!(classify("xyzzy"), Intent::Unknown);
    }

    #[test]
    fn only_report_intents_fetch_sheets() {
        assert!(Intent::Requirements.fetches_sheets());
        assert!(!Intent::TodaysEvents.fetches_sheets());
        assert!(!Intent::UpdateLink(LinkKind::Budget).fetches_sheets());
    }
}
