use chrono::{Datelike, NaiveDate};

use crate::{is_on, match_member, normalize, EventRow, Match, MemberRow, Worksheet};

const NOT_IN_ROSTER: &str = "Sorry, I couldn't find your name in the roster :white_frowning_face:";
const AMBIGUOUS_IN_ROSTER: &str = "Sorry, more than one roster entry matches your name, so I can't tell which one is yours. Please reach out to the VPO :white_frowning_face:";

const REQUIREMENTS_DISCLAIMER: &str = "*Disclaimer:* \n- The requirements are assuming you are an active brother. If you are PT LOA, please reach out to the VPO to confirm your requirements.\n- If you are missing any requirements that you have already fulfilled, please reach out to the VPO. There may be discrepancies because I pull data from the roster, which may not be up-to-date yet :simple_smile:";
const RITUAL_DISCLAIMER: &str = "*Disclaimer:* \n- If you are PT LOA, please reach out to the VPO to confirm your ritual attendance requirements.\n- If a ritual you have attended is counted as an absence, please reach out to the VPO. There may be discrepancies because I pull data from the roster's ritual attendance sheet, which may not be up-to-date yet :simple_smile:";
const CHAPTER_DISCLAIMER: &str = "*Disclaimer:* \n- If you are PT LOA, please reach out to the VPO to confirm your chapter attendance requirements.\n- If a chapter meeting/event you have attended is counted as an absence, please reach out to the VPO. There may be discrepancies because I pull data from the roster's chapter attendance sheet, which may not be up-to-date yet :simple_smile:";

/// Finds the requester on one worksheet, or the reply explaining why not.
fn member_of(worksheet: &Worksheet, display_name: &str) -> Result<MemberRow, &'static str> {
    match match_member(&worksheet.table, display_name, worksheet.category()) {
        Match::Found(row) => Ok(row),
        Match::NotFound => Err(NOT_IN_ROSTER),
        Match::Ambiguous(_) => Err(AMBIGUOUS_IN_ROSTER),
    }
}

/// Threshold written in parentheses after the second header, e.g. `Name (5)`.
fn requirement_threshold(headers: &[String]) -> String {
    headers
        .get(1)
        .and_then(|header| header.split('(').nth(1))
        .map(|rest| rest.trim_end_matches(')').trim().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// One paragraph per requirement worksheet (service, professional, ...).
#[must_use]
pub fn requirements(worksheets: &[Worksheet], display_name: &str) -> String {
    if worksheets.is_empty() {
        return "Sorry, I couldn't find any requirement sheets in the roster :white_frowning_face:"
            .to_string();
    }

    let mut response = String::new();

    for worksheet in worksheets {
        let row = match member_of(worksheet, display_name) {
            Ok(row) => row,
            Err(reply) => return reply.to_string(),
        };

        let kind = worksheet
            .title
            .split_whitespace()
            .next()
            .unwrap_or(&worksheet.title);
        let kind_lower = kind.to_lowercase();
        let threshold = requirement_threshold(&row.headers);

        response += &format!("*{kind} requirements needed:* {threshold}\n");

        let count = row.count();
        if count.is_empty() || count == "0" {
            response += &format!(
                "\nYou have *NOT* completed any {kind} requirement(s) for this semester yet!\n\n"
            );
            continue;
        }

        response += &format!(
            "\nYou have completed *{count} {kind_lower} requirement(s)* for this semester! Here are the {kind_lower} events you have completed:\n"
        );
        for event in row.events_marked("TRUE") {
            response += &format!("- {event}\n");
        }
        response += "\n\n";
    }

    response + REQUIREMENTS_DISCLAIMER
}

#[must_use]
pub fn ritual_attendance(worksheet: Option<&Worksheet>, display_name: &str) -> String {
    let Some(worksheet) = worksheet else {
        return "Sorry, I couldn't find the ritual attendance sheet :white_frowning_face:".to_string();
    };

    let row = match member_of(worksheet, display_name) {
        Ok(row) => row,
        Err(reply) => return reply.to_string(),
    };

    let mut attended = "You have *attended* the following events:\n".to_string();
    for event in row.events_marked("TRUE") {
        attended += &format!("- {event}\n");
    }

    let mut missed = "You have *missed* the following events:\n".to_string();
    for event in row.events_marked("FALSE") {
        missed += &format!("- {event}\n");
    }

    format!(
        "Here's how many ritual absences you have this semester: *{}*\n\n\n{attended}\n{missed}\n\n{RITUAL_DISCLAIMER}",
        row.count()
    )
}

#[must_use]
pub fn chapter_attendance(worksheet: Option<&Worksheet>, display_name: &str) -> String {
    let Some(worksheet) = worksheet else {
        return "Sorry, I couldn't find the chapter attendance sheet :white_frowning_face:"
            .to_string();
    };

    let row = match member_of(worksheet, display_name) {
        Ok(row) => row,
        Err(reply) => return reply.to_string(),
    };

    let mut missed = "You have *missed* the following required meetings & events:\n".to_string();
    for event in row.events_marked("FALSE") {
        // dated columns ("9/12") are meetings, named columns are events
        if event.contains('/') {
            missed += &format!("- {event} chapter meeting\n");
        } else {
            missed += &format!("- {event}\n");
        }
    }

    format!(
        "Here's how many absences you have this semester for required chapter meetings & events: *{}*\n\n{missed}\n\n{CHAPTER_DISCLAIMER}",
        row.count()
    )
}

/// Events of the calendar values dated on or after `today`.
#[must_use]
pub fn upcoming_events(values: &[Vec<String>], today: NaiveDate) -> String {
    let upcoming: Vec<(NaiveDate, EventRow)> = EventRow::from_calendar(values, 3)
        .into_iter()
        .filter_map(|event| {
            let date = normalize(&event.month, &event.date, today.year())?;
            Some((date, event))
        })
        .filter(|(date, _)| *date >= today)
        .collect();

    if upcoming.is_empty() {
        return "According to the events calendar, there are no upcoming events.".to_string();
    }

    let mut response = "Here are the upcoming events, according to the events calendar:\n\n".to_string();

    for (date, event) in upcoming {
        response += &format!("- {} on *{}*", event.name, date.format("%m/%d/%Y"));

        if !event.time.is_empty() {
            response += &format!(" at *{}*", event.time);
        }

        if event.location.contains("Zoom") {
            response += &format!(" on {}", event.location);
        } else if !event.location.is_empty() {
            response += &format!(" at {}", event.location);
        }

        response.push('\n');
    }

    response
}

#[must_use]
pub fn todays_events(values: &[Vec<String>], today: NaiveDate) -> String {
    let events: Vec<EventRow> = EventRow::from_calendar(values, 2)
        .into_iter()
        .filter(|event| is_on(event, today))
        .collect();

    let mut response = match events.len() {
        0 => return "There are no events today :white_frowning_face:".to_string(),
        1 => "There is *1* event today, according to the events calendar:\n\n".to_string(),
        count => format!("There are *{count}* events today, according to the events calendar:\n\n"),
    };

    for event in events {
        response += &format!("*Event:* {}\n", event.name);

        if event.time.is_empty() {
            response += "No time has been provided on the events calendar. Please check with the VPO.\n";
        } else {
            response += &format!("*Time:* {}\n", event.time);
        }

        if event.location.is_empty() {
            response += "No location has been provided on the events calendar. Please check with the VPO.\n\n";
        } else {
            response += &format!("*Location:* {}\n\n", event.location);
        }
    }

    response
}

/// Formats the stored budget link, which may carry leading chat text.
#[must_use]
pub fn budget_link(stored: Option<&str>) -> String {
    let Some(stored) = stored.map(str::trim).filter(|url| !url.is_empty()) else {
        return "I don't have access to the budget sheet. Please check with the VPF.".to_string();
    };

    let url = stored.find("https").map_or(stored, |idx| &stored[idx..]);

    // older records were saved with the scheme colon stripped
    let url = match url.strip_prefix("https//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    };

    format!("Here's the link to the chapter budget: {url}")
}
