//! Special-note parsing.
//!
//! Manifests carry handling instructions as free text.  The loader turns the
//! recognised phrasings into typed [`Constraint`]s so that the dispatch
//! policy is written against rules, never against particular package ids.
//!
//! | Note text (case-insensitive)                              | Constraint                |
//! |-----------------------------------------------------------|---------------------------|
//! | `Must be delivered with 15, 19`                           | `ShipWith([15, 19])`      |
//! | `must ship with package 13 and 19`                        | `ShipWith([13, 19])`      |
//! | `Can only be on truck 2`, `truck-only 2`                  | `TruckOnly(2)`            |
//! | `Delayed on flight---will not arrive to depot until 9:05 am` | `DelayedUntil(09:05)`  |
//! | `Wrong address listed`                                    | `WrongAddress { None }`   |
//! | `Wrong address until 10:20`                               | `WrongAddress { 10:20 }`  |
//!
//! A ship-with list ends at the first word that opens another rule, so
//! `with 15, 19 on truck 2` groups 15 and 19 and pins the package to truck 2.
//!
//! Anything else is kept as free text with no constraint.

use chrono::NaiveTime;

use pd_core::{PackageId, TruckId, parse_time_of_day};

/// A handling rule extracted from a package's special note.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    /// Must ride on the same truck as every listed package.
    ShipWith(Vec<PackageId>),
    /// Must ride on this truck.
    TruckOnly(TruckId),
    /// Not at the hub before this time of day.
    DelayedUntil(NaiveTime),
    /// Listed address is wrong; held until corrected.  The correction
    /// unlocks at `until` when the note names a time.
    WrongAddress { until: Option<NaiveTime> },
}

/// Parse a special note.
///
/// Returns `Err(reason)` only when the note clearly states a rule but its
/// argument cannot be read (e.g. "delayed until soon").
pub fn parse_note(note: &str) -> Result<Vec<Constraint>, String> {
    let lower = note.trim().to_ascii_lowercase();
    let mut out = Vec::new();
    if lower.is_empty() {
        return Ok(out);
    }

    if lower.contains("wrong address") {
        let until = match after(&lower, "until") {
            Some(rest) => Some(leading_time(rest).ok_or_else(|| {
                format!("unreadable unlock time in note {note:?}")
            })?),
            None => None,
        };
        out.push(Constraint::WrongAddress { until });
    } else if lower.contains("delayed") || lower.contains("until") {
        let time = after(&lower, "until")
            .and_then(leading_time)
            .ok_or_else(|| format!("unreadable delay time in note {note:?}"))?;
        out.push(Constraint::DelayedUntil(time));
    }

    if let Some(rest) = after(&lower, "with") {
        let ids: Vec<PackageId> = integers(clause(rest)).into_iter().map(PackageId).collect();
        if !ids.is_empty() {
            out.push(Constraint::ShipWith(ids));
        } else if lower.contains("deliver") || lower.contains("ship") {
            return Err(format!("no package ids in note {note:?}"));
        }
    }

    if lower.contains("truck") && (lower.contains("only") || lower.contains("must")) {
        let n = after(&lower, "truck")
            .and_then(|rest| integers(rest).first().copied())
            .ok_or_else(|| format!("no truck number in note {note:?}"))?;
        out.push(Constraint::TruckOnly(TruckId(n)));
    }

    Ok(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Words that open another rule inside the same note.
const RULE_WORDS: [&str; 4] = ["truck", "until", "delayed", "wrong"];

/// Byte offset of the first whole-word occurrence of `word`.
fn find_word(text: &str, word: &str) -> Option<usize> {
    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let at = start + pos;
        let end = at + word.len();
        let before_ok = text[..at].chars().next_back().is_none_or(|c| !c.is_alphanumeric());
        let after_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(at);
        }
        start = end;
    }
    None
}

/// Text following the first whole-word occurrence of `word`.
fn after<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    find_word(text, word).map(|at| &text[at + word.len()..])
}

/// `text` up to the first word that starts another rule.
fn clause(text: &str) -> &str {
    let end = RULE_WORDS
        .iter()
        .filter_map(|w| find_word(text, w))
        .min()
        .unwrap_or(text.len());
    &text[..end]
}

/// A time of day at the start of `text`, written as one or two tokens
/// (`09:05:00`, `9:05 am`).
fn leading_time(text: &str) -> Option<NaiveTime> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .collect();
    let two = tokens.get(..2).map(|t| t.join(" "));
    two.and_then(|s| parse_time_of_day(&s).ok())
        .or_else(|| tokens.first().and_then(|t| parse_time_of_day(t).ok()))
}

/// All unsigned integers in `text`, in order.
fn integers(text: &str) -> Vec<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter_map(|t| t.parse().ok())
        .collect()
}
