//! Uniform match-result record and the scraper-facing helpers around it.
//!
//! Every source, whatever its markup, ends up as one 14-column row:
//!
//! ```text
//! Tournament,Date,Winner,Winning_Score,*1,^1,!1,Loser,Losing_Score,*2,^2,!2,OTS,Gametime
//! ```
//!
//! Catch markers on a score: `*` snitch caught in regulation, `^` in the first
//! overtime, `!` in the second overtime / sudden death.
//!
//! Team names in rows fresh from a scraper are raw; `conform_results` swaps
//! them for canonical names and sets aside rows it cannot resolve.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::consts::NBSP;
use crate::conformer::Conformer;
use crate::error::{ConformError, ResultError};
use crate::progress::Progress;
use crate::resolve::Resolver;

pub const CATCH_MARKERS: [char; 3] = ['*', '^', '!'];

pub const RESULT_HEADERS: [&str; 14] = [
    "Tournament", "Date", "Winner", "Winning_Score", "*1", "^1", "!1",
    "Loser", "Losing_Score", "*2", "^2", "!2", "OTS", "Gametime",
];

/// One team's line of a match before winner/loser ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideScore {
    pub team: String,
    pub score: u32,
    /// Indexed like `CATCH_MARKERS`.
    pub catches: [bool; 3],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "Tournament")]
    pub tournament: String,
    #[serde(rename = "Date", with = "date_text")]
    pub date: NaiveDateTime,

    #[serde(rename = "Winner")]
    pub winner: String,
    #[serde(rename = "Winning_Score")]
    pub winning_score: u32,
    #[serde(rename = "*1", with = "flag_text")]
    pub winner_catch: bool,
    #[serde(rename = "^1", with = "flag_text")]
    pub winner_ot_catch: bool,
    #[serde(rename = "!1", with = "flag_text")]
    pub winner_2ot_catch: bool,

    #[serde(rename = "Loser")]
    pub loser: String,
    #[serde(rename = "Losing_Score")]
    pub losing_score: u32,
    #[serde(rename = "*2", with = "flag_text")]
    pub loser_catch: bool,
    #[serde(rename = "^2", with = "flag_text")]
    pub loser_ot_catch: bool,
    #[serde(rename = "!2", with = "flag_text")]
    pub loser_2ot_catch: bool,

    /// 0 regulation, 1 overtime, 2 second overtime or sudden death.
    #[serde(rename = "OTS")]
    pub overtimes: u8,
    /// Seconds of play, when the source records it.
    #[serde(rename = "Gametime")]
    pub gametime: Option<u32>,
}

impl MatchResult {
    /// Order two sides into winner/loser. Only a strictly higher score wins
    /// for the first side; ties go to the second, as the archives record them.
    pub fn from_sides(
        tournament: impl Into<String>,
        date: NaiveDateTime,
        a: SideScore,
        b: SideScore,
        overtimes: u8,
        gametime: Option<u32>,
    ) -> Self {
        let (w, l) = if a.score > b.score { (a, b) } else { (b, a) };
        Self {
            tournament: tournament.into(),
            date,
            winner: w.team,
            winning_score: w.score,
            winner_catch: w.catches[0],
            winner_ot_catch: w.catches[1],
            winner_2ot_catch: w.catches[2],
            loser: l.team,
            losing_score: l.score,
            loser_catch: l.catches[0],
            loser_ot_catch: l.catches[1],
            loser_2ot_catch: l.catches[2],
            overtimes,
            gametime,
        }
    }
}

/* ---------------- Field parsing ---------------- */

fn strip_markers(s: &str, catches: &mut [bool; 3]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match CATCH_MARKERS.iter().position(|m| *m == c) {
            Some(i) => catches[i] = true,
            None => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Read one side. Markers may trail either the score or the team name
/// (`"120*"`, `"Gryffindor^"`); both are stripped.
pub fn parse_side(team: &str, score_text: &str) -> Result<SideScore, ResultError> {
    let mut catches = [false; 3];
    let team = strip_markers(team, &mut catches);
    let digits = strip_markers(score_text, &mut catches);
    let score = digits
        .parse()
        .map_err(|_| ResultError::Score(score_text.to_string()))?;
    Ok(SideScore { team, score, catches })
}

/// Split a combined cell like `"120*\u{a0}-\u{a0}60"` into its two scores.
pub fn split_score_line(line: &str) -> Result<(String, String), ResultError> {
    let spaced = line.replace(NBSP, " ");
    match spaced.split_once(" - ") {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(ResultError::Score(line.to_string())),
    }
}

/// Overtime count from a period label (`Reg`, `OT`, `2OT`, `SD`).
pub fn overtimes_from_period(period: &str) -> u8 {
    let p = period.to_ascii_uppercase();
    if p.contains("2OT") || p.contains("SD") {
        2
    } else if p.contains("OT") {
        1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameTime {
    pub seconds: u32,
    pub overtimes: u8,
}

/// `H:MM:SS` or `MM:SS`, optionally followed by a period tag: `"0:45:12 (2OT)"`.
/// Out-of-range fields and clocks that overflow are errors.
pub fn parse_game_time(text: &str) -> Result<GameTime, ResultError> {
    let bad = || ResultError::GameTime(text.to_string());
    let text_trim = text.trim();
    let (clock, tag) = match text_trim.find(char::is_whitespace) {
        Some(i) => (&text_trim[..i], &text_trim[i..]),
        None => (text_trim, ""),
    };

    let parts: Vec<u32> = clock
        .split(':')
        .map(|p| p.parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| bad())?;
    let seconds = match parts.as_slice() {
        [m, s] if *s < 60 => m.checked_mul(60).and_then(|t| t.checked_add(*s)),
        [h, m, s] if *m < 60 && *s < 60 => h
            .checked_mul(3600)
            .and_then(|t| t.checked_add(m * 60 + s)),
        _ => None,
    }
    .ok_or_else(bad)?;
    Ok(GameTime { seconds, overtimes: overtimes_from_period(tag) })
}

/* ---------------- Conforming ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Conformed(MatchResult),
    /// Raw names that could not be resolved.
    Unresolved(Vec<String>),
}

/// Replace both raw team names with canonical ones.
pub fn conform_match(
    conformer: &mut Conformer,
    row: &MatchResult,
    resolver: &mut dyn Resolver,
) -> Result<MatchOutcome, ConformError> {
    let winner = conformer.conform_or_resolve(&row.winner, resolver)?;
    let loser = conformer.conform_or_resolve(&row.loser, resolver)?;

    match (winner, loser) {
        (Some(winner), Some(loser)) => Ok(MatchOutcome::Conformed(MatchResult {
            winner,
            loser,
            ..row.clone()
        })),
        (w, l) => {
            let mut missing = Vec::new();
            if w.is_none() { missing.push(row.winner.clone()); }
            if l.is_none() { missing.push(row.loser.clone()); }
            Ok(MatchOutcome::Unresolved(missing))
        }
    }
}

#[derive(Debug, Default)]
pub struct ConformSummary {
    pub rows: Vec<MatchResult>,
    /// Raw name -> number of rows it kept out.
    pub unresolved: BTreeMap<String, usize>,
    pub skipped: usize,
}

pub fn conform_results(
    conformer: &mut Conformer,
    rows: &[MatchResult],
    resolver: &mut dyn Resolver,
    progress: &mut dyn Progress,
) -> Result<ConformSummary, ConformError> {
    let mut summary = ConformSummary::default();
    progress.begin(rows.len());

    for (i, row) in rows.iter().enumerate() {
        match conform_match(conformer, row, resolver) {
            Ok(MatchOutcome::Conformed(r)) => summary.rows.push(r),
            Ok(MatchOutcome::Unresolved(names)) => {
                warn!("Results: row {} skipped, unresolved {:?}", i + 1, names);
                for n in names {
                    *summary.unresolved.entry(n).or_insert(0) += 1;
                }
                summary.skipped += 1;
            }
            Err(e) => {
                progress.finish();
                return Err(e);
            }
        }
        progress.item_done(i);
    }

    progress.log(&format!(
        "Conformed {} of {} rows ({} skipped)",
        summary.rows.len(), rows.len(), summary.skipped
    ));
    progress.finish();
    info!("Results: {} conformed, {} skipped", summary.rows.len(), summary.skipped);
    Ok(summary)
}

/* ---------------- Files ---------------- */

/// Read a results table. Extra columns (e.g. a pandas index) are ignored.
pub fn read_results(path: &Path) -> Result<Vec<MatchResult>, ResultError> {
    let csv_err = |source| ResultError::Csv { path: path.to_path_buf(), source };
    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    rdr.deserialize()
        .collect::<Result<Vec<MatchResult>, _>>()
        .map_err(csv_err)
}

pub fn write_results(path: &Path, rows: &[MatchResult]) -> Result<(), ResultError> {
    let csv_err = |source| ResultError::Csv { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|source| ResultError::Io { path: path.to_path_buf(), source })?;
        }
    }

    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(csv_err)?;
    if rows.is_empty() {
        w.write_record(RESULT_HEADERS).map_err(csv_err)?;
    }
    for r in rows {
        w.serialize(r).map_err(csv_err)?;
    }
    w.flush().map_err(|source| ResultError::Io { path: path.to_path_buf(), source })
}

/* ---------------- serde helpers ---------------- */

mod flag_text {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *v { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let text = String::deserialize(d)?;
        crate::store::parse_flag(&text)
            .ok_or_else(|| D::Error::custom(format!("'{text}' is not a boolean")))
    }
}

mod date_text {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(v: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(d)?;
        let t = text.trim();
        NaiveDateTime::parse_from_str(t, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(t, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| D::Error::custom(format!("'{text}' is not a date")))
    }
}
