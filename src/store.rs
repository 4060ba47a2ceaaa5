// src/store.rs
//
// Durable tables behind the Conformer:
//   Team Registry     <id>,<Name>,<College>   e.g. 12,Gryffindor,True
//   Resolution Table  <raw alias>,<Conformed> e.g. GRYF,12
//
// Both are ISO-8859-1 CSV with a header row. They are only ever appended to.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    collections::HashSet,
};

use tracing::{debug, info};

use crate::config::consts::{COLLEGE_COLUMN, CONFORMED_COLUMN, NAME_COLUMN};
use crate::conformer::{Team, TeamId};
use crate::core::latin1;
use crate::error::{LoadError, StoreError};

/* ---------------- Loading ---------------- */

fn read_latin1(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    Ok(latin1::decode(&bytes).into_owned())
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes())
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn bad_row(path: &Path, line: u64, reason: impl Into<String>) -> LoadError {
    LoadError::BadRow { path: path.to_path_buf(), line, reason: reason.into() }
}

fn parse_id(cell: Option<&str>, path: &Path, line: u64) -> Result<TeamId, LoadError> {
    let cell = cell.map(str::trim).unwrap_or("");
    cell.parse()
        .map_err(|_| bad_row(path, line, format!("team id '{cell}' is not an integer")))
}

/// Accepts what pandas and people write for booleans.
pub fn parse_flag(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Load the Team Registry. IDs sit in the first column; the display name in
/// the `Name` column; the college flag in `College` (or the third column).
pub fn load_teams(path: &Path) -> Result<Vec<Team>, LoadError> {
    let text = read_latin1(path)?;
    let mut rdr = reader(&text);
    let csv_err = |source| LoadError::Csv { path: path.to_path_buf(), source };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let name_col = column(&headers, NAME_COLUMN)
        .ok_or(LoadError::MissingColumn { path: path.to_path_buf(), column: NAME_COLUMN })?;
    let college_col = column(&headers, COLLEGE_COLUMN).or((name_col != 2).then_some(2));

    let mut teams = Vec::new();
    let mut seen = HashSet::new();
    for rec in rdr.records() {
        let rec = rec.map_err(csv_err)?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);

        let id = parse_id(rec.get(0), path, line)?;
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId { path: path.to_path_buf(), id });
        }
        let name = rec.get(name_col)
            .ok_or_else(|| bad_row(path, line, "missing team name"))?
            .to_string();
        let college = match college_col.and_then(|c| rec.get(c)) {
            None => false,
            Some(cell) => parse_flag(cell)
                .ok_or_else(|| bad_row(path, line, format!("college flag '{cell}' is not a boolean")))?,
        };
        teams.push(Team { id, name, college });
    }

    info!("Store: loaded {} teams from {}", teams.len(), path.display());
    Ok(teams)
}

/// Load the Resolution Table as (raw alias, team id) pairs, file order.
pub fn load_aliases(path: &Path) -> Result<Vec<(String, TeamId)>, LoadError> {
    let text = read_latin1(path)?;
    let mut rdr = reader(&text);
    let csv_err = |source| LoadError::Csv { path: path.to_path_buf(), source };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let id_col = column(&headers, CONFORMED_COLUMN)
        .ok_or(LoadError::MissingColumn { path: path.to_path_buf(), column: CONFORMED_COLUMN })?;

    let mut aliases = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(csv_err)?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);

        let raw = rec.get(0).unwrap_or("");
        if raw.is_empty() {
            debug!("Store: {} line {}: empty alias, skipping", path.display(), line);
            continue;
        }
        let id = parse_id(rec.get(id_col), path, line)?;
        aliases.push((raw.to_string(), id));
    }

    info!("Store: loaded {} aliases from {}", aliases.len(), path.display());
    Ok(aliases)
}

/* ---------------- Appending ---------------- */

/// One `\n`-terminated CSV row, already in ISO-8859-1.
pub fn encode_row(fields: &[&str]) -> Result<Vec<u8>, StoreError> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    w.write_record(fields)?;
    let buf = w.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;

    let line = String::from_utf8_lossy(&buf);
    match latin1::encode(&line) {
        Some(bytes) => Ok(bytes.into_owned()),
        None => Err(StoreError::Unencodable(line.trim_end().to_string())),
    }
}

pub fn encode_team(team: &Team) -> Result<Vec<u8>, StoreError> {
    let id = team.id.to_string();
    let college = if team.college { "True" } else { "False" };
    encode_row(&[&id, &team.name, college])
}

pub fn encode_alias(raw: &str, id: TeamId) -> Result<Vec<u8>, StoreError> {
    let id = id.to_string();
    encode_row(&[raw, &id])
}

/// Append one encoded row. A missing trailing newline is repaired first so the
/// row never fuses with the previous one.
pub fn append_line(path: &Path, line: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    let mut file = OpenOptions::new().read(true).append(true).open(path).map_err(io_err)?;
    let mut buf = Vec::with_capacity(line.len() + 1);
    if needs_newline(&mut file).map_err(io_err)? {
        buf.push(b'\n');
    }
    buf.extend_from_slice(line);

    // single write: a crash leaves either nothing or the whole row
    file.write_all(&buf).map_err(io_err)?;
    file.sync_data().map_err(io_err)
}

fn needs_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Create an empty store with just its header. Returns false if it existed.
pub fn init_table(path: &Path, header: &[&str]) -> Result<bool, StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let header = encode_row(header)?;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut f) => {
            f.write_all(&header).map_err(io_err)?;
            info!("Store: created {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(source) => Err(io_err(source)),
    }
}

/* ---------------- Locking ---------------- */

/// Exclusive writer guard: two processes computing `max(id) + 1` over the
/// same stores would hand out the same ID.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    pub fn acquire(path: &Path) -> Result<Self, LoadError> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut f) => {
                // pid is informational; failure to write it does not matter
                let _ = writeln!(f, "{}", std::process::id());
                debug!("Store: lock acquired {}", path.display());
                Ok(Self { path: path.to_path_buf() })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(LoadError::Locked { path: path.to_path_buf() })
            }
            Err(source) => Err(LoadError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn path(&self) -> &Path { &self.path }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
