//! Team-name conformance: raw spellings from any source resolve to one
//! canonical display name per team.
//!
//! State:
//! - Team Registry: `id -> Team` (never deleted, never edited)
//! - Resolution Table: `raw alias -> id` (append-only)
//! - Normalized-Name Index: `normalize(alias | canonical) -> canonical`,
//!   derived at load and kept in step with every addition.
//!
//! Lookups never fail: an unknown name is `None`. Only the resolution path
//! (prompting, durable appends) returns errors.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::options::StoreOptions;
use crate::core::normalize::{force_encodable, is_encodable, normalize, normalize_key, sanitize_canonical};
use crate::error::{ConformError, LoadError, StoreError};
use crate::resolve::{Resolution, Resolver};
use crate::store::{self, StoreLock};

pub type TeamId = u32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub college: bool,
}

pub struct Conformer {
    teams_path: PathBuf,
    conformers_path: PathBuf,

    teams: BTreeMap<TeamId, Team>,
    aliases: HashMap<String, TeamId>,

    // derived
    alias_ids: HashMap<String, TeamId>,
    index: HashMap<String, String>,

    _lock: Option<StoreLock>,
}

impl Conformer {
    /// Load both stores and build the index. Any unreadable or inconsistent
    /// store is a `LoadError`.
    pub fn open(opts: &StoreOptions) -> Result<Self, LoadError> {
        let lock = match opts.lock_path() {
            Some(p) => Some(StoreLock::acquire(&p)?),
            None => None,
        };
        let teams_path = opts.teams_path();
        let conformers_path = opts.conformers_path();

        let teams = store::load_teams(&teams_path)?;
        let aliases = store::load_aliases(&conformers_path)?;

        let mut conformer = Self::from_records(teams, aliases)?;
        conformer.teams_path = teams_path;
        conformer.conformers_path = conformers_path;
        conformer._lock = lock;
        Ok(conformer)
    }

    /// Build from already-loaded rows. Later aliases override earlier ones.
    fn from_records(teams: Vec<Team>, aliases: Vec<(String, TeamId)>) -> Result<Self, LoadError> {
        let teams: BTreeMap<TeamId, Team> = teams.into_iter().map(|t| (t.id, t)).collect();

        let mut me = Self {
            teams_path: PathBuf::new(),
            conformers_path: PathBuf::new(),
            teams,
            aliases: HashMap::new(),
            alias_ids: HashMap::new(),
            index: HashMap::new(),
            _lock: None,
        };

        for (raw, id) in aliases {
            let Some(team) = me.teams.get(&id) else {
                return Err(LoadError::DanglingAlias { alias: raw, id });
            };
            let canonical = team.name.clone();
            me.index_alias(&raw, id, canonical);
            me.aliases.insert(raw, id);
        }

        // every canonical name resolves to itself
        let names: Vec<String> = me.teams.values().map(|t| t.name.clone()).collect();
        for name in names {
            me.index_canonical(&name);
        }

        debug!(
            "Conformer: {} teams, {} aliases, {} index keys",
            me.teams.len(), me.aliases.len(), me.index.len()
        );
        Ok(me)
    }

    fn index_alias(&mut self, raw: &str, id: TeamId, canonical: String) {
        if let Some(key) = normalize_key(raw) {
            self.alias_ids.insert(key.clone(), id);
            self.index.insert(key, canonical);
        }
    }

    fn index_canonical(&mut self, canonical: &str) {
        if let Some(key) = normalize_key(canonical) {
            self.index.insert(key, canonical.to_string());
        }
    }

    /* ---------- lookups ---------- */

    /// Resolve a raw spelling without prompting. `None` means unresolved,
    /// which is an expected outcome, not an error.
    pub fn conform(&self, name: &str) -> Option<&str> {
        let key = normalize_key(name)?;
        self.lookup(&key)
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        let hit = self.index.get(key).map(String::as_str);
        if hit.is_none() {
            debug!("Conform: no match for '{}'", key);
        }
        hit
    }

    /// Resolve a raw spelling, asking `resolver` when the index misses.
    /// Blocks for as long as the resolver does. Names and answers outside
    /// Latin-1 are stored with the placeholder, so they never fail to encode.
    pub fn conform_or_resolve(
        &mut self,
        name: &str,
        resolver: &mut dyn Resolver,
    ) -> Result<Option<String>, ConformError> {
        let Some(key) = normalize_key(name) else { return Ok(None) };
        if let Some(hit) = self.lookup(&key) {
            return Ok(Some(hit.to_string()));
        }

        // the raw spelling is kept when it can be stored; otherwise its key,
        // which is always Latin-1 and normalizes to itself
        let alias = if is_encodable(name) { name } else { key.as_str() };
        match resolver.resolve(name, &key)? {
            Resolution::NewTeam { name: canonical, college } => {
                self.add_team(alias, &force_encodable(&canonical), college)?;
            }
            Resolution::Existing(id) => self.add_alias(alias, id)?,
            Resolution::Skip => {
                warn!("Conform: '{}' left unresolved", key);
                return Ok(None);
            }
        }

        // the addition indexed `key`, so this hits
        Ok(self.lookup(&key).map(str::to_string))
    }

    /// Team ID for a raw alias (by normalized key) or, failing that, an exact
    /// canonical display name.
    pub fn get_id(&self, team_name: &str) -> Option<TeamId> {
        if let Some(id) = normalize_key(team_name).and_then(|k| self.alias_ids.get(&k)) {
            return Some(*id);
        }
        self.teams.values().find(|t| t.name == team_name).map(|t| t.id)
    }

    /* ---------- additions ---------- */

    /// Create a canonical team and map `raw_alias` onto it.
    ///
    /// Memory is updated before the appends, so this session stays consistent
    /// even if persisting fails. The registry row goes first: a crash between
    /// the two appends leaves an orphan team, never a dangling alias.
    pub fn add_team(&mut self, raw_alias: &str, canonical: &str, college: bool) -> Result<TeamId, StoreError> {
        let canonical = sanitize_canonical(canonical);
        let id = self.next_id();
        let team = Team { id, name: canonical.clone(), college };

        self.teams.insert(id, team.clone());
        self.insert_alias(raw_alias, id);
        self.index_alias(raw_alias, id, canonical.clone());
        self.index_canonical(&canonical);
        info!("Conformer: added team {} '{}' (college={}) for '{}'", id, canonical, college, raw_alias);

        // encode both before touching either file
        let team_row = store::encode_team(&team)?;
        let alias_row = store::encode_alias(raw_alias, id)?;
        store::append_line(&self.teams_path, &team_row)?;
        store::append_line(&self.conformers_path, &alias_row)?;
        Ok(id)
    }

    /// Map `raw_alias` onto an existing team without creating a new identity.
    pub fn add_alias(&mut self, raw_alias: &str, id: TeamId) -> Result<(), ConformError> {
        let canonical = match self.teams.get(&id) {
            Some(t) => t.name.clone(),
            None => return Err(ConformError::UnknownTeam(id)),
        };

        self.insert_alias(raw_alias, id);
        self.index_alias(raw_alias, id, canonical.clone());
        info!("Conformer: linked '{}' to team {} '{}'", raw_alias, id, canonical);

        let row = store::encode_alias(raw_alias, id)?;
        store::append_line(&self.conformers_path, &row)?;
        Ok(())
    }

    fn insert_alias(&mut self, raw_alias: &str, id: TeamId) {
        if let Some(prev) = self.aliases.insert(raw_alias.to_string(), id) {
            if prev != id {
                warn!("Conformer: alias '{}' remapped {} -> {}", raw_alias, prev, id);
            }
        }
    }

    /// max(existing id) + 1, or 1 for an empty registry.
    pub fn next_id(&self) -> TeamId {
        self.teams.keys().next_back().map_or(1, |max| max + 1)
    }

    /* ---------- accessors ---------- */

    pub fn team(&self, id: TeamId) -> Option<&Team> { self.teams.get(&id) }

    /// Teams in id order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> + '_ { self.teams.values() }

    pub fn team_count(&self) -> usize { self.teams.len() }

    pub fn alias_count(&self) -> usize { self.aliases.len() }

    /// Raw aliases recorded for one team, sorted.
    pub fn aliases_of(&self, id: TeamId) -> Vec<&str> {
        let mut out: Vec<&str> = self.aliases.iter()
            .filter(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    /// Canonical names sharing one lookup key across different teams.
    /// Only one of them can win the index entry.
    pub fn colliding_names(&self) -> Vec<(String, Vec<TeamId>)> {
        let mut by_key: BTreeMap<String, Vec<TeamId>> = BTreeMap::new();
        for t in self.teams.values() {
            if let Some(key) = normalize_key(&t.name) {
                by_key.entry(key).or_default().push(t.id);
            }
        }
        by_key.into_iter().filter(|(_, ids)| ids.len() > 1).collect()
    }

    /// The key `conform` would look up for `name`.
    pub fn key_for(&self, name: &str) -> String { normalize(name) }
}
