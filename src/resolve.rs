// src/resolve.rs
//
// Who answers when a name is not in the index. The Conformer only sees the
// trait; frontends and tests choose the provider.

use std::collections::HashMap;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::conformer::TeamId;
use crate::error::ResolveError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Create a canonical team and alias the raw name to it.
    NewTeam { name: String, college: bool },
    /// Alias the raw name to a team that already exists.
    Existing(TeamId),
    /// Leave the name unresolved.
    Skip,
}

impl Resolution {
    pub fn new_team(name: impl Into<String>, college: bool) -> Self {
        Resolution::NewTeam { name: name.into(), college }
    }
}

pub trait Resolver {
    /// `raw` is the spelling as scraped; `normalized` is its lookup key.
    /// May block until a human answers.
    fn resolve(&mut self, raw: &str, normalized: &str) -> Result<Resolution, ResolveError>;
}

/* ---------------- Console ---------------- */

/// Asks an operator on a terminal (or any reader/writer pair).
pub struct ConsoleResolver<R, W> {
    input: R,
    output: W,
}

impl ConsoleResolver<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ResolveError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = s!();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ResolveError::Closed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Resolver for ConsoleResolver<R, W> {
    fn resolve(&mut self, _raw: &str, normalized: &str) -> Result<Resolution, ResolveError> {
        let name = self.ask(&format!("Conform {normalized} to ? "))?;
        if name.is_empty() {
            return Ok(Resolution::Skip);
        }
        let college = self.ask("College (y/n) ? ")?;
        let college = matches!(college.chars().next(), Some('y' | 'Y'));
        Ok(Resolution::NewTeam { name, college })
    }
}

/* ---------------- Scripted ---------------- */

/// Fixed answers keyed by normalized name. Unknown names are skipped.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    answers: HashMap<String, Resolution>,
    asked: Vec<String>,
}

impl ScriptedResolver {
    pub fn new() -> Self { Self::default() }

    /// `normalized` must already be a lookup key (see `core::normalize`).
    pub fn answer(mut self, normalized: impl Into<String>, resolution: Resolution) -> Self {
        self.answers.insert(normalized.into(), resolution);
        self
    }

    /// Normalized names this resolver was consulted about, in order.
    pub fn asked(&self) -> &[String] { &self.asked }
}

impl Resolver for ScriptedResolver {
    fn resolve(&mut self, _raw: &str, normalized: &str) -> Result<Resolution, ResolveError> {
        self.asked.push(normalized.to_string());
        Ok(self.answers.get(normalized).cloned().unwrap_or(Resolution::Skip))
    }
}

/* ---------------- Reject ---------------- */

/// Never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectResolver;

impl Resolver for RejectResolver {
    fn resolve(&mut self, _raw: &str, _normalized: &str) -> Result<Resolution, ResolveError> {
        Ok(Resolution::Skip)
    }
}
