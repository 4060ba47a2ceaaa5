// src/cli.rs
use std::io::{self, Write};
use std::path::{ Path, PathBuf };

use clap::{ Parser, Subcommand };
use color_eyre::eyre::{ Result, WrapErr };

use crate::config::consts::{ CONFORMERS_HEADER, OPTIONS_FILE, TEAMS_HEADER };
use crate::config::options::AppOptions;
use crate::conformer::{ Conformer, TeamId };
use crate::progress::Progress;
use crate::resolve::{ ConsoleResolver, RejectResolver, Resolver };
use crate::{ log, results, store };

#[derive(Parser)]
#[command(name = "qd_conform", version)]
#[command(about = "Conform raw quidditch team names to canonical teams", long_about = None)]
struct Cli {
    /// Options file (TOML); missing means defaults
    #[arg(long, global = true, default_value = OPTIONS_FILE)]
    config: PathBuf,

    /// Directory holding teams.csv and raw_conf.csv
    #[arg(long, global = true, env = "QD_CONFORM_DIR")]
    dir: Option<PathBuf>,

    /// Skip the store lock file
    #[arg(long, global = true)]
    no_lock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create empty stores (header only) where missing
    Init,
    /// Print the canonical name for each raw name ('?' when unresolved)
    Conform {
        names: Vec<String>,
        /// Ask on the terminal for names that do not resolve
        #[arg(short, long)]
        prompt: bool,
    },
    /// Create a canonical team and alias a raw name to it
    Add {
        alias: String,
        name: String,
        #[arg(long)]
        college: bool,
    },
    /// Alias a raw name to an existing team
    Link { alias: String, id: TeamId },
    /// Print the team id for a raw alias or canonical name
    Id { name: String },
    /// List canonical teams
    Teams,
    /// Load the stores and report integrity problems
    Check,
    /// Conform the team names of a results table
    Results {
        input: PathBuf,
        /// Output file (default: <input>_conformed.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(short, long)]
        prompt: bool,
    },
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut opts = AppOptions::load(&cli.config)?;
    if let Some(dir) = cli.dir { opts.store.dir = dir; }
    if cli.no_lock { opts.store.lock = false; }
    log::init(&opts.log).wrap_err("cannot open log file")?;

    if let Command::Init = cli.command {
        for (path, header) in [
            (opts.store.teams_path(), &TEAMS_HEADER[..]),
            (opts.store.conformers_path(), &CONFORMERS_HEADER[..]),
        ] {
            let created = store::init_table(&path, header)?;
            println!("{} {}", if created { "created" } else { "exists " }, path.display());
        }
        return Ok(());
    }

    let mut conformer = Conformer::open(&opts.store).wrap_err("cannot load conformance stores")?;
    execute(&mut conformer, cli.command)
}

fn execute(conformer: &mut Conformer, command: Command) -> Result<()> {
    match command {
        Command::Init => {}
        Command::Conform { names, prompt } => {
            let mut resolver = resolver_for(prompt);
            for name in names {
                let canonical = conformer.conform_or_resolve(&name, resolver.as_mut())?;
                println!("{},{}", name, canonical.as_deref().unwrap_or("?"));
            }
        }
        Command::Add { alias, name, college } => {
            let id = conformer.add_team(&alias, &name, college)?;
            println!("{id}");
        }
        Command::Link { alias, id } => {
            conformer.add_alias(&alias, id)?;
            println!("{id}");
        }
        Command::Id { name } => match conformer.get_id(&name) {
            Some(id) => println!("{id}"),
            None => println!("?"),
        },
        Command::Teams => {
            for t in conformer.teams() {
                println!("{},{},{}", t.id, t.name, if t.college { "college" } else { "club" });
            }
        }
        Command::Check => {
            println!("ok: {} teams, {} aliases", conformer.team_count(), conformer.alias_count());
            for (key, ids) in conformer.colliding_names() {
                println!("warning: teams {:?} share the name key '{}'", ids, key);
            }
        }
        Command::Results { input, out, prompt } => {
            let rows = results::read_results(&input)?;
            let mut resolver = resolver_for(prompt);
            let mut progress = CliProgress::default();
            let summary = results::conform_results(conformer, &rows, resolver.as_mut(), &mut progress)?;

            let out = out.unwrap_or_else(|| default_results_out(&input));
            results::write_results(&out, &summary.rows)?;
            println!("Wrote {} rows to {}", summary.rows.len(), out.display());
            for (name, count) in &summary.unresolved {
                println!("unresolved: {name} ({count} rows)");
            }
        }
    }
    Ok(())
}

fn resolver_for(prompt: bool) -> Box<dyn Resolver> {
    if prompt { Box::new(ConsoleResolver::stdio()) } else { Box::new(RejectResolver) }
}

fn default_results_out(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| s!("results"));
    input.with_file_name(format!("{stem}_conformed.csv"))
}

/// Row counter on stderr, so stdout stays clean for piping.
#[derive(Default)]
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { eprintln!("{msg}"); }
    fn item_done(&mut self, _row: usize) {
        self.done += 1;
        if self.done % 100 == 0 || self.done == self.total {
            eprint!("\r{}/{} rows", self.done, self.total);
            let _ = io::stderr().flush();
        }
    }
    fn finish(&mut self) {
        if self.total > 0 { eprintln!(); }
    }
}
