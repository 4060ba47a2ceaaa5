// tests/conformer.rs
//
// Conformer against fixture stores in a temp dir.
//
use std::fs;

use qd_conform::config::options::StoreOptions;
use qd_conform::error::{ ConformError, LoadError, StoreError };
use qd_conform::{ Conformer, RejectResolver, Resolution, ScriptedResolver };
use tempfile::TempDir;

const NO_ALIASES: &str = "Raw,Conformed\n";

fn stores(teams: &str, conformers: &str) -> (TempDir, StoreOptions) {
    stores_bytes(teams.as_bytes(), conformers.as_bytes())
}

fn stores_bytes(teams: &[u8], conformers: &[u8]) -> (TempDir, StoreOptions) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("teams.csv"), teams).unwrap();
    fs::write(dir.path().join("raw_conf.csv"), conformers).unwrap();
    let opts = StoreOptions::in_dir(dir.path());
    (dir, opts)
}

fn read(dir: &TempDir, file: &str) -> String {
    fs::read_to_string(dir.path().join(file)).unwrap()
}

fn gryffindor() -> (TempDir, StoreOptions) {
    stores("ID,Name,College\n1,Gryffindor,True\n", NO_ALIASES)
}

#[test]
fn canonical_name_resolves_to_itself() {
    let (_dir, opts) = stores("ID,Name,College\n1,Team A,False\n", NO_ALIASES);
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("team a"), Some("Team A"));
    assert_eq!(c.conform("  TEAM A\u{a0}"), Some("Team A"));
}

#[test]
fn unknown_alias_is_unresolved_not_an_error() {
    let (_dir, opts) = gryffindor();
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("Gryf"), None);
    assert_eq!(c.conform(""), None);
    assert_eq!(c.conform("',\""), None);
}

#[test]
fn aliases_from_store_resolve() {
    let (_dir, opts) = stores(
        "ID,Name,College\n1,Gryffindor,True\n2,Ravenclaw,True\n",
        "Raw,Conformed\nGRYF,1\nRAVENCLAW QC,2\n",
    );
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("gryf"), Some("Gryffindor"));
    assert_eq!(c.conform("Ravenclaw QC"), Some("Ravenclaw"));
    assert_eq!(c.team_count(), 2);
    assert_eq!(c.alias_count(), 2);
}

#[test]
fn add_team_resolves_and_appends_one_row_each() {
    let (dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();

    let id = c.add_team("Gryf", "Gryffindor", true).unwrap();
    assert_eq!(id, 2);
    assert_eq!(c.conform("gryf"), Some("Gryffindor"));

    let teams = read(&dir, "teams.csv");
    assert_eq!(teams.lines().count(), 3);
    assert!(teams.ends_with("2,Gryffindor,True\n"));

    let aliases = read(&dir, "raw_conf.csv");
    assert_eq!(aliases, "Raw,Conformed\nGryf,2\n");
}

#[test]
fn add_team_sanitizes_canonical_but_keeps_case() {
    let (_dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();

    let id = c.add_team("qc boston", "Q.C. Boston: The \"Massacre\", Inc'", false).unwrap();
    assert_eq!(c.team(id).unwrap().name, "Q.C. Boston: The Massacre Inc");
    assert_eq!(c.conform("QC BOSTON"), Some("Q.C. Boston: The Massacre Inc"));
    assert_eq!(c.conform("q.c. boston: the massacre inc"), Some("Q.C. Boston: The Massacre Inc"));
}

#[test]
fn ids_strictly_increase_within_a_session() {
    let (_dir, opts) = stores("ID,Name,College\n4,A,False\n9,B,False\n", NO_ALIASES);
    let mut c = Conformer::open(&opts).unwrap();

    let mut last = 9;
    for (alias, name) in [("a1", "C"), ("a2", "D"), ("a3", "E")] {
        let id = c.add_team(alias, name, false).unwrap();
        assert!(id > last, "{id} should exceed {last}");
        last = id;
    }
    assert_eq!(c.next_id(), last + 1);
}

#[test]
fn empty_registry_starts_at_one() {
    let (_dir, opts) = stores("ID,Name,College\n", NO_ALIASES);
    let mut c = Conformer::open(&opts).unwrap();
    assert_eq!(c.add_team("x", "X", false).unwrap(), 1);
}

#[test]
fn get_id_by_alias_by_canonical_and_neither() {
    let (_dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();
    let id = c.add_team("Hufflepuff QC", "Hufflepuff", false).unwrap();

    assert_eq!(c.get_id("hufflepuff qc"), Some(id));
    assert_eq!(c.get_id("Gryffindor"), Some(1));
    // canonical fallback is exact, not normalized
    assert_eq!(c.get_id("GRYFFINDOR"), None);
    assert_eq!(c.get_id("Slytherin"), None);
}

#[test]
fn additions_survive_reopen() {
    let (_dir, opts) = gryffindor();
    {
        let mut c = Conformer::open(&opts).unwrap();
        c.add_team("Gryf, The", "Gryffindor Reserves", false).unwrap();
        c.add_alias("G.R.Y.F.", 1).unwrap();
    }

    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("gryf the"), Some("Gryffindor Reserves"));
    assert_eq!(c.conform("g.r.y.f."), Some("Gryffindor"));
    assert_eq!(c.get_id("Gryf, The"), Some(2));
    assert!(!c.team(2).unwrap().college);
}

#[test]
fn alias_with_comma_is_quoted_in_store() {
    let (dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();
    c.add_alias("Gryffindor, Hogwarts", 1).unwrap();
    assert!(read(&dir, "raw_conf.csv").ends_with("\"Gryffindor, Hogwarts\",1\n"));
}

#[test]
fn scripted_resolution_adds_team_once() {
    let (_dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();
    let mut resolver = ScriptedResolver::new()
        .answer("HOGWARTS SLYTHERIN", Resolution::new_team("Slytherin", false));

    let got = c.conform_or_resolve("Hogwarts Slytherin", &mut resolver).unwrap();
    assert_eq!(got.as_deref(), Some("Slytherin"));

    // second time hits the index; the resolver is not consulted again
    let again = c.conform_or_resolve("hogwarts slytherin", &mut resolver).unwrap();
    assert_eq!(again.as_deref(), Some("Slytherin"));
    assert_eq!(resolver.asked(), ["HOGWARTS SLYTHERIN"]);
    assert_eq!(c.get_id("Hogwarts Slytherin"), Some(2));
}

#[test]
fn resolution_can_link_to_existing_team() {
    let (dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();
    let mut resolver = ScriptedResolver::new().answer("LIONS", Resolution::Existing(1));

    let got = c.conform_or_resolve("Lions", &mut resolver).unwrap();
    assert_eq!(got.as_deref(), Some("Gryffindor"));
    assert_eq!(c.team_count(), 1);
    assert_eq!(read(&dir, "teams.csv").lines().count(), 2);
    assert_eq!(c.aliases_of(1), ["Lions"]);
}

#[test]
fn skipped_resolution_writes_nothing() {
    let (dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();

    let got = c.conform_or_resolve("Slytherin", &mut RejectResolver).unwrap();
    assert_eq!(got, None);
    assert_eq!(read(&dir, "raw_conf.csv"), NO_ALIASES);
    assert_eq!(c.team_count(), 1);
}

#[test]
fn link_to_unknown_team_fails() {
    let (_dir, opts) = gryffindor();
    let mut c = Conformer::open(&opts).unwrap();
    let err = c.add_alias("ghost", 42).unwrap_err();
    assert!(matches!(err, ConformError::UnknownTeam(42)));
    assert_eq!(c.conform("ghost"), None);
}

#[test]
fn latin1_store_round_trips() {
    let (dir, opts) = stores_bytes(b"ID,Name,College\n1,Montr\xe9al Q,False\n", NO_ALIASES.as_bytes());
    let mut c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("montréal q"), Some("Montréal Q"));

    c.add_team("Québec", "Québec City", false).unwrap();
    let bytes = fs::read(dir.path().join("raw_conf.csv")).unwrap();
    assert!(bytes.ends_with(b"Qu\xe9bec,2\n"));
}

#[test]
fn unencodable_row_is_refused_but_session_keeps_it() {
    let (dir, opts) = gryffindor();
    let before_teams = read(&dir, "teams.csv");
    let mut c = Conformer::open(&opts).unwrap();

    let err = c.add_team("Snowmen", "Snow \u{2603} QC", false).unwrap_err();
    assert!(matches!(err, StoreError::Unencodable(_)));

    // in-memory state already reflects the addition
    assert_eq!(c.conform("snowmen"), Some("Snow \u{2603} QC"));
    // neither file was touched
    assert_eq!(read(&dir, "teams.csv"), before_teams);
    assert_eq!(read(&dir, "raw_conf.csv"), NO_ALIASES);
}

#[test]
fn unencodable_name_resolved_by_prompt_is_stored_by_key() {
    let (dir, opts) = gryffindor();
    {
        let mut c = Conformer::open(&opts).unwrap();
        let mut resolver = ScriptedResolver::new()
            .answer("SNOW @ QC", Resolution::new_team("Snow QC", false));

        let got = c.conform_or_resolve("Snow \u{2603} QC", &mut resolver).unwrap();
        assert_eq!(got.as_deref(), Some("Snow QC"));
    }
    assert!(read(&dir, "teams.csv").ends_with("2,Snow QC,False\n"));
    assert!(read(&dir, "raw_conf.csv").ends_with("SNOW @ QC,2\n"));

    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("Snow \u{2603} QC"), Some("Snow QC"));
    assert_eq!(c.get_id("snow \u{2603} qc"), Some(2));
}

#[test]
fn unencodable_answer_from_prompt_gets_placeholder() {
    let (_dir, opts) = gryffindor();
    {
        let mut c = Conformer::open(&opts).unwrap();
        let mut resolver = ScriptedResolver::new()
            .answer("SNOWMEN", Resolution::new_team("Snow \u{2603} Men", false));

        let got = c.conform_or_resolve("Snowmen", &mut resolver).unwrap();
        assert_eq!(got.as_deref(), Some("Snow @ Men"));
    }
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("snowmen"), Some("Snow @ Men"));
}

#[test]
fn unencodable_name_linked_by_prompt_survives_reopen() {
    let (_dir, opts) = gryffindor();
    {
        let mut c = Conformer::open(&opts).unwrap();
        let mut resolver = ScriptedResolver::new().answer("LI@NS", Resolution::Existing(1));
        let got = c.conform_or_resolve("Li\u{2126}ns", &mut resolver).unwrap();
        assert_eq!(got.as_deref(), Some("Gryffindor"));
    }
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("li\u{2126}ns"), Some("Gryffindor"));
}

#[test]
fn missing_trailing_newline_is_repaired_on_append() {
    let (dir, opts) = stores("ID,Name,College\n1,Gryffindor,True", "Raw,Conformed");
    {
        let mut c = Conformer::open(&opts).unwrap();
        c.add_team("Puff", "Hufflepuff", false).unwrap();
    }
    assert_eq!(read(&dir, "teams.csv"), "ID,Name,College\n1,Gryffindor,True\n2,Hufflepuff,False\n");
    assert_eq!(read(&dir, "raw_conf.csv"), "Raw,Conformed\nPuff,2\n");

    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("puff"), Some("Hufflepuff"));
}

#[test]
fn pandas_style_index_column_loads() {
    let (_dir, opts) = stores(",Name\n0,Team Alpha\n1,Team Beta\n", ",Conformed\nALPHA,0\n");
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("alpha"), Some("Team Alpha"));
    assert_eq!(c.conform("team beta"), Some("Team Beta"));
    assert!(!c.team(0).unwrap().college);
}

#[test]
fn later_alias_rows_win() {
    let (_dir, opts) = stores(
        "ID,Name,College\n1,A,False\n2,B,False\n",
        "Raw,Conformed\nAB,1\nAB,2\n",
    );
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("ab"), Some("B"));
    assert_eq!(c.get_id("ab"), Some(2));
}

#[test]
fn canonical_names_win_over_aliases() {
    let (_dir, opts) = stores(
        "ID,Name,College\n1,Lions,False\n2,Gryffindor,True\n",
        "Raw,Conformed\nLIONS,2\n",
    );
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.conform("lions"), Some("Lions"));
}

#[test]
fn colliding_canonical_names_are_reported() {
    let (_dir, opts) = stores("ID,Name,College\n1,Gryffindor,True\n2,GRYFFINDOR,False\n", NO_ALIASES);
    let c = Conformer::open(&opts).unwrap();
    assert_eq!(c.colliding_names(), vec![("GRYFFINDOR".to_string(), vec![1, 2])]);
}

/* ---------------- load errors ---------------- */

#[test]
fn missing_store_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let opts = StoreOptions::in_dir(dir.path());
    assert!(matches!(Conformer::open(&opts), Err(LoadError::Io { .. })));
}

#[test]
fn missing_name_column_is_a_load_error() {
    let (_dir, opts) = stores("ID,Team,College\n1,A,False\n", NO_ALIASES);
    let err = Conformer::open(&opts).err().unwrap();
    assert!(matches!(err, LoadError::MissingColumn { column: "Name", .. }));
}

#[test]
fn missing_conformed_column_is_a_load_error() {
    let (_dir, opts) = stores("ID,Name,College\n1,A,False\n", "Raw,Team\nA,1\n");
    let err = Conformer::open(&opts).err().unwrap();
    assert!(matches!(err, LoadError::MissingColumn { column: "Conformed", .. }));
}

#[test]
fn dangling_alias_is_a_load_error() {
    let (_dir, opts) = stores("ID,Name,College\n1,A,False\n", "Raw,Conformed\nGHOST,7\n");
    let err = Conformer::open(&opts).err().unwrap();
    assert!(matches!(err, LoadError::DanglingAlias { id: 7, .. }));
}

#[test]
fn malformed_rows_are_load_errors() {
    let (_dir, opts) = stores("ID,Name,College\nx,A,False\n", NO_ALIASES);
    assert!(matches!(Conformer::open(&opts), Err(LoadError::BadRow { line: 2, .. })));

    let (_dir, opts) = stores("ID,Name,College\n1,A,maybe\n", NO_ALIASES);
    assert!(matches!(Conformer::open(&opts), Err(LoadError::BadRow { .. })));

    let (_dir, opts) = stores("ID,Name,College\n1,A,False\n1,B,False\n", NO_ALIASES);
    assert!(matches!(Conformer::open(&opts), Err(LoadError::DuplicateId { id: 1, .. })));
}

#[test]
fn second_writer_is_locked_out() {
    let (_dir, opts) = gryffindor();
    let first = Conformer::open(&opts).unwrap();
    assert!(matches!(Conformer::open(&opts), Err(LoadError::Locked { .. })));

    drop(first);
    assert!(Conformer::open(&opts).is_ok());
}

#[test]
fn lock_can_be_disabled() {
    let (_dir, mut opts) = gryffindor();
    opts.lock = false;
    let _a = Conformer::open(&opts).unwrap();
    let _b = Conformer::open(&opts).unwrap();
}
