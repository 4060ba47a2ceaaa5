// tests/resolve.rs
use std::io::Cursor;

use qd_conform::error::ResolveError;
use qd_conform::{ ConsoleResolver, RejectResolver, Resolution, Resolver, ScriptedResolver };

fn console(input: &str) -> (Result<Resolution, ResolveError>, String) {
    let mut out = Vec::new();
    let answer = {
        let mut r = ConsoleResolver::new(Cursor::new(input.to_string()), &mut out);
        r.resolve("Gryf", "GRYF")
    };
    (answer, String::from_utf8(out).unwrap())
}

#[test]
fn console_asks_for_name_then_college() {
    let (answer, prompts) = console("Gryffindor\nyes\n");
    assert_eq!(answer.unwrap(), Resolution::new_team("Gryffindor", true));
    assert_eq!(prompts, "Conform GRYF to ? College (y/n) ? ");
}

#[test]
fn console_college_defaults_to_no() {
    let (answer, _) = console("  Gryffindor  \nnope\n");
    assert_eq!(answer.unwrap(), Resolution::new_team("Gryffindor", false));

    let (answer, _) = console("Gryffindor\n\n");
    assert_eq!(answer.unwrap(), Resolution::new_team("Gryffindor", false));
}

#[test]
fn console_blank_name_skips() {
    let (answer, prompts) = console("\n");
    assert_eq!(answer.unwrap(), Resolution::Skip);
    assert_eq!(prompts, "Conform GRYF to ? ");
}

#[test]
fn console_eof_is_an_error() {
    let (answer, _) = console("");
    assert!(matches!(answer, Err(ResolveError::Closed)));

    let (answer, _) = console("Gryffindor\n");
    assert!(matches!(answer, Err(ResolveError::Closed)));
}

#[test]
fn scripted_answers_by_key_and_records_questions() {
    let mut r = ScriptedResolver::new()
        .answer("GRYF", Resolution::Existing(1));

    assert_eq!(r.resolve("Gryf", "GRYF").unwrap(), Resolution::Existing(1));
    assert_eq!(r.resolve("Slyth", "SLYTH").unwrap(), Resolution::Skip);
    assert_eq!(r.asked(), ["GRYF", "SLYTH"]);
}

#[test]
fn reject_always_skips() {
    let mut r = RejectResolver;
    assert_eq!(r.resolve("anything", "ANYTHING").unwrap(), Resolution::Skip);
}
