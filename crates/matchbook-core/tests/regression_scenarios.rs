//! Full-session regression tests: command stream in, report lines out.

use matchbook_core::Engine;
use matchbook_protocol::{format_event, parse_command};

fn run_session(input: &str) -> Vec<String> {
    let mut engine = Engine::new();
    let mut lines = Vec::new();
    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_command(line).unwrap_or_else(|e| panic!("parsing {line:?}: {e}"));
        let events = engine.execute(command).expect("capacity");
        lines.extend(events.iter().map(format_event));
    }
    lines
}

fn expected_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[test]
fn single_symbol_session_matches_reference_output() {
    const INPUT: &str = include_str!("data/session_one.txt");
    const EXPECTED: &str = include_str!("data/session_one_expected.txt");
    assert_eq!(run_session(INPUT), expected_lines(EXPECTED));
}

#[test]
fn multi_symbol_query_session_matches_reference_output() {
    const INPUT: &str = include_str!("data/session_two.txt");
    const EXPECTED: &str = include_str!("data/session_two_expected.txt");
    assert_eq!(run_session(INPUT), expected_lines(EXPECTED));
}
