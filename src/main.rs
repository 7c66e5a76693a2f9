//! Offline demo: one full analysis cycle without the daemon.
//!
//! Runs the same trigger/settle sequence the daemon performs, minus the
//! provider attempt (nothing is assumed reachable offline), so the decoded
//! word always comes from the fallback lexicon.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mindlink::prelude::*;

fn print_help() {
    println!("mindlink offline demo");
    println!("Usage: mindlink [--delay-ms <ms>]");
    println!();
    println!("Runs one simulated brain-wave analysis and prints the decoded word.");
    println!("Default delay is 3000 ms.");
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn print_panel(session: &AnalysisSession) {
    match select_panel(session.display_mode(), session.result()) {
        Panel::Prompt => println!("Click \"Analyze Brain Waves\" to begin"),
        Panel::Waves => println!("Analyzing brain waves..."),
        Panel::Word(word) => {
            println!("{word}");
            println!("Neural pattern detected");
        }
        Panel::Blank => {}
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut delay_ms: u64 = 3000;

    match args.as_slice() {
        [] => {}
        [flag] if flag == "--help" || flag == "-h" || flag == "help" => {
            print_help();
            return;
        }
        [flag, ms] if flag == "--delay-ms" => match ms.parse() {
            Ok(parsed) => delay_ms = parsed,
            Err(_) => {
                eprintln!("--delay-ms expects a millisecond count");
                std::process::exit(2);
            }
        },
        _ => {
            print_help();
            std::process::exit(2);
        }
    }

    let mut session = AnalysisSession::new();
    let mut prng = Prng::new(clock_seed());

    print_panel(&session);

    session.begin();
    print_panel(&session);

    thread::sleep(Duration::from_millis(delay_ms));

    session.settle(random_candidate(&mut prng).to_string());
    print_panel(&session);
}
