//! CLI client for the `mindlinkd` daemon.
//!
//! Examples:
//!   mindlink-cli status
//!   mindlink-cli analyze
//!   mindlink-cli delay 500
//!   mindlink-cli endpoint http://127.0.0.1:9180/api/brain-waves
//!   mindlink-cli reset
//!   mindlink-cli shutdown
//!
//! By default it talks to 127.0.0.1:9178; override with `--addr host:port`.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::process;
use std::thread;
use std::time::Duration;

use mindlink::session::DisplayMode;
use mindlink::view::{select_panel, Panel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Request {
    GetState,
    TriggerAnalysis,
    ResetSession,
    SetDelayMs { ms: u32 },
    SetEndpoint { url: String },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Response {
    State(StateSnapshot),
    Success { message: String },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateSnapshot {
    busy: bool,
    display_mode: DisplayMode,
    result: Option<String>,
    delay_ms: u32,
    endpoint: String,
    stats: StatsSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StatsSnapshot {
    #[serde(default)]
    triggered: u64,
    #[serde(default)]
    decoded: u64,
    #[serde(default)]
    fallbacks: u64,
    #[serde(default)]
    faults: u64,
}

fn usage() -> ! {
    eprintln!("mindlink-cli (talks to mindlinkd @ 127.0.0.1:9178 by default)");
    eprintln!("Usage: mindlink-cli [--addr host:port] <command> [args]\n");
    eprintln!("Commands:");
    eprintln!("  status                 Show daemon state");
    eprintln!("  analyze                Trigger an analysis and wait for the word");
    eprintln!("  delay <0-60000>        Set the analysis delay in milliseconds");
    eprintln!("  endpoint <url>         Set the decode provider endpoint");
    eprintln!("  reset                  Return the session to idle");
    eprintln!("  shutdown               Exit the daemon");
    process::exit(1);
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let mut addr = "127.0.0.1:9178".to_string();
    if args.len() >= 2 && args[0] == "--addr" {
        addr = args[1].clone();
        args.drain(0..2);
    }

    if args.is_empty() {
        usage();
    }

    (addr, args)
}

fn send_request(addr: &str, req: &Request) -> Result<Response, String> {
    let mut stream = TcpStream::connect(addr).map_err(|e| format!("connect: {e}"))?;
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .map_err(|e| format!("set_read_timeout: {e}"))?;
    let mut reader = BufReader::new(stream.try_clone().map_err(|e| format!("clone: {e}"))?);

    let line = serde_json::to_string(req).map_err(|e| format!("serialize: {e}"))?;
    stream
        .write_all(line.as_bytes())
        .and_then(|_| stream.write_all(b"\n"))
        .map_err(|e| format!("send: {e}"))?;

    let mut resp_line = String::new();
    reader
        .read_line(&mut resp_line)
        .map_err(|e| format!("recv: {e}"))?;
    serde_json::from_str(&resp_line).map_err(|e| format!("parse response: {e}"))
}

fn fetch_state(addr: &str) -> Result<StateSnapshot, String> {
    match send_request(addr, &Request::GetState)? {
        Response::State(snapshot) => Ok(snapshot),
        Response::Success { message } | Response::Error { message } => {
            Err(format!("unexpected response: {message}"))
        }
    }
}

fn print_state(s: &StateSnapshot) {
    println!(
        "mode={:<11} busy={} result={}",
        s.display_mode.as_str(),
        s.busy,
        s.result.as_deref().unwrap_or("-"),
    );
    println!(
        "analysis: triggered={} decoded={} fallbacks={} faults={} delay_ms={} endpoint={}",
        s.stats.triggered, s.stats.decoded, s.stats.fallbacks, s.stats.faults, s.delay_ms, s.endpoint,
    );
}

/// Poll the daemon until the triggered analysis settles, rendering the
/// panel transitions along the way.
fn watch_analysis(addr: &str, delay_ms: u32) -> Result<(), String> {
    // Generous cap: the configured delay plus slack for the provider attempt.
    let max_polls = (u64::from(delay_ms) / 250 + 60) as usize;
    let mut waves_shown = false;

    for _ in 0..max_polls {
        let snapshot = fetch_state(addr)?;
        match select_panel(snapshot.display_mode, snapshot.result.as_deref()) {
            Panel::Waves => {
                if !waves_shown {
                    println!("Analyzing brain waves...");
                    waves_shown = true;
                }
            }
            Panel::Word(word) => {
                println!("{word}");
                println!("Neural pattern detected");
                return Ok(());
            }
            Panel::Prompt => {
                println!("Session returned to idle while waiting");
                return Ok(());
            }
            Panel::Blank => return Ok(()),
        }
        thread::sleep(Duration::from_millis(250));
    }

    Err("timed out waiting for the analysis to settle".to_string())
}

fn main() {
    let (addr, args) = parse_args();
    let cmd = &args[0];

    let make_error = |msg: &str| -> ! {
        eprintln!("{}", msg);
        process::exit(1);
    };

    let req = match cmd.as_str() {
        "status" => Request::GetState,
        "analyze" => Request::TriggerAnalysis,
        "reset" => Request::ResetSession,
        "shutdown" => Request::Shutdown,
        "delay" => {
            if args.len() < 2 {
                usage();
            }
            let ms: u32 = args[1]
                .parse()
                .unwrap_or_else(|_| make_error("delay must be a number (0-60000)"));
            Request::SetDelayMs { ms }
        }
        "endpoint" => {
            if args.len() < 2 {
                usage();
            }
            Request::SetEndpoint {
                url: args[1].clone(),
            }
        }
        _ => usage(),
    };

    match send_request(&addr, &req) {
        Ok(Response::State(snapshot)) => print_state(&snapshot),
        Ok(Response::Success { message }) => {
            println!("{message}");
            if matches!(req, Request::TriggerAnalysis) {
                let delay_ms = fetch_state(&addr).map(|s| s.delay_ms).unwrap_or(3000);
                if let Err(e) = watch_analysis(&addr, delay_ms) {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
        Ok(Response::Error { message }) => {
            eprintln!("daemon error: {message}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
