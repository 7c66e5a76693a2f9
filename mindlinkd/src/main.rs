//! Mindlink Daemon - fake brain-wave analysis service
//!
//! Owns the single dashboard analysis session and runs the analysis
//! sequencing for it:
//! - trigger handling with busy rejection
//! - the fixed "signal processing" delay
//! - decode-provider attempt with random-candidate fallback
//! - IPC server for UI clients (newline-delimited JSON over TCP)
//!
//! Nothing is persisted; the session lives and dies with the process.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mindlink::session::DisplayMode;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time;
use tracing::{error, info};

mod analysis;
mod provider;

use analysis::{AnalysisEngine, AnalysisStats, MAX_DELAY_MS};
use provider::{HttpWordProvider, REQUEST_TIMEOUT};

const LISTEN_ADDR: &str = "127.0.0.1:9178";

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════

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
    triggered: u64,
    decoded: u64,
    fallbacks: u64,
    faults: u64,
}

impl From<AnalysisStats> for StatsSnapshot {
    fn from(stats: AnalysisStats) -> Self {
        Self {
            triggered: stats.triggered,
            decoded: stats.decoded,
            fallbacks: stats.fallbacks,
            faults: stats.faults,
        }
    }
}

fn snapshot(engine: &AnalysisEngine) -> StateSnapshot {
    StateSnapshot {
        busy: engine.session.busy(),
        display_mode: engine.session.display_mode(),
        result: engine.session.result().map(str::to_string),
        delay_ms: engine.delay_ms,
        endpoint: engine.endpoint.clone(),
        stats: engine.stats.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

async fn handle_client(
    stream: TcpStream,
    engine: Arc<RwLock<AnalysisEngine>>,
    client: reqwest::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let resp = Response::Error {
                    message: format!("Invalid request: {}", e),
                };
                writer
                    .write_all(serde_json::to_string(&resp)?.as_bytes())
                    .await?;
                writer.write_all(b"\n").await?;
                continue;
            }
        };

        let response = match request {
            Request::GetState => {
                let e = engine.read().await;
                Response::State(snapshot(&e))
            }
            Request::TriggerAnalysis => {
                let endpoint = engine.read().await.endpoint.clone();
                let provider = HttpWordProvider::new(client.clone(), endpoint);
                match analysis::trigger_analysis(Arc::clone(&engine), provider).await {
                    Ok(_task) => Response::Success {
                        message: "Analysis started".to_string(),
                    },
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::ResetSession => {
                let mut e = engine.write().await;
                if e.session.reset() {
                    Response::Success {
                        message: "Session reset".to_string(),
                    }
                } else {
                    Response::Error {
                        message: "analysis already in progress".to_string(),
                    }
                }
            }
            Request::SetDelayMs { ms } => {
                let mut e = engine.write().await;
                let clamped = ms.clamp(0, MAX_DELAY_MS);
                e.delay_ms = clamped;
                info!("Analysis delay set to {} ms", clamped);
                Response::Success {
                    message: format!("Analysis delay set to {} ms", clamped),
                }
            }
            Request::SetEndpoint { url } => {
                if url.trim().is_empty() {
                    Response::Error {
                        message: "endpoint must not be empty".to_string(),
                    }
                } else {
                    let mut e = engine.write().await;
                    e.endpoint = url.clone();
                    info!("Decode endpoint set to {}", url);
                    Response::Success {
                        message: format!("Decode endpoint set to {}", url),
                    }
                }
            }
            Request::Shutdown => {
                info!("Shutdown requested");
                tokio::spawn(async {
                    // Give the response a moment to flush before exiting.
                    time::sleep(Duration::from_millis(50)).await;
                    std::process::exit(0);
                });
                Response::Success {
                    message: "Shutting down".to_string(),
                }
            }
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let engine = Arc::new(RwLock::new(AnalysisEngine::new(clock_seed())));
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    // Log a final tally on Ctrl-C before exiting.
    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let e = engine.read().await;
                info!("Ctrl-C: exiting after {} analyses", e.stats.triggered);
                std::process::exit(0);
            }
        });
    }

    let listener = TcpListener::bind(LISTEN_ADDR).await?;
    info!("Mindlink daemon listening on {}", LISTEN_ADDR);

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Client connected: {}", addr);
        let engine = Arc::clone(&engine);
        let client = client.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, engine, client).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}
