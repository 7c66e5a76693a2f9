//! Analysis sequencing: the one asynchronous operation the daemon runs.
//!
//! A trigger flips the session to in-progress, suspends for the configured
//! delay, attempts the decode provider, and settles with exactly one word:
//! the provider's on success, a random candidate on provider failure, the
//! fault word when the attempt itself blows up. Every path converges on the
//! same settle, so the session can never end an analysis stuck busy.

use std::sync::Arc;
use std::time::Duration;

use mindlink::lexicon;
use mindlink::prng::Prng;
use mindlink::session::AnalysisSession;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::provider::{DecodeProvider, DEFAULT_ENDPOINT};

/// Default suspension before the provider attempt, in milliseconds.
pub const DEFAULT_DELAY_MS: u32 = 3000;

/// Upper bound accepted for the configurable delay.
pub const MAX_DELAY_MS: u32 = 60_000;

/// Counters surfaced to clients in `GetState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub triggered: u64,
    pub decoded: u64,
    pub fallbacks: u64,
    pub faults: u64,
}

/// Daemon-side state: the session plus everything needed to run it.
///
/// Exactly one engine exists per daemon, behind `Arc<RwLock<_>>`; the
/// sequencing task is the only writer while an analysis is in flight.
pub struct AnalysisEngine {
    pub session: AnalysisSession,
    pub stats: AnalysisStats,
    pub delay_ms: u32,
    pub endpoint: String,
    prng: Prng,
}

impl AnalysisEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            session: AnalysisSession::new(),
            stats: AnalysisStats::default(),
            delay_ms: DEFAULT_DELAY_MS,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            prng: Prng::new(seed),
        }
    }

    fn fallback_word(&mut self) -> &'static str {
        lexicon::random_candidate(&mut self.prng)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("analysis already in progress")]
    Busy,
}

/// Start an analysis: mark the session in-progress and spawn the sequencing
/// task. Rejected while one is already in flight.
pub async fn trigger_analysis<P: DecodeProvider>(
    engine: Arc<RwLock<AnalysisEngine>>,
    provider: P,
) -> Result<JoinHandle<()>, TriggerError> {
    let delay = {
        let mut e = engine.write().await;
        if !e.session.begin() {
            return Err(TriggerError::Busy);
        }
        e.stats.triggered += 1;
        Duration::from_millis(u64::from(e.delay_ms))
    };
    Ok(tokio::spawn(run_analysis(engine, delay, provider)))
}

/// Suspend, attempt the decode, settle exactly once.
///
/// The attempt runs in its own task so a panic inside a provider surfaces
/// here as a `JoinError` and settles as the fault word instead of leaving
/// the session busy forever.
async fn run_analysis<P: DecodeProvider>(
    engine: Arc<RwLock<AnalysisEngine>>,
    delay: Duration,
    provider: P,
) {
    tokio::time::sleep(delay).await;

    let attempt = tokio::spawn(async move { provider.decode().await }).await;

    let mut e = engine.write().await;
    let word = match attempt {
        Ok(Ok(word)) => {
            e.stats.decoded += 1;
            info!("provider decoded word: {word}");
            word
        }
        Ok(Err(err)) => {
            e.stats.fallbacks += 1;
            warn!("decode attempt failed ({err}); using a fallback word");
            e.fallback_word().to_string()
        }
        Err(fault) => {
            e.stats.faults += 1;
            error!("analysis attempt fault: {fault}");
            lexicon::FAULT_WORD.to_string()
        }
    };
    e.session.settle(word);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DecodeError;
    use mindlink::lexicon::{is_candidate, FAULT_WORD};
    use mindlink::session::DisplayMode;
    use std::future::Future;

    struct FixedWord(&'static str);

    impl DecodeProvider for FixedWord {
        fn decode(&self) -> impl Future<Output = Result<String, DecodeError>> + Send {
            let word = self.0;
            async move { Ok(word.to_string()) }
        }
    }

    struct Unreachable;

    impl DecodeProvider for Unreachable {
        fn decode(&self) -> impl Future<Output = Result<String, DecodeError>> + Send {
            async move { Err(DecodeError::Malformed("no provider in tests".to_string())) }
        }
    }

    struct Panics;

    impl DecodeProvider for Panics {
        fn decode(&self) -> impl Future<Output = Result<String, DecodeError>> + Send {
            async move { panic!("simulated internal fault") }
        }
    }

    fn test_engine() -> Arc<RwLock<AnalysisEngine>> {
        Arc::new(RwLock::new(AnalysisEngine::new(7)))
    }

    #[test]
    fn fresh_engine_is_idle() {
        let e = AnalysisEngine::new(1);
        assert!(!e.session.busy());
        assert_eq!(e.session.result(), None);
        assert_eq!(e.session.display_mode(), DisplayMode::Idle);
        assert_eq!(e.stats, AnalysisStats::default());
        assert_eq!(e.delay_ms, DEFAULT_DELAY_MS);
    }

    #[tokio::test(start_paused = true)]
    async fn busy_and_in_progress_between_trigger_and_settle() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), FixedWord("FOCUS"))
            .await
            .expect("trigger accepted");

        {
            let e = engine.read().await;
            assert!(e.session.busy());
            assert_eq!(e.session.display_mode(), DisplayMode::InProgress);
            assert_eq!(e.session.result(), None);
        }

        task.await.expect("sequencing task");
        let e = engine.read().await;
        assert!(!e.session.busy());
        assert_eq!(e.session.display_mode(), DisplayMode::Result);
    }

    #[tokio::test(start_paused = true)]
    async fn settles_with_the_provider_word() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), FixedWord("FOCUS"))
            .await
            .expect("trigger accepted");
        task.await.expect("sequencing task");

        let e = engine.read().await;
        assert!(!e.session.busy());
        assert_eq!(e.session.display_mode(), DisplayMode::Result);
        assert_eq!(e.session.result(), Some("FOCUS"));
        assert_eq!(e.stats.triggered, 1);
        assert_eq!(e.stats.decoded, 1);
        assert_eq!(e.stats.fallbacks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_falls_back_to_a_candidate() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), Unreachable)
            .await
            .expect("trigger accepted");
        task.await.expect("sequencing task");

        let e = engine.read().await;
        assert!(!e.session.busy());
        assert_eq!(e.session.display_mode(), DisplayMode::Result);
        let word = e.session.result().expect("settled with a word");
        assert!(is_candidate(word));
        assert_eq!(e.stats.fallbacks, 1);
        assert_eq!(e.stats.faults, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_fault_settles_with_the_fault_word() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), Panics)
            .await
            .expect("trigger accepted");
        task.await.expect("sequencing task");

        let e = engine.read().await;
        assert!(!e.session.busy());
        assert_eq!(e.session.display_mode(), DisplayMode::Result);
        assert_eq!(e.session.result(), Some(FAULT_WORD));
        assert_eq!(e.stats.faults, 1);
        assert_eq!(e.stats.fallbacks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_trigger_is_rejected() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), FixedWord("FOCUS"))
            .await
            .expect("first trigger accepted");

        let second = trigger_analysis(Arc::clone(&engine), FixedWord("OTHER")).await;
        assert!(matches!(second, Err(TriggerError::Busy)));

        task.await.expect("sequencing task");
        let e = engine.read().await;
        assert_eq!(e.session.result(), Some("FOCUS"));
        assert_eq!(e.stats.triggered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_after_settle_clears_the_previous_word() {
        let engine = test_engine();
        let task = trigger_analysis(Arc::clone(&engine), FixedWord("FOCUS"))
            .await
            .expect("first trigger accepted");
        task.await.expect("first analysis");

        let task = trigger_analysis(Arc::clone(&engine), FixedWord("CLARITY"))
            .await
            .expect("second trigger accepted");
        {
            let e = engine.read().await;
            assert_eq!(e.session.display_mode(), DisplayMode::InProgress);
            assert_eq!(e.session.result(), None);
        }
        task.await.expect("second analysis");

        let e = engine.read().await;
        assert_eq!(e.session.result(), Some("CLARITY"));
        assert_eq!(e.stats.triggered, 2);
        assert_eq!(e.stats.decoded, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_delay_is_used() {
        let engine = test_engine();
        engine.write().await.delay_ms = 50;

        let start = tokio::time::Instant::now();
        let task = trigger_analysis(Arc::clone(&engine), FixedWord("FOCUS"))
            .await
            .expect("trigger accepted");
        task.await.expect("sequencing task");

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(engine.read().await.session.result(), Some("FOCUS"));
    }
}
