//! Artificial latency and random failure injection.
//!
//! Every matched call sleeps a fixed 400 ms before responding, and 8% of
//! mutating calls are answered with a canned 500 instead of reaching their
//! handler, so the consuming UI has realistic failures to cope with.
//! [`ChaosPolicy`] keeps that contract an explicit, injectable value: the
//! probability and the RNG are both pluggable so tests can force
//! deterministic failure or no-failure for a given call.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::warn;

/// Message clients receive on an injected failure.
const INJECTED_ERROR_MESSAGE: &str = "Random server error";

#[derive(Clone)]
pub struct ChaosPolicy {
    latency: Duration,
    failure_rate: f64,
    rng: Arc<Mutex<StdRng>>,
}

impl ChaosPolicy {
    /// Policy with an OS-entropy RNG.
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Policy with a deterministic RNG, for reproducible failure sequences.
    pub fn seeded(latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self {
            latency,
            failure_rate,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// No latency, no failures.
    pub fn disabled() -> Self {
        Self::seeded(Duration::ZERO, 0.0, 0)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Draw the failure decision for one call. Only mutating verbs are ever
    /// failed; each draw is independent.
    pub async fn should_fail(&self, method: &Method) -> bool {
        if !is_mutating(method) || self.failure_rate <= 0.0 {
            return false;
        }
        let mut rng = self.rng.lock().await;
        rng.gen::<f64>() < self.failure_rate
    }
}

/// The verb set subject to failure injection.
fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PATCH | Method::PUT)
}

/// Middleware applying the chaos policy to every matched route: fixed
/// latency first, then the failure draw, then the handler.
pub async fn chaos_middleware(
    State(policy): State<ChaosPolicy>,
    req: Request,
    next: Next,
) -> Response {
    if !policy.latency().is_zero() {
        tokio::time::sleep(policy.latency()).await;
    }

    if policy.should_fail(req.method()).await {
        warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "injecting simulated server error"
        );
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": INJECTED_ERROR_MESSAGE })),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_is_never_failure_injected() {
        let policy = ChaosPolicy::seeded(Duration::ZERO, 1.0, 7);
        for _ in 0..100 {
            assert!(!policy.should_fail(&Method::GET).await);
        }
    }

    #[tokio::test]
    async fn full_rate_fails_every_mutating_verb() {
        let policy = ChaosPolicy::seeded(Duration::ZERO, 1.0, 7);
        for method in [Method::POST, Method::PATCH, Method::PUT] {
            assert!(policy.should_fail(&method).await);
        }
    }

    #[tokio::test]
    async fn zero_rate_never_fails() {
        let policy = ChaosPolicy::seeded(Duration::ZERO, 0.0, 7);
        for _ in 0..100 {
            assert!(!policy.should_fail(&Method::POST).await);
        }
    }

    #[tokio::test]
    async fn failure_rate_is_statistically_plausible() {
        let policy = ChaosPolicy::seeded(Duration::ZERO, 0.08, 42);

        let mut failures = 0;
        for _ in 0..1000 {
            if policy.should_fail(&Method::POST).await {
                failures += 1;
            }
        }

        // Binomial(1000, 0.08): mean 80, sigma ~8.6. A +-5 sigma band keeps
        // the test deterministic-in-practice without hiding a broken rate.
        assert!(
            (37..=123).contains(&failures),
            "expected ~80 failures out of 1000, got {failures}"
        );
    }
}
