/// Path prefix for every simulated API route
pub const API_NAMESPACE: &str = "/api";

/// Application name
pub const APP_NAME: &str = "TalentFlow";

/// Artificial latency applied to every matched API call, in milliseconds
pub const DEFAULT_LATENCY_MS: u64 = 400;

/// Probability that a mutating call (POST/PATCH/PUT) is answered with an
/// injected 500 instead of reaching its handler
pub const DEFAULT_FAILURE_RATE: f64 = 0.08;

/// Default page size for the candidates listing
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Number of candidates created by the fixture seeder
pub const DEFAULT_CANDIDATE_COUNT: u32 = 1000;

/// Number of jobs created by the fixture seeder
pub const SEED_JOB_COUNT: u32 = 10;

/// Default HTTP API port (demo binary)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
