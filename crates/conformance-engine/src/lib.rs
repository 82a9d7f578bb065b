//! HSDS-UK conformance validation engine.
//!
//! Given a base URL, the engine determines which standard version the
//! service claims to implement, loads the declarative test profile
//! for that version, executes the profile's test cases concurrently
//! against the live service, validates each response against a JSON
//! Schema, checks pagination-protocol invariants, and produces a
//! hierarchical pass/fail report.
//!
//! The entry point is [`ConformanceValidator::validate`]; everything
//! else in this crate is a component it fans out to.

pub mod cancel;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod pagination;
pub mod sampler;
pub mod schema_check;
pub mod selector;

// Re-export main types for convenience
pub use cancel::CancelToken;
pub use error::{EngineError, EngineResult};
pub use executor::{RunContext, TestCaseExecutor};
pub use orchestrator::ConformanceValidator;
pub use pagination::PaginationChecker;
pub use sampler::IdSampler;
pub use schema_check::SchemaChecker;
pub use selector::{ProfileSelection, ProfileSelector};

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Tuning knobs for a validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Fixed `per_page` request parameter for pagination checks.
    pub per_page: i64,
    /// Maximum number of middle pages sampled per pagination check.
    pub page_loop_limit: usize,
    /// Number of identifiers the sampler collects per collection.
    pub sample_limit: usize,
    /// Seed for randomized page/item selection. `None` draws from the
    /// OS; setting it makes sampling reproducible.
    pub seed: Option<u64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            per_page: 5,
            page_loop_limit: 3,
            sample_limit: 3,
            seed: None,
        }
    }
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}
