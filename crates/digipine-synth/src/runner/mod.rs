use std::time::Instant;

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::catalog::ReferenceCatalog;
use crate::checks::{check_determinism, check_snapshot, check_time_bias, Violation};
use crate::data::bias::{apply_region_bias, apply_time_bias};
use crate::data::synth::synthesize_on;
use crate::error::{SynthError, SynthResult};
use crate::results::{CaseFailure, CaseResult, IterationSample};
use crate::selection::{SelectionKey, TimeWindow, ALL_PLATFORMS_ID};

#[derive(Clone, Debug)]
#[must_use]
pub enum CaseExecutionResult {
    Success(CaseResult),
    Failure(CaseResult),
}

impl CaseExecutionResult {
    pub fn into_case(self) -> CaseResult {
        match self {
            Self::Success(case) | Self::Failure(case) => case,
        }
    }
}

/// Runs `op` `iterations` times, recording the fingerprint each run returns.
/// The case fails on the first error or when two runs disagree.
pub fn run_case<F, E>(
    selection: &SelectionKey,
    iterations: u32,
    mut op: F,
) -> CaseExecutionResult
where
    F: FnMut() -> Result<String, E>,
    E: ToString,
{
    let mut case = CaseResult {
        case: selection.slug(),
        selection: selection.clone(),
        success: true,
        samples: Vec::new(),
        failure: None,
    };

    for _ in 0..iterations {
        let start = Instant::now();
        match op() {
            Ok(fingerprint) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                let mismatch = case
                    .samples
                    .first()
                    .and_then(|first| check_determinism(&first.fingerprint, &fingerprint));
                if let Some(violation) = mismatch {
                    fail_case(&mut case, violation.to_string());
                    return CaseExecutionResult::Failure(case);
                }
                case.samples.push(IterationSample {
                    elapsed_ms,
                    fingerprint,
                });
            }
            Err(e) => {
                fail_case(&mut case, e.to_string());
                return CaseExecutionResult::Failure(case);
            }
        }
    }

    CaseExecutionResult::Success(case)
}

fn fail_case(case: &mut CaseResult, message: String) {
    case.success = false;
    case.failure = Some(CaseFailure { message });
}

/// Generates one selection and checks every invariant, returning the
/// snapshot fingerprint when all hold.
pub fn generate_and_check(
    key: &SelectionKey,
    catalog: &ReferenceCatalog,
    today: NaiveDate,
) -> SynthResult<String> {
    let region_biased = apply_region_bias(synthesize_on(key, catalog, today), key, catalog);
    let snapshot = apply_time_bias(region_biased.clone(), key);

    let mut violations = check_snapshot(&snapshot, key, catalog);
    violations.extend(check_time_bias(&region_biased, &snapshot, key));
    if !violations.is_empty() {
        return Err(SynthError::Invariant(join_violations(&violations)));
    }
    snapshot.fingerprint()
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Draws `count` valid selection keys from the catalog with a seeded sampler.
pub fn sample_selection_keys(
    catalog: &ReferenceCatalog,
    count: usize,
    seed: u64,
) -> Vec<SelectionKey> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let products = catalog.products();
    let regions = catalog.regions();
    let platforms = catalog.platforms();

    (0..count)
        .map(|_| {
            let product = &products[rng.gen_range(0..products.len())];
            let region = &regions[rng.gen_range(0..regions.len())];
            let window = TimeWindow::ALL[rng.gen_range(0..TimeWindow::ALL.len())];
            // One extra slot stands for the "all platforms" tab.
            let platform_idx = rng.gen_range(0..=platforms.len());
            let platform = platforms
                .get(platform_idx)
                .map(|p| p.id.as_str())
                .unwrap_or(ALL_PLATFORMS_ID);
            SelectionKey::new(&product.id, &region.id, window.as_str(), platform)
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct SweepOptions {
    pub count: usize,
    pub seed: u64,
    pub iterations: u32,
    pub today: NaiveDate,
}

pub fn run_sweep(catalog: &ReferenceCatalog, options: &SweepOptions) -> SynthResult<Vec<CaseResult>> {
    if options.count == 0 {
        return Err(SynthError::InvalidArgument(
            "sweep count must be at least 1".to_string(),
        ));
    }
    if options.iterations < 2 {
        return Err(SynthError::InvalidArgument(
            "sweep needs at least 2 iterations per case to check determinism".to_string(),
        ));
    }

    let keys = sample_selection_keys(catalog, options.count, options.seed);
    let mut cases = Vec::with_capacity(keys.len());
    for key in &keys {
        let result = run_case(key, options.iterations, || {
            generate_and_check(key, catalog, options.today)
        });
        if let CaseExecutionResult::Failure(case) = &result {
            debug!(case = %case.case, "sweep case failed");
        }
        cases.push(result.into_case());
    }

    let failed = cases.iter().filter(|case| !case.success).count();
    info!(cases = cases.len(), failed, seed = options.seed, "sweep finished");
    Ok(cases)
}
