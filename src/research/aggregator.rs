//! Result Aggregator
//!
//! Pure reduction of the dispatcher's outcome list. No I/O.

use crate::types::{AggregatedResult, Citation, RegionOutcome};
use std::collections::HashSet;

/// Partition outcomes into successful and failed regions, merge citations of
/// the successful ones and total their elapsed time.
///
/// Citations are deduplicated by URL keeping the first occurrence, walking
/// regions in request order and each region's citations in provider order.
pub fn aggregate(outcomes: Vec<RegionOutcome>) -> AggregatedResult {
    let mut successful_regions = Vec::new();
    let mut failed_regions = Vec::new();
    let mut seen_urls = HashSet::new();
    let mut deduped_citations: Vec<Citation> = Vec::new();
    let mut total_elapsed_millis = 0u64;

    for outcome in &outcomes {
        total_elapsed_millis = total_elapsed_millis.saturating_add(outcome.elapsed_millis());

        if !outcome.is_success() {
            failed_regions.push(outcome.region().to_string());
            continue;
        }

        successful_regions.push(outcome.region().to_string());
        for citation in outcome.citations() {
            if seen_urls.insert(citation.url.as_str()) {
                deduped_citations.push(citation.clone());
            }
        }
    }

    AggregatedResult {
        successful_regions,
        failed_regions,
        all_outcomes: outcomes,
        deduped_citations,
        total_elapsed_millis,
    }
}
