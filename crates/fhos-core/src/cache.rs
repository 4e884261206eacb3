//! Read-through memoization of device analyses.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use fhos_model::{CutoffContext, Result, SourceTables};

use crate::pipeline::{DeviceAnalysis, analyze_device};

/// Identity of one analysis: the source snapshot plus the device and cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisKey {
    pub fingerprint: String,
    pub din: String,
    pub cutoff: DateTime<Utc>,
}

impl AnalysisKey {
    pub fn new(sources: &SourceTables, context: &CutoffContext) -> Self {
        Self {
            fingerprint: sources.fingerprint.clone(),
            din: context.din.clone(),
            cutoff: context.cutoff,
        }
    }
}

/// Cache of analyses keyed by [`AnalysisKey`].
///
/// Sources are immutable for the life of the cache, so entries never expire.
/// Failed analyses are not stored.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<AnalysisKey, Arc<DeviceAnalysis>>,
    hits: u64,
    misses: u64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached analysis or runs and stores a new one.
    ///
    /// `now` only matters on a miss; a hit returns the statuses computed
    /// when the entry was stored.
    pub fn get_or_analyze(
        &mut self,
        sources: &SourceTables,
        context: &CutoffContext,
        now: DateTime<Utc>,
    ) -> Result<Arc<DeviceAnalysis>> {
        let key = AnalysisKey::new(sources, context);
        if let Some(analysis) = self.entries.get(&key) {
            self.hits += 1;
            debug!(din = %key.din, cutoff = %key.cutoff, "analysis cache hit");
            return Ok(Arc::clone(analysis));
        }
        self.misses += 1;
        let analysis = Arc::new(analyze_device(sources, context, now)?);
        self.entries.insert(key, Arc::clone(&analysis));
        Ok(analysis)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
