//! The `analyze` workflow: load sources once, analyze each device through
//! the cache, and write report bundles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, info_span, warn};

use fhos_core::{AnalysisCache, DeviceAnalysis, resolve_cutoff, suggested_cutoff};
use fhos_ingest::load_sources;
use fhos_model::{OutputFormat, SourceLayout, SourceTables};
use fhos_report::{file_stem, write_report_bundle};

/// Inputs of one `analyze` run.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub data_dir: PathBuf,
    pub layout: SourceLayout,
    /// Devices in the order they should be reported.
    pub dins: Vec<String>,
    /// Cutoff shared by all devices; each device's suggestion otherwise.
    pub cutoff: Option<NaiveDate>,
    /// `None` for a dry run.
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Result for one device.
#[derive(Debug, Clone)]
pub struct DeviceOutcome {
    pub din: String,
    pub analysis: Option<Arc<DeviceAnalysis>>,
    pub outputs: Vec<PathBuf>,
    pub error: Option<String>,
}

impl DeviceOutcome {
    fn failed(din: &str, error: &anyhow::Error) -> Self {
        Self {
            din: din.to_string(),
            analysis: None,
            outputs: Vec::new(),
            error: Some(format!("{error:#}")),
        }
    }
}

/// Result of one `analyze` run.
#[derive(Debug, Clone)]
pub struct AnalyzeResult {
    pub data_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub fingerprint: String,
    pub devices: Vec<DeviceOutcome>,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl AnalyzeResult {
    pub fn has_errors(&self) -> bool {
        self.devices.iter().any(|d| d.error.is_some())
    }
}

/// Loads the source tables, failing on any missing or malformed source.
pub fn load(data_dir: &Path, layout: &SourceLayout) -> Result<SourceTables> {
    load_sources(data_dir, layout).with_context(|| format!("load sources from {}", data_dir.display()))
}

/// Runs `analyze`. Only a source load failure fails the run; a device that
/// cannot be analyzed is recorded on its outcome and the rest continue.
///
/// Two distinct DINs whose report files would share a name are a failure
/// of the later one; its bundle is not written.
pub fn run_analysis(request: &AnalyzeRequest, now: DateTime<Utc>) -> Result<AnalyzeResult> {
    let start = Instant::now();
    let sources = load(&request.data_dir, &request.layout)?;
    let mut cache = AnalysisCache::new();
    let mut devices = Vec::with_capacity(request.dins.len());
    let mut stems: HashMap<String, &str> = HashMap::new();

    for din in &request.dins {
        let span = info_span!("device", din = %din);
        let _guard = span.enter();
        let result = claim_stem(&mut stems, din)
            .and_then(|()| analyze_one(&sources, &mut cache, request, din, now));
        match result {
            Ok(outcome) => devices.push(outcome),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "device analysis failed");
                devices.push(DeviceOutcome::failed(din, &error));
            }
        }
    }

    info!(
        devices = devices.len(),
        failed = devices.iter().filter(|d| d.error.is_some()).count(),
        cache_hits = cache.hits(),
        duration_ms = start.elapsed().as_millis(),
        "analysis run complete"
    );
    Ok(AnalyzeResult {
        data_dir: request.data_dir.clone(),
        output_dir: request.output_dir.clone(),
        fingerprint: sources.fingerprint.clone(),
        devices,
        cache_hits: cache.hits(),
        cache_misses: cache.misses(),
    })
}

/// Reserves the report file stem of `din`. Repeating the same DIN is fine.
fn claim_stem<'a>(stems: &mut HashMap<String, &'a str>, din: &'a str) -> Result<()> {
    let stem = file_stem(din);
    let owner = *stems.entry(stem.clone()).or_insert(din);
    if owner != din {
        bail!("report files for {din} would overwrite those of {owner} ({stem})");
    }
    Ok(())
}

fn analyze_one(
    sources: &SourceTables,
    cache: &mut AnalysisCache,
    request: &AnalyzeRequest,
    din: &str,
    now: DateTime<Utc>,
) -> Result<DeviceOutcome> {
    let context = resolve_cutoff(din, request.cutoff, &sources.cutoff_hints, now.date_naive())?;
    let analysis = cache.get_or_analyze(sources, &context, now)?;
    let outputs = match &request.output_dir {
        Some(dir) => {
            write_report_bundle(&analysis, dir, request.format)
                .with_context(|| format!("write reports for {din}"))?
                .files
        }
        None => Vec::new(),
    };
    Ok(DeviceOutcome {
        din: din.to_string(),
        analysis: Some(analysis),
        outputs,
        error: None,
    })
}

/// Suggested cutoff of one device.
pub fn run_cutoff(data_dir: &Path, layout: &SourceLayout, din: &str) -> Result<DateTime<Utc>> {
    let sources = load(data_dir, layout)?;
    if !sources.knows_device(din) {
        warn!(din, "no rows for device; suggesting the floor date");
    }
    Ok(suggested_cutoff(&sources.cutoff_hints, din))
}
