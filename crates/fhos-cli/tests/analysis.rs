//! Tests for the `analyze` and `cutoff` workflows.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fhos_cli::analysis::{AnalyzeRequest, run_analysis, run_cutoff};
use fhos_model::{OutputFormat, SourceLayout};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

const HANDPIECES: &str = "\
din,handpiece_id,serial_number,created_at,pulse_count,burst_count,activation_count,modulation_count
CM-A30-000001,HP-019,SN0001,2024-10-01 08:00:00,300,10,5,5
CM-A30-000001,HP-029,SN0002,2024-06-01 08:00:00,900,0,0,0
CM-A30-000002,HP-099,SN0003,2024-08-01,90,0,0,0
";

const HINTS: &str = "\
din,fecha_corte
CM-A30-000001,45292
CM-A30-000002,
";

const TREATMENTS: &str = "\
din,code,reported_at,duration
CM-A30-000001,101,2024-10-02 10:00:00,600000
CM-A30-000001,102,2024-10-03 10:00:00,120000
";

const TREATMENT_TYPES: &str = "\
Treatment_ID,Tipo,Subtipo,Subprograma,PVP,Secuencia
101,Facial,Rostro,Activación,60,1.0
102,Facial,Rostro,Estimulación,60,2.0
";

const DEVICE: &str = "CM-A30-000001";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 20, 12, 0, 0)
        .single()
        .expect("valid now")
}

fn write_sources(dir: &Path) {
    fs::write(dir.join("handpieces.csv"), HANDPIECES).expect("write handpieces");
    fs::write(dir.join("datos_drv_it.csv"), HINTS).expect("write hints");
    fs::write(dir.join("treatments.csv"), TREATMENTS).expect("write treatments");
    fs::write(dir.join("treatments_id.csv"), TREATMENT_TYPES).expect("write treatment types");
}

fn request(data_dir: &Path, dins: &[&str], output_dir: Option<PathBuf>) -> AnalyzeRequest {
    AnalyzeRequest {
        data_dir: data_dir.to_path_buf(),
        layout: SourceLayout::default(),
        dins: dins.iter().map(|din| din.to_string()).collect(),
        cutoff: None,
        output_dir,
        format: OutputFormat::Both,
    }
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// analyze
// ============================================================================

#[test]
fn analyze_writes_report_bundle() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    let output = dir.path().join("output");

    let result = run_analysis(&request(dir.path(), &[DEVICE], Some(output.clone())), now())
        .expect("run analysis");

    assert!(!result.has_errors());
    assert_eq!(result.fingerprint.len(), 64);
    let outcome = &result.devices[0];
    let analysis = outcome.analysis.as_ref().expect("analysis");
    assert_eq!(analysis.usage.len(), 2);
    assert_eq!(analysis.treatments.len(), 2);
    assert_eq!(
        file_names(&outcome.outputs),
        vec![
            "manipulos_CM-A30-000001.csv",
            "resumen_tipo_CM-A30-000001.csv",
            "resumen_programa_CM-A30-000001.csv",
            "resumen_subprograma_CM-A30-000001.csv",
            "tratamientos_CM-A30-000001.csv",
            "informe_resumen_CM-A30-000001.json",
            "informe_detallado_CM-A30-000001.json",
        ]
    );
    for path in &outcome.outputs {
        assert!(path.starts_with(&output));
        assert!(path.is_file(), "missing {}", path.display());
    }
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());

    let result = run_analysis(&request(dir.path(), &[DEVICE], None), now()).expect("run analysis");

    assert!(!result.has_errors());
    assert!(result.devices[0].analysis.is_some());
    assert!(result.devices[0].outputs.is_empty());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn unseen_device_gets_an_empty_bundle() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    let output = dir.path().join("output");

    let result = run_analysis(
        &request(dir.path(), &["CM-A30-999999", DEVICE], Some(output)),
        now(),
    )
    .expect("run");

    assert!(!result.has_errors());
    assert_eq!(result.devices.len(), 2);
    let unseen = &result.devices[0];
    let analysis = unseen.analysis.as_ref().expect("empty analysis");
    assert!(analysis.usage.is_empty());
    assert!(analysis.treatments.is_empty());
    assert!(!analysis.has_treatment_summary());
    assert_eq!(
        file_names(&unseen.outputs),
        vec![
            "manipulos_CM-A30-999999.csv",
            "tratamientos_CM-A30-999999.csv",
            "informe_resumen_CM-A30-999999.json",
            "informe_detallado_CM-A30-999999.json",
        ]
    );
    assert!(result.devices[1].error.is_none());
}

#[test]
fn colliding_file_names_fail_the_later_device() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    let output = dir.path().join("output");

    let result = run_analysis(
        &request(dir.path(), &["CM/A30", "CM_A30", DEVICE], Some(output.clone())),
        now(),
    )
    .expect("run");

    assert!(result.has_errors());
    assert!(result.devices[0].error.is_none());
    let later = &result.devices[1];
    assert!(later.analysis.is_none());
    assert!(later.outputs.is_empty());
    assert!(
        later
            .error
            .as_deref()
            .is_some_and(|error| error.contains("CM/A30"))
    );
    assert!(result.devices[2].error.is_none());
    assert!(output.join("manipulos_CM_A30.csv").is_file());
}

#[test]
fn repeated_device_reuses_analysis() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());

    let result = run_analysis(&request(dir.path(), &[DEVICE, DEVICE], None), now()).expect("run");

    assert_eq!(result.cache_misses, 1);
    assert_eq!(result.cache_hits, 1);
    assert_eq!(result.devices[0].analysis, result.devices[1].analysis);
}

#[test]
fn cutoff_before_floor_is_a_device_error() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    let mut request = request(dir.path(), &[DEVICE], None);
    request.cutoff = NaiveDate::from_ymd_opt(2022, 6, 1);

    let result = run_analysis(&request, now()).expect("run");

    assert!(result.has_errors());
    assert!(
        result.devices[0]
            .error
            .as_deref()
            .is_some_and(|error| error.contains("outside the allowed range"))
    );
}

#[test]
fn missing_source_fails_the_run() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    fs::remove_file(dir.path().join("treatments.csv")).expect("remove treatments");

    let error = run_analysis(&request(dir.path(), &[DEVICE], None), now())
        .expect_err("missing source");

    assert!(format!("{error:#}").contains("treatments.csv"));
}

// ============================================================================
// cutoff
// ============================================================================

#[test]
fn cutoff_uses_hint_or_floor() {
    let dir = TempDir::new().expect("temp dir");
    write_sources(dir.path());
    let layout = SourceLayout::default();

    let hinted = run_cutoff(dir.path(), &layout, DEVICE).expect("hinted cutoff");
    assert_eq!(hinted.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));

    let floor = run_cutoff(dir.path(), &layout, "CM-A30-000002").expect("floor cutoff");
    assert_eq!(floor.date_naive(), NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"));
}
