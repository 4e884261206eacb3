use anyhow::Result;
use chrono::Utc;
use comfy_table::Table;

use fhos_cli::analysis::{AnalyzeRequest, AnalyzeResult, run_analysis, run_cutoff};
use fhos_core::{classify_handpiece, format_for_display, parse_cutoff_date};
use fhos_model::{OutputFormat, SourceLayout};

use crate::cli::{AnalyzeArgs, ClassifyArgs, CutoffArgs, OutputFormatArg, SourceArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    let cutoff = args.cutoff.as_deref().map(parse_cutoff_date).transpose()?;
    let output_dir = if args.dry_run {
        None
    } else {
        Some(
            args.output_dir
                .clone()
                .unwrap_or_else(|| args.sources.data_dir.join("output")),
        )
    };
    let request = AnalyzeRequest {
        data_dir: args.sources.data_dir.clone(),
        layout: source_layout(&args.sources),
        dins: args.dins.clone(),
        cutoff,
        output_dir,
        format: output_format(args.format),
    };
    run_analysis(&request, Utc::now())
}

pub fn run_cutoff_command(args: &CutoffArgs) -> Result<()> {
    let cutoff = run_cutoff(&args.sources.data_dir, &source_layout(&args.sources), &args.din)?;
    println!("DIN: {}", args.din);
    println!(
        "Fecha de corte sugerida: {} ({})",
        cutoff.date_naive(),
        format_for_display(cutoff)
    );
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("ID"), header_cell("Tipo de manípulo")]);
    apply_table_style(&mut table);
    for id in &args.ids {
        table.add_row(vec![id.clone(), classify_handpiece(id).label().to_string()]);
    }
    println!("{table}");
}

fn source_layout(args: &SourceArgs) -> SourceLayout {
    SourceLayout {
        handpieces: args.handpieces.clone(),
        cutoff_hints: args.cutoff_hints.clone(),
        treatments: args.treatments.clone(),
        treatment_types: args.treatment_types.clone(),
    }
}

fn output_format(format: OutputFormatArg) -> OutputFormat {
    match format {
        OutputFormatArg::Csv => OutputFormat::Csv,
        OutputFormatArg::Json => OutputFormat::Json,
        OutputFormatArg::Both => OutputFormat::Both,
    }
}
