//! Report documents.
//!
//! A document is the content of one downloadable report: headings, the
//! explanatory text and the tables, with no page layout. Documents
//! serialize to JSON.

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame};
use serde::{Deserialize, Serialize};

use fhos_core::{DeviceAnalysis, format_for_display};
use fhos_model::SummaryDimension;

use crate::tables::{detail_frame, summary_frame, usage_frame};

pub const SUMMARY_TITLE: &str = "Análisis de Equipamiento FHOS";
pub const DETAIL_TITLE: &str = "Detalle de Tratamientos";
pub const HANDPIECE_HEADING: &str = "Análisis de Manípulos";

const SUMMARY_INTRO: &str = "Este informe contiene datos de los equipos RAMASON FHOS desde el 1 de \
    enero de 2023. Estos datos son más precisos conforme más actualizados sean ya que dichos \
    equipos han tenido diversas actualizaciones que han mejorado la categorización, precisión y \
    optimización de dichos datos.";

const HANDPIECE_NOTE: &str = "A continuación aparecerán todos los manípulos que han sido \
    conectados a tu equipo. Si ves muchos manípulos conectados en un periodo corto de fechas esto \
    se debe a que un técnico de servicio técnico ha conectado diversos manípulos al equipo para \
    realizar pruebas de conexión y potencia. Los primeros dos manípulos que aparecen serán los de \
    tu equipo en este caso. La \"fecha_uso\" es la última fecha en la que el equipo reportó ese \
    manípulo al sistema en la nube. El \"estado\" se fija en \"ACTIVO\" si el manípulo ha sido \
    usado en el último mes desde la fecha del informe.";

const PRICING_NOTE: &str = "Se fija un precio de 25€ por depilación de media, de 60€ por \
    tratamiento FHOS de media y de 50€ por tratamientos de FHOS Carbón Activo. En el caso de FHOS \
    solo se computa la primera secuencia o subprograma de un tratamiento (ej. Activación) no la \
    continuación para no inflar los datos (ej. Estimulación no computaría).";

const DETAIL_INTRO: &str = "Esta tabla resume los tratamientos realizados con el equipo. Si en un \
    tratamiento sales del mismo para, por ejemplo, cambiar el fototipo o algún otro parámetro, \
    dicho tratamiento se volverá a iniciar y contabilizará dos veces. Los tratamientos de FHOS \
    tienen múltiples subprogramas que se detallan como tratamientos individuales (activación, \
    estimulación, etc.). Las duraciones se expresan en minutos.";

/// A table with its column names, cells as JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ReportTable {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let columns = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows = Vec::with_capacity(df.height());
        for index in 0..df.height() {
            let mut row = Vec::with_capacity(df.width());
            for column in df.get_columns() {
                row.push(json_cell(&column.get(index)?));
            }
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }
}

fn json_cell(value: &AnyValue<'_>) -> serde_json::Value {
    use serde_json::Value;
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(*v),
        AnyValue::String(s) => Value::String((*s).to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        AnyValue::Float32(v) => serde_json::Number::from_f64(f64::from(*v))
            .map_or(Value::Null, Value::Number),
        AnyValue::Float64(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        other => Value::String(other.to_string()),
    }
}

/// One headed section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
    pub table: ReportTable,
}

/// Content of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub din: String,
    /// Cutoff in display format.
    pub cutoff: String,
    pub paragraphs: Vec<String>,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

/// The equipment summary report: handpieces, then the three treatment
/// summaries when any treatment was counted.
pub fn summary_report(analysis: &DeviceAnalysis) -> Result<ReportDocument> {
    let mut sections = vec![ReportSection {
        heading: HANDPIECE_HEADING.to_string(),
        paragraphs: vec![HANDPIECE_NOTE.to_string()],
        table: ReportTable::from_frame(&usage_frame(&analysis.usage)?)?,
    }];
    if analysis.has_treatment_summary() {
        for summary in &analysis.summaries {
            let paragraphs = if summary.dimension == SummaryDimension::Category {
                vec![PRICING_NOTE.to_string()]
            } else {
                Vec::new()
            };
            sections.push(ReportSection {
                heading: summary.dimension.title().to_string(),
                paragraphs,
                table: ReportTable::from_frame(&summary_frame(summary)?)?,
            });
        }
    }
    Ok(ReportDocument {
        title: SUMMARY_TITLE.to_string(),
        din: analysis.context.din.clone(),
        cutoff: format_for_display(analysis.context.cutoff),
        paragraphs: vec![SUMMARY_INTRO.to_string()],
        sections,
    })
}

/// The treatment detail report.
pub fn detail_report(analysis: &DeviceAnalysis) -> Result<ReportDocument> {
    Ok(ReportDocument {
        title: DETAIL_TITLE.to_string(),
        din: analysis.context.din.clone(),
        cutoff: format_for_display(analysis.context.cutoff),
        paragraphs: vec![DETAIL_INTRO.to_string()],
        sections: vec![ReportSection {
            heading: DETAIL_TITLE.to_string(),
            paragraphs: Vec::new(),
            table: ReportTable::from_frame(&detail_frame(&analysis.treatments)?)?,
        }],
    })
}
