//! Semicolon-delimited text export of chart series

use crate::Result;
use crate::chart::{ChartData, ChartSeries, Metric};
use crate::render::format_number;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const UNKNOWN_PLACE: &str = "Unknown";

/// Write `series` in the export format:
///
/// ```text
/// City: Warszawa
///
/// Series: Temperatura [°C]
/// Time;Value
/// 13 czerwca 12:00;20.5
///
/// ```
pub fn write_export<W: Write>(
    writer: &mut W,
    place: Option<&str>,
    series: &[ChartSeries],
) -> Result<()> {
    let place = place.filter(|p| !p.trim().is_empty()).unwrap_or(UNKNOWN_PLACE);
    writeln!(writer, "City: {place}")?;
    writeln!(writer)?;

    for s in series {
        writeln!(writer, "Series: {}", s.name)?;
        writeln!(writer, "Time;Value")?;
        for (timestamp, value) in &s.points {
            writeln!(writer, "{};{}", timestamp, format_number(*value))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Create (or truncate) `path` and write the export into it
pub fn export_to_file(path: &Path, place: Option<&str>, series: &[ChartSeries]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_export(&mut writer, place, series)?;
    writer.flush()?;

    info!("Exported {} series to {}", series.len(), path.display());
    Ok(())
}

/// Export `metrics` of `chart`.
///
/// A directory `target` receives one file per metric under
/// [`default_file_name`]; any other path receives every metric in one file.
/// Returns the files written.
pub fn export_chart(target: &Path, chart: &ChartData, metrics: &[Metric]) -> Result<Vec<PathBuf>> {
    let place = Some(chart.place.as_str());

    if !target.is_dir() {
        let series: Vec<ChartSeries> = metrics.iter().map(|m| chart.series(*m)).collect();
        export_to_file(target, place, &series)?;
        return Ok(vec![target.to_path_buf()]);
    }

    let mut written = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let path = target.join(default_file_name(*metric, &chart.place, &chart.start, &chart.end));
        debug!("Exporting {} to {}", metric, path.display());
        export_to_file(&path, place, &[chart.series(*metric)])?;
        written.push(path);
    }
    Ok(written)
}

/// `<Metric>_<place>_from_<start>_to_<end>.txt`
#[must_use]
pub fn default_file_name(metric: Metric, place: &str, start: &str, end: &str) -> String {
    format!(
        "{}_{}_from_{}_to_{}.txt",
        metric.file_prefix(),
        sanitize(place, "unknown"),
        sanitize(start, "start"),
        sanitize(end, "end"),
    )
}

fn sanitize(part: &str, fallback: &str) -> String {
    let part = part.trim();
    if part.is_empty() {
        return fallback.to_string();
    }
    part.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(':', "-")
}
