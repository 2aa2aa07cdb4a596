use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fardaria_core::PortfolioRecord;

use crate::TransferError;

/// Fixed export column order. The parser accepts these in any order; the
/// serializer always emits all nine.
pub const EXPORT_HEADERS: [&str; 9] = [
    "titulo",
    "descricao",
    "cliente",
    "categoria",
    "imagem_url",
    "link_projeto",
    "data_projeto",
    "ordem",
    "visivel",
];

fn record_fields(r: &PortfolioRecord) -> [String; 9] {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        r.title.clone(),
        opt(&r.description),
        opt(&r.client),
        opt(&r.category),
        opt(&r.image_url),
        opt(&r.project_link),
        opt(&r.project_date),
        r.order.to_string(),
        r.visible.to_string(),
    ]
}

/// Serialize records to CSV text: the fixed header row followed by one row
/// per record in input order. Fields are quoted only when they contain a
/// comma, quote, or newline; absent optionals become empty fields.
pub fn to_csv(records: &[PortfolioRecord]) -> Result<String, TransferError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(EXPORT_HEADERS)?;
        for record in records {
            writer.write_record(record_fields(record))?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("portfolio_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `portfolio_YYYY-MM-DD.csv` into `dir` and return its path.
///
/// An empty record set writes nothing and returns `None`; that is a no-op,
/// not an error.
pub fn write_export(
    records: &[PortfolioRecord],
    dir: &Path,
    date: NaiveDate,
) -> Result<Option<PathBuf>, TransferError> {
    if records.is_empty() {
        tracing::debug!("Export requested with no records, skipping");
        return Ok(None);
    }

    let path = dir.join(export_filename(date));
    std::fs::write(&path, to_csv(records)?)?;
    tracing::info!("Exported {} record(s) to {}", records.len(), path.display());
    Ok(Some(path))
}
