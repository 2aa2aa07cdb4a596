use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use fardaria_core::{ParsedRow, PortfolioRecord};
use fardaria_storage::DbPool;
use fardaria_transfer::ImportSession;

/// Upload → preview → confirm → bulk insert.
///
/// Structural CSV errors abort before any preview. Rows rejected by
/// validation are shown with their reason but never inserted. A store
/// failure means nothing was imported (the insert is one transaction).
pub async fn import(db: &DbPool, file: &Path, assume_yes: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;

    let mut session = ImportSession::new();
    if let Err(e) = session.load(&content) {
        bail!("CSV rejected: {e}");
    }

    print_preview(session.rows());
    println!(
        "{} valid, {} with errors",
        session.valid_count(),
        session.error_count()
    );

    if !session.can_confirm() {
        session.cancel();
        bail!("no valid rows to import");
    }

    if !assume_yes {
        let go = confirm(&format!("Import {} record(s)?", session.valid_count()))?;
        if !go {
            session.cancel();
            println!("Import cancelled, nothing written");
            return Ok(());
        }
    }

    let batch = session.importable();
    let inserted = fardaria_storage::insert_portfolio_records(db, &batch)
        .await
        .context("bulk insert failed; no records were imported")?;
    session.complete();
    println!("Imported {inserted} record(s)");
    Ok(())
}

fn print_preview(rows: &[ParsedRow]) {
    println!(
        "{:>3}  {:<30} {:<20} {:<16} estado",
        "#", "titulo", "cliente", "categoria"
    );
    for (index, row) in rows.iter().enumerate() {
        let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}  {:<30} {:<20} {:<16} {}",
            index + 1,
            if row.record.title.is_empty() { "-" } else { row.record.title.as_str() },
            dash(&row.record.client),
            dash(&row.record.category),
            row.error.as_deref().unwrap_or("ok")
        );
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

pub async fn export(db: &DbPool, out_dir: &Path) -> anyhow::Result<()> {
    let entries = fardaria_storage::get_all_portfolio_records(db).await?;
    let records: Vec<PortfolioRecord> = entries.into_iter().map(|e| e.record).collect();

    std::fs::create_dir_all(out_dir)?;
    let today = chrono::Local::now().date_naive();
    match fardaria_transfer::write_export(&records, out_dir, today)? {
        Some(path) => println!("Exported {} record(s) to {}", records.len(), path.display()),
        None => println!("Nothing to export"),
    }
    Ok(())
}

pub async fn list(db: &DbPool, json: bool) -> anyhow::Result<()> {
    let entries = fardaria_storage::get_all_portfolio_records(db).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No portfolio records yet");
        return Ok(());
    }

    println!(
        "{:>5} {:>6}  {:<30} {:<20} {:<16} visivel",
        "id", "ordem", "titulo", "cliente", "categoria"
    );
    for entry in &entries {
        let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5} {:>6}  {:<30} {:<20} {:<16} {}",
            entry.id,
            entry.record.order,
            entry.record.title,
            dash(&entry.record.client),
            dash(&entry.record.category),
            if entry.record.visible { "sim" } else { "nao" }
        );
    }
    Ok(())
}

pub async fn add(db: &DbPool, record: PortfolioRecord) -> anyhow::Result<()> {
    if let Some(error) = record.validation_error() {
        bail!("{error}");
    }
    let id = fardaria_storage::insert_portfolio_record(db, &record).await?;
    println!("Created record {id}: {}", record.title);
    Ok(())
}

pub async fn remove(db: &DbPool, id: i64, assume_yes: bool) -> anyhow::Result<()> {
    let entry = fardaria_storage::get_portfolio_record(db, id)
        .await?
        .with_context(|| format!("no record with id {id}"))?;

    if !assume_yes && !confirm(&format!("Delete \"{}\"? This cannot be undone.", entry.record.title))? {
        println!("Nothing deleted");
        return Ok(());
    }

    fardaria_storage::delete_portfolio_record(db, id).await?;
    println!("Deleted record {id}");
    Ok(())
}

pub async fn set_visibility(db: &DbPool, id: i64, visible: bool) -> anyhow::Result<()> {
    if !fardaria_storage::set_record_visibility(db, id, visible).await? {
        bail!("no record with id {id}");
    }
    println!(
        "Record {id} is now {}",
        if visible { "visible" } else { "hidden" }
    );
    Ok(())
}

pub async fn attach_image(
    db: &DbPool,
    images_dir: &Path,
    id: i64,
    file: &Path,
) -> anyhow::Result<()> {
    if fardaria_storage::get_portfolio_record(db, id).await?.is_none() {
        bail!("no record with id {id}");
    }

    let stored = fardaria_media::store_upload(images_dir, file)
        .with_context(|| format!("image rejected: {}", file.display()))?;
    fardaria_storage::set_record_image(db, id, Some(&stored.to_string_lossy())).await?;

    println!("Attached {} to record {id}", stored.display());
    Ok(())
}
