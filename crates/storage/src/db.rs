use std::path::Path;

use fardaria_core::PortfolioRecord;
use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

pub type DbPool = Pool<Sqlite>;

/// A stored record: what `PortfolioRecord` becomes once the store assigns
/// an id. Ids never travel through the CSV transfer paths.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioEntry {
    pub id: i64,
    #[serde(flatten)]
    pub record: PortfolioRecord,
    pub created_at: String,
}

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS portfolio (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            client TEXT,
            category TEXT,
            image_url TEXT,
            project_link TEXT,
            project_date TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            visible INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Bulk insert for a confirmed import batch. One transaction: either every
/// record lands or none do.
pub async fn insert_portfolio_records(
    pool: &DbPool,
    records: &[PortfolioRecord],
) -> Result<u64, sqlx::Error> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for record in records {
        sqlx::query(
            "INSERT INTO portfolio (title, description, client, category, image_url, project_link, project_date, sort_order, visible) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.client)
        .bind(&record.category)
        .bind(&record.image_url)
        .bind(&record.project_link)
        .bind(&record.project_date)
        .bind(record.order)
        .bind(record.visible as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("Inserted {} portfolio record(s)", records.len());
    Ok(records.len() as u64)
}

pub async fn insert_portfolio_record(
    pool: &DbPool,
    record: &PortfolioRecord,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO portfolio (title, description, client, category, image_url, project_link, project_date, sort_order, visible) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id"
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.client)
    .bind(&record.category)
    .bind(&record.image_url)
    .bind(&record.project_link)
    .bind(&record.project_date)
    .bind(record.order)
    .bind(record.visible as i64)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

type EntryRow = (
    i64,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
    i64,
    String,
);

fn entry_from_row(r: EntryRow) -> PortfolioEntry {
    PortfolioEntry {
        id: r.0,
        record: PortfolioRecord {
            title: r.1,
            description: r.2,
            client: r.3,
            category: r.4,
            image_url: r.5,
            project_link: r.6,
            project_date: r.7,
            order: r.8,
            visible: r.9 != 0,
        },
        created_at: r.10,
    }
}

const ENTRY_COLUMNS: &str = "id, title, description, client, category, image_url, project_link, project_date, sort_order, visible, created_at";

/// All records in admin-list order: `sort_order` ascending, insertion order
/// as the tiebreak.
pub async fn get_all_portfolio_records(pool: &DbPool) -> Result<Vec<PortfolioEntry>, sqlx::Error> {
    let rows: Vec<EntryRow> = sqlx::query_as(&format!(
        "SELECT {ENTRY_COLUMNS} FROM portfolio ORDER BY sort_order, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(entry_from_row).collect())
}

pub async fn get_portfolio_record(
    pool: &DbPool,
    id: i64,
) -> Result<Option<PortfolioEntry>, sqlx::Error> {
    let row: Option<EntryRow> = sqlx::query_as(&format!(
        "SELECT {ENTRY_COLUMNS} FROM portfolio WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(entry_from_row))
}

pub async fn update_portfolio_record(
    pool: &DbPool,
    id: i64,
    record: &PortfolioRecord,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE portfolio SET title = ?, description = ?, client = ?, category = ?, image_url = ?, project_link = ?, project_date = ?, sort_order = ?, visible = ? WHERE id = ?"
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.client)
    .bind(&record.category)
    .bind(&record.image_url)
    .bind(&record.project_link)
    .bind(&record.project_date)
    .bind(record.order)
    .bind(record.visible as i64)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_portfolio_record(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolio WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_record_visibility(
    pool: &DbPool,
    id: i64,
    visible: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE portfolio SET visible = ? WHERE id = ?")
        .bind(visible as i64)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_record_image(
    pool: &DbPool,
    id: i64,
    image_url: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE portfolio SET image_url = ? WHERE id = ?")
        .bind(image_url)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
