use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{Wine, WineType, WishlistEntry};
use crate::error::AppResult;

/// The Library manages the SQLite catalog database.
/// It stores the wishlist flags and the user's cellar with tasting notes.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog at `db_path` and initialize the schema.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!(path = %db_path.display(), "📁 catalog opened");

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Catalog that lives only as long as this value. Used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Creates all tables if they don't exist.
    fn init_schema(&self) -> SqlResult<()> {
        // One row per product position, seeded on first run
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS wishlist (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                wishlist        INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS cellar (
                wineindex       INTEGER PRIMARY KEY,
                name            TEXT NOT NULL,
                year            TEXT NOT NULL DEFAULT '',
                price           TEXT NOT NULL DEFAULT '',
                alcohol         TEXT NOT NULL DEFAULT '',
                type            TEXT NOT NULL DEFAULT 'Red',
                sugar           REAL NOT NULL DEFAULT 0,
                body            REAL NOT NULL DEFAULT 0,
                tannin          REAL NOT NULL DEFAULT 0,
                ph              REAL NOT NULL DEFAULT 0,
                note            TEXT NOT NULL DEFAULT '',
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        debug!("catalog schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    // ========== Wishlist ==========

    /// All wishlist rows in id order
    pub fn query_all(&self) -> SqlResult<Vec<WishlistEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, wishlist FROM wishlist ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(WishlistEntry {
                id: row.get(0)?,
                liked: row.get(1)?,
            })
        })?;

        rows.collect()
    }

    /// Append a row and return its id
    pub fn insert(&self, liked: i64) -> SqlResult<i64> {
        self.conn
            .execute("INSERT INTO wishlist (wishlist) VALUES (?1)", params![liked])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite the flag of row `id`. Returns the number of rows touched.
    pub fn update(&self, liked: i64, id: i64) -> SqlResult<usize> {
        self.conn.execute(
            "UPDATE wishlist SET wishlist = ?1 WHERE id = ?2",
            params![liked, id],
        )
    }

    // ========== Cellar ==========

    pub fn insert_wine(&self, wine: &Wine) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO cellar
                (wineindex, name, year, price, alcohol, type, sugar, body, tannin, ph, note, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                wine.wine_index,
                wine.name,
                wine.year,
                wine.price,
                wine.alcohol,
                wine.wine_type.as_str(),
                wine.sugar,
                wine.body,
                wine.tannin,
                wine.ph,
                wine.note,
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite the cellar row for `wine.wine_index`.
    /// Returns false when no such row exists.
    pub fn update_wine(&self, wine: &Wine) -> SqlResult<bool> {
        let changed = self.conn.execute(
            "UPDATE cellar SET
                name = ?2, year = ?3, price = ?4, alcohol = ?5, type = ?6,
                sugar = ?7, body = ?8, tannin = ?9, ph = ?10, note = ?11, updated_at = ?12
             WHERE wineindex = ?1",
            params![
                wine.wine_index,
                wine.name,
                wine.year,
                wine.price,
                wine.alcohol,
                wine.wine_type.as_str(),
                wine.sugar,
                wine.body,
                wine.tannin,
                wine.ph,
                wine.note,
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn get_wine(&self, wine_index: i64) -> SqlResult<Option<Wine>> {
        self.conn
            .query_row(
                "SELECT wineindex, name, year, price, alcohol, type, sugar, body, tannin, ph, note
                 FROM cellar WHERE wineindex = ?1",
                params![wine_index],
                wine_from_row,
            )
            .optional()
    }

    /// Whole cellar, most recently touched first
    pub fn all_wines(&self) -> SqlResult<Vec<Wine>> {
        let mut stmt = self.conn.prepare(
            "SELECT wineindex, name, year, price, alcohol, type, sugar, body, tannin, ph, note
             FROM cellar ORDER BY updated_at DESC, wineindex",
        )?;

        let rows = stmt.query_map([], wine_from_row)?;
        rows.collect()
    }
}

fn wine_from_row(row: &Row<'_>) -> SqlResult<Wine> {
    let wine_type: String = row.get(5)?;
    Ok(Wine {
        wine_index: row.get(0)?,
        name: row.get(1)?,
        year: row.get(2)?,
        price: row.get(3)?,
        alcohol: row.get(4)?,
        wine_type: WineType::parse(&wine_type),
        sugar: row.get(6)?,
        body: row.get(7)?,
        tannin: row.get(8)?,
        ph: row.get(9)?,
        note: row.get(10)?,
    })
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
