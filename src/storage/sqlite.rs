/// SQLite implementation of the entry store
///
/// This backend keeps the collection as a table with one row per date
/// (`date` first, then one column per record field). Saving rewrites the
/// whole table inside a single transaction.

use std::path::PathBuf;

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

use crate::domain::EntryCollection;
use crate::storage::tabular::{self, Cell, COLUMNS};
use crate::storage::{migrations, EntryStore, StorageError};

/// SQLite-based storage implementation
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn cell_to_sql(cell: Cell) -> SqlValue {
        match cell {
            Cell::Empty => SqlValue::Null,
            Cell::Integer(n) => SqlValue::Integer(n),
            Cell::Real(r) => SqlValue::Real(r),
            Cell::Text(s) => SqlValue::Text(s),
        }
    }

    fn sql_to_cell(value: SqlValue) -> Cell {
        match value {
            SqlValue::Null => Cell::Empty,
            SqlValue::Integer(n) => Cell::Integer(n),
            SqlValue::Real(r) => Cell::Real(r),
            SqlValue::Text(s) => Cell::Text(s),
            SqlValue::Blob(bytes) => Cell::Text(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

impl EntryStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn read_all(&self) -> Result<EntryCollection, StorageError> {
        let mut stmt = self.conn.prepare("SELECT * FROM entries")?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

        let mut rows = stmt.query([])?;
        let mut collection = EntryCollection::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let value: SqlValue = row.get(idx)?;
                cells.push((name.as_str(), Self::sql_to_cell(value)));
            }
            if let Some(record) = tabular::record_from_row(cells) {
                collection.insert(record);
            }
        }

        Ok(collection)
    }

    fn write_all(&self, collection: &EntryCollection) -> Result<(), StorageError> {
        let placeholders = (1..=COLUMNS.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO entries ({}) VALUES ({})",
            COLUMNS.join(", "),
            placeholders
        );

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM entries", [])?;
        {
            let mut stmt = tx.prepare(&insert_sql)?;
            for record in collection.records() {
                let row = tabular::record_to_row(record).into_iter().map(Self::cell_to_sql);
                stmt.execute(params_from_iter(row))?;
            }
        }
        tx.commit()?;

        tracing::debug!("Rewrote entries table with {} rows", collection.len());
        Ok(())
    }
}
