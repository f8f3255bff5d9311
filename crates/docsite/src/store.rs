//! SQLite-backed data source
//!
//! Every query runs synchronously against a single connection guarded by a
//! mutex. Async callers go through [`Store::run`], which moves the work onto
//! the blocking thread pool.

use crate::error::{Error, StoreResult};
use docsite_core::directory::PackageInfo;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS units (
    path        TEXT NOT NULL,
    module_path TEXT NOT NULL,
    version     TEXT NOT NULL,
    name        TEXT,
    synopsis    TEXT NOT NULL DEFAULT '',
    is_latest   INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (path, version)
);
CREATE INDEX IF NOT EXISTS units_by_module ON units (module_path, version);
CREATE TABLE IF NOT EXISTS imports (
    from_path TEXT NOT NULL,
    to_path   TEXT NOT NULL,
    PRIMARY KEY (from_path, to_path)
);
CREATE INDEX IF NOT EXISTS imports_by_target ON imports (to_path);
";

/// A package, command, directory, or module at one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub path: String,
    pub module_path: String,
    pub version: String,
    /// Package name; absent for directories and modules without a root package
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default = "default_true")]
    pub is_latest: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub from: String,
    pub to: String,
}

/// Fixture file loaded by `docsite init --fixtures`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub units: Vec<UnitRecord>,
    #[serde(default)]
    pub imports: Vec<ImportRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub path: String,
    pub name: String,
    pub module_path: String,
    pub version: String,
    pub synopsis: String,
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        log::debug!("opened store at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Store("connection mutex poisoned".to_string()))
    }

    /// Run `f` on the blocking thread pool
    pub async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Store) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| Error::Store(format!("blocking task failed: {e}")))?
    }

    pub fn migrate(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert fixtures, replacing rows with the same key
    pub fn seed(&self, fixtures: &Fixtures) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut insert_unit = tx.prepare(
                "INSERT OR REPLACE INTO units
                 (path, module_path, version, name, synopsis, is_latest)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for unit in &fixtures.units {
                insert_unit.execute(params![
                    unit.path,
                    unit.module_path,
                    unit.version,
                    unit.name,
                    unit.synopsis,
                    unit.is_latest,
                ])?;
            }

            let mut insert_import =
                tx.prepare("INSERT OR IGNORE INTO imports (from_path, to_path) VALUES (?1, ?2)")?;
            for import in &fixtures.imports {
                insert_import.execute(params![import.from, import.to])?;
            }
        }
        tx.commit()?;

        log::info!(
            "seeded {} units and {} imports",
            fixtures.units.len(),
            fixtures.imports.len()
        );
        Ok(())
    }

    /// Look up a unit at `version`, or at its latest version
    pub fn unit(&self, path: &str, version: Option<&str>) -> StoreResult<Option<UnitRecord>> {
        let conn = self.conn()?;
        let row = match version {
            Some(version) => conn
                .query_row(
                    "SELECT path, module_path, version, name, synopsis, is_latest
                     FROM units WHERE path = ?1 AND version = ?2",
                    params![path, version],
                    unit_from_row,
                )
                .optional()?,
            None => conn
                .query_row(
                    "SELECT path, module_path, version, name, synopsis, is_latest
                     FROM units WHERE path = ?1
                     ORDER BY is_latest DESC, version DESC LIMIT 1",
                    params![path],
                    unit_from_row,
                )
                .optional()?,
        };
        Ok(row)
    }

    /// Packages of `module_path@version` at or below `unit_path`, ordered by path
    pub fn subdirectories(
        &self,
        unit_path: &str,
        module_path: &str,
        version: &str,
    ) -> StoreResult<Vec<PackageInfo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, name, synopsis FROM units
             WHERE module_path = ?1 AND version = ?2 AND name IS NOT NULL
               AND (path = ?3 OR substr(path, 1, length(?3) + 1) = ?3 || '/')
             ORDER BY path",
        )?;
        let rows = stmt.query_map(params![module_path, version, unit_path], |row| {
            Ok(PackageInfo {
                path: row.get(0)?,
                name: row.get(1)?,
                synopsis: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Paths of the modules nested below `unit_path`, ordered by path
    pub fn nested_modules(&self, unit_path: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT module_path FROM units
             WHERE is_latest = 1
               AND substr(module_path, 1, length(?1) + 1) = ?1 || '/'
             ORDER BY module_path",
        )?;
        let rows = stmt.query_map(params![unit_path], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    /// Latest packages whose path or synopsis contains `query`
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> StoreResult<Vec<SearchResult>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT path, name, module_path, version, synopsis FROM units
             WHERE is_latest = 1 AND name IS NOT NULL
               AND (instr(lower(path), lower(?1)) > 0 OR instr(lower(synopsis), lower(?1)) > 0)
             ORDER BY length(path), path
             LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt.query_map(params![query, limit as i64, offset as i64], |row| {
            Ok(SearchResult {
                path: row.get(0)?,
                name: row.get(1)?,
                module_path: row.get(2)?,
                version: row.get(3)?,
                synopsis: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Number of search matches, counted up to `cap`
    pub fn search_count(&self, query: &str, cap: usize) -> StoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (
                SELECT 1 FROM units
                WHERE is_latest = 1 AND name IS NOT NULL
                  AND (instr(lower(path), lower(?1)) > 0 OR instr(lower(synopsis), lower(?1)) > 0)
                LIMIT ?2
             )",
            params![query, cap as i64],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Paths of the packages importing `path`, at most `limit` of them
    pub fn imported_by(&self, path: &str, limit: usize) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT from_path FROM imports
             WHERE to_path = ?1 ORDER BY from_path LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![path, limit as i64], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    /// Number of importers of `path`, counted up to `limit`
    pub fn imported_by_count(&self, path: &str, limit: usize) -> StoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (SELECT 1 FROM imports WHERE to_path = ?1 LIMIT ?2)",
            params![path, limit as i64],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn unit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UnitRecord> {
    Ok(UnitRecord {
        path: row.get(0)?,
        module_path: row.get(1)?,
        version: row.get(2)?,
        name: row.get(3)?,
        synopsis: row.get(4)?,
        is_latest: row.get(5)?,
    })
}

/// Fixture data shared by the tests of the shell crate
#[cfg(test)]
pub(crate) mod testdata {
    use super::*;

    pub fn unit(path: &str, module_path: &str, version: &str, name: Option<&str>) -> UnitRecord {
        UnitRecord {
            path: path.to_string(),
            module_path: module_path.to_string(),
            version: version.to_string(),
            name: name.map(str::to_string),
            synopsis: format!("Synopsis of {path}."),
            is_latest: true,
        }
    }

    pub fn import(from: &str, to: &str) -> ImportRecord {
        ImportRecord {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn fixtures() -> Fixtures {
        let mut old = unit("example.com/web", "example.com/web", "v0.9.0", None);
        old.is_latest = false;

        Fixtures {
            units: vec![
                old,
                unit("example.com/web", "example.com/web", "v1.2.0", None),
                unit("example.com/web/router", "example.com/web", "v1.2.0", Some("router")),
                unit("example.com/web/router/trie", "example.com/web", "v1.2.0", Some("trie")),
                unit("example.com/web/internal/pool", "example.com/web", "v1.2.0", Some("pool")),
                unit("example.com/web/cmd/webd", "example.com/web", "v1.2.0", Some("main")),
                unit("example.com/web/middleware", "example.com/web", "v1.2.0", None),
                unit("example.com/web/middleware/auth", "example.com/web", "v1.2.0", Some("auth")),
                unit("example.com/web/tools", "example.com/web/tools", "v0.1.0", None),
                unit("example.com/web/tools/lint", "example.com/web/tools", "v0.1.0", Some("lint")),
                unit("example.com/other", "example.com/other", "v2.0.0", Some("other")),
            ],
            imports: vec![
                import("example.com/other", "example.com/web/router"),
                import("example.com/web/cmd/webd", "example.com/web/router"),
                import("example.com/web/middleware/auth", "example.com/web/router"),
            ],
        }
    }

    pub fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        store.seed(&fixtures()).unwrap();
        store
    }
}
