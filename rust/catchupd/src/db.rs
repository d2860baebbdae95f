use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudentRow {
    pub id: i64,
    pub name: String,
}

/// One catch-up as stored for a single student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUpRow {
    pub date: String,
    pub lesson_missed: Option<String>,
}

/// One catch-up joined with its student's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedCatchUpRow {
    pub student_name: String,
    pub date: String,
    pub student_id: i64,
    pub lesson_missed: Option<String>,
}

/// Handle to the catch-up database.
///
/// Holds only the file path. Every operation opens its own connection and
/// drops it before returning, so a `Store` is cheap to clone into request
/// handlers and never shares a connection across requests.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens (creating if needed) the database at `path` and brings the schema
    /// up to date. Safe to call on an existing database.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let store = Self { path: path.into() };
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.to_string_lossy())
                })?;
            }
        }
        let conn = store.connect()?;
        init_schema(&conn)?;
        info!(path = %store.path.display(), "catch-up database ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("failed to open database {}", self.path.to_string_lossy()))?;
        // The bundled SQLite enforces foreign keys by default; catch-ups must
        // still be accepted for unregistered student ids.
        conn.execute("PRAGMA foreign_keys = OFF", [])?;
        Ok(conn)
    }

    /// Inserts the student unless the name is already taken. Returns whether a
    /// row was written.
    pub fn create_student(&self, name: &str) -> anyhow::Result<bool> {
        let conn = self.connect()?;
        let changed = conn
            .execute("INSERT OR IGNORE INTO students(name) VALUES (?)", [name])
            .context("insert student")?;
        Ok(changed > 0)
    }

    pub fn list_students(&self) -> anyhow::Result<Vec<StudentRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, name FROM students ORDER BY id")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(StudentRow {
                    id: r.get(0)?,
                    name: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("list students")?;
        debug!(count = rows.len(), "listed students");
        Ok(rows)
    }

    /// Records a catch-up. The student id is not checked against `students`.
    pub fn create_catchup(
        &self,
        student_id: i64,
        date: &str,
        lesson_missed: &str,
    ) -> anyhow::Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO catchups(student_id, date, lesson_missed) VALUES (?, ?, ?)",
            (student_id, date, lesson_missed),
        )
        .context("insert catch-up")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_student_by_name(&self, name: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.connect()?;
        conn.query_row("SELECT id FROM students WHERE name = ?", [name], |r| {
            r.get(0)
        })
        .optional()
        .context("find student by name")
    }

    /// Catch-ups of one student in the order they were recorded.
    pub fn list_catchups_for_student(&self, student_id: i64) -> anyhow::Result<Vec<CatchUpRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT date, lesson_missed FROM catchups WHERE student_id = ? ORDER BY id",
        )?;
        let rows = stmt
            .query_map([student_id], |r| {
                Ok(CatchUpRow {
                    date: r.get(0)?,
                    lesson_missed: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("list catch-ups for student")?;
        Ok(rows)
    }

    /// Every catch-up that belongs to a known student, oldest date first.
    pub fn list_all_catchups_joined(&self) -> anyhow::Result<Vec<JoinedCatchUpRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT s.name, c.date, c.student_id, c.lesson_missed
             FROM students s
             JOIN catchups c ON s.id = c.student_id
             ORDER BY c.date, c.id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(JoinedCatchUpRow {
                    student_name: r.get(0)?,
                    date: r.get(1)?,
                    student_id: r.get(2)?,
                    lesson_missed: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("list all catch-ups")?;
        debug!(count = rows.len(), "listed all catch-ups");
        Ok(rows)
    }
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS catchups(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER,
            date TEXT,
            lesson_missed TEXT,
            FOREIGN KEY(student_id) REFERENCES students(id)
        )",
        [],
    )?;

    // Databases from before lesson tracking have catchups without lesson_missed.
    ensure_catchups_lesson_missed(conn)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_catchups_student ON catchups(student_id)",
        [],
    )?;
    Ok(())
}

fn ensure_catchups_lesson_missed(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "catchups", "lesson_missed")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE catchups ADD COLUMN lesson_missed TEXT", [])?;
    info!("added catchups.lesson_missed column");
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
