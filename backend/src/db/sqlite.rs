use super::{Agent, AgentDirectory, Assignment, AssignmentStore, NewAssignment};
use crate::error::StoreError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS agents (
    seq     INTEGER PRIMARY KEY AUTOINCREMENT,
    id      TEXT NOT NULL UNIQUE,
    name    TEXT NOT NULL,
    email   TEXT NOT NULL UNIQUE,
    mobile  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS list_items (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL UNIQUE,
    first_name  TEXT NOT NULL,
    phone       TEXT NOT NULL,
    notes       TEXT NOT NULL DEFAULT '',
    assigned_to TEXT NOT NULL REFERENCES agents(id)
);

CREATE INDEX IF NOT EXISTS idx_list_items_assigned_to ON list_items(assigned_to);
";

const AGENT_COLUMNS: &str = "seq, id, name, email, mobile";
const ITEM_COLUMNS: &str = "id, first_name, phone, notes, assigned_to";

/// SQLite implementation of both collaborators.
///
/// All access goes through one connection behind a mutex, so writes from
/// concurrent uploads are serialized rather than interleaved.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Registers a new agent. Inputs are expected to be validated already.
    pub fn create_agent(&self, name: &str, email: &str, mobile: &str) -> Result<Agent, StoreError> {
        let conn = self.lock()?;
        ensure_email_free(&conn, email, None)?;

        let id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO agents (id, name, email, mobile) VALUES (?1, ?2, ?3, ?4)",
            params![id, name, email, mobile],
        )?;

        Ok(Agent {
            seq: conn.last_insert_rowid(),
            id,
            name: name.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
        })
    }

    /// Overwrites name, email and mobile of an existing agent.
    pub fn update_agent(&self, agent: &Agent) -> Result<Agent, StoreError> {
        let conn = self.lock()?;
        ensure_email_free(&conn, &agent.email, Some(&agent.id))?;

        let changed = conn.execute(
            "UPDATE agents SET name = ?1, email = ?2, mobile = ?3 WHERE id = ?4",
            params![agent.name, agent.email, agent.mobile, agent.id],
        )?;
        if changed == 0 {
            return Err(agent_not_found(&agent.id));
        }
        fetch_agent(&conn, &agent.id)
    }

    /// Removes an agent in one transaction, together with any item still
    /// assigned to it. Returns the number of items removed here.
    pub fn delete_agent(&self, id: &str) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        fetch_agent(&tx, id)?;
        let removed = delete_items_of(&tx, id)?;
        tx.execute("DELETE FROM agents WHERE id = ?1", params![id])?;
        tx.commit()?;

        debug!("deleted agent {} and {} assigned items", id, removed);
        Ok(removed)
    }
}

impl AgentDirectory for SqliteStore {
    fn list_agents(&self) -> Result<Vec<Agent>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agents ORDER BY seq ASC",
            AGENT_COLUMNS
        ))?;
        let agents = stmt
            .query_map([], agent_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(agents)
    }

    fn get_agent(&self, id: &str) -> Result<Agent, StoreError> {
        let conn = self.lock()?;
        fetch_agent(&conn, id)
    }
}

impl AssignmentStore for SqliteStore {
    fn insert_batch(&self, records: &[NewAssignment]) -> Result<Vec<Assignment>, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut saved = Vec::with_capacity(records.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO list_items (id, first_name, phone, notes, assigned_to)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                let id = Uuid::new_v4().to_string();
                stmt.execute(params![
                    id,
                    record.first_name,
                    record.phone,
                    record.notes,
                    record.assigned_to
                ])?;
                saved.push(Assignment {
                    id,
                    first_name: record.first_name.clone(),
                    phone: record.phone.clone(),
                    notes: record.notes.clone(),
                    assigned_to: record.assigned_to.clone(),
                });
            }
        }

        // Dropping `tx` on any early return above rolls the batch back.
        tx.commit()?;
        Ok(saved)
    }

    fn find_all(&self) -> Result<Vec<Assignment>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM list_items ORDER BY seq ASC",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map([], assignment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM list_items WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound {
                entity: "List item",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn delete_by_agent(&self, agent_id: &str) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        delete_items_of(&conn, agent_id)
    }
}

fn agent_not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        entity: "Agent",
        id: id.to_string(),
    }
}

fn fetch_agent(conn: &Connection, id: &str) -> Result<Agent, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM agents WHERE id = ?1", AGENT_COLUMNS),
        params![id],
        agent_from_row,
    )
    .optional()?
    .ok_or_else(|| agent_not_found(id))
}

fn ensure_email_free(conn: &Connection, email: &str, except_id: Option<&str>) -> Result<(), StoreError> {
    let taken: Option<String> = conn
        .query_row(
            "SELECT id FROM agents WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )
        .optional()?;

    match taken {
        Some(owner) if Some(owner.as_str()) != except_id => {
            Err(StoreError::DuplicateEmail(email.to_string()))
        }
        _ => Ok(()),
    }
}

fn delete_items_of(conn: &Connection, agent_id: &str) -> Result<usize, StoreError> {
    Ok(conn.execute(
        "DELETE FROM list_items WHERE assigned_to = ?1",
        params![agent_id],
    )?)
}

fn agent_from_row(row: &Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        seq: row.get(0)?,
        id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        mobile: row.get(4)?,
    })
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: row.get(0)?,
        first_name: row.get(1)?,
        phone: row.get(2)?,
        notes: row.get(3)?,
        assigned_to: row.get(4)?,
    })
}
