//! Durable transcript storage.
//!
//! One row per conversation, keyed by chat id and owned by exactly one
//! user. Writes are last-writer-wins at the row level; per-conversation
//! serialization is the caller's concern (a `ChatState` value has a single
//! writer by ownership).

mod error;

use std::path::Path;

use chrono::{DateTime, Utc};
use hooper_chat::{Chat, ChatId, ChatState, Message, UserId};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension as _, params};
use tracing::{debug, trace};

pub use crate::error::Error;
use crate::error::Result;

/// SQLite-backed store for chat transcripts.
#[derive(Debug)]
pub struct ChatStore {
    conn: Mutex<Connection>,
}

impl ChatStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a transient in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS chats (
                id         TEXT PRIMARY KEY,
                title      TEXT NOT NULL,
                user_id    TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                messages   TEXT NOT NULL,
                share_path TEXT
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Commit the state of a completed turn, upserting by chat id.
    ///
    /// The first save sets `created_at` and the derived title; later saves
    /// replace `title` and `messages` while preserving `created_at` and
    /// `share_path`. The owner is fixed at first save: a save against a
    /// chat owned by a different user fails with [`Error::Unauthorized`].
    pub fn save(&self, state: &ChatState, owner: UserId) -> Result<Chat> {
        let title = state.title().ok_or(Error::NoUserMessage)?;
        let messages = serde_json::to_string(state.messages())?;

        let conn = self.conn.lock();
        let existing_owner = conn
            .query_row(
                "SELECT user_id FROM chats WHERE id = ?1",
                params![state.id().to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        if let Some(existing) = existing_owner {
            if existing != owner.to_string() {
                debug!(chat = %state.id(), "Save rejected: not the owner.");
                return Err(Error::Unauthorized);
            }
        }

        conn.execute(
            "INSERT INTO chats (id, title, user_id, created_at, messages)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 messages = excluded.messages",
            params![
                state.id().to_string(),
                title,
                owner.to_string(),
                Utc::now().timestamp_millis(),
                messages,
            ],
        )?;

        trace!(chat = %state.id(), messages = state.len(), "Saved chat.");
        row(&conn, state.id())?.ok_or(Error::NotFound)
    }

    /// Rebuild the in-progress state of a stored chat; owner-only.
    pub fn resume(&self, id: ChatId, requester: UserId) -> Result<ChatState> {
        self.get(id, requester).map(Chat::into_state)
    }

    /// Fetch a transcript; owner-only.
    pub fn get(&self, id: ChatId, requester: UserId) -> Result<Chat> {
        let conn = self.conn.lock();
        let chat = row(&conn, id)?.ok_or(Error::NotFound)?;

        if chat.user_id != requester {
            return Err(Error::Unauthorized);
        }

        Ok(chat)
    }

    /// Fetch a transcript anonymously via its share path.
    ///
    /// This is the sole anonymous-read path: it only matches transcripts
    /// the owner has explicitly shared.
    pub fn get_shared(&self, share_path: &str) -> Result<Chat> {
        let conn = self.conn.lock();
        let id = conn
            .query_row(
                "SELECT id FROM chats WHERE share_path = ?1",
                params![share_path],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or(Error::NotFound)?;

        let id = id
            .parse::<ChatId>()
            .map_err(|e| Error::Corrupt(e.to_string()))?;

        row(&conn, id)?.ok_or(Error::NotFound)
    }

    /// List the requester's transcripts, newest first.
    pub fn list(&self, owner: UserId) -> Result<Vec<Chat>> {
        let conn = self.conn.lock();
        let mut statement = conn.prepare(
            "SELECT id FROM chats WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;

        let ids = statement
            .query_map(params![owner.to_string()], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        ids.into_iter()
            .map(|id| {
                let id = id
                    .parse::<ChatId>()
                    .map_err(|e| Error::Corrupt(e.to_string()))?;
                row(&conn, id)?.ok_or(Error::NotFound)
            })
            .collect()
    }

    /// Mark a transcript shared and return its share path.
    ///
    /// Fails with [`Error::Unauthorized`] when the transcript does not
    /// exist or the requester is not the owner. Idempotent: re-sharing
    /// returns the same path without further mutation.
    pub fn share(&self, id: ChatId, requester: UserId) -> Result<String> {
        let conn = self.conn.lock();
        let chat = match row(&conn, id)? {
            Some(chat) if chat.user_id == requester => chat,
            _ => return Err(Error::Unauthorized),
        };

        if let Some(path) = chat.share_path {
            return Ok(path);
        }

        let path = Chat::share_path_for(id);
        conn.execute(
            "UPDATE chats SET share_path = ?1 WHERE id = ?2",
            params![path, id.to_string()],
        )?;

        debug!(chat = %id, %path, "Shared chat.");
        Ok(path)
    }

    /// Delete one transcript; owner-only.
    pub fn remove(&self, id: ChatId, requester: UserId) -> Result<()> {
        let conn = self.conn.lock();
        let chat = row(&conn, id)?.ok_or(Error::NotFound)?;

        if chat.user_id != requester {
            return Err(Error::Unauthorized);
        }

        conn.execute("DELETE FROM chats WHERE id = ?1", params![id.to_string()])?;
        debug!(chat = %id, "Removed chat.");
        Ok(())
    }

    /// Delete all of the requester's transcripts.
    pub fn clear(&self, owner: UserId) -> Result<()> {
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM chats WHERE user_id = ?1",
            params![owner.to_string()],
        )?;

        debug!(user = %owner, removed, "Cleared chats.");
        Ok(())
    }

}

fn row(conn: &Connection, id: ChatId) -> Result<Option<Chat>> {
    let row = conn
        .query_row(
            "SELECT id, title, user_id, created_at, messages, share_path
             FROM chats WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((id, title, user_id, created_at, messages, share_path)) = row else {
        return Ok(None);
    };

    let id = id
        .parse::<ChatId>()
        .map_err(|e| Error::Corrupt(e.to_string()))?;
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|e| Error::Corrupt(e.to_string()))?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at)
        .ok_or_else(|| Error::Corrupt(format!("invalid timestamp: {created_at}")))?;
    let messages: Vec<Message> = serde_json::from_str(&messages)?;

    Ok(Some(Chat {
        id,
        title,
        user_id,
        created_at,
        messages,
        share_path,
    }))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
