// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation record CRUD operations.

use omniconvo_core::{ConversationRecord, OmniError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str =
    "SELECT id, model, scraped_at, created_at, source_html_bytes, views, content_key
     FROM conversations";

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationRecord> {
    Ok(ConversationRecord {
        id: row.get(0)?,
        model: row.get(1)?,
        scraped_at: row.get(2)?,
        created_at: row.get(3)?,
        source_html_bytes: row.get(4)?,
        views: row.get(5)?,
        content_key: row.get(6)?,
    })
}

/// Insert a fully-populated conversation record.
pub async fn insert_conversation(
    db: &Database,
    record: &ConversationRecord,
) -> Result<(), OmniError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversations
                 (id, model, scraped_at, created_at, source_html_bytes, views, content_key)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.model,
                    record.scraped_at,
                    record.created_at,
                    record.source_html_bytes,
                    record.views,
                    record.content_key,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a conversation record by ID.
pub async fn get_conversation(
    db: &Database,
    id: &str,
) -> Result<Option<ConversationRecord>, OmniError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            stmt.query_row(params![id], row_to_record).optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Increment the view counter and return the updated record.
///
/// The update and the read happen on the single writer thread inside one
/// transaction, so concurrent increments are never lost.
pub async fn increment_views(
    db: &Database,
    id: &str,
) -> Result<Option<ConversationRecord>, OmniError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE conversations SET views = views + 1 WHERE id = ?1",
                params![id],
            )?;
            if updated == 0 {
                return Ok(None);
            }
            let record = tx
                .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?
                .query_row(params![id], row_to_record)?;
            tx.commit()?;
            Ok(Some(record))
        })
        .await
        .map_err(map_tr_err)
}
