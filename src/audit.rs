//! Append-only trail of marketplace writes in `audit_logs`.

use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug)]
pub struct AuditEvent<'a> {
    pub user_id: Option<Uuid>,
    pub action: &'a str,
    pub resource: &'a str,
    pub metadata: Value,
}

pub async fn insert_event(pool: &DbPool, event: &AuditEvent<'_>) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event.user_id)
    .bind(event.action)
    .bind(event.resource)
    .bind(&event.metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an event by a known user; failures are logged and swallowed.
pub async fn record(pool: &DbPool, user_id: Uuid, action: &str, resource: &str, metadata: Value) {
    let event = AuditEvent {
        user_id: Some(user_id),
        action,
        resource,
        metadata,
    };
    write(pool, &event).await;
}

/// Same as [`record`] for events with no authenticated user, such as failed logins.
pub async fn record_anonymous(pool: &DbPool, action: &str, resource: &str, metadata: Value) {
    let event = AuditEvent {
        user_id: None,
        action,
        resource,
        metadata,
    };
    write(pool, &event).await;
}

async fn write(pool: &DbPool, event: &AuditEvent<'_>) {
    if let Err(err) = insert_event(pool, event).await {
        tracing::warn!(error = %err, action = event.action, "audit log failed");
    }
}
