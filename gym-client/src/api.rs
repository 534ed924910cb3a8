//! Member service - the data access operations
//!
//! `members` and `deleteHistory` are two independent collections on the
//! data service. Delete and restore each move a record between them in two
//! HTTP calls; the second call is retried and, if it keeps failing, the
//! first is rolled back so neither collection is left half-updated.

use crate::{ClientConfig, ClientError, ClientResult, HttpClient};
use shared::{DeletedMemberPayload, DeletedMemberRecord, Member, MemberPayload};
use std::time::Duration;

const MEMBERS: &str = "/members";
const DELETE_HISTORY: &str = "/deleteHistory";

/// Data access layer over the remote member store
#[derive(Debug, Clone)]
pub struct MemberService {
    http: HttpClient,
    retry_attempts: u32,
}

impl MemberService {
    /// Create a new service from configuration
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            retry_attempts: config.retry_attempts,
        }
    }

    /// List all members, in service order
    pub async fn fetch_members(&self) -> ClientResult<Vec<Member>> {
        self.http.get(MEMBERS).await
    }

    /// List the full deletion history, in service order
    pub async fn fetch_delete_history(&self) -> ClientResult<Vec<DeletedMemberRecord>> {
        self.http.get(DELETE_HISTORY).await
    }

    /// Create a member; the service assigns the id
    pub async fn add_member(&self, payload: &MemberPayload) -> ClientResult<Member> {
        payload.validate()?;
        let member: Member = self.http.post(MEMBERS, payload).await?;
        tracing::info!(id = member.id, name = %member.name, "member created");
        Ok(member)
    }

    /// Replace all fields of the member with the given id
    pub async fn update_member(&self, id: i64, payload: &MemberPayload) -> ClientResult<Member> {
        payload.validate()?;
        let member: Member = self
            .http
            .put(&format!("{}/{}", MEMBERS, id), payload)
            .await?;
        tracing::info!(id, name = %member.name, "member updated");
        Ok(member)
    }

    /// Move a member from the active collection into the deletion history.
    ///
    /// Step 1 deletes the member; step 2 archives its fields with a
    /// deletion timestamp stamped now. Step 2 is retried, and if it still
    /// fails the member is re-created so the delete is effectively undone.
    pub async fn delete_member(&self, member: &Member) -> ClientResult<DeletedMemberRecord> {
        self.http
            .delete(&format!("{}/{}", MEMBERS, member.id))
            .await?;

        let payload = DeletedMemberPayload {
            member_id: member.id,
            member: member.to_payload(),
            deletion_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        match self
            .with_retries("archive deleted member", || {
                self.http.post::<DeletedMemberRecord, _>(DELETE_HISTORY, &payload)
            })
            .await
        {
            Ok(record) => {
                tracing::info!(id = member.id, history_id = record.id, "member deleted");
                Ok(record)
            }
            Err(err) => {
                // Roll back step 1 so the member is not silently lost.
                tracing::warn!(id = member.id, error = %err, "history write failed, restoring member");
                match self
                    .http
                    .post::<Member, _>(MEMBERS, &member.to_payload())
                    .await
                {
                    Ok(_) => Err(err),
                    Err(rollback_err) => Err(ClientError::Inconsistent {
                        operation: "delete member",
                        reason: format!(
                            "history write failed ({}) and rollback failed ({})",
                            err, rollback_err
                        ),
                    }),
                }
            }
        }
    }

    /// Recreate a member from a history record and prune that record.
    ///
    /// The history entry is addressed by its own stable id, never by its
    /// position in a display slice. The service assigns the restored member
    /// a fresh id.
    pub async fn restore_member(&self, record: &DeletedMemberRecord) -> ClientResult<Member> {
        let member: Member = self.http.post(MEMBERS, &record.to_payload()).await?;

        let entry_path = format!("{}/{}", DELETE_HISTORY, record.id);
        match self
            .with_retries("prune history entry", || self.http.delete(&entry_path))
            .await
        {
            Ok(()) => {
                tracing::info!(id = member.id, history_id = record.id, "member restored");
                Ok(member)
            }
            Err(err) => {
                tracing::warn!(history_id = record.id, error = %err, "history prune failed, removing restored member");
                match self.http.delete(&format!("{}/{}", MEMBERS, member.id)).await {
                    Ok(()) => Err(err),
                    Err(rollback_err) => Err(ClientError::Inconsistent {
                        operation: "restore member",
                        reason: format!(
                            "history prune failed ({}) and rollback failed ({})",
                            err, rollback_err
                        ),
                    }),
                }
            }
        }
    }

    /// Run `op` once plus up to `retry_attempts` retries with a short
    /// linear backoff.
    async fn with_retries<T, F, Fut>(&self, what: &str, op: F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ClientResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(what, attempt, error = %err, "retrying");
                    tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
