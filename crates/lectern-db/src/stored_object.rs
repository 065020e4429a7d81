//! Stored object repository: CRUD for the stored_objects table.

use chrono::Utc;
use lectern_core::models::{AccessLevel, ObjectKind, ObjectStatus, StoredObject};
use lectern_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for the stored_objects table.
///
/// Rows are never physically removed by the gateway. Deletion flips the
/// status column to `deleted` so the id keeps resolving (as a 404) and the
/// stored bytes stay reclaimable by an offline cleanup job.
#[derive(Clone)]
pub struct StoredObjectRepository {
    pool: PgPool,
}

impl StoredObjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a record for an object already written to storage.
    ///
    /// The caller mints the id, derives the storage key from it, and uploads
    /// the bytes first; this method only records the result. On failure the
    /// caller is responsible for deleting the orphaned object.
    #[tracing::instrument(skip(self), fields(db.table = "stored_objects", db.operation = "insert", db.record_id = %id))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: Uuid,
        bucket: String,
        object_key: String,
        original_name: String,
        mime_type: String,
        size_bytes: i64,
        kind: ObjectKind,
        access_level: AccessLevel,
        lesson_id: Option<Uuid>,
    ) -> Result<StoredObject, AppError> {
        let now = Utc::now();

        let object: StoredObject = sqlx::query_as::<Postgres, StoredObject>(
            r#"
            INSERT INTO stored_objects (
                id, bucket, object_key, original_name, mime_type, size_bytes,
                kind, access_level, lesson_id, status, download_count,
                uploaded_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&bucket)
        .bind(&object_key)
        .bind(&original_name)
        .bind(&mime_type)
        .bind(size_bytes)
        .bind(kind)
        .bind(access_level)
        .bind(lesson_id)
        .bind(ObjectStatus::Active)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(object)
    }

    /// Fetch an object record by id, regardless of status.
    ///
    /// Callers decide how a `deleted` record is surfaced; serving paths treat
    /// it the same as a missing row.
    #[tracing::instrument(skip(self), fields(db.table = "stored_objects", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<StoredObject>, AppError> {
        let object: Option<StoredObject> = sqlx::query_as::<Postgres, StoredObject>(
            "SELECT * FROM stored_objects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(object)
    }

    /// Soft-delete an object record.
    ///
    /// Returns true if an active record was marked, false if the id was
    /// unknown or already deleted. The stored bytes are left in place.
    #[tracing::instrument(skip(self), fields(db.table = "stored_objects", db.operation = "update", db.record_id = %id))]
    pub async fn mark_deleted(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            "UPDATE stored_objects SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(ObjectStatus::Deleted)
        .bind(Utc::now())
        .bind(id)
        .bind(ObjectStatus::Active)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Bump the download counter for an object.
    ///
    /// Runs as a single atomic UPDATE so concurrent downloads never lose
    /// increments. Missing ids are a no-op.
    #[tracing::instrument(skip(self), fields(db.table = "stored_objects", db.operation = "update", db.record_id = %id))]
    pub async fn increment_download_count(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE stored_objects SET download_count = download_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
