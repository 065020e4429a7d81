use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical media type of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "object_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Document,
    Video,
}

/// Who may stream or download an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "access_level", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Private,
    Restricted,
}

/// Soft-delete state. A deleted record stays in the table (hidden from
/// serving) until the out-of-scope reaper removes it and its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "object_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    Active,
    Deleted,
}

/// Metadata record for one object held in the backing store.
///
/// `size_bytes` is written exactly once at upload time and is the only size
/// the range negotiator consults; the store's own bookkeeping is never
/// re-read on the serve path. `(bucket, object_key)` is unique and immutable
/// for the record's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoredObject {
    pub id: Uuid,
    pub bucket: String,
    pub object_key: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub kind: ObjectKind,
    pub access_level: AccessLevel,
    pub lesson_id: Option<Uuid>,
    pub status: ObjectStatus,
    pub download_count: i64,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredObject {
    /// Total size as the unsigned count range negotiation expects.
    pub fn total_bytes(&self) -> u64 {
        self.size_bytes.max(0) as u64
    }

    pub fn is_deleted(&self) -> bool {
        self.status == ObjectStatus::Deleted
    }
}

/// API response shape for a stored object record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObjectResponse {
    pub id: Uuid,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub kind: ObjectKind,
    pub access_level: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<Uuid>,
    pub download_count: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<StoredObject> for StoredObjectResponse {
    fn from(object: StoredObject) -> Self {
        StoredObjectResponse {
            id: object.id,
            original_name: object.original_name,
            mime_type: object.mime_type,
            size_bytes: object.size_bytes,
            kind: object.kind,
            access_level: object.access_level,
            lesson_id: object.lesson_id,
            download_count: object.download_count,
            uploaded_at: object.uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_object() -> StoredObject {
        StoredObject {
            id: Uuid::new_v4(),
            bucket: "videos".to_string(),
            object_key: "3f2b8c1e.mp4".to_string(),
            original_name: "lecture-01.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            size_bytes: 2048000,
            kind: ObjectKind::Video,
            access_level: AccessLevel::Private,
            lesson_id: Some(Uuid::new_v4()),
            status: ObjectStatus::Active,
            download_count: 3,
            uploaded_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_from_stored_object() {
        let object = test_object();
        let response = StoredObjectResponse::from(object.clone());

        assert_eq!(response.id, object.id);
        assert_eq!(response.original_name, "lecture-01.mp4");
        assert_eq!(response.mime_type, "video/mp4");
        assert_eq!(response.size_bytes, 2048000);
        assert_eq!(response.kind, ObjectKind::Video);
        assert_eq!(response.access_level, AccessLevel::Private);
        assert_eq!(response.lesson_id, object.lesson_id);
        assert_eq!(response.download_count, 3);
    }

    #[test]
    fn test_total_bytes_is_non_negative() {
        let mut object = test_object();
        assert_eq!(object.total_bytes(), 2048000);
        object.size_bytes = -1;
        assert_eq!(object.total_bytes(), 0);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ObjectKind::Document).unwrap(),
            "\"document\""
        );
        assert_eq!(
            serde_json::to_string(&AccessLevel::Restricted).unwrap(),
            "\"restricted\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectStatus::Deleted).unwrap(),
            "\"deleted\""
        );
    }
}
