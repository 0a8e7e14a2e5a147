use mongodb::bson::Bson;

/// The result of a write operation (create, update, delete).
///
/// Only the counters relevant to the operation are populated; the others
/// stay at zero.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::WriteResult;
///
/// let result = WriteResult::updated(3, 2);
/// assert_eq!(result.matched_count(), 3);
/// assert_eq!(result.modified_count(), 2);
/// assert!(result.inserted_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WriteResult {
    inserted_id: Option<Bson>,
    matched_count: u64,
    modified_count: u64,
    deleted_count: u64,
}

impl WriteResult {
    /// A successful insert that produced `id`.
    pub fn inserted(id: Bson) -> Self {
        let inserted_id = match id {
            Bson::Null | Bson::Undefined => None,
            other => Some(other),
        };
        Self {
            inserted_id,
            ..Default::default()
        }
    }

    pub fn updated(matched_count: u64, modified_count: u64) -> Self {
        Self {
            matched_count,
            modified_count,
            ..Default::default()
        }
    }

    pub fn deleted(deleted_count: u64) -> Self {
        Self {
            deleted_count,
            ..Default::default()
        }
    }

    /// The identifier the backend assigned to the inserted document.
    pub fn inserted_id(&self) -> Option<&Bson> {
        self.inserted_id.as_ref()
    }

    pub fn matched_count(&self) -> u64 {
        self.matched_count
    }

    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }

    pub fn deleted_count(&self) -> u64 {
        self.deleted_count
    }
}
