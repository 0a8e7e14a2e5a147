use super::query::{
    apply_projection, apply_set, matches, set_fields, sort_documents, validate_filter,
    values_equal,
};
use crate::collection::{FindOptions, RemoveOptions, UpdateOptions, WriteResult};
use crate::common::DOC_ID;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::DocumentBackend;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An in-process [`DocumentBackend`] holding one collection in memory.
///
/// Documents keep their insertion order, which is also the natural order of
/// unsorted reads. Cloning the backend shares the same documents, so a test
/// can keep a handle and inspect what a client wrote.
///
/// Filters support equality on dotted paths only; operator expressions are
/// rejected with `ErrorKind::BackendError`, the way a server rejects a query
/// it cannot parse.
#[derive(Clone)]
pub struct InMemoryBackend {
    inner: Arc<InMemoryBackendInner>,
}

struct InMemoryBackendInner {
    documents: RwLock<Vec<Document>>,
    closed: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> InMemoryBackend {
        InMemoryBackend {
            inner: Arc::new(InMemoryBackendInner {
                documents: RwLock::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.documents.read().is_empty()
    }

    /// A copy of every stored document in insertion order.
    pub fn snapshot(&self) -> Vec<Document> {
        self.inner.documents.read().clone()
    }

    fn check_opened(&self) -> StoreResult<()> {
        if self.inner.closed.load(Ordering::Acquire) {
            log::error!("In-memory collection is already closed");
            return Err(StoreError::new(
                "In-memory collection is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        InMemoryBackend::new()
    }
}

impl DocumentBackend for InMemoryBackend {
    fn insert_one(&self, document: Document) -> StoreResult<WriteResult> {
        self.check_opened()?;

        let id = match document.get(DOC_ID) {
            Some(id) => id.clone(),
            None => Bson::ObjectId(ObjectId::new()),
        };

        let mut documents = self.inner.documents.write();
        let duplicate = documents
            .iter()
            .filter_map(|existing| existing.get(DOC_ID))
            .any(|existing_id| values_equal(existing_id, &id));
        if duplicate {
            log::error!("Duplicate key {} for {}", id, DOC_ID);
            return Err(StoreError::new(
                &format!("Duplicate key {} for {}", id, DOC_ID),
                ErrorKind::BackendError,
            ));
        }

        let mut stored = Document::new();
        stored.insert(DOC_ID, id.clone());
        for (key, value) in document {
            if key != DOC_ID {
                stored.insert(key, value);
            }
        }
        documents.push(stored);
        Ok(WriteResult::inserted(id))
    }

    fn find(&self, filter: Document, options: &FindOptions) -> StoreResult<Vec<Document>> {
        self.check_opened()?;
        validate_filter(&filter)?;
        if let Some(projection) = options.projection_fields() {
            projection.validate()?;
        }

        let mut found: Vec<Document> = self
            .inner
            .documents
            .read()
            .iter()
            .filter(|document| matches(document, &filter))
            .cloned()
            .collect();

        if let Some(sort) = options.sort_fields() {
            sort_documents(&mut found, sort);
        }

        let skip = options.skip_count().unwrap_or(0) as usize;
        let limit = options.limit_count().map(|n| n as usize).unwrap_or(usize::MAX);

        Ok(found
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| match options.projection_fields() {
                Some(projection) => apply_projection(&document, projection),
                None => document,
            })
            .collect())
    }

    fn update(
        &self,
        filter: Document,
        update: Document,
        options: &UpdateOptions,
    ) -> StoreResult<WriteResult> {
        self.check_opened()?;
        validate_filter(&filter)?;
        let fields = set_fields(&update)?;

        let mut documents = self.inner.documents.write();
        let mut matched = 0u64;
        let mut modified = 0u64;
        for document in documents.iter_mut() {
            if !matches(document, &filter) {
                continue;
            }
            matched += 1;
            if apply_set(document, fields)? {
                modified += 1;
            }
            if !options.is_many() {
                break;
            }
        }
        Ok(WriteResult::updated(matched, modified))
    }

    fn delete(&self, filter: Document, options: &RemoveOptions) -> StoreResult<WriteResult> {
        self.check_opened()?;
        validate_filter(&filter)?;

        let mut documents = self.inner.documents.write();
        let before = documents.len();
        if options.is_many() {
            documents.retain(|document| !matches(document, &filter));
        } else if let Some(index) = documents.iter().position(|d| matches(d, &filter)) {
            documents.remove(index);
        }
        Ok(WriteResult::deleted((before - documents.len()) as u64))
    }

    fn close(&self) -> StoreResult<()> {
        self.inner.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}
