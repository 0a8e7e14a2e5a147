use crate::collection::Projection;
use crate::common::{SortOrder, SortableFields};
use crate::errors::StoreResult;
use mongodb::bson::Document;
use std::time::Duration;

/// Options for controlling read operations.
///
/// `FindOptions` carries sorting, projection, pagination and a per-query time
/// bound. It supports method chaining for convenient configuration. The sort
/// is always applied before skip and limit.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::{order_by, FindOptions, Projection};
/// use docstore::common::SortOrder;
///
/// let options = FindOptions::new()
///     .sort_by("age", SortOrder::Descending)
///     .projection(Projection::new().include("name").exclude("_id"))
///     .limit(20);
/// assert_eq!(options.limit_count(), Some(20));
///
/// let options = order_by("name", SortOrder::Ascending);
/// assert!(options.sort_fields().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    sort_by: Option<SortableFields>,
    projection: Option<Projection>,
    skip: Option<u64>,
    limit: Option<i64>,
    max_time: Option<Duration>,
}

/// Creates `FindOptions` with sorting by a field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name, sort_order)
}

/// Creates `FindOptions` that limits the number of results.
///
/// A zero or negative limit means unbounded.
pub fn limit_to(limit: i64) -> FindOptions {
    FindOptions::new().limit(limit)
}

/// Creates `FindOptions` that skips a number of results.
pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions::new().skip(skip)
}

/// Creates `FindOptions` with only a projection.
pub fn project(projection: Projection) -> FindOptions {
    FindOptions::new().projection(projection)
}

impl FindOptions {
    /// Creates a new `FindOptions` with default settings.
    pub fn new() -> FindOptions {
        FindOptions {
            sort_by: None,
            projection: None,
            skip: None,
            limit: None,
            max_time: None,
        }
    }

    /// Appends a sort key. Calling it several times builds a compound sort
    /// in call order.
    pub fn sort_by(mut self, field_name: &str, sort_order: SortOrder) -> FindOptions {
        let fields = self.sort_by.take().unwrap_or_default();
        self.sort_by = Some(fields.add_sorted_field(field_name.to_string(), sort_order));
        self
    }

    /// Replaces every sort field set so far.
    pub fn sort(mut self, fields: SortableFields) -> FindOptions {
        self.sort_by = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    /// Replaces the sort with a server-style sort document such as
    /// `{ "age": -1, "name": 1 }`. Key order is the sort priority.
    pub fn sort_document(self, sort: &Document) -> StoreResult<FindOptions> {
        Ok(self.sort(SortableFields::from_document(sort)?))
    }

    pub fn projection(mut self, projection: Projection) -> FindOptions {
        self.projection = if projection.is_empty() { None } else { Some(projection) };
        self
    }

    /// Sets the projection from a server-style mapping such as
    /// `{ "name": 1, "_id": 0 }`.
    pub fn projection_document(self, projection: &Document) -> StoreResult<FindOptions> {
        Ok(self.projection(Projection::from_document(projection)?))
    }

    /// Sets the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    ///
    /// Zero and negative values clear the limit.
    pub fn limit(mut self, limit: i64) -> FindOptions {
        self.limit = if limit > 0 { Some(limit) } else { None };
        self
    }

    /// Bounds the server-side execution time of the query.
    pub fn max_time(mut self, max_time: Duration) -> FindOptions {
        self.max_time = Some(max_time);
        self
    }

    pub fn sort_fields(&self) -> Option<&SortableFields> {
        self.sort_by.as_ref()
    }

    pub fn projection_fields(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    /// The effective limit; always positive when present.
    pub fn limit_count(&self) -> Option<i64> {
        self.limit
    }

    pub fn max_time_limit(&self) -> Option<Duration> {
        self.max_time
    }
}
