use crate::common::SortOrder;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use mongodb::bson::{Bson, Document};

/// An ordered list of `(field, direction)` pairs describing a sort.
///
/// Order matters: the first pair is the primary key, later pairs break ties.
/// Adding a field that is already present replaces its direction in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortableFields {
    sorting_order: Vec<(String, SortOrder)>,
}

impl SortableFields {
    pub fn new() -> SortableFields {
        SortableFields {
            sorting_order: Vec::new(),
        }
    }

    /// Builds sort fields from a server-style sort document such as
    /// `{ "age": -1, "name": 1 }`.
    pub fn from_document(sort: &Document) -> StoreResult<SortableFields> {
        let mut fields = SortableFields::new();
        for (name, direction) in sort {
            let direction = match direction {
                Bson::Int32(value) => *value as i64,
                Bson::Int64(value) => *value,
                Bson::Double(value) => *value as i64,
                other => {
                    log::error!("Invalid sort direction {} for field {}", other, name);
                    return Err(StoreError::new(
                        &format!("Invalid sort direction {} for field {}", other, name),
                        ErrorKind::ValidationError,
                    ));
                }
            };
            fields = fields.try_add_sorted_field(name.clone(), SortOrder::from_direction(direction))?;
        }
        Ok(fields)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.sorting_order.iter().map(|(name, _)| name.clone()).collect()
    }

    #[inline]
    pub fn add_sorted_field(mut self, field_name: String, sort_order: SortOrder) -> SortableFields {
        match self.sorting_order.iter_mut().find(|(name, _)| *name == field_name) {
            Some(entry) => entry.1 = sort_order,
            None => self.sorting_order.push((field_name, sort_order)),
        }
        self
    }

    fn try_add_sorted_field(self, field_name: String, sort_order: SortOrder) -> StoreResult<SortableFields> {
        if field_name.is_empty() {
            log::error!("Sort field name cannot be empty");
            return Err(StoreError::new(
                "Sort field name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        Ok(self.add_sorted_field(field_name, sort_order))
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub fn is_empty(&self) -> bool {
        self.sorting_order.is_empty()
    }

    /// Renders the sort as the ordered document the server expects.
    pub fn to_document(&self) -> Document {
        let mut sort = Document::new();
        for (name, order) in &self.sorting_order {
            sort.insert(name.clone(), order.direction());
        }
        sort
    }
}

impl<S: Into<String>> FromIterator<(S, SortOrder)> for SortableFields {
    fn from_iter<T: IntoIterator<Item = (S, SortOrder)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(SortableFields::new(), |fields, (name, order)| {
                fields.add_sorted_field(name.into(), order)
            })
    }
}
