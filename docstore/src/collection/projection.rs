use crate::common::DOC_ID;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use mongodb::bson::{Bson, Document};

/// Selects which fields a read returns.
///
/// A projection is either an inclusion (only the listed fields, plus `_id`
/// unless it is excluded) or an exclusion (everything except the listed
/// fields). Mixing both is only allowed for `_id`, matching the server rule.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::Projection;
/// use docstore::doc;
///
/// let projection = Projection::new().include("name").include("breed").exclude("_id");
/// assert!(projection.validate().is_ok());
/// assert_eq!(projection.to_document(), doc! { "name": 1, "breed": 1, "_id": 0 });
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    fields: Vec<(String, bool)>,
}

/// Creates an inclusion projection over the given fields.
pub fn include_fields(fields: &[&str]) -> Projection {
    fields.iter().fold(Projection::new(), |p, f| p.include(f))
}

/// Creates an exclusion projection over the given fields.
pub fn exclude_fields(fields: &[&str]) -> Projection {
    fields.iter().fold(Projection::new(), |p, f| p.exclude(f))
}

impl Projection {
    pub fn new() -> Projection {
        Projection { fields: Vec::new() }
    }

    pub fn include(self, field_name: &str) -> Projection {
        self.with(field_name, true)
    }

    pub fn exclude(self, field_name: &str) -> Projection {
        self.with(field_name, false)
    }

    fn with(mut self, field_name: &str, included: bool) -> Projection {
        match self.fields.iter_mut().find(|(name, _)| name == field_name) {
            Some(entry) => entry.1 = included,
            None => self.fields.push((field_name.to_string(), included)),
        }
        self
    }

    /// Reads a server-style projection such as `{ "name": 1, "_id": 0 }`.
    ///
    /// Numbers are truthy when non-zero; booleans are taken as-is.
    pub fn from_document(projection: &Document) -> StoreResult<Projection> {
        let mut result = Projection::new();
        for (name, value) in projection {
            let included = match value {
                Bson::Boolean(flag) => *flag,
                Bson::Int32(n) => *n != 0,
                Bson::Int64(n) => *n != 0,
                Bson::Double(n) => *n != 0.0,
                other => {
                    log::error!("Unsupported projection value {} for field {}", other, name);
                    return Err(StoreError::new(
                        &format!("Unsupported projection value {} for field {}", other, name),
                        ErrorKind::ValidationError,
                    ));
                }
            };
            result = result.with(name, included);
        }
        result.validate()?;
        Ok(result)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[(String, bool)] {
        &self.fields
    }

    /// `true` when at least one non-`_id` field is included.
    pub fn is_inclusion(&self) -> bool {
        self.fields.iter().any(|(name, included)| *included && name != DOC_ID)
    }

    /// `false` only when `_id` is explicitly excluded.
    pub fn keeps_id(&self) -> bool {
        !self
            .fields
            .iter()
            .any(|(name, included)| name == DOC_ID && !*included)
    }

    /// Rejects empty field names and projections that mix inclusion and
    /// exclusion of fields other than `_id`.
    pub fn validate(&self) -> StoreResult<()> {
        if self.fields.iter().any(|(name, _)| name.is_empty()) {
            log::error!("Projection field name cannot be empty");
            return Err(StoreError::new(
                "Projection field name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }

        let mut includes = false;
        let mut excludes = false;
        for (name, included) in &self.fields {
            if name == DOC_ID {
                continue;
            }
            if *included {
                includes = true;
            } else {
                excludes = true;
            }
        }

        if includes && excludes {
            log::error!("Projection cannot mix inclusion and exclusion");
            return Err(StoreError::new(
                "Projection cannot mix inclusion and exclusion",
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    pub fn to_document(&self) -> Document {
        let mut projection = Document::new();
        for (name, included) in &self.fields {
            projection.insert(name.clone(), if *included { 1 } else { 0 });
        }
        projection
    }
}
