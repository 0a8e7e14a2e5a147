/// Options for controlling update operations.
///
/// Updates only ever overwrite fields of existing documents; a filter that
/// matches nothing changes nothing and never inserts.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::{update_many, UpdateOptions};
///
/// // Update only the first match (the default)
/// let options = UpdateOptions::default();
/// assert!(!options.is_many());
///
/// // Update every match
/// let options = update_many();
/// assert!(options.is_many());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    many: bool,
}

impl UpdateOptions {
    /// Creates a new `UpdateOptions`.
    ///
    /// # Arguments
    ///
    /// * `many` - If true, update every matching document, otherwise at most one
    pub fn new(many: bool) -> Self {
        Self { many }
    }

    /// Returns whether every matching document is updated.
    pub fn is_many(&self) -> bool {
        self.many
    }
}

/// Creates `UpdateOptions` that updates every matching document.
pub fn update_many() -> UpdateOptions {
    UpdateOptions::new(true)
}
