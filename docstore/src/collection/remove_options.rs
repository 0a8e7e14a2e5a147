/// Options for controlling delete operations.
///
/// An empty filter matches the whole collection. Such a delete is refused
/// unless `allow_full_scope` is set, so a missing filter cannot wipe a
/// collection by accident.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::{full_scope, remove_many, RemoveOptions};
///
/// let options = RemoveOptions::default();
/// assert!(!options.is_many());
/// assert!(!options.is_full_scope_allowed());
///
/// assert!(remove_many().is_many());
///
/// let options = full_scope();
/// assert!(options.is_many() && options.is_full_scope_allowed());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    many: bool,
    allow_full_scope: bool,
}

impl RemoveOptions {
    /// Creates a new `RemoveOptions`.
    ///
    /// # Arguments
    ///
    /// * `many` - If true, delete every matching document, otherwise at most one
    /// * `allow_full_scope` - If true, an empty filter is accepted
    pub fn new(many: bool, allow_full_scope: bool) -> Self {
        Self {
            many,
            allow_full_scope,
        }
    }

    pub fn is_many(&self) -> bool {
        self.many
    }

    pub fn is_full_scope_allowed(&self) -> bool {
        self.allow_full_scope
    }
}

/// Creates `RemoveOptions` that deletes every matching document.
pub fn remove_many() -> RemoveOptions {
    RemoveOptions::new(true, false)
}

/// Creates `RemoveOptions` that deletes every document matching a filter,
/// including the empty filter.
pub fn full_scope() -> RemoveOptions {
    RemoveOptions::new(true, true)
}
