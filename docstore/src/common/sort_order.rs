/// Specifies the direction for sorting documents.
///
/// Used in [`FindOptions`](crate::collection::FindOptions) to control result
/// ordering:
/// ```text
/// let options = order_by("age", SortOrder::Descending);
/// let documents = client.read(None, &options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z, oldest to newest)
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A, newest to oldest)
    Descending,
}

impl SortOrder {
    /// The direction value understood by the server in a sort document.
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Maps a server direction value back to a `SortOrder`.
    ///
    /// Any negative value is descending, everything else ascending.
    pub fn from_direction(direction: i64) -> SortOrder {
        if direction < 0 {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}
