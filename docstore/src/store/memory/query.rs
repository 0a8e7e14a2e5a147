//! Query evaluation for the in-memory backend.
//!
//! Only the subset of the query language a CRUD layer needs is understood:
//! equality filters on (dotted) field paths combined with implicit AND,
//! inclusion/exclusion projections, multi-key sorts and `$set` updates.

use crate::collection::Projection;
use crate::common::{SortOrder, SortableFields, DOC_ID, SET_OPERATOR};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;

fn unsupported(message: String) -> StoreError {
    log::error!("{}", message);
    StoreError::new(&message, ErrorKind::BackendError)
}

fn is_operator_expression(value: &Bson) -> bool {
    match value {
        Bson::Document(inner) => inner.keys().any(|key| key.starts_with('$')),
        _ => false,
    }
}

/// Rejects operator expressions (`$and`, `{ "$gt": .. }`, ...).
pub(crate) fn validate_filter(filter: &Document) -> StoreResult<()> {
    for (key, value) in filter {
        if key.starts_with('$') {
            return Err(unsupported(format!("Unsupported query operator {}", key)));
        }
        if is_operator_expression(value) {
            return Err(unsupported(format!(
                "Unsupported query expression on field {}",
                key
            )));
        }
    }
    Ok(())
}

/// Resolves a dotted path through nested documents.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    match path.split_once('.') {
        None => document.get(path),
        Some((head, rest)) => match document.get(head) {
            Some(Bson::Document(inner)) => lookup(inner, rest),
            _ => None,
        },
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(*n as i64),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

/// Equality with numeric types compared by value. Two integers compare
/// exactly; a double on either side compares as `f64`.
pub(crate) fn values_equal(left: &Bson, right: &Bson) -> bool {
    if let (Some(l), Some(r)) = (as_integer(left), as_integer(right)) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (as_number(left), as_number(right)) {
        return l == r;
    }
    match (left, right) {
        (Bson::Array(l), Bson::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        (Bson::Document(l), Bson::Document(r)) => {
            l.len() == r.len()
                && l.iter()
                    .zip(r.iter())
                    .all(|((lk, lv), (rk, rv))| lk == rk && values_equal(lv, rv))
        }
        _ => left == right,
    }
}

fn field_matches(document: &Document, path: &str, expected: &Bson) -> bool {
    match lookup(document, path) {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) => {
            values_equal(&Bson::Array(items.clone()), expected)
                || items.iter().any(|item| values_equal(item, expected))
        }
        Some(actual) => values_equal(actual, expected),
    }
}

/// `true` when every filter entry matches. The empty filter matches all.
pub(crate) fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(path, expected)| field_matches(document, path, expected))
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) => 1,
        Some(Bson::String(_)) | Some(Bson::Symbol(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Binary(_)) => 5,
        Some(Bson::ObjectId(_)) => 6,
        Some(Bson::Boolean(_)) => 7,
        Some(Bson::DateTime(_)) => 8,
        Some(Bson::Timestamp(_)) => 9,
        Some(_) => 10,
    }
}

/// Total order over values following the server's cross-type ordering:
/// missing/null, numbers, strings, documents, arrays, binary, object ids,
/// booleans, dates.
pub(crate) fn compare_values(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    let by_rank = type_rank(left).cmp(&type_rank(right));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (left, right) {
        (Some(l), Some(r)) => {
            if let (Some(a), Some(b)) = (as_integer(l), as_integer(r)) {
                return a.cmp(&b);
            }
            if let (Some(a), Some(b)) = (as_number(l), as_number(r)) {
                return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            }
            match (l, r) {
                (Bson::String(a), Bson::String(b)) => a.cmp(b),
                (Bson::Symbol(a), Bson::Symbol(b)) => a.cmp(b),
                (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
                (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
                (Bson::DateTime(a), Bson::DateTime(b)) => {
                    a.timestamp_millis().cmp(&b.timestamp_millis())
                }
                (Bson::Binary(a), Bson::Binary(b)) => a.bytes.cmp(&b.bytes),
                (Bson::Array(a), Bson::Array(b)) => a
                    .iter()
                    .zip(b)
                    .map(|(x, y)| compare_values(Some(x), Some(y)))
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or_else(|| a.len().cmp(&b.len())),
                (Bson::Document(a), Bson::Document(b)) => a
                    .iter()
                    .zip(b.iter())
                    .map(|((ka, va), (kb, vb))| {
                        ka.cmp(kb).then_with(|| compare_values(Some(va), Some(vb)))
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or_else(|| a.len().cmp(&b.len())),
                _ => l.to_string().cmp(&r.to_string()),
            }
        }
        _ => Ordering::Equal,
    }
}

/// Stable multi-key sort.
pub(crate) fn sort_documents(documents: &mut [Document], sort: &SortableFields) {
    documents.sort_by(|a, b| {
        for (field, order) in sort.sorting_order() {
            let ordering = compare_values(lookup(a, field), lookup(b, field));
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> StoreResult<()> {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            if !document.contains_key(head) {
                document.insert(head, Document::new());
            }
            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => Err(unsupported(format!(
                    "Cannot create field {} in a non-document value at {}",
                    rest, head
                ))),
            }
        }
    }
}

fn remove_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(inner)) = document.get_mut(head) {
                remove_path(inner, rest);
            }
        }
    }
}

/// Shapes a stored document according to a validated projection.
pub(crate) fn apply_projection(document: &Document, projection: &Projection) -> Document {
    let id_only = projection.fields().iter().all(|(name, _)| name == DOC_ID);

    if projection.is_inclusion() || (id_only && projection.keeps_id()) {
        let mut projected = Document::new();
        if projection.keeps_id() {
            if let Some(id) = document.get(DOC_ID) {
                projected.insert(DOC_ID, id.clone());
            }
        }
        for (name, included) in projection.fields() {
            if !*included || name == DOC_ID {
                continue;
            }
            if let Some(value) = lookup(document, name) {
                // paths were validated when the value was stored
                let _ = set_path(&mut projected, name, value.clone());
            }
        }
        projected
    } else {
        let mut projected = document.clone();
        for (name, included) in projection.fields() {
            if !*included {
                remove_path(&mut projected, name);
            }
        }
        projected
    }
}

/// Extracts the `$set` payload of an update document.
pub(crate) fn set_fields(update: &Document) -> StoreResult<&Document> {
    if let Some(operator) = update.keys().find(|key| key.as_str() != SET_OPERATOR) {
        return Err(unsupported(format!("Unsupported update operator {}", operator)));
    }
    match update.get(SET_OPERATOR) {
        Some(Bson::Document(fields)) => Ok(fields),
        _ => Err(unsupported(format!(
            "Update document requires a {} document",
            SET_OPERATOR
        ))),
    }
}

/// Applies `$set` fields to `document`; returns whether anything changed.
pub(crate) fn apply_set(document: &mut Document, fields: &Document) -> StoreResult<bool> {
    let mut updated = document.clone();
    for (path, value) in fields {
        if path == DOC_ID && document.get(DOC_ID) != Some(value) {
            return Err(unsupported(format!(
                "Performing an update on the path {} would modify the immutable field",
                DOC_ID
            )));
        }
        set_path(&mut updated, path, value.clone())?;
    }

    if updated == *document {
        Ok(false)
    } else {
        *document = updated;
        Ok(true)
    }
}
