use std::collections::HashSet;

use crate::models::Entity;

/// Prepends the candidates whose identifier is not yet in `collection`.
///
/// Absent candidates and candidates without an id are skipped; among
/// candidates sharing an id the first wins. Admitted candidates keep their
/// given order and come before the untouched original collection. When
/// nothing is admitted the collection is returned as-is.
///
/// Used when populating selection lists with previously chosen items.
pub fn add_to_collection_if_missing<T, I, C>(collection: Vec<T>, candidates: I) -> Vec<T>
where
    T: Entity,
    I: IntoIterator<Item = C>,
    C: Into<Option<T>>,
{
    let mut known: HashSet<i64> = collection.iter().filter_map(Entity::id).collect();

    let to_add: Vec<T> = candidates
        .into_iter()
        .filter_map(|candidate| -> Option<T> { candidate.into() })
        .filter(|candidate| match candidate.id() {
            Some(id) => known.insert(id),
            None => false,
        })
        .collect();

    if to_add.is_empty() {
        return collection;
    }
    to_add.into_iter().chain(collection).collect()
}
