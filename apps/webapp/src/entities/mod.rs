// Entity features: REST service, routing resolver and the list/update/delete
// controllers. Everything is generic over `models::Entity`; Job and Sales only
// differ in their model, form and validation rules.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod collection;
pub mod delete;
pub mod list;
pub mod resolver;
pub mod service;
pub mod update;

pub use collection::add_to_collection_if_missing;
pub use delete::{DeleteDialog, DialogResult};
pub use list::ListController;
pub use resolver::EntityResolver;
pub use service::{EntityApi, EntityService};
pub use update::{SaveOutcome, UpdateController};

/// Busy flag held for the duration of one save or delete.
///
/// Acquiring fails while another request holds the flag; dropping the guard
/// clears it on every exit path, including cancellation of the future.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
