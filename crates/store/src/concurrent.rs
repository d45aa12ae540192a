//! Lock-free in-memory entity store.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, trace};

use repokit_core::{Entity, RepositoryError, RepositoryResult};

use crate::contract::{validate_id, Command, Query, UnitOfWork};

/// Outcome of a single compare-and-swap attempt on one slot.
enum Swap {
    Replaced,
    /// Another writer replaced the slot since it was read.
    Changed,
    /// The slot was removed since it was read.
    Missing,
}

/// Thread-safe keyed entity store.
///
/// Holds at most one entity per identity value. Entities are stored behind
/// `Arc` so that readers always observe a complete, previously accepted
/// value and so that `update` can detect intervening writers by pointer
/// identity.
///
/// ## Concurrency
///
/// - `add`/`try_add` are a single insert-if-absent on the slot's shard.
/// - `add_or_update` is an unconditional set (last writer wins).
/// - `remove*` is a single remove-if-present.
/// - `update`/`try_update` run a read / compare-and-swap loop: the current
///   value is read, then replaced only if the slot still holds that exact
///   value. A lost race re-reads and retries; there is no retry bound.
///
/// Shard guards are held only for the duration of a single primitive, never
/// across the read and the swap, so readers and writers on different keys do
/// not contend.
pub struct ConcurrentStore<E: Entity> {
    entries: DashMap<E::Id, Arc<E>>,
}

impl<E: Entity> ConcurrentStore<E> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Build a store pre-seeded with `entities`.
    ///
    /// Fails with `InvalidArgument` if any identity is unset or appears more
    /// than once.
    pub fn with_entities<I>(entities: I) -> RepositoryResult<Self>
    where
        I: IntoIterator<Item = E>,
    {
        let store = Self::new();
        for entity in entities {
            validate_id(entity.id())?;
            match store.entries.entry(entity.id().clone()) {
                Entry::Occupied(slot) => {
                    return Err(RepositoryError::invalid_argument(format!(
                        "duplicate identity {:?} in seed",
                        slot.key()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(entity));
                }
            }
        }
        debug!(count = store.entries.len(), "seeded concurrent store");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.contains_key(id)
    }

    fn insert_if_absent(&self, item: E) -> RepositoryResult<bool> {
        validate_id(item.id())?;
        match self.entries.entry(item.id().clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(item));
                Ok(true)
            }
        }
    }

    fn compare_and_swap(&self, id: &E::Id, expected: &Arc<E>, replacement: &Arc<E>) -> Swap {
        let Some(mut slot) = self.entries.get_mut(id) else {
            return Swap::Missing;
        };
        // `expected` is still alive, so its allocation cannot have been reused
        // by a newer value: pointer equality means "unchanged".
        if !Arc::ptr_eq(slot.value(), expected) {
            return Swap::Changed;
        }
        *slot.value_mut() = Arc::clone(replacement);
        Swap::Replaced
    }

    fn replace_existing(&self, item: E) -> RepositoryResult<bool> {
        validate_id(item.id())?;
        let id = item.id().clone();
        let replacement = Arc::new(item);
        let mut attempt: u64 = 0;

        loop {
            // The read guard is released at the end of this statement, before
            // the swap takes the shard's write lock.
            let Some(current) = self.entries.get(&id).map(|slot| Arc::clone(slot.value())) else {
                return Ok(false);
            };

            match self.compare_and_swap(&id, &current, &replacement) {
                Swap::Replaced => return Ok(true),
                Swap::Missing => return Ok(false),
                Swap::Changed => {
                    attempt += 1;
                    trace!(id = ?id, attempt, "concurrent update detected, retrying");
                }
            }
        }
    }

    fn remove_key(&self, id: &E::Id) -> RepositoryResult<bool> {
        validate_id(id)?;
        Ok(self.entries.remove(id).is_some())
    }
}

impl<E: Entity> Default for ConcurrentStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> core::fmt::Debug for ConcurrentStore<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentStore")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<E> Query<E> for ConcurrentStore<E>
where
    E: Entity + Clone + Send + Sync,
{
    fn count(&self) -> RepositoryResult<usize> {
        Ok(self.entries.len())
    }

    fn get_all(&self) -> RepositoryResult<Vec<E>> {
        Ok(self
            .entries
            .iter()
            .map(|slot| E::clone(slot.value()))
            .collect())
    }

    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.try_get_by_id(id)?
            .ok_or_else(|| RepositoryError::not_found(format!("no entity with identity {id:?}")))
    }

    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        validate_id(id)?;
        Ok(self.entries.get(id).map(|slot| E::clone(slot.value())))
    }
}

impl<E> Command<E> for ConcurrentStore<E>
where
    E: Entity + Clone + Send + Sync,
{
    fn add(&self, item: E) -> RepositoryResult<()> {
        let id = item.id().clone();
        if self.insert_if_absent(item)? {
            Ok(())
        } else {
            Err(RepositoryError::already_exists(format!(
                "an entity with identity {id:?} is already stored"
            )))
        }
    }

    fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        validate_id(item.id())?;
        self.entries.insert(item.id().clone(), Arc::new(item));
        Ok(())
    }

    fn update(&self, item: E) -> RepositoryResult<()> {
        let id = item.id().clone();
        if self.replace_existing(item)? {
            Ok(())
        } else {
            Err(RepositoryError::not_found(format!("no entity with identity {id:?}")))
        }
    }

    fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.remove_key(item.id()).map(|_| ())
    }

    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.remove_key(id).map(|_| ())
    }

    fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.insert_if_absent(item)
    }

    fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.replace_existing(item)
    }

    fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.remove_key(item.id())
    }

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.remove_key(id)
    }
}

/// Writes are visible as soon as they succeed; there is nothing to flush.
impl<E> UnitOfWork for ConcurrentStore<E>
where
    E: Entity + Send + Sync,
{
    fn commit(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
