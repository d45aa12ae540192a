//! Blocking tap decorator.

use repokit_core::{Entity, RepositoryResult};
use repokit_store::{Command, Query};

use super::{always, applied, impl_tap_builder, Mirror, TapOperation};

/// Repository decorator that mirrors writes from `primary` to `tap`.
///
/// Reads are served by the primary alone. See the [module docs](super) for
/// the mirroring table and the sequential/parallel semantics. In parallel
/// mode the two calls run on the rayon pool and are joined before returning.
pub struct Tap<P, T> {
    primary: P,
    tap: T,
    mirror: Mirror,
}

impl_tap_builder!(Tap);

impl<E, P, T> Query<E> for Tap<P, T>
where
    E: Entity,
    P: Query<E>,
    T: Send + Sync,
{
    fn count(&self) -> RepositoryResult<usize> {
        self.primary.count()
    }

    fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.primary.get_all()
    }

    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.primary.get_by_id(id)
    }

    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.primary.try_get_by_id(id)
    }
}

impl<E, P, T> Command<E> for Tap<P, T>
where
    E: Entity + Clone + Send + Sync,
    P: Command<E>,
    T: Command<E>,
{
    fn add(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror.run(
            TapOperation::Add,
            || self.primary.add(item),
            || self.tap.add_or_update(mirrored),
            always,
        )
    }

    fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror.run(
            TapOperation::AddOrUpdate,
            || self.primary.add_or_update(item),
            || self.tap.add_or_update(mirrored),
            always,
        )
    }

    fn update(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror.run(
            TapOperation::Update,
            || self.primary.update(item),
            || self.tap.add_or_update(mirrored),
            always,
        )
    }

    fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.mirror.run(
            TapOperation::Remove,
            || self.primary.remove(item),
            || self.tap.remove(item),
            always,
        )
    }

    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.mirror.run(
            TapOperation::RemoveById,
            || self.primary.remove_by_id(id),
            || self.tap.remove_by_id(id),
            always,
        )
    }

    fn try_add(&self, item: E) -> RepositoryResult<bool> {
        let mirrored = item.clone();
        self.mirror.run(
            TapOperation::TryAdd,
            || self.primary.try_add(item),
            || self.tap.add_or_update(mirrored),
            applied,
        )
    }

    fn try_update(&self, item: E) -> RepositoryResult<bool> {
        let mirrored = item.clone();
        self.mirror.run(
            TapOperation::TryUpdate,
            || self.primary.try_update(item),
            || self.tap.add_or_update(mirrored),
            applied,
        )
    }

    fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.mirror.run(
            TapOperation::TryRemove,
            || self.primary.try_remove(item),
            || self.tap.remove(item),
            applied,
        )
    }

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.mirror.run(
            TapOperation::TryRemoveById,
            || self.primary.try_remove_by_id(id),
            || self.tap.remove_by_id(id),
            applied,
        )
    }
}
