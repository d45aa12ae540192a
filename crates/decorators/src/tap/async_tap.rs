//! Suspend-capable tap decorator.

use async_trait::async_trait;

use repokit_core::{Entity, RepositoryResult};
use repokit_store::{AsyncCommand, AsyncQuery};

use super::{always, applied, impl_tap_builder, Mirror, TapOperation};

/// Async counterpart of [`super::command::Tap`].
///
/// In parallel mode the primary and tap futures are polled together with
/// `tokio::join!` inside the caller's task, so the operation completes only
/// once both have settled.
pub struct AsyncTap<P, T> {
    primary: P,
    tap: T,
    mirror: Mirror,
}

impl_tap_builder!(AsyncTap);

#[async_trait]
impl<E, P, T> AsyncQuery<E> for AsyncTap<P, T>
where
    E: Entity + Send + Sync + 'static,
    P: AsyncQuery<E>,
    T: Send + Sync,
{
    async fn count(&self) -> RepositoryResult<usize> {
        self.primary.count().await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.primary.get_all().await
    }

    async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.primary.get_by_id(id).await
    }

    async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.primary.try_get_by_id(id).await
    }
}

#[async_trait]
impl<E, P, T> AsyncCommand<E> for AsyncTap<P, T>
where
    E: Entity + Clone + Send + Sync + 'static,
    P: AsyncCommand<E>,
    T: AsyncCommand<E>,
{
    async fn add(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror
            .run_async(
                TapOperation::Add,
                self.primary.add(item),
                || self.tap.add_or_update(mirrored),
                always,
            )
            .await
    }

    async fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror
            .run_async(
                TapOperation::AddOrUpdate,
                self.primary.add_or_update(item),
                || self.tap.add_or_update(mirrored),
                always,
            )
            .await
    }

    async fn update(&self, item: E) -> RepositoryResult<()> {
        let mirrored = item.clone();
        self.mirror
            .run_async(
                TapOperation::Update,
                self.primary.update(item),
                || self.tap.add_or_update(mirrored),
                always,
            )
            .await
    }

    async fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.mirror
            .run_async(
                TapOperation::Remove,
                self.primary.remove(item),
                || self.tap.remove(item),
                always,
            )
            .await
    }

    async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.mirror
            .run_async(
                TapOperation::RemoveById,
                self.primary.remove_by_id(id),
                || self.tap.remove_by_id(id),
                always,
            )
            .await
    }

    async fn try_add(&self, item: E) -> RepositoryResult<bool> {
        let mirrored = item.clone();
        self.mirror
            .run_async(
                TapOperation::TryAdd,
                self.primary.try_add(item),
                || self.tap.add_or_update(mirrored),
                applied,
            )
            .await
    }

    async fn try_update(&self, item: E) -> RepositoryResult<bool> {
        let mirrored = item.clone();
        self.mirror
            .run_async(
                TapOperation::TryUpdate,
                self.primary.try_update(item),
                || self.tap.add_or_update(mirrored),
                applied,
            )
            .await
    }

    async fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.mirror
            .run_async(
                TapOperation::TryRemove,
                self.primary.try_remove(item),
                || self.tap.remove(item),
                applied,
            )
            .await
    }

    async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.mirror
            .run_async(
                TapOperation::TryRemoveById,
                self.primary.try_remove_by_id(id),
                || self.tap.remove_by_id(id),
                applied,
            )
            .await
    }
}
