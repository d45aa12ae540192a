//! Adapters between the blocking and async contracts.

use async_trait::async_trait;
use tokio::runtime::Handle;

use repokit_core::{Entity, RepositoryResult};
use repokit_store::{AsyncCommand, AsyncQuery, AsyncUnitOfWork, Command, Query, UnitOfWork};

/// Exposes a blocking implementation through the async contracts.
///
/// Calls run inline on the polling task, which suits implementations that
/// never block (such as `ConcurrentStore`).
#[derive(Debug, Clone, Default)]
pub struct AsyncAdapter<R> {
    inner: R,
}

impl<R> AsyncAdapter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<E, R> AsyncQuery<E> for AsyncAdapter<R>
where
    E: Entity + Send + Sync + 'static,
    R: Query<E>,
{
    async fn count(&self) -> RepositoryResult<usize> {
        self.inner.count()
    }

    async fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.inner.get_all()
    }

    async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.inner.get_by_id(id)
    }

    async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.inner.try_get_by_id(id)
    }
}

#[async_trait]
impl<E, R> AsyncCommand<E> for AsyncAdapter<R>
where
    E: Entity + Send + Sync + 'static,
    R: Command<E>,
{
    async fn add(&self, item: E) -> RepositoryResult<()> {
        self.inner.add(item)
    }

    async fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        self.inner.add_or_update(item)
    }

    async fn update(&self, item: E) -> RepositoryResult<()> {
        self.inner.update(item)
    }

    async fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.inner.remove(item)
    }

    async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.inner.remove_by_id(id)
    }

    async fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.inner.try_add(item)
    }

    async fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.inner.try_update(item)
    }

    async fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.inner.try_remove(item)
    }

    async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.inner.try_remove_by_id(id)
    }
}

#[async_trait]
impl<R: UnitOfWork> AsyncUnitOfWork for AsyncAdapter<R> {
    async fn commit(&self) -> RepositoryResult<()> {
        self.inner.commit()
    }
}

/// Exposes an async implementation through the blocking contracts.
///
/// Each call blocks the current thread on the given runtime handle, so it
/// must not be used from inside an async context (tokio panics if it is).
#[derive(Debug, Clone)]
pub struct BlockingAdapter<R> {
    inner: R,
    handle: Handle,
}

impl<R> BlockingAdapter<R> {
    pub fn new(inner: R, handle: Handle) -> Self {
        Self { inner, handle }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<E, R> Query<E> for BlockingAdapter<R>
where
    E: Entity + Send + Sync + 'static,
    R: AsyncQuery<E>,
{
    fn count(&self) -> RepositoryResult<usize> {
        self.handle.block_on(self.inner.count())
    }

    fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.handle.block_on(self.inner.get_all())
    }

    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.handle.block_on(self.inner.get_by_id(id))
    }

    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.handle.block_on(self.inner.try_get_by_id(id))
    }
}

impl<E, R> Command<E> for BlockingAdapter<R>
where
    E: Entity + Send + Sync + 'static,
    R: AsyncCommand<E>,
{
    fn add(&self, item: E) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.add(item))
    }

    fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.add_or_update(item))
    }

    fn update(&self, item: E) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.update(item))
    }

    fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.remove(item))
    }

    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.remove_by_id(id))
    }

    fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.handle.block_on(self.inner.try_add(item))
    }

    fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.handle.block_on(self.inner.try_update(item))
    }

    fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.handle.block_on(self.inner.try_remove(item))
    }

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.handle.block_on(self.inner.try_remove_by_id(id))
    }
}

impl<R: AsyncUnitOfWork> UnitOfWork for BlockingAdapter<R> {
    fn commit(&self) -> RepositoryResult<()> {
        self.handle.block_on(self.inner.commit())
    }
}
