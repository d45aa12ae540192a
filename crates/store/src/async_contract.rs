//! Suspend-capable versions of the repository contracts.
//!
//! Semantics match [`crate::contract`] operation for operation; only the calling
//! convention differs, so implementations backed by real I/O can yield while
//! waiting.

use std::sync::Arc;

use async_trait::async_trait;
use repokit_core::{Entity, RepositoryResult};

#[async_trait]
pub trait AsyncQuery<E>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
{
    async fn count(&self) -> RepositoryResult<usize>;

    async fn get_all(&self) -> RepositoryResult<Vec<E>>;

    async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E>;

    async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>>;
}

#[async_trait]
pub trait AsyncCommand<E>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
{
    async fn add(&self, item: E) -> RepositoryResult<()>;

    async fn add_or_update(&self, item: E) -> RepositoryResult<()>;

    async fn update(&self, item: E) -> RepositoryResult<()>;

    async fn remove(&self, item: &E) -> RepositoryResult<()>;

    async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()>;

    async fn try_add(&self, item: E) -> RepositoryResult<bool>;

    async fn try_update(&self, item: E) -> RepositoryResult<bool>;

    async fn try_remove(&self, item: &E) -> RepositoryResult<bool>;

    async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool>;
}

pub trait AsyncRepository<E>: AsyncQuery<E> + AsyncCommand<E>
where
    E: Entity + Send + Sync + 'static,
{
}

impl<E, R> AsyncRepository<E> for R
where
    E: Entity + Send + Sync + 'static,
    R: AsyncQuery<E> + AsyncCommand<E> + ?Sized,
{
}

#[async_trait]
pub trait AsyncUnitOfWork: Send + Sync {
    async fn commit(&self) -> RepositoryResult<()>;
}

macro_rules! forward_async_query {
    ($wrapper:ident) => {
        #[async_trait]
        impl<E, S> AsyncQuery<E> for $wrapper<S>
        where
            E: Entity + Send + Sync + 'static,
            S: AsyncQuery<E> + ?Sized,
        {
            async fn count(&self) -> RepositoryResult<usize> {
                (**self).count().await
            }

            async fn get_all(&self) -> RepositoryResult<Vec<E>> {
                (**self).get_all().await
            }

            async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
                (**self).get_by_id(id).await
            }

            async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
                (**self).try_get_by_id(id).await
            }
        }
    };
}

macro_rules! forward_async_command {
    ($wrapper:ident) => {
        #[async_trait]
        impl<E, S> AsyncCommand<E> for $wrapper<S>
        where
            E: Entity + Send + Sync + 'static,
            S: AsyncCommand<E> + ?Sized,
        {
            async fn add(&self, item: E) -> RepositoryResult<()> {
                (**self).add(item).await
            }

            async fn add_or_update(&self, item: E) -> RepositoryResult<()> {
                (**self).add_or_update(item).await
            }

            async fn update(&self, item: E) -> RepositoryResult<()> {
                (**self).update(item).await
            }

            async fn remove(&self, item: &E) -> RepositoryResult<()> {
                (**self).remove(item).await
            }

            async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
                (**self).remove_by_id(id).await
            }

            async fn try_add(&self, item: E) -> RepositoryResult<bool> {
                (**self).try_add(item).await
            }

            async fn try_update(&self, item: E) -> RepositoryResult<bool> {
                (**self).try_update(item).await
            }

            async fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
                (**self).try_remove(item).await
            }

            async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
                (**self).try_remove_by_id(id).await
            }
        }
    };
}

macro_rules! forward_async_unit_of_work {
    ($wrapper:ident) => {
        #[async_trait]
        impl<S> AsyncUnitOfWork for $wrapper<S>
        where
            S: AsyncUnitOfWork + ?Sized,
        {
            async fn commit(&self) -> RepositoryResult<()> {
                (**self).commit().await
            }
        }
    };
}

forward_async_query!(Arc);
forward_async_query!(Box);
forward_async_command!(Arc);
forward_async_command!(Box);
forward_async_unit_of_work!(Arc);
forward_async_unit_of_work!(Box);
