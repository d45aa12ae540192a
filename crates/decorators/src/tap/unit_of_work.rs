//! Unit-of-work taps: mirror `commit` to a secondary unit of work.

use async_trait::async_trait;

use repokit_core::RepositoryResult;
use repokit_store::{AsyncUnitOfWork, UnitOfWork};

use super::{always, impl_tap_builder, Mirror, TapOperation};

/// Commits `primary`, then (or, in parallel mode, alongside it) `tap`.
///
/// A failed primary commit is returned as-is; a failed tap commit is only
/// logged and reported to the sink.
pub struct TapUnitOfWork<P, T> {
    primary: P,
    tap: T,
    mirror: Mirror,
}

impl_tap_builder!(TapUnitOfWork);

impl<P, T> UnitOfWork for TapUnitOfWork<P, T>
where
    P: UnitOfWork,
    T: UnitOfWork,
{
    fn commit(&self) -> RepositoryResult<()> {
        self.mirror.run(
            TapOperation::Commit,
            || self.primary.commit(),
            || self.tap.commit(),
            always,
        )
    }
}

/// Async counterpart of [`TapUnitOfWork`].
pub struct AsyncTapUnitOfWork<P, T> {
    primary: P,
    tap: T,
    mirror: Mirror,
}

impl_tap_builder!(AsyncTapUnitOfWork);

#[async_trait]
impl<P, T> AsyncUnitOfWork for AsyncTapUnitOfWork<P, T>
where
    P: AsyncUnitOfWork,
    T: AsyncUnitOfWork,
{
    async fn commit(&self) -> RepositoryResult<()> {
        self.mirror
            .run_async(
                TapOperation::Commit,
                self.primary.commit(),
                || self.tap.commit(),
                always,
            )
            .await
    }
}
