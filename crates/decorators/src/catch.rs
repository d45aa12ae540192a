//! Error-catching decorators.
//!
//! A catch decorator intercepts write/commit errors whose [`ErrorKind`] matches
//! its policy, hands them to an optional handler, and then either rethrows
//! them or replaces them with the operation's neutral result (`Ok(())`, or
//! `Ok(false)` for `try_*`). Non-matching errors pass through untouched, as do
//! all reads.
//!
//! Wrapping a tap facade in a swallowing `Catch` keeps arbitrary tap failures
//! away from the tap decorator itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use repokit_core::{Entity, ErrorKind, RepositoryError, RepositoryResult};
use repokit_store::{AsyncCommand, AsyncQuery, AsyncUnitOfWork, Command, Query, UnitOfWork};

/// Callback invoked for every caught error.
pub type ErrorHandler = Arc<dyn Fn(&RepositoryError) + Send + Sync>;

/// Which errors a catch decorator intercepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorFilter {
    Any,
    Kinds(Vec<ErrorKind>),
}

impl ErrorFilter {
    pub fn only(kind: ErrorKind) -> Self {
        Self::Kinds(vec![kind])
    }

    pub fn matches(&self, error: &RepositoryError) -> bool {
        match self {
            ErrorFilter::Any => true,
            ErrorFilter::Kinds(kinds) => kinds.contains(&error.kind()),
        }
    }
}

/// What to do with matching errors.
#[derive(Clone)]
pub struct CatchPolicy {
    filter: ErrorFilter,
    rethrow: bool,
    handler: Option<ErrorHandler>,
}

impl CatchPolicy {
    /// Replace matching errors with the neutral result.
    pub fn swallow(filter: ErrorFilter) -> Self {
        Self {
            filter,
            rethrow: false,
            handler: None,
        }
    }

    /// Observe matching errors through the handler, then rethrow them.
    pub fn observe(filter: ErrorFilter) -> Self {
        Self {
            filter,
            rethrow: true,
            handler: None,
        }
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RepositoryError) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn filter(&self) -> &ErrorFilter {
        &self.filter
    }

    pub fn rethrows(&self) -> bool {
        self.rethrow
    }

    fn intercept<R>(
        &self,
        operation: &'static str,
        result: RepositoryResult<R>,
        neutral: R,
    ) -> RepositoryResult<R> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) if !self.filter.matches(&err) => return Err(err),
            Err(err) => err,
        };

        debug!(
            operation,
            error_kind = %err.kind(),
            rethrow = self.rethrow,
            "caught repository error"
        );
        if let Some(handler) = &self.handler {
            handler(&err);
        }

        if self.rethrow { Err(err) } else { Ok(neutral) }
    }
}

impl core::fmt::Debug for CatchPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatchPolicy")
            .field("filter", &self.filter)
            .field("rethrow", &self.rethrow)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Blocking catch decorator.
#[derive(Debug, Clone)]
pub struct Catch<R> {
    inner: R,
    policy: CatchPolicy,
}

impl<R> Catch<R> {
    pub fn new(inner: R, policy: CatchPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<E, R> Query<E> for Catch<R>
where
    E: Entity,
    R: Query<E>,
{
    fn count(&self) -> RepositoryResult<usize> {
        self.inner.count()
    }

    fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.inner.get_all()
    }

    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.inner.get_by_id(id)
    }

    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.inner.try_get_by_id(id)
    }
}

impl<E, R> Command<E> for Catch<R>
where
    E: Entity,
    R: Command<E>,
{
    fn add(&self, item: E) -> RepositoryResult<()> {
        self.policy.intercept("add", self.inner.add(item), ())
    }

    fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        self.policy
            .intercept("add_or_update", self.inner.add_or_update(item), ())
    }

    fn update(&self, item: E) -> RepositoryResult<()> {
        self.policy.intercept("update", self.inner.update(item), ())
    }

    fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.policy.intercept("remove", self.inner.remove(item), ())
    }

    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.policy
            .intercept("remove_by_id", self.inner.remove_by_id(id), ())
    }

    fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.policy.intercept("try_add", self.inner.try_add(item), false)
    }

    fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.policy
            .intercept("try_update", self.inner.try_update(item), false)
    }

    fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.policy
            .intercept("try_remove", self.inner.try_remove(item), false)
    }

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.policy
            .intercept("try_remove_by_id", self.inner.try_remove_by_id(id), false)
    }
}

impl<R: UnitOfWork> UnitOfWork for Catch<R> {
    fn commit(&self) -> RepositoryResult<()> {
        self.policy.intercept("commit", self.inner.commit(), ())
    }
}

/// Async catch decorator.
#[derive(Debug, Clone)]
pub struct AsyncCatch<R> {
    inner: R,
    policy: CatchPolicy,
}

impl<R> AsyncCatch<R> {
    pub fn new(inner: R, policy: CatchPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<E, R> AsyncQuery<E> for AsyncCatch<R>
where
    E: Entity + Send + Sync + 'static,
    R: AsyncQuery<E>,
{
    async fn count(&self) -> RepositoryResult<usize> {
        self.inner.count().await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.inner.get_by_id(id).await
    }

    async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.inner.try_get_by_id(id).await
    }
}

#[async_trait]
impl<E, R> AsyncCommand<E> for AsyncCatch<R>
where
    E: Entity + Send + Sync + 'static,
    R: AsyncCommand<E>,
{
    async fn add(&self, item: E) -> RepositoryResult<()> {
        let result = self.inner.add(item).await;
        self.policy.intercept("add", result, ())
    }

    async fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        let result = self.inner.add_or_update(item).await;
        self.policy.intercept("add_or_update", result, ())
    }

    async fn update(&self, item: E) -> RepositoryResult<()> {
        let result = self.inner.update(item).await;
        self.policy.intercept("update", result, ())
    }

    async fn remove(&self, item: &E) -> RepositoryResult<()> {
        let result = self.inner.remove(item).await;
        self.policy.intercept("remove", result, ())
    }

    async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        let result = self.inner.remove_by_id(id).await;
        self.policy.intercept("remove_by_id", result, ())
    }

    async fn try_add(&self, item: E) -> RepositoryResult<bool> {
        let result = self.inner.try_add(item).await;
        self.policy.intercept("try_add", result, false)
    }

    async fn try_update(&self, item: E) -> RepositoryResult<bool> {
        let result = self.inner.try_update(item).await;
        self.policy.intercept("try_update", result, false)
    }

    async fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        let result = self.inner.try_remove(item).await;
        self.policy.intercept("try_remove", result, false)
    }

    async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        let result = self.inner.try_remove_by_id(id).await;
        self.policy.intercept("try_remove_by_id", result, false)
    }
}

#[async_trait]
impl<R: AsyncUnitOfWork> AsyncUnitOfWork for AsyncCatch<R> {
    async fn commit(&self) -> RepositoryResult<()> {
        let result = self.inner.commit().await;
        self.policy.intercept("commit", result, ())
    }
}
