use std::sync::Arc;

use repokit_core::{Entity, Identity, RepositoryError, RepositoryResult};

/// Read-only facet of a repository.
///
/// ## Consistency
///
/// No isolation level is promised. `count()` and `get_all()` may or may not
/// reflect writes that race with them; `get_all()` returns values in no
/// particular order.
///
/// ## Validation
///
/// Lookups reject invalid identity values (see [`Identity::is_valid`]) with
/// `RepositoryError::InvalidArgument` before touching storage.
pub trait Query<E: Entity>: Send + Sync {
    /// Current number of stored entities.
    fn count(&self) -> RepositoryResult<usize>;

    /// Snapshot of the stored entities, unordered.
    fn get_all(&self) -> RepositoryResult<Vec<E>>;

    /// Fetch an entity, failing with `NotFound` when it is absent.
    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E>;

    /// Fetch an entity, returning `None` when it is absent.
    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>>;
}

/// Write-only facet of a repository.
///
/// Every operation validates its input first and fails with `InvalidArgument`
/// before any mutation is attempted. The `try_*` variants report
/// `AlreadyExists`/`NotFound` situations as `Ok(false)` instead of an error.
pub trait Command<E: Entity>: Send + Sync {
    /// Insert a new entity; `AlreadyExists` if the identity is taken.
    fn add(&self, item: E) -> RepositoryResult<()>;

    /// Unconditional upsert (last writer wins).
    fn add_or_update(&self, item: E) -> RepositoryResult<()>;

    /// Replace an existing entity; `NotFound` if the identity is absent.
    fn update(&self, item: E) -> RepositoryResult<()>;

    /// Remove the entity with `item`'s identity. Absent entities are a no-op.
    fn remove(&self, item: &E) -> RepositoryResult<()>;

    /// Remove by identity. Absent entities are a no-op.
    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()>;

    fn try_add(&self, item: E) -> RepositoryResult<bool>;

    fn try_update(&self, item: E) -> RepositoryResult<bool>;

    fn try_remove(&self, item: &E) -> RepositoryResult<bool>;

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool>;
}

/// Full repository: the union of the query and command facets.
pub trait Repository<E: Entity>: Query<E> + Command<E> {}

impl<E, R> Repository<E> for R
where
    E: Entity,
    R: Query<E> + Command<E> + ?Sized,
{
}

/// Commit boundary for a set of pending changes.
pub trait UnitOfWork: Send + Sync {
    fn commit(&self) -> RepositoryResult<()>;
}

/// Reject unset identity values.
pub fn validate_id<Id: Identity>(id: &Id) -> RepositoryResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(RepositoryError::invalid_argument(format!(
            "identity value {id:?} is not set"
        )))
    }
}

macro_rules! forward_query {
    ($wrapper:ident) => {
        impl<E, S> Query<E> for $wrapper<S>
        where
            E: Entity,
            S: Query<E> + ?Sized,
        {
            fn count(&self) -> RepositoryResult<usize> {
                (**self).count()
            }

            fn get_all(&self) -> RepositoryResult<Vec<E>> {
                (**self).get_all()
            }

            fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
                (**self).get_by_id(id)
            }

            fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
                (**self).try_get_by_id(id)
            }
        }
    };
}

macro_rules! forward_command {
    ($wrapper:ident) => {
        impl<E, S> Command<E> for $wrapper<S>
        where
            E: Entity,
            S: Command<E> + ?Sized,
        {
            fn add(&self, item: E) -> RepositoryResult<()> {
                (**self).add(item)
            }

            fn add_or_update(&self, item: E) -> RepositoryResult<()> {
                (**self).add_or_update(item)
            }

            fn update(&self, item: E) -> RepositoryResult<()> {
                (**self).update(item)
            }

            fn remove(&self, item: &E) -> RepositoryResult<()> {
                (**self).remove(item)
            }

            fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
                (**self).remove_by_id(id)
            }

            fn try_add(&self, item: E) -> RepositoryResult<bool> {
                (**self).try_add(item)
            }

            fn try_update(&self, item: E) -> RepositoryResult<bool> {
                (**self).try_update(item)
            }

            fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
                (**self).try_remove(item)
            }

            fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
                (**self).try_remove_by_id(id)
            }
        }
    };
}

macro_rules! forward_unit_of_work {
    ($wrapper:ident) => {
        impl<S> UnitOfWork for $wrapper<S>
        where
            S: UnitOfWork + ?Sized,
        {
            fn commit(&self) -> RepositoryResult<()> {
                (**self).commit()
            }
        }
    };
}

forward_query!(Arc);
forward_query!(Box);
forward_command!(Arc);
forward_command!(Box);
forward_unit_of_work!(Arc);
forward_unit_of_work!(Box);
