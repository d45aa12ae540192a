//! Join a query facet and a command facet into one repository facade.

use async_trait::async_trait;
use repokit_core::{Entity, RepositoryResult};

use crate::async_contract::{AsyncCommand, AsyncQuery};
use crate::contract::{Command, Query};

/// Repository assembled from separate read and write facets.
///
/// Reads go to `query`, writes go to `command`. Both facets must agree on the
/// entity (and therefore identity) type, which the trait bounds enforce.
#[derive(Debug, Clone)]
pub struct Joined<Q, C> {
    query: Q,
    command: C,
}

/// Shorthand for [`Joined::new`].
pub fn join<Q, C>(query: Q, command: C) -> Joined<Q, C> {
    Joined::new(query, command)
}

impl<Q, C> Joined<Q, C> {
    pub fn new(query: Q, command: C) -> Self {
        Self { query, command }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn into_parts(self) -> (Q, C) {
        (self.query, self.command)
    }
}

impl<E, Q, C> Query<E> for Joined<Q, C>
where
    E: Entity,
    Q: Query<E>,
    C: Send + Sync,
{
    fn count(&self) -> RepositoryResult<usize> {
        self.query.count()
    }

    fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.query.get_all()
    }

    fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.query.get_by_id(id)
    }

    fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.query.try_get_by_id(id)
    }
}

impl<E, Q, C> Command<E> for Joined<Q, C>
where
    E: Entity,
    Q: Send + Sync,
    C: Command<E>,
{
    fn add(&self, item: E) -> RepositoryResult<()> {
        self.command.add(item)
    }

    fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        self.command.add_or_update(item)
    }

    fn update(&self, item: E) -> RepositoryResult<()> {
        self.command.update(item)
    }

    fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.command.remove(item)
    }

    fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.command.remove_by_id(id)
    }

    fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.command.try_add(item)
    }

    fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.command.try_update(item)
    }

    fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.command.try_remove(item)
    }

    fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.command.try_remove_by_id(id)
    }
}

#[async_trait]
impl<E, Q, C> AsyncQuery<E> for Joined<Q, C>
where
    E: Entity + Send + Sync + 'static,
    Q: AsyncQuery<E>,
    C: Send + Sync,
{
    async fn count(&self) -> RepositoryResult<usize> {
        self.query.count().await
    }

    async fn get_all(&self) -> RepositoryResult<Vec<E>> {
        self.query.get_all().await
    }

    async fn get_by_id(&self, id: &E::Id) -> RepositoryResult<E> {
        self.query.get_by_id(id).await
    }

    async fn try_get_by_id(&self, id: &E::Id) -> RepositoryResult<Option<E>> {
        self.query.try_get_by_id(id).await
    }
}

#[async_trait]
impl<E, Q, C> AsyncCommand<E> for Joined<Q, C>
where
    E: Entity + Send + Sync + 'static,
    Q: Send + Sync,
    C: AsyncCommand<E>,
{
    async fn add(&self, item: E) -> RepositoryResult<()> {
        self.command.add(item).await
    }

    async fn add_or_update(&self, item: E) -> RepositoryResult<()> {
        self.command.add_or_update(item).await
    }

    async fn update(&self, item: E) -> RepositoryResult<()> {
        self.command.update(item).await
    }

    async fn remove(&self, item: &E) -> RepositoryResult<()> {
        self.command.remove(item).await
    }

    async fn remove_by_id(&self, id: &E::Id) -> RepositoryResult<()> {
        self.command.remove_by_id(id).await
    }

    async fn try_add(&self, item: E) -> RepositoryResult<bool> {
        self.command.try_add(item).await
    }

    async fn try_update(&self, item: E) -> RepositoryResult<bool> {
        self.command.try_update(item).await
    }

    async fn try_remove(&self, item: &E) -> RepositoryResult<bool> {
        self.command.try_remove(item).await
    }

    async fn try_remove_by_id(&self, id: &E::Id) -> RepositoryResult<bool> {
        self.command.try_remove_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::join;
    use crate::concurrent::ConcurrentStore;
    use crate::contract::{Command, Query, Repository};
    use repokit_core::Entity;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Sku {
        code: String,
        on_hand: i64,
    }

    impl Entity for Sku {
        type Id = String;

        fn id(&self) -> &String {
            &self.code
        }
    }

    fn sku(code: &str, on_hand: i64) -> Sku {
        Sku {
            code: code.to_string(),
            on_hand,
        }
    }

    fn assert_repository<E: Entity, R: Repository<E>>(_: &R) {}

    #[test]
    fn shared_store_behind_both_facets_reads_its_own_writes() {
        let store = Arc::new(ConcurrentStore::new());
        let repo = join(Arc::clone(&store), Arc::clone(&store));
        assert_repository::<Sku, _>(&repo);

        repo.add(sku("A-1", 5)).unwrap();
        repo.update(sku("A-1", 3)).unwrap();

        assert_eq!(repo.get_by_id(&"A-1".to_string()).unwrap().on_hand, 3);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn reads_and_writes_are_routed_to_their_own_facet() {
        let reads = ConcurrentStore::with_entities([sku("R-1", 1)]).unwrap();
        let writes: ConcurrentStore<Sku> = ConcurrentStore::new();
        let repo = join(reads, writes);

        repo.add(sku("W-1", 9)).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.try_get_by_id(&"W-1".to_string()).unwrap().is_none());

        let (reads, writes) = repo.into_parts();
        assert!(reads.contains(&"R-1".to_string()));
        assert!(writes.contains(&"W-1".to_string()));
    }
}
