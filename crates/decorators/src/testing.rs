//! Test fixtures shared by the decorator tests.

use std::sync::{Mutex, PoisonError};

use repokit_core::{Entity, ErrorKind, RepositoryError, RepositoryResult};
use repokit_store::{Command, ConcurrentStore, Query, UnitOfWork};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: u32,
    pub name: String,
}

impl Entity for Person {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }
}

pub fn person(id: u32, name: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
    }
}

pub fn seeded_store() -> ConcurrentStore<Person> {
    ConcurrentStore::with_entities([
        person(1, "Bill"),
        person(2, "Jane"),
        person(3, "Jake"),
        person(4, "Megan"),
    ])
    .unwrap()
}

pub fn failure(kind: ErrorKind, operation: &str) -> RepositoryError {
    match kind {
        ErrorKind::InvalidArgument => RepositoryError::invalid_argument(operation.to_string()),
        ErrorKind::AlreadyExists => RepositoryError::already_exists(operation.to_string()),
        ErrorKind::NotFound => RepositoryError::not_found(operation.to_string()),
        ErrorKind::Underlying => {
            RepositoryError::underlying_msg(format!("{operation}: mirror offline"))
        }
    }
}

/// Store double: records every call and optionally fails all of them.
#[derive(Debug)]
pub struct Scripted {
    store: ConcurrentStore<Person>,
    failure: Option<ErrorKind>,
    calls: Mutex<Vec<&'static str>>,
}

impl Scripted {
    pub fn healthy() -> Self {
        Self::over(ConcurrentStore::new())
    }

    pub fn over(store: ConcurrentStore<Person>) -> Self {
        Self {
            store,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: ErrorKind) -> Self {
        Self {
            failure: Some(kind),
            ..Self::healthy()
        }
    }

    pub fn store(&self) -> &ConcurrentStore<Person> {
        &self.store
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a call without touching the store.
    pub fn record(&self, operation: &'static str) -> RepositoryResult<()> {
        self.call(operation, |_| Ok(()))
    }

    fn call<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&ConcurrentStore<Person>) -> RepositoryResult<R>,
    ) -> RepositoryResult<R> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation);
        match self.failure {
            Some(kind) => Err(failure(kind, operation)),
            None => f(&self.store),
        }
    }
}

impl Query<Person> for Scripted {
    fn count(&self) -> RepositoryResult<usize> {
        self.call("count", |s| s.count())
    }

    fn get_all(&self) -> RepositoryResult<Vec<Person>> {
        self.call("get_all", |s| s.get_all())
    }

    fn get_by_id(&self, id: &u32) -> RepositoryResult<Person> {
        self.call("get_by_id", |s| s.get_by_id(id))
    }

    fn try_get_by_id(&self, id: &u32) -> RepositoryResult<Option<Person>> {
        self.call("try_get_by_id", |s| s.try_get_by_id(id))
    }
}

impl Command<Person> for Scripted {
    fn add(&self, item: Person) -> RepositoryResult<()> {
        self.call("add", |s| s.add(item))
    }

    fn add_or_update(&self, item: Person) -> RepositoryResult<()> {
        self.call("add_or_update", |s| s.add_or_update(item))
    }

    fn update(&self, item: Person) -> RepositoryResult<()> {
        self.call("update", |s| s.update(item))
    }

    fn remove(&self, item: &Person) -> RepositoryResult<()> {
        self.call("remove", |s| s.remove(item))
    }

    fn remove_by_id(&self, id: &u32) -> RepositoryResult<()> {
        self.call("remove_by_id", |s| s.remove_by_id(id))
    }

    fn try_add(&self, item: Person) -> RepositoryResult<bool> {
        self.call("try_add", |s| s.try_add(item))
    }

    fn try_update(&self, item: Person) -> RepositoryResult<bool> {
        self.call("try_update", |s| s.try_update(item))
    }

    fn try_remove(&self, item: &Person) -> RepositoryResult<bool> {
        self.call("try_remove", |s| s.try_remove(item))
    }

    fn try_remove_by_id(&self, id: &u32) -> RepositoryResult<bool> {
        self.call("try_remove_by_id", |s| s.try_remove_by_id(id))
    }
}

impl UnitOfWork for Scripted {
    fn commit(&self) -> RepositoryResult<()> {
        self.call("commit", |s| s.commit())
    }
}
