//! Identity factories: fresh identity values for entities about to be added.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::entity::Identity;
use crate::id::EntityId;

/// Produces fresh identity values.
pub trait IdentityFactory<Id: Identity>: Send + Sync {
    fn next_id(&self) -> Id;
}

/// Suspend-capable identity factory (e.g. ids reserved from a remote sequence).
#[async_trait]
pub trait AsyncIdentityFactory<Id: Identity>: Send + Sync {
    async fn next_id(&self) -> Id;
}

#[async_trait]
impl<Id, F> AsyncIdentityFactory<Id> for F
where
    Id: Identity,
    F: IdentityFactory<Id>,
{
    async fn next_id(&self) -> Id {
        IdentityFactory::next_id(self)
    }
}

/// Time-ordered UUID identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuidFactory;

impl GuidFactory {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityFactory<EntityId> for GuidFactory {
    fn next_id(&self) -> EntityId {
        EntityId::new()
    }
}

/// Monotonic integer identities starting at 1.
#[derive(Debug)]
pub struct SequenceFactory {
    next: AtomicU64,
}

impl SequenceFactory {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start the sequence at `first`; zero is skipped since it is not a valid
    /// identity.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }
}

impl Default for SequenceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityFactory<u64> for SequenceFactory {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
