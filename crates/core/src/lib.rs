//! `repokit-core`: entity model and error taxonomy shared by every repository.
//!
//! This crate contains **no storage code**: only the identity contract entities
//! must satisfy, identity factories, and the errors repository contracts report.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod factory;
pub mod id;

pub use aggregate::AggregateRoot;
pub use entity::{Entity, Identity};
pub use error::{ErrorKind, RepositoryError, RepositoryResult};
pub use factory::{AsyncIdentityFactory, GuidFactory, IdentityFactory, SequenceFactory};
pub use id::EntityId;
