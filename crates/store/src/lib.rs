//! `repokit-store`: repository contracts and the in-memory concurrent store.
//!
//! The contracts come in two calling conventions:
//!
//! - blocking: [`Query`], [`Command`], [`Repository`], [`UnitOfWork`]
//! - suspend-capable: [`AsyncQuery`], [`AsyncCommand`], [`AsyncRepository`],
//!   [`AsyncUnitOfWork`]
//!
//! [`ConcurrentStore`] implements the blocking contracts without locks held
//! across operations; [`Joined`] assembles a repository from separate query
//! and command facets.

pub mod async_contract;
pub mod compose;
pub mod concurrent;
pub mod contract;

pub use async_contract::{AsyncCommand, AsyncQuery, AsyncRepository, AsyncUnitOfWork};
pub use compose::{join, Joined};
pub use concurrent::ConcurrentStore;
pub use contract::{validate_id, Command, Query, Repository, UnitOfWork};
