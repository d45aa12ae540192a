//! Aggregate root refinement of [`Entity`].

use crate::entity::Entity;

/// Aggregate root marker.
///
/// An aggregate root is the external consistency boundary for a cluster of
/// related data: repositories are expected to store aggregate roots, while the
/// entities inside the cluster are reached through their root.
pub trait AggregateRoot: Entity {}
