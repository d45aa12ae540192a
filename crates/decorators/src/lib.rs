//! `repokit-decorators`: composable wrappers around repository facades.
//!
//! - [`Tap`] / [`AsyncTap`]: mirror writes to a secondary facade, isolating
//!   its failures from the caller.
//! - [`TapUnitOfWork`] / [`AsyncTapUnitOfWork`]: the same for `commit`.
//! - [`Catch`] / [`AsyncCatch`]: intercept errors by kind.
//! - [`AsyncAdapter`] / [`BlockingAdapter`]: cross between calling conventions.
//!
//! Every decorator implements the same contracts it wraps, so they chain
//! freely, e.g. `Tap<ConcurrentStore<_>, Catch<RemoteStore>>`.

pub mod adapter;
pub mod catch;
pub mod config;
pub mod tap;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod testing;

pub use adapter::{AsyncAdapter, BlockingAdapter};
pub use catch::{AsyncCatch, Catch, CatchPolicy, ErrorFilter, ErrorHandler};
pub use config::TapConfig;
pub use tap::async_tap::AsyncTap;
pub use tap::command::Tap;
pub use tap::sink::{RecordingSink, TapFailure, TapSink};
pub use tap::unit_of_work::{AsyncTapUnitOfWork, TapUnitOfWork};
pub use tap::{TapMode, TapOperation};
