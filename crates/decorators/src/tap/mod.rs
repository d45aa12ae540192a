//! Tap decorators: mirror every successful write to a secondary facade.
//!
//! A tap decorator wraps a *primary* facade and a *tap* facade of the same
//! shape. Each write goes to the primary; an equivalent write goes to the tap:
//!
//! | primary call                  | mirrored as          |
//! |-------------------------------|----------------------|
//! | `add`, `try_add`              | `add_or_update`      |
//! | `update`, `try_update`        | `add_or_update`      |
//! | `add_or_update`               | `add_or_update`      |
//! | `remove`, `try_remove`        | `remove`             |
//! | `remove_by_id`, `try_remove_by_id` | `remove_by_id`  |
//! | `commit` (unit of work)       | `commit`             |
//!
//! The caller only ever sees the primary's outcome. Tap failures are logged at
//! `WARN` and handed to an optional [`TapSink`].
//!
//! ## Modes
//!
//! - [`TapMode::Sequential`]: primary first; the tap runs only if the primary
//!   succeeded (and, for `try_*`, returned `true`).
//! - [`TapMode::Parallel`]: both calls are dispatched together and joined
//!   before returning. The tap cannot wait for the primary's verdict, so it
//!   runs whatever the primary's outcome; a primary failure is still the only
//!   error surfaced.
//!
//!   The mirror can therefore diverge from the primary on rejected writes. A
//!   duplicate `add`, or a `try_add`/`try_update` that returns `false`, is
//!   still sent to the tap as `add_or_update`, so the tap ends up holding a
//!   value the primary refused (and an `update` of a missing identity creates
//!   it on the tap). Use sequential mode when the tap must never hold values
//!   the primary rejected.

pub mod async_tap;
pub mod command;
pub mod sink;
pub mod unit_of_work;

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use repokit_core::{RepositoryError, RepositoryResult};

use crate::config::TapConfig;
use sink::TapSink;

/// How the primary and tap calls are scheduled.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TapMode {
    #[default]
    Sequential,
    Parallel,
}

impl TapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TapMode::Sequential => "sequential",
            TapMode::Parallel => "parallel",
        }
    }
}

impl core::fmt::Display for TapMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TapMode {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(TapMode::Sequential),
            "parallel" => Ok(TapMode::Parallel),
            other => Err(RepositoryError::invalid_argument(format!(
                "unknown tap mode '{other}' (expected 'sequential' or 'parallel')"
            ))),
        }
    }
}

/// Write operation that was mirrored to a tap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TapOperation {
    Add,
    AddOrUpdate,
    Update,
    Remove,
    RemoveById,
    TryAdd,
    TryUpdate,
    TryRemove,
    TryRemoveById,
    Commit,
}

impl TapOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            TapOperation::Add => "add",
            TapOperation::AddOrUpdate => "add_or_update",
            TapOperation::Update => "update",
            TapOperation::Remove => "remove",
            TapOperation::RemoveById => "remove_by_id",
            TapOperation::TryAdd => "try_add",
            TapOperation::TryUpdate => "try_update",
            TapOperation::TryRemove => "try_remove",
            TapOperation::TryRemoveById => "try_remove_by_id",
            TapOperation::Commit => "commit",
        }
    }
}

impl core::fmt::Display for TapOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn always<R>(_: &R) -> bool {
    true
}

pub(crate) fn applied(flag: &bool) -> bool {
    *flag
}

/// Scheduling and failure routing shared by every tap decorator.
#[derive(Clone)]
pub(crate) struct Mirror {
    mode: TapMode,
    log_failures: bool,
    sink: Option<Arc<dyn TapSink>>,
}

impl Mirror {
    pub(crate) fn new(config: &TapConfig) -> Self {
        Self {
            mode: config.mode,
            log_failures: config.log_failures,
            sink: None,
        }
    }

    pub(crate) fn mode(&self) -> TapMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: TapMode) {
        self.mode = mode;
    }

    pub(crate) fn set_sink(&mut self, sink: Arc<dyn TapSink>) {
        self.sink = Some(sink);
    }

    pub(crate) fn set_log_failures(&mut self, enabled: bool) {
        self.log_failures = enabled;
    }

    fn report(&self, operation: TapOperation, error: &RepositoryError) {
        if self.log_failures {
            warn!(
                operation = operation.as_str(),
                mode = self.mode.as_str(),
                error_kind = %error.kind(),
                error = %error,
                "tap write failed; primary result kept"
            );
        }
        if let Some(sink) = &self.sink {
            sink.tap_failed(operation, error);
        }
    }

    /// Run a blocking primary/tap pair. `mirror_if` decides, in sequential
    /// mode, whether the primary's successful result warrants mirroring.
    pub(crate) fn run<R, P, T>(
        &self,
        operation: TapOperation,
        primary: P,
        tap: T,
        mirror_if: fn(&R) -> bool,
    ) -> RepositoryResult<R>
    where
        R: Send,
        P: FnOnce() -> RepositoryResult<R> + Send,
        T: FnOnce() -> RepositoryResult<()> + Send,
    {
        match self.mode {
            TapMode::Sequential => {
                let outcome = primary()?;
                if mirror_if(&outcome) {
                    if let Err(err) = tap() {
                        self.report(operation, &err);
                    }
                }
                Ok(outcome)
            }
            TapMode::Parallel => {
                let (outcome, mirrored) = rayon::join(primary, tap);
                if let Err(err) = mirrored {
                    self.report(operation, &err);
                }
                outcome
            }
        }
    }

    /// Async counterpart of [`Mirror::run`]. The tap future is only created
    /// when it is going to be awaited.
    pub(crate) async fn run_async<R, PF, T, TF>(
        &self,
        operation: TapOperation,
        primary: PF,
        tap: T,
        mirror_if: fn(&R) -> bool,
    ) -> RepositoryResult<R>
    where
        PF: Future<Output = RepositoryResult<R>>,
        T: FnOnce() -> TF,
        TF: Future<Output = RepositoryResult<()>>,
    {
        match self.mode {
            TapMode::Sequential => {
                let outcome = primary.await?;
                if mirror_if(&outcome) {
                    if let Err(err) = tap().await {
                        self.report(operation, &err);
                    }
                }
                Ok(outcome)
            }
            TapMode::Parallel => {
                let (outcome, mirrored) = tokio::join!(primary, tap());
                if let Err(err) = mirrored {
                    self.report(operation, &err);
                }
                outcome
            }
        }
    }
}

impl core::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mirror")
            .field("mode", &self.mode)
            .field("log_failures", &self.log_failures)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Builder surface shared by the tap decorators (`primary` + `tap` + `Mirror`).
macro_rules! impl_tap_builder {
    ($t:ident) => {
        impl<P, T> $t<P, T> {
            /// Sequential decorator with failure logging enabled.
            pub fn new(primary: P, tap: T) -> Self {
                Self::from_config(primary, tap, &$crate::config::TapConfig::default())
            }

            pub fn from_config(primary: P, tap: T, config: &$crate::config::TapConfig) -> Self {
                Self {
                    primary,
                    tap,
                    mirror: $crate::tap::Mirror::new(config),
                }
            }

            pub fn with_mode(mut self, mode: $crate::tap::TapMode) -> Self {
                self.mirror.set_mode(mode);
                self
            }

            /// Route swallowed tap failures to `sink`.
            pub fn with_sink(
                mut self,
                sink: std::sync::Arc<dyn $crate::tap::sink::TapSink>,
            ) -> Self {
                self.mirror.set_sink(sink);
                self
            }

            pub fn with_failure_logging(mut self, enabled: bool) -> Self {
                self.mirror.set_log_failures(enabled);
                self
            }

            pub fn mode(&self) -> $crate::tap::TapMode {
                self.mirror.mode()
            }

            pub fn primary(&self) -> &P {
                &self.primary
            }

            pub fn tap(&self) -> &T {
                &self.tap
            }

            pub fn into_parts(self) -> (P, T) {
                (self.primary, self.tap)
            }
        }

        impl<P: core::fmt::Debug, T: core::fmt::Debug> core::fmt::Debug for $t<P, T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($t))
                    .field("primary", &self.primary)
                    .field("tap", &self.tap)
                    .field("mirror", &self.mirror)
                    .finish()
            }
        }
    };
}

pub(crate) use impl_tap_builder;
