//! Error types for the engine, host renderers, hooks and configuration.

use thiserror::Error;

use crate::state::HookKind;
use crate::types::FiberId;

/// Failure reported by a [`HostRenderer`](crate::HostRenderer).
///
/// Host calls are not retried. A failing call aborts the current commit.
#[derive(Debug, Error)]
pub enum HostError {
    /// The handle does not name a live host node.
    #[error("unknown host node {0}")]
    UnknownNode(String),

    /// `detach` was asked to remove a node that is not a child of `parent`.
    #[error("host node {child} is not attached to {parent}")]
    NotAttached { parent: String, child: String },

    /// The fiber type cannot be materialized as a host node.
    #[error("cannot create a host node for `{0}`")]
    UnsupportedType(String),

    /// I/O failure while writing host output.
    #[error("host I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Hook call order or shape differed between two renders of the same fiber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// A different primitive was called at this index than last render.
    #[error("hook #{index} was a {found} hook last render but is now a {expected} hook")]
    ShapeMismatch {
        index: usize,
        expected: HookKind,
        found: HookKind,
    },

    /// Same primitive, different value type.
    #[error("{kind} hook #{index} held `{found}` last render but now holds `{expected}`")]
    TypeMismatch {
        index: usize,
        kind: HookKind,
        expected: &'static str,
        found: &'static str,
    },

    /// The component called a different number of hooks.
    #[error("component called {current} hooks but called {previous} last render")]
    CountMismatch { previous: usize, current: usize },
}

/// Errors surfaced by the work loop and the commit.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A host renderer call failed.
    #[error("host renderer failed: {0}")]
    Host(#[from] HostError),

    /// A component broke the hook call-order contract.
    #[error("hook contract violated in component `{component}`: {source}")]
    Hook {
        component: &'static str,
        #[source]
        source: HookError,
    },

    /// No ancestor of the fiber holds a host node.
    #[error("fiber {fiber:?} has no host-bearing ancestor")]
    DetachedFiber { fiber: FiberId },

    /// An earlier commit failed partway and the host tree is out of sync.
    #[error("engine poisoned by the failed commit of generation {generation}")]
    Poisoned { generation: u64 },

    /// A fiber tagged UPDATE has no prior-generation counterpart.
    #[error("fiber {fiber:?} is tagged UPDATE but has no alternate")]
    MissingAlternate { fiber: FiberId },
}

/// Invalid [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a config.
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The event prefix must be non-empty or every prop would be an event.
    #[error("event prefix must not be empty")]
    EmptyEventPrefix,
}
