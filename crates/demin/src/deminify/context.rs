//! Mutable state threaded through every stage invocation

use swc_core::common::Span;

use super::{
    binding::DependencyBinding,
    define::ModuleDefinition,
    scope::{ScopeId, ScopeTracker},
};
use crate::{config::Logging, types::FxIndexSet};

/// State owned by the driver for the whole walk
#[derive(Debug, Default)]
pub(crate) struct TransformContext {
    pub(crate) scopes: ScopeTracker,
    /// The `define()` call currently being rewritten; at most one at a time
    pub(crate) module: Option<ModuleContext>,
    pub(crate) logging: Logging,
}

impl TransformContext {
    pub(crate) fn new(logging: Logging) -> Self {
        Self {
            logging,
            ..Default::default()
        }
    }
}

/// Per-module state, created on entering a `define()` call and consumed on
/// leaving it
#[derive(Debug)]
pub(crate) struct ModuleContext {
    pub(crate) definition: ModuleDefinition,
    pub(crate) bindings: DependencyBinding,
    /// Scope of the factory function, known once the walk has entered it
    pub(crate) factory_scope: Option<ScopeId>,
    pub(crate) pending: Vec<PendingUse>,
    /// Shorthand properties whose value was renamed to `require`/`exports`
    pub(crate) reserved_shorthands: Vec<(Span, &'static str)>,
    /// Every spelling a synthesized import must not collide with
    pub(crate) used_names: FxIndexSet<String>,
}

impl ModuleContext {
    pub(crate) fn new(definition: ModuleDefinition) -> Self {
        let bindings = DependencyBinding::bind(&definition);
        Self {
            definition,
            bindings,
            factory_scope: None,
            pending: Vec::new(),
            reserved_shorthands: Vec::new(),
            used_names: FxIndexSet::default(),
        }
    }
}

/// A dependency-parameter occurrence waiting for its import name
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingUse {
    /// Factory parameter spelling the occurrence refers to
    pub(crate) param: String,
    pub(crate) anchor: UseAnchor,
}

/// Where a pending use is rewritten once names are allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UseAnchor {
    /// Namespace use: rename the identifier with this span
    Ident(Span),
    /// Namespace use inside `{ x }`: expand the property with this span
    Shorthand(Span),
    /// Default use: replace the whole `x.default` member expression with this span
    DefaultMember(Span),
}

impl UseAnchor {
    pub(crate) fn is_default(self) -> bool {
        matches!(self, UseAnchor::DefaultMember(_))
    }
}
