//! The capability shared by every transformer stage
//!
//! The driver walks the bundle once and hands each interesting node to every
//! registered stage, in registration order, once on the way down (`enter`)
//! and once on the way up (`leave`).

use swc_core::{
    common::Span,
    ecma::ast::{Expr, Ident},
};

use super::{context::TransformContext, scope::ScopeNode};

/// A node as seen by the stages
#[derive(Debug)]
pub(crate) enum Node<'n> {
    /// A node that opens a lexical scope
    Scope(ScopeNode<'n>),
    /// An identifier occurrence; only ever delivered on `leave`
    Ident(&'n mut Ident, IdentSite),
    /// Any expression, delivered after its children on `leave`
    Expr(&'n mut Expr),
}

/// Structural position of an identifier occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdentSite {
    /// Read or written as a value
    Reference,
    /// Object of a non-computed `.default` member access, e.g. the `x` in `x.default`
    DefaultObject { member: Span },
    /// Value of a shorthand property, e.g. the `x` in `{ x }`
    Shorthand,
    /// Introduces a name: parameters, declarator names, function and class names
    Binding,
}

pub(crate) trait Transformer {
    fn name(&self) -> &'static str;

    fn enter(&mut self, _node: &mut Node<'_>, _cx: &mut TransformContext) {}

    fn leave(&mut self, _node: &mut Node<'_>, _cx: &mut TransformContext) {}
}
