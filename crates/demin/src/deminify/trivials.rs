//! Canonicalization of minifier constant idioms

use swc_core::ecma::ast::{Expr, Lit, UnaryExpr, UnaryOp};

use super::{
    context::TransformContext,
    stage::{Node, Transformer},
};
use crate::ast_builder;

/// Stage rewriting `void 0` to `undefined`, `!0` to `true` and `!1` to `false`
#[derive(Debug, Default)]
pub(crate) struct TransformTrivials;

impl Transformer for TransformTrivials {
    fn name(&self) -> &'static str {
        "transform-trivials"
    }

    fn leave(&mut self, node: &mut Node<'_>, _cx: &mut TransformContext) {
        if let Node::Expr(expr) = node
            && let Some(simplified) = simplify_unary(expr)
        {
            **expr = simplified;
        }
    }
}

/// Replacement for a unary expression over the numeric literal `0` or `1`
fn simplify_unary(expr: &Expr) -> Option<Expr> {
    let Expr::Unary(UnaryExpr { span, op, arg }) = expr else {
        return None;
    };
    let Expr::Lit(Lit::Num(number)) = &**arg else {
        return None;
    };

    match op {
        UnaryOp::Void if number.value == 0.0 => Some(ast_builder::ident_expr("undefined", *span)),
        UnaryOp::Bang if number.value == 0.0 => Some(ast_builder::bool_expr(true, *span)),
        UnaryOp::Bang if number.value == 1.0 => Some(ast_builder::bool_expr(false, *span)),
        _ => None,
    }
}
