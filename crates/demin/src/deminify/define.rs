//! Recognition of AMD `define()` calls
//!
//! Only one shape opens a module:
//! `define('name', ['dep', ...], function (param, ...) { ... })` with string
//! literals for the name and every dependency, and at least one plain
//! identifier parameter. Plain-text assets loaded through the `text!` plugin
//! (`define('text!path', [], function () { return '...' })`) are recognized
//! separately. Any other `define(...)` call is reported and left untouched.

use swc_core::{
    common::Span,
    ecma::ast::{Callee, CallExpr, Expr, ExprOrSpread, Function, Lit, Pat, ReturnStmt, Stmt},
};

/// Prefix of module names loaded through the text loader plugin
const TEXT_PLUGIN_PREFIX: &str = "text!";

/// The parts of a matched `define()` call the engine needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleDefinition {
    pub(crate) name: String,
    pub(crate) dependency_paths: Vec<String>,
    /// Factory parameter names in order; may be longer or shorter than
    /// `dependency_paths`
    pub(crate) factory_params: Vec<String>,
    pub(crate) factory_span: Span,
}

/// Outcome of inspecting a call expression
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DefineMatch {
    /// Not a call to `define`
    NotDefine,
    Module(ModuleDefinition),
    /// A `text!` asset, emitted verbatim under `path`
    TextAsset { path: String, text: String },
    /// A `define` call of an unsupported shape, with a diagnostic describing it
    Unhandled(String),
}

pub(crate) fn match_define(call: &CallExpr) -> DefineMatch {
    if !is_define_callee(&call.callee) {
        return DefineMatch::NotDefine;
    }
    if let Some((path, text)) = match_text_asset(&call.args) {
        return DefineMatch::TextAsset { path, text };
    }
    match match_module(&call.args) {
        Some(definition) => DefineMatch::Module(definition),
        None => DefineMatch::Unhandled(describe_unhandled(&call.args)),
    }
}

/// The factory function of a call already matched as a module
pub(crate) fn factory_function_mut(call: &mut CallExpr) -> Option<&mut Function> {
    match call.args.get_mut(2).map(|arg| &mut *arg.expr) {
        Some(Expr::Fn(fn_expr)) => Some(&mut *fn_expr.function),
        _ => None,
    }
}

fn is_define_callee(callee: &Callee) -> bool {
    let Callee::Expr(expr) = callee else {
        return false;
    };
    matches!(&**expr, Expr::Ident(ident) if &*ident.sym == "define")
}

fn plain_arg(arg: &ExprOrSpread) -> Option<&Expr> {
    arg.spread.is_none().then_some(&*arg.expr)
}

fn string_value(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Lit(Lit::Str(string)) => Some(&*string.value),
        _ => None,
    }
}

fn string_element(elem: &Option<ExprOrSpread>) -> Option<&str> {
    elem.as_ref().and_then(plain_arg).and_then(string_value)
}

fn match_module(args: &[ExprOrSpread]) -> Option<ModuleDefinition> {
    let [name, dependencies, factory] = args else {
        return None;
    };
    let name = string_value(plain_arg(name)?)?;
    let Expr::Array(dependencies) = plain_arg(dependencies)? else {
        return None;
    };
    let dependency_paths = dependencies
        .elems
        .iter()
        .map(|elem| string_element(elem).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    let Expr::Fn(fn_expr) = plain_arg(factory)? else {
        return None;
    };
    let factory_params = identifier_params(&fn_expr.function)?;
    if factory_params.is_empty() {
        return None;
    }

    Some(ModuleDefinition {
        name: name.to_string(),
        dependency_paths,
        factory_params,
        factory_span: fn_expr.function.span,
    })
}

fn identifier_params(function: &Function) -> Option<Vec<String>> {
    function
        .params
        .iter()
        .map(|param| match &param.pat {
            Pat::Ident(binding) => Some(binding.id.sym.to_string()),
            _ => None,
        })
        .collect()
}

fn match_text_asset(args: &[ExprOrSpread]) -> Option<(String, String)> {
    let [name, dependencies, factory] = args else {
        return None;
    };
    let path = string_value(plain_arg(name)?)?.strip_prefix(TEXT_PLUGIN_PREFIX)?;
    let Expr::Array(dependencies) = plain_arg(dependencies)? else {
        return None;
    };
    let Expr::Fn(fn_expr) = plain_arg(factory)? else {
        return None;
    };
    if !dependencies.elems.is_empty() || !fn_expr.function.params.is_empty() {
        return None;
    }
    let [Stmt::Return(ReturnStmt {
        arg: Some(value), ..
    })] = fn_expr.function.body.as_ref()?.stmts.as_slice()
    else {
        return None;
    };
    let text = string_value(value)?;

    Some((path.to_string(), text.to_string()))
}

fn describe_unhandled(args: &[ExprOrSpread]) -> String {
    let module = args.first().and_then(plain_arg).and_then(string_value);
    let mut parts = Vec::with_capacity(args.len());
    if let Some(module) = module {
        parts.push(format!("'{module}'"));
    }
    parts.extend(
        args.iter()
            .skip(usize::from(module.is_some()))
            .map(describe_arg),
    );
    format!("Unhandled define() case: define({})", parts.join(", "))
}

fn describe_arg(arg: &ExprOrSpread) -> String {
    if arg.spread.is_some() {
        return "SpreadElement".to_owned();
    }
    match &*arg.expr {
        Expr::Array(array) if !array.elems.iter().all(|elem| string_element(elem).is_some()) => {
            "ArrayExpression(non-string elements)".to_owned()
        }
        Expr::Fn(fn_expr) if fn_expr.function.params.is_empty() => {
            "FunctionExpression(no parameters)".to_owned()
        }
        Expr::Fn(fn_expr)
            if !fn_expr
                .function
                .params
                .iter()
                .all(|param| matches!(param.pat, Pat::Ident(_))) =>
        {
            "FunctionExpression(non-identifier parameters)".to_owned()
        }
        expr => expr_kind(expr).to_owned(),
    }
}

/// ESTree-style name of an expression kind, for diagnostics
fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Lit(_) | Expr::Tpl(_) => "Literal",
        Expr::Array(_) => "ArrayExpression",
        Expr::Object(_) => "ObjectExpression",
        Expr::Fn(_) => "FunctionExpression",
        Expr::Arrow(_) => "ArrowFunctionExpression",
        Expr::Ident(_) => "Identifier",
        Expr::Call(_) => "CallExpression",
        Expr::Member(_) => "MemberExpression",
        Expr::Paren(_) => "ParenthesizedExpression",
        Expr::Class(_) => "ClassExpression",
        _ => "Expression",
    }
}
