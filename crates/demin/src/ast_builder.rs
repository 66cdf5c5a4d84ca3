//! AST builder module for creating synthetic AST nodes
//!
//! Nodes that replace an existing one keep the span of the node they replace;
//! nodes with no source counterpart (imports, the wrapping module) use
//! `DUMMY_SP`.

use swc_core::{
    common::{DUMMY_SP, Span},
    ecma::ast::{
        Bool, Expr, Ident, IdentName, ImportDecl, ImportDefaultSpecifier, ImportPhase,
        ImportSpecifier, ImportStarAsSpecifier, KeyValueProp, Lit, Module, ModuleDecl, ModuleItem,
        Prop, PropName, Stmt, Str,
    },
};

/// Create an identifier without syntax context
pub fn ident(name: &str, span: Span) -> Ident {
    Ident::new_no_ctxt(name.into(), span)
}

/// Create an identifier expression: `name`
pub fn ident_expr(name: &str, span: Span) -> Expr {
    Expr::Ident(ident(name, span))
}

/// Create a boolean literal expression: `true` / `false`
pub fn bool_expr(value: bool, span: Span) -> Expr {
    Expr::Lit(Lit::Bool(Bool { span, value }))
}

/// Create a single-quoted string literal
pub fn string_literal(value: &str) -> Str {
    let mut raw = String::with_capacity(value.len() + 2);
    raw.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => raw.push_str("\\\\"),
            '\'' => raw.push_str("\\'"),
            '\n' => raw.push_str("\\n"),
            '\r' => raw.push_str("\\r"),
            '\u{2028}' => raw.push_str("\\u2028"),
            '\u{2029}' => raw.push_str("\\u2029"),
            _ => raw.push(ch),
        }
    }
    raw.push('\'');
    Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: Some(raw.into()),
    }
}

/// Expand a shorthand property `{ key }` into `{ key: value }`
pub fn key_value_prop(key: &Ident, value: &str) -> Prop {
    Prop::KeyValue(KeyValueProp {
        key: PropName::Ident(IdentName::new(key.sym.clone(), key.span)),
        value: Box::new(ident_expr(value, key.span)),
    })
}

/// Create an import declaration binding a default and/or a namespace name:
/// `import Default, * as Namespace from 'source'`
///
/// The default specifier always comes first, the only order ECMAScript accepts
/// when both are present.
pub fn import_decl(source: &str, default: Option<&str>, namespace: Option<&str>) -> ModuleItem {
    let mut specifiers = Vec::with_capacity(2);
    if let Some(local) = default {
        specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local: ident(local, DUMMY_SP),
        }));
    }
    if let Some(local) = namespace {
        specifiers.push(ImportSpecifier::Namespace(ImportStarAsSpecifier {
            span: DUMMY_SP,
            local: ident(local, DUMMY_SP),
        }));
    }

    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(string_literal(source)),
        type_only: false,
        with: None,
        phase: ImportPhase::default(),
    }))
}

/// Wrap synthesized imports and the factory statements into a standalone module
pub fn module(imports: Vec<ModuleItem>, body: Vec<Stmt>) -> Module {
    let mut items = imports;
    items.extend(body.into_iter().map(ModuleItem::Stmt));
    Module {
        span: DUMMY_SP,
        body: items,
        shebang: None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_script;

    #[test]
    fn test_string_literal_escapes_quotes() {
        let lit = string_literal("it's");
        assert_eq!(&*lit.value, "it's");
        assert_eq!(lit.raw.as_deref(), Some("'it\\'s'"));
    }

    #[test]
    fn test_string_literal_escapes_line_terminators() {
        let value = "a\\b\rc\nd\u{2028}e\u{2029}f";
        let lit = string_literal(value);
        let raw = lit.raw.as_deref().expect("raw text");
        assert_eq!(raw, "'a\\\\b\\rc\\nd\\u2028e\\u2029f'");

        let parsed = parse_script("test.js", format!("x = {raw};")).expect("valid literal");
        let Stmt::Expr(stmt) = &parsed.script.body[0] else {
            panic!("expected expression statement");
        };
        let Expr::Assign(assign) = &*stmt.expr else {
            panic!("expected assignment");
        };
        let Expr::Lit(Lit::Str(parsed_lit)) = &*assign.right else {
            panic!("expected string literal");
        };
        assert_eq!(&*parsed_lit.value, value);
    }

    #[test]
    fn test_import_decl_orders_default_first() {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) =
            import_decl("lib/util", Some("UtilDefault"), Some("Util"))
        else {
            panic!("expected an import declaration");
        };
        assert_eq!(&*import.src.value, "lib/util");
        assert!(matches!(import.specifiers[0], ImportSpecifier::Default(_)));
        assert!(matches!(import.specifiers[1], ImportSpecifier::Namespace(_)));
    }

    #[test]
    fn test_module_prepends_imports() {
        let module = module(
            vec![import_decl("a", None, Some("A"))],
            vec![Stmt::Empty(swc_core::ecma::ast::EmptyStmt { span: DUMMY_SP })],
        );
        assert_eq!(module.body.len(), 2);
        assert!(matches!(module.body[0], ModuleItem::ModuleDecl(_)));
        assert!(matches!(module.body[1], ModuleItem::Stmt(_)));
    }
}
