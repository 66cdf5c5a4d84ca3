//! Import synthesis for a finished module
//!
//! Runs once per module, after its factory body has been walked. Pending uses
//! are resolved to import names in two passes (namespace uses first, then
//! `.default` uses) and turned into a span-keyed set of substitutions that is
//! then applied to the factory body.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use swc_core::{
    common::Span,
    ecma::{
        ast::{Expr, Ident, ModuleItem, Prop, Stmt},
        visit::{VisitMut, VisitMutWith},
    },
};

use super::{
    context::{ModuleContext, UseAnchor},
    naming::NameAllocator,
};
use crate::{ast_builder, config::Logging, types::FxIndexMap};

/// Marker appended to a path before allocating its default name when the
/// same path also has a namespace import
const DEFAULT_MARKER: &str = "-default";

/// Import declarations and body rewrites for one module
#[derive(Debug)]
pub(crate) struct SynthesizedImports {
    pub(crate) imports: Vec<ModuleItem>,
    pub(crate) substitutions: Substitutions,
}

/// Allocate import names for every pending use of `module`
pub(crate) fn synthesize(module: ModuleContext, logging: Logging) -> SynthesizedImports {
    let ModuleContext {
        definition,
        bindings,
        pending,
        reserved_shorthands,
        mut used_names,
        ..
    } = module;

    let mut substitutions = Substitutions::default();
    for (span, word) in reserved_shorthands {
        substitutions.shorthands.insert(span, word.to_owned());
    }

    let mut allocator = NameAllocator::new(&mut used_names, logging);
    let mut namespace_names: FxIndexMap<&str, String> = FxIndexMap::default();
    let mut default_names: FxIndexMap<&str, String> = FxIndexMap::default();

    for pending_use in pending.iter().filter(|pending_use| !pending_use.anchor.is_default()) {
        let Some(path) = bindings.module_path(&pending_use.param) else {
            if logging.is_verbose() {
                warn!("Unhandled namespace module variable: {}", pending_use.param);
            }
            continue;
        };
        let name = namespace_names
            .entry(path)
            .or_insert_with(|| allocator.allocate(path));
        match pending_use.anchor {
            UseAnchor::Ident(span) => {
                substitutions.idents.insert(span, name.clone());
            }
            UseAnchor::Shorthand(span) => {
                substitutions.shorthands.insert(span, name.clone());
            }
            UseAnchor::DefaultMember(_) => {}
        }
    }

    for pending_use in pending.iter().filter(|pending_use| pending_use.anchor.is_default()) {
        let Some(path) = bindings.module_path(&pending_use.param) else {
            if logging.is_verbose() {
                warn!("Unhandled default module variable: {}", pending_use.param);
            }
            continue;
        };
        let name = default_names.entry(path).or_insert_with(|| {
            if namespace_names.contains_key(path) {
                allocator.allocate(&format!("{path}{DEFAULT_MARKER}"))
            } else {
                allocator.allocate(path)
            }
        });
        if let UseAnchor::DefaultMember(span) = pending_use.anchor {
            substitutions.members.insert(span, name.clone());
        }
    }

    let imports: Vec<ModuleItem> = namespace_names
        .keys()
        .chain(
            default_names
                .keys()
                .filter(|path| !namespace_names.contains_key(**path)),
        )
        .map(|path| {
            ast_builder::import_decl(
                path,
                default_names.get(path).map(String::as_str),
                namespace_names.get(path).map(String::as_str),
            )
        })
        .collect();

    debug!(
        "Module '{}': {} imports, {} rewrites",
        definition.name,
        imports.len(),
        substitutions.len()
    );
    SynthesizedImports {
        imports,
        substitutions,
    }
}

/// Renames to apply to a factory body, keyed by the span of the node to rewrite
#[derive(Debug, Default)]
pub(crate) struct Substitutions {
    /// Identifiers renamed in place
    idents: FxHashMap<Span, String>,
    /// Shorthand properties `{ x }` expanded to `{ x: Name }`
    shorthands: FxHashMap<Span, String>,
    /// `x.default` member expressions collapsed to `Name`
    members: FxHashMap<Span, String>,
}

impl Substitutions {
    pub(crate) fn len(&self) -> usize {
        self.idents.len() + self.shorthands.len() + self.members.len()
    }

    pub(crate) fn apply(&mut self, stmts: &mut [Stmt]) {
        if self.len() == 0 {
            return;
        }
        for stmt in stmts {
            stmt.visit_mut_with(self);
        }
    }
}

impl VisitMut for Substitutions {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Member(member) = expr
            && let Some(name) = self.members.get(&member.span)
        {
            *expr = ast_builder::ident_expr(name, member.span);
            return;
        }
        expr.visit_mut_children_with(self);
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(key) = prop
            && let Some(name) = self.shorthands.get(&key.span)
        {
            *prop = ast_builder::key_value_prop(key, name);
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_ident(&mut self, ident: &mut Ident) {
        if let Some(name) = self.idents.get(&ident.span) {
            ident.sym = name.as_str().into();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use swc_core::{
        common::{BytePos, DUMMY_SP},
        ecma::ast::{ImportSpecifier, ModuleDecl},
    };

    use super::*;
    use crate::deminify::{context::PendingUse, define::ModuleDefinition};

    fn span(lo: u32) -> Span {
        Span::new(BytePos(lo), BytePos(lo + 1))
    }

    fn module(deps: &[&str], params: &[&str]) -> ModuleContext {
        ModuleContext::new(ModuleDefinition {
            name: "m".to_string(),
            dependency_paths: deps.iter().map(ToString::to_string).collect(),
            factory_params: params.iter().map(ToString::to_string).collect(),
            factory_span: DUMMY_SP,
        })
    }

    fn pending(param: &str, anchor: UseAnchor) -> PendingUse {
        PendingUse {
            param: param.to_string(),
            anchor,
        }
    }

    /// `(source, default, namespace)` for each synthesized import
    fn summary(imports: &[ModuleItem]) -> Vec<(String, Option<String>, Option<String>)> {
        imports
            .iter()
            .map(|item| {
                let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
                    panic!("expected an import");
                };
                let mut default = None;
                let mut namespace = None;
                for specifier in &import.specifiers {
                    match specifier {
                        ImportSpecifier::Default(s) => default = Some(s.local.sym.to_string()),
                        ImportSpecifier::Namespace(s) => {
                            namespace = Some(s.local.sym.to_string());
                        }
                        ImportSpecifier::Named(_) => panic!("unexpected named import"),
                    }
                }
                (import.src.value.to_string(), default, namespace)
            })
            .collect()
    }

    #[test]
    fn test_namespace_and_default_get_distinct_names() {
        let mut cx = module(&["lib/util"], &["u"]);
        cx.pending = vec![
            pending("u", UseAnchor::DefaultMember(span(1))),
            pending("u", UseAnchor::Ident(span(2))),
        ];

        let synthesized = synthesize(cx, Logging::None);
        assert_eq!(
            summary(&synthesized.imports),
            vec![(
                "lib/util".to_string(),
                Some("UtilDefault".to_string()),
                Some("Util".to_string())
            )]
        );
        assert_eq!(synthesized.substitutions.members[&span(1)], "UtilDefault");
        assert_eq!(synthesized.substitutions.idents[&span(2)], "Util");
    }

    #[test]
    fn test_namespace_paths_come_before_default_only_paths() {
        let mut cx = module(&["a", "b"], &["a", "b"]);
        cx.pending = vec![
            pending("a", UseAnchor::DefaultMember(span(1))),
            pending("b", UseAnchor::Ident(span(2))),
        ];

        let synthesized = synthesize(cx, Logging::None);
        assert_eq!(
            summary(&synthesized.imports),
            vec![
                ("b".to_string(), None, Some("B".to_string())),
                ("a".to_string(), Some("A".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_repeated_uses_share_one_import() {
        let mut cx = module(&["lib/dom"], &["d"]);
        cx.pending = vec![
            pending("d", UseAnchor::Ident(span(1))),
            pending("d", UseAnchor::Shorthand(span(2))),
            pending("d", UseAnchor::Ident(span(3))),
        ];

        let synthesized = synthesize(cx, Logging::None);
        assert_eq!(synthesized.imports.len(), 1);
        assert_eq!(synthesized.substitutions.len(), 3);
        assert_eq!(synthesized.substitutions.shorthands[&span(2)], "Dom");
    }

    #[test]
    fn test_used_names_are_avoided() {
        let mut cx = module(&["lib/util"], &["u"]);
        cx.used_names.insert("Util".to_string());
        cx.pending = vec![pending("u", UseAnchor::Ident(span(1)))];

        let synthesized = synthesize(cx, Logging::None);
        assert_eq!(synthesized.substitutions.idents[&span(1)], "Util1");
    }

    #[test]
    fn test_unbound_params_are_skipped() {
        let mut cx = module(&["a"], &["a", "extra"]);
        cx.pending = vec![pending("extra", UseAnchor::Ident(span(1)))];

        let synthesized = synthesize(cx, Logging::None);
        assert!(synthesized.imports.is_empty());
        assert_eq!(synthesized.substitutions.len(), 0);
    }

    #[test]
    fn test_reserved_shorthands_are_expanded() {
        let mut cx = module(&["exports"], &["e"]);
        cx.reserved_shorthands.push((span(4), "exports"));

        let synthesized = synthesize(cx, Logging::None);
        assert!(synthesized.imports.is_empty());
        assert_eq!(synthesized.substitutions.shorthands[&span(4)], "exports");
    }
}
