//! Lexical scope tracking
//!
//! Scopes live in a stack-shaped arena: a scope is pushed when the walk enters
//! a function-like node and popped when it leaves it, so the arena never holds
//! a scope that is not an ancestor of the current position. Each record keeps
//! the index of its enclosing scope and the names it declares; declarations
//! are collected eagerly on entry so hoisted names resolve before their
//! declaration is reached.

use rustc_hash::FxHashSet;
use swc_core::{
    common::Span,
    ecma::{
        ast::{
            ArrowExpr, BlockStmtOrExpr, CatchClause, Class, ClassDecl, Constructor, Expr, FnDecl,
            Function, GetterProp, Ident, ObjectPatProp, ParamOrTsParamProp, Pat, Script,
            SetterProp, Stmt, VarDeclarator,
        },
        visit::{Visit, VisitWith},
    },
};

use super::{
    context::TransformContext,
    stage::{Node, Transformer},
};

/// Index of a scope in the tracker's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(usize);

impl ScopeId {
    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct Scope {
    /// Span of the node that opened the scope
    pub(crate) span: Span,
    pub(crate) parent: Option<ScopeId>,
    declared: FxHashSet<String>,
}

impl Scope {
    pub(crate) fn declares(&self, name: &str) -> bool {
        self.declared.contains(name)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ScopeTracker {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl ScopeTracker {
    /// Open a scope nested in the current one and make it current
    pub(crate) fn enter(&mut self, span: Span, declared: FxHashSet<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            span,
            parent: self.current,
            declared,
        });
        self.current = Some(id);
        id
    }

    /// Close the current scope, making its parent current again
    pub(crate) fn leave(&mut self) -> Option<Scope> {
        let scope = self.scopes.pop()?;
        debug_assert_eq!(
            self.current.map(ScopeId::index),
            Some(self.scopes.len()),
            "scopes must be left in the order they were entered"
        );
        self.current = scope.parent;
        Some(scope)
    }

    pub(crate) fn current(&self) -> Option<ScopeId> {
        self.current
    }

    pub(crate) fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Innermost live scope declaring `name`, walking outward from the current one
    pub(crate) fn resolve(&self, name: &str) -> Option<ScopeId> {
        std::iter::successors(self.current, |id| self.get(*id).parent)
            .find(|id| self.get(*id).declares(name))
    }
}

/// A node that opens a scope, borrowed for the duration of a stage call
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScopeNode<'n> {
    Script(&'n Script),
    Function {
        function: &'n Function,
        /// Own name of a named function expression, visible only inside it
        name: Option<&'n Ident>,
    },
    /// A named class expression, whose name is visible only inside the class
    NamedClass {
        class: &'n Class,
        name: &'n Ident,
    },
    Arrow(&'n ArrowExpr),
    Constructor(&'n Constructor),
    Getter(&'n GetterProp),
    Setter(&'n SetterProp),
    Catch(&'n CatchClause),
}

impl ScopeNode<'_> {
    pub(crate) fn span(&self) -> Span {
        match self {
            ScopeNode::Script(script) => script.span,
            ScopeNode::Function { function, .. } => function.span,
            ScopeNode::NamedClass { class, .. } => class.span,
            ScopeNode::Arrow(arrow) => arrow.span,
            ScopeNode::Constructor(constructor) => constructor.span,
            ScopeNode::Getter(getter) => getter.span,
            ScopeNode::Setter(setter) => setter.span,
            ScopeNode::Catch(catch) => catch.span,
        }
    }

    /// Names declared directly in this scope (not in nested functions)
    pub(crate) fn declared_names(&self) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        match self {
            ScopeNode::Script(script) => collect_declarations(&script.body, &mut names),
            ScopeNode::Function { function, name } => {
                if let Some(name) = name {
                    names.insert(name.sym.to_string());
                }
                for param in &function.params {
                    collect_pat_names(&param.pat, &mut names);
                }
                if let Some(body) = &function.body {
                    collect_declarations(&body.stmts, &mut names);
                }
            }
            ScopeNode::NamedClass { name, .. } => {
                names.insert(name.sym.to_string());
            }
            ScopeNode::Arrow(arrow) => {
                for param in &arrow.params {
                    collect_pat_names(param, &mut names);
                }
                if let BlockStmtOrExpr::BlockStmt(body) = &*arrow.body {
                    collect_declarations(&body.stmts, &mut names);
                }
            }
            ScopeNode::Constructor(constructor) => {
                for param in &constructor.params {
                    if let ParamOrTsParamProp::Param(param) = param {
                        collect_pat_names(&param.pat, &mut names);
                    }
                }
                if let Some(body) = &constructor.body {
                    collect_declarations(&body.stmts, &mut names);
                }
            }
            ScopeNode::Getter(getter) => {
                if let Some(body) = &getter.body {
                    collect_declarations(&body.stmts, &mut names);
                }
            }
            ScopeNode::Setter(setter) => {
                collect_pat_names(&setter.param, &mut names);
                if let Some(body) = &setter.body {
                    collect_declarations(&body.stmts, &mut names);
                }
            }
            // The body of a catch clause hoists into the enclosing function
            ScopeNode::Catch(catch) => {
                if let Some(param) = &catch.param {
                    collect_pat_names(param, &mut names);
                }
            }
        }
        names
    }
}

/// Collect every name bound by a (possibly destructuring) pattern
pub(crate) fn collect_pat_names(pat: &Pat, names: &mut FxHashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            names.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_names(elem, names);
            }
        }
        Pat::Rest(rest) => collect_pat_names(&rest.arg, names),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(key_value) => collect_pat_names(&key_value.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.insert(assign.key.sym.to_string());
                    }
                    ObjectPatProp::Rest(rest) => collect_pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Assign(assign) => collect_pat_names(&assign.left, names),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

fn collect_declarations(stmts: &[Stmt], names: &mut FxHashSet<String>) {
    let mut collector = DeclarationCollector { names };
    for stmt in stmts {
        stmt.visit_with(&mut collector);
    }
}

/// Collects the declarations of one function body without entering nested
/// functions or expressions
struct DeclarationCollector<'a> {
    names: &'a mut FxHashSet<String>,
}

impl Visit for DeclarationCollector<'_> {
    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        collect_pat_names(&declarator.name, self.names);
    }

    fn visit_fn_decl(&mut self, fn_decl: &FnDecl) {
        self.names.insert(fn_decl.ident.sym.to_string());
    }

    fn visit_class_decl(&mut self, class_decl: &ClassDecl) {
        self.names.insert(class_decl.ident.sym.to_string());
    }

    fn visit_catch_clause(&mut self, catch: &CatchClause) {
        catch.body.visit_with(self);
    }

    // Expressions never declare names in this scope
    fn visit_expr(&mut self, _: &Expr) {}

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}
}

/// Stage keeping [`TransformContext::scopes`] in step with the walk
#[derive(Debug, Default)]
pub(crate) struct TrackScope;

impl Transformer for TrackScope {
    fn name(&self) -> &'static str {
        "track-scope"
    }

    fn enter(&mut self, node: &mut Node<'_>, cx: &mut TransformContext) {
        let Node::Scope(scope_node) = node else {
            return;
        };
        let span = scope_node.span();
        let id = cx.scopes.enter(span, scope_node.declared_names());

        if let Some(module) = cx.module.as_mut()
            && module.factory_scope.is_none()
            && module.definition.factory_span == span
        {
            log::trace!("Factory scope of '{}' is {id:?}", module.definition.name);
            module.factory_scope = Some(id);
        }
    }

    fn leave(&mut self, node: &mut Node<'_>, cx: &mut TransformContext) {
        if matches!(node, Node::Scope(_))
            && let Some(scope) = cx.scopes.leave()
        {
            log::trace!("Left scope at {:?}", scope.span);
        }
    }
}
