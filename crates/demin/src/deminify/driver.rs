//! The single traversal over a parsed bundle
//!
//! [`Deminifier`] walks the script once. Outside a module it only looks for
//! `define()` calls; once one matches, the call becomes the active module until
//! the walk leaves it, at which point imports are synthesized and the rewritten
//! factory body is handed to the [`ModuleSink`]. Nested `define()` calls inside
//! an active module are walked like any other call.

use std::fmt;

use anyhow::Result;
use log::{debug, warn};
use swc_core::{
    common::Span,
    ecma::{
        ast::{
            ArrowExpr, AssignTarget, BindingIdent, CallExpr, CatchClause, ClassDecl, ClassExpr,
            Constructor, Expr, FnDecl, FnExpr, ForHead, Function, GetterProp, Ident, MemberExpr,
            MemberProp, Module, Prop, Script, SetterProp, Stmt,
        },
        visit::{VisitMut, VisitMutWith},
    },
};

use super::{
    context::{ModuleContext, TransformContext},
    define::{DefineMatch, factory_function_mut, match_define},
    imports,
    requires::TransformRequires,
    scope::{ScopeNode, TrackScope},
    stage::{IdentSite, Node, Transformer},
    trivials::TransformTrivials,
};
use crate::{
    ast_builder,
    config::{Config, Logging},
};

/// Engine settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeminifyOptions {
    /// Stop after this many modules have been emitted; `None` means unlimited
    pub limit: Option<usize>,
    pub logging: Logging,
}

impl From<&Config> for DeminifyOptions {
    fn from(config: &Config) -> Self {
        Self {
            limit: config.limit,
            logging: config.logging,
        }
    }
}

/// One module split out of the bundle
#[derive(Debug, Clone, PartialEq)]
pub struct DeminifiedModule {
    /// Module name as given to `define()`; for text assets, the path after `text!`
    pub name: String,
    pub body: ModuleBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleBody {
    /// Synthesized imports followed by the rewritten factory statements
    Code(Module),
    /// Contents of a `text!` asset, emitted verbatim
    Text(String),
}

/// Receives modules as the walk finishes them
pub trait ModuleSink {
    fn emit(&mut self, module: DeminifiedModule) -> Result<()>;
}

impl ModuleSink for Vec<DeminifiedModule> {
    fn emit(&mut self, module: DeminifiedModule) -> Result<()> {
        self.push(module);
        Ok(())
    }
}

/// Drives the transformer stages over one bundle
pub struct Deminifier<'s> {
    sink: &'s mut dyn ModuleSink,
    stages: Vec<Box<dyn Transformer>>,
    cx: TransformContext,
    limit: Option<usize>,
    emitted: usize,
    /// Set once the limit is reached or the sink failed; the rest of the tree
    /// is skipped
    done: bool,
    error: Option<anyhow::Error>,
    /// Inside the target of an assignment, where binding identifiers are
    /// references to existing names
    in_assign_target: bool,
}

impl fmt::Debug for Deminifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deminifier")
            .field(
                "stages",
                &self.stages.iter().map(|stage| stage.name()).collect::<Vec<_>>(),
            )
            .field("limit", &self.limit)
            .field("emitted", &self.emitted)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'s> Deminifier<'s> {
    pub fn new(sink: &'s mut dyn ModuleSink, options: DeminifyOptions) -> Self {
        let stages: Vec<Box<dyn Transformer>> = vec![
            Box::new(TrackScope),
            Box::new(TransformRequires),
            Box::new(TransformTrivials),
        ];
        Self {
            sink,
            stages,
            cx: TransformContext::new(options.logging),
            limit: options.limit,
            emitted: 0,
            done: false,
            error: None,
            in_assign_target: false,
        }
    }

    /// Walk `script`, emitting every recognized module, and return how many
    /// modules were emitted.
    ///
    /// Factory bodies of emitted modules are moved out of `script`.
    pub fn run(mut self, script: &mut Script) -> Result<usize> {
        if self.limit == Some(0) {
            debug!("Module limit is 0, nothing to emit");
            return Ok(0);
        }

        self.enter_scope(ScopeNode::Script(script));
        script.visit_mut_children_with(&mut self);
        self.leave_scope(ScopeNode::Script(script));
        debug_assert_eq!(self.cx.scopes.depth(), 0, "unbalanced scopes after walk");

        match self.error {
            Some(err) => Err(err),
            None => Ok(self.emitted),
        }
    }

    fn enter(&mut self, node: &mut Node<'_>) {
        for stage in &mut self.stages {
            stage.enter(node, &mut self.cx);
        }
    }

    fn leave(&mut self, node: &mut Node<'_>) {
        for stage in &mut self.stages {
            stage.leave(node, &mut self.cx);
        }
    }

    fn enter_scope(&mut self, scope: ScopeNode<'_>) {
        self.enter(&mut Node::Scope(scope));
    }

    fn leave_scope(&mut self, scope: ScopeNode<'_>) {
        self.leave(&mut Node::Scope(scope));
    }

    fn ident(&mut self, ident: &mut Ident, site: IdentSite) {
        self.leave(&mut Node::Ident(ident, site));
    }

    fn function_scope(&mut self, function: &mut Function, mut name: Option<&mut Ident>) {
        let in_assign_target = std::mem::take(&mut self.in_assign_target);
        self.enter_scope(ScopeNode::Function {
            function: &*function,
            name: name.as_deref(),
        });
        if let Some(name) = name.as_deref_mut() {
            self.ident(name, IdentSite::Binding);
        }
        function.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Function {
            function: &*function,
            name: name.as_deref(),
        });
        self.in_assign_target = in_assign_target;
    }

    fn open_module(&mut self, call: &mut CallExpr, module: ModuleContext) {
        debug!(
            "Entering module '{}' ({} bound dependencies)",
            module.definition.name,
            module.bindings.len()
        );
        self.cx.module = Some(module);
        call.visit_mut_children_with(self);
        self.close_module(call);
    }

    fn close_module(&mut self, call: &mut CallExpr) {
        let Some(module) = self.cx.module.take() else {
            return;
        };
        let name = module.definition.name.clone();
        let mut synthesized = imports::synthesize(module, self.cx.logging);

        let Some(body) = factory_function_mut(call).and_then(|function| function.body.as_mut())
        else {
            return;
        };
        let mut stmts = std::mem::take(&mut body.stmts);
        synthesized.substitutions.apply(&mut stmts);

        debug!("Leaving module '{name}'");
        self.emit(DeminifiedModule {
            name,
            body: ModuleBody::Code(ast_builder::module(synthesized.imports, stmts)),
        });
    }

    fn emit(&mut self, module: DeminifiedModule) {
        if let Err(err) = self.sink.emit(module) {
            self.error = Some(err);
            self.done = true;
            return;
        }
        self.emitted += 1;
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            debug!("Reached the limit of {} modules", self.emitted);
            self.done = true;
        }
    }
}

/// The object identifier of a non-computed `x.default` access
fn default_access_object(member: &mut MemberExpr) -> Option<(Span, &mut Ident)> {
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    if &*prop.sym != "default" {
        return None;
    }
    match &mut *member.obj {
        Expr::Ident(ident) => Some((member.span, ident)),
        _ => None,
    }
}

impl VisitMut for Deminifier<'_> {
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        if self.done {
            return;
        }
        stmt.visit_mut_children_with(self);
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.done {
            return;
        }
        match expr {
            Expr::Ident(ident) => self.ident(ident, IdentSite::Reference),
            Expr::Member(member) => match default_access_object(member) {
                Some((span, ident)) => self.ident(ident, IdentSite::DefaultObject { member: span }),
                None => member.visit_mut_children_with(self),
            },
            _ => expr.visit_mut_children_with(self),
        }
        self.leave(&mut Node::Expr(expr));
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        if self.done {
            return;
        }
        if self.cx.module.is_some() {
            call.visit_mut_children_with(self);
            return;
        }

        match match_define(call) {
            DefineMatch::NotDefine => call.visit_mut_children_with(self),
            DefineMatch::Module(definition) => {
                self.open_module(call, ModuleContext::new(definition));
            }
            DefineMatch::TextAsset { path, text } => {
                debug!("Text asset '{path}'");
                self.emit(DeminifiedModule {
                    name: path,
                    body: ModuleBody::Text(text),
                });
            }
            DefineMatch::Unhandled(diagnostic) => {
                if self.cx.logging.is_verbose() {
                    warn!("{diagnostic}");
                }
                call.visit_mut_children_with(self);
            }
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        match prop {
            Prop::Shorthand(ident) => self.ident(ident, IdentSite::Shorthand),
            _ => prop.visit_mut_children_with(self),
        }
    }

    fn visit_mut_binding_ident(&mut self, binding: &mut BindingIdent) {
        let site = if self.in_assign_target {
            IdentSite::Reference
        } else {
            IdentSite::Binding
        };
        self.ident(&mut binding.id, site);
    }

    fn visit_mut_assign_target(&mut self, target: &mut AssignTarget) {
        let in_assign_target = std::mem::replace(&mut self.in_assign_target, true);
        target.visit_mut_children_with(self);
        self.in_assign_target = in_assign_target;
    }

    fn visit_mut_for_head(&mut self, head: &mut ForHead) {
        let in_assign_target =
            std::mem::replace(&mut self.in_assign_target, matches!(head, ForHead::Pat(_)));
        head.visit_mut_children_with(self);
        self.in_assign_target = in_assign_target;
    }

    fn visit_mut_fn_decl(&mut self, fn_decl: &mut FnDecl) {
        self.ident(&mut fn_decl.ident, IdentSite::Binding);
        self.function_scope(&mut fn_decl.function, None);
    }

    fn visit_mut_fn_expr(&mut self, fn_expr: &mut FnExpr) {
        let FnExpr { ident, function } = fn_expr;
        self.function_scope(function, ident.as_mut());
    }

    fn visit_mut_function(&mut self, function: &mut Function) {
        self.function_scope(function, None);
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ArrowExpr) {
        let in_assign_target = std::mem::take(&mut self.in_assign_target);
        self.enter_scope(ScopeNode::Arrow(arrow));
        arrow.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Arrow(arrow));
        self.in_assign_target = in_assign_target;
    }

    fn visit_mut_constructor(&mut self, constructor: &mut Constructor) {
        self.enter_scope(ScopeNode::Constructor(constructor));
        constructor.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Constructor(constructor));
    }

    fn visit_mut_getter_prop(&mut self, getter: &mut GetterProp) {
        self.enter_scope(ScopeNode::Getter(getter));
        getter.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Getter(getter));
    }

    fn visit_mut_setter_prop(&mut self, setter: &mut SetterProp) {
        self.enter_scope(ScopeNode::Setter(setter));
        setter.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Setter(setter));
    }

    fn visit_mut_catch_clause(&mut self, catch: &mut CatchClause) {
        self.enter_scope(ScopeNode::Catch(catch));
        catch.visit_mut_children_with(self);
        self.leave_scope(ScopeNode::Catch(catch));
    }

    fn visit_mut_class_decl(&mut self, class_decl: &mut ClassDecl) {
        self.ident(&mut class_decl.ident, IdentSite::Binding);
        class_decl.class.visit_mut_with(self);
    }

    fn visit_mut_class_expr(&mut self, class_expr: &mut ClassExpr) {
        let ClassExpr { ident, class } = class_expr;
        let Some(name) = ident.as_mut() else {
            class.visit_mut_with(self);
            return;
        };
        self.enter_scope(ScopeNode::NamedClass {
            class: &**class,
            name: &*name,
        });
        self.ident(name, IdentSite::Binding);
        class.visit_mut_with(self);
        self.leave_scope(ScopeNode::NamedClass {
            class: &**class,
            name: &*name,
        });
    }
}
