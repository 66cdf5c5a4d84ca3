//! Classification of identifier occurrences inside the active module

use log::trace;
use swc_core::ecma::ast::Ident;

use super::{
    binding::DependencyTarget,
    context::{ModuleContext, PendingUse, TransformContext, UseAnchor},
    stage::{IdentSite, Node, Transformer},
};

/// Stage recording, for every identifier bound to a factory parameter, how it
/// is to be rewritten
///
/// Occurrences resolving to the factory scope and bound to `require` or
/// `exports` are renamed immediately. Other dependency uses are queued as
/// [`PendingUse`]s for the import synthesizer. Every other spelling is added
/// to the module's used names so imports never capture it.
#[derive(Debug, Default)]
pub(crate) struct TransformRequires;

impl Transformer for TransformRequires {
    fn name(&self) -> &'static str {
        "transform-requires"
    }

    fn leave(&mut self, node: &mut Node<'_>, cx: &mut TransformContext) {
        let Node::Ident(ident, site) = node else {
            return;
        };
        let Some(module) = cx.module.as_mut() else {
            return;
        };
        let Some(factory_scope) = module.factory_scope else {
            return;
        };

        let name = ident.sym.to_string();
        if cx.scopes.resolve(&name) != Some(factory_scope) {
            module.used_names.insert(name);
            return;
        }
        let Some(target) = module.bindings.get(&name).cloned() else {
            // Parameters without a dependency still reach the synthesizer, which
            // reports and skips them
            if *site != IdentSite::Binding && module.definition.factory_params.contains(&name) {
                module.pending.push(PendingUse {
                    param: name.clone(),
                    anchor: anchor(ident, *site),
                });
            }
            module.used_names.insert(name);
            return;
        };
        if *site == IdentSite::Binding {
            return;
        }

        match target {
            DependencyTarget::Require => rename_reserved(ident, *site, "require", module),
            DependencyTarget::Exports => rename_reserved(ident, *site, "exports", module),
            DependencyTarget::Module(path) => {
                let anchor = anchor(ident, *site);
                trace!("Pending {anchor:?} of '{path}' through '{name}'");
                module.pending.push(PendingUse {
                    param: name,
                    anchor,
                });
            }
        }
    }
}

fn anchor(ident: &Ident, site: IdentSite) -> UseAnchor {
    match site {
        IdentSite::DefaultObject { member } => UseAnchor::DefaultMember(member),
        IdentSite::Shorthand => UseAnchor::Shorthand(ident.span),
        IdentSite::Reference | IdentSite::Binding => UseAnchor::Ident(ident.span),
    }
}

fn rename_reserved(
    ident: &mut Ident,
    site: IdentSite,
    word: &'static str,
    module: &mut ModuleContext,
) {
    if site == IdentSite::Shorthand {
        module.reserved_shorthands.push((ident.span, word));
    } else {
        ident.sym = word.into();
    }
}
