//! Positional binding of factory parameters to dependency paths

use super::define::ModuleDefinition;
use crate::types::FxIndexMap;

/// What a factory parameter stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DependencyTarget {
    /// The loader's `require` function; renamed in place, never imported
    Require,
    /// The module's `exports` object; renamed in place, never imported
    Exports,
    /// Any other dependency, turned into an import of this path
    Module(String),
}

impl DependencyTarget {
    fn from_path(path: &str) -> Self {
        match path {
            "require" => DependencyTarget::Require,
            "exports" => DependencyTarget::Exports,
            _ => DependencyTarget::Module(path.to_owned()),
        }
    }
}

/// Parameter name → dependency for the active module
#[derive(Debug, Default)]
pub(crate) struct DependencyBinding {
    targets: FxIndexMap<String, DependencyTarget>,
}

impl DependencyBinding {
    /// Bind parameters to dependencies by position.
    ///
    /// Binding stops at the shorter list: trailing dependencies without a
    /// parameter are never referenced, and trailing parameters without a
    /// dependency refer to nothing.
    pub(crate) fn bind(definition: &ModuleDefinition) -> Self {
        let targets = definition
            .factory_params
            .iter()
            .zip(&definition.dependency_paths)
            .map(|(param, path)| (param.clone(), DependencyTarget::from_path(path)))
            .collect();
        Self { targets }
    }

    pub(crate) fn get(&self, param: &str) -> Option<&DependencyTarget> {
        self.targets.get(param)
    }

    /// Dependency path of a parameter bound to an importable module
    pub(crate) fn module_path(&self, param: &str) -> Option<&str> {
        match self.targets.get(param)? {
            DependencyTarget::Module(path) => Some(path.as_str()),
            DependencyTarget::Require | DependencyTarget::Exports => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use swc_core::common::DUMMY_SP;

    use super::*;

    fn definition(deps: &[&str], params: &[&str]) -> ModuleDefinition {
        ModuleDefinition {
            name: "m".to_string(),
            dependency_paths: deps.iter().map(ToString::to_string).collect(),
            factory_params: params.iter().map(ToString::to_string).collect(),
            factory_span: DUMMY_SP,
        }
    }

    #[test]
    fn test_reserved_paths() {
        let binding = DependencyBinding::bind(&definition(
            &["require", "exports", "lib/dom"],
            &["r", "e", "d"],
        ));
        assert_eq!(binding.get("r"), Some(&DependencyTarget::Require));
        assert_eq!(binding.get("e"), Some(&DependencyTarget::Exports));
        assert_eq!(binding.module_path("d"), Some("lib/dom"));
        assert_eq!(binding.module_path("r"), None);
    }

    #[test]
    fn test_binding_truncates_to_shorter_list() {
        let extra_deps = DependencyBinding::bind(&definition(&["a", "b", "c"], &["x"]));
        assert_eq!(extra_deps.len(), 1);
        assert_eq!(extra_deps.module_path("x"), Some("a"));

        let extra_params = DependencyBinding::bind(&definition(&["a"], &["x", "y"]));
        assert_eq!(extra_params.len(), 1);
        assert_eq!(extra_params.get("y"), None);
    }

    #[test]
    fn test_duplicate_params_keep_last_binding() {
        let binding = DependencyBinding::bind(&definition(&["a", "b"], &["x", "x"]));
        assert_eq!(binding.module_path("x"), Some("b"));
    }
}
