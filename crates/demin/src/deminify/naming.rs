//! Choosing local names for synthesized imports
//!
//! A dependency path such as `lib/dom-utils` becomes `DomUtils`: the last
//! `/`- or `!`-delimited segment, converted to PascalCase. Loader plugin
//! prefixes (`loadjs!file`) get no special treatment; they are just another
//! delimiter. A segment that cannot start an identifier pulls in earlier
//! segments (`vendor/3d` becomes `Vendor3d`), and as a last resort the name
//! is prefixed with `M`.

use heck::ToUpperCamelCase;
use log::{trace, warn};

use crate::{config::Logging, types::FxIndexSet};

/// Marker prepended when no path segment can start an identifier
const FALLBACK_PREFIX: &str = "M";

/// Numeric suffixes tried, in order, when a candidate name is taken
const MAX_COLLISION_SUFFIX: usize = 9;

/// Allocates collision-free names against the set of names used in a module
#[derive(Debug)]
pub(crate) struct NameAllocator<'a> {
    used: &'a mut FxIndexSet<String>,
    logging: Logging,
}

impl<'a> NameAllocator<'a> {
    pub(crate) fn new(used: &'a mut FxIndexSet<String>, logging: Logging) -> Self {
        Self { used, logging }
    }

    /// Allocate a name for `basis` (a dependency path, possibly with a
    /// `-default` marker appended) and reserve it.
    ///
    /// When the candidate is taken, the first free of `Candidate1` ..
    /// `Candidate9` is used; if all of them are taken the candidate is used
    /// anyway and a warning is reported.
    pub(crate) fn allocate(&mut self, basis: &str) -> String {
        let candidate = candidate_name(basis);
        let name = if self.used.contains(&candidate) {
            let free = (1..=MAX_COLLISION_SUFFIX)
                .map(|suffix| format!("{candidate}{suffix}"))
                .find(|name| !self.used.contains(name));
            match free {
                Some(name) => name,
                None => {
                    if self.logging.is_verbose() {
                        warn!("Duplicate variable, may cause conflicts: {candidate}");
                    }
                    candidate
                }
            }
        } else {
            candidate
        };

        trace!("Allocated '{name}' for '{basis}'");
        self.used.insert(name.clone());
        name
    }
}

/// Name derived from a dependency path before collision handling
fn candidate_name(basis: &str) -> String {
    let name = pascal_case(&base_segment(basis));
    if starts_identifier(&name) {
        name
    } else {
        format!("{FALLBACK_PREFIX}{name}")
    }
}

/// Last path segment, extended backwards until it can start an identifier
fn base_segment(basis: &str) -> String {
    let parts: Vec<&str> = basis.split(['/', '!']).collect();
    let mut start = parts.len() - 1;
    let mut segment = parts[start].to_owned();
    while !starts_identifier(&segment) && start > 0 {
        start -= 1;
        segment = parts[start..].join("-");
    }
    if starts_identifier(&segment) {
        segment
    } else {
        format!("{FALLBACK_PREFIX}-{segment}")
    }
}

fn starts_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}

/// Words split on non-alphanumerics and case changes, each capitalized:
/// `XMLHttpRequest` becomes `XmlHttpRequest`
fn pascal_case(input: &str) -> String {
    input.to_upper_camel_case()
}
