//! The module deminification engine
//!
//! A single walk over the bundle drives three stages, in this order:
//!
//! - `TrackScope` keeps a lexical scope arena in step with the walk.
//! - `TransformRequires` classifies identifiers bound to factory parameters
//!   and records how each must be rewritten.
//! - `TransformTrivials` canonicalizes `void 0`, `!0` and `!1`.
//!
//! When the walk leaves a `define()` call, imports are synthesized for the
//! dependencies its factory actually uses and the rewritten body is handed to a
//! [`ModuleSink`].

mod binding;
mod context;
mod define;
mod driver;
mod imports;
mod naming;
mod requires;
mod scope;
mod stage;
mod trivials;


pub use driver::{DeminifiedModule, Deminifier, DeminifyOptions, ModuleBody, ModuleSink};
