//! Splits a concatenated, minified AMD bundle back into one ES module per
//! `define()` call.
//!
//! The pipeline is: [`parser`] turns the bundle into a script AST, the
//! [`deminify`] engine walks it once and produces a rewritten module for every
//! recognized `define()` call, and [`emit`] regenerates and writes each module.

pub mod ast_builder;
pub mod codegen;
pub mod config;
pub mod deminify;
pub mod dirs;
pub mod emit;
pub mod formatter;
pub mod orchestrator;
pub mod parser;
pub mod types;
