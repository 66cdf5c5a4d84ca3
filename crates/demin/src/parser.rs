//! Parsing of the bundle into a script AST
//!
//! The whole input is parsed once as an ECMAScript script. Any syntax error,
//! including the ones swc would recover from, is fatal: without a complete
//! tree there is nothing to continue from.

use std::fmt;

use anyhow::{Result, anyhow};
use swc_core::{
    common::{FileName, SourceMap, Spanned, sync::Lrc},
    ecma::{
        ast::{EsVersion, Script},
        parser::{EsSyntax, Syntax, error::Error as ParseError, parse_file_as_script},
    },
};

/// A parsed bundle together with the source map its spans point into
pub struct ParsedScript {
    pub source_map: Lrc<SourceMap>,
    pub script: Script,
}

impl fmt::Debug for ParsedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedScript")
            .field("statements", &self.script.body.len())
            .finish_non_exhaustive()
    }
}

/// Parse `source` as a script; `file_name` only appears in error messages
pub fn parse_script(file_name: &str, source: String) -> Result<ParsedScript> {
    let source_map = Lrc::new(SourceMap::default());
    let source_file =
        source_map.new_source_file(FileName::Real(file_name.into()).into(), source.into());

    let mut recovered = Vec::new();
    let script = parse_file_as_script(
        &source_file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|err| syntax_error(&source_map, &err))?;

    if let Some(err) = recovered.first() {
        return Err(syntax_error(&source_map, err));
    }

    log::debug!(
        "Parsed {file_name}: {} top-level statements",
        script.body.len()
    );
    Ok(ParsedScript { source_map, script })
}

fn syntax_error(source_map: &SourceMap, err: &ParseError) -> anyhow::Error {
    let loc = source_map.lookup_char_pos(err.span().lo);
    anyhow!(
        "{}:{}:{}: {}",
        loc.file.name,
        loc.line,
        loc.col_display + 1,
        err.kind().msg()
    )
}
