//! Source regeneration for emitted modules

use anyhow::{Context, Result};
use swc_core::{
    common::{SourceMap, sync::Lrc},
    ecma::{
        ast::{EsVersion, Module},
        codegen::{Config, Emitter, text_writer::JsWriter},
    },
};

/// Print `module` as readable (non-minified) JavaScript.
///
/// `source_map` must be the map the module's spans were parsed into.
pub fn generate(source_map: &Lrc<SourceMap>, module: &Module) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default().with_target(EsVersion::latest()),
            cm: source_map.clone(),
            comments: None,
            wr: JsWriter::new(source_map.clone(), "\n", &mut buf, None),
        };
        emitter
            .emit_module(module)
            .context("Failed to generate module source")?;
    }
    String::from_utf8(buf).context("Generated source is not valid UTF-8")
}
