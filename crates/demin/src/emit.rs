//! Writing deminified modules to the output folder

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use swc_core::common::{SourceMap, sync::Lrc};

use crate::{
    codegen,
    config::Config,
    deminify::{DeminifiedModule, ModuleBody, ModuleSink},
    formatter::Prettier,
};

/// Sink regenerating each module and writing it under the output folder
///
/// Code modules land at `<output>/<name>.js`, text assets at `<output>/<path>`.
pub struct OutputWriter {
    source_map: Lrc<SourceMap>,
    output_folder: PathBuf,
    dry: bool,
    prettier: Option<Prettier>,
}

impl fmt::Debug for OutputWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputWriter")
            .field("output_folder", &self.output_folder)
            .field("dry", &self.dry)
            .field("prettier", &self.prettier)
            .finish_non_exhaustive()
    }
}

impl OutputWriter {
    pub fn new(source_map: Lrc<SourceMap>, output_folder: &Path, config: &Config) -> Self {
        Self {
            source_map,
            output_folder: output_folder.to_path_buf(),
            dry: config.dry,
            prettier: config.prettier.then(Prettier::default),
        }
    }

    /// Format code modules with this formatter instead of none
    pub fn with_prettier(mut self, prettier: Prettier) -> Self {
        self.prettier = Some(prettier);
        self
    }

    /// Where a module named `name` is written; leading `/` are ignored so
    /// every module stays inside the output folder
    fn target_path(&self, name: &str) -> PathBuf {
        self.output_folder.join(name.trim_start_matches('/'))
    }
}

impl ModuleSink for OutputWriter {
    fn emit(&mut self, module: DeminifiedModule) -> Result<()> {
        let DeminifiedModule { name, body } = module;
        let (path, contents) = match body {
            ModuleBody::Code(ast) => {
                let file_name = format!("{name}.js");
                let mut code = codegen::generate(&self.source_map, &ast)
                    .with_context(|| format!("Failed to generate {name}"))?;
                if let Some(prettier) = &self.prettier {
                    code = prettier.format(&code, &file_name)?;
                }
                (self.target_path(&file_name), code)
            }
            ModuleBody::Text(text) => (self.target_path(&name), text),
        };

        info!("Emitting {name}");
        if self.dry {
            return Ok(());
        }
        write_file(&path, &contents)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
