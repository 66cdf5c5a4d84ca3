//! One deminify run, from bundle file to output folder

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::Config,
    deminify::{Deminifier, DeminifyOptions},
    emit::OutputWriter,
    parser::parse_script,
};

/// Split the bundle at `input` into modules under the configured output folder
/// and return how many modules were emitted.
pub fn deminify_file(input: &Path, config: &Config) -> Result<usize> {
    let output_folder = config.output_folder()?;
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read bundle {}", input.display()))?;

    let mut parsed = parse_script(&input.display().to_string(), source)?;

    if config.clean && !config.dry {
        clean_output_folder(output_folder)?;
    }

    let mut writer = OutputWriter::new(parsed.source_map.clone(), output_folder, config);
    let emitted =
        Deminifier::new(&mut writer, DeminifyOptions::from(config)).run(&mut parsed.script)?;

    info!(
        "Deminified {emitted} modules from {} into {}",
        input.display(),
        output_folder.display()
    );
    Ok(emitted)
}

fn clean_output_folder(output_folder: &Path) -> Result<()> {
    debug!("Removing {}", output_folder.display());
    match fs::remove_dir_all(output_folder) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("Failed to clean output folder {}", output_folder.display())),
    }
}
