//! Pipeline orchestration for the main entry points.
//!
//! This module contains the entry points that load a protocol description,
//! generate every operation and write the results.

use std::fs;
use std::path::Path;

use config::Config;
use ir::Protocol;
use tracing::{error, info};

use crate::codegen_orchestration::{generate_protocol, GenerationReport};
use crate::emission::emit;
use crate::generation_context::Options;
use crate::{PipelineError, Result};

/// Create the output directory if it does not exist yet
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Load the protocol description at `path`
pub fn load_protocol(path: &Path) -> Result<Protocol> {
    let protocol = Protocol::from_file(path)?;
    info!(
        input = %path.display(),
        namespaces = protocol.namespaces().len(),
        operations = protocol.requests().len(),
        "loaded protocol description"
    );
    Ok(protocol)
}

/// Run the pipeline described by `config`.
///
/// All operations are attempted. When some fail, nothing is written and
/// [`PipelineError::GenerationFailed`] is returned, unless `keep_going` is set,
/// in which case the operations that did generate are written anyway.
pub fn run(config: &Config, keep_going: bool) -> Result<GenerationReport> {
    let protocol = load_protocol(&config.input.path)?;
    let report = generate_protocol(&protocol, &Options::from_config(config));

    if !report.is_success() {
        for failure in &report.failures {
            error!("{}", failure);
        }
        if !keep_going {
            return Err(PipelineError::GenerationFailed { count: report.failure_count() });
        }
    }

    prepare_output_dir(&config.output.dir)?;
    let written = emit(&report, &config.output.dir)?;
    info!(files = written.len(), output = %config.output.dir.display(), "wrote generated files");
    Ok(report)
}
