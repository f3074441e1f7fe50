//! Code generation orchestration for the pipeline.
//!
//! Every operation of a protocol is validated and generated on its own. A
//! failure is recorded against its operation and generation moves on, so one
//! malformed operation never hides the output of the others. An operation
//! that could not be bound onto one of its resource hosts keeps its other
//! output and records one failure per skipped host.

use codegen::{generate_operation, OperationFailure, RequestOutput};
use ir::{Namespace, Protocol};
use tracing::{debug, info, warn};

use crate::generation_context::Options;

/// Outcome of generating a whole protocol
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Namespaces of the protocol, in description order
    pub namespaces: Vec<Namespace>,
    /// Generated operations, in description order
    pub outputs: Vec<RequestOutput>,
    /// Operations that could not be generated, or only in part, in description order
    pub failures: Vec<OperationFailure>,
}

impl GenerationReport {
    /// Whether every operation was generated
    pub fn is_success(&self) -> bool { self.failures.is_empty() }

    /// Number of failed operations
    pub fn failure_count(&self) -> usize { self.failures.len() }

    /// Generated operations of namespace `name`
    pub fn outputs_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RequestOutput> {
        self.outputs.iter().filter(move |o| o.namespace == name)
    }

    /// Failure recorded for `operation`, if any
    pub fn failure(&self, operation: &str) -> Option<&OperationFailure> {
        self.failures.iter().find(|f| f.operation == operation)
    }
}

/// Generate every operation of `protocol`
pub fn generate_protocol(protocol: &Protocol, options: &Options) -> GenerationReport {
    let mut protocol = protocol.clone();
    if let Some(inject) = options.inject_methods {
        protocol.override_method_injection(inject);
    }
    let fragments = options.fragments(&protocol);

    let mut report =
        GenerationReport { namespaces: protocol.namespaces().to_vec(), ..Default::default() };
    for raw in protocol.requests() {
        match generate_operation(&protocol, raw, &fragments, options.wrap) {
            Ok(mut output) => {
                for error in std::mem::take(&mut output.host_failures) {
                    warn!(operation = %raw.name, %error, "resource method skipped");
                    report.failures.push(OperationFailure { operation: raw.name.clone(), error });
                }
                debug!(
                    operation = %output.operation,
                    namespace = %output.namespace,
                    hosts = output.methods.len(),
                    "generated operation"
                );
                report.outputs.push(output);
            }
            Err(error) => {
                warn!(operation = %raw.name, %error, "operation skipped");
                report.failures.push(OperationFailure { operation: raw.name.clone(), error });
            }
        }
    }
    info!(
        generated = report.outputs.len(),
        failed = report.failures.len(),
        "protocol generation finished"
    );
    report
}
