//! Emission of generated text to disk.
//!
//! Per namespace this writes `<ns>.hpp`, holding the free functions and
//! classes of every generated operation, and one `<ns>_<host>_methods.inc`
//! per host that received injected methods. Files are assembled here and
//! written through [`codegen::write_generated`]; no generation decisions are
//! made in this module.

use std::path::{Path, PathBuf};

use codegen::utils::sanitize_cpp_identifier;
use codegen::RequestOutput;
use ir::Namespace;

use crate::codegen_orchestration::GenerationReport;
use crate::Result;

/// File name of a namespace's header
pub fn header_file_name(namespace: &Namespace) -> String { format!("{}.hpp", namespace.name()) }

/// File name of a namespace's methods for `host`
pub fn methods_file_name(namespace: &Namespace, host: &str) -> String {
    format!("{}_{}_methods.inc", namespace.name(), host)
}

/// C header declaring the namespace's XCB symbols
fn c_header(namespace: &Namespace) -> &str {
    if namespace.prefix().is_empty() {
        "xproto"
    } else {
        namespace.name()
    }
}

/// Render the header of `namespace` from its generated operations
pub fn render_header(namespace: &Namespace, outputs: &[&RequestOutput]) -> String {
    let ns = sanitize_cpp_identifier(namespace.name());
    let guard = format!("XPP_{}_HPP", namespace.name().to_ascii_uppercase());
    let declarations: Vec<&str> = outputs.iter().filter_map(|o| o.declaration.as_deref()).collect();
    let bodies: Vec<&str> = outputs.iter().map(|o| o.free_functions.as_str()).collect();

    let mut out = String::new();
    out.push_str(&format!(
        "// Generated by wirebind from the `{}` protocol description. Do not edit.\n\n",
        namespace.name()
    ));
    out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    out.push_str("#include <string>\n#include <vector>\n\n");
    out.push_str(&format!("#include <xcb/{}.h>\n\n", c_header(namespace)));
    out.push_str("#include \"../generic.hpp\"\n\n");
    out.push_str(&format!("namespace xpp {{ namespace {} {{\n\n", ns));
    if !declarations.is_empty() {
        out.push_str("namespace reply { namespace detail {\n");
        out.push_str(&declarations.join("\n"));
        out.push_str("\n}; }; // reply::detail\n\n");
    }
    out.push_str(&bodies.join("\n"));
    out.push_str(&format!("\n}}; }}; // namespace xpp::{}\n\n", ns));
    out.push_str(&format!("#endif // {guard}\n"));
    out
}

/// Render the methods of `namespace` injected into `host`
pub fn render_methods(namespace: &Namespace, host: &str, outputs: &[&RequestOutput]) -> String {
    let blocks: Vec<&str> = outputs
        .iter()
        .flat_map(|o| o.methods.iter())
        .filter(|m| m.host == host)
        .map(|m| m.text.as_str())
        .collect();
    format!(
        "// Generated by wirebind: `{}` methods injected into `{}`. Do not edit.\n\n{}",
        namespace.name(),
        host,
        blocks.join("\n")
    )
}

/// Hosts that received methods, connection first, then in order of appearance
fn hosts(outputs: &[&RequestOutput]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for method in outputs.iter().flat_map(|o| o.methods.iter()) {
        if !hosts.contains(&method.host) {
            hosts.push(method.host.clone());
        }
    }
    hosts
}

/// `(file name, contents)` of every file of `report`
///
/// Namespaces without any generated operation produce no files.
pub fn files(report: &GenerationReport) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for namespace in &report.namespaces {
        let outputs: Vec<&RequestOutput> = report.outputs_for(namespace.name()).collect();
        if outputs.is_empty() {
            continue;
        }
        files.push((header_file_name(namespace), render_header(namespace, &outputs)));
        for host in hosts(&outputs) {
            files.push((
                methods_file_name(namespace, &host),
                render_methods(namespace, &host, &outputs),
            ));
        }
    }
    files
}

/// Write every file of `report` under `out_dir`, returning the written paths
pub fn emit(report: &GenerationReport, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let files = files(report);
    codegen::write_generated(out_dir, &files)?;
    let written: Vec<PathBuf> = files.iter().map(|(name, _)| out_dir.join(name)).collect();
    for path in &written {
        logging::trace("emission", &format!("wrote {}", path.display()));
    }
    Ok(written)
}
