//! The output-capture facility (§4.2): given a procedure's kind and
//! closure, produce its raw output bytes, then uniformly truncate and
//! append the sentinel.
//!
//! Per §9's re-architecture notes, nothing here hijacks the process-wide
//! standard output the way the original did with `dup2`. Every probe is
//! given an explicit sink — in this port, that sink is simply "the
//! `Vec<u8>` a subprocess writes to its own stdout pipe," which `Command`
//! already isolates per-child.

use std::io::Read;
use std::process::Command;

use introspectd_core::limits::SENTINEL;
use introspectd_core::Limits;

use crate::registry::{PerfStage, Procedure, ProcedureKind};
use crate::Registry;

/// Run one procedure's handler and produce its finished, sentinel-bearing
/// result string, or `None` on probe failure (§7: "probe failure" ->
/// null result, not an error response).
///
/// Acquires `proc.lock` for the full duration, per §5's shared-resource
/// policy — this is the one place that lock is taken.
pub fn invoke(proc: &Procedure, registry: &Registry, limits: &Limits) -> Option<String> {
    let _guard = proc.lock.lock();

    let raw = match proc.kind {
        ProcedureKind::RawProcRead => read_proc(&proc.closure, limits.proc_max),
        ProcedureKind::ExternalShell => run_shell(&proc.closure),
        ProcedureKind::BuiltinCapture => run_builtin(&proc.name, &proc.closure, registry),
        ProcedureKind::PerfCapture(stage) => run_perf(&proc.closure, stage),
    };

    raw.map(|bytes| finish(bytes, limits))
}

/// **raw-proc-read**: open `/proc/<closure>`, read up to `proc_max` bytes.
fn read_proc(closure: &str, proc_max: usize) -> Option<Vec<u8>> {
    let mut file = std::fs::File::open(format!("/proc/{closure}")).ok()?;
    let mut buf = Vec::with_capacity(proc_max.min(64 * 1024));
    file.take(proc_max as u64).read_to_end(&mut buf).ok()?;
    Some(buf)
}

/// **builtin-capture**: `SayHello`/`ListAllMethod` are synthesized
/// in-process (there is no external `say_hello` binary); `cpuinfo` and
/// `irq_info` closures are direct `/proc` reads dressed up as builtins,
/// matching the original's dedicated (non-`read_proc`) code paths for
/// them; everything else tokenizes the closure into argv and execs it
/// directly, no shell involved.
fn run_builtin(name: &str, closure: &str, registry: &Registry) -> Option<Vec<u8>> {
    match name {
        "SayHello" => Some(b"Hello!".to_vec()),
        "ListAllMethod" => Some(registry.names().join(" ").into_bytes()),
        _ => match closure {
            "cpuinfo" => std::fs::read("/proc/cpuinfo").ok(),
            "irq_info" => std::fs::read("/proc/interrupts").ok(),
            _ => exec_argv(closure),
        },
    }
}

/// **perf-capture(report|script)**: run the record command line to
/// completion, then capture `perf report` (or `perf script`) exactly as
/// a builtin would.
fn run_perf(record_argv: &str, stage: PerfStage) -> Option<Vec<u8>> {
    let mut tokens = record_argv.split_whitespace();
    let program = tokens.next()?;
    let status = Command::new(program).args(tokens).status().ok()?;
    if !status.success() {
        return None;
    }

    match stage {
        PerfStage::Report => exec_argv("perf report"),
        PerfStage::Script => exec_argv("perf script"),
    }
}

/// **external-shell**: run `closure` as a full shell command line, as
/// `popen(3)` would. Not used by the standard catalogue; kept as an
/// available handler (§4.1 note).
fn run_shell(closure: &str) -> Option<Vec<u8>> {
    let output = Command::new("sh").arg("-c").arg(closure).output().ok()?;
    Some(output.stdout)
}

fn exec_argv(command_line: &str) -> Option<Vec<u8>> {
    let mut tokens = command_line.split_whitespace();
    let program = tokens.next()?;
    let output = Command::new(program).args(tokens).output().ok()?;
    Some(output.stdout)
}

/// Truncate to what the capture budget can hold once the sentinel is
/// appended, converting non-UTF-8 bytes lossily (§4.2.1), and append the
/// sentinel (§4.2, I2).
fn finish(raw: Vec<u8>, limits: &Limits) -> String {
    let body_max = limits.capture_body_max();
    let mut text = String::from_utf8_lossy(&raw).into_owned();
    if text.len() > body_max {
        let mut cut = body_max;
        while cut > 0 && !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text.push_str(SENTINEL);
    text
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
