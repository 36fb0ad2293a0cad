//! The procedure registry: a frozen-after-startup mapping from method name
//! to `(kind, closure)`, plus the per-procedure mutex that serialises
//! concurrent invocations of the same procedure.

use std::collections::HashMap;

use introspectd_core::DaemonError;

/// How a procedure's output is produced. Each variant corresponds to
/// exactly one of the handler functions in [`crate::capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    /// Open `/proc/<closure>` and read its contents directly.
    RawProcRead,
    /// Run `closure` as a full shell command line (`sh -c`). Not used by
    /// the standard catalogue, but kept available as an alternate handler
    /// — matching the original daemon, which exposes it alongside
    /// `BuiltinCapture` without registering it for any procedure.
    ExternalShell,
    /// Tokenize `closure` on whitespace and exec the resulting argv
    /// directly (no shell), capturing its stdout.
    BuiltinCapture,
    /// Run `closure` as a `perf record` invocation, then capture either
    /// `perf report` or `perf script`.
    PerfCapture(PerfStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfStage {
    Report,
    Script,
}

/// One registered procedure.
pub struct Procedure {
    pub name: String,
    pub kind: ProcedureKind,
    pub closure: String,
    /// Serialises invocations of this procedure. Acquired by the caller
    /// for the full duration of a handler invocation (§5).
    pub lock: parking_lot::Mutex<()>,
}

impl Procedure {
    fn new(name: &str, kind: ProcedureKind, closure: &str) -> Self {
        Procedure {
            name: name.to_string(),
            kind,
            closure: closure.to_string(),
            lock: parking_lot::Mutex::new(()),
        }
    }
}

/// Name -> Procedure mapping, frozen before the accept loop begins.
pub struct Registry {
    by_name: HashMap<String, Procedure>,
    order: Vec<String>,
    frozen: bool,
}

impl Registry {
    pub fn new() -> Self {
        Registry { by_name: HashMap::new(), order: Vec::new(), frozen: false }
    }

    /// Insert a procedure. Fails if the server has already started
    /// accepting connections, or if `name` is already registered.
    pub fn register(
        &mut self,
        name: &str,
        kind: ProcedureKind,
        closure: &str,
    ) -> Result<(), DaemonError> {
        if self.frozen {
            return Err(DaemonError::RegistryFrozen);
        }
        if self.by_name.contains_key(name) {
            return Err(DaemonError::DuplicateName(name.to_string()));
        }
        self.by_name.insert(name.to_string(), Procedure::new(name, kind, closure));
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn lookup(&self, name: &str) -> Option<&Procedure> {
        self.by_name.get(name)
    }

    /// All registered names, in registration order (`ListAllMethod`'s
    /// contract, I6).
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// The standard catalogue, exactly as the original daemon's `main()`
    /// registers it (bit-exact method names and closures — both are part
    /// of the wire contract).
    pub fn with_standard_catalogue() -> Result<Registry, DaemonError> {
        let mut registry = Registry::new();
        for (name, kind, closure) in standard_catalogue() {
            registry.register(name, kind, closure)?;
        }
        Ok(registry)
    }
}

/// The standard catalogue as `(name, kind, closure)` triples, for
/// registering onto a [`Registry`] that may already hold other entries.
pub fn standard_catalogue() -> impl Iterator<Item = (&'static str, ProcedureKind, &'static str)> {
    STANDARD_CATALOGUE.iter().map(|(name, kind, closure)| (*name, *kind, *closure))
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

use ProcedureKind::*;

const STANDARD_CATALOGUE: &[(&str, ProcedureKind, &str)] = &[
    ("SayHello", BuiltinCapture, ""),
    ("ListAllMethod", BuiltinCapture, ""),
    ("GetProcMeminfo", RawProcRead, "meminfo"),
    ("GetProcLoadavg", RawProcRead, "loadavg"),
    ("GetProcVmstat", RawProcRead, "vmstat"),
    ("GetProcZoneinfo", RawProcRead, "zoneinfo"),
    ("GetProcBuddyinfo", RawProcRead, "buddyinfo"),
    ("GetProcCpuinfo", RawProcRead, "cpuinfo"),
    ("GetProcSlabinfo", RawProcRead, "slabinfo"),
    ("GetProcSwaps", RawProcRead, "swaps"),
    ("GetProcInterrupts", RawProcRead, "interrupts"),
    ("GetProcSoftirqs", RawProcRead, "softirqs"),
    ("GetProcDiskstats", RawProcRead, "diskstats"),
    ("GetProcVersion", RawProcRead, "version"),
    ("GetProcStat", RawProcRead, "stat"),
    ("GetProcModules", RawProcRead, "modules"),
    ("GetCmdIotop", BuiltinCapture, "iotop"),
    ("GetCmdFree", BuiltinCapture, "free"),
    ("GetCmdProcrank", BuiltinCapture, "procrank"),
    ("GetCmdIostat", BuiltinCapture, "iostat -d -x -k"),
    (
        "GetCmdTop",
        BuiltinCapture,
        "ps -e -o pid,user,pri,ni,vsize,rss,s,%cpu,%mem,time,cmd --sort=-%cpu ",
    ),
    ("GetCmdDmesg", BuiltinCapture, "dmesg"),
    ("GetCmdDf", BuiltinCapture, "df -h"),
    ("GetCpuInfo", BuiltinCapture, "cpuinfo"),
    ("GetCmdMpstat", BuiltinCapture, "mpstat -P ALL 1 1"),
    ("GetCmdMpstatI", BuiltinCapture, "mpstat -I ALL 1 1"),
    ("GetCmdIrqInfo", BuiltinCapture, "irq_info"),
    ("GetCmdCgtop", BuiltinCapture, "cgtop"),
    ("GetCmdPerfFaults", PerfCapture(PerfStage::Report), "perf record -a -e faults sleep 1"),
    ("GetCmdPerfCpuclock", PerfCapture(PerfStage::Report), "perf record -a -e cpu-clock sleep 1"),
    ("GetCmdPerfFlame", PerfCapture(PerfStage::Script), "perf record -F 99 -a -g -- sleep 1"),
];

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
