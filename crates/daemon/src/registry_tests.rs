use super::*;

#[test]
fn standard_catalogue_has_no_duplicate_names() {
    let registry = Registry::with_standard_catalogue().expect("catalogue should register cleanly");
    assert_eq!(registry.names().len(), STANDARD_CATALOGUE.len());
}

#[test]
fn list_all_method_is_present_and_ordering_matches_registration() {
    let registry = Registry::with_standard_catalogue().unwrap();
    assert!(registry.names().contains(&"ListAllMethod".to_string()));
    assert_eq!(registry.names()[0], "SayHello");
    assert_eq!(registry.names()[1], "ListAllMethod");
}

#[test]
fn lookup_finds_registered_and_misses_unknown() {
    let registry = Registry::with_standard_catalogue().unwrap();
    assert!(registry.lookup("GetProcMeminfo").is_some());
    assert!(registry.lookup("GetProcNonexistent").is_none());
}

#[test]
fn register_after_freeze_fails() {
    let mut registry = Registry::new();
    registry.freeze();
    let err = registry.register("Late", ProcedureKind::BuiltinCapture, "").unwrap_err();
    assert!(matches!(err, DaemonError::RegistryFrozen));
}

#[test]
fn duplicate_name_rejected() {
    let mut registry = Registry::new();
    registry.register("Dup", ProcedureKind::BuiltinCapture, "").unwrap();
    let err = registry.register("Dup", ProcedureKind::BuiltinCapture, "").unwrap_err();
    assert!(matches!(err, DaemonError::DuplicateName(name) if name == "Dup"));
}

#[test]
fn perf_procedures_use_the_right_stage() {
    let registry = Registry::with_standard_catalogue().unwrap();
    assert_eq!(
        registry.lookup("GetCmdPerfFaults").unwrap().kind,
        ProcedureKind::PerfCapture(PerfStage::Report)
    );
    assert_eq!(
        registry.lookup("GetCmdPerfFlame").unwrap().kind,
        ProcedureKind::PerfCapture(PerfStage::Script)
    );
}
