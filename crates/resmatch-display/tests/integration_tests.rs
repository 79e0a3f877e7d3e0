//! Integration tests for the display controller and session policy

use resmatch_display::mock::{MockBackend, MockProfile};
use resmatch_display::{
    ApplyOutcome, ChangeFlag, DisplayBackend, DisplayChangeError, DisplayController, DisplayMode,
    DriverHealth, DriverInfoProbe, ExitPolicy, INFO_UNAVAILABLE, RawMode, Session,
};
use std::time::{Duration, Instant};

fn raw(width: u32, height: u32, refresh_rate: u32) -> RawMode {
    RawMode::new(width, height, 32, refresh_rate)
}

/// Mode list with duplicates, tiny modes and shuffled order
fn noisy_backend() -> MockBackend {
    MockBackend::with_modes(
        DisplayMode::new(1920, 1080),
        vec![
            raw(1920, 1080, 60),
            raw(640, 480, 60),
            raw(1366, 768, 60),
            raw(800, 600, 60),
            raw(1920, 1080, 144),
            raw(799, 1200, 60),
            raw(1366, 768, 75),
            raw(800, 600, 72),
            raw(1280, 1024, 60),
            raw(1600, 900, 60),
        ],
    )
}

#[test]
fn test_enumerated_modes_respect_width_filter() {
    let controller = DisplayController::new(noisy_backend());
    let modes = controller.enumerate_supported_modes();

    assert!(!modes.is_empty());
    assert!(modes.iter().all(|m| m.width() >= 800));
}

#[test]
fn test_enumerated_modes_are_unique() {
    let controller = DisplayController::new(noisy_backend());
    let modes = controller.enumerate_supported_modes().into_vec();

    let mut deduped = modes.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), modes.len());
}

#[test]
fn test_enumerated_modes_ascend_by_area() {
    for profile in MockProfile::all() {
        let controller = DisplayController::new(MockBackend::new(*profile));
        let modes = controller.enumerate_supported_modes();

        for pair in modes.as_slice().windows(2) {
            assert!(pair[0].area() <= pair[1].area(), "{:?} in {:?}", pair, profile);
        }
    }
}

#[test]
fn test_three_mode_scenario_any_input_order() {
    let orders = [
        [(800, 600), (1366, 768), (1920, 1080)],
        [(1920, 1080), (1366, 768), (800, 600)],
        [(1366, 768), (1920, 1080), (800, 600)],
    ];

    for order in orders {
        let modes = order.iter().map(|&(w, h)| raw(w, h, 60)).collect();
        let controller =
            DisplayController::new(MockBackend::with_modes(DisplayMode::new(800, 600), modes));

        let areas: Vec<u64> = controller
            .enumerate_supported_modes()
            .iter()
            .map(DisplayMode::area)
            .collect();
        assert_eq!(areas, vec![480_000, 1_049_088, 2_073_600]);
    }
}

#[test]
fn test_empty_driver_is_not_an_error() {
    let controller = DisplayController::new(MockBackend::new(MockProfile::NoDriver));
    let modes = controller.enumerate_supported_modes();

    assert!(modes.is_empty());
    assert_eq!(DriverHealth::assess(&modes), DriverHealth::Missing);
}

#[test]
fn test_legacy_driver_is_limited() {
    let controller = DisplayController::new(MockBackend::new(MockProfile::LegacyDriver));
    let modes = controller.enumerate_supported_modes();
    assert_eq!(DriverHealth::assess(&modes), DriverHealth::Limited);
}

#[test]
fn test_bad_mode_code_leaves_session_untouched() {
    let backend = MockBackend::new(MockProfile::Desktop);
    backend.script_apply(-2);
    let mut session = Session::start(DisplayController::new(backend.clone()));

    let target = DisplayMode::new(1280, 720);
    match session.select(target) {
        ApplyOutcome::Failed(mode, err) => {
            assert_eq!(mode, target);
            assert_eq!(err, DisplayChangeError::BadMode);
            assert_eq!(err.to_string(), "Resolution not supported by the video driver.");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(session.current(), DisplayMode::new(1920, 1080));
}

#[test]
fn test_unmapped_code_reports_raw_value() {
    let backend = MockBackend::new(MockProfile::Desktop);
    backend.script_apply(42);
    let controller = DisplayController::new(backend);

    let err = controller.apply_mode(1280, 720).unwrap_err();
    assert_eq!(err, DisplayChangeError::Unknown(42));
    assert!(err.to_string().contains("code 42"));
}

#[test]
fn test_controller_reapplies_equal_mode() {
    let backend = MockBackend::new(MockProfile::Desktop);
    let controller = DisplayController::new(backend.clone());

    assert!(controller.apply_mode(1920, 1080).is_ok());
    assert_eq!(
        backend.requests(),
        vec![(DisplayMode::new(1920, 1080), ChangeFlag::Persist)]
    );
}

#[test]
fn test_full_support_session() {
    let backend = MockBackend::new(MockProfile::Desktop);
    let mut session = Session::start(DisplayController::new(backend.clone()));
    let original = session.original();

    let modes = session.controller().enumerate_supported_modes();
    let smallest = modes.get(0).unwrap();

    assert!(session.select(smallest).changed());
    assert!(session.select(DisplayMode::new(1366, 768)).changed());
    assert!(session.needs_restore());
    assert_eq!(backend.request_count(ChangeFlag::Test), 2);

    let outcome = session.finish(ExitPolicy::Always, |_| false);
    assert_eq!(outcome, Some(ApplyOutcome::Restored(original)));
    assert_eq!(backend.current_mode(), original);
}

#[test]
fn test_restore_does_not_probe() {
    let backend = MockBackend::new(MockProfile::Laptop);
    let mut session = Session::start(DisplayController::new(backend.clone()));

    session.select(DisplayMode::new(1024, 768));
    let tests_before = backend.request_count(ChangeFlag::Test);

    assert!(session.restore().changed());
    assert_eq!(backend.request_count(ChangeFlag::Test), tests_before);
}

#[cfg(unix)]
#[test]
fn test_driver_probe_parses_command_output() {
    let probe = DriverInfoProbe::new(
        "sh",
        ["-c", "printf 'DriverVersion  Name  Status\\n\\n31.0  Mock GPU  OK\\n'"],
        Duration::from_secs(5),
    );
    assert_eq!(probe.query(), "31.0  Mock GPU  OK");
}

#[cfg(unix)]
#[test]
fn test_driver_probe_failure_degrades() {
    let probe = DriverInfoProbe::new("sh", ["-c", "exit 3"], Duration::from_secs(5));
    assert_eq!(probe.query(), INFO_UNAVAILABLE);
}

#[cfg(unix)]
#[test]
fn test_driver_probe_timeout_degrades() {
    let probe = DriverInfoProbe::new("sh", ["-c", "sleep 10"], Duration::from_millis(200));

    let start = Instant::now();
    assert_eq!(probe.query(), INFO_UNAVAILABLE);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[test]
fn test_driver_info_reads_output_larger_than_pipe_buffer() {
    let inventory = DriverInfoProbe::new(
        "sh",
        ["-c", "echo 'DriverVersion  Name  Status'; yes '31.0  Mock GPU  OK' | head -n 20000"],
        Duration::from_secs(5),
    );

    let info = inventory.query();
    assert_ne!(info, INFO_UNAVAILABLE);
    assert_eq!(info.lines().count(), 20000);
}
