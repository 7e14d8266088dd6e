//! Integration tests for the live scan pipeline
//!
//! The camera is simulated with the replay backend and the decoder with a
//! closure that recognises a marker pixel, so every test is deterministic
//! and runs without image files.

use qreator::camera::{AccessPolicy, DenialReason, DeviceCapabilities, ReplayBackend, ZoomRange};
use qreator::models::{Frame, PixelBuffer};
use qreator::{Action, Classification, Controller, Error, Facing, ScanState, SessionState};

const MARKER: u8 = 7;
const PAYMENT: &str = "upi://pay?pa=shop%40bank&pn=Payee&cu=INR";

fn marker_decoder(frame: Frame<'_>) -> Option<String> {
    (frame.rgba[0] == MARKER).then(|| PAYMENT.to_string())
}

/// `blank` empty frames followed by one marked frame, for both cameras
fn feed(blank: usize) -> ReplayBackend {
    let mut frames: Vec<_> = (0..blank).map(|_| PixelBuffer::filled(8, 8, 0)).collect();
    frames.push(PixelBuffer::filled(8, 8, MARKER));
    ReplayBackend::new()
        .with_frames(Facing::Environment, frames.clone())
        .with_frames(Facing::User, frames)
        .with_capabilities(DeviceCapabilities {
            torch_supported: true,
            zoom_range: Some(ZoomRange::new(1.0, 5.0)),
        })
}

#[test]
fn single_result_after_many_ticks() {
    let mut controller = Controller::new(feed(9), marker_decoder);
    controller.start(Facing::Environment).unwrap();

    let mut hits = Vec::new();
    for tick in 0..40 {
        if let Some(result) = controller.pump() {
            hits.push((tick, result.raw_text().to_string()));
        }
    }
    assert_eq!(hits, vec![(9, PAYMENT.to_string())]);

    let result = controller.result().unwrap();
    assert_eq!(result.classification(), &Classification::Payment(PAYMENT.into()));
    assert_eq!(controller.recommended_action(), Some(Action::OpenPaymentHandler));
    assert_eq!(controller.scan_loop().buffer_stats().allocations, 0);
}

#[test]
fn warmup_frames_are_skipped() {
    let backend = feed(0).with_warmup(3);
    let mut controller = Controller::new(backend, marker_decoder);
    controller.start(Facing::Environment).unwrap();

    let first_hit = (0..10).find(|_| controller.pump().is_some());
    assert_eq!(first_hit, Some(3));
}

#[test]
fn rescan_reuses_session() {
    let mut controller = Controller::new(feed(1), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    while controller.pump().is_none() {}
    assert!(matches!(controller.state(), ScanState::Paused(_)));

    controller.rescan().unwrap();
    assert_eq!(controller.state(), &ScanState::Scanning);
    assert!(controller.result().is_none());
    assert_eq!(controller.camera().backend().probes().len(), 1);

    // Frames keep cycling: blank, then the marker again.
    assert!(controller.pump().is_none());
    assert!(controller.pump().is_some());
    assert_eq!(controller.camera().backend().probes().len(), 1);
}

#[test]
fn switch_facing_tears_down_old_track() {
    let mut controller = Controller::new(feed(50), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    controller.pump();

    assert_eq!(controller.switch_facing().unwrap(), Facing::User);
    assert_eq!(controller.state(), &ScanState::Scanning);

    let probes = controller.camera().backend().probes();
    assert_eq!(probes.len(), 2);
    assert!(!probes[0].is_live());
    assert_eq!(probes[0].facing(), Facing::Environment);
    assert!(probes[1].is_live());
    assert_eq!(probes[1].facing(), Facing::User);
    assert_eq!(controller.camera().backend().live_tracks(), 1);
    assert_eq!(controller.camera().live_tracks(), 1);
}

#[test]
fn switch_facing_while_paused_keeps_result() {
    let mut controller = Controller::new(feed(0), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    assert!(controller.pump().is_some());

    controller.switch_facing().unwrap();
    assert!(matches!(controller.state(), ScanState::Paused(_)));
    assert_eq!(controller.camera().facing(), Facing::User);
    assert_eq!(controller.camera().backend().live_tracks(), 1);
}

#[test]
fn torch_is_dropped_on_switch() {
    let mut controller = Controller::new(feed(5), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    controller.set_torch(true).unwrap();
    assert!(controller.camera().backend().probes()[0].torch());

    controller.switch_facing().unwrap();
    assert!(!controller.camera().backend().probes()[0].torch());
    assert!(!controller.camera().torch_on());
}

#[test]
fn release_request_release_leaves_nothing_live() {
    let mut controller = Controller::new(feed(3), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    controller.stop();
    controller.start(Facing::User).unwrap();
    controller.stop();

    assert_eq!(controller.session(), &SessionState::Unrequested);
    assert_eq!(controller.state(), &ScanState::Stopped);
    assert_eq!(controller.camera().backend().live_tracks(), 0);
    assert!(controller.camera().backend().probes().iter().all(|p| !p.is_live()));
}

#[test]
fn denied_start_stays_idle() {
    let backend = feed(0).with_policy(AccessPolicy::Refuse);
    let mut controller = Controller::new(backend, marker_decoder);

    let err = controller.start(Facing::Environment).unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(DenialReason::Refused)));
    assert_eq!(controller.state(), &ScanState::Idle);
    assert_eq!(controller.session(), &SessionState::Denied(DenialReason::Refused));
    assert!(controller.pump().is_none());
}

#[test]
fn unavailable_platform_is_denied() {
    let mut controller = Controller::new(ReplayBackend::new(), marker_decoder);
    assert!(matches!(
        controller.start(Facing::User),
        Err(Error::PermissionDenied(DenialReason::Unavailable))
    ));
    assert_eq!(controller.camera().live_tracks(), 0);
}

#[test]
fn still_image_without_code_changes_nothing() {
    let mut controller = Controller::new(feed(100), marker_decoder);
    controller.start(Facing::Environment).unwrap();
    let before = controller.scan_loop().generation();

    let blank = PixelBuffer::filled(16, 16, 255);
    assert!(matches!(controller.decode_image(&blank), Err(Error::NoCodeFound)));
    assert_eq!(controller.state(), &ScanState::Scanning);
    assert!(controller.session().is_granted());
    assert_eq!(controller.scan_loop().generation(), before);
}

#[test]
fn still_image_decodes_without_session() {
    let mut controller = Controller::new(ReplayBackend::new(), marker_decoder);
    let marked = PixelBuffer::filled(4, 4, MARKER);

    let result = controller.decode_image(&marked).unwrap();
    assert_eq!(result.raw_text(), PAYMENT);
    assert_eq!(result.action(), Action::OpenPaymentHandler);
    assert_eq!(controller.state(), &ScanState::Idle);
    assert_eq!(controller.session(), &SessionState::Unrequested);
}

#[test]
fn dropping_controller_releases_camera() {
    let backend = feed(0);
    let mut controller = Controller::new(backend, marker_decoder);
    controller.start(Facing::Environment).unwrap();
    let probe = controller.camera().backend().probes()[0].clone();
    assert!(probe.is_live());

    drop(controller);
    assert!(!probe.is_live());
}
