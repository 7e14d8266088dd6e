//! Decoding a real QR symbol
//!
//! `fixtures/upi_payment.png` holds a version 3 symbol of the UPI payload
//! below, drawn with a wider right margin so rows do not line up with
//! the image width.

use qreator::camera::ReplayBackend;
use qreator::scan::decode_once;
use qreator::{
    Action, Classification, Controller, DecodeOutcome, Facing, PayloadSpec, RqrrDecoder,
    ScanState, classify, encode, tools,
};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn payment() -> String {
    encode(&PayloadSpec::UpiPayment {
        payee_id: "me@bank".into(),
        amount: Some("50".into()),
    })
    .as_str()
    .to_string()
}

#[test]
fn still_image_decodes_to_generated_payload() {
    let image = tools::load_rgba(fixtures().join("upi_payment.png"), None).unwrap();
    let text = match decode_once(&image, &mut RqrrDecoder::new()) {
        DecodeOutcome::Decoded(text) => text,
        DecodeOutcome::NoCode => panic!("fixture symbol was not read"),
    };
    assert_eq!(text, payment());
    assert_eq!(classify(&text), Classification::Payment(payment()));
    assert_eq!(classify(&text).action(), Action::OpenPaymentHandler);
}

#[test]
fn live_scan_reads_replayed_symbol() {
    let backend = ReplayBackend::from_dir(fixtures(), Facing::Environment, None).unwrap();
    let mut controller = Controller::new(backend, RqrrDecoder::new());
    controller.start(Facing::Environment).unwrap();

    let hit = (0..5).find_map(|_| controller.pump().map(|r| r.raw_text().to_string()));
    assert_eq!(hit, Some(payment()));
    assert!(matches!(controller.state(), ScanState::Paused(_)));
    assert_eq!(controller.recommended_action(), Some(Action::OpenPaymentHandler));
    controller.stop();
}
