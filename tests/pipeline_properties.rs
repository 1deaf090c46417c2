//! End-to-end behaviour of the frame pipeline with scripted decoders

use frame_scan::sink::Discard;
use frame_scan::utils::yuv::planes_from_rgb;
use frame_scan::{
    AttemptOutcome, DecodeError, DiagnosticReport, FormatError, FrameAnalyzer, FrameConverter,
    FrameOutcome, FramePlanes, LuminanceSource, Plane, PlaneKind, RawFrame, Rotation, ScanConfig,
    Symbol, SymbolFormat,
};
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const WIDTH: u32 = 8;
const HEIGHT: u32 = 6;

fn test_image() -> RgbImage {
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let v = (x * 20 + y * 10) as u8;
        Rgb([v, v, v])
    })
}

fn counted_frame(released: &Arc<AtomicUsize>) -> RawFrame {
    let released = Arc::clone(released);
    RawFrame::new(WIDTH, HEIGHT, planes_from_rgb(&test_image())).on_release(move || {
        released.fetch_add(1, Ordering::SeqCst);
    })
}

fn miss(_: &LuminanceSource) -> Result<Symbol, DecodeError> {
    Err(DecodeError::NotFound)
}

#[test]
fn test_every_frame_released_exactly_once() {
    let released = Arc::new(AtomicUsize::new(0));
    let config = ScanConfig::default();

    let hit = FrameAnalyzer::new(
        &config,
        |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            Ok(Symbol::new("ok", SymbolFormat::Unknown))
        },
        Discard,
        Discard,
    );
    let missing = FrameAnalyzer::new(&config, miss, Discard, Discard);
    let faulty = FrameAnalyzer::new(
        &config,
        |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            Err(DecodeError::Fault("checksum".into()))
        },
        Discard,
        Discard,
    );

    hit.analyze(counted_frame(&released));
    missing.analyze(counted_frame(&released));
    faulty.analyze(counted_frame(&released));

    let r = Arc::clone(&released);
    let short = RawFrame::new(
        WIDTH,
        HEIGHT,
        FramePlanes::new(
            Plane::packed(vec![0u8; 4], 2),
            Plane::packed(vec![0u8; 1], 1),
            Plane::packed(vec![0u8; 1], 1),
        ),
    )
    .on_release(move || {
        r.fetch_add(1, Ordering::SeqCst);
    });
    missing.analyze(short);

    let r = Arc::clone(&released);
    missing.analyze(RawFrame::without_image(WIDTH, HEIGHT).on_release(move || {
        r.fetch_add(1, Ordering::SeqCst);
    }));

    assert_eq!(released.load(Ordering::SeqCst), 5);
}

#[test]
fn test_at_most_one_result_per_frame() {
    let results = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&results);
    let analyzer = FrameAnalyzer::new(
        &ScanConfig::default().with_rotations(Rotation::ALL),
        |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            Ok(Symbol::new("every time", SymbolFormat::Unknown))
        },
        Discard,
        move |_: &Symbol| {
            r.fetch_add(1, Ordering::SeqCst);
        },
    );

    let released = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let outcome = analyzer.analyze(counted_frame(&released));
        assert_eq!(outcome.retry_report().map(|r| r.attempts.len()), Some(1));
    }
    assert_eq!(results.load(Ordering::SeqCst), 3);
}

#[test]
fn test_diagnostics_reported_once_before_decoding() {
    let events = Arc::new(Mutex::new(Vec::new()));

    let diag_events = Arc::clone(&events);
    let decode_events = Arc::clone(&events);
    let analyzer = FrameAnalyzer::new(
        &ScanConfig::default(),
        move |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            decode_events.lock().unwrap().push("decode".to_string());
            Err(DecodeError::NotFound)
        },
        move |report: &DiagnosticReport| {
            diag_events.lock().unwrap().push(report.to_string());
        },
        Discard,
    );

    let planes = planes_from_rgb(&test_image());
    let expected = DiagnosticReport::from_planes(&planes);
    analyzer.analyze(RawFrame::new(WIDTH, HEIGHT, planes));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], "Y buffer size: 48\nU buffer size: 23\nV buffer size: 24");
    assert_eq!(events[0], expected.to_string());
    assert_eq!(&events[1..], &["decode", "decode"]);
}

#[test]
fn test_rotations_tried_in_order_and_short_circuit() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    // Quarter turns swap the dimensions, half turns keep them
    let analyzer = FrameAnalyzer::new(
        &ScanConfig::default(),
        move |source: &LuminanceSource| -> Result<Symbol, DecodeError> {
            s.lock().unwrap().push((source.width(), source.height()));
            if source.width() == WIDTH as usize {
                Ok(Symbol::new("upside down", SymbolFormat::Unknown))
            } else {
                Err(DecodeError::NotFound)
            }
        },
        Discard,
        Discard,
    );

    let released = Arc::new(AtomicUsize::new(0));
    let outcome = analyzer.analyze(counted_frame(&released));

    assert_eq!(*seen.lock().unwrap(), vec![(6, 8), (8, 6)]);
    let report = outcome.retry_report().unwrap();
    assert_eq!(report.winning_rotation(), Some(Rotation::Deg180));
    assert_eq!(report.attempts[0].outcome, AttemptOutcome::NotFound);
    assert_eq!(outcome.symbol().map(|s| s.text.as_str()), Some("upside down"));

    // A hit on the first rotation stops the loop
    seen.lock().unwrap().clear();
    let first = FrameAnalyzer::new(
        &ScanConfig::default(),
        |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            Ok(Symbol::new("sideways", SymbolFormat::Unknown))
        },
        Discard,
        Discard,
    );
    let outcome = first.analyze(counted_frame(&released));
    assert_eq!(
        outcome.retry_report().and_then(|r| r.winning_rotation()),
        Some(Rotation::Deg90)
    );
}

#[test]
fn test_all_rotations_miss() {
    let results = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&results);
    let analyzer = FrameAnalyzer::new(&ScanConfig::default(), miss, Discard, move |_: &Symbol| {
        r.fetch_add(1, Ordering::SeqCst);
    });

    let released = Arc::new(AtomicUsize::new(0));
    let outcome = analyzer.analyze(counted_frame(&released));

    let FrameOutcome::Missed(report) = &outcome else {
        panic!("expected a miss, got {outcome:?}");
    };
    let tried: Vec<_> = report.attempts.iter().map(|a| a.rotation).collect();
    assert_eq!(tried, vec![Rotation::Deg90, Rotation::Deg180]);
    assert_eq!(results.load(Ordering::SeqCst), 0);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_undersized_planes_rejected_without_decoding() {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicUsize::new(0));

    let rep = Arc::clone(&reports);
    let c = Arc::clone(&calls);
    let analyzer = FrameAnalyzer::new(
        &ScanConfig::default(),
        move |_: &LuminanceSource| -> Result<Symbol, DecodeError> {
            c.fetch_add(1, Ordering::SeqCst);
            Err(DecodeError::NotFound)
        },
        move |report: &DiagnosticReport| rep.lock().unwrap().push(*report),
        Discard,
    );

    let frame = RawFrame::new(
        WIDTH,
        HEIGHT,
        FramePlanes::new(
            Plane::packed(vec![0u8; 40], 8),
            Plane::new(vec![128u8; 23], 8, 2),
            Plane::new(vec![128u8; 24], 8, 2),
        ),
    );
    let outcome = analyzer.analyze(frame);

    assert_eq!(
        outcome,
        FrameOutcome::Rejected(FormatError::PlaneTooSmall {
            plane: PlaneKind::Luma,
            required: 48,
            actual: 40,
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!((reports[0].y_size, reports[0].u_size, reports[0].v_size), (40, 23, 24));
}

#[test]
fn test_chroma_shortfall_rejected() {
    let analyzer = FrameAnalyzer::new(&ScanConfig::default(), miss, Discard, Discard);
    let frame = RawFrame::new(
        WIDTH,
        HEIGHT,
        FramePlanes::new(
            Plane::packed(vec![0u8; 48], 8),
            Plane::new(vec![128u8; 10], 8, 2),
            Plane::new(vec![128u8; 10], 8, 2),
        ),
    );
    assert_eq!(
        analyzer.analyze(frame),
        FrameOutcome::Rejected(FormatError::ChromaTooSmall {
            required: 24,
            actual: 20,
        })
    );
}

#[test]
fn test_conversion_is_deterministic() {
    let planes = planes_from_rgb(&test_image());
    let converter = FrameConverter::default();

    let first = converter.convert(&planes, WIDTH, HEIGHT, &Discard).unwrap();
    let second = converter.convert(&planes, WIDTH, HEIGHT, &Discard).unwrap();
    assert_eq!(first, second);

    let parallel = FrameConverter::new(&ScanConfig::default().with_parallel_min_pixels(1))
        .convert(&planes, WIDTH, HEIGHT, &Discard)
        .unwrap();
    assert_eq!(first, parallel);
}

#[test]
fn test_camera_sized_frame_converts() {
    let image = RgbImage::from_fn(1280, 720, |x, y| {
        let v = ((x / 16 + y / 16) % 2 * 255) as u8;
        Rgb([v, v, v])
    });
    let planes = planes_from_rgb(&image);
    let raster = FrameConverter::default()
        .convert(&planes, 1280, 720, &Discard)
        .unwrap();
    assert_eq!((raster.width(), raster.height()), (1280, 720));
    assert_eq!(raster.pixel(0, 0), 0xFF00_0000);
    assert_eq!(raster.pixel(16, 0), 0xFFFF_FFFF);
}
