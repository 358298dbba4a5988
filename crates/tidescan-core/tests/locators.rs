mod common;

use proptest::prelude::*;
use time::macros::datetime;

use common::{Clock, ad2cp_frame, ad2cp_measurement, rdi_ensemble, sontek_profile, stream};
use tidescan_core::{
    CancelFlag, ConfigError, ExtractionWindow, FormatTag, FrameMeta, RecordIndexEntry,
    RecordTime, ScanError, ScanOptions, SontekSections, TimeWindow, Validity, locate, scan_bytes,
};

fn frames_for(format: FormatTag, bodies: &[Vec<u8>]) -> Vec<Vec<u8>> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let clock = Clock::at_second((i % 60) as u8);
            match format {
                FormatTag::Ad2cp => ad2cp_frame(0x16, &ad2cp_measurement(clock, body)),
                FormatTag::Rdi => rdi_ensemble(i as u32, clock, body),
                FormatTag::Sontek => {
                    let cells = 1 + (body.len() % 8) as u16;
                    sontek_profile(i as u32, 0, &SontekSections::default(), 2, cells, clock)
                }
            }
        })
        .collect()
}

fn valid_offsets(entries: &[RecordIndexEntry]) -> Vec<usize> {
    entries
        .iter()
        .filter(|e| e.validity.is_valid())
        .map(|e| e.offset)
        .collect()
}

fn assert_well_formed(entries: &[RecordIndexEntry], len: usize) {
    for pair in entries.windows(2) {
        assert!(pair[0].offset < pair[1].offset, "offsets must increase");
        assert!(pair[0].end() <= pair[1].offset, "entries must not overlap");
    }
    if let Some(last) = entries.last() {
        assert!(last.end() <= len, "entry past end of source");
    }
}

fn formats() -> impl Strategy<Value = FormatTag> {
    prop_oneof![
        Just(FormatTag::Ad2cp),
        Just(FormatTag::Rdi),
        Just(FormatTag::Sontek),
    ]
}

fn bodies() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 1..10)
}

proptest! {
    #[test]
    fn clean_stream_yields_every_frame(format in formats(), bodies in bodies()) {
        let (bytes, offsets) = stream(&frames_for(format, &bodies));
        let located = locate(&bytes, format, &ScanOptions::default()).unwrap();
        let entries = located.index.entries();

        prop_assert_eq!(entries.len(), offsets.len());
        prop_assert_eq!(valid_offsets(entries), offsets);
        prop_assert_eq!(located.index.covered_bytes(), bytes.len());
        assert_well_formed(entries, bytes.len());
    }

    #[test]
    fn flipped_byte_only_disturbs_its_frame(
        format in formats(),
        bodies in bodies(),
        pick in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let frames = frames_for(format, &bodies);
        let (mut bytes, offsets) = stream(&frames);
        let k = pick.index(frames.len());
        let start = offsets[k];
        let end = start + frames[k].len();
        bytes[start + at.index(frames[k].len())] ^= mask;

        let located = locate(&bytes, format, &ScanOptions::default()).unwrap();
        let entries = located.index.entries();
        assert_well_formed(entries, bytes.len());

        let expected: Vec<usize> = offsets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != k)
            .map(|(_, offset)| *offset)
            .collect();
        prop_assert_eq!(valid_offsets(entries), expected);
        for entry in entries.iter().filter(|e| !e.validity.is_valid()) {
            prop_assert!(entry.offset >= start && entry.end() <= end);
        }
    }

    #[test]
    fn flipped_payload_byte_fails_checksum_of_its_frame(
        format in formats(),
        bodies in bodies(),
        pick in any::<prop::sample::Index>(),
        at in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let frames = frames_for(format, &bodies);
        let (mut bytes, offsets) = stream(&frames);
        let k = pick.index(frames.len());
        let clean = locate(&bytes, format, &ScanOptions::default()).unwrap();
        let target = clean.index.entries()[k];
        prop_assume!(target.payload_len > 0);
        bytes[target.payload_offset() + at.index(target.payload_len)] ^= mask;

        let located = locate(&bytes, format, &ScanOptions::default()).unwrap();
        let entries = located.index.entries();
        let hit = entries.iter().find(|e| e.offset == offsets[k]);
        prop_assert!(hit.is_some(), "no entry at the disturbed frame");
        let hit = hit.unwrap();
        prop_assert_eq!(hit.validity, Validity::ChecksumFailed);
        prop_assert_eq!(hit.length, frames[k].len());
        prop_assert_eq!(located.index.counts().invalid(), 1);
        prop_assert_eq!(located.index.counts().valid, frames.len() - 1);
    }
}

#[test]
fn partial_header_at_end_stops_cleanly() {
    let cases = [
        (FormatTag::Ad2cp, 5usize),
        (FormatTag::Rdi, 4),
        (FormatTag::Rdi, 20),
        (FormatTag::Sontek, 40),
        (FormatTag::Sontek, 90),
    ];
    for (format, keep) in cases {
        let mut frames = frames_for(format, &[vec![1, 2, 3], vec![4, 5, 6]]);
        let tail = frames_for(format, &[vec![7; 10]]).remove(0);
        frames.push(tail[..keep].to_vec());
        let (bytes, offsets) = stream(&frames);

        let located = locate(&bytes, format, &ScanOptions::default()).unwrap();
        let entries = located.index.entries();
        assert_well_formed(entries, bytes.len());
        assert_eq!(valid_offsets(entries), offsets[..2].to_vec(), "{format}");
        let last = entries.last().unwrap();
        assert_eq!(last.offset, offsets[2], "{format}");
        assert_eq!(last.validity, Validity::Truncated, "{format}");
        assert_eq!(last.end(), bytes.len(), "{format}");
    }
}

#[test]
fn overrunning_length_field_recovers_at_next_frame() {
    let frames = frames_for(FormatTag::Rdi, &[vec![1; 8], vec![2; 8], vec![3; 8]]);
    let (mut bytes, offsets) = stream(&frames);
    // Declared ensemble size now reaches past the end of the stream.
    bytes[offsets[0] + 3] = 0x7E;

    let located = locate(&bytes, FormatTag::Rdi, &ScanOptions::default()).unwrap();
    let entries = located.index.entries();
    assert_well_formed(entries, bytes.len());
    assert_eq!(entries[0].validity, Validity::Truncated);
    assert_eq!(entries[0].end(), offsets[1]);
    assert_eq!(valid_offsets(entries), offsets[1..].to_vec());
}

#[test]
fn leading_garbage_is_uncovered() {
    let frames = frames_for(FormatTag::Sontek, &[vec![], vec![]]);
    let (frames_bytes, _) = stream(&frames);
    let mut bytes = vec![0x33u8; 17];
    bytes.extend_from_slice(&frames_bytes);

    let report = scan_bytes("buffer", &bytes, FormatTag::Sontek, &ScanOptions::default()).unwrap();
    assert_eq!(report.summary.valid, 2);
    assert_eq!(report.summary.uncovered_bytes, 17);
    assert_eq!(report.records[0].entry.offset, 17);
}

#[test]
fn metadata_survives_scanning() {
    let clock = Clock::at_second(42);

    let (bytes, _) = stream(&[ad2cp_frame(0x16, &ad2cp_measurement(clock, &[9; 4]))]);
    let entry = locate(&bytes, FormatTag::Ad2cp, &ScanOptions::default())
        .unwrap()
        .index
        .entries()[0];
    let Some(FrameMeta::Ad2cp(meta)) = entry.meta else {
        panic!("expected ad2cp metadata");
    };
    assert_eq!(meta.series_id, 0x16);
    assert_eq!(meta.data_size, 20);
    assert_eq!(
        meta.time,
        RecordTime::from_fields(2024, 3, 14, 9, 26, 42, 0)
    );

    let (bytes, _) = stream(&[rdi_ensemble(0x01_2345, clock, &[])]);
    let entry = locate(&bytes, FormatTag::Rdi, &ScanOptions::default())
        .unwrap()
        .index
        .entries()[0];
    let Some(FrameMeta::Rdi(meta)) = entry.meta else {
        panic!("expected rdi metadata");
    };
    assert_eq!(meta.ensemble_number, Some(0x01_2345));
    assert_eq!(meta.data_types, 3);
    assert_eq!(
        meta.time,
        RecordTime::from_fields(2024, 3, 14, 9, 26, 42, 0)
    );

    let sections = SontekSections::default();
    let (bytes, _) = stream(&[sontek_profile(901, 0, &sections, 3, 12, clock)]);
    let entry = locate(&bytes, FormatTag::Sontek, &ScanOptions::default())
        .unwrap()
        .index
        .entries()[0];
    let Some(FrameMeta::Sontek(meta)) = entry.meta else {
        panic!("expected sontek metadata");
    };
    assert_eq!(meta.profile_number, 901);
    assert_eq!(meta.beams, 3);
    assert_eq!(meta.cells, 12);
    assert_eq!(entry.payload_len, 3 * 12 * 4);
}

#[test]
fn window_addresses_valid_records_only() {
    let bodies: Vec<Vec<u8>> = (0..8).map(|i| vec![i as u8; 6]).collect();
    let frames = frames_for(FormatTag::Ad2cp, &bodies);
    let (mut bytes, offsets) = stream(&frames);
    bytes[offsets[3] + 12] ^= 0x01;

    let options = ScanOptions {
        selection: ExtractionWindow::new(2, 5, 2).unwrap().into(),
        ..Default::default()
    };
    let report = scan_bytes("buffer", &bytes, FormatTag::Ad2cp, &options).unwrap();
    assert_eq!(report.summary.valid, 7);
    assert_eq!(report.summary.checksum_failed, 1);
    let picked: Vec<(usize, usize)> = report
        .records
        .iter()
        .map(|r| (r.logical_index, r.entry.offset))
        .collect();
    assert_eq!(picked, vec![(2, offsets[2]), (4, offsets[5])]);
    assert_eq!(report.invalid.len(), 1);
    assert_eq!(report.invalid[0].offset, offsets[3]);
}

#[test]
fn window_past_the_end_selects_nothing() {
    let frames = frames_for(FormatTag::Rdi, &vec![vec![]; 8]);
    let (bytes, _) = stream(&frames);
    let options = ScanOptions {
        selection: ExtractionWindow::new(100, 200, 1).unwrap().into(),
        ..Default::default()
    };
    let report = scan_bytes("buffer", &bytes, FormatTag::Rdi, &options).unwrap();
    assert_eq!(report.summary.valid, 8);
    assert!(report.records.is_empty());
}

#[test]
fn time_window_selects_by_embedded_clock() {
    let frames = frames_for(FormatTag::Rdi, &vec![vec![]; 10]);
    let (bytes, offsets) = stream(&frames);
    let window = TimeWindow::new(
        datetime!(2024-03-14 09:26:02 UTC),
        datetime!(2024-03-14 09:26:07 UTC),
        2,
    )
    .unwrap();
    let options = ScanOptions {
        selection: window.into(),
        ..Default::default()
    };
    let report = scan_bytes("buffer", &bytes, FormatTag::Rdi, &options).unwrap();
    let picked: Vec<usize> = report.records.iter().map(|r| r.entry.offset).collect();
    assert_eq!(picked, vec![offsets[2], offsets[4], offsets[6]]);
    assert_eq!(
        report.summary.time_start,
        RecordTime::from_fields(2024, 3, 14, 9, 26, 0, 0)
    );
    assert_eq!(
        report.summary.time_end,
        RecordTime::from_fields(2024, 3, 14, 9, 26, 9, 0)
    );
}

#[test]
fn max_records_stops_early() {
    let frames = frames_for(FormatTag::Sontek, &vec![vec![]; 6]);
    let (bytes, offsets) = stream(&frames);
    let options = ScanOptions {
        max_records: Some(4),
        ..Default::default()
    };
    let located = locate(&bytes, FormatTag::Sontek, &options).unwrap();
    assert_eq!(valid_offsets(located.index.entries()), offsets[..4].to_vec());
    assert!(!located.cancelled);
}

#[test]
fn cancelled_scan_reports_cancellation() {
    let frames = frames_for(FormatTag::Ad2cp, &vec![vec![]; 4]);
    let (bytes, _) = stream(&frames);
    let cancel = CancelFlag::new();
    let options = ScanOptions {
        cancel: Some(cancel.clone()),
        ..Default::default()
    };

    let report = scan_bytes("buffer", &bytes, FormatTag::Ad2cp, &options).unwrap();
    assert!(!report.summary.cancelled);
    assert_eq!(report.summary.valid, 4);

    cancel.cancel();
    let report = scan_bytes("buffer", &bytes, FormatTag::Ad2cp, &options).unwrap();
    assert!(report.summary.cancelled);
    assert_eq!(report.summary.records_total, 0);
}

#[test]
fn requested_section_without_sensor_fails_the_scan() {
    let recorded = SontekSections {
        ctd: true,
        ..Default::default()
    };
    let clock = Clock::at_second(0);
    // The sensor byte only reports GPS, yet the frames were laid out with CTD.
    let frames = vec![
        sontek_profile(1, 0b0000_0010, &recorded, 2, 4, clock),
        sontek_profile(2, 0b0000_0010, &recorded, 2, 4, clock),
    ];
    let (bytes, _) = stream(&frames);
    let options = ScanOptions {
        sections: recorded,
        ..Default::default()
    };
    let err = locate(&bytes, FormatTag::Sontek, &options).unwrap_err();
    assert!(matches!(
        err,
        ScanError::Configuration(ConfigError::SectionNotInstalled {
            section: "ctd",
            offset: 0
        })
    ));
}

#[test]
fn sections_matching_sensors_scan_cleanly() {
    let recorded = SontekSections {
        gps: true,
        pulse_coherent: true,
        ..Default::default()
    };
    let clock = Clock::at_second(0);
    let frames: Vec<Vec<u8>> = (0..3)
        .map(|i| sontek_profile(i, 0b0000_1010, &recorded, 4, 6, clock))
        .collect();
    let (bytes, offsets) = stream(&frames);
    let options = ScanOptions {
        sections: recorded,
        ..Default::default()
    };
    let report = scan_bytes("buffer", &bytes, FormatTag::Sontek, &options).unwrap();
    assert_eq!(report.summary.valid, 3);
    assert_eq!(report.records[2].entry.offset, offsets[2]);
    assert_eq!(report.records[0].entry.header_len, 80 + 40 + 12);
    assert_eq!(report.sections, Some(recorded));
}

#[test]
fn independent_scans_run_concurrently() {
    let bodies: Vec<Vec<u8>> = (0..20).map(|i| vec![i as u8; i]).collect();
    let sources: Vec<(FormatTag, Vec<u8>)> = [FormatTag::Ad2cp, FormatTag::Rdi, FormatTag::Sontek]
        .into_iter()
        .map(|format| (format, stream(&frames_for(format, &bodies)).0))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|(format, bytes)| {
                scope.spawn(move || {
                    scan_bytes("buffer", bytes, *format, &ScanOptions::default()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let report = handle.join().unwrap();
            assert_eq!(report.summary.valid, 20);
            assert_eq!(report.summary.records_total, 20);
        }
    });
}
