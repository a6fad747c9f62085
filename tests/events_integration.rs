//! Integration tests for game event decoding.
//!
//! These tests build small game events buffers by hand and check that the
//! stream decodes them end to end:
//! - Record framing and frame accumulation
//! - Exact byte consumption across consecutive records
//! - Abort diagnostics on malformed records
//! - Selection tracking over a decoded stream

use sc2_events::events::{
    decode_all, AbilityEvent, CameraShape, EventKind, EventStatistics, EventStream,
    ResourceTransferEvent,
};
use sc2_events::{Coordinate, EventHeader, ObjectRef, ParserError, SelectionTracker};

/// Game start record for player 1 with a zero frame delta.
const GAME_START: [u8; 3] = [0x00, 0x01, 0x05];

/// Concatenates record byte slices into one buffer.
fn stream(records: &[&[u8]]) -> Vec<u8> {
    records.concat()
}

#[test]
fn test_location_ability_then_transfer() {
    #[rustfmt::skip]
    let data = stream(&[
        // delta 1, player 1, type 1, code 0x0B
        &[0x04, 0x21, 0x0B],
        // flag, action type 0x40, coordinate (64.5, 32.0), 5 trailing bytes
        &[0x00, 0x40, 0x40, 0x80, 0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        // delta 0, player 1, type 1, code 0x1F (transfer to player 1)
        &[0x00, 0x21, 0x1F],
        &[0x00,
          0x00, 0x00, 0x64, 0x14,
          0x00, 0x00, 0x0A, 0x50,
          0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    ]);

    let mut events = EventStream::new(&data);

    let first = events.next().unwrap().unwrap();
    assert_eq!(first.header, EventHeader::new(1, 1, 0x01, 0x0B));
    match &first.kind {
        EventKind::Ability(AbilityEvent::Location { ability, location }) => {
            assert_eq!(*ability, None);
            assert_eq!(*location, Coordinate::new(0x4080, 0x2000));
            assert!((location.x_cells() - 64.5).abs() < f32::EPSILON);
        }
        other => panic!("Expected location ability, got {other:?}"),
    }
    assert_eq!(first.kind.type_name(), "LocationAbility");

    let second = events.next().unwrap().unwrap();
    assert_eq!(second.frame(), 1);
    assert_eq!(
        second.kind,
        EventKind::ResourceTransfer(ResourceTransferEvent {
            target: 1,
            minerals: 1604,
            vespene: 800,
        })
    );

    assert!(events.next().is_none());
    assert_eq!(events.current_offset(), data.len());
    assert_eq!(events.remaining_bytes(), 0);
}

#[test]
fn test_cancel_consumes_fixed_length() {
    for flag in [0x19, 0x29] {
        // the ability flags byte would select a target shape if it were read
        #[rustfmt::skip]
        let data = stream(&[
            &[0x00, 0x21, 0x0B],
            &[flag, 0x20, 0x01, 0x02, 0x20, 0xDE, 0xAD, 0xBE, 0xEF],
            &GAME_START,
        ]);

        let events = decode_all(&data).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].kind,
            EventKind::Ability(AbilityEvent::Plain { ability: 0x0001_0220 })
        );
        assert_eq!(events[1].kind, EventKind::GameStart);
    }
}

#[test]
fn test_camera_sized_blocks() {
    for blocks in 0u8..4 {
        let mut data = vec![0x00, 0x61, 0x08, 0xF0, blocks];
        data.extend(std::iter::repeat(0xAA).take(usize::from(blocks) * 8));
        data.extend_from_slice(&GAME_START);

        let events = decode_all(&data).unwrap();
        assert_eq!(events.len(), 2, "blocks = {blocks}");
        assert_eq!(events[0].kind, EventKind::CameraMovement(CameraShape::Sized));
        assert_eq!(events[1].kind, EventKind::GameStart);
    }
}

#[test]
fn test_decoding_is_idempotent() {
    #[rustfmt::skip]
    let data = stream(&[
        &GAME_START,
        &[0x08, 0x61, 0x11, 0x00, 0x00, 0x00, 0x10, 0x00, 0x40, 0x12, 0x34],
        &[0x04, 0x81, 0x16], &[0u8; 24],
        &[0x00, 0x41, 0x06], &[0u8; 8],
    ]);

    let first = decode_all(&data).unwrap();
    let second = decode_all(&data).unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn test_stream_abort_reports_last_header() {
    #[rustfmt::skip]
    let data = stream(&[
        &GAME_START,
        // ability with no selector bits in the action type
        &[0x0C, 0x22, 0x3B, 0x00, 0x01],
    ]);

    let mut events = EventStream::new(&data);
    assert_eq!(events.next().unwrap().unwrap().kind, EventKind::GameStart);

    let err = events.next().unwrap().unwrap_err();
    match &err {
        ParserError::StreamAborted {
            offset,
            last_header,
            source,
        } => {
            assert_eq!(*offset, GAME_START.len());
            assert_eq!(*last_header, Some(EventHeader::new(0, 1, 0x00, 0x05)));
            assert!(matches!(
                **source,
                ParserError::UnhandledShape {
                    record_type: 0x01,
                    code: 0x3B,
                    flag: 0x01
                }
            ));
        }
        other => panic!("Expected StreamAborted, got {other:?}"),
    }
    assert!(err.to_string().contains("offset 3"));
    assert!(events.next().is_none());
}

#[test]
fn test_unassigned_hotkey_action_aborts() {
    // action 3, mode 0
    let data = stream(&[&GAME_START, &[0x00, 0x21, 0x2D, 0x03]]);

    match decode_all(&data) {
        Err(ParserError::StreamAborted { source, .. }) => {
            assert!(matches!(
                *source,
                ParserError::UnhandledShape { flag: 3, .. }
            ));
        }
        other => panic!("Expected StreamAborted, got {other:?}"),
    }
}

#[test]
fn test_tracker_over_decoded_stream() {
    #[rustfmt::skip]
    let data = stream(&[
        // select two marines into the active bank (bank 10)
        &[0x04, 0x21, 0xAC],
        &[0x00, 0x00,
          0x01, 0x00, 0x2F, 0x01, 0x02,
          0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02],
        // set control group 3
        &[0x04, 0x21, 0x3D, 0x00],
        // replace the active selection with nothing
        &[0x04, 0x21, 0xAC, 0x00, 0x03, 0x00, 0x00, 0x00],
        // get control group 3 through a mask keeping the second object
        &[0x04, 0x21, 0x3D, 0x06, 0x02, 0b10],
    ]);

    let events = decode_all(&data).unwrap();
    assert_eq!(events.len(), 4);

    let marine = |id| ObjectRef::new(id, 0x2F01);
    let mut tracker = SelectionTracker::new();

    tracker.apply(&events[0]);
    assert_eq!(tracker.active(1), &[marine(1), marine(2)]);

    tracker.apply(&events[1]);
    assert_eq!(tracker.hotkey(1, 3), &[marine(1), marine(2)]);

    tracker.apply(&events[2]);
    assert!(tracker.active(1).is_empty());

    tracker.apply(&events[3]);
    assert_eq!(tracker.active(1), &[marine(2)]);
    assert_eq!(tracker.hotkey(1, 3), &[marine(1), marine(2)]);
    assert_eq!(events[3].frame(), 4);
}

#[test]
fn test_statistics_over_stream() {
    #[rustfmt::skip]
    let data = stream(&[
        &GAME_START,
        // move command for player 2
        &[0x04, 0x22, 0x0B, 0x00, 0x40, 0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0],
        // plain ability 0x0305 with flags 0x01 for player 2
        &[0x04, 0x22, 0x0B, 0x00, 0x20, 0x03, 0x05, 0x01],
        // zero-length type 4 record for player 1
        &[0x04, 0x81, 0x2C],
    ]);

    let events = decode_all(&data).unwrap();
    let mut stats = EventStatistics::new();
    stats.extend(&events);

    assert_eq!(stats.total_events, 4);
    assert_eq!(stats.ability_events, 2);
    assert_eq!(stats.move_commands, 1);
    assert_eq!(stats.unknown_events, 1);
    assert!(stats.unique_ability_codes.contains(&0x0003_0501));
    assert_eq!(stats.events_per_player.get(&2), Some(&2));
    assert_eq!(stats.last_frame, 3);
}
