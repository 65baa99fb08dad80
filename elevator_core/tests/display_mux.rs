use elevator_core::display::{DIGIT_SEGMENTS, GLYPH_LEVEL, GLYPH_UP, MARKER_DP};
use elevator_core::mocks::{FakeInputs, RecordingPanel, RecordingTerminal};
use elevator_core::{
    Digit, DisplayCfg, DoorCfg, ElevatorCore, Floor, MotionCfg, Request, build_elevator,
};
use elevator_traits::ManualClock;

type Rig = ElevatorCore<FakeInputs, RecordingPanel, RecordingTerminal>;

fn rig() -> (Rig, ManualClock) {
    let clock = ManualClock::new();
    let mut core = build_elevator(
        FakeInputs::default(),
        RecordingPanel::default(),
        RecordingTerminal::default(),
        MotionCfg::default(),
        DoorCfg::default(),
        DisplayCfg::default(),
        None,
        Some(Box::new(clock.clone())),
    )
    .unwrap();
    core.begin().unwrap();
    (core, clock)
}

#[test]
fn first_step_shows_direction_then_alternates() {
    let (mut core, clock) = rig();
    let r = core.step().unwrap();
    assert_eq!(r.digit, Some(Digit::Direction));
    assert_eq!(core.panel().segments, vec![(0, GLYPH_LEVEL)]);

    for _ in 0..20 {
        clock.advance_ms(50);
        core.step().unwrap();
    }
    let digits: Vec<u8> = core.panel().segments.iter().map(|(d, _)| *d).collect();
    for pair in digits.windows(2) {
        assert_ne!(pair[0], pair[1], "digit repeated: {digits:?}");
    }
    for (digit, bits) in &core.panel().segments {
        assert_eq!(*digit == 1, bits & MARKER_DP != 0);
    }
}

#[test]
fn multiplexing_continues_through_door_cycles() {
    let (mut core, clock) = rig();
    core.submit(Request::new(Floor::Ground, Floor::First)).unwrap();
    core.step().unwrap();
    assert!(core.door_phase() != elevator_core::DoorPhase::Inactive);

    let before = core.panel().segments.len();
    for _ in 0..10 {
        clock.advance_ms(101);
        core.step().unwrap();
    }
    assert_eq!(core.panel().segments.len() - before, 10);
}

#[test]
fn direction_glyph_is_recomputed_from_the_sub_goal() {
    let (mut core, clock) = rig();
    core.submit(Request::new(Floor::Second, Floor::Ground)).unwrap();
    // Admission puts the sub-goal above the car
    core.step().unwrap();
    let mut shown = 0;
    for _ in 0..6 {
        clock.advance_ms(101);
        let r = core.step().unwrap();
        if r.digit == Some(Digit::Direction) {
            assert_eq!(core.panel().segments.last(), Some(&(0, GLYPH_UP)));
            shown += 1;
        }
    }
    assert_eq!(shown, 3);
}

#[test]
fn floor_digit_tracks_position() {
    let (mut core, clock) = rig();
    core.submit(Request::new(Floor::First, Floor::Ground)).unwrap();
    let mut last_floor_bits = None;
    for _ in 0..200 {
        clock.advance_ms(10);
        let r = core.step().unwrap();
        if r.digit == Some(Digit::Floor) {
            last_floor_bits = core.panel().segments.last().map(|(_, b)| *b);
            let idx = usize::try_from(r.position.floor_index()).unwrap();
            assert_eq!(last_floor_bits, Some(DIGIT_SEGMENTS[idx] | MARKER_DP));
        }
    }
    assert!(last_floor_bits.is_some());
}
