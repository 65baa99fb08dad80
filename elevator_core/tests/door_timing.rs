use elevator_core::mocks::{FakeInputs, RecordingPanel, RecordingTerminal};
use elevator_core::{
    Arrival, DisplayCfg, DoorCfg, DoorPhase, ElevatorCore, Floor, MotionCfg, Request,
    build_elevator,
};
use elevator_traits::{DOOR_INDICATORS, INDICATOR_DOOR_CLOSING, INDICATOR_DOOR_OPENING, ManualClock};
use rstest::rstest;

type Rig = ElevatorCore<FakeInputs, RecordingPanel, RecordingTerminal>;

fn rig(door: DoorCfg) -> (Rig, ManualClock) {
    let clock = ManualClock::new();
    let mut core = build_elevator(
        FakeInputs::default(),
        RecordingPanel::default(),
        RecordingTerminal::default(),
        MotionCfg::default(),
        door,
        DisplayCfg::default(),
        None,
        Some(Box::new(clock.clone())),
    )
    .unwrap();
    core.begin().unwrap();
    (core, clock)
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(25)]
fn door_is_never_active_past_close_and_car_holds_still(#[case] step_ms: u64) {
    let (mut core, clock) = rig(DoorCfg::default());
    core.submit(Request::new(Floor::Ground, Floor::Third)).unwrap();

    let r = core.step().unwrap();
    assert!(matches!(r.arrival, Some(Arrival::Pickup(_))));
    let triggered_at = r.now_ms;
    let held = core.position();

    let mut saw = Vec::new();
    loop {
        clock.advance_ms(step_ms);
        let r = core.step().unwrap();
        let elapsed = r.now_ms - triggered_at;
        if r.door == DoorPhase::Inactive {
            assert!(elapsed >= 1200);
            break;
        }
        assert!(elapsed < 1200, "door still {:?} at {elapsed} ms", r.door);
        assert_eq!(r.position, held, "car moved during door cycle");
        assert!(!r.moved);
        if saw.last() != Some(&r.door) {
            saw.push(r.door);
        }
    }
    assert_eq!(
        saw,
        vec![DoorPhase::Announce, DoorPhase::Opening, DoorPhase::Closing]
    );
    assert!(DOOR_INDICATORS.iter().all(|l| !core.panel().indicator(*l)));
}

#[test]
fn indicator_sequence_over_one_cycle() {
    let (mut core, clock) = rig(DoorCfg::default());
    core.submit(Request::new(Floor::Ground, Floor::First)).unwrap();
    core.step().unwrap();
    let writes_before = core.panel().indicator_writes.len();
    for _ in 0..150 {
        clock.advance_ms(10);
        core.step().unwrap();
        if core.door_phase() == DoorPhase::Inactive {
            break;
        }
    }
    let writes = &core.panel().indicator_writes[writes_before..];
    assert_eq!(
        writes,
        &[
            (INDICATOR_DOOR_CLOSING, false),
            (INDICATOR_DOOR_OPENING, true),
            (INDICATOR_DOOR_OPENING, false),
            (INDICATOR_DOOR_CLOSING, true),
            (INDICATOR_DOOR_OPENING, false),
            (INDICATOR_DOOR_CLOSING, false),
        ]
    );
}

#[test]
fn blocking_tone_costs_exactly_its_duration() {
    let (mut core, clock) = rig(DoorCfg::default());
    core.submit(Request::new(Floor::Ground, Floor::First)).unwrap();
    let before = clock.elapsed_ms();
    core.step().unwrap();
    assert_eq!(clock.elapsed_ms() - before, 100);

    let (mut core, clock) = rig(DoorCfg {
        tone_blocking: false,
        ..DoorCfg::default()
    });
    core.submit(Request::new(Floor::Ground, Floor::First)).unwrap();
    let before = clock.elapsed_ms();
    core.step().unwrap();
    assert_eq!(clock.elapsed_ms(), before);
    assert_eq!(core.panel().tones.len(), 1);
}

#[test]
fn intake_is_suspended_while_the_door_is_active() {
    let (mut core, clock) = rig(DoorCfg::default());
    core.submit(Request::new(Floor::Ground, Floor::Second)).unwrap();
    core.step().unwrap();
    core.inputs_mut().call(3, 1);
    clock.advance_ms(10);
    let r = core.step().unwrap();
    assert!(r.intake.is_none());
    assert_eq!(core.inputs().buttons.len(), 1);

    clock.advance_ms(1200);
    let r = core.step().unwrap();
    assert_eq!(r.door, DoorPhase::Inactive);
    assert!(r.intake.is_some());
}
