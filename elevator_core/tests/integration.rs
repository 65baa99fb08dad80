use std::sync::Arc;

use elevator_core::runner::{self, RunOptions};
use elevator_core::{DisplayCfg, DoorCfg, Floor, MotionCfg, build_elevator};
use elevator_hardware::{FramePanel, InputEvent, ScriptedInputs, TextGrid, TimedEvent};
use elevator_traits::{Clock, Colour, ManualClock};

fn ev(at_ms: u64, event: InputEvent) -> TimedEvent {
    TimedEvent { at_ms, event }
}

#[test]
fn scripted_replay_on_simulated_board() {
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock + Send + Sync> = Arc::new(clock.clone());
    let inputs = ScriptedInputs::new(
        shared,
        vec![
            ev(0, InputEvent::Destination(3)),
            ev(10, InputEvent::Button(1)),
            ev(20, InputEvent::Destination(0)),
            ev(30, InputEvent::Key('2')),
            // Degenerate: selector still 0
            ev(40, InputEvent::Key('0')),
            ev(3_000, InputEvent::Speed(false)),
        ],
        true,
        0,
    );
    let mut core = build_elevator(
        inputs,
        FramePanel::new(),
        TextGrid::new(),
        MotionCfg::default(),
        DoorCfg::default(),
        DisplayCfg::default(),
        None,
        Some(Box::new(clock.clone())),
    )
    .unwrap();
    core.begin().unwrap();

    let mut accepted = 0;
    let mut rejected = 0;
    let stats = runner::run(
        &mut core,
        RunOptions { idle_us: 1_000 },
        |c| {
            (c.inputs().exhausted() && c.is_quiescent()) || c.now_ms() > 60_000
        },
        |r| match r.intake {
            Some((_, elevator_core::Admission::Accepted)) => accepted += 1,
            Some((_, elevator_core::Admission::Rejected(_))) => rejected += 1,
            None => {}
        },
    )
    .unwrap();

    assert_eq!(accepted, 2);
    assert_eq!(rejected, 1);
    assert_eq!(core.trips_completed(), 2);
    assert_eq!(core.floor(), Some(Floor::Ground));
    assert!(stats.iterations > 0);
    assert!(stats.max_step_us >= stats.mean_step_us());

    // 0 -> 1 empty, 1 -> 3 loaded, 3 -> 2 empty, 2 -> 0 loaded
    let counters = core.counters();
    assert_eq!(counters.without_passenger, 2);
    assert_eq!(counters.with_passenger, 4);

    let panel = core.panel();
    assert_eq!(panel.pixel(0, 4), Some(Colour::Floor));
    assert_eq!(panel.pixel(1, 1), Some(Colour::Car));
    assert_eq!(panel.pixel(4, 5), Some(Colour::Empty));
    assert!(!panel.indicator(0) && !panel.indicator(1));
    assert_eq!(panel.tones(), 4);

    let term = core.terminal();
    assert_eq!(term.line(1), "Current Floor: 0");
    assert_eq!(term.line(2), "Direction: Stationary");
    assert_eq!(term.line(3), "Floors with Passenger: 4");
    assert_eq!(term.line(4), "Floors without Passenger: 2");
}
