use std::collections::VecDeque;

use elevator_core::mocks::{FakeInputs, RecordingPanel, RecordingTerminal};
use elevator_core::{
    DisplayCfg, DoorCfg, Floor, MotionCfg, QueueReject, Request, RequestQueue, build_elevator,
};
use elevator_traits::ManualClock;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(u8, u8),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..4, 0u8..4).prop_map(|(o, d)| Op::Push(o, d)),
        1 => Just(Op::Pop),
    ]
}

fn floor(i: u8) -> Floor {
    Floor::from_index(i).unwrap()
}

proptest! {
    #[test]
    fn queue_is_bounded_fifo_without_degenerates(
        capacity in 1usize..16,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut q = RequestQueue::with_capacity(capacity);
        let mut model: VecDeque<Request> = VecDeque::new();
        for op in ops {
            match op {
                Op::Push(o, d) => {
                    let req = Request::new(floor(o), floor(d));
                    let res = q.enqueue(req);
                    if o == d {
                        prop_assert_eq!(res, Err(QueueReject::Degenerate));
                    } else if model.len() == capacity {
                        prop_assert_eq!(res, Err(QueueReject::Full));
                    } else {
                        prop_assert_eq!(res, Ok(()));
                        model.push_back(req);
                    }
                }
                Op::Pop => {
                    prop_assert_eq!(q.pop_head(), model.pop_front());
                }
            }
            prop_assert!(q.len() <= capacity);
            prop_assert!(q.iter().all(|r| !r.is_degenerate()));
            prop_assert_eq!(q.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(q.peek_head(), model.front().copied());
        }
    }

    #[test]
    fn car_never_moves_more_than_one_unit_per_step(
        origin in 0u8..4,
        destination in 0u8..4,
        steps in prop::collection::vec((1u64..400, any::<bool>()), 1..300),
    ) {
        prop_assume!(origin != destination);
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
        core.submit(Request::new(floor(origin), floor(destination))).unwrap();

        let mut last = core.position();
        for (dt, fast) in steps {
            core.inputs_mut().fast = fast;
            clock.advance_ms(dt);
            let r = core.step().unwrap();
            let delta = (r.position.value() - last.value()).abs();
            prop_assert!(delta <= 1);
            prop_assert_eq!(delta == 1, r.moved);
            prop_assert!((0..=12).contains(&r.position.value()));
            last = r.position;
        }
    }
}
