mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{js, push, push_err, Scripted};
use joyframe::interpret::driving_position;
use joyframe::{
    AdapterNames, AnalogChannel, Calibration, ChangeEvent, ControllerEvent, ControllerSet,
    DeviceKind, Direction, DrivingPosition, EventBus, EventFilter, EventSink, HostBinding,
    HostInput, JoystickDevice, MachineInput, PollStatus, SourceError,
};
use proptest::prelude::*;

fn open(source: Scripted) -> JoystickDevice<Scripted> {
    JoystickDevice::open(source, Calibration::default(), &AdapterNames::default()).unwrap()
}

fn poll(dev: &mut JoystickDevice<Scripted>) -> (PollStatus, Vec<ChangeEvent>) {
    let mut events = Vec::new();
    let status = dev.poll(&mut |e: &ChangeEvent| events.push(*e)).unwrap();
    (status, events)
}

#[test]
fn press_then_push_right() {
    let (src, reads) = Scripted::new("Competition Pro");
    let mut dev = open(src);
    push(&reads, js(0, 0, 0, 0));
    push(&reads, js(1, 0, 0, 0));
    push(&reads, js(1, 900, 0, 0));

    assert_eq!(poll(&mut dev), (PollStatus::Ok, vec![]));
    assert_eq!(
        poll(&mut dev).1,
        vec![ChangeEvent::ButtonChanged { button: 0, down: true }]
    );
    assert_eq!(
        poll(&mut dev).1,
        vec![ChangeEvent::DirectionalChanged { direction: Direction::Right, down: true }]
    );
    assert_eq!(dev.last_state().x, 900);
}

#[test]
fn first_poll_after_open_is_silent_even_with_buttons_held() {
    let (src, reads) = Scripted::new("2600-daptor II");
    let mut dev = open(src);
    push(&reads, js(0b11, -500, 950, -875));
    assert_eq!(poll(&mut dev), (PollStatus::Ok, vec![]));
    assert_eq!(dev.mode(), Some(1));
}

#[test]
fn input_loss_reacquires_and_rebaselines() {
    let (src, reads) = Scripted::new("Competition Pro");
    let acquires = Rc::clone(&src.acquires);
    let mut dev = open(src);
    push(&reads, js(0, 0, 0, 0));
    push(&reads, js(1, 0, 0, 0));
    push_err(&reads, SourceError::InputLost);
    push(&reads, js(1, 0, 0, 0));
    push(&reads, js(0, 0, 0, 0));

    poll(&mut dev);
    assert_eq!(poll(&mut dev).1.len(), 1);
    assert_eq!(poll(&mut dev), (PollStatus::RecoverableLoss, vec![]));
    assert_eq!(*acquires.borrow(), 1);
    // Still held after the reconnect: no repeated press.
    assert_eq!(poll(&mut dev), (PollStatus::Ok, vec![]));
    assert_eq!(
        poll(&mut dev).1,
        vec![ChangeEvent::ButtonChanged { button: 0, down: false }]
    );
}

#[test]
fn unplugged_keeps_previous_state() {
    let (src, reads) = Scripted::new("Competition Pro");
    let mut dev = open(src);
    push(&reads, js(0, 0, 0, 0));
    push(&reads, js(1, 0, 0, 0));
    push_err(&reads, SourceError::Unplugged);
    push(&reads, js(0, 0, 0, 0));

    poll(&mut dev);
    poll(&mut dev);
    assert_eq!(poll(&mut dev), (PollStatus::Unplugged, vec![]));
    assert!(dev.last_state().button_down(0));
    assert_eq!(
        poll(&mut dev).1,
        vec![ChangeEvent::ButtonChanged { button: 0, down: false }]
    );
}

#[test]
fn platform_failure_is_an_error() {
    let (src, reads) = Scripted::new("Competition Pro");
    let mut dev = open(src);
    push_err(&reads, SourceError::Failed("E_HANDLE".into()));
    let err = dev.poll(&mut |_: &ChangeEvent| {}).unwrap_err();
    assert!(matches!(err, joyframe::Error::Platform(_)));
}

#[test]
fn dead_zone_is_strict() {
    let (src, reads) = Scripted::new("Competition Pro");
    let mut dev = open(src);
    push(&reads, js(0, 0, 0, 0));
    push(&reads, js(0, 100, -100, 0));
    push(&reads, js(0, 101, -101, 0));

    poll(&mut dev);
    assert!(poll(&mut dev).1.is_empty());
    assert_eq!(
        poll(&mut dev).1,
        vec![
            ChangeEvent::DirectionalChanged { direction: Direction::Right, down: true },
            ChangeEvent::DirectionalChanged { direction: Direction::Up, down: true },
        ]
    );
}

#[test]
fn driving_breakpoints() {
    let cal = Calibration::default();
    let at = |y| driving_position(&js(0, 0, y, 0), &cal);
    assert_eq!(at(-101), DrivingPosition::Up);
    assert_eq!(at(-100), DrivingPosition::Center);
    assert_eq!(at(100), DrivingPosition::Center);
    assert_eq!(at(101), DrivingPosition::Half);
    assert_eq!(at(900), DrivingPosition::Half);
    assert_eq!(at(901), DrivingPosition::Full);
    assert_eq!(DrivingPosition::Full.code(), 1);
    assert_eq!(DrivingPosition::Half.code(), 2);
}

#[test]
fn daptor2_mode_in_and_out_of_unknown() {
    let (src, reads) = Scripted::new("2600-DAPTOR II");
    let mut dev = open(src);
    assert_eq!(dev.kind(), DeviceKind::Daptor2);
    for z in [-1000, -875, 0, -750] {
        push(&reads, js(0, 0, 0, z));
    }

    poll(&mut dev);
    assert_eq!(dev.mode(), Some(0));
    assert_eq!(poll(&mut dev).1, vec![ChangeEvent::ModeChanged { mode: 1 }]);
    assert_eq!(poll(&mut dev).1, vec![ChangeEvent::ModeChanged { mode: -1 }]);
    assert_eq!(dev.mode(), Some(-1));
    assert_eq!(poll(&mut dev).1, vec![ChangeEvent::ModeChanged { mode: 2 }]);
}

#[test]
fn controller_set_tags_and_fans_out() {
    let (left, left_reads) = Scripted::new("Stelladaptor 2600-to-USB Interface");
    let (right, right_reads) = Scripted::new("Competition Pro");
    let mut set = ControllerSet::new();
    set.attach(0, open(left)).unwrap();
    set.attach(1, open(right)).unwrap();
    assert!(set.left_jack_has_adaptor());
    assert!(!set.right_jack_has_adaptor());

    push(&left_reads, js(0, 0, 0, 0));
    push(&right_reads, js(0, 0, 0, 0));
    assert!(set.poll_all().is_empty());

    push(&left_reads, js(1, 0, 0, 0));
    push(&right_reads, js(0, -400, 0, 0));

    let buttons: Rc<RefCell<Vec<ChangeEvent>>> = Rc::default();
    let all: Rc<RefCell<Vec<ChangeEvent>>> = Rc::default();
    let mut bus = EventBus::new();
    {
        let buttons = Rc::clone(&buttons);
        bus.add_listener(
            move |e: &ChangeEvent| buttons.borrow_mut().push(*e),
            EventFilter::ButtonsOnly,
        );
        let all = Rc::clone(&all);
        bus.add_listener(move |e: &ChangeEvent| all.borrow_mut().push(*e), EventFilter::All);
    }

    let mut tagged = Vec::new();
    set.poll_with(|ev| {
        bus.on_event(&ev.event);
        tagged.push(*ev);
    });

    let press = ChangeEvent::ButtonChanged { button: 0, down: true };
    let left_dir = ChangeEvent::DirectionalChanged { direction: Direction::Left, down: true };
    assert_eq!(
        tagged,
        vec![
            ControllerEvent { controller: 0, event: press },
            ControllerEvent { controller: 1, event: left_dir },
        ]
    );
    assert_eq!(*buttons.borrow(), vec![press]);
    assert_eq!(*all.borrow(), vec![press, left_dir]);
    assert_eq!(set.last_status(0), Some(PollStatus::Ok));

    // Nothing queued: the scripted source reports the device gone.
    assert!(set.poll_all().is_empty());
    assert_eq!(set.last_status(1), Some(PollStatus::Unplugged));
}

#[test]
fn daptor2_in_7800_mode_drives_host_fire_buttons() {
    let (src, reads) = Scripted::new("2600-daptor II");
    let mut set = ControllerSet::new();
    set.attach(1, open(src)).unwrap();
    push(&reads, js(0, 0, 0, -1000));
    push(&reads, js(0, 0, 0, -875));
    push(&reads, js(0b100, 0, 0, -875));

    let mut binding = HostBinding::new(&Calibration::default());
    let mut host = Vec::new();
    for _ in 0..3 {
        for ev in set.poll_all() {
            host.extend(binding.translate(&ev));
        }
    }
    assert_eq!(
        host,
        vec![
            HostInput::Joystick { player: 1, input: MachineInput::Fire, down: true },
            HostInput::ProLine { player: 1, input: MachineInput::Fire2, down: true },
        ]
    );
    assert_eq!(set.controller_info(1), "2600-daptor II (7800 mode)");

    let snap = set.snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.get(1).unwrap().mode, Some(1));
    assert!(snap.to_json().unwrap().contains("\"description\":\"2600-daptor II (7800 mode)\""));
}

#[test]
fn daptor2_already_in_7800_mode_reaches_the_binding() {
    let (src, reads) = Scripted::new("2600-daptor II");
    let mut set = ControllerSet::new();
    set.attach(0, open(src)).unwrap();
    push(&reads, js(0, 0, 0, -875));
    push(&reads, js(0b100, 0, 0, -875));

    let mut binding = HostBinding::new(&Calibration::default());
    assert_eq!(
        set.poll_all(),
        vec![ControllerEvent { controller: 0, event: ChangeEvent::ModeChanged { mode: 1 } }]
    );
    let host: Vec<_> = set
        .poll_all()
        .iter()
        .flat_map(|e| binding.translate(e))
        .collect();
    assert_eq!(
        host,
        vec![
            HostInput::Joystick { player: 0, input: MachineInput::Fire, down: true },
            HostInput::ProLine { player: 0, input: MachineInput::Fire2, down: true },
        ]
    );
}

#[test]
fn mode_is_reported_again_after_input_loss() {
    let (src, reads) = Scripted::new("2600-daptor II");
    let mut set = ControllerSet::new();
    set.attach(0, open(src)).unwrap();
    push(&reads, js(0, 0, 0, -875));
    push_err(&reads, SourceError::InputLost);
    push(&reads, js(0, 0, 0, -750));

    let mut binding = HostBinding::new(&Calibration::default());
    let mut seen = Vec::new();
    for _ in 0..3 {
        for ev in set.poll_all() {
            binding.translate(&ev);
            seen.push(ev.event);
        }
    }
    assert_eq!(
        seen,
        vec![ChangeEvent::ModeChanged { mode: 1 }, ChangeEvent::ModeChanged { mode: 2 }]
    );
    assert_eq!(binding.mode(0), joyframe::DaptorMode::Keypad);
}

#[test]
fn swapping_devices_resyncs_the_binding() {
    let (d2, d2_reads) = Scripted::new("2600-daptor II");
    let (stick, stick_reads) = Scripted::new("Competition Pro");
    let mut set = ControllerSet::new();
    set.attach(0, open(d2)).unwrap();
    push(&d2_reads, js(0, 0, 0, -875));

    let mut binding = HostBinding::new(&Calibration::default());
    for ev in set.poll_all() {
        binding.translate(&ev);
    }
    assert_eq!(binding.mode(0), joyframe::DaptorMode::Atari7800);

    set.attach(0, open(stick)).unwrap();
    binding.sync(&set);
    push(&stick_reads, js(0, 0, 0, 0));
    push(&stick_reads, js(1, 0, 0, 0));
    let host: Vec<_> = (0..2)
        .flat_map(|_| set.poll_all())
        .flat_map(|e| binding.translate(&e))
        .collect();
    assert_eq!(host[0], HostInput::Joystick { player: 0, input: MachineInput::Fire, down: true });
}

#[test]
fn paddles_reach_the_host_as_player_pairs() {
    let (src, reads) = Scripted::new("2600-daptor");
    let mut set = ControllerSet::new();
    set.attach(1, open(src)).unwrap();
    push(&reads, js(0, 0, 0, 0));
    push(&reads, js(0, -1000, 0, 0));

    let mut binding = HostBinding::new(&Calibration::default());
    set.poll_all();
    let events = set.poll_all();
    assert!(events.iter().any(|e| e.event
        == ChangeEvent::AnalogPositionChanged { channel: AnalogChannel::Paddle(0), position: 0 }));
    let host: Vec<_> = events.iter().flat_map(|e| binding.translate(e)).collect();
    assert!(host.contains(&HostInput::Paddle { player: 2, range: 680, position: 0 }));
}

proptest! {
    #[test]
    fn button_events_match_changed_bits(prev in any::<u32>(), curr in any::<u32>()) {
        let (src, reads) = Scripted::new("Competition Pro");
        let mut dev = open(src);
        push(&reads, js(prev, 0, 0, 0));
        push(&reads, js(curr, 0, 0, 0));
        poll(&mut dev);
        let (_, events) = poll(&mut dev);

        let expected: Vec<ChangeEvent> = (0..16u8)
            .filter(|&b| (prev ^ curr) & (1 << b) != 0)
            .map(|b| ChangeEvent::ButtonChanged { button: b, down: curr & (1 << b) != 0 })
            .collect();
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn button_events_track_every_step(seq in proptest::collection::vec(any::<u32>(), 1..12)) {
        let (src, reads) = Scripted::new("Competition Pro");
        let mut dev = open(src);
        for &buttons in &seq {
            push(&reads, js(buttons, 0, 0, 0));
        }
        poll(&mut dev);
        for pair in seq.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let (status, events) = poll(&mut dev);
            prop_assert_eq!(status, PollStatus::Ok);
            let expected: Vec<ChangeEvent> = (0..16u8)
                .filter(|&b| (prev ^ curr) & (1 << b) != 0)
                .map(|b| ChangeEvent::ButtonChanged { button: b, down: curr & (1 << b) != 0 })
                .collect();
            prop_assert_eq!(events, expected);
            prop_assert_eq!(dev.last_state().buttons, curr & 0xffff);
        }
    }

    #[test]
    fn identical_states_are_silent(
        buttons in any::<u32>(),
        x in -1000i32..=1000,
        y in -1000i32..=1000,
        z in -1000i32..=1000,
    ) {
        let (src, reads) = Scripted::new("2600-daptor II");
        let mut dev = open(src);
        for _ in 0..3 {
            push(&reads, js(buttons, x, y, z));
        }
        for _ in 0..3 {
            let (status, events) = poll(&mut dev);
            prop_assert_eq!(status, PollStatus::Ok);
            prop_assert!(events.is_empty());
        }
    }
}
