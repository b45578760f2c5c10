//! Actuation tasks against the mock board: heat lamp, indicator bank,
//! motor and motion alarm.

use std::sync::Arc;

use habitat::alarm::{AlarmPattern, AlarmPhase};
use habitat::app::events::AppEvent;
use habitat::app::graph::{ActuatorKind, TaskGraph};
use habitat::config::{ControllerConfig, Variant};
use habitat::drivers::motor::MotorState;
use habitat::pins::*;
use habitat::sensors::ObservationId;
use habitat::signal::WakeSignal;
use habitat::store::ObservationStore;
use habitat::tasks::alarm::{AlarmTask, AlarmWiring};
use habitat::tasks::level::{HeatLampRule, HeatLampTask, IndicatorRule, IndicatorTask};
use habitat::tasks::motor::{MotorRule, MotorTask};
use habitat::threshold::Crossing;

use crate::mock_hw::{Call, MockBoard, RecordingSink};

// ── Heat lamp ─────────────────────────────────────────────────

fn heat_lamp(store: &Arc<ObservationStore>) -> (HeatLampTask<MockBoard, RecordingSink>, MockBoard, RecordingSink) {
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    let rule = HeatLampRule {
        pin: HEAT_LAMP_GPIO,
        outdoor_below_c: 27.0,
        indoor_max_c: 30.0,
        period_ms: 1000,
    };
    let task = HeatLampTask::new(rule, board.clone(), sink.clone(), Arc::clone(store));
    (task, board, sink)
}

#[test]
fn heat_lamp_writes_only_on_change() {
    let store = Arc::new(ObservationStore::new());
    store.publish(ObservationId::OutdoorTemperature, 20.0);
    store.publish(ObservationId::IndoorTemperature, 25.0);
    let (mut lamp, board, sink) = heat_lamp(&store);

    for _ in 0..5 {
        assert!(lamp.evaluate());
    }
    assert_eq!(board.writes(), vec![(HEAT_LAMP_GPIO, true)]);

    store.publish(ObservationId::OutdoorTemperature, 28.0);
    for _ in 0..5 {
        assert!(!lamp.evaluate());
    }
    assert_eq!(
        board.writes(),
        vec![(HEAT_LAMP_GPIO, true), (HEAT_LAMP_GPIO, false)]
    );
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::OutputChanged { output: "heat_lamp", .. })),
        2
    );
}

#[test]
fn heat_lamp_holds_off_until_both_thermistors_publish() {
    let store = Arc::new(ObservationStore::new());
    let (mut lamp, board, sink) = heat_lamp(&store);

    // Neutral 0.0 in both slots would satisfy the rule.
    assert!(!lamp.evaluate());
    store.publish(ObservationId::OutdoorTemperature, 10.0);
    assert!(!lamp.evaluate(), "indoor thermistor has not reported yet");
    assert_eq!(board.writes(), vec![(HEAT_LAMP_GPIO, false)]);

    store.publish(ObservationId::IndoorTemperature, 22.0);
    assert!(lamp.evaluate());
    assert!(board.level(HEAT_LAMP_GPIO));
    assert_eq!(
        sink.count(|e| *e == AppEvent::OutputChanged { output: "heat_lamp", on: true }),
        1
    );
}

#[test]
fn heat_lamp_respects_indoor_ceiling() {
    let store = Arc::new(ObservationStore::new());
    store.publish(ObservationId::OutdoorTemperature, 10.0);
    store.publish(ObservationId::IndoorTemperature, 30.0);
    let (mut lamp, board, _) = heat_lamp(&store);
    assert!(lamp.evaluate());

    store.publish(ObservationId::IndoorTemperature, 30.5);
    assert!(!lamp.evaluate());
    assert!(!board.level(HEAT_LAMP_GPIO));
}

// ── Indicator bank ────────────────────────────────────────────

#[test]
fn heartbeat_alternates_and_light_led_follows_level() {
    let store = Arc::new(ObservationStore::new());
    store.publish(ObservationId::LightFraction, 70.0);
    let board = MockBoard::new();
    let rule = IndicatorRule {
        heartbeat_a: HEARTBEAT_A_GPIO,
        heartbeat_b: HEARTBEAT_B_GPIO,
        light_led: LIGHT_LED_GPIO,
        light_on_above_pct: 60.0,
        period_ms: 500,
    };
    let mut task = IndicatorTask::new(rule, board.clone(), RecordingSink::new(), Arc::clone(&store));

    task.step();
    assert!(board.level(HEARTBEAT_A_GPIO));
    assert!(!board.level(HEARTBEAT_B_GPIO));
    assert!(task.light_led_on());

    task.step();
    assert!(!board.level(HEARTBEAT_A_GPIO));
    assert!(board.level(HEARTBEAT_B_GPIO));

    let led_writes = board
        .writes()
        .into_iter()
        .filter(|(p, _)| *p == LIGHT_LED_GPIO)
        .count();
    assert_eq!(led_writes, 1, "unchanged light level must not rewrite the LED");

    store.publish(ObservationId::LightFraction, 60.0);
    task.step();
    assert!(!board.level(LIGHT_LED_GPIO), "LED needs strictly above 60%");
}

#[test]
fn each_heartbeat_led_stays_lit_for_the_configured_period() {
    let config = ControllerConfig::for_variant(Variant::Basic);
    let g = TaskGraph::from_config(&config).unwrap();
    let rule = g
        .actuators
        .iter()
        .find_map(|a| match a.kind {
            ActuatorKind::Indicators(r) => Some(r),
            _ => None,
        })
        .unwrap();
    let board = MockBoard::new();
    let mut task = IndicatorTask::new(
        rule,
        board.clone(),
        RecordingSink::new(),
        Arc::new(ObservationStore::new()),
    );

    for _ in 0..3 {
        task.step();
    }
    assert_eq!(board.sleeps(), vec![500, 500, 500]);
    assert_eq!(config.indicator_period_ms, 500);

    // Heartbeat A toggles once per sleep.
    let a_levels: Vec<bool> = board
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Write { pin, high } if pin == HEARTBEAT_A_GPIO => Some(high),
            _ => None,
        })
        .collect();
    assert_eq!(a_levels, vec![true, false, true]);
}

// ── Motor ─────────────────────────────────────────────────────

fn motor(
    light_pct: f32,
) -> (MotorTask<MockBoard, RecordingSink>, MockBoard, RecordingSink, Arc<WakeSignal>) {
    let store = Arc::new(ObservationStore::new());
    store.publish(ObservationId::LightFraction, light_pct);
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    let wake = Arc::new(WakeSignal::new());
    let rule = MotorRule {
        ia: MOTOR_IA_GPIO,
        ib: MOTOR_IB_GPIO,
        clockwise_above_pct: 50.0,
        run_ms: 1000,
    };
    let task = MotorTask::new(rule, board.clone(), sink.clone(), store, Arc::clone(&wake));
    (task, board, sink, wake)
}

#[test]
fn two_wakes_before_consumer_runs_once() {
    let (mut task, board, _, wake) = motor(70.0);
    wake.signal(Crossing::Rising);
    wake.signal(Crossing::Falling);

    assert_eq!(task.poll(), Some(MotorState::Clockwise));
    assert_eq!(task.poll(), None);
    assert_eq!(board.sleeps(), vec![1000]);
}

#[test]
fn motor_run_drives_then_releases_both_legs() {
    let (mut task, board, sink, _) = motor(70.0);
    task.run_once();

    assert_eq!(
        board.calls(),
        vec![
            Call::Write { pin: MOTOR_IB_GPIO, high: false },
            Call::Write { pin: MOTOR_IA_GPIO, high: true },
            Call::Sleep(1000),
            Call::Write { pin: MOTOR_IA_GPIO, high: false },
            Call::Write { pin: MOTOR_IB_GPIO, high: false },
        ]
    );
    assert!(!task.is_running());
    let states: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::Motor { state, .. } => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![MotorState::Clockwise, MotorState::Stopped]);
}

#[test]
fn dim_light_runs_counter_clockwise() {
    let (mut task, board, _, _) = motor(46.4);
    assert_eq!(task.run_once(), MotorState::CounterClockwise);
    assert_eq!(board.writes()[1], (MOTOR_IB_GPIO, true));
}

#[test]
fn wake_during_run_leaves_exactly_one_pending() {
    let (mut task, _, _, wake) = motor(70.0);
    wake.signal(Crossing::Rising);
    assert!(task.poll().is_some());
    // Crossings raised while the motor was running.
    wake.signal(Crossing::Falling);
    wake.signal(Crossing::Rising);
    assert!(task.poll().is_some());
    assert!(task.poll().is_none());
}

// ── Motion alarm ──────────────────────────────────────────────

fn alarm(board: &MockBoard, sink: &RecordingSink) -> AlarmTask<MockBoard, RecordingSink> {
    let wiring = AlarmWiring {
        trigger: PIR_GPIO,
        indicator_a: ALARM_INDICATOR_A_GPIO,
        indicator_b: ALARM_INDICATOR_B_GPIO,
        buzzer_1: BUZZER_1_GPIO,
        buzzer_2: BUZZER_2_GPIO,
        poll_ms: 100,
    };
    AlarmTask::new(wiring, board.clone(), sink.clone())
}

fn pattern(board: &MockBoard) -> (bool, bool, bool, bool) {
    (
        board.level(ALARM_INDICATOR_A_GPIO),
        board.level(ALARM_INDICATOR_B_GPIO),
        board.level(BUZZER_1_GPIO),
        board.level(BUZZER_2_GPIO),
    )
}

#[test]
fn active_trigger_plays_full_cycle_with_contract_timing() {
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    board.script_pir(&[true]);
    let mut task = alarm(&board, &sink);

    let expected = [
        (AlarmPhase::ChirpA, (true, false, true, true)),
        (AlarmPhase::GapA, (false, false, false, false)),
        (AlarmPhase::ChirpB, (false, true, true, true)),
        (AlarmPhase::GapB, (false, false, false, false)),
        (AlarmPhase::ChirpA, (true, false, true, true)),
    ];
    for (phase, pins) in expected {
        assert_eq!(task.step(), phase);
        assert_eq!(pattern(&board), pins, "{phase:?}");
        assert_eq!(task.pattern(), phase.pattern());
    }
    assert_eq!(board.sleeps(), vec![150, 100, 300, 100, 150]);
}

#[test]
fn dropped_trigger_forces_all_off_at_next_boundary() {
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    board.script_pir(&[true, true, true, false]);
    let mut task = alarm(&board, &sink);

    task.step();
    task.step();
    assert_eq!(task.step(), AlarmPhase::ChirpB);
    assert_eq!(task.step(), AlarmPhase::Idle);
    assert_eq!(pattern(&board), (false, false, false, false));
    assert_eq!(task.pattern(), AlarmPattern::OFF);
    assert_eq!(board.sleeps().last(), Some(&100));

    // Staying idle neither rewrites pins nor re-reports the phase.
    let writes = board.writes().len();
    task.step();
    assert_eq!(board.writes().len(), writes);
    assert_eq!(
        sink.count(|e| *e == AppEvent::AlarmPhase(AlarmPhase::Idle)),
        1
    );
}

#[test]
fn sequencer_phase_and_elapsed_time_are_visible() {
    let board = MockBoard::new();
    board.script_pir(&[true]);
    let mut task = alarm(&board, &RecordingSink::new());
    task.step();
    // The step slept out ChirpA, so the boundary has been reached.
    let seq = task.sequencer();
    assert_eq!(seq.phase(), AlarmPhase::ChirpA);
    assert_eq!(seq.elapsed_ms(150), 150);
    assert!(seq.at_boundary(150));
}
