//! Whole-graph behaviour: startup configuration, fatal init faults, the
//! light → motor pipeline, and a live graph on host threads.

use std::sync::Arc;
use std::time::{Duration, Instant};

use habitat::adapters::sim::SimBoard;
use habitat::app::events::AppEvent;
use habitat::app::graph::{SensorSpec, TaskGraph, WakeSignals, WakeTarget};
use habitat::app::orchestrator::{configure_board, spawn_graph, spawn_graph_with};
use habitat::config::{ControllerConfig, Variant};
use habitat::drivers::hw_init::HwInitError;
use habitat::drivers::motor::MotorState;
use habitat::error::Error;
use habitat::pins::*;
use habitat::sensors::ObservationId;
use habitat::store::ObservationStore;
use habitat::tasks::motor::{MotorRule, MotorTask};
use habitat::tasks::sampling::SamplingTask;

use crate::mock_hw::{MockBoard, RecordingSink};

fn graph(variant: Variant) -> TaskGraph {
    TaskGraph::from_config(&ControllerConfig::for_variant(variant)).unwrap()
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_drives_every_output_low() {
    let g = graph(Variant::Full);
    let mut board = MockBoard::new();
    configure_board(&g, &mut board).unwrap();

    let expected = [
        HEAT_LAMP_GPIO,
        MOTOR_IA_GPIO,
        MOTOR_IB_GPIO,
        ALARM_INDICATOR_A_GPIO,
        ALARM_INDICATOR_B_GPIO,
        BUZZER_1_GPIO,
        BUZZER_2_GPIO,
    ];
    let mut configured = board.configured_outputs();
    configured.sort_unstable();
    let mut want = expected.to_vec();
    want.sort_unstable();
    assert_eq!(configured, want);
    for pin in expected {
        assert!(board.writes().contains(&(pin, false)), "GPIO {pin} not driven low");
    }
}

#[test]
fn output_config_failure_aborts_startup() {
    let g = graph(Variant::Full);
    let board = MockBoard::new();
    board.reject_output(BUZZER_2_GPIO);
    let sink = RecordingSink::new();

    let err = spawn_graph(&g, board, sink.clone()).err();
    assert_eq!(err, Some(Error::Init(HwInitError::GpioConfigFailed(-1))));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::TaskStarted { .. })),
        0,
        "no task may start after a peripheral fault"
    );
}

#[test]
fn spawn_failure_runs_no_task_body() {
    let g = graph(Variant::Full);
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    let mut order = Vec::new();

    let err = spawn_graph_with(&g, board.clone(), sink.clone(), |t, body| {
        order.push(t.name);
        if t.name == "motion-alarm" {
            return Err(Error::Spawn(t.name));
        }
        Ok(std::thread::spawn(body))
    })
    .err();

    assert_eq!(err, Some(Error::Spawn("motion-alarm")));
    assert_eq!(
        order,
        ["ntc-outdoor", "ntc-indoor", "light", "motor", "heat-lamp", "motion-alarm"],
        "sampling tasks spawn before actuators"
    );
    // The created tasks were joined on the way out without running.
    assert!(sink.events().is_empty());
    assert!(board.sleeps().is_empty());
    assert!(board.writes().iter().all(|&(_, high)| !high));
}

#[test]
fn invalid_adc_wiring_is_fatal_on_sim_board() {
    let mut g = graph(Variant::Basic);
    g.sensors[0].adc = AdcChannel { gpio: 4, channel: 7 };
    let mut board = SimBoard::new();
    assert!(matches!(
        configure_board(&g, &mut board),
        Err(Error::Init(HwInitError::InvalidAdcChannel { .. }))
    ));
}

#[test]
fn sim_board_sees_every_pin_the_graph_owns() {
    let g = graph(Variant::Full);
    let mut board = SimBoard::new();
    configure_board(&g, &mut board).unwrap();

    assert!(board.is_input(PIR_GPIO));
    for adc in [OUTDOOR_NTC_ADC, INDOOR_NTC_ADC, LIGHT_ADC] {
        assert!(board.is_analog(adc));
    }
    for a in &g.actuators {
        for pin in a.output_pins() {
            assert!(board.is_output(pin));
            assert!(!board.level(pin));
        }
    }
    assert!(!board.is_output(HEARTBEAT_A_GPIO), "Full has no indicator bank");
}

// ── Light → motor pipeline ────────────────────────────────────

fn light_spec(g: &TaskGraph) -> SensorSpec {
    g.sensors
        .iter()
        .find(|s| s.observation == ObservationId::LightFraction)
        .cloned()
        .unwrap()
}

#[test]
fn light_crossings_drive_motor_both_ways() {
    let g = graph(Variant::Motor);
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    let store = Arc::new(ObservationStore::new());
    let wakes = WakeSignals::new();

    board.script_adc(LIGHT_ADC, &[2000, 2100, 1900]);
    let mut light = SamplingTask::new(
        light_spec(&g),
        board.clone(),
        sink.clone(),
        Arc::clone(&store),
        wakes.clone(),
    );
    let rule = MotorRule {
        ia: MOTOR_IA_GPIO,
        ib: MOTOR_IB_GPIO,
        clockwise_above_pct: 50.0,
        run_ms: 1000,
    };
    let mut motor = MotorTask::new(
        rule,
        board.clone(),
        sink.clone(),
        Arc::clone(&store),
        Arc::clone(wakes.get(WakeTarget::Motor)),
    );

    light.sample_once().unwrap();
    assert_eq!(motor.poll(), None);

    light.sample_once().unwrap();
    assert_eq!(motor.poll(), Some(MotorState::Clockwise));

    light.sample_once().unwrap();
    assert_eq!(motor.poll(), Some(MotorState::CounterClockwise));
    assert_eq!(motor.poll(), None);
}

// ── Live graph ────────────────────────────────────────────────

fn wait_for(what: &str, timeout: Duration, mut cond: impl FnMut() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(start.elapsed() < timeout, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn full_graph_runs_on_host_threads() {
    let config = ControllerConfig {
        light_period_ms: 10,
        temperature_period_ms: 10,
        heat_lamp_period_ms: 10,
        motor_run_ms: 20,
        alarm_poll_ms: 10,
        ..ControllerConfig::for_variant(Variant::Full)
    };
    let g = TaskGraph::from_config(&config).unwrap();
    let board = SimBoard::real_time();
    let sink = RecordingSink::new();

    board.set_adc(OUTDOOR_NTC_ADC, 2048);
    board.set_adc(INDOOR_NTC_ADC, 2048);
    board.set_adc(LIGHT_ADC, 2000);

    let running = spawn_graph(&g, board.clone(), sink.clone()).unwrap();
    assert_eq!(running.handles.len(), 6);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::TaskStarted { .. })), 6);

    let timeout = Duration::from_secs(5);
    wait_for("light published", timeout, || {
        (running.store.read(ObservationId::LightFraction) - 48.84).abs() < 0.01
    });
    wait_for("heat lamp on at 25 C", timeout, || board.level(HEAT_LAMP_GPIO));

    board.set_adc(LIGHT_ADC, 2100);
    wait_for("clockwise motor run", timeout, || {
        sink.count(|e| {
            matches!(
                e,
                AppEvent::Motor {
                    state: MotorState::Clockwise,
                    ..
                }
            )
        }) == 1
    });

    board.set_input(PIR_GPIO, true);
    wait_for("alarm chirp", timeout, || {
        sink.count(|e| matches!(e, AppEvent::AlarmPhase(habitat::alarm::AlarmPhase::ChirpB))) > 0
    });
}
