//! Sampling task: conversion, publication, threshold evaluation and
//! fault handling, driven against the mock board one cycle at a time.

use std::sync::Arc;

use habitat::app::events::AppEvent;
use habitat::app::graph::{SensorSpec, TaskGraph, WakeSignals, WakeTarget};
use habitat::config::{ControllerConfig, Variant};
use habitat::error::SensorError;
use habitat::pins::{LIGHT_ADC, OUTDOOR_NTC_ADC};
use habitat::sensors::ObservationId;
use habitat::store::ObservationStore;
use habitat::tasks::sampling::SamplingTask;
use habitat::threshold::Crossing;

use crate::mock_hw::{MockBoard, RecordingSink};

fn spec(variant: Variant, id: ObservationId) -> SensorSpec {
    TaskGraph::from_config(&ControllerConfig::for_variant(variant))
        .unwrap()
        .sensors
        .iter()
        .find(|s| s.observation == id)
        .cloned()
        .unwrap()
}

struct Rig {
    board: MockBoard,
    sink: RecordingSink,
    store: Arc<ObservationStore>,
    wakes: WakeSignals,
    task: SamplingTask<MockBoard, RecordingSink>,
}

fn rig(variant: Variant, id: ObservationId) -> Rig {
    let board = MockBoard::new();
    let sink = RecordingSink::new();
    let store = Arc::new(ObservationStore::new());
    let wakes = WakeSignals::new();
    let task = SamplingTask::new(
        spec(variant, id),
        board.clone(),
        sink.clone(),
        Arc::clone(&store),
        wakes.clone(),
    );
    Rig {
        board,
        sink,
        store,
        wakes,
        task,
    }
}

fn crossings(sink: &RecordingSink) -> usize {
    sink.count(|e| matches!(e, AppEvent::ThresholdCrossed { .. }))
}

#[test]
fn first_sample_only_seeds_previous_value() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2100]);

    let fired = r.task.sample_once().unwrap();
    assert!(fired.is_empty(), "no predecessor, no crossing");
    assert!(!r.wakes.get(WakeTarget::Motor).is_pending());
    assert!((r.store.read(ObservationId::LightFraction) - 51.28).abs() < 0.01);
    assert_eq!(crossings(&r.sink), 0);
}

#[test]
fn rising_light_wakes_motor_once() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2000, 2100]);

    r.task.sample_once().unwrap();
    let fired = r.task.sample_once().unwrap();

    assert_eq!(fired.as_slice(), &[("motor_wake", Crossing::Rising)]);
    assert_eq!(crossings(&r.sink), 1);
    let wake = r.wakes.get(WakeTarget::Motor);
    assert_eq!(wake.try_take(), Some(Crossing::Rising));
    assert_eq!(wake.try_take(), None);
}

#[test]
fn falling_light_wakes_motor_again() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2100, 1900]);

    r.task.sample_once().unwrap();
    let fired = r.task.sample_once().unwrap();

    assert_eq!(fired.as_slice(), &[("motor_wake", Crossing::Falling)]);
    assert_eq!(
        r.wakes.get(WakeTarget::Motor).try_take(),
        Some(Crossing::Falling)
    );
}

#[test]
fn steady_light_fires_nothing() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2100, 2100, 2100]);
    for _ in 0..3 {
        assert!(r.task.sample_once().unwrap().is_empty());
    }
    assert!(!r.wakes.get(WakeTarget::Motor).is_pending());
}

#[test]
fn big_jump_fires_every_threshold_it_passes() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    // ~24% -> ~73%: crosses both the 50% motor and the 60% LED boundary.
    r.board.script_adc(LIGHT_ADC, &[1000, 3000]);
    r.task.sample_once().unwrap();
    let fired = r.task.sample_once().unwrap();
    assert_eq!(
        fired.as_slice(),
        &[("motor_wake", Crossing::Rising), ("light_led", Crossing::Rising)]
    );
    assert_eq!(crossings(&r.sink), 2);
}

#[test]
fn basic_variant_reports_crossing_without_waking() {
    let mut r = rig(Variant::Basic, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2000, 3000]);
    r.task.sample_once().unwrap();
    let fired = r.task.sample_once().unwrap();
    assert_eq!(fired.as_slice(), &[("light_led", Crossing::Rising)]);
    assert!(!r.wakes.get(WakeTarget::Motor).is_pending());
}

#[test]
fn read_fault_skips_cycle_and_keeps_last_good_value() {
    let mut r = rig(Variant::Motor, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[2000]);
    r.board
        .script_adc_fault(LIGHT_ADC, SensorError::AdcReadFailed);
    r.board.script_adc(LIGHT_ADC, &[2100]);

    r.task.sample_once().unwrap();
    let before = r.store.read(ObservationId::LightFraction);

    assert_eq!(r.task.sample_once(), Err(SensorError::AdcReadFailed));
    assert_eq!(r.store.read(ObservationId::LightFraction), before);
    assert_eq!(r.task.previous(), Some(before));
    assert_eq!(
        r.sink
            .count(|e| matches!(e, AppEvent::SensorFault { error: SensorError::AdcReadFailed, .. })),
        1
    );

    // Recovery compares against the value held across the fault.
    let fired = r.task.sample_once().unwrap();
    assert_eq!(fired.as_slice(), &[("motor_wake", Crossing::Rising)]);
}

#[test]
fn zero_light_reading_is_a_fault() {
    let mut r = rig(Variant::Basic, ObservationId::LightFraction);
    r.board.script_adc(LIGHT_ADC, &[0]);
    assert_eq!(r.task.sample_once(), Err(SensorError::InvalidReading));
    assert_eq!(r.task.previous(), None);
}

#[test]
fn thermistor_rails_are_faults_and_never_published() {
    let mut r = rig(Variant::Full, ObservationId::OutdoorTemperature);
    r.board.script_adc(OUTDOOR_NTC_ADC, &[0, 4095, 5000]);

    assert_eq!(r.task.sample_once(), Err(SensorError::InvalidReading));
    assert_eq!(r.task.sample_once(), Err(SensorError::InvalidReading));
    assert_eq!(r.task.sample_once(), Err(SensorError::OutOfRange));
    assert_eq!(r.store.read(ObservationId::OutdoorTemperature), 0.0);
    assert_eq!(r.sink.count(|e| matches!(e, AppEvent::Sampled { .. })), 0);
}

#[test]
fn thermistor_midscale_publishes_room_temperature() {
    let mut r = rig(Variant::Full, ObservationId::OutdoorTemperature);
    r.board.script_adc(OUTDOOR_NTC_ADC, &[2048]);
    r.task.sample_once().unwrap();
    let t = r.store.read(ObservationId::OutdoorTemperature);
    assert!((t - 25.0).abs() < 0.1, "got {t}");
}
