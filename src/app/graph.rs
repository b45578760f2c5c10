//! Declarative task graph.
//!
//! The firmware variants differ only in which sensors and actuators they
//! carry, so each variant is a list of entries rather than its own set of
//! task bodies. The orchestrator turns every entry into one task.
//!
//! ```text
//! ┌─────────────────────┐       ┌──────────────────────────┐
//! │ SensorSpec          │       │ ActuatorSpec             │
//! │  observation, kind  │       │  Indicators | HeatLamp   │
//! │  adc, period        │ wake  │  Motor | MotionAlarm     │
//! │  thresholds[] ──────┼──────▶│  task params             │
//! │  task params        │       └──────────────────────────┘
//! └─────────────────────┘
//! ```

use std::sync::Arc;

use heapless::Vec;

use crate::config::{ControllerConfig, Variant};
use crate::drivers::task_pin::Core;
use crate::error::ConfigError;
use crate::pins::{self, AdcChannel, Gpio};
use crate::sensors::{ObservationId, SensorKind};
use crate::signal::WakeSignal;
use crate::tasks::alarm::AlarmWiring;
use crate::tasks::level::{HeatLampRule, IndicatorRule};
use crate::tasks::motor::MotorRule;
use crate::threshold::Threshold;

pub const MAX_THRESHOLDS: usize = 2;
pub const MAX_SENSORS: usize = 4;
pub const MAX_ACTUATORS: usize = 4;
/// Largest output group owned by one actuator task.
pub const MAX_OUTPUTS_PER_TASK: usize = 4;

/// Kernel parameters for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskParams {
    pub name: &'static str,
    pub stack_kb: usize,
    pub priority: u8,
    pub core: Core,
}

impl TaskParams {
    const fn app(name: &'static str, stack_kb: usize, priority: u8) -> Self {
        Self {
            name,
            stack_kb,
            priority,
            core: Core::App,
        }
    }
}

/// Edge-triggered task a crossing can wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeTarget {
    Motor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSpec {
    pub label: &'static str,
    pub threshold: Threshold,
    pub wakes: Option<WakeTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorSpec {
    pub observation: ObservationId,
    pub kind: SensorKind,
    pub adc: AdcChannel,
    pub period_ms: u32,
    pub thresholds: Vec<ThresholdSpec, MAX_THRESHOLDS>,
    pub task: TaskParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorKind {
    /// Heartbeat pair plus light-level LED.
    Indicators(IndicatorRule),
    HeatLamp(HeatLampRule),
    Motor(MotorRule),
    MotionAlarm(AlarmWiring),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorSpec {
    pub kind: ActuatorKind,
    pub task: TaskParams,
}

impl ActuatorSpec {
    /// Every output pin this task owns.
    pub fn output_pins(&self) -> Vec<Gpio, MAX_OUTPUTS_PER_TASK> {
        match &self.kind {
            ActuatorKind::Indicators(r) => [r.heartbeat_a, r.heartbeat_b, r.light_led]
                .into_iter()
                .collect(),
            ActuatorKind::HeatLamp(r) => core::iter::once(r.pin).collect(),
            ActuatorKind::Motor(r) => [r.ia, r.ib].into_iter().collect(),
            ActuatorKind::MotionAlarm(w) => [w.indicator_a, w.indicator_b, w.buzzer_1, w.buzzer_2]
                .into_iter()
                .collect(),
        }
    }

    /// Digital input this task reads, if any.
    pub fn input_pin(&self) -> Option<Gpio> {
        match &self.kind {
            ActuatorKind::MotionAlarm(w) => Some(w.trigger),
            _ => None,
        }
    }

    pub fn wake_target(&self) -> Option<WakeTarget> {
        match &self.kind {
            ActuatorKind::Motor(_) => Some(WakeTarget::Motor),
            _ => None,
        }
    }
}

/// One wake slot per edge-triggered target, shared by producers and the
/// consumer.
#[derive(Clone, Default)]
pub struct WakeSignals {
    motor: Arc<WakeSignal>,
}

impl WakeSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, target: WakeTarget) -> &Arc<WakeSignal> {
        match target {
            WakeTarget::Motor => &self.motor,
        }
    }
}

/// The complete, validated set of tasks for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGraph {
    pub variant: Variant,
    pub sensors: Vec<SensorSpec, MAX_SENSORS>,
    pub actuators: Vec<ActuatorSpec, MAX_ACTUATORS>,
}

const CAPACITY: ConfigError = ConfigError::ValidationFailed("task graph capacity exceeded");

impl TaskGraph {
    /// Build and validate the graph for `config.variant`.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let with_motor = matches!(config.variant, Variant::Motor | Variant::Full);
        let with_indicators = matches!(config.variant, Variant::Basic | Variant::Motor);

        let mut sensors: Vec<SensorSpec, MAX_SENSORS> = Vec::new();
        let mut actuators: Vec<ActuatorSpec, MAX_ACTUATORS> = Vec::new();

        sensors
            .push(thermistor_spec(
                ObservationId::OutdoorTemperature,
                pins::OUTDOOR_NTC_ADC,
                config,
                TaskParams::app("ntc-outdoor", 4, 1),
            ))
            .map_err(|_| CAPACITY)?;

        if config.variant == Variant::Full {
            sensors
                .push(thermistor_spec(
                    ObservationId::IndoorTemperature,
                    pins::INDOOR_NTC_ADC,
                    config,
                    TaskParams::app("ntc-indoor", 4, 1),
                ))
                .map_err(|_| CAPACITY)?;
        }

        let mut light_thresholds: Vec<ThresholdSpec, MAX_THRESHOLDS> = Vec::new();
        if with_motor {
            light_thresholds
                .push(ThresholdSpec {
                    label: "motor_wake",
                    threshold: Threshold::with_hysteresis(
                        config.motor_wake_boundary_pct,
                        config.motor_wake_hysteresis_pct,
                    ),
                    wakes: Some(WakeTarget::Motor),
                })
                .map_err(|_| CAPACITY)?;
        }
        if with_indicators {
            light_thresholds
                .push(ThresholdSpec {
                    label: "light_led",
                    threshold: Threshold::new(config.light_led_on_above_pct),
                    wakes: None,
                })
                .map_err(|_| CAPACITY)?;
        }
        sensors
            .push(SensorSpec {
                observation: ObservationId::LightFraction,
                kind: SensorKind::Light,
                adc: pins::LIGHT_ADC,
                period_ms: config.light_period_ms,
                thresholds: light_thresholds,
                task: TaskParams::app("light", 4, 2),
            })
            .map_err(|_| CAPACITY)?;

        if with_indicators {
            actuators
                .push(ActuatorSpec {
                    kind: ActuatorKind::Indicators(IndicatorRule {
                        heartbeat_a: pins::HEARTBEAT_A_GPIO,
                        heartbeat_b: pins::HEARTBEAT_B_GPIO,
                        light_led: pins::LIGHT_LED_GPIO,
                        light_on_above_pct: config.light_led_on_above_pct,
                        period_ms: config.indicator_period_ms,
                    }),
                    task: TaskParams::app("indicators", 3, 3),
                })
                .map_err(|_| CAPACITY)?;
        }

        if with_motor {
            actuators
                .push(ActuatorSpec {
                    kind: ActuatorKind::Motor(MotorRule {
                        ia: pins::MOTOR_IA_GPIO,
                        ib: pins::MOTOR_IB_GPIO,
                        clockwise_above_pct: config.motor_clockwise_above_pct,
                        run_ms: config.motor_run_ms,
                    }),
                    task: TaskParams::app("motor", 4, 3),
                })
                .map_err(|_| CAPACITY)?;
        }

        if config.variant == Variant::Full {
            actuators
                .push(ActuatorSpec {
                    kind: ActuatorKind::HeatLamp(HeatLampRule {
                        pin: pins::HEAT_LAMP_GPIO,
                        outdoor_below_c: config.heat_lamp_outdoor_below_c,
                        indoor_max_c: config.heat_lamp_indoor_max_c,
                        period_ms: config.heat_lamp_period_ms,
                    }),
                    task: TaskParams::app("heat-lamp", 3, 2),
                })
                .map_err(|_| CAPACITY)?;
            actuators
                .push(ActuatorSpec {
                    kind: ActuatorKind::MotionAlarm(AlarmWiring {
                        trigger: pins::PIR_GPIO,
                        indicator_a: pins::ALARM_INDICATOR_A_GPIO,
                        indicator_b: pins::ALARM_INDICATOR_B_GPIO,
                        buzzer_1: pins::BUZZER_1_GPIO,
                        buzzer_2: pins::BUZZER_2_GPIO,
                        poll_ms: config.alarm_poll_ms,
                    }),
                    task: TaskParams::app("motion-alarm", 3, 4),
                })
                .map_err(|_| CAPACITY)?;
        }

        let graph = Self {
            variant: config.variant,
            sensors,
            actuators,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Structural checks: one owner per pin and per ADC channel, and a
    /// consumer for every wake target.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut outputs: std::vec::Vec<Gpio> = std::vec::Vec::new();
        for actuator in &self.actuators {
            for pin in actuator.output_pins() {
                if outputs.contains(&pin) {
                    return Err(ConfigError::ValidationFailed(
                        "output pin owned by more than one task",
                    ));
                }
                outputs.push(pin);
            }
        }

        let mut channels: std::vec::Vec<u32> = std::vec::Vec::new();
        for sensor in &self.sensors {
            if channels.contains(&sensor.adc.channel) {
                return Err(ConfigError::ValidationFailed(
                    "ADC channel sampled by more than one task",
                ));
            }
            channels.push(sensor.adc.channel);

            if self
                .sensors
                .iter()
                .filter(|s| s.observation == sensor.observation)
                .count()
                > 1
            {
                return Err(ConfigError::ValidationFailed(
                    "observation published by more than one task",
                ));
            }

            for t in &sensor.thresholds {
                if let Some(target) = t.wakes {
                    if !self.actuators.iter().any(|a| a.wake_target() == Some(target)) {
                        return Err(ConfigError::ValidationFailed(
                            "threshold wakes a task that is not in the graph",
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.sensors.len() + self.actuators.len()
    }
}

fn thermistor_spec(
    observation: ObservationId,
    adc: AdcChannel,
    config: &ControllerConfig,
    task: TaskParams,
) -> SensorSpec {
    SensorSpec {
        observation,
        kind: SensorKind::Thermistor,
        adc,
        period_ms: config.temperature_period_ms,
        thresholds: Vec::new(),
        task,
    }
}
