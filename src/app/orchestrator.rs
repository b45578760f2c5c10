//! Turns a [`TaskGraph`] into running tasks.
//!
//! Startup order:
//!
//! 1. configure every ADC channel, digital input and output the graph
//!    names; any failure aborts before a single task exists
//! 2. drive every output LOW
//! 3. spawn one pinned task per graph entry, each with its own clone of
//!    the board and sink and a handle to the shared store
//! 4. open the [`StartGate`]; no task body runs before this
//!
//! If any spawn fails the gate opens as aborted: every task already
//! created returns without touching a pin and is joined before the error
//! is returned.
//!
//! Nothing here runs after startup. The tasks talk to each other only
//! through the [`ObservationStore`] and the [`WakeSignals`].

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use embedded_hal::digital::PinState;
use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::graph::{
    ActuatorKind, ActuatorSpec, SensorSpec, TaskGraph, TaskParams, WakeSignals, WakeTarget,
};
use crate::app::ports::{Board, EventSink};
use crate::drivers::task_pin::spawn_on_core;
use crate::error::{Error, Result};
use crate::store::ObservationStore;
use crate::tasks::alarm::AlarmTask;
use crate::tasks::level::{HeatLampTask, IndicatorTask};
use crate::tasks::motor::MotorTask;
use crate::tasks::sampling::SamplingTask;

/// Handles to a running graph.
pub struct RunningGraph {
    pub handles: Vec<JoinHandle<()>>,
    pub store: Arc<ObservationStore>,
    pub wakes: WakeSignals,
}

/// Task body as handed to the spawner.
pub type TaskBody = Box<dyn FnOnce() + Send + 'static>;

/// One-shot release for every spawned task. Tasks block in [`wait`]
/// until the orchestrator either starts or aborts the graph.
///
/// [`wait`]: StartGate::wait
#[derive(Default)]
pub struct StartGate {
    decision: Mutex<Option<bool>>,
    opened: Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every waiter. `go == false` tells them to exit.
    pub fn open(&self, go: bool) {
        let mut decision = self.decision.lock().unwrap_or_else(|p| p.into_inner());
        if decision.is_none() {
            *decision = Some(go);
        }
        self.opened.notify_all();
    }

    /// Block until the gate opens. Returns `true` if the task may run.
    pub fn wait(&self) -> bool {
        let mut decision = self.decision.lock().unwrap_or_else(|p| p.into_inner());
        loop {
            if let Some(go) = *decision {
                return go;
            }
            decision = self
                .opened
                .wait(decision)
                .unwrap_or_else(|p| p.into_inner());
        }
    }
}

/// Configure every peripheral the graph uses and leave all outputs LOW.
pub fn configure_board<B: Board>(graph: &TaskGraph, board: &mut B) -> Result<()> {
    for sensor in &graph.sensors {
        board.configure_analog(sensor.adc).map_err(|e| {
            error!("{}: ADC setup failed: {}", sensor.task.name, e);
            Error::from(e)
        })?;
    }
    for actuator in &graph.actuators {
        if let Some(pin) = actuator.input_pin() {
            board.configure_input(pin).map_err(|e| {
                error!("{}: input setup failed: {}", actuator.task.name, e);
                Error::from(e)
            })?;
        }
        for pin in actuator.output_pins() {
            board.configure_output(pin).map_err(|e| {
                error!("{}: output setup failed: {}", actuator.task.name, e);
                Error::from(e)
            })?;
            board.write_digital(pin, PinState::Low);
        }
    }
    Ok(())
}

/// Configure the board, then spawn every task in `graph` on its core.
pub fn spawn_graph<B, E>(graph: &TaskGraph, board: B, sink: E) -> Result<RunningGraph>
where
    B: Board,
    E: EventSink + Clone + Send + 'static,
{
    spawn_graph_with(graph, board, sink, |t, body| {
        spawn_on_core(t.core, t.priority, t.stack_kb, t.name, body)
    })
}

/// [`spawn_graph`] with the thread factory supplied by the caller.
pub fn spawn_graph_with<B, E, S>(
    graph: &TaskGraph,
    mut board: B,
    mut sink: E,
    mut spawn: S,
) -> Result<RunningGraph>
where
    B: Board,
    E: EventSink + Clone + Send + 'static,
    S: FnMut(TaskParams, TaskBody) -> Result<JoinHandle<()>>,
{
    graph.validate()?;
    configure_board(graph, &mut board)?;

    let store = Arc::new(ObservationStore::new());
    let wakes = WakeSignals::new();
    let gate = Arc::new(StartGate::new());
    let mut handles = Vec::with_capacity(graph.task_count());
    let mut names = Vec::with_capacity(graph.task_count());

    // Producers first: once the gate opens the sampling tasks are the
    // first to be scheduled on an idle core.
    let sensors = graph.sensors.iter().map(|spec| {
        let body = sensor_body(spec, board.clone(), sink.clone(), &store, &wakes);
        (spec.task, body)
    });
    let actuators = graph.actuators.iter().map(|spec| {
        let body = actuator_body(spec, board.clone(), sink.clone(), &store, &wakes);
        (spec.task, body)
    });

    for (params, body) in sensors.chain(actuators) {
        let gate_for_task = Arc::clone(&gate);
        let gated: TaskBody = Box::new(move || {
            if gate_for_task.wait() {
                body();
            }
        });
        match spawn(params, gated) {
            Ok(handle) => {
                handles.push(handle);
                names.push(params.name);
            }
            Err(e) => {
                error!("{}: spawn failed, aborting {} created tasks", params.name, handles.len());
                gate.open(false);
                for handle in handles {
                    if handle.join().is_err() {
                        warn!("aborted task panicked while exiting");
                    }
                }
                return Err(e);
            }
        }
    }

    gate.open(true);
    for name in names {
        sink.emit(&AppEvent::TaskStarted { name });
    }

    info!("{:?} graph running: {} tasks", graph.variant, handles.len());
    Ok(RunningGraph {
        handles,
        store,
        wakes,
    })
}

fn sensor_body<B, E>(
    spec: &SensorSpec,
    board: B,
    sink: E,
    store: &Arc<ObservationStore>,
    wakes: &WakeSignals,
) -> TaskBody
where
    B: Board,
    E: EventSink + Send + 'static,
{
    let task = SamplingTask::new(spec.clone(), board, sink, Arc::clone(store), wakes.clone());
    Box::new(move || task.run())
}

fn actuator_body<B, E>(
    spec: &ActuatorSpec,
    board: B,
    sink: E,
    store: &Arc<ObservationStore>,
    wakes: &WakeSignals,
) -> TaskBody
where
    B: Board,
    E: EventSink + Send + 'static,
{
    let store = Arc::clone(store);
    match spec.kind {
        ActuatorKind::Indicators(rule) => {
            let task = IndicatorTask::new(rule, board, sink, store);
            Box::new(move || task.run())
        }
        ActuatorKind::HeatLamp(rule) => {
            let task = HeatLampTask::new(rule, board, sink, store);
            Box::new(move || task.run())
        }
        ActuatorKind::Motor(rule) => {
            let wake = Arc::clone(wakes.get(WakeTarget::Motor));
            let task = MotorTask::new(rule, board, sink, store, wake);
            Box::new(move || task.run())
        }
        ActuatorKind::MotionAlarm(wiring) => {
            let task = AlarmTask::new(wiring, board, sink);
            Box::new(move || task.run())
        }
    }
}
