//! Motion alarm task: polls the PIR line at phase boundaries and plays
//! the [`AlarmSequencer`] pattern on its output group.

use crate::alarm::{AlarmPattern, AlarmPhase, AlarmSequencer};
use crate::app::events::AppEvent;
use crate::app::ports::{Board, EventSink};
use crate::drivers::alarm::AlarmOutputs;
use crate::pins::Gpio;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmWiring {
    /// PIR output, active high.
    pub trigger: Gpio,
    pub indicator_a: Gpio,
    pub indicator_b: Gpio,
    pub buzzer_1: Gpio,
    pub buzzer_2: Gpio,
    pub poll_ms: u32,
}

pub struct AlarmTask<B, E> {
    trigger: Gpio,
    sequencer: AlarmSequencer,
    outputs: AlarmOutputs,
    board: B,
    sink: E,
}

impl<B: Board, E: EventSink> AlarmTask<B, E> {
    pub fn new(wiring: AlarmWiring, board: B, sink: E) -> Self {
        Self {
            trigger: wiring.trigger,
            sequencer: AlarmSequencer::new(wiring.poll_ms),
            outputs: AlarmOutputs::new(
                wiring.indicator_a,
                wiring.indicator_b,
                wiring.buzzer_1,
                wiring.buzzer_2,
            ),
            board,
            sink,
        }
    }

    /// Take one boundary decision, apply the phase pattern and sleep out
    /// the phase. Returns the phase that was played.
    pub fn step(&mut self) -> AlarmPhase {
        let active = self.board.read_digital(self.trigger);
        let before = self.sequencer.phase();
        let phase = self.sequencer.advance(active, self.board.uptime_ms());

        self.outputs.apply(&mut self.board, phase.pattern());
        if phase != before {
            self.sink.emit(&AppEvent::AlarmPhase(phase));
        }

        let left = self.sequencer.remaining_ms(self.board.uptime_ms());
        self.board.sleep_ms(left);
        phase
    }

    pub fn sequencer(&self) -> &AlarmSequencer {
        &self.sequencer
    }

    /// What the output group is currently showing.
    pub fn pattern(&self) -> AlarmPattern {
        self.outputs.pattern()
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }
}
