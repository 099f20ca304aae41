// Copyright 2026 Shinobu Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns raw pan samples into navigation events.

use tracing::{debug, trace, warn};

use crate::config::LayoutDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One raw sample from the host's pan recognizer.
///
/// `translation` is cumulative since the gesture began and `velocity` is
/// instantaneous, both horizontal and in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase:       GesturePhase,
    pub translation: f32,
    pub velocity:    f32,
}

impl GestureSample {
    pub const fn began(velocity: f32) -> Self {
        Self {
            phase: GesturePhase::Began,
            translation: 0.0,
            velocity,
        }
    }

    pub const fn changed(translation: f32, velocity: f32) -> Self {
        Self {
            phase: GesturePhase::Changed,
            translation,
            velocity,
        }
    }

    pub const fn ended(translation: f32, velocity: f32) -> Self {
        Self {
            phase: GesturePhase::Ended,
            translation,
            velocity,
        }
    }

    pub const fn cancelled(translation: f32) -> Self {
        Self {
            phase: GesturePhase::Cancelled,
            translation,
            velocity: 0.0,
        }
    }
}

/// Intent of a drag, independent of layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DragDirection {
    /// Towards revealing the menu
    Opening,
    /// Towards hiding it
    Closing,
}

impl DragDirection {
    /// Zero velocity counts as opening.
    pub fn from_velocity(velocity: f32) -> Self {
        if velocity >= 0.0 {
            Self::Opening
        } else {
            Self::Closing
        }
    }
}

/// Normalized event fed to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Begin { direction: DragDirection },
    /// Offset change since the previous event, positive towards opening
    Move { delta: f32 },
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracking {
    Idle,
    Forwarding,
    /// Rejected at begin; swallow everything until the gesture ends.
    Disabled,
}

#[derive(Debug)]
pub struct GestureInterpreter {
    sign:             f32,
    tracking:         Tracking,
    last_translation: f32,
}

impl GestureInterpreter {
    pub const fn new(layout: LayoutDirection) -> Self {
        Self {
            sign:             layout.sign(),
            tracking:         Tracking::Idle,
            last_translation: 0.0,
        }
    }

    /// Whether the current gesture was rejected and is being swallowed.
    pub fn is_disabled(&self) -> bool { self.tracking == Tracking::Disabled }

    pub fn is_tracking(&self) -> bool { self.tracking == Tracking::Forwarding }

    /// Abandons a forwarded drag whose gesture is starting over without an
    /// `Ended` or `Cancelled` sample. Returns the `Cancel` owed to the
    /// machine, or `None` when nothing was being forwarded.
    pub fn interrupt(&mut self) -> Option<GestureEvent> {
        if self.tracking != Tracking::Forwarding {
            return None;
        }
        warn!("gesture began again before ending, cancelling the drag");
        self.tracking = Tracking::Idle;
        self.last_translation = 0.0;
        Some(GestureEvent::Cancel)
    }

    /// Interprets one sample.
    ///
    /// On `Began`, `accept` is asked whether a drag in the detected direction
    /// may start. A refusal disables the interpreter until the gesture's
    /// `Ended` or `Cancelled` sample, and nothing is forwarded meanwhile.
    /// Call [`Self::interrupt`] before a `Began` that arrives mid-drag.
    /// Non-finite translations are dropped.
    pub fn interpret(
        &mut self,
        sample: GestureSample,
        accept: impl FnOnce(DragDirection) -> bool,
    ) -> Option<GestureEvent> {
        let translation = sample.translation * self.sign;
        match sample.phase {
            GesturePhase::Began => {
                if self.tracking != Tracking::Idle {
                    warn!(state = ?self.tracking, "gesture began without ending the previous one");
                }
                let direction = DragDirection::from_velocity(sample.velocity * self.sign);
                if accept(direction) {
                    self.tracking = Tracking::Forwarding;
                    self.last_translation = translation;
                    Some(GestureEvent::Begin { direction })
                } else {
                    debug!(%direction, "gesture rejected, recognizer disabled");
                    self.tracking = Tracking::Disabled;
                    None
                }
            }
            GesturePhase::Changed => {
                if self.tracking != Tracking::Forwarding {
                    return None;
                }
                if !translation.is_finite() {
                    warn!(translation = sample.translation, "non-finite translation dropped");
                    return None;
                }
                let delta = translation - self.last_translation;
                self.last_translation = translation;
                if delta == 0.0 {
                    return None;
                }
                trace!(delta, "gesture moved");
                Some(GestureEvent::Move { delta })
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                let was_forwarding = self.tracking == Tracking::Forwarding;
                self.tracking = Tracking::Idle;
                self.last_translation = 0.0;
                if !was_forwarding {
                    return None;
                }
                if sample.phase == GesturePhase::Ended {
                    Some(GestureEvent::End)
                } else {
                    Some(GestureEvent::Cancel)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(
        interpreter: &mut GestureInterpreter,
        samples: &[GestureSample],
        accept: bool,
    ) -> Vec<GestureEvent> {
        samples
            .iter()
            .filter_map(|sample| interpreter.interpret(*sample, |_| accept))
            .collect()
    }

    #[test]
    fn forwards_per_sample_deltas() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        let events = feed(
            &mut interpreter,
            &[
                GestureSample::began(120.0),
                GestureSample::changed(30.0, 120.0),
                GestureSample::changed(30.0, 0.0),
                GestureSample::changed(75.0, 90.0),
                GestureSample::ended(75.0, 10.0),
            ],
            true,
        );
        assert_eq!(
            events,
            vec![
                GestureEvent::Begin {
                    direction: DragDirection::Opening,
                },
                GestureEvent::Move { delta: 30.0 },
                GestureEvent::Move { delta: 45.0 },
                GestureEvent::End,
            ]
        );
        assert!(!interpreter.is_tracking());
    }

    #[test]
    fn zero_velocity_counts_as_opening() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        let mut seen = None;
        interpreter.interpret(GestureSample::began(0.0), |direction| {
            seen = Some(direction);
            true
        });
        assert_eq!(seen, Some(DragDirection::Opening));
    }

    #[test]
    fn rejected_gesture_stays_silent_until_it_ends() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        let events = feed(
            &mut interpreter,
            &[
                GestureSample::began(-200.0),
                GestureSample::changed(-40.0, -200.0),
                GestureSample::changed(-80.0, -200.0),
            ],
            false,
        );
        assert!(events.is_empty());
        assert!(interpreter.is_disabled());

        assert_eq!(interpreter.interpret(GestureSample::ended(-80.0, 0.0), |_| true), None);
        assert!(!interpreter.is_disabled());

        let next = interpreter.interpret(GestureSample::began(50.0), |_| true);
        assert!(matches!(next, Some(GestureEvent::Begin { .. })));
    }

    #[test]
    fn right_to_left_layout_mirrors_direction() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::RightToLeft);
        let events = feed(
            &mut interpreter,
            &[
                GestureSample::began(-150.0),
                GestureSample::changed(-60.0, -150.0),
                GestureSample::cancelled(-60.0),
            ],
            true,
        );
        assert_eq!(
            events,
            vec![
                GestureEvent::Begin {
                    direction: DragDirection::Opening,
                },
                GestureEvent::Move { delta: 60.0 },
                GestureEvent::Cancel,
            ]
        );
    }

    #[test]
    fn samples_without_begin_are_dropped() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        assert_eq!(interpreter.interpret(GestureSample::changed(10.0, 5.0), |_| true), None);
        assert_eq!(interpreter.interpret(GestureSample::ended(10.0, 5.0), |_| true), None);
    }

    #[test]
    fn non_finite_translations_are_dropped() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        let events = feed(
            &mut interpreter,
            &[
                GestureSample::began(100.0),
                GestureSample::changed(40.0, 100.0),
                GestureSample::changed(f32::NAN, 100.0),
                GestureSample::changed(f32::INFINITY, 100.0),
                GestureSample::changed(70.0, 100.0),
            ],
            true,
        );
        assert_eq!(
            events,
            vec![
                GestureEvent::Begin {
                    direction: DragDirection::Opening,
                },
                GestureEvent::Move { delta: 40.0 },
                GestureEvent::Move { delta: 30.0 },
            ]
        );
    }

    #[test]
    fn interrupt_cancels_only_a_forwarded_drag() {
        let mut interpreter = GestureInterpreter::new(LayoutDirection::LeftToRight);
        assert_eq!(interpreter.interrupt(), None);

        feed(
            &mut interpreter,
            &[GestureSample::began(100.0), GestureSample::changed(50.0, 100.0)],
            true,
        );
        assert_eq!(interpreter.interrupt(), Some(GestureEvent::Cancel));
        assert!(!interpreter.is_tracking());
        assert_eq!(interpreter.interrupt(), None);

        interpreter.interpret(GestureSample::began(100.0), |_| false);
        assert!(interpreter.is_disabled());
        assert_eq!(interpreter.interrupt(), None);
    }
}
