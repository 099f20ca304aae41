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

//! Spring animation of the menu offset.
//!
//! The animator is frame driven: the host calls [`TransitionAnimator::tick`]
//! from its event loop and applies the returned value. The completion value
//! handed to [`TransitionAnimator::animate`] comes back exactly once, from
//! the tick that settles the curve, so completions always run on the loop
//! that ticks the animator.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::SpringConfig;

/// Envelope amplitude remaining when the duration runs out.
const ENVELOPE_FLOOR: f32 = 1e-3;

/// Damping ratios this close to 1 use the critically damped solution.
const CRITICAL_EPSILON: f32 = 1e-4;

/// Identifies one call to [`TransitionAnimator::animate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationToken(u64);

/// Unit step response of a damped harmonic oscillator released at rest.
///
/// The natural frequency is chosen so the slowest decaying mode falls to
/// [`ENVELOPE_FLOOR`] at `duration`; past that point the curve reports 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCurve {
    duration:      f32,
    damping_ratio: f32,
    omega:         f32,
    tolerance:     f32,
}

impl SpringCurve {
    pub fn new(config: &SpringConfig) -> Self {
        let duration = config.duration().as_secs_f32();
        let zeta = config.damping_ratio;
        let decay = if zeta > 1.0 + CRITICAL_EPSILON {
            zeta - zeta.mul_add(zeta, -1.0).sqrt()
        } else {
            zeta
        };
        Self {
            duration,
            damping_ratio: zeta,
            omega: -ENVELOPE_FLOOR.ln() / (decay * duration),
            tolerance: config.settle_tolerance,
        }
    }

    pub const fn duration(&self) -> f32 { self.duration }

    pub const fn omega(&self) -> f32 { self.omega }

    /// Fraction of the distance covered after `t` seconds.
    pub fn progress(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= self.duration {
            return 1.0;
        }
        let (z, w) = (self.damping_ratio, self.omega);
        if (z - 1.0).abs() < CRITICAL_EPSILON {
            1.0 - (-w * t).exp() * w.mul_add(t, 1.0)
        } else if z < 1.0 {
            let root = z.mul_add(-z, 1.0).sqrt();
            let wd = w * root;
            1.0 - (-z * w * t).exp() * (z / root).mul_add((wd * t).sin(), (wd * t).cos())
        } else {
            let root = z.mul_add(z, -1.0).sqrt();
            let r1 = -w * (z - root);
            let r2 = -w * (z + root);
            1.0 + r2.mul_add((r1 * t).exp(), -r1 * (r2 * t).exp()) / (r1 - r2)
        }
    }

    /// Rate of change of [`Self::progress`], per second.
    pub fn velocity(&self, t: f32) -> f32 {
        if t <= 0.0 || t >= self.duration {
            return 0.0;
        }
        let (z, w) = (self.damping_ratio, self.omega);
        if (z - 1.0).abs() < CRITICAL_EPSILON {
            w * w * t * (-w * t).exp()
        } else if z < 1.0 {
            let root = z.mul_add(-z, 1.0).sqrt();
            (-z * w * t).exp() * (w / root) * (w * root * t).sin()
        } else {
            let root = z.mul_add(z, -1.0).sqrt();
            let r1 = -w * (z - root);
            let r2 = -w * (z + root);
            r1 * r2 * ((r1 * t).exp() - (r2 * t).exp()) / (r1 - r2)
        }
    }

    /// Whether a flight covering `distance` has converged after `t` seconds.
    fn settled(&self, distance: f32, t: f32) -> bool {
        if t >= self.duration {
            return true;
        }
        let remaining = (distance * (1.0 - self.progress(t))).abs();
        let speed = (distance * self.velocity(t)).abs();
        remaining <= self.tolerance && speed <= self.tolerance * self.omega
    }
}

struct Flight<C> {
    token:      AnimationToken,
    from:       f32,
    to:         f32,
    elapsed:    f32,
    completion: C,
}

/// Output of one animation frame.
#[derive(Debug, PartialEq)]
pub struct Frame<C> {
    pub token:      AnimationToken,
    pub value:      f32,
    /// Present only on the frame that settles the animation.
    pub completion: Option<C>,
}

/// Runs at most one spring animation at a time.
pub struct TransitionAnimator<C> {
    curve:      SpringCurve,
    flight:     Option<Flight<C>>,
    next_token: u64,
}

impl<C> TransitionAnimator<C> {
    pub fn new(config: &SpringConfig) -> Self {
        Self {
            curve:      SpringCurve::new(config),
            flight:     None,
            next_token: 0,
        }
    }

    pub const fn curve(&self) -> &SpringCurve { &self.curve }

    /// Starts animating from `from` to `to`.
    ///
    /// An animation still in flight is cancelled first and its completion is
    /// dropped undelivered. Equal endpoints still settle, on the next tick.
    pub fn animate(&mut self, from: f32, to: f32, completion: C) -> AnimationToken {
        if let Some(token) = self.cancel() {
            debug!(?token, "superseded running animation");
        }
        let token = AnimationToken(self.next_token);
        self.next_token += 1;
        debug!(?token, from, to, "animation started");
        self.flight = Some(Flight {
            token,
            from,
            to,
            elapsed: 0.0,
            completion,
        });
        token
    }

    /// Drops the running animation without delivering its completion.
    pub fn cancel(&mut self) -> Option<AnimationToken> {
        self.flight.take().map(|flight| flight.token)
    }

    pub const fn is_running(&self) -> bool { self.flight.is_some() }

    /// Whether `token` names the animation currently in flight.
    pub fn is_current(&self, token: AnimationToken) -> bool {
        self.flight.as_ref().is_some_and(|flight| flight.token == token)
    }

    pub fn target(&self) -> Option<f32> { self.flight.as_ref().map(|flight| flight.to) }

    /// Advances the running animation by `dt`. Returns `None` when idle.
    pub fn tick(&mut self, dt: Duration) -> Option<Frame<C>> {
        let flight = self.flight.as_mut()?;
        flight.elapsed += dt.as_secs_f32();
        let distance = flight.to - flight.from;
        if !self.curve.settled(distance, flight.elapsed) {
            let value = distance.mul_add(self.curve.progress(flight.elapsed), flight.from);
            trace!(token = ?flight.token, value, "animation frame");
            return Some(Frame {
                token: flight.token,
                value,
                completion: None,
            });
        }

        let flight = self.flight.take()?;
        debug!(token = ?flight.token, to = flight.to, "animation settled");
        Some(Frame {
            token:      flight.token,
            value:      flight.to,
            completion: Some(flight.completion),
        })
    }
}
