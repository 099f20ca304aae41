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

//! Headless replay of a scripted session against the container.
//!
//! A script is a TOML list of `[[step]]` tables, each with an `at_ms`
//! timestamp and an `action`:
//!
//! ```toml
//! [[step]]
//! at_ms = 0
//! action = "drag"
//! velocity = 320.0
//! translations = [80.0, 160.0, 240.0]
//!
//! [[step]]
//! at_ms = 900
//! action = "select"
//! destination = "settings"
//! ```
//!
//! A drag expands into one pan sample per frame, starting at its step.

use std::{collections::VecDeque, fmt, path::Path, time::Duration};

use serde::Deserialize;
use shinobu_error::ErrorExt;
use shinobu_nav::{
    AllDestinations, ContainerConfig, ContentScreen, DestinationKind, GestureSample, Handled,
    HeadlessProvider, HeadlessScreen, HostWindow, MenuPhase, NavigationContainer, ScreenStatus,
};
use snafu::{ResultExt, Whatever, whatever};
use tracing::{debug, error, info, warn};

/// Frames allowed after the last step for the container to settle.
const SETTLE_GRACE_SECS: u64 = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Delay before a loading screen's data arrives.
    pub fetch_delay_ms: u64,
    #[serde(rename = "step")]
    pub steps:          Vec<Step>,
}

impl Script {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Whatever> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_whatever_context(|_| format!("failed to read script {}", path.display()))?;
        toml::from_str(&text)
            .with_whatever_context(|_| format!("failed to parse script {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub at_ms:  u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// A pan through cumulative `translations` released (or cancelled) on
    /// the frame after the last sample.
    Drag {
        velocity:     f32,
        translations: Vec<f32>,
        #[serde(default)]
        cancel:       bool,
    },
    Select {
        destination: String,
    },
    /// Tap on a menu row.
    Pick {
        row: usize,
    },
    Toggle,
    Open,
    Close,
    ShowRemoteSelector,
    /// Pushes a detail page on the active screen, vetoing menu drags.
    PushDetail,
    PopDetail,
}

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Gesture(GestureSample),
    Action(Action),
}

/// Expands `steps` into per-frame inputs ordered by frame.
fn timeline(steps: Vec<Step>, fps: u32) -> VecDeque<(u64, Input)> {
    let mut inputs = Vec::new();
    for step in steps {
        let frame = step.at_ms * u64::from(fps) / 1000;
        match step.action {
            Action::Drag {
                velocity,
                translations,
                cancel,
            } => {
                inputs.push((frame, Input::Gesture(GestureSample::began(velocity))));
                let mut next = frame;
                for translation in &translations {
                    next += 1;
                    inputs.push((
                        next,
                        Input::Gesture(GestureSample::changed(*translation, velocity)),
                    ));
                }
                let last = translations.last().copied().unwrap_or_default();
                let release = if cancel {
                    GestureSample::cancelled(last)
                } else {
                    GestureSample::ended(last, velocity)
                };
                inputs.push((next + 1, Input::Gesture(release)));
            }
            action => inputs.push((frame, Input::Action(action))),
        }
    }
    inputs.sort_by_key(|(frame, _)| *frame);
    inputs.into()
}

/// State reported once the replay finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub frames:      u64,
    pub phase:       MenuPhase,
    pub destination: DestinationKind,
    pub offset:      f32,
    pub screens:     Vec<(DestinationKind, ScreenStatus)>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames:      {}", self.frames)?;
        writeln!(f, "menu phase:  {}", self.phase)?;
        writeln!(f, "menu offset: {:.1}", self.offset)?;
        writeln!(f, "destination: {}", self.destination)?;
        write!(f, "screens:    ")?;
        for (kind, status) in &self.screens {
            write!(f, " {kind}={status}")?;
        }
        Ok(())
    }
}

pub struct Replayer {
    host:       HostWindow,
    container:  NavigationContainer,
    inputs:     VecDeque<(u64, Input)>,
    frame:      Duration,
    last_frame: u64,
    phase:      MenuPhase,
}

impl Replayer {
    /// Mounts a container whose library and remote selector screens load
    /// their data on spawned tasks. Must be called within a tokio runtime.
    pub fn new(config: &ContainerConfig, script: Script, fps: u32) -> Result<Self, Whatever> {
        if fps == 0 {
            whatever!("fps must be positive");
        }
        let fetch_delay = Duration::from_millis(script.fetch_delay_ms);
        let provider = HeadlessProvider::new().with_fetcher(
            [DestinationKind::Library, DestinationKind::RemoteSelector],
            move |kind, main_loop| {
                let main_loop = main_loop.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(fetch_delay).await;
                    if !main_loop.screen_ready(kind) {
                        debug!(destination = %kind, "container gone before data arrived");
                    }
                });
            },
        );

        let mut host = HostWindow::new();
        let container = NavigationContainer::new(
            config,
            Box::new(provider),
            Box::new(AllDestinations),
            &mut host,
        )
        .inspect_err(|err| report("mounting the container", err))
        .whatever_context("failed to mount the navigation container")?;

        let inputs = timeline(script.steps, fps);
        let last_frame = inputs.back().map_or(0, |(frame, _)| *frame);
        Ok(Self {
            host,
            phase: container.menu_phase(),
            container,
            inputs,
            frame: Duration::from_secs(1) / fps,
            last_frame: last_frame + SETTLE_GRACE_SECS * u64::from(fps),
        })
    }

    /// Drives the container at the frame rate until every input is applied
    /// and the menu is settled.
    pub async fn run(mut self) -> Result<Summary, Whatever> {
        let mut interval = tokio::time::interval(self.frame);
        let mut frame = 0_u64;
        loop {
            interval.tick().await;
            while self.inputs.front().is_some_and(|(due, _)| *due <= frame) {
                if let Some((_, input)) = self.inputs.pop_front() {
                    self.apply(input)?;
                }
            }
            self.container.tick(self.frame);
            self.observe_phase(frame);

            if self.inputs.is_empty() && self.container.is_settled() {
                break;
            }
            if frame >= self.last_frame {
                warn!(frame, "replay stopped before the menu settled");
                break;
            }
            frame += 1;
        }

        // Let pending fetches land before reporting statuses.
        tokio::task::yield_now().await;
        self.container.tick(Duration::ZERO);

        let summary = self.summary(frame);
        self.container
            .tear_down(&mut self.host)
            .inspect_err(|err| report("tearing down the container", err))
            .whatever_context("failed to unmount the navigation container")?;
        Ok(summary)
    }

    fn apply(&mut self, input: Input) -> Result<(), Whatever> {
        let handled = match input {
            Input::Gesture(sample) => self.container.handle_gesture(sample),
            Input::Action(action) => match action {
                Action::Select { destination } => self
                    .container
                    .select_destination_named(&destination)
                    .inspect_err(|err| report("selecting a destination", err))
                    .with_whatever_context(|_| format!("cannot select `{destination}`"))?,
                Action::Pick { row } => self.container.pick_menu_row(row),
                Action::Toggle => self.container.toggle_menu(),
                Action::Open => self.container.open_menu(),
                Action::Close => self.container.close_menu(),
                Action::ShowRemoteSelector => self.container.show_remote_selector(),
                Action::PushDetail => self.detail(true),
                Action::PopDetail => self.detail(false),
                Action::Drag { .. } => Handled::Ignored,
            },
        };
        if handled == Handled::Ignored {
            debug!("input had no effect");
        }
        Ok(())
    }

    fn detail(&mut self, push: bool) -> Handled {
        let kind = self.container.active_destination();
        let Some(screen) = self
            .container
            .registry_mut()
            .downcast_mut::<HeadlessScreen>(kind)
        else {
            return Handled::Ignored;
        };
        if push {
            screen.push_detail();
        } else {
            screen.pop_detail();
        }
        info!(destination = %kind, depth = screen.detail_depth(), "detail stack changed");
        Handled::Applied
    }

    fn observe_phase(&mut self, frame: u64) {
        let phase = self.container.menu_phase();
        if phase != self.phase {
            let offset = self.container.state().menu_offset;
            info!(frame, from = %self.phase, to = %phase, offset, "phase");
            self.phase = phase;
        }
    }

    fn summary(&self, frames: u64) -> Summary {
        let registry = self.container.registry();
        let screens = DestinationKind::ALL
            .into_iter()
            .filter_map(|kind| registry.get(kind).map(|screen| (kind, screen.status())))
            .collect();
        let state = self.container.state();
        Summary {
            frames,
            phase: state.menu_phase,
            destination: state.active_destination,
            offset: state.menu_offset,
            screens,
        }
    }
}

/// Logs `err`, with its stack when the code is fatal.
fn report<E: ErrorExt>(doing: &str, err: &E) {
    let code = err.status_code();
    if code.is_fatal() {
        error!(%code, trace = ?err.stack_trace(), "fatal error while {doing}");
    } else {
        warn!(%code, "error while {doing}: {}", err.output_msg());
    }
}
