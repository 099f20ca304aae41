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

//! The navigation container: the single entry point a host talks to.

use std::time::Duration;

use snafu::ensure;
use tracing::{debug, info};

use crate::{
    config::ContainerConfig,
    destination::{ContentScreen, ContentScreenProvider, DestinationKind, DestinationRegistry},
    err::{HostOccupiedSnafu, NotMountedSnafu, Result},
    gesture::{GestureInterpreter, GesturePhase, GestureSample},
    machine::{Handled, MenuPhase, NavEvent, NavigationMachine, NavigationState},
    main_loop::{self, LoopMessage, MainLoopHandle, Mailbox},
    menu::{MenuEntryDelegate, MenuOverlay},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Orientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

/// Orientations the container supports; it never rotates to landscape.
pub const SUPPORTED_ORIENTATIONS: [Orientation; 2] =
    [Orientation::Portrait, Orientation::PortraitUpsideDown];

/// The host view hierarchy. It holds at most one container.
#[derive(Debug, Default)]
pub struct HostWindow {
    mounted: Option<usize>,
}

impl HostWindow {
    pub const fn new() -> Self { Self { mounted: None } }

    /// Index the mounted container was inserted at.
    pub const fn mounted_index(&self) -> Option<usize> { self.mounted }

    fn mount(&mut self, index: usize) -> Result<()> {
        ensure!(
            self.mounted.is_none(),
            HostOccupiedSnafu {
                index: self.mounted.unwrap_or(index),
            }
        );
        self.mounted = Some(index);
        Ok(())
    }

    fn unmount(&mut self, index: usize) -> Result<()> {
        ensure!(self.mounted == Some(index), NotMountedSnafu { index });
        self.mounted = None;
        Ok(())
    }
}

pub struct NavigationContainer {
    machine:        NavigationMachine,
    interpreter:    GestureInterpreter,
    mailbox:        Mailbox,
    main_loop:      MainLoopHandle,
    shadow_opacity: f32,
    host_index:     usize,
}

impl NavigationContainer {
    /// Validates `config` and mounts a new container into `host`.
    ///
    /// Mounting into a host that already holds a container fails with
    /// `HostOccupied`; callers must treat that as fatal.
    pub fn new(
        config: &ContainerConfig,
        provider: Box<dyn ContentScreenProvider>,
        menu_entries: Box<dyn MenuEntryDelegate>,
        host: &mut HostWindow,
    ) -> Result<Self> {
        config.validate()?;
        host.mount(config.host_index)?;

        let (main_loop, mailbox) = main_loop::channel();
        let registry = DestinationRegistry::new(provider, main_loop.clone());
        let machine = NavigationMachine::new(config, registry, menu_entries);
        info!(
            width = config.width,
            max_offset = config.max_offset(),
            host_index = config.host_index,
            "navigation container mounted"
        );
        Ok(Self {
            machine,
            interpreter: GestureInterpreter::new(config.layout_direction),
            mailbox,
            main_loop,
            shadow_opacity: config.shadow_opacity,
            host_index: config.host_index,
        })
    }

    /// Unmounts the container, dropping every screen it built.
    ///
    /// Fails with `NotMounted`, leaving `host` untouched, when the container
    /// was not mounted into `host`. The screens are dropped either way.
    pub fn tear_down(self, host: &mut HostWindow) -> Result<()> {
        host.unmount(self.host_index)?;
        info!(index = self.host_index, "navigation container torn down");
        Ok(())
    }

    pub const fn state(&self) -> &NavigationState { self.machine.state() }

    pub const fn menu_phase(&self) -> MenuPhase { self.machine.menu_phase() }

    pub const fn active_destination(&self) -> DestinationKind { self.machine.active_destination() }

    pub const fn machine(&self) -> &NavigationMachine { &self.machine }

    pub const fn registry(&self) -> &DestinationRegistry { self.machine.registry() }

    pub const fn registry_mut(&mut self) -> &mut DestinationRegistry {
        self.machine.registry_mut()
    }

    pub const fn menu_overlay(&self) -> Option<&MenuOverlay> { self.machine.overlay() }

    /// Sender for screens whose fetches complete off the main loop.
    pub fn main_loop(&self) -> MainLoopHandle { self.main_loop.clone() }

    pub const fn supported_orientations(&self) -> &'static [Orientation] {
        &SUPPORTED_ORIENTATIONS
    }

    pub fn is_menu_visible(&self) -> bool { self.machine.is_menu_visible() }

    /// No drag in progress and no animation running.
    pub const fn is_settled(&self) -> bool {
        !self.machine.is_dragging() && !self.machine.is_animating()
    }

    /// Opacity of the shadow the content view casts over the menu.
    pub fn content_shadow_opacity(&self) -> f32 {
        if self.machine.is_menu_visible() || self.machine.is_dragging() {
            self.shadow_opacity
        } else {
            0.0
        }
    }

    /// Feeds one pan sample through the gesture interpreter.
    ///
    /// A `Began` in the middle of a forwarded drag cancels that drag first,
    /// so the new gesture is judged against a machine that is not dragging.
    pub fn handle_gesture(&mut self, sample: GestureSample) -> Handled {
        if sample.phase == GesturePhase::Began {
            if let Some(cancel) = self.interpreter.interrupt() {
                self.machine.handle(cancel.into());
            }
        }
        let machine = &self.machine;
        let event = self.interpreter.interpret(sample, |direction| {
            if !machine.accepts_drag(direction) {
                return false;
            }
            let allowed = machine
                .active_screen()
                .is_none_or(|screen| screen.accepts_menu_gesture());
            if !allowed {
                debug!(destination = %machine.active_destination(), "active screen vetoed menu drag");
            }
            allowed
        });
        match event {
            Some(event) => self.machine.handle(event.into()),
            None => Handled::Ignored,
        }
    }

    /// Runs one frame: applies posted completions, then advances animation.
    pub fn tick(&mut self, dt: Duration) {
        for message in self.mailbox.drain() {
            match message {
                LoopMessage::ScreenReady(kind) => match self.machine.registry_mut().get_mut(kind) {
                    Some(screen) => {
                        screen.data_ready();
                        debug!(destination = %kind, "screen data ready");
                    }
                    None => debug!(destination = %kind, "data ready for a screen never built"),
                },
            }
        }
        self.machine.advance(dt);
    }

    pub fn select_destination(&mut self, kind: DestinationKind) -> Handled {
        self.machine.handle(NavEvent::Select(kind))
    }

    /// Selects a destination by its snake_case name.
    pub fn select_destination_named(&mut self, name: &str) -> Result<Handled> {
        let kind = DestinationKind::parse(name)?;
        Ok(self.select_destination(kind))
    }

    /// A tap on the menu entry for `kind`. Ignored when the menu is not
    /// built or does not list `kind`.
    pub fn pick_menu_entry(&mut self, kind: DestinationKind) -> Handled {
        let event = self.machine.overlay().and_then(|overlay| overlay.pick(kind));
        event.map_or(Handled::Ignored, |event| self.machine.handle(event.into()))
    }

    /// A tap on the menu row at `row`.
    pub fn pick_menu_row(&mut self, row: usize) -> Handled {
        let event = self.machine.overlay().and_then(|overlay| overlay.pick_row(row));
        event.map_or(Handled::Ignored, |event| self.machine.handle(event.into()))
    }

    pub fn toggle_menu(&mut self) -> Handled { self.machine.toggle() }

    pub fn open_menu(&mut self) -> Handled { self.machine.handle(NavEvent::OpenRequested) }

    pub fn close_menu(&mut self) -> Handled { self.machine.handle(NavEvent::CloseRequested) }

    /// Jumps to the remote selector, closing the menu if it is open. Used
    /// when no daemon is configured yet.
    pub fn show_remote_selector(&mut self) -> Handled {
        if self.machine.active_destination() == DestinationKind::RemoteSelector {
            return Handled::Ignored;
        }
        self.select_destination(DestinationKind::RemoteSelector)
    }
}
