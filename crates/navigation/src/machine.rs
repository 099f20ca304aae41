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

//! The navigation state machine.
//!
//! Two orthogonal axes: which destination is on screen, and where the menu
//! is in its lifecycle. Every input is a [`NavEvent`]; gesture events,
//! explicit open/close requests and menu picks all go through
//! [`NavigationMachine::handle`], and animation progress through
//! [`NavigationMachine::advance`].
//!
//! Invariants, holding after every call:
//! - `Closed` implies offset 0 and no overlay
//! - `Open` implies offset `max_offset`
//! - only `Opening` and `Closing` have a drag or animation moving the offset
//!
//! Drags never interrupt a running animation; they are rejected until it
//! settles.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    animator::TransitionAnimator,
    config::ContainerConfig,
    destination::{ContentScreen, DestinationKind, DestinationRegistry},
    gesture::{DragDirection, GestureEvent},
    menu::{MenuEntryDelegate, MenuEvent, MenuOverlay},
};

/// Lifecycle phase of the slide-out menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum MenuPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Single source of truth for what the container shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    pub active_destination: DestinationKind,
    pub menu_phase:         MenuPhase,
    /// Horizontal displacement of the content view, in `[0, max_offset]`
    pub menu_offset:        f32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            active_destination: DestinationKind::Library,
            menu_phase:         MenuPhase::Closed,
            menu_offset:        0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    DragBegan(DragDirection),
    DragMoved(f32),
    DragEnded,
    DragCancelled,
    OpenRequested,
    CloseRequested,
    Select(DestinationKind),
}

impl From<GestureEvent> for NavEvent {
    fn from(event: GestureEvent) -> Self {
        match event {
            GestureEvent::Begin { direction } => Self::DragBegan(direction),
            GestureEvent::Move { delta } => Self::DragMoved(delta),
            GestureEvent::End => Self::DragEnded,
            GestureEvent::Cancel => Self::DragCancelled,
        }
    }
}

impl From<MenuEvent> for NavEvent {
    fn from(event: MenuEvent) -> Self {
        match event {
            MenuEvent::DestinationPicked(kind) => Self::Select(kind),
        }
    }
}

/// Result of feeding one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Applied,
    /// The event did not apply in the current state and changed nothing.
    Ignored,
}

/// Where a settling animation leaves the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    Open,
    Closed,
}

pub struct NavigationMachine {
    state:        NavigationState,
    width:        f32,
    height:       f32,
    max_offset:   f32,
    dragging:     bool,
    animator:     TransitionAnimator<Settle>,
    overlay:      Option<MenuOverlay>,
    registry:     DestinationRegistry,
    menu_entries: Box<dyn MenuEntryDelegate>,
}

impl NavigationMachine {
    /// Builds the machine in its initial state and attaches the library
    /// screen.
    pub fn new(
        config: &ContainerConfig,
        mut registry: DestinationRegistry,
        menu_entries: Box<dyn MenuEntryDelegate>,
    ) -> Self {
        let state = NavigationState::default();
        registry.resolve(state.active_destination).did_attach();
        Self {
            state,
            width: config.width,
            height: config.height,
            max_offset: config.max_offset(),
            dragging: false,
            animator: TransitionAnimator::new(&config.spring),
            overlay: None,
            registry,
            menu_entries,
        }
    }

    pub const fn state(&self) -> &NavigationState { &self.state }

    pub const fn menu_phase(&self) -> MenuPhase { self.state.menu_phase }

    pub const fn active_destination(&self) -> DestinationKind { self.state.active_destination }

    pub const fn menu_offset(&self) -> f32 { self.state.menu_offset }

    pub const fn max_offset(&self) -> f32 { self.max_offset }

    pub const fn is_dragging(&self) -> bool { self.dragging }

    pub const fn is_animating(&self) -> bool { self.animator.is_running() }

    /// True whenever the menu is not fully closed.
    pub fn is_menu_visible(&self) -> bool { self.state.menu_phase != MenuPhase::Closed }

    pub const fn overlay(&self) -> Option<&MenuOverlay> { self.overlay.as_ref() }

    pub const fn registry(&self) -> &DestinationRegistry { &self.registry }

    pub const fn registry_mut(&mut self) -> &mut DestinationRegistry { &mut self.registry }

    pub fn active_screen(&self) -> Option<&dyn ContentScreen> {
        self.registry.get(self.state.active_destination)
    }

    /// Whether a drag in `direction` may begin now.
    pub fn accepts_drag(&self, direction: DragDirection) -> bool {
        if self.dragging || self.animator.is_running() {
            return false;
        }
        matches!(
            (self.state.menu_phase, direction),
            (MenuPhase::Closed, DragDirection::Opening) | (MenuPhase::Open, DragDirection::Closing)
        )
    }

    pub fn handle(&mut self, event: NavEvent) -> Handled {
        let before = self.state.menu_phase;
        let handled = match event {
            NavEvent::DragBegan(direction) => self.begin_drag(direction),
            NavEvent::DragMoved(delta) => self.move_drag(delta),
            NavEvent::DragEnded => self.end_drag(),
            NavEvent::DragCancelled => self.cancel_drag(),
            NavEvent::OpenRequested => self.request_open(),
            NavEvent::CloseRequested => self.request_close(),
            NavEvent::Select(kind) => self.select(kind),
        };
        if handled == Handled::Ignored {
            debug!(?event, phase = %before, "event ignored");
        } else if before != self.state.menu_phase {
            info!(from = %before, to = %self.state.menu_phase, "menu phase changed");
        }
        handled
    }

    /// Opens the menu if it is closed, closes it if it is open.
    pub fn toggle(&mut self) -> Handled {
        if self.is_menu_visible() {
            self.handle(NavEvent::CloseRequested)
        } else {
            self.handle(NavEvent::OpenRequested)
        }
    }

    /// Advances the running animation by one frame.
    pub fn advance(&mut self, dt: Duration) {
        let Some(frame) = self.animator.tick(dt) else {
            return;
        };
        self.state.menu_offset = self.clamp(frame.value);
        if let Some(settle) = frame.completion {
            let before = self.state.menu_phase;
            self.settle(settle);
            info!(from = %before, to = %self.state.menu_phase, "menu settled");
        }
    }

    fn begin_drag(&mut self, direction: DragDirection) -> Handled {
        if !self.accepts_drag(direction) {
            if self.animator.is_running() {
                warn!(%direction, "drag ignored while the menu is animating");
            }
            return Handled::Ignored;
        }
        self.dragging = true;
        self.state.menu_phase = match self.state.menu_phase {
            MenuPhase::Closed => {
                self.ensure_overlay();
                MenuPhase::Opening
            }
            _ => MenuPhase::Closing,
        };
        Handled::Applied
    }

    fn move_drag(&mut self, delta: f32) -> Handled {
        if !self.dragging || !delta.is_finite() {
            return Handled::Ignored;
        }
        self.state.menu_offset = self.clamp(self.state.menu_offset + delta);
        Handled::Applied
    }

    fn end_drag(&mut self) -> Handled {
        if !self.dragging {
            return Handled::Ignored;
        }
        self.dragging = false;
        // Measured against the container width, not the remaining gap.
        let target = if self.state.menu_offset > self.width / 2.0 {
            Settle::Open
        } else {
            Settle::Closed
        };
        debug!(offset = self.state.menu_offset, ?target, "drag released");
        self.settle_to(target);
        Handled::Applied
    }

    fn cancel_drag(&mut self) -> Handled {
        if !self.dragging {
            return Handled::Ignored;
        }
        self.dragging = false;
        self.settle_to(Settle::Closed);
        Handled::Applied
    }

    fn request_open(&mut self) -> Handled {
        if self.dragging || self.animator.is_running() || self.state.menu_phase != MenuPhase::Closed
        {
            return Handled::Ignored;
        }
        self.ensure_overlay();
        self.settle_to(Settle::Open);
        Handled::Applied
    }

    fn request_close(&mut self) -> Handled {
        if self.dragging || self.animator.is_running() || self.state.menu_phase != MenuPhase::Open
        {
            return Handled::Ignored;
        }
        self.settle_to(Settle::Closed);
        Handled::Applied
    }

    fn select(&mut self, kind: DestinationKind) -> Handled {
        let current = self.state.active_destination;
        if kind != current {
            self.registry.swap(current, kind);
            self.state.active_destination = kind;
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.set_highlighted(kind);
            }
            info!(from = %current, to = %kind, "destination changed");
        }
        if self.state.menu_phase == MenuPhase::Open {
            self.settle_to(Settle::Closed);
        }
        Handled::Applied
    }

    fn ensure_overlay(&mut self) {
        if self.overlay.is_none() {
            let entries = self.menu_entries.menu_entries();
            self.overlay = Some(MenuOverlay::new(
                entries,
                self.state.active_destination,
                self.height,
            ));
        }
    }

    fn settle_to(&mut self, target: Settle) {
        let (phase, to) = match target {
            Settle::Open => (MenuPhase::Opening, self.max_offset),
            Settle::Closed => (MenuPhase::Closing, 0.0),
        };
        self.state.menu_phase = phase;
        self.animator.animate(self.state.menu_offset, to, target);
    }

    fn settle(&mut self, settle: Settle) {
        match settle {
            Settle::Open => {
                self.state.menu_phase = MenuPhase::Open;
                self.state.menu_offset = self.max_offset;
            }
            Settle::Closed => {
                self.state.menu_phase = MenuPhase::Closed;
                self.state.menu_offset = 0.0;
                self.overlay = None;
            }
        }
    }

    fn clamp(&self, offset: f32) -> f32 { offset.clamp(0.0, self.max_offset) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        destination::{ContentScreenProvider, ScreenStatus},
        main_loop::{self, MainLoopHandle},
        menu::AllDestinations,
    };

    const FRAME: Duration = Duration::from_micros(16_667);

    struct Blank(DestinationKind);

    impl ContentScreen for Blank {
        fn kind(&self) -> DestinationKind { self.0 }

        fn as_any(&self) -> &dyn std::any::Any { self }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }

        fn status(&self) -> ScreenStatus { ScreenStatus::Ready }
    }

    struct BlankProvider;

    impl ContentScreenProvider for BlankProvider {
        fn make_screen(
            &mut self,
            kind: DestinationKind,
            _main_loop: &MainLoopHandle,
        ) -> Option<Box<dyn ContentScreen>> {
            Some(Box::new(Blank(kind)))
        }
    }

    fn machine() -> NavigationMachine {
        let (handle, _mailbox) = main_loop::channel();
        let registry = DestinationRegistry::new(Box::new(BlankProvider), handle);
        NavigationMachine::new(
            &ContainerConfig::default(),
            registry,
            Box::new(AllDestinations),
        )
    }

    fn settle(machine: &mut NavigationMachine) {
        while machine.is_animating() {
            machine.advance(FRAME);
        }
    }

    fn drag(machine: &mut NavigationMachine, direction: DragDirection, deltas: &[f32]) {
        assert_eq!(machine.handle(NavEvent::DragBegan(direction)), Handled::Applied);
        for delta in deltas {
            machine.handle(NavEvent::DragMoved(*delta));
        }
        machine.handle(NavEvent::DragEnded);
    }

    #[test]
    fn starts_closed_on_library() {
        let machine = machine();
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);
        assert_eq!(machine.active_destination(), DestinationKind::Library);
        assert_eq!(machine.menu_offset(), 0.0);
        assert!(machine.overlay().is_none());
        assert!(machine.registry().is_built(DestinationKind::Library));
    }

    #[test]
    fn opening_drag_builds_overlay_and_tracks_offset() {
        let mut machine = machine();
        machine.handle(NavEvent::DragBegan(DragDirection::Opening));
        assert_eq!(machine.menu_phase(), MenuPhase::Opening);
        assert!(machine.overlay().is_some());

        machine.handle(NavEvent::DragMoved(80.0));
        machine.handle(NavEvent::DragMoved(-20.0));
        assert!((machine.menu_offset() - 60.0).abs() < 1e-4);

        machine.handle(NavEvent::DragMoved(1_000.0));
        assert_eq!(machine.menu_offset(), machine.max_offset());
        machine.handle(NavEvent::DragMoved(-5_000.0));
        assert_eq!(machine.menu_offset(), 0.0);
    }

    #[test]
    fn closing_drag_from_closed_is_rejected() {
        let mut machine = machine();
        assert_eq!(
            machine.handle(NavEvent::DragBegan(DragDirection::Closing)),
            Handled::Ignored
        );
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);
        assert!(machine.overlay().is_none());
        assert_eq!(machine.handle(NavEvent::DragMoved(40.0)), Handled::Ignored);
    }

    #[test]
    fn release_past_half_width_opens() {
        let mut machine = machine();
        drag(&mut machine, DragDirection::Opening, &[200.0]);
        assert_eq!(machine.menu_phase(), MenuPhase::Opening);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Open);
        assert_eq!(machine.menu_offset(), machine.max_offset());
        assert!(machine.overlay().is_some());
    }

    #[test]
    fn release_at_exactly_half_width_closes() {
        let mut machine = machine();
        drag(&mut machine, DragDirection::Opening, &[187.5]);
        assert_eq!(machine.menu_phase(), MenuPhase::Closing);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);
        assert_eq!(machine.menu_offset(), 0.0);
        assert!(machine.overlay().is_none());
    }

    #[test]
    fn cancel_always_closes() {
        let mut machine = machine();
        machine.handle(NavEvent::DragBegan(DragDirection::Opening));
        machine.handle(NavEvent::DragMoved(240.0));
        machine.handle(NavEvent::DragCancelled);
        assert_eq!(machine.menu_phase(), MenuPhase::Closing);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);
        assert_eq!(machine.menu_offset(), 0.0);
    }

    #[test]
    fn drags_are_ignored_while_animating() {
        let mut machine = machine();
        machine.handle(NavEvent::OpenRequested);
        machine.advance(FRAME);
        assert!(machine.is_animating());
        assert!(!machine.accepts_drag(DragDirection::Opening));
        assert_eq!(
            machine.handle(NavEvent::DragBegan(DragDirection::Closing)),
            Handled::Ignored
        );
        assert_eq!(machine.handle(NavEvent::CloseRequested), Handled::Ignored);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Open);
    }

    #[test]
    fn select_while_open_swaps_and_closes() {
        let mut machine = machine();
        machine.toggle();
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Open);
        assert_eq!(
            machine.overlay().map(MenuOverlay::highlighted),
            Some(DestinationKind::Library)
        );

        machine.handle(NavEvent::Select(DestinationKind::Settings));
        assert_eq!(machine.active_destination(), DestinationKind::Settings);
        assert_eq!(machine.menu_phase(), MenuPhase::Closing);
        assert_eq!(
            machine.overlay().map(MenuOverlay::highlighted),
            Some(DestinationKind::Settings)
        );
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);
        assert!(machine.overlay().is_none());
    }

    #[test]
    fn select_during_transition_keeps_phase() {
        let mut machine = machine();
        machine.handle(NavEvent::DragBegan(DragDirection::Opening));
        machine.handle(NavEvent::DragMoved(30.0));
        machine.handle(NavEvent::Select(DestinationKind::RemoteSelector));
        assert_eq!(machine.menu_phase(), MenuPhase::Opening);
        assert!(machine.is_dragging());
        assert_eq!(machine.active_destination(), DestinationKind::RemoteSelector);
    }

    #[test]
    fn drag_from_open_uses_container_width() {
        let mut machine = machine();
        machine.toggle();
        settle(&mut machine);

        // 250 - 0.3 * 375 = 137.5, under the 187.5 threshold.
        drag(&mut machine, DragDirection::Closing, &[-0.3 * 375.0]);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Closed);

        machine.toggle();
        settle(&mut machine);
        // 250 - 40 = 210 stays above the threshold and springs back open.
        drag(&mut machine, DragDirection::Closing, &[-40.0]);
        assert_eq!(machine.menu_phase(), MenuPhase::Opening);
        settle(&mut machine);
        assert_eq!(machine.menu_phase(), MenuPhase::Open);
        assert_eq!(machine.menu_offset(), machine.max_offset());
    }

    #[test]
    fn opening_drag_from_open_is_rejected() {
        let mut machine = machine();
        machine.toggle();
        settle(&mut machine);
        assert_eq!(
            machine.handle(NavEvent::DragBegan(DragDirection::Opening)),
            Handled::Ignored
        );
        assert_eq!(machine.menu_phase(), MenuPhase::Open);
    }

    #[test]
    fn non_finite_deltas_leave_the_offset_alone() {
        let mut machine = machine();
        machine.handle(NavEvent::DragBegan(DragDirection::Opening));
        machine.handle(NavEvent::DragMoved(100.0));
        for delta in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(machine.handle(NavEvent::DragMoved(delta)), Handled::Ignored);
        }
        assert_eq!(machine.menu_offset(), 100.0);
        assert!(machine.is_dragging());
    }
}
