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

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, time::Duration};

use shinobu_nav::{
    AllDestinations, ContainerConfig, DestinationKind, GestureSample, HeadlessProvider, HostWindow,
    MenuPhase, NavigationContainer,
};

pub const FRAME: Duration = Duration::from_micros(16_667);

/// Frames after which a settling animation must have finished.
const SETTLE_LIMIT: usize = 120;

pub struct Harness {
    pub host:      HostWindow,
    pub container: NavigationContainer,
    pub build_log: Rc<RefCell<Vec<DestinationKind>>>,
}

impl Harness {
    pub fn new() -> Self { Self::with_provider(HeadlessProvider::new()) }

    pub fn with_provider(provider: HeadlessProvider) -> Self {
        shinobu_common_telemetry::init_default_ut_logging();
        let mut host = HostWindow::new();
        let build_log = provider.build_log();
        let container = NavigationContainer::new(
            &ContainerConfig::default(),
            Box::new(provider),
            Box::new(AllDestinations),
            &mut host,
        )
        .unwrap();
        Self {
            host,
            container,
            build_log,
        }
    }

    pub fn width(&self) -> f32 { ContainerConfig::default().width }

    pub fn max_offset(&self) -> f32 { self.container.machine().max_offset() }

    pub fn tick(&mut self) { self.container.tick(FRAME); }

    /// Ticks until no drag or animation is active, checking the phase
    /// invariants on every frame.
    pub fn settle(&mut self) {
        for _ in 0..SETTLE_LIMIT {
            if self.container.is_settled() {
                return;
            }
            self.tick();
            self.assert_invariants();
        }
        panic!("container did not settle within {SETTLE_LIMIT} frames");
    }

    /// Drags through the cumulative `translations`, one frame per sample,
    /// then releases (or cancels) the gesture without settling.
    pub fn drag(&mut self, velocity: f32, translations: &[f32], cancel: bool) {
        self.container.handle_gesture(GestureSample::began(velocity));
        self.tick();
        for translation in translations {
            self.container
                .handle_gesture(GestureSample::changed(*translation, velocity));
            self.tick();
        }
        let last = translations.last().copied().unwrap_or(0.0);
        if cancel {
            self.container.handle_gesture(GestureSample::cancelled(last));
        } else {
            self.container
                .handle_gesture(GestureSample::ended(last, velocity));
        }
    }

    pub fn open(&mut self) {
        self.container.toggle_menu();
        self.settle();
        assert_eq!(self.container.menu_phase(), MenuPhase::Open);
    }

    pub fn assert_invariants(&self) {
        let state = self.container.state();
        assert!(
            (0.0..=self.max_offset()).contains(&state.menu_offset),
            "offset {} out of range",
            state.menu_offset
        );
        match state.menu_phase {
            MenuPhase::Closed => {
                assert_eq!(state.menu_offset, 0.0);
                assert!(self.container.menu_overlay().is_none());
            }
            MenuPhase::Open => {
                assert_eq!(state.menu_offset, self.max_offset());
                assert!(self.container.menu_overlay().is_some());
            }
            MenuPhase::Opening | MenuPhase::Closing => {
                assert!(self.container.menu_overlay().is_some());
            }
        }
    }
}
