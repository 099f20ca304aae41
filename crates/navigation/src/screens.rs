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

//! Content screens for hosts that render nothing: the replay tool and tests.
//!
//! A [`HeadlessScreen`] keeps the observable parts of a real screen: its
//! loading status, whether it is attached, and the depth of its detail stack
//! (the library refuses the menu drag while a detail view is pushed).

use std::{any::Any, cell::RefCell, rc::Rc};

use crate::{
    destination::{ContentScreen, ContentScreenProvider, DestinationKind, ScreenStatus},
    main_loop::MainLoopHandle,
};

#[derive(Debug)]
pub struct HeadlessScreen {
    kind:         DestinationKind,
    status:       ScreenStatus,
    attached:     bool,
    attach_count: usize,
    detail_depth: usize,
}

impl HeadlessScreen {
    pub const fn new(kind: DestinationKind, status: ScreenStatus) -> Self {
        Self {
            kind,
            status,
            attached: false,
            attach_count: 0,
            detail_depth: 0,
        }
    }

    pub const fn is_attached(&self) -> bool { self.attached }

    /// How many times the screen has been put on screen.
    pub const fn attach_count(&self) -> usize { self.attach_count }

    pub const fn push_detail(&mut self) { self.detail_depth += 1; }

    pub const fn pop_detail(&mut self) { self.detail_depth = self.detail_depth.saturating_sub(1); }

    pub const fn detail_depth(&self) -> usize { self.detail_depth }
}

impl ContentScreen for HeadlessScreen {
    fn kind(&self) -> DestinationKind { self.kind }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }

    fn status(&self) -> ScreenStatus { self.status }

    fn did_attach(&mut self) {
        self.attached = true;
        self.attach_count += 1;
    }

    fn did_detach(&mut self) { self.attached = false; }

    fn data_ready(&mut self) { self.status = ScreenStatus::Ready; }

    fn accepts_menu_gesture(&self) -> bool { self.detail_depth == 0 }
}

type Fetcher = Box<dyn FnMut(DestinationKind, &MainLoopHandle)>;

/// Builds [`HeadlessScreen`]s and records every construction.
///
/// Kinds listed as fetching start out `Loading` and hand the main-loop
/// handle to the fetcher, which reports completion with
/// [`MainLoopHandle::screen_ready`].
pub struct HeadlessProvider {
    fetching:  Vec<DestinationKind>,
    fetcher:   Option<Fetcher>,
    build_log: Rc<RefCell<Vec<DestinationKind>>>,
}

impl Default for HeadlessProvider {
    fn default() -> Self { Self::new() }
}

impl HeadlessProvider {
    /// Every screen is ready as soon as it is built.
    pub fn new() -> Self {
        Self {
            fetching:  Vec::new(),
            fetcher:   None,
            build_log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Screens for `kinds` start loading and call `fetcher` once built.
    #[must_use]
    pub fn with_fetcher(
        mut self,
        kinds: impl IntoIterator<Item = DestinationKind>,
        fetcher: impl FnMut(DestinationKind, &MainLoopHandle) + 'static,
    ) -> Self {
        self.fetching = kinds.into_iter().collect();
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Shared log of constructed kinds, in build order.
    pub fn build_log(&self) -> Rc<RefCell<Vec<DestinationKind>>> { Rc::clone(&self.build_log) }
}

impl ContentScreenProvider for HeadlessProvider {
    fn make_screen(
        &mut self,
        kind: DestinationKind,
        main_loop: &MainLoopHandle,
    ) -> Option<Box<dyn ContentScreen>> {
        self.build_log.borrow_mut().push(kind);
        let status = if self.fetching.contains(&kind) {
            if let Some(fetcher) = self.fetcher.as_mut() {
                fetcher(kind, main_loop);
            }
            ScreenStatus::Loading
        } else {
            ScreenStatus::Ready
        };
        Some(Box::new(HeadlessScreen::new(kind, status)))
    }
}
