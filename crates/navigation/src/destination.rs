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

//! Destinations and the registry that owns their content screens.
//!
//! Each destination kind maps to at most one content screen for the lifetime
//! of the container. Screens are built lazily by a [`ContentScreenProvider`]
//! and stored in a fixed arena indexed by kind; nothing is ever evicted.

use std::any::Any;

use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use strum::EnumCount;
use tracing::{debug, info};

use crate::{
    err::{Result, UnknownDestinationSnafu},
    main_loop::MainLoopHandle,
};

/// Top-level content screens reachable from the container.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DestinationKind {
    /// Albums, artists and genres of the remote library
    #[default]
    Library,
    /// Application settings
    Settings,
    /// Picker for the remote daemon to control
    RemoteSelector,
}

impl DestinationKind {
    pub const ALL: [Self; Self::COUNT] = [Self::Library, Self::Settings, Self::RemoteSelector];

    /// Arena slot of this kind.
    pub const fn index(self) -> usize { self as usize }

    /// Parses a snake_case name such as `"remote_selector"`.
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Self>()
            .ok()
            .context(UnknownDestinationSnafu { name })
    }

    /// Label shown in the menu.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::Settings => "Settings",
            Self::RemoteSelector => "Servers",
        }
    }
}

/// Whether a screen has the data it needs to display.
///
/// Failures of the underlying fetch are never reported here; a screen whose
/// fetch failed simply stays `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ScreenStatus {
    Loading,
    Ready,
}

/// A displayable content screen owned by the registry.
pub trait ContentScreen {
    fn kind(&self) -> DestinationKind;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn status(&self) -> ScreenStatus;

    /// Called when the screen becomes the visible center screen.
    fn did_attach(&mut self) {}

    /// Called when another screen replaces this one.
    fn did_detach(&mut self) {}

    /// Called on the main loop once a fetch started at construction time has
    /// completed.
    fn data_ready(&mut self) {}

    /// Whether the menu drag may start while this screen is visible. Screens
    /// with a pushed detail view refuse it so the drag goes to the detail.
    fn accepts_menu_gesture(&self) -> bool { true }
}

/// Builds content screens on demand.
pub trait ContentScreenProvider {
    /// Builds the screen for `kind`, or returns `None` if this provider was
    /// never wired for it. The screen may begin an asynchronous fetch whose
    /// completion it reports through `main_loop`.
    fn make_screen(
        &mut self,
        kind: DestinationKind,
        main_loop: &MainLoopHandle,
    ) -> Option<Box<dyn ContentScreen>>;
}

/// One arena slot.
pub struct Destination {
    kind:   DestinationKind,
    screen: Option<Box<dyn ContentScreen>>,
}

impl Destination {
    const fn empty(kind: DestinationKind) -> Self { Self { kind, screen: None } }

    pub const fn kind(&self) -> DestinationKind { self.kind }

    pub const fn is_built(&self) -> bool { self.screen.is_some() }
}

/// Owns every content screen the container has built.
pub struct DestinationRegistry {
    slots:     [Destination; DestinationKind::COUNT],
    provider:  Box<dyn ContentScreenProvider>,
    main_loop: MainLoopHandle,
}

impl DestinationRegistry {
    pub fn new(provider: Box<dyn ContentScreenProvider>, main_loop: MainLoopHandle) -> Self {
        Self {
            slots: DestinationKind::ALL.map(Destination::empty),
            provider,
            main_loop,
        }
    }

    /// Returns the screen for `kind`, building it on first use.
    ///
    /// # Panics
    ///
    /// Panics if the provider cannot build `kind`: asking for a destination
    /// nobody registered is a wiring bug.
    pub fn resolve(&mut self, kind: DestinationKind) -> &mut dyn ContentScreen {
        let Self {
            slots,
            provider,
            main_loop,
        } = self;
        let screen = slots[kind.index()].screen.get_or_insert_with(|| {
            let screen = provider
                .make_screen(kind, main_loop)
                .unwrap_or_else(|| panic!("no content screen is registered for `{kind}`"));
            debug_assert_eq!(screen.kind(), kind, "provider built the wrong screen");
            info!(destination = %kind, status = %screen.status(), "built content screen");
            screen
        });
        &mut **screen
    }

    pub fn get(&self, kind: DestinationKind) -> Option<&dyn ContentScreen> {
        let screen = self.slots[kind.index()].screen.as_ref()?;
        Some(&**screen)
    }

    pub fn get_mut(&mut self, kind: DestinationKind) -> Option<&mut dyn ContentScreen> {
        let screen = self.slots[kind.index()].screen.as_mut()?;
        Some(&mut **screen)
    }

    /// Looks up a built screen by its concrete type.
    pub fn downcast_ref<T: ContentScreen + 'static>(&self, kind: DestinationKind) -> Option<&T> {
        self.get(kind)?.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: ContentScreen + 'static>(
        &mut self,
        kind: DestinationKind,
    ) -> Option<&mut T> {
        self.get_mut(kind)?.as_any_mut().downcast_mut()
    }

    pub fn is_built(&self, kind: DestinationKind) -> bool {
        self.slots[kind.index()].is_built()
    }

    pub fn built_count(&self) -> usize { self.slots.iter().filter(|slot| slot.is_built()).count() }

    pub fn destinations(&self) -> &[Destination] { &self.slots }

    /// Replaces the attached screen `from` with `to`, building `to` if needed.
    pub fn swap(&mut self, from: DestinationKind, to: DestinationKind) {
        if from == to {
            return;
        }
        if let Some(old) = self.get_mut(from) {
            old.did_detach();
        }
        self.resolve(to).did_attach();
        debug!(%from, %to, "swapped center screen");
    }
}
