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

//! The slide-out menu panel.
//!
//! The overlay sits behind the content view at full container height and
//! never moves: it is revealed only by the content view sliding away. It is
//! built when the menu starts opening and dropped once it has fully closed.

use tracing::debug;

use crate::destination::DestinationKind;

/// Host hierarchy slot of the overlay: below the content view.
pub const OVERLAY_LAYER: usize = 0;

/// Supplies the entries listed in the menu.
pub trait MenuEntryDelegate {
    fn menu_entries(&self) -> Vec<DestinationKind>;
}

/// Lists every destination in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllDestinations;

impl MenuEntryDelegate for AllDestinations {
    fn menu_entries(&self) -> Vec<DestinationKind> { DestinationKind::ALL.to_vec() }
}

/// The single outward event of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    DestinationPicked(DestinationKind),
}

#[derive(Debug)]
pub struct MenuOverlay {
    entries:     Vec<DestinationKind>,
    highlighted: DestinationKind,
    height:      f32,
}

impl MenuOverlay {
    pub fn new(entries: Vec<DestinationKind>, highlighted: DestinationKind, height: f32) -> Self {
        debug!(entries = entries.len(), %highlighted, "menu overlay created");
        Self {
            entries,
            highlighted,
            height,
        }
    }

    pub fn entries(&self) -> &[DestinationKind] { &self.entries }

    /// Entry drawn as selected: the destination currently on screen.
    pub const fn highlighted(&self) -> DestinationKind { self.highlighted }

    pub const fn set_highlighted(&mut self, kind: DestinationKind) { self.highlighted = kind; }

    pub const fn height(&self) -> f32 { self.height }

    pub const fn layer(&self) -> usize { OVERLAY_LAYER }

    /// Emits a pick for `kind`, or nothing if the menu does not list it.
    pub fn pick(&self, kind: DestinationKind) -> Option<MenuEvent> {
        self.entries
            .contains(&kind)
            .then_some(MenuEvent::DestinationPicked(kind))
    }

    /// Emits a pick for the row at `row`.
    pub fn pick_row(&self, row: usize) -> Option<MenuEvent> {
        self.entries
            .get(row)
            .map(|kind| MenuEvent::DestinationPicked(*kind))
    }
}

impl Drop for MenuOverlay {
    fn drop(&mut self) {
        debug!("menu overlay destroyed");
    }
}
