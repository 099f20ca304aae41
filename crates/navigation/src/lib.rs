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

//! Shinobu navigation - the single-pane container of the Shinobu MPD client
//!
//! One center screen, picked from a fixed set of destinations, with a
//! slide-out menu behind it. A pan gesture drags the content aside to reveal
//! the menu; releasing commits to open or closed by the halfway rule and a
//! damped spring settles the offset.
//!
//! Everything runs on the host's main loop: the host forwards pan samples
//! to [`NavigationContainer::handle_gesture`] and calls
//! [`NavigationContainer::tick`] once per frame.

pub mod animator;
pub mod config;
pub mod container;
pub mod destination;
pub mod err;
pub mod gesture;
pub mod machine;
pub mod main_loop;
pub mod menu;
pub mod screens;

pub use animator::{AnimationToken, Frame, SpringCurve, TransitionAnimator};
pub use config::{ContainerConfig, LayoutDirection, SpringConfig};
pub use container::{HostWindow, NavigationContainer, Orientation, SUPPORTED_ORIENTATIONS};
pub use destination::{
    ContentScreen, ContentScreenProvider, Destination, DestinationKind, DestinationRegistry,
    ScreenStatus,
};
pub use err::{Error, Result};
pub use gesture::{DragDirection, GestureEvent, GestureInterpreter, GesturePhase, GestureSample};
pub use machine::{Handled, MenuPhase, NavEvent, NavigationMachine, NavigationState};
pub use main_loop::{LoopMessage, Mailbox, MainLoopHandle};
pub use menu::{AllDestinations, MenuEntryDelegate, MenuEvent, MenuOverlay};
pub use screens::{HeadlessProvider, HeadlessScreen};
