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

//! Shared error traits for the shinobu workspace.
//!
//! Crate-level error enums are plain snafu enums; implementing [`StackError`]
//! and [`ErrorExt`] lets the binary classify them without downcasting.

use std::{any::Any, error::Error as StdError, sync::Arc};

use serde::Serialize;
use strum::EnumProperty;

/// Coarse classification of a failure, as reported to the host.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumProperty,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusCode {
    #[strum(props(fatal = "false"))]
    InvalidArgument,
    #[strum(props(fatal = "false"))]
    NotFound,
    /// A component was wired twice into a slot that only holds one.
    #[strum(props(fatal = "true"))]
    Conflict,
    /// The host asked for something it never registered.
    #[strum(props(fatal = "true"))]
    Wiring,
    #[strum(props(fatal = "true"))]
    Internal,
    #[strum(props(fatal = "true"))]
    Unknown,
}

impl StatusCode {
    /// Whether a failure with this code indicates a wiring bug rather than a
    /// runtime condition. Fatal errors must abort the host.
    pub fn is_fatal(self) -> bool {
        self.get_str("fatal")
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(true)
    }
}

pub trait StackError: StdError {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>);

    fn next(&self) -> Option<&dyn StackError>;

    fn last(&self) -> &dyn StackError
    where
        Self: Sized,
    {
        let Some(mut result) = self.next() else {
            return self;
        };
        while let Some(err) = result.next() {
            result = err;
        }
        result
    }

    fn transparent(&self) -> bool { false }
}

pub trait ErrorExt: StackError {
    fn status_code(&self) -> StatusCode { StatusCode::Unknown }

    fn as_any(&self) -> &dyn Any;

    /// One-line message for the user: internal failures are reported by code
    /// only, everything else by the innermost error and its root cause.
    fn output_msg(&self) -> String
    where
        Self: Sized,
    {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => {
                format!("Internal error: {}", self.status_code())
            }
            _ => {
                let error = self.last();
                match error.source() {
                    Some(external) => {
                        let mut root = external;
                        while let Some(source) = root.source() {
                            root = source;
                        }
                        if error.transparent() {
                            format!("{root}")
                        } else {
                            format!("{error}: {root}")
                        }
                    }
                    None => format!("{error}"),
                }
            }
        }
    }

    /// Renders the whole stack, outermost layer first.
    fn stack_trace(&self) -> Vec<String>
    where
        Self: Sized,
    {
        let mut buf = Vec::new();
        self.debug_fmt(0, &mut buf);
        buf
    }
}

impl<T: ?Sized + StackError> StackError for Arc<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

impl<T: StackError> StackError for Box<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use snafu::{IntoError, Snafu};

    use super::*;

    #[derive(Debug, Snafu)]
    #[snafu(display("Reading the album cache"))]
    struct CacheError {
        source: std::io::Error,
    }

    #[derive(Debug, Snafu)]
    enum LibraryError {
        #[snafu(display("Loading the library"))]
        Load { source: CacheError },
    }

    impl StackError for CacheError {
        fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
            buf.push(format!("{layer}: {self}"));
        }

        fn next(&self) -> Option<&dyn StackError> { None }
    }

    impl StackError for LibraryError {
        fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
            buf.push(format!("{layer}: {self}"));
            let Self::Load { source } = self;
            source.debug_fmt(layer + 1, buf);
        }

        fn next(&self) -> Option<&dyn StackError> {
            let Self::Load { source } = self;
            Some(source)
        }
    }

    impl ErrorExt for LibraryError {
        fn status_code(&self) -> StatusCode { StatusCode::NotFound }

        fn as_any(&self) -> &dyn Any { self }
    }

    fn library_error() -> LibraryError {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "cache file missing");
        LoadSnafu.into_error(CacheSnafu.into_error(io))
    }

    #[test]
    fn output_msg_names_innermost_layer_and_root_cause() {
        let err = library_error();
        assert_eq!(
            err.output_msg(),
            "Reading the album cache: cache file missing"
        );
        assert_eq!(
            err.stack_trace(),
            vec!["0: Loading the library", "1: Reading the album cache"]
        );
    }

    #[test]
    fn wrapped_errors_keep_their_stack() {
        let boxed = Box::new(library_error());
        let mut buf = Vec::new();
        boxed.debug_fmt(0, &mut buf);
        assert_eq!(buf.len(), 2);
        assert_eq!(boxed.last().to_string(), "Reading the album cache");

        let shared: Arc<dyn StackError> = Arc::new(library_error());
        let mut buf = Vec::new();
        shared.debug_fmt(3, &mut buf);
        assert_eq!(buf, vec!["3: Loading the library", "4: Reading the album cache"]);
        assert_eq!(shared.last().to_string(), "Reading the album cache");
        assert!(shared.next().and_then(StackError::next).is_none());
    }

    #[test]
    fn fatal_property_follows_code() {
        assert!(!StatusCode::InvalidArgument.is_fatal());
        assert!(!StatusCode::NotFound.is_fatal());
        assert!(StatusCode::Conflict.is_fatal());
        assert!(StatusCode::Wiring.is_fatal());
    }

    #[test]
    fn status_code_round_trips_through_snake_case() {
        assert_eq!(
            StatusCode::from_str("invalid_argument").unwrap(),
            StatusCode::InvalidArgument
        );
        assert_eq!(StatusCode::Wiring.to_string(), "wiring");
    }
}
