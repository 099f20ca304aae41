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

use std::{any::Any, path::PathBuf};

use shinobu_error::{ErrorExt, StackError, StatusCode};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unknown destination `{name}`"))]
    UnknownDestination {
        name: String,
        #[snafu(implicit)]
        loc:  snafu::Location,
    },

    #[snafu(display("Host slot {index} already holds a navigation container"))]
    HostOccupied {
        index: usize,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("No navigation container is mounted at host slot {index}"))]
    NotMounted {
        index: usize,
        #[snafu(implicit)]
        loc:   snafu::Location,
    },

    #[snafu(display("Invalid container configuration: {message}"))]
    InvalidConfig {
        message: String,
        #[snafu(implicit)]
        loc:     snafu::Location,
    },

    #[snafu(display("Failed to read config file {}", path.display()))]
    ReadConfig {
        path:   PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Failed to parse container config"))]
    ParseConfig {
        source: toml::de::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },

    #[snafu(display("Failed to encode container config"))]
    EncodeConfig {
        source: toml::ser::Error,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}

impl Error {
    const fn location(&self) -> &snafu::Location {
        match self {
            Self::UnknownDestination { loc, .. }
            | Self::HostOccupied { loc, .. }
            | Self::NotMounted { loc, .. }
            | Self::InvalidConfig { loc, .. }
            | Self::ReadConfig { loc, .. }
            | Self::ParseConfig { loc, .. }
            | Self::EncodeConfig { loc, .. } => loc,
        }
    }
}

impl StackError for Error {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) {
        buf.push(format!("{layer}: {self}, at {}", self.location()));
    }

    fn next(&self) -> Option<&dyn StackError> { None }
}

impl ErrorExt for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownDestination { .. } | Self::NotMounted { .. } => StatusCode::Wiring,
            Self::HostOccupied { .. } => StatusCode::Conflict,
            Self::InvalidConfig { .. } | Self::ParseConfig { .. } => StatusCode::InvalidArgument,
            Self::ReadConfig { .. } => StatusCode::NotFound,
            Self::EncodeConfig { .. } => StatusCode::Internal,
        }
    }

    fn as_any(&self) -> &dyn Any { self }
}
