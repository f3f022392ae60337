//! Type definitions for covidash

mod error;
mod series;
mod summary;

pub use error::*;
pub use series::*;
pub use summary::*;

use serde::Serialize;
use std::fmt;

/// The four inputs the dashboard is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Confirmed,
    Deaths,
    Recovered,
    CountryCodes,
}

impl Dataset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Deaths => "deaths",
            Self::Recovered => "recovered",
            Self::CountryCodes => "country codes",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
