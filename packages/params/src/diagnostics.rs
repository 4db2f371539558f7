//! Diagnostics raised while resolving map parameters.
//!
//! Bad input is never fatal. Each problem becomes a [`ParamWarning`] handed
//! to a [`Reporter`], which decides where it goes: the `log` facade, a
//! buffer the caller inspects, or nowhere.

use std::sync::{Mutex, PoisonError};

use species_map_params_models::BoundarySource;
use thiserror::Error;

/// A recoverable problem with the supplied parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamWarning {
    #[error("Parameter '{name}' contains invalid characters. Using the value '{replacement}' instead of '{value}'")]
    InvalidCharacters {
        name: String,
        value: String,
        replacement: String,
    },

    #[error("Parameter '{name}' has the unrecognised value of '{value}'. Acceptable values are: {valid}")]
    UnrecognisedValue {
        name: String,
        value: String,
        valid: String,
    },

    #[error("Parameter '{name}' is not a valid URL: {value}")]
    InvalidUrl { name: String, value: String },

    #[error("Invalid fill format for '{name}': {value}. Using '{fallback}' instead")]
    InvalidFill {
        name: String,
        value: String,
        fallback: String,
    },

    #[error("Invalid year for '{name}': {value}")]
    InvalidYear { name: String, value: String },

    #[error("Either both or neither of the parameters '{first}' and '{second}' must be supplied")]
    IncompletePair { first: String, second: String },

    #[error("Parameter '{boundary}' contains an invalid value: {value} ({reason}). It will be ignored")]
    UnresolvedBoundary {
        boundary: BoundarySource,
        value: String,
        reason: String,
    },

    #[error(
        "Multiple boundary parameters have been supplied ({supplied}). Only one of \
         '[bl,tr]', '[blCoord,trCoord]', 'vc', or 'zoom' will be used: '{used}'"
    )]
    MultipleBoundaries {
        supplied: String,
        used: BoundarySource,
    },

    #[error("Parameter '{name}' is not implemented. It will be ignored")]
    NotImplemented { name: String },

    #[error("Unknown parameter '{name}'. It will be ignored")]
    UnknownParameter { name: String },

    #[error("A layer titled '{title}' already exists. The later layer will be skipped")]
    DuplicateLayer { title: String },

    #[error("No species group or species name has been chosen. No layers will be shown")]
    EmptyExploreTarget,

    #[error("Unknown base layer: {name}")]
    UnknownBaseLayer { name: String },
}

impl ParamWarning {
    /// Severity the warning is logged at.
    #[must_use]
    pub const fn level(&self) -> log::Level {
        match self {
            Self::InvalidFill { .. }
            | Self::InvalidYear { .. }
            | Self::UnresolvedBoundary { .. }
            | Self::UnknownBaseLayer { .. } => log::Level::Error,
            Self::InvalidCharacters { .. }
            | Self::UnrecognisedValue { .. }
            | Self::InvalidUrl { .. }
            | Self::IncompletePair { .. }
            | Self::MultipleBoundaries { .. }
            | Self::NotImplemented { .. }
            | Self::UnknownParameter { .. }
            | Self::DuplicateLayer { .. }
            | Self::EmptyExploreTarget => log::Level::Warn,
        }
    }
}

/// Receives parameter diagnostics.
///
/// Implementations must be `Send + Sync` so one reporter can be shared by
/// a map manager and whatever drives it.
pub trait Reporter: Send + Sync {
    fn report(&self, warning: ParamWarning);
}

/// Forwards every diagnostic to the `log` facade at its own level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, warning: ParamWarning) {
        log::log!(warning.level(), "{warning}");
    }
}

/// Keeps every diagnostic, and also logs it.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    warnings: Mutex<Vec<ParamWarning>>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics received so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> Vec<ParamWarning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the diagnostics received so far.
    pub fn take(&self) -> Vec<ParamWarning> {
        std::mem::take(&mut *self.warnings.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, warning: ParamWarning) {
        LogReporter.report(warning.clone());
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _warning: ParamWarning) {}
}
