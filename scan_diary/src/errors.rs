use std::io;

use thiserror::Error;

use crate::{catalog::CatalogError, tracker::TrackerError};

/// Why a single scan produced no diary entry. The scanner keeps running.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("product {barcode} not found")]
    NotFound { barcode: String },

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("diary: {0}")]
    Diary(#[from] TrackerError),
}

/// Failures of the barcode input device itself. These end the run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open input device {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("no barcode scanner found")]
    NoDevice,

    #[error("input read failed: {0}")]
    Read(#[from] io::Error),
}
