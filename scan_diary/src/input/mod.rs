//! Barcode input sources.
//!
//! A [`BarcodeSource`] yields one complete barcode at a time. On Linux the
//! scanner is read directly through evdev ([`device::ScannerDevice`]); when no
//! device can be used the process falls back to typing barcodes on stdin
//! ([`manual::ManualSource`]).

pub mod decoder;
pub mod device;
pub mod manual;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::InputError;

pub use decoder::{KeyPress, KeystrokeDecoder};
pub use manual::ManualSource;

#[async_trait]
pub trait BarcodeSource: Send {
    /// Waits for the next barcode. `Ok(None)` means the input has ended.
    async fn next_barcode(&mut self) -> Result<Option<String>, InputError>;
}

/// A barcode is a non-empty run of ASCII digits.
pub fn is_valid_barcode(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Opens the scanner at `device`, or the first auto-detected one.
///
/// Falls back to manual entry when `force_manual` is set, when no scanner is
/// found, or when the chosen device cannot be opened.
pub fn open_source(device: Option<&str>, force_manual: bool) -> Box<dyn BarcodeSource> {
    if force_manual {
        info!("manual barcode entry");
        return Box::new(ManualSource::stdin());
    }

    match open_device(device) {
        Ok(source) => source,
        Err(e) => {
            warn!(error = %e, "scanner unavailable, falling back to manual entry");
            Box::new(ManualSource::stdin())
        }
    }
}

#[cfg(target_os = "linux")]
fn open_device(device: Option<&str>) -> Result<Box<dyn BarcodeSource>, InputError> {
    let scanner = match device {
        Some(path) => device::ScannerDevice::open(path)?,
        None => device::ScannerDevice::detect()?,
    };
    Ok(Box::new(scanner))
}

#[cfg(not(target_os = "linux"))]
fn open_device(_device: Option<&str>) -> Result<Box<dyn BarcodeSource>, InputError> {
    Err(InputError::NoDevice)
}
