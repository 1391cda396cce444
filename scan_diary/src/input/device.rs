//! USB HID barcode scanners read through evdev.
//!
//! Scanners present themselves as keyboards: one key-down per digit followed
//! by Enter. The device is grabbed so the keystrokes do not also reach the
//! console.

/// Names containing any of these (case-insensitive) are taken for scanners.
const SCANNER_NAME_HINTS: [&str; 3] = ["barcode", "scanner", "hid"];

pub fn looks_like_scanner(name: &str) -> bool {
    let name = name.to_lowercase();
    SCANNER_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

#[cfg(target_os = "linux")]
pub use linux::ScannerDevice;

#[cfg(target_os = "linux")]
mod linux {
    use std::path::Path;

    use async_trait::async_trait;
    use evdev::{Device, EventStream, InputEventKind, Key};
    use tracing::{info, warn};

    use super::looks_like_scanner;
    use crate::{
        errors::InputError,
        input::{BarcodeSource, KeyPress, KeystrokeDecoder},
    };

    const DIGIT_KEYS: [(Key, u8); 20] = [
        (Key::KEY_0, 0),
        (Key::KEY_1, 1),
        (Key::KEY_2, 2),
        (Key::KEY_3, 3),
        (Key::KEY_4, 4),
        (Key::KEY_5, 5),
        (Key::KEY_6, 6),
        (Key::KEY_7, 7),
        (Key::KEY_8, 8),
        (Key::KEY_9, 9),
        (Key::KEY_KP0, 0),
        (Key::KEY_KP1, 1),
        (Key::KEY_KP2, 2),
        (Key::KEY_KP3, 3),
        (Key::KEY_KP4, 4),
        (Key::KEY_KP5, 5),
        (Key::KEY_KP6, 6),
        (Key::KEY_KP7, 7),
        (Key::KEY_KP8, 8),
        (Key::KEY_KP9, 9),
    ];

    /// evdev key-down value; 0 is release and 2 is autorepeat.
    const KEY_DOWN: i32 = 1;

    fn classify(key: Key) -> KeyPress {
        if key == Key::KEY_ENTER || key == Key::KEY_KPENTER {
            return KeyPress::Enter;
        }
        DIGIT_KEYS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, d)| KeyPress::Digit(*d))
            .unwrap_or(KeyPress::Other)
    }

    pub struct ScannerDevice {
        name: String,
        events: EventStream,
        decoder: KeystrokeDecoder,
    }

    impl ScannerDevice {
        /// Opens and grabs the device at `path`.
        pub fn open(path: &str) -> Result<Self, InputError> {
            let open_err = |source| InputError::Open {
                path: path.to_string(),
                source,
            };
            let device = Device::open(Path::new(path)).map_err(open_err)?;
            Self::listen(path, device).map_err(open_err)
        }

        /// Opens the first input device whose name looks like a scanner.
        pub fn detect() -> Result<Self, InputError> {
            let mut seen = Vec::new();
            for (path, device) in evdev::enumerate() {
                let name = device.name().unwrap_or_default().to_string();
                if looks_like_scanner(&name) {
                    let path = path.display().to_string();
                    info!(device = %path, %name, "auto-detected scanner");
                    return Self::listen(&path, device)
                        .map_err(|source| InputError::Open { path, source });
                }
                seen.push(format!("{} ({name})", path.display()));
            }
            warn!(devices = ?seen, "no input device looks like a barcode scanner");
            Err(InputError::NoDevice)
        }

        fn listen(path: &str, mut device: Device) -> std::io::Result<Self> {
            let name = device.name().unwrap_or(path).to_string();
            device.grab()?;
            let events = device.into_event_stream()?;
            info!(device = %path, %name, "listening for scans");
            Ok(Self {
                name,
                events,
                decoder: KeystrokeDecoder::new(),
            })
        }
    }

    #[async_trait]
    impl BarcodeSource for ScannerDevice {
        async fn next_barcode(&mut self) -> Result<Option<String>, InputError> {
            loop {
                let event = self.events.next_event().await?;
                let InputEventKind::Key(key) = event.kind() else {
                    continue;
                };
                if event.value() != KEY_DOWN {
                    continue;
                }
                if let Some(code) = self.decoder.feed(classify(key)) {
                    tracing::debug!(device = %self.name, %code, "scan complete");
                    return Ok(Some(code));
                }
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_names_match_case_insensitively() {
        assert!(looks_like_scanner("Symbol Technologies BARCODE Reader"));
        assert!(looks_like_scanner("USB HID Keyboard"));
        assert!(looks_like_scanner("Honeywell Scanner"));
        assert!(!looks_like_scanner("AT Translated Set 2 keyboard"));
    }
}
