/// A key-down event as far as a barcode is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Digit(u8),
    Enter,
    Other,
}

/// Accumulates digit keystrokes until Enter.
#[derive(Debug, Default)]
pub struct KeystrokeDecoder {
    buffer: String,
}

impl KeystrokeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one key-down. Returns the barcode when Enter completes a
    /// non-empty one.
    pub fn feed(&mut self, key: KeyPress) -> Option<String> {
        match key {
            KeyPress::Digit(d) if d < 10 => {
                self.buffer.push(char::from(b'0' + d));
                None
            }
            KeyPress::Enter if !self.buffer.is_empty() => Some(std::mem::take(&mut self.buffer)),
            _ => None,
        }
    }
}
