use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::warn;

use crate::{
    errors::InputError,
    input::{BarcodeSource, is_valid_barcode},
};

pub const PROMPT: &str = "barcode> ";

/// Barcodes typed one per line.
pub struct ManualSource<R> {
    lines: Lines<R>,
    prompt: bool,
}

impl ManualSource<BufReader<Stdin>> {
    /// Reads stdin and prompts on stdout before each line.
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            prompt: true,
        }
    }
}

impl<R: AsyncBufRead + Unpin> ManualSource<R> {
    /// Reads from `reader` without prompting.
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            prompt: false,
        }
    }
}

async fn show_prompt() -> std::io::Result<()> {
    let mut out = tokio::io::stdout();
    out.write_all(PROMPT.as_bytes()).await?;
    out.flush().await
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> BarcodeSource for ManualSource<R> {
    async fn next_barcode(&mut self) -> Result<Option<String>, InputError> {
        loop {
            if self.prompt {
                show_prompt().await?;
            }
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            let code = line.trim();
            if code.is_empty() {
                continue;
            }
            if !is_valid_barcode(code) {
                warn!(input = %code, "not a barcode, digits only");
                continue;
            }
            return Ok(Some(code.to_string()));
        }
    }
}
