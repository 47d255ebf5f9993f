use crate::constants::CHUNK_SIZE;
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Representation type selected with TYPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    /// `TYPE A`: line endings go out as CRLF.
    Ascii,
    /// `TYPE I`: bytes go out untouched.
    #[default]
    Image,
}

impl TransferType {
    pub fn from_param(param: &str) -> Option<Self> {
        match param.to_ascii_uppercase().as_str() {
            "A" => Some(TransferType::Ascii),
            "I" => Some(TransferType::Image),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransferType::Ascii => "A",
            TransferType::Image => "I",
        }
    }
}

/// Lazy stream of file chunks, at most `CHUNK_SIZE` bytes read per step.
///
/// The sequence is consumed once; reading the file again means opening a
/// new `FileChunks`.
#[derive(Debug)]
pub struct FileChunks {
    file: File,
    transfer_type: TransferType,
    buffer: Vec<u8>,
    last_was_cr: bool,
}

impl FileChunks {
    pub fn new(file: File, transfer_type: TransferType) -> Self {
        Self {
            file,
            transfer_type,
            buffer: vec![0; CHUNK_SIZE],
            last_was_cr: false,
        }
    }

    /// Returns the next chunk, or `None` once the file is exhausted.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let bytes_read = self.file.read(&mut self.buffer).await?;
        if bytes_read == 0 {
            return Ok(None);
        }

        let chunk = &self.buffer[..bytes_read];
        let chunk = match self.transfer_type {
            TransferType::Image => chunk.to_vec(),
            TransferType::Ascii => to_crlf(chunk, &mut self.last_was_cr),
        };
        Ok(Some(chunk))
    }
}

/// Rewrites bare `\n` as `\r\n`. `last_was_cr` carries state across chunk
/// boundaries so a CRLF split between two chunks is left alone.
pub fn to_crlf(chunk: &[u8], last_was_cr: &mut bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(chunk.len() + chunk.len() / 16);
    for &byte in chunk {
        if byte == b'\n' && !*last_was_cr {
            out.push(b'\r');
        }
        out.push(byte);
        *last_was_cr = byte == b'\r';
    }
    out
}
