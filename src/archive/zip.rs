//! ZIP member extraction over a [`RangeReader`].
//!
//! Only the tail of the archive (end of central directory record), the
//! central directory, one local header and the member's data are fetched.

use crate::error::{Error, Result};
use crate::reader::RangeReader;
use flate2::read::DeflateDecoder;
use std::io::Read;
use tracing::debug;

const EOCD_SIGNATURE: &[u8; 4] = b"\x50\x4b\x05\x06";
const CENTRAL_DIR_SIGNATURE: &[u8; 4] = b"\x50\x4b\x01\x02";
const LOCAL_HEADER_SIGNATURE: &[u8; 4] = b"\x50\x4b\x03\x04";

const COMPRESSION_STORED: u16 = 0;
const COMPRESSION_DEFLATE: u16 = 8;

const EOCD_MIN_SIZE: usize = 22;
const CENTRAL_DIR_ENTRY_MIN_SIZE: usize = 46;
const LOCAL_HEADER_MIN_SIZE: usize = 30;

// Fixed record plus the largest possible archive comment.
const EOCD_SEARCH_SIZE: u64 = 65536 + EOCD_MIN_SIZE as u64;

/// Information about a file within a ZIP archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipFileInfo {
    pub name: String,
    pub compression_method: u16,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub local_header_offset: u64,
}

/// Reads members out of a remote ZIP archive.
pub struct ZipExtractor<'a> {
    reader: &'a RangeReader,
    zip_size: u64,
}

impl<'a> ZipExtractor<'a> {
    pub fn new(reader: &'a RangeReader) -> Result<Self> {
        let zip_size = reader.size().ok_or(Error::UnknownSize)?;
        Ok(Self { reader, zip_size })
    }

    /// Names of every member, in central directory order.
    pub async fn list_files(&self) -> Result<Vec<String>> {
        let entries = self.entries().await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    /// Central directory entries of the archive.
    pub async fn entries(&self) -> Result<Vec<ZipFileInfo>> {
        let cd = self.central_directory().await?;
        Ok(parse_central_directory(&cd))
    }

    /// Extract a specific file from the ZIP archive.
    pub async fn extract_file(&self, target_filename: &str) -> Result<Vec<u8>> {
        let file_info = self
            .entries()
            .await?
            .into_iter()
            .find(|e| e.name == target_filename)
            .ok_or_else(|| Error::archive(format!("File '{target_filename}' not found in ZIP")))?;

        let header = self
            .read_exact(file_info.local_header_offset, LOCAL_HEADER_MIN_SIZE as u64)
            .await?;
        if &header[..4] != LOCAL_HEADER_SIGNATURE {
            return Err(Error::archive("Invalid local file header"));
        }
        let filename_length = u16_at(&header, 26) as u64;
        let extra_field_length = u16_at(&header, 28) as u64;
        let data_start = file_info.local_header_offset
            + LOCAL_HEADER_MIN_SIZE as u64
            + filename_length
            + extra_field_length;

        debug!(
            member = target_filename,
            offset = data_start,
            size = file_info.compressed_size,
            "Fetching ZIP member"
        );
        let compressed_data = self.read_exact(data_start, file_info.compressed_size).await?;

        match file_info.compression_method {
            COMPRESSION_STORED => Ok(compressed_data),
            COMPRESSION_DEFLATE => {
                let mut decoder = DeflateDecoder::new(&compressed_data[..]);
                let mut decompressed = Vec::with_capacity(file_info.uncompressed_size as usize);
                decoder
                    .read_to_end(&mut decompressed)
                    .map_err(|e| Error::Archive {
                        message: "Deflate decompression failed".into(),
                        cause: Some(Box::new(e)),
                    })?;
                Ok(decompressed)
            }
            method => Err(Error::UnsupportedCompression(method)),
        }
    }

    async fn central_directory(&self) -> Result<Vec<u8>> {
        let tail_size = EOCD_SEARCH_SIZE.min(self.zip_size);
        let tail_start = self.zip_size - tail_size;
        let tail = self.read_exact(tail_start, tail_size).await?;

        let eocd_offset = tail
            .windows(4)
            .rposition(|window| window == EOCD_SIGNATURE)
            .ok_or_else(|| Error::archive("Could not find End of Central Directory Record"))?;
        let eocd = &tail[eocd_offset..];
        if eocd.len() < EOCD_MIN_SIZE {
            return Err(Error::archive("Invalid EOCD record"));
        }

        let cd_size = u32_at(eocd, 12) as u64;
        let cd_offset = u32_at(eocd, 16) as u64;
        if cd_offset + cd_size > tail_start + eocd_offset as u64 {
            return Err(Error::archive("Central directory overlaps its end record"));
        }

        if cd_offset >= tail_start {
            let start = (cd_offset - tail_start) as usize;
            return Ok(tail[start..start + cd_size as usize].to_vec());
        }
        self.read_exact(cd_offset, cd_size).await
    }

    async fn read_exact(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        let outcome = self.reader.read_at(&mut buf, offset).await?;
        if outcome.bytes_read != buf.len() {
            return Err(Error::archive(format!(
                "Archive truncated at offset {offset}: wanted {len} bytes, got {}",
                outcome.bytes_read
            )));
        }
        Ok(buf)
    }
}

/// Walk central directory records until the data or the signatures run out.
fn parse_central_directory(cd_data: &[u8]) -> Vec<ZipFileInfo> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset + CENTRAL_DIR_ENTRY_MIN_SIZE <= cd_data.len() {
        let record = &cd_data[offset..];
        if &record[..4] != CENTRAL_DIR_SIGNATURE {
            break;
        }

        let filename_length = u16_at(record, 28) as usize;
        let extra_field_length = u16_at(record, 30) as usize;
        let comment_length = u16_at(record, 32) as usize;

        let filename_start = CENTRAL_DIR_ENTRY_MIN_SIZE;
        if filename_start + filename_length > record.len() {
            break;
        }

        entries.push(ZipFileInfo {
            name: String::from_utf8_lossy(&record[filename_start..filename_start + filename_length])
                .into_owned(),
            compression_method: u16_at(record, 10),
            compressed_size: u32_at(record, 20) as u64,
            uncompressed_size: u32_at(record, 24) as u64,
            local_header_offset: u32_at(record, 42) as u64,
        });

        offset += CENTRAL_DIR_ENTRY_MIN_SIZE + filename_length + extra_field_length + comment_length;
    }
    entries
}

fn u16_at(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn u32_at(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
