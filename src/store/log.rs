//! Append-only record log for durability
//!
//! Every accepted consumption record is persisted here before the append is
//! acknowledged. On startup the full log is replayed to rebuild the in-memory
//! record set.
//!
//! Format per entry:
//! - length: u32 (4 bytes)
//! - data: [u8; length] (serialized ConsumptionRecord)
//! - crc: u32 (4 bytes, CRC32 of length + data)

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::ConsumptionRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Append-only log of consumption records
pub struct RecordLog {
    /// File handle for writing
    writer: BufWriter<File>,
    /// Path to the log file
    path: PathBuf,
    /// Number of entries written or recovered
    entry_count: u64,
}

impl RecordLog {
    /// Open or create a record log file
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            entry_count: 0,
        })
    }

    /// Append a record and sync it to disk
    pub fn append(&mut self, record: &ConsumptionRecord) -> StoreResult<()> {
        let data = bincode::serialize(record)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&(data.len() as u32).to_le_bytes());
        hasher.update(&data);
        let crc = hasher.finalize();

        // Write: length (4) + data (N) + crc (4)
        self.writer.write_all(&(data.len() as u32).to_le_bytes())?;
        self.writer.write_all(&data)?;
        self.writer.write_all(&crc.to_le_bytes())?;

        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        self.entry_count += 1;
        Ok(())
    }

    /// Read all entries back for recovery
    ///
    /// A corrupt or truncated tail stops the replay with a warning; every
    /// entry before it is returned.
    pub fn recover(&mut self) -> StoreResult<Vec<ConsumptionRecord>> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut records = Vec::new();

        loop {
            match Self::read_entry_from(&mut reader) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::warn!(
                        entries = records.len(),
                        error = %e,
                        "Record log recovery stopped at corrupt entry"
                    );
                    break;
                }
            }
        }

        self.entry_count = records.len() as u64;
        Ok(records)
    }

    /// Number of entries written or recovered
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Read a single entry, returning None at clean EOF
    fn read_entry_from(reader: &mut impl Read) -> StoreResult<Option<ConsumptionRecord>> {
        let mut len_bytes = [0u8; 4];
        match reader.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_le_bytes(len_bytes) as usize;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;

        let mut crc_bytes = [0u8; 4];
        reader.read_exact(&mut crc_bytes)?;
        let stored_crc = u32::from_le_bytes(crc_bytes);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&len_bytes);
        hasher.update(&data);
        let crc = hasher.finalize();

        if crc != stored_crc {
            return Err(StoreError::Corruption(format!(
                "checksum mismatch: expected {stored_crc:#010x}, computed {crc:#010x}"
            )));
        }

        Ok(Some(bincode::deserialize(&data)?))
    }
}
