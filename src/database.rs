//! C2: parse the file header, configuration block, and the lazy sequence
//! of directory blocks that make up an mlocate database.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::dirblock::DirBlock;
use crate::error::{AppError, Result};
use crate::reader::ByteReader;

const MAGIC: &[u8; 8] = b"\0mlocate";

/// The four fixed fields at the start of the file, plus the root path.
#[derive(Debug, Clone)]
pub struct Header {
    pub conf_block_size: i32,
    pub file_format: u8,
    pub req_visibility: u8,
    pub root: Vec<u8>,
}

/// Configuration block: an ordered sequence of `(group name, values)`
/// pairs. Opaque to the core; kept around for diagnostic display (`-D`).
#[derive(Debug, Clone, Default)]
pub struct Conf {
    pub groups: Vec<(Vec<u8>, Vec<Vec<u8>>)>,
}

impl Conf {
    pub fn get(&self, key: &[u8]) -> Option<&[Vec<u8>]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }
}

/// Tracks which phase of the format the decoder is in. `open`/`from_reader`
/// read the header and configuration block eagerly in one call, so the
/// decoder is always constructed already in `ConfRead`; only
/// `Streaming -> Streaming` repeats after that, every other transition
/// happens once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    ConfRead,
    Streaming,
    Exhausted,
}

/// An open locate database: header, configuration, and a directory stream.
pub struct Database<R> {
    reader: ByteReader<R>,
    state: DecoderState,
    pub header: Header,
    pub conf: Conf,
}

impl Database<File> {
    /// Opens `path`, reading the header and configuration block eagerly.
    /// The directory stream itself stays lazy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> Database<R> {
    pub fn from_reader(inner: R) -> Result<Self> {
        let mut reader = ByteReader::new(inner);
        let header = Self::read_header(&mut reader)?;
        let conf = Self::read_conf(&mut reader, header.conf_block_size)?;
        Ok(Self {
            reader,
            state: DecoderState::ConfRead,
            header,
            conf,
        })
    }

    fn read_header(reader: &mut ByteReader<R>) -> Result<Header> {
        let magic = reader.read_exact(8)?;
        if magic.as_slice() != MAGIC {
            return Err(AppError::BadMagic);
        }
        let conf_block_size = reader.read_i32_be()?;
        let file_format = reader.read_u8()?;
        let req_visibility = reader.read_u8()?;
        let _padding = reader.read_exact(2)?; // discarded, per the open question in the format doc
        let root = reader.read_cstring()?;
        Ok(Header {
            conf_block_size,
            file_format,
            req_visibility,
            root,
        })
    }

    fn read_conf(reader: &mut ByteReader<R>, conf_block_size: i32) -> Result<Conf> {
        let size = usize::try_from(conf_block_size).map_err(|_| AppError::TruncatedInput)?;
        let block = reader.read_exact(size)?;
        let mut conf = Conf::default();
        let mut group: Vec<Vec<u8>> = Vec::new();
        for piece in block.split(|&b| b == 0) {
            if piece.is_empty() {
                if !group.is_empty() {
                    let key = group.remove(0);
                    conf.groups.push((key, std::mem::take(&mut group)));
                }
                // an empty piece while `group` is already empty just closes
                // an already-closed group, or is the final trailer.
            } else {
                group.push(piece.to_vec());
            }
        }
        Ok(conf)
    }

    /// Returns a lazy iterator over the directory blocks. Each call to
    /// `next()` advances the cursor to the start of the following
    /// directory, whether or not the caller inspected the yielded value.
    pub fn directories(&mut self) -> Directories<'_, R> {
        self.state = DecoderState::Streaming;
        Directories { db: self }
    }
}

/// Iterator over `DirBlock`s, driven strictly by the caller, nothing is
/// buffered ahead of the consumer's own pace.
pub struct Directories<'a, R> {
    db: &'a mut Database<R>,
}

impl<'a, R: Read> Iterator for Directories<'a, R> {
    type Item = Result<DirBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.db.state == DecoderState::Exhausted {
            return None;
        }
        match self.read_one() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.db.state = DecoderState::Exhausted;
                None
            }
            Err(e) => {
                self.db.state = DecoderState::Exhausted;
                Some(Err(e))
            }
        }
    }
}

impl<'a, R: Read> Directories<'a, R> {
    fn read_one(&mut self) -> Result<Option<DirBlock>> {
        let reader = &mut self.db.reader;
        let Some(head) = reader.try_read_exact(16)? else {
            return Ok(None);
        };
        let seconds = i64::from_be_bytes(head[0..8].try_into().unwrap());
        let nanos = i32::from_be_bytes(head[8..12].try_into().unwrap());
        // head[12..16] is padding, discarded.
        let path_bytes = reader.read_cstring()?;

        let mut entries = Vec::new();
        loop {
            let tag = reader.read_u8()?;
            if tag == 2 {
                break;
            }
            let name = reader.read_cstring()?;
            entries.push((tag == 1, name));
        }

        Ok(Some(DirBlock::new(path_bytes, seconds, nanos, entries)))
    }
}
