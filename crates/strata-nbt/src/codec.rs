//! Binary (big-endian) encoding of tag documents.
//!
//! Two framings are supported:
//!
//! - a named root compound ([`NbtFile`]), as stored in chunk files, optionally
//!   gzip-compressed;
//! - a headless compound body ([`encode_compound`] / [`decode_compound`]): the
//!   named children followed by an end tag, with the empty compound encoded as
//!   zero bytes. This is the form embedded in interchange messages.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::NbtError;
use crate::tag::{Compound, Tag, TagType};

/// Deepest nesting of compounds and lists accepted on read or write.
pub const MAX_DEPTH: usize = 512;

/// A complete document: a named root compound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NbtFile {
    /// Name of the root tag (usually empty).
    pub name: String,
    /// Root compound.
    pub root: Compound,
}

impl NbtFile {
    pub fn new(name: impl Into<String>, root: Compound) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    /// Reads an uncompressed document.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, NbtError> {
        let id = reader.read_u8()?;
        let tag_type = TagType::from_id(id).ok_or(NbtError::InvalidTagType(id))?;
        if tag_type != TagType::Compound {
            return Err(NbtError::RootNotCompound(tag_type));
        }
        let name = read_string(reader)?;
        let root = read_compound_body(reader, 0)?;
        Ok(Self { name, root })
    }

    /// Writes an uncompressed document.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), NbtError> {
        writer.write_u8(TagType::Compound.id())?;
        write_string(writer, &self.name)?;
        write_compound_body(writer, &self.root, 0)
    }

    /// Reads a gzip-compressed document.
    pub fn read_gzip<R: Read>(reader: R) -> Result<Self, NbtError> {
        let mut decoder = GzDecoder::new(reader);
        Self::read(&mut decoder)
    }

    /// Writes a gzip-compressed document.
    pub fn write_gzip<W: Write>(&self, writer: W) -> Result<(), NbtError> {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        self.write(&mut encoder)?;
        encoder.finish()?;
        Ok(())
    }
}

/// Encodes a compound body. The empty compound encodes to zero bytes.
pub fn encode_compound(compound: &Compound) -> Result<Vec<u8>, NbtError> {
    if compound.is_empty() {
        return Ok(Vec::new());
    }
    let mut buffer = Vec::new();
    write_compound_body(&mut buffer, compound, 0)?;
    Ok(buffer)
}

/// Decodes a compound body produced by [`encode_compound`]. Zero bytes decode
/// to the empty compound.
pub fn decode_compound(bytes: &[u8]) -> Result<Compound, NbtError> {
    if bytes.is_empty() {
        return Ok(Compound::new());
    }
    read_compound_body(&mut Cursor::new(bytes), 0)
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, NbtError> {
    let len = reader.read_u16::<BigEndian>()?;
    let mut bytes = vec![0u8; len as usize];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<(), NbtError> {
    let len = u16::try_from(value.len()).map_err(|_| NbtError::TooLong("string"))?;
    writer.write_u16::<BigEndian>(len)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

fn read_len<R: Read>(reader: &mut R) -> Result<usize, NbtError> {
    let len = reader.read_i32::<BigEndian>()?;
    usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<(), NbtError> {
    let len = i32::try_from(len).map_err(|_| NbtError::TooLong("array"))?;
    writer.write_i32::<BigEndian>(len)?;
    Ok(())
}

/// Reads `len` bytes without trusting `len` for the allocation size.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, NbtError> {
    let mut bytes = Vec::with_capacity(len.min(64 * 1024));
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(NbtError::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(bytes)
}

/// Nesting level of a child of a tag at `depth`.
fn nested(depth: usize) -> Result<usize, NbtError> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep(MAX_DEPTH));
    }
    Ok(depth)
}

fn read_compound_body<R: Read>(reader: &mut R, depth: usize) -> Result<Compound, NbtError> {
    let mut compound = Compound::new();
    loop {
        let id = reader.read_u8()?;
        let tag_type = TagType::from_id(id).ok_or(NbtError::InvalidTagType(id))?;
        if tag_type == TagType::End {
            return Ok(compound);
        }
        let name = read_string(reader)?;
        let tag = read_payload(reader, tag_type, depth)?;
        compound.insert(name, tag);
    }
}

fn write_compound_body<W: Write>(
    writer: &mut W,
    compound: &Compound,
    depth: usize,
) -> Result<(), NbtError> {
    for (name, tag) in compound {
        writer.write_u8(tag.tag_type().id())?;
        write_string(writer, name)?;
        write_payload(writer, tag, depth)?;
    }
    writer.write_u8(TagType::End.id())?;
    Ok(())
}

fn read_payload<R: Read>(
    reader: &mut R,
    tag_type: TagType,
    depth: usize,
) -> Result<Tag, NbtError> {
    Ok(match tag_type {
        // End only appears as a terminator or as the element type of empty lists.
        TagType::End => return Err(NbtError::InvalidTagType(0)),
        TagType::Byte => Tag::Byte(reader.read_i8()?),
        TagType::Short => Tag::Short(reader.read_i16::<BigEndian>()?),
        TagType::Int => Tag::Int(reader.read_i32::<BigEndian>()?),
        TagType::Long => Tag::Long(reader.read_i64::<BigEndian>()?),
        TagType::Float => Tag::Float(reader.read_f32::<BigEndian>()?),
        TagType::Double => Tag::Double(reader.read_f64::<BigEndian>()?),
        TagType::ByteArray => {
            let len = read_len(reader)?;
            let bytes = read_bytes(reader, len)?;
            Tag::ByteArray(bytes.into_iter().map(|b| b as i8).collect())
        }
        TagType::String => Tag::String(read_string(reader)?),
        TagType::List => {
            let id = reader.read_u8()?;
            let element_type = TagType::from_id(id).ok_or(NbtError::InvalidTagType(id))?;
            let len = read_len(reader)?;
            let depth = nested(depth)?;
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(read_payload(reader, element_type, depth)?);
            }
            Tag::List(items)
        }
        TagType::Compound => Tag::Compound(read_compound_body(reader, nested(depth)?)?),
        TagType::IntArray => {
            let len = read_len(reader)?;
            let byte_len = len.checked_mul(4).ok_or(NbtError::TooLong("array"))?;
            let bytes = read_bytes(reader, byte_len)?;
            let ints = bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            Tag::IntArray(ints)
        }
        TagType::LongArray => {
            let len = read_len(reader)?;
            let byte_len = len.checked_mul(8).ok_or(NbtError::TooLong("array"))?;
            let bytes = read_bytes(reader, byte_len)?;
            let longs = bytes
                .chunks_exact(8)
                .map(|c| i64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect();
            Tag::LongArray(longs)
        }
    })
}

fn write_payload<W: Write>(writer: &mut W, tag: &Tag, depth: usize) -> Result<(), NbtError> {
    match tag {
        Tag::Byte(v) => writer.write_i8(*v)?,
        Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
        Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
        Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
        Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
        Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
        Tag::ByteArray(bytes) => {
            write_len(writer, bytes.len())?;
            for &b in bytes {
                writer.write_i8(b)?;
            }
        }
        Tag::String(s) => write_string(writer, s)?,
        Tag::List(items) => {
            let element_type = tag.list_element_type().unwrap_or(TagType::End);
            if let Some(stray) = items.iter().find(|item| item.tag_type() != element_type) {
                return Err(NbtError::MixedList {
                    expected: element_type,
                    found: stray.tag_type(),
                });
            }
            let depth = nested(depth)?;
            writer.write_u8(element_type.id())?;
            write_len(writer, items.len())?;
            for item in items {
                write_payload(writer, item, depth)?;
            }
        }
        Tag::Compound(compound) => write_compound_body(writer, compound, nested(depth)?)?,
        Tag::IntArray(ints) => {
            write_len(writer, ints.len())?;
            for &i in ints {
                writer.write_i32::<BigEndian>(i)?;
            }
        }
        Tag::LongArray(longs) => {
            write_len(writer, longs.len())?;
            for &l in longs {
                writer.write_i64::<BigEndian>(l)?;
            }
        }
    }
    Ok(())
}
