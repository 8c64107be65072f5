//! Assembly of CFF data containing offsets that are not known until it has been laid out.
//!
//! An `Assembler` holds an ordered list of items. Offset items are slots whose value is supplied
//! by a marker item placed later (or earlier) in the list: when the data is assembled the marker's
//! position is written into its slot, either as is or relative to an index base item.
//!
//! Assembly happens in three passes over the items:
//!
//! 1. **Layout** assigns each item its position in the output.
//! 2. **Resolve** writes the position of each marker into its slot.
//! 3. **Emit** writes the bytes of each item into a buffer of the laid out size.

use std::convert::TryFrom;

use crate::binary::read::ReadScope;
use crate::binary::write::{WriteBinary, WriteBuffer, WriteContext};
use crate::binary::{I32Be, U16Be, U24Be, U32Be, U8};
use crate::cff::Span;
use crate::error::{ParseError, WriteError};

/// The size of a DICT offset slot: the 32-bit integer prefix and its value.
pub const DICT_OFFSET_SIZE: usize = 5;
const LONGINT: u8 = 29;

/// Refers to an offset slot added to an `Assembler`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OffsetRef(usize);

/// Refers to an index base added to an `Assembler`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BaseRef(usize);

/// How the value of an offset slot is encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OffsetEncoding {
    /// A DICT operand in the five byte form.
    Dict,
    /// A big-endian INDEX offset of the given size.
    Index(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Origin {
    Absolute,
    /// INDEX offsets count from 1 at the byte preceding the object data.
    OneBased(BaseRef),
    ZeroBased(BaseRef),
}

#[derive(Debug, Clone)]
enum Item<'a> {
    Range(&'a [u8]),
    Literal {
        size: u8,
        value: usize,
    },
    Bytes(Vec<u8>),
    Offset {
        encoding: OffsetEncoding,
        value: Option<usize>,
    },
    IndexBase,
    Marker {
        target: OffsetRef,
        origin: Origin,
    },
}

/// Builds CFF data from ranges of a source and newly written values.
pub struct Assembler<'a> {
    source: ReadScope<'a>,
    items: Vec<Item<'a>>,
}

impl<'a> Item<'a> {
    fn size(&self) -> usize {
        match self {
            Item::Range(data) => data.len(),
            Item::Literal { size, .. } => usize::from(*size),
            Item::Bytes(bytes) => bytes.len(),
            Item::Offset {
                encoding: OffsetEncoding::Dict,
                ..
            } => DICT_OFFSET_SIZE,
            Item::Offset {
                encoding: OffsetEncoding::Index(off_size),
                ..
            } => usize::from(*off_size),
            Item::IndexBase | Item::Marker { .. } => 0,
        }
    }
}

impl<'a> Assembler<'a> {
    /// Create an empty assembler. Ranges are taken from `source`.
    pub fn new(source: ReadScope<'a>) -> Self {
        Assembler {
            source,
            items: Vec::new(),
        }
    }

    /// Copy the bytes of `span` from the source.
    pub fn push_range(&mut self, span: Span) -> Result<(), ParseError> {
        let data = self.source.offset_length(span.offset, span.length)?.data();
        self.items.push(Item::Range(data));
        Ok(())
    }

    /// A big-endian integer of `size` bytes.
    pub fn push_literal(&mut self, size: u8, value: usize) {
        self.items.push(Item::Literal { size, value });
    }

    pub fn push_u8(&mut self, value: u8) {
        self.push_literal(1, usize::from(value));
    }

    pub fn push_u16(&mut self, value: u16) {
        self.push_literal(2, usize::from(value));
    }

    pub fn push_bytes(&mut self, bytes: Vec<u8>) {
        self.items.push(Item::Bytes(bytes));
    }

    /// A DICT operand slot, filled in by a marker.
    pub fn push_dict_offset(&mut self) -> OffsetRef {
        self.push_offset(OffsetEncoding::Dict)
    }

    /// An INDEX offset slot of `off_size` bytes, filled in by a marker.
    pub fn push_index_offset(&mut self, off_size: u8) -> OffsetRef {
        self.push_offset(OffsetEncoding::Index(off_size))
    }

    fn push_offset(&mut self, encoding: OffsetEncoding) -> OffsetRef {
        let offset = OffsetRef(self.items.len());
        self.items.push(Item::Offset {
            encoding,
            value: None,
        });
        offset
    }

    /// A zero sized anchor that relative markers are measured from.
    pub fn push_index_base(&mut self) -> BaseRef {
        let base = BaseRef(self.items.len());
        self.items.push(Item::IndexBase);
        base
    }

    /// Set `target` to the position of this marker.
    pub fn push_marker(&mut self, target: OffsetRef) {
        self.push_marker_with_origin(target, Origin::Absolute);
    }

    /// Set `target` to the position of this marker as a 1-based INDEX offset from `base`.
    pub fn push_index_marker(&mut self, target: OffsetRef, base: BaseRef) {
        self.push_marker_with_origin(target, Origin::OneBased(base));
    }

    /// Set `target` to the distance from `base` to this marker.
    pub fn push_relative_marker(&mut self, target: OffsetRef, base: BaseRef) {
        self.push_marker_with_origin(target, Origin::ZeroBased(base));
    }

    fn push_marker_with_origin(&mut self, target: OffsetRef, origin: Origin) {
        self.items.push(Item::Marker { target, origin });
    }

    /// Lay out, resolve and write all items.
    pub fn assemble(mut self) -> Result<Vec<u8>, WriteError> {
        let (positions, length) = self.layout();
        self.resolve(&positions)?;
        self.emit(&positions, length)
    }

    /// The position of each item and the total length.
    fn layout(&self) -> (Vec<usize>, usize) {
        let mut position = 0;
        let positions = self
            .items
            .iter()
            .map(|item| {
                let start = position;
                position += item.size();
                start
            })
            .collect();
        (positions, position)
    }

    fn resolve(&mut self, positions: &[usize]) -> Result<(), WriteError> {
        for (index, &position) in positions.iter().enumerate() {
            let (target, origin) = match self.items.get(index) {
                Some(Item::Marker { target, origin }) => (*target, *origin),
                _ => continue,
            };
            let resolved = match origin {
                Origin::Absolute => position,
                Origin::OneBased(base) => self.distance_from(base, position, positions)? + 1,
                Origin::ZeroBased(base) => self.distance_from(base, position, positions)?,
            };

            match self.items.get_mut(target.0) {
                Some(Item::Offset { value, .. }) => {
                    if value.is_some() {
                        return Err(WriteError::PlaceholderMismatch);
                    }
                    *value = Some(resolved);
                }
                _ => return Err(WriteError::BadValue),
            }
        }

        Ok(())
    }

    fn distance_from(
        &self,
        base: BaseRef,
        position: usize,
        positions: &[usize],
    ) -> Result<usize, WriteError> {
        match (self.items.get(base.0), positions.get(base.0)) {
            (Some(Item::IndexBase), Some(&base_position)) => position
                .checked_sub(base_position)
                .ok_or(WriteError::BadValue),
            _ => Err(WriteError::BadValue),
        }
    }

    fn emit(self, positions: &[usize], length: usize) -> Result<Vec<u8>, WriteError> {
        let mut buffer = WriteBuffer::with_capacity(length);
        for (item, &position) in self.items.iter().zip(positions) {
            if buffer.bytes_written() != position {
                return Err(WriteError::PlaceholderMismatch);
            }

            match item {
                Item::Range(data) => buffer.write_bytes(data)?,
                Item::Literal { size, value } => write_sized(&mut buffer, *size, *value)?,
                Item::Bytes(bytes) => buffer.write_bytes(bytes)?,
                Item::Offset { encoding, value } => {
                    let value = value.ok_or(WriteError::UnresolvedPlaceholder)?;
                    match encoding {
                        OffsetEncoding::Dict => {
                            U8::write(&mut buffer, LONGINT)?;
                            I32Be::write(&mut buffer, i32::try_from(value)?)?;
                        }
                        OffsetEncoding::Index(off_size) => {
                            write_sized(&mut buffer, *off_size, value)?
                        }
                    }
                }
                Item::IndexBase | Item::Marker { .. } => {}
            }
        }

        if buffer.len() != length {
            return Err(WriteError::PlaceholderMismatch);
        }

        Ok(buffer.into_inner())
    }
}

fn write_sized<C: WriteContext>(ctxt: &mut C, size: u8, value: usize) -> Result<(), WriteError> {
    match size {
        1 => U8::write(ctxt, u8::try_from(value)?),
        2 => U16Be::write(ctxt, u16::try_from(value)?),
        3 => U24Be::write(ctxt, u32::try_from(value)?),
        4 => U32Be::write(ctxt, u32::try_from(value)?),
        _ => Err(WriteError::BadValue),
    }
}
