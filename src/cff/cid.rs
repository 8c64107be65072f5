//! Conversion of a font to a standalone CID-keyed CFF.
//!
//! The output holds a single font. CID-keyed fonts are copied through with their own FDArray,
//! FDSelect and charset. Name-keyed fonts are given an identity mapping from glyph id to CID and
//! a single Font DICT that holds their Private DICT.

use std::convert::TryFrom;

use log::{debug, warn};

use super::assembler::{Assembler, BaseRef, OffsetRef, DICT_OFFSET_SIZE};
use super::dict::{write_dict_entry, DictEntry, DictParser, Operand, Operator};
use super::{offset_size, CIDData, Font, PrivateDict, Span, CFF, SID, STANDARD_STRINGS};
use crate::binary::write::{WriteBinary, WriteBuffer};
use crate::error::{ParseError, ReadWriteError, WriteError};

const MAX_NAME_LENGTH: usize = 127;
const ONE_RANGE_SUFFIX: &[u8] = b"-OneRange";
/// A Private entry: size and offset slots followed by the operator.
const PRIVATE_ENTRY_LENGTH: usize = 2 * DICT_OFFSET_SIZE + 1;

/// Settings for `CFF::to_cid_with_options`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Registry of the ROS given to fonts that are not CID-keyed.
    pub registry: String,
    /// Ordering of the ROS given to fonts that are not CID-keyed.
    pub ordering: String,
    /// Supplement of the ROS given to fonts that are not CID-keyed.
    pub supplement: i32,
    /// Give the Font DICT of a converted name-keyed font a FontName entry.
    pub font_dict_name: bool,
}

/// Offset slots in the Top DICT of the output.
struct TopDictOffsets {
    fd_array: OffsetRef,
    fd_select: OffsetRef,
    charset: OffsetRef,
    char_strings: OffsetRef,
}

/// Slots of a Private entry in a Font DICT.
struct PrivateOffsets {
    length: OffsetRef,
    offset: OffsetRef,
}

struct Converter<'c, 'a> {
    cff: &'c CFF<'a>,
    font: &'c Font<'a>,
    options: &'c ConversionOptions,
    asm: Assembler<'a>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            registry: String::from("Adobe"),
            ordering: String::from("Identity"),
            supplement: 0,
            font_dict_name: false,
        }
    }
}

impl<'a> CFF<'a> {
    /// Convert the named font to a CFF holding only that font, in CID-keyed form.
    ///
    /// Returns `Ok(None)` if there is no font with that name.
    pub fn to_cid(&self, name: &str) -> Result<Option<Vec<u8>>, ReadWriteError> {
        self.to_cid_with_options(name, &ConversionOptions::default())
    }

    pub fn to_cid_with_options(
        &self,
        name: &str,
        options: &ConversionOptions,
    ) -> Result<Option<Vec<u8>>, ReadWriteError> {
        let font = match self.font(name) {
            Some(font) => font,
            None => {
                debug!("no font named '{}'", name);
                return Ok(None);
            }
        };

        debug!(
            "converting '{}' ({} glyphs, CID-keyed: {})",
            name,
            font.n_glyphs(),
            font.is_cid_keyed()
        );
        let converter = Converter {
            cff: self,
            font,
            options,
            asm: Assembler::new(self.scope()),
        };
        let data = converter.convert()?;
        debug!("converted '{}' into {} bytes", name, data.len());

        Ok(Some(data))
    }
}

impl<'c, 'a> Converter<'c, 'a> {
    fn convert(mut self) -> Result<Vec<u8>, ReadWriteError> {
        let font = self.font;
        if font.n_glyphs() == 0 {
            return Err(ParseError::BadValue.into());
        }

        let top_dict_entries =
            DictParser::new(self.cff.scope(), font.top_dict)?.collect::<Result<Vec<_>, _>>()?;

        self.asm
            .push_range(Span::new(0, usize::from(self.cff.header.hdr_size)))?;
        self.push_index_header(&[font.name_data.len()])?;
        self.asm.push_bytes(font.name_data.to_vec());
        let offsets = self.push_top_dict_index(&top_dict_entries)?;
        self.push_string_index()?;
        self.asm.push_range(self.cff.global_subr_index.span())?;

        if font.is_cid_keyed() {
            let cid_data = font.cid_data.as_ref().ok_or(ParseError::MissingValue)?;
            self.push_cid_tables(cid_data, &offsets)?;
        } else {
            self.push_synthesized_tables(&offsets)?;
        }

        self.asm.push_marker(offsets.char_strings);
        self.asm.push_range(font.char_strings_index.span())?;

        Ok(self.asm.assemble()?)
    }

    /// The SID of the first string added to the String INDEX.
    fn first_added_sid(&self) -> usize {
        STANDARD_STRINGS.len() + self.cff.string_index.count
    }

    /// Strings added to the String INDEX of a converted name-keyed font.
    fn added_strings(&self) -> Vec<Vec<u8>> {
        let mut name = self.font.name_data.to_vec();
        name.extend_from_slice(ONE_RANGE_SUFFIX);
        name.truncate(MAX_NAME_LENGTH);

        vec![
            self.options.registry.as_bytes().to_vec(),
            self.options.ordering.as_bytes().to_vec(),
            name,
        ]
    }

    fn push_index_header(&mut self, lengths: &[usize]) -> Result<(), WriteError> {
        self.asm.push_u16(u16::try_from(lengths.len())?);
        if lengths.is_empty() {
            return Ok(());
        }

        let data_len = lengths.iter().sum::<usize>();
        let off_size = offset_size(data_len + 1).ok_or(WriteError::BadValue)?;
        self.asm.push_u8(off_size);
        let mut offset = 1;
        self.asm.push_literal(off_size, offset);
        for length in lengths {
            offset += length;
            self.asm.push_literal(off_size, offset);
        }

        Ok(())
    }

    fn push_top_dict_index(
        &mut self,
        entries: &[DictEntry],
    ) -> Result<TopDictOffsets, ReadWriteError> {
        let font = self.font;
        let is_cid_keyed = font.is_cid_keyed();
        let ros = entries
            .iter()
            .filter(|entry| entry.operator() == Some(Operator::ROS))
            .collect::<Vec<_>>();
        let copied = entries
            .iter()
            .filter(|entry| copy_top_dict_entry(entry, is_cid_keyed))
            .collect::<Vec<_>>();
        let synthesized = if is_cid_keyed {
            Vec::new()
        } else {
            self.synthesized_ros()?
        };

        let dict_length = synthesized.len()
            + ros.iter().chain(&copied).map(|entry| entry.span.length).sum::<usize>()
            + [
                Operator::FDArray,
                Operator::FDSelect,
                Operator::Charset,
                Operator::CharStrings,
            ]
            .iter()
            .map(|&operator| offset_entry_length(operator))
            .sum::<usize>();
        let off_size = offset_size(dict_length + 1).ok_or(WriteError::BadValue)?;

        self.asm.push_u16(1);
        self.asm.push_u8(off_size);
        self.asm.push_literal(off_size, 1);
        let end = self.asm.push_index_offset(off_size);
        let base = self.asm.push_index_base();

        // ROS must be the first entry of a CIDFont Top DICT
        if is_cid_keyed {
            for entry in ros {
                self.asm.push_range(entry.span)?;
            }
        } else {
            self.asm.push_bytes(synthesized);
        }

        let offsets = TopDictOffsets {
            fd_array: self.push_offset_entry(Operator::FDArray)?,
            fd_select: self.push_offset_entry(Operator::FDSelect)?,
            charset: self.push_offset_entry(Operator::Charset)?,
            char_strings: self.push_offset_entry(Operator::CharStrings)?,
        };

        for entry in copied {
            self.asm.push_range(entry.span)?;
        }
        self.asm.push_index_marker(end, base);

        Ok(offsets)
    }

    /// ROS and CIDCount entries for a name-keyed font.
    fn synthesized_ros(&self) -> Result<Vec<u8>, WriteError> {
        let registry = self.first_added_sid();
        // The last added string must have a valid SID
        SID::try_from(registry + 2)?;

        let mut buffer = WriteBuffer::new();
        write_dict_entry(
            &mut buffer,
            Operator::ROS,
            &[
                Operand::Integer(i32::try_from(registry)?),
                Operand::Integer(i32::try_from(registry + 1)?),
                Operand::Integer(self.options.supplement),
            ],
        )?;
        write_dict_entry(
            &mut buffer,
            Operator::CIDCount,
            &[Operand::Integer(i32::try_from(self.font.n_glyphs())?)],
        )?;

        Ok(buffer.into_inner())
    }

    fn push_offset_entry(&mut self, operator: Operator) -> Result<OffsetRef, WriteError> {
        let offset = self.asm.push_dict_offset();
        self.asm.push_bytes(encode_operator(operator)?);
        Ok(offset)
    }

    fn push_private_entry(&mut self) -> Result<PrivateOffsets, WriteError> {
        let length = self.asm.push_dict_offset();
        let offset = self.push_offset_entry(Operator::Private)?;
        Ok(PrivateOffsets { length, offset })
    }

    fn push_string_index(&mut self) -> Result<(), ReadWriteError> {
        let string_index = &self.cff.string_index;
        if self.font.is_cid_keyed() {
            self.asm.push_range(string_index.span())?;
            return Ok(());
        }

        let added = self.added_strings();
        let data_span = string_index.data_span();
        let data_len = data_span.length + added.iter().map(Vec::len).sum::<usize>();
        let count = u16::try_from(string_index.count + added.len()).map_err(WriteError::from)?;
        let off_size = offset_size(data_len + 1).ok_or(WriteError::BadValue)?;

        self.asm.push_u16(count);
        self.asm.push_u8(off_size);
        // Existing offsets rebased to count from 1 at the start of the object data
        for &offset in string_index.offsets() {
            self.asm.push_literal(off_size, offset - data_span.offset + 1);
        }
        let mut offset = data_span.length + 1;
        for string in &added {
            offset += string.len();
            self.asm.push_literal(off_size, offset);
        }

        self.asm.push_range(data_span)?;
        for string in added {
            self.asm.push_bytes(string);
        }

        Ok(())
    }

    fn push_cid_tables(
        &mut self,
        cid_data: &CIDData<'a>,
        offsets: &TopDictOffsets,
    ) -> Result<(), ReadWriteError> {
        let font = self.font;
        self.asm.push_marker(offsets.fd_select);
        self.asm.push_range(cid_data.fd_select_span)?;

        self.asm.push_marker(offsets.charset);
        match font.charset_span {
            Some(span) => self.asm.push_range(span)?,
            None => {
                warn!(
                    "CID-keyed font '{}' has a predefined charset, writing an identity charset",
                    font.name
                );
                self.push_identity_charset()?;
            }
        }

        self.asm.push_marker(offsets.fd_array);
        let private_offsets = self.push_fd_array(cid_data)?;
        for (font_dict, private_offsets) in cid_data.font_dicts.iter().zip(private_offsets) {
            if let Some(private_offsets) = private_offsets {
                self.push_private_dict(font_dict.private_dict.as_ref(), private_offsets)?;
            }
        }

        Ok(())
    }

    /// Rebuild the FDArray with new Private entries.
    fn push_fd_array(
        &mut self,
        cid_data: &CIDData<'a>,
    ) -> Result<Vec<Option<PrivateOffsets>>, ReadWriteError> {
        let scope = self.cff.scope();
        let mut font_dict_entries = Vec::with_capacity(cid_data.font_dicts.len());
        for font_dict in &cid_data.font_dicts {
            let mut spans = Vec::new();
            for entry in DictParser::new(scope, font_dict.span)? {
                let entry = entry?;
                if entry.operator() != Some(Operator::Private) {
                    spans.push(entry.span);
                }
            }
            font_dict_entries.push(spans);
        }

        let lengths = font_dict_entries
            .iter()
            .zip(&cid_data.font_dicts)
            .map(|(spans, font_dict)| {
                let private_length = font_dict
                    .private_dict
                    .as_ref()
                    .map_or(0, |_| PRIVATE_ENTRY_LENGTH);
                spans.iter().map(|span| span.length).sum::<usize>() + private_length
            })
            .collect::<Vec<_>>();
        self.push_index_header(&lengths)?;

        let mut private_offsets = Vec::with_capacity(lengths.len());
        for (spans, font_dict) in font_dict_entries.iter().zip(&cid_data.font_dicts) {
            for &span in spans {
                self.asm.push_range(span)?;
            }
            let offsets = match font_dict.private_dict {
                Some(_) => Some(self.push_private_entry()?),
                None => None,
            };
            private_offsets.push(offsets);
        }

        Ok(private_offsets)
    }

    /// FDSelect, charset and FDArray for a name-keyed font.
    fn push_synthesized_tables(&mut self, offsets: &TopDictOffsets) -> Result<(), ReadWriteError> {
        let font = self.font;
        let n_glyphs = u16::try_from(font.n_glyphs()).map_err(WriteError::from)?;

        // Format 3 with a single range selecting the only Font DICT
        self.asm.push_marker(offsets.fd_select);
        self.asm.push_u8(3);
        self.asm.push_u16(1);
        self.asm.push_u16(0);
        self.asm.push_u8(0);
        self.asm.push_u16(n_glyphs);

        self.asm.push_marker(offsets.charset);
        self.push_identity_charset()?;

        self.asm.push_marker(offsets.fd_array);
        let font_name = if self.options.font_dict_name {
            let sid = self.first_added_sid() + 2;
            let mut buffer = WriteBuffer::new();
            write_dict_entry(
                &mut buffer,
                Operator::FontName,
                &[Operand::Integer(
                    i32::try_from(sid).map_err(WriteError::from)?,
                )],
            )?;
            buffer.into_inner()
        } else {
            Vec::new()
        };
        self.push_index_header(&[font_name.len() + PRIVATE_ENTRY_LENGTH])?;
        self.asm.push_bytes(font_name);
        let private_offsets = self.push_private_entry()?;
        self.push_private_dict(font.private_dict.as_ref(), private_offsets)
    }

    /// Charset mapping each glyph id to the same CID.
    fn push_identity_charset(&mut self) -> Result<(), WriteError> {
        let n_glyphs = self.font.n_glyphs();
        if n_glyphs > 1 {
            // Format 2 with one range starting after .notdef
            self.asm.push_u8(2);
            self.asm.push_u16(1);
            self.asm.push_u16(u16::try_from(n_glyphs - 2)?);
        } else {
            // Format 0 with no glyphs besides .notdef
            self.asm.push_u8(0);
        }

        Ok(())
    }

    /// Copy a Private DICT, relocating its local subroutines to directly follow it.
    ///
    /// When there is no Private DICT an empty one is written.
    fn push_private_dict(
        &mut self,
        private_dict: Option<&PrivateDict<'a>>,
        offsets: PrivateOffsets,
    ) -> Result<(), ReadWriteError> {
        self.asm.push_marker(offsets.offset);
        let base: BaseRef = self.asm.push_index_base();

        let mut subrs = None;
        if let Some(private_dict) = private_dict {
            for entry in DictParser::new(self.cff.scope(), private_dict.span)? {
                let entry = entry?;
                if entry.operator() != Some(Operator::Subrs) {
                    self.asm.push_range(entry.span)?;
                }
            }

            if let Some(local_subr_index) = &private_dict.local_subr_index {
                let offset = self.push_offset_entry(Operator::Subrs)?;
                subrs = Some((offset, local_subr_index.span()));
            }
        }

        // The Subrs offset is relative to the start of the Private DICT
        self.asm.push_relative_marker(offsets.length, base);
        if let Some((offset, span)) = subrs {
            self.asm.push_relative_marker(offset, base);
            self.asm.push_range(span)?;
        }

        Ok(())
    }
}

/// Whether a Top DICT entry is copied after the offset entries.
fn copy_top_dict_entry(entry: &DictEntry, is_cid_keyed: bool) -> bool {
    match entry.operator() {
        Some(
            Operator::ROS
            | Operator::Encoding
            | Operator::Private
            | Operator::FDArray
            | Operator::FDSelect
            | Operator::Charset
            | Operator::CharStrings,
        ) => false,
        Some(Operator::CIDCount) => is_cid_keyed,
        _ => true,
    }
}

fn encode_operator(operator: Operator) -> Result<Vec<u8>, WriteError> {
    let mut buffer = WriteBuffer::new();
    Operator::write(&mut buffer, operator)?;
    Ok(buffer.into_inner())
}

/// Size of an entry holding one offset slot.
fn offset_entry_length(operator: Operator) -> usize {
    let operator_length = if operator as u16 > 0xFF { 2 } else { 1 };
    DICT_OFFSET_SIZE + operator_length
}
