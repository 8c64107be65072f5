//! CFF font set handling.
//!
//! A CFF font set is parsed into a `CFF` value that records, for each font, where each of its
//! tables lives in the source data. Fonts can then be converted into a standalone CID-keyed CFF
//! with `CFF::to_cid`.
//!
//! Refer to [Technical Note #5176](http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/font/pdfs/5176.CFF.pdf)
//! for more information.

use std::convert::{TryFrom, TryInto};
use std::iter;

use byteorder::{BigEndian, ByteOrder};
use itertools::Itertools;
use num_traits as num;

use crate::binary::read::{
    CheckIndex, ReadArray, ReadBinary, ReadBinaryDep, ReadCtxt, ReadFrom, ReadScope, ReadUnchecked,
};
use crate::binary::{U16Be, U8};
use crate::error::ParseError;

pub mod assembler;
mod cid;
pub mod dict;

use dict::{DictParser, Operator};

pub use cid::ConversionOptions;

const DEFAULT_CHARSTRING_TYPE: i32 = 2;

/// A string id in the font
pub type SID = u16;

/// A contiguous region of the CFF data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

/// Top level representation of a CFF font set.
///
/// Refer to Technical Note #5176
#[derive(Clone, Debug)]
pub struct CFF<'a> {
    scope: ReadScope<'a>,
    pub header: Header,
    pub name_index: Index<'a>,
    pub top_dict_index: Index<'a>,
    pub string_index: Index<'a>,
    pub global_subr_index: Index<'a>,
    pub fonts: Vec<Font<'a>>,
}

/// CFF Font Header described in Section 6 of Technical Note #5176
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub major: u8,
    pub minor: u8,
    pub hdr_size: u8,
    pub off_size: u8,
}

/// A CFF INDEX described in Section 5 of Technical Note #5176
///
/// Offsets are absolute positions in the CFF data. An INDEX with `count` objects has `count + 1`
/// offsets, the last being the end of the object data. An empty INDEX has a single offset equal
/// to its end.
#[derive(Clone, Debug)]
pub struct Index<'a> {
    pub count: usize,
    pub off_size: u8,
    start: usize,
    offsets: Vec<usize>,
    data_array: &'a [u8],
}

/// A single font within a CFF font set
#[derive(Clone, Debug)]
pub struct Font<'a> {
    /// The name from the Name INDEX, decoded as Latin-1.
    pub name: String,
    pub name_data: &'a [u8],
    /// Location of the Top DICT of this font.
    pub top_dict: Span,
    pub full_name: Option<String>,
    /// Present for CID-keyed fonts.
    pub ros: Option<ROS>,
    pub cid_count: Option<i32>,
    pub charstring_type: i32,
    pub char_strings_index: Index<'a>,
    pub charset: Charset<'a>,
    /// Location of a custom charset.
    pub charset_span: Option<Span>,
    pub encoding_offset: Option<usize>,
    pub private_dict: Option<PrivateDict<'a>>,
    pub cid_data: Option<CIDData<'a>>,
}

/// Registry, Ordering, Supplement of a CID-keyed font
#[derive(Clone, Debug, PartialEq)]
pub struct ROS {
    pub registry: SID,
    pub ordering: SID,
    pub supplement: i32,
}

/// Location of a Private DICT and its local subroutines
#[derive(Clone, Debug)]
pub struct PrivateDict<'a> {
    pub span: Span,
    pub local_subr_index: Option<Index<'a>>,
}

/// A Font DICT from the FDArray of a CID-keyed font
#[derive(Clone, Debug)]
pub struct FontDict<'a> {
    pub span: Span,
    pub font_name: Option<SID>,
    pub private_dict: Option<PrivateDict<'a>>,
}

/// The tables specific to CID-keyed fonts
#[derive(Clone, Debug)]
pub struct CIDData<'a> {
    /// The FDArray INDEX
    pub font_dict_index: Index<'a>,
    pub font_dicts: Vec<FontDict<'a>>,
    pub fd_select: FDSelect<'a>,
    pub fd_select_span: Span,
}

#[derive(Clone, Debug)]
pub enum Charset<'a> {
    ISOAdobe,
    Expert,
    ExpertSubset,
    Custom(CustomCharset<'a>),
}

#[derive(Clone, Debug)]
pub enum CustomCharset<'a> {
    Format0 {
        glyphs: ReadArray<'a, U16Be>,
    },
    Format1 {
        ranges: ReadArray<'a, Range<SID, u8>>,
    },
    Format2 {
        ranges: ReadArray<'a, Range<SID, u16>>,
    },
}

/// A Range from `first` to `first + n_left`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Range<F, N> {
    pub first: F,
    pub n_left: N,
}

/// Font DICT select as described in Section 19 of Technical Note #5176
#[derive(Clone, Debug)]
pub enum FDSelect<'a> {
    Format0 {
        glyph_font_dict_indices: ReadArray<'a, U8>,
    },
    // Formats 1 and 2 are not defined
    Format3 {
        ranges: ReadArray<'a, Range<u16, u8>>,
        sentinel: u16,
    },
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Span {
        Span { offset, length }
    }

    /// The position one past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl<'b> ReadBinary for CFF<'b> {
    type HostType<'a> = CFF<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        // Offsets in the DICTs are relative to the start of the CFF data, so rebase the scope
        // in case it was obtained from within a larger file.
        let scope = ReadScope::new(ctxt.scope().data());
        let mut ctxt = scope.ctxt();

        let header = ctxt.read::<Header>()?;
        let name_index = ctxt.read::<Index<'_>>()?;
        let top_dict_index = ctxt.read::<Index<'_>>()?;
        let string_index = ctxt.read::<Index<'_>>()?;
        let global_subr_index = ctxt.read::<Index<'_>>()?;
        ctxt.check_index(top_dict_index.count >= name_index.count)?;

        let fonts = (0..name_index.count)
            .map(|index| {
                let name_data = name_index.read_object(index).ok_or(ParseError::BadIndex)?;
                let top_dict = top_dict_index
                    .object_span(index)
                    .ok_or(ParseError::BadIndex)?;
                read_font(scope, &string_index, name_data, top_dict)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CFF {
            scope,
            header,
            name_index,
            top_dict_index,
            string_index,
            global_subr_index,
            fonts,
        })
    }
}

impl<'a> CFF<'a> {
    /// The scope of the whole CFF data.
    pub fn scope(&self) -> ReadScope<'a> {
        self.scope
    }

    /// Read a string with the given SID from the standard strings or the String INDEX
    pub fn read_string(&self, sid: SID) -> Result<&'a str, ParseError> {
        read_string_index_string(&self.string_index, sid)
    }

    /// The names of the fonts in this font set, in the order they appear.
    pub fn font_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fonts.iter().map(|font| font.name.as_str())
    }

    /// Look up a font by name.
    pub fn font(&self, name: &str) -> Option<&Font<'a>> {
        self.fonts.iter().find(|font| font.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.font(name).is_some()
    }

    /// Returns `true` if the named font is CID-keyed, `false` if it is not or is absent.
    pub fn is_cid_keyed(&self, name: &str) -> bool {
        self.font(name).map_or(false, Font::is_cid_keyed)
    }

    /// Returns `true` if the first font in the set is CID-keyed.
    pub fn first_is_cid_keyed(&self) -> bool {
        self.fonts.first().map_or(false, Font::is_cid_keyed)
    }

    /// Read the INDEX located at `offset`.
    pub fn index_at(&self, offset: usize) -> Result<Index<'a>, ParseError> {
        read_index_at(self.scope, offset)
    }
}

impl<'a> Font<'a> {
    pub fn is_cid_keyed(&self) -> bool {
        self.ros.is_some()
    }

    /// The number of glyphs, which is the number of CharStrings.
    pub fn n_glyphs(&self) -> usize {
        self.char_strings_index.count
    }
}

/// Read a string with the given SID from the String INDEX
fn read_string_index_string<'a>(string_index: &Index<'a>, sid: SID) -> Result<&'a str, ParseError> {
    let sid = usize::from(sid);
    // When the client needs to determine the string that corresponds to a particular SID it
    // performs the following: test if SID is in standard range then fetch from internal table,
    // otherwise, fetch string from the String INDEX using a value of (SID – nStdStrings) as
    // the index
    if let Some(string) = STANDARD_STRINGS.get(sid).copied() {
        Ok(string)
    } else {
        let bytes = string_index
            .read_object(sid - STANDARD_STRINGS.len())
            .ok_or(ParseError::BadIndex)?;

        std::str::from_utf8(bytes).map_err(|_utf8_err| ParseError::BadValue)
    }
}

fn read_index_at<'a>(scope: ReadScope<'a>, offset: usize) -> Result<Index<'a>, ParseError> {
    let mut ctxt = scope.ctxt();
    ctxt.seek(offset)?;
    ctxt.read::<Index<'_>>()
}

fn read_font<'a>(
    scope: ReadScope<'a>,
    string_index: &Index<'a>,
    name_data: &'a [u8],
    top_dict: Span,
) -> Result<Font<'a>, ParseError> {
    let mut ros = None;
    let mut cid_count = None;
    let mut full_name = None;
    let mut charstring_type = DEFAULT_CHARSTRING_TYPE;
    let mut char_strings_index = None;
    let mut charset_offset = 0; // ISOAdobe
    let mut encoding_offset = None;
    let mut private_span = None;
    let mut fd_array_offset = None;
    let mut fd_select_offset = None;

    for entry in DictParser::new(scope, top_dict)? {
        let entry = entry?;
        match entry.operator() {
            Some(Operator::ROS) => {
                ros = Some(ROS {
                    registry: SID::try_from(entry.integer(0)?)?,
                    ordering: SID::try_from(entry.integer(1)?)?,
                    supplement: entry.integer(2)?,
                })
            }
            Some(Operator::CIDCount) => cid_count = Some(entry.integer(0)?),
            Some(Operator::FullName) => {
                let sid = SID::try_from(entry.integer(0)?)?;
                full_name = Some(read_string_index_string(string_index, sid)?.to_owned());
            }
            Some(Operator::CharstringType) => charstring_type = entry.integer(0)?,
            Some(Operator::CharStrings) => {
                char_strings_index = Some(read_index_at(scope, entry.offset(0)?)?)
            }
            Some(Operator::Charset) => charset_offset = entry.offset(0)?,
            Some(Operator::Encoding) => encoding_offset = Some(entry.offset(0)?),
            Some(Operator::Private) => {
                private_span = Some(Span::new(entry.offset(1)?, entry.offset(0)?))
            }
            Some(Operator::FDArray) => fd_array_offset = Some(entry.offset(0)?),
            Some(Operator::FDSelect) => fd_select_offset = Some(entry.offset(0)?),
            _ => {}
        }
    }

    let char_strings_index = char_strings_index.ok_or(ParseError::MissingValue)?;
    let n_glyphs = char_strings_index.count;
    let (charset, charset_span) = read_charset(scope, charset_offset, n_glyphs)?;
    let private_dict = private_span
        .map(|span| read_private_dict(scope, span))
        .transpose()?;
    let cid_data = match (fd_array_offset, fd_select_offset) {
        (Some(fd_array_offset), Some(fd_select_offset)) => Some(read_cid_data(
            scope,
            fd_array_offset,
            fd_select_offset,
            n_glyphs,
        )?),
        _ => None,
    };

    Ok(Font {
        name: name_data.iter().copied().map(char::from).collect(),
        name_data,
        top_dict,
        full_name,
        ros,
        cid_count,
        charstring_type,
        char_strings_index,
        charset,
        charset_span,
        encoding_offset,
        private_dict,
        cid_data,
    })
}

fn read_charset<'a>(
    scope: ReadScope<'a>,
    offset: usize,
    n_glyphs: usize,
) -> Result<(Charset<'a>, Option<Span>), ParseError> {
    let charset = match offset {
        0 => Charset::ISOAdobe,
        1 => Charset::Expert,
        2 => Charset::ExpertSubset,
        _ => {
            let mut ctxt = scope.ctxt();
            ctxt.seek(offset)?;
            let custom = ctxt.read_dep::<CustomCharset<'_>>(n_glyphs)?;
            let span = Span::new(offset, ctxt.position() - offset);
            return Ok((Charset::Custom(custom), Some(span)));
        }
    };

    Ok((charset, None))
}

fn read_private_dict<'a>(scope: ReadScope<'a>, span: Span) -> Result<PrivateDict<'a>, ParseError> {
    let mut local_subr_index = None;
    for entry in DictParser::new(scope, span)? {
        let entry = entry?;
        if entry.operator() == Some(Operator::Subrs) {
            // The local subrs offset is relative to the beginning of the Private DICT data.
            let offset = span
                .offset
                .checked_add(entry.offset(0)?)
                .ok_or(ParseError::BadOffset)?;
            local_subr_index = Some(read_index_at(scope, offset)?);
        }
    }

    Ok(PrivateDict {
        span,
        local_subr_index,
    })
}

fn read_font_dict<'a>(scope: ReadScope<'a>, span: Span) -> Result<FontDict<'a>, ParseError> {
    let mut font_name = None;
    let mut private_dict = None;
    for entry in DictParser::new(scope, span)? {
        let entry = entry?;
        match entry.operator() {
            Some(Operator::FontName) => font_name = Some(SID::try_from(entry.integer(0)?)?),
            Some(Operator::Private) => {
                let span = Span::new(entry.offset(1)?, entry.offset(0)?);
                private_dict = Some(read_private_dict(scope, span)?);
            }
            _ => {}
        }
    }

    Ok(FontDict {
        span,
        font_name,
        private_dict,
    })
}

fn read_cid_data<'a>(
    scope: ReadScope<'a>,
    fd_array_offset: usize,
    fd_select_offset: usize,
    n_glyphs: usize,
) -> Result<CIDData<'a>, ParseError> {
    let font_dict_index = read_index_at(scope, fd_array_offset)?;
    let font_dicts = (0..font_dict_index.count)
        .map(|index| {
            let span = font_dict_index
                .object_span(index)
                .ok_or(ParseError::BadIndex)?;
            read_font_dict(scope, span)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut ctxt = scope.ctxt();
    ctxt.seek(fd_select_offset)?;
    let fd_select = ctxt.read_dep::<FDSelect<'_>>(n_glyphs)?;
    let fd_select_span = Span::new(fd_select_offset, ctxt.position() - fd_select_offset);

    Ok(CIDData {
        font_dict_index,
        font_dicts,
        fd_select,
        fd_select_span,
    })
}

impl ReadBinary for Header {
    type HostType<'b> = Self;

    fn read(ctxt: &mut ReadCtxt<'_>) -> Result<Self, ParseError> {
        // From section 6 of Technical Note #5176:
        // Implementations reading font set files must include code to check version numbers so
        // that if and when the format and therefore the version number changes, older
        // implementations will reject newer versions gracefully.
        let major = ctxt.read_u8()?;
        ctxt.check_version(major == 1)?;
        let minor = ctxt.read_u8()?;
        let hdr_size = ctxt.read_u8()?;
        let off_size = ctxt.read_u8()?;

        if hdr_size < 4 {
            return Err(ParseError::BadValue);
        }

        if off_size < 1 || off_size > 4 {
            return Err(ParseError::BadValue);
        }

        let _unknown = ctxt.read_slice(usize::from(hdr_size - 4))?;

        Ok(Header {
            major,
            minor,
            hdr_size,
            off_size,
        })
    }
}

impl<'b> ReadBinary for Index<'b> {
    type HostType<'a> = Index<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        let start = ctxt.position();
        let count = usize::from(ctxt.read_u16be()?);

        if count == 0 {
            // An empty INDEX consists of only the count field
            return Ok(Index {
                count,
                off_size: 1,
                start,
                offsets: vec![ctxt.position()],
                data_array: &[],
            });
        }

        let off_size = ctxt.read_u8()?;
        if off_size < 1 || off_size > 4 {
            return Err(ParseError::BadValue);
        }

        let offset_array_size = (count + 1) * usize::from(off_size);
        let offset_array = ctxt.read_slice(offset_array_size)?;
        let raw_offsets = (0..=count)
            .map(|index| lookup_offset_index(off_size, offset_array, index))
            .collect::<Vec<_>>();

        // Offsets are 1-based, relative to the byte preceding the object data
        if raw_offsets.first() != Some(&1)
            || raw_offsets.iter().tuple_windows().any(|(a, b)| a > b)
        {
            return Err(ParseError::BadOffset);
        }

        let base = ctxt.position() - 1;
        let data_array_size = raw_offsets[count] - 1;
        let data_array = ctxt.read_slice(data_array_size)?;
        let offsets = raw_offsets.into_iter().map(|raw| base + raw).collect();

        Ok(Index {
            count,
            off_size,
            start,
            offsets,
            data_array,
        })
    }
}

impl<'a> Index<'a> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The `count + 1` absolute offsets of this INDEX.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Position of the first byte of the INDEX (the count field).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position one past the last byte of the INDEX.
    pub fn end(&self) -> usize {
        self.offsets.last().copied().unwrap_or(self.start + 2)
    }

    /// The bytes occupied by the whole INDEX structure.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end() - self.start)
    }

    /// The bytes occupied by the object data.
    pub fn data_span(&self) -> Span {
        Span::new(self.data_start(), self.data_array.len())
    }

    pub fn data_len(&self) -> usize {
        self.data_array.len()
    }

    pub fn object_span(&self, index: usize) -> Option<Span> {
        if index < self.count {
            let start = self.offsets[index];
            let end = self.offsets[index + 1];
            Some(Span::new(start, end - start))
        } else {
            None
        }
    }

    pub fn read_object(&self, index: usize) -> Option<&'a [u8]> {
        let span = self.object_span(index)?;
        let start = span.offset - self.data_start();
        self.data_array.get(start..start + span.length)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.count).filter_map(move |index| self.read_object(index))
    }

    fn data_start(&self) -> usize {
        self.offsets.first().copied().unwrap_or(self.start + 2)
    }
}

impl ReadFrom for Range<SID, u8> {
    type ReadType = (U16Be, U8);
    fn read_from((first, n_left): (SID, u8)) -> Self {
        Range { first, n_left }
    }
}

impl ReadFrom for Range<SID, u16> {
    type ReadType = (U16Be, U16Be);
    fn read_from((first, n_left): (SID, u16)) -> Self {
        Range { first, n_left }
    }
}

impl<F, N> Range<F, N>
where
    N: num::Unsigned + Copy,
    usize: From<N>,
{
    pub fn len(&self) -> usize {
        usize::from(self.n_left) + 1
    }
}

impl Range<SID, u8> {
    pub fn iter(&self) -> impl Iterator<Item = SID> {
        let last = self.first.saturating_add(SID::from(self.n_left));
        self.first..=last
    }
}

impl Range<SID, u16> {
    pub fn iter(&self) -> impl Iterator<Item = SID> {
        let last = self.first.saturating_add(self.n_left);
        self.first..=last
    }
}

impl<'a> Charset<'a> {
    /// Returns `true` for the charsets that are not stored in the font.
    pub fn is_predefined(&self) -> bool {
        !matches!(self, Charset::Custom(_))
    }
}

impl<'b> ReadBinaryDep for CustomCharset<'b> {
    type Args<'a> = usize;
    type HostType<'a> = CustomCharset<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        n_glyphs: usize,
    ) -> Result<Self::HostType<'a>, ParseError> {
        // (There is one less element in the charset than nGlyphs because the .notdef glyph name is omitted.)
        let n_glyphs = n_glyphs.checked_sub(1).ok_or(ParseError::BadValue)?;
        match ctxt.read::<U8>()? {
            0 => {
                // The number of glyphs (nGlyphs) is the value of the count field in the
                // CharStrings INDEX.
                let glyphs = ctxt.read_array::<U16Be>(n_glyphs)?;
                Ok(CustomCharset::Format0 { glyphs })
            }
            1 => {
                let ranges = read_range_array(ctxt, n_glyphs)?;
                Ok(CustomCharset::Format1 { ranges })
            }
            2 => {
                let ranges = read_range_array(ctxt, n_glyphs)?;
                Ok(CustomCharset::Format2 { ranges })
            }
            _ => Err(ParseError::BadValue),
        }
    }
}

impl<'a> CustomCharset<'a> {
    /// Iterate the SID (Type 1 font) or CID (CID keyed font) of each glyph, starting with .notdef
    pub fn iter(&self) -> Box<dyn Iterator<Item = u16> + 'a> {
        let notdef = iter::once(0);
        match self {
            CustomCharset::Format0 { glyphs } => Box::new(notdef.chain(glyphs.iter())),
            CustomCharset::Format1 { ranges } => {
                Box::new(notdef.chain(ranges.iter().flat_map(|range| range.iter())))
            }
            CustomCharset::Format2 { ranges } => {
                Box::new(notdef.chain(ranges.iter().flat_map(|range| range.iter())))
            }
        }
    }

    /// Returns the SID (Type 1 font) or CID (CID keyed font) of the name of the supplied glyph
    pub fn id_for_glyph(&self, glyph_id: u16) -> Option<u16> {
        // Section 11 of Technical Note #5176:
        // By definition the first glyph (GID 0) is “.notdef” and must be present in all fonts.
        // Since this is always the case, it is not necessary to represent either the encoding
        // (unencoded) or name (.notdef) for GID 0. Consequently, taking advantage of this
        // optimization, the encoding and charset arrays always begin with GID 1.
        if glyph_id == 0 {
            return Some(0);
        }

        match self {
            CustomCharset::Format0 { glyphs } => {
                let index = usize::from(glyph_id - 1);
                glyphs
                    .check_index(index)
                    .ok()
                    .and_then(|_| glyphs.get_item(index))
            }
            CustomCharset::Format1 { ranges } => Self::id_for_glyph_in_ranges(ranges, glyph_id),
            CustomCharset::Format2 { ranges } => Self::id_for_glyph_in_ranges(ranges, glyph_id),
        }
    }

    fn id_for_glyph_in_ranges<F, N>(
        ranges: &ReadArray<'a, Range<F, N>>,
        glyph_id: u16,
    ) -> Option<u16>
    where
        F: num::Unsigned + Copy,
        N: num::Unsigned + Copy,
        usize: From<N> + From<F>,
        Range<F, N>: ReadFrom,
        <Range<F, N> as ReadUnchecked>::HostType: Copy,
    {
        let glyph_id = usize::from(glyph_id);

        ranges
            .iter()
            .scan(0usize, |glyphs_covered, range| {
                *glyphs_covered += range.len();
                Some((*glyphs_covered, range))
            })
            .find(|(glyphs_covered, _range)| glyph_id <= *glyphs_covered)
            .and_then(|(glyphs_covered, range)| {
                (usize::from(range.first) + (glyph_id - (glyphs_covered - range.len()) - 1))
                    .try_into()
                    .ok()
            })
    }
}

impl<'b> ReadBinaryDep for FDSelect<'b> {
    type Args<'a> = usize;
    type HostType<'a> = FDSelect<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        n_glyphs: usize,
    ) -> Result<Self::HostType<'a>, ParseError> {
        match ctxt.read::<U8>()? {
            0 => {
                let glyph_font_dict_indices = ctxt.read_array::<U8>(n_glyphs)?;
                Ok(FDSelect::Format0 {
                    glyph_font_dict_indices,
                })
            }
            3 => {
                let nranges = usize::from(ctxt.read::<U16Be>()?);
                let ranges = ctxt.read_array(nranges)?;
                let sentinel = ctxt.read::<U16Be>()?;
                Ok(FDSelect::Format3 { ranges, sentinel })
            }
            _ => Err(ParseError::BadValue),
        }
    }
}

impl<'a> FDSelect<'a> {
    /// Returns the index of the Font DICT for the supplied `glyph_id`
    pub fn font_dict_index(&self, glyph_id: u16) -> Option<u8> {
        match self {
            FDSelect::Format0 {
                glyph_font_dict_indices,
            } => glyph_font_dict_indices.get_item(usize::from(glyph_id)),
            FDSelect::Format3 { ranges, sentinel } => {
                let range_windows = ranges
                    .iter()
                    .map(|Range { first, n_left }| (first, Some(n_left)))
                    .chain(iter::once((*sentinel, None)))
                    .tuple_windows();

                for ((first, fd_index), (last, _)) in range_windows {
                    if glyph_id >= first && glyph_id < last {
                        return fd_index;
                    }
                }

                None
            }
        }
    }
}

/// The smallest INDEX offset size able to hold `value`.
pub(crate) fn offset_size(value: usize) -> Option<u8> {
    match value {
        0..=0xFF => Some(1),
        0x100..=0xFFFF => Some(2),
        0x1_0000..=0xFF_FFFF => Some(3),
        0x100_0000..=0xFFFF_FFFF => Some(4),
        _ => None,
    }
}

// `off_size` is validated to be 1..=4 by the caller
fn lookup_offset_index(off_size: u8, offset_array: &[u8], index: usize) -> usize {
    let buf = &offset_array[index * usize::from(off_size)..];
    match off_size {
        1 => buf[0] as usize,
        2 => BigEndian::read_u16(buf) as usize,
        3 => BigEndian::read_u24(buf) as usize,
        _ => BigEndian::read_u32(buf) as usize,
    }
}

fn read_range_array<'a, F, N>(
    ctxt: &mut ReadCtxt<'a>,
    n_glyphs: usize,
) -> Result<ReadArray<'a, Range<F, N>>, ParseError>
where
    Range<F, N>: ReadFrom,
    usize: From<N>,
    N: num::Unsigned + Copy,
{
    let mut peek = ctxt.scope().ctxt();
    let mut range_count = 0;
    let mut glyphs_covered = 0;
    while glyphs_covered < n_glyphs {
        let range = peek.read::<Range<F, N>>()?;
        range_count += 1;
        glyphs_covered += range.len();
    }

    ctxt.read_array::<Range<F, N>>(range_count)
}


pub(crate) const STANDARD_STRINGS: [&str; 391] = [
    ".notdef",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quoteright",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "quoteleft",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
    "exclamdown",
    "cent",
    "sterling",
    "fraction",
    "yen",
    "florin",
    "section",
    "currency",
    "quotesingle",
    "quotedblleft",
    "guillemotleft",
    "guilsinglleft",
    "guilsinglright",
    "fi",
    "fl",
    "endash",
    "dagger",
    "daggerdbl",
    "periodcentered",
    "paragraph",
    "bullet",
    "quotesinglbase",
    "quotedblbase",
    "quotedblright",
    "guillemotright",
    "ellipsis",
    "perthousand",
    "questiondown",
    "grave",
    "acute",
    "circumflex",
    "tilde",
    "macron",
    "breve",
    "dotaccent",
    "dieresis",
    "ring",
    "cedilla",
    "hungarumlaut",
    "ogonek",
    "caron",
    "emdash",
    "AE",
    "ordfeminine",
    "Lslash",
    "Oslash",
    "OE",
    "ordmasculine",
    "ae",
    "dotlessi",
    "lslash",
    "oslash",
    "oe",
    "germandbls",
    "onesuperior",
    "logicalnot",
    "mu",
    "trademark",
    "Eth",
    "onehalf",
    "plusminus",
    "Thorn",
    "onequarter",
    "divide",
    "brokenbar",
    "degree",
    "thorn",
    "threequarters",
    "twosuperior",
    "registered",
    "minus",
    "eth",
    "multiply",
    "threesuperior",
    "copyright",
    "Aacute",
    "Acircumflex",
    "Adieresis",
    "Agrave",
    "Aring",
    "Atilde",
    "Ccedilla",
    "Eacute",
    "Ecircumflex",
    "Edieresis",
    "Egrave",
    "Iacute",
    "Icircumflex",
    "Idieresis",
    "Igrave",
    "Ntilde",
    "Oacute",
    "Ocircumflex",
    "Odieresis",
    "Ograve",
    "Otilde",
    "Scaron",
    "Uacute",
    "Ucircumflex",
    "Udieresis",
    "Ugrave",
    "Yacute",
    "Ydieresis",
    "Zcaron",
    "aacute",
    "acircumflex",
    "adieresis",
    "agrave",
    "aring",
    "atilde",
    "ccedilla",
    "eacute",
    "ecircumflex",
    "edieresis",
    "egrave",
    "iacute",
    "icircumflex",
    "idieresis",
    "igrave",
    "ntilde",
    "oacute",
    "ocircumflex",
    "odieresis",
    "ograve",
    "otilde",
    "scaron",
    "uacute",
    "ucircumflex",
    "udieresis",
    "ugrave",
    "yacute",
    "ydieresis",
    "zcaron",
    "exclamsmall",
    "Hungarumlautsmall",
    "dollaroldstyle",
    "dollarsuperior",
    "ampersandsmall",
    "Acutesmall",
    "parenleftsuperior",
    "parenrightsuperior",
    "twodotenleader",
    "onedotenleader",
    "zerooldstyle",
    "oneoldstyle",
    "twooldstyle",
    "threeoldstyle",
    "fouroldstyle",
    "fiveoldstyle",
    "sixoldstyle",
    "sevenoldstyle",
    "eightoldstyle",
    "nineoldstyle",
    "commasuperior",
    "threequartersemdash",
    "periodsuperior",
    "questionsmall",
    "asuperior",
    "bsuperior",
    "centsuperior",
    "dsuperior",
    "esuperior",
    "isuperior",
    "lsuperior",
    "msuperior",
    "nsuperior",
    "osuperior",
    "rsuperior",
    "ssuperior",
    "tsuperior",
    "ff",
    "ffi",
    "ffl",
    "parenleftinferior",
    "parenrightinferior",
    "Circumflexsmall",
    "hyphensuperior",
    "Gravesmall",
    "Asmall",
    "Bsmall",
    "Csmall",
    "Dsmall",
    "Esmall",
    "Fsmall",
    "Gsmall",
    "Hsmall",
    "Ismall",
    "Jsmall",
    "Ksmall",
    "Lsmall",
    "Msmall",
    "Nsmall",
    "Osmall",
    "Psmall",
    "Qsmall",
    "Rsmall",
    "Ssmall",
    "Tsmall",
    "Usmall",
    "Vsmall",
    "Wsmall",
    "Xsmall",
    "Ysmall",
    "Zsmall",
    "colonmonetary",
    "onefitted",
    "rupiah",
    "Tildesmall",
    "exclamdownsmall",
    "centoldstyle",
    "Lslashsmall",
    "Scaronsmall",
    "Zcaronsmall",
    "Dieresissmall",
    "Brevesmall",
    "Caronsmall",
    "Dotaccentsmall",
    "Macronsmall",
    "figuredash",
    "hypheninferior",
    "Ogoneksmall",
    "Ringsmall",
    "Cedillasmall",
    "questiondownsmall",
    "oneeighth",
    "threeeighths",
    "fiveeighths",
    "seveneighths",
    "onethird",
    "twothirds",
    "zerosuperior",
    "foursuperior",
    "fivesuperior",
    "sixsuperior",
    "sevensuperior",
    "eightsuperior",
    "ninesuperior",
    "zeroinferior",
    "oneinferior",
    "twoinferior",
    "threeinferior",
    "fourinferior",
    "fiveinferior",
    "sixinferior",
    "seveninferior",
    "eightinferior",
    "nineinferior",
    "centinferior",
    "dollarinferior",
    "periodinferior",
    "commainferior",
    "Agravesmall",
    "Aacutesmall",
    "Acircumflexsmall",
    "Atildesmall",
    "Adieresissmall",
    "Aringsmall",
    "AEsmall",
    "Ccedillasmall",
    "Egravesmall",
    "Eacutesmall",
    "Ecircumflexsmall",
    "Edieresissmall",
    "Igravesmall",
    "Iacutesmall",
    "Icircumflexsmall",
    "Idieresissmall",
    "Ethsmall",
    "Ntildesmall",
    "Ogravesmall",
    "Oacutesmall",
    "Ocircumflexsmall",
    "Otildesmall",
    "Odieresissmall",
    "OEsmall",
    "Oslashsmall",
    "Ugravesmall",
    "Uacutesmall",
    "Ucircumflexsmall",
    "Udieresissmall",
    "Yacutesmall",
    "Thornsmall",
    "Ydieresissmall",
    "001.000",
    "001.001",
    "001.002",
    "001.003",
    "Black",
    "Bold",
    "Book",
    "Light",
    "Medium",
    "Regular",
    "Roman",
    "Semibold",
];
