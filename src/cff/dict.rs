//! Reading and writing of CFF DICT data.
//!
//! Refer to section 4 of Technical Note #5176 for the encoding of DICT operands and operators.

use std::convert::TryFrom;
use std::fmt;
use std::mem;
use std::str::FromStr;

use tinyvec::TinyVec;

use crate::binary::read::{ReadBinary, ReadCtxt, ReadScope};
use crate::binary::write::{WriteBinary, WriteContext};
use crate::binary::{I16Be, I32Be, U16Be, U8};
use crate::cff::Span;
use crate::error::{ParseError, WriteError};

// An operator may be preceded by up to a maximum of 48 operands.
pub const MAX_OPERANDS: usize = 48;
const END_OF_FLOAT_FLAG: u8 = 0xf;
const ESCAPE: u8 = 12;

/// Names of the single byte operators, indexed by operator byte.
const OPERATOR_NAMES: [&str; 32] = [
    "version",
    "Notice",
    "FullName",
    "FamilyName",
    "Weight",
    "FontBBox",
    "BlueValues",
    "OtherBlues",
    "FamilyBlues",
    "FamilyOtherBlues",
    "StdHW",
    "StdVW",
    "UNKNOWN_12",
    "UniqueID",
    "XUID",
    "charset",
    "Encoding",
    "CharStrings",
    "Private",
    "Subrs",
    "defaultWidthX",
    "nominalWidthX",
    "UNKNOWN_22",
    "UNKNOWN_23",
    "UNKNOWN_24",
    "UNKNOWN_25",
    "UNKNOWN_26",
    "UNKNOWN_27",
    "UNKNOWN_28",
    "UNKNOWN_29",
    "UNKNOWN_30",
    "UNKNOWN_31",
];

/// Names of the two byte (12 x) operators, indexed by the second byte.
const ESCAPED_OPERATOR_NAMES: [&str; 39] = [
    "Copyright",
    "isFixedPitch",
    "ItalicAngle",
    "UnderlinePosition",
    "UnderlineThickness",
    "PaintType",
    "CharstringType",
    "FontMatrix",
    "StrokeWidth",
    "BlueScale",
    "BlueShift",
    "BlueFuzz",
    "StemSnapH",
    "StemSnapV",
    "ForceBold",
    "UNKNOWN_12_15",
    "UNKNOWN_12_16",
    "LanguageGroup",
    "ExpansionFactor",
    "initialRandomSeed",
    "SyntheticBase",
    "PostScript",
    "BaseFontName",
    "BaseFontBlend",
    "UNKNOWN_12_24",
    "UNKNOWN_12_25",
    "UNKNOWN_12_26",
    "UNKNOWN_12_27",
    "UNKNOWN_12_28",
    "UNKNOWN_12_29",
    "ROS",
    "CIDFontVersion",
    "CIDFontRevision",
    "CIDFontType",
    "CIDCount",
    "UIDBase",
    "FDArray",
    "FDSelect",
    "FontName",
];

/// A single DICT entry: an operator and the operands that preceded it.
#[derive(Debug, PartialEq, Clone)]
pub struct DictEntry {
    /// The operator. Two byte operators are `12 << 8 | b1`.
    pub key: u16,
    pub operands: Vec<Operand>,
    /// The bytes occupied by the operands and operator.
    pub span: Span,
}

/// Sequential decoder of the entries of a DICT.
pub struct DictParser<'a> {
    ctxt: ReadCtxt<'a>,
    end: usize,
    operands: Vec<Operand>,
}

/// CFF DICT token
#[derive(Debug, PartialEq)]
enum Op {
    Operator(u16),
    Operand(Operand),
}

/// CFF operand to an operator
#[derive(Debug, PartialEq, Clone)]
pub enum Operand {
    Integer(i32),
    Real(Real),
}

/// A real number, stored as packed nibbles including the end of number nibble.
///
/// Use `Display`/`FromStr` to convert to and from the decimal representation, or
/// `TryFrom`/`TryInto` to obtain an `f64`.
#[derive(Debug, PartialEq, Clone)]
pub struct Real(TinyVec<[u8; 7]>);

#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    Version = 0,
    Notice = 1,
    FullName = 2,
    FamilyName = 3,
    Weight = 4,
    FontBBox = 5,
    BlueValues = 6,
    OtherBlues = 7,
    FamilyBlues = 8,
    FamilyOtherBlues = 9,
    StdHW = 10,
    StdVW = 11,
    UniqueID = 13,
    XUID = 14,
    Charset = 15,
    Encoding = 16,
    CharStrings = 17,
    Private = 18,
    Subrs = 19,
    DefaultWidthX = 20,
    NominalWidthX = 21,
    Copyright = op2(0),
    IsFixedPitch = op2(1),
    ItalicAngle = op2(2),
    UnderlinePosition = op2(3),
    UnderlineThickness = op2(4),
    PaintType = op2(5),
    CharstringType = op2(6),
    FontMatrix = op2(7),
    StrokeWidth = op2(8),
    BlueScale = op2(9),
    BlueShift = op2(10),
    BlueFuzz = op2(11),
    StemSnapH = op2(12),
    StemSnapV = op2(13),
    ForceBold = op2(14),
    LanguageGroup = op2(17),
    ExpansionFactor = op2(18),
    InitialRandomSeed = op2(19),
    SyntheticBase = op2(20),
    PostScript = op2(21),
    BaseFontName = op2(22),
    BaseFontBlend = op2(23),
    ROS = op2(30),
    CIDFontVersion = op2(31),
    CIDFontRevision = op2(32),
    CIDFontType = op2(33),
    CIDCount = op2(34),
    UIDBase = op2(35),
    FDArray = op2(36),
    FDSelect = op2(37),
    FontName = op2(38),
}

const fn op2(value: u8) -> u16 {
    ((ESCAPE as u16) << 8) | (value as u16)
}

/// Look up the name of the operator with the given key.
///
/// ```
/// use cff_cid::cff::dict::operator_name;
///
/// assert_eq!(operator_name(17), Some("CharStrings"));
/// assert_eq!(operator_name(12 << 8 | 30), Some("ROS"));
/// assert_eq!(operator_name(12 << 8 | 39), None);
/// ```
pub fn operator_name(key: u16) -> Option<&'static str> {
    let [escape, byte] = key.to_be_bytes();
    match escape {
        0 => OPERATOR_NAMES.get(usize::from(byte)).copied(),
        ESCAPE => ESCAPED_OPERATOR_NAMES.get(usize::from(byte)).copied(),
        _ => None,
    }
}

impl<'a> DictParser<'a> {
    /// Create a parser for the DICT occupying `span` of `scope`.
    ///
    /// `scope` must be the scope of the whole CFF data as DICT offsets are relative to its start.
    pub fn new(scope: ReadScope<'a>, span: Span) -> Result<DictParser<'a>, ParseError> {
        scope.offset_length(span.offset, span.length)?;
        let mut ctxt = scope.ctxt();
        ctxt.seek(span.offset)?;
        Ok(DictParser {
            ctxt,
            end: span.end(),
            operands: Vec::new(),
        })
    }

    /// Decode the next entry, returning `None` once the end of the DICT is reached.
    pub fn next_entry(&mut self) -> Result<Option<DictEntry>, ParseError> {
        let start = self.ctxt.position();
        if start >= self.end {
            return Ok(None);
        }

        self.operands.clear();
        loop {
            // Operands without a terminating operator inside the DICT
            if self.ctxt.position() >= self.end {
                return Err(ParseError::BadOffset);
            }

            match self.ctxt.read::<Op>()? {
                Op::Operator(key) => {
                    let end = self.ctxt.position();
                    if end > self.end {
                        return Err(ParseError::BadOffset);
                    }

                    return Ok(Some(DictEntry {
                        key,
                        operands: mem::take(&mut self.operands),
                        span: Span::new(start, end - start),
                    }));
                }
                Op::Operand(operand) => {
                    self.operands.push(operand);
                    if self.operands.len() > MAX_OPERANDS {
                        return Err(ParseError::LimitExceeded);
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for DictParser<'a> {
    type Item = Result<DictEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next_entry();
        if entry.is_err() {
            // Stop iterating after the first error
            self.end = 0;
        }
        entry.transpose()
    }
}

impl DictEntry {
    /// The operator of this entry, if it is one with a defined meaning.
    pub fn operator(&self) -> Option<Operator> {
        Operator::try_from(self.key).ok()
    }

    pub fn name(&self) -> Option<&'static str> {
        operator_name(self.key)
    }

    /// Returns the integer operand at `index`.
    pub fn integer(&self, index: usize) -> Result<i32, ParseError> {
        match self.operands.get(index) {
            Some(Operand::Integer(value)) => Ok(*value),
            Some(Operand::Real(_)) => Err(ParseError::BadValue),
            None => Err(ParseError::MissingValue),
        }
    }

    /// Returns the operand at `index` as an offset or length, which must not be negative.
    pub fn offset(&self, index: usize) -> Result<usize, ParseError> {
        let value = self.integer(index)?;
        Ok(usize::try_from(value)?)
    }
}

impl ReadBinary for Op {
    type HostType<'b> = Self;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let b0 = ctxt.read_u8()?;

        match b0 {
            0..=11 | 13..=21 => Ok(Op::Operator(u16::from(b0))),
            ESCAPE => {
                let b1 = ctxt.read_u8()?;
                if usize::from(b1) < ESCAPED_OPERATOR_NAMES.len() {
                    Ok(Op::Operator(op2(b1)))
                } else {
                    Err(ParseError::BadValue)
                }
            }
            28 => ok_int(i32::from(ctxt.read_i16be()?)),
            29 => ok_int(ctxt.read_i32be()?),
            30 => Ok(Op::Operand(Operand::Real(ctxt.read::<Real>()?))),
            32..=246 => ok_int(i32::from(b0) - 139),
            247..=250 => {
                let b1 = ctxt.read_u8()?;
                ok_int((i32::from(b0) - 247) * 256 + i32::from(b1) + 108)
            }
            251..=254 => {
                let b1 = ctxt.read_u8()?;
                ok_int(-(i32::from(b0) - 251) * 256 - i32::from(b1) - 108)
            }
            22..=27 | 31 | 255 => Err(ParseError::BadValue), // reserved
        }
    }
}

fn ok_int(num: i32) -> Result<Op, ParseError> {
    Ok(Op::Operand(Operand::Integer(num)))
}

impl ReadBinary for Real {
    type HostType<'b> = Self;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let bytes = ctxt.read_until_nibble(END_OF_FLOAT_FLAG)?;
        // Nibble 0xd is reserved
        if nibbles(bytes).any(|nibble| nibble == 0xd) {
            return Err(ParseError::BadValue);
        }

        Ok(Real(TinyVec::from(bytes)))
    }
}

fn nibbles(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| [byte >> 4, byte & 0xF])
        .take_while(|&nibble| nibble != END_OF_FLOAT_FLAG)
}

impl Real {
    /// The packed nibbles of this number, including the terminating nibble.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Adobe Technical Note #5176, Table 5 Nibble Definitions
impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nibble in nibbles(&self.0) {
            match nibble {
                0..=9 => write!(f, "{}", nibble)?,
                0xa => f.write_str(".")?,
                0xb => f.write_str("E")?,
                0xc => f.write_str("E-")?,
                0xe => f.write_str("-")?,
                _ => return Err(fmt::Error),
            }
        }

        Ok(())
    }
}

impl FromStr for Real {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut packed = Vec::with_capacity(s.len() + 2);
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            let nibble = match c {
                '0'..='9' => c as u8 - b'0',
                '.' => 0xa,
                'E' | 'e' if chars.next_if_eq(&'-').is_some() => 0xc,
                'E' | 'e' => 0xb,
                '-' => 0xe,
                _ => return Err(ParseError::BadValue),
            };
            packed.push(nibble);
        }

        packed.push(END_OF_FLOAT_FLAG);
        if packed.len() % 2 == 1 {
            packed.push(END_OF_FLOAT_FLAG);
        }

        let bytes = packed
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect();
        Ok(Real(bytes))
    }
}

impl TryFrom<Real> for f64 {
    type Error = ParseError;

    /// Try to parse this `Real` into an `f64`.
    fn try_from(real: Real) -> Result<Self, Self::Error> {
        real.to_string().parse().map_err(|_| ParseError::BadValue)
    }
}

impl TryFrom<u16> for Operator {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let [escape, byte] = value.to_be_bytes();
        if escape == ESCAPE {
            match byte {
                0 => Ok(Operator::Copyright),
                1 => Ok(Operator::IsFixedPitch),
                2 => Ok(Operator::ItalicAngle),
                3 => Ok(Operator::UnderlinePosition),
                4 => Ok(Operator::UnderlineThickness),
                5 => Ok(Operator::PaintType),
                6 => Ok(Operator::CharstringType),
                7 => Ok(Operator::FontMatrix),
                8 => Ok(Operator::StrokeWidth),
                9 => Ok(Operator::BlueScale),
                10 => Ok(Operator::BlueShift),
                11 => Ok(Operator::BlueFuzz),
                12 => Ok(Operator::StemSnapH),
                13 => Ok(Operator::StemSnapV),
                14 => Ok(Operator::ForceBold),
                17 => Ok(Operator::LanguageGroup),
                18 => Ok(Operator::ExpansionFactor),
                19 => Ok(Operator::InitialRandomSeed),
                20 => Ok(Operator::SyntheticBase),
                21 => Ok(Operator::PostScript),
                22 => Ok(Operator::BaseFontName),
                23 => Ok(Operator::BaseFontBlend),
                30 => Ok(Operator::ROS),
                31 => Ok(Operator::CIDFontVersion),
                32 => Ok(Operator::CIDFontRevision),
                33 => Ok(Operator::CIDFontType),
                34 => Ok(Operator::CIDCount),
                35 => Ok(Operator::UIDBase),
                36 => Ok(Operator::FDArray),
                37 => Ok(Operator::FDSelect),
                38 => Ok(Operator::FontName),
                _ => Err(ParseError::BadValue),
            }
        } else {
            match value {
                0 => Ok(Operator::Version),
                1 => Ok(Operator::Notice),
                2 => Ok(Operator::FullName),
                3 => Ok(Operator::FamilyName),
                4 => Ok(Operator::Weight),
                5 => Ok(Operator::FontBBox),
                6 => Ok(Operator::BlueValues),
                7 => Ok(Operator::OtherBlues),
                8 => Ok(Operator::FamilyBlues),
                9 => Ok(Operator::FamilyOtherBlues),
                10 => Ok(Operator::StdHW),
                11 => Ok(Operator::StdVW),
                13 => Ok(Operator::UniqueID),
                14 => Ok(Operator::XUID),
                15 => Ok(Operator::Charset),
                16 => Ok(Operator::Encoding),
                17 => Ok(Operator::CharStrings),
                18 => Ok(Operator::Private),
                19 => Ok(Operator::Subrs),
                20 => Ok(Operator::DefaultWidthX),
                21 => Ok(Operator::NominalWidthX),
                _ => Err(ParseError::BadValue),
            }
        }
    }
}

impl WriteBinary<Self> for Operator {
    type Output = ();

    fn write<C: WriteContext>(ctxt: &mut C, op: Operator) -> Result<(), WriteError> {
        let value = op as u16;
        if value > 0xFF {
            U16Be::write(ctxt, value)?;
        } else {
            U8::write(ctxt, value as u8)?;
        }

        Ok(())
    }
}

impl WriteBinary<&Self> for Operand {
    type Output = ();

    // Refer to Table 3 Operand Encoding in section 4 of Technical Note #5176 for details on the
    // integer encoding scheme.
    fn write<C: WriteContext>(ctxt: &mut C, op: &Operand) -> Result<(), WriteError> {
        match op {
            Operand::Integer(val) => match *val {
                // NOTE: Casts are safe due to patterns limiting range
                -107..=107 => {
                    U8::write(ctxt, (val + 139) as u8)?;
                }
                108..=1131 => {
                    let val = *val - 108;
                    U8::write(ctxt, ((val >> 8) + 247) as u8)?;
                    U8::write(ctxt, val as u8)?;
                }
                -1131..=-108 => {
                    let val = -*val - 108;
                    U8::write(ctxt, ((val >> 8) + 251) as u8)?;
                    U8::write(ctxt, val as u8)?;
                }
                -32768..=32767 => {
                    U8::write(ctxt, 28)?;
                    I16Be::write(ctxt, *val as i16)?
                }
                _ => {
                    U8::write(ctxt, 29)?;
                    I32Be::write(ctxt, *val)?
                }
            },
            Operand::Real(Real(val)) => {
                U8::write(ctxt, 30)?;
                ctxt.write_bytes(val)?;
            }
        }

        Ok(())
    }
}

/// Write a DICT entry with compactly encoded operands.
pub fn write_dict_entry<C: WriteContext>(
    ctxt: &mut C,
    operator: Operator,
    operands: &[Operand],
) -> Result<(), WriteError> {
    for operand in operands {
        Operand::write(ctxt, operand)?;
    }
    Operator::write(ctxt, operator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::write::WriteBuffer;
    use tinyvec::tiny_vec;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < f64::EPSILON,
            "{:?} != {:?} ± {}",
            actual,
            expected,
            f64::EPSILON
        );
    }

    fn parse_all(data: &[u8]) -> Result<Vec<DictEntry>, ParseError> {
        let scope = ReadScope::new(data);
        DictParser::new(scope, Span::new(0, data.len()))?.collect()
    }

    #[test]
    fn test_read_op1() {
        let mut ctxt = ReadScope::new(&[0, 0]).ctxt();
        assert_eq!(Op::read(&mut ctxt).unwrap(), Op::Operator(0));
    }

    #[test]
    fn test_fail_op1() {
        let mut ctxt = ReadScope::new(&[]).ctxt();
        assert!(Op::read(&mut ctxt).is_err());
    }

    #[test]
    fn test_read_op2() {
        let mut ctxt = ReadScope::new(&[12, 1]).ctxt();
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operator(Operator::IsFixedPitch as u16)
        );
    }

    #[test]
    fn test_fail_op2() {
        let mut ctxt = ReadScope::new(&[12]).ctxt();
        assert!(Op::read(&mut ctxt).is_err());

        let mut ctxt = ReadScope::new(&[12, 39]).ctxt();
        assert_eq!(Op::read(&mut ctxt), Err(ParseError::BadValue));
    }

    #[test]
    fn test_reserved_bytes() {
        for b0 in [22, 23, 24, 25, 26, 27, 31, 255] {
            let data = [b0];
            let mut ctxt = ReadScope::new(&data).ctxt();
            assert_eq!(Op::read(&mut ctxt), Err(ParseError::BadValue));
        }
    }

    #[test]
    fn test_read_i8() {
        let mut ctxt = ReadScope::new(&[0x8b, 32, 246]).ctxt();
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(0))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(-107))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(107))
        );
    }

    #[test]
    fn test_read_i16() {
        //                             _____-10000______  ______10000_____  100   -100
        let mut ctxt = ReadScope::new(&[0x1c, 0xd8, 0xf0, 0x1c, 0x27, 0x10, 0xef, 0x27]).ctxt();
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(-10000))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(10000))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(100))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(-100))
        );
    }

    #[test]
    fn test_read_two_byte_ranges() {
        //                             _108__   _1131__   _-108__  _-1131_
        let mut ctxt = ReadScope::new(&[247, 0, 250, 255, 251, 0, 254, 255]).ctxt();
        for expected in [108, 1131, -108, -1131] {
            assert_eq!(
                Op::read(&mut ctxt).unwrap(),
                Op::Operand(Operand::Integer(expected))
            );
        }
    }

    #[test]
    fn test_read_i32() {
        //                   __________-100000___________  ____________100000__________
        let mut ctxt =
            ReadScope::new(&[0x1d, 0xff, 0xfe, 0x79, 0x60, 0x1d, 0x00, 0x01, 0x86, 0xa0]).ctxt();
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(-100000))
        );
        assert_eq!(
            Op::read(&mut ctxt).unwrap(),
            Op::Operand(Operand::Integer(100000))
        );
    }

    #[test]
    fn test_read_real() {
        // From Technical Note #5176:
        // Thus, the value –2.25 is encoded by the byte sequence (1e e2 a2 5f) and the value
        // 0.140541E–3 by the sequence (1e 0a 14 05 41 c3 ff).
        let mut ctxt = ReadScope::new(&[
            // ______-2.25________  _______________0.140541E–3______________
            0x1e, 0xe2, 0xa2, 0x5f, 0x1e, 0x0a, 0x14, 0x05, 0x41, 0xc3, 0xff,
        ])
        .ctxt();
        let op = Op::read(&mut ctxt).unwrap();
        assert_eq!(
            op,
            Op::Operand(Operand::Real(Real(tiny_vec![0xe2, 0xa2, 0x5f])))
        );
        let Op::Operand(Operand::Real(real)) = op else {
            panic!("op didn't match Real")
        };
        assert_eq!(real.to_string(), "-2.25");
        assert_close(f64::try_from(real).unwrap(), -2.25);

        let op = Op::read(&mut ctxt).unwrap();
        let Op::Operand(Operand::Real(real)) = op else {
            panic!("op didn't match Real")
        };
        assert_eq!(real.to_string(), "0.140541E-3");
        assert_close(f64::try_from(real).unwrap(), 0.000140541);
    }

    #[test]
    fn test_read_real_reserved_nibble() {
        let mut ctxt = ReadScope::new(&[0x1e, 0x1d, 0x2f]).ctxt();
        assert_eq!(Op::read(&mut ctxt), Err(ParseError::BadValue));
    }

    #[test]
    fn test_real_round_trip() {
        for value in ["-12.5", "3.141", "0"] {
            let real = value.parse::<Real>().unwrap();
            let mut buffer = WriteBuffer::new();
            Operand::write(&mut buffer, &Operand::Real(real)).unwrap();

            let mut ctxt = ReadScope::new(buffer.bytes()).ctxt();
            match Op::read(&mut ctxt).unwrap() {
                Op::Operand(Operand::Real(real)) => assert_eq!(real.to_string(), value),
                op => panic!("expected real, got {:?}", op),
            }
            assert!(!ctxt.bytes_available());
        }
    }

    #[test]
    fn test_real_packing() {
        assert_eq!("-12.5".parse::<Real>().unwrap().as_bytes(), &[0xe1, 0x2a, 0x5f]);
        assert_eq!("0".parse::<Real>().unwrap().as_bytes(), &[0x0f]);
        assert_eq!("1E-3".parse::<Real>().unwrap().as_bytes(), &[0x1c, 0x3f]);
        assert!("1,5".parse::<Real>().is_err());
    }

    #[test]
    fn test_parse_entries() {
        // IsFixedPitch (12 1) is true (1)
        // Notice (1) SID is 123
        //                 _1__         __123__
        let data = [0x8c, 12, 1, 247, 15, 1];
        let entries = parse_all(&data).unwrap();
        assert_eq!(
            entries,
            vec![
                DictEntry {
                    key: Operator::IsFixedPitch as u16,
                    operands: vec![Operand::Integer(1)],
                    span: Span::new(0, 3),
                },
                DictEntry {
                    key: Operator::Notice as u16,
                    operands: vec![Operand::Integer(123)],
                    span: Span::new(3, 3),
                },
            ]
        );
        assert_eq!(entries[0].name(), Some("isFixedPitch"));
        assert_eq!(entries[1].operator(), Some(Operator::Notice));
    }

    #[test]
    fn test_parse_unnamed_operator() {
        // 12 15 has no defined meaning but is a valid operator
        let entries = parse_all(&[0x8b, 12, 15]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operator(), None);
        assert_eq!(entries[0].name(), Some("UNKNOWN_12_15"));
    }

    #[test]
    fn test_parse_operand_limit() {
        let mut data = [0x8c; MAX_OPERANDS + 2];
        data[MAX_OPERANDS + 1] = 0; // version
        assert_eq!(parse_all(&data), Err(ParseError::LimitExceeded));

        let mut data = [0x8c; MAX_OPERANDS + 1];
        data[MAX_OPERANDS] = 0;
        let entries = parse_all(&data).unwrap();
        assert_eq!(entries[0].operands.len(), MAX_OPERANDS);
    }

    #[test]
    fn test_operands_cleared_between_entries() {
        let entries = parse_all(&[0x8c, 0x8d, 5, 0x8e, 6]).unwrap();
        assert_eq!(entries[0].operands.len(), 2);
        assert_eq!(entries[1].operands, vec![Operand::Integer(3)]);
    }

    #[test]
    fn test_entry_beyond_end() {
        // An operand that straddles the end of the DICT
        let data = [0x8b, 0, 0x1c, 0x00, 0x01, 0x11];
        let scope = ReadScope::new(&data);
        let entries = DictParser::new(scope, Span::new(0, 4))
            .unwrap()
            .collect::<Result<Vec<_>, _>>();
        assert_eq!(entries, Err(ParseError::BadOffset));

        // Trailing operands without an operator
        assert_eq!(parse_all(&[0x8b, 0, 0x8b]), Err(ParseError::BadOffset));
    }

    #[test]
    fn test_empty_dict() {
        // A Private DICT may be specified as having a length of 0
        let data = [0x8b, 0];
        let scope = ReadScope::new(&data);
        let mut parser = DictParser::new(scope, Span::new(2, 0)).unwrap();
        assert_eq!(parser.next_entry(), Ok(None));
    }

    #[test]
    fn test_dict_outside_data() {
        let data = [0x8b, 0];
        let scope = ReadScope::new(&data);
        assert!(DictParser::new(scope, Span::new(1, 4)).is_err());
    }

    #[test]
    fn test_entry_operand_accessors() {
        let entries = parse_all(&[0x1d, 0xff, 0xfe, 0x79, 0x60, 0x1e, 0x1f, 18]).unwrap();
        let private = &entries[0];
        assert_eq!(private.operator(), Some(Operator::Private));
        assert_eq!(private.integer(0), Ok(-100000));
        assert_eq!(private.offset(0), Err(ParseError::BadValue));
        assert_eq!(private.integer(1), Err(ParseError::BadValue));
        assert_eq!(private.integer(2), Err(ParseError::MissingValue));
    }

    #[test]
    fn test_write_int_operand() {
        assert_eq!(write_int_operand(0), &[0x8b]);
        assert_eq!(write_int_operand(100), &[0xef]);
        assert_eq!(write_int_operand(-100), &[0x27]);
        assert_eq!(write_int_operand(1000), &[0xfa, 0x7c]);
        assert_eq!(write_int_operand(-1000), &[0xfe, 0x7c]);
        assert_eq!(write_int_operand(10000), &[0x1c, 0x27, 0x10]);
        assert_eq!(write_int_operand(-10000), &[0x1c, 0xd8, 0xf0]);
        assert_eq!(write_int_operand(100000), &[0x1d, 0x00, 0x01, 0x86, 0xa0]);
        assert_eq!(write_int_operand(-100000), &[0x1d, 0xff, 0xfe, 0x79, 0x60]);
    }

    #[test]
    fn test_write_dict_entry() {
        let mut buffer = WriteBuffer::new();
        write_dict_entry(
            &mut buffer,
            Operator::ROS,
            &[
                Operand::Integer(391),
                Operand::Integer(392),
                Operand::Integer(0),
            ],
        )
        .unwrap();
        write_dict_entry(&mut buffer, Operator::CIDCount, &[Operand::Integer(1)]).unwrap();

        let entries = parse_all(buffer.bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operator(), Some(Operator::ROS));
        assert_eq!(entries[0].integer(0), Ok(391));
        assert_eq!(entries[0].integer(1), Ok(392));
        assert_eq!(entries[0].integer(2), Ok(0));
        assert_eq!(entries[1].operator(), Some(Operator::CIDCount));
        assert_eq!(entries[1].integer(0), Ok(1));
    }

    fn write_int_operand(val: i32) -> Vec<u8> {
        let mut ctxt = WriteBuffer::new();
        Operand::write(&mut ctxt, &Operand::Integer(val)).unwrap();
        ctxt.into_inner()
    }
}
