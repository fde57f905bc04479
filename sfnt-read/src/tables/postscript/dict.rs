//! Parsing for PostScript DICTs.

use std::ops::Range;

use super::{Error, Number, Stack, StringId};
use crate::{font_data::Cursor, types::Fixed, FontData, ReadError};

/// PostScript DICT operator.
///
/// See "Table 9 Top DICT Operator Entries" and "Table 23 Private DICT
/// Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Version,
    Notice,
    FullName,
    FamilyName,
    Weight,
    FontBbox,
    CharstringsOffset,
    PrivateDictRange,
    Copyright,
    IsFixedPitch,
    ItalicAngle,
    UnderlinePosition,
    UnderlineThickness,
    PaintType,
    CharstringType,
    FontMatrix,
    StrokeWidth,
    FdArrayOffset,
    FdSelectOffset,
    BlueValues,
    OtherBlues,
    FamilyBlues,
    FamilyOtherBlues,
    SubrsOffset,
    BlueScale,
    BlueShift,
    BlueFuzz,
    LanguageGroup,
    ExpansionFactor,
    Encoding,
    Charset,
    UniqueId,
    Xuid,
    SyntheticBase,
    PostScript,
    BaseFontName,
    BaseFontBlend,
    Ros,
    CidFontVersion,
    CidFontRevision,
    CidFontType,
    CidCount,
    UidBase,
    FontName,
    StdHw,
    StdVw,
    DefaultWidthX,
    NominalWidthX,
    StemSnapH,
    StemSnapV,
    ForceBold,
    InitialRandomSeed,
}

impl Operator {
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            // Top DICT operators
            0 => Version,
            1 => Notice,
            2 => FullName,
            3 => FamilyName,
            4 => Weight,
            5 => FontBbox,
            13 => UniqueId,
            14 => Xuid,
            15 => Charset,
            16 => Encoding,
            17 => CharstringsOffset,
            18 => PrivateDictRange,
            // Private DICT operators
            6 => BlueValues,
            7 => OtherBlues,
            8 => FamilyBlues,
            9 => FamilyOtherBlues,
            10 => StdHw,
            11 => StdVw,
            19 => SubrsOffset,
            20 => DefaultWidthX,
            21 => NominalWidthX,
            _ => return None,
        })
    }

    fn from_extended_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            // Top DICT operators
            0 => Copyright,
            1 => IsFixedPitch,
            2 => ItalicAngle,
            3 => UnderlinePosition,
            4 => UnderlineThickness,
            5 => PaintType,
            6 => CharstringType,
            7 => FontMatrix,
            8 => StrokeWidth,
            20 => SyntheticBase,
            21 => PostScript,
            22 => BaseFontName,
            23 => BaseFontBlend,
            30 => Ros,
            31 => CidFontVersion,
            32 => CidFontRevision,
            33 => CidFontType,
            34 => CidCount,
            35 => UidBase,
            36 => FdArrayOffset,
            37 => FdSelectOffset,
            38 => FontName,
            // Private DICT operators
            9 => BlueScale,
            10 => BlueShift,
            11 => BlueFuzz,
            12 => StemSnapH,
            13 => StemSnapV,
            14 => ForceBold,
            17 => LanguageGroup,
            18 => ExpansionFactor,
            19 => InitialRandomSeed,
            _ => return None,
        })
    }
}

/// Either a PostScript DICT operator or a (numeric) operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Operator(Operator),
    Operand(Number),
}

impl From<Operator> for Token {
    fn from(value: Operator) -> Self {
        Self::Operator(value)
    }
}

impl<T> From<T> for Token
where
    T: Into<Number>,
{
    fn from(value: T) -> Self {
        Self::Operand(value.into())
    }
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// raw operands and operators.
pub fn tokens(dict_data: &[u8]) -> impl Iterator<Item = Result<Token, Error>> + '_ + Clone {
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || {
        if cursor.remaining_bytes() == 0 {
            None
        } else {
            Some(parse_token(&mut cursor))
        }
    })
}

fn parse_token(cursor: &mut Cursor) -> Result<Token, Error> {
    // Escape opcode for accessing extensions.
    const ESCAPE: u8 = 12;
    let b0 = cursor.read::<u8>()?;
    Ok(if b0 == ESCAPE {
        let b1 = cursor.read::<u8>()?;
        Token::Operator(Operator::from_extended_opcode(b1).ok_or(Error::InvalidDictOperator(b1))?)
    } else {
        // See "Table 3 Operand Encoding" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=10>
        match b0 {
            28 | 29 | 32..=254 => Token::Operand(parse_int(cursor, b0)?.into()),
            30 => Token::Operand(parse_bcd(cursor)?.into()),
            _ => Token::Operator(Operator::from_opcode(b0).ok_or(Error::InvalidDictOperator(b0))?),
        }
    })
}

/// PostScript DICT operator with its associated operands.
///
/// Array valued hinting operators are reported without their operands as
/// [`Entry::Unparsed`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Entry {
    Version(StringId),
    Notice(StringId),
    FullName(StringId),
    FamilyName(StringId),
    Weight(StringId),
    FontBbox([Fixed; 4]),
    CharstringsOffset(usize),
    PrivateDictRange(Range<usize>),
    Copyright(StringId),
    IsFixedPitch(bool),
    ItalicAngle(Fixed),
    UnderlinePosition(Fixed),
    UnderlineThickness(Fixed),
    PaintType(i32),
    CharstringType(i32),
    FontMatrix([Fixed; 6]),
    StrokeWidth(Fixed),
    FdArrayOffset(usize),
    FdSelectOffset(usize),
    SubrsOffset(usize),
    BlueScale(Fixed),
    BlueShift(Fixed),
    BlueFuzz(Fixed),
    LanguageGroup(i32),
    ExpansionFactor(Fixed),
    Encoding(usize),
    Charset(usize),
    UniqueId(i32),
    SyntheticBase(i32),
    PostScript(StringId),
    BaseFontName(StringId),
    Ros {
        registry: StringId,
        ordering: StringId,
        supplement: Fixed,
    },
    CidFontVersion(Fixed),
    CidFontRevision(Fixed),
    CidFontType(i32),
    CidCount(u32),
    UidBase(i32),
    FontName(StringId),
    StdHw(Fixed),
    StdVw(Fixed),
    DefaultWidthX(Fixed),
    NominalWidthX(Fixed),
    ForceBold(bool),
    InitialRandomSeed(i32),
    Unparsed(Operator),
}

/// Given a byte slice containing DICT data, returns an iterator yielding
/// each operator with its associated operands.
pub fn entries(dict_data: &[u8]) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
    let mut stack = Stack::new();
    let mut cursor = FontData::new(dict_data).cursor();
    std::iter::from_fn(move || loop {
        if cursor.remaining_bytes() == 0 {
            return None;
        }
        let token = match parse_token(&mut cursor) {
            Ok(token) => token,
            Err(e) => return Some(Err(e)),
        };
        match token {
            Token::Operand(number) => match stack.push(number) {
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            },
            Token::Operator(op) => {
                let entry = parse_entry(op, &mut stack);
                stack.clear();
                return Some(entry);
            }
        }
    })
}

fn parse_entry(op: Operator, stack: &mut Stack) -> Result<Entry, Error> {
    use Operator::*;
    Ok(match op {
        Version => Entry::Version(stack.pop_i32()?.into()),
        Notice => Entry::Notice(stack.pop_i32()?.into()),
        FullName => Entry::FullName(stack.pop_i32()?.into()),
        FamilyName => Entry::FamilyName(stack.pop_i32()?.into()),
        Weight => Entry::Weight(stack.pop_i32()?.into()),
        FontBbox => Entry::FontBbox(stack.fixed_array::<4>(0)?),
        CharstringsOffset => Entry::CharstringsOffset(pop_offset(stack)?),
        PrivateDictRange => {
            let len = to_offset(stack.get_i32(0)?)?;
            let start = to_offset(stack.get_i32(1)?)?;
            let end = start.checked_add(len).ok_or(ReadError::OutOfBounds)?;
            Entry::PrivateDictRange(start..end)
        }
        Copyright => Entry::Copyright(stack.pop_i32()?.into()),
        IsFixedPitch => Entry::IsFixedPitch(stack.pop_i32()? != 0),
        ItalicAngle => Entry::ItalicAngle(stack.pop_fixed()?),
        UnderlinePosition => Entry::UnderlinePosition(stack.pop_fixed()?),
        UnderlineThickness => Entry::UnderlineThickness(stack.pop_fixed()?),
        PaintType => Entry::PaintType(stack.pop_i32()?),
        CharstringType => Entry::CharstringType(stack.pop_i32()?),
        FontMatrix => Entry::FontMatrix(stack.fixed_array::<6>(0)?),
        StrokeWidth => Entry::StrokeWidth(stack.pop_fixed()?),
        FdArrayOffset => Entry::FdArrayOffset(pop_offset(stack)?),
        FdSelectOffset => Entry::FdSelectOffset(pop_offset(stack)?),
        SubrsOffset => Entry::SubrsOffset(pop_offset(stack)?),
        BlueScale => Entry::BlueScale(stack.pop_fixed()?),
        BlueShift => Entry::BlueShift(stack.pop_fixed()?),
        BlueFuzz => Entry::BlueFuzz(stack.pop_fixed()?),
        LanguageGroup => Entry::LanguageGroup(stack.pop_i32()?),
        ExpansionFactor => Entry::ExpansionFactor(stack.pop_fixed()?),
        Encoding => Entry::Encoding(pop_offset(stack)?),
        Charset => Entry::Charset(pop_offset(stack)?),
        UniqueId => Entry::UniqueId(stack.pop_i32()?),
        SyntheticBase => Entry::SyntheticBase(stack.pop_i32()?),
        PostScript => Entry::PostScript(stack.pop_i32()?.into()),
        BaseFontName => Entry::BaseFontName(stack.pop_i32()?.into()),
        Ros => Entry::Ros {
            registry: stack.get_i32(0)?.into(),
            ordering: stack.get_i32(1)?.into(),
            supplement: stack.get_fixed(2)?,
        },
        CidFontVersion => Entry::CidFontVersion(stack.pop_fixed()?),
        CidFontRevision => Entry::CidFontRevision(stack.pop_fixed()?),
        CidFontType => Entry::CidFontType(stack.pop_i32()?),
        CidCount => Entry::CidCount(stack.pop_i32()? as u32),
        UidBase => Entry::UidBase(stack.pop_i32()?),
        FontName => Entry::FontName(stack.pop_i32()?.into()),
        StdHw => Entry::StdHw(stack.pop_fixed()?),
        StdVw => Entry::StdVw(stack.pop_fixed()?),
        DefaultWidthX => Entry::DefaultWidthX(stack.pop_fixed()?),
        NominalWidthX => Entry::NominalWidthX(stack.pop_fixed()?),
        ForceBold => Entry::ForceBold(stack.pop_i32()? != 0),
        InitialRandomSeed => Entry::InitialRandomSeed(stack.pop_i32()?),
        BlueValues | OtherBlues | FamilyBlues | FamilyOtherBlues | StemSnapH | StemSnapV
        | Xuid | BaseFontBlend => Entry::Unparsed(op),
    })
}

fn pop_offset(stack: &mut Stack) -> Result<usize, Error> {
    to_offset(stack.pop_i32()?)
}

fn to_offset(value: i32) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| ReadError::OutOfBounds.into())
}

/// Parse an integer operand.
///
/// The first byte has already been read and is passed as `b0`. This is
/// shared between DICTs and charstrings, where 29 is not a valid prefix.
///
/// See "Table 3 Operand Encoding" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=10>
pub(crate) fn parse_int(cursor: &mut Cursor, b0: u8) -> Result<i32, Error> {
    Ok(match b0 {
        32..=246 => b0 as i32 - 139,
        247..=250 => (b0 as i32 - 247) * 256 + cursor.read::<u8>()? as i32 + 108,
        251..=254 => -(b0 as i32 - 251) * 256 - cursor.read::<u8>()? as i32 - 108,
        28 => cursor.read::<i16>()? as i32,
        29 => cursor.read::<i32>()?,
        _ => return Err(Error::InvalidNumber),
    })
}

/// Mantissas are accumulated while they fit in 16.16 without overflowing
/// an `i64`. Further digits only affect the exponent.
const BCD_MANTISSA_LIMIT: i64 = 1_000_000_000_000;

/// Parse a real number encoded as binary coded decimal nibbles.
///
/// The `30` prefix byte has already been read. Out of range values
/// saturate.
///
/// See "Table 5 Nibble Definitions" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=11>
fn parse_bcd(cursor: &mut Cursor) -> Result<Fixed, Error> {
    let mut mantissa = 0i64;
    let mut power = 0i32;
    let mut negative = false;
    let mut in_fraction = false;
    let mut exponent: Option<(i32, i32)> = None;
    'outer: loop {
        let byte = cursor.read::<u8>()?;
        for nibble in [byte >> 4, byte & 0xF] {
            match nibble {
                0x0..=0x9 => {
                    if let Some((_, exp)) = exponent.as_mut() {
                        *exp = (*exp * 10 + nibble as i32).min(1000);
                    } else if mantissa < BCD_MANTISSA_LIMIT {
                        mantissa = mantissa * 10 + nibble as i64;
                        if in_fraction {
                            power -= 1;
                        }
                    } else if !in_fraction {
                        power += 1;
                    }
                }
                0xA => in_fraction = true,
                0xB => exponent = Some((1, 0)),
                0xC => exponent = Some((-1, 0)),
                0xE => negative = true,
                0xF => break 'outer,
                _ => return Err(Error::InvalidNumber),
            }
        }
    }
    if mantissa == 0 {
        return Ok(Fixed::ZERO);
    }
    let power = power + exponent.map(|(sign, exp)| sign * exp).unwrap_or(0);
    let mut bits = mantissa << 16;
    if power >= 0 {
        for _ in 0..power {
            bits = bits.saturating_mul(10);
            if bits > i32::MAX as i64 {
                break;
            }
        }
    } else if power < -18 {
        bits = 0;
    } else {
        let divisor = 10i64.pow((-power) as u32);
        bits = (bits + divisor / 2) / divisor;
    }
    let bits = bits.min(i32::MAX as i64) as i32;
    Ok(Fixed::from_bits(if negative { -bits } else { bits }))
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::cff;

    use super::*;

    #[test]
    fn int_operands() {
        // Test the boundary conditions of the ranged int operators
        let empty = FontData::new(&[]);
        let min_byte = FontData::new(&[0]);
        let max_byte = FontData::new(&[255]);
        // 32..=246 => -107..=107
        assert_eq!(parse_int(&mut empty.cursor(), 32).unwrap(), -107);
        assert_eq!(parse_int(&mut empty.cursor(), 246).unwrap(), 107);
        // 247..=250 => +108 to +1131
        assert_eq!(parse_int(&mut min_byte.cursor(), 247).unwrap(), 108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 250).unwrap(), 1131);
        // 251..=254 => -1131 to -108
        assert_eq!(parse_int(&mut min_byte.cursor(), 251).unwrap(), -108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 254).unwrap(), -1131);
        assert!(parse_int(&mut empty.cursor(), 28).is_err());
    }

    #[test]
    fn binary_coded_decimal_operands() {
        // "the value -2.25 is encoded by the byte sequence (1e e2 a2 5f)
        // and the value 0.140541E-3 by the sequence (1e 0a 14 05 41 c3 ff)."
        // The leading 1e selects the real number encoding and is dropped here.
        let bytes = FontData::new(&[0xe2, 0xa2, 0x5f]);
        assert_eq!(
            parse_bcd(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(-2.25)
        );
        let bytes = FontData::new(&[0x0a, 0x14, 0x05, 0x41, 0xc3, 0xff]);
        assert_eq!(
            parse_bcd(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(0.140541E-3)
        );
        // 0.001
        let bytes = FontData::new(&[0xa0, 0x01, 0xff]);
        assert_eq!(
            parse_bcd(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(0.001)
        );
        // 1E5 saturates
        let bytes = FontData::new(&[0x1b, 0x5f]);
        assert_eq!(parse_bcd(&mut bytes.cursor()).unwrap(), Fixed::MAX);
        // unterminated
        let bytes = FontData::new(&[0x12]);
        assert!(parse_bcd(&mut bytes.cursor()).is_err());
    }

    #[test]
    fn private_dict_entries() {
        let builder = cff::cff_builder();
        let data = builder.build();
        // the private DICT is last, followed by its subroutines
        let subrs_len = cff::index(&builder.private.subrs).len();
        let start = data.len() - subrs_len - 18;
        let entries: Vec<_> = entries(&data[start..start + 18])
            .map(|e| e.unwrap())
            .collect();
        assert_eq!(
            entries,
            [
                Entry::DefaultWidthX(Fixed::from_i32(cff::DEFAULT_WIDTH)),
                Entry::NominalWidthX(Fixed::from_i32(cff::NOMINAL_WIDTH)),
                Entry::SubrsOffset(18),
            ]
        );
    }

    #[test]
    fn top_dict_tokens() {
        use Operator::*;
        // 391 version, 5 byte charset offset, escaped FontMatrix operator
        let dict = [248, 27, 0, 29, 0, 0, 0, 80, 15, 12, 7];
        let tokens: Vec<_> = tokens(&dict).map(|t| t.unwrap()).collect();
        let expected: &[Token] = &[391.into(), Version.into(), 80.into(), Charset.into(), FontMatrix.into()];
        assert_eq!(&tokens, expected);
        // FontMatrix without operands underflows
        let entries: Vec<_> = entries(&dict).collect();
        assert_eq!(entries[0], Ok(Entry::Version(StringId::new(391))));
        assert_eq!(entries[1], Ok(Entry::Charset(80)));
        assert_eq!(entries[2], Err(Error::InvalidStackAccess(5)));
    }

    #[test]
    fn invalid_operator() {
        let dict = [139, 25];
        assert_eq!(
            entries(&dict).next(),
            Some(Err(Error::InvalidDictOperator(25)))
        );
    }

    // A private DICT that tries to construct a range from -1..(-1 + -1)
    #[test]
    fn private_dict_range_rejects_negatives() {
        let private_dict = [29u8, 0xFF, 0xFF, 0xFF, 0xFF, 29, 0xFF, 0xFF, 0xFF, 0xFF, 18];
        assert!(entries(&private_dict).next().unwrap().is_err());
    }

    #[test]
    fn font_matrix() {
        // 0.001 0 0 0.001 0 0 FontMatrix
        let dict = [
            30u8, 0xa0, 0x01, 0xff, 139, 139, 30, 0xa0, 0x01, 0xff, 139, 139, 12, 7,
        ];
        let entry = entries(&dict).next().unwrap().unwrap();
        let thousandth = Fixed::from_f64(0.001);
        assert_eq!(
            entry,
            Entry::FontMatrix([
                thousandth,
                Fixed::ZERO,
                Fixed::ZERO,
                thousandth,
                Fixed::ZERO,
                Fixed::ZERO
            ])
        );
    }
}
