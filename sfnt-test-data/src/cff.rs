//! A CFF font and the pieces for building others.

use sfnt_types::Tag;

use crate::{
    bebuffer::BeBuffer,
    builder::{metrics_table, FontBuilder, HeadBuilder, HheaBuilder},
    tables::{cmap4, cmap_table, name_table, post_table, Os2Builder},
};

/// Charstring operators used by the fixtures.
pub mod op {
    pub const HSTEM: u8 = 1;
    pub const VSTEM: u8 = 3;
    pub const VMOVETO: u8 = 4;
    pub const RLINETO: u8 = 5;
    pub const HLINETO: u8 = 6;
    pub const VLINETO: u8 = 7;
    pub const RRCURVETO: u8 = 8;
    pub const CALLSUBR: u8 = 10;
    pub const RETURN: u8 = 11;
    pub const ENDCHAR: u8 = 14;
    pub const HINTMASK: u8 = 19;
    pub const RMOVETO: u8 = 21;
    pub const HMOVETO: u8 = 22;
    pub const RCURVELINE: u8 = 24;
    pub const RLINECURVE: u8 = 25;
    pub const VVCURVETO: u8 = 26;
    pub const HHCURVETO: u8 = 27;
    pub const CALLGSUBR: u8 = 29;
    pub const VHCURVETO: u8 = 30;
    pub const HVCURVETO: u8 = 31;
}

/// An element of a charstring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cs {
    /// An integer operand.
    N(i32),
    /// A one byte operator.
    Op(u8),
    /// A raw byte, such as a hint mask.
    Raw(u8),
}

/// Encode a Type 2 charstring.
pub fn charstring(items: &[Cs]) -> Vec<u8> {
    let mut out = Vec::new();
    for item in items {
        match *item {
            Cs::N(v) => encode_charstring_int(v, &mut out),
            Cs::Op(op) | Cs::Raw(op) => out.push(op),
        }
    }
    out
}

fn encode_charstring_int(v: i32, out: &mut Vec<u8>) {
    match v {
        -107..=107 => out.push((v + 139) as u8),
        108..=1131 => {
            let v = v - 108;
            out.extend([((v >> 8) + 247) as u8, v as u8]);
        }
        -1131..=-108 => {
            let v = -v - 108;
            out.extend([((v >> 8) + 251) as u8, v as u8]);
        }
        _ => {
            out.push(28);
            out.extend((v as i16).to_be_bytes());
        }
    }
}

/// Encode an INDEX with the smallest offset size.
pub fn index(items: &[Vec<u8>]) -> Vec<u8> {
    if items.is_empty() {
        return vec![0, 0];
    }
    let total: usize = items.iter().map(Vec::len).sum();
    let off_size = match total + 1 {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFFFFFF => 3,
        _ => 4,
    };
    let mut out = BeBuffer::new()
        .push(items.len() as u16)
        .push(off_size as u8)
        .into_vec();
    let mut offset = 1u32;
    let mut push_offset = |out: &mut Vec<u8>, offset: u32| {
        out.extend_from_slice(&offset.to_be_bytes()[4 - off_size..]);
    };
    push_offset(&mut out, offset);
    for item in items {
        offset += item.len() as u32;
        push_offset(&mut out, offset);
    }
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// A DICT integer in the fixed five byte encoding, so that offsets can be
/// patched without changing the size of the DICT.
fn dict_int(v: i32) -> [u8; 5] {
    let [a, b, c, d] = v.to_be_bytes();
    [29, a, b, c, d]
}

/// A private DICT and its local subroutines.
#[derive(Clone, Debug, Default)]
pub struct PrivateDict {
    pub default_width_x: i32,
    pub nominal_width_x: i32,
    pub subrs: Vec<Vec<u8>>,
}

impl PrivateDict {
    const LEN: usize = 18;

    /// The DICT followed immediately by the local subroutines.
    fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(dict_int(self.default_width_x));
        out.push(20);
        out.extend(dict_int(self.nominal_width_x));
        out.push(21);
        out.extend(dict_int(Self::LEN as i32));
        out.push(19);
        out.extend(index(&self.subrs));
        out
    }
}

/// The pieces of a CFF table.
#[derive(Clone, Debug, Default)]
pub struct CffBuilder {
    pub name: String,
    pub strings: Vec<String>,
    pub global_subrs: Vec<Vec<u8>>,
    pub charstrings: Vec<Vec<u8>>,
    /// SIDs for glyphs 1 and up.
    pub charset: Vec<u16>,
    pub private: PrivateDict,
    /// For CID keyed fonts: the font DICT index of each glyph and one
    /// private DICT per font DICT.
    pub cid: Option<(Vec<u8>, Vec<PrivateDict>)>,
}

impl CffBuilder {
    pub fn build(&self) -> Vec<u8> {
        const HEADER: [u8; 4] = [1, 0, 4, 4];
        // every operand is a five byte integer so the sizes are known up front
        let top_dict_len = match self.cid {
            None => 6 + 6 + 11,
            Some(_) => 17 + 6 + 6 + 7 + 7,
        };
        let name_index = index(&[self.name.as_bytes().to_vec()]);
        let top_dict_index_len = index(&[vec![0; top_dict_len]]).len();
        let strings: Vec<Vec<u8>> = self.strings.iter().map(|s| s.as_bytes().to_vec()).collect();
        let string_index = index(&strings);
        let gsubr_index = index(&self.global_subrs);
        let charset_offset = HEADER.len()
            + name_index.len()
            + top_dict_index_len
            + string_index.len()
            + gsubr_index.len();
        let mut charset = vec![0u8];
        for sid in &self.charset {
            charset.extend(sid.to_be_bytes());
        }
        let fd_select_offset = charset_offset + charset.len();
        let mut tail = Vec::new();
        if let Some((fds, _)) = &self.cid {
            tail.extend(fd_select3(fds));
        }
        let charstrings_offset = fd_select_offset + tail.len();
        tail.extend(index(&self.charstrings));
        let after_charstrings = fd_select_offset + tail.len();

        let mut top_dict = Vec::new();
        match &self.cid {
            None => {
                top_dict.extend(dict_int(charset_offset as i32));
                top_dict.push(15);
                top_dict.extend(dict_int(charstrings_offset as i32));
                top_dict.push(17);
                top_dict.extend(dict_int(PrivateDict::LEN as i32));
                top_dict.extend(dict_int(after_charstrings as i32));
                top_dict.push(18);
                tail.extend(self.private.build());
            }
            Some((_, privates)) => {
                let fd_array_len = index(&vec![vec![0; 11]; privates.len()]).len();
                let mut private_offset = after_charstrings + fd_array_len;
                let mut font_dicts = Vec::new();
                let mut private_data = Vec::new();
                for private in privates {
                    let mut dict = Vec::new();
                    dict.extend(dict_int(PrivateDict::LEN as i32));
                    dict.extend(dict_int(private_offset as i32));
                    dict.push(18);
                    font_dicts.push(dict);
                    let data = private.build();
                    private_offset += data.len();
                    private_data.extend(data);
                }
                tail.extend(index(&font_dicts));
                tail.extend(private_data);
                // registry, ordering, supplement
                top_dict.extend(dict_int(391));
                top_dict.extend(dict_int(392));
                top_dict.extend(dict_int(0));
                top_dict.extend([12, 30]);
                top_dict.extend(dict_int(charset_offset as i32));
                top_dict.push(15);
                top_dict.extend(dict_int(charstrings_offset as i32));
                top_dict.push(17);
                top_dict.extend(dict_int(after_charstrings as i32));
                top_dict.extend([12, 36]);
                top_dict.extend(dict_int(fd_select_offset as i32));
                top_dict.extend([12, 37]);
            }
        }
        debug_assert_eq!(top_dict.len(), top_dict_len);

        let mut out = HEADER.to_vec();
        out.extend(name_index);
        out.extend(index(&[top_dict]));
        out.extend(string_index);
        out.extend(gsubr_index);
        out.extend(charset);
        out.extend(tail);
        out
    }
}

/// FDSelect format 3 from the font DICT index of every glyph.
fn fd_select3(fds: &[u8]) -> Vec<u8> {
    let mut ranges: Vec<(u16, u8)> = Vec::new();
    for (gid, fd) in fds.iter().enumerate() {
        if ranges.last().map(|(_, last)| last) != Some(fd) {
            ranges.push((gid as u16, *fd));
        }
    }
    let mut buf = BeBuffer::new().push(3u8).push(ranges.len() as u16);
    for (first, fd) in ranges {
        buf = buf.push(first).push(fd);
    }
    buf.push(fds.len() as u16).into_vec()
}

pub const GLYPH_A: u16 = 1;
pub const GLYPH_CURVE: u16 = 2;
pub const GLYPH_SUBRS: u16 = 3;
pub const GLYPH_TWO_CONTOURS: u16 = 4;
pub const GLYPH_RECURSIVE_SUBR: u16 = 5;
pub const GLYPH_CUSTOM_NAME: u16 = 6;
pub const NUM_GLYPHS: u16 = 7;

pub const DEFAULT_WIDTH: i32 = 480;
pub const NOMINAL_WIDTH: i32 = 20;
pub const CID_SECOND_DEFAULT_WIDTH: i32 = 600;
pub const VORG_DEFAULT: i16 = 880;
pub const VORG_A: i16 = 900;

/// The glyphs of the [`font`], in builder form.
pub fn cff_builder() -> CffBuilder {
    use op::*;
    use Cs::*;
    let bias = 107;
    let charstrings = vec![
        // .notdef: width only
        charstring(&[N(500 - NOMINAL_WIDTH), Op(ENDCHAR)]),
        // A: width, then a closed polygon
        charstring(&[
            N(544 - NOMINAL_WIDTH),
            N(3),
            N(0),
            Op(RMOVETO),
            N(538),
            Op(HLINETO),
            N(-223),
            N(656),
            Op(RLINETO),
            N(-92),
            Op(HLINETO),
            Op(ENDCHAR),
        ]),
        // hints and a hint mask before a single curve; default width
        charstring(&[
            N(10),
            N(20),
            Op(HSTEM),
            N(5),
            N(30),
            Op(VSTEM),
            Op(HINTMASK),
            Raw(0xC0),
            N(0),
            N(0),
            Op(RMOVETO),
            N(100),
            N(0),
            N(50),
            N(50),
            N(0),
            N(100),
            Op(RRCURVETO),
            Op(ENDCHAR),
        ]),
        // local and global subroutines
        charstring(&[
            N(200 - NOMINAL_WIDTH),
            N(0),
            N(0),
            Op(RMOVETO),
            N(-bias),
            Op(CALLSUBR),
            N(-bias),
            Op(CALLGSUBR),
            Op(ENDCHAR),
        ]),
        // two contours, the second moveto closes the first
        charstring(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(10),
            N(0),
            Op(RLINETO),
            N(0),
            N(10),
            Op(RLINETO),
            N(50),
            N(50),
            Op(RMOVETO),
            N(10),
            N(0),
            Op(RLINETO),
            N(0),
            N(10),
            Op(RLINETO),
            Op(ENDCHAR),
        ]),
        // a subroutine that calls itself
        charstring(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(1 - bias),
            Op(CALLSUBR),
            Op(ENDCHAR),
        ]),
        // hvcurveto
        charstring(&[
            N(0),
            N(0),
            Op(RMOVETO),
            N(50),
            N(50),
            N(50),
            N(50),
            Op(HVCURVETO),
            Op(ENDCHAR),
        ]),
    ];
    CffBuilder {
        name: "SfntTest-Regular".into(),
        strings: vec!["F.ss01".into()],
        global_subrs: vec![charstring(&[Cs::N(0), Cs::N(100), Cs::Op(op::RLINETO), Cs::Op(op::RETURN)])],
        charstrings,
        // A, B, C, D, E and a custom string
        charset: vec![34, 35, 36, 37, 38, 391],
        private: PrivateDict {
            default_width_x: DEFAULT_WIDTH,
            nominal_width_x: NOMINAL_WIDTH,
            subrs: vec![
                charstring(&[Cs::N(100), Cs::N(0), Cs::Op(op::RLINETO), Cs::Op(op::RETURN)]),
                charstring(&[Cs::N(1 - 107), Cs::Op(op::CALLSUBR), Cs::Op(op::RETURN)]),
            ],
        },
        cid: None,
    }
}

/// The CFF table of the [`font`].
pub fn cff_table() -> Vec<u8> {
    cff_builder().build()
}

/// A CID keyed variant of [`cff_table`] where glyphs 0 to 3 use the first
/// font DICT and the rest use the second, which has a different default
/// width.
pub fn cid_cff_table() -> Vec<u8> {
    let base = cff_builder();
    let mut second = base.private.clone();
    second.default_width_x = CID_SECOND_DEFAULT_WIDTH;
    CffBuilder {
        strings: vec!["Adobe".into(), "Identity".into()],
        charset: (1..NUM_GLYPHS).collect(),
        cid: Some((vec![0, 0, 0, 0, 1, 1, 1], vec![base.private.clone(), second])),
        ..base
    }
    .build()
}

/// An OpenType font with CFF outlines.
pub fn builder() -> FontBuilder {
    builder_with_cff(cff_table())
}

/// The [`font`] with its CFF table replaced by a CID keyed one.
pub fn cid_font() -> Vec<u8> {
    builder_with_cff(cid_cff_table()).build()
}

fn builder_with_cff(cff: Vec<u8>) -> FontBuilder {
    let metrics: Vec<(u16, i16)> = [500, 544, DEFAULT_WIDTH as u16, 200, 480, 480, 480]
        .iter()
        .map(|adv| (*adv, 0))
        .collect();
    let mut builder = FontBuilder::new();
    builder
        .sfnt_version(sfnt_types::CFF_SFNT_VERSION)
        .add_raw(
            Tag::new(b"head"),
            HeadBuilder {
                bbox: [0, 0, 541, 656],
                ..Default::default()
            }
            .build(),
        )
        .add_raw(
            Tag::new(b"hhea"),
            HheaBuilder {
                ascender: 800,
                descender: -200,
                line_gap: 90,
                number_of_long_metrics: metrics.len() as u16,
                ..Default::default()
            }
            .build(),
        )
        .add_raw(Tag::new(b"maxp"), FontBuilder::maxp_table(NUM_GLYPHS))
        .add_raw(Tag::new(b"hmtx"), metrics_table(&metrics, metrics.len()))
        .add_raw(
            Tag::new(b"cmap"),
            cmap_table(&[(3, 1, cmap4(&[(0x41, 1), (0x42, 2), (0x43, 3)]))]),
        )
        .add_raw(Tag::new(b"OS/2"), Os2Builder::default().build())
        .add_raw(
            Tag::new(b"post"),
            post_table(sfnt_types::Fixed::ZERO, -100, 50, false, None),
        )
        .add_raw(
            Tag::new(b"name"),
            name_table(&[(3, 1, 0x409, 1, "Sfnt Test"), (3, 1, 0x409, 2, "Regular")]),
        )
        .add_raw(Tag::new(b"CFF "), cff)
        .add_raw(
            Tag::new(b"VORG"),
            be_buffer! { 1u16, 0u16, VORG_DEFAULT, 1u16, GLYPH_A, VORG_A }.into_vec(),
        );
    builder
}

/// The assembled font.
pub fn font() -> Vec<u8> {
    builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charstring_integers() {
        let mut out = Vec::new();
        for v in [0, 107, -107, 108, 1131, -108, -1131, 2000, -2000] {
            encode_charstring_int(v, &mut out);
        }
        assert_eq!(
            out,
            [
                139, 246, 32, 247, 0, 250, 255, 251, 0, 254, 255, 28, 0x07, 0xD0, 28, 0xF8,
                0x30
            ]
        );
    }

    #[test]
    fn index_offsets() {
        let data = index(&[b"ab".to_vec(), b"c".to_vec()]);
        assert_eq!(data, [0, 2, 1, 1, 3, 4, b'a', b'b', b'c']);
        assert_eq!(index(&[]), [0, 0]);
    }

    #[test]
    fn fd_select_ranges() {
        assert_eq!(
            fd_select3(&[0, 0, 1, 1, 0]),
            [3, 0, 3, 0, 0, 0, 0, 2, 1, 0, 4, 0, 0, 5]
        );
    }
}
