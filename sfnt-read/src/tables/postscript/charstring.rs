//! Parsing for PostScript Type 2 charstrings.

use super::{Error, Index, Stack};
use crate::{font_data::Cursor, types::Fixed, FontData};

/// Maximum nesting depth for subroutine calls.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: u32 = 10;

/// Trait for processing commands resulting from charstring evaluation.
///
/// During processing, the path construction operators (see "4.1 Path
/// Construction Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=15>)
/// are simplified into the basic move, line, curve and close commands.
///
/// This also has optional callbacks for processing hint operators. See "4.3
/// Hint Operators" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
/// for more detail.
#[allow(unused_variables)]
pub trait CommandSink {
    // Path construction operators.
    fn move_to(&mut self, x: Fixed, y: Fixed);
    fn line_to(&mut self, x: Fixed, y: Fixed);
    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed);
    fn close(&mut self);
    // Hint operators.
    /// Horizontal stem hint with edges at `y0` and `y1`.
    fn hstem(&mut self, y0: Fixed, y1: Fixed) {}
    /// Vertical stem hint with edges at `x0` and `x1`.
    fn vstem(&mut self, x0: Fixed, x1: Fixed) {}
    /// Bitmask defining the hints that should be made active for the
    /// commands that follow.
    fn hint_mask(&mut self, mask: &[u8]) {}
    /// Bitmask defining the counter hints that should be made active for the
    /// commands that follow.
    fn counter_mask(&mut self, mask: &[u8]) {}
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        (**self).move_to(x, y)
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        (**self).line_to(x, y)
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        (**self).curve_to(cx0, cy0, cx1, cy1, x, y)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn hstem(&mut self, y0: Fixed, y1: Fixed) {
        (**self).hstem(y0, y1)
    }

    fn vstem(&mut self, x0: Fixed, x1: Fixed) {
        (**self).vstem(x0, x1)
    }

    fn hint_mask(&mut self, mask: &[u8]) {
        (**self).hint_mask(mask)
    }

    fn counter_mask(&mut self, mask: &[u8]) {
        (**self).counter_mask(mask)
    }
}

/// Evaluates the given charstring and emits the resulting commands to the
/// specified sink.
///
/// If the Private DICT associated with this charstring contains local
/// subroutines, then the `subrs` index must be provided, otherwise
/// `Error::MissingSubroutines` will be returned if a callsubr operator
/// is present.
///
/// Returns the width operand if the charstring contains one. The advance
/// width of the glyph is this value added to the nominal width of the
/// Private DICT. When `None`, the default width applies.
///
/// Any open contour is closed when a new one begins and at the end of the
/// charstring.
pub fn evaluate(
    charstring_data: &[u8],
    global_subrs: Index,
    subrs: Option<Index>,
    sink: &mut impl CommandSink,
) -> Result<Option<Fixed>, Error> {
    let mut evaluator = Evaluator::new(global_subrs, subrs, sink);
    evaluator.evaluate(charstring_data, 0)?;
    if evaluator.is_open {
        evaluator.sink.close();
    }
    Ok(evaluator.width)
}

/// Transient state for evaluating a charstring and handling recursive
/// subroutine calls.
struct Evaluator<'a, S> {
    global_subrs: Index<'a>,
    subrs: Option<Index<'a>>,
    sink: &'a mut S,
    is_open: bool,
    have_read_width: bool,
    width: Option<Fixed>,
    finished: bool,
    stem_count: usize,
    x: Fixed,
    y: Fixed,
    stack: Stack,
}

impl<'a, S> Evaluator<'a, S>
where
    S: CommandSink,
{
    fn new(global_subrs: Index<'a>, subrs: Option<Index<'a>>, sink: &'a mut S) -> Self {
        Self {
            global_subrs,
            subrs,
            sink,
            is_open: false,
            have_read_width: false,
            width: None,
            finished: false,
            stem_count: 0,
            stack: Stack::new(),
            x: Fixed::ZERO,
            y: Fixed::ZERO,
        }
    }

    fn evaluate(&mut self, charstring_data: &[u8], nesting_depth: u32) -> Result<(), Error> {
        if nesting_depth > NESTING_DEPTH_LIMIT {
            return Err(Error::CharstringNestingDepthLimitExceeded);
        }
        let mut cursor = FontData::new(charstring_data).cursor();
        while cursor.remaining_bytes() != 0 && !self.finished {
            let b0 = cursor.read::<u8>()?;
            match b0 {
                // See "3.2 Charstring Number Encoding" <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=12>
                //
                // Push an integer to the stack
                28 | 32..=254 => {
                    self.stack.push(super::dict::parse_int(&mut cursor, b0)?)?;
                }
                // Push a fixed point value to the stack
                255 => {
                    let num = Fixed::from_bits(cursor.read::<i32>()?);
                    self.stack.push(num)?;
                }
                _ => {
                    let operator = Operator::read(&mut cursor, b0)?;
                    if !self.evaluate_operator(operator, &mut cursor, nesting_depth)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// The first stack clearing operator may carry the advance width as an
    /// extra leading operand.
    ///
    /// Returns the index of the first real argument.
    fn take_width(&mut self, has_extra_operand: bool) -> Result<usize, Error> {
        if self.have_read_width {
            return Ok(0);
        }
        self.have_read_width = true;
        if has_extra_operand {
            self.width = Some(self.stack.get_fixed(0)?);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn begin_contour(&mut self) {
        if self.is_open {
            self.sink.close();
        }
        self.is_open = true;
    }

    /// Evaluates a single charstring operator.
    ///
    /// Returns `Ok(true)` if evaluation should continue.
    fn evaluate_operator(
        &mut self,
        operator: Operator,
        cursor: &mut Cursor,
        nesting_depth: u32,
    ) -> Result<bool, Error> {
        use Operator::*;
        match operator {
            // The following "flex" operators are intended to emit
            // either two curves or a straight line depending on
            // a "flex depth" parameter and the distance from the
            // joining point to the chord connecting the two
            // end points. We always emit the two curves.
            //
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=18>
            Flex => {
                let args = self.stack.fixed_array::<12>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dy3 = dy2 + args[5];
                let dx4 = dx3 + args[6];
                let dy4 = dy3 + args[7];
                let dx5 = dx4 + args[8];
                let dy5 = dy4 + args[9];
                self.x = dx5 + args[10];
                self.y = dy5 + args[11];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            HFlex => {
                let args = self.stack.fixed_array::<7>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y;
                let dx2 = dx1 + args[1];
                let dy2 = dy1 + args[2];
                let dx3 = dx2 + args[3];
                let dy3 = dy2;
                let dx4 = dx3 + args[4];
                let dy4 = dy2;
                let dx5 = dx4 + args[5];
                let dy5 = self.y;
                self.x = dx5 + args[6];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            HFlex1 => {
                let args = self.stack.fixed_array::<9>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dy3 = dy2;
                let dx4 = dx3 + args[5];
                let dy4 = dy2;
                let dx5 = dx4 + args[6];
                let dy5 = dy4 + args[7];
                self.x = dx5 + args[8];
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            Flex1 => {
                let args = self.stack.fixed_array::<11>(0)?;
                let dx1 = self.x + args[0];
                let dy1 = self.y + args[1];
                let dx2 = dx1 + args[2];
                let dy2 = dy1 + args[3];
                let dx3 = dx2 + args[4];
                let dy3 = dy2 + args[5];
                let dx4 = dx3 + args[6];
                let dy4 = dy3 + args[7];
                let dx5 = dx4 + args[8];
                let dy5 = dy4 + args[9];
                // the last operand is along the dominant axis
                if (dx5 - self.x).abs() > (dy5 - self.y).abs() {
                    self.x = dx5 + args[10];
                } else {
                    self.y = dy5 + args[10];
                }
                self.sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
                self.sink.curve_to(dx4, dy4, dx5, dy5, self.x, self.y);
                self.stack.clear();
            }
            // Return from the current subroutine
            Return => {
                return Ok(false);
            }
            // End the current charstring. Four remaining operands would be
            // the deprecated "seac" accent composition which is ignored.
            //
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
            EndChar => {
                let len = self.stack.len();
                self.take_width(len == 1 || len == 5)?;
                if self.is_open {
                    self.is_open = false;
                    self.sink.close();
                }
                self.stack.clear();
                self.finished = true;
                return Ok(false);
            }
            // Emits a sequence of stem hints
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=21>
            HStem | VStem | HStemHm | VStemHm => {
                let mut i = self.take_width(self.stack.len_is_odd())?;
                let is_horizontal = matches!(operator, HStem | HStemHm);
                let mut u = Fixed::ZERO;
                while i + 2 <= self.stack.len() {
                    let [du, w] = self.stack.fixed_array::<2>(i)?;
                    u += du;
                    let v = u.wrapping_add(w);
                    if is_horizontal {
                        self.sink.hstem(u, v);
                    } else {
                        self.sink.vstem(u, v);
                    }
                    u = v;
                    self.stem_count += 1;
                    i += 2;
                }
                self.stack.clear();
            }
            // Applies a hint or counter mask.
            //
            // If there are arguments on the stack, this is also an
            // implied series of VSTEMHM operators. The mask is a bit
            // string with one bit per stem hint.
            //
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=24>
            HintMask | CntrMask => {
                let mut i = self.take_width(self.stack.len_is_odd())?;
                let mut u = Fixed::ZERO;
                while i + 2 <= self.stack.len() {
                    let [du, w] = self.stack.fixed_array::<2>(i)?;
                    u += du;
                    let v = u.wrapping_add(w);
                    self.sink.vstem(u, v);
                    u = v;
                    self.stem_count += 1;
                    i += 2;
                }
                let count = self.stem_count.div_ceil(8);
                let mask = cursor.read_array::<u8>(count)?;
                if operator == HintMask {
                    self.sink.hint_mask(mask);
                } else {
                    self.sink.counter_mask(mask);
                }
                self.stack.clear();
            }
            // Starts a new subpath
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=16>
            RMoveTo => {
                let i = self.take_width(self.stack.len() > 2)?;
                let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                self.begin_contour();
                self.x += dx;
                self.y += dy;
                self.sink.move_to(self.x, self.y);
                self.stack.clear();
            }
            // Starts a new subpath by moving the current point in the
            // horizontal or vertical direction
            HMoveTo | VMoveTo => {
                let i = self.take_width(self.stack.len() > 1)?;
                let delta = self.stack.get_fixed(i)?;
                self.begin_contour();
                if operator == HMoveTo {
                    self.x += delta;
                } else {
                    self.y += delta;
                }
                self.sink.move_to(self.x, self.y);
                self.stack.clear();
            }
            // Emits a sequence of lines
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=16>
            RLineTo => {
                let mut i = 0;
                while i + 2 <= self.stack.len() {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                    i += 2;
                }
                self.stack.clear();
            }
            // Emits a sequence of alternating horizontal and vertical
            // lines
            HLineTo | VLineTo => {
                let mut is_x = operator == HLineTo;
                for i in 0..self.stack.len() {
                    let delta = self.stack.get_fixed(i)?;
                    if is_x {
                        self.x += delta;
                    } else {
                        self.y += delta;
                    }
                    is_x = !is_x;
                    self.sink.line_to(self.x, self.y);
                }
                self.stack.clear();
            }
            // Emits curves that start and end horizontal, unless
            // the stack count is odd, in which case the first
            // curve may start with a vertical tangent
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=17>
            HhCurveTo => {
                let mut i = 0;
                if self.stack.len_is_odd() {
                    self.y += self.stack.get_fixed(0)?;
                    i += 1;
                }
                while i + 4 <= self.stack.len() {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let x1 = self.x + args[0];
                    let y1 = self.y;
                    let x2 = x1 + args[1];
                    let y2 = y1 + args[2];
                    self.x = x2 + args[3];
                    self.y = y2;
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 4;
                }
                self.stack.clear();
            }
            // Alternates between curves with horizontal and vertical
            // tangents. An odd trailing operand adjusts the final end
            // point along the other axis.
            HvCurveTo | VhCurveTo => {
                let count = self.stack.len();
                let mut i = 0;
                let mut horizontal = operator == HvCurveTo;
                while i + 4 <= count {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let last = count - i == 5;
                    let (x1, y1, x2, y2, x3, y3);
                    if horizontal {
                        x1 = self.x + args[0];
                        y1 = self.y;
                        x2 = x1 + args[1];
                        y2 = y1 + args[2];
                        y3 = y2 + args[3];
                        x3 = if last {
                            x2 + self.stack.get_fixed(i + 4)?
                        } else {
                            x2
                        };
                    } else {
                        x1 = self.x;
                        y1 = self.y + args[0];
                        x2 = x1 + args[1];
                        y2 = y1 + args[2];
                        x3 = x2 + args[3];
                        y3 = if last {
                            y2 + self.stack.get_fixed(i + 4)?
                        } else {
                            y2
                        };
                    }
                    self.sink.curve_to(x1, y1, x2, y2, x3, y3);
                    self.x = x3;
                    self.y = y3;
                    horizontal = !horizontal;
                    i += if last { 5 } else { 4 };
                }
                self.stack.clear();
            }
            // Emits a sequence of curves possibly followed by a line
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=17>
            RrCurveTo | RCurveLine => {
                let count = self.stack.len();
                let mut i = 0;
                while i + 6 <= count {
                    let args = self.stack.fixed_array::<6>(i)?;
                    let x1 = self.x + args[0];
                    let y1 = self.y + args[1];
                    let x2 = x1 + args[2];
                    let y2 = y1 + args[3];
                    self.x = x2 + args[4];
                    self.y = y2 + args[5];
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 6;
                }
                if operator == RCurveLine {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                }
                self.stack.clear();
            }
            // Emits a sequence of lines followed by a curve
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=18>
            RLineCurve => {
                let count = self.stack.len();
                if count < 6 {
                    return Err(Error::StackUnderflow);
                }
                let mut i = 0;
                while i + 6 < count {
                    let [dx, dy] = self.stack.fixed_array::<2>(i)?;
                    self.x += dx;
                    self.y += dy;
                    self.sink.line_to(self.x, self.y);
                    i += 2;
                }
                let args = self.stack.fixed_array::<6>(i)?;
                let x1 = self.x + args[0];
                let y1 = self.y + args[1];
                let x2 = x1 + args[2];
                let y2 = y1 + args[3];
                self.x = x2 + args[4];
                self.y = y2 + args[5];
                self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                self.stack.clear();
            }
            // Emits curves that start and end vertical, unless
            // the stack count is odd, in which case the first
            // curve may start with a horizontal tangent
            VvCurveTo => {
                let mut i = 0;
                if self.stack.len_is_odd() {
                    self.x += self.stack.get_fixed(0)?;
                    i += 1;
                }
                while i + 4 <= self.stack.len() {
                    let args = self.stack.fixed_array::<4>(i)?;
                    let x1 = self.x;
                    let y1 = self.y + args[0];
                    let x2 = x1 + args[1];
                    let y2 = y1 + args[2];
                    self.x = x2;
                    self.y = y2 + args[3];
                    self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
                    i += 4;
                }
                self.stack.clear();
            }
            // Call local or global subroutine
            // See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=29>
            CallSubr | CallGsubr => {
                let subrs_index = if operator == CallSubr {
                    self.subrs.clone().ok_or(Error::MissingSubroutines)?
                } else {
                    self.global_subrs.clone()
                };
                let index = self.stack.pop_i32()?;
                let biased_index = index
                    .checked_add(subrs_index.subr_bias())
                    .and_then(|ix| usize::try_from(ix).ok())
                    .filter(|ix| *ix < subrs_index.count() as usize)
                    .ok_or(Error::InvalidSubroutineIndex(index))?;
                let subr_charstring_data = subrs_index.get(biased_index)?;
                self.evaluate(subr_charstring_data, nesting_depth + 1)?;
            }
        }
        Ok(true)
    }
}

/// PostScript charstring operator.
///
/// The arithmetic and storage operators were removed from later revisions
/// of the format and are reported as invalid.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    fn read(cursor: &mut Cursor, b0: u8) -> Result<Self, Error> {
        // Escape opcode for accessing two byte operators
        const ESCAPE: u8 = 12;
        let (opcode, operator) = if b0 == ESCAPE {
            let b1 = cursor.read::<u8>()?;
            (b1, Self::from_two_byte_opcode(b1))
        } else {
            (b0, Self::from_opcode(b0))
        };
        operator.ok_or(Error::InvalidCharstringOperator(opcode))
    }

    /// Creates an operator from the given opcode.
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            1 => HStem,
            3 => VStem,
            4 => VMoveTo,
            5 => RLineTo,
            6 => HLineTo,
            7 => VLineTo,
            8 => RrCurveTo,
            10 => CallSubr,
            11 => Return,
            14 => EndChar,
            18 => HStemHm,
            19 => HintMask,
            20 => CntrMask,
            21 => RMoveTo,
            22 => HMoveTo,
            23 => VStemHm,
            24 => RCurveLine,
            25 => RLineCurve,
            26 => VvCurveTo,
            27 => HhCurveTo,
            29 => CallGsubr,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    /// Creates an operator from the given extended opcode.
    ///
    /// These are preceded by a byte containing the escape value of 12.
    fn from_two_byte_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            34 => HFlex,
            35 => Flex,
            36 => HFlex1,
            37 => Flex1,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::cff::{self, op, Cs};

    use super::*;

    #[derive(Copy, Clone, PartialEq, Debug)]
    enum Command {
        MoveTo(Fixed, Fixed),
        LineTo(Fixed, Fixed),
        CurveTo(Fixed, Fixed, Fixed, Fixed, Fixed, Fixed),
        Close,
    }

    #[derive(PartialEq, Default, Debug)]
    struct CaptureCommandSink {
        commands: Vec<Command>,
        stems: Vec<(bool, Fixed, Fixed)>,
        masks: Vec<Vec<u8>>,
    }

    impl CommandSink for CaptureCommandSink {
        fn move_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::MoveTo(x, y))
        }

        fn line_to(&mut self, x: Fixed, y: Fixed) {
            self.commands.push(Command::LineTo(x, y))
        }

        fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
            self.commands
                .push(Command::CurveTo(cx0, cy0, cx1, cy1, x, y))
        }

        fn close(&mut self) {
            self.commands.push(Command::Close)
        }

        fn hstem(&mut self, y0: Fixed, y1: Fixed) {
            self.stems.push((true, y0, y1));
        }

        fn vstem(&mut self, x0: Fixed, x1: Fixed) {
            self.stems.push((false, x0, x1));
        }

        fn hint_mask(&mut self, mask: &[u8]) {
            self.masks.push(mask.to_vec());
        }
    }

    fn f(value: i32) -> Fixed {
        Fixed::from_i32(value)
    }

    /// Evaluates a glyph of the test font with its subroutines.
    fn eval_glyph(gid: u16) -> (Result<Option<Fixed>, Error>, CaptureCommandSink) {
        let builder = cff::cff_builder();
        let charstrings = cff::index(&builder.charstrings);
        let global_subrs = cff::index(&builder.global_subrs);
        let subrs = cff::index(&builder.private.subrs);
        let charstrings = Index::new(&charstrings).unwrap();
        let mut sink = CaptureCommandSink::default();
        let result = evaluate(
            charstrings.get(gid as usize).unwrap(),
            Index::new(&global_subrs).unwrap(),
            Some(Index::new(&subrs).unwrap()),
            &mut sink,
        );
        (result, sink)
    }

    #[test]
    fn glyph_with_width_and_lines() {
        use Command::*;
        let (width, sink) = eval_glyph(cff::GLYPH_A);
        assert_eq!(width.unwrap(), Some(f(544 - cff::NOMINAL_WIDTH)));
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(3), f(0)),
                LineTo(f(541), f(0)),
                LineTo(f(318), f(656)),
                LineTo(f(226), f(656)),
                Close
            ]
        );
    }

    #[test]
    fn width_only() {
        let (width, sink) = eval_glyph(0);
        assert_eq!(width.unwrap(), Some(f(500 - cff::NOMINAL_WIDTH)));
        assert!(sink.commands.is_empty());
    }

    #[test]
    fn hints_and_default_width() {
        use Command::*;
        let (width, sink) = eval_glyph(cff::GLYPH_CURVE);
        assert_eq!(width.unwrap(), None);
        assert_eq!(sink.stems, [(true, f(10), f(30)), (false, f(5), f(35))]);
        assert_eq!(sink.masks, [vec![0xC0]]);
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(0), f(0)),
                CurveTo(f(100), f(0), f(150), f(50), f(150), f(150)),
                Close
            ]
        );
    }

    #[test]
    fn local_and_global_subroutines() {
        use Command::*;
        let (width, sink) = eval_glyph(cff::GLYPH_SUBRS);
        assert_eq!(width.unwrap(), Some(f(200 - cff::NOMINAL_WIDTH)));
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(0), f(0)),
                LineTo(f(100), f(0)),
                LineTo(f(100), f(100)),
                Close
            ]
        );
    }

    #[test]
    fn moveto_closes_open_contour() {
        use Command::*;
        let (_, sink) = eval_glyph(cff::GLYPH_TWO_CONTOURS);
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(0), f(0)),
                LineTo(f(10), f(0)),
                LineTo(f(10), f(10)),
                Close,
                MoveTo(f(60), f(60)),
                LineTo(f(70), f(60)),
                LineTo(f(70), f(70)),
                Close
            ]
        );
    }

    #[test]
    fn recursive_subroutine() {
        let (result, _) = eval_glyph(cff::GLYPH_RECURSIVE_SUBR);
        assert_eq!(result, Err(Error::CharstringNestingDepthLimitExceeded));
    }

    #[test]
    fn hvcurveto() {
        use Command::*;
        let (_, sink) = eval_glyph(cff::GLYPH_CUSTOM_NAME);
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(0), f(0)),
                CurveTo(f(50), f(0), f(100), f(50), f(100), f(100)),
                Close
            ]
        );
    }

    #[test]
    fn vhcurveto_with_trailing_operand() {
        use Command::*;
        let charstring = cff::charstring(&[
            Cs::N(0),
            Cs::N(0),
            Cs::Op(op::RMOVETO),
            Cs::N(10),
            Cs::N(10),
            Cs::N(10),
            Cs::N(10),
            Cs::N(5),
            Cs::Op(op::VHCURVETO),
        ]);
        let mut sink = CaptureCommandSink::default();
        evaluate(&charstring, Index::default(), None, &mut sink).unwrap();
        assert_eq!(
            sink.commands,
            [
                MoveTo(f(0), f(0)),
                CurveTo(f(0), f(10), f(10), f(20), f(20), f(25)),
                Close
            ]
        );
    }

    #[test]
    fn missing_or_invalid_subroutines() {
        let charstring = cff::charstring(&[Cs::N(0), Cs::Op(op::CALLSUBR)]);
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&charstring, Index::default(), None, &mut sink),
            Err(Error::MissingSubroutines)
        );
        assert_eq!(
            evaluate(&charstring, Index::default(), Some(Index::default()), &mut sink),
            Err(Error::InvalidSubroutineIndex(0))
        );
    }

    #[test]
    fn rlinecurve_underflow() {
        let charstring = cff::charstring(&[Cs::N(1), Cs::N(2), Cs::Op(op::RLINECURVE)]);
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&charstring, Index::default(), None, &mut sink),
            Err(Error::StackUnderflow)
        );
    }

    #[test]
    fn invalid_operator() {
        let mut sink = CaptureCommandSink::default();
        assert_eq!(
            evaluate(&[15], Index::default(), None, &mut sink),
            Err(Error::InvalidCharstringOperator(15))
        );
    }
}
