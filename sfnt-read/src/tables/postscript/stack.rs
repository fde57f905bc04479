//! Operand stack for DICT and charstring parsing.

use types::Fixed;

use super::Error;

/// Maximum size of the operand stack.
///
/// Type 2 charstrings limit the stack to 48 entries but fonts in the wild
/// exceed that, so this uses the larger limit that CFF2 allows.
const MAX_STACK: usize = 513;

/// Operand stack for DICTs and charstrings.
///
/// The stack holds 32-bit integers or 16.16 fixed point values. The type is
/// known when pushing and the expected type is known (from the operator)
/// when reading, so the conversion is performed at read time.
///
/// Entries are stored in parallel arrays holding the raw 32-bit value and a
/// flag marking the fixed point values, which halves the size compared to an
/// array of enums.
pub struct Stack {
    values: [i32; MAX_STACK],
    value_is_fixed: [bool; MAX_STACK],
    top: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [0; MAX_STACK],
            value_is_fixed: [false; MAX_STACK],
            top: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn verify_exact_len(&self, len: usize) -> Result<(), Error> {
        if self.top != len {
            Err(Error::StackUnderflow)
        } else {
            Ok(())
        }
    }

    pub fn verify_at_least_len(&self, len: usize) -> Result<(), Error> {
        if self.top < len {
            Err(Error::StackUnderflow)
        } else {
            Ok(())
        }
    }

    /// Returns true if the number of elements on the stack is odd.
    ///
    /// Some charstring operators use an odd count to signal a glyph advance
    /// width at the bottom of the stack.
    pub fn len_is_odd(&self) -> bool {
        self.top & 1 != 0
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn push(&mut self, number: impl Into<Number>) -> Result<(), Error> {
        match number.into() {
            Number::I32(value) => self.push_impl(value, false),
            Number::Fixed(value) => self.push_impl(value.to_bits(), true),
        }
    }

    /// Returns the 32-bit integer at the given index on the stack.
    ///
    /// Will return an error if the value at that index was not pushed as an
    /// integer.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        if index >= self.top {
            return Err(Error::InvalidStackAccess(index));
        }
        if self.value_is_fixed[index] {
            Err(Error::ExpectedI32StackEntry(index))
        } else {
            Ok(self.values[index])
        }
    }

    /// Returns the 16.16 fixed point value at the given index on the stack.
    ///
    /// If the value was pushed as an integer, it will be automatically
    /// converted to 16.16 fixed point.
    pub fn get_fixed(&self, index: usize) -> Result<Fixed, Error> {
        if index >= self.top {
            return Err(Error::InvalidStackAccess(index));
        }
        Ok(Self::to_fixed(self.values[index], self.value_is_fixed[index]))
    }

    /// Pops a 32-bit integer from the top of stack.
    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        let i = self.pop()?;
        if self.value_is_fixed[i] {
            Err(Error::ExpectedI32StackEntry(i))
        } else {
            Ok(self.values[i])
        }
    }

    /// Pops a 16.16 fixed point value from the top of the stack.
    pub fn pop_fixed(&mut self) -> Result<Fixed, Error> {
        let i = self.pop()?;
        Ok(Self::to_fixed(self.values[i], self.value_is_fixed[i]))
    }

    /// Returns an iterator yielding all elements on the stack
    /// as 16.16 fixed point values.
    pub fn fixed_values(&self) -> impl Iterator<Item = Fixed> + '_ {
        self.values[..self.top]
            .iter()
            .zip(&self.value_is_fixed)
            .map(|(value, is_fixed)| Self::to_fixed(*value, *is_fixed))
    }

    /// Returns an array of `N` 16.16 fixed point values starting at
    /// `first_index`.
    pub fn fixed_array<const N: usize>(&self, first_index: usize) -> Result<[Fixed; N], Error> {
        let end = first_index
            .checked_add(N)
            .ok_or(Error::InvalidStackAccess(first_index))?;
        if end > self.top {
            return Err(Error::InvalidStackAccess(end - 1));
        }
        let mut result = [Fixed::ZERO; N];
        for ((src, is_fixed), dest) in self.values[first_index..end]
            .iter()
            .zip(&self.value_is_fixed[first_index..end])
            .zip(&mut result)
        {
            *dest = Self::to_fixed(*src, *is_fixed);
        }
        Ok(result)
    }

    fn to_fixed(value: i32, is_fixed: bool) -> Fixed {
        if is_fixed {
            Fixed::from_bits(value)
        } else {
            Fixed::from_i32(value)
        }
    }

    fn push_impl(&mut self, value: i32, is_fixed: bool) -> Result<(), Error> {
        if self.top == MAX_STACK {
            return Err(Error::StackOverflow);
        }
        self.values[self.top] = value;
        self.value_is_fixed[self.top] = is_fixed;
        self.top += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<usize, Error> {
        if self.top > 0 {
            self.top -= 1;
            Ok(self.top)
        } else {
            Err(Error::StackUnderflow)
        }
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

/// Either a signed 32-bit integer or a 16.16 fixed point number.
///
/// This represents the CFF "number" operand type.
/// See "Table 6 Operand Types" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Number {
    I32(i32),
    Fixed(Fixed),
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<Fixed> for Number {
    fn from(value: Fixed) -> Self {
        Self::Fixed(value)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I32(value) => value.fmt(f),
            Self::Fixed(value) => value.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use types::Fixed;

    use super::{Error, Stack, MAX_STACK};

    #[test]
    fn push_pop() {
        let mut stack = Stack::new();
        stack.push(20).unwrap();
        stack.push(Fixed::from_f64(42.42)).unwrap();
        assert!(!stack.len_is_odd());
        stack.verify_exact_len(2).unwrap();
        stack.verify_at_least_len(2).unwrap();
        assert_eq!(stack.pop_fixed().unwrap(), Fixed::from_f64(42.42));
        assert_eq!(stack.pop_i32().unwrap(), 20);
        assert_eq!(stack.pop_i32(), Err(Error::StackUnderflow));
    }

    #[test]
    fn push_fixed_pop_i32() {
        let mut stack = Stack::new();
        stack.push(Fixed::from_f64(42.42)).unwrap();
        assert!(stack.pop_i32().is_err());
    }

    #[test]
    fn push_i32_pop_fixed() {
        let mut stack = Stack::new();
        stack.push(123).unwrap();
        assert_eq!(stack.pop_fixed().unwrap(), Fixed::from_f64(123.0));
    }

    #[test]
    fn fixed_array_bounds() {
        let mut stack = Stack::new();
        stack.push(1).unwrap();
        stack.push(Fixed::from_f64(0.5)).unwrap();
        assert_eq!(
            stack.fixed_array::<2>(0).unwrap(),
            [Fixed::ONE, Fixed::from_f64(0.5)]
        );
        assert_eq!(stack.fixed_array::<2>(1), Err(Error::InvalidStackAccess(2)));
        assert_eq!(stack.get_fixed(2), Err(Error::InvalidStackAccess(2)));
    }

    #[test]
    fn overflow() {
        let mut stack = Stack::new();
        for i in 0..MAX_STACK {
            stack.push(i as i32).unwrap();
        }
        assert_eq!(stack.push(0), Err(Error::StackOverflow));
    }
}
