//! Combination codes and the digit store
//!
//! Every dial wraps modulo 10 in both directions; there is no overflow.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing or mutating a code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("digit {0} is out of range 0-9")]
    DigitOutOfRange(u8),
    #[error("expected {expected} digits, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("dial index {index} out of range for a {len}-digit code")]
    DialOutOfRange { index: usize, len: usize },
    #[error("'{0}' is not a digit")]
    NotADigit(char),
    #[error("a code needs at least one digit")]
    Empty,
}

/// Wrap any integer onto a dial face (0-9)
#[inline]
pub fn wrap_digit(n: i32) -> u8 {
    n.rem_euclid(10) as u8
}

/// An ordered sequence of single digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Code {
    digits: Vec<u8>,
}

impl Code {
    pub fn new(digits: impl Into<Vec<u8>>) -> Result<Self, CodeError> {
        let digits = digits.into();
        if digits.is_empty() {
            return Err(CodeError::Empty);
        }
        if let Some(&bad) = digits.iter().find(|&&d| d > 9) {
            return Err(CodeError::DigitOutOfRange(bad));
        }
        Ok(Self { digits })
    }

    /// All-zero code of the given length
    pub fn zeros(len: usize) -> Self {
        Self {
            digits: vec![0; len.max(1)],
        }
    }

    /// Parse exactly `len` ASCII digits (the `^\d{N}$` rule)
    pub fn parse(text: &str, len: usize) -> Result<Self, CodeError> {
        let digits = text
            .chars()
            .map(|c| match c {
                '0'..='9' => Ok(c as u8 - b'0'),
                other => Err(CodeError::NotADigit(other)),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        if digits.len() != len {
            return Err(CodeError::WrongLength {
                expected: len,
                actual: digits.len(),
            });
        }
        Self::new(digits)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn digit(&self, index: usize) -> Option<u8> {
        self.digits.get(index).copied()
    }

    /// Turn one dial by `delta` steps, wrapping. Returns the new digit.
    pub fn nudge(&mut self, index: usize, delta: i32) -> Result<u8, CodeError> {
        let len = self.digits.len();
        let digit = self
            .digits
            .get_mut(index)
            .ok_or(CodeError::DialOutOfRange { index, len })?;
        *digit = wrap_digit(*digit as i32 + delta);
        Ok(*digit)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<u8>> for Code {
    type Error = CodeError;

    fn try_from(digits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(digits)
    }
}

impl From<Code> for Vec<u8> {
    fn from(code: Code) -> Self {
        code.digits
    }
}

/// True iff `current` equals `target` element-wise
#[inline]
pub fn evaluate(current: &Code, target: &Code) -> bool {
    current.len() == target.len()
        && current
            .digits
            .iter()
            .zip(&target.digits)
            .all(|(a, b)| a == b)
}

/// Current dial values plus the fixed target
#[derive(Debug, Clone)]
pub struct DigitStore {
    current: Code,
    target: Code,
}

impl DigitStore {
    /// Dials start at all zeros
    pub fn new(target: Code) -> Self {
        Self {
            current: Code::zeros(target.len()),
            target,
        }
    }

    pub fn current(&self) -> &Code {
        &self.current
    }

    pub fn target(&self) -> &Code {
        &self.target
    }

    /// Number of dials
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    pub fn nudge(&mut self, index: usize, delta: i32) -> Result<u8, CodeError> {
        self.current.nudge(index, delta)
    }

    /// Replace every dial at once (query prefill)
    pub fn set_current(&mut self, code: Code) -> Result<(), CodeError> {
        if code.len() != self.target.len() {
            return Err(CodeError::WrongLength {
                expected: self.target.len(),
                actual: code.len(),
            });
        }
        self.current = code;
        Ok(())
    }

    /// Randomize every dial
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for d in self.current.digits.iter_mut() {
            *d = rng.random_range(0..10);
        }
    }

    pub fn is_match(&self) -> bool {
        evaluate(&self.current, &self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_wrap_both_directions() {
        assert_eq!(wrap_digit(10), 0);
        assert_eq!(wrap_digit(-1), 9);
        assert_eq!(wrap_digit(-23), 7);
        assert_eq!(wrap_digit(45), 5);

        let mut code = Code::new(vec![9, 0]).unwrap();
        assert_eq!(code.nudge(0, 1).unwrap(), 0);
        assert_eq!(code.nudge(1, -1).unwrap(), 9);
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(
            Code::parse("201146", 6).unwrap().digits(),
            &[2, 0, 1, 1, 4, 6]
        );
        assert_eq!(
            Code::parse("20114", 6),
            Err(CodeError::WrongLength {
                expected: 6,
                actual: 5
            })
        );
        assert_eq!(Code::parse("20a146", 6), Err(CodeError::NotADigit('a')));
        assert!(Code::parse("2011466", 6).is_err());
        assert!(Code::parse("", 6).is_err());
        // Non-ASCII digits don't count
        assert!(Code::parse("٢٠١١٤٦", 6).is_err());
    }

    #[test]
    fn test_new_rejects_bad_digits() {
        assert_eq!(Code::new(vec![1, 10]), Err(CodeError::DigitOutOfRange(10)));
        assert_eq!(Code::new(Vec::new()), Err(CodeError::Empty));
    }

    #[test]
    fn test_nudge_out_of_range() {
        let mut store = DigitStore::new(Code::new(vec![1, 2, 3]).unwrap());
        assert_eq!(
            store.nudge(3, 1),
            Err(CodeError::DialOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_store_matches_after_dialing() {
        let mut store = DigitStore::new(Code::new(vec![0, 9, 5]).unwrap());
        assert!(!store.is_match());
        store.nudge(1, -1).unwrap();
        store.nudge(2, 5).unwrap();
        assert_eq!(store.current().to_string(), "095");
        assert!(store.is_match());
    }

    #[test]
    fn test_set_current_checks_length() {
        let mut store = DigitStore::new(Code::new(vec![1, 2, 3]).unwrap());
        assert!(store.set_current(Code::zeros(4)).is_err());
        assert!(store.set_current(Code::new(vec![1, 2, 3]).unwrap()).is_ok());
        assert!(store.is_match());
    }

    #[test]
    fn test_shuffle_keeps_digits_valid() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut store = DigitStore::new(Code::zeros(6));
        for _ in 0..50 {
            store.shuffle(&mut rng);
            assert_eq!(store.current().len(), 6);
            assert!(store.current().digits().iter().all(|&d| d <= 9));
        }
    }

    #[test]
    fn test_serde_validates() {
        let code: Code = serde_json::from_str("[2,0,1,1,4,6]").unwrap();
        assert_eq!(code.to_string(), "201146");
        assert!(serde_json::from_str::<Code>("[2,0,11]").is_err());
    }

    proptest! {
        #[test]
        fn prop_increment_decrement_inverts(d in 0u8..10, steps in -50i32..50) {
            let mut code = Code::new(vec![d]).unwrap();
            code.nudge(0, steps).unwrap();
            code.nudge(0, -steps).unwrap();
            prop_assert_eq!(code.digit(0), Some(d));
            prop_assert_eq!(wrap_digit(wrap_digit(d as i32 + 1) as i32 - 1), d);
            prop_assert_eq!(wrap_digit(wrap_digit(d as i32 - 1) as i32 + 1), d);
        }

        #[test]
        fn prop_evaluate_is_elementwise_equality(
            current in proptest::collection::vec(0u8..10, 6),
            target in proptest::collection::vec(0u8..10, 6),
        ) {
            let a = Code::new(current.clone()).unwrap();
            let b = Code::new(target.clone()).unwrap();
            prop_assert_eq!(evaluate(&a, &b), current == target);
            prop_assert!(evaluate(&b, &b));
        }
    }
}
