//! Typed comparison assertions.
//!
//! Each assertion computes one boolean and hands it to [`Tap::ok_at`], then
//! adds an expected/got explanation on the diagnostic channel when it
//! failed. Malformed arguments (an unknown operator, a buffer shorter than
//! the compared length, a pattern that does not compile) fail the assertion
//! and count against the plan.

use std::str::FromStr;

use difference::{Changeset, Difference};

use crate::errors::TapError;
use crate::format::Location;
use crate::sink::TapSink;
use crate::tap::Tap;

/// Tolerance used by `fcmp_ok!` when the caller does not give one.
pub const FCMP_DEFAULT_RANGE: f64 = 0.1;

// ============================================================================
// OPERATORS
// ============================================================================

/// Relational operator token accepted by `cmp_ok` and `fcmp_ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl FromStr for CmpOp {
    type Err = TapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "==" => CmpOp::Eq,
            "!=" => CmpOp::Ne,
            "<" => CmpOp::Lt,
            "<=" => CmpOp::Le,
            ">" => CmpOp::Gt,
            ">=" => CmpOp::Ge,
            "&&" => CmpOp::And,
            "||" => CmpOp::Or,
            other => {
                return Err(TapError::UnknownOperator {
                    op: other.to_string(),
                })
            }
        })
    }
}

impl CmpOp {
    pub fn eval_int(self, a: i128, b: i128) -> bool {
        match self {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::And => a != 0 && b != 0,
            CmpOp::Or => a != 0 || b != 0,
        }
    }

    /// Values within `range` of each other count as equal.
    pub fn eval_float(self, a: f64, b: f64, range: f64) -> bool {
        let close = (a - b).abs() <= range;
        match self {
            CmpOp::Eq => close,
            CmpOp::Ne => !close,
            CmpOp::Lt => a < b && !close,
            CmpOp::Le => a < b || close,
            CmpOp::Gt => a > b && !close,
            CmpOp::Ge => a > b || close,
            CmpOp::And => a != 0.0 && b != 0.0,
            CmpOp::Or => a != 0.0 || b != 0.0,
        }
    }
}

// ============================================================================
// OPERAND ADAPTERS
// ============================================================================

/// Integer operand of `cmp_ok`. Every primitive integer widens losslessly
/// to `i128` except a `u128` above `i128::MAX`, which yields `None`.
pub trait IntOperand: Copy + std::fmt::Display {
    fn to_i128(self) -> Option<i128>;
}

macro_rules! int_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntOperand for $ty {
                fn to_i128(self) -> Option<i128> {
                    i128::try_from(self).ok()
                }
            }
        )*
    };
}

int_operand!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Text operand that may be absent.
pub trait MaybeStr {
    fn maybe_str(&self) -> Option<&str>;
}

impl MaybeStr for str {
    fn maybe_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl MaybeStr for String {
    fn maybe_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl MaybeStr for Option<&str> {
    fn maybe_str(&self) -> Option<&str> {
        *self
    }
}

impl MaybeStr for Option<String> {
    fn maybe_str(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl<T: MaybeStr + ?Sized> MaybeStr for &T {
    fn maybe_str(&self) -> Option<&str> {
        (**self).maybe_str()
    }
}

/// Byte operand that may be absent.
pub trait MaybeBytes {
    fn maybe_bytes(&self) -> Option<&[u8]>;
}

impl MaybeBytes for [u8] {
    fn maybe_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl<const N: usize> MaybeBytes for [u8; N] {
    fn maybe_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl MaybeBytes for Vec<u8> {
    fn maybe_bytes(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl MaybeBytes for Option<&[u8]> {
    fn maybe_bytes(&self) -> Option<&[u8]> {
        *self
    }
}

impl<T: MaybeBytes + ?Sized> MaybeBytes for &T {
    fn maybe_bytes(&self) -> Option<&[u8]> {
        (**self).maybe_bytes()
    }
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(s) => format!("'{}'", s),
        None => "NULL".to_string(),
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

impl<S: TapSink> Tap<S> {
    /// Equal when both are present and equal, or both are absent.
    pub fn is_at(
        &mut self,
        location: Location,
        got: Option<&str>,
        expected: Option<&str>,
        description: impl AsRef<str>,
    ) -> bool {
        let ok = got == expected;
        let result = self.ok_at(location, ok, description);
        if !ok && !self.state.is_closed() {
            self.diag(format!("         got: {}", quoted(got)));
            self.diag(format!("    expected: {}", quoted(expected)));
            if let (Some(got), Some(expected)) = (got, expected) {
                if got.contains('\n') || expected.contains('\n') {
                    self.diff_diag(expected, got);
                }
            }
        }
        result
    }

    pub fn isnt_at(
        &mut self,
        location: Location,
        got: Option<&str>,
        expected: Option<&str>,
        description: impl AsRef<str>,
    ) -> bool {
        let ok = got != expected;
        let result = self.ok_at(location, ok, description);
        if !ok && !self.state.is_closed() {
            self.diag(format!("         got: {}", quoted(got)));
            self.diag("    expected: anything else");
        }
        result
    }

    /// Integer comparison. Operands of any width are compared exactly; one
    /// that does not fit `i128` is a usage error.
    pub fn cmp_ok_at<A: IntOperand, B: IntOperand>(
        &mut self,
        location: Location,
        a: A,
        op: &str,
        b: B,
        description: impl AsRef<str>,
    ) -> bool {
        let op_parsed = match op.parse::<CmpOp>() {
            Ok(op) => op,
            Err(e) => return self.usage_error(location, e, description),
        };
        let (wide_a, wide_b) = match (a.to_i128(), b.to_i128()) {
            (Some(x), Some(y)) => (x, y),
            (None, _) => {
                let e = TapError::OperandRange { value: a.to_string() };
                return self.usage_error(location, e, description);
            }
            (_, None) => {
                let e = TapError::OperandRange { value: b.to_string() };
                return self.usage_error(location, e, description);
            }
        };
        let ok = op_parsed.eval_int(wide_a, wide_b);
        let result = self.ok_at(location, ok, description);
        if !ok && !self.state.is_closed() {
            self.diag(format!("    {}\n        {}\n    {}", a, op, b));
        }
        result
    }

    pub fn fcmp_ok_at(
        &mut self,
        location: Location,
        range: f64,
        a: f64,
        op: &str,
        b: f64,
        description: impl AsRef<str>,
    ) -> bool {
        let op_parsed = match op.parse::<CmpOp>() {
            Ok(op) => op,
            Err(e) => return self.usage_error(location, e, description),
        };
        let ok = op_parsed.eval_float(a, b, range);
        let result = self.ok_at(location, ok, description);
        if !ok && !self.state.is_closed() {
            self.diag(format!(
                "    {:.6}\n        {} (within {})\n    {:.6}",
                a, op, range, b
            ));
        }
        result
    }

    /// Byte-for-byte equality of the first `n` bytes.
    pub fn cmp_mem_at(
        &mut self,
        location: Location,
        got: Option<&[u8]>,
        expected: Option<&[u8]>,
        n: usize,
        description: impl AsRef<str>,
    ) -> bool {
        let (got, expected) = match (got, expected) {
            (Some(got), Some(expected)) => (got, expected),
            (None, None) => return self.ok_at(location, true, description),
            (got, expected) => {
                let result = self.ok_at(location, false, description);
                if !self.state.is_closed() {
                    let show = |b: Option<&[u8]>| if b.is_some() { "not NULL" } else { "NULL" };
                    self.diag(format!("         got: {}", show(got)));
                    self.diag(format!("    expected: {}", show(expected)));
                }
                return result;
            }
        };
        for buf in [got, expected] {
            if buf.len() < n {
                let e = TapError::ShortBuffer { len: buf.len(), n };
                return self.usage_error(location, e, description);
            }
        }

        let offset = got[..n]
            .iter()
            .zip(&expected[..n])
            .position(|(g, e)| g != e);
        let result = self.ok_at(location, offset.is_none(), description);
        if let Some(i) = offset {
            if !self.state.is_closed() {
                self.diag(format!("    Difference starts at offset {}", i));
                self.diag(format!("         got: 0x{:02x}", got[i]));
                self.diag(format!("    expected: 0x{:02x}", expected[i]));
            }
        }
        result
    }

    /// `for_match` selects `like` (true) or `unlike` (false).
    #[cfg(unix)]
    pub fn like_at(
        &mut self,
        location: Location,
        for_match: bool,
        got: &str,
        pattern: &str,
        description: impl AsRef<str>,
    ) -> bool {
        let re = match regex::Regex::new(pattern) {
            Ok(re) => re,
            Err(source) => {
                let e = TapError::BadPattern {
                    pattern: pattern.to_string(),
                    source,
                };
                return self.usage_error(location, e, description);
            }
        };
        let ok = re.is_match(got) == for_match;
        let result = self.ok_at(location, ok, description);
        if !ok && !self.state.is_closed() {
            self.diag(format!("                   '{}'", got));
            let verb = if for_match { "doesn't match" } else { "matches" };
            self.diag(format!("    {} '{}'", verb, pattern));
        }
        result
    }

    #[cfg(not(unix))]
    pub fn like_at(
        &mut self,
        _location: Location,
        for_match: bool,
        _got: &str,
        _pattern: &str,
        _description: impl AsRef<str>,
    ) -> bool {
        let open = !self.state.is_closed();
        let name = if for_match { "like" } else { "unlike" };
        self.skip(1, format!("{} is not implemented on this platform", name));
        open
    }

    fn usage_error(
        &mut self,
        location: Location,
        error: TapError,
        description: impl AsRef<str>,
    ) -> bool {
        debug_assert!(error.is_usage());
        tracing::debug!(error = %error, "usage error in assertion");
        let result = self.ok_at(location, false, description);
        if !self.state.is_closed() {
            self.state.record_violation();
            self.diag(error.to_string());
        }
        result
    }

    fn diff_diag(&mut self, expected: &str, got: &str) {
        let changeset = Changeset::new(expected, got, "\n");
        self.diag("    diff (-expected +got):");
        for diff in &changeset.diffs {
            let (marker, text) = match diff {
                Difference::Same(x) => (' ', x),
                Difference::Add(x) => ('+', x),
                Difference::Rem(x) => ('-', x),
            };
            for line in text.lines() {
                self.diag(format!("    {}{}", marker, line));
            }
        }
    }
}
