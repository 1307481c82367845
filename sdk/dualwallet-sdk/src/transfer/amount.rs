use crate::core::constants::{LAMPORTS_PER_SOL, SOL_DECIMALS};
use crate::error::TransferError;

/// A positive SOL amount that passed the textual checks but has not been
/// converted to lamports yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MajorUnits {
    whole: String,
    fraction: String,
}

impl MajorUnits {
    /// Parse `digits[.digits]` or `.digits`.
    ///
    /// Signs, exponents, whitespace and more than nine significant
    /// fractional digits are rejected, as is any amount equal to zero.
    pub fn parse(raw: &str) -> Result<Self, TransferError> {
        let invalid = |why: &str| TransferError::InvalidInput(format!("amount {:?}: {}", raw, why));

        if raw.is_empty() {
            return Err(invalid("empty"));
        }

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid("not a decimal number"));
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if raw.ends_with('.') {
            return Err(invalid("missing fractional digits"));
        }
        // Trailing zeros carry no precision
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > SOL_DECIMALS {
            return Err(invalid("more precision than one lamport"));
        }
        if !whole.bytes().chain(fraction.bytes()).any(|b| b != b'0') {
            return Err(invalid("must be greater than zero"));
        }

        Ok(Self {
            whole: whole.trim_start_matches('0').to_string(),
            fraction: fraction.to_string(),
        })
    }

    /// Convert to lamports. Fails only when the result does not fit in u64.
    pub fn to_lamports(&self) -> Result<u64, TransferError> {
        let overflow = || TransferError::Build(format!("{} SOL overflows lamports", self));

        let whole: u64 = if self.whole.is_empty() {
            0
        } else {
            self.whole.parse().map_err(|_| overflow())?
        };

        let fraction: u64 = if self.fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", self.fraction, width = SOL_DECIMALS);
            padded.parse().map_err(|_| overflow())?
        };

        whole
            .checked_mul(LAMPORTS_PER_SOL)
            .and_then(|lamports| lamports.checked_add(fraction))
            .ok_or_else(overflow)
    }
}

impl std::fmt::Display for MajorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = if self.whole.is_empty() { "0" } else { &self.whole };
        if self.fraction.is_empty() {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{}", whole, self.fraction)
        }
    }
}
