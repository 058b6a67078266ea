//! Validation utilities

use crate::types::*;

/// Longest accepted account identifier, in bytes; large enough for a
/// PEM-encoded certificate chain
pub const MAX_ACCOUNT_ID_LEN: usize = 16 * 1024;

/// Validate that an account ID is valid
///
/// Identifiers are opaque strings (often an encoded certificate), so only
/// emptiness, length and surrounding whitespace are checked.
pub fn validate_account_id(account_id: &str) -> LedgerResult<()> {
    if account_id.trim().is_empty() {
        return Err(LedgerError::InvalidArgument(
            "Account ID cannot be empty".to_string(),
        ));
    }

    if account_id.len() > MAX_ACCOUNT_ID_LEN {
        return Err(LedgerError::InvalidArgument(format!(
            "Account ID cannot exceed {} bytes",
            MAX_ACCOUNT_ID_LEN
        )));
    }

    if account_id.trim() != account_id {
        return Err(LedgerError::InvalidArgument(
            "Account ID cannot start or end with whitespace".to_string(),
        ));
    }

    Ok(())
}

/// Parse a transfer amount given as a base-10 signed 64-bit integer.
///
/// Negative amounts are rejected rather than treated as a no-op.
pub fn parse_amount(amount: &str) -> LedgerResult<i64> {
    let value: i64 = amount.parse().map_err(|_| {
        LedgerError::InvalidArgument(format!("Unable to parse amount '{}'", amount))
    })?;

    if value < 0 {
        return Err(LedgerError::InvalidArgument(format!(
            "Amount must not be negative: {}",
            value
        )));
    }

    Ok(value)
}

/// Require exactly `expected` arguments
pub fn expect_args(function: &str, args: &[String], expected: usize) -> LedgerResult<()> {
    if args.len() != expected {
        return Err(LedgerError::InvalidArgument(format!(
            "Incorrect number of arguments for '{}': expecting {}, got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Require at least `min` arguments
pub fn expect_min_args(function: &str, args: &[String], min: usize) -> LedgerResult<()> {
    if args.len() < min {
        return Err(LedgerError::InvalidArgument(format!(
            "Incorrect number of arguments for '{}': expecting at least {}, got {}",
            function,
            min,
            args.len()
        )));
    }
    Ok(())
}
