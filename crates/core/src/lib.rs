pub mod bundle;
pub mod contract;
pub mod pc_map;
pub mod profile;
pub mod report;
pub mod result;
pub mod session;
pub mod source;
pub mod source_map;
pub mod trace;

pub use result::{Error, Result};
pub use session::{ChainSource, Session, SessionConfig};

/// Length of a canonical EVM address in hex characters (20 bytes).
pub const ADDRESS_HEX_LEN: usize = 40;

/// Returns true if the trace op name is one of the message-call opcodes.
///
/// These forward execution to another account's deployed bytecode; the call
/// target sits second from the top of the stack, below the forwarded gas.
#[inline]
pub fn is_call_op(op: &str) -> bool {
    matches!(op, "CALL" | "CALLCODE" | "DELEGATECALL" | "STATICCALL")
}

/// Returns true if the trace op name is one of the contract-creation opcodes.
#[inline]
pub fn is_create_op(op: &str) -> bool {
    matches!(op, "CREATE" | "CREATE2")
}

/// Returns true if the trace op name terminates the current frame.
#[inline]
pub fn is_frame_exit_op(op: &str) -> bool {
    matches!(op, "RETURN" | "REVERT" | "STOP")
}

/// Normalizes a hex string to the canonical form the registries key on:
/// no `0x` prefix, no whitespace, even length.
///
/// Inner whitespace is dropped so bytecode dumps wrapped across lines still
/// parse; an odd nibble count is padded with a leading zero. Rejects any
/// non-hex character, reporting its position within the cleaned string.
pub fn normalize_hex_string(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let unprefixed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let clean: String = unprefixed.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some((index, c)) = clean
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(Error::HexDecode(hex::FromHexError::InvalidHexCharacter {
            c,
            index,
        }));
    }

    if clean.len() % 2 == 1 {
        Ok(format!("0{clean}"))
    } else {
        Ok(clean)
    }
}

/// Reduces an arbitrary hex word to a canonical EVM address.
///
/// Takes the low 20 bytes and renders them as 40 lowercase hex characters
/// with leading zeros. Stack words from a trace are up to 32 bytes, so the
/// high bytes are dropped; shorter words are zero-padded on the left.
/// Idempotent: normalizing an already canonical address is a no-op.
pub fn normalize_address(word: &str) -> String {
    let hex_digits: String = word
        .trim()
        .trim_start_matches("0x")
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if hex_digits.len() > ADDRESS_HEX_LEN {
        hex_digits[hex_digits.len() - ADDRESS_HEX_LEN..].to_string()
    } else {
        format!("{:0>width$}", hex_digits, width = ADDRESS_HEX_LEN)
    }
}
