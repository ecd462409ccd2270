use crate::error::InputError;

/// Decode hex-encoded bytecode.
///
/// Surrounding whitespace and one leading `0x`/`0X` are ignored.
pub fn parse_hex(input: impl AsRef<[u8]>) -> Result<Vec<u8>, InputError> {
    let text = input.as_ref().trim_ascii();
    let digits = text
        .strip_prefix(b"0x")
        .or_else(|| text.strip_prefix(b"0X"))
        .unwrap_or(text);
    Ok(hex::decode(digits)?)
}
