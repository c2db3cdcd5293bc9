//! Strings in U-View files are null-terminated Windows-1252.

/// Windows-1252 assigns printable characters to most of
/// 0x80..=0x9F, where Latin-1 has control codes. The five
/// undefined positions map to the replacement character.
const CP1252_HIGH : [char; 32] = [
    '€', '\u{FFFD}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{FFFD}', 'Ž', '\u{FFFD}',
    '\u{FFFD}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{FFFD}', 'ž', 'Ÿ',
];

/// Returns the bytes up to (not including) the first null byte,
/// or all of `bytes` if there is no terminator.
pub fn null_terminated(bytes : &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Decodes Windows-1252 bytes. Everything outside 0x80..=0x9F
/// coincides with Latin-1, so `0xB5` is `µ` and `0xB0` is `°`.
pub fn decode_cp1252(bytes : &[u8]) -> String {
    bytes.iter().map(|&b| match b {
        0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
        _ => b as char,
    }).collect()
}
