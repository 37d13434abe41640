/// Maximum length of a trimmed callsign
pub const MAX_CALLSIGN_LEN: usize = 8;

/// Callsign field width used on the YSF network
pub const YSF_CALLSIGN_LENGTH: usize = 10;

/// Keep the leading run of `[0-9A-Z]` characters, capped at [`MAX_CALLSIGN_LEN`].
/// Suffixes such as "-ND", "/P" or trailing padding are cut off.
pub fn trim(callsign: &str) -> String {
    callsign
        .chars()
        .take_while(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        .take(MAX_CALLSIGN_LEN)
        .collect()
}

/// Right-pad with spaces to `len` characters. Never truncates.
pub fn pad(callsign: &str, len: usize) -> String {
    format!("{:<width$}", callsign, width = len)
}

/// Pads to the width of a YSF callsign field and returns its bytes,
/// truncating anything longer than the field.
pub fn to_ysf_field(callsign: &str) -> [u8; YSF_CALLSIGN_LENGTH] {
    let mut out = [b' '; YSF_CALLSIGN_LENGTH];
    for (dst, src) in out.iter_mut().zip(callsign.bytes()) {
        *dst = src;
    }
    out
}

/// Lossy conversion of a fixed-width wire field into a string
pub fn from_field(field: &[u8]) -> String {
    field.iter().map(|&b| if b.is_ascii() { b as char } else { '?' }).collect()
}
