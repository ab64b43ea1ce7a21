use crate::consts::{BLACK, DATA_BITS, FRAMED_BITS, WHITE};
use crate::error::{Error, Result};

// ASCII control mnemonics for 0..=31, then 32
const CONTROL_NAMES: [&str; 33] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "TAB", "LF", "VT", "FP", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US", "Space",
];

/// Narrow an integer to a byte value, rejecting anything outside 0..=255.
pub fn byte_value(value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::InvalidArgument { value })
}

/// Row width for the given frame mode.
pub fn pattern_width(leading_frame_bit: bool) -> u32 {
    if leading_frame_bit { FRAMED_BITS } else { DATA_BITS }
}

/// Fail unless `width` is one of the two row widths the encoder produces.
pub fn check_width(width: u32) -> Result<u32> {
    match width {
        DATA_BITS | FRAMED_BITS => Ok(width),
        _ => Err(Error::UnsupportedWidth { width }),
    }
}

/// Pixel row for one byte: MSB first, `1` bits black, `0` bits white.
/// With `leading_frame_bit` the row starts with a black/white "10" marker.
pub fn encode_pattern(value: u8, leading_frame_bit: bool) -> Vec<u8> {
    let mut row = Vec::with_capacity(pattern_width(leading_frame_bit) as usize);
    if leading_frame_bit {
        row.extend_from_slice(&[BLACK, WHITE]);
    }
    for bit in (0..DATA_BITS).rev() {
        row.push(if (value >> bit) & 1 == 1 { BLACK } else { WHITE });
    }
    row
}

/// Fixed label for a byte, e.g. `065 \x41 'A'`.
pub fn describe_byte(value: u8) -> String {
    format!("{:03} \\x{:02x} {}", value, value, mnemonic(value))
}

/// Labels for all 256 values, indexed by value.
pub fn byte_labels() -> Vec<String> {
    (0..=u8::MAX).map(describe_byte).collect()
}

fn mnemonic(value: u8) -> String {
    match value {
        0..=32 => CONTROL_NAMES[value as usize].to_string(),
        33..=126 => format!("'{}'", value as char),
        127 => "DEL".to_string(),
        _ => "-?-".to_string(),
    }
}
