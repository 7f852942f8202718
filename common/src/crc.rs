//!
//! CRC-16 protecting every frame on the display link
//!

/// Reflected form of the CRC-16 polynomial used on the link.
const CRC16_POLYNOMIAL: u16 = 0xA001;

/// Every frame CRC starts from this seed.
pub const CRC16_SEED: u16 = 0xFFFF;

/// Byte-indexed remainder table, built at compile time so the per-frame
/// update is one lookup per byte.
static CRC16_TABLE: [u16; 256] = build_crc16_table();

const fn build_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut remainder = byte as u16;
        let mut bit = 0;
        while bit < 8 {
            if remainder & 0x0001 != 0 {
                remainder = (remainder >> 1) ^ CRC16_POLYNOMIAL;
            } else {
                remainder >>= 1;
            }
            bit += 1;
        }
        table[byte] = remainder;
        byte += 1;
    }
    table
}

/// Fold one byte into a running CRC.
pub fn crc16_update(crc: u16, byte: u8) -> u16 {
    (crc >> 8) ^ CRC16_TABLE[((crc ^ byte as u16) & 0x00FF) as usize]
}

/// CRC over a whole byte slice, starting from [`CRC16_SEED`].
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC16_SEED;
    for &byte in data {
        crc = crc16_update(crc, byte);
    }
    crc
}

/// Check the trailing little-endian CRC of a framed packet against the CRC
/// of everything before it.
pub fn frame_crc_valid(frame: &[u8]) -> bool {
    if frame.len() < 3 {
        return false;
    }
    let (payload, tail) = frame.split_at(frame.len() - 2);
    crc16(payload) == u16::from_le_bytes([tail[0], tail[1]])
}

/// Write the CRC of `frame[..len - 2]` into the last two bytes, little-endian.
pub fn seal_frame(frame: &mut [u8]) {
    let crc = crc16(&frame[..frame.len() - 2]);
    let len = frame.len();
    frame[len - 2] = (crc & 0xFF) as u8;
    frame[len - 1] = (crc >> 8) as u8;
}
