use std::{cmp::{max, min}, fmt};

use crate::pdu_parse_error::PduParseErr;

/// MSB-first bit reader/writer over a byte vector.
/// ISSI and DFSI fields are packed big-endian, so bit 0 of the buffer is the MSB of byte 0.
pub struct BitBuffer {
    buffer: Vec<u8>,
    pos: usize,         // next bit offset for read/write
    end: usize,         // bits at or after this are out of window
    flag_autoexpand: bool,   // if true, ignores end pointer on writes and reallocates buffer if insufficient capacity
}

impl BitBuffer {
    /// Create a zeroed buffer capable of holding exactly `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        let byte_len = (len_bits + 7) / 8;
        BitBuffer {
            buffer: vec![0; byte_len],
            pos: 0,
            end: len_bits,
            flag_autoexpand: false,
        }
    }

    /// Create a zeroed buffer with an inital capacity but zero length (end is set to 0).
    /// Writes to this buffer will automatically advance the end pointer and reallocate the buffer if needed
    pub fn new_autoexpand(initial_max_len_bits: usize) -> Self {
        let byte_len = (initial_max_len_bits + 7) / 8;
        BitBuffer {
            buffer: vec![0; byte_len],
            pos: 0,
            end: 0,
            flag_autoexpand: true,
        }
    }

    /// Wrap an existing byte-vector as a BitBuffer (all bits initially readable/writeable).
    pub fn from_vec(data: Vec<u8>) -> Self {
        let len_bits = data.len() * 8;
        BitBuffer {
            buffer: data,
            pos: 0,
            end: len_bits,
            flag_autoexpand: false,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Construct a BitBuffer directly from a string of '0'/'1' characters.
    /// Panics if any other character is encountered.
    pub fn from_bitstr(bitstr: &str) -> Self {
        let mut buf = BitBuffer::new(bitstr.len());
        for c in bitstr.chars() {
            match c {
                '0' => buf.write_bit(0),
                '1' => buf.write_bit(1),
                other => panic!("from_bitstr: invalid character `{}`; only '0' or '1' allowed", other),
            }
        }
        buf.pos = 0;
        buf
    }

    /// Convert the entire window into a String of '0'/'1' characters.
    pub fn to_bitstr(&self) -> String {
        let mut s = String::with_capacity(self.end);
        for i in 0..self.end {
            s.push(if self.read_bit_at_unchecked(i) == 1 { '1' } else { '0' });
        }
        s
    }

    /// Peek `num_bits` at the current pos, without advancing.
    /// Returns None on overflow or if `num_bits>64`.
    pub fn peek_bits(&self, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || self.pos + num_bits > self.end {
            return None;
        }
        Some(self.read_bits_at_unchecked(self.pos, num_bits))
    }

    /// Read `num_bits` at the current pos, advancing on success.
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits(num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Similar to read_bits, but returns a PduParseErr::BufferEnded with the given field name if not enough bits are available.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, PduParseErr> {
        self.read_bits(num_bits).ok_or(PduParseErr::BufferEnded { field: Some(field) })
    }

    /// Single bit field interpreted as a flag
    pub fn read_flag(&mut self, field: &'static str) -> Result<bool, PduParseErr> {
        Ok(self.read_field(1, field)? == 1)
    }

    /// Read `num_bytes` whole octets. Pos does not need to be byte aligned.
    pub fn read_bytes(&mut self, num_bytes: usize, field: &'static str) -> Result<Vec<u8>, PduParseErr> {
        if self.pos + num_bytes * 8 > self.end {
            return Err(PduParseErr::BufferEnded { field: Some(field) });
        }
        let mut ret = Vec::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            ret.push(self.read_bits_at_unchecked(self.pos, 8) as u8);
            self.pos += 8;
        }
        Ok(ret)
    }

    /// Consume everything from pos up to the end of the window. Only whole octets are returned.
    pub fn read_remaining_bytes(&mut self) -> Vec<u8> {
        let num_bytes = self.get_len_remaining() / 8;
        // Cannot fail, length checked above
        self.read_bytes(num_bytes, "remaining").unwrap_or_default()
    }

    pub fn read_bit(&mut self) -> Option<u8> {
        self.read_bits(1).map(|v| v as u8)
    }

    /// When a write would exceed the end, but the BitBuffer is set to automatically expand,
    /// this function is called to increase `end` and if needed, allocate more space in the buffer.
    fn move_end(&mut self, needed_extra_bits: usize) {
        let free_cap_bits = self.buffer.len() * 8 - self.end;
        let needed_total_bits = self.end + needed_extra_bits;

        if needed_extra_bits > free_cap_bits {
            let double_cap_bits = self.buffer.len() * 8 * 2;
            let new_cap_bits = max(needed_total_bits, double_cap_bits);
            self.buffer.resize((new_cap_bits + 7) / 8, 0);
        }

        self.end += needed_extra_bits;
    }

    /// Make room for `num_bits` at pos, expanding or panicking as configured
    fn reserve_write(&mut self, num_bits: usize) {
        if self.pos + num_bits > self.end {
            if self.flag_autoexpand {
                let extra = self.pos + num_bits - self.end;
                self.move_end(extra);
            } else {
                panic!("write would exceed buffer end");
            }
        }
    }

    /// Write a single bit to pos
    pub fn write_bit(&mut self, value: u8) {
        assert!(value == 0 || value == 1, "write_bit: value must be 0 or 1");
        self.reserve_write(1);

        let index = self.pos / 8;
        let mask = 1 << (7 - (self.pos % 8)) as u8;

        self.buffer[index] &= !mask;
        self.buffer[index] |= value << (7 - (self.pos % 8)) as u8;
        self.pos += 1;
    }

    pub fn write_flag(&mut self, flag: bool) {
        self.write_bit(flag as u8);
    }

    /// Write an arbitrary amount of zero-bits
    pub fn write_zeroes(&mut self, num_bits: usize) {
        let mut bits_remaining = num_bits;
        while bits_remaining > 0 {
            let chunk_size = min(bits_remaining, 64);
            self.write_bits(0, chunk_size);
            bits_remaining -= chunk_size;
        }
    }

    /// Write up to 64 bits, advancing pos.
    /// If autoexpand is enabled, will advance end as well and/or realloc if buffer full
    /// If disabled, panics if exceeds end.
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);
        self.reserve_write(num_bits);

        let mut remaining = num_bits;
        let mut cur = self.pos;
        let v = value;

        // 1) head bits
        let head_offset = cur % 8;
        if head_offset != 0 && remaining > 0 {
            let h = usize::min(remaining, 8 - head_offset);
            let byte = &mut self.buffer[cur / 8];
            let bits_to_write = ((v >> (remaining - h)) as u8) & ((1u16 << h) - 1) as u8;
            let shift = 8 - (head_offset + h);
            let mask = (((1u16 << h) - 1) << shift) as u8;
            *byte = (*byte & !mask) | (bits_to_write << shift);
            cur += h;
            remaining -= h;
        }

        // 2) full bytes
        while remaining >= 8 {
            self.buffer[cur / 8] = ((v >> (remaining - 8)) & 0xFF) as u8;
            cur += 8;
            remaining -= 8;
        }

        // 3) tail bits
        if remaining > 0 {
            let byte = &mut self.buffer[cur / 8];
            let bits_to_write = (v as u8) & ((1u16 << remaining) - 1) as u8;
            let shift = 8 - (cur % 8 + remaining);
            let mask = (((1u16 << remaining) - 1) << shift) as u8;
            *byte = (*byte & !mask) | (bits_to_write << shift);
        }

        self.pos += num_bits;
    }

    /// Write whole octets at pos
    pub fn write_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.write_bits(b as u64, 8);
        }
    }

    /// Extract the internal byte-vector (all bytes, including any unused bits).
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Window length in bits
    pub fn get_len(&self) -> usize {
        self.end
    }

    /// Number of bits left in the window, from pos to end.
    pub fn get_len_remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    /// Seek `pos` to `offset` bits.
    pub fn seek(&mut self, offset: usize) {
        assert!(offset <= self.end, "seek out of window: got {}, allowed [0,{}]", offset, self.end);
        self.pos = offset;
    }

    /// Dump the window as an uppercase hex string. A trailing partial nibble is padded with zeros.
    pub fn dump_hex(&self) -> String {
        let n_nibbles = (self.end + 3) / 4;
        let mut s = String::with_capacity(n_nibbles);
        for i in 0..n_nibbles {
            let take = usize::min(4, self.end - i * 4);
            let v = self.read_bits_at_unchecked(i * 4, take) as u8;
            let digit = if take < 4 { v << (4 - take) } else { v };
            s.push_str(&format!("{:X}", digit));
        }
        s
    }

    /// Reads exactly `num_bits` bits starting at `bit_pos`, returned as the low bits of a u64.
    /// Caller must ensure `num_bits <= 64` and `bit_pos + num_bits <= end`.
    fn read_bits_at_unchecked(&self, mut bit_pos: usize, num_bits: usize) -> u64 {
        let mut result = 0u64;
        let mut bits_remaining = num_bits;

        // 1) head bits to align to next byte
        let head = bit_pos % 8;
        if head != 0 && bits_remaining > 0 {
            let take = usize::min(8 - head, bits_remaining);
            let byte = self.buffer[bit_pos / 8];
            let shift = 8 - head - take;
            let mask = ((1u16 << take) - 1) as u8;
            result = ((byte >> shift) & mask) as u64;
            bit_pos += take;
            bits_remaining -= take;
        }

        // 2) full bytes
        while bits_remaining >= 8 {
            result = (result << 8) | self.buffer[bit_pos / 8] as u64;
            bit_pos += 8;
            bits_remaining -= 8;
        }

        // 3) tail bits
        if bits_remaining > 0 {
            let byte = self.buffer[bit_pos / 8];
            for i in 0..bits_remaining {
                let shift = 7 - ((bit_pos % 8) + i);
                result = (result << 1) | ((byte >> shift) & 1) as u64;
            }
        }

        result
    }

    fn read_bit_at_unchecked(&self, bit_pos: usize) -> u8 {
        (self.buffer[bit_pos / 8] >> (7 - (bit_pos % 8))) & 1
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ ^{} >{} {} }}", self.pos, self.end, self.dump_hex())
    }
}

// Byte-aligned big-endian helpers used by the FNE and DFSI layouts ///////////////

/// Read a big-endian u16 from a byte slice
pub fn be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

/// Read a big-endian 24-bit value from a byte slice
pub fn be_u24(data: &[u8], offset: usize) -> u32 {
    (data[offset] as u32) << 16 | (data[offset + 1] as u32) << 8 | data[offset + 2] as u32
}

/// Write a big-endian u16 into a byte slice
pub fn put_be_u16(data: &mut [u8], offset: usize, val: u16) {
    data[offset..offset + 2].copy_from_slice(&val.to_be_bytes());
}

/// Write the low 24 bits of `val` big-endian into a byte slice
pub fn put_be_u24(data: &mut [u8], offset: usize, val: u32) {
    data[offset] = (val >> 16) as u8;
    data[offset + 1] = (val >> 8) as u8;
    data[offset + 2] = val as u8;
}

/// Parse a hex string (whitespace and ':' separators allowed) into bytes
pub fn bytes_from_hex(hex: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = hex
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;
    if digits.len() % 2 != 0 {
        return None;
    }
    Some(digits.chunks(2).map(|p| p[0] << 4 | p[1]).collect())
}

/// Format bytes as uppercase hex without separators
pub fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_byte_read_write() {
        let mut bb = BitBuffer::new(16);
        bb.write_bits(0xAB, 8);
        bb.write_bits(0xCD, 8);
        bb.seek(0);
        assert_eq!(bb.read_bits(8).unwrap(), 0xAB);
        assert_eq!(bb.read_bits(8).unwrap(), 0xCD);
    }

    #[test]
    fn test_partial_boundary_read_write() {
        let mut bb = BitBuffer::new(16);
        bb.write_bits(0xA, 4);
        bb.write_bits(0x5, 4);
        bb.write_bits(0xFF, 8);
        bb.seek(0);
        assert_eq!(bb.read_bits(4).unwrap(), 0xA);
        assert_eq!(bb.read_bits(4).unwrap(), 0x5);
        assert_eq!(bb.read_bits(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_read_overflow() {
        let mut bb = BitBuffer::new(10);
        assert!(bb.read_bits(11).is_none());
        assert_eq!(bb.read_bits(0).unwrap(), 0);
        assert_eq!(bb.read_field(11, "too_long"), Err(PduParseErr::BufferEnded { field: Some("too_long") }));
    }

    #[test]
    #[should_panic(expected = "write would exceed buffer end")]
    fn test_write_overflow() {
        let mut bb = BitBuffer::new(10);
        bb.write_bits(1, 11);
    }

    #[test]
    #[should_panic(expected = "value exceeds num_bits")]
    fn test_value_above_num_bits() {
        let mut bb = BitBuffer::new(4);
        bb.write_bits(0b11111, 4);
    }

    #[test]
    fn test_write_autoexpand() {
        let mut bb = BitBuffer::new_autoexpand(10);
        bb.write_bits(1, 5);
        assert_eq!(bb.get_pos(), 5);
        assert_eq!(bb.get_len(), 5);
        bb.write_bits(1, 6);
        assert_eq!(bb.get_len(), 11);
        bb.write_bit(1);
        assert_eq!(bb.get_len(), 12);
    }

    #[test]
    fn test_unaligned_read_write_across_bytes() {
        let mut bb = BitBuffer::new(48);
        bb.seek(5);
        let pattern: u32 = 0b10_1010_1111_0001_0010;
        bb.write_bits(pattern as u64, 20);
        bb.seek(5);
        assert_eq!(bb.read_bits(20).unwrap() as u32, pattern);
    }

    #[test]
    fn test_64_bit_field() {
        let mut bb = BitBuffer::new(64);
        bb.write_bits(0x0123_4567_89AB_CDEF, 64);
        assert_eq!(bb.into_bytes(), vec![0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_bytes_unaligned() {
        let mut bb = BitBuffer::new(20);
        bb.write_bits(0xF, 4);
        bb.write_bytes(&[0x12, 0x34]);
        bb.seek(4);
        assert_eq!(bb.read_bytes(2, "payload").unwrap(), vec![0x12, 0x34]);
        assert!(bb.read_bytes(1, "payload").is_err());
    }

    #[test]
    fn test_dump_hex_and_bitstr() {
        let bb = BitBuffer::from_vec(vec![0xAB, 0xCD]);
        assert_eq!(bb.dump_hex(), "ABCD");
        let bb = BitBuffer::from_bitstr("10110110");
        assert_eq!(bb.to_bitstr(), "10110110");
        assert_eq!(bb.peek_bits(4).unwrap(), 0b1011);
    }

    #[test]
    fn test_be_helpers() {
        let mut data = [0u8; 6];
        put_be_u24(&mut data, 0, 0xAB_CDEF);
        put_be_u16(&mut data, 3, 0x1234);
        assert_eq!(data, [0xAB, 0xCD, 0xEF, 0x12, 0x34, 0x00]);
        assert_eq!(be_u24(&data, 0), 0xAB_CDEF);
        assert_eq!(be_u16(&data, 3), 0x1234);

        // Upper byte of a 24-bit address is dropped
        put_be_u24(&mut data, 0, 0xFF00_0001);
        assert_eq!(be_u24(&data, 0), 1);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(bytes_from_hex("0a 0B:ff"), Some(vec![0x0A, 0x0B, 0xFF]));
        assert_eq!(bytes_from_hex("abc"), None);
        assert_eq!(bytes_from_hex("zz"), None);
        assert_eq!(hex_string(&[0x01, 0xAB]), "01AB");
    }
}
