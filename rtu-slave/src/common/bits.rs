/// number of bytes required to pack `count` bits
pub(crate) fn num_bytes_for_bits(count: u16) -> usize {
    (count as usize + 7) / 8
}

pub(crate) fn to_word(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

pub(crate) fn high_byte(word: u16) -> u8 {
    (word >> 8) as u8
}

pub(crate) fn low_byte(word: u16) -> u8 {
    (word & 0x00FF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculates_number_of_bytes_needed_for_count_of_packed_bits() {
        assert_eq!(num_bytes_for_bits(0), 0);
        assert_eq!(num_bytes_for_bits(7), 1);
        assert_eq!(num_bytes_for_bits(8), 1);
        assert_eq!(num_bytes_for_bits(9), 2);
        assert_eq!(num_bytes_for_bits(15), 2);
        assert_eq!(num_bytes_for_bits(16), 2);
        assert_eq!(num_bytes_for_bits(17), 3);
        assert_eq!(num_bytes_for_bits(0xFFFF), 8192); // ensure that it's free from overflow
    }

    #[test]
    fn composes_and_splits_words() {
        assert_eq!(to_word(0x12, 0x34), 0x1234);
        assert_eq!(to_word(0xFF, 0x00), 0xFF00);
        assert_eq!(high_byte(0xABCD), 0xAB);
        assert_eq!(low_byte(0xABCD), 0xCD);
        assert_eq!(to_word(high_byte(0x8001), low_byte(0x8001)), 0x8001);
    }
}
