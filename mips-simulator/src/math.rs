/// Add a signed offset to a register holding an address. Overflows will wrap
/// around the 32-bit address space.
pub fn effective_address(base: i32, offset: i16) -> u64 {
    (base as u32).wrapping_add(offset as i32 as u32) as u64
}

/// The target of a taken branch: the next instruction plus the offset in words
pub fn branch_target(program_counter: i32, offset: i16) -> i32 {
    program_counter
        .wrapping_add(4)
        .wrapping_add((offset as i32).wrapping_shl(2))
}

/// Split a 64-bit value into its (upper, lower) 32-bit halves
pub fn split_halves(value: u64) -> (i32, i32) {
    ((value >> 32) as u32 as i32, value as u32 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_offsets() {
        assert_eq!(effective_address(0x1000_0008, -4), 0x1000_0004);
        assert_eq!(effective_address(0, -1), 0xFFFF_FFFF);
        assert_eq!(effective_address(0x7FFF_EFFC, 8), 0x7FFF_F004);
    }

    #[test]
    fn branch_offsets_are_in_words() {
        assert_eq!(branch_target(0x0040_0000, 2), 0x0040_000C);
        assert_eq!(branch_target(0x0040_0010, -2), 0x0040_000C);
    }

    #[test]
    fn halves() {
        assert_eq!(split_halves(0x0000_0001_FFFF_FFFE), (1, -2));
        assert_eq!(split_halves((-6i64) as u64), (-1, -6));
    }
}
