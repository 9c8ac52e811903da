/// Jenkins one-at-a-time hash, as used for native names.
///
/// Names are lowercased before hashing.
#[must_use]
pub fn native_name_hash(name: &str) -> u32 {
    joaat(name.to_lowercase().as_bytes())
}

#[must_use]
pub fn joaat(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &byte in bytes {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// `0x` followed by uppercase hex without padding (`0x3F`, `0xD1A2B3C4`).
pub fn format_hash(hash: u64) -> String {
    format!("0x{hash:X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_hashes_to_zero() {
        assert_eq!(joaat(b""), 0);
    }

    #[test]
    fn single_byte() {
        assert_eq!(joaat(b"a"), 0xCA2E9442);
    }

    #[test]
    fn name_hash_ignores_case() {
        assert_eq!(native_name_hash("GET_PLAYER_PED"), native_name_hash("get_player_ped"));
        assert_eq!(native_name_hash("GET_PLAYER_PED"), 0x6E31E993);
    }

    #[test]
    fn known_joaat_values() {
        // Widely published joaat test vector.
        assert_eq!(joaat(b"The quick brown fox jumps over the lazy dog"), 0x519E91F5);
    }

    #[test]
    fn hash_formatting() {
        assert_eq!(format_hash(0x3f), "0x3F");
        assert_eq!(format_hash(0x43A66C31C68491C0), "0x43A66C31C68491C0");
    }
}
