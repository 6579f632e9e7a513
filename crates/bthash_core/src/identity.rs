use crate::Id32;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase base-36 rendering of `n`.
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::with_capacity(13);
    while n > 0 {
        out.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed.
    String::from_utf8(out).unwrap_or_default()
}

/// `<len36>[_<root hex>]_<crc36>`, the CRC-32 (IEEE) taken over the text
/// before the last underscore. The root part is present only for non-empty
/// files.
pub fn unique_id(length: u64, root: Option<&Id32>) -> String {
    let mut prefix = to_base36(length);
    if length > 0 {
        if let Some(root) = root {
            prefix.push('_');
            prefix.push_str(&root.as_string());
        }
    }
    let checksum = crc32fast::hash(prefix.as_bytes());
    format!("{prefix}_{}", to_base36(checksum as u64))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(11), "b");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(16384), "cn4");
        assert_eq!(to_base36(65536), "1ekg");
        assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn test_unique_id_empty() {
        assert_eq!(unique_id(0, None), "0_1vxtrtt");
    }

    #[test]
    fn test_unique_id_with_root() {
        let root =
            Id32::from_str("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(
            unique_id(11, Some(&root)),
            "b_b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9_9t58rh"
        );
    }
}
