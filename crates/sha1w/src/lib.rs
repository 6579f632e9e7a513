// Wrapper for digest libraries.
// SHA-256 over 16 KiB leaves dominates CPU usage when hashing, SHA-1 is the
// runner up (three running accumulators per file). ring is usually faster,
// the RustCrypto crates are the default as they need no C toolchain.
//
// Every hasher is Clone: callers snapshot a running accumulator and finish
// the copy while the original stays open.

#[cfg(feature = "sha-rust")]
pub type Sha1 = Sha1Rust;
#[cfg(feature = "sha-rust")]
pub type Sha256 = Sha256Rust;

#[cfg(feature = "sha-ring")]
pub type Sha1 = Sha1Ring;
#[cfg(feature = "sha-ring")]
pub type Sha256 = Sha256Ring;

assert_cfg::exactly_one! {
    feature = "sha-rust",
    feature = "sha-ring",
}

pub trait ISha1: Clone {
    fn new() -> Self;
    fn update(&mut self, buf: &[u8]);
    fn finish(self) -> [u8; 20];
}

pub trait ISha256: Clone {
    fn new() -> Self;
    fn update(&mut self, buf: &[u8]);
    fn finish(self) -> [u8; 32];
}

#[cfg(feature = "sha-rust")]
#[derive(Clone)]
pub struct Sha1Rust {
    inner: sha1::Sha1,
}

#[cfg(feature = "sha-rust")]
impl ISha1 for Sha1Rust {
    fn new() -> Self {
        use sha1::Digest;
        Sha1Rust {
            inner: sha1::Sha1::new(),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        sha1::Digest::update(&mut self.inner, buf)
    }

    fn finish(self) -> [u8; 20] {
        sha1::Digest::finalize(self.inner).into()
    }
}

#[cfg(feature = "sha-rust")]
#[derive(Clone)]
pub struct Sha256Rust {
    inner: sha2::Sha256,
}

#[cfg(feature = "sha-rust")]
impl ISha256 for Sha256Rust {
    fn new() -> Self {
        use sha2::Digest;
        Sha256Rust {
            inner: sha2::Sha256::new(),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        sha2::Digest::update(&mut self.inner, buf)
    }

    fn finish(self) -> [u8; 32] {
        sha2::Digest::finalize(self.inner).into()
    }
}

#[cfg(feature = "sha-ring")]
#[derive(Clone)]
pub struct Sha1Ring {
    inner: ring::digest::Context,
}

#[cfg(feature = "sha-ring")]
impl ISha1 for Sha1Ring {
    fn new() -> Self {
        Self {
            inner: ring::digest::Context::new(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        self.inner.update(buf)
    }

    fn finish(self) -> [u8; 20] {
        let result = self.inner.finish();
        debug_assert_eq!(result.as_ref().len(), 20);
        let mut result_arr = [0u8; 20];
        result_arr.copy_from_slice(result.as_ref());
        result_arr
    }
}

#[cfg(feature = "sha-ring")]
#[derive(Clone)]
pub struct Sha256Ring {
    inner: ring::digest::Context,
}

#[cfg(feature = "sha-ring")]
impl ISha256 for Sha256Ring {
    fn new() -> Self {
        Self {
            inner: ring::digest::Context::new(&ring::digest::SHA256),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        self.inner.update(buf)
    }

    fn finish(self) -> [u8; 32] {
        let result = self.inner.finish();
        debug_assert_eq!(result.as_ref().len(), 32);
        let mut result_arr = [0u8; 32];
        result_arr.copy_from_slice(result.as_ref());
        result_arr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(b: &[u8]) -> String {
        b.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_sha1_known_vectors() {
        assert_eq!(
            hex(&Sha1::new().finish()),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        let mut h = Sha1::new();
        h.update(b"hello ");
        h.update(b"world");
        assert_eq!(hex(&h.finish()), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn test_sha256_known_vector() {
        let mut h = Sha256::new();
        h.update(b"hello world");
        assert_eq!(
            hex(&h.finish()),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_clone_snapshots_state() {
        let mut h = Sha1::new();
        h.update(b"hello ");
        let snapshot = h.clone();
        h.update(b"world");
        assert_eq!(hex(&h.finish()), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");

        let mut again = snapshot.clone();
        again.update(b"world");
        assert_eq!(
            hex(&again.finish()),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
        assert_ne!(snapshot.finish(), Sha1::new().finish());
    }
}
