//! Target layout for migrated project files.
//!
//! The filename→directory table is plain data. Rewrite logic lives in
//! `rewrite` and only sees it through [`Rules`].

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Canonical directory every header reference is normalized into.
pub const DEFAULT_HEADER_DIR: &str = "include/cryptopp";

/// Generated resource header that is not shipped under the library namespace.
pub const DEFAULT_EXCLUDED_HEADERS: &[&str] = &["resource.h"];

/// Built-in compiled-source layout, in table order.
pub const BUILTIN_SOURCES: &[(&str, &str)] = &[
    // Core
    ("algebra.cpp", "src/core"),
    ("algparam.cpp", "src/core"),
    ("allocate.cpp", "src/core"),
    ("asn.cpp", "src/core"),
    ("channels.cpp", "src/core"),
    ("cpu.cpp", "src/core"),
    ("cryptlib.cpp", "src/core"),
    ("dll.cpp", "src/core"),
    ("files.cpp", "src/core"),
    ("filters.cpp", "src/core"),
    ("fips140.cpp", "src/core"),
    ("fipsalgt.cpp", "src/core"),
    ("gf256.cpp", "src/core"),
    ("gf2_32.cpp", "src/core"),
    ("gf2n.cpp", "src/core"),
    ("gf2n_simd.cpp", "src/core"),
    ("integer.cpp", "src/core"),
    ("iterhash.cpp", "src/core"),
    ("misc.cpp", "src/core"),
    ("mqueue.cpp", "src/core"),
    ("nbtheory.cpp", "src/core"),
    ("neon_simd.cpp", "src/core"),
    ("pch.cpp", "src/core"),
    ("polynomi.cpp", "src/core"),
    ("power7_ppc.cpp", "src/core"),
    ("power8_ppc.cpp", "src/core"),
    ("power9_ppc.cpp", "src/core"),
    ("ppc_simd.cpp", "src/core"),
    ("primetab.cpp", "src/core"),
    ("queue.cpp", "src/core"),
    ("rdtables.cpp", "src/core"),
    ("sse_simd.cpp", "src/core"),
    ("strciphr.cpp", "src/core"),
    ("tftables.cpp", "src/core"),
    ("tweetnacl.cpp", "src/core"),
    ("cpuid64.asm", "src/core"),
    ("x64dll.asm", "src/core"),
    ("x64masm.asm", "src/core"),

    // Encoding
    ("base32.cpp", "src/encoding"),
    ("base64.cpp", "src/encoding"),
    ("basecode.cpp", "src/encoding"),
    ("gzip.cpp", "src/encoding"),
    ("hex.cpp", "src/encoding"),
    ("zdeflate.cpp", "src/encoding"),
    ("zinflate.cpp", "src/encoding"),
    ("zlib.cpp", "src/encoding"),

    // Hash
    ("adler32.cpp", "src/hash"),
    ("blake2.cpp", "src/hash"),
    ("blake2b_simd.cpp", "src/hash"),
    ("blake2s_simd.cpp", "src/hash"),
    ("blake3.cpp", "src/hash"),
    ("crc.cpp", "src/hash"),
    ("crc_simd.cpp", "src/hash"),
    ("keccak.cpp", "src/hash"),
    ("keccak_core.cpp", "src/hash"),
    ("keccak_simd.cpp", "src/hash"),
    ("lsh256.cpp", "src/hash"),
    ("lsh256_avx.cpp", "src/hash"),
    ("lsh256_sse.cpp", "src/hash"),
    ("lsh512.cpp", "src/hash"),
    ("lsh512_avx.cpp", "src/hash"),
    ("lsh512_sse.cpp", "src/hash"),
    ("md2.cpp", "src/hash"),
    ("md4.cpp", "src/hash"),
    ("md5.cpp", "src/hash"),
    ("panama.cpp", "src/hash"),
    ("ripemd.cpp", "src/hash"),
    ("sha.cpp", "src/hash"),
    ("sha3.cpp", "src/hash"),
    ("sha_simd.cpp", "src/hash"),
    ("shake.cpp", "src/hash"),
    ("sm3.cpp", "src/hash"),
    ("tiger.cpp", "src/hash"),
    ("tigertab.cpp", "src/hash"),
    ("whrlpool.cpp", "src/hash"),

    // KDF
    ("argon2.cpp", "src/kdf"),
    ("scrypt.cpp", "src/kdf"),

    // MAC
    ("cbcmac.cpp", "src/mac"),
    ("cmac.cpp", "src/mac"),
    ("hmac.cpp", "src/mac"),
    ("poly1305.cpp", "src/mac"),
    ("ttmac.cpp", "src/mac"),
    ("vmac.cpp", "src/mac"),

    // Modes
    ("authenc.cpp", "src/modes"),
    ("ccm.cpp", "src/modes"),
    ("chachapoly.cpp", "src/modes"),
    ("default.cpp", "src/modes"),
    ("eax.cpp", "src/modes"),
    ("gcm.cpp", "src/modes"),
    ("gcm_simd.cpp", "src/modes"),
    ("modes.cpp", "src/modes"),
    ("xts.cpp", "src/modes"),

    // Public key
    ("dh.cpp", "src/pubkey"),
    ("dh2.cpp", "src/pubkey"),
    ("donna_32.cpp", "src/pubkey"),
    ("donna_64.cpp", "src/pubkey"),
    ("donna_sse.cpp", "src/pubkey"),
    ("dsa.cpp", "src/pubkey"),
    ("ec2n.cpp", "src/pubkey"),
    ("eccrypto.cpp", "src/pubkey"),
    ("ecp.cpp", "src/pubkey"),
    ("elgamal.cpp", "src/pubkey"),
    ("emsa2.cpp", "src/pubkey"),
    ("eprecomp.cpp", "src/pubkey"),
    ("esign.cpp", "src/pubkey"),
    ("gfpcrypt.cpp", "src/pubkey"),
    ("luc.cpp", "src/pubkey"),
    ("mqv.cpp", "src/pubkey"),
    ("oaep.cpp", "src/pubkey"),
    ("pkcspad.cpp", "src/pubkey"),
    ("pssr.cpp", "src/pubkey"),
    ("pubkey.cpp", "src/pubkey"),
    ("rabin.cpp", "src/pubkey"),
    ("rsa.cpp", "src/pubkey"),
    ("rw.cpp", "src/pubkey"),
    ("xed25519.cpp", "src/pubkey"),
    ("xtr.cpp", "src/pubkey"),
    ("xtrcrypt.cpp", "src/pubkey"),

    // Random
    ("blumshub.cpp", "src/random"),
    ("darn.cpp", "src/random"),
    ("osrng.cpp", "src/random"),
    ("padlkrng.cpp", "src/random"),
    ("randpool.cpp", "src/random"),
    ("rdrand.cpp", "src/random"),
    ("rng.cpp", "src/random"),
    ("rdrand.asm", "src/random"),
    ("rdseed.asm", "src/random"),

    // Symmetric
    ("3way.cpp", "src/symmetric"),
    ("arc4.cpp", "src/symmetric"),
    ("aria.cpp", "src/symmetric"),
    ("ariatab.cpp", "src/symmetric"),
    ("bfinit.cpp", "src/symmetric"),
    ("blowfish.cpp", "src/symmetric"),
    ("camellia.cpp", "src/symmetric"),
    ("cast.cpp", "src/symmetric"),
    ("casts.cpp", "src/symmetric"),
    ("chacha.cpp", "src/symmetric"),
    ("chacha_avx.cpp", "src/symmetric"),
    ("chacha_simd.cpp", "src/symmetric"),
    ("cham.cpp", "src/symmetric"),
    ("cham_simd.cpp", "src/symmetric"),
    ("des.cpp", "src/symmetric"),
    ("dessp.cpp", "src/symmetric"),
    ("gost.cpp", "src/symmetric"),
    ("hc128.cpp", "src/symmetric"),
    ("hc256.cpp", "src/symmetric"),
    ("hight.cpp", "src/symmetric"),
    ("idea.cpp", "src/symmetric"),
    ("kalyna.cpp", "src/symmetric"),
    ("kalynatab.cpp", "src/symmetric"),
    ("lea.cpp", "src/symmetric"),
    ("lea_simd.cpp", "src/symmetric"),
    ("mars.cpp", "src/symmetric"),
    ("marss.cpp", "src/symmetric"),
    ("rabbit.cpp", "src/symmetric"),
    ("rc2.cpp", "src/symmetric"),
    ("rc5.cpp", "src/symmetric"),
    ("rc6.cpp", "src/symmetric"),
    ("rijndael.cpp", "src/symmetric"),
    ("rijndael_simd.cpp", "src/symmetric"),
    ("safer.cpp", "src/symmetric"),
    ("salsa.cpp", "src/symmetric"),
    ("seal.cpp", "src/symmetric"),
    ("seed.cpp", "src/symmetric"),
    ("serpent.cpp", "src/symmetric"),
    ("shacal2.cpp", "src/symmetric"),
    ("shacal2_simd.cpp", "src/symmetric"),
    ("shark.cpp", "src/symmetric"),
    ("sharkbox.cpp", "src/symmetric"),
    ("simeck.cpp", "src/symmetric"),
    ("simon.cpp", "src/symmetric"),
    ("simon128_simd.cpp", "src/symmetric"),
    ("skipjack.cpp", "src/symmetric"),
    ("sm4.cpp", "src/symmetric"),
    ("sm4_simd.cpp", "src/symmetric"),
    ("sosemanuk.cpp", "src/symmetric"),
    ("speck.cpp", "src/symmetric"),
    ("speck128_simd.cpp", "src/symmetric"),
    ("square.cpp", "src/symmetric"),
    ("squaretb.cpp", "src/symmetric"),
    ("tea.cpp", "src/symmetric"),
    ("threefish.cpp", "src/symmetric"),
    ("twofish.cpp", "src/symmetric"),
    ("wake.cpp", "src/symmetric"),

    // Test
    ("bench1.cpp", "src/test"),
    ("bench2.cpp", "src/test"),
    ("bench3.cpp", "src/test"),
    ("datatest.cpp", "src/test"),
    ("dlltest.cpp", "src/test"),
    ("fipstest.cpp", "src/test"),
    ("regtest1.cpp", "src/test"),
    ("regtest2.cpp", "src/test"),
    ("regtest3.cpp", "src/test"),
    ("regtest4.cpp", "src/test"),
    ("test.cpp", "src/test"),
    ("validat0.cpp", "src/test"),
    ("validat1.cpp", "src/test"),
    ("validat10.cpp", "src/test"),
    ("validat2.cpp", "src/test"),
    ("validat3.cpp", "src/test"),
    ("validat4.cpp", "src/test"),
    ("validat5.cpp", "src/test"),
    ("validat6.cpp", "src/test"),
    ("validat7.cpp", "src/test"),
    ("validat8.cpp", "src/test"),
    ("validat9.cpp", "src/test"),

    // Util
    ("hrtimer.cpp", "src/util"),
    ("ida.cpp", "src/util"),
    ("simple.cpp", "src/util"),
];

// ============================================================================
// Separator
// ============================================================================

/// Character written between directory segments in rewritten values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Slash,
    Backslash,
}

impl Separator {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "/" => Ok(Separator::Slash),
            "\\" => Ok(Separator::Backslash),
            _ => Err(Error::config_invalid_value(
                "separator",
                Some(s.to_string()),
                format!("Unknown separator '{}'. Use: \"/\" or \"\\\\\"", s),
            )),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Separator::Slash => '/',
            Separator::Backslash => '\\',
        }
    }

    /// Render a `/`-separated directory with this separator.
    pub fn render(self, dir: &str) -> String {
        match self {
            Separator::Slash => dir.to_string(),
            Separator::Backslash => dir.replace('/', "\\"),
        }
    }

    /// Join a `/`-separated directory and a filename.
    pub fn join(self, dir: &str, filename: &str) -> String {
        format!("{}{}{}", self.render(dir), self.as_char(), filename)
    }
}

/// Last path segment of a project value, splitting on either separator.
pub fn file_name(value: &str) -> &str {
    value.rsplit(['/', '\\']).next().unwrap_or(value)
}

/// Directory part of a project value, if it has one.
pub fn parent_dir(value: &str) -> Option<&str> {
    value.rfind(['/', '\\']).map(|idx| &value[..idx])
}

/// Both separator spellings of a `/`-separated directory, each with a trailing separator.
fn prefixed_forms(dir: &str) -> [String; 2] {
    [
        format!("{}/", dir),
        format!("{}\\", Separator::Backslash.render(dir)),
    ]
}

// ============================================================================
// Source layout
// ============================================================================

/// Filename→directory map for compiled sources.
///
/// Keys are exact, case-sensitive filenames. Iteration follows insertion order;
/// inserting an existing key replaces its directory in place.
#[derive(Debug, Clone, Default)]
pub struct SourceLayout {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SourceLayout {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_SOURCES.iter().copied())
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut layout = Self::default();
        for (filename, dir) in entries {
            layout.insert(filename, dir);
        }
        layout
    }

    pub fn insert(&mut self, filename: impl Into<String>, dir: impl Into<String>) {
        let filename = filename.into();
        let dir = dir.into();
        match self.index.get(&filename) {
            Some(&pos) => self.entries[pos].1 = dir,
            None => {
                self.index.insert(filename.clone(), self.entries.len());
                self.entries.push((filename, dir));
            }
        }
    }

    pub fn directory_for(&self, filename: &str) -> Option<&str> {
        self.index
            .get(filename)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(filename, dir)| (filename.as_str(), dir.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Header policy
// ============================================================================

#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    /// `/`-separated canonical header directory.
    pub header_dir: String,
    /// Filenames left untouched wherever they live.
    pub excluded: Vec<String>,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self {
            header_dir: DEFAULT_HEADER_DIR.to_string(),
            excluded: DEFAULT_EXCLUDED_HEADERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl HeaderPolicy {
    /// True if `value` already sits under the canonical directory, in either separator form.
    pub fn is_canonical(&self, value: &str) -> bool {
        prefixed_forms(&self.header_dir)
            .iter()
            .any(|prefix| value.contains(prefix.as_str()))
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.excluded.iter().any(|name| name == filename)
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Everything the rewrite stages need for one run. Read-only once built.
#[derive(Debug, Clone)]
pub struct Rules {
    pub sources: SourceLayout,
    pub headers: HeaderPolicy,
    pub separator: Separator,
}

impl Default for Rules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Rules {
    pub fn builtin() -> Self {
        Self {
            sources: SourceLayout::builtin(),
            headers: HeaderPolicy::default(),
            separator: Separator::default(),
        }
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn source_path(&self, dir: &str, filename: &str) -> String {
        self.separator.join(dir, filename)
    }

    pub fn header_path(&self, filename: &str) -> String {
        self.separator.join(&self.headers.header_dir, filename)
    }

    /// True if `dir` (as found in a project value) names the `/`-separated `expected` directory.
    pub fn same_dir(dir: &str, expected: &str) -> bool {
        dir == expected || dir == Separator::Backslash.render(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_unique_keys() {
        let layout = SourceLayout::builtin();
        assert_eq!(layout.len(), BUILTIN_SOURCES.len());
    }

    #[test]
    fn builtin_table_covers_cpp_and_asm() {
        let layout = SourceLayout::builtin();
        assert_eq!(layout.directory_for("integer.cpp"), Some("src/core"));
        assert_eq!(layout.directory_for("x64masm.asm"), Some("src/core"));
        assert_eq!(layout.directory_for("rdseed.asm"), Some("src/random"));
        assert_eq!(layout.directory_for("Integer.cpp"), None);
    }

    #[test]
    fn builtin_directories_have_one_or_two_segments() {
        for (filename, dir) in BUILTIN_SOURCES {
            let segments = dir.split('/').count();
            assert!(
                (1..=2).contains(&segments),
                "{} maps to {} segments",
                filename,
                segments
            );
        }
    }

    #[test]
    fn insert_existing_key_keeps_position() {
        let mut layout = SourceLayout::from_entries([("a.cpp", "src/one"), ("b.cpp", "src/two")]);
        layout.insert("a.cpp", "src/three");
        layout.insert("c.cpp", "src/four");

        let entries: Vec<_> = layout.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("a.cpp", "src/three"),
                ("b.cpp", "src/two"),
                ("c.cpp", "src/four"),
            ]
        );
    }

    #[test]
    fn separator_renders_directories() {
        assert_eq!(Separator::Slash.join("src/core", "misc.cpp"), "src/core/misc.cpp");
        assert_eq!(
            Separator::Backslash.join("src/core", "misc.cpp"),
            "src\\core\\misc.cpp"
        );
        assert!(Separator::from_str("|").is_err());
        assert_eq!(Separator::from_str("\\").unwrap(), Separator::Backslash);
    }

    #[test]
    fn file_name_splits_on_either_separator() {
        assert_eq!(file_name("a/b\\c.h"), "c.h");
        assert_eq!(file_name("c.h"), "c.h");
        assert_eq!(parent_dir("src\\core\\misc.cpp"), Some("src\\core"));
        assert_eq!(parent_dir("misc.cpp"), None);
    }

    #[test]
    fn header_policy_recognizes_canonical_and_excluded() {
        let policy = HeaderPolicy::default();
        assert!(policy.is_canonical("include/cryptopp/queue.h"));
        assert!(policy.is_canonical("include\\cryptopp\\queue.h"));
        assert!(!policy.is_canonical("include/cryptopp.h"));
        assert!(policy.is_excluded("resource.h"));
        assert!(!policy.is_excluded("resources.h"));
    }
}
