//! Short code generation strategies.
//!
//! Generators only produce candidates. Uniqueness is enforced by
//! [`crate::domain::repositories::MappingRepository::reserve`] and the
//! collision loop in [`crate::application::services::ShortenerService`].

use rand::Rng;

/// Upper bound (exclusive) for random identifiers: ids are drawn from `[0, 2^63 - 1)`.
pub const MAX_RANDOM_ID: u64 = i64::MAX as u64;

/// Bitcoin base58 alphabet, as used by the `bs58` crate.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Alphanumeric alphabet `0-9A-Za-z`.
pub const BASE62_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Characters easily confused with one another when read or typed.
pub const AMBIGUOUS_CHARS: &[char] = &['0', 'O', 'o', '1', 'l', 'I'];

/// Maximum length accepted for fixed-length codes.
pub const MAX_CODE_LENGTH: usize = 64;

/// Errors raised while configuring a generator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Code length must be between 1 and {max}, got {0}", max = MAX_CODE_LENGTH)]
    InvalidLength(usize),

    #[error("Alphabet must contain at least 2 distinct ASCII characters")]
    AlphabetTooSmall,

    #[error("Alphabet contains a non-alphanumeric character: {0:?}")]
    InvalidCharacter(char),
}

/// Produces candidate short codes.
///
/// Implementations must not block and must be safe to share across request
/// handlers.
pub trait CodeGenerator: Send + Sync {
    /// Returns a new candidate code. Never empty.
    fn generate(&self) -> String;
}

/// Encoding applied to a random 63-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdEncoding {
    /// Base58 over the 8 little-endian bytes of the id.
    #[default]
    Base58,
    /// Positional base62 numeral of the id.
    Base62,
}

/// Encodes a random non-negative 63-bit id into a compact code.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator {
    encoding: IdEncoding,
}

impl RandomIdGenerator {
    pub fn new(encoding: IdEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> IdEncoding {
        self.encoding
    }

    /// Encodes a specific id with this generator's encoding.
    pub fn encode(&self, id: u64) -> String {
        match self.encoding {
            IdEncoding::Base58 => encode_base58(id),
            IdEncoding::Base62 => encode_base62(id),
        }
    }
}

impl CodeGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let id = rand::rng().random_range(0..MAX_RANDOM_ID);
        self.encode(id)
    }
}

/// Draws a fixed-length code from a restricted character set.
#[derive(Debug, Clone)]
pub struct AlphabetGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl AlphabetGenerator {
    /// Creates a generator over a custom alphabet.
    ///
    /// Duplicate characters are collapsed so every character is equally likely.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] if `length` is out of `1..=64`, or the alphabet
    /// holds fewer than 2 distinct characters or anything but ASCII letters and digits.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, GeneratorError> {
        if length == 0 || length > MAX_CODE_LENGTH {
            return Err(GeneratorError::InvalidLength(length));
        }

        let mut chars: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in alphabet.chars() {
            if !c.is_ascii_alphanumeric() {
                return Err(GeneratorError::InvalidCharacter(c));
            }
            if !chars.contains(&c) {
                chars.push(c);
            }
        }

        if chars.len() < 2 {
            return Err(GeneratorError::AlphabetTooSmall);
        }

        Ok(Self {
            alphabet: chars,
            length,
        })
    }

    /// Alphanumeric generator, optionally without [`AMBIGUOUS_CHARS`].
    pub fn alphanumeric(length: usize, exclude_ambiguous: bool) -> Result<Self, GeneratorError> {
        if exclude_ambiguous {
            let alphabet: String = BASE62_ALPHABET
                .chars()
                .filter(|c| !AMBIGUOUS_CHARS.contains(c))
                .collect();
            Self::new(&alphabet, length)
        } else {
            Self::new(BASE62_ALPHABET, length)
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

impl CodeGenerator for AlphabetGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

/// Base58 of the id's little-endian bytes.
///
/// Leading zero bytes are kept as `'1'` characters, so zero encodes to `"11111111"`.
pub fn encode_base58(id: u64) -> String {
    bs58::encode(id.to_le_bytes()).into_string()
}

/// Base62 numeral over [`BASE62_ALPHABET`]. Zero encodes to `"0"`.
pub fn encode_base62(mut id: u64) -> String {
    let alphabet = BASE62_ALPHABET.as_bytes();
    if id == 0 {
        return (alphabet[0] as char).to_string();
    }

    // 62^11 > 2^64
    let mut buf = Vec::with_capacity(11);
    while id > 0 {
        buf.push(alphabet[(id % 62) as usize]);
        id /= 62;
    }
    buf.reverse();

    buf.into_iter().map(char::from).collect()
}
