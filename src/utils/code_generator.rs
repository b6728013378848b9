//! Short code generation, base-62 encoding and custom code validation.
//!
//! Codes are drawn from a fixed 62-symbol alphabet (digits, uppercase,
//! lowercase). Random codes use the operating system's CSPRNG through
//! `getrandom`; ID-derived codes use positional base-62 encoding.

use crate::error::AppError;
use serde_json::json;

/// The 62-symbol code alphabet, in encoding order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = ALPHABET.len() as u64;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Accepted length range for user-supplied custom codes.
pub const CUSTOM_CODE_MIN_LENGTH: usize = 3;
pub const CUSTOM_CODE_MAX_LENGTH: usize = 20;

/// Codes that would shadow fixed routes.
const RESERVED_CODES: &[&str] = &["api", "health"];

/// Largest byte value that maps uniformly onto the alphabet (62 * 4).
const REJECTION_LIMIT: u8 = 248;

/// Errors produced while generating or decoding codes.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("Cannot decode an empty code")]
    Empty,

    #[error("Invalid symbol '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("Code value does not fit in 64 bits")]
    Overflow,
}

/// Generator for fixed-length codes over [`ALPHABET`].
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Configured code length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws `length` independent, uniformly distributed symbols.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Entropy`] if the system random source fails.
    pub fn generate_random(&self) -> Result<String, CodeError> {
        random_symbols(self.length)
    }

    /// Encodes a non-negative integer, most significant symbol first.
    ///
    /// `encode(0)` is the first alphabet symbol.
    pub fn encode(&self, mut id: u64) -> String {
        if id == 0 {
            return (ALPHABET[0] as char).to_string();
        }

        let mut symbols = Vec::new();
        while id > 0 {
            symbols.push(ALPHABET[(id % BASE) as usize]);
            id /= BASE;
        }
        symbols.reverse();

        symbols.into_iter().map(char::from).collect()
    }

    /// Inverse of [`Self::encode`].
    ///
    /// # Errors
    ///
    /// - [`CodeError::Empty`] for an empty string
    /// - [`CodeError::InvalidSymbol`] for a symbol outside the alphabet
    /// - [`CodeError::Overflow`] if the value exceeds `u64::MAX`
    pub fn decode(&self, code: &str) -> Result<u64, CodeError> {
        if code.is_empty() {
            return Err(CodeError::Empty);
        }

        code.chars().enumerate().try_fold(0u64, |acc, (position, symbol)| {
            let index = symbol_index(symbol).ok_or(CodeError::InvalidSymbol { symbol, position })?;

            acc.checked_mul(BASE)
                .and_then(|v| v.checked_add(index))
                .ok_or(CodeError::Overflow)
        })
    }

    /// Encodes `id` and left-pads it with random symbols up to the
    /// configured length.
    ///
    /// The trailing `encode(id).len()` symbols always decode back to `id`.
    /// Encodings already at or above the configured length are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Entropy`] if padding cannot be generated.
    pub fn derive_from_id(&self, id: u64) -> Result<String, CodeError> {
        let encoded = self.encode(id);
        if encoded.len() >= self.length {
            return Ok(encoded);
        }

        let mut code = random_symbols(self.length - encoded.len())?;
        code.push_str(&encoded);
        Ok(code)
    }

    /// Returns `true` iff every symbol belongs to the alphabet.
    ///
    /// Length is not checked here.
    pub fn is_valid_code(&self, code: &str) -> bool {
        code.chars().all(|c| symbol_index(c).is_some())
    }
}

fn symbol_index(symbol: char) -> Option<u64> {
    match symbol {
        '0'..='9' => Some(symbol as u64 - '0' as u64),
        'A'..='Z' => Some(symbol as u64 - 'A' as u64 + 10),
        'a'..='z' => Some(symbol as u64 - 'a' as u64 + 36),
        _ => None,
    }
}

/// Rejection-samples random bytes into alphabet symbols.
fn random_symbols(count: usize) -> Result<String, CodeError> {
    let mut out = String::with_capacity(count);
    let mut buffer = [0u8; 32];

    while out.len() < count {
        getrandom::fill(&mut buffer).map_err(|e| CodeError::Entropy(e.to_string()))?;

        for &byte in &buffer {
            if out.len() == count {
                break;
            }
            if byte < REJECTION_LIMIT {
                out.push(ALPHABET[(byte % ALPHABET.len() as u8) as usize] as char);
            }
        }
    }

    Ok(out)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Only alphabet symbols (`0-9`, `A-Z`, `a-z`)
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns an [`AppError`] of kind `InvalidInput` when a rule is violated.
pub fn validate_custom_code(generator: &CodeGenerator, code: &str) -> Result<(), AppError> {
    let length = code.chars().count();
    if !(CUSTOM_CODE_MIN_LENGTH..=CUSTOM_CODE_MAX_LENGTH).contains(&length) {
        return Err(AppError::bad_request(
            format!(
                "Custom code must be {}-{} characters",
                CUSTOM_CODE_MIN_LENGTH, CUSTOM_CODE_MAX_LENGTH
            ),
            json!({ "provided_length": length }),
        ));
    }

    if !generator.is_valid_code(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters and digits",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_generate_random_has_configured_length() {
        for length in [4, 6, 10] {
            let code = CodeGenerator::new(length).generate_random().unwrap();
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn test_generate_random_uses_alphabet() {
        let generator = CodeGenerator::default();
        for _ in 0..200 {
            let code = generator.generate_random().unwrap();
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn test_generate_random_produces_unique_codes() {
        let generator = CodeGenerator::new(10);
        let codes: HashSet<String> = (0..1000)
            .map(|_| generator.generate_random().unwrap())
            .collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_encode_zero_is_first_symbol() {
        assert_eq!(CodeGenerator::default().encode(0), "0");
    }

    #[test]
    fn test_encode_known_values() {
        let generator = CodeGenerator::default();
        assert_eq!(generator.encode(61), "z");
        assert_eq!(generator.encode(62), "10");
        assert_eq!(generator.encode(62 * 62 + 1), "101");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let generator = CodeGenerator::default();
        for id in [0, 1, 61, 62, 3843, 3844, 1_000_000, 56_800_235_583, u64::MAX] {
            assert_eq!(generator.decode(&generator.encode(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_decode_invalid_symbol_is_distinct_error() {
        let generator = CodeGenerator::default();
        assert_eq!(
            generator.decode("ab-c"),
            Err(CodeError::InvalidSymbol {
                symbol: '-',
                position: 2
            })
        );
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(CodeGenerator::default().decode(""), Err(CodeError::Empty));
    }

    #[test]
    fn test_decode_overflow() {
        let generator = CodeGenerator::default();
        let too_big = format!("{}0", generator.encode(u64::MAX));
        assert_eq!(generator.decode(&too_big), Err(CodeError::Overflow));
    }

    #[test]
    fn test_derive_from_id_pads_to_length() {
        let generator = CodeGenerator::new(6);
        let code = generator.derive_from_id(125).unwrap();

        assert_eq!(code.len(), 6);
        assert!(generator.is_valid_code(&code));

        let suffix_len = generator.encode(125).len();
        let suffix = &code[code.len() - suffix_len..];
        assert_eq!(generator.decode(suffix).unwrap(), 125);
    }

    #[test]
    fn test_derive_from_id_long_encoding_unpadded() {
        let generator = CodeGenerator::new(4);
        let id = 62u64.pow(5);
        assert_eq!(generator.derive_from_id(id).unwrap(), generator.encode(id));
    }

    #[test]
    fn test_is_valid_code() {
        let generator = CodeGenerator::default();
        assert!(generator.is_valid_code("aZ09"));
        assert!(generator.is_valid_code(""));
        assert!(!generator.is_valid_code("with space"));
        assert!(!generator.is_valid_code("dash-ed"));
        assert!(!generator.is_valid_code("ünï"));
    }

    #[test]
    fn test_validate_custom_code_bounds() {
        let generator = CodeGenerator::default();
        assert!(validate_custom_code(&generator, "abc").is_ok());
        assert!(validate_custom_code(&generator, &"a".repeat(20)).is_ok());

        let err = validate_custom_code(&generator, "ab").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("3-20 characters"));

        assert!(validate_custom_code(&generator, &"a".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_custom_code_rejects_symbols() {
        let generator = CodeGenerator::default();
        let err = validate_custom_code(&generator, "my_code").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_validate_custom_code_reserved() {
        let generator = CodeGenerator::default();
        for &reserved in RESERVED_CODES {
            assert!(
                validate_custom_code(&generator, reserved).is_err(),
                "Reserved code '{}' should be invalid",
                reserved
            );
        }
    }
}
