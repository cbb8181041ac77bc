use crate::config::parameter;
use crate::error::hash_error::HashError;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine as _};
use rand::{rngs::OsRng, RngCore};

/// bcrypt's own base64 alphabet, no padding; salt strings carry 16 bytes
/// in 22 characters with 4 trailing bits.
const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Deterministic salted hashing of plaintext passwords. The salt is stored
/// as the full bcrypt salt string (`$2b$<cost>$<22 chars>`), so the cost a
/// digest was produced with travels with it and a later change of
/// `BCRYPT_COST` never breaks verification of existing users.
#[derive(Clone)]
pub struct PasswordService {
    cost: u32,
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn from_config() -> Self {
        Self::new(parameter::get_u32("BCRYPT_COST"))
    }

    /// Generate a fresh random salt and digest the plaintext with it.
    /// Returns `(salt, digest)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<(String, String), HashError> {
        let mut salt_bytes = [0u8; 16];
        OsRng.fill_bytes(&mut salt_bytes);

        let salt = format!("$2b${:02}${}", self.cost, BCRYPT_B64.encode(salt_bytes));
        let digest = digest_with(plaintext, self.cost, salt_bytes)?;
        Ok((salt, digest))
    }

    /// Re-derive the digest for a stored salt. Given the same salt and
    /// plaintext this reproduces exactly what `encrypt` returned.
    pub fn encrypt_with_salt(&self, plaintext: &str, salt: &str) -> Result<String, HashError> {
        let (cost, salt_bytes) = parse_salt(salt)?;
        digest_with(plaintext, cost, salt_bytes)
    }
}

fn digest_with(plaintext: &str, cost: u32, salt_bytes: [u8; 16]) -> Result<String, HashError> {
    let parts = bcrypt::hash_with_salt(plaintext, cost, salt_bytes)?;
    Ok(parts.format_for_version(bcrypt::Version::TwoB))
}

fn parse_salt(salt: &str) -> Result<(u32, [u8; 16]), HashError> {
    let parts: Vec<&str> = salt.split('$').collect();
    let (version, cost_str, encoded) = match parts.as_slice() {
        ["", version, cost, encoded] => (*version, *cost, *encoded),
        _ => return Err(HashError::Encoding(format!("malformed salt string: {}", salt))),
    };

    if !matches!(version, "2a" | "2b" | "2y") {
        return Err(HashError::Encoding(format!("unsupported salt version: {}", version)));
    }

    let cost = cost_str
        .parse::<u32>()
        .map_err(|_| HashError::Encoding(format!("invalid salt cost: {}", cost_str)))?;

    let decoded = BCRYPT_B64
        .decode(encoded)
        .map_err(|e| HashError::Encoding(format!("invalid salt encoding: {}", e)))?;
    let salt_bytes: [u8; 16] = decoded
        .try_into()
        .map_err(|_| HashError::Encoding("salt is not 16 bytes".to_string()))?;

    Ok((cost, salt_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    fn service() -> PasswordService {
        PasswordService::new(4)
    }

    #[test]
    fn test_encrypt_produces_salt_and_digest() {
        let (salt, digest) = service().encrypt("correct horse").unwrap();

        assert!(!salt.is_empty());
        assert!(salt.starts_with("$2b$04$"));
        assert_ne!(digest, "correct horse");
        // The digest embeds the very salt it was produced with
        assert!(digest.starts_with(&salt));
    }

    #[test]
    fn test_salts_are_unique_per_call() {
        let svc = service();
        let (salt_a, _) = svc.encrypt("password one").unwrap();
        let (salt_b, _) = svc.encrypt("password two").unwrap();
        assert_ne!(salt_a, salt_b);
    }

    #[test]
    fn test_round_trip_law() {
        let svc = service();
        let (salt, digest) = svc.encrypt("s3cret!").unwrap();

        let rederived = svc.encrypt_with_salt("s3cret!", &salt).unwrap();
        assert_eq!(rederived, digest);

        let wrong = svc.encrypt_with_salt("not the password", &salt).unwrap();
        assert_ne!(wrong, digest);
    }

    #[test]
    fn test_rederivation_uses_cost_from_salt() {
        // Digest produced at cost 4, re-derived by a service configured
        // with a different cost: the stored salt wins.
        let (salt, digest) = PasswordService::new(4).encrypt("pw").unwrap();
        let rederived = PasswordService::new(6).encrypt_with_salt("pw", &salt).unwrap();
        assert_eq!(rederived, digest);
    }

    #[test]
    fn test_malformed_salt_is_encoding_error() {
        let svc = service();
        assert!(matches!(
            svc.encrypt_with_salt("pw", "not-a-salt"),
            Err(HashError::Encoding(_))
        ));
        assert!(matches!(
            svc.encrypt_with_salt("pw", "$9z$04$AAAAAAAAAAAAAAAAAAAAAA"),
            Err(HashError::Encoding(_))
        ));
        assert!(matches!(
            svc.encrypt_with_salt("pw", "$2b$xx$AAAAAAAAAAAAAAAAAAAAAA"),
            Err(HashError::Encoding(_))
        ));
        assert!(matches!(
            svc.encrypt_with_salt("pw", "$2b$04$AAAA"),
            Err(HashError::Encoding(_))
        ));
    }
}
