//! Signed envelope wire format.
//!
//! A cached value is stored as `{"signature": .., "data": .., "timestamp": ..}`
//! where `signature` is the lowercase hex HMAC-SHA256 of the RFC 8785
//! canonical form of `data`.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use tracklist_core::CacheSecret;

type HmacSha256 = Hmac<Sha256>;

/// The stored form of a cached value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheEnvelope {
    /// Lowercase hex HMAC-SHA256 over the canonical bytes of `data`.
    pub signature: String,
    pub data: Value,
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CacheEnvelope {
    /// Sign `data` and wrap it with the given write time.
    pub fn seal(data: Value, secret: &CacheSecret, timestamp: i64) -> Result<Self, String> {
        let signature = sign(&canonical_bytes(&data)?, secret)?;
        Ok(Self {
            signature,
            data,
            timestamp,
        })
    }

    /// Parse a stored envelope. Anything other than an object with exactly
    /// the three envelope fields is rejected.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Recompute the signature over `data` and compare in constant time.
    pub fn verify(&self, secret: &CacheSecret) -> bool {
        match canonical_bytes(&self.data) {
            Ok(bytes) => verify_signature(&bytes, &self.signature, secret),
            Err(_) => false,
        }
    }

    /// Milliseconds elapsed between the write and `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }
}

/// RFC 8785 canonical JSON bytes.
pub fn canonical_bytes(data: &Value) -> Result<Vec<u8>, String> {
    serde_jcs::to_vec(data).map_err(|e| format!("canonicalization failed: {}", e))
}

/// Lowercase hex HMAC-SHA256 of `payload`.
pub fn sign(payload: &[u8], secret: &CacheSecret) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Failed to initialize HMAC: {}", e))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a lowercase hex signature against `payload`.
pub fn verify_signature(payload: &[u8], signature_hex: &str, secret: &CacheSecret) -> bool {
    if !is_lowercase_hex(signature_hex) {
        return false;
    }
    let Ok(expected) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

fn is_lowercase_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn secret() -> CacheSecret {
        CacheSecret::new("testkey-for-envelopes")
    }

    #[test]
    fn test_canonical_bytes_sort_keys() {
        let a = canonical_bytes(&json!({"b": 1, "a": [true, null]})).unwrap();
        let b = canonical_bytes(&json!({"a": [true, null], "b": 1})).unwrap();
        assert_eq!(a, b);
        assert_eq!(String::from_utf8(a).unwrap(), r#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let envelope = CacheEnvelope::seal(json!({"x": 1}), &secret(), 1_000).unwrap();
        assert_eq!(envelope.signature.len(), 64);
        assert!(envelope
            .signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_seal_then_verify() {
        let envelope = CacheEnvelope::seal(json!([1, 2, 3]), &secret(), 1_000).unwrap();
        assert!(envelope.verify(&secret()));
        assert!(!envelope.verify(&CacheSecret::new("another-secret")));
    }

    #[test]
    fn test_verify_fails_after_data_change() {
        let mut envelope = CacheEnvelope::seal(json!({"name": "a"}), &secret(), 1_000).unwrap();
        envelope.data = json!({"name": "b"});
        assert!(!envelope.verify(&secret()));
    }

    #[test]
    fn test_verify_rejects_non_hex_signature() {
        let mut envelope = CacheEnvelope::seal(json!(1), &secret(), 1_000).unwrap();
        envelope.signature = "not-hex".to_string();
        assert!(!envelope.verify(&secret()));
    }

    #[test]
    fn test_verify_rejects_uppercase_signature() {
        let mut envelope = CacheEnvelope::seal(json!({"x": 1}), &secret(), 1_000).unwrap();
        envelope.signature = envelope.signature.to_uppercase();
        assert!(!envelope.verify(&secret()));
    }

    #[test]
    fn test_parse_wire_format() {
        let envelope = CacheEnvelope::seal(json!({"k": "v"}), &secret(), 42).unwrap();
        let raw = envelope.to_json().unwrap();
        let wire: Value = serde_json::from_str(&raw).unwrap();
        let fields: Vec<&String> = wire.as_object().unwrap().keys().collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(wire["timestamp"], json!(42));
        assert_eq!(CacheEnvelope::parse(&raw).unwrap(), envelope);
    }

    #[test]
    fn test_parse_rejects_extra_or_missing_fields() {
        assert!(CacheEnvelope::parse(r#"{"signature":"00","data":1}"#).is_err());
        assert!(
            CacheEnvelope::parse(r#"{"signature":"00","data":1,"timestamp":1,"x":0}"#).is_err()
        );
        assert!(CacheEnvelope::parse("not json").is_err());
    }

    #[test]
    fn test_age() {
        let envelope = CacheEnvelope::seal(json!(null), &secret(), 1_000).unwrap();
        assert_eq!(envelope.age_ms(1_500), 500);
    }
}
