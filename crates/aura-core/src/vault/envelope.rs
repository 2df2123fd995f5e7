//! Persisted shapes: the encrypted envelope and the two metadata records.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::{self, DerivedKey, KdfParams, SALT_LENGTH};
use crate::error::{AuraError, Result};
use crate::storage::KeyValueStore;

/// `{ "enc": true, "ivB64": ..., "ctB64": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub enc: bool,
    pub iv_b64: String,
    pub ct_b64: String,
}

impl Envelope {
    /// Encrypt a document under `key` with a fresh IV.
    pub fn seal(key: &DerivedKey, document: &Value) -> Result<Self> {
        let plaintext = serde_json::to_vec(document)?;
        let sealed = crypto::seal(key, &plaintext)?;
        Ok(Self {
            enc: true,
            iv_b64: STANDARD.encode(sealed.iv),
            ct_b64: STANDARD.encode(&sealed.ciphertext),
        })
    }

    /// Decrypt and parse the inner document.
    ///
    /// Every failure (bad base64, tag mismatch, inner JSON) is
    /// `DecryptionFailed`.
    pub fn open(&self, key: &DerivedKey) -> Result<Value> {
        let iv = STANDARD
            .decode(&self.iv_b64)
            .map_err(|e| AuraError::DecryptionFailed(format!("IV is not base64: {}", e)))?;
        let ciphertext = STANDARD
            .decode(&self.ct_b64)
            .map_err(|e| AuraError::DecryptionFailed(format!("Ciphertext is not base64: {}", e)))?;
        let plaintext = crypto::open(key, &iv, &ciphertext)?;
        serde_json::from_slice(&plaintext).map_err(|e| {
            AuraError::DecryptionFailed(format!("Decrypted payload is not JSON: {}", e))
        })
    }
}

fn default_kdf_version() -> u32 {
    1
}

/// `{ "saltB64": ..., "kdfVersion": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMeta {
    pub salt_b64: String,
    /// Absent in records written before versioning; those are version 1
    #[serde(default = "default_kdf_version")]
    pub kdf_version: u32,
}

impl SecurityMeta {
    pub fn new(salt: &[u8], params: KdfParams) -> Self {
        Self {
            salt_b64: STANDARD.encode(salt),
            kdf_version: params.version,
        }
    }

    /// The decoded salt, if it is valid base64 of at least [`SALT_LENGTH`] bytes.
    pub fn salt(&self) -> Option<Vec<u8>> {
        STANDARD
            .decode(&self.salt_b64)
            .ok()
            .filter(|salt| salt.len() >= SALT_LENGTH)
    }
}

/// `{ "enabled": ..., "hash": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMeta {
    pub enabled: bool,
    #[serde(default)]
    pub hash: String,
}

impl PinMeta {
    pub fn enabled(verifier: String) -> Self {
        Self {
            enabled: true,
            hash: verifier,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            hash: String::new(),
        }
    }
}

/// What sits in a profile's state slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Nothing stored, or JSON `null`
    Missing,
    Plain(Value),
    Sealed(Envelope),
}

impl Payload {
    pub fn is_sealed(&self) -> bool {
        matches!(self, Payload::Sealed(_))
    }
}

/// Classify a raw state slot.
///
/// Unparseable JSON is `MalformedStorage`. An object with `enc: true` that
/// lacks the envelope fields is `DecryptionFailed`.
pub fn parse_payload(raw: Option<&str>) -> Result<Payload> {
    let Some(raw) = raw else {
        return Ok(Payload::Missing);
    };
    let value: Value =
        serde_json::from_str(raw).map_err(|e| AuraError::MalformedStorage(e.to_string()))?;

    match value {
        Value::Null => Ok(Payload::Missing),
        Value::Object(ref map) if map.get("enc") == Some(&Value::Bool(true)) => {
            serde_json::from_value(value)
                .map(Payload::Sealed)
                .map_err(|e| AuraError::DecryptionFailed(format!("Incomplete envelope: {}", e)))
        }
        other => Ok(Payload::Plain(other)),
    }
}

/// Read PIN metadata. Missing means "no PIN"; so does an unreadable record.
pub fn read_pin_meta<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Option<PinMeta>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Option<PinMeta>>(&raw) {
        Ok(meta) => Ok(meta),
        Err(err) => {
            tracing::warn!(error = %err, "PIN metadata is unreadable; treating PIN as disabled");
            Ok(None)
        }
    }
}

/// Read security metadata. `None` covers both missing and unreadable.
pub fn read_security_meta<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<SecurityMeta>> {
    Ok(store
        .get(key)?
        .and_then(|raw| serde_json::from_str::<SecurityMeta>(&raw).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn key(pin: &str) -> DerivedKey {
        derive_key(pin, &[7u8; SALT_LENGTH], KdfParams::new(1, 10)).unwrap()
    }

    #[test]
    fn test_envelope_wire_names() {
        let envelope = Envelope::seal(&key("1234"), &json!({ "a": 1 })).unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["enc"], json!(true));
        assert!(value["ivB64"].is_string());
        assert!(value["ctB64"].is_string());
        assert_eq!(STANDARD.decode(&envelope.iv_b64).unwrap().len(), 12);
    }

    #[test]
    fn test_envelope_open() {
        let doc = json!({ "moods": [1, 2, 3], "name": "Ada" });
        let envelope = Envelope::seal(&key("1234"), &doc).unwrap();
        assert_eq!(envelope.open(&key("1234")).unwrap(), doc);
        assert!(matches!(
            envelope.open(&key("9999")),
            Err(AuraError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_envelope_bad_base64() {
        let envelope = Envelope {
            enc: true,
            iv_b64: "!!".to_string(),
            ct_b64: "AAAA".to_string(),
        };
        assert!(matches!(
            envelope.open(&key("1234")),
            Err(AuraError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_security_meta_missing_version_is_v1() {
        let meta: SecurityMeta =
            serde_json::from_str(r#"{"saltB64":"AAAAAAAAAAAAAAAAAAAAAA=="}"#).unwrap();
        assert_eq!(meta.kdf_version, 1);
        assert_eq!(meta.salt().unwrap().len(), SALT_LENGTH);
    }

    #[test]
    fn test_security_meta_short_salt_rejected() {
        let meta = SecurityMeta {
            salt_b64: STANDARD.encode([1u8; 4]),
            kdf_version: 1,
        };
        assert!(meta.salt().is_none());
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(None).unwrap(), Payload::Missing);
        assert_eq!(parse_payload(Some("null")).unwrap(), Payload::Missing);
        assert_eq!(
            parse_payload(Some(r#"{"enc":false,"x":1}"#)).unwrap(),
            Payload::Plain(json!({ "enc": false, "x": 1 }))
        );
        assert!(parse_payload(Some(r#"{"enc":true,"ivB64":"a","ctB64":"b"}"#))
            .unwrap()
            .is_sealed());
        assert!(matches!(
            parse_payload(Some("{not json")),
            Err(AuraError::MalformedStorage(_))
        ));
        assert!(matches!(
            parse_payload(Some(r#"{"enc":true}"#)),
            Err(AuraError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_read_pin_meta() {
        let store = MemoryStore::new();
        assert_eq!(read_pin_meta(&store, "p").unwrap(), None);

        store.set("p", "garbage").unwrap();
        assert_eq!(read_pin_meta(&store, "p").unwrap(), None);

        store.set("p", "null").unwrap();
        assert_eq!(read_pin_meta(&store, "p").unwrap(), None);

        let meta = PinMeta::enabled("h".to_string());
        store.set("p", &serde_json::to_string(&meta).unwrap()).unwrap();
        assert_eq!(read_pin_meta(&store, "p").unwrap(), Some(meta));
    }
}
