use std::path::Path;
use std::sync::Arc;

use aura_core::crypto::{derive_key, verifier_of, KdfParams};
use aura_core::vault::{Envelope, PinMeta, SecurityMeta};
use aura_core::{
    decide, AuraError, BootDecision, KeyValueStore, LoadOutcome, ProfileId, ProfileRegistry,
    SqliteStore, Vault, VaultState,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tempfile::TempDir;

const FAST: KdfParams = KdfParams::new(1, 2_000);

struct TempStore {
    _dir: TempDir,
    path: std::path::PathBuf,
}

impl TempStore {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("aura.db");
        Self { _dir: dir, path }
    }

    fn open(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(&self.path).expect("store should open"))
    }
}

fn vault(store: &Arc<SqliteStore>, user: &str) -> Vault<SqliteStore> {
    Vault::with_params(store.clone(), ProfileId::new(user), FAST)
}

fn raw(path: &Path, key: &str) -> Option<String> {
    SqliteStore::open(path)
        .expect("store should reopen")
        .get(key)
        .expect("get should succeed")
}

#[tokio::test]
async fn test_enable_then_disable_round_trip() {
    let temp = TempStore::new();
    let store = temp.open();
    let v = vault(&store, "ada");

    let doc = json!({
        "v": 360,
        "name": "Ada",
        "moods": [],
        "journal": [{ "date": "2026-03-14", "text": "hi" }]
    });
    v.save(&doc).await.expect("save should succeed");
    v.enable_pin("1234").await.expect("enable should succeed");

    let stored = raw(&temp.path, "aura_state_v360::ada").expect("state should exist");
    let envelope: Envelope = serde_json::from_str(&stored).expect("state should be an envelope");
    assert!(envelope.enc);
    assert!(!stored.contains("Ada"));

    v.disable_pin().await.expect("disable should succeed");
    let stored = raw(&temp.path, "aura_state_v360::ada").expect("state should exist");
    assert_eq!(serde_json::from_str::<Value>(&stored).unwrap(), doc);
    assert_eq!(v.state().await.unwrap(), VaultState::UnlockedPlaintext);
}

#[tokio::test]
async fn test_disable_after_restart_persists_plaintext() {
    let temp = TempStore::new();
    let doc = json!({ "mood": "calm" });
    {
        let store = temp.open();
        let v = vault(&store, "ada");
        v.enable_pin("1234").await.unwrap();
        v.save(&doc).await.unwrap();
    }

    {
        let store = temp.open();
        let v = vault(&store, "ada");
        assert_eq!(v.state().await.unwrap(), VaultState::Locked);
        assert_eq!(v.unlock("1234").await.unwrap().document, doc);
        let loaded = v.load().await.unwrap();
        assert_eq!(loaded.document, doc);
        assert_eq!(loaded.outcome, LoadOutcome::Stored);
        v.disable_pin().await.expect("disable after unlock should succeed");
    }

    let store = temp.open();
    let v = vault(&store, "ada");
    assert_eq!(v.state().await.unwrap(), VaultState::UnlockedPlaintext);
    let loaded = v.load().await.expect("plain load should succeed");
    assert_eq!(loaded.document, doc);
    assert_eq!(loaded.outcome, LoadOutcome::Stored);
    assert_eq!(
        serde_json::from_str::<Value>(&raw(&temp.path, "aura_state_v360::ada").unwrap()).unwrap(),
        doc
    );
}

#[tokio::test]
async fn test_lock_on_restart() {
    let temp = TempStore::new();
    {
        let store = temp.open();
        let v = vault(&store, "ada");
        v.save(&json!({ "name": "Ada" })).await.unwrap();
        v.enable_pin("8080").await.unwrap();
    }

    let store = temp.open();
    let current = ProfileId::new("ada");
    assert_eq!(
        decide(store.as_ref(), Some(&current)).unwrap(),
        BootDecision::Locked
    );

    let v = vault(&store, "ada");
    assert_eq!(v.state().await.unwrap(), VaultState::Locked);
    assert!(matches!(v.load().await, Err(AuraError::Locked)));

    let loaded = v.unlock("8080").await.expect("unlock should succeed");
    assert_eq!(loaded.document["name"], "Ada");
}

#[tokio::test]
async fn test_wrong_pin_vs_corruption() {
    let temp = TempStore::new();
    let store = temp.open();
    {
        let v = vault(&store, "ada");
        v.save(&json!({ "name": "Ada" })).await.unwrap();
        v.enable_pin("1234").await.unwrap();
    }

    let v = vault(&store, "ada");
    assert!(matches!(v.unlock("4321").await, Err(AuraError::WrongPin)));

    // Flip one ciphertext byte: the PIN is right, the data is not.
    let stored = store.get("aura_state_v360::ada").unwrap().unwrap();
    let mut envelope: Envelope = serde_json::from_str(&stored).unwrap();
    let mut ct = STANDARD.decode(&envelope.ct_b64).unwrap();
    ct[0] ^= 0x01;
    envelope.ct_b64 = STANDARD.encode(ct);
    store
        .set("aura_state_v360::ada", &serde_json::to_string(&envelope).unwrap())
        .unwrap();

    assert!(matches!(
        v.unlock("1234").await,
        Err(AuraError::DecryptionFailed(_))
    ));
    assert_eq!(v.state().await.unwrap(), VaultState::Locked);
}

#[tokio::test]
async fn test_malformed_storage_fallback() {
    let temp = TempStore::new();
    let store = temp.open();
    store.set("aura_state_v360::ada", "{\"v\": 360,").unwrap();

    let loaded = vault(&store, "ada").load().await.expect("load should recover");
    match loaded.outcome {
        LoadOutcome::Recovered { reason } => assert!(!reason.is_empty()),
        other => panic!("expected recovery, got {:?}", other),
    }
    assert_eq!(loaded.document["v"], json!(360));
    assert_eq!(loaded.document["moods"], json!([]));
}

#[tokio::test]
async fn test_not_json_state_recovers_to_defaults() {
    let temp = TempStore::new();
    let store = temp.open();
    store.set("aura_state_v360::ada", "not json").unwrap();

    let v = vault(&store, "ada");
    assert_eq!(v.state().await.unwrap(), VaultState::UnlockedPlaintext);
    let loaded = v.load().await.expect("load should recover");
    assert!(matches!(loaded.outcome, LoadOutcome::Recovered { .. }));
    assert_eq!(loaded.document["v"], json!(360));
    assert_eq!(loaded.document["journal"], json!([]));
}

#[tokio::test]
async fn test_damaged_pin_meta_over_sealed_state() {
    let temp = TempStore::new();
    {
        let store = temp.open();
        let v = vault(&store, "ada");
        v.save(&json!({ "name": "Ada" })).await.unwrap();
        v.enable_pin("1234").await.unwrap();
        store.set("aura_pin_meta_v360::ada", "{garbage").unwrap();
    }

    let store = temp.open();
    let v = vault(&store, "ada");
    assert!(matches!(
        v.load().await,
        Err(AuraError::DecryptionFailed(_))
    ));
    v.reset().await.expect("reset should succeed");
    assert_eq!(v.load().await.unwrap().outcome, LoadOutcome::Stored);
}

#[tokio::test]
async fn test_iv_unique_per_save() {
    let temp = TempStore::new();
    let store = temp.open();
    let v = vault(&store, "ada");
    v.enable_pin("1234").await.unwrap();

    let doc = json!({ "name": "same" });
    let mut ivs = Vec::new();
    for _ in 0..5 {
        v.save(&doc).await.unwrap();
        let stored = store.get("aura_state_v360::ada").unwrap().unwrap();
        let envelope: Envelope = serde_json::from_str(&stored).unwrap();
        ivs.push(envelope.iv_b64);
    }
    let mut unique = ivs.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ivs.len());
}

#[tokio::test]
async fn test_persisted_shapes_are_compatible() {
    let temp = TempStore::new();
    let store = temp.open();
    let v = vault(&store, "ada");
    v.save(&json!({ "name": "Ada" })).await.unwrap();
    v.enable_pin("1234").await.unwrap();

    let sec: SecurityMeta =
        serde_json::from_str(&store.get("aura_sec_v360::ada").unwrap().unwrap()).unwrap();
    let pin: PinMeta =
        serde_json::from_str(&store.get("aura_pin_meta_v360::ada").unwrap().unwrap()).unwrap();
    assert_eq!(pin.hash, verifier_of("1234"));
    assert_eq!(pin.hash.len(), 44);

    // The envelope opens with a key derived independently from the stored salt.
    let salt = sec.salt().expect("salt should decode");
    let key = derive_key("1234", &salt, FAST).unwrap();
    let envelope: Envelope =
        serde_json::from_str(&store.get("aura_state_v360::ada").unwrap().unwrap()).unwrap();
    assert_eq!(envelope.open(&key).unwrap(), json!({ "name": "Ada" }));
}

#[tokio::test]
async fn test_profiles_share_a_store_without_collision() {
    let temp = TempStore::new();
    let store = temp.open();
    let registry = ProfileRegistry::new(store.clone());

    let ada = registry.register("Ada", "password-1").unwrap();
    vault(&store, ada.as_str())
        .save(&json!({ "name": "Ada" }))
        .await
        .unwrap();
    vault(&store, ada.as_str()).enable_pin("1111").await.unwrap();

    let bob = registry.register("Bob", "password-2").unwrap();
    assert_eq!(registry.current().unwrap(), Some(bob.clone()));
    assert_eq!(
        decide(store.as_ref(), Some(&bob)).unwrap(),
        BootDecision::Onboarding
    );
    vault(&store, bob.as_str()).reset().await.unwrap();

    let ada_vault = vault(&store, "ada");
    assert_eq!(ada_vault.state().await.unwrap(), VaultState::Locked);
    assert_eq!(
        ada_vault.unlock("1111").await.unwrap().document["name"],
        "Ada"
    );
}
