use fabric_keyring::{DEFAULT_KEYRING, MemoryKeyring, SecretStore, TlsPsk};

#[test]
fn psk_survives_store_without_text_form() {
    let store = MemoryKeyring::new();
    let ring = store.lookup_keyring(DEFAULT_KEYRING).unwrap();

    let original = TlsPsk::new((0u8..32).collect::<Vec<_>>()).unwrap();
    let encoded = original.encode();

    let decoded = TlsPsk::decode(&encoded).unwrap();
    let serial = store
        .insert_key(ring, "psk", "NVMe0R01 host subsys", decoded.key())
        .unwrap();

    let raw = store.read_key(Some(ring), serial).unwrap();
    assert_eq!(TlsPsk::new(raw).unwrap().encode(), encoded);
}
