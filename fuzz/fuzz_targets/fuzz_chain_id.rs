#![no_main]

use libfuzzer_sys::fuzz_target;
use wallet_standard_core::ChainId;

fuzz_target!(|data: &str| {
    let Ok(chain) = ChainId::parse(data) else {
        return;
    };

    // Parsing never rewrites the input
    assert_eq!(chain.as_str(), data);
    assert!(!chain.namespace().is_empty());
    assert!(!chain.reference().is_empty());
    assert_eq!(
        format!("{}:{}", chain.namespace(), chain.reference()),
        data
    );

    // JSON round-trip goes through the same validation
    let json = serde_json::to_string(&chain).unwrap();
    let parsed: ChainId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, chain);
});
