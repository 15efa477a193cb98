#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wallet_standard_core::{Capability, ConnectRequest, FeatureMap, FeatureName, Version};

const NAMES: [&str; 6] = [
    "standard:connect",
    "standard:signMessage",
    "standard:signTransaction",
    "solana:signAndSendTransaction",
    "acme:teleport",
    "standard:events",
];

#[derive(Debug, Arbitrary)]
struct Input {
    /// Indices into NAMES the account holds
    held: Vec<u8>,
    /// None grants everything, Some lists the requested indices
    requested: Option<Vec<u8>>,
    /// Raw request JSON, exercised separately
    json: String,
}

fn name(index: u8) -> FeatureName {
    FeatureName::from_static(NAMES[index as usize % NAMES.len()])
}

fuzz_target!(|input: Input| {
    let mut held = FeatureMap::new();
    for index in &input.held {
        held.insert(name(*index), Capability::new(Version::new(1, 0, 0)));
    }

    let requested: Option<Vec<FeatureName>> = input
        .requested
        .as_ref()
        .map(|indices| indices.iter().copied().map(name).collect());
    let granted = held.restrict(requested.as_deref());

    // A grant never exceeds what the account holds
    assert!(granted.is_subset_of(&held));

    match &requested {
        None => assert_eq!(granted.len(), held.len()),
        Some(names) => {
            for granted_name in granted.names() {
                assert!(names.contains(granted_name));
            }
            for requested_name in names {
                assert_eq!(granted.contains(requested_name), held.contains(requested_name));
            }
        }
    }

    // Arbitrary request JSON must never panic
    if let Ok(request) = serde_json::from_str::<ConnectRequest>(&input.json) {
        let _ = held.restrict(request.features.as_deref());
        let reencoded = serde_json::to_string(&request).unwrap();
        let again: ConnectRequest = serde_json::from_str(&reencoded).unwrap();
        assert_eq!(again, request);
    }
});
