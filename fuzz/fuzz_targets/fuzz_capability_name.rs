#![no_main]

use libfuzzer_sys::fuzz_target;
use wallet_standard_core::{ExtensionName, FeatureName};

fuzz_target!(|data: &str| {
    let feature = FeatureName::parse(data);
    let extension = ExtensionName::parse(data);

    // Both name kinds follow one rule
    assert_eq!(feature.is_ok(), extension.is_ok());

    if let Ok(name) = feature {
        assert_eq!(name.as_str(), data);
        assert!(!data.is_empty());
        assert!(!data.chars().any(char::is_whitespace));

        if let Some(namespace) = name.namespace() {
            assert!(data.starts_with(namespace));
        }
    }
});
