//! Fuzz target for analysis configuration parsing.
//!
//! Parsing and validation must reject arbitrary input with an error,
//! never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use qk_config::AnalysisConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = AnalysisConfig::from_json_str(text) {
            // A validated document must serialize back and parse again.
            let json = config.to_json_pretty().expect("serializable config");
            let _ = serde_json::from_str::<AnalysisConfig>(&json);
        }
    }
});
