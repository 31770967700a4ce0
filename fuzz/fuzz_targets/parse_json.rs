#![no_main]

use cavern_core::format::json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(graph) = json::from_json(input) {
        assert!(graph.asymmetric_links().is_empty());
        let _ = json::to_json(&graph);
    }
});
