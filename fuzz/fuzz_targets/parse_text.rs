#![no_main]

use cavern_core::format::text;
use libfuzzer_sys::fuzz_target;

// Any input either fails cleanly or yields a graph that survives a
// render/parse round trip with its mirror invariant intact.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = text::parse(input) else {
        return;
    };

    assert!(graph.asymmetric_links().is_empty());

    let rendered = text::to_text(&graph).expect("parsed records are representable");
    let reparsed = text::parse(&rendered).expect("canonical text must parse");
    assert_eq!(reparsed.site_count(), graph.site_count());
    assert_eq!(reparsed.link_count(), graph.link_count());
    assert_eq!(reparsed.is_directed(), graph.is_directed());
});
