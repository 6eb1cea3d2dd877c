#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // First line is the path to test, the rest are patterns
        let mut lines = content.lines();
        let path = lines.next().unwrap_or_default();
        if let Ok(set) = dcr::ExclusionSet::with_patterns(lines) {
            let _ = set.is_excluded(std::path::Path::new(path), false);
        }
    }
});
