#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Profile parsing and validation should never panic
        let path = std::path::Path::new("fuzz.toml");
        if let Ok(record) = dcr::config::parse_profile(content, path) {
            let _ = dcr::ConnectionProfile::try_from(&record);
            let _ = dcr::config::render_profile(&record);
        }
    }
});
