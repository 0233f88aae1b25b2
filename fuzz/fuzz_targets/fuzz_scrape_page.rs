#![no_main]
use deepsecurity::scraping::{parse_form, parse_page};
use libfuzzer_sys::fuzz_target;

/// Fuzz the web console page and form parsers with arbitrary HTML.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(page) = parse_page(s) {
            let _ = page.keyed_rows(&page.columns);
        }
        let _ = parse_form(s);
    }
});
