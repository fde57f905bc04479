#![no_main]
use std::error::Error;

use libfuzzer_sys::fuzz_target;
use sfnt_outline::{raw::FontRef, string::StringId, MetadataProvider};

fn do_name_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = FontRef::new(data)?;

    for string in font.name_records() {
        let _ = string.language();
        let _ = string.to_string();
    }
    let _ = font
        .localized_strings(StringId::FAMILY_NAME)
        .english_or_first()
        .map(|s| s.to_string());

    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_name_things(data);
});
