#![no_main]

use libfuzzer_sys::fuzz_target;
use pedmap_convert::ped;

fuzz_target!(|data: &[u8]| {
    // The reader must never panic, whatever the bytes
    for record in ped::Reader::new(data) {
        if let Ok(record) = record {
            // Accepted lines keep at least the pedigree columns when written back
            let line = record.to_string();
            assert!(line.split('\t').count() >= ped::PEDIGREE_FIELDS);
        }
    }
});
