#![no_main]

use libfuzzer_sys::fuzz_target;
use pedmap_convert::genotype::{AlleleCoding, parse_genotype};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    // Either both alleles translate or an error is returned; never a partial code
    match parse_genotype(&input) {
        Ok(_) => {
            let codes = AlleleCoding::Genepop
                .translate(&input)
                .expect("parsed genotype translates");
            assert_eq!(codes.concat().len(), 6);
        }
        Err(_) => assert!(AlleleCoding::Structure.translate(&input).is_err()),
    }
});
