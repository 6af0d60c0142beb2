#![no_main]

use libfuzzer_sys::fuzz_target;
use mzxml::experiment::Experiment;
use mzxml::mzxml::{MzXMLReader, MzXMLWriter};

fuzz_target!(|data: &[u8]| {
    // Parsing must either succeed or fail with an error, never panic
    let mut exp = Experiment::new();
    if MzXMLReader::new(data).read_into(&mut exp).is_ok() {
        // Whatever was read must also serialize
        let mut out = Vec::new();
        let _ = MzXMLWriter::new(&mut out).write_experiment(&exp);
    }
});
