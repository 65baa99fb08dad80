#![no_main]
use elevator_config::{ScriptRow, script_from_rows};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    let rows: Vec<ScriptRow> = rdr.deserialize().filter_map(Result::ok).collect();
    if let Ok(steps) = script_from_rows(&rows) {
        assert_eq!(steps.len(), rows.len());
        assert!(steps.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    }
});
