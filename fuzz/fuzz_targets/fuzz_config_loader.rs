#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse or validation errors are fine; panics are not.
    if let Ok(cfg) = elevator_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A config that validates must describe a usable door cycle
            assert!(cfg.door.announce_ms < cfg.door.open_ms);
            assert!(cfg.door.open_ms < cfg.door.close_ms);
            assert!(cfg.door.tone_ms < cfg.door.announce_ms);
            assert!((1..=elevator_config::MAX_QUEUE_CAPACITY).contains(&cfg.queue.capacity));
        }
    }
});
