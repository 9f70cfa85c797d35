fn main() {
    // Emit esp-idf link/env directives only when building the firmware
    // feature set; host-side test builds need none of them.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
