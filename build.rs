fn main() {
    // Host builds (tests, no `espidf` feature) need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
