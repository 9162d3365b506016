/// Entry point of the `counter-rate` check.
///
/// Samples a counter file, prints the per-second rate since the previous
/// invocation, and stores the sample for the next one. Configuration comes
/// from `COUNTER_RATE_*` environment variables, log verbosity from `RUST_LOG`.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug counter-rate eth0
/// COUNTER_RATE_SOURCE=key_value COUNTER_RATE_SOURCE_PATH=/proc/vmstat counter-rate pgfault
/// ```
fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    counter_rate::run()
}
