//! Binary entrypoint that launches the ChatUIX HTTP server.
//! Run with: cargo run --bin chatuix-server

use std::process::ExitCode;

use chatuix::start_chatuix;

fn main() -> ExitCode {
    start_chatuix::run()
}
