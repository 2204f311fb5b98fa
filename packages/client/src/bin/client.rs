//! Terminal chat client for the irori line chat server.
//!
//! Prints every line the server sends and sends every line typed at the prompt.
//! Retries the initial connection up to 5 times with a 5 second interval.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client
//! cargo run --bin irori-client -- --host 127.0.0.1 --port 8888
//! ```

use clap::Parser;

use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "Terminal client for the irori line chat server", long_about = None)]
struct Args {
    /// Server host address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port number
    #[arg(short = 'p', long, default_value_t = 8888)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    // Run the client
    if let Err(e) = irori_client::run_client(args.host, args.port).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
