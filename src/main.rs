// src/main.rs

use nightwatch::errors::ResolveError;
use nightwatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.debug) {
        eprintln!("nightwatch error: {err:?}");
        std::process::exit(1);
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("nightwatch error: {err:?}");
            // A failed discovery command terminates the tool with its own
            // exit code; every other failure is a plain setup error.
            let code = match err.downcast_ref::<ResolveError>() {
                Some(ResolveError::DiscoveryFailed { code }) => *code,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}
