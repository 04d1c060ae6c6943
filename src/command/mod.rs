//! Command runners
//!
//! Each runner owns its tokio runtime, so `main` stays synchronous:
//! - `serve` - HTTP API over the ledger engine
//! - `replay` - batch application of a request file

use crate::cli::{CliArgs, Command};
use crate::types::RunError;

pub mod replay;
pub mod serve;

pub use replay::ReplayRunner;
pub use serve::ServeRunner;

/// Run the command selected on the command line
///
/// Replay output goes to stdout.
pub fn run(args: &CliArgs) -> Result<(), RunError> {
    let engine = args.engine.to_engine_config();

    match &args.command {
        Command::Serve(serve) => ServeRunner::new(
            engine,
            serve.bind.clone(),
            serve.request_timeout(),
            serve.monitor_pool,
        )
        .run(&args.engine.accounts),
        Command::Replay(replay) => {
            let mut output = std::io::stdout();
            ReplayRunner::new(engine, replay.to_replay_config())
                .run(&args.engine.accounts, &replay.input_file, &mut output)
                .map(|_| ())
        }
    }
}
