// src/main.rs

use stepgate::{cli, exit_codes, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("stepgate error: {err:?}");
            exit_codes::RUNTIME_ERROR
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    // Ctrl-C → exit 130. Runs on its own worker so it still fires while the
    // main task is blocked on a prompt; children in the foreground process
    // group receive the same SIGINT.
    tokio::spawn(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        eprintln!("\nInstallation interrupted by user.");
        std::process::exit(exit_codes::INTERRUPTED);
    });

    Ok(run(args).await?)
}
