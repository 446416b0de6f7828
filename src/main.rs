// src/main.rs

use fscanary::config::load_and_validate;
use fscanary::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("fscanary error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    if args.version {
        println!("{}", cli::version_text());
        return Ok(());
    }

    let cfg = load_and_validate(&args.config)?;
    logging::init_logging(args.log_level, cfg.global().logging)?;
    run(args, cfg).await?;
    Ok(())
}
