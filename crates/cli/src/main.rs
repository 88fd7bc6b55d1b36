use clap::Parser;
use log::LevelFilter;
use tob_cli::{Cli, Config};
use tob_payment::PaymentOutcome;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Config::load(cli)?;
    let artifacts = tob_cli::run(&config)?;

    println!("Declaration: {}", artifacts.document.display());
    match &artifacts.payment {
        PaymentOutcome::Written(path) => println!("Payment QR code: {}", path.display()),
        PaymentOutcome::Skipped { length } => {
            println!("Payment QR code: skipped (remittance text is {length} characters)")
        }
    }
    let total = tob_form::format_amount(artifacts.record.total_tax());
    println!("Tax due: EUR {total}");

    Ok(())
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` overrides both
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
