use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use leemdat::{open_many, BackgroundFilter, LeemImage};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints the header and metadata of U-View `.dat` files
///
/// # Example
///
/// ```
/// leem_info Au111_LEEM.dat ccd.dat --levels --background 15
/// ```
#[derive(Parser, Debug)]
#[command(name = "leem_info", about = "Inspect Elmitec U-View .dat files")]
struct Cli {
    /// Files to decode
    #[arg(required = true, num_args = 1..)]
    files : Vec<PathBuf>,

    /// Also print contrast levels
    #[arg(short, long)]
    levels : bool,

    /// Apply the background high-pass with this sigma and
    /// print the residual's range
    #[arg(short, long, value_name = "SIGMA")]
    background : Option<f64>,

    /// -v for debug output, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose : u8,
}

fn init_logging(verbose : u8) {
    let env_filter = match verbose {
        0 => "leemdat=info",
        1 => "leemdat=debug",
        _ => "leemdat=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_image(image : &LeemImage, cli : &Cli) {
    let header = image.header();
    println!("{}", image.filename().unwrap_or("<memory>"));
    println!("  id:           {}", header.id);
    println!("  size:         {} x {}", image.width(), image.height());
    println!("  bits/pixel:   {}", header.bits_per_pixel);
    println!("  colorscale:   {} .. {}", header.colorscale_low, header.colorscale_high);
    match image.timestamp() {
        Some(timestamp) => println!("  timestamp:    {}", timestamp),
        None => println!("  timestamp:    <invalid: {}>", header.timestamp_ticks),
    }
    println!("  field of view: {}", image.field_of_view());
    println!("  LEED:         {}", image.is_leed());
    for (name, value) in image.metadata().iter() {
        println!("  {:<24}{}", name, value);
    }

    if cli.levels {
        match image.levels() {
            Some((lo, hi)) => println!("  levels:       {} .. {}", lo, hi),
            None => println!("  levels:       <empty image>"),
        }
    }

    if let Some(sigma) = cli.background {
        let residual = image.filter_inelastic_background(&BackgroundFilter::new().sigma(sigma));
        let (lo, hi) = residual.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        println!("  background residual (sigma {}): {:.4} .. {:.4}", sigma, lo, hi);
        if let Some((lo, hi)) = image.levels_of(&residual.view()) {
            println!("  residual levels: {:.4} .. {:.4}", lo, hi);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut failed = false;
    for (path, result) in cli.files.iter().zip(open_many(&cli.files)) {
        match result {
            Ok(image) => print_image(&image, &cli),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to decode");
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
