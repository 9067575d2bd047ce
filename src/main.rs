use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use deskbot::core::config::{self, CliOverrides};
use deskbot::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "deskbot", about = "Scripted customer-support chat in your terminal")]
struct Args {
    /// Directory to save complaint reports in
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,

    /// Disable complaint report export
    #[arg(long)]
    no_report: bool,

    /// Skip the typing delays between bot replies
    #[arg(long)]
    fast: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to deskbot.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("deskbot.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}; using defaults", e);
            config::DeskbotConfig::default()
        }
    };
    let cli = CliOverrides {
        report_dir: args.report_dir,
        no_report: args.no_report,
        fast: args.fast,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "deskbot starting up for {} (reports: {:?}, timing: {:?})",
        resolved.company_name,
        resolved.report_dir,
        resolved.timing
    );

    tui::run(resolved)
}
