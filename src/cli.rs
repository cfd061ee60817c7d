use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "mristability",
    version,
    about = "Convert MRI stability reports into JSON for a monitoring agent"
)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Directory tree holding stability reports (falls back to BASEDIR)"
    )]
    pub base_dir: Option<PathBuf>,
    #[arg(
        short,
        long,
        help = "Only scan this scanner subdirectory, e.g. Harvard/Northwest/Bay1"
    )]
    pub scanner: Option<PathBuf>,
    #[arg(
        short,
        long,
        default_value_t = false,
        help = "Move processed reports into a Processed directory"
    )]
    pub archive: bool,
    #[arg(short, long, default_value_t = false, help = "Log debug output to stderr")]
    pub verbose: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Interpret file name timestamps as UTC instead of local time"
    )]
    pub utc: bool,
    #[arg(long, default_value_t = false, help = "Emit single-line JSON")]
    pub compact: bool,
    #[arg(long, help = "Log file path (default: <base-dir>/mristability.log)")]
    pub log_file: Option<PathBuf>,
    #[arg(long, default_value_t = false, conflicts_with = "log_file")]
    pub no_log_file: bool,
}
