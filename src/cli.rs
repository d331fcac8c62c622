use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Convert proxy share links into a Clash proxy list", long_about = None)]
pub struct Args {
    #[arg(help = "Input file with one share link per line; stdin when omitted")]
    pub input: Option<PathBuf>,

    #[arg(short, long, help = "Fetch input from a subscription URL instead of a file")]
    pub url: Option<String>,

    #[arg(short, long, help = "Document output path; stdout when omitted")]
    pub output: Option<String>,

    #[arg(short, long, help = "Application config, accept TOML file path")]
    pub config: Option<String>,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}
