use std::path::PathBuf;

use clap::Parser;
use ncaa_ingest_lib::RunOptions;

/// Ingest NCAA game records idempotently.
#[derive(Debug, Parser)]
#[command(name = "ncaa-ingest", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration file
    #[arg(long)]
    database_url: Option<String>,

    /// error | warn | info | debug | trace | off
    #[arg(long)]
    log_level: Option<String>,

    /// JSON file holding one game record or an array of records
    input: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let options = RunOptions {
        config: cli.config,
        database_url: cli.database_url,
        log_level: cli.log_level,
        input: cli.input,
    };

    match ncaa_ingest_lib::run(options).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("输出序列化失败: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            log::error!("导入失败: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
