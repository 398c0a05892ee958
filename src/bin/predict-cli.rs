use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;

#[derive(Parser)]
#[command(name = "predict-cli")]
#[command(about = "Client for the prediction server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server liveness
    Health,
    /// Show the loaded model's category and response names
    Metadata,
    /// Score one JSON record
    Predict {
        /// Inline JSON object, e.g. '{"age": 42}'
        #[arg(short, long, conflicts_with = "file")]
        data: Option<String>,

        /// Read the JSON object from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Metadata => client.get(format!("{}/metadata", base)).send().await?,
        Commands::Predict { data, file } => {
            let body = match (data, file) {
                (Some(data), _) => data,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
                (None, None) => return Err("predict needs --data or --file".into()),
            };
            client
                .post(format!("{}/predict", base))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}", status);
    println!("{}", text);
    Ok(ExitCode::SUCCESS)
}
