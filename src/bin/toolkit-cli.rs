use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "toolkit-cli")]
#[command(about = "Command-line client for the API toolkit service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a QR code
    Qr {
        /// Content to encode
        content: String,
        /// Image size as WIDTHxHEIGHT
        #[arg(short, long, default_value = "250x250")]
        size: String,
        /// Error correction level (L, M, Q, H)
        #[arg(short, long)]
        error_correction: Option<String>,
        /// Border width in modules
        #[arg(short, long)]
        border: Option<u32>,
    },
    /// Fetch an exchange rate
    Rate {
        /// Source currency code, e.g. USD
        source: String,
        /// Target currency code, e.g. EUR
        target: String,
    },
    /// Look up the location of an IP address
    Geo {
        ip: String,
    },
    /// Show the most recent audit entries
    Audit {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Check service status
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Qr {
            content,
            size,
            error_correction,
            border,
        } => {
            let mut query = vec![("content", content), ("size", size)];
            if let Some(level) = error_correction {
                query.push(("error_correction", level));
            }
            if let Some(border) = border {
                query.push(("border", border.to_string()));
            }
            client
                .post(format!("{}/qr-code/generate", base))
                .query(&query)
                .send()
                .await?
        }
        Commands::Rate { source, target } => {
            client
                .get(format!("{}/currency/exchange-rate", base))
                .query(&[("source_currency", source), ("target_currency", target)])
                .send()
                .await?
        }
        Commands::Geo { ip } => {
            let mut url = reqwest::Url::parse(base)?;
            url.path_segments_mut()
                .map_err(|_| format!("cannot use '{}' as a base URL", base))?
                .pop_if_empty()
                .extend(["ip-geolocation", ip.as_str()]);
            client.get(url).send().await?
        }
        Commands::Audit { limit } => {
            client
                .get(format!("{}/audit/recent", base))
                .query(&[("limit", limit)])
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => {
            let pretty = serde_json::to_string_pretty(&json)?;
            if status.is_success() {
                println!("{}", pretty);
            } else {
                eprintln!("Error: service returned status {}", status);
                eprintln!("{}", pretty);
            }
        }
        Err(_) => {
            eprintln!("Error: service returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
