use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dataitem-cli")]
#[command(about = "Command-line client for the DataItem service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, default_value = "/api/v1")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every item
    List,
    /// Fetch one item by uuid
    Get { uuid: String },
    /// Create an item
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        uuid: String,
        #[arg(long, default_value = "")]
        data: String,
    },
    /// Overwrite the item currently stored under UUID
    Update {
        uuid: String,
        #[arg(long)]
        name: String,
        /// New uuid for the item (defaults to the current one)
        #[arg(long = "uuid")]
        new_uuid: Option<String>,
        #[arg(long, default_value = "")]
        data: String,
    },
    /// Delete an item by uuid
    Delete { uuid: String },
    /// Check service liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let request = build_request(&Client::new(), cli);
    send(request).await
}

fn build_request(client: &Client, cli: Cli) -> RequestBuilder {
    let url = cli.url.trim_end_matches('/');
    let base = format!("{}{}", url, cli.prefix);

    match cli.command {
        Commands::List => client.get(format!("{base}/data")),
        Commands::Get { uuid } => client.get(format!("{base}/data/{uuid}")),
        Commands::Create { name, uuid, data } => client
            .post(format!("{base}/data"))
            .json(&json!({ "name": name, "uuid": uuid, "data": data })),
        Commands::Update {
            uuid,
            name,
            new_uuid,
            data,
        } => {
            let new_uuid = new_uuid.unwrap_or_else(|| uuid.clone());
            client
                .put(format!("{base}/data/{uuid}"))
                .json(&json!({ "name": name, "uuid": new_uuid, "data": data }))
        }
        Commands::Delete { uuid } => client.delete(format!("{base}/data/{uuid}")),
        Commands::Health => client.get(format!("{url}/health")),
    }
}

async fn send(request: RequestBuilder) -> Result<(), Box<dyn std::error::Error>> {
    let res = request.send().await?;
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
