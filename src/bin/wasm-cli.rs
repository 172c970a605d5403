use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use wasmvm_service::encoding::Cb58;

#[derive(Parser)]
#[command(name = "wasm-cli")]
#[command(about = "Command-line client for the wasm VM service", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint of a running node.
    #[arg(short, long, default_value = "http://127.0.0.1:9650/ext/bc/wasm")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new private key
    CreateAccount,
    /// Invoke a function of a deployed contract
    Invoke {
        #[arg(long)]
        contract_id: String,
        #[arg(long)]
        function: String,
        #[arg(long)]
        private_key: String,
        /// Typed argument as `type:value`, e.g. `int32:5`; repeatable
        #[arg(long = "arg")]
        args: Vec<String>,
        /// CB58-encoded byte arguments
        #[arg(long)]
        byte_args: Option<String>,
    },
    /// Deploy a wasm module
    CreateContract {
        /// Path to the compiled `.wasm` file
        #[arg(long)]
        wasm: PathBuf,
        #[arg(long)]
        private_key: String,
    },
    /// Look up a transaction by ID
    GetTx { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (method, params) = match cli.command {
        Commands::CreateAccount => ("wasm.createAccount", json!({})),
        Commands::Invoke {
            contract_id,
            function,
            private_key,
            args,
            byte_args,
        } => {
            let args = args
                .iter()
                .map(|a| parse_arg(a))
                .collect::<Result<Vec<_>, _>>()?;
            (
                "wasm.invoke",
                json!({
                    "contractID": contract_id,
                    "function": function,
                    "privateKey": private_key,
                    "args": args,
                    "byteArgs": byte_args.unwrap_or_default(),
                }),
            )
        }
        Commands::CreateContract { wasm, private_key } => {
            let module = std::fs::read(&wasm)?;
            (
                "wasm.createContract",
                json!({
                    "contract": Cb58::encode(&module),
                    "privateKey": private_key,
                }),
            )
        }
        Commands::GetTx { id } => ("wasm.getTx", json!({ "id": id })),
    };

    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });

    let res = reqwest::Client::new()
        .post(&cli.url)
        .json(&request)
        .send()
        .await?;
    print_response(res).await
}

/// Split `type:value`; the value is sent as a JSON number when it parses as
/// one, otherwise as a string, so the node's coercion decides.
fn parse_arg(raw: &str) -> Result<Value, String> {
    let (type_tag, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("argument '{raw}' is not of the form type:value"))?;
    let value = serde_json::from_str::<Value>(value)
        .ok()
        .filter(Value::is_number)
        .unwrap_or_else(|| Value::String(value.to_string()));
    Ok(json!({ "type": type_tag, "value": value }))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: node returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    if let Some(error) = json.get("error") {
        eprintln!("Error: {}", serde_json::to_string_pretty(error)?);
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&json["result"])?);
    Ok(())
}
