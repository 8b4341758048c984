use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use wallet_manager::http::Envelope;

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Command-line client for the wallet service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:7545")]
    url: String,

    /// Bearer token, when the service requires one.
    #[arg(short, long, env = "WALLET_API_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether a wallet exists and is unlocked
    Status,
    /// Create a wallet from a mnemonic and unlock it
    Create {
        #[arg(long)]
        mnemonic: String,
        #[arg(long)]
        password: String,
    },
    /// Unlock the stored wallet
    Unlock {
        #[arg(long)]
        password: String,
    },
    /// Persist and lock the wallet
    Lock,
    /// Show accounts per blockchain
    Get,
    /// Re-encrypt the wallet under a new password
    ChangePassword {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// List accounts on attached blockchains
    Accounts,
    /// Derive a new account on a blockchain
    CreateAccount { blockchain: String },
    /// Query an account balance
    Balance { blockchain: String, address: String },
    /// Query an account nonce
    Nonce { blockchain: String, address: String },
    /// Send native tokens (amount in base units)
    Transfer {
        blockchain: String,
        from: String,
        to: String,
        amount: String,
        #[arg(long)]
        gas_limit: Option<u64>,
        #[arg(long)]
        gas_price: Option<u128>,
    },
    /// List configured blockchains
    Blockchains,
    /// Check an address for a blockchain
    ValidateAddress { blockchain: String, address: String },
    /// Generate a new mnemonic
    Mnemonic {
        #[arg(long, default_value_t = 12)]
        words: usize,
    },
    /// Print the wallet's secret phrase
    RevealPhrase {
        #[arg(long)]
        password: String,
    },
    /// Print an account's private key
    RevealKey {
        blockchain: String,
        address: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/').to_string();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let get = |path: String| client.get(format!("{}{}", base, path)).headers(headers.clone());
    let post = |path: String, body: Value| {
        client
            .post(format!("{}{}", base, path))
            .headers(headers.clone())
            .json(&body)
    };

    let request = match cli.command {
        Commands::Status => get("/wallet/status".into()),
        Commands::Create { mnemonic, password } => post(
            "/wallet".into(),
            json!({ "mnemonic": mnemonic, "password": password }),
        ),
        Commands::Unlock { password } => post("/wallet/unlock".into(), json!({ "password": password })),
        Commands::Lock => post("/wallet/lock".into(), json!({})),
        Commands::Get => get("/wallet".into()),
        Commands::ChangePassword { old, new } => post(
            "/wallet/password".into(),
            json!({ "old_password": old, "new_password": new }),
        ),
        Commands::Accounts => get("/accounts".into()),
        Commands::CreateAccount { blockchain } => {
            post("/accounts".into(), json!({ "blockchain": blockchain }))
        }
        Commands::Balance { blockchain, address } => {
            get(format!("/accounts/{}/{}/balance", blockchain, address))
        }
        Commands::Nonce { blockchain, address } => {
            get(format!("/accounts/{}/{}/nonce", blockchain, address))
        }
        Commands::Transfer {
            blockchain,
            from,
            to,
            amount,
            gas_limit,
            gas_price,
        } => post(
            format!("/accounts/{}/{}/transfer", blockchain, from),
            json!({
                "to": to,
                "amount": amount,
                "fee": { "gas_limit": gas_limit, "gas_price": gas_price },
            }),
        ),
        Commands::Blockchains => get("/blockchains".into()),
        Commands::ValidateAddress { blockchain, address } => {
            get(format!("/blockchains/{}/addresses/{}", blockchain, address))
        }
        Commands::Mnemonic { words } => get(format!("/mnemonic?words={}", words)),
        Commands::RevealPhrase { password } => {
            post("/wallet/secret-phrase".into(), json!({ "password": password }))
        }
        Commands::RevealKey {
            blockchain,
            address,
            password,
        } => post(
            format!("/accounts/{}/{}/private-key", blockchain, address),
            json!({ "password": password }),
        ),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: wallet API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let envelope: Envelope<Value> = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if let Err(e) = envelope.into_result() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }
    Ok(())
}
