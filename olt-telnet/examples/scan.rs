//! Scan example: list unconfigured ONUs and free ids on one PON port
//!
//! # Usage
//!
//! ```bash
//! cargo run --example scan -- --host 10.0.0.2 --user zte --password zte \
//!     --prompt GPON-D1-JKT# --olt gpon-olt_1/1/1
//! ```
//!
//! Output is JSON on stdout; set `RUST_LOG=debug` to follow the session.

use std::env;
use std::time::Duration;

use olt_telnet::{ClientBuilder, OltIndex, template::MAX_ONU_ID};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let olt: OltIndex = args.olt.parse()?;

    let client = ClientBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .password(&args.password)
        .prompt(&args.prompt)
        .command_timeout(Duration::from_secs(args.timeout))
        .build()?;

    let unactivated = client.scan_unactivated().await?;
    let available = client.scan_available(&olt, MAX_ONU_ID).await?;

    let report = serde_json::json!({
        "unactivated": {
            "noData": unactivated.no_data,
            "items": unactivated.items,
        },
        "available": {
            "oltIndex": olt.to_string(),
            "records": available.records,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: String,
    prompt: String,
    olt: String,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 23u16;
        let mut user = "zte".to_string();
        let mut password = String::new();
        let mut prompt = "#".to_string();
        let mut olt = "gpon-olt_1/1/1".to_string();
        let mut timeout = 3u64;

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match (args[i].as_str(), value) {
                ("--host" | "-h", Some(v)) => host = v,
                ("--port" | "-p", Some(v)) => port = v.parse().unwrap_or(23),
                ("--user" | "-u", Some(v)) => user = v,
                ("--password" | "-P", Some(v)) => password = v,
                ("--prompt", Some(v)) => prompt = v,
                ("--olt", Some(v)) => olt = v,
                ("--timeout" | "-t", Some(v)) => timeout = v.parse().unwrap_or(3),
                ("--help", _) => {
                    Self::print_help();
                    std::process::exit(0);
                }
                (other, _) => {
                    eprintln!("Unknown or incomplete argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Self {
            host,
            port,
            user,
            password,
            prompt,
            olt,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"olt-telnet scan example

USAGE:
    cargo run --example scan -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        OLT address [default: localhost]
    -p, --port <PORT>        Telnet port [default: 23]
    -u, --user <USER>        Username [default: zte]
    -P, --password <PASS>    Password
    --prompt <TEXT>          Authenticated prompt substring [default: #]
    --olt <INDEX>            PON port to scan [default: gpon-olt_1/1/1]
    -t, --timeout <SECS>     Per-command deadline [default: 3]
    --help                   Print this help message
"#
        );
    }
}
