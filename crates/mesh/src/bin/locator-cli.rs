//! Locator CLI Tool
//!
//! Command-line interface for generating identities, signing locators,
//! and verifying or inspecting locators received out of band.

use anyhow::{anyhow, bail, Context};
use locator_core::{logging, Config};
use locator_identity::Identity;
use locator_mesh::{Endpoint, Locator};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON output for generate command
#[derive(Debug, Serialize)]
struct GenerateOutput {
    address: String,
    identity: String,
    secret_file: String,
}

/// JSON output for verify command
#[derive(Debug, Serialize)]
struct VerifyOutput {
    valid: bool,
    address: String,
    timestamp: i64,
    message: String,
}

fn read_identity(source: &str) -> anyhow::Result<Identity> {
    let path = Path::new(source);
    let text = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        source.to_string()
    };
    text.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid identity: {}", e))
}

fn read_locator(locator: Option<String>, locator_file: Option<PathBuf>) -> anyhow::Result<Locator> {
    let text = match (locator, locator_file) {
        (Some(s), _) => s,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Missing --locator or --locator-file argument"),
    };
    let text = text.trim();
    if text.starts_with('{') {
        Locator::from_json(text).map_err(|e| anyhow!("Invalid locator JSON: {}", e))
    } else {
        Locator::from_string(text).map_err(|e| anyhow!("Invalid locator: {}", e))
    }
}

fn now_millis() -> anyhow::Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Ok(elapsed.as_millis() as i64)
}

fn cmd_generate(output: PathBuf, json: bool) -> anyhow::Result<()> {
    let identity = Identity::generate();
    let secret = identity
        .to_secret_string()
        .ok_or_else(|| anyhow!("Generated identity has no private key"))?;
    fs::write(&output, secret.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!(address = %identity.address(), "Wrote identity");

    if json {
        let out = GenerateOutput {
            address: identity.address().to_string(),
            identity: identity.to_public_string(),
            secret_file: output.display().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", identity.to_public_string());
        println!("Secret identity saved to: {}", output.display());
    }
    Ok(())
}

fn cmd_sign(
    identity_source: String,
    endpoints: Vec<String>,
    timestamp: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let identity = read_identity(&identity_source)?;
    if !identity.has_private() {
        bail!("Identity {} has no private key", identity.address());
    }

    let endpoints = endpoints
        .iter()
        .map(|s| s.parse::<Endpoint>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("Invalid endpoint: {}", e))?;

    let timestamp = match timestamp {
        Some(ts) => ts,
        None => now_millis()?,
    };

    let locator = Locator::create(timestamp, &endpoints, Some(&identity))
        .map_err(|e| anyhow!("Failed to sign locator: {}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&locator)?);
    } else {
        println!("{}", locator);
    }
    Ok(())
}

fn cmd_verify(identity_source: String, locator: Locator, json: bool) -> anyhow::Result<()> {
    let identity = read_identity(&identity_source)?;
    let valid = locator.validate(Some(&identity));

    if json {
        let output = VerifyOutput {
            valid,
            address: locator.address().to_string(),
            timestamp: locator.timestamp(),
            message: if valid {
                "Locator is valid".to_string()
            } else {
                "Locator is invalid".to_string()
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if valid {
        println!("✓ Locator is VALID");
        println!("  Signer:    {}", locator.address());
        println!("  Timestamp: {}", locator.timestamp());
    } else {
        println!("✗ Locator is INVALID");
    }

    if !valid {
        bail!("Locator verification failed");
    }
    Ok(())
}

fn cmd_inspect(locator: Locator, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&locator)?);
        return Ok(());
    }
    println!("Signer:      {}", locator.address());
    println!("Fingerprint: {}", locator.fingerprint());
    println!("Timestamp:   {}", locator.timestamp());
    println!("Size:        {} bytes", locator.to_bytes().len());
    println!("Endpoints:");
    for endpoint in locator.endpoints() {
        println!("    {}", endpoint);
    }
    Ok(())
}

fn parse_args() -> Result<(String, Vec<String>), String> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return Err("Usage: locator-cli <command> [options]".to_string());
    }

    Ok((args[1].clone(), args[2..].to_vec()))
}

fn print_usage() {
    println!("Locator CLI - Sign and verify endpoint locators");
    println!();
    println!("USAGE:");
    println!("    locator-cli generate --output <file> [--json]");
    println!("    locator-cli sign [--config <file>] [--identity <file>] [--endpoint <ep>]... [--timestamp <ms>] [--json]");
    println!("    locator-cli verify --identity <file|string> (--locator <string> | --locator-file <file>) [--json]");
    println!("    locator-cli inspect (--locator <string> | --locator-file <file>) [--json]");
    println!();
    println!("COMMANDS:");
    println!("    generate  Create a new identity and save its secret form");
    println!("    sign      Sign a locator for the given endpoints");
    println!("    verify    Check a locator's signature against an identity");
    println!("    inspect   Decode a locator without verifying it");
    println!();
    println!("EXAMPLES:");
    println!("    locator-cli generate --output node.secret");
    println!("    locator-cli sign --identity node.secret --endpoint udp/10.0.0.1:9993");
    println!("    locator-cli verify --identity node.public --locator-file locator.txt");
}

/// Value following a flag, advancing the cursor.
fn flag_value(args: &[String], i: &mut usize) -> Option<String> {
    *i += 1;
    args.get(*i).cloned()
}

fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    let mut identity = None;
    let mut endpoints = Vec::new();
    let mut timestamp = None;
    let mut locator = None;
    let mut locator_file = None;
    let mut output = None;
    let mut config_path = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--identity" | "-i" => identity = flag_value(args, &mut i),
            "--endpoint" | "-e" => endpoints.extend(flag_value(args, &mut i)),
            "--timestamp" | "-t" => {
                let value = flag_value(args, &mut i).unwrap_or_default();
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .with_context(|| format!("Invalid --timestamp {:?}", value))?,
                );
            }
            "--locator" | "-l" => locator = flag_value(args, &mut i),
            "--locator-file" => locator_file = flag_value(args, &mut i).map(PathBuf::from),
            "--output" | "-o" => output = flag_value(args, &mut i).map(PathBuf::from),
            "--config" | "-c" => config_path = flag_value(args, &mut i).map(PathBuf::from),
            "--json" => json = true,
            other => bail!("Unknown argument {:?}", other),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => Some(
            Config::from_file(&path)
                .map_err(|e| anyhow!("Failed to load {}: {}", path.display(), e))?,
        ),
        None => None,
    };
    match &config {
        Some(config) => logging::init_from_config(&config.logging),
        None => logging::init(),
    }

    match command {
        "generate" => match output {
            Some(output) => cmd_generate(output, json),
            None => Err(anyhow!("Missing --output argument")),
        },
        "sign" => {
            let identity = identity
                .or_else(|| {
                    config
                        .as_ref()
                        .map(|c| c.identity.key_file.display().to_string())
                })
                .ok_or_else(|| anyhow!("Missing --identity argument"))?;
            if endpoints.is_empty() {
                if let Some(config) = &config {
                    endpoints = config.locator.endpoints.clone();
                }
            }
            let timestamp = timestamp.or(config.as_ref().and_then(|c| c.locator.timestamp));
            cmd_sign(identity, endpoints, timestamp, json)
        }
        "verify" => {
            let identity = identity.ok_or_else(|| anyhow!("Missing --identity argument"))?;
            cmd_verify(identity, read_locator(locator, locator_file)?, json)
        }
        "inspect" => cmd_inspect(read_locator(locator, locator_file)?, json),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow!("Unknown command: {}", other)),
    }
}

fn main() {
    let (command, args) = match parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            println!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(&command, &args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
