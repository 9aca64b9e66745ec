// ABOUTME: Manual OAuth2 helper binary: prints the authorization URL, reads the pasted
// ABOUTME: redirect, exchanges the code for a bearer token, and prints the token JSON.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use coursegrab_extract::oauth;

#[derive(Parser, Debug)]
#[command(name = "coursegrab-auth")]
#[command(about = "Exchange a Canvas OAuth2 authorization code for a bearer token")]
struct Args {
    /// Canvas base URL, e.g. https://school.instructure.com
    #[arg(long)]
    base_url: Option<String>,

    /// Developer key client id
    #[arg(long)]
    client_id: Option<String>,

    /// Developer key client secret
    #[arg(long)]
    client_secret: Option<String>,

    /// Redirect URI registered with the developer key
    #[arg(long, default_value = "urn:ietf:wg:oauth:2.0:oob")]
    redirect_uri: String,
}

fn input(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_or(value: Option<String>, message: &str) -> io::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => input(message),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let base_url = ask_or(args.base_url, "Canvas base URL: ")?;
    let client_id = ask_or(args.client_id, "Client id: ")?;
    let client_secret = ask_or(args.client_secret, "Client secret: ")?;

    let url = oauth::authorize_url(&base_url, &client_id, &args.redirect_uri)?;
    println!();
    println!("Open this URL in a browser and approve access:");
    println!("{}", url);
    println!();

    let pasted = input("Paste the full redirect URL here: ")?;
    let code = oauth::code_from_redirect(&pasted)?;

    let token = oauth::exchange_code(
        &base_url,
        &client_id,
        &client_secret,
        &args.redirect_uri,
        &code,
    )?;

    println!("{}", serde_json::to_string_pretty(&token)?);
    Ok(())
}
