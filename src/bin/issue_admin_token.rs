//! Mints a signed token for the command endpoint.
//!
//! Usage: `issue-admin-token [SUBJECT] [--days N] [--viewer]`
//!
//! The signing secret comes from `ADMIN_JWT_SECRET`, or from the config file
//! (`MATCHWATCH_CONFIG`, default `config.json`) when the variable is unset.

use anyhow::{bail, Context};
use matchwatch::commands::{token::DEFAULT_EXPIRATION_DAYS, TokenConfig};
use matchwatch::config::{AppConfig, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;

struct Args {
    subject: String,
    days: i64,
    admin: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        subject: "admin".to_string(),
        days: DEFAULT_EXPIRATION_DAYS,
        admin: true,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--days" => {
                let value = iter.next().context("--days needs a value")?;
                args.days = value
                    .parse()
                    .with_context(|| format!("invalid --days value {value:?}"))?;
            }
            "--viewer" => args.admin = false,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            subject => args.subject = subject.to_string(),
        }
    }

    if args.days < 1 {
        bail!("--days must be at least 1");
    }
    Ok(args)
}

fn signing_secret() -> anyhow::Result<String> {
    if let Ok(secret) = std::env::var("ADMIN_JWT_SECRET") {
        return Ok(secret);
    }

    let path = std::env::var("MATCHWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&path)
        .with_context(|| format!("reading signing secret from {}", path.display()))?;
    Ok(config.admin_jwt_secret)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    let tokens = TokenConfig::new(signing_secret()?, args.days);
    let token = tokens.create_token(&args.subject, args.admin)?;

    println!("{token}");
    Ok(())
}
