//! Verifies a captured webhook delivery.
//!
//! Reads the raw body from `SENDLY_WEBHOOK_BODY_FILE`, the header value from
//! `SENDLY_WEBHOOK_SIGNATURE` and the secret from `SENDLY_WEBHOOK_SECRET`.

use std::io;

use sendly::{WebhookSecret, webhook};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let body = std::fs::read(required("SENDLY_WEBHOOK_BODY_FILE")?)?;
    let signature = required("SENDLY_WEBHOOK_SIGNATURE")?;
    let secret = WebhookSecret::new(required("SENDLY_WEBHOOK_SECRET")?)?;

    let event = webhook::parse(&body, &signature, secret.expose())?;
    match event.known_type() {
        Some(kind) => println!("{} {} at {}", event.id, kind.as_str(), event.created_at),
        None => println!(
            "{} unhandled type {} at {}",
            event.id, event.event_type, event.created_at
        ),
    }

    Ok(())
}
