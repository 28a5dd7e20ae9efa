use std::io;

use sendly::{MessageText, PhoneNumber, SendMessage, SendlyClient};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let to = std::env::var("SENDLY_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SENDLY_TO environment variable is required",
        )
    })?;
    let text = std::env::var("SENDLY_TEXT")
        .unwrap_or_else(|_| "Hello from the sendly demo.".to_owned());

    let client = SendlyClient::from_env()?;
    let request = SendMessage::new(PhoneNumber::new(to)?, MessageText::new(text)?);
    let message = client.messages().send(request).await?;
    tracing::info!(id = %message.id, status = ?message.status, "message accepted");

    if let Some(limit) = client.rate_limit() {
        println!("rate limit: {}/{} remaining", limit.remaining, limit.limit);
    }
    println!(
        "id: {}, status: {:?}, segments: {}, credits: {}",
        message.id, message.status, message.segments, message.credits_used
    );

    Ok(())
}
