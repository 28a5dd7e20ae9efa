use sendly::{ErrorKind, SendlyClient};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = SendlyClient::from_env()?;
    let credits = match client.account().credits().await {
        Ok(credits) => credits,
        Err(err) if err.kind() == ErrorKind::Authentication => {
            eprintln!("the API key was rejected ({}), check SENDLY_API_KEY", err.code());
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "balance: {}, reserved: {}, available: {}",
        credits.balance,
        credits.reserved.as_deref().unwrap_or("-"),
        credits.available.as_deref().unwrap_or("-")
    );

    Ok(())
}
