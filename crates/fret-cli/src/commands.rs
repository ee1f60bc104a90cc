//! Command handlers. Results go to stdout as JSON, diagnostics to the log.

use std::io::BufRead;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use fret_api::{ApiClient, OrderFilters};
use fret_auth::SessionManager;
use fret_core::tracking::NearbyQuery;
use fret_realtime::{ChannelEvent, ChannelHub, ChannelType};
use fret_settings::FretSettings;
use serde::Serialize;
use serde_json::Value;

use crate::Command;

pub(crate) async fn run(command: Command, settings: &FretSettings, session: SessionManager) -> Result<()> {
    match command {
        Command::Login { phone, password } => login(&session, &phone, password).await,
        Command::Whoami => {
            let user = restore(&session).await?;
            print_json(&user)
        }
        Command::Logout => {
            if let Some(revoke) = session.logout() {
                let _ = revoke.await;
            }
            tracing::info!("logged out");
            Ok(())
        }
        Command::Refresh => {
            let refreshed = session
                .refresh_access_token()
                .await
                .context("token refresh failed")?;
            tracing::info!(len = refreshed.access.len(), "access token renewed");
            Ok(())
        }
        Command::Orders { status, search, page } => {
            let _ = restore(&session).await?;
            let filters = OrderFilters {
                status,
                search,
                page,
                ..Default::default()
            };
            let page = ApiClient::from_session(&session).orders(&filters).await?;
            print_json(&page)
        }
        Command::Order { id } => {
            let _ = restore(&session).await?;
            let order = ApiClient::from_session(&session).order(&id).await?;
            print_json(&order)
        }
        Command::Notifications { unread } => {
            let _ = restore(&session).await?;
            let page = ApiClient::from_session(&session).notifications(unread).await?;
            print_json(&page)
        }
        Command::Drivers { lat, lng, radius_km } => {
            let _ = restore(&session).await?;
            let near = NearbyQuery { lat, lng, radius_km };
            let drivers = ApiClient::from_session(&session).available_drivers(&near).await?;
            print_json(&drivers)
        }
        Command::Watch { channel, id, count } => {
            let _ = restore(&session).await?;
            watch(settings, session, channel, &id, count).await
        }
        Command::Send {
            channel,
            id,
            payload,
            wait,
        } => {
            let _ = restore(&session).await?;
            let payload: Value = serde_json::from_str(&payload).context("payload is not valid JSON")?;
            send(settings, session, channel, &id, &payload, Duration::from_secs(wait)).await
        }
    }
}

async fn login(session: &SessionManager, phone: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let result = session.login(phone, &password).await.context("login failed")?;
    tracing::info!(user_id = %result.user.id, role = %result.user.role, "logged in");
    print_json(&result.user)
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    let _ = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password)
}

/// Resolve the persisted session or fail with a hint to log in.
async fn restore(session: &SessionManager) -> Result<fret_core::User> {
    match session.initialize().await {
        Some(user) => Ok(user),
        None => bail!("not logged in; run `fret login <phone>` first"),
    }
}

async fn watch(
    settings: &FretSettings,
    session: SessionManager,
    channel: ChannelType,
    id: &str,
    count: Option<usize>,
) -> Result<()> {
    let hub = ChannelHub::from_settings(settings, session);
    let mut sub = hub.connect(channel, id)?;
    let mut seen = 0usize;

    loop {
        if count.is_some_and(|limit| seen >= limit) {
            break;
        }
        tokio::select! {
            event = sub.recv() => match event {
                Some(ChannelEvent::Message(value)) => {
                    seen += 1;
                    println!("{value}");
                }
                Some(ChannelEvent::Failed(reason)) => bail!("channel {} failed: {reason}", sub.key()),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    hub.shutdown();
    Ok(())
}

async fn send(
    settings: &FretSettings,
    session: SessionManager,
    channel: ChannelType,
    id: &str,
    payload: &Value,
    wait: Duration,
) -> Result<()> {
    let hub = ChannelHub::from_settings(settings, session);
    let mut sub = hub.connect(channel, id)?;
    if !hub.send(channel, id, payload) {
        bail!("channel {channel}:{id} closed before sending");
    }

    let reply = tokio::time::timeout(wait, sub.recv()).await;
    hub.shutdown();
    match reply {
        Ok(Some(ChannelEvent::Message(value))) => {
            println!("{value}");
            Ok(())
        }
        Ok(Some(ChannelEvent::Failed(reason))) => bail!("channel failed: {reason}"),
        Ok(None) => bail!("channel closed without a reply"),
        Err(_) => {
            tracing::info!(secs = wait.as_secs(), "no reply");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
