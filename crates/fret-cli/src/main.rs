//! # fret
//!
//! Command-line client for the freight marketplace. Wires settings, logging,
//! the session, the REST client and the channel hub, then runs one command.

#![deny(unsafe_code)]

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fret_auth::SessionManager;
use fret_core::logging::{LogFormat, init_subscriber};
use fret_core::orders::OrderStatus;
use fret_realtime::ChannelType;

/// fret marketplace client.
#[derive(Parser, Debug)]
#[command(name = "fret", about = "Freight marketplace client", version)]
struct Cli {
    /// Log filter directive (overrides settings; `RUST_LOG` wins over both).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the token pair.
    Login {
        /// Phone number, e.g. +221770000000.
        phone: String,
        /// Password. Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the restored session's account.
    Whoami,
    /// End the session and revoke the refresh token.
    Logout,
    /// Mint a new access token from the stored refresh token.
    Refresh,
    /// List orders.
    Orders {
        /// Only orders in this status (e.g. `bidding`, `in_transit`).
        #[arg(long, value_parser = parse_status)]
        status: Option<OrderStatus>,
        /// Free-text search.
        #[arg(long)]
        search: Option<String>,
        /// Page number.
        #[arg(long)]
        page: Option<u32>,
    },
    /// Show one order.
    Order {
        /// Order ID.
        id: String,
    },
    /// List notifications.
    Notifications {
        /// Only unread ones.
        #[arg(long)]
        unread: bool,
    },
    /// Drivers available around a point.
    Drivers {
        /// Latitude.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude.
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Radius in kilometers.
        #[arg(long)]
        radius_km: Option<f64>,
    },
    /// Print events from a realtime channel until it closes.
    Watch {
        /// Channel type: tracking, order or chat.
        channel: ChannelType,
        /// Resource ID.
        id: String,
        /// Stop after this many events.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Send a JSON frame on a realtime channel and print the first reply.
    Send {
        /// Channel type: tracking, order or chat.
        channel: ChannelType,
        /// Resource ID.
        id: String,
        /// JSON payload.
        payload: String,
        /// Seconds to wait for a reply.
        #[arg(long, default_value = "5")]
        wait: u64,
    },
}

fn parse_status(raw: &str) -> std::result::Result<OrderStatus, String> {
    let wire = raw.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(wire)).map_err(|_| format!("unknown order status: {raw}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = fret_settings::get_settings();
    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    let format = if cli.json_logs { LogFormat::Json } else { settings.logging.format };
    init_subscriber(level, format);

    let session = SessionManager::from_settings(settings).context("failed to open session")?;
    commands::run(cli.command, settings, session).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_with_password_flag() {
        let cli = Cli::parse_from(["fret", "login", "+221770000000", "--password", "secret"]);
        match cli.command {
            Command::Login { phone, password } => {
                assert_eq!(phone, "+221770000000");
                assert_eq!(password.as_deref(), Some("secret"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["fret", "whoami", "--log-level", "debug", "--json-logs"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.json_logs);
    }

    #[test]
    fn orders_status_parses_loosely() {
        let cli = Cli::parse_from(["fret", "orders", "--status", "in-transit"]);
        assert!(matches!(
            cli.command,
            Command::Orders { status: Some(OrderStatus::InTransit), .. }
        ));
        assert!(Cli::try_parse_from(["fret", "orders", "--status", "lost"]).is_err());
    }

    #[test]
    fn watch_parses_channel_type() {
        let cli = Cli::parse_from(["fret", "watch", "chat", "c1", "--count", "3"]);
        match cli.command {
            Command::Watch { channel, id, count } => {
                assert_eq!(channel, ChannelType::Chat);
                assert_eq!(id, "c1");
                assert_eq!(count, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["fret", "watch", "fleet", "f1"]).is_err());
    }

    #[test]
    fn negative_coordinates() {
        let cli = Cli::parse_from(["fret", "drivers", "--lat", "14.7", "--lng", "-17.4"]);
        assert!(matches!(cli.command, Command::Drivers { lng: Some(l), .. } if (l + 17.4).abs() < 1e-9));
    }
}
