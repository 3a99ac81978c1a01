use std::env;
use std::fs;

use airzone_local::{AirZoneClient, BridgeConfig, English, MessageLogMode, format_errors};

#[tokio::main]
async fn main() -> airzone_local::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let target = args
        .get(1)
        .expect("usage: monitor <ip | config.json> [--log <path>]");
    let log_path = args
        .iter()
        .position(|a| a == "--log")
        .and_then(|i| args.get(i + 1));

    let config = if target.ends_with(".json") {
        serde_json::from_str(&fs::read_to_string(target)?)?
    } else {
        BridgeConfig {
            ip_address: target.clone(),
            ..BridgeConfig::default()
        }
    };
    let refresh = config.refresh_interval;
    let retries = config.retries;

    let mut builder = AirZoneClient::builder(config.ip_address.clone())
        .config(config)
        .on_event(|event| println!("{event:?}"))
        .on_snapshot(|snapshot| {
            for zone in snapshot.zones.values() {
                let unit = zone.units().map(|u| u.symbol()).unwrap_or("");
                println!(
                    "[{}/{}] {} {:.1}{unit} -> {:.1}{unit} | {} | mode: {}{}",
                    zone.system_id,
                    zone.zone_id,
                    zone.name,
                    zone.room_temp,
                    zone.setpoint,
                    if zone.on { "on" } else { "off" },
                    zone.mode().map(|m| m.as_str()).unwrap_or("?"),
                    if zone.is_master() { " | master" } else { "" },
                );
                for line in format_errors(&zone.errors, &English) {
                    println!("    {line}");
                }
            }
        });
    if let Some(path) = log_path {
        builder = builder.message_log(MessageLogMode::Diffed, path);
    }
    let client = builder.build()?;

    println!("Polling {}...", client.base_url());
    if let Some(version) = client.api_version().await {
        println!("API version {version}");
    }
    if let Some(props) = client.server_properties().await {
        println!("Webserver {} ({}), firmware {}", props.mac, props.interface, props.firmware);
    }

    let mut failures = 0;
    loop {
        match client.fetch_status().await {
            Ok(()) => failures = 0,
            Err(e) => {
                failures += 1;
                eprintln!("Poll error: {e}");
                if failures == retries {
                    eprintln!("Bridge offline after {retries} failed polls");
                }
            }
        }
        tokio::time::sleep(refresh).await;
    }
}
