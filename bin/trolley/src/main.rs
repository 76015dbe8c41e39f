//! Trolley cart session runner.
//!
//! Drives one cart store against the in-memory cart service:
//! - `run` replays the `[[steps]]` of a config file and prints every settled
//!   state as one JSON line
//! - `check` validates a config file and prints it back

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::info;
use trolley_store::{CartEvent, CartHandle, ServiceError, next_settled};

use crate::config::{Step, TrolleyConfig};

/// Trolley command line arguments.
#[derive(Parser, Debug)]
#[command(name = "trolley")]
#[command(about = "Replay scripted shopping cart sessions")]
struct Args {
	/// Session config (TOML)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Log in as this user, overriding the config
	#[arg(short, long, value_name = "ID", global = true)]
	user: Option<String>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Replay the configured steps
	Run,
	/// Validate the config and print it
	Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let mut config = match &args.config {
		Some(path) => TrolleyConfig::load(path)?,
		None => TrolleyConfig::default(),
	};
	if let Some(user) = args.user {
		config.session.user_id = Some(user);
	}

	match args.command {
		Command::Check => {
			println!("{}", serde_json::to_string_pretty(&config).context("failed to encode config")?);
			Ok(())
		}
		Command::Run => run(config).await,
	}
}

async fn run(config: TrolleyConfig) -> anyhow::Result<()> {
	info!(steps = config.steps.len(), user = ?config.session.user_id, "starting trolley session");

	let service = Arc::new(config.memory_service());
	let cart = CartHandle::spawn(service.clone(), config.session.user_id.clone(), &config.store);
	let mut events = cart.subscribe();

	for (index, step) in config.steps.iter().enumerate() {
		tracing::debug!(step = index, ?step, "trolley.step");
		let event = match step {
			Step::Fetch => {
				let op = cart.fetch_cart().await?;
				next_settled(&mut events, op).await?
			}
			Step::Add { product_id, quantity } => {
				let op = cart.add_to_cart(product_id.as_str(), *quantity).await?;
				next_settled(&mut events, op).await?
			}
			Step::Update {
				product_id,
				quantity,
				cart_item_id,
			} => {
				let op = cart.update_cart_item(product_id.as_str(), *quantity, cart_item_id.as_deref()).await?;
				next_settled(&mut events, op).await?
			}
			Step::Remove { product_id } => {
				let op = cart.remove_from_cart(product_id.as_str()).await?;
				next_settled(&mut events, op).await?
			}
			Step::Clear => {
				cart.clear_cart().await?;
				next_event(&mut events).await?
			}
			Step::UpdateLocally { product_id, quantity } => {
				cart.update_cart_item_locally(product_id.as_str(), *quantity).await?;
				next_event(&mut events).await?
			}
			Step::Login { user_id } => {
				cart.set_user(Some(user_id.clone())).await?;
				next_event(&mut events).await?
			}
			Step::Logout => {
				cart.set_user(None).await?;
				next_event(&mut events).await?
			}
			Step::Fail { message, status, body } => {
				let mut err = ServiceError::new(message.as_str());
				if let Some(status) = status {
					err = err.with_status(*status);
				}
				if let Some(body) = body {
					err = err.with_body(body.clone());
				}
				service.fail_next(err);
				continue;
			}
		};
		print_event(index, &event)?;
	}

	if !cart.shutdown().await {
		tracing::warn!("cart store did not drain before the shutdown timeout");
	}
	Ok(())
}

async fn next_event(events: &mut broadcast::Receiver<CartEvent>) -> anyhow::Result<CartEvent> {
	events.recv().await.context("cart store stopped")
}

fn print_event(step: usize, event: &CartEvent) -> anyhow::Result<()> {
	let line = json!({
		"step": step,
		"change": format!("{:?}", event.change),
		"state": event.snapshot,
		"item_count": event.snapshot.item_count(),
	});
	println!("{}", serde_json::to_string(&line).context("failed to encode cart state")?);
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("TROLLEY_LOG")
			.or_else(|_| EnvFilter::try_from_default_env())
			.unwrap_or_else(|_| if verbose { EnvFilter::new("trolley=trace,debug") } else { EnvFilter::new("trolley=info,warn") })
	};

	if let Some(log_dir) = std::env::var("TROLLEY_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("trolley.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer().with_writer(file).with_ansi(false).with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "trolley tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt().with_env_filter(filter()).with_writer(std::io::stderr).init();
}
