mod analytics;
mod api;
mod cli;
mod config;
mod error;
mod forms;
mod listing;
mod models;
mod notify;
mod tui;
mod utils;
mod workflow;

use anyhow::{Context, Result};
use clap::Parser;

use api::{AdminClient, HttpTransport, Transport};
use cli::args::{Cli, Commands};
use cli::handlers;
use config::{AppConfig, SessionStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it stays silent unless RUST_LOG says otherwise.
    if cli.command.is_none() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    } else {
        env_logger::init();
    }

    let config = AppConfig::load()
        .context("Loading config")?
        .apply_overrides(cli.api_url.as_deref());

    let store = SessionStore::default_location()?;
    let transport = HttpTransport::new(&config.api.base_url, config.api.timeout_secs, store.clone())
        .context("Building HTTP client")?;
    let client = AdminClient::new(Box::new(transport) as Box<dyn Transport>)
        .with_image_base_url(config.api.image_base_url.clone());
    let page_size = config.ui.page_size.max(1);

    match cli.command {
        Some(Commands::Login { email, otp }) => {
            handlers::handle_login(&client, &store, &email, otp)?;
        }
        Some(Commands::Logout) => handlers::handle_logout(&store)?,
        Some(Commands::Whoami) => handlers::handle_whoami(&store)?,

        Some(Commands::Bookings {
            action,
            search,
            status,
            service,
            region,
            dates,
            page,
        }) => {
            handlers::handle_bookings(
                &client,
                page_size,
                action.as_ref(),
                search,
                status.as_deref(),
                service,
                region,
                &dates,
                page.page,
            )?;
        }
        Some(Commands::Schedules {
            action,
            status,
            shift,
            service,
            region,
            doula,
            dates,
            page,
        }) => {
            handlers::handle_schedules(
                &client,
                page_size,
                action.as_ref(),
                status.as_deref(),
                shift.as_deref(),
                service,
                region,
                doula,
                &dates,
                page.page,
            )?;
        }
        Some(Commands::Meetings {
            action,
            search,
            status,
            service,
            region,
            zone_manager,
            dates,
            page,
        }) => {
            handlers::handle_meetings(
                &client,
                page_size,
                action.as_ref(),
                search,
                status.as_deref(),
                service,
                region,
                zone_manager,
                &dates,
                page.page,
            )?;
        }
        Some(Commands::Enquiries {
            action,
            status,
            page,
        }) => {
            handlers::handle_enquiries(
                &client,
                page_size,
                action.as_ref(),
                status.as_deref(),
                page.page,
            )?;
        }
        Some(Commands::Doulas {
            action,
            search,
            service,
            region,
            availability,
            active,
            page,
        }) => {
            handlers::handle_doulas(
                &client,
                page_size,
                action.as_ref(),
                search,
                service,
                region,
                availability.as_deref(),
                active,
                page.page,
            )?;
        }
        Some(Commands::ZoneManagers {
            action,
            search,
            region,
            active,
            page,
        }) => {
            handlers::handle_zone_managers(
                &client,
                page_size,
                action.as_ref(),
                search,
                region,
                active,
                page.page,
            )?;
        }
        Some(Commands::Regions {
            action,
            search,
            page,
        }) => {
            handlers::handle_regions(&client, page_size, action.as_ref(), search, page.page)?;
        }
        Some(Commands::Testimonials {
            action,
            doula,
            service,
            rating,
            dates,
            page,
        }) => {
            handlers::handle_testimonials(
                &client,
                page_size,
                action.as_ref(),
                doula,
                service,
                rating,
                &dates,
                page.page,
            )?;
        }
        Some(Commands::Revenue {
            doula,
            region,
            service,
            dates,
        }) => {
            handlers::handle_revenue(&client, doula, region, service, &dates)?;
        }
        Some(Commands::Dashboard { region }) => {
            handlers::handle_dashboard(&client, region.as_deref())?;
        }
        Some(Commands::Config { action }) => {
            handlers::handle_config(&config, &action)?;
        }

        // No subcommand → launch TUI
        None => {
            let session = store.load();
            tui::run(client, &config, session)?;
        }
    }

    Ok(())
}
