mod config;
mod table;
mod terminal;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    HttpCustomerApi, HttpOrderRepository, ListView, OrdersPage, PageDependencies, RestTransport,
    SystemClock,
};
use shared::domain::{CustomerId, OrderId, PaymentStatus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::load_settings,
    table::{format_customers, format_table},
    terminal::{TerminalConfirmer, TerminalNotifier},
};

#[derive(Parser, Debug)]
#[command(about = "Manage orders on the orders service")]
struct Cli {
    /// TOML settings file; defaults to ./orders.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured service base url.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// All orders.
    List,
    /// Orders still awaiting payment, as reported by the server.
    Pending,
    /// Orders with one payment status.
    Filter { status: PaymentStatus },
    Show { id: OrderId },
    Customers,
    Create {
        #[arg(long)]
        customer: CustomerId,
        #[arg(long)]
        status: PaymentStatus,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Loads an order and saves it back with the given fields replaced.
    Edit {
        id: OrderId,
        #[arg(long)]
        customer: Option<CustomerId>,
        #[arg(long)]
        status: Option<PaymentStatus>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        id: OrderId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.api_url.clone() {
        settings.api_url = url;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let endpoints = settings.endpoints()?;
    info!(
        customers = endpoints.customers(),
        orders = endpoints.orders(),
        "using orders service"
    );
    let transport = RestTransport::new(endpoints, settings.request_timeout())
        .context("failed to build http client")?;

    let assume_yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let mut page = OrdersPage::new(PageDependencies {
        customers: Arc::new(HttpCustomerApi::new(transport.clone())),
        orders: Arc::new(HttpOrderRepository::new(transport)),
        notifier: Arc::new(TerminalNotifier::new(settings.require_ack)),
        confirmer: Arc::new(TerminalConfirmer::new(assume_yes)),
        clock: Arc::new(SystemClock),
        formatter: Arc::new(settings.date_formatter()?),
        date_policy: settings.date_policy,
    });
    let color = !cli.no_color;

    // Errors from the page have already been shown by the notifier.
    let ok = run(&mut page, cli.command, color).await;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn run(page: &mut OrdersPage, command: Command, color: bool) -> bool {
    match command {
        Command::List => show_view(page, ListView::All, color).await,
        Command::Pending => show_view(page, ListView::Pending, color).await,
        Command::Filter { status } => show_view(page, ListView::Status(status), color).await,
        Command::Show { id } => {
            page.load_directory().await;
            match page.show_detail(id).await {
                Ok(detail) => {
                    println!("{detail}");
                    true
                }
                Err(_) => false,
            }
        }
        Command::Customers => {
            if !page.load_directory().await {
                return false;
            }
            print!("{}", format_customers(&page.list().directory().customers()));
            true
        }
        Command::Create {
            customer,
            status,
            address,
        } => {
            page.load_directory().await;
            if page.list().directory().is_loaded() && !page.list().directory().contains(customer) {
                warn!(customer_id = customer.0, "customer not in the directory");
            }
            let form = page.form_mut();
            form.open_create();
            form.set_customer(Some(customer));
            form.set_payment_status(Some(status));
            form.set_shipping_address(address);
            submit_and_print(page, color).await
        }
        Command::Edit {
            id,
            customer,
            status,
            address,
        } => {
            page.load_directory().await;
            let form = page.form_mut();
            if form.open_edit(id).await.is_err() {
                return false;
            }
            if let Some(customer) = customer {
                form.set_customer(Some(customer));
            }
            if let Some(status) = status {
                form.set_payment_status(Some(status));
            }
            if let Some(address) = address {
                form.set_shipping_address(address);
            }
            submit_and_print(page, color).await
        }
        Command::Delete { id, .. } => {
            page.load_directory().await;
            match page.request_delete(id).await {
                Ok(outcome) => {
                    info!(order_id = id.0, ?outcome, "delete finished");
                    print_rows(page, color);
                    true
                }
                Err(_) => false,
            }
        }
    }
}

async fn show_view(page: &mut OrdersPage, view: ListView, color: bool) -> bool {
    page.list_mut().set_view(view);
    if page.startup().await.is_err() {
        return false;
    }
    print_rows(page, color);
    true
}

async fn submit_and_print(page: &mut OrdersPage, color: bool) -> bool {
    if page.submit_form().await.is_err() {
        return false;
    }
    print_rows(page, color);
    true
}

fn print_rows(page: &OrdersPage, color: bool) {
    if !page.list().rows().is_empty() {
        print!("{}", format_table(page.list().rows(), color));
    }
}
