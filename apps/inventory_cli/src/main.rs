use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, DeleteOutcome, HttpVehicleApi, InventoryPage, SubmitOutcome, TypeFieldInputs,
    VehicleApi,
};
use shared::{
    domain::{VehicleId, VehicleKind},
    error::DomainError,
    protocol::MutationAck,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse and edit the vehicle inventory")]
struct Cli {
    /// Overrides `server_url` from inventory.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Include the id column in listings.
    #[arg(long, global = true)]
    show_ids: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List vehicles, optionally filtered by brand and type.
    List {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long = "type")]
        vehicle_type: Option<String>,
    },
    /// Print one vehicle as JSON.
    Show { id: String },
    Add {
        #[arg(long = "type", value_parser = parse_kind, default_value = "car")]
        kind: VehicleKind,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: String,
        #[command(flatten)]
        fields: TypeFieldArgs,
    },
    /// Load a vehicle into the form, apply the given changes and save it.
    Edit {
        id: String,
        #[arg(long = "type", value_parser = parse_kind)]
        kind: Option<VehicleKind>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[command(flatten)]
        fields: TypeFieldArgs,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Ask the service to reload its JSON store.
    LoadJson,
    /// Ask the service to write its JSON store.
    SaveJson,
}

/// Type-specific inputs; only those belonging to the selected type are used.
#[derive(Args, Debug, Default)]
struct TypeFieldArgs {
    #[arg(long)]
    doors: Option<String>,
    #[arg(long)]
    fuel: Option<String>,
    #[arg(long)]
    sidecar: Option<bool>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    payload: Option<String>,
    #[arg(long)]
    trailer: Option<bool>,
    #[arg(long)]
    cc: Option<String>,
}

impl TypeFieldArgs {
    fn apply(self, inputs: &mut TypeFieldInputs) {
        fn set(slot: &mut String, value: Option<String>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        match inputs {
            TypeFieldInputs::Car { doors, fuel } => {
                set(doors, self.doors);
                set(fuel, self.fuel);
            }
            TypeFieldInputs::Bike { sidecar, category } => {
                *sidecar = self.sidecar.unwrap_or(*sidecar);
                set(category, self.category);
            }
            TypeFieldInputs::Truck { payload, trailer } => {
                set(payload, self.payload);
                *trailer = self.trailer.unwrap_or(*trailer);
            }
            TypeFieldInputs::Motorcycle { cc, category } => {
                set(cc, self.cc);
                set(category, self.category);
            }
        }
    }
}

fn parse_kind(raw: &str) -> Result<VehicleKind, DomainError> {
    raw.parse()
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_ack(action: &str, ack: &MutationAck) -> Result<()> {
    if !ack.ok {
        bail!(
            "{action} rejected by server: {}",
            ack.error.as_deref().unwrap_or("no reason given")
        );
    }
    println!("{action} ok");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.server_url {
        settings.server_url = url;
    }
    settings.show_ids |= cli.show_ids;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(io::stderr)
        .init();

    let api = HttpVehicleApi::new(&settings.server_url)
        .with_context(|| format!("invalid server url {}", settings.server_url))?;
    info!(server = api.server_url(), "inventory client ready");
    let mut page = InventoryPage::new(api, settings.show_ids);

    match cli.command {
        Command::List {
            brand,
            vehicle_type,
        } => {
            page.apply_filter(brand.as_deref(), vehicle_type.as_deref())
                .await
                .context("listing vehicles")?;
            println!("{}", page.list.render_table());
        }
        Command::Show { id } => {
            let vehicle = page
                .api()
                .get(&VehicleId::new(id))
                .await
                .context("fetching vehicle")?;
            println!("{}", serde_json::to_string_pretty(&vehicle)?);
        }
        Command::Add {
            kind,
            brand,
            model,
            year,
            fields,
        } => {
            page.open_for_add();
            page.change_type(kind);
            page.form.brand = brand;
            page.form.model = model;
            page.form.year = year;
            fields.apply(&mut page.form.type_fields);
            let outcome = page.submit_form().await.context("adding vehicle")?;
            report_ack("add", outcome.ack())?;
            println!("{}", page.list.render_table());
        }
        Command::Edit {
            id,
            kind,
            brand,
            model,
            year,
            fields,
        } => {
            page.open_for_edit(&VehicleId::new(id))
                .await
                .context("loading vehicle for edit")?;
            if let Some(kind) = kind {
                page.change_type(kind);
            }
            if let Some(brand) = brand {
                page.form.brand = brand;
            }
            if let Some(model) = model {
                page.form.model = model;
            }
            if let Some(year) = year {
                page.form.year = year;
            }
            fields.apply(&mut page.form.type_fields);
            let outcome = page.submit_form().await.context("saving vehicle")?;
            if let SubmitOutcome::Updated { id, ack } = &outcome {
                report_ack(&format!("update of {id}"), ack)?;
            }
            println!("{}", page.list.render_table());
        }
        Command::Delete { id, yes } => {
            let id = VehicleId::new(id);
            let outcome = page
                .delete(&id, |prompt| yes || confirm_on_stdin(prompt))
                .await
                .context("deleting vehicle")?;
            match outcome {
                DeleteOutcome::Declined => println!("nothing deleted"),
                DeleteOutcome::Deleted(ack) => {
                    report_ack(&format!("delete of {id}"), &ack)?;
                    println!("{}", page.list.render_table());
                }
            }
        }
        Command::LoadJson => {
            let ack = page.load_json().await.context("loading json store")?;
            report_ack("load json", &ack)?;
            println!("{}", page.list.render_table());
        }
        Command::SaveJson => {
            let ack = page.save_json().await.context("saving json store")?;
            report_ack("save json", &ack)?;
        }
    }

    Ok(())
}
