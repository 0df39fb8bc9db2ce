//! `stockroom` terminal entry point.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use stockroom_auth::{PlainRolesClaim, ResourceRoles, RoleConvention};
use stockroom_core::{Price, ProductId};
use stockroom_inventory::MovementKind;
use stockroom_products::{
    CategoryFilter, ListAction, PriceRange, ProductDraft, ProductForm, StockFilter,
};
use stockroom_client::{
    provider_for, AccessPolicy, AuthConfig, ClientConfig, HistoryTable, HttpProductRepository,
    IdentityProvider, InventoryController, ProductScreen, RoleConventionKind, TokenRefreshWorker,
};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Browse and manage the product inventory", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON instead of compact text.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one page of the product list.
    List(ListArgs),
    /// Create a product.
    Create(ProductArgs),
    /// Change a product's fields; fields left out keep their current value.
    Update {
        id: ProductId,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete a product.
    Delete {
        id: ProductId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Record a stock movement: in, out, adjustment, return or loss.
    Stock {
        id: ProductId,
        kind: MovementKind,
        /// Units moved, or the target quantity for an adjustment.
        amount: u32,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show a product's stock movement history.
    History { id: ProductId },
    /// Show the signed-in user and what they may do.
    Whoami,
    /// Keep the session alive until interrupted.
    Watch,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, short)]
    search: Option<String>,
    #[arg(long, short)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<Price>,
    #[arg(long)]
    max_price: Option<Price>,
    /// all, low, out or in
    #[arg(long)]
    stock: Option<StockFilter>,
    #[arg(long, short, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    price: Price,
    #[arg(long)]
    quantity: u32,
}

impl From<ProductArgs> for ProductDraft {
    fn from(args: ProductArgs) -> Self {
        ProductDraft {
            name: args.name,
            description: args.description,
            category: args.category,
            price: args.price,
            initial_quantity: args.quantity,
        }
    }
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    price: Option<Price>,
    #[arg(long)]
    quantity: Option<u32>,
}

impl EditArgs {
    fn apply(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(price) = self.price {
            form.price = price.to_string();
        }
        if let Some(quantity) = self.quantity {
            form.initial_quantity = quantity.to_string();
        }
    }
}

fn prompt(question: &str) -> bool {
    print!("{question} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn access_policy(config: &ClientConfig) -> AccessPolicy {
    if config.auth == AuthConfig::Disabled {
        return AccessPolicy::Unrestricted;
    }
    let convention: Arc<dyn RoleConvention> = match config.role_convention {
        RoleConventionKind::Plain => Arc::new(PlainRolesClaim),
        RoleConventionKind::Resource => Arc::new(ResourceRoles::new(config.client_id.clone())),
    };
    AccessPolicy::Roles(convention)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        stockroom_observability::init();
    } else {
        stockroom_observability::init_pretty();
    }

    let config = ClientConfig::from_env().context("invalid STOCKROOM_* configuration")?;
    tracing::debug!(api = %config.api_root(), "configuration loaded");

    let identity: Arc<dyn IdentityProvider> = Arc::from(provider_for(&config.auth, &config.client_id));
    let repo = Arc::new(
        HttpProductRepository::new(config.api_root(), identity.clone())
            .with_stock_root(config.stock_root()),
    );

    let yes = matches!(cli.command, Command::Delete { yes: true, .. });
    let confirm = move |question: &str| yes || prompt(question);

    let mut controller =
        InventoryController::new(repo, identity.clone(), access_policy(&config), Box::new(confirm))
            .with_page_size(config.page_size)
            .with_min_token_validity(config.min_token_validity);

    match cli.command {
        Command::List(args) => {
            controller.fetch().await.ok();
            if let Some(size) = args.page_size {
                controller.dispatch(ListAction::SetPageSize(size));
            }
            if let Some(term) = args.search {
                controller.dispatch(ListAction::SetSearch(term));
            }
            if let Some(category) = args.category {
                controller.dispatch(ListAction::SetCategory(CategoryFilter::from(category.as_str())));
            }
            if args.min_price.is_some() || args.max_price.is_some() {
                let min = args.min_price.unwrap_or(Price::ZERO);
                let range = match args.max_price {
                    Some(max) => PriceRange::new(min, max),
                    None => PriceRange::at_least(min),
                };
                controller.dispatch(ListAction::SetPriceRange(range));
            }
            if let Some(stock) = args.stock {
                controller.dispatch(ListAction::SetStockFilter(stock));
            }
            controller.dispatch(ListAction::SetPage(args.page));

            let permissions = controller.permissions().await;
            let view = controller.view();
            print!(
                "{}",
                ProductScreen::new(&view, permissions, controller.state().error.as_deref())
            );
        }
        Command::Create(args) => {
            let product = controller.create(args.into()).await?;
            println!("Created product {} ({})", product.id, product.name);
        }
        Command::Update { id, changes } => {
            controller.fetch().await?;
            controller.edit(&id).await?;
            changes.apply(controller.form_mut());
            let product = controller.submit_edit(&id).await?;
            println!("Updated product {} ({})", product.id, product.name);
        }
        Command::Delete { id, .. } => {
            controller.fetch().await.ok();
            if controller.delete(&id).await? {
                println!("Deleted product {id}");
            } else {
                println!("Cancelled");
            }
        }
        Command::Stock {
            id,
            kind,
            amount,
            reason,
        } => {
            controller.fetch().await?;
            let movement = controller.record_movement(&id, kind, amount, reason).await?;
            println!(
                "{}: {} -> {}",
                movement.movement_type.description(),
                movement.previous_quantity,
                movement.new_quantity
            );
        }
        Command::History { id } => {
            let history = controller.movement_history(&id).await?;
            print!("{}", HistoryTable::new(&history));
        }
        Command::Whoami => {
            let name = identity
                .claims()
                .await
                .map(|c| c.display_name().to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            let caps = controller.capabilities().await;
            println!("{name} (admin: {}, employee: {})", caps.admin, caps.employee);
        }
        Command::Watch => {
            let worker = TokenRefreshWorker::new(
                identity.clone(),
                config.refresh_interval,
                config.min_token_validity,
            );
            let shutdown = worker.shutdown_handle();
            let mut status = worker.subscribe();
            let handle = worker.start();

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = status.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = *status.borrow_and_update();
                        tracing::info!(status = ?current, "session status changed");
                    }
                }
            }

            shutdown.notify_one();
            handle.await.context("token refresh worker panicked")?;
        }
    }

    Ok(())
}
