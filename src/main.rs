use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use food_cart::app::ports::{ConfirmationPort, NoticePort};
use food_cart::config::{Config, StorageBackend};
use food_cart::infra::build_cart_provider;
use food_cart::infra::notice_adapter::ConsoleNotice;
use food_cart::infra::prompt_adapter::{AutoConfirm, DialoguerConfirmation};
use food_cart::{logging, ActionOutcome, Cart, CartProvider, MenuItem, RestaurantInfo};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "food_cart")]
#[command(about = "Food-ordering cart kept in local storage")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to $FOOD_CART_CONFIG or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend. Available: file, sqlite, memory
    #[arg(long, global = true)]
    storage: Option<StorageBackend>,

    /// Directory holding the stored cart
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Answer "yes" to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show,
    /// Add a menu item
    Add {
        #[arg(long)]
        menu_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long)]
        restaurant_id: String,
        #[arg(long)]
        restaurant_name: String,
        #[arg(long, default_value_t = 0.0)]
        delivery_fee: f64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; zero or less removes the line
    Update {
        #[arg(long)]
        line_id: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        #[arg(long)]
        line_id: String,
    },
    /// Increase a line's quantity by one
    Inc {
        #[arg(long)]
        line_id: String,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Dec {
        #[arg(long)]
        line_id: String,
    },
    /// Remove every item
    Clear,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            config.apply_env_overrides()?;
            config
        }
        None => Config::load()?,
    };
    if let Some(backend) = cli.storage {
        config.storage.backend = backend;
    }
    if let Some(root) = &cli.data_root {
        config.storage.data_root = root.clone();
    }
    Ok(config)
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }
    match cart.restaurant_info() {
        Some(restaurant) => println!("🛒 Cart from {} ({})", restaurant.name, restaurant.id),
        None => println!("🛒 Cart"),
    }
    for item in cart.items() {
        println!(
            "   {:<40} {:>3} x {:>8.2} = {:>9.2}   [{}]",
            item.name,
            item.quantity,
            item.price,
            item.line_total(),
            item.id
        );
    }
    println!("   Items:        {}", cart.item_count());
    println!("   Subtotal:     {:.2}", cart.subtotal());
    println!("   Delivery fee: {:.2}", cart.delivery_fee());
    println!("   Total:        {:.2}", cart.total());
}

async fn run(provider: &CartProvider, command: Commands) -> ActionOutcome {
    match command {
        Commands::Show => ActionOutcome::Unchanged,
        Commands::Add {
            menu_id,
            name,
            price,
            image,
            restaurant_id,
            restaurant_name,
            delivery_fee,
            quantity,
        } => {
            let item = MenuItem::new(menu_id, name, price).with_image(image);
            let restaurant = RestaurantInfo::new(restaurant_id, restaurant_name, delivery_fee);
            provider.add_to_cart(&item, &restaurant, quantity).await
        }
        Commands::Update { line_id, quantity } => {
            provider.update_quantity(&line_id, quantity).await
        }
        Commands::Remove { line_id } => provider.remove_from_cart(&line_id).await,
        Commands::Inc { line_id } => provider.increment_line(&line_id).await,
        Commands::Dec { line_id } => provider.decrement_line(&line_id).await,
        Commands::Clear => provider.clear_cart().await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let _log_guard = logging::init_logging(&config.logging);
    debug!(?config, "configuration loaded");

    let confirmation: Arc<dyn ConfirmationPort> = if cli.yes {
        Arc::new(AutoConfirm::new(true))
    } else {
        Arc::new(DialoguerConfirmation)
    };
    let notices: Arc<dyn NoticePort> = Arc::new(ConsoleNotice);

    let provider = build_cart_provider(&config.storage, confirmation, notices)?;
    provider.activate().await;

    let outcome = run(&provider, cli.command).await;
    info!(?outcome, "command finished");

    match outcome {
        ActionOutcome::Cancelled => println!("Aborted."),
        ActionOutcome::Unchanged | ActionOutcome::Applied => {}
        ActionOutcome::Failed => {
            print_cart(&provider.cart());
            bail!("cart was not changed");
        }
    }
    print_cart(&provider.cart());
    Ok(())
}
