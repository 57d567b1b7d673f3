use apparel_order::application::configuration::OrderConfiguration;
use apparel_order::application::upload::{UploadController, UploadOutcome};
use apparel_order::config::Config;
use apparel_order::domain::attachment::AttachmentSource;
use apparel_order::domain::order::{Color, Material, Product};
use apparel_order::domain::ports::{ConfirmationPrompt, OrderTransportRef};
use apparel_order::infrastructure::http::HttpOrderTransport;
use apparel_order::infrastructure::in_memory::InMemoryOrderService;
use apparel_order::interfaces::terminal::{TerminalPrompt, load_candidate};
use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Garment to order: tshirt or sweater
    #[arg(long, default_value = "tshirt")]
    product: Product,

    /// Color from the product's palette (defaults to black)
    #[arg(long)]
    color: Option<Color>,

    /// Cotton weight for t-shirts: light or heavy
    #[arg(long, default_value = "light")]
    material: Material,

    /// Text to print, up to 16 characters
    #[arg(long)]
    text: Option<String>,

    /// Image file to print on the garment
    #[arg(long)]
    image: Option<PathBuf>,

    /// Media type of the image. Guessed from the extension if omitted.
    #[arg(long, requires = "image")]
    image_type: Option<String>,

    /// Order service endpoint (overrides ORDER_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Give up on the upload after this many seconds, 0 for never
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Submit without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Only print the price
    #[arg(long)]
    quote: bool,

    /// Print the configured order as JSON
    #[arg(long)]
    json: bool,

    /// Submit to an in-process order service instead of the network
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env file, loaded first so it can set RUST_LOG
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()
        .into_diagnostic()?
        .with_endpoint(cli.endpoint.clone())
        .with_timeout_secs(cli.timeout_secs);

    let mut order = OrderConfiguration::new();
    order.set_product(cli.product);
    if let Some(color) = cli.color {
        order.set_color(color).into_diagnostic()?;
    }
    order.set_material(cli.material);
    if let Some(text) = &cli.text {
        order.set_text(text).into_diagnostic()?;
    }
    if let Some(path) = &cli.image {
        let candidate = load_candidate(path, cli.image_type.as_deref())
            .await
            .into_diagnostic()?;
        let preview = order
            .select_attachment(candidate, AttachmentSource::Selector)
            .into_diagnostic()?;
        order.apply_preview(preview.run().await);
    }

    if cli.json {
        let summary = serde_json::to_string_pretty(&order.summary()).into_diagnostic()?;
        println!("{summary}");
    } else {
        print_order(&order);
    }
    if cli.quote {
        return Ok(());
    }

    let transport: OrderTransportRef = if cli.offline {
        Arc::new(InMemoryOrderService::new())
    } else {
        Arc::new(HttpOrderTransport::new(&config).into_diagnostic()?)
    };
    info!(endpoint = %config.endpoint, offline = cli.offline, "Order transport ready");

    let mut upload = UploadController::new(transport);
    let request = upload.request_submit(&order).into_diagnostic()?;
    let accepted = cli.yes || TerminalPrompt.confirm(&request.message).await.into_diagnostic()?;
    upload.confirm(accepted, &order).into_diagnostic()?;
    if !accepted {
        println!("Order not submitted.");
        return Ok(());
    }

    let outcome = loop {
        tokio::select! {
            outcome = upload.next_outcome() => break outcome,
            _ = tokio::signal::ctrl_c() => {}
        }
        upload.cancel();
    };
    let outcome = outcome.ok_or_else(|| miette!("upload ended without an outcome"))?;

    println!("{}", outcome.message());
    upload.acknowledge().into_diagnostic()?;

    if outcome != UploadOutcome::Succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn print_order(order: &OrderConfiguration) {
    let product = order.product();
    println!("Product: {}", product.label());
    println!("Color: {}", order.color());
    if product.has_material_choice() {
        println!("Material: {}", order.material().label());
    }
    if !order.text().is_empty() {
        println!("Text: {}", order.text().as_str());
    }
    if let Some(attachment) = order.attachment() {
        let preview = if order.preview().is_some() { "" } else { " (no preview)" };
        println!("Image: {}{preview}", attachment.file_name);
    }
    println!("Price: {}", order.price());
}
