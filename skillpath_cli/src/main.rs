use skillpath_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skillpath")]
#[command(about = "Calisthenics skill tree and shop catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercise categories
    Categories,

    /// List exercises with their unlock state
    Exercises {
        /// Only show one category (e.g. horizontal-pull)
        #[arg(long)]
        category: Option<String>,

        /// Progress file to evaluate against
        #[arg(long)]
        progress: Option<PathBuf>,
    },

    /// Show a single exercise in detail
    Exercise {
        id: String,

        #[arg(long)]
        progress: Option<PathBuf>,
    },

    /// Exercises that can be started next
    Next {
        #[arg(long)]
        progress: Option<PathBuf>,
    },

    /// Summarize progress through the skill tree
    Summary {
        #[arg(long)]
        progress: Option<PathBuf>,
    },

    /// Validate the exercise catalog and product snapshot
    Validate {
        #[arg(long)]
        products: Option<PathBuf>,
    },

    /// Search, filter and sort the shop
    Shop {
        /// Case-insensitive text matched against name and description
        #[arg(long)]
        search: Option<String>,

        /// Product category, or "all"
        #[arg(long)]
        category: Option<String>,

        /// Product subcategory, or "all"
        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        min_price: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        max_price: Option<f64>,

        /// featured, price-low, price-high, rating, newest
        #[arg(long)]
        sort: Option<String>,

        /// Write results as CSV to stdout
        #[arg(long)]
        csv: bool,

        #[arg(long)]
        products: Option<PathBuf>,
    },

    /// Show a single product in detail
    Product {
        id: String,

        #[arg(long)]
        products: Option<PathBuf>,
    },

    /// Highly rated products
    Featured {
        #[arg(long)]
        products: Option<PathBuf>,
    },

    /// Show the athlete leaderboard
    Leaderboard {
        /// Show per-university standings instead
        #[arg(long)]
        universities: bool,
    },

    /// Show recent community activity
    Feed {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Write a default config and seed the data directory
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    skillpath_core::logging::init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let mut config = if cli.config.is_some() && config_path.exists() {
        Config::load_from(&config_path)?
    } else if cli.config.is_some() {
        Config::default()
    } else {
        Config::load()?
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Categories => cmd_categories(),
        Commands::Exercises { category, progress } => cmd_exercises(&config, category, progress),
        Commands::Exercise { id, progress } => cmd_exercise(&config, &id, progress),
        Commands::Next { progress } => cmd_next(&config, progress),
        Commands::Summary { progress } => cmd_summary(&config, progress),
        Commands::Validate { products } => cmd_validate(&config, products),
        Commands::Shop {
            search,
            category,
            subcategory,
            min_price,
            max_price,
            sort,
            csv,
            products,
        } => {
            let mut spec = QuerySpec::new().sort(match sort {
                Some(s) => s.parse()?,
                None => config.shop.default_sort,
            });
            if let Some(search) = search {
                spec = spec.search(search);
            }
            if let Some(category) = category {
                spec = spec.category(category);
            }
            if let Some(subcategory) = subcategory {
                spec = spec.subcategory(subcategory);
            }
            spec.min_price = min_price.unwrap_or(spec.min_price);
            spec.max_price = max_price.unwrap_or(spec.max_price);
            cmd_shop(&config, products, &spec, csv)
        }
        Commands::Product { id, products } => cmd_product(&config, products, &id),
        Commands::Featured { products } => cmd_featured(&config, products),
        Commands::Leaderboard { universities } => cmd_leaderboard(universities),
        Commands::Feed { limit } => cmd_feed(limit),
        Commands::Init { force } => cmd_init(&config, &config_path, force),
    }
}

// ============================================================================
// Loading helpers
// ============================================================================

fn load_catalog() -> Result<&'static ExerciseCatalog> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

/// An explicit progress file must exist; the configured one falls back to the sample fixture
fn load_progress(config: &Config, explicit: Option<PathBuf>) -> Result<UserProgress> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::NotFound(format!("progress file {:?}", path)));
        }
        return UserProgress::load(&path);
    }

    let path = config.progress_path();
    if path.exists() {
        UserProgress::load(&path)
    } else {
        tracing::info!("No progress file at {:?}, using sample progress", path);
        Ok(sample_progress())
    }
}

/// An explicit products file must exist; the configured one falls back to the built-in shop
fn product_source(config: &Config, explicit: Option<PathBuf>) -> Box<dyn ProductSource> {
    match explicit {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => {
            let path = config.products_path();
            if path.exists() {
                Box::new(JsonFileSource::new(path))
            } else {
                tracing::info!("No products file at {:?}, using built-in shop", path);
                Box::new(InMemorySource::with_defaults())
            }
        }
    }
}

// ============================================================================
// Skill tree commands
// ============================================================================

fn cmd_categories() -> Result<()> {
    let catalog = load_catalog()?;
    for info in catalog.categories() {
        let count = exercises_by_category(catalog, info.id).len();
        println!("{:<16} {:<16} {:>2} exercises", info.id, info.name, count);
        println!("  {}", info.description);
    }
    Ok(())
}

fn status_marker(unlock: &ExerciseUnlock) -> &'static str {
    match unlock.status {
        Some(ExerciseStatus::Completed) => "✓",
        Some(ExerciseStatus::Current) => "▶",
        _ if unlock.unlocked => "○",
        _ => "🔒",
    }
}

fn cmd_exercises(config: &Config, category: Option<String>, progress: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    let progress = load_progress(config, progress)?;

    let category = category.map(|c| c.parse::<ExerciseCategory>()).transpose()?;

    for unlock in unlock_overview(catalog, &progress) {
        if category.is_some_and(|c| c != unlock.exercise.category) {
            continue;
        }
        println!(
            "  {} {:<26} {:<16} {}",
            status_marker(&unlock),
            unlock.exercise.id,
            unlock.exercise.category,
            unlock.exercise.skill_level.label()
        );
    }
    Ok(())
}

fn cmd_exercise(config: &Config, id: &str, progress: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    let progress = load_progress(config, progress)?;
    let exercise = catalog
        .get(id)
        .ok_or_else(|| Error::NotFound(format!("exercise '{}'", id)))?;
    let graph = PrerequisiteGraph::from_catalog(catalog)?;

    println!("\n  {} ({})", exercise.name, exercise.skill_level.label());
    println!("  Category: {}", exercise.category);
    println!("  {}", exercise.description);

    let state = if progress.is_completed(id) {
        "completed"
    } else if is_unlocked(catalog, id, &progress) {
        "unlocked"
    } else {
        "locked"
    };
    println!("  Status: {}", state);

    let prereqs = prerequisites_of(catalog, id);
    if !prereqs.is_empty() {
        println!("\n  Prerequisites:");
        for prereq in prereqs {
            let mark = if progress.is_completed(&prereq.id) { "✓" } else { "✗" };
            println!("    {} {}", mark, prereq.name);
        }
    }

    let unlocks = graph.dependents(id);
    if !unlocks.is_empty() {
        println!("\n  Unlocks: {}", unlocks.join(", "));
    }

    if !exercise.instructions.is_empty() {
        println!("\n  Instructions:");
        for (i, step) in exercise.instructions.iter().enumerate() {
            println!("    {}. {}", i + 1, step);
        }
    }

    if let Some(ref url) = exercise.demo_video {
        println!("\n  ℹ Demo: {}", url);
    }
    println!();
    Ok(())
}

fn cmd_next(config: &Config, progress: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    let progress = load_progress(config, progress)?;

    let next = next_unlockable(catalog, &progress);
    if next.is_empty() {
        println!("Nothing left to unlock - every exercise is completed.");
        return Ok(());
    }

    println!("Ready to train:");
    for exercise in next {
        println!("  → {} [{}]", exercise.name, exercise.category);
    }
    Ok(())
}

fn cmd_summary(config: &Config, progress: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    let progress = load_progress(config, progress)?;
    let summary = summarize(catalog, &progress);

    println!("Completed:   {}/{}", summary.completed, summary.total);
    println!("In progress: {}", summary.in_progress);
    println!("Available:   {}", summary.available);
    println!(
        "Level:       {}",
        summary.highest_level.map(|l| l.label()).unwrap_or("Unranked")
    );
    println!("\nStrength profile:");
    for (category, percent) in &summary.category_completion {
        println!("  {:<16} {:>3}%", category, percent);
    }
    Ok(())
}

fn cmd_validate(config: &Config, products: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog()?;
    println!("✓ Exercise catalog valid ({} exercises)", catalog.len());

    let source = product_source(config, products);
    let products = source.list_products()?;
    println!("✓ Products valid ({} products)", products.len());
    Ok(())
}

// ============================================================================
// Shop commands
// ============================================================================

fn format_price(product: &Product) -> String {
    match product.discount_price {
        Some(discount) => format!("${:.2} (was ${:.2})", discount, product.price),
        None => format!("${:.2}", product.price),
    }
}

fn print_product_line(product: &Product) {
    println!(
        "  {:<10} {:<32} {:<22} ★ {:.1}",
        product.id,
        product.name,
        format_price(product),
        product.rating
    );
}

fn cmd_shop(config: &Config, products: Option<PathBuf>, spec: &QuerySpec, csv: bool) -> Result<()> {
    let products = product_source(config, products).list_products()?;
    let results = query(&products, spec);

    if csv {
        write_products_csv(std::io::stdout().lock(), &results)?;
        return Ok(());
    }

    if results.is_empty() {
        println!("No products match your filters.");
        return Ok(());
    }

    println!("{} of {} products (sorted by {})", results.len(), products.len(), spec.sort);
    for product in results {
        print_product_line(product);
    }
    Ok(())
}

fn cmd_product(config: &Config, products: Option<PathBuf>, id: &str) -> Result<()> {
    let product = product_source(config, products)
        .get_product(id)?
        .ok_or_else(|| Error::NotFound(format!("product '{}'", id)))?;

    println!("\n  {}", product.name);
    println!("  {} / {}", product.category, product.subcategory);
    println!("  Price: {}", format_price(&product));
    if let Some(percent) = product.discount_percent() {
        println!("  Save {}%", percent);
    }
    println!("  Rating: ★ {:.1} ({} reviews)", product.rating, product.review_count);
    if product.in_stock() {
        println!("  In stock ({} left)", product.stock_quantity);
    } else {
        println!("  Out of stock");
    }
    println!("\n  {}", product.description);

    if let Some(ref specs) = product.specifications {
        for (label, value) in [
            ("Dimensions", &specs.dimensions),
            ("Weight", &specs.weight),
            ("Material", &specs.material),
        ] {
            if let Some(value) = value {
                println!("  {}: {}", label, value);
            }
        }
    }

    if let Some(ref asset) = product.assets_3d {
        println!("\n  ℹ 3D preview: {}", asset.preview_image);
    }
    println!();
    Ok(())
}

fn cmd_featured(config: &Config, products: Option<PathBuf>) -> Result<()> {
    let products = product_source(config, products).list_products()?;
    for product in featured_products(&products, config.shop.featured_min_rating) {
        print_product_line(product);
    }
    Ok(())
}

// ============================================================================
// Community commands
// ============================================================================

fn cmd_leaderboard(universities: bool) -> Result<()> {
    let athletes = default_leaderboard();

    if universities {
        for standing in university_standings(&athletes) {
            println!(
                "  {:<12} {:>3} members  avg {:>5} pts",
                standing.name, standing.members, standing.avg_points
            );
        }
        return Ok(());
    }

    for ranked in rank_athletes(&athletes) {
        let a = &ranked.athlete;
        println!(
            "  #{:<2} {:<16} {:<10} {:>5} pts  {:>2} day streak",
            ranked.rank, a.name, a.university, a.points, a.streak_days
        );
    }
    Ok(())
}

fn cmd_feed(limit: usize) -> Result<()> {
    let now = chrono::Utc::now();
    let feed = default_feed(now);
    for activity in recent_activity(&feed, limit) {
        println!(
            "  {} {} ({} • {})",
            activity.user,
            activity.action,
            activity.university,
            relative_time(activity.occurred_at, now)
        );
    }
    Ok(())
}

// ============================================================================
// Setup
// ============================================================================

fn cmd_init(config: &Config, config_path: &Path, force: bool) -> Result<()> {
    if force || !config_path.exists() {
        config.save_to(config_path)?;
        println!("✓ Wrote config to {}", config_path.display());
    } else {
        println!("Config already exists at {}", config_path.display());
    }

    let products_path = config.products_path();
    if force || !products_path.exists() {
        save_products(&products_path, default_products())?;
        println!("✓ Seeded {} products to {}", default_products().len(), products_path.display());
    } else {
        println!("Products already exist at {}", products_path.display());
    }

    let progress_path = config.progress_path();
    if force || !progress_path.exists() {
        sample_progress().save(&progress_path)?;
        println!("✓ Wrote sample progress to {}", progress_path.display());
    } else {
        println!("Progress already exists at {}", progress_path.display());
    }

    Ok(())
}
