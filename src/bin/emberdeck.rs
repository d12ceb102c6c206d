use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use emberdeck::{BackgroundCache, Raster, TextEngine, Theme, WeekTable};

#[derive(Parser, Debug)]
#[command(name = "emberdeck", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card per week-table row into a directory of PNGs.
    Deck(DeckArgs),
    /// Render the legend image that explains the encoding.
    Guide(GuideArgs),
}

#[derive(Parser, Debug)]
struct DeckArgs {
    /// Input week table CSV.
    #[arg(long)]
    data: PathBuf,

    /// TTF or OTF font used for the card labels.
    #[arg(long)]
    font: PathBuf,

    /// Output directory for the card PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Theme JSON overriding the default look.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Seed for reproducible output. Omitted means a fresh run every time.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write guide.png next to the cards.
    #[arg(long)]
    with_guide: bool,
}

#[derive(Parser, Debug)]
struct GuideArgs {
    /// TTF or OTF font used for the captions.
    #[arg(long)]
    font: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Theme JSON overriding the default look.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Seed for reproducible output. Omitted means a fresh run every time.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Deck(args) => cmd_deck(args),
        Command::Guide(args) => cmd_guide(args),
    }
}

fn load_theme(path: Option<&Path>) -> anyhow::Result<Theme> {
    match path {
        Some(path) => Ok(Theme::load(path)?),
        None => Ok(Theme::default()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn write_png(path: &Path, raster: &Raster) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        raster.data(),
        raster.width(),
        raster.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

/// Week labels go into filenames; keep them filesystem-safe.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn cmd_deck(args: DeckArgs) -> anyhow::Result<()> {
    let theme = load_theme(args.theme.as_deref())?;
    let table = WeekTable::load(&args.data)?;
    let mut fonts = TextEngine::load(&args.font)?;
    let mut rng = make_rng(args.seed);

    let mut cache = BackgroundCache::new();
    cache.initialize(&mut rng, &theme)?;

    let (cards, stats) = emberdeck::render_deck(&mut rng, &cache, &mut fonts, &theme, &table)?;
    info!(
        rendered = stats.cards_rendered,
        skipped = stats.rows_skipped,
        "deck rendered"
    );

    for (index, card) in cards.iter().enumerate() {
        let name = format!(
            "card-{:03}-week-{}.png",
            index + 1,
            sanitize_label(&card.record.week)
        );
        write_png(&args.out.join(name), &card.raster)?;
    }

    if args.with_guide {
        let guide = emberdeck::create_guide(&mut rng, &mut fonts, &theme)?;
        write_png(&args.out.join("guide.png"), &guide)?;
    }

    eprintln!("wrote {} cards to {}", cards.len(), args.out.display());
    Ok(())
}

fn cmd_guide(args: GuideArgs) -> anyhow::Result<()> {
    let theme = load_theme(args.theme.as_deref())?;
    let mut fonts = TextEngine::load(&args.font)?;
    let mut rng = make_rng(args.seed);

    let guide = emberdeck::create_guide(&mut rng, &mut fonts, &theme)?;
    write_png(&args.out, &guide)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
