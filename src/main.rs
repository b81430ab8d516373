use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_arcade::game::{GameConfig, GameVariant};
use snake_arcade::modes::HumanMode;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Grid-based Snake with three rule variants")]
struct Cli {
    /// Ruleset to play
    #[arg(long, default_value = "classic")]
    variant: Variant,

    /// Grid width
    #[arg(long, default_value = "25")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "25")]
    height: usize,

    /// RNG seed for reproducible spawn sequences
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Variant {
    /// Food and score only, constant speed
    Classic,
    /// Levels add obstacles and speed the game up
    Progressive,
    /// Progressive plus a time-limited bonus food
    Bonus,
}

impl From<Variant> for GameVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Classic => GameVariant::Classic,
            Variant::Progressive => GameVariant::Progressive,
            Variant::Bonus => GameVariant::Bonus,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig::new(cli.variant.into(), cli.width, cli.height);

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    Ok(())
}
