use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use swimlane_board::logging;
use swimlane_board::seed::{JsonFileSeed, SeedSource, StaticSeed};
use swimlane_board::{
    BoardConfig, BoardController, BoardView, CardStore, Column, NodeHierarchy, NodeTree,
    PointerDragController, SeedMode,
};

const EXIT_SETUP: u8 = 2;
const EXIT_ASSERTION: u8 = 3;

/// Drags the first backlog card onto the In Progress lane and checks that
/// the board followed.
#[derive(Debug, Parser)]
#[command(name = "drag-check", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON seed file, overriding the configured one
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Start with every card in the backlog
    #[arg(long)]
    all_backlog: bool,

    /// Number of interpolated pointer moves
    #[arg(long)]
    steps: Option<u32>,

    /// Pause between pointer moves, in milliseconds
    #[arg(long)]
    step_delay_ms: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

/// Why the check stopped short of success
enum Failure {
    Setup(String),
    Assertion(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(cli).await {
        Ok(Ok(())) => {
            println!("TEST PASSED: card moved and colored blue in In Progress");
            ExitCode::SUCCESS
        }
        Ok(Err(Failure::Setup(message))) => {
            eprintln!("{message}");
            ExitCode::from(EXIT_SETUP)
        }
        Ok(Err(Failure::Assertion(message))) => {
            eprintln!("TEST FAILED: {message}");
            ExitCode::from(EXIT_ASSERTION)
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(EXIT_SETUP)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Result<(), Failure>> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    if cli.all_backlog {
        config.board.seed_mode = SeedMode::AllBacklog;
    }
    if let Some(steps) = cli.steps {
        config.drag.steps = steps;
    }
    if let Some(delay) = cli.step_delay_ms {
        config.drag.step_delay_ms = delay;
    }
    if let Some(seed) = cli.seed {
        config.board.seed_file = Some(seed);
    }
    config.validate()?;

    let seeds = match &config.board.seed_file {
        Some(path) => JsonFileSeed::new(path).load().await,
        None => StaticSeed.load().await,
    }
    .context("loading seed data")?;

    let mut controller = BoardController::from_seed(&seeds, config.board.seed_mode)?;
    let mut tree = NodeTree::new();
    let mut view = BoardView::mount(&mut tree, config.layout)?;
    view.render(&mut tree, controller.store())?;
    tracing::info!(board = %config.board.name, cards = controller.store().len(), "board mounted");

    let mut drag = PointerDragController::new();
    controller.activate(view.container_handles(), &mut drag);

    let columns = view.containers(&tree);
    if columns.len() < 3 {
        return Ok(Err(Failure::Setup(format!(
            "Expected 3 swimlane columns, found {}",
            columns.len()
        ))));
    }

    let Some(card) = view.cards_in(&tree, Column::Backlog).first().copied() else {
        return Ok(Err(Failure::Setup("No card found in backlog to drag".to_string())));
    };
    let Some(card_id) = tree.declared_id(card).map(str::to_string) else {
        return Ok(Err(Failure::Setup("Backlog card carries no id".to_string())));
    };

    let target = view.container(Column::InProgress);
    let (Some(card_box), Some(target_box)) = (
        view.bounding_box(card),
        target.and_then(|t| view.bounding_box(t)),
    ) else {
        return Ok(Err(Failure::Setup("Could not get bounding boxes".to_string())));
    };

    let (start_x, start_y) = card_box.center();
    let end_x = target_box.x + target_box.width / 2.0;
    let end_y = target_box.y + (target_box.height / 2.0).max(20.0);

    let Some(pressed) = view.hit_test(start_x, start_y) else {
        return Ok(Err(Failure::Setup("Nothing under the card's center".to_string())));
    };
    if drag.press(&tree, pressed)?.is_none() {
        return Ok(Err(Failure::Setup(format!("Card {card_id} is not draggable"))));
    }

    let steps = config.drag.steps;
    let delay = Duration::from_millis(config.drag.step_delay_ms);
    for i in 1..=steps {
        let t = f64::from(i) / f64::from(steps);
        let x = start_x + (end_x - start_x) * t;
        let y = start_y + (end_y - start_y) * t;
        drag.hover(&tree, view.hit_test(x, y));
        tokio::time::sleep(delay).await;
    }
    drag.release(&mut tree)?;

    let handled = controller.pump(&tree);
    view.render(&mut tree, controller.store())?;
    tracing::info!(drops = handled, revision = controller.revision(), "drag finished");

    Ok(check(&tree, &view, controller.store(), &card_id))
}

fn check(tree: &NodeTree, view: &BoardView, store: &CardStore, card_id: &str) -> Result<(), Failure> {
    let in_backlog = store
        .column(Column::Backlog)
        .iter()
        .any(|c| c.id.as_str() == card_id);
    if in_backlog {
        return Err(Failure::Assertion(format!("card {card_id} is still in Backlog")));
    }

    let Some(node) = view
        .cards_in(tree, Column::InProgress)
        .into_iter()
        .find(|n| tree.declared_id(*n) == Some(card_id))
    else {
        return Err(Failure::Assertion(format!(
            "card {card_id} is not rendered in In Progress"
        )));
    };

    let classes = tree.classes(node).join(" ");
    println!("Moved card class: {classes}");
    if !tree.has_class(node, "Card-blue") {
        return Err(Failure::Assertion(format!(
            "card {card_id} did not update its color (class: {classes})"
        )));
    }
    Ok(())
}
