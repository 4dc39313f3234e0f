use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use connect_four::ai::MinimaxAgent;
use connect_four::config::{AppConfig, Difficulty, FirstPlayer};
use connect_four::error::MoveError;
use connect_four::game::{GameOutcome, GameState, Player};

/// Play Connect Four against a minimax opponent in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Difficulty: easy, medium or hard
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// Override the search depth in plies
    #[arg(long)]
    depth: Option<usize>,

    /// Seed for the AI's tie-breaks and the starting player
    #[arg(long)]
    seed: Option<u64>,

    /// Who moves first: random, human or ai
    #[arg(long, value_parser = parse_first_player)]
    first: Option<FirstPlayer>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    match s.to_ascii_lowercase().as_str() {
        "easy" | "shallow" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" | "deep" => Ok(Difficulty::Hard),
        other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
    }
}

fn parse_first_player(s: &str) -> Result<FirstPlayer, String> {
    match s.to_ascii_lowercase().as_str() {
        "random" => Ok(FirstPlayer::Random),
        "human" => Ok(FirstPlayer::Human),
        "ai" => Ok(FirstPlayer::Ai),
        other => Err(format!("unknown first player '{other}' (expected random, human or ai)")),
    }
}

/// What the human typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Column(usize),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }
    // Columns are shown 1-based
    match line.parse::<usize>() {
        Ok(n) if n >= 1 => Some(Command::Column(n - 1)),
        _ => None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(difficulty) = cli.difficulty {
        config.ai.difficulty = difficulty;
        config.ai.depth = None;
    }
    if cli.depth.is_some() {
        config.ai.depth = cli.depth;
    }
    if cli.seed.is_some() {
        config.ai.seed = cli.seed;
    }
    if let Some(first) = cli.first {
        config.game.first_player = first;
    }
    config.validate().context("invalid settings")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    play(&config, &mut input, &mut output)
}

/// Play rounds until the human quits or declines another game.
fn play<R: BufRead, W: Write>(config: &AppConfig, input: &mut R, out: &mut W) -> Result<()> {
    let mut rng = match config.ai.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    loop {
        let first = config.game.first_player.resolve(&mut rng);
        let mut agent = match config.ai.seed {
            Some(seed) => MinimaxAgent::with_seed(config.ai.search_depth(), seed),
            None => MinimaxAgent::new(config.ai.search_depth()),
        };
        tracing::info!(
            difficulty = config.ai.difficulty.name(),
            depth = agent.depth(),
            first = first.name(),
            "new game"
        );

        let Some(outcome) = play_game(first, &mut agent, input, out)? else {
            return Ok(());
        };
        tracing::info!(?outcome, "game over");

        write!(out, "Play again? [y/N] ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || !line.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

/// Run one game to completion. Returns `None` if the human quit.
fn play_game<R: BufRead, W: Write>(
    first: Player,
    agent: &mut MinimaxAgent,
    input: &mut R,
    out: &mut W,
) -> Result<Option<GameOutcome>> {
    let mut state = GameState::initial(first);
    writeln!(out, "\n{} moves first.", first.name())?;

    while !state.is_terminal() {
        writeln!(out, "\n{}\n", state.board())?;

        match state.current_player() {
            Player::Human => {
                write!(out, "Your move (1-7, q to quit): ")?;
                out.flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                match parse_command(&line) {
                    Some(Command::Quit) => return Ok(None),
                    Some(Command::Column(col)) => match state.apply_move_mut(col) {
                        Ok(_) => {}
                        Err(MoveError::InvalidColumn(_)) => {
                            writeln!(out, "Column {} is not playable.", col + 1)?;
                        }
                        Err(e) => return Err(e.into()),
                    },
                    None => writeln!(out, "Enter a column number.")?,
                }
            }
            Player::Ai => {
                let col = agent
                    .choose_move(state.board())
                    .context("ai search failed")?;
                state.apply_move_mut(col)?;
                writeln!(out, "AI plays column {}.", col + 1)?;
            }
        }
    }

    writeln!(out, "\n{}\n", state.board())?;
    let outcome = state.outcome().context("terminal game has no outcome")?;
    match outcome {
        GameOutcome::Winner(Player::Human) => writeln!(out, "Player 1 wins!")?,
        GameOutcome::Winner(Player::Ai) => writeln!(out, "AI wins!")?,
        GameOutcome::Draw => writeln!(out, "It's a draw!")?,
    }
    Ok(Some(outcome))
}
