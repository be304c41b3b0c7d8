use super::*;

use kurosuwado_client::Input;
use kurosuwado_core::Square;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(clap::Subcommand)]
pub(super) enum BotCommand {
    Run {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value_t = 120)]
        duration_secs: u64,
        #[arg(long, default_value_t = 150)]
        think_min_ms: u64,
        #[arg(long, default_value_t = 900)]
        think_max_ms: u64,
        #[arg(long, default_value_t = 0.0)]
        mistake_rate: f32,
        #[arg(long, default_value_t = 0)]
        check_every: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub(super) async fn run(command: BotCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        BotCommand::Run {
            game,
            duration_secs,
            think_min_ms,
            think_max_ms,
            mistake_rate,
            check_every,
            seed,
        } => {
            let config = BotRunConfig {
                duration_secs,
                think_min_ms,
                think_max_ms: think_max_ms.max(think_min_ms),
                mistake_rate: mistake_rate.clamp(0.0, 1.0),
                check_every,
            };
            run_bot(game, config, seed).await
        }
    }
}

#[derive(Clone, Copy)]
struct BotRunConfig {
    duration_secs: u64,
    think_min_ms: u64,
    think_max_ms: u64,
    mistake_rate: f32,
    check_every: u32,
}

async fn run_bot(
    game: GameArgs,
    config: BotRunConfig,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let puzzle = fetch::fetch_puzzle(&game.api_base_url, &game.date).await?;
    let game_id = match game.game_id.as_deref() {
        Some(raw) => Some(GameId::parse(raw)?),
        None => None,
    };
    let mut session = Session::open(puzzle, game_id)?;

    let hub_url = build_hub_url(&game.ws_base_url)?;
    let (ws, _response) = connect_async(hub_url.as_str()).await?;
    let (mut write, mut read) = ws.split();
    flush_outbox(&mut session, &mut write).await?;

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    let started = tokio::time::Instant::now();
    let deadline = started + Duration::from_secs(config.duration_secs);
    let mut next_action_at = started + think_delay(&mut rng, config);
    let mut letters_typed = 0u32;
    let mut mistakes_made = 0u32;

    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                eprintln!("bot run hit the time limit after {letters_typed} letters");
                break;
            }
            _ = tick.tick() => {
                session.tick();
            }
            message = read.next() => {
                match message {
                    Some(Ok(Message::Binary(bytes))) => {
                        if let Some(msg) = decode::<ServerMsg>(&bytes) {
                            session.apply_server_msg(msg);
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        eprintln!("hub closed the connection: {frame:?}");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        eprintln!("websocket error: {err}");
                        break;
                    }
                    None => break,
                }
            }
            _ = tokio::time::sleep_until(next_action_at) => {
                if session.is_joined() && !session.is_completed() {
                    if let Some(mistake) = act_once(&mut session, &mut rng, config) {
                        letters_typed += 1;
                        if mistake {
                            mistakes_made += 1;
                        }
                        if config.check_every > 0 && letters_typed % config.check_every == 0 {
                            session.handle_input(Input::CheckErrors);
                        }
                    }
                }
                next_action_at = tokio::time::Instant::now() + think_delay(&mut rng, config);
            }
        }

        flush_outbox(&mut session, &mut write).await?;

        let mut done = false;
        for event in session.drain_events() {
            match event {
                SessionEvent::Solved { elapsed_secs } => {
                    println!(
                        "solved in {elapsed_secs}s ({letters_typed} letters, {mistakes_made} mistakes)"
                    );
                    done = true;
                }
                SessionEvent::UrlChanged { .. } => {
                    println!("join_path: {}", session.share_path());
                }
                SessionEvent::ConnectionFailed => {
                    eprintln!("hub refused the session; giving up");
                    done = true;
                }
                _ => {}
            }
        }
        if done || session.is_failed() {
            break;
        }
    }

    Ok(())
}

fn think_delay(rng: &mut StdRng, config: BotRunConfig) -> Duration {
    let ms = rng.random_range(config.think_min_ms..=config.think_max_ms);
    Duration::from_millis(ms)
}

// None once every cell already matches the solution.
fn act_once(session: &mut Session, rng: &mut StdRng, config: BotRunConfig) -> Option<bool> {
    let (row, col, answer) = next_target(session)?;
    session.handle_input(Input::Click { row, col });
    let mistake = config.mistake_rate > 0.0 && rng.random_range(0.0..1.0) < config.mistake_rate;
    let letter = if mistake {
        wrong_letter(rng, answer)
    } else {
        answer
    };
    session.handle_input(Input::Letter(letter));
    Some(mistake)
}

fn next_target(session: &Session) -> Option<(u8, u8, char)> {
    let puzzle = session.puzzle();
    let board = session.board();
    for entry in &puzzle.entries {
        for &(row, col) in &entry.cells {
            let answer = match puzzle.grid[row as usize][col as usize] {
                Square::Letter(ch) => ch,
                _ => continue,
            };
            if board.square(row, col) != Square::Letter(answer) {
                return Some((row, col, answer));
            }
        }
    }
    None
}

fn wrong_letter(rng: &mut StdRng, answer: char) -> char {
    loop {
        let candidate = (b'A' + rng.random_range(0..26u8)) as char;
        if candidate != answer {
            return candidate;
        }
    }
}
