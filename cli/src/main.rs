mod bot;
mod fetch;

use clap::{Args, Parser, Subcommand};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use kurosuwado_client::{build_hub_url, Session, SessionEvent};
use kurosuwado_core::{decode, encode, ClientMsg, GameId, ServerMsg, GAME_ID_ALPHABET, GAME_ID_LEN};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

#[derive(Parser)]
#[command(
    name = "kurosuwado",
    version,
    about = "Collaborative crossword client and solver bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Games {
        #[command(subcommand)]
        command: GamesCommand,
    },
    Bot {
        #[command(subcommand)]
        command: bot::BotCommand,
    },
}

#[derive(Subcommand)]
enum GamesCommand {
    Create {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Args, Clone)]
pub(crate) struct GameArgs {
    #[arg(
        long,
        env = "CROSSWORD_WS_BASE_URL",
        default_value = "ws://localhost:8787/ws"
    )]
    pub(crate) ws_base_url: String,
    #[arg(
        long,
        env = "CROSSWORD_API_BASE_URL",
        default_value = "http://localhost:8787"
    )]
    pub(crate) api_base_url: String,
    #[arg(long)]
    pub(crate) date: String,
    #[arg(long)]
    pub(crate) game_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Games { command } => match command {
            GamesCommand::Create { game, offline } => create_game(game, offline).await,
        },
        Commands::Bot { command } => bot::run(command).await,
    }
}

async fn create_game(game: GameArgs, offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    if offline {
        let game_id = match game.game_id.as_deref() {
            Some(raw) => GameId::parse(raw)?,
            None => GameId::parse(&generate_game_id())?,
        };
        println!("game_id: {game_id}");
        println!(
            "join_path: {}",
            kurosuwado_client::session_path(&game.date, Some(&game_id))
        );
        return Ok(());
    }

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

    let deadline = Duration::from_secs(5);
    loop {
        let Some(msg) = recv_with_timeout(&mut read, deadline).await else {
            return Err("no answer from hub while creating game".into());
        };
        session.apply_server_msg(msg);
        flush_outbox(&mut session, &mut write).await?;
        for event in session.drain_events() {
            match event {
                SessionEvent::UrlChanged { game_id } => {
                    println!("game_id: {game_id}");
                    println!("join_path: {}", session.share_path());
                    return Ok(());
                }
                SessionEvent::Joined { connection_id } => {
                    println!("connection_id: {connection_id}");
                    if session.game_id().is_some() {
                        println!("join_path: {}", session.share_path());
                        return Ok(());
                    }
                }
                SessionEvent::ConnectionFailed => {
                    return Err("hub refused the session".into());
                }
                _ => {}
            }
        }
    }
}

pub(crate) fn generate_game_id() -> String {
    let mut rng = rand::rng();
    let alphabet = GAME_ID_ALPHABET.as_bytes();
    let mut id = String::with_capacity(GAME_ID_LEN);
    for _ in 0..GAME_ID_LEN {
        let idx = rng.random_range(0..alphabet.len());
        id.push(alphabet[idx] as char);
    }
    id
}

pub(crate) async fn flush_outbox(
    session: &mut Session,
    write: &mut WsWrite,
) -> Result<(), Box<dyn std::error::Error>> {
    for msg in session.drain_outbox() {
        send_client_msg(write, msg).await?;
    }
    Ok(())
}

pub(crate) async fn send_client_msg(
    write: &mut WsWrite,
    msg: ClientMsg,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bytes) = encode(&msg) {
        write.send(Message::Binary(bytes.into())).await?;
    }
    Ok(())
}

pub(crate) async fn recv_server_msg(read: &mut WsRead) -> Option<ServerMsg> {
    while let Some(message) = read.next().await {
        let Ok(message) = message else {
            continue;
        };
        match message {
            Message::Binary(bytes) => {
                if let Some(msg) = decode::<ServerMsg>(&bytes) {
                    return Some(msg);
                }
            }
            Message::Close(_) => return None,
            _ => {}
        }
    }
    None
}

pub(crate) async fn recv_with_timeout(read: &mut WsRead, dur: Duration) -> Option<ServerMsg> {
    match timeout(dur, recv_server_msg(read)).await {
        Ok(msg) => msg,
        Err(_) => None,
    }
}
