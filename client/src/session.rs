use tracing::{debug, warn};

use kurosuwado_core::{
    Board, ClientMsg, ConnectionId, Direction, GameId, NavigationState, Puzzle, PuzzleError,
    ServerMsg, Square,
};

use crate::cursors::CursorRegistry;
use crate::urls::session_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Letter(char),
    Backspace,
    Tab,
    Space,
    Arrow(Direction),
    Click { row: u8, col: u8 },
    ClueClick { name: String },
    CheckErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Joined { connection_id: ConnectionId },
    UrlChanged { game_id: String },
    GridChanged,
    CursorsChanged,
    Solved { elapsed_secs: u64 },
    ConnectionFailed,
}

#[derive(Debug, Clone, Copy, Default)]
struct SolveTimer {
    running: bool,
    elapsed_secs: u64,
}

pub struct Session {
    puzzle: Puzzle,
    board: Board,
    nav: NavigationState,
    cursors: CursorRegistry,
    game_id: Option<GameId>,
    connection_id: Option<ConnectionId>,
    joined: bool,
    completed: bool,
    failed: bool,
    timer: SolveTimer,
    outbox: Vec<ClientMsg>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn open(puzzle: Puzzle, game_id: Option<GameId>) -> Result<Self, PuzzleError> {
        puzzle.validate()?;
        let board = Board::new(&puzzle);
        let first_msg = match &game_id {
            Some(id) => {
                debug!(game_id = %id, "joining existing game");
                ClientMsg::JoinGame {
                    game_id: id.to_string(),
                }
            }
            None => {
                debug!(date = %puzzle.date, "creating new game");
                ClientMsg::CreateGame {
                    date: puzzle.date.clone(),
                }
            }
        };
        Ok(Self {
            puzzle,
            board,
            nav: NavigationState::default(),
            cursors: CursorRegistry::new(),
            game_id,
            connection_id: None,
            joined: false,
            completed: false,
            failed: false,
            timer: SolveTimer::default(),
            outbox: vec![first_msg],
            events: Vec::new(),
        })
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn nav(&self) -> NavigationState {
        self.nav
    }

    pub fn active_position(&self) -> (u8, u8) {
        self.nav.position(&self.puzzle)
    }

    pub fn cursors(&self) -> &CursorRegistry {
        &self.cursors
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection_id
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs
    }

    pub fn share_path(&self) -> String {
        session_path(&self.puzzle.date, self.game_id.as_ref())
    }

    pub fn drain_outbox(&mut self) -> Vec<ClientMsg> {
        std::mem::take(&mut self.outbox)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn handle_input(&mut self, input: Input) {
        if self.failed {
            return;
        }
        let before = self.nav.position(&self.puzzle);
        match input {
            Input::Letter(ch) => self.enter_letter(ch),
            Input::Backspace => self.erase_letter(),
            Input::Tab => self.nav = self.nav.next_entry(&self.puzzle),
            Input::Space => self.nav = self.nav.toggle_orientation(&self.puzzle),
            Input::Arrow(direction) => {
                self.nav = self.nav.step_directional(&self.puzzle, direction);
            }
            Input::Click { row, col } => {
                if let Ok(next) = self.nav.go_to_cell(&self.puzzle, row, col) {
                    self.nav = next;
                }
            }
            Input::ClueClick { name } => {
                if let Ok(next) = self.nav.go_to_entry(&self.puzzle, &name) {
                    self.nav = next;
                }
            }
            Input::CheckErrors => self.send(ClientMsg::UpdateErrors),
        }
        let after = self.nav.position(&self.puzzle);
        if after != before {
            self.send_cursor(after);
        }
        self.evaluate_win();
    }

    fn enter_letter(&mut self, ch: char) {
        if self.completed {
            return;
        }
        let Some(square) = Square::from_letter(ch) else {
            return;
        };
        let (row, col) = self.nav.position(&self.puzzle);
        if !self.board.set_square(row, col, square) {
            return;
        }
        self.timer.running = true;
        self.send(ClientMsg::UpdateCell { row, col, square });
        self.nav = self.nav.advance_for_letter(&self.puzzle);
    }

    fn erase_letter(&mut self) {
        if self.completed {
            return;
        }
        let (row, col) = self.nav.position(&self.puzzle);
        if self.board.clear_square(row, col) {
            self.send(ClientMsg::UpdateCell {
                row,
                col,
                square: Square::Empty,
            });
        }
        self.nav = self.nav.retreat_for_backspace(&self.puzzle);
    }

    pub fn apply_server_msg(&mut self, msg: ServerMsg) {
        if self.failed {
            return;
        }
        match msg {
            ServerMsg::RegisterConnection { connection_id } => {
                debug!(connection_id, "connection registered");
                let first = self.connection_id.is_none();
                self.connection_id = Some(connection_id);
                self.joined = true;
                if first {
                    self.send(ClientMsg::UpdateGrid);
                }
                self.push_event(SessionEvent::Joined { connection_id });
            }
            ServerMsg::FailToConnect => {
                warn!("session refused by authority; local mutation disabled");
                self.failed = true;
                self.timer.running = false;
                self.push_event(SessionEvent::ConnectionFailed);
            }
            ServerMsg::UpdateUrl { game_id } => {
                match GameId::parse(&game_id) {
                    Ok(id) => self.game_id = Some(id),
                    Err(err) => warn!(%game_id, %err, "authority sent malformed game id"),
                }
                self.push_event(SessionEvent::UrlChanged { game_id });
            }
            ServerMsg::RenderCursors { cursors } => {
                self.cursors.replace_excluding(&cursors, self.connection_id);
                self.push_event(SessionEvent::CursorsChanged);
            }
            ServerMsg::RenderGrid { grid, errors } => {
                if self.board.replace(&grid, &errors) {
                    debug!("authoritative grid applied");
                    self.push_event(SessionEvent::GridChanged);
                    self.evaluate_win();
                } else {
                    warn!("authoritative grid dropped (dimension mismatch)");
                }
            }
        }
    }

    pub fn tick(&mut self) {
        if self.timer.running && !self.completed && !self.failed {
            self.timer.elapsed_secs += 1;
        }
    }

    fn send(&mut self, msg: ClientMsg) {
        self.outbox.push(msg);
    }

    // Dropped before registration, never queued.
    fn send_cursor(&mut self, (row, col): (u8, u8)) {
        if self.connection_id.is_none() {
            debug!("cursor broadcast dropped (not registered yet)");
            return;
        }
        self.send(ClientMsg::UpdatePlayerCursor { row, col });
    }

    // Completion is monotonic.
    fn evaluate_win(&mut self) {
        if self.completed || !self.board.is_solved(&self.puzzle) {
            return;
        }
        self.completed = true;
        self.timer.running = false;
        self.push_event(SessionEvent::Solved {
            elapsed_secs: self.timer.elapsed_secs,
        });
    }

    fn push_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }
}
