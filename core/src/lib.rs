pub mod board;
pub mod game_id;
pub mod nav;
pub mod protocol;
pub mod puzzle;

pub use board::Board;
pub use game_id::{GameId, GameIdError, GAME_ID_ALPHABET, GAME_ID_LEN};
pub use nav::{Direction, NavError, NavigationState};
pub use protocol::{decode, encode, ClientMsg, ConnectionId, RemoteCursor, ServerMsg};
pub use puzzle::{Entry, Orientation, Puzzle, PuzzleError, Square};
