use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::puzzle::Square;

pub type ConnectionId = u64;

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum ClientMsg {
    JoinGame { game_id: String },
    CreateGame { date: String },
    UpdateGrid,
    UpdatePlayerCursor { row: u8, col: u8 },
    // Square::Empty deletes; a letter enters it.
    UpdateCell { row: u8, col: u8, square: Square },
    UpdateErrors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct RemoteCursor {
    pub connection_id: ConnectionId,
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum ServerMsg {
    RegisterConnection { connection_id: ConnectionId },
    FailToConnect,
    UpdateUrl { game_id: String },
    RenderCursors { cursors: Vec<RemoteCursor> },
    RenderGrid {
        grid: Vec<Vec<Square>>,
        errors: Vec<Vec<bool>>,
    },
}

pub fn encode<T>(value: &T) -> Option<Vec<u8>>
where
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    rkyv::to_bytes::<Error>(value)
        .ok()
        .map(|bytes| bytes.into_vec())
}

pub fn decode<T>(bytes: &[u8]) -> Option<T>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    rkyv::from_bytes::<T, Error>(bytes).ok()
}
