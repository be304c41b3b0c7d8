use std::collections::HashMap;

use kurosuwado_core::{ConnectionId, RemoteCursor};

// Never holds the local connection's own entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorRegistry {
    cursors: HashMap<ConnectionId, (u8, u8)>,
}

impl CursorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_excluding(&mut self, cursors: &[RemoteCursor], local: Option<ConnectionId>) {
        self.cursors.clear();
        for cursor in cursors {
            if Some(cursor.connection_id) == local {
                continue;
            }
            self.cursors
                .insert(cursor.connection_id, (cursor.row, cursor.col));
        }
    }

    pub fn position(&self, connection_id: ConnectionId) -> Option<(u8, u8)> {
        self.cursors.get(&connection_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, (u8, u8))> + '_ {
        self.cursors.iter().map(|(id, pos)| (*id, *pos))
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
