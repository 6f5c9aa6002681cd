//! Persisted board entities.
//!
//! Both entities share one shape: a caller-assigned 64-bit id stored as the
//! document `_id`, and the serialized board layout as an opaque string.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A board entity stored in its own collection.
pub trait Board:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + std::fmt::Debug + 'static
{
    /// Collection name: the uncapitalized type name.
    const COLLECTION: &'static str;

    fn new(id: i64, board: impl Into<String>) -> Self;

    fn id(&self) -> i64;

    fn board(&self) -> &str;

    fn set_board(&mut self, board: impl Into<String>);
}

macro_rules! board_entity {
    ($(#[$meta:meta])* $name:ident, $collection:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "_id")]
            pub id: i64,
            pub board: String,
        }

        impl Board for $name {
            const COLLECTION: &'static str = $collection;

            fn new(id: i64, board: impl Into<String>) -> Self {
                Self {
                    id,
                    board: board.into(),
                }
            }

            fn id(&self) -> i64 {
                self.id
            }

            fn board(&self) -> &str {
                &self.board
            }

            fn set_board(&mut self, board: impl Into<String>) {
                self.board = board.into();
            }
        }
    };
}

board_entity!(
    /// A Scrabble board layout.
    ScrabbleBoard,
    "scrabbleBoard"
);

board_entity!(
    /// A word-play board layout.
    WordPlayBoard,
    "wordPlayBoard"
);
