pub mod board;

pub use board::{Board, ScrabbleBoard, WordPlayBoard};
