use crate::board::{Board, Cell, MAX_BOXES, Position};
use arrayvec::ArrayVec;

/// History-independent identifier for a board configuration: the player's
/// position followed by every box position, collected in one row-major
/// scan. Two boards with identical player and box placement always produce
/// the same signature, no matter which move sequences reached them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    player: u16,
    boxes: ArrayVec<u16, MAX_BOXES>,
}

// Grid dimensions are capped at 64, so a packed position fits a byte each way.
fn pack(pos: Position) -> u16 {
    ((pos.1 as u16) << 8) | pos.0 as u16
}

impl Signature {
    pub fn of(board: &Board) -> Signature {
        let mut boxes = ArrayVec::new();
        for row in 0..board.height() as u8 {
            for col in 0..board.width() as u8 {
                if board.cell_at((col, row)).has(Cell::BOX) {
                    boxes.push(pack((col, row)));
                }
            }
        }
        Signature {
            player: pack(board.player()),
            boxes,
        }
    }
}
