use std::fmt;

pub const MAX_SIZE: usize = 64;
pub const MAX_BOXES: usize = 32;

/// Bitset of the flags a single cell can carry. Walls and goals are
/// permanent terrain; the box and player flags move during play. A cell
/// may hold a box or the player on top of a goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell(u8);

impl Cell {
    pub const WALL: Cell = Cell(1 << 0);
    pub const BOX: Cell = Cell(1 << 1);
    pub const GOAL: Cell = Cell(1 << 2);
    pub const PLAYER: Cell = Cell(1 << 3);

    pub fn has(self, flag: Cell) -> bool {
        self.0 & flag.0 != 0
    }

    fn set(&mut self, flag: Cell) {
        self.0 |= flag.0;
    }

    fn clear(&mut self, flag: Cell) {
        self.0 &= !flag.0;
    }
}

/// (column, row) pair.
pub type Position = (u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Fixed enumeration order; the solver's determinism depends on it.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    // Row-major cell flags; all access goes through index().
    cells: Vec<Cell>,
    player: Position,
}

impl Board {
    /// Parse a board from text format.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - ` ` = Floor (empty space)
    /// - `.` = Goal (target location for boxes)
    /// - `$` = Box
    /// - `@` = Player
    /// - `*` = Box on goal
    /// - `+` = Player on goal
    pub fn from_text(text: &str) -> Result<Self, String> {
        let lines: Vec<&str> = text.lines().collect();

        if lines.is_empty() {
            return Err("Empty board".to_string());
        }

        let height = lines.len();
        let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);

        if width > MAX_SIZE {
            return Err(format!(
                "Board width {} exceeds maximum size {}",
                width, MAX_SIZE
            ));
        }
        if height > MAX_SIZE {
            return Err(format!(
                "Board height {} exceeds maximum size {}",
                height, MAX_SIZE
            ));
        }

        let mut cells = vec![Cell::default(); width * height];
        let mut player_pos = None;
        let mut box_count = 0usize;
        let mut goal_count = 0usize;

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let cell = &mut cells[y * width + x];
                match ch {
                    '#' => cell.set(Cell::WALL),
                    ' ' => {}
                    '.' => {
                        cell.set(Cell::GOAL);
                        goal_count += 1;
                    }
                    '$' => {
                        cell.set(Cell::BOX);
                        box_count += 1;
                    }
                    '*' => {
                        cell.set(Cell::BOX);
                        cell.set(Cell::GOAL);
                        box_count += 1;
                        goal_count += 1;
                    }
                    '@' | '+' => {
                        if player_pos.is_some() {
                            return Err("Multiple players found".to_string());
                        }
                        player_pos = Some((x as u8, y as u8));
                        cell.set(Cell::PLAYER);
                        if ch == '+' {
                            cell.set(Cell::GOAL);
                            goal_count += 1;
                        }
                    }
                    _ => {
                        return Err(format!(
                            "Invalid character '{}' at position ({}, {})",
                            ch, x, y
                        ));
                    }
                }
            }
        }

        let player_pos = player_pos.ok_or("No player found on board")?;

        // Validate that the number of goals matches the number of boxes
        if goal_count != box_count {
            return Err(format!(
                "Goal count ({}) does not match box count ({})",
                goal_count, box_count
            ));
        }
        if box_count > MAX_BOXES {
            return Err(format!(
                "Box count {} exceeds maximum of {}",
                box_count, MAX_BOXES
            ));
        }

        Ok(Board {
            width: width as u8,
            height: height as u8,
            cells,
            player: player_pos,
        })
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn player(&self) -> Position {
        self.player
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.0 < self.width && pos.1 < self.height,
            "position ({}, {}) out of bounds",
            pos.0,
            pos.1
        );
        pos.1 as usize * self.width as usize + pos.0 as usize
    }

    pub fn cell_at(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// Cell flags at signed coordinates; everything outside the grid reads
    /// as empty (no wall, no goal, no box). The deadlock scans rely on this.
    fn flags_at(&self, col: i32, row: i32) -> Cell {
        if col >= 0 && row >= 0 && col < self.width as i32 && row < self.height as i32 {
            self.cell_at((col as u8, row as u8))
        } else {
            Cell::default()
        }
    }

    pub fn has_wall(&self, col: i32, row: i32) -> bool {
        self.flags_at(col, row).has(Cell::WALL)
    }

    pub fn has_box(&self, col: i32, row: i32) -> bool {
        self.flags_at(col, row).has(Cell::BOX)
    }

    pub fn has_goal(&self, col: i32, row: i32) -> bool {
        self.flags_at(col, row).has(Cell::GOAL)
    }

    pub fn box_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has(Cell::BOX)).count()
    }

    /// Check if all boxes are on goals (win condition)
    pub fn is_solved(&self) -> bool {
        self.cells
            .iter()
            .all(|c| !c.has(Cell::BOX) || c.has(Cell::GOAL))
    }

    /// Step from `pos` in the given direction.
    /// Returns `None` if the destination lies outside the grid.
    fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let new_x = pos.0 as i32 + dx as i32;
        let new_y = pos.1 as i32 + dy as i32;

        if new_x >= 0 && new_y >= 0 && new_x < self.width as i32 && new_y < self.height as i32 {
            Some((new_x as u8, new_y as u8))
        } else {
            None
        }
    }

    /// Attempt one player step in `dir`, pushing at most one box along.
    /// Returns the successor board on success; the receiver is never
    /// modified. Validation completes before anything is written, so the
    /// multi-cell update is all-or-nothing.
    pub fn try_move(&self, dir: Direction) -> Option<Board> {
        let dest = self.step(self.player, dir)?;
        let dest_cell = self.cell_at(dest);
        if dest_cell.has(Cell::WALL) {
            return None;
        }

        // A box at the destination must move one further cell in the same
        // direction. Only a single box can be pushed, never a chain.
        let push_dest = if dest_cell.has(Cell::BOX) {
            let beyond = self.step(dest, dir)?;
            let beyond_cell = self.cell_at(beyond);
            if beyond_cell.has(Cell::WALL) || beyond_cell.has(Cell::BOX) {
                return None;
            }
            Some(beyond)
        } else {
            None
        };

        let mut next = self.clone();
        let source = next.player;
        next.cell_mut(source).clear(Cell::PLAYER);
        if let Some(beyond) = push_dest {
            next.cell_mut(dest).clear(Cell::BOX);
            next.cell_mut(beyond).set(Cell::BOX);
        }
        next.cell_mut(dest).set(Cell::PLAYER);
        next.player = dest;
        Some(next)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let mut line = String::new();
            for x in 0..self.width {
                let cell = self.cell_at((x, y));

                let ch = if cell.has(Cell::PLAYER) {
                    if cell.has(Cell::GOAL) { '+' } else { '@' }
                } else if cell.has(Cell::BOX) {
                    if cell.has(Cell::GOAL) { '*' } else { '$' }
                } else if cell.has(Cell::WALL) {
                    '#'
                } else if cell.has(Cell::GOAL) {
                    '.'
                } else {
                    ' '
                };
                line.push(ch);
            }
            // Trim trailing spaces to match original input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_board() {
        let input = "####\n\
                     # .#\n\
                     #  ###\n\
                     #*@  #\n\
                     #  $ #\n\
                     #  ###\n\
                     ####";
        let board = Board::from_text(input).unwrap();

        assert_eq!(board.width(), 6);
        assert_eq!(board.height(), 7);
        assert_eq!(board.player(), (2, 3));
        assert_eq!(board.box_count(), 2);
    }

    #[test]
    fn test_no_player() {
        let input = "####\n\
                     #  #\n\
                     ####";
        assert!(Board::from_text(input).is_err());
    }

    #[test]
    fn test_multiple_players() {
        let input = "####\n\
                     #@@#\n\
                     ####";
        assert!(Board::from_text(input).is_err());
    }

    #[test]
    fn test_player_on_goal() {
        let input = "####\n\
                     #$+ #\n\
                     #$. #\n\
                     ####";
        let board = Board::from_text(input).unwrap();
        assert_eq!(board.player(), (2, 1));
        assert!(board.cell_at((2, 1)).has(Cell::GOAL));
        assert!(board.cell_at((2, 1)).has(Cell::PLAYER));
    }

    #[test]
    fn test_goal_box_count_validation() {
        // More goals than boxes - should fail
        let more_goals = "####\n\
                          #..#\n\
                          # $@#\n\
                          ####";
        assert!(Board::from_text(more_goals).is_err());

        // More boxes than goals - should fail
        let more_boxes = "####\n\
                          #$$#\n\
                          # .@#\n\
                          ####";
        assert!(Board::from_text(more_boxes).is_err());

        // Equal goals and boxes - should succeed
        let balanced = "####\n\
                        #$.#\n\
                        # * #\n\
                        # @#\n\
                        ####";
        assert!(Board::from_text(balanced).is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        let input = "####\n\
                     # .#\n\
                     #  ###\n\
                     #*@  #\n\
                     #  $ #\n\
                     #  ###\n\
                     ####";
        let board = Board::from_text(input).unwrap();
        assert_eq!(board.to_string().trim_end(), input);
    }

    #[test]
    fn test_is_solved() {
        let solved = "####\n\
                      #*@#\n\
                      ####";
        let board = Board::from_text(solved).unwrap();
        assert!(board.is_solved());

        let unsolved = "####\n\
                        #$.#\n\
                        # @#\n\
                        ####";
        let board = Board::from_text(unsolved).unwrap();
        assert!(!board.is_solved());
    }

    #[test]
    fn test_exterior_reads_empty() {
        let board = Board::from_text("@$.").unwrap();
        assert!(!board.has_wall(-1, 0));
        assert!(!board.has_wall(0, -1));
        assert!(!board.has_goal(3, 1));
        assert!(!board.has_box(-1, -1));
    }

    #[test]
    fn test_move_into_floor() {
        let input = "#####\n\
                     #@ *#\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        let next = board.try_move(Direction::Right).unwrap();
        assert_eq!(next.player(), (2, 1));
        assert!(!next.cell_at((1, 1)).has(Cell::PLAYER));
        assert!(next.cell_at((2, 1)).has(Cell::PLAYER));
    }

    #[test]
    fn test_move_into_wall() {
        let input = "#####\n\
                     #@ *#\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        assert!(board.try_move(Direction::Up).is_none());
        assert!(board.try_move(Direction::Left).is_none());
    }

    #[test]
    fn test_move_off_grid() {
        // No enclosing walls: stepping over the edge must fail cleanly.
        let board = Board::from_text("@$.").unwrap();
        assert!(board.try_move(Direction::Up).is_none());
        assert!(board.try_move(Direction::Down).is_none());
        assert!(board.try_move(Direction::Left).is_none());
    }

    #[test]
    fn test_push_off_grid() {
        // Box on the edge cell: the push destination is out of bounds.
        let board = Board::from_text(".@$").unwrap();
        assert!(board.try_move(Direction::Right).is_none());
    }

    #[test]
    fn test_push_onto_goal_solves() {
        let input = "#####\n\
                     #@$.#\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        assert!(!board.is_solved());

        let next = board.try_move(Direction::Right).unwrap();
        assert_eq!(next.player(), (2, 1));
        assert!(next.cell_at((3, 1)).has(Cell::BOX));
        assert!(next.cell_at((3, 1)).has(Cell::GOAL));
        assert!(!next.cell_at((2, 1)).has(Cell::BOX));
        assert!(next.is_solved());
    }

    #[test]
    fn test_push_all_directions() {
        let cases = [
            (Direction::Right, "####\n#@$ #\n# . #\n####", (3, 1)),
            (Direction::Down, "#####\n# @ #\n# $ #\n# . #\n#####", (2, 3)),
            (Direction::Left, "####\n# $@#\n# . #\n####", (1, 1)),
            (Direction::Up, "#####\n# . #\n# $ #\n# @ #\n#####", (2, 1)),
        ];
        for (dir, input, box_dest) in cases {
            let board = Board::from_text(input).unwrap();
            let next = board.try_move(dir).unwrap();
            assert!(
                next.cell_at(box_dest).has(Cell::BOX),
                "box missing after push {}",
                dir
            );
        }
    }

    #[test]
    fn test_push_off_goal_keeps_goal_terrain() {
        let input = "#####\n\
                     #@*  #\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        assert!(board.is_solved());

        let next = board.try_move(Direction::Right).unwrap();
        // The goal flag stays on the vacated cell; only the box moved.
        assert!(next.cell_at((2, 1)).has(Cell::GOAL));
        assert!(!next.cell_at((2, 1)).has(Cell::BOX));
        assert!(next.cell_at((3, 1)).has(Cell::BOX));
        assert!(!next.is_solved());
    }

    #[test]
    fn test_push_blocked_by_wall() {
        let input = "#####\n\
                     #@$##\n\
                     # . #\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        assert!(board.try_move(Direction::Right).is_none());
    }

    #[test]
    fn test_push_blocked_by_second_box() {
        let input = "#######\n\
                     #@$$  #\n\
                     # ..  #\n\
                     #######";
        let board = Board::from_text(input).unwrap();
        assert!(board.try_move(Direction::Right).is_none());
    }

    #[test]
    fn test_try_move_leaves_input_unchanged() {
        let input = "#####\n\
                     #@$.#\n\
                     #####";
        let board = Board::from_text(input).unwrap();
        let snapshot = board.clone();

        let _ = board.try_move(Direction::Right);
        let _ = board.try_move(Direction::Up);
        assert_eq!(board, snapshot);
    }
}
