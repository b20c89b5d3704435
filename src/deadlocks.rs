use crate::board::Board;

/// Heuristic check for configurations that can never reach a solved state.
///
/// Sound but incomplete: a position flagged here is genuinely unsolvable,
/// but many real deadlocks slip through because only single boxes and
/// adjacent pairs are examined. The solver treats this purely as a pruning
/// aid; disabling it changes search effort, never verdicts.
pub fn is_deadlocked(board: &Board) -> bool {
    for row in 0..board.height() as i32 {
        for col in 0..board.width() as i32 {
            // Boxes already on goals never count as stuck.
            if board.has_box(col, row)
                && !board.has_goal(col, row)
                && box_is_stuck(board, col, row)
            {
                return true;
            }
        }
    }
    false
}

fn box_is_stuck(board: &Board, col: i32, row: i32) -> bool {
    let wall_l = board.has_wall(col - 1, row);
    let wall_r = board.has_wall(col + 1, row);
    let wall_t = board.has_wall(col, row - 1);
    let wall_b = board.has_wall(col, row + 1);

    // Corner rule: walls on two perpendicular sides pin the box for good.
    if (wall_l || wall_r) && (wall_t || wall_b) {
        return true;
    }

    let loose_box = |c, r| board.has_box(c, r) && !board.has_goal(c, r);

    // Adjacent-pair rule: two non-goaled boxes side by side, with walls
    // flanking both on the same perpendicular side, can never separate.
    //   ...[col-1, row-1][col, row-1][col+1, row-1]...
    //   ...[col-1, row  ][col, row  ][col+1, row  ]...
    //   ...[col-1, row+1][col, row+1][col+1, row+1]...
    if loose_box(col - 1, row)
        && ((wall_t && board.has_wall(col - 1, row - 1))
            || (wall_b && board.has_wall(col - 1, row + 1)))
    {
        return true;
    }
    if loose_box(col + 1, row)
        && ((wall_t && board.has_wall(col + 1, row - 1))
            || (wall_b && board.has_wall(col + 1, row + 1)))
    {
        return true;
    }
    if loose_box(col, row - 1)
        && ((wall_l && board.has_wall(col - 1, row - 1))
            || (wall_r && board.has_wall(col + 1, row - 1)))
    {
        return true;
    }
    if loose_box(col, row + 1)
        && ((wall_l && board.has_wall(col - 1, row + 1))
            || (wall_r && board.has_wall(col + 1, row + 1)))
    {
        return true;
    }

    // Frozen-wall-run rule: a box flush against a wall can only slide
    // along it, so a goal-free run capped by corners at both ends is dead.
    (wall_l && wall_run_blocked(board, col, row, -1, 0))
        || (wall_r && wall_run_blocked(board, col, row, 1, 0))
        || (wall_t && wall_run_blocked(board, col, row, 0, -1))
        || (wall_b && wall_run_blocked(board, col, row, 0, 1))
}

/// Scan outward from the box along its own line, hugging the wall line
/// offset by `(wall_dx, wall_dy)`. One end is blocked when the wall line
/// stays solid all the way to a wall across the box's own line, with no
/// goal encountered first. A gap in the wall line, a goal, or the board
/// edge leaves that end open.
fn wall_run_blocked(board: &Board, col: i32, row: i32, wall_dx: i32, wall_dy: i32) -> bool {
    let (step_dx, step_dy) = if wall_dy != 0 { (1, 0) } else { (0, 1) };
    let limit = if wall_dy != 0 {
        board.width() as i32
    } else {
        board.height() as i32
    };

    let mut blocked = [false; 2];
    for (end, sign) in [-1i32, 1].into_iter().enumerate() {
        for i in 1..limit {
            let c = col + step_dx * sign * i;
            let r = row + step_dy * sign * i;
            if c < 0 || r < 0 || c >= board.width() as i32 || r >= board.height() as i32 {
                break;
            }
            if !board.has_wall(c + wall_dx, r + wall_dy) {
                break;
            }
            if board.has_goal(c, r) {
                break;
            }
            if board.has_wall(c, r) {
                blocked[end] = true;
                break;
            }
        }
    }
    blocked[0] && blocked[1]
}
