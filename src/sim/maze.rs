//! Grid maze: discrete movement, wall collision and key pickup

use thiserror::Error;

use crate::consts::GRID_SIZE;
use crate::section::Section;
use crate::unlock::UnlockState;

/// Built-in maze, one string per row. `W` wall, `P` path, `D` door, `K` key.
pub const MAZE_LAYOUT: [&str; GRID_SIZE] = [
    "WWWWWWWWDWWWWWWWW",
    "WPPPPPPPPPPPPPPPW",
    "WPWWWWWPWPWWWWWPW",
    "WPWKPPPPWPPPPKWPW",
    "WPWPWWWPWPWWWPWPW",
    "WPWPPPPPPPPPPPWPW",
    "WPPPWWWPWPWWWPPPW",
    "WPWPPPPPPPPPPPWPW",
    "DPWPWWWWWWWWWPWPD",
    "WPWPPPPPPPPPPPWPW",
    "WPPPWWWPWPWWWPPPW",
    "WPWPPPPPPPPPPPWPW",
    "WPWPWWWPWPWWWPWPW",
    "WPWKPPPPWPPPPKWPW",
    "WPWWWWWPWPWWWWWPW",
    "WPPPPPPPPPPPPPPPW",
    "WWWWWWWWDWWWWWWWW",
];

/// Where each section's key lies
pub const KEY_PLACEMENTS: [(Section, GridPos); 4] = [
    (Section::About, GridPos::new(3, 13)),
    (Section::Projects, GridPos::new(13, 3)),
    (Section::Skills, GridPos::new(3, 3)),
    (Section::Contact, GridPos::new(13, 13)),
];

/// Where each section's door lies
pub const DOOR_PLACEMENTS: [(Section, GridPos); 4] = [
    (Section::About, GridPos::new(8, 0)),
    (Section::Projects, GridPos::new(8, 16)),
    (Section::Skills, GridPos::new(0, 8)),
    (Section::Contact, GridPos::new(16, 8)),
];

pub const PLAYER_START: GridPos = GridPos::new(1, 1);

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Path,
    /// Passable, but never picks anything up
    Door(Section),
    /// Path cell holding a section's key
    Key(Section),
}

impl Cell {
    pub fn is_passable(&self) -> bool {
        !matches!(self, Cell::Wall)
    }
}

/// Movement input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid delta (y grows downward)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Result of one movement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Out of bounds or a wall; the player stays put
    Blocked,
    Moved(GridPos),
    /// Moved onto a key and unlocked its section
    Unlocked(GridPos, Section),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has {rows} rows, expected {expected}")]
    RowCount { rows: usize, expected: usize },
    #[error("row {row} has {len} cells, expected {expected}")]
    RowLength { row: usize, len: usize, expected: usize },
    #[error("unknown cell token '{token}' at {pos}")]
    UnknownToken { token: char, pos: GridPos },
    #[error("'{token}' cell at {pos} has no placement entry")]
    Unplaced { token: char, pos: GridPos },
    #[error("{section} placement at {pos} does not sit on a '{token}' cell")]
    Misplaced {
        section: Section,
        pos: GridPos,
        token: char,
    },
    #[error("{section} has no '{token}' placement")]
    Missing { section: Section, token: char },
}

/// Static square grid of cells
#[derive(Debug, Clone)]
pub struct MazeLayout {
    size: usize,
    cells: Vec<Cell>,
}

impl MazeLayout {
    /// Build a layout from token rows plus key/door placement tables
    pub fn parse(
        rows: &[&str],
        keys: &[(Section, GridPos)],
        doors: &[(Section, GridPos)],
    ) -> Result<Self, LayoutError> {
        let size = rows.len();
        if size != GRID_SIZE {
            return Err(LayoutError::RowCount {
                rows: size,
                expected: GRID_SIZE,
            });
        }

        let placed = |table: &[(Section, GridPos)], pos: GridPos| {
            table.iter().find(|(_, p)| *p == pos).map(|(s, _)| *s)
        };

        let mut cells = Vec::with_capacity(size * size);
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != size {
                return Err(LayoutError::RowLength {
                    row: y,
                    len,
                    expected: size,
                });
            }
            for (x, token) in row.chars().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let cell = match token {
                    'W' => Cell::Wall,
                    'P' => Cell::Path,
                    'K' => Cell::Key(placed(keys, pos).ok_or(LayoutError::Unplaced { token, pos })?),
                    'D' => Cell::Door(placed(doors, pos).ok_or(LayoutError::Unplaced { token, pos })?),
                    _ => return Err(LayoutError::UnknownToken { token, pos }),
                };
                cells.push(cell);
            }
        }

        let layout = Self { size, cells };

        for &(section, pos) in keys {
            if layout.cell(pos) != Some(Cell::Key(section)) {
                return Err(LayoutError::Misplaced { section, pos, token: 'K' });
            }
        }
        for &(section, pos) in doors {
            if layout.cell(pos) != Some(Cell::Door(section)) {
                return Err(LayoutError::Misplaced { section, pos, token: 'D' });
            }
        }
        for section in Section::LOCKABLE {
            if layout.key_position(section).is_none() {
                return Err(LayoutError::Missing { section, token: 'K' });
            }
            if layout.door_position(section).is_none() {
                return Err(LayoutError::Missing { section, token: 'D' });
            }
        }

        Ok(layout)
    }

    /// The built-in portfolio maze
    pub fn standard() -> Self {
        Self::parse(&MAZE_LAYOUT, &KEY_PLACEMENTS, &DOOR_PLACEMENTS)
            .expect("built-in maze layout is valid")
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    /// Cell at `pos`, or None outside the grid
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.size + pos.x as usize)
            .copied()
    }

    /// All cells with their coordinates, row by row
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let pos = GridPos::new((i % self.size) as i32, (i / self.size) as i32);
            (pos, *cell)
        })
    }

    pub fn key_position(&self, section: Section) -> Option<GridPos> {
        self.cells()
            .find(|(_, c)| *c == Cell::Key(section))
            .map(|(p, _)| p)
    }

    pub fn door_position(&self, section: Section) -> Option<GridPos> {
        self.cells()
            .find(|(_, c)| *c == Cell::Door(section))
            .map(|(p, _)| p)
    }
}

impl Default for MazeLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Maze engine: layout plus the player's position
#[derive(Debug, Clone)]
pub struct Maze {
    pub layout: MazeLayout,
    pub player: GridPos,
}

impl Default for Maze {
    fn default() -> Self {
        Self::new(MazeLayout::standard())
    }
}

impl Maze {
    pub fn new(layout: MazeLayout) -> Self {
        Self {
            layout,
            player: PLAYER_START,
        }
    }

    /// Apply one movement input
    ///
    /// Walls and the grid edge reject the move. Stepping onto a key whose
    /// section is still locked unlocks (and activates) that section.
    pub fn step(&mut self, dir: Direction, unlocks: &mut UnlockState) -> MoveOutcome {
        let candidate = self.player.offset(dir.delta());
        let Some(cell) = self.layout.cell(candidate) else {
            return MoveOutcome::Blocked;
        };
        if !cell.is_passable() {
            return MoveOutcome::Blocked;
        }

        self.player = candidate;

        // Doors are inert; only key cells unlock anything
        if let Cell::Key(section) = cell {
            if !unlocks.is_unlocked(section) {
                unlocks.unlock(section);
                log::info!("Picked up the {} key at {}", section, candidate);
                return MoveOutcome::Unlocked(candidate, section);
            }
        }

        MoveOutcome::Moved(candidate)
    }

    /// Put the player back at the start
    pub fn reset(&mut self) {
        self.player = PLAYER_START;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn walk(maze: &mut Maze, unlocks: &mut UnlockState, path: &[(Direction, usize)]) -> Vec<MoveOutcome> {
        let mut outcomes = Vec::new();
        for &(dir, count) in path {
            for _ in 0..count {
                outcomes.push(maze.step(dir, unlocks));
            }
        }
        outcomes
    }

    #[test]
    fn test_standard_layout_is_valid() {
        let layout = MazeLayout::parse(&MAZE_LAYOUT, &KEY_PLACEMENTS, &DOOR_PLACEMENTS).unwrap();
        assert_eq!(layout.size(), GRID_SIZE);
        assert_eq!(layout.cell(PLAYER_START), Some(Cell::Path));
        assert_eq!(layout.key_position(Section::Skills), Some(GridPos::new(3, 3)));
        assert_eq!(layout.door_position(Section::Contact), Some(GridPos::new(16, 8)));
        assert_eq!(layout.cell(GridPos::new(-1, 0)), None);
        assert_eq!(layout.cell(GridPos::new(0, 17)), None);
    }

    #[test]
    fn test_parse_errors() {
        let short = &MAZE_LAYOUT[..16];
        assert_eq!(
            MazeLayout::parse(short, &KEY_PLACEMENTS, &DOOR_PLACEMENTS).unwrap_err(),
            LayoutError::RowCount { rows: 16, expected: 17 }
        );

        let mut rows = MAZE_LAYOUT;
        rows[1] = "WPPPPPPPPPPPPPPPX";
        assert_eq!(
            MazeLayout::parse(&rows, &KEY_PLACEMENTS, &DOOR_PLACEMENTS).unwrap_err(),
            LayoutError::UnknownToken { token: 'X', pos: GridPos::new(16, 1) }
        );

        // Key token without a table entry
        let keys = &KEY_PLACEMENTS[1..];
        assert_eq!(
            MazeLayout::parse(&MAZE_LAYOUT, keys, &DOOR_PLACEMENTS).unwrap_err(),
            LayoutError::Unplaced { token: 'K', pos: GridPos::new(3, 13) }
        );

        // Table entry pointing at a path cell
        let mut keys = KEY_PLACEMENTS;
        keys[0].1 = GridPos::new(1, 1);
        assert!(matches!(
            MazeLayout::parse(&MAZE_LAYOUT, &keys, &DOOR_PLACEMENTS),
            Err(LayoutError::Unplaced { .. }) | Err(LayoutError::Misplaced { .. })
        ));
    }

    #[test]
    fn test_walls_block() {
        let mut maze = Maze::default();
        let mut unlocks = UnlockState::new();

        // (1,0) is the outer wall, (0,1) too
        assert_eq!(maze.step(Direction::Up, &mut unlocks), MoveOutcome::Blocked);
        assert_eq!(maze.step(Direction::Left, &mut unlocks), MoveOutcome::Blocked);
        assert_eq!(maze.player, PLAYER_START);

        // (3,2) is an inner wall
        maze.player = GridPos::new(3, 1);
        assert_eq!(maze.step(Direction::Down, &mut unlocks), MoveOutcome::Blocked);
        assert_eq!(maze.player, GridPos::new(3, 1));
    }

    #[test]
    fn test_edge_door_rejects_out_of_bounds() {
        let mut maze = Maze::default();
        let mut unlocks = UnlockState::new();

        // Walk onto the Skills door at (0,8), then try to leave the grid
        maze.player = GridPos::new(1, 8);
        assert_eq!(
            maze.step(Direction::Left, &mut unlocks),
            MoveOutcome::Moved(GridPos::new(0, 8))
        );
        assert_eq!(maze.step(Direction::Left, &mut unlocks), MoveOutcome::Blocked);
        assert_eq!(maze.player, GridPos::new(0, 8));
        // Doors never unlock anything
        assert!(unlocks.is_initial());
    }

    #[test]
    fn test_corridor_to_skills_key() {
        let mut maze = Maze::default();
        let mut unlocks = UnlockState::new();

        let outcomes = walk(
            &mut maze,
            &mut unlocks,
            &[(Direction::Down, 5), (Direction::Right, 2), (Direction::Up, 3)],
        );

        assert_eq!(maze.player, GridPos::new(3, 3));
        assert_eq!(
            outcomes.last(),
            Some(&MoveOutcome::Unlocked(GridPos::new(3, 3), Section::Skills))
        );
        assert!(!outcomes[..outcomes.len() - 1].contains(&MoveOutcome::Blocked));
        assert_eq!(
            unlocks.unlocked().collect::<Vec<_>>(),
            vec![Section::Home, Section::Skills]
        );
        assert_eq!(unlocks.active(), Section::Skills);
    }

    #[test]
    fn test_key_pickup_only_once() {
        let mut maze = Maze::default();
        let mut unlocks = UnlockState::new();
        maze.player = GridPos::new(4, 3);

        assert_eq!(
            maze.step(Direction::Left, &mut unlocks),
            MoveOutcome::Unlocked(GridPos::new(3, 3), Section::Skills)
        );
        unlocks.set_active(Section::Home);
        let rev = unlocks.revision();

        // Leave and come back
        maze.step(Direction::Right, &mut unlocks);
        assert_eq!(
            maze.step(Direction::Left, &mut unlocks),
            MoveOutcome::Moved(GridPos::new(3, 3))
        );
        assert_eq!(unlocks.revision(), rev);
        assert_eq!(unlocks.active(), Section::Home);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut maze = Maze::default();
        maze.player = GridPos::new(7, 7);
        maze.reset();
        assert_eq!(maze.player, PLAYER_START);
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_never_leaves_grid_or_enters_wall(
            moves in prop::collection::vec(direction(), 0..200),
            start in (0i32..17, 0i32..17),
        ) {
            let mut maze = Maze::default();
            let mut unlocks = UnlockState::new();
            let start = GridPos::new(start.0, start.1);
            if maze.layout.cell(start).is_some_and(|c| c.is_passable()) {
                maze.player = start;
            }
            for dir in moves {
                maze.step(dir, &mut unlocks);
                let cell = maze.layout.cell(maze.player);
                prop_assert!(cell.is_some());
                prop_assert!(cell.is_some_and(|c| c.is_passable()));
            }
            prop_assert!(unlocks.is_unlocked(Section::Home));
        }
    }
}
