use crate::common::{CellType, Coordinate};
use crate::error::{Endpoint, InvalidReason, MapError, SearchError};

use rand::Rng;
use std::fmt;
use std::fs;
use std::str::FromStr;
use tracing::debug;

/// Inclusive coordinate bounds of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Bounds {
    pub fn contains(&self, at: Coordinate) -> bool {
        (self.min.col..=self.max.col).contains(&at.col)
            && (self.min.row..=self.max.row).contains(&at.row)
    }

    pub fn width(&self) -> usize {
        (i64::from(self.max.col) - i64::from(self.min.col) + 1).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (i64::from(self.max.row) - i64::from(self.min.row) + 1).max(0) as usize
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }
}

/// Read-only view of the cells a search runs over.
///
/// Implementors must keep the view unchanged for the duration of a search.
pub trait GridView {
    fn bounds(&self) -> Bounds;

    /// Cell type at `at`.
    ///
    /// # Panics
    /// May panic when `at` is outside [`GridView::bounds`]; callers check first.
    fn cell_type_at(&self, at: Coordinate) -> CellType;

    fn in_bounds(&self, at: Coordinate) -> bool {
        self.bounds().contains(at)
    }
}

/// Rectangular grid with its origin at (0, 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![CellType::Empty; width * height],
        }
    }

    pub fn from_file(path: &str) -> Result<Self, MapError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, at: Coordinate) -> Option<usize> {
        if at.col < 0 || at.row < 0 {
            return None;
        }
        let (col, row) = (at.col as usize, at.row as usize);
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    fn coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn cell(&self, at: Coordinate) -> Option<CellType> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Overwrite a cell. Returns false if `at` is off the grid.
    pub fn set_cell(&mut self, at: Coordinate, cell: CellType) -> bool {
        match self.index(at) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    fn find(&self, cell: CellType) -> Option<Coordinate> {
        self.cells
            .iter()
            .position(|&c| c == cell)
            .map(|i| self.coordinate(i))
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.find(CellType::Start)
    }

    pub fn goal(&self) -> Option<Coordinate> {
        self.find(CellType::Goal)
    }

    /// Empty becomes Blocked and Blocked becomes Empty; other cells are left alone.
    pub fn toggle_blocked(&mut self, at: Coordinate) -> bool {
        let toggled = match self.cell(at) {
            Some(CellType::Empty) => CellType::Blocked,
            Some(CellType::Blocked) => CellType::Empty,
            _ => return false,
        };
        self.set_cell(at, toggled)
    }

    fn place_marker(&mut self, at: Coordinate, marker: CellType) -> bool {
        if self.find(marker).is_some() || self.cell(at) != Some(CellType::Empty) {
            return false;
        }
        self.set_cell(at, marker)
    }

    /// Mark the start cell. Only applies when no start is set and `at` is Empty.
    pub fn set_start(&mut self, at: Coordinate) -> bool {
        self.place_marker(at, CellType::Start)
    }

    /// Mark the goal cell. Only applies when no goal is set and `at` is Empty.
    pub fn set_goal(&mut self, at: Coordinate) -> bool {
        self.place_marker(at, CellType::Goal)
    }

    /// Move the `endpoint` marker to `at`, clearing the old one. Returns false
    /// and leaves the grid as it was when `at` is off the grid or not Empty.
    pub fn place_endpoint(&mut self, endpoint: Endpoint, at: Coordinate) -> bool {
        let marker = match endpoint {
            Endpoint::Start => CellType::Start,
            Endpoint::Goal => CellType::Goal,
        };
        let current = self.find(marker);
        if current == Some(at) {
            return true;
        }
        if self.cell(at) != Some(CellType::Empty) {
            return false;
        }
        if let Some(current) = current {
            self.set_cell(current, CellType::Empty);
        }
        self.set_cell(at, marker)
    }

    /// Drop runner and trail marks left by a playback.
    pub fn clear_path_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            if matches!(cell, CellType::Runner | CellType::Trail) {
                *cell = CellType::Empty;
            }
        }
    }

    pub fn reset(&mut self) {
        self.cells.fill(CellType::Empty);
    }

    /// Turn each Empty cell Blocked with probability `density`. Returns how many changed.
    pub fn scatter_blocked<R: Rng>(&mut self, density: f64, rng: &mut R) -> usize {
        let mut blocked = 0;
        for cell in self.cells.iter_mut() {
            if *cell == CellType::Empty && rng.gen::<f64>() < density {
                *cell = CellType::Blocked;
                blocked += 1;
            }
        }
        blocked
    }
}

impl GridView for Grid {
    fn bounds(&self) -> Bounds {
        Bounds {
            min: Coordinate::new(0, 0),
            max: Coordinate::new(self.width as i32 - 1, self.height as i32 - 1),
        }
    }

    fn cell_type_at(&self, at: Coordinate) -> CellType {
        match self.index(at) {
            Some(i) => self.cells[i],
            None => panic!("{at} is outside the grid bounds"),
        }
    }
}

pub(crate) fn check_endpoint<G: GridView + ?Sized>(
    grid: &G,
    endpoint: Endpoint,
    at: Coordinate,
) -> Result<(), SearchError> {
    if !grid.in_bounds(at) {
        return Err(SearchError::invalid(endpoint, InvalidReason::OutOfBounds(at)));
    }
    if grid.cell_type_at(at) == CellType::Blocked {
        return Err(SearchError::invalid(endpoint, InvalidReason::Blocked(at)));
    }
    Ok(())
}

fn resolve_endpoint(
    grid: &mut Grid,
    endpoint: Endpoint,
    configured: Option<Coordinate>,
) -> Result<Coordinate, SearchError> {
    if let Some(at) = configured {
        if !grid.place_endpoint(endpoint, at) {
            debug!("could not move the {endpoint} marker to {at}");
        }
    }
    let marked = match endpoint {
        Endpoint::Start => grid.start(),
        Endpoint::Goal => grid.goal(),
    };
    let at = configured
        .or(marked)
        .ok_or(SearchError::invalid(endpoint, InvalidReason::Unset))?;
    check_endpoint(&*grid, endpoint, at)?;
    Ok(at)
}

/// Decide where a search runs from and to.
///
/// An override wins over the marker the grid carries, and the marker is moved
/// to it when the target cell is Empty. Both endpoints are checked the way
/// [`crate::algorithm::AStar::new`] checks them, and a missing one is `Unset`.
pub fn resolve_endpoints(
    grid: &mut Grid,
    start: Option<Coordinate>,
    goal: Option<Coordinate>,
) -> Result<(Coordinate, Coordinate), SearchError> {
    let start = resolve_endpoint(grid, Endpoint::Start, start)?;
    let goal = resolve_endpoint(grid, Endpoint::Goal, goal)?;
    Ok((start, goal))
}

fn header_value(lines: &[&str], line: usize, key: &str) -> Result<usize, MapError> {
    let text = lines.get(line).copied().unwrap_or_default();
    let mut parts = text.split_whitespace();
    if parts.next() != Some(key) {
        return Err(MapError::Header {
            line: line + 1,
            message: format!("expected '{key} <n>', got '{text}'"),
        });
    }
    parts
        .next()
        .and_then(|value| value.parse::<usize>().ok())
        .ok_or_else(|| MapError::Header {
            line: line + 1,
            message: format!("'{key}' needs a non-negative integer"),
        })
}

impl FromStr for Grid {
    type Err = MapError;

    /// Accepts an octile header (`type`, `height`, `width`, `map`) followed by
    /// the rows, or a bare block of rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim_end).collect();
        let first = lines.iter().position(|line| !line.is_empty()).unwrap_or(lines.len());
        let last = lines.iter().rposition(|line| !line.is_empty()).map_or(first, |i| i + 1);
        let lines = &lines[first..last];

        let (height, width, rows) = if lines.first().is_some_and(|line| line.starts_with("type")) {
            let height = header_value(lines, 1, "height")?;
            let width = header_value(lines, 2, "width")?;
            if lines.get(3).copied() != Some("map") {
                return Err(MapError::Header {
                    line: 4,
                    message: "expected 'map'".to_string(),
                });
            }
            let rows = &lines[4.min(lines.len())..];
            if rows.len() != height {
                return Err(MapError::Dimensions {
                    declared: height,
                    found: rows.len(),
                });
            }
            (height, width, rows)
        } else {
            let width = lines.first().map_or(0, |row| row.chars().count());
            (lines.len(), width, lines)
        };

        if height == 0 || width == 0 {
            return Err(MapError::Header {
                line: 1,
                message: "map has no cells".to_string(),
            });
        }

        let mut grid = Grid::new(width, height);
        let (mut has_start, mut has_goal) = (false, false);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapError::Row {
                    row,
                    found,
                    expected: width,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let at = Coordinate::new(col as i32, row as i32);
                let cell =
                    CellType::from_symbol(symbol).ok_or(MapError::UnknownCell { symbol, at })?;
                let duplicate = match cell {
                    CellType::Start => {
                        std::mem::replace(&mut has_start, true).then_some(Endpoint::Start)
                    }
                    CellType::Goal => {
                        std::mem::replace(&mut has_goal, true).then_some(Endpoint::Goal)
                    }
                    _ => None,
                };
                if let Some(endpoint) = duplicate {
                    return Err(MapError::DuplicateMarker(endpoint));
                }
                grid.set_cell(at, cell);
            }
        }

        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.width.max(1)).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_map() {
        let grid = Grid::from_file("map_file/test/test.map").unwrap();

        assert_eq!(grid.height(), 5);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.start(), Some(Coordinate::new(0, 0)));
        assert_eq!(grid.goal(), Some(Coordinate::new(4, 4)));
        assert_eq!(grid.cell(Coordinate::new(2, 1)), Some(CellType::Blocked));
        assert_eq!(grid.cell(Coordinate::new(1, 1)), Some(CellType::Empty));
        assert_eq!(grid.cell(Coordinate::new(5, 0)), None);

        let bounds = grid.bounds();
        assert_eq!(bounds.min, Coordinate::new(0, 0));
        assert_eq!(bounds.max, Coordinate::new(4, 4));
        assert_eq!(bounds.area(), 25);
    }

    #[test]
    fn test_parse_bare_rows_round_trip_display() {
        let text = "S..\n.@.\n..G";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "S..\n.@\n..G".parse::<Grid>(),
            Err(MapError::Row { row: 1, found: 2, expected: 3 })
        ));
        assert!(matches!(
            "S.x".parse::<Grid>(),
            Err(MapError::UnknownCell { symbol: 'x', .. })
        ));
        assert!(matches!(
            "S.S".parse::<Grid>(),
            Err(MapError::DuplicateMarker(Endpoint::Start))
        ));
        assert!(matches!(
            "type octile\nheight 3\nwidth 2\nmap\n..\n..".parse::<Grid>(),
            Err(MapError::Dimensions { declared: 3, found: 2 })
        ));
        assert!(matches!(
            "type octile\nheight x\nwidth 2\nmap\n..".parse::<Grid>(),
            Err(MapError::Header { line: 2, .. })
        ));
        assert!(matches!("".parse::<Grid>(), Err(MapError::Header { .. })));
    }

    #[test]
    fn test_in_bounds_and_out_of_bounds_lookup() {
        let grid = Grid::new(2, 3);
        assert!(grid.in_bounds(Coordinate::new(1, 2)));
        assert!(!grid.in_bounds(Coordinate::new(2, 2)));
        assert!(!grid.in_bounds(Coordinate::new(-1, 0)));
        let result = std::panic::catch_unwind(|| grid.cell_type_at(Coordinate::new(0, 3)));
        assert!(result.is_err());
    }

    #[test]
    fn test_bounds_at_integer_range() {
        let bounds = Bounds {
            min: Coordinate::new(i32::MIN, 0),
            max: Coordinate::new(i32::MAX, 2),
        };
        assert_eq!(bounds.width(), 1 << 32);
        assert_eq!(bounds.height(), 3);
        assert!(bounds.contains(Coordinate::new(i32::MIN, 2)));
        assert!(!bounds.contains(Coordinate::new(0, 3)));

        let empty = Bounds {
            min: Coordinate::new(1, 1),
            max: Coordinate::new(0, 0),
        };
        assert_eq!(empty.area(), 0);
    }

    #[test]
    fn test_painting() {
        let mut grid = Grid::new(3, 3);
        let at = Coordinate::new(1, 1);

        assert!(grid.toggle_blocked(at));
        assert_eq!(grid.cell(at), Some(CellType::Blocked));
        assert!(grid.toggle_blocked(at));
        assert_eq!(grid.cell(at), Some(CellType::Empty));

        assert!(grid.set_start(Coordinate::new(0, 0)));
        assert!(!grid.set_start(Coordinate::new(0, 1)));
        assert!(!grid.toggle_blocked(Coordinate::new(0, 0)));

        grid.toggle_blocked(at);
        assert!(!grid.set_goal(at));
        assert!(grid.set_goal(Coordinate::new(2, 2)));
        assert_eq!(grid.goal(), Some(Coordinate::new(2, 2)));

        grid.set_cell(Coordinate::new(1, 0), CellType::Trail);
        grid.set_cell(Coordinate::new(2, 1), CellType::Runner);
        grid.clear_path_marks();
        assert_eq!(grid.to_string(), "S..\n.@.\n..G");

        grid.reset();
        assert_eq!(grid.start(), None);
        assert_eq!(grid.to_string(), "...\n...\n...");
    }

    #[test]
    fn test_place_endpoint_moves_marker() {
        let mut grid: Grid = "S.@\n..G".parse().unwrap();
        assert!(grid.place_endpoint(Endpoint::Start, Coordinate::new(1, 1)));
        assert_eq!(grid.to_string(), "..@\n.SG");
        assert!(grid.place_endpoint(Endpoint::Start, Coordinate::new(1, 1)));

        assert!(!grid.place_endpoint(Endpoint::Goal, Coordinate::new(2, 0)));
        assert!(!grid.place_endpoint(Endpoint::Goal, Coordinate::new(1, 1)));
        assert!(!grid.place_endpoint(Endpoint::Goal, Coordinate::new(3, 0)));
        assert_eq!(grid.to_string(), "..@\n.SG");

        let mut open = Grid::new(2, 1);
        assert!(open.place_endpoint(Endpoint::Goal, Coordinate::new(1, 0)));
        assert_eq!(open.goal(), Some(Coordinate::new(1, 0)));
    }

    #[test]
    fn test_resolve_endpoints_from_markers() {
        let mut grid: Grid = "S.@\n..G".parse().unwrap();
        let resolved = resolve_endpoints(&mut grid, None, None);
        assert_eq!(resolved, Ok((Coordinate::new(0, 0), Coordinate::new(2, 1))));
        assert_eq!(grid.to_string(), "S.@\n..G");
    }

    #[test]
    fn test_resolve_endpoints_reports_unset() {
        let mut no_start: Grid = "...\n..G".parse().unwrap();
        assert_eq!(
            resolve_endpoints(&mut no_start, None, None),
            Err(SearchError::invalid(Endpoint::Start, InvalidReason::Unset))
        );

        let mut no_goal: Grid = "S..\n...".parse().unwrap();
        assert_eq!(
            resolve_endpoints(&mut no_goal, None, None),
            Err(SearchError::invalid(Endpoint::Goal, InvalidReason::Unset))
        );

        let goal = Coordinate::new(2, 1);
        assert_eq!(
            resolve_endpoints(&mut no_goal, None, Some(goal)),
            Ok((Coordinate::new(0, 0), goal))
        );
        assert_eq!(no_goal.goal(), Some(goal));
    }

    #[test]
    fn test_resolve_endpoints_override_moves_marker() {
        let mut grid: Grid = "S.@\n..G".parse().unwrap();
        let start = Coordinate::new(1, 0);
        let goal = Coordinate::new(0, 1);
        assert_eq!(resolve_endpoints(&mut grid, Some(start), Some(goal)), Ok((start, goal)));
        assert_eq!(grid.cell(Coordinate::new(0, 0)), Some(CellType::Empty));
        assert_eq!(grid.cell(Coordinate::new(2, 1)), Some(CellType::Empty));
        assert_eq!(grid.start(), Some(start));
        assert_eq!(grid.goal(), Some(goal));
    }

    #[test]
    fn test_resolve_endpoints_rejects_blocked_override() {
        let mut grid: Grid = "S.@\n..G".parse().unwrap();
        let wall = Coordinate::new(2, 0);
        assert_eq!(
            resolve_endpoints(&mut grid, Some(wall), None),
            Err(SearchError::invalid(Endpoint::Start, InvalidReason::Blocked(wall)))
        );
        assert_eq!(grid.start(), Some(Coordinate::new(0, 0)));

        let outside = Coordinate::new(0, 2);
        assert_eq!(
            resolve_endpoints(&mut grid, None, Some(outside)),
            Err(SearchError::invalid(Endpoint::Goal, InvalidReason::OutOfBounds(outside)))
        );
        assert_eq!(grid.goal(), Some(Coordinate::new(2, 1)));
    }

    #[test]
    fn test_scatter_blocked_keeps_markers() {
        let mut grid: Grid = "S....\n.....\n.....\n....G".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let blocked = grid.scatter_blocked(1.0, &mut rng);
        assert_eq!(blocked, 18);
        assert_eq!(grid.start(), Some(Coordinate::new(0, 0)));
        assert_eq!(grid.goal(), Some(Coordinate::new(4, 3)));

        let mut open = Grid::new(4, 4);
        assert_eq!(open.scatter_blocked(0.0, &mut rng), 0);
    }
}
