//! Grid map of cell codes.
//!
//! `0` is open space, positive codes are walls keyed into the wall texture
//! mapping, negative codes select a floor/ceiling texture variant.

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct Map {
    cells: Vec<Vec<i32>>,
    width: usize,
    height: usize,
}

impl Map {
    /// Builds a map from rows of cell codes. The grid must be non-empty and
    /// rectangular; ragged rows are rejected here, before any loop runs.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(EngineError::EmptyMap);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(EngineError::MalformedMap {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
        }
        Ok(Self { cells: rows, width, height })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell code at integer coordinates, `None` outside the map.
    #[inline]
    pub fn cell(&self, x: isize, y: isize) -> Option<i32> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Cell code for a world position (coordinates floored), `0` outside.
    #[inline]
    pub fn cell_at(&self, wx: f32, wy: f32) -> i32 {
        self.cell(wx.floor() as isize, wy.floor() as isize)
            .unwrap_or(0)
    }

    /// Whether the cell containing the world position is a wall.
    #[inline]
    pub fn is_wall_at(&self, wx: f32, wy: f32) -> bool {
        self.cell_at(wx, wy) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_map() {
        assert!(matches!(Map::from_rows(vec![]), Err(EngineError::EmptyMap)));
        assert!(matches!(
            Map::from_rows(vec![vec![]]),
            Err(EngineError::EmptyMap)
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![1, 1, 1], vec![1, 0], vec![1, 1, 1]];
        match Map::from_rows(rows) {
            Err(EngineError::MalformedMap { row, len, expected }) => {
                assert_eq!(row, 1);
                assert_eq!(len, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("expected MalformedMap, got {other:?}"),
        }
    }

    #[test]
    fn cell_lookups() {
        let map = Map::from_rows(vec![vec![1, 1, 1], vec![1, -2, 1], vec![1, 1, 1]]).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert_eq!(map.cell(1, 1), Some(-2));
        assert_eq!(map.cell(-1, 0), None);
        assert_eq!(map.cell(3, 0), None);
        assert_eq!(map.cell_at(1.9, 1.1), -2);
        assert_eq!(map.cell_at(-0.5, 0.0), 0);
        assert!(map.is_wall_at(0.5, 0.5));
        assert!(!map.is_wall_at(1.5, 1.5));
    }
}
