//! Legacy VTK cell arrays: a flat sequence of `n, i1 .. in` records.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Verts,
    Lines,
    Polys,
    Strips,
}

impl CellKind {
    pub const ALL: [CellKind; 4] = [
        CellKind::Verts,
        CellKind::Lines,
        CellKind::Polys,
        CellKind::Strips,
    ];

    pub const fn prop_name(self) -> &'static str {
        match self {
            CellKind::Verts => "verts",
            CellKind::Lines => "lines",
            CellKind::Polys => "polys",
            CellKind::Strips => "strips",
        }
    }

    /// Smallest point count that forms a valid cell of this kind.
    const fn min_points(self) -> i64 {
        match self {
            CellKind::Verts => 1,
            CellKind::Lines => 2,
            CellKind::Polys | CellKind::Strips => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellIssue {
    /// The record at `offset` claims more indices than remain.
    Overrun {
        offset: usize,
        count: i64,
        remaining: usize,
    },
    TooFewPoints {
        offset: usize,
        count: i64,
        min: i64,
    },
    IndexOutOfRange {
        offset: usize,
        index: i64,
        points: usize,
    },
}

impl fmt::Display for CellIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellIssue::Overrun {
                offset,
                count,
                remaining,
            } => write!(
                f,
                "cell at offset {offset} lists {count} points but only {remaining} values follow"
            ),
            CellIssue::TooFewPoints { offset, count, min } => write!(
                f,
                "cell at offset {offset} has {count} points, needs at least {min}"
            ),
            CellIssue::IndexOutOfRange {
                offset,
                index,
                points,
            } => write!(
                f,
                "cell at offset {offset} uses point {index} but only {points} points exist"
            ),
        }
    }
}

/// Walks a cell array and returns the number of cells in it.
pub fn count_cells(kind: CellKind, cells: &[i64], point_count: usize) -> Result<usize, CellIssue> {
    let mut offset = 0;
    let mut count = 0;
    while offset < cells.len() {
        let n = cells[offset];
        if n < kind.min_points() {
            return Err(CellIssue::TooFewPoints {
                offset,
                count: n,
                min: kind.min_points(),
            });
        }
        let remaining = cells.len() - offset - 1;
        let n_usize = n as usize;
        if n_usize > remaining {
            return Err(CellIssue::Overrun {
                offset,
                count: n,
                remaining,
            });
        }
        for &index in &cells[offset + 1..offset + 1 + n_usize] {
            if index < 0 || index as usize >= point_count {
                return Err(CellIssue::IndexOutOfRange {
                    offset,
                    index,
                    points: point_count,
                });
            }
        }
        offset += n_usize + 1;
        count += 1;
    }
    Ok(count)
}

/// How a PolyData derives its cells from the point list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    #[default]
    Manual,
    Points,
    Triangles,
    Strips,
}

impl FromStr for Connectivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Connectivity::Manual),
            "points" => Ok(Connectivity::Points),
            "triangles" => Ok(Connectivity::Triangles),
            "strips" => Ok(Connectivity::Strips),
            other => Err(format!("unknown connectivity `{other}`")),
        }
    }
}

impl Connectivity {
    /// Cell kind replaced by the generated cells.
    pub const fn generates(self) -> Option<CellKind> {
        match self {
            Connectivity::Manual => None,
            Connectivity::Points => Some(CellKind::Verts),
            Connectivity::Triangles => Some(CellKind::Polys),
            Connectivity::Strips => Some(CellKind::Strips),
        }
    }

    /// Cells the client derives for `point_count` points.
    ///
    /// `Err` carries the point count when `Triangles` cannot consume every point.
    pub fn generate(self, point_count: usize) -> Result<Vec<i64>, usize> {
        if point_count == 0 {
            return Ok(Vec::new());
        }
        let n = point_count as i64;
        match self {
            Connectivity::Manual => Ok(Vec::new()),
            Connectivity::Points | Connectivity::Strips => {
                let mut cells = Vec::with_capacity(point_count + 1);
                cells.push(n);
                cells.extend(0..n);
                Ok(cells)
            }
            Connectivity::Triangles => {
                if point_count % 3 != 0 {
                    return Err(point_count);
                }
                let mut cells = Vec::with_capacity(point_count / 3 * 4);
                for first in (0..n).step_by(3) {
                    cells.extend([3, first, first + 1, first + 2]);
                }
                Ok(cells)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_mixed_cells() {
        assert_eq!(count_cells(CellKind::Polys, &[3, 0, 1, 2], 3), Ok(1));
        assert_eq!(
            count_cells(CellKind::Polys, &[3, 0, 1, 2, 4, 0, 1, 2, 3], 4),
            Ok(2)
        );
        assert_eq!(count_cells(CellKind::Lines, &[], 0), Ok(0));
    }

    #[test]
    fn rejects_overrun() {
        assert_eq!(
            count_cells(CellKind::Lines, &[3, 0, 1], 3),
            Err(CellIssue::Overrun {
                offset: 0,
                count: 3,
                remaining: 2
            })
        );
    }

    #[test]
    fn rejects_bad_indices_and_counts() {
        assert!(matches!(
            count_cells(CellKind::Polys, &[3, 0, 1, 5], 3),
            Err(CellIssue::IndexOutOfRange { index: 5, .. })
        ));
        assert!(matches!(
            count_cells(CellKind::Verts, &[0], 3),
            Err(CellIssue::TooFewPoints { .. })
        ));
        assert!(matches!(
            count_cells(CellKind::Lines, &[1, 0], 3),
            Err(CellIssue::TooFewPoints { min: 2, .. })
        ));
    }

    #[test]
    fn generates_from_points() {
        assert_eq!(Connectivity::Points.generate(3), Ok(vec![3, 0, 1, 2]));
        assert_eq!(Connectivity::Strips.generate(4), Ok(vec![4, 0, 1, 2, 3]));
        assert_eq!(
            Connectivity::Triangles.generate(6),
            Ok(vec![3, 0, 1, 2, 3, 3, 4, 5])
        );
        assert_eq!(Connectivity::Triangles.generate(4), Err(4));
        assert_eq!(Connectivity::Manual.generate(9), Ok(vec![]));
        assert_eq!("strips".parse::<Connectivity>(), Ok(Connectivity::Strips));
    }
}
