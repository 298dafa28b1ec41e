//! Triangle index lists for patch grids, with crack-free edge stitching.
//!
//! A patch can border a neighbour at the same level or one level coarser. For
//! each of the four edges a flag selects between full resolution (`true`) and
//! stitching to every other vertex (`false`), so the edge matches the coarser
//! neighbour exactly. All sixteen flag combinations share one index buffer.
//!
//! Edge order: 0 = column 0, 1 = last row, 2 = last column, 3 = row 0.
use crate::error::PlanetError;

/// Start offset and length of one edge-flag combination inside `indices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRange {
    pub start: usize,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct PatchIndices {
    size: usize,
    indices: Vec<u32>,
    ranges: [IndexRange; 16],
}

impl PatchIndices {
    /// Build the index buffer for `size × size` grids. `size` must be odd and
    /// at least 3 so every stitched edge pairs up cleanly.
    pub fn new(size: usize) -> Result<Self, PlanetError> {
        if size < 3 || size % 2 == 0 {
            return Err(PlanetError::InvalidTileSize(size));
        }
        if size.checked_mul(size).map_or(true, |n| n > u32::MAX as usize) {
            return Err(PlanetError::GridTooLarge(size));
        }
        let mut indices = Vec::new();
        let mut ranges = [IndexRange::default(); 16];
        for (key, range) in ranges.iter_mut().enumerate() {
            let edges = [key & 8 != 0, key & 4 != 0, key & 2 != 0, key & 1 != 0];
            let start = indices.len();
            triangulate(size, edges, &mut indices);
            *range = IndexRange { start, count: indices.len() - start };
        }
        Ok(Self { size, indices, ranges })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The whole buffer, all sixteen variants back to back.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn range(&self, edges: [bool; 4]) -> IndexRange {
        self.ranges[edge_key(edges)]
    }

    /// Triangle list for one combination of full-resolution edges.
    pub fn triangles(&self, edges: [bool; 4]) -> &[u32] {
        let r = self.range(edges);
        &self.indices[r.start..r.start + r.count]
    }
}

fn edge_key(edges: [bool; 4]) -> usize {
    (edges[0] as usize) << 3 | (edges[1] as usize) << 2 | (edges[2] as usize) << 1 | edges[3] as usize
}

fn triangulate(n: usize, edges: [bool; 4], out: &mut Vec<u32>) {
    let at = |col: usize, row: usize| (row * n + col) as u32;
    let mut tri = |a: u32, b: u32, c: u32| out.extend_from_slice(&[a, b, c]);
    let (m, l) = (n - 2, n - 1);

    for i in 1..m {
        for j in 1..m {
            tri(at(i, j), at(i + 1, j + 1), at(i + 1, j));
            tri(at(i, j), at(i, j + 1), at(i + 1, j + 1));
        }
    }

    // column 0
    if edges[0] {
        for j in 1..m {
            tri(at(0, j), at(1, j + 1), at(1, j));
            tri(at(0, j), at(0, j + 1), at(1, j + 1));
        }
        tri(at(0, 0), at(0, 1), at(1, 1));
        tri(at(0, m), at(0, l), at(1, m));
    } else {
        for j in (1..l).step_by(2) {
            tri(at(0, j - 1), at(0, j + 1), at(1, j));
        }
        for j in (1..m).step_by(2) {
            tri(at(1, j), at(0, j + 1), at(1, j + 1));
            tri(at(1, j + 1), at(0, j + 1), at(1, j + 2));
        }
    }

    // last row
    if edges[1] {
        for i in 1..m {
            tri(at(i, m), at(i + 1, l), at(i + 1, m));
            tri(at(i, m), at(i, l), at(i + 1, l));
        }
        tri(at(0, l), at(1, l), at(1, m));
        tri(at(m, m), at(m, l), at(l, l));
    } else {
        for i in (1..l).step_by(2) {
            tri(at(i - 1, l), at(i + 1, l), at(i, m));
        }
        for i in (1..m).step_by(2) {
            tri(at(i, m), at(i + 1, l), at(i + 1, m));
            tri(at(i + 1, m), at(i + 1, l), at(i + 2, m));
        }
    }

    // last column
    if edges[2] {
        for j in 1..m {
            tri(at(m, j), at(l, j + 1), at(l, j));
            tri(at(m, j), at(m, j + 1), at(l, j + 1));
        }
        tri(at(l, 0), at(m, 1), at(l, 1));
        tri(at(m, m), at(l, l), at(l, m));
    } else {
        for j in (1..l).step_by(2) {
            tri(at(l, j - 1), at(m, j), at(l, j + 1));
        }
        for j in (1..m).step_by(2) {
            tri(at(m, j), at(m, j + 1), at(l, j + 1));
            tri(at(l, j + 1), at(m, j + 1), at(m, j + 2));
        }
    }

    // row 0
    if edges[3] {
        for i in 1..m {
            tri(at(i, 0), at(i + 1, 1), at(i + 1, 0));
            tri(at(i, 0), at(i, 1), at(i + 1, 1));
        }
        tri(at(0, 0), at(1, 1), at(1, 0));
        tri(at(m, 0), at(m, 1), at(l, 0));
    } else {
        for i in (1..l).step_by(2) {
            tri(at(i - 1, 0), at(i, 1), at(i + 1, 0));
        }
        for i in (1..m).step_by(2) {
            tri(at(i, 1), at(i + 1, 1), at(i + 1, 0));
            tri(at(i + 1, 0), at(i + 1, 1), at(i + 2, 1));
        }
    }
}
