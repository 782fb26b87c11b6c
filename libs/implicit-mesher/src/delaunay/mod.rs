//! # Delaunay Tetrahedralization
//!
//! Incremental Bowyer–Watson construction of a 3D Delaunay triangulation.
//!
//! ## Structure
//!
//! All points live inside an enclosing super-tetrahedron whose four corners
//! are vertices `0..4`. Those are never reported as finite vertices, and a
//! cell touching one of them is not finite.
//!
//! Cell `c` stores four vertices in positive orientation and four neighbours;
//! neighbour `i` is across the facet opposite vertex `i`. Removed cells stay
//! readable, marked dead, until the next insertion, which may reuse their
//! slots.
//!
//! ## Insertion
//!
//! 1. Walk from the last created cell towards the new point
//! 2. Collect every cell whose circumsphere strictly contains the point
//! 3. Replace that cavity by a fan of cells joining its boundary to the point

mod predicates;

use std::collections::{HashMap, HashSet, VecDeque};

use config::constants::SUPER_TETRAHEDRON_SCALE;
use glam::DVec3;

use crate::ball::Ball3;
use crate::error::{MesherError, MesherResult};

pub(crate) use predicates::{min_angle_degrees, orient3d, triangle_circumcenter};

/// Index of a vertex in a [`Tetrahedralization`].
pub type VertexId = usize;

/// Index of a cell in a [`Tetrahedralization`].
pub type CellId = usize;

/// Number of super-tetrahedron vertices preceding the finite ones.
const SUPER_VERTICES: usize = 4;

/// Facet opposite vertex `i`, ordered so its counter-clockwise normal points
/// out of the cell.
pub(crate) const FACET_VERTICES: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

#[derive(Debug, Clone)]
struct Cell {
    vertices: [VertexId; 4],
    neighbors: [Option<CellId>; 4],
    circumcenter: DVec3,
    alive: bool,
}

/// Result of an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The point became a new vertex.
    Inserted {
        /// The new vertex
        vertex: VertexId,
        /// Cells destroyed by the insertion; readable until the next one
        removed: Vec<CellId>,
        /// Cells created by the insertion, all incident to `vertex`
        created: Vec<CellId>,
    },
    /// The point coincides with an existing vertex; nothing changed.
    Duplicate(VertexId),
}

/// Where a query point lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// On an existing vertex.
    Vertex(VertexId),
    /// In the closure of a cell.
    Cell(CellId),
}

/// Cells whose circumsphere contains a point, and the facets bounding them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConflictZone {
    pub(crate) cells: Vec<CellId>,
    /// `(cell, i)` pairs: facet opposite vertex `i` of an in-zone cell.
    pub(crate) boundary: Vec<(CellId, usize)>,
}

/// Outcome of a conflict query.
#[derive(Debug, Clone)]
pub(crate) enum Conflicts {
    /// The point coincides with this vertex.
    Vertex(VertexId),
    /// Cells the point would destroy.
    Zone(ConflictZone),
}

/// A 3D Delaunay tetrahedralization.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{Ball3, InsertOutcome, Tetrahedralization};
/// use glam::DVec3;
///
/// let mut tds = Tetrahedralization::new(&Ball3::new(DVec3::ZERO, 1.0));
/// for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z] {
///     assert!(matches!(tds.insert(p).unwrap(), InsertOutcome::Inserted { .. }));
/// }
/// assert_eq!(tds.number_of_finite_vertices(), 4);
/// assert_eq!(tds.finite_cells().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Tetrahedralization {
    points: Vec<DVec3>,
    cells: Vec<Cell>,
    /// Dead cell slots available to the next insertion.
    free: Vec<CellId>,
    hint: CellId,
}

impl Tetrahedralization {
    /// Creates an empty triangulation able to hold points well around
    /// `bounds`.
    pub fn new(bounds: &Ball3) -> Self {
        let center = bounds.center();
        let scale = SUPER_TETRAHEDRON_SCALE * bounds.radius().max(f64::MIN_POSITIVE)
            / 3.0f64.sqrt();
        let mut points = vec![
            center + scale * DVec3::new(1.0, 1.0, 1.0),
            center + scale * DVec3::new(1.0, -1.0, -1.0),
            center + scale * DVec3::new(-1.0, 1.0, -1.0),
            center + scale * DVec3::new(-1.0, -1.0, 1.0),
        ];
        if orient3d(points[0], points[1], points[2], points[3]) < 0.0 {
            points.swap(2, 3);
        }

        let mut tds = Self {
            points,
            cells: Vec::new(),
            free: Vec::new(),
            hint: 0,
        };
        tds.push_cell([0, 1, 2, 3], [None; 4]);
        tds
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Position of a vertex.
    #[inline]
    pub fn point(&self, vertex: VertexId) -> DVec3 {
        self.points[vertex]
    }

    /// Returns true unless `vertex` is a super-tetrahedron corner.
    #[inline]
    pub fn is_finite_vertex(&self, vertex: VertexId) -> bool {
        vertex >= SUPER_VERTICES && vertex < self.points.len()
    }

    /// Number of inserted points.
    #[inline]
    pub fn number_of_finite_vertices(&self) -> usize {
        self.points.len() - SUPER_VERTICES
    }

    /// Inserted points with their ids, in insertion order.
    pub fn finite_vertices(&self) -> impl Iterator<Item = (VertexId, DVec3)> + '_ {
        self.points
            .iter()
            .copied()
            .enumerate()
            .skip(SUPER_VERTICES)
    }

    /// Returns true if `cell` exists and has not been destroyed.
    #[inline]
    pub fn is_alive(&self, cell: CellId) -> bool {
        self.cells.get(cell).is_some_and(|c| c.alive)
    }

    /// Returns true if `cell` is alive and has no super-tetrahedron corner.
    pub fn is_finite_cell(&self, cell: CellId) -> bool {
        self.is_alive(cell)
            && self.cells[cell]
                .vertices
                .iter()
                .all(|&v| self.is_finite_vertex(v))
    }

    /// Ids of all live cells.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.alive)
            .map(|(id, _)| id)
    }

    /// Ids of all live finite cells.
    pub fn finite_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells().filter(|&id| self.is_finite_cell(id))
    }

    /// Vertices of a cell, positively oriented.
    #[inline]
    pub fn cell_vertices(&self, cell: CellId) -> [VertexId; 4] {
        self.cells[cell].vertices
    }

    /// Cell across the facet opposite vertex `index`, if any.
    #[inline]
    pub fn neighbor(&self, cell: CellId, index: usize) -> Option<CellId> {
        self.cells[cell].neighbors[index]
    }

    /// Circumcenter of a cell.
    #[inline]
    pub fn circumcenter(&self, cell: CellId) -> DVec3 {
        self.cells[cell].circumcenter
    }

    /// Circumradius of a cell.
    pub fn circumradius(&self, cell: CellId) -> f64 {
        let c = &self.cells[cell];
        c.circumcenter.distance(self.points[c.vertices[0]])
    }

    /// Vertices of the facet opposite vertex `index`, ordered so the
    /// triangle's counter-clockwise normal points out of `cell`.
    pub fn facet_vertices(&self, cell: CellId, index: usize) -> [VertexId; 3] {
        let vertices = self.cells[cell].vertices;
        FACET_VERTICES[index].map(|k| vertices[k])
    }

    /// Index of the facet `(cell, index)` as seen from the neighbouring cell.
    pub fn mirror_index(&self, cell: CellId, index: usize) -> Option<usize> {
        let neighbor = self.cells[cell].neighbors[index]?;
        self.cells[neighbor]
            .neighbors
            .iter()
            .position(|&n| n == Some(cell))
    }

    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------

    /// Locates `p` by walking from the most recently created cell.
    ///
    /// # Errors
    ///
    /// [`MesherError::PointOutsideTriangulation`] if `p` is outside the
    /// super-tetrahedron or is not finite.
    pub(crate) fn locate(&self, p: DVec3) -> MesherResult<Location> {
        if !p.is_finite() {
            return Err(MesherError::PointOutsideTriangulation { point: p });
        }

        let mut current = if self.is_alive(self.hint) {
            self.hint
        } else {
            self.cells().next().unwrap_or(0)
        };

        let max_steps = self.cells.len() + 1;
        'walk: for step in 0..max_steps {
            let cell = &self.cells[current];
            // Rotate the first tested facet so degenerate walks cannot cycle
            // forever on the same facet order.
            for k in 0..4 {
                let i = (k + step) % 4;
                let [a, b, c] = FACET_VERTICES[i].map(|f| self.points[cell.vertices[f]]);
                if orient3d(a, b, c, p) < 0.0 {
                    match cell.neighbors[i] {
                        Some(next) => {
                            current = next;
                            continue 'walk;
                        }
                        None => return Err(MesherError::PointOutsideTriangulation { point: p }),
                    }
                }
            }
            return Ok(self.classify(current, p));
        }

        // The walk did not settle; scan every live cell.
        self.cells()
            .find(|&id| self.contains(id, p))
            .map(|id| self.classify(id, p))
            .ok_or(MesherError::PointOutsideTriangulation { point: p })
    }

    fn contains(&self, cell: CellId, p: DVec3) -> bool {
        let vertices = self.cells[cell].vertices;
        FACET_VERTICES.iter().all(|facet| {
            let [a, b, c] = facet.map(|f| self.points[vertices[f]]);
            orient3d(a, b, c, p) >= 0.0
        })
    }

    fn classify(&self, cell: CellId, p: DVec3) -> Location {
        self.cells[cell]
            .vertices
            .iter()
            .find(|&&v| self.points[v] == p)
            .map_or(Location::Cell(cell), |&v| Location::Vertex(v))
    }

    // -------------------------------------------------------------------------
    // Conflict zone
    // -------------------------------------------------------------------------

    fn in_conflict(&self, cell: CellId, p: DVec3) -> bool {
        let [a, b, c, d] = self.cells[cell].vertices.map(|v| self.points[v]);
        predicates::insphere(a, b, c, d, p) > 0.0
    }

    /// Cells whose circumsphere contains `p`, grown from `start` (a cell
    /// containing `p`) until every boundary facet sees `p` on its inner side.
    pub(crate) fn conflict_zone(&self, p: DVec3, start: CellId) -> ConflictZone {
        let mut in_zone = HashSet::from([start]);
        let mut cells = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            for neighbor in self.cells[cell].neighbors.into_iter().flatten() {
                if !in_zone.contains(&neighbor) && self.in_conflict(neighbor, p) {
                    in_zone.insert(neighbor);
                    cells.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        // Cospherical neighbours can leave a boundary facet coplanar with
        // `p`; absorb them so every new cell has positive volume.
        loop {
            let mut grown = false;
            for k in 0..cells.len() {
                let cell = cells[k];
                for i in 0..4 {
                    let Some(neighbor) = self.cells[cell].neighbors[i] else {
                        continue;
                    };
                    if in_zone.contains(&neighbor) {
                        continue;
                    }
                    let [a, b, c] = self.facet_vertices(cell, i).map(|v| self.points[v]);
                    if orient3d(a, b, c, p) <= 0.0 {
                        in_zone.insert(neighbor);
                        cells.push(neighbor);
                        grown = true;
                    }
                }
            }
            if !grown {
                break;
            }
        }

        let mut boundary = Vec::new();
        for &cell in &cells {
            for i in 0..4 {
                match self.cells[cell].neighbors[i] {
                    Some(neighbor) if in_zone.contains(&neighbor) => {}
                    _ => boundary.push((cell, i)),
                }
            }
        }

        ConflictZone { cells, boundary }
    }

    /// Conflict zone of `p`, unless `p` coincides with a vertex.
    pub(crate) fn conflicts(&self, p: DVec3) -> MesherResult<Conflicts> {
        Ok(match self.locate(p)? {
            Location::Vertex(v) => Conflicts::Vertex(v),
            Location::Cell(cell) => Conflicts::Zone(self.conflict_zone(p, cell)),
        })
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Inserts `p`, keeping the triangulation Delaunay.
    ///
    /// # Errors
    ///
    /// - [`MesherError::PointOutsideTriangulation`] if `p` cannot be located
    /// - [`MesherError::DegenerateCavity`] if the cavity cannot be
    ///   re-triangulated with positively oriented cells
    pub fn insert(&mut self, p: DVec3) -> MesherResult<InsertOutcome> {
        let zone = match self.conflicts(p)? {
            Conflicts::Zone(zone) => zone,
            Conflicts::Vertex(vertex) => return Ok(InsertOutcome::Duplicate(vertex)),
        };
        self.insert_in_zone(p, zone)
    }

    pub(crate) fn insert_in_zone(
        &mut self,
        p: DVec3,
        zone: ConflictZone,
    ) -> MesherResult<InsertOutcome> {
        for &(cell, i) in &zone.boundary {
            let [a, b, c] = self.facet_vertices(cell, i).map(|v| self.points[v]);
            if orient3d(a, b, c, p) <= 0.0 {
                return Err(MesherError::DegenerateCavity { point: p });
            }
        }

        let vertex = self.points.len();
        self.points.push(p);

        for &cell in &zone.cells {
            self.cells[cell].alive = false;
        }

        // Edge of a boundary facet -> (new cell, index opposite that edge).
        let mut open_faces: HashMap<(VertexId, VertexId), (CellId, usize)> = HashMap::new();
        let mut created = Vec::with_capacity(zone.boundary.len());

        for &(old, i) in &zone.boundary {
            let facet = self.facet_vertices(old, i);
            let outside = self.cells[old].neighbors[i];
            let new = self.push_cell([facet[0], facet[1], facet[2], vertex], [None, None, None, outside]);

            if let Some(outside) = outside {
                if let Some(slot) = self.cells[outside]
                    .neighbors
                    .iter_mut()
                    .find(|n| **n == Some(old))
                {
                    *slot = Some(new);
                }
            }

            // Facet opposite facet[k] holds the other two facet vertices and p.
            for k in 0..3 {
                let (u, w) = (facet[(k + 1) % 3], facet[(k + 2) % 3]);
                let key = (u.min(w), u.max(w));
                match open_faces.remove(&key) {
                    Some((other, j)) => {
                        self.cells[new].neighbors[k] = Some(other);
                        self.cells[other].neighbors[j] = Some(new);
                    }
                    None => {
                        open_faces.insert(key, (new, k));
                    }
                }
            }
            created.push(new);
        }

        if let Some(&last) = created.last() {
            self.hint = last;
        }
        self.free.extend_from_slice(&zone.cells);

        Ok(InsertOutcome::Inserted {
            vertex,
            removed: zone.cells,
            created,
        })
    }

    fn push_cell(&mut self, vertices: [VertexId; 4], neighbors: [Option<CellId>; 4]) -> CellId {
        let [a, b, c, d] = vertices.map(|v| self.points[v]);
        let cell = Cell {
            vertices,
            neighbors,
            circumcenter: predicates::circumcenter(a, b, c, d),
            alive: true,
        };
        match self.free.pop() {
            Some(id) => {
                self.cells[id] = cell;
                id
            }
            None => {
                self.cells.push(cell);
                self.cells.len() - 1
            }
        }
    }
}
