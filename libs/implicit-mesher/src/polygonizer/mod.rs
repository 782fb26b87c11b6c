//! # Continuation Polygonizer
//!
//! Bloomenthal's implicit surface polygonizer: starting from a point near the
//! surface, march a lattice of cubes outward along the surface, visiting only
//! cubes whose faces straddle the zero level set.
//!
//! ## Algorithm
//!
//! 1. Find one positive and one non-positive field sample near the seed and
//!    converge them to a surface point; center cube `(0, 0, 0)` there.
//! 2. Pop a cube, polygonize it (cube table or six tetrahedra), push every
//!    unvisited face-neighbour whose shared face changes sign.
//! 3. Stop when the stack is empty. Cubes further than the step budget from
//!    the start cube are never visited.
//!
//! ## Output
//!
//! A [`Polygonization`]: vertices on crossed lattice edges, their unit
//! gradient normals, and triangles wound counter-clockwise when viewed from
//! the positive side of the field.

mod cube_table;

use std::collections::{HashMap, HashSet};

use config::constants::{
    CONVERGE_ITERATIONS, NORMAL_DELTA_DIVISOR, RANDOM_SEED, START_SEARCH_ATTEMPTS,
    START_SEARCH_GROWTH,
};
use glam::{IVec3, Vec3};

use crate::error::{MesherError, MesherResult};
use crate::field::{PolygonizerField, ScalarField};
use crate::rng::Lcg;

use cube_table::{CubeTable, CORNER1, CORNER2, LBF, LBN, LTF, LTN, RBF, RBN, RTF, RTN};

// =============================================================================
// OUTPUT
// =============================================================================

/// Raw output of the continuation polygonizer.
///
/// `normals[i]` belongs to `vertices[i]`; triangles index into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygonization {
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) normals: Vec<Vec3>,
    pub(crate) triangles: Vec<[u32; 3]>,
}

impl Polygonization {
    /// Builds a polygonization from raw arrays.
    ///
    /// No consistency checks are made here; export rejects triangles that
    /// index past the vertex list.
    pub fn from_raw(vertices: Vec<Vec3>, normals: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            normals,
            triangles,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if no triangle was generated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Unit vertex normals, parallel to [`Polygonization::vertices`].
    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangles as vertex index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}

// =============================================================================
// POLYGONIZER
// =============================================================================

/// Cube-marching polygonizer over a scalar field.
///
/// # Example
///
/// ```rust
/// use implicit_mesher::{PolygonizerField, Polygonizer};
/// use glam::{DVec3, Vec3};
///
/// let sphere = |p: DVec3| p.length() - 1.0;
/// let field = PolygonizerField::new(Some(&sphere)).unwrap();
/// let result = Polygonizer::new(field, 0.2, 10).march(false, Vec3::X).unwrap();
/// assert!(result.triangle_count() > 0);
/// ```
#[derive(Debug)]
pub struct Polygonizer<'a, F: ?Sized> {
    field: PolygonizerField<'a, F>,
    size: f32,
    bounds: i32,
}

impl<'a, F: ScalarField + ?Sized> Polygonizer<'a, F> {
    /// Creates a polygonizer with lattice edge length `size`, visiting cubes
    /// at most `bounds` steps from the start cube along each axis.
    pub fn new(field: PolygonizerField<'a, F>, size: f32, bounds: u32) -> Self {
        Self {
            field,
            size,
            bounds: i32::try_from(bounds).unwrap_or(i32::MAX),
        }
    }

    /// Lattice edge length.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Marches the surface component near `seed`.
    ///
    /// With `tetrahedralize` set each cube is split into six tetrahedra,
    /// which avoids the cube table's ambiguous configurations at the cost of
    /// more triangles.
    ///
    /// # Errors
    ///
    /// [`MesherError::StartNotFound`] if no sign change is found near `seed`.
    pub fn march(&self, tetrahedralize: bool, seed: Vec3) -> MesherResult<Polygonization> {
        let mut march = March::new(self);
        let start = march.find_start(seed).ok_or(MesherError::StartNotFound {
            seed: seed.as_dvec3(),
        })?;
        march.start = start;
        log::debug!(
            "Polygonizer: start point {start} (cell size {}, bounds {})",
            self.size,
            self.bounds
        );

        let origin = march.cube_at(IVec3::ZERO);
        march.centers.insert(IVec3::ZERO);
        march.stack.push(origin);

        while let Some(cube) = march.stack.pop() {
            if tetrahedralize {
                march.tetrahedralize_cube(&cube);
            } else {
                march.polygonize_cube(&cube);
            }
            march.push_neighbours(&cube);
        }

        log::debug!(
            "Polygonizer: visited {} cubes, {} vertices, {} triangles",
            march.centers.len(),
            march.output.vertices.len(),
            march.output.triangles.len()
        );
        Ok(march.output)
    }
}

// =============================================================================
// MARCH STATE
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Corner {
    lattice: IVec3,
    position: Vec3,
    value: f32,
}

impl Corner {
    #[inline]
    fn positive(&self) -> bool {
        self.value > 0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Cube {
    lattice: IVec3,
    corners: [Corner; 8],
}

/// Lattice offset of corner `n`: x from bit 2, y from bit 1, z from bit 0.
#[inline]
fn corner_offset(n: usize) -> IVec3 {
    IVec3::new(((n >> 2) & 1) as i32, ((n >> 1) & 1) as i32, (n & 1) as i32)
}

/// Ordered key of the lattice edge between two corners.
#[inline]
fn edge_key(a: IVec3, b: IVec3) -> ([i32; 3], [i32; 3]) {
    let (a, b) = (a.to_array(), b.to_array());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Crossed-edge triangles for each tetrahedron sign configuration, indexed
/// by `8a + 4b + 2c + d`. Entries name the edges ab, ac, ad, bc, bd, cd as
/// 0 through 5.
const TET_TRIANGLES: [&[[usize; 3]]; 16] = [
    &[],
    &[[4, 5, 2]],
    &[[1, 5, 3]],
    &[[2, 4, 3], [2, 3, 1]],
    &[[0, 3, 4]],
    &[[2, 0, 3], [2, 3, 5]],
    &[[0, 1, 5], [0, 5, 4]],
    &[[0, 1, 2]],
    &[[0, 2, 1]],
    &[[0, 4, 5], [0, 5, 1]],
    &[[0, 2, 5], [0, 5, 3]],
    &[[0, 4, 3]],
    &[[2, 1, 3], [2, 3, 4]],
    &[[5, 1, 3]],
    &[[4, 2, 5]],
    &[],
];

/// Corner quadruples of the six tetrahedra a cube is split into.
const CUBE_TETRAHEDRA: [[usize; 4]; 6] = [
    [LBN, LTN, RBN, LBF],
    [RTN, LTN, LBF, RBN],
    [RTN, LTN, LTF, LBF],
    [RTN, RBN, LBF, RBF],
    [RTN, LBF, LTF, RBF],
    [RTN, LTF, RTF, RBF],
];

/// For each face (L, R, B, T, N, F): the lattice step to the neighbour, the
/// corner index bit toggled when crossing, and the face's corners.
const CUBE_FACES: [(IVec3, usize, [usize; 4]); 6] = [
    (IVec3::new(-1, 0, 0), 2, [LBN, LBF, LTN, LTF]),
    (IVec3::new(1, 0, 0), 2, [RBN, RBF, RTN, RTF]),
    (IVec3::new(0, -1, 0), 1, [LBN, LBF, RBN, RBF]),
    (IVec3::new(0, 1, 0), 1, [LTN, LTF, RTN, RTF]),
    (IVec3::new(0, 0, -1), 0, [LBN, LTN, RBN, RTN]),
    (IVec3::new(0, 0, 1), 0, [LBF, LTF, RBF, RTF]),
];

struct March<'p, 'a, F: ?Sized> {
    polygonizer: &'p Polygonizer<'a, F>,
    table: CubeTable,
    rng: Lcg,
    start: Vec3,
    delta: f32,
    corners: HashMap<IVec3, f32>,
    centers: HashSet<IVec3>,
    edges: HashMap<([i32; 3], [i32; 3]), u32>,
    stack: Vec<Cube>,
    output: Polygonization,
}

impl<'p, 'a, F: ScalarField + ?Sized> March<'p, 'a, F> {
    fn new(polygonizer: &'p Polygonizer<'a, F>) -> Self {
        Self {
            polygonizer,
            table: CubeTable::new(),
            rng: Lcg::new(RANDOM_SEED),
            start: Vec3::ZERO,
            delta: polygonizer.size / NORMAL_DELTA_DIVISOR,
            corners: HashMap::new(),
            centers: HashSet::new(),
            edges: HashMap::new(),
            stack: Vec::new(),
            output: Polygonization::default(),
        }
    }

    #[inline]
    fn eval(&self, p: Vec3) -> f32 {
        self.polygonizer.field.eval_at(p)
    }

    // -------------------------------------------------------------------------
    // Start search
    // -------------------------------------------------------------------------

    fn find_start(&mut self, seed: Vec3) -> Option<Vec3> {
        let (positive, value) = self.find(true, seed)?;
        let (negative, _) = self.find(false, seed)?;
        Some(self.converge(positive, negative, value))
    }

    /// Random probe around `seed` with the requested sign, within a range
    /// that slowly grows from one cell.
    fn find(&mut self, positive: bool, seed: Vec3) -> Option<(Vec3, f32)> {
        let mut range = self.polygonizer.size;
        for _ in 0..START_SEARCH_ATTEMPTS {
            let p = Vec3::new(
                seed.x + range * (self.rng.next_f32() - 0.5),
                seed.y + range * (self.rng.next_f32() - 0.5),
                seed.z + range * (self.rng.next_f32() - 0.5),
            );
            let value = self.eval(p);
            if (value > 0.0) == positive {
                return Some((p, value));
            }
            range *= START_SEARCH_GROWTH;
        }
        None
    }

    /// Bisects the segment `p1 p2` towards the zero crossing; `v1` is the
    /// field value at `p1`.
    fn converge(&self, p1: Vec3, p2: Vec3, v1: f32) -> Vec3 {
        let (mut pos, mut neg) = if v1 < 0.0 { (p2, p1) } else { (p1, p2) };
        let mut i = 0;
        loop {
            let p = (pos + neg) * 0.5;
            if i == CONVERGE_ITERATIONS {
                return p;
            }
            i += 1;
            if self.eval(p) > 0.0 {
                pos = p;
            } else {
                neg = p;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lattice
    // -------------------------------------------------------------------------

    fn corner(&mut self, lattice: IVec3) -> Corner {
        let size = self.polygonizer.size;
        let position = self.start + (lattice.as_vec3() - Vec3::splat(0.5)) * size;
        let value = match self.corners.get(&lattice) {
            Some(&value) => value,
            None => {
                let value = self.eval(position);
                self.corners.insert(lattice, value);
                value
            }
        };
        Corner {
            lattice,
            position,
            value,
        }
    }

    fn cube_at(&mut self, lattice: IVec3) -> Cube {
        let corners = std::array::from_fn(|n| self.corner(lattice + corner_offset(n)));
        Cube { lattice, corners }
    }

    fn push_neighbours(&mut self, cube: &Cube) {
        for (step, bit, corners) in &CUBE_FACES {
            self.test_face(cube, cube.lattice + *step, *bit, corners);
        }
    }

    /// Pushes the neighbour at `lattice` when the shared face changes sign
    /// and the neighbour is new and within bounds.
    fn test_face(&mut self, old: &Cube, lattice: IVec3, bit: usize, shared: &[usize; 4]) {
        let sign = old.corners[shared[0]].positive();
        if shared[1..]
            .iter()
            .all(|&c| old.corners[c].positive() == sign)
        {
            return;
        }
        let bounds = self.polygonizer.bounds;
        if lattice.abs().max_element() > bounds {
            return;
        }
        if !self.centers.insert(lattice) {
            return;
        }

        let mut kept: [Option<Corner>; 8] = [None; 8];
        for &c in shared {
            kept[c ^ (1 << bit)] = Some(old.corners[c]);
        }
        let corners = std::array::from_fn(|n| match kept[n] {
            Some(corner) => corner,
            None => self.corner(lattice + corner_offset(n)),
        });
        self.stack.push(Cube { lattice, corners });
    }

    // -------------------------------------------------------------------------
    // Vertices and triangles
    // -------------------------------------------------------------------------

    /// Vertex on the edge between two corners of opposite sign, created on
    /// first use.
    fn vertex(&mut self, a: &Corner, b: &Corner) -> u32 {
        let key = edge_key(a.lattice, b.lattice);
        if let Some(&id) = self.edges.get(&key) {
            return id;
        }
        let position = self.converge(a.position, b.position, a.value);
        let normal = self.polygonizer.field.normal(position, self.delta);
        let id = self.output.vertices.len() as u32;
        self.output.vertices.push(position);
        self.output.normals.push(normal);
        self.edges.insert(key, id);
        id
    }

    /// Emits a triangle given in negative-side winding.
    #[inline]
    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.output.triangles.push([a, c, b]);
    }

    fn polygonize_cube(&mut self, cube: &Cube) {
        let index = cube
            .corners
            .iter()
            .enumerate()
            .filter(|(_, corner)| corner.positive())
            .fold(0usize, |index, (n, _)| index | (1 << n));

        // Copied out: vertex creation needs `&mut self`.
        let polygons = self.table.polygons(index).to_vec();
        for edges in polygons {
            let ids: Vec<u32> = edges
                .iter()
                .map(|&edge| self.vertex(&cube.corners[CORNER1[edge]], &cube.corners[CORNER2[edge]]))
                .collect();
            // Fan around the first vertex.
            for k in 2..ids.len() {
                self.triangle(ids[0], ids[k - 1], ids[k]);
            }
        }
    }

    fn tetrahedralize_cube(&mut self, cube: &Cube) {
        for [a, b, c, d] in CUBE_TETRAHEDRA {
            self.tetrahedron(
                &cube.corners[a],
                &cube.corners[b],
                &cube.corners[c],
                &cube.corners[d],
            );
        }
    }

    /// Triangulates the surface inside one tetrahedron; `b`, `c`, `d` appear
    /// clockwise when viewed from `a`.
    fn tetrahedron(&mut self, a: &Corner, b: &Corner, c: &Corner, d: &Corner) {
        let index = (usize::from(a.positive()) << 3)
            | (usize::from(b.positive()) << 2)
            | (usize::from(c.positive()) << 1)
            | usize::from(d.positive());
        let triangles = TET_TRIANGLES[index];
        if triangles.is_empty() {
            return;
        }

        // Every crossed edge is used by the case's triangles; uncrossed
        // edges keep an id no triangle refers to.
        let pairs = [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)];
        let mut edges = [u32::MAX; 6];
        for (slot, (p, q)) in edges.iter_mut().zip(pairs) {
            if p.positive() != q.positive() {
                *slot = self.vertex(p, q);
            }
        }

        for &[i, j, k] in triangles {
            self.triangle(edges[i], edges[j], edges[k]);
        }
    }
}

#[cfg(test)]
mod tests;
