//! # Delaunay Refinement
//!
//! Surface and volume meshing by Delaunay refinement over an
//! [`ImplicitDomain`].
//!
//! ## Restricted Facets
//!
//! A facet belongs to the surface complex when its two incident cells have
//! circumcenters with different domain labels. The dual Voronoi edge then
//! crosses the surface; the crossing point is the center of the facet's
//! *surface Delaunay ball*, which passes through the facet's corners.
//!
//! ## Refinement Loop
//!
//! 1. Seed the triangulation with a few boundary points
//! 2. While a restricted facet is bad, insert its surface center
//! 3. Otherwise, while a domain cell is bad, insert its circumcenter, unless
//!    that point falls in the surface Delaunay ball of a restricted facet it
//!    would destroy; that facet is refined instead
//!
//! No perturbation or exudation pass follows the loop.

pub mod criteria;
pub mod domain;

use std::collections::{BTreeMap, HashSet, VecDeque};

use config::constants::RANDOM_SEED;
use glam::DVec3;

use crate::config::MesherConfig;
use crate::delaunay::{CellId, Conflicts, InsertOutcome, Tetrahedralization, VertexId};
use crate::error::MesherResult;
use crate::field::ScalarField;
use crate::rng::Lcg;

use criteria::MeshCriteria;
use domain::{ImplicitDomain, OUTSIDE};

// =============================================================================
// SURFACE COMPLEX
// =============================================================================

/// A facet of a tetrahedralization, named by a cell and the index of the
/// cell vertex opposite the facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facet {
    /// Cell on the inner side of the surface
    pub cell: CellId,
    /// Index (0..4) of the vertex of `cell` not on the facet
    pub index: usize,
}

/// Refined triangulation together with its restricted surface facets.
#[derive(Debug, Clone)]
pub struct SurfaceComplex {
    triangulation: Tetrahedralization,
    facets: Vec<Facet>,
}

impl SurfaceComplex {
    pub(crate) fn from_parts(triangulation: Tetrahedralization, facets: Vec<Facet>) -> Self {
        Self {
            triangulation,
            facets,
        }
    }

    /// The underlying triangulation, including vertices not on the surface.
    pub fn triangulation(&self) -> &Tetrahedralization {
        &self.triangulation
    }

    /// Facets in the surface complex. The cell of each facet lies inside the
    /// domain, so the facet's outward ordering faces out of the domain.
    pub fn facets_in_complex(&self) -> &[Facet] {
        &self.facets
    }

    /// Number of facets in the surface complex.
    pub fn number_of_facets_in_complex(&self) -> usize {
        self.facets.len()
    }

    /// Returns true if no facet belongs to the surface complex.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// Refines a Delaunay triangulation of `domain` until every restricted
/// facet and domain cell meets `criteria`, or the step budget in `config`
/// runs out (the mesh refined so far is returned, with a warning logged).
///
/// An empty complex is returned when no boundary point is found.
///
/// # Errors
///
/// Triangulation integrity errors ([`crate::MesherError::PointOutsideTriangulation`],
/// [`crate::MesherError::DegenerateCavity`]).
pub fn refine<F: ScalarField + ?Sized>(
    domain: &ImplicitDomain<'_, F>,
    criteria: &MeshCriteria,
    config: &MesherConfig,
) -> MesherResult<SurfaceComplex> {
    let mut refiner = Refiner::new(domain, criteria, config.max_refinement_steps);

    let mut rng = Lcg::new(RANDOM_SEED);
    let initial = domain.initial_points(config.initial_surface_points, &mut rng);
    log::debug!("Refinement: {} initial surface points", initial.len());
    if initial.is_empty() {
        return Ok(SurfaceComplex::from_parts(refiner.tds, Vec::new()));
    }

    for p in initial {
        refiner.insert(p, true)?;
    }
    let cells: Vec<CellId> = refiner.tds.cells().collect();
    refiner.scan(&cells);
    refiner.run()?;

    let Refiner {
        tds, restricted, ..
    } = refiner;
    let facets = restricted.into_values().map(|f| f.facet).collect();
    Ok(SurfaceComplex::from_parts(tds, facets))
}

#[derive(Debug, Clone, Copy)]
struct RestrictedFacet {
    facet: Facet,
    surface_center: DVec3,
}

type FacetKey = [VertexId; 3];

struct Refiner<'d, 'a, F: ?Sized> {
    domain: &'d ImplicitDomain<'a, F>,
    criteria: MeshCriteria,
    tds: Tetrahedralization,
    restricted: BTreeMap<FacetKey, RestrictedFacet>,
    surface_vertices: HashSet<VertexId>,
    bad_facets: VecDeque<FacetKey>,
    bad_cells: VecDeque<CellId>,
    steps: usize,
    max_steps: usize,
}

impl<'d, 'a, F: ScalarField + ?Sized> Refiner<'d, 'a, F> {
    fn new(domain: &'d ImplicitDomain<'a, F>, criteria: &MeshCriteria, max_steps: usize) -> Self {
        Self {
            domain,
            criteria: *criteria,
            tds: Tetrahedralization::new(domain.bounding_sphere()),
            restricted: BTreeMap::new(),
            surface_vertices: HashSet::new(),
            bad_facets: VecDeque::new(),
            bad_cells: VecDeque::new(),
            steps: 0,
            max_steps,
        }
    }

    fn run(&mut self) -> MesherResult<()> {
        loop {
            if self.bad_facets.is_empty() && self.bad_cells.is_empty() {
                break;
            }
            if self.steps >= self.max_steps {
                log::warn!(
                    "Refinement: stopped after {} insertions with {} bad facets and {} bad cells left",
                    self.steps,
                    self.bad_facets.len(),
                    self.bad_cells.len()
                );
                break;
            }

            if let Some(key) = self.bad_facets.pop_front() {
                if let Some(facet) = self.restricted.get(&key).copied() {
                    if self.is_bad_facet(&key, &facet) && self.insert(facet.surface_center, true)? {
                        self.steps += 1;
                    }
                }
                continue;
            }

            if let Some(cell) = self.bad_cells.pop_front() {
                if self.is_bad_cell(cell) && self.refine_cell(cell)? {
                    self.steps += 1;
                }
            }
        }

        log::debug!(
            "Refinement: {} insertions, {} vertices, {} restricted facets",
            self.steps,
            self.tds.number_of_finite_vertices(),
            self.restricted.len()
        );
        Ok(())
    }

    /// Returns true if a point was inserted.
    fn refine_cell(&mut self, cell: CellId) -> MesherResult<bool> {
        let center = self.tds.circumcenter(cell);
        let zone = match self.tds.conflicts(center)? {
            Conflicts::Zone(zone) => zone,
            Conflicts::Vertex(_) => return Ok(false),
        };

        for &c in &zone.cells {
            for i in 0..4 {
                let key = facet_key(self.tds.facet_vertices(c, i));
                let Some(facet) = self.restricted.get(&key) else {
                    continue;
                };
                let radius = facet.surface_center.distance(self.tds.point(key[0]));
                if center.distance(facet.surface_center) < radius {
                    let surface_center = facet.surface_center;
                    return self.insert(surface_center, true);
                }
            }
        }

        let outcome = self.tds.insert_in_zone(center, zone)?;
        Ok(self.apply(outcome, false))
    }

    /// Returns true if `p` was new.
    fn insert(&mut self, p: DVec3, on_surface: bool) -> MesherResult<bool> {
        let outcome = self.tds.insert(p)?;
        Ok(self.apply(outcome, on_surface))
    }

    fn apply(&mut self, outcome: InsertOutcome, on_surface: bool) -> bool {
        let InsertOutcome::Inserted {
            vertex,
            removed,
            created,
        } = outcome
        else {
            return false;
        };

        if on_surface {
            self.surface_vertices.insert(vertex);
        }
        for cell in removed {
            for i in 0..4 {
                self.restricted
                    .remove(&facet_key(self.tds.facet_vertices(cell, i)));
            }
        }
        self.scan(&created);
        true
    }

    /// Classifies every facet of `cells` and queues what is bad.
    fn scan(&mut self, cells: &[CellId]) {
        for &cell in cells {
            for i in 0..4 {
                self.classify_facet(cell, i);
            }
            if self.is_bad_cell(cell) {
                self.bad_cells.push_back(cell);
            }
        }
    }

    fn classify_facet(&mut self, cell: CellId, index: usize) {
        let vertices = self.tds.facet_vertices(cell, index);
        let key = facet_key(vertices);
        if !vertices.iter().all(|&v| self.tds.is_finite_vertex(v)) {
            return;
        }
        let (Some(neighbor), Some(mirror)) = (
            self.tds.neighbor(cell, index),
            self.tds.mirror_index(cell, index),
        ) else {
            return;
        };

        let here = self.tds.circumcenter(cell);
        let there = self.tds.circumcenter(neighbor);
        let label = self.domain.label(here);
        if label == self.domain.label(there) {
            self.restricted.remove(&key);
            return;
        }
        let Some(surface_center) = self.domain.intersect(here, there) else {
            return;
        };

        let facet = if label != OUTSIDE {
            Facet { cell, index }
        } else {
            Facet {
                cell: neighbor,
                index: mirror,
            }
        };
        let restricted = RestrictedFacet {
            facet,
            surface_center,
        };
        if self.is_bad_facet(&key, &restricted) {
            self.bad_facets.push_back(key);
        }
        self.restricted.insert(key, restricted);
    }

    fn is_bad_facet(&self, key: &FacetKey, facet: &RestrictedFacet) -> bool {
        if !key.iter().all(|v| self.surface_vertices.contains(v)) {
            return true;
        }
        let corners = key.map(|v| self.tds.point(v));
        self.criteria
            .facet
            .is_bad(corners, facet.surface_center)
    }

    fn is_bad_cell(&self, cell: CellId) -> bool {
        if !self.tds.is_finite_cell(cell) {
            return false;
        }
        if self.domain.label(self.tds.circumcenter(cell)) == OUTSIDE {
            return false;
        }
        let corners = self.tds.cell_vertices(cell).map(|v| self.tds.point(v));
        self.criteria
            .cell
            .is_bad(corners, self.tds.circumradius(cell))
    }
}

fn facet_key(mut vertices: [VertexId; 3]) -> FacetKey {
    vertices.sort_unstable();
    vertices
}
