//! # Cube Polygon Table
//!
//! For each of the 256 sign configurations of a cube's corners, the closed
//! polygons (as sequences of crossed edges) separating positive from
//! non-positive corners. The table is generated by walking crossed edges
//! clockwise around cube faces rather than stored as literals.

// =============================================================================
// CUBE TOPOLOGY
// =============================================================================

// Faces
const L: usize = 0; // -x
const R: usize = 1; // +x
const B: usize = 2; // -y
const T: usize = 3; // +y
const N: usize = 4; // -z
const F: usize = 5; // +z

// Corners; corner `n` sits at lattice offset (bit 2, bit 1, bit 0) of `n`.
pub(super) const LBN: usize = 0;
pub(super) const LBF: usize = 1;
pub(super) const LTN: usize = 2;
pub(super) const LTF: usize = 3;
pub(super) const RBN: usize = 4;
pub(super) const RBF: usize = 5;
pub(super) const RTN: usize = 6;
pub(super) const RTF: usize = 7;

// Edges
const LB: usize = 0;
const LT: usize = 1;
const LN: usize = 2;
const LF: usize = 3;
const RB: usize = 4;
const RT: usize = 5;
const RN: usize = 6;
const RF: usize = 7;
const BN: usize = 8;
const BF: usize = 9;
const TN: usize = 10;
const TF: usize = 11;

/// First corner of each edge.
pub(super) const CORNER1: [usize; 12] = [LBN, LTN, LBN, LBF, RBN, RTN, RBN, RBF, LBN, LBF, LTN, LTF];
/// Second corner of each edge.
pub(super) const CORNER2: [usize; 12] = [LBF, LTF, LTN, LTF, RBF, RTF, RTN, RTF, RBN, RBF, RTN, RTF];
/// Face on the left when travelling from corner 1 to corner 2.
const LEFT_FACE: [usize; 12] = [B, L, L, F, R, T, N, R, N, B, T, F];
/// Face on the right when travelling from corner 1 to corner 2.
const RIGHT_FACE: [usize; 12] = [L, T, N, L, B, R, R, F, B, F, N, T];

/// Next clockwise edge from `edge` around `face`.
fn next_cw_edge(edge: usize, face: usize) -> usize {
    match edge {
        LB => if face == L { LF } else { BN },
        LT => if face == L { LN } else { TF },
        LN => if face == L { LB } else { TN },
        LF => if face == L { LT } else { BF },
        RB => if face == R { RN } else { BF },
        RT => if face == R { RF } else { TN },
        RN => if face == R { RT } else { BN },
        RF => if face == R { RB } else { TF },
        BN => if face == B { RB } else { LN },
        BF => if face == B { LB } else { RF },
        TN => if face == T { LT } else { RN },
        _ => if face == T { RT } else { LF },
    }
}

/// Face adjoining `edge` that is not `face`.
fn other_face(edge: usize, face: usize) -> usize {
    let other = LEFT_FACE[edge];
    if face == other {
        RIGHT_FACE[edge]
    } else {
        other
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Polygon table indexed by the corner sign bitmask (bit `n` set when corner
/// `n` is positive).
#[derive(Debug, Clone)]
pub(super) struct CubeTable {
    polygons: Vec<Vec<Vec<usize>>>,
}

impl CubeTable {
    pub(super) fn new() -> Self {
        let polygons = (0..256usize).map(polygons_for).collect();
        Self { polygons }
    }

    /// Polygons for the given sign configuration, each a list of edges.
    pub(super) fn polygons(&self, index: usize) -> &[Vec<usize>] {
        &self.polygons[index]
    }
}

fn polygons_for(index: usize) -> Vec<Vec<usize>> {
    let positive: [bool; 8] = std::array::from_fn(|corner| (index >> corner) & 1 == 1);
    let crosses = |edge: usize| positive[CORNER1[edge]] != positive[CORNER2[edge]];

    let mut done = [false; 12];
    let mut polygons = Vec::new();

    for start in 0..12 {
        if done[start] || !crosses(start) {
            continue;
        }

        let mut edges = Vec::new();
        let mut edge = start;
        // Face to the right of the edge when going from positive to negative.
        let mut face = if positive[CORNER1[start]] {
            RIGHT_FACE[start]
        } else {
            LEFT_FACE[start]
        };

        loop {
            edge = next_cw_edge(edge, face);
            done[edge] = true;
            if crosses(edge) {
                edges.push(edge);
                if edge == start {
                    break;
                }
                face = other_face(edge, face);
            }
        }

        edges.reverse();
        polygons.push(edges);
    }

    polygons
}
