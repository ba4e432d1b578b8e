//! Code matching against a dictionary, over the four marker rotations.

use crate::Dictionary;

/// Best dictionary entry for an observed code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub id: u32,
    /// Quarter turns such that `observed == rotate_code_u64(code(id), n, rotation)`.
    pub rotation: u8,
    /// Differing bits after rotation.
    pub hamming: u8,
}

/// Brute-force matcher: every embedded id, every rotation.
///
/// Dictionaries top out at 1000 ids, so a linear scan per candidate quad is
/// cheap next to the image sampling that produced the code.
#[derive(Clone, Debug)]
pub struct Matcher {
    dict: Dictionary,
    max_hamming: u8,
    table: Vec<[u64; 4]>,
}

impl Matcher {
    /// `max_hamming` is capped at the dictionary's correction capacity.
    pub fn new(dict: Dictionary, max_hamming: u8) -> Self {
        let n = dict.marker_size;
        let table = dict
            .codes
            .iter()
            .map(|&code| std::array::from_fn(|r| rotate_code_u64(code, n, r as u8)))
            .collect();
        Self {
            dict,
            max_hamming: max_hamming.min(dict.max_correction_bits),
            table,
        }
    }

    #[inline]
    pub fn dictionary(&self) -> Dictionary {
        self.dict
    }

    #[inline]
    pub fn max_hamming(&self) -> u8 {
        self.max_hamming
    }

    /// Closest entry within `max_hamming`; ties go to the lowest id, then
    /// the lowest rotation.
    pub fn match_code(&self, observed: u64) -> Option<Match> {
        self.table
            .iter()
            .enumerate()
            .flat_map(|(id, rots)| {
                rots.iter().enumerate().map(move |(rotation, &code)| Match {
                    id: id as u32,
                    rotation: rotation as u8,
                    hamming: (observed ^ code).count_ones() as u8,
                })
            })
            .filter(|m| m.hamming <= self.max_hamming)
            .min_by_key(|m| m.hamming)
    }
}

/// Rotate an `n × n` row-major code (`idx = y * n + x`) by `rot` quarter
/// turns clockwise.
pub fn rotate_code_u64(code: u64, n: usize, rot: u8) -> u64 {
    (0..rot & 3).fold(code, |c, _| quarter_turn(c, n))
}

fn quarter_turn(code: u64, n: usize) -> u64 {
    let mut out = 0u64;
    for y in 0..n {
        for x in 0..n {
            // Clockwise: the destination row is read from the source column,
            // bottom to top.
            let src = (n - 1 - x) * n + y;
            out |= ((code >> src) & 1) << (y * n + x);
        }
    }
    out
}
