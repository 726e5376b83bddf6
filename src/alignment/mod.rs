//! Minimum edit distance alignment.
//!
//! Classic Levenshtein dynamic programming over a flat `(n + 1) × (m + 1)` table
//! with one direction code per cell. Insertions and deletions cost 1; the caller's
//! cost function decides between a match (0) and a substitution (anything else).
//! When several paths have the same cost, backtracking prefers the diagonal, then
//! a deletion, then an insertion.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Range};

use serde::{Deserialize, Serialize};

/// Type of a single alignment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    /// Tokens compare equal.
    Match,
    /// Tokens differ.
    Substitution,
    /// Hypothesis token with no reference counterpart.
    Insertion,
    /// Reference token missing from the hypothesis.
    Deletion,
}

/// One alignment operation, holding indices into the aligned sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Reference and hypothesis tokens compare equal.
    Match {
        /// Index into the reference sequence.
        reference: usize,
        /// Index into the hypothesis sequence.
        hypothesis: usize,
    },
    /// Reference token replaced by a different hypothesis token.
    Substitution {
        /// Index into the reference sequence.
        reference: usize,
        /// Index into the hypothesis sequence.
        hypothesis: usize,
    },
    /// Hypothesis token with no reference counterpart.
    Insertion {
        /// Index into the hypothesis sequence.
        hypothesis: usize,
    },
    /// Reference token with no hypothesis counterpart.
    Deletion {
        /// Index into the reference sequence.
        reference: usize,
    },
}

impl EditOp {
    /// The operation type.
    pub const fn op_type(self) -> OpType {
        match self {
            Self::Match { .. } => OpType::Match,
            Self::Substitution { .. } => OpType::Substitution,
            Self::Insertion { .. } => OpType::Insertion,
            Self::Deletion { .. } => OpType::Deletion,
        }
    }

    /// Reference index, if the operation consumes a reference token.
    pub const fn reference(self) -> Option<usize> {
        match self {
            Self::Match { reference, .. }
            | Self::Substitution { reference, .. }
            | Self::Deletion { reference } => Some(reference),
            Self::Insertion { .. } => None,
        }
    }

    /// Hypothesis index, if the operation consumes a hypothesis token.
    pub const fn hypothesis(self) -> Option<usize> {
        match self {
            Self::Match { hypothesis, .. }
            | Self::Substitution { hypothesis, .. }
            | Self::Insertion { hypothesis } => Some(hypothesis),
            Self::Deletion { .. } => None,
        }
    }
}

/// Tally of alignment operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCounts {
    /// Matches.
    pub hits: usize,
    /// Substitutions.
    pub substitutions: usize,
    /// Deletions.
    pub deletions: usize,
    /// Insertions.
    pub insertions: usize,
}

impl EditCounts {
    /// Substitutions + deletions + insertions.
    pub const fn errors(&self) -> usize {
        self.substitutions + self.deletions + self.insertions
    }

    /// Number of reference tokens covered.
    pub const fn reference_len(&self) -> usize {
        self.hits + self.substitutions + self.deletions
    }

    /// Number of hypothesis tokens covered.
    pub const fn hypothesis_len(&self) -> usize {
        self.hits + self.substitutions + self.insertions
    }

    /// Number of alignment operations.
    pub const fn total(&self) -> usize {
        self.hits + self.errors()
    }

    /// Count one operation of the given type.
    pub fn record(&mut self, op: OpType) {
        match op {
            OpType::Match => self.hits += 1,
            OpType::Substitution => self.substitutions += 1,
            OpType::Insertion => self.insertions += 1,
            OpType::Deletion => self.deletions += 1,
        }
    }
}

impl Add for EditCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            hits: self.hits + rhs.hits,
            substitutions: self.substitutions + rhs.substitutions,
            deletions: self.deletions + rhs.deletions,
            insertions: self.insertions + rhs.insertions,
        }
    }
}

impl AddAssign for EditCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for EditCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A maximal run of operations of the same type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentChunk {
    /// Operation type shared by the run.
    pub op: OpType,
    /// Reference tokens covered (empty for insertions).
    pub reference: Range<usize>,
    /// Hypothesis tokens covered (empty for deletions).
    pub hypothesis: Range<usize>,
}

/// An edit script covering two sequences fully and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alignment {
    ops: Vec<EditOp>,
    reference_len: usize,
    hypothesis_len: usize,
}

impl Alignment {
    /// Operations in order.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Length of the aligned reference sequence.
    pub const fn reference_len(&self) -> usize {
        self.reference_len
    }

    /// Length of the aligned hypothesis sequence.
    pub const fn hypothesis_len(&self) -> usize {
        self.hypothesis_len
    }

    /// Tally of operations by type.
    pub fn counts(&self) -> EditCounts {
        let mut counts = EditCounts::default();
        for op in &self.ops {
            counts.record(op.op_type());
        }
        counts
    }

    /// Group consecutive operations of the same type.
    pub fn chunks(&self) -> Vec<AlignmentChunk> {
        let mut chunks: Vec<AlignmentChunk> = Vec::new();
        let (mut r, mut h) = (0, 0);
        for op in &self.ops {
            let (dr, dh) = match op.op_type() {
                OpType::Match | OpType::Substitution => (1, 1),
                OpType::Insertion => (0, 1),
                OpType::Deletion => (1, 0),
            };
            match chunks.last_mut() {
                Some(chunk) if chunk.op == op.op_type() => {
                    chunk.reference.end += dr;
                    chunk.hypothesis.end += dh;
                }
                _ => chunks.push(AlignmentChunk {
                    op: op.op_type(),
                    reference: r..r + dr,
                    hypothesis: h..h + dh,
                }),
            }
            r += dr;
            h += dh;
        }
        chunks
    }

    /// Verify that every reference and hypothesis token is consumed exactly once, in order.
    pub fn check_coverage(&self) -> std::result::Result<(), String> {
        let (mut r, mut h) = (0, 0);
        for (pos, op) in self.ops.iter().enumerate() {
            if op.reference().is_some_and(|idx| idx != r) || op.hypothesis().is_some_and(|idx| idx != h) {
                return Err(format!("operation {pos} ({op:?}) is out of order"));
            }
            r += usize::from(op.reference().is_some());
            h += usize::from(op.hypothesis().is_some());
        }
        if r != self.reference_len || h != self.hypothesis_len {
            return Err(format!(
                "consumed {r}/{} reference and {h}/{} hypothesis tokens",
                self.reference_len, self.hypothesis_len
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Match,
    Substitute,
    Delete,
    Insert,
}

/// Align `reference` to `hypothesis` with minimum total cost.
///
/// `cost` returns 0 when two tokens match and a positive substitution cost otherwise.
pub fn align<T, F>(reference: &[T], hypothesis: &[T], cost: F) -> Alignment
where
    F: Fn(&T, &T) -> usize,
{
    let rows = reference.len();
    let cols = hypothesis.len();
    let width = cols + 1;
    let idx = |i: usize, j: usize| i * width + j;

    let mut dist = vec![0usize; (rows + 1) * width];
    let mut steps = vec![Step::Start; (rows + 1) * width];
    for i in 1..=rows {
        dist[idx(i, 0)] = i;
        steps[idx(i, 0)] = Step::Delete;
    }
    for j in 1..=cols {
        dist[idx(0, j)] = j;
        steps[idx(0, j)] = Step::Insert;
    }

    for i in 1..=rows {
        for j in 1..=cols {
            let sub_cost = cost(&reference[i - 1], &hypothesis[j - 1]);
            let diag = dist[idx(i - 1, j - 1)] + sub_cost;
            let up = dist[idx(i - 1, j)] + 1;
            let left = dist[idx(i, j - 1)] + 1;

            let (best, step) = if diag <= up && diag <= left {
                (diag, if sub_cost == 0 { Step::Match } else { Step::Substitute })
            } else if up <= left {
                (up, Step::Delete)
            } else {
                (left, Step::Insert)
            };
            dist[idx(i, j)] = best;
            steps[idx(i, j)] = step;
        }
    }

    let mut ops = Vec::with_capacity(rows.max(cols));
    let (mut i, mut j) = (rows, cols);
    loop {
        match steps[idx(i, j)] {
            Step::Start => break,
            Step::Match => {
                i -= 1;
                j -= 1;
                ops.push(EditOp::Match { reference: i, hypothesis: j });
            }
            Step::Substitute => {
                i -= 1;
                j -= 1;
                ops.push(EditOp::Substitution { reference: i, hypothesis: j });
            }
            Step::Delete => {
                i -= 1;
                ops.push(EditOp::Deletion { reference: i });
            }
            Step::Insert => {
                j -= 1;
                ops.push(EditOp::Insertion { hypothesis: j });
            }
        }
    }
    ops.reverse();

    Alignment { ops, reference_len: rows, hypothesis_len: cols }
}

/// Unit cost for any pair that is not equal.
pub fn unit_cost<T: PartialEq + ?Sized>(a: &T, b: &T) -> usize {
    usize::from(a != b)
}
