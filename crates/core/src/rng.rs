//! RNG module - uniform random piece generation
//!
//! Every draw is an independent uniform choice over the seven catalog kinds (no
//! bag). A scripted sequence randomizer is also available for demos and tests.
//!
//! Also provides a simple LCG so games are reproducible from a seed.

use std::collections::VecDeque;

use crate::pieces::ActivePiece;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits, which have a much longer period than the low bits of an LCG.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Source of piece kinds for the queue
#[derive(Debug, Clone)]
pub enum Randomizer {
    /// Independent uniform draw per piece
    Uniform(SimpleRng),
    /// Repeats `kinds` in order forever. An empty list behaves like `[O]`.
    Sequence { kinds: Vec<PieceKind>, next: usize },
}

impl Randomizer {
    pub fn uniform(seed: u32) -> Self {
        Randomizer::Uniform(SimpleRng::new(seed))
    }

    pub fn sequence(kinds: impl Into<Vec<PieceKind>>) -> Self {
        Randomizer::Sequence {
            kinds: kinds.into(),
            next: 0,
        }
    }

    pub fn draw(&mut self) -> PieceKind {
        match self {
            Randomizer::Uniform(rng) => {
                let idx = rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[idx]
            }
            Randomizer::Sequence { kinds, next } => {
                if kinds.is_empty() {
                    return PieceKind::O;
                }
                let kind = kinds[*next % kinds.len()];
                *next = (*next + 1) % kinds.len();
                kind
            }
        }
    }
}

/// Buffer of upcoming pieces.
///
/// Always holds at least `depth` freshly spawned instances; every dequeue is
/// paired with exactly one new draw.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    pending: VecDeque<ActivePiece>,
    randomizer: Randomizer,
    depth: usize,
    spawn: (i16, i16),
}

impl PieceQueue {
    /// Create a queue filled to `depth` (at least 1) with pieces anchored at `spawn`
    pub fn new(randomizer: Randomizer, depth: usize, spawn: (i16, i16)) -> Self {
        let depth = depth.max(1);
        let mut queue = Self {
            pending: VecDeque::with_capacity(depth + 1),
            randomizer,
            depth,
            spawn,
        };
        while queue.pending.len() < depth {
            queue.enqueue_random();
        }
        queue
    }

    fn enqueue_random(&mut self) {
        let kind = self.randomizer.draw();
        self.pending
            .push_back(ActivePiece::spawn(kind, self.spawn.0, self.spawn.1));
    }

    /// Dequeue the head piece and draw one replacement
    pub fn next(&mut self) -> Option<ActivePiece> {
        let head = self.pending.pop_front()?;
        self.enqueue_random();
        Some(head)
    }

    /// Head of the queue, without consuming it
    pub fn peek(&self) -> Option<&ActivePiece> {
        self.pending.front()
    }

    /// Upcoming pieces, head first
    pub fn lookahead(&self) -> impl Iterator<Item = &ActivePiece> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Randomizer in its current state (for restarting with a continued sequence)
    pub fn randomizer(&self) -> &Randomizer {
        &self.randomizer
    }
}
