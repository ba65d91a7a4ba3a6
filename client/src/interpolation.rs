//! Snapshot buffering and time-shifted interpolation for rendering.
//!
//! Snapshots are appended in arrival order, which is not necessarily
//! timestamp order. Rendering happens `interpolation_offset` seconds in the
//! past so that, in steady state, two buffered snapshots bracket the render
//! time and player positions can be blended between them.

use shared::{CoinView, PlayerView, Snapshot};
use std::collections::{BTreeMap, VecDeque};

/// What the renderer draws for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    pub players: BTreeMap<String, PlayerView>,
    pub coins: Vec<CoinView>,
}

impl From<&Snapshot> for RenderState {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            players: snapshot
                .players
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            coins: snapshot.coins.clone(),
        }
    }
}

/// Bounded FIFO of received snapshots; the oldest is evicted when full.
#[derive(Debug, Clone)]
pub struct SnapshotBuffer {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl SnapshotBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Most recently appended snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// Oldest retained snapshot.
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.snapshots.front()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Render state at `render_time`, or `None` if nothing is buffered.
    ///
    /// Finds the newest-appended snapshot at or before `render_time` and the
    /// snapshot appended right after it, then blends player positions between
    /// the two. Scores, colours and coins come from the later snapshot.
    /// Render times outside the buffered history return the nearest end
    /// unmodified; there is no extrapolation.
    pub fn interpolate(&self, render_time: f64) -> Option<RenderState> {
        if self.snapshots.len() < 2 {
            return self.latest().map(RenderState::from);
        }

        let Some(prev_index) = (0..self.snapshots.len())
            .rev()
            .find(|&i| self.snapshots[i].timestamp <= render_time)
        else {
            return self.oldest().map(RenderState::from);
        };

        let prev = &self.snapshots[prev_index];
        let Some(next) = self.snapshots.get(prev_index + 1) else {
            return Some(RenderState::from(prev));
        };

        let alpha = interpolation_alpha(prev.timestamp, next.timestamp, render_time);
        Some(blend(prev, next, alpha))
    }
}

/// Fraction of the way from `prev` to `next` at `render_time`, in `[0, 1]`.
///
/// Zero when the timestamps are equal.
pub fn interpolation_alpha(prev: f64, next: f64, render_time: f64) -> f32 {
    let span = next - prev;
    if span <= 0.0 {
        return 0.0;
    }
    ((render_time - prev) / span).clamp(0.0, 1.0) as f32
}

fn blend(prev: &Snapshot, next: &Snapshot, alpha: f32) -> RenderState {
    let players = next
        .players
        .iter()
        .map(|current| {
            let view = match prev.player(&current.id) {
                Some(before) => {
                    let position = before.position().lerp(&current.position(), alpha);
                    PlayerView {
                        id: current.id.clone(),
                        x: position.x,
                        y: position.y,
                        score: current.score,
                        color: current.color,
                    }
                }
                // Just joined: nothing to blend from.
                None => current.clone(),
            };
            (current.id.clone(), view)
        })
        .collect();

    RenderState {
        players,
        coins: next.coins.clone(),
    }
}
