//! Per-game client context
//!
//! Holds the local bird's simulation, the frame clock and the latest snapshots
//! of remote birds. Lifecycle: `new` → `tick` once per rendered frame →
//! `restart` when the run ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::sim::{BirdState, SimError, Simulation};

/// Current phase of the local run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Bird is in the air, frame clock advancing
    Flying,
    /// Bird left the band; local clock frozen
    GameOver,
}

/// Result of one `Session::tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame the position was evaluated at
    pub frame: u64,
    pub position: BirdState,
    pub phase: Phase,
    /// Clock value to report to the server after this frame
    pub local_timestamp: u64,
}

/// Last snapshot received for another player
#[derive(Debug, Clone, PartialEq)]
struct RemoteBird {
    name: String,
    state: BirdState,
    /// Local frame at which the snapshot arrived
    local_timestamp: f64,
}

/// A remote bird extrapolated to the local clock
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteView {
    pub id: u64,
    pub name: String,
    pub state: BirdState,
    /// Animation clock for the sprite
    pub bird_time: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    sim: Simulation,
    frame: u64,
    /// Keeps counting after game over so remote birds keep moving
    previous_frame: u64,
    phase: Phase,
    /// Sorted by id for stable draw order
    remotes: BTreeMap<u64, RemoteBird>,
}

impl Session {
    pub fn new(config: SimConfig, seed: i64) -> Self {
        Self {
            sim: Simulation::started(config, seed),
            frame: 0,
            previous_frame: 0,
            phase: Phase::Flying,
            remotes: BTreeMap::new(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Local clock used for remote extrapolation
    pub fn effective_frame(&self) -> u64 {
        match self.phase {
            Phase::Flying => self.frame,
            Phase::GameOver => self.previous_frame,
        }
    }

    /// Advance one rendered frame
    pub fn tick(&mut self) -> Result<FrameReport, SimError> {
        let frame = self.frame;
        let position = self.sim.position_at(frame as f64)?;

        if self.phase == Phase::Flying && !position.valid {
            self.previous_frame = frame;
            self.phase = Phase::GameOver;
            log::info!("Game over at frame {} (y={:.2})", frame, position.y);
        }

        match self.phase {
            Phase::Flying => self.frame += 1,
            Phase::GameOver => self.previous_frame += 1,
        }

        Ok(FrameReport {
            frame,
            position,
            phase: self.phase,
            local_timestamp: self.effective_frame(),
        })
    }

    /// Jump at the next frame boundary. The returned anchor goes to the server.
    pub fn jump(&mut self) -> Result<BirdState, SimError> {
        self.sim.add_jump((self.frame + 1) as f64)
    }

    /// Handle the server's view of our latest jump
    ///
    /// An invalid authoritative state ends the run and restarts the session.
    /// Returns true if a restart happened.
    pub fn apply_server_verdict(&mut self, state: &BirdState) -> bool {
        if state.valid {
            log::debug!("Server confirmed jump at frame {}", state.time);
            return false;
        }
        log::warn!("Server rejected run at frame {}, restarting", state.time);
        self.restart();
        true
    }

    /// Fresh run with the same seed; remote birds are kept
    pub fn restart(&mut self) {
        let seed = self.sim.seed();
        self.sim.init(seed);
        self.frame = 0;
        self.phase = Phase::Flying;
        log::info!("Session restarted (seed {})", seed);
    }

    /// Record the latest snapshot for a remote player
    pub fn upsert_remote(&mut self, id: u64, name: impl Into<String>, state: BirdState) {
        let local_timestamp = self.effective_frame() as f64;
        log::debug!(
            "Remote {} snapshot at frame {} (local {})",
            id,
            state.time,
            local_timestamp
        );
        self.remotes.insert(
            id,
            RemoteBird {
                name: name.into(),
                state,
                local_timestamp,
            },
        );
    }

    pub fn remove_remote(&mut self, id: u64) -> bool {
        self.remotes.remove(&id).is_some()
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    /// Remote ids in the order `remote_views` yields them
    pub fn remote_ids(&self) -> Vec<u64> {
        self.remotes.keys().copied().collect()
    }

    /// Remote birds projected forward by the local time since each snapshot
    ///
    /// Crashed birds are shown where their snapshot left them.
    pub fn remote_views(&self) -> Result<Vec<RemoteView>, SimError> {
        let now = self.effective_frame() as f64;
        self.remotes
            .iter()
            .map(|(&id, remote)| -> Result<RemoteView, SimError> {
                let (state, bird_time) = if remote.state.valid {
                    let local_delta = (now - remote.local_timestamp).max(0.0);
                    let t = remote.state.time + local_delta;
                    (self.sim.calc_state(&remote.state, t)?, t)
                } else {
                    (remote.state, remote.state.time)
                };
                Ok(RemoteView {
                    id,
                    name: remote.name.clone(),
                    state,
                    bird_time,
                })
            })
            .collect()
    }
}
