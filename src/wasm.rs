//! Browser bindings
//!
//! The JS client owns rendering, input and the socket; it drives a
//! `WasmSession` once per animation frame and forwards network snapshots.

use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::session::{Phase, Session};
use crate::sim::BirdState;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Bird state as seen from JS
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsBirdState {
    pub x: f64,
    pub y: f64,
    pub vspeed: f64,
    pub time: f64,
    pub valid: bool,
}

#[wasm_bindgen]
impl JsBirdState {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, vspeed: f64, time: f64, valid: bool) -> JsBirdState {
        JsBirdState {
            x,
            y,
            vspeed,
            time,
            valid,
        }
    }
}

impl From<BirdState> for JsBirdState {
    fn from(s: BirdState) -> Self {
        JsBirdState {
            x: s.x,
            y: s.y,
            vspeed: s.vspeed,
            time: s.time,
            valid: s.valid,
        }
    }
}

impl From<JsBirdState> for BirdState {
    fn from(s: JsBirdState) -> Self {
        BirdState {
            x: s.x,
            y: s.y,
            vspeed: s.vspeed,
            time: s.time,
            valid: s.valid,
        }
    }
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// `config_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, seed: i64) -> Result<WasmSession, JsError> {
        let config = if config_json.trim().is_empty() {
            SimConfig::default()
        } else {
            SimConfig::from_json(config_json)?
        };
        log::info!("Session created with seed {}", seed);
        Ok(WasmSession {
            session: Session::new(config, seed),
        })
    }

    /// Advance one frame and return the local bird's position
    pub fn tick(&mut self) -> Result<JsBirdState, JsError> {
        Ok(self.session.tick()?.position.into())
    }

    pub fn frame(&self) -> u64 {
        self.session.frame()
    }

    /// Clock value to report to the server
    pub fn local_timestamp(&self) -> u64 {
        self.session.effective_frame()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.phase() == Phase::GameOver
    }

    pub fn jump(&mut self) -> Result<JsBirdState, JsError> {
        Ok(self.session.jump()?.into())
    }

    /// Returns true if the session restarted
    pub fn apply_server_verdict(&mut self, state: JsBirdState) -> bool {
        self.session.apply_server_verdict(&state.into())
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    pub fn position_at(&self, t: f64) -> Result<JsBirdState, JsError> {
        Ok(self.session.simulation().position_at(t)?.into())
    }

    pub fn last_state(&self) -> Result<JsBirdState, JsError> {
        Ok(self.session.simulation().last_state()?.into())
    }

    /// Predicted crash time from the last anchor
    pub fn next_collision(&self) -> Result<f64, JsError> {
        let sim = self.session.simulation();
        Ok(sim.next_bird_collision(&sim.last_state()?))
    }

    /// Flattened `[x0, y0, x1, y1, ...]` of the predicted path
    pub fn collision_path(&self) -> Result<Vec<f64>, JsError> {
        Ok(self
            .session
            .simulation()
            .collision_path()?
            .iter()
            .flat_map(|s| s.position().to_array())
            .collect())
    }

    /// Flattened `[x, gap_y, x, gap_y, ...]` of walls in range
    pub fn walls_between(&self, x_min: f64, x_max: f64) -> Vec<f64> {
        let sim = self.session.simulation();
        sim.walls_between(x_min, x_max)
            .flat_map(|w| w.gap_center(sim.config()).to_array())
            .collect()
    }

    pub fn upsert_remote(&mut self, id: u64, name: String, state: JsBirdState) {
        self.session.upsert_remote(id, name, state.into());
    }

    pub fn remove_remote(&mut self, id: u64) -> bool {
        self.session.remove_remote(id)
    }

    /// Ids of remote birds, in the order `remote_views` lists them
    pub fn remote_ids(&self) -> Vec<u64> {
        self.session.remote_ids()
    }

    /// Flattened `[x, y, vspeed, bird_time, ...]` of remote birds
    ///
    /// Entry `i` belongs to `remote_ids()[i]`; ids stay `u64` so they are
    /// never rounded through `f64`.
    pub fn remote_views(&self) -> Result<Vec<f64>, JsError> {
        Ok(self
            .session
            .remote_views()?
            .iter()
            .flat_map(|v| [v.state.x, v.state.y, v.state.vspeed, v.bird_time])
            .collect())
    }
}
