//! WebAssembly bindings for browser peers.
//!
//! The page owns the transport: it feeds delivered actions to `receive` and
//! forwards whatever `takeOutbox` returns to the relay.

use wasm_bindgen::prelude::*;

use crate::actions::Action;
use crate::config::SessionConfig;
use crate::hex::{StructureCoord, HEX_RADIUS, HEX_WIDTH};
use crate::player::{Item, UserId};
use crate::session::{InputEvents, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

#[derive(Serialize)]
struct TileView {
    q: i32,
    r: i32,
    terrain: crate::board::Terrain,
    number: Option<u8>,
    x: f64,
    z: f64,
}

/// WASM-exposed session wrapper
#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    outbox: Vec<Action>,
    rng: StdRng,
}

#[wasm_bindgen]
impl WasmSession {
    /// Open a session for the local user; `config_json` may be "{}"
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, user_id: &str) -> Result<WasmSession, JsValue> {
        let config: SessionConfig = from_json(config_json, "config")?;
        Ok(WasmSession {
            session: Session::new(config, UserId::new(user_id)),
            outbox: Vec::new(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Queue a join for the local user
    pub fn join(&mut self) -> Result<(), JsValue> {
        self.session
            .join(&mut self.outbox)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Buy "road", "settlement" or "city"
    pub fn purchase(&mut self, item_json: &str) -> Result<(), JsValue> {
        let item: Item = from_json(item_json, "item")?;
        self.session
            .purchase(item, &mut self.outbox)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run one frame of input; returns true if an action was queued
    pub fn tick(&mut self, input_json: &str) -> Result<bool, JsValue> {
        let input: InputEvents = from_json(input_json, "input")?;
        Ok(self
            .session
            .tick(&input, &mut self.rng, &mut self.outbox)
            .is_some())
    }

    /// Apply an action delivered by the relay; returns the events as JSON
    pub fn receive(&mut self, seq: u64, action_json: &str) -> Result<String, JsValue> {
        let action: Action = from_json(action_json, "action")?;
        let events = self
            .session
            .receive_sequenced(&crate::bus::SequencedAction { seq, action });
        to_json(&events)
    }

    /// Actions waiting to be sent, as a JSON array
    #[wasm_bindgen(js_name = takeOutbox)]
    pub fn take_outbox(&mut self) -> Result<String, JsValue> {
        to_json(&std::mem::take(&mut self.outbox))
    }

    /// The replicated world as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<String, JsValue> {
        to_json(self.session.world())
    }

    /// Tiles with planar centers, for rendering
    #[wasm_bindgen(js_name = getTiles)]
    pub fn get_tiles(&self) -> Result<String, JsValue> {
        let tiles: Vec<TileView> = self
            .session
            .game()
            .board()
            .tiles()
            .map(|t| {
                let (x, z) = t.coord.to_pixel(HEX_WIDTH, HEX_RADIUS);
                TileView {
                    q: t.coord.q,
                    r: t.coord.r,
                    terrain: t.terrain,
                    number: t.number,
                    x,
                    z,
                }
            })
            .collect();
        to_json(&tiles)
    }

    /// Slots the local user may place on right now
    #[wasm_bindgen(js_name = getLegalSlots)]
    pub fn get_legal_slots(&self) -> Result<String, JsValue> {
        to_json(&self.session.legal_slots())
    }

    /// The hovered slot if it is legal, else null
    #[wasm_bindgen(js_name = getSelectedPlacement)]
    pub fn get_selected_placement(&self, hovered_json: &str) -> Result<String, JsValue> {
        let hovered: Option<StructureCoord> = from_json(hovered_json, "slot")?;
        to_json(&self.session.selected_placement(hovered).map(|(coord, _)| coord))
    }

    /// Whether to show the "Done" button
    #[wasm_bindgen(js_name = showDone)]
    pub fn show_done(&self) -> bool {
        self.session.show_done()
    }
}
