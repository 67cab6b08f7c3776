//! Renderer boundary: shape selections leave the app as DOM events.
//!
//! The 3D renderer is an external collaborator. It subscribes to
//! [`SHAPE_EVENT`] on `document` and receives everything it needs to build
//! and pose a form; nothing flows back into the session core.

use formdrill_core::{ShapeBlueprint, ShapeSelection};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use web_sys::{CustomEvent, CustomEventInit};

/// Event name the rendering collaborator subscribes to on `document`.
pub const SHAPE_EVENT: &str = "formdrill:shape";

/// Payload delivered with each [`SHAPE_EVENT`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePayload {
    pub shape_id: String,
    pub name: String,
    pub tier: u8,
    pub blueprint: ShapeBlueprint,
    /// Unit quaternion `[x, y, z, w]` to apply to the built form.
    pub orientation: [f32; 4],
    /// True when the pose is a mistake-bank replay.
    pub replayed: bool,
}

impl ShapePayload {
    /// Materialize the selection's opaque build factory and capture its pose.
    ///
    /// `rng` feeds joint jitter in posed figures.
    #[must_use]
    pub fn from_selection(selection: &ShapeSelection, rng: &mut dyn rand::RngCore) -> Self {
        let blueprint = (selection.shape.build)(rng);
        Self {
            shape_id: selection.shape.id.to_string(),
            name: selection.shape.name.to_string(),
            tier: selection.shape.tier,
            blueprint,
            orientation: selection.orientation.as_array(),
            replayed: selection.replayed,
        }
    }
}

/// Build the payload for `selection` and dispatch it to the renderer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn emit(selection: &ShapeSelection) {
    // Posed figures draw joint jitter; the wall clock is entropy enough.
    let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
    dispatch(&ShapePayload::from_selection(selection, &mut rng));
}

fn dispatch(payload: &ShapePayload) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let detail = match serde_wasm_bindgen::to_value(payload) {
        Ok(detail) => detail,
        Err(e) => {
            log::error!("failed to encode shape payload: {e}");
            return;
        }
    };
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let Ok(event) = CustomEvent::new_with_event_init_dict(SHAPE_EVENT, &init) else {
        return;
    };
    let _ = document.dispatch_event(&event);
}
