use recognition_map_shared::flag::{FLAG_WHITE, FlagLayout};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub(crate) const FLAG_TEXTURE_WIDTH: u32 = 380;
pub(crate) const FLAG_TEXTURE_HEIGHT: u32 = 200;

/// Paint the flag into an offscreen canvas and return it as a data URL
/// usable as an SVG pattern image.
pub(crate) fn flag_data_url() -> Result<String, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(FLAG_TEXTURE_WIDTH);
    canvas.set_height(FLAG_TEXTURE_HEIGHT);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let layout = FlagLayout::new(FLAG_TEXTURE_WIDTH as f64, FLAG_TEXTURE_HEIGHT as f64);
    for rect in &layout.rects {
        ctx.set_fill_style_str(rect.color);
        ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    ctx.set_fill_style_str(FLAG_WHITE);
    for star in &layout.stars {
        ctx.begin_path();
        let [first, rest @ ..] = star;
        ctx.move_to(first[0], first[1]);
        for p in rest {
            ctx.line_to(p[0], p[1]);
        }
        ctx.close_path();
        ctx.fill();
    }

    canvas.to_data_url()
}
