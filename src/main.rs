// Demo launcher.
// • A cyan-outlined square follows the mouse; a second one sits still.
// • Hold any mouse button to draw with a thicker stroke.
// • Typed keys show up in the HUD. ESC or closing the window quits.

use microframe::{Canvas, Color, InputEvent, InputState, Result, Settings, Sketch};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Default)]
struct Launcher {
    clicks: u32,
    typed: String,
}

impl Sketch for Launcher {
    fn on_create(&mut self, settings: &mut Settings) -> Result<()> {
        settings.set_window_title("Launcher")?;
        settings.set_frame_rate(60)?;
        settings.set_window_size(400, 400)?;
        Ok(())
    }

    fn on_render(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        canvas.background_gray(30);

        let weight = if canvas.is_mouse_pressed() { 4.0 } else { 1.0 };
        canvas.set_stroke_weight(weight)?;
        canvas.stroke_color(Color::CYAN);
        canvas.rect(canvas.mouse_x(), canvas.mouse_y(), 100, 100);
        canvas.rect(200, 200, 100, 100);

        canvas.fill_gray(255);
        canvas.set_text_size(16)?;
        let hud = format!("FPS: {} | CLICKS: {} | {}", canvas.measured_fps(), self.clicks, self.typed);
        canvas.text(hud, 8, 24);
        canvas.fill_gray(200);
        Ok(())
    }

    fn on_quit(&mut self) {
        info!(clicks = self.clicks, "launcher quitting");
    }

    fn on_pointer_click(&mut self, _input: &InputState) {
        self.clicks += 1;
    }

    fn on_key_typed_event(&mut self, event: &InputEvent, _input: &InputState) {
        if let InputEvent::KeyTyped { ch } = event {
            if !ch.is_control() {
                self.typed.push(*ch);
                if self.typed.chars().count() > 16 {
                    self.typed.remove(0);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    microframe::run(Launcher::default())
}
