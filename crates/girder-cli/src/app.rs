//! Interactive viewer loop: the viewport host.
//!
//! Owns the frame clock and the input loop; the scene controller only
//! ever sees `advance(dt)` calls, camera deltas, and render requests.
//! All geometry is built before the first frame, inside `open_view`.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;

use girder::{
    open_view, GirderError, OrbitCamera, SectionFamily, SectionProperties, SectionRecord,
    ViewHandle,
};

use crate::ui;

/// Target frame interval (~30 fps; terminal cells refresh no faster).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Orbit step per key press in radians.
const ORBIT_STEP: f64 = 0.08;

/// Pan step per key press as a fraction of orbit distance.
const PAN_STEP: f64 = 0.05;

/// Zoom factor per key press.
const ZOOM_STEP: f64 = 0.9;

/// Everything the draw code needs.
pub struct ViewerState {
    pub record: SectionRecord,
    pub family: SectionFamily,
    pub properties: SectionProperties,
    /// The live view, or `None` when the render surface is unavailable.
    pub view: Option<ViewHandle>,
    /// Error text for the static placeholder panel.
    pub error: Option<String>,
    /// Last rendered RGBA frame.
    pub frame: Vec<u8>,
    /// Pixel size of `frame`.
    pub frame_size: (u32, u32),
}

/// Open the view and run the interactive loop until the user quits.
///
/// A missing render surface is not fatal: the viewer comes up with a
/// static error panel where the solid would be, matching the failure
/// contract of `open_view` (surfaced once, never retried).
pub fn run_viewer(record: SectionRecord, family: SectionFamily) -> Result<()> {
    let (view, error) = match open_view(&record, family, 320, 180) {
        Ok(view) => (Some(view), None),
        Err(err @ GirderError::Render(_)) => (None, Some(err.to_string())),
        Err(err) => return Err(err.into()),
    };

    let mut state = ViewerState {
        properties: SectionProperties::from_record(&record),
        record,
        family,
        view,
        error,
        frame: Vec::new(),
        frame_size: (0, 0),
    };

    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, &mut state);
    ratatui::restore();
    result
}

fn run_loop(terminal: &mut DefaultTerminal, state: &mut ViewerState) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        // Clamp dt so a suspended terminal does not fling the turntable.
        let dt = (now - last_tick).as_secs_f64().min(0.25);
        last_tick = now;

        if let Some(view) = state.view.as_mut() {
            view.scene.advance(dt);

            // Render at the viewport's cell resolution: one pixel per
            // half block, two rows of pixels per terminal row.
            let size = terminal.size()?;
            let (viewport, _) = ui::split(Rect::new(0, 0, size.width, size.height));
            let width = u32::from(viewport.width.saturating_sub(2).max(1));
            let height = u32::from(viewport.height.saturating_sub(2).max(1)) * 2;
            view.scene.resize(width, height);

            state.frame = view.scene.render_frame()?;
            state.frame_size = view.scene.size();
        }

        terminal.draw(|frame| ui::draw(frame, state))?;

        // Wait out the rest of the frame interval, handling input as it
        // arrives.
        let deadline = now + FRAME_INTERVAL;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if timeout.is_zero() || !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(key.code, state) {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply one key press. Returns `false` to quit.
fn handle_key(code: KeyCode, state: &mut ViewerState) -> bool {
    if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
        return false;
    }

    let Some(view) = state.view.as_mut() else {
        return true;
    };
    let scene = &mut view.scene;

    match code {
        KeyCode::Left => scene.orbit(-ORBIT_STEP, 0.0),
        KeyCode::Right => scene.orbit(ORBIT_STEP, 0.0),
        KeyCode::Up => scene.orbit(0.0, ORBIT_STEP),
        KeyCode::Down => scene.orbit(0.0, -ORBIT_STEP),
        KeyCode::Char('+') | KeyCode::Char('=') => scene.zoom(ZOOM_STEP),
        KeyCode::Char('-') => scene.zoom(1.0 / ZOOM_STEP),
        KeyCode::Char('a') => scene.pan(-PAN_STEP, 0.0),
        KeyCode::Char('d') => scene.pan(PAN_STEP, 0.0),
        KeyCode::Char('w') => scene.pan(0.0, PAN_STEP),
        KeyCode::Char('s') => scene.pan(0.0, -PAN_STEP),
        KeyCode::Char(' ') => {
            let spinning = scene.turntable.spinning;
            scene.set_spinning(!spinning);
        }
        KeyCode::Char('r') => {
            scene.camera = OrbitCamera::new();
            scene.set_spinning(true);
        }
        _ => {}
    }

    true
}
