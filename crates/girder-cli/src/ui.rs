//! Terminal widgets: half-block frame presentation and the info panel.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};
use ratatui::Frame;

use crate::app::ViewerState;

/// Sidebar width in cells, dropped entirely on narrow terminals.
const SIDEBAR_WIDTH: u16 = 36;

/// Split the terminal into viewport and sidebar areas.
pub fn split(area: Rect) -> (Rect, Rect) {
    if area.width < SIDEBAR_WIDTH + 20 {
        return (area, Rect::default());
    }
    let [viewport, sidebar] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(SIDEBAR_WIDTH)]).areas(area);
    (viewport, sidebar)
}

/// Draw one frame of the viewer.
pub fn draw(frame: &mut Frame, state: &ViewerState) {
    let (viewport, sidebar) = split(frame.area());

    let title = format!(" {} ({}) ", state.record.designation, state.family);
    let block = Block::bordered().title(title);
    let inner = block.inner(viewport);
    frame.render_widget(block, viewport);

    if let Some(error) = &state.error {
        // Static placeholder instead of a 3D view: the render surface
        // was unavailable at open time and is not retried.
        let placeholder = Paragraph::new(vec![
            Line::raw(""),
            Line::from("3D view unavailable".bold()),
            Line::raw(error.clone()),
        ])
        .centered();
        frame.render_widget(placeholder, inner);
    } else {
        frame.render_widget(
            HalfBlockFrame {
                pixels: &state.frame,
                width: state.frame_size.0,
                height: state.frame_size.1,
            },
            inner,
        );
    }

    if sidebar.width > 0 {
        frame.render_widget(info_panel(state), sidebar);
    }
}

fn info_panel(state: &ViewerState) -> Paragraph<'_> {
    let record = &state.record;
    let props = &state.properties;
    let spinning = state
        .view
        .as_ref()
        .is_some_and(|v| v.scene.turntable.spinning);

    let lines = vec![
        Line::from(record.designation.clone().bold()),
        Line::raw(format!("family        {}", state.family)),
        Line::raw(""),
        Line::raw(format!("height        {:>7.1} mm", record.height_mm)),
        Line::raw(format!("width         {:>7.1} mm", record.width_mm)),
        Line::raw(format!("web           {:>7.1} mm", record.web_thickness_mm)),
        Line::raw(format!("flange        {:>7.1} mm", record.flange_thickness_mm)),
        Line::raw(format!("root radius   {:>7.1} mm", record.root_radius_mm)),
        Line::raw(""),
        Line::raw(format!("mass          {:>7.1} kg/m", props.mass_per_metre_kg)),
        Line::raw(format!("area          {:>7.1} cm2", props.area_cm2)),
        Line::raw(format!("Iy            {:>7.0} cm4", props.second_moment_y_cm4)),
        Line::raw(format!("Iz            {:>7.0} cm4", props.second_moment_z_cm4)),
        Line::raw(""),
        Line::raw(format!("spin          {}", if spinning { "on" } else { "off" })),
        Line::raw(""),
        Line::from("arrows  orbit".dim()),
        Line::from("w/a/s/d pan".dim()),
        Line::from("+/-     zoom".dim()),
        Line::from("space   toggle spin".dim()),
        Line::from("r       reset view".dim()),
        Line::from("q       quit".dim()),
    ];

    Paragraph::new(lines).block(Block::bordered().title(" Section "))
}

/// Presents an RGBA frame at two pixels per cell using the upper
/// half-block glyph: foreground carries the top pixel, background the
/// bottom one.
struct HalfBlockFrame<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
}

impl HalfBlockFrame<'_> {
    fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::Reset;
        }
        let i = ((y * self.width + x) * 4) as usize;
        match self.pixels.get(i..i + 3) {
            Some(rgb) => Color::Rgb(rgb[0], rgb[1], rgb[2]),
            None => Color::Reset,
        }
    }
}

impl Widget for HalfBlockFrame<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.pixels.is_empty() {
            return;
        }
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.pixel(u32::from(col), u32::from(row) * 2);
                let bottom = self.pixel(u32::from(col), u32::from(row) * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀')
                        .set_style(Style::default().fg(top).bg(bottom));
                }
            }
        }
    }
}
