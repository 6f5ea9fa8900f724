use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

const SWEET_COLORS: [Color; 5] = [
    Color::LightMagenta,
    Color::LightRed,
    Color::LightYellow,
    Color::LightCyan,
    Color::LightGreen,
];

const JAR_STYLE: Style = Style::new().fg(Color::Magenta);
const MAX_INNER_WIDTH: u16 = 14;

/// Number of inner rows to fill, rounding so any progress shows at least a sweet
pub fn filled_rows(ratio: f64, inner_height: u16) -> u16 {
    let ratio = ratio.clamp(0.0, 1.0);
    if ratio == 0.0 || inner_height == 0 {
        return 0;
    }
    ((ratio * inner_height as f64).round() as u16).clamp(1, inner_height)
}

/// A jar centred in `area` that fills up with sweets from the bottom
pub fn render_jar(ratio: f64, area: Rect, buf: &mut Buffer) {
    // lid + rim + at least one row + bottom
    if area.height < 4 || area.width < 6 {
        return;
    }

    let inner_width = (area.width - 2).min(MAX_INNER_WIDTH);
    let left = area.x + (area.width - inner_width - 2) / 2;
    let right = left + inner_width + 1;
    let top = area.y;
    let bottom = area.y + area.height - 1;
    let inner_height = area.height - 3;

    for x in left + 1..right {
        buf[(x, top)].set_symbol("▄").set_style(JAR_STYLE);
    }
    buf[(left, top + 1)].set_symbol("╭").set_style(JAR_STYLE);
    buf[(right, top + 1)].set_symbol("╮").set_style(JAR_STYLE);
    for y in top + 2..bottom {
        buf[(left, y)].set_symbol("│").set_style(JAR_STYLE);
        buf[(right, y)].set_symbol("│").set_style(JAR_STYLE);
    }
    buf[(left, bottom)].set_symbol("╰").set_style(JAR_STYLE);
    buf[(right, bottom)].set_symbol("╯").set_style(JAR_STYLE);
    for x in left + 1..right {
        buf[(x, bottom)].set_symbol("─").set_style(JAR_STYLE);
    }

    let filled = filled_rows(ratio, inner_height);
    for row in 0..filled {
        let y = bottom - 1 - row;
        for col in 0..inner_width {
            let color = SWEET_COLORS[((row * 3 + col) as usize) % SWEET_COLORS.len()];
            buf[(left + 1 + col, y)]
                .set_symbol("●")
                .set_style(Style::default().fg(color));
        }
    }
}
