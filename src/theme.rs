//! Backdrop palette (Tailwind slate / blue, matching the page styles)

use crate::core::Rgba;

pub mod colors {
    use super::Rgba;

    // === Field ===
    pub const NODE: Rgba = Rgba::rgb(203, 213, 225);       // #cbd5e1 - slate-300
    pub const CONNECTION: Rgba = Rgba::rgb(203, 213, 225); // same hue, alpha by distance

    // === Packets ===
    pub const PACKET: Rgba = Rgba::rgb(59, 130, 246);      // #3b82f6 - blue-500
    pub const PACKET_TRAIL: Rgba = Rgba::rgb(59, 130, 246); // alpha fades with progress

    // === Native preview only ===
    pub const PREVIEW_BG: Rgba = Rgba::rgb(2, 6, 23);      // #020617 - slate-950
}

#[cfg(feature = "preview")]
pub fn to_color32(c: Rgba) -> egui::Color32 {
    let alpha = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, alpha)
}

/// Dark egui Visuals with the page background colour
#[cfg(feature = "preview")]
pub fn preview_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    let bg = to_color32(colors::PREVIEW_BG);

    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.extreme_bg_color = bg;
    visuals.override_text_color = Some(to_color32(colors::NODE));

    // Flat, like the page
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

#[cfg(all(test, feature = "preview"))]
mod tests {
    use super::*;

    #[test]
    fn test_to_color32_alpha_scaling() {
        let c = to_color32(colors::PACKET.with_alpha(0.5));
        assert_eq!(c.a(), 128);
        assert_eq!(to_color32(colors::NODE).a(), 255);
    }
}
