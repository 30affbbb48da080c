// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed visual styles for head sub-meshes

/// Framebuffer blend mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    #[default]
    Normal,
    /// Source color added to the destination, for a glow effect
    Additive,
}

/// Flat-colored material description consumed by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialStyle {
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub transparent: bool,
    pub blending: Blending,
    pub depth_write: bool,
    /// Draw triangle edges instead of filled faces
    pub wireframe: bool,
    /// Point sprite size in model units, attenuated with distance
    pub point_size: Option<f32>,
    pub line_width: f32,
}

/// Neutral slate for the skull wireframe
pub const SLATE_700: u32 = 0x334155;
/// Accent for points and features
pub const SKY_500: u32 = 0x0ea5e9;
/// Pale slate for the idle placeholder
pub const SLATE_300: u32 = 0xcbd5e1;

impl MaterialStyle {
    const BASE: MaterialStyle = MaterialStyle {
        color: 0xffffff,
        opacity: 1.0,
        transparent: false,
        blending: Blending::Normal,
        depth_write: true,
        wireframe: false,
        point_size: None,
        line_width: 1.0,
    };

    pub const SKULL_WIREFRAME: MaterialStyle = MaterialStyle {
        color: SLATE_700,
        opacity: 0.35,
        transparent: true,
        ..Self::BASE
    };

    pub const SKULL_POINTS: MaterialStyle = MaterialStyle {
        color: SKY_500,
        opacity: 0.9,
        transparent: true,
        blending: Blending::Additive,
        depth_write: false,
        point_size: Some(0.025),
        ..Self::BASE
    };

    pub const EYE: MaterialStyle = MaterialStyle {
        color: SKY_500,
        opacity: 0.5,
        transparent: true,
        blending: Blending::Additive,
        wireframe: true,
        ..Self::BASE
    };

    pub const MOUTH: MaterialStyle = MaterialStyle {
        color: SKY_500,
        opacity: 0.9,
        transparent: true,
        ..Self::BASE
    };

    pub const CONTOUR: MaterialStyle = MaterialStyle {
        color: SKY_500,
        opacity: 0.6,
        transparent: true,
        line_width: 2.0,
        ..Self::BASE
    };

    pub const PLACEHOLDER: MaterialStyle = MaterialStyle {
        color: SLATE_300,
        opacity: 0.3,
        transparent: true,
        wireframe: true,
        ..Self::BASE
    };

    /// Color as a `#rrggbb` string
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.color & 0xffffff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(MaterialStyle::SKULL_POINTS.hex(), "#0ea5e9");
        assert_eq!(MaterialStyle::SKULL_WIREFRAME.hex(), "#334155");
    }

    #[test]
    fn test_feature_styles_share_accent() {
        for style in [MaterialStyle::EYE, MaterialStyle::MOUTH, MaterialStyle::CONTOUR] {
            assert_eq!(style.color, SKY_500);
            assert_ne!(style.color, MaterialStyle::SKULL_WIREFRAME.color);
        }
    }
}
