//! Custom theme definitions for the application - Light Theme

use iced::widget::{button, container, scrollable, text_input};
use iced::{Background, Border, Color, Gradient, Shadow, Theme, Vector};

// --- Light Color Palette ---

// Background gradient - soft cyan to blue
pub const BACKGROUND_START: Color = Color::from_rgb(0.925, 0.992, 1.0); // Cyan 50
pub const BACKGROUND_END: Color = Color::from_rgb(0.878, 0.949, 1.0); // Sky 100

// Primary colors - Teal gradient
pub const TEAL_500: Color = Color::from_rgb(0.078, 0.722, 0.651); // Primary actions
pub const TEAL_400: Color = Color::from_rgb(0.176, 0.831, 0.749); // Hover state
pub const CYAN_600: Color = Color::from_rgb(0.031, 0.569, 0.698); // Accent end

// Danger color - Red
pub const RED_500: Color = Color::from_rgb(0.937, 0.267, 0.267);

// Gray scale for text and borders
pub const GRAY_800: Color = Color::from_rgb(0.122, 0.161, 0.216); // Primary text
pub const GRAY_600: Color = Color::from_rgb(0.294, 0.333, 0.388); // Secondary text
pub const GRAY_500: Color = Color::from_rgb(0.420, 0.447, 0.502); // Labels
pub const GRAY_400: Color = Color::from_rgb(0.616, 0.639, 0.667); // Placeholder
pub const GRAY_200: Color = Color::from_rgb(0.898, 0.906, 0.922); // Light borders
pub const GRAY_100: Color = Color::from_rgb(0.953, 0.957, 0.965); // Very light bg
pub const GRAY_50: Color = Color::from_rgb(0.976, 0.980, 0.984); // Lightest bg

pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
pub const WHITE_85: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.85); // Glass panels

// Log console colors
pub const CONSOLE_BG: Color = Color::from_rgb(0.098, 0.122, 0.157);
pub const CONSOLE_TEXT: Color = Color::from_rgb(0.796, 0.859, 0.890);

// --- Container Styles ---

pub struct MainGradientContainer;

impl container::StyleSheet for MainGradientContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(GRAY_800),
            background: Some(Background::Gradient(Gradient::Linear(
                iced::gradient::Linear::new(iced::Radians(2.356))
                    .add_stop(0.0, BACKGROUND_START)
                    .add_stop(1.0, BACKGROUND_END),
            ))),
            ..Default::default()
        }
    }
}

pub struct GlassContainer;

impl container::StyleSheet for GlassContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(GRAY_800),
            background: Some(Background::Color(WHITE_85)),
            border: Border {
                color: GRAY_200,
                width: 1.0,
                radius: 16.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.031, 0.569, 0.698, 0.12),
                offset: Vector::new(0.0, 4.0),
                blur_radius: 16.0,
            },
        }
    }
}

/// Dark panel behind the download log
pub struct LogContainer;

impl container::StyleSheet for LogContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(CONSOLE_TEXT),
            background: Some(Background::Color(CONSOLE_BG)),
            border: Border {
                color: GRAY_800,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        }
    }
}

// --- Button Styles ---

pub struct PrimaryButton;

impl button::StyleSheet for PrimaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Gradient(Gradient::Linear(
                iced::gradient::Linear::new(iced::Radians(0.0))
                    .add_stop(0.0, TEAL_500)
                    .add_stop(1.0, CYAN_600),
            ))),
            text_color: WHITE,
            border: Border {
                radius: 12.0.into(),
                ..Default::default()
            },
            shadow: Shadow {
                color: Color::from_rgba(0.078, 0.722, 0.651, 0.3),
                offset: Vector::new(0.0, 3.0),
                blur_radius: 10.0,
            },
            shadow_offset: Vector::new(0.0, 0.0),
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            shadow: Shadow {
                offset: Vector::new(0.0, 5.0),
                blur_radius: 16.0,
                ..active.shadow
            },
            ..active
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            background: Some(Background::Color(GRAY_200)),
            text_color: GRAY_400,
            shadow: Shadow::default(),
            ..active
        }
    }
}

pub struct SecondaryButton;

impl button::StyleSheet for SecondaryButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(WHITE)),
            text_color: GRAY_600,
            border: Border {
                radius: 10.0.into(),
                color: GRAY_200,
                width: 1.0,
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.05),
                offset: Vector::new(0.0, 1.0),
                blur_radius: 4.0,
            },
            shadow_offset: Vector::new(0.0, 0.0),
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            background: Some(Background::Color(GRAY_50)),
            ..active
        }
    }
}

pub struct IconButton;

impl button::StyleSheet for IconButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: None,
            text_color: GRAY_600,
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn hovered(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            text_color: GRAY_800,
            background: Some(Background::Color(GRAY_200)),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

// --- Input Styles ---

pub struct InputStyle;

impl text_input::StyleSheet for InputStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> text_input::Appearance {
        text_input::Appearance {
            background: Background::Color(WHITE),
            border: Border {
                radius: 12.0.into(),
                width: 1.5,
                color: GRAY_200,
            },
            icon_color: GRAY_500,
        }
    }

    fn focused(&self, style: &Self::Style) -> text_input::Appearance {
        let active = self.active(style);
        text_input::Appearance {
            border: Border {
                color: TEAL_400,
                ..active.border
            },
            ..active
        }
    }

    fn placeholder_color(&self, _style: &Self::Style) -> Color {
        GRAY_400
    }

    fn value_color(&self, _style: &Self::Style) -> Color {
        GRAY_800
    }

    fn selection_color(&self, _style: &Self::Style) -> Color {
        Color::from_rgba(0.078, 0.722, 0.651, 0.3)
    }

    fn disabled(&self, style: &Self::Style) -> text_input::Appearance {
        let active = self.active(style);
        text_input::Appearance {
            background: Background::Color(GRAY_100),
            ..active
        }
    }

    fn disabled_color(&self, _style: &Self::Style) -> Color {
        GRAY_400
    }
}

// --- Scrollable Styles ---

pub struct LogScrollable;

impl scrollable::StyleSheet for LogScrollable {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> scrollable::Appearance {
        scrollable::Appearance {
            container: container::Appearance::default(),
            scrollbar: scrollable::Scrollbar {
                background: Some(Background::Color(Color::TRANSPARENT)),
                border: Border::default(),
                scroller: scrollable::Scroller {
                    color: Color::from_rgba(0.796, 0.859, 0.890, 0.3),
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                },
            },
            gap: None,
        }
    }

    fn hovered(
        &self,
        style: &Self::Style,
        is_mouse_over_scrollbar: bool,
    ) -> scrollable::Appearance {
        let active = self.active(style);
        if is_mouse_over_scrollbar {
            scrollable::Appearance {
                scrollbar: scrollable::Scrollbar {
                    scroller: scrollable::Scroller {
                        color: Color::from_rgba(0.796, 0.859, 0.890, 0.5),
                        ..active.scrollbar.scroller
                    },
                    ..active.scrollbar
                },
                ..active
            }
        } else {
            active
        }
    }
}
