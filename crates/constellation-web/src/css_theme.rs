use constellation::{Theme, ThemeError, ThemeSource};
use wasm_bindgen::JsValue;
use web_sys::{Element, Window};

/// Particle fill colour, any CSS colour.
pub const PARTICLE_COLOR_VAR: &str = "--particle-color";
/// Line colour as an `r, g, b` triple.
pub const LINE_RGB_VAR: &str = "--line-rgb";

/// Reads the theme from CSS custom properties on the document root.
pub struct CssThemeSource {
    window: Window,
    root: Element,
}

impl CssThemeSource {
    pub fn new(window: Window, root: Element) -> Self {
        Self { window, root }
    }
}

fn unavailable(e: JsValue) -> ThemeError {
    ThemeError::Unavailable(format!("{:?}", e))
}

impl ThemeSource for CssThemeSource {
    fn read_theme(&mut self) -> Result<Theme, ThemeError> {
        let style = self
            .window
            .get_computed_style(&self.root)
            .map_err(unavailable)?
            .ok_or_else(|| ThemeError::Unavailable("no computed style for document root".to_string()))?;
        let particle_color = style.get_property_value(PARTICLE_COLOR_VAR).map_err(unavailable)?;
        let line_rgb = style.get_property_value(LINE_RGB_VAR).map_err(unavailable)?;
        Theme::parse(&particle_color, &line_rgb)
    }
}
