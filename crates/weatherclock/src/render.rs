//! SVG drawing of the clock face.
//!
//! Placements are translated into draw calls on an explicit [`RenderContext`],
//! which is serialized into a standalone SVG document at the end. The face is
//! a 100x100 square centered on the origin.

use crate::api::icon_url;
use crate::config::Config;
use crate::forecast::ForecastTable;
use crate::placement::{
    angular_position, hour_hand_degrees, minute_hand_degrees, place_forecasts, round_half_up,
    WeatherPlacement,
};
use chrono::{DateTime, TimeZone, Timelike};
use std::fmt::Write;

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

const FACE_RADIUS: f64 = 48.0;
const HOUR_HAND_LENGTH: f64 = 20.0;
const MINUTE_HAND_LENGTH: f64 = 32.0;

const STYLE: &str = "\
.face { fill: white; stroke: black; stroke-width: 1; }
.hour { font-family: sans-serif; font-size: 8px; text-anchor: middle; dominant-baseline: central; }
.hand { stroke: black; stroke-linecap: round; }
#hour-hand { stroke-width: 3; }
#minute-hand { stroke-width: 2; }";

/// One drawable SVG element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        id: Option<String>,
        x: f64,
        y: f64,
        text: String,
    },
    Image {
        x: f64,
        y: f64,
        size: f64,
        href: String,
    },
    Hand {
        id: &'static str,
        length: f64,
        degrees: f64,
    },
}

impl Element {
    /// Serialize as a single SVG element.
    pub fn to_svg(&self) -> String {
        match self {
            Element::Text { id, x, y, text } => {
                let id = id
                    .as_ref()
                    .map(|id| format!(" id=\"{}\"", escape(id)))
                    .unwrap_or_default();
                format!(
                    "<text class=\"hour\"{} x=\"{}\" y=\"{}\">{}</text>",
                    id,
                    x,
                    y,
                    escape(text)
                )
            }
            Element::Image { x, y, size, href } => format!(
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" xlink:href=\"{}\"/>",
                x,
                y,
                size,
                size,
                escape(href)
            ),
            Element::Hand {
                id,
                length,
                degrees,
            } => format!(
                "<line id=\"{}\" class=\"hand\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{}\" transform=\"rotate({})\"/>",
                id, -length, degrees
            ),
        }
    }
}

/// Drawing surface collecting elements in paint order.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    elements: Vec<Element>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Text centered at `hour` on a circle of `radius`.
    pub fn add_hour_string(&mut self, hour: f64, radius: f64, text: impl Into<String>) {
        let position = angular_position(hour, radius, None);
        self.push(Element::Text {
            id: None,
            x: position.x,
            y: position.y,
            text: text.into(),
        });
    }

    /// Square image centered at `hour` on a circle of `radius`.
    pub fn add_hour_symbol(&mut self, hour: f64, radius: f64, size: f64, href: impl Into<String>) {
        let position = angular_position(hour, radius, Some(size));
        let (x, y) = position.corner.unwrap_or((position.x, position.y));
        self.push(Element::Image {
            x,
            y,
            size,
            href: href.into(),
        });
    }

    /// Serialize to a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            svg,
            "<svg xmlns=\"{}\" xmlns:xlink=\"{}\" id=\"weatherclock\" viewBox=\"-50 -50 100 100\">",
            SVG_NS, XLINK_NS
        );
        let _ = writeln!(svg, "  <style>\n{}\n  </style>", STYLE);
        let _ = writeln!(svg, "  <circle class=\"face\" cx=\"0\" cy=\"0\" r=\"{}\"/>", FACE_RADIUS);
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element.to_svg());
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// The twelve static hour labels, 12 at the top.
pub fn numeral_elements(radius: f64) -> Vec<Element> {
    (0..12u32)
        .map(|hour| {
            let position = angular_position(f64::from(hour), radius, None);
            Element::Text {
                id: Some(format!("{}h", hour)),
                x: position.x,
                y: position.y,
                text: if hour == 0 { 12 } else { hour }.to_string(),
            }
        })
        .collect()
}

/// Label shown for a temperature, rounded to whole degrees.
pub fn temperature_label(celsius: f64) -> String {
    format!("{}°", round_half_up(celsius) as i64)
}

/// Draw the temperature and symbol of every placement.
pub fn draw_forecasts(ctx: &mut RenderContext, placements: &[WeatherPlacement], config: &Config) {
    let render = &config.render;
    for placement in placements {
        let hour = placement.dial_hour();

        if let Some(celsius) = placement.forecast.celsius.filter(|c| c.is_finite()) {
            ctx.add_hour_string(hour, render.hour_radius, temperature_label(celsius));
        }

        if let Some(symbol) = placement.forecast.symbol {
            let href = icon_url(&config.fetch.icon_url, symbol, placement.is_night());
            ctx.add_hour_symbol(hour, render.symbol_radius, render.symbol_size, href);
        }
    }
}

/// Draw the hour and minute hands for `hour`:`minute`.
pub fn draw_hands(ctx: &mut RenderContext, hour: u32, minute: u32) {
    let hour_degrees = hour_hand_degrees(hour, minute);
    let minute_degrees = minute_hand_degrees(minute);
    log::debug!(
        "Hand rotations: hour={} minute={}",
        hour_degrees,
        minute_degrees
    );

    ctx.push(Element::Hand {
        id: "hour-hand",
        length: HOUR_HAND_LENGTH,
        degrees: hour_degrees,
    });
    ctx.push(Element::Hand {
        id: "minute-hand",
        length: MINUTE_HAND_LENGTH,
        degrees: minute_degrees,
    });
}

/// Draw the full clock for `now` with the forecasts from `table`.
pub fn render_clock<Tz: TimeZone>(table: &ForecastTable, now: &DateTime<Tz>, config: &Config) -> String {
    let mut ctx = RenderContext::new();

    if config.render.show_numerals {
        for element in numeral_elements(config.render.hour_radius) {
            ctx.push(element);
        }
    }

    let placements = place_forecasts(table, now);
    log::info!(
        "Drawing {} of {} forecasts",
        placements.len(),
        table.len()
    );
    draw_forecasts(&mut ctx, &placements, config);

    // Hands go last to be painted on top.
    draw_hands(&mut ctx, now.hour(), now.minute());

    ctx.to_svg()
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{Forecast, RawForecast};
    use chrono::Utc;

    #[test]
    fn test_numerals() {
        let numerals = numeral_elements(35.0);
        assert_eq!(numerals.len(), 12);
        assert_eq!(
            numerals[0].to_svg(),
            r#"<text class="hour" id="0h" x="0" y="-35">12</text>"#
        );
        assert_eq!(
            numerals[3].to_svg(),
            r#"<text class="hour" id="3h" x="35" y="0">3</text>"#
        );
        assert_eq!(
            numerals[9].to_svg(),
            r#"<text class="hour" id="9h" x="-35" y="0">9</text>"#
        );
    }

    #[test]
    fn test_temperature_label() {
        assert_eq!(temperature_label(4.6), "5°");
        assert_eq!(temperature_label(-0.3), "0°");
        assert_eq!(temperature_label(-2.5), "-2°");
        assert_eq!(temperature_label(-2.6), "-3°");
    }

    #[test]
    fn test_symbol_image_is_centered() {
        let mut ctx = RenderContext::new();
        ctx.add_hour_symbol(3.0, 25.0, 9.0, "sun.png");
        assert_eq!(
            ctx.elements(),
            &[Element::Image {
                x: 21.0,
                y: -4.0,
                size: 9.0,
                href: "sun.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_hour_string() {
        let mut ctx = RenderContext::new();
        ctx.add_hour_string(6.0, 35.0, "7°");
        assert_eq!(
            ctx.elements()[0].to_svg(),
            r#"<text class="hour" x="0" y="35">7°</text>"#
        );
    }

    #[test]
    fn test_forecasts_use_hour_primitives() {
        let placements = [
            WeatherPlacement {
                timestamp: 0,
                hour: 15.0,
                forecast: Forecast {
                    celsius: Some(-1.4),
                    symbol: Some(2),
                    ..Forecast::default()
                },
            },
            WeatherPlacement {
                timestamp: 3600,
                hour: 22.5,
                forecast: Forecast {
                    celsius: Some(f64::NAN),
                    symbol: Some(9),
                    ..Forecast::default()
                },
            },
        ];
        let config = Config::default();
        let (radius, size) = (config.render.symbol_radius, config.render.symbol_size);
        let base = &config.fetch.icon_url;

        let mut ctx = RenderContext::new();
        draw_forecasts(&mut ctx, &placements, &config);

        // The NaN temperature is not drawn, its symbol still is.
        let mut expected = RenderContext::new();
        expected.add_hour_string(3.0, config.render.hour_radius, "-1°");
        expected.add_hour_symbol(3.0, radius, size, icon_url(base, 2, false));
        expected.add_hour_symbol(10.5, radius, size, icon_url(base, 9, true));
        assert_eq!(ctx.elements(), expected.elements());
    }

    #[test]
    fn test_href_is_escaped() {
        let image = Element::Image {
            x: 0.0,
            y: 0.0,
            size: 9.0,
            href: "http://x/?a=1&b=2".to_string(),
        };
        assert!(image.to_svg().contains("xlink:href=\"http://x/?a=1&amp;b=2\""));
    }

    #[test]
    fn test_hands_painted_last() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap();
        let mid = now.timestamp() + 2 * 3600;
        let table: ForecastTable = [RawForecast {
            celsius: Some(3.0),
            symbol: Some(1),
            ..RawForecast::new(mid - 1800, mid + 1800)
        }]
        .into_iter()
        .collect();

        let svg = render_clock(&table, &now, &Config::default());
        let temperature = svg.find("3°").unwrap();
        let image = svg.find("<image").unwrap();
        let hour_hand = svg.find("id=\"hour-hand\"").unwrap();
        let minute_hand = svg.find("id=\"minute-hand\"").unwrap();
        assert!(temperature < hour_hand);
        assert!(image < hour_hand);
        assert!(hour_hand < minute_hand);
        assert!(svg.contains("transform=\"rotate(105)\""));
        assert!(svg.contains("transform=\"rotate(180)\""));
    }

    #[test]
    fn test_night_symbol_variant() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        let mid = now.timestamp() + 2 * 3600;
        let table: ForecastTable = [RawForecast {
            symbol: Some(4),
            ..RawForecast::new(mid - 1800, mid + 1800)
        }]
        .into_iter()
        .collect();

        let svg = render_clock(&table, &now, &Config::default());
        assert!(svg.contains("symbol=4;content_type=image/png;is_night=1"));
        // No temperature was forecast.
        assert!(!svg.contains('°'));
    }

    #[test]
    fn test_numerals_only_when_enabled() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let table = ForecastTable::new();

        let plain = render_clock(&table, &now, &Config::default());
        assert!(!plain.contains("id=\"0h\""));

        let mut config = Config::default();
        config.render.show_numerals = true;
        let with_numerals = render_clock(&table, &now, &config);
        assert!(with_numerals.contains("id=\"0h\""));
        assert!(with_numerals.contains(">12</text>"));
    }
}
