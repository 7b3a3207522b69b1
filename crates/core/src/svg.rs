//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use plantafel_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 200);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));

    let bg = resolve_color(ThemeToken::Background);
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#,
    ));

    // SetClip/ClearClip and BeginGroup/EndGroup both map to <g> nesting;
    // track depth so an unbalanced command list still yields valid XML.
    let mut open_groups: u32 = 0;
    let mut clip_seq: u32 = 0;

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                corner_radius,
                ..
            } => {
                let fill = resolve_color(*color);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" rx="{corner_radius}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, resolve_color(*border)));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawPath {
                points,
                color,
                width: line_width,
            } => {
                if points.len() < 2 {
                    continue;
                }
                let stroke = resolve_color(*color);
                let mut d = String::new();
                for (i, p) in points.iter().enumerate() {
                    let op = if i == 0 { 'M' } else { 'L' };
                    d.push_str(&format!("{op}{} {} ", p.x, p.y));
                }
                svg.push_str(&format!(
                    r#"<path d="{}" fill="none" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    d.trim_end(),
                ));
            }
            RenderCommand::DrawPictogram {
                rect,
                corner_radius,
            } => {
                // Static stand-in for the machine icon: a lighter inset
                // panel at the bar's left edge.
                svg.push_str(&format!(
                    r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" fill-opacity="0.25" rx="{corner_radius}"/>"##,
                    rect.x, rect.y, rect.w, rect.h,
                ));
            }
            RenderCommand::SetClip { rect } => {
                clip_seq += 1;
                svg.push_str(&format!(
                    r#"<clipPath id="clip{clip_seq}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><g clip-path="url(#clip{clip_seq})">"#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                open_groups += 1;
            }
            RenderCommand::BeginGroup { id, label } => {
                svg.push_str(&format!(r#"<g data-id="{}""#, escape_xml(id)));
                if let Some(label) = label {
                    svg.push_str(&format!(r#" aria-label="{}""#, escape_xml(label)));
                }
                svg.push('>');
                open_groups += 1;
            }
            RenderCommand::ClearClip | RenderCommand::EndGroup => {
                if open_groups > 0 {
                    open_groups -= 1;
                    svg.push_str("</g>");
                }
            }
        }
    }

    for _ in 0..open_groups {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken) -> &'static str {
    match token {
        ThemeToken::Background => "#ffffff",
        ThemeToken::GridLine => "#e0e0e0",
        ThemeToken::AxisTick => "#cbd5e1",
        ThemeToken::AxisText | ThemeToken::LaneLabelText => "#475569",
        ThemeToken::BarOnTime => "rgba(15,59,99,0.9)",
        ThemeToken::BarOnTimeBorder => "#0f3b63",
        ThemeToken::BarLate => "rgba(248,113,113,0.9)",
        ThemeToken::BarLateBorder => "#b91c1c",
        ThemeToken::BarSelected => "#f59e0b",
        ThemeToken::BarLabelText => "#ffffff",
        ThemeToken::Priority0 => "#ef4444",
        ThemeToken::Priority1 => "#10b981",
        ThemeToken::Priority2 => "#6366f1",
        ThemeToken::PriorityDefault => "#94a3b8",
        ThemeToken::ConnectorLine => "#334155",
        ThemeToken::TooltipBackground => "#0f172a",
        ThemeToken::TooltipText => "#f8fafc",
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantafel_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::DrawRect {
            rect: Rect::new(10.0, 20.0, 100.0, 18.0),
            color: ThemeToken::BarOnTime,
            border_color: Some(ThemeToken::BarOnTimeBorder),
            corner_radius: 6.0,
            op_id: Some(1),
        }];
        let svg = render_svg(&commands, 800.0, 400.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("rgba(15,59,99,0.9)"));
        assert!(svg.contains(r##"stroke="#0f3b63""##));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(5.0, 10.0),
            text: "Dauer < 5 & 10".into(),
            color: ThemeToken::AxisText,
            font_size: 11.0,
            align: TextAlign::Left,
        }];
        let svg = render_svg(&commands, 400.0, 100.0);
        assert!(svg.contains("Dauer &lt; 5 &amp; 10"));
    }

    #[test]
    fn clip_groups_stay_balanced() {
        let commands = vec![RenderCommand::SetClip {
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        }];
        let svg = render_svg(&commands, 200.0, 200.0);
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
    }

    #[test]
    fn path_uses_polyline_segments() {
        let commands = vec![RenderCommand::DrawPath {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 20.0),
            ],
            color: ThemeToken::ConnectorLine,
            width: 2.0,
        }];
        let svg = render_svg(&commands, 100.0, 100.0);
        assert!(svg.contains("M0 0 L10 0 L10 20"));
        assert!(svg.contains(r##"stroke="#334155""##));
    }
}
