use crate::config::{ChordConfig, RenderConfig};
use crate::layout::{ArcDescriptor, ChordEnd, ChordLayout, TooltipItem};
use crate::theme::Theme;
use anyhow::Result;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::Path;

const TICK_DY: &str = ".35em";
const ANGLE_EPSILON: f64 = 1e-9;

pub fn render_svg(layout: &ChordLayout, theme: &Theme, config: &ChordConfig) -> String {
    let width = layout.viewport.width;
    let height = layout.viewport.height;
    let settings = &layout.settings;
    let mut svg = String::new();

    svg.push_str(&svg_open(width, height, &theme.background));
    svg.push_str(&format!(
        "<g class=\"chordChart\" transform=\"translate({},{})\">",
        fmt(width / 2.0),
        fmt(height / 2.0)
    ));

    svg.push_str("<g class=\"chords\">");
    for chord in &layout.chords {
        let fill = layout
            .arc(chord.target.index)
            .map(|arc| arc.data.fill_color.as_str())
            .unwrap_or(theme.foreground.as_str());
        svg.push_str(&format!(
            "<path class=\"chord\" d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\" opacity=\"{}\">",
            ribbon_path(&chord.source, &chord.target, layout.radius),
            escape_xml(fill),
            escape_xml(&settings.chord.stroke_color),
            fmt(settings.chord.stroke_width),
            fmt(settings.chord.stroke_opacity / 100.0),
            fmt(chord.opacity)
        ));
        svg.push_str(&title(&layout.chord_tooltip(chord)));
        svg.push_str("</path>");
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"slices\">");
    for arc in &layout.arcs {
        svg.push_str(&format!(
            "<path class=\"slice\" data-index=\"{}\" tabindex=\"0\" d=\"{}\" fill=\"{}\" stroke=\"{}\" opacity=\"{}\">",
            arc.index,
            arc_path(arc.start_angle, arc.end_angle, layout.inner_radius, layout.radius),
            escape_xml(&arc.data.fill_color),
            escape_xml(&arc.data.stroke_color),
            fmt(arc.opacity)
        ));
        svg.push_str(&title(&layout.arc_tooltip(arc.index)));
        svg.push_str("</path>");
    }
    svg.push_str("</g>");

    if settings.axis.show {
        svg.push_str("<g class=\"ticks\">");
        for arc in &layout.arcs {
            svg.push_str(&ticks_svg(arc, layout.inner_radius, theme, layout, config));
        }
        svg.push_str("</g>");
    }

    if !layout.labels.is_empty() {
        svg.push_str("<g class=\"labels\">");
        for label in &layout.labels {
            svg.push_str(&format!(
                "<text class=\"data-labels\" x=\"{}\" y=\"{}\" dy=\"{TICK_DY}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}px\" fill=\"{}\">{}</text>",
                fmt(label.x),
                fmt(label.y),
                label.anchor.as_str(),
                escape_xml(&theme.font_family),
                fmt(label.font_size),
                escape_xml(&label.color),
                escape_xml(&label.text)
            ));
        }
        svg.push_str("</g>");

        svg.push_str("<g class=\"lines\">");
        for label in &layout.labels {
            let points: Vec<String> = label
                .leader_line
                .iter()
                .map(|(x, y)| format!("{},{}", fmt(*x), fmt(*y)))
                .collect();
            svg.push_str(&format!(
                "<polyline class=\"line-label\" points=\"{}\" fill=\"none\" stroke=\"{}\" opacity=\"{}\" pointer-events=\"none\"/>",
                points.join(" "),
                escape_xml(&label.color),
                fmt(config.polyline_opacity)
            ));
        }
        svg.push_str("</g>");
    }

    svg.push_str("</g></svg>");
    svg
}

/// Background-only document for updates without data.
pub fn render_empty_svg(render: &RenderConfig) -> String {
    let mut svg = svg_open(render.width, render.height, &render.background);
    svg.push_str("</svg>");
    svg
}

fn svg_open(width: f64, height: f64, background: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"chordChart\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\"><rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(background),
        w = fmt(width),
        h = fmt(height),
    )
}

fn ticks_svg(
    arc: &ArcDescriptor,
    radius: f64,
    theme: &Theme,
    layout: &ChordLayout,
    config: &ChordConfig,
) -> String {
    let axis = &layout.settings.axis;
    let mut out = String::from("<g class=\"slice-ticks\">");
    for tick in &arc.angle_labels {
        let degrees = tick.angle.to_degrees() - 90.0;
        let flipped = tick.angle > PI;
        out.push_str(&format!(
            "<g class=\"tick-pair\" transform=\"rotate({}) translate({},0)\"><line class=\"tick-line\" x1=\"1\" y1=\"0\" x2=\"5\" y2=\"0\" stroke=\"{}\"/>",
            fmt(degrees),
            fmt(radius),
            escape_xml(&axis.color)
        ));
        out.push_str(&format!(
            "<text class=\"tick-text\" x=\"{}\" dy=\"{TICK_DY}\" font-family=\"{}\" font-size=\"{}px\" fill=\"{}\"{}>{}</text></g>",
            fmt(config.tick_shift_x),
            escape_xml(&theme.font_family),
            fmt(axis.font_size),
            escape_xml(&axis.color),
            if flipped {
                " text-anchor=\"end\" transform=\"rotate(180) translate(-16)\""
            } else {
                ""
            },
            escape_xml(&tick.label)
        ));
    }
    out.push_str("</g>");
    out
}

fn title(items: &[TooltipItem]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{}: {}", item.display_name, item.value))
        .collect();
    format!("<title>{}</title>", escape_xml(&lines.join("\n")))
}

/// Screen point at `radius` for a layout angle (0 at 12 o'clock).
fn point(radius: f64, angle: f64) -> (f64, f64) {
    let a = angle - FRAC_PI_2;
    (radius * a.cos(), radius * a.sin())
}

/// Annular sector between `inner` and `outer` radius.
pub fn arc_path(start: f64, end: f64, inner: f64, outer: f64) -> String {
    let span = end - start;
    let (sx, sy) = point(outer, start);
    if span.is_nan() || span <= ANGLE_EPSILON {
        return format!("M{},{}Z", fmt(sx), fmt(sy));
    }
    if span >= TAU - ANGLE_EPSILON {
        let (ox, oy) = point(outer, start + PI);
        let (ix, iy) = point(inner, start);
        let (jx, jy) = point(inner, start + PI);
        return format!(
            "M{},{}A{o},{o},0,1,1,{},{}A{o},{o},0,1,1,{},{}M{},{}A{i},{i},0,1,0,{},{}A{i},{i},0,1,0,{},{}Z",
            fmt(sx),
            fmt(sy),
            fmt(ox),
            fmt(oy),
            fmt(sx),
            fmt(sy),
            fmt(ix),
            fmt(iy),
            fmt(jx),
            fmt(jy),
            fmt(ix),
            fmt(iy),
            o = fmt(outer),
            i = fmt(inner),
        );
    }
    let large = if span > PI { 1 } else { 0 };
    let (ex, ey) = point(outer, end);
    let (ix, iy) = point(inner, end);
    let (jx, jy) = point(inner, start);
    format!(
        "M{},{}A{o},{o},0,{large},1,{},{}L{},{}A{i},{i},0,{large},0,{},{}Z",
        fmt(sx),
        fmt(sy),
        fmt(ex),
        fmt(ey),
        fmt(ix),
        fmt(iy),
        fmt(jx),
        fmt(jy),
        o = fmt(outer),
        i = fmt(inner),
    )
}

/// Ribbon between two arc slices: along the source slice, a quadratic
/// curve through the center to the target slice, along it, and back.
pub fn ribbon_path(source: &ChordEnd, target: &ChordEnd, radius: f64) -> String {
    let (sx, sy) = point(radius, source.start_angle);
    let mut d = format!("M{},{}", fmt(sx), fmt(sy));
    push_arc(&mut d, radius, source.start_angle, source.end_angle);
    if source.start_angle != target.start_angle || source.end_angle != target.end_angle {
        let (tx, ty) = point(radius, target.start_angle);
        d.push_str(&format!("Q0,0,{},{}", fmt(tx), fmt(ty)));
        push_arc(&mut d, radius, target.start_angle, target.end_angle);
    }
    d.push_str(&format!("Q0,0,{},{}Z", fmt(sx), fmt(sy)));
    d
}

fn push_arc(d: &mut String, radius: f64, start: f64, end: f64) {
    let span = end - start;
    if span.is_nan() || span <= ANGLE_EPSILON {
        return;
    }
    let large = if span > PI { 1 } else { 0 };
    let (ex, ey) = point(radius, end);
    d.push_str(&format!(
        "A{r},{r},0,{large},1,{},{}",
        fmt(ex),
        fmt(ey),
        r = fmt(radius)
    ));
}

/// Fixed two-decimal output with trailing zeros and `-0` removed.
fn fmt(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme
        .font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
    {
        opt.font_family = family.to_string();
    }
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .ok_or_else(|| anyhow::anyhow!("Invalid output size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
