//! XML drawing scripts for the command-line renderer.
//!
//! ```xml
//! <drawing width="300" height="200" padding="0.05">
//!   <pen width="2" dash="4 2"/>
//!   <line x1="0" y1="0" x2="1.5" y2="0"/>
//!   <colour r="0.8" g="0" b="0"/>
//!   <wavy x1="0" y1="1" x2="1.5" y2="1" segments="6" offset="0.05" r2="0" g2="0" b2="1"/>
//!   <polygon points="0,2 1,2.5 0,3"/>
//!   <text x="2" y="0">CH<sub>3</sub></text>
//! </drawing>
//! ```

use anyhow::{anyhow, Context, Result};
use moldraw_cairo::{
    Bounds, CairoDrawer, CanvasPoint, CoordinateMapper, DashPattern, DrawColour, DrawError,
    MolPoint, Transform,
};
use roxmltree::{Document, Node};

const DEFAULT_PADDING: f64 = 0.05;
const DEFAULT_WAVY_SEGMENTS: u32 = 6;
const DEFAULT_WAVY_OFFSET: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clear,
    Colour(DrawColour),
    Pen {
        width: Option<f64>,
        dash: Option<DashPattern>,
        fill: Option<bool>,
        font_size: Option<f64>,
    },
    Line {
        from: MolPoint,
        to: MolPoint,
    },
    Wavy {
        from: MolPoint,
        to: MolPoint,
        colour2: Option<DrawColour>,
        segments: u32,
        offset: f64,
    },
    Polygon(Vec<MolPoint>),
    Rect {
        from: MolPoint,
        to: MolPoint,
    },
    Char {
        glyph: char,
        at: CanvasPoint,
    },
    Text {
        label: String,
        at: MolPoint,
    },
}

#[derive(Debug)]
pub struct Scene {
    pub width: i32,
    pub height: i32,
    pub padding: f64,
    pub commands: Vec<Command>,
}

impl Scene {
    pub fn parse(doc: &Document) -> Result<Self> {
        let root = doc.root_element();
        if !root.has_tag_name("drawing") {
            return Err(anyhow!(
                "Expected <drawing> root element, found <{}>",
                root.tag_name().name()
            ));
        }
        let width = parse_i32(root.attribute("width")).ok_or_else(|| anyhow!("Bad drawing width"))?;
        let height =
            parse_i32(root.attribute("height")).ok_or_else(|| anyhow!("Bad drawing height"))?;
        let padding = parse_f64(root.attribute("padding")).unwrap_or(DEFAULT_PADDING);

        let commands = root
            .children()
            .filter(|node| node.is_element())
            .map(|node| {
                parse_command(&node).with_context(|| {
                    format!("Invalid <{}> element", node.tag_name().name())
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            width,
            height,
            padding,
            commands,
        })
    }

    /// Molecule-space points referenced by the script.
    fn points(&self) -> impl Iterator<Item = MolPoint> + '_ {
        self.commands.iter().flat_map(|command| match command {
            Command::Line { from, to }
            | Command::Wavy { from, to, .. }
            | Command::Rect { from, to } => vec![*from, *to],
            Command::Polygon(points) => points.clone(),
            Command::Text { at, .. } => vec![*at],
            Command::Clear | Command::Colour(_) | Command::Pen { .. } | Command::Char { .. } => {
                Vec::new()
            }
        })
    }

    /// Fit every referenced point onto the canvas.
    pub fn transform(&self) -> Transform {
        let bounds = Bounds::enclosing(self.points()).unwrap_or(Bounds {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
        });
        Transform::fit(bounds, self.width as f64, self.height as f64, self.padding)
    }

    pub fn replay<M: CoordinateMapper>(&self, drawer: &mut CairoDrawer<M>) -> Result<(), DrawError> {
        for command in &self.commands {
            match command {
                Command::Clear => drawer.clear_drawing()?,
                Command::Colour(colour) => drawer.set_colour(*colour),
                Command::Pen {
                    width,
                    dash,
                    fill,
                    font_size,
                } => {
                    if let Some(width) = width {
                        drawer.set_line_width(*width);
                    }
                    if let Some(dash) = dash {
                        drawer.set_dash(dash.clone());
                    }
                    if let Some(fill) = fill {
                        drawer.set_fill_polys(*fill);
                    }
                    if let Some(size) = font_size {
                        drawer.set_font_size(*size);
                    }
                }
                Command::Line { from, to } => drawer.draw_line(*from, *to)?,
                Command::Wavy {
                    from,
                    to,
                    colour2,
                    segments,
                    offset,
                } => {
                    let colour1 = drawer.colour();
                    let colour2 = colour2.unwrap_or(colour1);
                    drawer.draw_wavy_line(*from, *to, colour1, colour2, *segments, *offset)?;
                }
                Command::Polygon(points) => drawer.draw_polygon(points)?,
                Command::Rect { from, to } => drawer.draw_rect(*from, *to)?,
                Command::Char { glyph, at } => drawer.draw_char(*glyph, *at)?,
                Command::Text { label, at } => drawer.draw_string(label, *at)?,
            }
        }
        Ok(())
    }
}

fn parse_command(node: &Node) -> Result<Command> {
    let command = match node.tag_name().name() {
        "clear" => Command::Clear,
        "colour" | "color" => Command::Colour(parse_colour(node, "")?),
        "pen" => Command::Pen {
            width: parse_f64(node.attribute("width")),
            dash: node.attribute("dash").map(parse_dash).transpose()?,
            fill: node.attribute("fill").map(|v| v == "true"),
            font_size: parse_f64(node.attribute("font-size")),
        },
        "line" => {
            let (from, to) = parse_segment(node)?;
            Command::Line { from, to }
        }
        "wavy" => {
            let (from, to) = parse_segment(node)?;
            let colour2 = if node.has_attribute("r2") {
                Some(parse_colour(node, "2")?)
            } else {
                None
            };
            let segments = node
                .attribute("segments")
                .map(|v| v.parse::<u32>())
                .transpose()?
                .unwrap_or(DEFAULT_WAVY_SEGMENTS);
            if segments < 2 {
                return Err(anyhow!("A wavy line needs at least 2 segments"));
            }
            Command::Wavy {
                from,
                to,
                colour2,
                segments,
                offset: parse_f64(node.attribute("offset")).unwrap_or(DEFAULT_WAVY_OFFSET),
            }
        }
        "polygon" => {
            let points = parse_points(
                node.attribute("points")
                    .ok_or_else(|| anyhow!("Polygon missing points"))?,
            )?;
            if points.len() < 3 {
                return Err(anyhow!("A polygon needs at least 3 points"));
            }
            Command::Polygon(points)
        }
        "rect" => {
            let (from, to) = parse_segment(node)?;
            Command::Rect { from, to }
        }
        "char" => {
            let mut chars = node.attribute("c").unwrap_or_default().chars();
            let (Some(glyph), None) = (chars.next(), chars.next()) else {
                return Err(anyhow!("Char element needs exactly one character in c"));
            };
            let at = parse_point(node, "x", "y")?;
            Command::Char {
                glyph,
                at: CanvasPoint::new(at.x, at.y),
            }
        }
        "text" => Command::Text {
            label: label_markup(node),
            at: parse_point(node, "x", "y")?,
        },
        other => return Err(anyhow!("Unknown drawing command <{other}>")),
    };
    Ok(command)
}

/// Rebuild a label from text content, keeping `<sub>`/`<sup>` children as markup.
fn label_markup(node: &Node) -> String {
    let mut label = String::new();
    for child in node.children() {
        if child.is_text() {
            label.push_str(child.text().unwrap_or_default());
        } else if child.has_tag_name("sub") || child.has_tag_name("sup") {
            let tag = child.tag_name().name();
            label.push_str(&format!("<{tag}>{}</{tag}>", child.text().unwrap_or_default()));
        }
    }
    label.trim().to_string()
}

fn parse_colour(node: &Node, suffix: &str) -> Result<DrawColour> {
    let channel = |name: &str| {
        parse_f64(node.attribute(format!("{name}{suffix}").as_str()))
            .ok_or_else(|| anyhow!("Bad colour channel {name}{suffix}"))
    };
    Ok(DrawColour::new(channel("r")?, channel("g")?, channel("b")?))
}

fn parse_segment(node: &Node) -> Result<(MolPoint, MolPoint)> {
    Ok((parse_point(node, "x1", "y1")?, parse_point(node, "x2", "y2")?))
}

fn parse_point(node: &Node, x: &str, y: &str) -> Result<MolPoint> {
    Ok(MolPoint::new(
        parse_f64(node.attribute(x)).ok_or_else(|| anyhow!("Bad {x}"))?,
        parse_f64(node.attribute(y)).ok_or_else(|| anyhow!("Bad {y}"))?,
    ))
}

fn parse_points(value: &str) -> Result<Vec<MolPoint>> {
    value
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| anyhow!("Bad point {pair:?}"))?;
            Ok(MolPoint::new(x.trim().parse()?, y.trim().parse()?))
        })
        .collect()
}

fn parse_dash(value: &str) -> Result<DashPattern> {
    let lengths = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DashPattern::new(lengths))
}

fn parse_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

fn parse_i32(value: Option<&str>) -> Option<i32> {
    value.and_then(|v| v.trim().parse::<i32>().ok())
}
