//! Hand-rolled reader for a practical SVG subset.
//!
//! Supported elements: `svg`, `g`, `rect`, `circle`, `ellipse`, `path`,
//! `polygon`, `polyline`, `line`. Paint comes from the `fill`, `stroke` and
//! `stroke-width` presentation attributes; structure from `id` and
//! `transform`. Unknown elements are skipped whole, comments and processing
//! instructions are tolerated anywhere. This is deliberately not a
//! conforming XML parser, the same way a layout reader only speaks the
//! records it stores.

use std::fs;
use std::path::Path;

use svgscope_core::{
    Color, DrawingChild, DrawingDocument, DrawingGroup, DrawingPrimitive, DrawingStore, Geometry,
    IdentifierIndex, Matrix, Paint, Point, Stroke,
};

use crate::error::ImportError;
use crate::pathdata::parse_path_data;

/// Read an SVG document from a file.
pub fn read_svg_file(path: impl AsRef<Path>) -> Result<DrawingDocument, ImportError> {
    let path = path.as_ref();
    log::info!("reading SVG from {}", path.display());
    let text = fs::read_to_string(path)?;
    read_svg_str(&text)
}

/// Read an SVG document from markup held in memory.
pub fn read_svg_str(source: &str) -> Result<DrawingDocument, ImportError> {
    let mut reader = Reader::new(source);
    let document = reader.read()?;
    log::info!(
        "imported {} primitives, {} identifiers",
        document.store.len(),
        document.index.len()
    );
    Ok(document)
}

type Attrs = Vec<(String, String)>;

fn attr<'a>(attrs: &'a Attrs, name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    store: DrawingStore,
    index: IdentifierIndex,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            store: DrawingStore::new(),
            index: IdentifierIndex::new(),
        }
    }

    fn read(&mut self) -> Result<DrawingDocument, ImportError> {
        self.skip_misc()?;
        self.expect(b'<')?;
        let name = self.read_name()?;
        if name != "svg" {
            return Err(self.error(format!("expected <svg> root element, found <{name}>")));
        }
        let (attrs, self_closing) = self.parse_attrs()?;
        let mut root = DrawingGroup::new(attr(&attrs, "id").map(str::to_string));
        if !self_closing {
            self.parse_children("svg", &mut root.children)?;
        }
        let store = std::mem::take(&mut self.store);
        let index = std::mem::take(&mut self.index);
        Ok(DrawingDocument::new(store, root, index))
    }

    // ── Character-level helpers ──────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    fn error(&self, message: impl Into<String>) -> ImportError {
        ImportError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ImportError> {
        match self.bump() {
            Some(b) if b == expected => Ok(()),
            Some(b) => Err(self.error(format!(
                "expected '{}', found '{}'",
                expected as char, b as char
            ))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Skip whitespace, comments, processing instructions and declarations.
    fn skip_misc(&mut self) -> Result<(), ImportError> {
        loop {
            self.skip_ws();
            if self.starts_with("<!--") {
                self.skip_until("-->", "unterminated comment")?;
            } else if self.starts_with("<?") {
                self.skip_until("?>", "unterminated processing instruction")?;
            } else if self.starts_with("<!") {
                self.skip_until(">", "unterminated declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_until(&mut self, terminator: &str, message: &str) -> Result<(), ImportError> {
        while self.pos < self.bytes.len() {
            if self.starts_with(terminator) {
                for _ in 0..terminator.len() {
                    self.bump();
                }
                return Ok(());
            }
            self.bump();
        }
        Err(self.error(message))
    }

    fn is_name_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
    }

    fn read_name(&mut self) -> Result<String, ImportError> {
        let begin = self.pos;
        while matches!(self.peek(), Some(b) if Self::is_name_byte(b)) {
            self.bump();
        }
        if self.pos == begin {
            return Err(self.error("expected a name"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[begin..self.pos]).into_owned())
    }

    // ── Tag parsing ──────────────────────────────────────────────────────

    /// Parse attributes after a tag name, up to and including `>` or `/>`.
    /// Returns the attributes and whether the tag was self-closing.
    fn parse_attrs(&mut self) -> Result<(Attrs, bool), ImportError> {
        let mut attrs = Attrs::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'>') => {
                    self.bump();
                    return Ok((attrs, false));
                }
                Some(b'/') => {
                    self.bump();
                    self.expect(b'>')?;
                    return Ok((attrs, true));
                }
                Some(_) => {
                    let name = self.read_name()?;
                    self.skip_ws();
                    self.expect(b'=')?;
                    self.skip_ws();
                    let value = self.read_quoted_value()?;
                    attrs.push((name, value));
                }
                None => return Err(self.error("unexpected end of input in tag")),
            }
        }
    }

    fn read_quoted_value(&mut self) -> Result<String, ImportError> {
        let quote = match self.bump() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected quoted attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(b) if b == quote => {
                    self.bump();
                    return Ok(value);
                }
                Some(b'&') => value.push(self.read_entity()?),
                Some(b) => {
                    self.bump();
                    value.push(b as char);
                }
                None => return Err(self.error("unterminated attribute value")),
            }
        }
    }

    /// The five predefined XML entities; anything fancier is rejected.
    fn read_entity(&mut self) -> Result<char, ImportError> {
        let begin = self.pos;
        self.bump();
        while self.pos < self.bytes.len() && self.pos - begin < 8 {
            if self.peek() == Some(b';') {
                self.bump();
                let name = String::from_utf8_lossy(&self.bytes[begin + 1..self.pos - 1]).into_owned();
                return match name.as_str() {
                    "amp" => Ok('&'),
                    "lt" => Ok('<'),
                    "gt" => Ok('>'),
                    "quot" => Ok('"'),
                    "apos" => Ok('\''),
                    _ => Err(self.error(format!("unsupported entity '&{name};'"))),
                };
            }
            self.bump();
        }
        Err(self.error("unterminated entity reference"))
    }

    // ── Element tree ─────────────────────────────────────────────────────

    /// Parse children of an open element until its closing tag, appending
    /// the drawings they produce. Text content is discarded.
    fn parse_children(
        &mut self,
        parent: &str,
        children: &mut Vec<DrawingChild>,
    ) -> Result<(), ImportError> {
        loop {
            self.skip_misc()?;
            match self.peek() {
                None => return Err(self.error(format!("missing closing tag for <{parent}>"))),
                Some(b'<') => {}
                Some(_) => {
                    // Text content carries no drawings.
                    while matches!(self.peek(), Some(b) if b != b'<') {
                        self.bump();
                    }
                    continue;
                }
            }
            if self.starts_with("</") {
                self.bump();
                self.bump();
                let name = self.read_name()?;
                self.skip_ws();
                self.expect(b'>')?;
                if name != parent {
                    return Err(
                        self.error(format!("mismatched closing tag </{name}> for <{parent}>"))
                    );
                }
                return Ok(());
            }
            self.expect(b'<')?;
            let name = self.read_name()?;
            let (attrs, self_closing) = self.parse_attrs()?;
            if let Some(child) = self.build_element(&name, &attrs, self_closing)? {
                children.push(child);
            }
        }
    }

    /// Skip the rest of an already-opened element, nesting included.
    fn skip_subtree(&mut self, name: &str) -> Result<(), ImportError> {
        let mut depth = 0usize;
        loop {
            self.skip_misc()?;
            match self.peek() {
                None => return Err(self.error(format!("missing closing tag for <{name}>"))),
                Some(b'<') => {}
                Some(_) => {
                    while matches!(self.peek(), Some(b) if b != b'<') {
                        self.bump();
                    }
                    continue;
                }
            }
            if self.starts_with("</") {
                self.bump();
                self.bump();
                let closing = self.read_name()?;
                self.skip_ws();
                self.expect(b'>')?;
                if closing == name {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
            } else {
                self.expect(b'<')?;
                let opening = self.read_name()?;
                let (_, self_closing) = self.parse_attrs()?;
                if opening == name && !self_closing {
                    depth += 1;
                }
            }
        }
    }

    fn build_element(
        &mut self,
        name: &str,
        attrs: &Attrs,
        self_closing: bool,
    ) -> Result<Option<DrawingChild>, ImportError> {
        match name {
            "g" => {
                let mut group = DrawingGroup::new(attr(attrs, "id").map(str::to_string));
                if let Some(text) = attr(attrs, "transform") {
                    group.transform = parse_transform(text, self.line)?;
                }
                if !self_closing {
                    self.parse_children("g", &mut group.children)?;
                }
                Ok(Some(DrawingChild::Group(group)))
            }
            "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon" | "path" => {
                let line = self.line;
                let geometry = build_geometry(name, attrs, line)?;
                if !self_closing {
                    self.skip_subtree(name)?;
                }
                let mut primitive = DrawingPrimitive::new(geometry);
                primitive.fill = self.parse_fill(attrs);
                primitive.stroke = self.parse_stroke(attrs, line)?;
                let identifier = attr(attrs, "id");
                let id = self.store.insert(primitive);
                if let Some(identifier) = identifier {
                    self.index
                        .insert(identifier, id)
                        .map_err(|_| ImportError::DuplicateIdentifier(identifier.to_string()))?;
                }
                let child = DrawingChild::Primitive(id);
                // Primitives carry no transform of their own; a transform
                // attribute becomes an anonymous wrapping group.
                match attr(attrs, "transform") {
                    Some(text) => {
                        let mut wrap =
                            DrawingGroup::new(None).with_transform(parse_transform(text, line)?);
                        wrap.children.push(child);
                        Ok(Some(DrawingChild::Group(wrap)))
                    }
                    None => Ok(Some(child)),
                }
            }
            _ => {
                log::debug!("line {}: skipping unsupported element <{}>", self.line, name);
                if !self_closing {
                    self.skip_subtree(name)?;
                }
                Ok(None)
            }
        }
    }

    /// SVG paints with black unless told otherwise.
    fn parse_fill(&self, attrs: &Attrs) -> Option<Paint> {
        match attr(attrs, "fill") {
            Some("none") => None,
            Some(text) => match Color::parse(text) {
                Some(color) => Some(Paint::solid(color)),
                None => {
                    log::warn!("line {}: unrecognized fill '{}', using black", self.line, text);
                    Some(Paint::solid(Color::BLACK))
                }
            },
            None => Some(Paint::solid(Color::BLACK)),
        }
    }

    fn parse_stroke(&self, attrs: &Attrs, line: usize) -> Result<Option<Stroke>, ImportError> {
        let color = match attr(attrs, "stroke") {
            None | Some("none") => return Ok(None),
            Some(text) => match Color::parse(text) {
                Some(color) => color,
                None => {
                    log::warn!("line {}: unrecognized stroke '{}', using black", line, text);
                    Color::BLACK
                }
            },
        };
        let width = match attr(attrs, "stroke-width") {
            Some(text) => parse_number(text, line)?,
            None => 1.0,
        };
        Ok(Some(Stroke::new(color, width)))
    }
}

fn parse_number(text: &str, line: usize) -> Result<f64, ImportError> {
    text.trim().parse().map_err(|_| ImportError::Number {
        line,
        text: text.to_string(),
    })
}

fn numeric_attr(attrs: &Attrs, name: &str, default: f64, line: usize) -> Result<f64, ImportError> {
    match attr(attrs, name) {
        Some(text) => parse_number(text, line),
        None => Ok(default),
    }
}

fn build_geometry(name: &str, attrs: &Attrs, line: usize) -> Result<Geometry, ImportError> {
    let num = |key: &str| numeric_attr(attrs, key, 0.0, line);
    let geometry = match name {
        "rect" => Geometry::Rect {
            x: num("x")?,
            y: num("y")?,
            width: num("width")?,
            height: num("height")?,
        },
        "circle" => {
            let r = num("r")?;
            Geometry::Ellipse {
                cx: num("cx")?,
                cy: num("cy")?,
                rx: r,
                ry: r,
            }
        }
        "ellipse" => Geometry::Ellipse {
            cx: num("cx")?,
            cy: num("cy")?,
            rx: num("rx")?,
            ry: num("ry")?,
        },
        "line" => Geometry::Polygon {
            vertices: vec![
                Point::new(num("x1")?, num("y1")?),
                Point::new(num("x2")?, num("y2")?),
            ],
            closed: false,
        },
        "polyline" | "polygon" => Geometry::Polygon {
            vertices: parse_points(attr(attrs, "points").unwrap_or(""), line)?,
            closed: name == "polygon",
        },
        "path" => Geometry::Path {
            subpaths: parse_path_data(attr(attrs, "d").unwrap_or(""), line)?,
        },
        _ => {
            return Err(ImportError::Syntax {
                line,
                message: format!("<{name}> is not a shape"),
            })
        }
    };
    Ok(geometry)
}

fn parse_points(text: &str, line: usize) -> Result<Vec<Point>, ImportError> {
    let numbers: Vec<f64> = text
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(s, line))
        .collect::<Result<_, _>>()?;
    if numbers.len() % 2 != 0 {
        return Err(ImportError::Syntax {
            line,
            message: "points list has an odd number of coordinates".to_string(),
        });
    }
    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

/// Parse a `transform` attribute: a whitespace/comma separated list of
/// `matrix`, `translate`, `scale` and `rotate` functions, composed left to
/// right (the leftmost function applies last, as in SVG).
pub fn parse_transform(text: &str, line: usize) -> Result<Matrix, ImportError> {
    let syntax = |message: &str| ImportError::Syntax {
        line,
        message: message.to_string(),
    };
    let mut total = Matrix::IDENTITY;
    let mut rest = text.trim();
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| syntax("expected '(' in transform"))?;
        let name = rest[..open].trim();
        let close = rest[open..]
            .find(')')
            .ok_or_else(|| syntax("unterminated transform function"))?
            + open;
        let args: Vec<f64> = rest[open + 1..close]
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| parse_number(s, line))
            .collect::<Result<_, _>>()?;
        let step = match (name, args.len()) {
            ("matrix", 6) => Matrix::from_svg(args[0], args[1], args[2], args[3], args[4], args[5]),
            ("translate", 1) => Matrix::translation(args[0], 0.0),
            ("translate", 2) => Matrix::translation(args[0], args[1]),
            ("scale", 1) => Matrix::scale(args[0], args[0]),
            ("scale", 2) => Matrix::scale(args[0], args[1]),
            ("rotate", 1) => Matrix::rotation_deg(args[0]),
            ("rotate", 3) => Matrix::rotation_deg_about(args[0], Point::new(args[1], args[2])),
            ("matrix" | "translate" | "scale" | "rotate", n) => {
                return Err(syntax(&format!("wrong argument count {n} for {name}()")))
            }
            _ => return Err(syntax(&format!("unknown transform function '{name}'"))),
        };
        // Leftmost function is outermost.
        total = step.then(total);
        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
    }
    Ok(total)
}
