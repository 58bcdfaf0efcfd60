//! Parser for the SVG path `d` attribute.
//!
//! Supported commands: `M L H V C Q Z` and their relative forms. Implicit
//! command repetition follows the SVG rules (coordinates after a move-to
//! continue as line-tos). Anything else fails with
//! [`ImportError::UnsupportedPathCommand`].

use svgscope_core::{PathSegment, Point, Subpath};

use crate::error::ImportError;

/// Parse path data into subpaths. `line` is the source line of the owning
/// element, used in error reports.
pub fn parse_path_data(d: &str, line: usize) -> Result<Vec<Subpath>, ImportError> {
    let mut lex = Lexer::new(d, line);
    let mut subpaths: Vec<Subpath> = Vec::new();
    let mut current: Option<Subpath> = None;
    let mut pos = Point::ZERO;
    let mut start = Point::ZERO;
    let mut cmd: Option<char> = None;

    loop {
        lex.skip_separators();
        let Some(c) = lex.peek() else { break };

        if c.is_ascii_alphabetic() {
            lex.bump();
            if c == 'Z' || c == 'z' {
                if let Some(sp) = current.as_mut() {
                    sp.segments.push(PathSegment::Close);
                }
                pos = start;
                // Coordinates directly after a close have no command.
                cmd = None;
                continue;
            }
            cmd = Some(c);
            lex.skip_separators();
        }

        let Some(c) = cmd else {
            return Err(lex.syntax("path data must start with a command"));
        };
        let relative = c.is_ascii_lowercase();

        match c.to_ascii_uppercase() {
            'M' => {
                let p = resolve(lex.point()?, pos, relative);
                if let Some(sp) = current.take() {
                    subpaths.push(sp);
                }
                current = Some(Subpath::new(p));
                pos = p;
                start = p;
                // Further coordinate pairs continue as line-tos.
                cmd = Some(if relative { 'l' } else { 'L' });
            }
            'L' => {
                let p = resolve(lex.point()?, pos, relative);
                push_segment(&mut current, pos, PathSegment::LineTo(p));
                pos = p;
            }
            'H' => {
                let x = lex.number()?;
                let p = Point::new(if relative { pos.x + x } else { x }, pos.y);
                push_segment(&mut current, pos, PathSegment::LineTo(p));
                pos = p;
            }
            'V' => {
                let y = lex.number()?;
                let p = Point::new(pos.x, if relative { pos.y + y } else { y });
                push_segment(&mut current, pos, PathSegment::LineTo(p));
                pos = p;
            }
            'C' => {
                let c1 = resolve(lex.point()?, pos, relative);
                let c2 = resolve(lex.point()?, pos, relative);
                let to = resolve(lex.point()?, pos, relative);
                push_segment(&mut current, pos, PathSegment::CubicTo { c1, c2, to });
                pos = to;
            }
            'Q' => {
                let ctrl = resolve(lex.point()?, pos, relative);
                let to = resolve(lex.point()?, pos, relative);
                push_segment(&mut current, pos, PathSegment::QuadTo { c: ctrl, to });
                pos = to;
            }
            other => return Err(ImportError::UnsupportedPathCommand(other)),
        }
    }

    if let Some(sp) = current.take() {
        subpaths.push(sp);
    }
    Ok(subpaths)
}

fn resolve(p: Point, pos: Point, relative: bool) -> Point {
    if relative {
        Point::new(pos.x + p.x, pos.y + p.y)
    } else {
        p
    }
}

/// Drawing segments before any move-to open an implicit subpath at the
/// current position, per the SVG error-recovery convention.
fn push_segment(current: &mut Option<Subpath>, pos: Point, segment: PathSegment) {
    current
        .get_or_insert_with(|| Subpath::new(pos))
        .segments
        .push(segment);
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == ',' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn syntax(&self, message: &str) -> ImportError {
        ImportError::Syntax {
            line: self.line,
            message: message.to_string(),
        }
    }

    fn number(&mut self) -> Result<f64, ImportError> {
        self.skip_separators();
        let begin = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text = std::str::from_utf8(&self.bytes[begin..self.pos]).unwrap_or("");
        text.parse().map_err(|_| ImportError::Number {
            line: self.line,
            text: if text.is_empty() {
                "<empty>".to_string()
            } else {
                text.to_string()
            },
        })
    }

    fn point(&mut self) -> Result<Point, ImportError> {
        Ok(Point::new(self.number()?, self.number()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_moveto_lineto_close() {
        let subpaths = parse_path_data("M 0 0 L 10 0 L 10 10 Z", 1).unwrap();
        assert_eq!(subpaths.len(), 1);
        let sp = &subpaths[0];
        assert_eq!(sp.start, Point::ZERO);
        assert_eq!(sp.segments.len(), 3);
        assert_eq!(sp.segments[0], PathSegment::LineTo(Point::new(10.0, 0.0)));
        assert_eq!(sp.segments[2], PathSegment::Close);
    }

    #[test]
    fn test_relative_and_implicit_lineto() {
        // Pairs after the move-to continue as (relative) line-tos.
        let subpaths = parse_path_data("m 1 1 2 0 0 2", 1).unwrap();
        let sp = &subpaths[0];
        assert_eq!(sp.start, Point::new(1.0, 1.0));
        assert_eq!(sp.segments[0], PathSegment::LineTo(Point::new(3.0, 1.0)));
        assert_eq!(sp.segments[1], PathSegment::LineTo(Point::new(3.0, 3.0)));
    }

    #[test]
    fn test_horizontal_vertical() {
        let subpaths = parse_path_data("M1,2 H 5 v -2", 1).unwrap();
        let sp = &subpaths[0];
        assert_eq!(sp.segments[0], PathSegment::LineTo(Point::new(5.0, 2.0)));
        assert_eq!(sp.segments[1], PathSegment::LineTo(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_cubic_and_quadratic() {
        let subpaths = parse_path_data("M0 0 C 1 1, 2 1, 3 0 q 1 -1 2 0", 1).unwrap();
        let sp = &subpaths[0];
        assert_eq!(
            sp.segments[0],
            PathSegment::CubicTo {
                c1: Point::new(1.0, 1.0),
                c2: Point::new(2.0, 1.0),
                to: Point::new(3.0, 0.0),
            }
        );
        assert_eq!(
            sp.segments[1],
            PathSegment::QuadTo {
                c: Point::new(4.0, -1.0),
                to: Point::new(5.0, 0.0),
            }
        );
    }

    #[test]
    fn test_multiple_subpaths() {
        let subpaths = parse_path_data("M0 0 L1 0 Z M 5 5 L 6 5", 1).unwrap();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1].start, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_unsupported_command() {
        let err = parse_path_data("M0 0 A 1 1 0 0 0 2 2", 1).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedPathCommand('A')));
    }

    #[test]
    fn test_missing_number() {
        let err = parse_path_data("M 0", 7).unwrap_err();
        assert!(matches!(err, ImportError::Number { line: 7, .. }));
    }

    #[test]
    fn test_leading_coordinates_rejected() {
        let err = parse_path_data("10 10 L 0 0", 1).unwrap_err();
        assert!(matches!(err, ImportError::Syntax { .. }));
    }
}
