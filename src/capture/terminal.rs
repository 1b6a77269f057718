use std::io::{BufRead, Write};

use super::session::{MapSurface, SurfaceEvent};
use crate::domain::GeoPoint;
use crate::error::CaptureError;

const HELP: &str = "Commands: <lat>,<lng> | add <lat> <lng> | undo | clear | done | cancel";

/// Line-oriented map surface: reads commands, prints the drawing state.
pub struct TerminalSurface<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalSurface<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, line: &str) {
        // Output errors are not fatal for drawing; the next read will fail too.
        let _ = writeln!(self.output, "{}", line);
    }
}

/// Parse one command line. `Err` carries a message for the user.
pub fn parse_command(line: &str) -> Result<Option<SurfaceEvent>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let event = match word.to_ascii_lowercase().as_str() {
        "undo" | "u" => SurfaceEvent::Undo,
        "clear" | "c" => SurfaceEvent::Clear,
        "done" | "d" | "confirm" => SurfaceEvent::Confirm,
        "cancel" | "q" | "quit" => SurfaceEvent::Dismiss,
        "add" | "a" => {
            let coords: Vec<&str> = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            match coords.as_slice() {
                [lat, lng] => SurfaceEvent::Tap(format!("{},{}", lat, lng).parse()?),
                _ => return Err(format!("expected `add <lat> <lng>`, got {:?}", line)),
            }
        }
        _ if line.contains(',') => SurfaceEvent::Tap(line.parse()?),
        _ => return Err(format!("unknown command {:?}. {}", word, HELP)),
    };
    Ok(Some(event))
}

impl<R: BufRead, W: Write> MapSurface for TerminalSurface<R, W> {
    fn next_event(&mut self) -> Option<SurfaceEvent> {
        loop {
            let _ = write!(self.output, "> ");
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            match parse_command(&line) {
                Ok(Some(event)) => return Some(event),
                Ok(None) => continue,
                Err(msg) => self.say(&msg),
            }
        }
    }

    fn render_markers(&mut self, points: &[GeoPoint]) {
        self.say(&format!("Points: {}", points.len()));
        for (i, p) in points.iter().enumerate() {
            self.say(&format!("  {:>2}. {:.6}, {:.6}", i + 1, p.latitude, p.longitude));
        }
    }

    fn render_polygon(&mut self, _points: &[GeoPoint], status: &str) {
        self.say(status);
    }

    fn recenter(&mut self, center: GeoPoint) {
        self.say(&format!("Map centered at {}", center));
    }

    fn reject(&mut self, error: &CaptureError) {
        self.say(&format!("Cannot confirm: {}", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureSession, PolygonCapture, StaticLocation};
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("undo"), Ok(Some(SurfaceEvent::Undo)));
        assert_eq!(parse_command("  C "), Ok(Some(SurfaceEvent::Clear)));
        assert_eq!(parse_command("done"), Ok(Some(SurfaceEvent::Confirm)));
        assert_eq!(parse_command("q"), Ok(Some(SurfaceEvent::Dismiss)));
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(
            parse_command("add -0.18 -78.46"),
            Ok(Some(SurfaceEvent::Tap(GeoPoint::new(-0.18, -78.46))))
        );
        assert_eq!(
            parse_command("-0.18, -78.46"),
            Ok(Some(SurfaceEvent::Tap(GeoPoint::new(-0.18, -78.46))))
        );
        assert!(parse_command("add 1").is_err());
        assert!(parse_command("add NaN 1").is_err());
        assert!(parse_command("add 0 inf").is_err());
        assert!(parse_command("95,400").is_err());
        assert!(parse_command("draw").is_err());
    }

    #[test]
    fn test_terminal_session() {
        let script = "0,0\n0,10\nbogus\ndone\n10,10\n10,0\ndone\n";
        let surface = TerminalSurface::new(Cursor::new(script), Vec::new());
        let mut session = CaptureSession::new(PolygonCapture::default(), surface);
        session.show(&mut StaticLocation(None));

        let selection = session.run().unwrap();
        assert_eq!(selection.center, GeoPoint::new(5.0, 5.0));

        let output = String::from_utf8(session.into_surface().into_output()).unwrap();
        assert!(output.contains("unknown command \"bogus\""));
        assert!(output.contains("Cannot confirm: draw the terrain boundary"));
        assert!(output.contains("Points: 4"));
        assert!(output.contains("Polygon ready"));
    }
}
