//! Loading scenes from plain text.
//!
//! A scene file is a whitespace-separated table with one header line, then one
//! body per line:
//!
//! ```text
//! name    mass  radius  x  y     z  vx  vy  vz  color   trail
//! planet  10    30      0  1000  0  70  0   30  ff0000  100
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::body::{Body, BodyInfo};
use crate::error::{BodyError, SceneFileError};
use crate::scene::{Scene, SimulationParams};

const NUM_COLUMNS: usize = 11;

pub fn read_scene<P: AsRef<Path>>(
    path: P,
    params: SimulationParams,
) -> Result<Scene, SceneFileError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let scene = parse_scene(&contents, params)?;
    debug!(
        "Loaded {} bodies from {}",
        scene.bodies().len(),
        path.as_ref().display()
    );
    Ok(scene)
}

pub fn parse_scene(contents: &str, params: SimulationParams) -> Result<Scene, SceneFileError> {
    let mut scene = Scene::new(params);

    // Skip the header, but keep the line numbers honest
    for (idx, line) in contents.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        scene.add_body(parse_body(line, line_no)?);
    }

    Ok(scene)
}

fn parse_body(line: &str, line_no: usize) -> Result<Body, SceneFileError> {
    let fields: Vec<&str> = line.split_ascii_whitespace().collect();
    if fields.len() != NUM_COLUMNS {
        return Err(SceneFileError::ColumnCount {
            line: line_no,
            expected: NUM_COLUMNS,
            found: fields.len(),
        });
    }

    let number = |i: usize, field: &'static str| -> Result<f64, SceneFileError> {
        fields[i]
            .parse::<f64>()
            .map_err(|_| SceneFileError::BadField {
                line: line_no,
                field,
                value: fields[i].to_owned(),
            })
    };

    // fields[0] is the name, which is only there for humans
    let mass = number(1, "mass")?;
    let radius = number(2, "radius")?;
    let position = Point3::new(number(3, "x")?, number(4, "y")?, number(5, "z")?);
    let velocity = Vector3::new(number(6, "vx")?, number(7, "vy")?, number(8, "vz")?);
    let color = parse_color(fields[9]).ok_or_else(|| SceneFileError::BadColor {
        line: line_no,
        value: fields[9].to_owned(),
    })?;
    let trail = fields[10]
        .parse::<usize>()
        .map_err(|_| SceneFileError::BadField {
            line: line_no,
            field: "trail",
            value: fields[10].to_owned(),
        })?;

    let with_line = |source: BodyError| SceneFileError::Body {
        line: line_no,
        source,
    };
    let info = BodyInfo::new(mass, radius, color).map_err(with_line)?;
    Body::new(info, position, velocity, trail).map_err(with_line)
}

fn parse_color(s: &str) -> Option<[u8; 3]> {
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some([r, g, b])
}
