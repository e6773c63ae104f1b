//! Hulpfuncties voor het converteren van `Value`-types naar geometrie.

use crate::geom::{Line3, Point3, PolyMesh, Vec3};
use crate::graph::value::Value;

use super::ComponentError;

pub fn coerce_number(value: &Value) -> Result<f64, ComponentError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => s.trim().parse().map_err(|_| {
            ComponentError::new(format!("Kon tekst '{}' niet naar een getal converteren", s))
        }),
        Value::List(l) if l.len() == 1 => coerce_number(&l[0]),
        other => Err(ComponentError::new(format!(
            "Verwachtte een getal, kreeg {}",
            other.kind()
        ))),
    }
}

pub fn coerce_boolean(value: &Value) -> Result<bool, ComponentError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Number(n) => Ok(n.abs() > 1e-9),
        Value::List(l) if l.len() == 1 => coerce_boolean(&l[0]),
        other => Err(ComponentError::new(format!(
            "Verwachtte een booleaanse waarde, kreeg {}",
            other.kind()
        ))),
    }
}

/// Zet een `Surface` om naar een [`PolyMesh`]. De mesh wordt hier niet
/// gevalideerd; dat gebeurt bij het voorbereiden voor ray casting.
pub fn coerce_mesh(value: &Value) -> Result<PolyMesh, ComponentError> {
    match value {
        Value::Surface { vertices, faces } => Ok(PolyMesh::new(vertices.clone(), faces.clone())),
        Value::List(l) if l.len() == 1 => coerce_mesh(&l[0]),
        other => Err(ComponentError::new(format!(
            "Verwachtte een mesh, kreeg {}",
            other.kind()
        ))),
    }
}

/// Verzamelt lijnsegmenten uit een `CurveLine`, een (geneste) lijst van
/// lijnen, of een reeks punten die als polyline wordt gelezen.
///
/// `Null`-items worden overgeslagen en onderbreken een puntenketen.
pub fn coerce_lines(value: &Value) -> Result<Vec<Line3>, ComponentError> {
    let mut lines = Vec::new();
    collect_lines(value, &mut lines)?;
    Ok(lines)
}

fn collect_lines(value: &Value, out: &mut Vec<Line3>) -> Result<(), ComponentError> {
    match value {
        Value::Null => Ok(()),
        Value::CurveLine { p1, p2 } => {
            out.push(Line3::from_arrays(*p1, *p2));
            Ok(())
        }
        Value::List(values) => {
            let mut last_point: Option<[f64; 3]> = None;
            for entry in values {
                if let Value::Point(p) = entry {
                    if let Some(last) = last_point {
                        out.push(Line3::from_arrays(last, *p));
                    }
                    last_point = Some(*p);
                } else {
                    last_point = None;
                    collect_lines(entry, out)?;
                }
            }
            Ok(())
        }
        other => Err(ComponentError::new(format!(
            "Verwachtte een lijn of lijst van lijnen, kreeg {}",
            other.kind()
        ))),
    }
}

pub fn point_value(point: Point3) -> Value {
    Value::Point(point.to_array())
}

pub fn vector_value(vector: Vec3) -> Value {
    Value::Vector(vector.to_array())
}

pub fn line_value(line: Line3) -> Value {
    Value::CurveLine {
        p1: line.start.to_array(),
        p2: line.end.to_array(),
    }
}
