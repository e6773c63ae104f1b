//! Grasshopper "Reflect" component: spiegelt lijnsegmenten aan een mesh.
//!
//! Invoer: `lines`, `refMesh`, `ref length`. Elk segment dat de mesh raakt
//! levert één item op in alle zes uitgangen, in invoervolgorde.

use std::collections::BTreeMap;

use super::coerce::{
    coerce_boolean, coerce_lines, coerce_mesh, coerce_number, line_value, point_value, vector_value,
};
use super::{Component, ComponentError, ComponentResult};
use crate::geom::{RayExtent, ReflectOptions, ReflectionResult, reflect_lines};
use crate::graph::node::{MetaLookupExt, MetaMap, MetaValue};
use crate::graph::value::Value;

pub const PIN_HIT_POINTS: &str = "hitting pts";
pub const PIN_LINES_IN: &str = "lines in";
pub const PIN_LINES_OUT: &str = "lines out";
pub const PIN_VECS_INPUT: &str = "vecs input";
pub const PIN_VECS_REF: &str = "vecs ref";
pub const PIN_FACE_NORMALS: &str = "face normals";

/// Meta-sleutel voor de minimale hitparameter.
pub const META_EPSILON: &str = "Epsilon";
/// Meta-sleutel die segmenten als oneindige stralen laat behandelen.
pub const META_UNBOUNDED: &str = "Unbounded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Reflect,
}

impl ComponentKind {
    pub fn evaluate(self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        match self {
            Self::Reflect => Reflect.evaluate(inputs, meta),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reflect => "Reflect",
        }
    }
}

pub struct Registration {
    pub guids: &'static [&'static str],
    pub names: &'static [&'static str],
    pub kind: ComponentKind,
}

pub const REGISTRATIONS: &[Registration] = &[Registration {
    guids: &["6e0a5ae8-4c78-4211-8ec3-d26302152e71"],
    names: &["Reflect", "Refl"],
    kind: ComponentKind::Reflect,
}];

#[derive(Debug, Default, Clone, Copy)]
pub struct Reflect;

impl Component for Reflect {
    fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        if inputs.len() < 3 || inputs[..3].iter().any(Value::is_null) {
            log::debug!("Reflect: invoer ontbreekt, geen uitvoer");
            return Ok(BTreeMap::new());
        }

        let lines = coerce_lines(&inputs[0])?;
        let mesh = coerce_mesh(&inputs[1])?;
        let length = coerce_number(&inputs[2])?;
        let options = options_from_meta(meta)?;

        let result = reflect_lines(&lines, &mesh, length, &options)?;
        Ok(outputs_from_result(&result))
    }
}

fn options_from_meta(meta: &MetaMap) -> Result<ReflectOptions, ComponentError> {
    let mut options = ReflectOptions::default();

    if let Some(value) = meta.get_normalized(META_EPSILON) {
        let epsilon = value.as_number().ok_or_else(|| {
            ComponentError::new(format!("Meta '{META_EPSILON}' moet een getal zijn"))
        })?;
        options = options.with_hit_epsilon(epsilon);
    }

    if let Some(value) = meta.get_normalized(META_UNBOUNDED) {
        let unbounded = match value {
            MetaValue::Boolean(b) => *b,
            MetaValue::Number(n) => coerce_boolean(&Value::Number(*n))?,
            MetaValue::Integer(n) => *n != 0,
            _ => {
                return Err(ComponentError::new(format!(
                    "Meta '{META_UNBOUNDED}' moet een booleaanse waarde zijn"
                )));
            }
        };
        if unbounded {
            options = options.with_extent(RayExtent::Unbounded);
        }
    }

    Ok(options)
}

fn outputs_from_result(result: &ReflectionResult) -> BTreeMap<String, Value> {
    let mut outputs = BTreeMap::new();
    outputs.insert(
        PIN_HIT_POINTS.to_owned(),
        Value::List(result.hit_points.iter().copied().map(point_value).collect()),
    );
    outputs.insert(
        PIN_LINES_IN.to_owned(),
        Value::List(result.incoming_segments.iter().copied().map(line_value).collect()),
    );
    outputs.insert(
        PIN_LINES_OUT.to_owned(),
        Value::List(result.outgoing_segments.iter().copied().map(line_value).collect()),
    );
    outputs.insert(
        PIN_VECS_INPUT.to_owned(),
        Value::List(result.incoming_directions.iter().copied().map(vector_value).collect()),
    );
    outputs.insert(
        PIN_VECS_REF.to_owned(),
        Value::List(result.reflected_directions.iter().copied().map(vector_value).collect()),
    );
    outputs.insert(
        PIN_FACE_NORMALS.to_owned(),
        Value::List(result.face_normals.iter().copied().map(vector_value).collect()),
    );
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Value {
        Value::Surface {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            faces: vec![vec![0, 1, 2, 3]],
        }
    }

    fn list_len(outputs: &BTreeMap<String, Value>, pin: &str) -> usize {
        outputs
            .get(pin)
            .and_then(|v| v.expect_list().ok())
            .map_or(usize::MAX, <[Value]>::len)
    }

    #[test]
    fn missing_inputs_yield_no_outputs() {
        let meta = MetaMap::new();
        assert!(Reflect.evaluate(&[], &meta).unwrap().is_empty());

        let inputs = [Value::List(Vec::new()), Value::Null, Value::Number(1.0)];
        assert!(Reflect.evaluate(&inputs, &meta).unwrap().is_empty());
    }

    #[test]
    fn vertical_line_is_mirrored() {
        let inputs = [
            Value::CurveLine {
                p1: [0.5, 0.5, -1.0],
                p2: [0.5, 0.5, 1.0],
            },
            square(),
            Value::Number(2.0),
        ];
        let outputs = Reflect.evaluate(&inputs, &MetaMap::new()).unwrap();

        for pin in [
            PIN_HIT_POINTS,
            PIN_LINES_IN,
            PIN_LINES_OUT,
            PIN_VECS_INPUT,
            PIN_VECS_REF,
            PIN_FACE_NORMALS,
        ] {
            assert_eq!(list_len(&outputs, pin), 1, "pin {pin}");
        }

        let out = outputs[PIN_LINES_OUT].expect_list().unwrap()[0]
            .expect_curve_line()
            .unwrap();
        assert!((out.0[2]).abs() < 1e-9);
        assert!((out.1[2] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_line_list_gives_empty_lists() {
        let inputs = [Value::List(Vec::new()), square(), Value::Number(1.0)];
        let outputs = Reflect.evaluate(&inputs, &MetaMap::new()).unwrap();
        assert_eq!(outputs.len(), 6);
        assert_eq!(list_len(&outputs, PIN_HIT_POINTS), 0);
    }

    #[test]
    fn meta_switches_to_unbounded_rays() {
        let inputs = [
            Value::CurveLine {
                p1: [0.5, 0.5, -3.0],
                p2: [0.5, 0.5, -2.0],
            },
            square(),
            Value::Number(1.0),
        ];

        let bounded = Reflect.evaluate(&inputs, &MetaMap::new()).unwrap();
        assert_eq!(list_len(&bounded, PIN_HIT_POINTS), 0);

        let mut meta = MetaMap::new();
        meta.insert("unbounded".to_owned(), MetaValue::Boolean(true));
        let unbounded = Reflect.evaluate(&inputs, &meta).unwrap();
        assert_eq!(list_len(&unbounded, PIN_HIT_POINTS), 1);
    }

    #[test]
    fn invalid_meta_and_inputs_are_errors() {
        let inputs = [Value::Number(1.0), square(), Value::Number(1.0)];
        assert!(Reflect.evaluate(&inputs, &MetaMap::new()).is_err());

        let inputs = [Value::List(Vec::new()), square(), Value::Number(1.0)];
        let mut meta = MetaMap::new();
        meta.insert(META_EPSILON.to_owned(), MetaValue::Text("klein".into()));
        assert!(Reflect.evaluate(&inputs, &meta).is_err());

        meta.insert(META_EPSILON.to_owned(), MetaValue::Number(-1.0));
        let err = Reflect.evaluate(&inputs, &meta).unwrap_err();
        assert!(err.message().contains("hit epsilon"));
    }
}
