use ghx_reflect::components::ComponentRegistry;
use ghx_reflect::components::reflect::{
    PIN_FACE_NORMALS, PIN_HIT_POINTS, PIN_LINES_IN, PIN_LINES_OUT, PIN_VECS_INPUT, PIN_VECS_REF,
};
use ghx_reflect::graph::node::{MetaMap, MetaValue};
use ghx_reflect::graph::value::Value;
use ghx_reflect::{REFLECT_GUID, ReflectRequest, evaluate_request};

const ALL_PINS: [&str; 6] = [
    PIN_HIT_POINTS,
    PIN_LINES_IN,
    PIN_LINES_OUT,
    PIN_VECS_INPUT,
    PIN_VECS_REF,
    PIN_FACE_NORMALS,
];

fn tilted_panel() -> Value {
    Value::Surface {
        vertices: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        faces: vec![vec![0, 1, 2, 3]],
    }
}

fn line(p1: [f64; 3], p2: [f64; 3]) -> Value {
    Value::CurveLine { p1, p2 }
}

fn assert_point_close(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn registry_resolves_reflect_component() {
    let registry = ComponentRegistry::default();
    let by_guid = registry
        .resolve(Some(format!("{{{REFLECT_GUID}}}").as_str()), None, None)
        .expect("guid lookup");
    let by_name = registry.resolve(None, Some("Reflect"), None).expect("name lookup");
    assert_eq!(by_guid, by_name);
    assert_eq!(by_guid.name(), "Reflect");
}

#[test]
fn reflect_component_outputs_are_index_aligned() {
    let registry = ComponentRegistry::default();
    let component = registry.resolve(Some(REFLECT_GUID), None, None).unwrap();

    let inputs = [
        Value::List(vec![
            line([0.6, 0.5, 2.0], [0.6, 0.5, -1.0]),
            line([5.0, 5.0, 2.0], [5.0, 5.0, -1.0]),
            line([0.3, -1.0, 0.25], [0.3, 2.0, 0.25]),
        ]),
        tilted_panel(),
        Value::Number(1.5),
    ];
    let outputs = component.evaluate(&inputs, &MetaMap::new()).expect("evaluate");

    for pin in ALL_PINS {
        let list = outputs[pin].expect_list().expect("list output");
        assert_eq!(list.len(), 2, "pin `{pin}`");
    }

    let points = outputs[PIN_HIT_POINTS].expect_list().unwrap();
    assert_point_close(points[0].expect_point().unwrap(), [0.6, 0.5, 0.5]);
    assert_point_close(points[1].expect_point().unwrap(), [0.3, 0.25, 0.25]);

    let reflected = outputs[PIN_VECS_REF].expect_list().unwrap();
    assert_point_close(reflected[0].expect_vector().unwrap(), [0.0, -1.0, 0.0]);
    assert_point_close(reflected[1].expect_vector().unwrap(), [0.0, 0.0, 1.0]);

    let (start, end) = outputs[PIN_LINES_IN].expect_list().unwrap()[1]
        .expect_curve_line()
        .unwrap();
    assert_point_close(start, [0.3, -1.0, 0.25]);
    assert_point_close(end, [0.3, 0.25, 0.25]);

    let (_, out_end) = outputs[PIN_LINES_OUT].expect_list().unwrap()[0]
        .expect_curve_line()
        .unwrap();
    assert_point_close(out_end, [0.6, -1.0, 0.5]);
}

#[test]
fn missing_mesh_yields_no_outputs() {
    let registry = ComponentRegistry::default();
    let component = registry.resolve(None, None, Some("Refl")).unwrap();

    let inputs = [
        Value::List(vec![line([0.0, 0.0, 1.0], [0.0, 0.0, -1.0])]),
        Value::Null,
        Value::Number(1.0),
    ];
    let outputs = component.evaluate(&inputs, &MetaMap::new()).expect("evaluate");
    assert!(outputs.is_empty());

    let outputs = component.evaluate(&inputs[..1], &MetaMap::new()).expect("evaluate");
    assert!(outputs.is_empty());
}

#[test]
fn epsilon_meta_controls_self_hits() {
    let registry = ComponentRegistry::default();
    let component = registry.resolve(Some(REFLECT_GUID), None, None).unwrap();

    // Starts 0.005 of its length above the panel.
    let inputs = [
        Value::List(vec![line([0.6, 0.5, 0.515], [0.6, 0.5, -2.485])]),
        tilted_panel(),
        Value::Number(1.0),
    ];

    let default = component.evaluate(&inputs, &MetaMap::new()).unwrap();
    assert_eq!(default[PIN_HIT_POINTS].expect_list().unwrap().len(), 1);

    let mut meta = MetaMap::new();
    meta.insert("Epsilon".to_owned(), MetaValue::Number(0.01));
    let strict = component.evaluate(&inputs, &meta).unwrap();
    assert!(strict[PIN_HIT_POINTS].expect_list().unwrap().is_empty());
}

#[test]
fn request_api_matches_component_outputs() {
    let request = ReflectRequest {
        lines: vec![[[0.6, 0.5, 2.0], [0.6, 0.5, -1.0]]],
        vertices: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        faces: vec![vec![0, 1, 2, 3]],
        reference_length: -1.5,
        epsilon: None,
        unbounded: false,
    };
    let response = evaluate_request(&ComponentRegistry::default(), &request).expect("response");

    assert_eq!(response.hit_points.len(), 1);
    assert_point_close(response.lines_out[0][0], [0.6, 0.5, 0.5]);
    // Negative length points the outgoing segment against the reflection.
    assert_point_close(response.lines_out[0][1], [0.6, 2.0, 0.5]);
    assert_point_close(response.face_normals[0], [0.0, -0.5_f64.sqrt(), 0.5_f64.sqrt()]);
}
