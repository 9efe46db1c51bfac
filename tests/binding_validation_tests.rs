/// Integration tests for the host binding layer: argument validation,
/// error identifiers and column-major marshaling.
use depth_raster::binding::MAX_IMAGE_DIMENSION;
use depth_raster::*;

fn vertices() -> HostArray {
    // Unit square at depth 2 under an identity camera, screen corners 0..3
    HostArray::from_rows(&[
        [0.0, 0.0, 2.0],
        [6.0, 0.0, 2.0],
        [6.0, 6.0, 2.0],
        [0.0, 6.0, 2.0],
    ])
}

fn faces() -> HostArray {
    HostArray::from_rows(&[[0.0, 1.0, 2.0], [0.0, 2.0, 3.0]])
}

fn image_size(height: f64, width: f64) -> HostArray {
    HostArray::from_rows(&[[height, width]])
}

fn camera() -> HostArray {
    HostArray::from_rows(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ])
}

fn inputs() -> Vec<HostArray> {
    vec![vertices(), faces(), image_size(4.0, 4.0), camera()]
}

#[test]
fn valid_request_renders_full_square() {
    let out = render_depth(&inputs(), 1, &BindingConfig::default()).expect("valid request");
    assert_eq!((out.rows, out.cols), (4, 4));
    assert!(out.data.iter().all(|&v| v == 0.5));
}

#[test]
fn output_is_column_major_height_by_width() {
    // Only the left half of a 2x6 image is covered
    let verts = HostArray::from_rows(&[
        [0.0, 0.0, 1.0],
        [2.0, 0.0, 1.0],
        [2.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ]);
    let out = render_depth(
        &[verts, faces(), image_size(2.0, 6.0), camera()],
        1,
        &BindingConfig::default(),
    )
    .expect("valid request");

    assert_eq!((out.rows, out.cols), (2, 6));
    for col in 0..6 {
        for row in 0..2 {
            let expected = if col <= 2 { 1.0 } else { 0.0 };
            assert_eq!(out.get(row, col), expected, "row {} col {}", row, col);
        }
    }
}

#[test]
fn wrong_argument_counts_are_rejected() {
    let config = BindingConfig::default();

    let err = RenderRequest::from_host_arrays(&inputs()[..3], 1, &config).unwrap_err();
    assert_eq!(
        err,
        BindingError::InputCount {
            expected: 4,
            actual: 3
        }
    );
    assert_eq!(
        config.error_identifier(&err),
        "MATLAB:render_depth:InputSizeError"
    );

    let err = RenderRequest::from_host_arrays(&inputs(), 2, &config).unwrap_err();
    assert_eq!(err.mnemonic(), "OutputSizeError");
}

#[test]
fn wrong_shapes_are_rejected() {
    let config = BindingConfig::default();
    let cases: Vec<(usize, HostArray, &str)> = vec![
        (0, HostArray::from_rows(&[[0.0, 0.0]]), "vertices"),
        (0, HostArray::new(0, 3, vec![]), "vertices"),
        (1, HostArray::from_rows(&[[0.0, 1.0, 2.0, 3.0]]), "faces"),
        (1, HostArray::new(0, 3, vec![]), "faces"),
        (2, HostArray::from_rows(&[[4.0], [4.0]]), "image_size"),
        (3, HostArray::new(4, 4, vec![0.0; 16]), "camera"),
    ];

    for (slot, array, name) in cases {
        let mut args = inputs();
        args[slot] = array;
        match RenderRequest::from_host_arrays(&args, 1, &config) {
            Err(BindingError::InputShape { argument, .. }) => assert_eq!(argument, name),
            other => panic!("expected shape error for {}, got {:?}", name, other),
        }
    }
}

#[test]
fn out_of_range_face_index_is_rejected() {
    let mut args = inputs();
    args[1] = HostArray::from_rows(&[[0.0, 1.0, 4.0]]);
    let err = RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).unwrap_err();
    assert_eq!(err.mnemonic(), "AssertionError");
    assert!(err.to_string().contains("faces"));
}

#[test]
fn one_based_indices_are_accepted_when_configured() {
    let mut args = inputs();
    args[1] = HostArray::from_rows(&[[1.0, 2.0, 3.0], [1.0, 3.0, 4.0]]);
    let config = BindingConfig {
        index_base: IndexBase::One,
        ..BindingConfig::default()
    };
    let out = render_depth(&args, 1, &config).expect("one-based faces");
    assert!(out.data.iter().all(|&v| v == 0.5));

    // Same faces are out of range under zero-based indexing
    assert!(render_depth(&args, 1, &BindingConfig::default()).is_err());
}

#[test]
fn invalid_image_size_is_rejected() {
    for (h, w) in [(0.0, 4.0), (4.0, -1.0), (2.5, 4.0), (f64::NAN, 4.0)] {
        let mut args = inputs();
        args[2] = image_size(h, w);
        let err =
            RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).unwrap_err();
        assert_eq!(err.mnemonic(), "AssertionError", "size {}x{}", h, w);
    }
}

#[test]
fn non_finite_inputs_are_rejected() {
    let mut args = inputs();
    args[0].data[1] = f64::INFINITY;
    assert!(RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).is_err());

    let mut args = inputs();
    args[3].data[5] = f64::NAN;
    assert!(RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).is_err());
}

#[test]
fn mismatched_data_length_is_rejected() {
    let mut args = inputs();
    args[3] = HostArray::new(3, 4, vec![0.0; 11]);
    let err = RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).unwrap_err();
    assert_eq!(
        err,
        BindingError::DataLength {
            argument: "camera",
            expected: 12,
            actual: 11
        }
    );
}

#[test]
fn custom_component_and_function_name_in_identifier() {
    let config = BindingConfig {
        component: "DEPTH".to_string(),
        function_name: "render-depth.mex".to_string(),
        ..BindingConfig::default()
    };
    let err = RenderRequest::from_host_arrays(&[], 1, &config).unwrap_err();
    assert_eq!(config.error_identifier(&err), "DEPTH:render_depth:InputSizeError");
}

#[test]
fn request_exposes_validated_inputs() {
    let request =
        RenderRequest::from_host_arrays(&inputs(), 1, &BindingConfig::default()).expect("valid");
    assert_eq!(request.mesh.vertices.len(), 4);
    assert_eq!(request.mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    assert_eq!((request.height, request.width), (4, 4));
    assert_eq!(request.camera.project(request.mesh.vertices[2]).x, 3.0);
}

#[test]
fn oversized_image_is_rejected_before_allocation() {
    let mut args = inputs();
    args[2] = image_size(MAX_IMAGE_DIMENSION as f64, MAX_IMAGE_DIMENSION as f64);
    let err = RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).unwrap_err();
    assert_eq!(err.mnemonic(), "AssertionError");
    assert!(err.to_string().contains("image_size"));

    // Each dimension alone is fine as long as the total stays in budget
    let mut args = inputs();
    args[2] = image_size(1.0, MAX_IMAGE_DIMENSION as f64);
    assert!(RenderRequest::from_host_arrays(&args, 1, &BindingConfig::default()).is_ok());
}
