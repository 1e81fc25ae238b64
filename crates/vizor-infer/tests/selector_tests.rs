mod common;

use common::{MockBackend, ModelDir};
use std::sync::atomic::Ordering;
use vizor_image::{ChannelOrder, Frame, Interpolation};
use vizor_infer::{
    ClampPolicy, InferError, InputSpec, ModelCatalog, ModelSelector, ModelSpec, Normalization,
    OutputKind,
};

fn image_model(name: &str, size: usize) -> ModelSpec {
    ModelSpec {
        name: name.to_string(),
        path: None,
        input: InputSpec {
            channels: 3,
            height: size,
            width: size,
            channel_order: ChannelOrder::Rgb,
            interpolation: Interpolation::Linear,
            normalization: Normalization::none(),
        },
        output: OutputKind::Image {
            clamp: ClampPolicy::Saturate,
            denormalize: None,
        },
    }
}

fn class_model(name: &str, labels: &[&str]) -> ModelSpec {
    ModelSpec {
        name: name.to_string(),
        path: None,
        input: InputSpec {
            channels: 1,
            height: 8,
            width: 8,
            channel_order: ChannelOrder::Rgb,
            interpolation: Interpolation::Area,
            normalization: Normalization::none(),
        },
        output: OutputKind::Classes {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        },
    }
}

fn catalog(dir: &ModelDir) -> ModelCatalog {
    ModelCatalog::new(
        &dir.path,
        vec![
            ModelSpec::passthrough("camera"),
            image_model("big", 16),
            image_model("small", 4),
            class_model("emotion", &["neutral", "happiness", "surprise"]),
        ],
    )
    .unwrap()
}

#[test]
fn test_initial_passthrough_has_no_session() {
    let dir = ModelDir::new("passthrough");
    let selector = ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 0).unwrap();
    assert_eq!(selector.selected(), 0);
    assert!(selector.active().session().is_none());
    assert!(selector.active().input().is_empty());
}

#[test]
fn test_select_sizes_buffers_for_model() {
    let dir = ModelDir::new("sizes");
    dir.add("big", "identity")
        .add("small", "identity")
        .add("emotion", "scores:1,2,3");
    let mut selector =
        ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 1).unwrap();
    assert_eq!(selector.active().input().shape, vec![1, 3, 16, 16]);
    assert_eq!(selector.active().output().len(), 3 * 16 * 16);

    selector.select(2).unwrap();
    assert_eq!(selector.selected(), 2);
    assert_eq!(selector.active().input().shape, vec![1, 3, 4, 4]);
    assert_eq!(selector.active().output().shape, vec![1, 3, 4, 4]);

    selector.select_by_name("emotion").unwrap();
    assert_eq!(selector.active().input().shape, vec![1, 1, 8, 8]);
    assert_eq!(selector.active().output().shape, vec![1, 3]);
}

#[test]
fn test_loaded_session_reports_tensor_names() {
    let dir = ModelDir::new("names");
    dir.add("big", "identity");
    let selector = ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 1).unwrap();
    let session = selector.active().session().unwrap();
    assert_eq!(session.input_names(), ["input".to_string()]);
    assert_eq!(session.output_names(), ["output".to_string()]);
}

#[test]
fn test_switch_leaves_no_residual_data() {
    let dir = ModelDir::new("residual");
    dir.add("big", "identity").add("small", "identity");
    let mut selector =
        ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 1).unwrap();

    let frame = Frame::filled(32, 32, ChannelOrder::Rgb, [200, 200, 200]);
    selector.active_mut().infer(&frame).unwrap();
    assert!(selector.active().output().data.iter().all(|&v| v == 200.0));

    selector.select(2).unwrap();
    assert!(selector.active().input().data.iter().all(|&v| v == 0.0));
    assert!(selector.active().output().data.iter().all(|&v| v == 0.0));

    // back to the first model: fresh buffers, not the old ones
    selector.select(1).unwrap();
    assert!(selector.active().output().data.iter().all(|&v| v == 0.0));
}

#[test]
fn test_missing_model_file_is_not_found() {
    let dir = ModelDir::new("missing");
    let err = ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 1).unwrap_err();
    match err {
        InferError::ModelNotFound(path) => assert_eq!(path, dir.path.join("big.onnx")),
        other => panic!("expected ModelNotFound, got {:?}", other),
    }
}

#[test]
fn test_failed_select_keeps_previous_model() {
    let dir = ModelDir::new("keep");
    dir.add("big", "identity").add("small", "fail-load");
    let backend = MockBackend::default();
    let loads = backend.loads.clone();
    let mut selector = ModelSelector::new(catalog(&dir), Box::new(backend), 1).unwrap();

    let err = selector.select(2).unwrap_err();
    assert!(matches!(err, InferError::ModelLoad(_)));
    assert_eq!(selector.selected(), 1);
    assert_eq!(selector.active().spec().name, "big");
    assert_eq!(selector.active().input().shape, vec![1, 3, 16, 16]);

    // missing file behaves the same way
    assert!(matches!(
        selector.select(3),
        Err(InferError::ModelNotFound(_))
    ));
    assert_eq!(selector.selected(), 1);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_select_same_index_does_not_reload() {
    let dir = ModelDir::new("same");
    dir.add("big", "identity");
    let backend = MockBackend::default();
    let loads = backend.loads.clone();
    let mut selector = ModelSelector::new(catalog(&dir), Box::new(backend), 1).unwrap();
    selector.select(1).unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_select_unknown() {
    let dir = ModelDir::new("unknown");
    let mut selector =
        ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 0).unwrap();
    assert!(matches!(selector.select(42), Err(InferError::UnknownModel(_))));
    assert!(matches!(
        selector.select_by_name("udnie"),
        Err(InferError::UnknownModel(_))
    ));
    assert_eq!(selector.selected(), 0);
}

#[test]
fn test_select_next_and_previous_wrap() {
    let dir = ModelDir::new("wrap");
    dir.add("big", "identity")
        .add("small", "identity")
        .add("emotion", "scores:0,0,0");
    let mut selector =
        ModelSelector::new(catalog(&dir), Box::new(MockBackend::default()), 0).unwrap();
    selector.select_previous().unwrap();
    assert_eq!(selector.selected(), 3);
    selector.select_next().unwrap();
    assert_eq!(selector.selected(), 0);
    selector.select_next().unwrap();
    assert_eq!(selector.selected(), 1);
}

#[test]
fn test_passthrough_infer_is_noop() {
    let dir = ModelDir::new("noop");
    let backend = MockBackend::default();
    let runs = backend.runs.clone();
    let mut selector = ModelSelector::new(catalog(&dir), Box::new(backend), 0).unwrap();
    let frame = Frame::filled(8, 8, ChannelOrder::Rgb, [1, 2, 3]);
    selector.active_mut().infer(&frame).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}
