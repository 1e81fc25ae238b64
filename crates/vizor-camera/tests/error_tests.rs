use std::io;
use vizor_camera::CameraError;
use vizor_image::ImageError;

#[test]
fn test_from_io_error() {
    let cam_err: CameraError = io::Error::new(io::ErrorKind::NotFound, "device not found").into();
    match cam_err {
        CameraError::Device(msg) => assert!(msg.contains("device not found")),
        other => panic!("Expected CameraError::Device, got {:?}", other),
    }
}

#[test]
fn test_from_image_error() {
    let cam_err: CameraError = ImageError::Decode("invalid JPEG".to_string()).into();
    assert!(matches!(cam_err, CameraError::Decode(_)));
    assert!(cam_err.to_string().contains("invalid JPEG"));
}

#[test]
fn test_error_display() {
    assert!(CameraError::Device("V4L2 error".to_string()).to_string().contains("V4L2 error"));
    assert!(CameraError::Stream("short buffer".to_string()).to_string().starts_with("stream error"));
    assert!(CameraError::Channel("closed".to_string()).to_string().contains("closed"));
    assert_eq!(CameraError::Config("bad size".to_string()).to_string(), "config error: bad size");
}
