use vizor_camera::{Camera, CameraError, StillCamera};
use vizor_image::{ChannelOrder, Frame};

struct CountingCamera {
    frame_count: usize,
}

impl Camera for CountingCamera {
    async fn recv(&mut self) -> Result<Frame, CameraError> {
        self.frame_count += 1;
        Ok(Frame::filled(2, 2, ChannelOrder::Bgr, [self.frame_count as u8, 0, 0]))
    }
}

async fn capture_frames(camera: &mut impl Camera, count: usize) -> Result<Vec<Frame>, CameraError> {
    let mut frames = Vec::new();
    for _ in 0..count {
        frames.push(camera.recv().await?);
    }
    Ok(frames)
}

#[tokio::test]
async fn test_camera_trait_mock_implementation() {
    let mut cam = CountingCamera { frame_count: 0 };
    let frames = capture_frames(&mut cam, 3).await.unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2].pixel(0, 0), [3, 0, 0]);
    assert_eq!(cam.frame_count, 3);
}

#[tokio::test]
async fn test_default_try_recv_waits_for_frame() {
    let mut cam = CountingCamera { frame_count: 0 };
    let frame = cam.try_recv().await.unwrap();
    assert!(frame.is_some());
    assert_eq!(cam.frame_count, 1);
}

#[tokio::test]
async fn test_still_camera_repeats_frame() {
    let frame = Frame::filled(640, 480, ChannelOrder::Rgb, [128, 128, 128]);
    let mut cam = StillCamera::new(frame.clone()).with_fps(1000);

    let frames = capture_frames(&mut cam, 2).await.unwrap();
    assert_eq!(frames[0], frame);
    assert_eq!(frames[1], frame);
    assert_eq!(cam.try_recv().await.unwrap(), Some(frame));
}

#[test]
fn test_still_camera_missing_file_is_device_error() {
    let result = StillCamera::from_file("/nonexistent/vizor/still.png");
    assert!(matches!(result, Err(CameraError::Device(_))));
}
