//! V4L2 MMAP capture, backed by the `v4l` crate.
//!
//! `v4l`'s [`Stream`] manages its own buffer pool: `next()` returns the
//! newest frame and transparently requeues the previous one, so unlike the
//! original driver-level interface there is no separate index to hand back.
//! `requeue` is therefore a documented no-op for this backend — the trait
//! still asks for it so backends that *do* need manual buffer lifetime
//! (anything working closer to raw `VIDIOC_DQBUF`/`VIDIOC_QBUF`) have
//! somewhere to put it.

use anyhow::{Context, Result};
use avcap_core::error::CaptureError;
use avcap_core::traits::{DequeueOutcome, VideoSource};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

pub struct V4l2Source {
    stream: Stream<'static>,
    // Keeps the underlying `Device` alive for the stream's lifetime.
    _device: Box<Device>,
}

impl V4l2Source {
    pub fn open(path: &str, width: u32, height: u32) -> Result<Self> {
        let mut device = Box::new(Device::with_path(path).with_context(|| format!("open {path}"))?);

        let mut format = Capture::format(&device).context("query current format")?;
        format.width = width;
        format.height = height;
        format.fourcc = FourCC::new(b"NV12");
        Capture::set_format(&device, &format).context("set NV12 capture format")?;

        // SAFETY-equivalent note: the stream borrows `device` for as long as
        // it is alive; we keep `device` boxed alongside it for the lifetime
        // of this struct so the reference stays valid.
        let device_ref: &'static mut Device = unsafe { &mut *(device.as_mut() as *mut Device) };
        let stream = Stream::with_buffers(device_ref, Type::VideoCapture, 4).context("allocate mmap buffers")?;

        Ok(Self { stream, _device: device })
    }
}

impl VideoSource for V4l2Source {
    fn dequeue(&mut self) -> Result<DequeueOutcome, CaptureError> {
        let (data, meta) = self.stream.next().map_err(|e| CaptureError::Io(e.to_string()))?;
        Ok(DequeueOutcome::Frame { index: 0, sequence: meta.sequence, bytes: data.to_vec() })
    }

    fn requeue(&mut self, _index: usize) -> Result<(), CaptureError> {
        Ok(())
    }
}
