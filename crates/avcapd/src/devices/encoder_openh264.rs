//! Software H.264 encoder backed by Cisco's OpenH264, substituting for the
//! Rockchip MPP hardware encoder the daemon was originally written against.
//! MPP has no crates.io presence and is tied to specific SoCs; OpenH264 is a
//! real, widely used encoder with a stable Rust binding and is the closest
//! available analog behind the same `VideoEncoder` trait boundary — the
//! pipeline core never notices the difference.

use anyhow::{Context, Result};
use avcap_core::error::EncodeError;
use avcap_core::model::VideoFrame;
use avcap_core::traits::{EncodedOutput, VideoEncoder};
use openh264::encoder::{Encoder, EncoderConfig};
use openh264::formats::YUVBuffer;
use openh264::OpenH264API;

pub struct OpenH264Encoder {
    encoder: Encoder,
    width: u32,
    height: u32,
}

impl OpenH264Encoder {
    pub fn new(width: u32, height: u32, fps: u32, bitrate_bps: u32) -> Result<Self> {
        let config = EncoderConfig::new()
            .max_frame_rate(fps as f32)
            .bitrate(openh264::encoder::Bitrate::from_bps(bitrate_bps));
        let encoder = Encoder::with_api_config(OpenH264API::from_source(), config).context("init openh264 encoder")?;
        Ok(Self { encoder, width, height })
    }
}

impl VideoEncoder for OpenH264Encoder {
    fn encode(&mut self, frame: &VideoFrame) -> Result<Option<EncodedOutput>, EncodeError> {
        let yuv = nv12_to_yuv_buffer(&frame.bytes, self.width as usize, self.height as usize, frame.stride as usize);

        let bitstream = self
            .encoder
            .encode(&yuv)
            .map_err(|e| EncodeError::Encode(e.to_string()))?;

        let bytes = bitstream.to_vec();
        if bytes.is_empty() {
            return Ok(None);
        }

        let is_keyframe = matches!(bitstream.frame_type(), openh264::encoder::FrameType::IDR);
        Ok(Some(EncodedOutput { bytes, is_keyframe }))
    }
}

/// Deinterleaves an NV12 buffer (Y plane, then interleaved UV) into the
/// planar I420 layout OpenH264 expects.
fn nv12_to_yuv_buffer(nv12: &[u8], width: usize, height: usize, stride: usize) -> YUVBuffer {
    let mut yuv = YUVBuffer::with_dimension(width, height);

    let y_plane_len = stride * height;
    let (y_src, uv_src) = nv12.split_at(y_plane_len.min(nv12.len()));

    let y_dst = yuv.y_mut();
    for row in 0..height {
        let src_start = row * stride;
        let dst_start = row * width;
        if src_start + width <= y_src.len() && dst_start + width <= y_dst.len() {
            y_dst[dst_start..dst_start + width].copy_from_slice(&y_src[src_start..src_start + width]);
        }
    }

    let chroma_width = width / 2;
    let chroma_height = height / 2;
    let u_dst = yuv.u_mut();
    let v_dst = yuv.v_mut();
    for row in 0..chroma_height {
        for col in 0..chroma_width {
            let uv_index = row * stride + col * 2;
            if uv_index + 1 < uv_src.len() {
                let dst_index = row * chroma_width + col;
                if dst_index < u_dst.len() {
                    u_dst[dst_index] = uv_src[uv_index];
                }
                if dst_index < v_dst.len() {
                    v_dst[dst_index] = uv_src[uv_index + 1];
                }
            }
        }
    }

    yuv
}
