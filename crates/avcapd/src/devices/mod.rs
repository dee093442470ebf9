//! Concrete device backends implementing `avcap-core`'s traits. The pipeline
//! core never sees any of these types directly; it only sees
//! `Box<dyn VideoSource>` and friends.

#[cfg(target_os = "linux")]
pub mod alsa_capture;
#[cfg(target_os = "linux")]
pub mod encoder_openh264;
#[cfg(target_os = "linux")]
pub mod v4l2;
