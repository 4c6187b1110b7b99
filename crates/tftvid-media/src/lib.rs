//! The real playback pipeline: demux, decode/rescale, paced presentation,
//! and raw-terminal control, wired together by [`player::Player`].

pub mod codec_select;
pub mod controller;
pub mod decode;
pub mod demux;
pub mod helpers;
pub mod player;
pub mod presenter;

pub use player::Player;

/// `ffmpeg-the-third`'s packet type, re-exported so downstream crates
/// never need to depend on it directly just to name `PacketQueue`'s
/// element type.
pub type EncodedPacket = ffmpeg_the_third::Packet;

pub type PacketQueue = tftvid_core::Queue<EncodedPacket>;
pub type FrameQueue = tftvid_core::Queue<tftvid_core::DecodedFrame>;
