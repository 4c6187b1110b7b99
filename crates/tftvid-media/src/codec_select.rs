// crates/tftvid-media/src/codec_select.rs
//
// Hardware-then-software decoder selection, ported from
// VideoPlayer::load's try_open/fallback sequence. Each attempt re-derives
// its own owned `Parameters` from the stream (rather than sharing/cloning
// one) the same way velocut-media's decode.rs/probe.rs open a second
// Input context to sidestep a borrow conflict — simplest fix for the
// same shape of ownership problem.

use ffmpeg_the_third as ffmpeg;
use ffmpeg::codec::Id;
use ffmpeg::format::context::Input;

/// Name of the hardware-accelerated V4L2 M2M decoder to try first for a
/// given codec, if one exists. Only H.264 and HEVC have a V4L2 M2M path
/// on the boards this pipeline targets.
fn hardware_decoder_name(id: Id) -> Option<&'static str> {
    match id {
        Id::H264 => Some("h264_v4l2m2m"),
        Id::HEVC => Some("hevc_v4l2m2m"),
        _ => None,
    }
}

/// Opens a decoder for the video stream at `video_stream_index`, trying
/// the hardware decoder first (if one exists for this codec) and falling
/// back to the software decoder registered for the codec id. Logs which
/// path was taken, matching the original's `[Codec] Using {hardware,
/// software} decoder: <name>` banner.
pub fn open_video_decoder(
    ictx: &Input,
    video_stream_index: usize,
) -> anyhow::Result<ffmpeg::decoder::video::Video> {
    let stream = ictx
        .stream(video_stream_index)
        .ok_or_else(|| anyhow::anyhow!("video stream index out of range"))?;
    let codec_id = stream.parameters().id();

    if let Some(name) = hardware_decoder_name(codec_id) {
        if let Some(hw_codec) = ffmpeg::decoder::find_by_name(name) {
            let params = ictx.stream(video_stream_index).unwrap().parameters();
            if let Ok(ctx) = ffmpeg::codec::context::Context::from_parameters(params) {
                if let Ok(decoder) = ctx.decoder().open_as(hw_codec).and_then(|o| o.video()) {
                    log::info!("[Codec] Using hardware decoder: {name}");
                    return Ok(decoder);
                }
            }
        }
    }

    let params = ictx.stream(video_stream_index).unwrap().parameters();
    let ctx = ffmpeg::codec::context::Context::from_parameters(params)?;
    let decoder = ctx.decoder().video()?;
    log::info!("[Codec] Using software decoder: {}", codec_id.name());
    Ok(decoder)
}
