//! WAV 头探测
//!
//! 时长只是尽力而为的元数据：无法解析时返回 None，从不报错

use std::io::Cursor;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// WAV 容器信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub frames: u64,
    pub channels: u16,
}

impl WavInfo {
    /// 时长（秒）= 帧数 / 采样率
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// 解析 WAV 容器头
pub fn probe_wav(raw: &[u8]) -> Option<WavInfo> {
    let cursor = Cursor::new(raw.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, size = raw.len(), "Not a parseable WAV container");
            return None;
        }
    };

    let format = probed.format;
    let track = format.default_track()?;
    let params = &track.codec_params;

    let sample_rate = params.sample_rate.filter(|rate| *rate > 0)?;
    let frames = params.n_frames?;
    let channels = params.channels.map(|c| c.count() as u16).unwrap_or(0);

    Some(WavInfo {
        sample_rate,
        frames,
        channels,
    })
}

/// 计算 WAV 时长（秒）
pub fn probe_wav_duration(raw: &[u8]) -> Option<f64> {
    probe_wav(raw).map(|info| info.duration_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{synthesize_voice_wav, ToneSpec};

    #[test]
    fn test_probe_generated_wav() {
        let wav = synthesize_voice_wav(&ToneSpec {
            base_frequency: 300.0,
            sample_rate: 24000,
            duration_secs: 2.0,
        })
        .unwrap();

        let info = probe_wav(&wav).unwrap();
        assert_eq!(info.sample_rate, 24000);
        assert_eq!(info.frames, 48000);
        assert_eq!(info.channels, 1);

        let duration = probe_wav_duration(&wav).unwrap();
        assert!((duration - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_garbage_is_absent() {
        assert_eq!(probe_wav_duration(b""), None);
        assert_eq!(probe_wav_duration(b"definitely not audio"), None);
        assert_eq!(probe_wav_duration(b"RIFF\x04\x00\x00\x00WAVE"), None);
    }
}
