//! 测试音色合成
//!
//! 基频 + 3 个谐波，5Hz 调频，指数衰减包络，归一化到 80% 满幅的 16-bit 单声道 WAV

use std::f64::consts::PI;
use std::io::Cursor;

use super::CodecError;

/// 合成参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub base_frequency: f64,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

/// 预置测试音色
#[derive(Debug, Clone, Copy)]
pub struct TestVoice {
    pub name: &'static str,
    pub base_frequency: f64,
    pub description: &'static str,
}

pub const TEST_VOICES: &[TestVoice] = &[
    TestVoice {
        name: "male_voice",
        base_frequency: 150.0,
        description: "Deep male voice",
    },
    TestVoice {
        name: "female_voice",
        base_frequency: 300.0,
        description: "High female voice",
    },
];

impl TestVoice {
    /// 上传到目录时使用的描述
    pub fn catalog_description(&self) -> String {
        format!("{} for testing ChatterboxTTS", self.description)
    }

    pub fn tone(&self) -> ToneSpec {
        ToneSpec {
            base_frequency: self.base_frequency,
            sample_rate: 24000,
            duration_secs: 2.0,
        }
    }
}

/// 合成类语音的测试 WAV，返回完整文件字节
pub fn synthesize_voice_wav(spec: &ToneSpec) -> Result<Vec<u8>, CodecError> {
    let sample_rate = spec.sample_rate as f64;
    let frame_count = (sample_rate * spec.duration_secs) as usize;

    let mut samples: Vec<f64> = (0..frame_count)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let modulation = (2.0 * PI * 5.0 * t).sin() * 0.1;
            let voiced: f64 = (1..=4)
                .map(|harmonic| {
                    let harmonic = harmonic as f64;
                    let freq = spec.base_frequency * harmonic * (1.0 + modulation);
                    (2.0 * PI * freq * t).sin() / harmonic
                })
                .sum();
            voiced * (-t * 0.3).exp()
        })
        .collect();

    let peak = samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        for s in samples.iter_mut() {
            *s /= peak;
        }
    }

    let wav_spec = hound::WavSpec {
        channels: 1,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec)
            .map_err(|e| CodecError::WavWrite(e.to_string()))?;
        for s in samples {
            writer
                .write_sample((s * 32767.0 * 0.8) as i16)
                .map_err(|e| CodecError::WavWrite(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| CodecError::WavWrite(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_wav_is_readable() {
        let wav = synthesize_voice_wav(&TEST_VOICES[0].tone()).unwrap();

        let reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), 48000);

        let peak = reader
            .into_samples::<i16>()
            .map(|s| s.unwrap().unsigned_abs())
            .max()
            .unwrap();
        // 80% 满幅
        assert!(peak <= 26214);
        assert!(peak > 26000);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let spec = TEST_VOICES[1].tone();
        assert_eq!(
            synthesize_voice_wav(&spec).unwrap(),
            synthesize_voice_wav(&spec).unwrap()
        );
    }
}
