//! 推理请求与结果

use serde::{Serialize, Serializer};

use super::ParameterSet;
use crate::domain::voice::VoiceRecord;

/// 冒烟测试用的固定文本
pub const SMOKE_TEST_TEXT: &str = "Picture this: It's 3 AM, and I'm scrolling through TikTok when I stumble upon the most mind-blowing conspiracy theory I've ever heard. Apparently, dolphins are actually alien spies sent to monitor our beach activities. I know, I know, it sounds crazy, but hear me out. Think about it - dolphins are incredibly intelligent, they communicate in ways we don't fully understand, and they're always watching us from the water. Plus, have you ever seen a dolphin blink? Exactly. That's because they don't have eyelids like Earth creatures should.";

/// 推理请求
///
/// 只能通过 [`build_payload`] 构建；序列化为
/// `{ "input": { "text", "voice_file", "settings" } }`
#[derive(Clone, PartialEq)]
pub struct InferenceRequest {
    text: String,
    voice_sample: String,
    parameters: ParameterSet,
}

impl InferenceRequest {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// base64 编码的参考音频
    pub fn voice_sample(&self) -> &str {
        &self.voice_sample
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

impl std::fmt::Debug for InferenceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceRequest")
            .field("text_len", &self.text.len())
            .field("voice_sample_len", &self.voice_sample.len())
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
    input: WireInput<'a>,
}

#[derive(Serialize)]
struct WireInput<'a> {
    text: &'a str,
    voice_file: &'a str,
    settings: &'a ParameterSet,
}

impl Serialize for InferenceRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireEnvelope {
            input: WireInput {
                text: &self.text,
                voice_file: &self.voice_sample,
                settings: &self.parameters,
            },
        }
        .serialize(serializer)
    }
}

/// 构建推理请求
///
/// 纯函数：文本、参考音频与参数均原样复制，相同输入得到结构相同的请求
pub fn build_payload(text: &str, voice: &VoiceRecord, params: &ParameterSet) -> InferenceRequest {
    InferenceRequest {
        text: text.to_string(),
        voice_sample: voice.audio_data.clone(),
        parameters: *params,
    }
}

/// 推理结果
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    /// 解码后的音频
    pub audio: Vec<u8>,
    /// 服务返回的其余字段，原样透传
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{NewVoiceRecord, VoiceId};

    fn voice() -> VoiceRecord {
        let audio = b"RIFFdata";
        NewVoiceRecord::from_audio_bytes("male_voice", "Deep male voice", Some("wav"), audio, 24000)
            .into_record(VoiceId::new("1"), None)
    }

    #[test]
    fn test_build_copies_inputs_verbatim() {
        let voice = voice();
        let params = ParameterSet {
            exaggeration: 0.5,
            ..Default::default()
        };
        let text = "  Hello world. This is a short test.  ";

        let request = build_payload(text, &voice, &params);

        assert_eq!(request.text(), text);
        assert_eq!(request.voice_sample(), voice.audio_data);
        assert_eq!(request.parameters(), &params);
    }

    #[test]
    fn test_build_is_deterministic() {
        let voice = voice();
        let params = ParameterSet::default();

        let first = build_payload(SMOKE_TEST_TEXT, &voice, &params);
        let second = build_payload(SMOKE_TEST_TEXT, &voice, &params);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_wire_shape() {
        let voice = voice();
        let request = build_payload("hi", &voice, &ParameterSet::default());

        let value = serde_json::to_value(&request).unwrap();
        let input = &value["input"];
        assert_eq!(input["text"], "hi");
        assert_eq!(input["voice_file"], voice.audio_data.as_str());

        let settings = input["settings"].as_object().unwrap();
        assert_eq!(settings.len(), 6);
        assert_eq!(settings["exaggeration"], 0.7);
        assert_eq!(settings["cfg_weight"], 0.5);
        assert_eq!(settings["temperature"], 0.8);
        assert_eq!(settings["min_p"], 0.05);
        assert_eq!(settings["top_p"], 1.0);
        assert_eq!(settings["repetition_penalty"], 1.2);
    }
}
