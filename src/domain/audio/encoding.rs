//! 音频 <-> 文本编码
//!
//! 标准 base64（带填充），解码严格：非字母表字符或错误填充均拒绝

use base64::prelude::*;

use super::CodecError;

/// 编码原始字节
pub fn encode(raw: &[u8]) -> String {
    BASE64_STANDARD.encode(raw)
}

/// 解码文本为原始字节
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    BASE64_STANDARD
        .decode(text)
        .map_err(|e| CodecError::MalformedEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let samples: Vec<Vec<u8>> = vec![
            vec![],
            vec![0],
            vec![0xff, 0x00],
            b"RIFF\x24\x00\x00\x00WAVE".to_vec(),
            (0..=255u8).collect(),
        ];

        for raw in samples {
            assert_eq!(decode(&encode(&raw)).unwrap(), raw);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_alphabet() {
        let err = decode("abc$").unwrap_err();
        assert!(matches!(err, CodecError::MalformedEncoding(_)));
        assert!(decode("not base64!").is_err());
    }

    #[test]
    fn test_rejects_invalid_padding() {
        assert!(decode("QQ=").is_err());
        assert!(decode("QQ==QQ==").is_err());
    }
}
