//! 扩展名 -> MIME 类型

/// 无法识别的扩展名默认按 WAV 处理
pub const DEFAULT_MIME_TYPE: &str = "audio/wav";

/// 根据扩展名返回 MIME 类型（忽略大小写，前导点可选）
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// 根据 MIME 类型返回保存文件时使用的扩展名
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/flac" => "flac",
        _ => "wav",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for(".wav"), "audio/wav");
        assert_eq!(mime_type_for(".mp3"), "audio/mpeg");
        assert_eq!(mime_type_for("m4a"), "audio/mp4");
        assert_eq!(mime_type_for(".FLAC"), "audio/flac");
    }

    #[test]
    fn test_unknown_extension_defaults_to_wav() {
        assert_eq!(mime_type_for(".ogg"), "audio/wav");
        assert_eq!(mime_type_for(""), "audio/wav");
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("audio/wav"), "wav");
        assert_eq!(extension_for("application/octet-stream"), "wav");
    }
}
