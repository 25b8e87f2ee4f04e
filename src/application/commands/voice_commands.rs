//! Voice Commands - 音色同步与导出

use std::path::{Path, PathBuf};

use crate::domain::audio::TestVoice;
use crate::domain::voice::{VoiceName, VoiceRecord};

/// 待同步的本地音色文件
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVoiceFile {
    pub path: PathBuf,
    pub name: VoiceName,
    pub description: String,
}

impl LocalVoiceFile {
    pub fn new(path: impl Into<PathBuf>, name: VoiceName, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name,
            description: description.into(),
        }
    }

    /// 以文件名（不含扩展名）作为音色名称
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, &'static str> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or("file name is not valid UTF-8")?;
        let name = VoiceName::new(stem)?;
        Ok(Self {
            path: path.to_path_buf(),
            name,
            description: format!("Voice file from {}", path.display()),
        })
    }

    /// 预置测试音色对应的本地文件
    pub fn from_test_voice(
        path: impl AsRef<Path>,
        voice: &TestVoice,
    ) -> Result<Self, &'static str> {
        Ok(Self::new(
            path.as_ref(),
            VoiceName::new(voice.name)?,
            voice.catalog_description(),
        ))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 文件扩展名
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }
}

/// 同步本地音色到目录命令
#[derive(Debug, Clone, Default)]
pub struct SyncVoices {
    pub files: Vec<LocalVoiceFile>,
    /// 无法作为候选的文件，直接计入失败
    pub rejected: Vec<SyncFailure>,
}

impl SyncVoices {
    pub fn new(files: Vec<LocalVoiceFile>) -> Self {
        Self {
            files,
            rejected: Vec::new(),
        }
    }

    /// 由文件路径组装命令，`description` 覆盖默认描述
    ///
    /// 文件名不能作为音色名称时记为失败，其余文件照常同步
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], description: Option<&str>) -> Self {
        let mut command = Self::default();
        for path in paths {
            let path = path.as_ref();
            match LocalVoiceFile::from_path(path) {
                Ok(file) => command.files.push(match description {
                    Some(description) => file.with_description(description),
                    None => file,
                }),
                Err(e) => command.rejected.push(SyncFailure {
                    name: path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path: path.to_path_buf(),
                    error: format!("invalid voice name: {}", e),
                }),
            }
        }
        command
    }
}

/// 单个文件的同步失败
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: String,
}

/// 同步结果（uploaded / skipped 保持输入顺序）
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub uploaded: Vec<VoiceRecord>,
    pub skipped: Vec<String>,
    pub failed: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 按名称或 id 查找音色的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceLookup {
    /// 先按名称，再按 id
    #[default]
    Auto,
    ById,
    ByName,
}

/// 导出单个音色命令
#[derive(Debug, Clone)]
pub struct ExportVoice {
    pub identifier: String,
    pub lookup: VoiceLookup,
    /// 同时写出解码后的音频
    pub decode: bool,
}

/// 导出单个音色响应
#[derive(Debug, Clone)]
pub struct ExportVoiceResponse {
    pub voice: VoiceRecord,
    pub encoded_path: PathBuf,
    pub audio_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_from_path() {
        let file = LocalVoiceFile::from_path("../voices/man1.mp3").unwrap();
        assert_eq!(file.name.as_str(), "man1");
        assert_eq!(file.description, "Voice file from ../voices/man1.mp3");
        assert_eq!(file.extension(), Some("mp3"));
    }

    #[test]
    fn test_local_file_without_stem() {
        assert!(LocalVoiceFile::from_path("/").is_err());
    }

    #[test]
    fn test_from_paths_rejects_invalid_names() {
        let long = format!("/voices/{}.wav", "x".repeat(101));
        let command = SyncVoices::from_paths(
            &["/voices/male_voice.wav", long.as_str(), "/voices/   .wav", "/voices/b.mp3"],
            Some("Narrator"),
        );

        let names: Vec<_> = command.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["male_voice", "b"]);
        assert!(command.files.iter().all(|f| f.description == "Narrator"));

        assert_eq!(command.rejected.len(), 2);
        assert_eq!(command.rejected[0].path, PathBuf::from(&long));
        assert!(command.rejected[0].error.starts_with("invalid voice name"));
        assert_eq!(command.rejected[1].name, "   ");
    }

    #[test]
    fn test_local_file_from_test_voice() {
        let voice = &crate::domain::audio::TEST_VOICES[1];
        let file = LocalVoiceFile::from_test_voice("female_voice.wav", voice).unwrap();
        assert_eq!(file.name.as_str(), "female_voice");
        assert_eq!(file.description, "High female voice for testing ChatterboxTTS");
    }
}
