//! Voxsync - 参考音色目录同步与 TTS 推理命令行
//!
//! 子命令对应应用层的命令与查询处理器:
//! - sync / list / get: 音色目录
//! - export / payload: 本地产物
//! - speak: 提交推理并保存输出音频
//! - generate-test-voices: 生成测试用参考音色

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use voxsync::application::{
    ArtifactStorePort, BuildPayload, BuildPayloadHandler, CatalogPort, ExportAllPayloads,
    ExportAllPayloadsHandler, ExportCatalogHandler, ExportVoice, ExportVoiceHandler,
    GenerateSpeech, GenerateSpeechHandler, InferenceEnginePort, ListVoices, ListVoicesHandler,
    LocalVoiceFile, SyncOptions, SyncVoices, SyncVoicesHandler, VoiceLookup,
};
use voxsync::config::{load_config_from_path, print_config, AppConfig};
use voxsync::domain::audio::{synthesize_voice_wav, TEST_VOICES};
use voxsync::domain::inference::{ParameterSet, SMOKE_TEST_TEXT};
use voxsync::infrastructure::adapters::{
    FakeInferenceClient, FileArtifactStore, HttpInferenceClient, HttpInferenceClientConfig,
    RestCatalogClient, RestCatalogClientConfig,
};

/// 同步时收集的音频扩展名
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "flac"];

/// 载荷默认文本
const DEFAULT_PAYLOAD_TEXT: &str = "Hello world. This is a short test.";

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "voxsync")]
#[command(
    about = "Sync reference voices to a remote catalog and drive TTS inference",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to voxsync.toml / voxsync.local.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Upload local voice files whose names are not yet in the catalog.
    Sync {
        /// Voice files to upload; the file stem becomes the voice name.
        files: Vec<PathBuf>,
        /// Also upload every audio file in this directory.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Description stored with every uploaded voice.
        #[arg(long)]
        description: Option<String>,
    },
    /// List catalog voices.
    List,
    /// Fetch one voice and save its encoded audio.
    Get {
        /// Voice name or id.
        identifier: String,
        /// How to interpret the identifier.
        #[arg(long, value_enum, default_value_t = LookupArg::Auto)]
        by: LookupArg,
        /// Also write the decoded audio file.
        #[arg(long)]
        decode: bool,
    },
    /// Export catalog data to local files.
    Export {
        /// Export subcommand to execute.
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Write the inference payload for one voice without sending it.
    Payload {
        /// Voice name or id.
        identifier: String,
        /// How to interpret the identifier.
        #[arg(long, value_enum, default_value_t = LookupArg::Auto)]
        by: LookupArg,
        /// Text to synthesize.
        #[arg(long, default_value = DEFAULT_PAYLOAD_TEXT)]
        text: String,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Synthesize speech with a catalog voice and save the output audio.
    Speak {
        /// Voice name or id.
        identifier: String,
        /// How to interpret the identifier.
        #[arg(long, value_enum, default_value_t = LookupArg::Auto)]
        by: LookupArg,
        /// Text to synthesize.
        #[arg(long)]
        text: String,
        #[command(flatten)]
        params: ParamArgs,
        /// Override the configured inference timeout.
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Also write the payload file.
        #[arg(long)]
        save_payload: bool,
    },
    /// Write the canned test voices as WAV files.
    GenerateTestVoices {
        /// Target directory.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Export subcommands.
#[derive(Subcommand)]
enum ExportCommands {
    /// Write voices_info.json and voice_ids.txt.
    Catalog,
    /// Write one payload file per catalog voice with default parameters.
    Payloads {
        /// Text to synthesize.
        #[arg(long, default_value = SMOKE_TEST_TEXT)]
        text: String,
    },
}

/// Identifier interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum LookupArg {
    /// Try the name first, then the id.
    Auto,
    /// Store-assigned id.
    Id,
    /// Unique voice name.
    Name,
}

impl From<LookupArg> for VoiceLookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Auto => VoiceLookup::Auto,
            LookupArg::Id => VoiceLookup::ById,
            LookupArg::Name => VoiceLookup::ByName,
        }
    }
}

/// Inference parameter overrides.
#[derive(Args, Debug, Clone, Default)]
struct ParamArgs {
    /// Emotion exaggeration in [0, 1].
    #[arg(long)]
    exaggeration: Option<f64>,
    /// Classifier-free guidance weight in [0, 1].
    #[arg(long)]
    cfg_weight: Option<f64>,
    /// Sampling temperature in [0, 1].
    #[arg(long)]
    temperature: Option<f64>,
    /// Min-p sampling threshold in [0, 1].
    #[arg(long)]
    min_p: Option<f64>,
    /// Nucleus sampling threshold in [0, 1].
    #[arg(long)]
    top_p: Option<f64>,
    /// Repetition penalty (>= 1).
    #[arg(long)]
    repetition_penalty: Option<f64>,
}

impl ParamArgs {
    fn into_parameters(self) -> ParameterSet {
        let defaults = ParameterSet::default();
        ParameterSet {
            exaggeration: self.exaggeration.unwrap_or(defaults.exaggeration),
            cfg_weight: self.cfg_weight.unwrap_or(defaults.cfg_weight),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            min_p: self.min_p.unwrap_or(defaults.min_p),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            repetition_penalty: self.repetition_penalty.unwrap_or(defaults.repetition_penalty),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 日志写 stderr，stdout 只留给命令输出
    let log_filter = format!("warn,voxsync={}", config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    print_config(&config);

    match cli.command {
        Commands::Sync {
            files,
            dir,
            description,
        } => run_sync(&config, files, dir, description).await,
        Commands::List => run_list(&config).await,
        Commands::Get {
            identifier,
            by,
            decode,
        } => run_get(&config, identifier, by, decode).await,
        Commands::Export { command } => run_export(&config, command).await,
        Commands::Payload {
            identifier,
            by,
            text,
            params,
        } => run_payload(&config, identifier, by, text, params).await,
        Commands::Speak {
            identifier,
            by,
            text,
            params,
            timeout_secs,
            save_payload,
        } => {
            let timeout = timeout_secs.map(Duration::from_secs);
            run_speak(&config, identifier, by, text, params, timeout, save_payload).await
        }
        Commands::GenerateTestVoices { dir } => generate_test_voices(&dir).await,
    }
}

fn build_catalog(config: &AppConfig) -> Result<Arc<dyn CatalogPort>> {
    let catalog_config = RestCatalogClientConfig {
        base_url: config.catalog.base_url.clone(),
        api_key: config.catalog.api_key.clone(),
        table: config.catalog.table.clone(),
        timeout_secs: config.catalog.timeout_secs,
    };
    Ok(Arc::new(RestCatalogClient::new(catalog_config)?))
}

fn build_engine(config: &AppConfig) -> Result<Arc<dyn InferenceEnginePort>> {
    let timeout = Duration::from_secs(config.inference.timeout_secs);
    if config.inference.fake {
        return Ok(Arc::new(
            FakeInferenceClient::new(Duration::from_millis(200)).with_default_timeout(timeout),
        ));
    }

    let engine_config = HttpInferenceClientConfig {
        endpoint_url: config.inference.endpoint_url.clone(),
        api_key: config.inference.api_key.clone(),
        timeout_secs: config.inference.timeout_secs,
    };
    Ok(Arc::new(HttpInferenceClient::new(engine_config)?))
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn ArtifactStorePort>> {
    Ok(Arc::new(
        FileArtifactStore::new(&config.storage.output_dir).await?,
    ))
}

/// 收集目录下的音频文件（按文件名排序）
async fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_audio = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_audio && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// 当前目录下已生成的测试音色（generate-test-voices 的输出）
fn canned_test_voices() -> Result<SyncVoices> {
    let mut files = Vec::new();
    for voice in TEST_VOICES {
        let path = PathBuf::from(format!("{}.wav", voice.name));
        if path.is_file() {
            let file = LocalVoiceFile::from_test_voice(&path, voice)
                .map_err(|e| anyhow::anyhow!("Invalid test voice {}: {}", voice.name, e))?;
            files.push(file);
        }
    }
    Ok(SyncVoices::new(files))
}

async fn run_sync(
    config: &AppConfig,
    mut files: Vec<PathBuf>,
    dir: Option<PathBuf>,
    description: Option<String>,
) -> Result<()> {
    if let Some(dir) = dir {
        files.extend(collect_audio_files(&dir).await?);
    }

    let mut command = if files.is_empty() {
        canned_test_voices()?
    } else {
        SyncVoices::from_paths(&files, None)
    };

    if command.files.is_empty() && command.rejected.is_empty() {
        bail!("No voice files to sync; pass files, --dir, or run generate-test-voices first");
    }

    if let Some(description) = &description {
        for file in command.files.iter_mut() {
            file.description = description.clone();
        }
    }

    let handler = SyncVoicesHandler::with_options(
        build_catalog(config)?,
        SyncOptions {
            max_concurrent: config.sync.max_concurrent,
            default_sample_rate: config.sync.default_sample_rate,
        },
    );
    let report = handler.handle(command).await?;

    for voice in &report.uploaded {
        println!("uploaded  {} (id {}, {} bytes)", voice.name, voice.id, voice.file_size);
    }
    for name in &report.skipped {
        println!("skipped   {} (already exists)", name);
    }
    for failure in &report.failed {
        println!("failed    {} ({}): {}", failure.name, failure.path.display(), failure.error);
    }
    println!(
        "{} uploaded, {} skipped, {} failed",
        report.uploaded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if !report.is_complete() {
        bail!("{} voice file(s) failed to sync", report.failed.len());
    }
    Ok(())
}

async fn run_list(config: &AppConfig) -> Result<()> {
    let voices = ListVoicesHandler::new(build_catalog(config)?)
        .handle(ListVoices::default())
        .await?;

    if voices.is_empty() {
        println!("No voices in catalog");
        return Ok(());
    }

    for voice in &voices {
        let id = voice.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        let duration = voice
            .duration
            .map(|d| format!("{:.2}s", d))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<24} {:>10} bytes  {:>8}  {}  {}",
            id,
            voice.name.as_deref().unwrap_or_default(),
            voice.file_size.unwrap_or_default(),
            duration,
            voice.created_at.as_deref().unwrap_or("-"),
            voice.description.as_deref().unwrap_or_default(),
        );
    }
    println!("{} voice(s)", voices.len());
    Ok(())
}

async fn run_get(
    config: &AppConfig,
    identifier: String,
    by: LookupArg,
    decode: bool,
) -> Result<()> {
    let handler = ExportVoiceHandler::new(build_catalog(config)?, build_store(config).await?);
    let response = handler
        .handle(ExportVoice {
            identifier,
            lookup: by.into(),
            decode,
        })
        .await?;

    let voice = &response.voice;
    println!("name:        {}", voice.name);
    println!("id:          {}", voice.id);
    println!("description: {}", voice.description);
    println!("type:        {}", voice.mime_type);
    println!("size:        {} bytes", voice.file_size);
    println!("sample rate: {}", voice.sample_rate);
    println!("encoded:     {}", response.encoded_path.display());
    if let Some(path) = &response.audio_path {
        println!("audio:       {}", path.display());
    }
    Ok(())
}

async fn run_export(config: &AppConfig, command: ExportCommands) -> Result<()> {
    let catalog = build_catalog(config)?;
    let store = build_store(config).await?;

    match command {
        ExportCommands::Catalog => {
            let export = ExportCatalogHandler::new(catalog, store).handle().await?;
            println!("{} voice(s) exported", export.voice_count);
            println!("info: {}", export.info_path.display());
            println!("ids:  {}", export.ids_path.display());
            Ok(())
        }
        ExportCommands::Payloads { text } => {
            let response = ExportAllPayloadsHandler::new(catalog, store)
                .handle(ExportAllPayloads { text })
                .await?;
            for path in &response.written {
                println!("written  {}", path.display());
            }
            for (voice, error) in &response.failed {
                println!("failed   {}: {}", voice, error);
            }
            if !response.failed.is_empty() {
                bail!("{} payload(s) could not be written", response.failed.len());
            }
            Ok(())
        }
    }
}

async fn run_payload(
    config: &AppConfig,
    identifier: String,
    by: LookupArg,
    text: String,
    params: ParamArgs,
) -> Result<()> {
    let handler = BuildPayloadHandler::new(build_catalog(config)?, build_store(config).await?);
    let response = handler
        .handle(BuildPayload {
            identifier,
            lookup: by.into(),
            text,
            parameters: params.into_parameters(),
        })
        .await?;

    println!("{}: {}", response.voice_name, response.payload_path.display());
    Ok(())
}

async fn run_speak(
    config: &AppConfig,
    identifier: String,
    by: LookupArg,
    text: String,
    params: ParamArgs,
    timeout: Option<Duration>,
    save_payload: bool,
) -> Result<()> {
    let handler = GenerateSpeechHandler::new(
        build_catalog(config)?,
        build_engine(config)?,
        build_store(config).await?,
    );
    let response = handler
        .handle(GenerateSpeech {
            identifier,
            lookup: by.into(),
            text,
            parameters: params.into_parameters(),
            timeout,
            save_payload,
        })
        .await?;

    println!("voice:   {}", response.voice_name);
    println!("output:  {} ({} bytes)", response.output_path.display(), response.audio_size);
    println!("elapsed: {:.2}s", response.elapsed.as_secs_f64());
    if let Some(path) = &response.payload_path {
        println!("payload: {}", path.display());
    }
    if let Some(status) = response.metadata.get("status") {
        println!("status:  {}", status);
    }
    Ok(())
}

async fn generate_test_voices(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for voice in TEST_VOICES {
        let path = dir.join(format!("{}.wav", voice.name));
        if path.exists() {
            println!("exists   {}", path.display());
            continue;
        }

        let wav = synthesize_voice_wav(&voice.tone())?;
        tokio::fs::write(&path, &wav)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(name = voice.name, size = wav.len(), "Test voice generated");
        println!("created  {} ({})", path.display(), voice.description);
    }
    Ok(())
}
