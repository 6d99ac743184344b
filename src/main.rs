mod session;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hark_core::{AppConfig, TriggerMode};
use hark_trigger::TriggerSource;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hark", about = "Voice-driven command assistant")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trigger mode (overrides the config)
    #[arg(long, value_enum)]
    mode: Option<CliMode>,

    /// Seconds of audio recorded after each trigger
    #[arg(long)]
    capture_seconds: Option<f32>,

    /// Preferred capture sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Built-in wake keyword label
    #[arg(long)]
    keyword: Option<String>,

    /// Path to a custom wake keyword model
    #[arg(long)]
    keyword_path: Option<PathBuf>,

    /// Speech-to-text engine name
    #[arg(long)]
    stt_engine: Option<String>,

    /// Path to the speech-to-text model file
    #[arg(long)]
    model_path: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    Wake,
    Manual,
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(mode) = cli.mode {
        config.trigger.mode = match mode {
            CliMode::Wake => TriggerMode::Wake,
            CliMode::Manual => TriggerMode::Manual,
        };
    }
    if let Some(seconds) = cli.capture_seconds {
        config.audio.capture_seconds = seconds;
    }
    if let Some(rate) = cli.sample_rate {
        config.audio.preferred_sample_rate = Some(rate);
    }
    if let Some(ref keyword) = cli.keyword {
        config.wake.keyword = keyword.clone();
    }
    if let Some(ref path) = cli.keyword_path {
        config.wake.keyword_path = Some(path.to_string_lossy().to_string());
    }
    if let Some(ref engine) = cli.stt_engine {
        config.stt.engine = engine.clone();
    }
    if let Some(ref path) = cli.model_path {
        config.stt.model_path = Some(path.to_string_lossy().to_string());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let env_filter =
        EnvFilter::try_new(&config.general.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("hark starting");

    config.validate().context("startup validation failed")?;

    // Stop flag: written once by the interrupt handler, read at every
    // checkpoint in the pipeline
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::Relaxed);
        })
        .context("failed to install interrupt handler")?;
    }

    // Speech output
    let speech_engine = hark_speech::create_speech_engine(&config.speech.engine)
        .with_context(|| format!("unknown speech engine '{}'", config.speech.engine))?;
    let speaker = hark_speech::Speaker::new(&config.general.prompt_name, speech_engine);

    // Speech-to-text
    let stt_registry = hark_speech::SttRegistry::new();
    let mut stt_engine = stt_registry
        .create(&config.stt.engine)
        .with_context(|| format!("unknown STT engine '{}'", config.stt.engine))?;
    let stt_value =
        toml::Value::try_from(&config.stt).context("failed to serialize stt config")?;
    stt_engine
        .initialize(stt_value)
        .context("failed to initialize STT engine")?;
    let transcriber = hark_speech::Transcriber::new(stt_engine);
    tracing::info!(engine = transcriber.engine_name(), "STT engine active");

    // Command routing and execution
    let os = hark_command::OsFamily::detect();
    let mut allowlist = hark_command::Allowlist::with_defaults(os);
    allowlist.extend_from_config(&config.apps);
    let app_keys: Vec<String> = allowlist.keys().iter().map(|k| k.to_string()).collect();
    let router = hark_command::CommandRouter::new(&app_keys);
    let executor = hark_command::ActionExecutor::new(
        allowlist,
        Box::new(hark_command::SystemLauncher::new(os)),
        PathBuf::from(&config.notes.file),
    );

    // Trigger source
    let (trigger, ready_line): (Box<dyn TriggerSource>, String) = match config.trigger.mode {
        TriggerMode::Manual => {
            let trigger = hark_trigger::ManualTrigger::from_stdin(Arc::clone(&stop));
            let ready = format!(
                "{} is ready. Press Enter to speak.",
                config.general.assistant_name
            );
            (Box::new(trigger), ready)
        }
        TriggerMode::Wake => {
            let registry = hark_trigger::WakeEngineRegistry::new();
            let mut engine = registry
                .create(&config.wake.engine)
                .with_context(|| format!("unknown wake engine '{}'", config.wake.engine))?;
            let wake_value =
                toml::Value::try_from(&config.wake).context("failed to serialize wake config")?;
            engine
                .initialize(wake_value)
                .context("failed to initialize wake engine")?;

            let wake_label = match &config.wake.keyword_path {
                Some(_) => "custom wake word".to_string(),
                None => config.wake.keyword.clone(),
            };
            let ready = format!(
                "{} is ready. Say the wake word: {}.",
                config.general.assistant_name, wake_label
            );

            let negotiator = hark_audio::DeviceNegotiator::new();
            let trigger = hark_trigger::WakeTrigger::open(
                &negotiator,
                "default",
                engine,
                Arc::clone(&stop),
            )
            .context("failed to open the wake-word stream")?;
            (Box::new(trigger), ready)
        }
    };

    let audio = session::MicSource::new(
        config.audio.preferred_sample_rate,
        config.audio.capture_seconds,
        config.audio.block_frames,
    );

    let mut session = session::Session::new(
        trigger,
        audio,
        transcriber,
        router,
        executor,
        speaker,
        Arc::clone(&stop),
    );
    session.run(&ready_line);

    tracing::info!("hark stopped");
    Ok(())
}
