use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

use heartline::prompt::SYSTEM_INSTRUCTION;
use heartline::{
    Config, GeminiClient, LanguageDetector, TextToSpeech, TurnInput, TurnPipeline, VoiceLang,
};

/// Heartline - voice-first cardiovascular health assistant
#[derive(Parser)]
#[command(name = "heartline", version, about)]
struct Cli {
    /// Default voice language for playback fallback (en, hi, mr)
    #[arg(long, env = "HEARTLINE_VOICE_LANG")]
    voice_lang: Option<VoiceLang>,

    /// Slow down synthesized speech
    #[arg(long, env = "HEARTLINE_SLOW_SPEECH")]
    slow: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a line of text and save the MP3
    Say {
        /// Text to speak
        text: String,

        /// Voice language (defaults to the configured voice setting)
        #[arg(short, long)]
        lang: Option<VoiceLang>,

        /// Output path
        #[arg(short, long, default_value = "say.mp3")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,heartline=info",
        1 => "info,heartline=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            eprintln!("heartline: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(lang) = cli.voice_lang {
        config.voice.default_lang = lang;
    }
    if cli.slow {
        config.voice.slow = true;
    }

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Say { text, lang, out } => {
                say(&config, &text, lang.unwrap_or(config.voice.default_lang), &out).await
            }
        };
    }

    chat(config).await
}

/// Synthesize one line and save it (voice smoke test)
async fn say(config: &Config, text: &str, lang: VoiceLang, out: &PathBuf) -> anyhow::Result<()> {
    let tts = TextToSpeech::new(config.voice.slow, config.request_timeout)?;

    println!("Synthesizing in {} ...", lang.label());
    let clip = tts.synthesize(text, lang).await?;
    clip.save(out)?;
    println!("Saved {} bytes to {}", clip.len(), out.display());

    Ok(())
}

/// Interactive chat session
async fn chat(config: Config) -> anyhow::Result<()> {
    let gemini = Arc::new(GeminiClient::new(
        config.api_key,
        config.model.clone(),
        SYSTEM_INSTRUCTION.to_string(),
        config.request_timeout,
    )?);
    let tts = Arc::new(TextToSpeech::new(config.voice.slow, config.request_timeout)?);
    let detector = Arc::new(LanguageDetector::new());

    let transcriber: Arc<dyn heartline::Transcribe> = gemini.clone();
    let generator: Arc<dyn heartline::GenerateReply> = gemini;
    let mut pipeline = TurnPipeline::new(
        transcriber,
        generator,
        detector,
        tts,
        config.voice.default_lang,
    );

    let replies_dir = config.data_dir.join("replies");
    std::fs::create_dir_all(&replies_dir)?;

    println!("Heartline - how can I help your heart?");
    println!(
        "Voice: {} | /voice <en|hi|mr> to change, /audio <path> to speak, /history, /quit",
        pipeline.voice_lang().label()
    );

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt_marker();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        let input = match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                print_history(&pipeline);
                continue;
            }
            _ if line.starts_with("/voice") => {
                match line.trim_start_matches("/voice").trim().parse::<VoiceLang>() {
                    Ok(lang) => {
                        pipeline.set_voice_lang(lang);
                        println!("Default voice is now {}", lang.label());
                    }
                    Err(e) => eprintln!("{e}"),
                }
                continue;
            }
            _ if line.starts_with("/audio") => {
                let path = line.trim_start_matches("/audio").trim();
                if path.is_empty() {
                    eprintln!("usage: /audio <path-to-recording>");
                    continue;
                }
                match tokio::fs::read(path).await {
                    Ok(bytes) => TurnInput::Audio {
                        bytes,
                        mime: mime_for_path(path).to_string(),
                    },
                    Err(e) => {
                        eprintln!("could not read {path}: {e}");
                        continue;
                    }
                }
            }
            _ => TurnInput::Text(line.to_string()),
        };

        match pipeline.take_turn(input).await {
            Ok(outcome) => {
                let lang = outcome.reply.lang.unwrap_or(pipeline.voice_lang());
                println!("assistant [{lang}]: {}", outcome.reply.content);

                if let Some(clip) = outcome.audio {
                    let path = replies_dir.join(format!(
                        "{}-{:04}.mp3",
                        pipeline.conversation().id,
                        pipeline.conversation().len()
                    ));
                    match clip.save(&path) {
                        Ok(()) => println!("voice reply: {}", path.display()),
                        Err(e) => eprintln!("could not save voice reply: {e}"),
                    }
                }
                if let Some(notice) = outcome.notice {
                    eprintln!("notice: {notice}");
                }
            }
            // Transcription/generation failures abort the turn; the text
            // conversation so far stays intact.
            Err(e) => eprintln!("request failed: {e}"),
        }
    }

    println!("take care of your heart!");
    Ok(())
}

fn prompt_marker() {
    use std::io::Write;
    print!("you: ");
    let _ = std::io::stdout().flush();
}

fn print_history(pipeline: &TurnPipeline) {
    for turn in pipeline.conversation().turns() {
        match turn.lang {
            Some(lang) => println!("[assistant/{lang}] {}", turn.content),
            None => println!("[user] {}", turn.content),
        }
    }
}

/// Declared MIME type for a recording, from its file extension
fn mime_for_path(path: &str) -> &'static str {
    match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mp3",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("aac") => "audio/aac",
        _ => "audio/wav",
    }
}
