//! Headless CLI for the portfolio backdrop
//!
//! Run with:
//!   cargo run --features cli --bin portfolio-cli -- field [WIDTH HEIGHT]
//!   cargo run --features cli --bin portfolio-cli -- chat

#[cfg(not(target_arch = "wasm32"))]
use portfolio_backdrop::core::{ChatError, SiteConfig};

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "usage: portfolio-cli field [WIDTH HEIGHT] | portfolio-cli chat";

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portfolio_backdrop=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = SiteConfig::from_env()?;

    match args.first().map(String::as_str) {
        Some("field") => {
            let width = parse_dimension(args.get(1), 1280.0)?;
            let height = parse_dimension(args.get(2), 720.0)?;
            run_field(width, height).await;
            Ok(())
        }
        Some("chat") => run_chat(&config).await,
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_dimension(arg: Option<&String>, default: f64) -> Result<f64, Box<dyn std::error::Error>> {
    match arg {
        Some(s) => Ok(s.parse::<f64>().map_err(|e| format!("bad dimension {:?}: {}", s, e))?),
        None => Ok(default),
    }
}

/// Drive the field at 60 Hz against an in-memory surface until Ctrl-C
#[cfg(not(target_arch = "wasm32"))]
async fn run_field(width: f64, height: f64) {
    use portfolio_backdrop::core::{
        entropy_rng, CancellationToken, Field, FrameSupervisor, FrameVerdict, RecordingSurface,
        Viewport,
    };
    use portfolio_backdrop::time::FrameRateMeter;
    use std::time::Duration;
    use tracing::info;

    let mut rng = entropy_rng();
    let viewport = Viewport::new(width, height);
    let mut field = Field::new(viewport, &mut rng);
    let mut surface = RecordingSurface::new();
    let token = CancellationToken::new();
    let mut supervisor = FrameSupervisor::new(token.clone());
    let mut meter = FrameRateMeter::default();
    let mut draw_ops = 0usize;

    info!(width, height, nodes = field.nodes().len(), "Field running, Ctrl-C to stop");

    let mut frame_interval = tokio::time::interval(Duration::from_micros(16_667));
    let mut stats_interval = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                if !supervisor.should_run() {
                    break;
                }
                let outcome = field.frame(&mut rng, &mut surface);
                draw_ops = surface.take().len();
                meter.tick();
                if supervisor.record(outcome) == FrameVerdict::Stop {
                    break;
                }
            }
            _ = stats_interval.tick() => {
                let last = supervisor.last_stats();
                info!(
                    frames = supervisor.frames(),
                    failures = supervisor.failures(),
                    fps = format!("{:.1}", meter.fps()),
                    nodes = last.nodes,
                    packets = field.packet_count(),
                    connections = last.connections,
                    draw_ops,
                    "stats"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                token.cancel();
            }
        }
    }

    info!(frames = supervisor.frames(), "Field stopped");
}

/// Line-oriented chat against the configured backend
#[cfg(not(target_arch = "wasm32"))]
async fn run_chat(config: &SiteConfig) -> Result<(), Box<dyn std::error::Error>> {
    use portfolio_backdrop::core::chat::normalize_prompt;
    use portfolio_backdrop::core::ChatBackend;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tracing::{error, info};

    let backend = ChatBackend::from_config(&config.chat);
    let http = reqwest::Client::new();
    info!(remote = backend.is_remote(), "Chat ready, one question per line");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(prompt) = normalize_prompt(&line) else {
            continue;
        };
        let reply = match &backend {
            ChatBackend::Scripted {
                responder,
                typing_delay_ms,
            } => {
                tokio::time::sleep(Duration::from_millis(u64::from(*typing_delay_ms))).await;
                responder.reply(&prompt)
            }
            ChatBackend::Remote(client) => match remote_reply(&http, client, &prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "Gemini request failed");
                    e.user_message().to_string()
                }
            },
        };
        println!("{}\n", reply);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
async fn remote_reply(
    http: &reqwest::Client,
    client: &portfolio_backdrop::core::gemini::GeminiClient,
    prompt: &str,
) -> Result<String, ChatError> {
    use portfolio_backdrop::core::gemini::parse_reply;
    use tracing::debug;

    // The URL carries the API key; keep it out of error messages
    let transport = |e: reqwest::Error| ChatError::Transport(e.without_url().to_string());

    let response = http
        .post(client.url())
        .header("Content-Type", "application/json")
        .body(client.request_body(prompt)?)
        .send()
        .await
        .map_err(transport)?;
    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    debug!(status = %status, bytes = text.len(), model = client.model(), "Gemini responded");

    parse_reply(&text)
}

#[cfg(target_arch = "wasm32")]
fn main() {}
