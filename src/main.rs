use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use memekit::config::MemeConfig;
use memekit::logging::LogFormat;
use memekit::render::{CaptionPosition, RenderOptions, TextEffect};
use memekit::{MemeEditor, PreviewStatus};

/// Memekit - caption compositing for meme templates
#[derive(Parser, Debug)]
#[command(name = "memekit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a meme to PNG
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file or directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print a data URL to stdout instead of writing a file
        #[arg(long)]
        data_url: bool,

        /// Write the preview canvas with the caption bounding box
        #[arg(long)]
        preview: bool,
    },

    /// Print the paint operations of a preview pass as JSON
    Plan {
        #[command(flatten)]
        scene: SceneArgs,

        /// Omit the caption bounding box
        #[arg(long)]
        no_bounding_box: bool,
    },
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Template image: http(s) URL, data URL or file path
    #[arg(short, long)]
    image: String,

    /// Caption text
    #[arg(short = 't', long, default_value = "")]
    caption: String,

    /// Watermark image reference
    #[arg(short, long)]
    watermark: Option<String>,

    /// Text effect: none, shadow, glow or stroke
    #[arg(short, long)]
    effect: Option<TextEffect>,

    /// Font scale between 0.5 and 2.0
    #[arg(short = 's', long)]
    font_scale: Option<f32>,

    /// Horizontal caption anchor as a fraction of the image width
    #[arg(short)]
    x: Option<f32>,

    /// Vertical caption anchor as a fraction of the image height
    #[arg(short)]
    y: Option<f32>,
}

impl SceneArgs {
    fn apply(self, editor: &mut MemeEditor) {
        editor.set_image(Some(self.image));
        editor.set_caption(self.caption);
        if self.watermark.is_some() {
            editor.set_watermark(self.watermark);
        }
        if let Some(effect) = self.effect {
            editor.toggle_effect(effect, true);
        }
        if let Some(scale) = self.font_scale {
            editor.set_font_scale(scale);
        }
        if self.x.is_some() || self.y.is_some() {
            let current = editor.position();
            editor.set_position(CaptionPosition::new(
                self.x.unwrap_or(current.x_percent()),
                self.y.unwrap_or(current.y_percent()),
            ));
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MemeConfig> {
    match path {
        Some(path) => MemeConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(MemeConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    memekit::logging::init_subscriber_with_format(cli.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = load_config(cli.config.as_ref())?;
    tracing::info!(
        preview_width = config.canvas.preview_width,
        export_width = config.canvas.export_width,
        device_pixel_ratio = config.canvas.device_pixel_ratio,
        "Configuration loaded"
    );

    let mut editor = MemeEditor::from_config(config).context("Failed to create editor")?;

    match cli.command {
        Command::Render {
            scene,
            output,
            data_url,
            preview,
        } => {
            scene.apply(&mut editor);

            if preview {
                match editor.render_preview().await {
                    PreviewStatus::Rendered => {}
                    PreviewStatus::Failed(e) => return Err(e).context("Preview failed"),
                    other => anyhow::bail!("Preview not rendered: {:?}", other),
                }
                let png = editor
                    .preview_png()?
                    .context("Preview produced no image")?;
                if data_url {
                    println!("{}", memekit::export::to_data_url(&png));
                } else {
                    let target = if output.is_dir() {
                        output.join(memekit::constants::DEFAULT_EXPORT_FILE_NAME)
                    } else {
                        output
                    };
                    tokio::fs::write(&target, &png)
                        .await
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    tracing::info!(path = %target.display(), "Preview written");
                }
            } else if data_url {
                println!("{}", editor.export_data_url().await?);
            } else {
                let target = editor.export_to_file(&output).await?;
                println!("{}", target.display());
            }
        }
        Command::Plan {
            scene,
            no_bounding_box,
        } => {
            scene.apply(&mut editor);
            let options = if no_bounding_box {
                RenderOptions::export()
            } else {
                RenderOptions::preview()
            };
            let ops = editor.plan(options).await?;
            println!("{}", serde_json::to_string_pretty(&ops)?);
        }
    }

    Ok(())
}
