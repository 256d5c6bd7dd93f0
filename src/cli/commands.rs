//! Subcommand handlers for render, generate, charsets and config actions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ascii_mosaic::ascii::{CharSet, ContrastMode};
use ascii_mosaic::bitmap::SourceBitmap;
use ascii_mosaic::config::{default_path as get_config_path, Config, DEFAULT_CONFIG_TOML};
use ascii_mosaic::export;
use ascii_mosaic::fal;
use ascii_mosaic::{convert, Mosaic, Settings};

use super::args::{ConfigAction, RenderArgs};

/// Load the config file.
///
/// An explicit `--config` path must exist. The default path is optional, and
/// a broken default file only produces a warning.
pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load_from_explicit(path).map_err(|e| e.to_string()),
        None => match Config::load(None) {
            Ok(c) => Ok(c),
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using default settings.", e);
                Ok(Config::default())
            }
        },
    }
}

/// Merge settings: CLI args > config file > built-in defaults.
pub fn build_settings(render: &RenderArgs, cfg: &Config) -> Result<Settings, String> {
    let mut builder = cfg
        .render
        .apply(Settings::builder())
        .map_err(|e| e.to_string())?;

    if let Some(resolution) = render.resolution {
        builder = builder.resolution(resolution);
    }
    if let Some(contrast) = render.contrast {
        builder = builder.contrast(contrast);
    }
    if let Some(brightness) = render.brightness {
        builder = builder.brightness(brightness);
    }
    if let Some(invert) = render.invert_flag() {
        builder = builder.invert(invert);
    }
    if let Some(charset) = render.charset {
        builder = builder.charset(CharSet::from(charset));
    }
    if let Some(mode) = render.contrast_mode {
        builder = builder.contrast_mode(ContrastMode::from(mode));
    }

    builder.build().map_err(|e| e.to_string())
}

/// Font for raster output: CLI > config > built-in.
fn font_path(render: &RenderArgs, cfg: &Config) -> Option<PathBuf> {
    render.font.clone().or_else(|| cfg.output.font.clone())
}

/// Write the mosaic to `output`, or print it as text when no file is given.
fn emit(mosaic: &Mosaic, output: Option<&Path>, font: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => {
            let face = export::load_face(font, mosaic).map_err(|e| e.to_string())?;
            export::save(mosaic, path, face.as_ref())
                .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
            println!(
                "Saved {}x{} mosaic to {}",
                mosaic.geometry.cols,
                mosaic.geometry.rows,
                path.display()
            );
            Ok(())
        }
        None => {
            let stdout = std::io::stdout();
            export::write_text(mosaic, stdout.lock()).map_err(|e| e.to_string())
        }
    }
}

/// Run the render command: decode an image file, convert and export it.
pub fn run_render(
    input: &Path,
    output: Option<&Path>,
    render: &RenderArgs,
    cfg: &Config,
) -> Result<(), String> {
    let settings = build_settings(render, cfg)?;
    let bitmap = SourceBitmap::open(input).map_err(|e| e.to_string())?;
    log::info!(
        "Loaded {} ({}x{})",
        input.display(),
        bitmap.width(),
        bitmap.height()
    );

    let mosaic = convert(&bitmap, &settings);
    emit(&mosaic, output, font_path(render, cfg).as_deref())
}

/// Load .env file and check for FAL_API_KEY
///
/// Does not override existing environment variables.
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    if std::env::var(fal::FAL_API_KEY_ENV).is_err() {
        log::warn!("{} environment variable not set", fal::FAL_API_KEY_ENV);
    }
}

/// Run the generate command: fetch an image from fal.ai, then convert and
/// export it like a local file.
#[allow(clippy::too_many_arguments)] // Direct mapping from CLI args
pub fn run_generate(
    prompt: &str,
    output: Option<&Path>,
    model: Option<String>,
    image_size: Option<String>,
    timeout: Option<u64>,
    render: &RenderArgs,
    cfg: &Config,
) -> Result<(), String> {
    // Validate everything local before spending a request.
    let settings = build_settings(render, cfg)?;
    if let Some(path) = output {
        export::OutputFormat::from_path(path).map_err(|e| e.to_string())?;
    }
    fal::validate_prompt(prompt).map_err(|e| format!("image generation failed: {}", e))?;

    load_env();

    let mut client = fal::FalClient::new().map_err(|e| match e {
        fal::FalError::MissingApiKey => "FAL_API_KEY environment variable is not set.\n\n\
            Add your API key to a .env file:\n\
                echo 'FAL_API_KEY=your-api-key-here' >> .env\n\n\
            Or set it as an environment variable:\n\
                export FAL_API_KEY=\"your-api-key-here\"\n\n\
            Get your API key at: https://fal.ai/"
            .to_string(),
        _ => format!("Failed to create fal.ai client: {}", e),
    })?;

    if let Some(model) = model.or_else(|| cfg.fal.model.clone()) {
        client = client.using_model(model);
    }
    if let Some(size) = image_size.or_else(|| cfg.fal.image_size.clone()) {
        client = client.using_image_size(size);
    }
    let timeout = timeout
        .or(cfg.fal.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(fal::DEFAULT_GENERATION_TIMEOUT);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    eprintln!("Generating image for: \"{}\" ({})", prompt, client.model());

    let bytes = rt.block_on(async {
        tokio::select! {
            result = client.generate_image(prompt, timeout) => {
                result.map_err(|e| format!("image generation failed: {}", e))
            }
            _ = tokio::signal::ctrl_c() => {
                Err("image generation cancelled".to_string())
            }
        }
    })?;

    let bitmap = SourceBitmap::decode(&bytes)
        .map_err(|e| format!("image generation failed: {}", e))?;
    log::info!("Generated image is {}x{}", bitmap.width(), bitmap.height());

    let mosaic = convert(&bitmap, &settings);
    emit(&mosaic, output, font_path(render, cfg).as_deref())
}

/// Print every character ramp with its level count.
pub fn list_charsets() {
    let default = CharSet::default();
    println!("Available character sets:");
    for charset in CharSet::ALL {
        let marker = if charset == default { " (default)" } else { "" };
        println!(
            "  {:<9} {:>3} levels{}",
            charset.name(),
            charset.len(),
            marker
        );
        println!("            \"{}\"", charset.ramp());
    }
    println!();
    println!("Use --charset <name> to select a character set.");
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) -> Result<(), String> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let cfg = load_config(config_path)?;
            let settings = build_settings(&RenderArgs::default(), &cfg)?;

            println!("Current configuration:");
            println!("  Resolution:    {}", settings.resolution());
            println!("  Contrast:      {}", settings.contrast());
            println!("  Contrast mode: {}", settings.contrast_mode());
            println!("  Brightness:    {}", settings.brightness());
            println!("  Invert:        {}", if settings.invert() { "yes" } else { "no" });
            println!("  Charset:       {}", settings.charset());
            match cfg.output.font {
                Some(ref font) => println!("  Font:          {}", font.display()),
                None => println!("  Font:          built-in"),
            }
            println!(
                "  fal.ai model:  {}",
                cfg.fal.model.as_deref().unwrap_or(fal::DEFAULT_MODEL)
            );
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(format!(
                    "Config file already exists: {}\n\
                    Use 'ascii-mosaic config show' to view current settings.",
                    path.display()
                ));
            }

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&path, DEFAULT_CONFIG_TOML)
                .map_err(|e| format!("Error writing config file: {}", e))?;

            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}
