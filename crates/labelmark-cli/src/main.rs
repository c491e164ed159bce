use labelmark_core::StyledText;
use labelmark_render::font::{FontFamilyCatalog, FontPreferenceList, StaticFontBackend};
use labelmark_render::text::TextExtent;
use labelmark_render::{LabelConfig, LabelEngine};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Label(labelmark_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Label(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<labelmark_render::Error> for CliError {
    fn from(value: labelmark_render::Error) -> Self {
        Self::Label(value)
    }
}

impl From<labelmark_core::Error> for CliError {
    fn from(value: labelmark_core::Error) -> Self {
        Self::Label(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Spans,
    Parse,
    Font,
    Measure,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    text: Option<String>,
    config: Option<String>,
    pretty: bool,
    verbose: bool,
    no_close_trailing: bool,
    escape: bool,
    size_px: Option<f64>,
    font: Option<String>,
    installed: Option<String>,
    system_fonts: bool,
}

#[derive(Serialize)]
struct FontOut<'a> {
    selected: &'a str,
    descriptor: &'a str,
    family: &'a str,
    size_px: f64,
}

#[derive(Serialize)]
struct MeasureOut<'a> {
    font: &'a str,
    text: &'a str,
    #[serde(flatten)]
    extent: TextExtent,
}

fn usage() -> &'static str {
    "labelmark-cli\n\
\n\
USAGE:\n\
  labelmark-cli [spans] [--no-close-trailing] [--escape] [--text <markup>] [<path>|-]\n\
  labelmark-cli parse [--pretty] [--text <markup>] [<path>|-]\n\
  labelmark-cli font [--size <px>] [--installed <family,...>] [--system-fonts] [<family-list>]\n\
  labelmark-cli measure [--size <px>] [--font <family-list>] [--installed <family,...>] [--pretty] [--text <markup>] [<path>|-]\n\
\n\
OPTIONS (all commands):\n\
  --config <path>   JSON label config (fontFamily, fontSizePx, closeTrailing, escapeText)\n\
  -v, --verbose     debug logging on stderr\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', markup is read from stdin (unless --text is given).\n\
  - LABELMARK_FONT_FAMILY overrides the configured font family list.\n\
  - --system-fonts requires the `system-fonts` feature.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "spans" => args.command = Command::Spans,
            "parse" => args.command = Command::Parse,
            "font" => args.command = Command::Font,
            "measure" => args.command = Command::Measure,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--no-close-trailing" => args.no_close_trailing = true,
            "--escape" => args.escape = true,
            "--system-fonts" => args.system_fonts = true,
            "--text" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.text = Some(text.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--size" => {
                let Some(size) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let size = size.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(size.is_finite() && size > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.size_px = Some(size);
            }
            "--font" => {
                let Some(font) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.font = Some(font.clone());
            }
            "--installed" => {
                let Some(list) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.installed = Some(list.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            positional => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(positional.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn read_markup(args: &Args) -> Result<String, CliError> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    match args.input.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(args: &Args) -> Result<LabelConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => LabelConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => LabelConfig::default(),
    }
    .apply_env();
    if args.no_close_trailing {
        config.close_trailing = false;
    }
    if args.escape {
        config.escape_text = true;
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn split_families(list: &str) -> Vec<String> {
    list.split(',')
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(feature = "system-fonts")]
fn with_system_fonts(engine: LabelEngine) -> Result<LabelEngine, CliError> {
    use labelmark_render::font::{SystemFontBackend, init_global_catalog};

    let backend = SystemFontBackend::load();
    let catalog = init_global_catalog(&backend).map_err(labelmark_render::Error::from)?;
    Ok(engine
        .with_global_catalog(catalog)
        .with_font_matcher(Arc::new(backend)))
}

#[cfg(not(feature = "system-fonts"))]
fn with_system_fonts(_engine: LabelEngine) -> Result<LabelEngine, CliError> {
    Err(CliError::Usage(
        "--system-fonts requires labelmark-cli built with the `system-fonts` feature",
    ))
}

fn build_engine(args: &Args, config: LabelConfig) -> Result<LabelEngine, CliError> {
    let engine = LabelEngine::new(config);
    if args.system_fonts {
        return with_system_fonts(engine);
    }
    match &args.installed {
        Some(list) => {
            let families = split_families(list);
            Ok(engine
                .with_catalog(FontFamilyCatalog::from_families(&families))
                .with_font_matcher(Arc::new(StaticFontBackend::new(families))))
        }
        None => Ok(engine),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let engine = build_engine(&args, config)?;

    match args.command {
        Command::Spans => {
            let markup = read_markup(&args)?;
            print!("{}", engine.markup_to_spans(&markup)?);
            Ok(())
        }
        Command::Parse => {
            let markup = read_markup(&args)?;
            let styled: StyledText = engine.styled(&markup)?;
            write_json(&styled, args.pretty)
        }
        Command::Font => {
            let families = args
                .input
                .clone()
                .unwrap_or_else(|| engine.config().font_family.clone());
            let font = engine.font_descriptor(Some(families.as_str()), args.size_px)?;
            let list = FontPreferenceList::parse(&families);
            write_json(
                &FontOut {
                    selected: list.select(engine.catalog()),
                    descriptor: font.as_str(),
                    family: font.family(),
                    size_px: font.size_px(),
                },
                args.pretty,
            )
        }
        Command::Measure => {
            let markup = read_markup(&args)?;
            let styled = engine.styled(&markup)?;
            let font = engine.font_descriptor(args.font.as_deref(), args.size_px)?;
            let extent = engine.measure_markup(&markup, args.font.as_deref(), args.size_px)?;
            write_json(
                &MeasureOut {
                    font: font.as_str(),
                    text: &styled.text,
                    extent,
                },
                args.pretty,
            )
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);
    tracing::debug!(command = ?args.command, "labelmark-cli");

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
