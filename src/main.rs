use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use pitchcraft_pdf::{Error, FontMetrics, PageGeometry, Settings, parse, report_file_name};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PageSize {
    A4,
    Letter,
}

/// Turn generated startup-pitch text into a paginated PDF report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Pitch text file, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output PDF path (defaults to a name derived from the startup name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the derived output name
    #[arg(long, default_value = ".", conflicts_with = "output")]
    out_dir: PathBuf,

    /// Name shown in the footer's "Generated for" line
    #[arg(long)]
    author: Option<String>,

    /// Date shown in the footer (defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// TrueType/OpenType font for body text (also read from PITCHCRAFT_FONT)
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PageSize::A4)]
    page_size: PageSize,

    /// Print the parsed sections instead of writing a PDF
    #[arg(long)]
    sections: bool,
}

fn read_input(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })
}

fn run(cli: Cli) -> Result<(), Error> {
    let raw = read_input(&cli.input)?;

    let mut settings = Settings::default();
    if cli.sections {
        let record = parse(&raw, &settings.schema);
        for (label, value) in record.iter_in(&settings.schema) {
            println!("{label}:\n{value}\n");
        }
        return Ok(());
    }

    let font_path = cli
        .font
        .or_else(|| std::env::var_os("PITCHCRAFT_FONT").map(PathBuf::from));
    if let Some(path) = font_path {
        settings.body_font = FontMetrics::from_file(&path, 0)?;
        log::info!("body font: {} ({})", settings.body_font.name(), path.display());
    }

    settings.geometry = settings.geometry.with_page_size(match cli.page_size {
        PageSize::A4 => PageGeometry::A4,
        PageSize::Letter => PageGeometry::LETTER,
    });
    if let Some(author) = cli.author {
        settings.chrome.author = author;
    }
    settings.chrome.generated_on = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().format("%B %-d, %Y").to_string());

    let output = match cli.output {
        Some(path) => path,
        None => {
            let record = parse(&raw, &settings.schema);
            cli.out_dir.join(report_file_name(&record, &settings.schema))
        }
    };

    pitchcraft_pdf::convert_text_to_pdf(&raw, &output, &settings)?;
    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
