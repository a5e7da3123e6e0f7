use clap::Parser;
use lopdf_report::{
    Destination, DocumentAssembler, PageGeometry, RenderOutput, RepeatedTitle, ReportStyle,
    TrainingProgram, render_program_document_with,
};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Render a training program record (JSON) to a paginated PDF
#[derive(Parser)]
#[command(name = "lopdf-report", version)]
struct Cli {
    /// Input program record (.json)
    input: PathBuf,

    /// Output PDF path
    #[arg(short, long, conflicts_with = "dir")]
    output: Option<PathBuf>,

    /// Output directory; the file is named program_<id>_<timestamp>.pdf
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Repeat the program title at the top of continuation pages
    #[arg(long)]
    repeat_title: bool,

    /// Repeat the exercise table header on continuation pages
    #[arg(long)]
    repeat_header: bool,

    /// Use US Letter instead of A4
    #[arg(long)]
    letter: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.input)?;
    let program = TrainingProgram::from_json(&json)?;

    let geometry = if cli.letter {
        PageGeometry::letter()
    } else {
        PageGeometry::a4()
    };
    let style = ReportStyle::default().with_repeated_table_header(cli.repeat_header);
    let mut assembler = DocumentAssembler::new(geometry)
        .with_style(style)
        .with_title(program.title.clone());
    if cli.repeat_title {
        assembler = assembler.with_chrome(RepeatedTitle::new(program.title.clone()));
    }

    let destination = match (cli.output, cli.dir) {
        (Some(path), _) => Some(Destination::File(path)),
        (None, Some(dir)) => Some(Destination::Directory(dir)),
        (None, None) => None,
    };

    match render_program_document_with(assembler, &program, destination.as_ref())? {
        RenderOutput::File(path) => {
            tracing::info!("Wrote {}", path.display());
            println!("{}", path.display());
        }
        RenderOutput::Buffer(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
