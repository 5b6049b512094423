use anyhow::Context as _;
use anyhow::Result;
use itertools::Itertools as _;
use std::env;
use std::fs;
use std::io;
use std::io::Read as _;
use std::io::Write as _;
use std::path::Path;
use su2_import::FormatInfo;
use su2_import::Host;
use su2_import::Importer;
use su2_import::Mesh;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

const USAGE: &str = "Usage: su2-info [options] [in.su2]";

const STAGES: [&str; 4] = ["scan header", "count elements", "read vertices", "load elements"];

/// Prints import progress on stderr.
#[derive(Default)]
struct Progress {
    verbose: bool,
    step: usize,
    major_steps: u32,
    total: usize,
    done: usize,
}

impl Host for Progress {
    fn progress_init(&mut self, major_steps: u32) -> bool {
        self.major_steps = major_steps;
        true
    }

    fn progress_begin_step(&mut self, total: usize) -> bool {
        self.total = total;
        self.done = 0;
        true
    }

    fn progress_increment(&mut self) -> bool {
        self.done += 1;
        true
    }

    fn progress_end_step(&mut self) -> bool {
        if self.verbose {
            let stage = STAGES.get(self.step).copied().unwrap_or("import");
            eprintln!(
                "[{}/{}] {stage}: {}/{}",
                self.step + 1,
                self.major_steps,
                self.done,
                self.total,
            );
        }
        self.step += 1;
        true
    }
}

fn import<R>(input: R, verbose: bool) -> Result<Mesh>
where
    R: io::BufRead + io::Seek,
{
    let mut mesh = Mesh::default();
    let mut progress = Progress {
        verbose,
        ..Progress::default()
    };
    Importer::new(input, FormatInfo::su2())?
        .read(&mut mesh, &mut progress)
        .context("failed to import grid")?;
    Ok(mesh)
}

fn print_mesh(matches: &getopts::Matches, mesh: &Mesh) -> Result<()> {
    let stdout = io::stdout();
    let mut w = io::BufWriter::new(stdout.lock());

    match mesh.dimension() {
        Some(dimension) => writeln!(w, "Dimension: {dimension}")?,
        None => writeln!(w, "Dimension: unknown")?,
    }
    writeln!(w, "Vertices:  {}", mesh.vertex_count())?;
    writeln!(w, "Elements:  {}", mesh.element_count())?;
    for (kind, count) in mesh.counts().iter() {
        writeln!(w, " - {kind:<8}{count:>12}")?;
    }

    if matches.opt_present("vertices") {
        writeln!(w)?;
        for (i, v) in mesh.vertices().iter().enumerate() {
            writeln!(w, "{i} {} {} {}", v.x, v.y, v.z)?;
        }
    }
    if matches.opt_present("elements") {
        writeln!(w)?;
        for (i, element) in mesh.elements().enumerate() {
            let nodes = element.nodes().iter().join(" ");
            writeln!(w, "{i} {} {nodes}", element.kind())?;
        }
    }

    w.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optflag("", "elements", "print the elements after the summary");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print import progress");
    options.optflag("", "vertices", "print the vertices after the summary");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(USAGE));
        return Ok(());
    }
    if matches.free.len() > 1 {
        anyhow::bail!("too many arguments\n\n{}", options.usage(USAGE));
    }

    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    let _chrome_trace_guard = match matches.opt_str("t") {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    let verbose = matches.opt_present("v");
    let mesh = match matches.free.first() {
        Some(filename) => {
            if !FormatInfo::su2().matches_extension(Path::new(filename)) {
                eprintln!("warning: {filename:?} does not have a .su2 extension");
            }
            let file = fs::File::open(filename)
                .with_context(|| format!("failed to open {filename:?}"))?;
            import(io::BufReader::new(file), verbose)?
        }
        None => {
            // The importer seeks back and forth, so standard input is kept
            // in memory.
            let mut input = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut input)
                .context("failed to read standard input")?;
            import(io::Cursor::new(input), verbose)?
        }
    };

    print_mesh(&matches, &mesh)
}
