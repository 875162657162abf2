use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use texa::verify::StageCert;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum EmitStage {
    /// Full JSON analysis report
    Report,
    /// Pretty-printed IR
    Ir,
    /// Distinct variables, one per line
    Vars,
    /// Logical-to-flat buffer correspondences
    Buffers,
    /// Whether the tree draws random numbers
    Rand,
}

#[derive(Parser, Debug)]
#[command(
    name = "texa",
    version,
    about = "texa — read-only analyses over tensor-expression IR trees"
)]
struct Cli {
    /// Input IR tree (JSON)
    source: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to emit
    #[arg(long, value_enum, default_value_t = EmitStage::Report)]
    emit: EmitStage,

    /// Skip well-formedness verification
    #[arg(long)]
    skip_verify: bool,

    /// Log analysis progress to stderr
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("source = {}", cli.source.display());
    log::info!("emit   = {:?}", cli.emit);

    // ── Load ──
    let loaded = match texa::load::load_ir(&cli.source) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("texa: error: {}", e);
            std::process::exit(2);
        }
    };
    let root = &loaded.root;

    // ── Verify ──
    let cert = if cli.skip_verify {
        None
    } else {
        let cert = texa::verify::verify_ir(root);
        for diag in &cert.diagnostics {
            eprintln!("texa: {}", diag);
        }
        if !cert.all_pass() {
            std::process::exit(1);
        }
        Some(cert)
    };

    // ── Analyze ──
    let text = match cli.emit {
        EmitStage::Report => {
            let report = texa::report::build_report(&loaded.source, root, cert.as_ref());
            match report.to_json() {
                Ok(json) => json + "\n",
                Err(e) => {
                    eprintln!("texa: error: {}", e);
                    std::process::exit(2);
                }
            }
        }
        EmitStage::Ir => root.to_string(),
        EmitStage::Vars => texa::var_finder::VarFinder::new(root)
            .sorted()
            .iter()
            .map(|v| format!("{} {} {}\n", v.id.0, v.name, v.dtype))
            .collect(),
        EmitStage::Buffers => {
            let mapper = texa::buffer_map::CreateBufferMap::new(root);
            let mut entries: Vec<_> = mapper.buffer_map().iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries
                .into_iter()
                .map(|(logical, flat)| format!("{} -> {}\n", logical, flat.name_hint))
                .collect()
        }
        EmitStage::Rand => format!("{}\n", texa::has_rand::has_rand(root)),
    };

    // ── Write ──
    let result = match &cli.output {
        Some(path) => std::fs::write(path, &text),
        None => std::io::stdout().write_all(text.as_bytes()),
    };
    if let Err(e) = result {
        eprintln!("texa: error: {}", e);
        std::process::exit(2);
    }
}
