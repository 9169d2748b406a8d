use structopt::StructOpt;
use tilc::ast::Program;

use tilc::error::SourceMetadata;
use tilc::exec::{Evaluator, JavaToolchain};
use tilc::grammar::Parser;

use tracing_subscriber::fmt;

fn main() {
    if let Err(ref e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    use std::fs;

    let opt = Opt::from_args();

    if let Some((_, filter)) = std::env::vars().find(|x| x.0 == "TILC_TRACE") {
        fmt::Subscriber::builder()
            .with_ansi(true)
            .pretty()
            .with_env_filter(filter)
            .init();
    }

    let filename = opt.file;
    let file = fs::read_to_string(&filename)?;
    let meta = SourceMetadata::new(&file).with_file(filename);

    println!("=====Original  file=====");
    println!("{}", file);

    let program: Program = Parser::new(&meta).parse()?;
    tilc::semantic::analyze_program(&program, &meta)?;

    log::debug!("analyzed tree: {program:?}");

    let java = tilc::javagen::generate_program(&program)?;

    println!("====Java translation====");
    println!("{}", java);

    println!("======== Output ========");
    let output = JavaToolchain::new().evaluate(&java)?;
    print!("{}", output);

    Ok(())
}

#[derive(Debug, StructOpt)]
struct Opt {
    /// The file to compile and run
    #[structopt(parse(from_os_str))]
    file: std::path::PathBuf,
}
