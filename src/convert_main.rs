
use env_logger::Env;

#[macro_use] mod common;
mod dna_to_fastq;

fn main() {
	env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
	dna_to_fastq::main();
}
